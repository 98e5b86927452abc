//! Role repository for onboarding role assignment
//!
//! A user picks exactly one role (donor, NGO, or volunteer) after
//! registration. Assignment also creates the role-specific extension
//! record in the same transaction, so an NGO always has an
//! `ngo_profiles` row and a volunteer always has a `volunteer_profiles`
//! row.

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::UserRole;
use crate::core::db::models::{NgoProfile, UserRoleRecord, VolunteerProfile};

/// Role repository error types
#[derive(Debug, thiserror::Error)]
pub enum RoleRepositoryError {
    #[error("Role not found")]
    NotFound,

    #[error("User already has a role assigned")]
    RoleAlreadyAssigned,

    #[error("NGO selection requires an organization name")]
    MissingOrganizationName,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Role repository for database operations
#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Assign a role to a user.
    ///
    /// Fails with `RoleAlreadyAssigned` if the user already picked one;
    /// roles are permanent once chosen. NGOs must provide an
    /// organization name, which seeds the organization record.
    pub async fn assign(
        &self,
        user_id: Uuid,
        role: UserRole,
        organization_name: Option<&str>,
    ) -> Result<UserRoleRecord, RoleRepositoryError> {
        let organization_name = organization_name.map(str::trim).filter(|n| !n.is_empty());
        if role == UserRole::Ngo && organization_name.is_none() {
            return Err(RoleRepositoryError::MissingOrganizationName);
        }

        if self.find_by_user(user_id).await?.is_some() {
            return Err(RoleRepositoryError::RoleAlreadyAssigned);
        }

        let mut tx = self.pool.begin().await?;

        // UNIQUE(user_id) catches the race where two selections pass the
        // pre-check at the same time; the loser still gets the conflict
        let record = sqlx::query_as::<_, UserRoleRecord>(
            r#"
            INSERT INTO user_roles (user_id, role)
            VALUES ($1, $2)
            RETURNING id, user_id, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => RoleRepositoryError::RoleAlreadyAssigned,
            _ => RoleRepositoryError::DatabaseError(e),
        })?;

        match role {
            UserRole::Ngo => {
                let name =
                    organization_name.ok_or(RoleRepositoryError::MissingOrganizationName)?;
                sqlx::query(
                    r#"
                    INSERT INTO ngo_profiles (user_id, organization_name)
                    VALUES ($1, $2)
                    "#,
                )
                .bind(user_id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
            }
            UserRole::Volunteer => {
                sqlx::query(
                    r#"
                    INSERT INTO volunteer_profiles (user_id)
                    VALUES ($1)
                    "#,
                )
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            }
            UserRole::Donor => {}
        }

        tx.commit().await?;

        Ok(record)
    }

    /// Find a user's role assignment
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserRoleRecord>, RoleRepositoryError> {
        let record = sqlx::query_as::<_, UserRoleRecord>(
            r#"
            SELECT id, user_id, role, created_at
            FROM user_roles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Fetch the NGO extension record for a user
    pub async fn ngo_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NgoProfile>, RoleRepositoryError> {
        let profile = sqlx::query_as::<_, NgoProfile>(
            r#"
            SELECT id, user_id, organization_name, registration_number, description,
                   operating_hours, beneficiaries_count, vehicle_capacity, verified, created_at
            FROM ngo_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Fetch the volunteer extension record for a user
    pub async fn volunteer_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<VolunteerProfile>, RoleRepositoryError> {
        let profile = sqlx::query_as::<_, VolunteerProfile>(
            r#"
            SELECT id, user_id, vehicle_type, vehicle_number, availability_status,
                   rating, total_deliveries, created_at
            FROM volunteer_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_repository_error_display() {
        let err = RoleRepositoryError::NotFound;
        assert_eq!(format!("{}", err), "Role not found");

        let err = RoleRepositoryError::RoleAlreadyAssigned;
        assert_eq!(format!("{}", err), "User already has a role assigned");

        let err = RoleRepositoryError::MissingOrganizationName;
        assert_eq!(
            format!("{}", err),
            "NGO selection requires an organization name"
        );
    }

    #[tokio::test]
    async fn test_assign_ngo_without_organization_rejected() {
        // The name check runs before any query, so a lazy pool suffices
        let pool = PgPool::connect_lazy("postgres://localhost/foodbridge").unwrap();
        let repo = RoleRepository::new(pool);

        let result = repo.assign(Uuid::new_v4(), UserRole::Ngo, None).await;
        assert!(matches!(
            result,
            Err(RoleRepositoryError::MissingOrganizationName)
        ));

        let result = repo.assign(Uuid::new_v4(), UserRole::Ngo, Some("   ")).await;
        assert!(matches!(
            result,
            Err(RoleRepositoryError::MissingOrganizationName)
        ));
    }

    // ========================================================================
    // Integration Tests (require database)
    // ========================================================================

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_assign_donor_role() {
        let (pool, user_id) = setup_test_user().await;
        let repo = RoleRepository::new(pool.clone());

        let record = repo.assign(user_id, UserRole::Donor, None).await.unwrap();

        assert_eq!(record.user_id, user_id);
        assert_eq!(record.role, UserRole::Donor);

        // Donors get no extension record
        assert!(repo.ngo_profile(user_id).await.unwrap().is_none());
        assert!(repo.volunteer_profile(user_id).await.unwrap().is_none());

        cleanup_test_user(&pool, user_id).await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_assign_ngo_role_creates_organization() {
        let (pool, user_id) = setup_test_user().await;
        let repo = RoleRepository::new(pool.clone());

        repo.assign(user_id, UserRole::Ngo, Some("Helping Hands"))
            .await
            .unwrap();

        let ngo = repo.ngo_profile(user_id).await.unwrap().unwrap();
        assert_eq!(ngo.organization_name, "Helping Hands");
        assert!(!ngo.verified);

        cleanup_test_user(&pool, user_id).await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_assign_volunteer_role_creates_profile() {
        let (pool, user_id) = setup_test_user().await;
        let repo = RoleRepository::new(pool.clone());

        repo.assign(user_id, UserRole::Volunteer, None)
            .await
            .unwrap();

        let profile = repo.volunteer_profile(user_id).await.unwrap().unwrap();
        assert_eq!(profile.total_deliveries, 0);
        assert!(profile.availability_status);

        cleanup_test_user(&pool, user_id).await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_assign_second_role_rejected() {
        let (pool, user_id) = setup_test_user().await;
        let repo = RoleRepository::new(pool.clone());

        repo.assign(user_id, UserRole::Donor, None).await.unwrap();

        let result = repo.assign(user_id, UserRole::Volunteer, None).await;
        assert!(matches!(
            result,
            Err(RoleRepositoryError::RoleAlreadyAssigned)
        ));

        // Original role is untouched
        let record = repo.find_by_user(user_id).await.unwrap().unwrap();
        assert_eq!(record.role, UserRole::Donor);

        cleanup_test_user(&pool, user_id).await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_assign_concurrent_selection_loser_gets_conflict() {
        let (pool, user_id) = setup_test_user().await;
        let repo_a = RoleRepository::new(pool.clone());
        let repo_b = RoleRepository::new(pool.clone());

        // Both selections race past the pre-check; the unique constraint
        // resolves the winner and the loser maps to RoleAlreadyAssigned
        let (a, b) = tokio::join!(
            repo_a.assign(user_id, UserRole::Donor, None),
            repo_b.assign(user_id, UserRole::Volunteer, None),
        );

        let failures = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(RoleRepositoryError::RoleAlreadyAssigned)))
            .count();
        assert_eq!(a.is_ok() as usize + b.is_ok() as usize, 1);
        assert_eq!(failures, 1);

        cleanup_test_user(&pool, user_id).await;
    }

    // Helper functions for integration tests
    async fn setup_test_user() -> (PgPool, Uuid) {
        use crate::core::db::pool::{DbConfig, create_pool};

        let config = DbConfig::from_env().expect("DATABASE_URL must be set for tests");
        let pool = create_pool(&config)
            .await
            .expect("Failed to create test pool");

        let user_id = Uuid::new_v4();
        let unique_email = format!("role_test_{}@example.com", user_id);

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, full_name)
            VALUES ($1, $2, 'test_hash', 'Role Test')
            "#,
        )
        .bind(user_id)
        .bind(&unique_email)
        .execute(&pool)
        .await
        .expect("Failed to create test user");

        (pool, user_id)
    }

    async fn cleanup_test_user(pool: &PgPool, user_id: Uuid) {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await
            .expect("Failed to cleanup test user");
    }
}
