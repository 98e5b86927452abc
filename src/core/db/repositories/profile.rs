//! Profile repository for contact and address details
//!
//! Every registered user owns exactly one profile row, created together
//! with the user. Updates are partial; absent fields keep their current
//! values.

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::db::models::{Profile, UpdateProfile};

/// Profile repository error types
#[derive(Debug, thiserror::Error)]
pub enum ProfileRepositoryError {
    #[error("Profile not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Profile repository for database operations
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by user ID
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, phone, address, city, state, pincode,
                   latitude, longitude, avatar_url, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Apply a partial update to a user's profile
    pub async fn update(
        &self,
        user_id: Uuid,
        updates: &UpdateProfile,
    ) -> Result<Profile, ProfileRepositoryError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET
                phone = COALESCE($2, phone),
                address = COALESCE($3, address),
                city = COALESCE($4, city),
                state = COALESCE($5, state),
                pincode = COALESCE($6, pincode),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude),
                avatar_url = COALESCE($9, avatar_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, phone, address, city, state, pincode,
                      latitude, longitude, avatar_url, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&updates.phone)
        .bind(&updates.address)
        .bind(&updates.city)
        .bind(&updates.state)
        .bind(&updates.pincode)
        .bind(updates.latitude)
        .bind(updates.longitude)
        .bind(&updates.avatar_url)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or(ProfileRepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_repository_error_display() {
        let err = ProfileRepositoryError::NotFound;
        assert_eq!(format!("{}", err), "Profile not found");
    }

    // ========================================================================
    // Integration Tests (require database)
    // ========================================================================

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_profile_created_with_user() {
        let (pool, user_id) = setup_test_user().await;
        let repo = ProfileRepository::new(pool.clone());

        let profile = repo.find_by_user(user_id).await.unwrap();
        assert!(profile.is_some());

        let profile = profile.unwrap();
        assert!(profile.phone.is_none());
        assert!(profile.city.is_none());

        cleanup_test_user(&pool, user_id).await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_partial_update_keeps_other_fields() {
        let (pool, user_id) = setup_test_user().await;
        let repo = ProfileRepository::new(pool.clone());

        let updated = repo
            .update(
                user_id,
                &UpdateProfile {
                    phone: Some("9876543210".to_string()),
                    city: Some("Mumbai".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("9876543210"));
        assert_eq!(updated.city.as_deref(), Some("Mumbai"));

        // Second update with only address; phone and city survive
        let updated = repo
            .update(
                user_id,
                &UpdateProfile {
                    address: Some("42 Link Road".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("9876543210"));
        assert_eq!(updated.address.as_deref(), Some("42 Link Road"));

        cleanup_test_user(&pool, user_id).await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_update_missing_profile() {
        let (pool, user_id) = setup_test_user().await;
        let repo = ProfileRepository::new(pool.clone());

        let result = repo.update(Uuid::new_v4(), &UpdateProfile::default()).await;
        assert!(matches!(result, Err(ProfileRepositoryError::NotFound)));

        cleanup_test_user(&pool, user_id).await;
    }

    // Helper functions for integration tests
    async fn setup_test_user() -> (PgPool, Uuid) {
        use crate::core::db::pool::{DbConfig, create_pool};
        use crate::core::db::repositories::UserRepository;

        let config = DbConfig::from_env().expect("DATABASE_URL must be set for tests");
        let pool = create_pool(&config)
            .await
            .expect("Failed to create test pool");

        let users = UserRepository::new(pool.clone());
        let unique_email = format!("profile_test_{}@example.com", Uuid::new_v4());
        let user = users
            .create(&unique_email, "password", "Profile Test")
            .await
            .expect("Failed to create test user");

        (pool, user.id)
    }

    async fn cleanup_test_user(pool: &PgPool, user_id: Uuid) {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await
            .expect("Failed to cleanup test user");
    }
}
