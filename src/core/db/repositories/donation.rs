//! Donation repository for the donation lifecycle
//!
//! Donations move forward only: available -> accepted -> picked_up ->
//! delivered, with cancellation possible before pickup. Acceptance is
//! first-wins; the status guard in the UPDATE makes concurrent accepts
//! race safely.

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::db::models::{CreateDonation, CreateDonationRequest, Donation, DonationRequest};
use crate::core::{DonationStatus, DonorStats, NgoStats};

const DONATION_COLUMNS: &str = r#"
    id, donor_id, title, description, food_category, quantity, unit,
    expire_at, prepared_at, pickup_address, pickup_city,
    pickup_latitude, pickup_longitude, food_image_url, quality_notes,
    temperature_indicator, status, accepted_by_ngo, accepted_at,
    assigned_volunteer, created_at, updated_at
"#;

/// Donation repository error types
#[derive(Debug, thiserror::Error)]
pub enum DonationRepositoryError {
    #[error("Donation not found")]
    NotFound,

    #[error("Donation does not belong to this user")]
    NotOwner,

    #[error("Donation has already been accepted")]
    AlreadyAccepted,

    #[error("Donation cannot move from status '{from}'")]
    InvalidTransition { from: DonationStatus },

    #[error("Donation has expired")]
    Expired,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Donation repository for database operations
#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    /// Create a new donation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Post a new donation. It starts in `available` status.
    pub async fn create(&self, dto: &CreateDonation) -> Result<Donation, DonationRepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO donations (
                donor_id, title, description, food_category, quantity, unit,
                expire_at, prepared_at, pickup_address, pickup_city,
                pickup_latitude, pickup_longitude, food_image_url,
                quality_notes, temperature_indicator
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {DONATION_COLUMNS}
            "#
        );

        let donation = sqlx::query_as::<_, Donation>(&sql)
            .bind(dto.donor_id)
            .bind(&dto.title)
            .bind(&dto.description)
            .bind(dto.food_category)
            .bind(&dto.quantity)
            .bind(&dto.unit)
            .bind(dto.expire_at)
            .bind(dto.prepared_at)
            .bind(&dto.pickup_address)
            .bind(&dto.pickup_city)
            .bind(dto.pickup_latitude)
            .bind(dto.pickup_longitude)
            .bind(&dto.food_image_url)
            .bind(&dto.quality_notes)
            .bind(&dto.temperature_indicator)
            .fetch_one(&self.pool)
            .await?;

        Ok(donation)
    }

    /// Find a donation by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Donation>, DonationRepositoryError> {
        let sql = format!(
            r#"
            SELECT {DONATION_COLUMNS}
            FROM donations
            WHERE id = $1
            "#
        );

        let donation = sqlx::query_as::<_, Donation>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(donation)
    }

    /// List donations open for NGO acceptance: available and not expired,
    /// newest first
    pub async fn list_available(&self) -> Result<Vec<Donation>, DonationRepositoryError> {
        let sql = format!(
            r#"
            SELECT {DONATION_COLUMNS}
            FROM donations
            WHERE status = 'available' AND expire_at > NOW()
            ORDER BY created_at DESC
            "#
        );

        let donations = sqlx::query_as::<_, Donation>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(donations)
    }

    /// List a donor's own donations, newest first
    pub async fn list_by_donor(
        &self,
        donor_id: Uuid,
    ) -> Result<Vec<Donation>, DonationRepositoryError> {
        let sql = format!(
            r#"
            SELECT {DONATION_COLUMNS}
            FROM donations
            WHERE donor_id = $1
            ORDER BY created_at DESC
            "#
        );

        let donations = sqlx::query_as::<_, Donation>(&sql)
            .bind(donor_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(donations)
    }

    /// List donations an NGO has accepted, newest first
    pub async fn list_accepted_by_ngo(
        &self,
        ngo_id: Uuid,
    ) -> Result<Vec<Donation>, DonationRepositoryError> {
        let sql = format!(
            r#"
            SELECT {DONATION_COLUMNS}
            FROM donations
            WHERE accepted_by_ngo = $1
            ORDER BY created_at DESC
            "#
        );

        let donations = sqlx::query_as::<_, Donation>(&sql)
            .bind(ngo_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(donations)
    }

    /// List accepted donations without an assigned volunteer, newest first
    pub async fn list_ready_for_pickup(&self) -> Result<Vec<Donation>, DonationRepositoryError> {
        let sql = format!(
            r#"
            SELECT {DONATION_COLUMNS}
            FROM donations
            WHERE status = 'accepted' AND assigned_volunteer IS NULL
            ORDER BY accepted_at DESC
            "#
        );

        let donations = sqlx::query_as::<_, Donation>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(donations)
    }

    /// Accept a donation on behalf of an NGO.
    ///
    /// First NGO wins: the UPDATE only matches while the donation is
    /// still `available`, so a concurrent accept sees zero rows and
    /// reports `AlreadyAccepted`.
    pub async fn accept(
        &self,
        donation_id: Uuid,
        ngo_id: Uuid,
    ) -> Result<Donation, DonationRepositoryError> {
        let sql = format!(
            r#"
            UPDATE donations
            SET status = 'accepted', accepted_by_ngo = $2, accepted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'available' AND expire_at > NOW()
            RETURNING {DONATION_COLUMNS}
            "#
        );

        let donation = sqlx::query_as::<_, Donation>(&sql)
            .bind(donation_id)
            .bind(ngo_id)
            .fetch_optional(&self.pool)
            .await?;

        match donation {
            Some(d) => Ok(d),
            None => {
                let existing = self
                    .find_by_id(donation_id)
                    .await?
                    .ok_or(DonationRepositoryError::NotFound)?;

                if existing.status != DonationStatus::Available {
                    Err(DonationRepositoryError::AlreadyAccepted)
                } else {
                    Err(DonationRepositoryError::Expired)
                }
            }
        }
    }

    /// Cancel a donation. Only the owning donor may cancel, and only
    /// before pickup.
    pub async fn cancel(
        &self,
        donation_id: Uuid,
        donor_id: Uuid,
    ) -> Result<Donation, DonationRepositoryError> {
        let sql = format!(
            r#"
            UPDATE donations
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND donor_id = $2 AND status IN ('available', 'accepted')
            RETURNING {DONATION_COLUMNS}
            "#
        );

        let donation = sqlx::query_as::<_, Donation>(&sql)
            .bind(donation_id)
            .bind(donor_id)
            .fetch_optional(&self.pool)
            .await?;

        match donation {
            Some(d) => Ok(d),
            None => {
                let existing = self
                    .find_by_id(donation_id)
                    .await?
                    .ok_or(DonationRepositoryError::NotFound)?;

                if existing.donor_id != donor_id {
                    Err(DonationRepositoryError::NotOwner)
                } else {
                    Err(DonationRepositoryError::InvalidTransition {
                        from: existing.status,
                    })
                }
            }
        }
    }

    /// Record an NGO's interest in a donation
    pub async fn create_request(
        &self,
        dto: &CreateDonationRequest,
    ) -> Result<DonationRequest, DonationRepositoryError> {
        // Requests only make sense against donations still up for grabs
        let donation = self
            .find_by_id(dto.donation_id)
            .await?
            .ok_or(DonationRepositoryError::NotFound)?;

        if donation.status != DonationStatus::Available {
            return Err(DonationRepositoryError::AlreadyAccepted);
        }

        let request = sqlx::query_as::<_, DonationRequest>(
            r#"
            INSERT INTO donation_requests (donation_id, ngo_id, distance_km, request_message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, donation_id, ngo_id, distance_km, request_message, status, created_at
            "#,
        )
        .bind(dto.donation_id)
        .bind(dto.ngo_id)
        .bind(dto.distance_km)
        .bind(&dto.request_message)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// List requests for a donation, oldest first
    pub async fn list_requests(
        &self,
        donation_id: Uuid,
    ) -> Result<Vec<DonationRequest>, DonationRepositoryError> {
        let requests = sqlx::query_as::<_, DonationRequest>(
            r#"
            SELECT id, donation_id, ngo_id, distance_km, request_message, status, created_at
            FROM donation_requests
            WHERE donation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(donation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Dashboard counters for a donor
    pub async fn donor_stats(
        &self,
        donor_id: Uuid,
    ) -> Result<DonorStats, DonationRepositoryError> {
        let rows: Vec<(DonationStatus,)> =
            sqlx::query_as("SELECT status FROM donations WHERE donor_id = $1")
                .bind(donor_id)
                .fetch_all(&self.pool)
                .await?;

        let statuses: Vec<DonationStatus> = rows.into_iter().map(|(s,)| s).collect();
        Ok(DonorStats::from_statuses(&statuses))
    }

    /// Dashboard counters for an NGO
    pub async fn ngo_stats(&self, ngo_id: Uuid) -> Result<NgoStats, DonationRepositoryError> {
        let rows: Vec<(DonationStatus,)> =
            sqlx::query_as("SELECT status FROM donations WHERE accepted_by_ngo = $1")
                .bind(ngo_id)
                .fetch_all(&self.pool)
                .await?;

        let statuses: Vec<DonationStatus> = rows.into_iter().map(|(s,)| s).collect();
        Ok(NgoStats::from_statuses(&statuses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_donation_repository_error_display() {
        let err = DonationRepositoryError::NotFound;
        assert_eq!(format!("{}", err), "Donation not found");

        let err = DonationRepositoryError::AlreadyAccepted;
        assert_eq!(format!("{}", err), "Donation has already been accepted");

        let err = DonationRepositoryError::InvalidTransition {
            from: DonationStatus::Delivered,
        };
        assert!(format!("{}", err).contains("delivered"));
    }

    // ========================================================================
    // Integration Tests (require database)
    // ========================================================================

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_create_donation_starts_available() {
        let ctx = TestContext::new().await;
        let repo = DonationRepository::new(ctx.pool.clone());

        let donation = repo.create(&ctx.sample_donation()).await.unwrap();

        assert_eq!(donation.status, DonationStatus::Available);
        assert!(donation.accepted_by_ngo.is_none());
        assert!(donation.accepted_at.is_none());

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_accept_is_first_wins() {
        let ctx = TestContext::new().await;
        let repo = DonationRepository::new(ctx.pool.clone());

        let donation = repo.create(&ctx.sample_donation()).await.unwrap();

        let accepted = repo.accept(donation.id, ctx.ngo_id).await.unwrap();
        assert_eq!(accepted.status, DonationStatus::Accepted);
        assert_eq!(accepted.accepted_by_ngo, Some(ctx.ngo_id));
        assert!(accepted.accepted_at.is_some());

        // Second accept (even by the same NGO) is rejected
        let result = repo.accept(donation.id, ctx.ngo_id).await;
        assert!(matches!(result, Err(DonationRepositoryError::AlreadyAccepted)));

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_cancel_by_owner_before_pickup() {
        let ctx = TestContext::new().await;
        let repo = DonationRepository::new(ctx.pool.clone());

        let donation = repo.create(&ctx.sample_donation()).await.unwrap();

        let cancelled = repo.cancel(donation.id, ctx.donor_id).await.unwrap();
        assert_eq!(cancelled.status, DonationStatus::Cancelled);

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_cancel_by_non_owner_rejected() {
        let ctx = TestContext::new().await;
        let repo = DonationRepository::new(ctx.pool.clone());

        let donation = repo.create(&ctx.sample_donation()).await.unwrap();

        let result = repo.cancel(donation.id, ctx.ngo_id).await;
        assert!(matches!(result, Err(DonationRepositoryError::NotOwner)));

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_available_listing_excludes_accepted() {
        let ctx = TestContext::new().await;
        let repo = DonationRepository::new(ctx.pool.clone());

        let first = repo.create(&ctx.sample_donation()).await.unwrap();
        let second = repo.create(&ctx.sample_donation()).await.unwrap();
        repo.accept(second.id, ctx.ngo_id).await.unwrap();

        let available = repo.list_available().await.unwrap();
        assert!(available.iter().any(|d| d.id == first.id));
        assert!(!available.iter().any(|d| d.id == second.id));

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_donor_stats_counts() {
        let ctx = TestContext::new().await;
        let repo = DonationRepository::new(ctx.pool.clone());

        let first = repo.create(&ctx.sample_donation()).await.unwrap();
        repo.create(&ctx.sample_donation()).await.unwrap();
        repo.accept(first.id, ctx.ngo_id).await.unwrap();

        let stats = repo.donor_stats(ctx.donor_id).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.completed, 0);

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_request_against_accepted_donation_rejected() {
        let ctx = TestContext::new().await;
        let repo = DonationRepository::new(ctx.pool.clone());

        let donation = repo.create(&ctx.sample_donation()).await.unwrap();
        repo.accept(donation.id, ctx.ngo_id).await.unwrap();

        let result = repo
            .create_request(&CreateDonationRequest {
                donation_id: donation.id,
                ngo_id: ctx.ngo_id,
                distance_km: Some(3.2),
                request_message: None,
            })
            .await;

        assert!(matches!(result, Err(DonationRepositoryError::AlreadyAccepted)));

        ctx.cleanup().await;
    }

    // Shared fixture: one donor and one NGO user
    struct TestContext {
        pool: PgPool,
        donor_id: Uuid,
        ngo_id: Uuid,
    }

    impl TestContext {
        async fn new() -> Self {
            use crate::core::db::pool::{DbConfig, create_pool};

            let config = DbConfig::from_env().expect("DATABASE_URL must be set for tests");
            let pool = create_pool(&config)
                .await
                .expect("Failed to create test pool");

            let donor_id = create_user(&pool, "donation_donor").await;
            let ngo_id = create_user(&pool, "donation_ngo").await;

            Self {
                pool,
                donor_id,
                ngo_id,
            }
        }

        fn sample_donation(&self) -> CreateDonation {
            CreateDonation {
                donor_id: self.donor_id,
                title: "Test Donation".to_string(),
                description: None,
                food_category: crate::core::FoodCategory::CookedFood,
                quantity: "5".to_string(),
                unit: Some("kg".to_string()),
                expire_at: Utc::now() + Duration::hours(6),
                prepared_at: None,
                pickup_address: "1 Test Lane".to_string(),
                pickup_city: "Testville".to_string(),
                pickup_latitude: None,
                pickup_longitude: None,
                food_image_url: None,
                quality_notes: None,
                temperature_indicator: None,
            }
        }

        async fn cleanup(&self) {
            // Donations and requests cascade from users
            for id in [self.donor_id, self.ngo_id] {
                sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .expect("Failed to cleanup test user");
            }
        }
    }

    async fn create_user(pool: &PgPool, prefix: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        let email = format!("{}_{}@example.com", prefix, user_id);

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, full_name)
            VALUES ($1, $2, 'test_hash', 'Donation Test')
            "#,
        )
        .bind(user_id)
        .bind(&email)
        .execute(pool)
        .await
        .expect("Failed to create test user");

        user_id
    }
}
