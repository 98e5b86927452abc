//! Delivery repository for volunteer pickups
//!
//! A volunteer claims an accepted donation, which creates a tracking
//! row and stamps the donation with the assigned volunteer in one
//! transaction. Delivery status then advances assigned -> picked_up ->
//! delivered, mirrored onto the donation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::db::models::{DeliveryTracking, RatingTarget};
use crate::core::{DeliveryStatus, VolunteerStats};

const DELIVERY_COLUMNS: &str = r#"
    id, donation_id, ngo_id, volunteer_id, status, pickup_time,
    delivery_time, donor_rating, ngo_rating, volunteer_rating, notes,
    created_at
"#;

/// Delivery repository error types
#[derive(Debug, thiserror::Error)]
pub enum DeliveryRepositoryError {
    #[error("Delivery not found")]
    NotFound,

    #[error("Donation not found")]
    DonationNotFound,

    #[error("Donation is not ready for pickup")]
    DonationNotReady,

    #[error("Donation already has an assigned volunteer")]
    AlreadyClaimed,

    #[error("Delivery is not assigned to this volunteer")]
    NotAssignedVolunteer,

    #[error("Delivery cannot move from status '{from}'")]
    InvalidTransition { from: DeliveryStatus },

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i16),

    #[error("Delivery has not been completed yet")]
    NotDelivered,

    #[error("Only a party to the delivery may rate it")]
    NotRatingParty,

    #[error("This party has already been rated")]
    AlreadyRated,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Delivery repository for database operations
#[derive(Clone)]
pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    /// Create a new delivery repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Claim an accepted donation for delivery.
    ///
    /// Locks the donation row so two volunteers cannot claim the same
    /// donation. The donation must be `accepted` and unassigned.
    pub async fn claim(
        &self,
        donation_id: Uuid,
        volunteer_id: Uuid,
    ) -> Result<DeliveryTracking, DeliveryRepositoryError> {
        let mut tx = self.pool.begin().await?;

        let donation: Option<(String, Option<Uuid>, Option<Uuid>)> = sqlx::query_as(
            r#"
            SELECT status::text, accepted_by_ngo, assigned_volunteer
            FROM donations
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(donation_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (status, accepted_by_ngo, assigned_volunteer) =
            donation.ok_or(DeliveryRepositoryError::DonationNotFound)?;

        if assigned_volunteer.is_some() {
            return Err(DeliveryRepositoryError::AlreadyClaimed);
        }
        let ngo_id = match (status.as_str(), accepted_by_ngo) {
            ("accepted", Some(ngo_id)) => ngo_id,
            _ => return Err(DeliveryRepositoryError::DonationNotReady),
        };

        let sql = format!(
            r#"
            INSERT INTO delivery_tracking (donation_id, ngo_id, volunteer_id)
            VALUES ($1, $2, $3)
            RETURNING {DELIVERY_COLUMNS}
            "#
        );

        let delivery = sqlx::query_as::<_, DeliveryTracking>(&sql)
            .bind(donation_id)
            .bind(ngo_id)
            .bind(volunteer_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE donations
            SET assigned_volunteer = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(donation_id)
        .bind(volunteer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(delivery)
    }

    /// Find a delivery by ID
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<DeliveryTracking>, DeliveryRepositoryError> {
        let sql = format!(
            r#"
            SELECT {DELIVERY_COLUMNS}
            FROM delivery_tracking
            WHERE id = $1
            "#
        );

        let delivery = sqlx::query_as::<_, DeliveryTracking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(delivery)
    }

    /// List a volunteer's deliveries, newest first
    pub async fn list_by_volunteer(
        &self,
        volunteer_id: Uuid,
    ) -> Result<Vec<DeliveryTracking>, DeliveryRepositoryError> {
        let sql = format!(
            r#"
            SELECT {DELIVERY_COLUMNS}
            FROM delivery_tracking
            WHERE volunteer_id = $1
            ORDER BY created_at DESC
            "#
        );

        let deliveries = sqlx::query_as::<_, DeliveryTracking>(&sql)
            .bind(volunteer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(deliveries)
    }

    /// Mark a delivery as picked up. Only the assigned volunteer may do
    /// this, and only from `assigned` status. The donation advances to
    /// `picked_up` in the same transaction.
    pub async fn mark_picked_up(
        &self,
        delivery_id: Uuid,
        volunteer_id: Uuid,
    ) -> Result<DeliveryTracking, DeliveryRepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE delivery_tracking
            SET status = 'picked_up', pickup_time = NOW()
            WHERE id = $1 AND volunteer_id = $2 AND status = 'assigned'
            RETURNING {DELIVERY_COLUMNS}
            "#
        );

        let delivery = sqlx::query_as::<_, DeliveryTracking>(&sql)
            .bind(delivery_id)
            .bind(volunteer_id)
            .fetch_optional(&mut *tx)
            .await?;

        let delivery = match delivery {
            Some(d) => d,
            None => {
                tx.rollback().await?;
                return Err(self.explain_update_miss(delivery_id, volunteer_id).await?);
            }
        };

        sqlx::query(
            r#"
            UPDATE donations
            SET status = 'picked_up', updated_at = NOW()
            WHERE id = $1 AND status = 'accepted'
            "#,
        )
        .bind(delivery.donation_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(delivery)
    }

    /// Mark a delivery as delivered. Only the assigned volunteer may do
    /// this, and only from `picked_up` status. The donation advances to
    /// `delivered` and the volunteer's completed-delivery counter is
    /// bumped, all in one transaction.
    pub async fn mark_delivered(
        &self,
        delivery_id: Uuid,
        volunteer_id: Uuid,
    ) -> Result<DeliveryTracking, DeliveryRepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE delivery_tracking
            SET status = 'delivered', delivery_time = NOW()
            WHERE id = $1 AND volunteer_id = $2 AND status = 'picked_up'
            RETURNING {DELIVERY_COLUMNS}
            "#
        );

        let delivery = sqlx::query_as::<_, DeliveryTracking>(&sql)
            .bind(delivery_id)
            .bind(volunteer_id)
            .fetch_optional(&mut *tx)
            .await?;

        let delivery = match delivery {
            Some(d) => d,
            None => {
                tx.rollback().await?;
                return Err(self.explain_update_miss(delivery_id, volunteer_id).await?);
            }
        };

        sqlx::query(
            r#"
            UPDATE donations
            SET status = 'delivered', updated_at = NOW()
            WHERE id = $1 AND status = 'picked_up'
            "#,
        )
        .bind(delivery.donation_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE volunteer_profiles
            SET total_deliveries = total_deliveries + 1
            WHERE user_id = $1
            "#,
        )
        .bind(volunteer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(delivery)
    }

    /// Record a 1-5 rating for one of the parties on a delivery.
    ///
    /// Only a party to the delivery may rate, only once the delivery is
    /// `delivered`, and each target only once: the volunteer rates the
    /// donor and NGO; the donor and NGO rate the volunteer. Rating the
    /// volunteer also refreshes their average rating on
    /// `volunteer_profiles`.
    pub async fn rate(
        &self,
        delivery_id: Uuid,
        rater_id: Uuid,
        target: RatingTarget,
        rating: i16,
    ) -> Result<DeliveryTracking, DeliveryRepositoryError> {
        if !(1..=5).contains(&rating) {
            return Err(DeliveryRepositoryError::InvalidRating(rating));
        }

        let column = match target {
            RatingTarget::Donor => "donor_rating",
            RatingTarget::Ngo => "ngo_rating",
            RatingTarget::Volunteer => "volunteer_rating",
        };

        let mut tx = self.pool.begin().await?;

        // Lock the tracking row so the once-only check and the write
        // cannot interleave with a concurrent rating
        let row: Option<(
            Uuid,
            Uuid,
            Uuid,
            DeliveryStatus,
            Option<i16>,
            Option<i16>,
            Option<i16>,
        )> = sqlx::query_as(
            r#"
            SELECT dt.ngo_id, dt.volunteer_id, d.donor_id, dt.status,
                   dt.donor_rating, dt.ngo_rating, dt.volunteer_rating
            FROM delivery_tracking dt
            JOIN donations d ON d.id = dt.donation_id
            WHERE dt.id = $1
            FOR UPDATE OF dt
            "#,
        )
        .bind(delivery_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (ngo_id, volunteer_id, donor_id, status, donor_rating, ngo_rating, volunteer_rating) =
            row.ok_or(DeliveryRepositoryError::NotFound)?;

        if status != DeliveryStatus::Delivered {
            return Err(DeliveryRepositoryError::NotDelivered);
        }

        let (allowed, existing) = match target {
            RatingTarget::Donor => (rater_id == volunteer_id, donor_rating),
            RatingTarget::Ngo => (rater_id == volunteer_id, ngo_rating),
            RatingTarget::Volunteer => {
                (rater_id == donor_id || rater_id == ngo_id, volunteer_rating)
            }
        };
        if !allowed {
            return Err(DeliveryRepositoryError::NotRatingParty);
        }
        if existing.is_some() {
            return Err(DeliveryRepositoryError::AlreadyRated);
        }

        let sql = format!(
            r#"
            UPDATE delivery_tracking
            SET {column} = $2
            WHERE id = $1 AND {column} IS NULL
            RETURNING {DELIVERY_COLUMNS}
            "#
        );

        let delivery = sqlx::query_as::<_, DeliveryTracking>(&sql)
            .bind(delivery_id)
            .bind(rating)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DeliveryRepositoryError::AlreadyRated)?;

        if target == RatingTarget::Volunteer {
            sqlx::query(
                r#"
                UPDATE volunteer_profiles
                SET rating = (
                    SELECT COALESCE(AVG(volunteer_rating)::float8, 0)
                    FROM delivery_tracking
                    WHERE volunteer_id = $1 AND volunteer_rating IS NOT NULL
                )
                WHERE user_id = $1
                "#,
            )
            .bind(delivery.volunteer_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(delivery)
    }

    /// Dashboard counters for a volunteer
    pub async fn volunteer_stats(
        &self,
        volunteer_id: Uuid,
    ) -> Result<VolunteerStats, DeliveryRepositoryError> {
        let rows: Vec<(DeliveryStatus,)> =
            sqlx::query_as("SELECT status FROM delivery_tracking WHERE volunteer_id = $1")
                .bind(volunteer_id)
                .fetch_all(&self.pool)
                .await?;

        let rating: Option<(f64,)> =
            sqlx::query_as("SELECT rating FROM volunteer_profiles WHERE user_id = $1")
                .bind(volunteer_id)
                .fetch_optional(&self.pool)
                .await?;

        let statuses: Vec<DeliveryStatus> = rows.into_iter().map(|(s,)| s).collect();
        Ok(VolunteerStats::from_deliveries(
            &statuses,
            rating.map(|(r,)| r).unwrap_or(0.0),
        ))
    }

    /// Turn a zero-row guarded UPDATE into the right error
    async fn explain_update_miss(
        &self,
        delivery_id: Uuid,
        volunteer_id: Uuid,
    ) -> Result<DeliveryRepositoryError, DeliveryRepositoryError> {
        let existing = self
            .find_by_id(delivery_id)
            .await?
            .ok_or(DeliveryRepositoryError::NotFound)?;

        if existing.volunteer_id != volunteer_id {
            Ok(DeliveryRepositoryError::NotAssignedVolunteer)
        } else {
            Ok(DeliveryRepositoryError::InvalidTransition {
                from: existing.status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_repository_error_display() {
        let err = DeliveryRepositoryError::AlreadyClaimed;
        assert_eq!(
            format!("{}", err),
            "Donation already has an assigned volunteer"
        );

        let err = DeliveryRepositoryError::InvalidRating(7);
        assert_eq!(format!("{}", err), "Rating must be between 1 and 5, got 7");

        let err = DeliveryRepositoryError::InvalidTransition {
            from: DeliveryStatus::Delivered,
        };
        assert!(format!("{}", err).contains("delivered"));

        let err = DeliveryRepositoryError::NotDelivered;
        assert_eq!(format!("{}", err), "Delivery has not been completed yet");

        let err = DeliveryRepositoryError::NotRatingParty;
        assert_eq!(format!("{}", err), "Only a party to the delivery may rate it");

        let err = DeliveryRepositoryError::AlreadyRated;
        assert_eq!(format!("{}", err), "This party has already been rated");
    }

    // ========================================================================
    // Integration Tests (require database)
    // ========================================================================

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_claim_accepted_donation() {
        let ctx = TestContext::new().await;
        let repo = DeliveryRepository::new(ctx.pool.clone());

        let delivery = repo.claim(ctx.donation_id, ctx.volunteer_id).await.unwrap();

        assert_eq!(delivery.status, DeliveryStatus::Assigned);
        assert_eq!(delivery.volunteer_id, ctx.volunteer_id);
        assert_eq!(delivery.ngo_id, ctx.ngo_id);

        // The donation now carries the volunteer assignment
        let assigned: (Option<Uuid>,) =
            sqlx::query_as("SELECT assigned_volunteer FROM donations WHERE id = $1")
                .bind(ctx.donation_id)
                .fetch_one(&ctx.pool)
                .await
                .unwrap();
        assert_eq!(assigned.0, Some(ctx.volunteer_id));

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_claim_twice_rejected() {
        let ctx = TestContext::new().await;
        let repo = DeliveryRepository::new(ctx.pool.clone());

        repo.claim(ctx.donation_id, ctx.volunteer_id).await.unwrap();

        let result = repo.claim(ctx.donation_id, ctx.volunteer_id).await;
        assert!(matches!(result, Err(DeliveryRepositoryError::AlreadyClaimed)));

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_pickup_then_deliver_advances_donation() {
        let ctx = TestContext::new().await;
        let repo = DeliveryRepository::new(ctx.pool.clone());

        let delivery = repo.claim(ctx.donation_id, ctx.volunteer_id).await.unwrap();

        let picked = repo
            .mark_picked_up(delivery.id, ctx.volunteer_id)
            .await
            .unwrap();
        assert_eq!(picked.status, DeliveryStatus::PickedUp);
        assert!(picked.pickup_time.is_some());

        let delivered = repo
            .mark_delivered(delivery.id, ctx.volunteer_id)
            .await
            .unwrap();
        assert_eq!(delivered.status, DeliveryStatus::Delivered);
        assert!(delivered.delivery_time.is_some());

        let status: (String,) =
            sqlx::query_as("SELECT status::text FROM donations WHERE id = $1")
                .bind(ctx.donation_id)
                .fetch_one(&ctx.pool)
                .await
                .unwrap();
        assert_eq!(status.0, "delivered");

        // Completed-delivery counter was bumped
        let total: (i32,) =
            sqlx::query_as("SELECT total_deliveries FROM volunteer_profiles WHERE user_id = $1")
                .bind(ctx.volunteer_id)
                .fetch_one(&ctx.pool)
                .await
                .unwrap();
        assert_eq!(total.0, 1);

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_deliver_before_pickup_rejected() {
        let ctx = TestContext::new().await;
        let repo = DeliveryRepository::new(ctx.pool.clone());

        let delivery = repo.claim(ctx.donation_id, ctx.volunteer_id).await.unwrap();

        let result = repo.mark_delivered(delivery.id, ctx.volunteer_id).await;
        assert!(matches!(
            result,
            Err(DeliveryRepositoryError::InvalidTransition {
                from: DeliveryStatus::Assigned
            })
        ));

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_rate_volunteer_updates_average() {
        let ctx = TestContext::new().await;
        let repo = DeliveryRepository::new(ctx.pool.clone());

        let delivery = repo.claim(ctx.donation_id, ctx.volunteer_id).await.unwrap();
        repo.mark_picked_up(delivery.id, ctx.volunteer_id)
            .await
            .unwrap();
        repo.mark_delivered(delivery.id, ctx.volunteer_id)
            .await
            .unwrap();

        repo.rate(delivery.id, ctx.ngo_id, RatingTarget::Volunteer, 4)
            .await
            .unwrap();

        let rating: (f64,) =
            sqlx::query_as("SELECT rating FROM volunteer_profiles WHERE user_id = $1")
                .bind(ctx.volunteer_id)
                .fetch_one(&ctx.pool)
                .await
                .unwrap();
        assert!((rating.0 - 4.0).abs() < f64::EPSILON);

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_rate_out_of_range_rejected() {
        let ctx = TestContext::new().await;
        let repo = DeliveryRepository::new(ctx.pool.clone());

        let delivery = repo.claim(ctx.donation_id, ctx.volunteer_id).await.unwrap();

        let result = repo
            .rate(delivery.id, ctx.volunteer_id, RatingTarget::Donor, 0)
            .await;
        assert!(matches!(result, Err(DeliveryRepositoryError::InvalidRating(0))));

        let result = repo
            .rate(delivery.id, ctx.volunteer_id, RatingTarget::Donor, 6)
            .await;
        assert!(matches!(result, Err(DeliveryRepositoryError::InvalidRating(6))));

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_rate_before_delivered_rejected() {
        let ctx = TestContext::new().await;
        let repo = DeliveryRepository::new(ctx.pool.clone());

        let delivery = repo.claim(ctx.donation_id, ctx.volunteer_id).await.unwrap();

        let result = repo
            .rate(delivery.id, ctx.volunteer_id, RatingTarget::Donor, 5)
            .await;
        assert!(matches!(result, Err(DeliveryRepositoryError::NotDelivered)));

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_rate_by_non_party_rejected() {
        let ctx = TestContext::new().await;
        let repo = DeliveryRepository::new(ctx.pool.clone());

        let delivery = repo.claim(ctx.donation_id, ctx.volunteer_id).await.unwrap();
        repo.mark_picked_up(delivery.id, ctx.volunteer_id)
            .await
            .unwrap();
        repo.mark_delivered(delivery.id, ctx.volunteer_id)
            .await
            .unwrap();

        // Only the volunteer may rate the donor
        let result = repo
            .rate(delivery.id, ctx.donor_id, RatingTarget::Donor, 5)
            .await;
        assert!(matches!(
            result,
            Err(DeliveryRepositoryError::NotRatingParty)
        ));

        // And the volunteer may not rate themselves
        let result = repo
            .rate(delivery.id, ctx.volunteer_id, RatingTarget::Volunteer, 5)
            .await;
        assert!(matches!(
            result,
            Err(DeliveryRepositoryError::NotRatingParty)
        ));

        ctx.cleanup().await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_rate_twice_rejected() {
        let ctx = TestContext::new().await;
        let repo = DeliveryRepository::new(ctx.pool.clone());

        let delivery = repo.claim(ctx.donation_id, ctx.volunteer_id).await.unwrap();
        repo.mark_picked_up(delivery.id, ctx.volunteer_id)
            .await
            .unwrap();
        repo.mark_delivered(delivery.id, ctx.volunteer_id)
            .await
            .unwrap();

        repo.rate(delivery.id, ctx.volunteer_id, RatingTarget::Donor, 5)
            .await
            .unwrap();

        let result = repo
            .rate(delivery.id, ctx.volunteer_id, RatingTarget::Donor, 3)
            .await;
        assert!(matches!(result, Err(DeliveryRepositoryError::AlreadyRated)));

        ctx.cleanup().await;
    }

    // Shared fixture: donor, NGO, volunteer, and one accepted donation
    struct TestContext {
        pool: PgPool,
        donor_id: Uuid,
        ngo_id: Uuid,
        volunteer_id: Uuid,
        donation_id: Uuid,
    }

    impl TestContext {
        async fn new() -> Self {
            use crate::core::UserRole;
            use crate::core::db::pool::{DbConfig, create_pool};
            use crate::core::db::repositories::{DonationRepository, RoleRepository};

            let config = DbConfig::from_env().expect("DATABASE_URL must be set for tests");
            let pool = create_pool(&config)
                .await
                .expect("Failed to create test pool");

            let donor_id = create_user(&pool, "delivery_donor").await;
            let ngo_id = create_user(&pool, "delivery_ngo").await;
            let volunteer_id = create_user(&pool, "delivery_volunteer").await;

            RoleRepository::new(pool.clone())
                .assign(volunteer_id, UserRole::Volunteer, None)
                .await
                .expect("Failed to assign volunteer role");

            let donations = DonationRepository::new(pool.clone());
            let donation = donations
                .create(&crate::core::db::models::CreateDonation {
                    donor_id,
                    title: "Delivery Test".to_string(),
                    description: None,
                    food_category: crate::core::FoodCategory::PackagedFood,
                    quantity: "3".to_string(),
                    unit: Some("boxes".to_string()),
                    expire_at: chrono::Utc::now() + chrono::Duration::hours(6),
                    prepared_at: None,
                    pickup_address: "1 Test Lane".to_string(),
                    pickup_city: "Testville".to_string(),
                    pickup_latitude: None,
                    pickup_longitude: None,
                    food_image_url: None,
                    quality_notes: None,
                    temperature_indicator: None,
                })
                .await
                .expect("Failed to create test donation");
            donations
                .accept(donation.id, ngo_id)
                .await
                .expect("Failed to accept test donation");

            Self {
                pool,
                donor_id,
                ngo_id,
                volunteer_id,
                donation_id: donation.id,
            }
        }

        async fn cleanup(&self) {
            for id in [self.donor_id, self.ngo_id, self.volunteer_id] {
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
            VALUES ($1, $2, 'test_hash', 'Delivery Test')
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
