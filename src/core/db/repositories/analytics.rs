//! Analytics repository for monthly impact summaries
//!
//! Stores one precomputed row per user per month. Rows are upserted as
//! activity happens and read back for the dashboard impact section.

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::db::models::AnalyticsSummary;

/// Estimated meals per kilogram of redistributed food
const MEALS_PER_KG: f64 = 2.5;

/// Analytics repository error types
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Analytics repository for database operations
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    /// Create a new analytics repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Estimate people fed from redistributed weight
    pub fn estimate_people_fed(weight_kg: f64) -> i32 {
        (weight_kg * MEALS_PER_KG).round() as i32
    }

    /// List a user's monthly summaries, most recent month first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AnalyticsSummary>, AnalyticsRepositoryError> {
        let summaries = sqlx::query_as::<_, AnalyticsSummary>(
            r#"
            SELECT id, user_id, month_year, total_donations, completed_deliveries,
                   total_weight_kg, people_fed_estimate, created_at
            FROM analytics_summary
            WHERE user_id = $1
            ORDER BY month_year DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Fold activity into a user's summary for a month (`YYYY-MM`).
    ///
    /// Counters accumulate across calls; the people-fed estimate is
    /// recomputed from the running weight total.
    pub async fn record_activity(
        &self,
        user_id: Uuid,
        month_year: &str,
        donations: i32,
        deliveries: i32,
        weight_kg: f64,
    ) -> Result<AnalyticsSummary, AnalyticsRepositoryError> {
        let summary = sqlx::query_as::<_, AnalyticsSummary>(
            r#"
            INSERT INTO analytics_summary
                (user_id, month_year, total_donations, completed_deliveries,
                 total_weight_kg, people_fed_estimate)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, month_year) DO UPDATE
            SET total_donations = analytics_summary.total_donations + EXCLUDED.total_donations,
                completed_deliveries = analytics_summary.completed_deliveries + EXCLUDED.completed_deliveries,
                total_weight_kg = analytics_summary.total_weight_kg + EXCLUDED.total_weight_kg,
                people_fed_estimate = ROUND((analytics_summary.total_weight_kg + EXCLUDED.total_weight_kg) * $7)::int
            RETURNING id, user_id, month_year, total_donations, completed_deliveries,
                      total_weight_kg, people_fed_estimate, created_at
            "#,
        )
        .bind(user_id)
        .bind(month_year)
        .bind(donations)
        .bind(deliveries)
        .bind(weight_kg)
        .bind(Self::estimate_people_fed(weight_kg))
        .bind(MEALS_PER_KG)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_people_fed() {
        assert_eq!(AnalyticsRepository::estimate_people_fed(0.0), 0);
        assert_eq!(AnalyticsRepository::estimate_people_fed(2.0), 5);
        assert_eq!(AnalyticsRepository::estimate_people_fed(10.0), 25);
    }

    #[test]
    fn test_estimate_people_fed_rounds() {
        // 1.4 kg * 2.5 = 3.5 meals, rounds to 4
        assert_eq!(AnalyticsRepository::estimate_people_fed(1.4), 4);
    }

    // ========================================================================
    // Integration Tests (require database)
    // ========================================================================

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_record_activity_accumulates() {
        let (pool, user_id) = setup_test_user().await;
        let repo = AnalyticsRepository::new(pool.clone());

        let first = repo
            .record_activity(user_id, "2025-06", 1, 0, 4.0)
            .await
            .unwrap();
        assert_eq!(first.total_donations, 1);
        assert!((first.total_weight_kg - 4.0).abs() < f64::EPSILON);

        let second = repo
            .record_activity(user_id, "2025-06", 2, 1, 6.0)
            .await
            .unwrap();
        assert_eq!(second.total_donations, 3);
        assert_eq!(second.completed_deliveries, 1);
        assert!((second.total_weight_kg - 10.0).abs() < f64::EPSILON);
        assert_eq!(second.people_fed_estimate, 25);

        cleanup_test_user(&pool, user_id).await;
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_list_for_user_orders_by_month() {
        let (pool, user_id) = setup_test_user().await;
        let repo = AnalyticsRepository::new(pool.clone());

        repo.record_activity(user_id, "2025-05", 1, 0, 1.0)
            .await
            .unwrap();
        repo.record_activity(user_id, "2025-07", 1, 0, 1.0)
            .await
            .unwrap();

        let summaries = repo.list_for_user(user_id).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].month_year, "2025-07");
        assert_eq!(summaries[1].month_year, "2025-05");

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
        let email = format!("analytics_test_{}@example.com", user_id);

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, full_name)
            VALUES ($1, $2, 'test_hash', 'Analytics Test')
            "#,
        )
        .bind(user_id)
        .bind(&email)
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
