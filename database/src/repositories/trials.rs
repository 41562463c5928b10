use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use mentora_models::billing::{Trial, TRIAL_PERIOD_DAYS};
use sqlx::PgPool;
use uuid::Uuid;

/// Persistence for the one-per-user trial rows.
pub struct TrialsRepository {
    pool: PgPool,
}

impl TrialsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert-if-absent, then read back. The unique constraint on `user_id`
    /// makes concurrent first calls converge on a single row; the loser of
    /// the race simply reads the winner's row.
    pub async fn ensure(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Trial> {
        sqlx::query(
            r#"
            INSERT INTO user_trials (id, user_id, trial_start, trial_end, created_at)
            VALUES ($1, $2, $3, $4, $3)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(now)
        .bind(now + Duration::days(TRIAL_PERIOD_DAYS))
        .execute(&self.pool)
        .await
        .context("Failed to insert trial")?;

        self.find_by_user(user_id)
            .await?
            .context("Trial row missing after insert")
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Trial>> {
        sqlx::query_as::<_, Trial>(
            "SELECT id, user_id, trial_start, trial_end, created_at FROM user_trials WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch trial")
    }
}
