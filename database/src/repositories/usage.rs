use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mentora_models::tutoring::{Companion, InterviewSession, StorySession};
use sqlx::PgPool;
use uuid::Uuid;

/// Counts consumption records and performs the limit-guarded inserts used by
/// the admission gate. Counts are always read fresh; nothing is cached.
pub struct UsageRepository {
    pool: PgPool,
}

impl UsageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lifetime companion count for a user.
    pub async fn companions_created(&self, user_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to count companions")
    }

    /// Interview sessions created inside `[start, end)`.
    pub async fn interviews_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM interview_sessions WHERE user_id = $1 AND created_at >= $2 AND created_at < $3",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count interview sessions")
    }

    /// Story sessions created inside `[start, end)`.
    pub async fn stories_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM story_sessions WHERE user_id = $1 AND created_at >= $2 AND created_at < $3",
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count story sessions")
    }

    /// Create a companion only while the lifetime count is below `limit`.
    /// The count check and the insert run as one statement, so two in-flight
    /// requests cannot both slip past the limit. Returns `None` when denied.
    pub async fn insert_companion_gated(
        &self,
        user_id: Uuid,
        name: &str,
        subject: &str,
        topic: &str,
        limit: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<Companion>> {
        sqlx::query_as::<_, Companion>(
            r#"
            INSERT INTO companions (id, user_id, name, subject, topic, created_at)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE (SELECT COUNT(*) FROM companions WHERE user_id = $2) < $7
            RETURNING id, user_id, name, subject, topic, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(subject)
        .bind(topic)
        .bind(now)
        .bind(limit)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to create companion")
    }

    /// Start an interview session only while the count inside `[start, end)`
    /// is below `limit`. Returns `None` when denied.
    pub async fn insert_interview_gated(
        &self,
        user_id: Uuid,
        role: &str,
        level: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<InterviewSession>> {
        sqlx::query_as::<_, InterviewSession>(
            r#"
            INSERT INTO interview_sessions (id, user_id, role, level, created_at)
            SELECT $1, $2, $3, $4, $5
            WHERE (
                SELECT COUNT(*) FROM interview_sessions
                WHERE user_id = $2 AND created_at >= $6 AND created_at < $7
            ) < $8
            RETURNING id, user_id, role, level, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(role)
        .bind(level)
        .bind(now)
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to start interview session")
    }

    /// Start a story session only while the count inside `[start, end)` is
    /// below `limit`. Returns `None` when denied.
    pub async fn insert_story_gated(
        &self,
        user_id: Uuid,
        theme: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<StorySession>> {
        sqlx::query_as::<_, StorySession>(
            r#"
            INSERT INTO story_sessions (id, user_id, theme, created_at)
            SELECT $1, $2, $3, $4
            WHERE (
                SELECT COUNT(*) FROM story_sessions
                WHERE user_id = $2 AND created_at >= $5 AND created_at < $6
            ) < $7
            RETURNING id, user_id, theme, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(theme)
        .bind(now)
        .bind(start)
        .bind(end)
        .bind(limit)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to start story session")
    }
}
