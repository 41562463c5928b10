use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

/// Read side of the external billing collaborator: the only thing the
/// entitlement engine needs is the caller's current plan tier.
pub struct SubscriptionsRepository {
    pool: PgPool,
}

impl SubscriptionsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tier string of the most recent active subscription, if any.
    pub async fn current_plan_tier(&self, user_id: Uuid) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT plan_tier FROM user_subscriptions
            WHERE user_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch subscription")
    }
}
