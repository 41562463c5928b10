use crate::errors::ServiceError;
use crate::services::{TrialService, UsageService};
use mentora_database::repositories::SubscriptionsRepository;
use mentora_models::billing::{FeatureType, PlanFeatures, PlanType, UsageSummary};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Strict less-than admission rule: a limit of N permits exactly N creations;
/// a limit of 0 denies unconditionally.
pub fn admitted(count: i64, limit: u32) -> bool {
    count < i64::from(limit)
}

/// Decision table for the limits in force: an active trial overrides the
/// nominal plan with fixed constants, otherwise the catalog applies. The
/// stored plan is never touched.
pub fn select_features(plan: PlanType, trial_active: bool) -> PlanFeatures {
    if trial_active {
        PlanFeatures::trial_override()
    } else {
        PlanFeatures::for_plan(plan)
    }
}

/// Combines the plan catalog, trial manager and usage counters to answer
/// admission-control and feature-flag questions. The single source of truth
/// for the limits in force for a user.
pub struct EntitlementService {
    subscriptions: SubscriptionsRepository,
    trials: TrialService,
    usage: UsageService,
}

impl EntitlementService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            subscriptions: SubscriptionsRepository::new(pool.clone()),
            trials: TrialService::new(pool.clone()),
            usage: UsageService::new(pool),
        }
    }

    /// The user's nominal plan. A missing subscription, an unreadable store
    /// or an unparseable tier all fall back to the free tier, which is the
    /// most restrictive plan.
    pub async fn current_plan(&self, user_id: Uuid) -> PlanType {
        let tier = match self.subscriptions.current_plan_tier(user_id).await {
            Ok(tier) => tier,
            Err(e) => {
                warn!("Failed to read subscription for {}: {:#}; assuming free", user_id, e);
                return PlanType::Free;
            }
        };

        match tier {
            None => PlanType::Free,
            Some(tier) => tier.parse().unwrap_or_else(|e| {
                warn!("{}; assuming free for {}", e, user_id);
                PlanType::Free
            }),
        }
    }

    /// Limits currently in force for the user. An unreadable trial row is
    /// treated as no trial, so an outage can only tighten limits, never
    /// widen them.
    pub async fn effective_features(&self, user_id: Uuid) -> PlanFeatures {
        let trial_active = match self.trials.trial_status(user_id).await {
            Ok(status) => status.is_active,
            Err(_) => false,
        };
        let plan = self.current_plan(user_id).await;
        select_features(plan, trial_active)
    }

    pub async fn can_create_companion(&self, user_id: Uuid) -> Result<bool, ServiceError> {
        let features = self.effective_features(user_id).await;
        let count = self.usage.companions_created(user_id).await?;
        Ok(admitted(count, features.companions_limit))
    }

    pub async fn can_start_interview(&self, user_id: Uuid) -> Result<bool, ServiceError> {
        let features = self.effective_features(user_id).await;
        let count = self.usage.interviews_this_month(user_id).await?;
        Ok(admitted(count, features.interviews_per_month))
    }

    pub async fn can_start_story(&self, user_id: Uuid) -> Result<bool, ServiceError> {
        let features = self.effective_features(user_id).await;
        let count = self.usage.stories_this_month(user_id).await?;
        Ok(admitted(count, features.stories_per_month))
    }

    /// Boolean feature lookup on the limits in force. "Limit reached" never
    /// flows through here; unknown identifiers are rejected upstream at
    /// parse time.
    pub async fn has_feature(&self, user_id: Uuid, feature: FeatureType) -> bool {
        self.effective_features(user_id).await.has(feature)
    }

    pub async fn usage_summary(&self, user_id: Uuid) -> Result<UsageSummary, ServiceError> {
        self.usage.summary(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_is_strict_less_than() {
        assert!(admitted(0, 1));
        assert!(!admitted(1, 1));
        assert!(!admitted(2, 1));
        assert!(admitted(9, 10));
        assert!(!admitted(10, 10));
    }

    #[test]
    fn zero_limit_denies_unconditionally() {
        assert!(!admitted(0, 0));
        assert!(!admitted(5, 0));
    }

    #[test]
    fn active_trial_overrides_every_plan() {
        for plan in [PlanType::Free, PlanType::Basic, PlanType::Pro] {
            let features = select_features(plan, true);
            assert_eq!(features, PlanFeatures::trial_override());
            assert_eq!(features.companions_limit, 3);
            assert_eq!(features.interviews_per_month, 10);
        }
    }

    #[test]
    fn without_trial_the_catalog_applies() {
        for plan in [PlanType::Free, PlanType::Basic, PlanType::Pro] {
            assert_eq!(select_features(plan, false), PlanFeatures::for_plan(plan));
        }
    }

    #[test]
    fn free_plan_permits_exactly_one_companion() {
        let features = select_features(PlanType::Free, false);
        assert!(admitted(0, features.companions_limit));
        assert!(!admitted(1, features.companions_limit));
    }
}
