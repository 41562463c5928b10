use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of the one-time free trial window granted to every user.
pub const TRIAL_PERIOD_DAYS: i64 = 7;

/// Subscription tiers known to the platform. The billing provider stores
/// the active tier per user; everything else derives limits from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    Free,
    Basic,
    Pro,
}

impl FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(PlanType::Free),
            "basic" => Ok(PlanType::Basic),
            "pro" => Ok(PlanType::Pro),
            other => Err(format!("unknown plan tier: {}", other)),
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanType::Free => write!(f, "free"),
            PlanType::Basic => write!(f, "basic"),
            PlanType::Pro => write!(f, "pro"),
        }
    }
}

/// Feature limits and flags attached to a plan. Defined at deploy time,
/// never persisted per user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatures {
    pub companions_limit: u32,
    pub interviews_per_month: u32,
    pub stories_per_month: u32,
    pub resume_analysis: bool,
    pub advanced_reporting: bool,
    pub priority_support: bool,
}

impl PlanFeatures {
    /// Static plan catalog. Total over the closed `PlanType` enum, so an
    /// unknown plan cannot reach this function.
    pub fn for_plan(plan: PlanType) -> PlanFeatures {
        match plan {
            PlanType::Free => PlanFeatures {
                companions_limit: 1,
                interviews_per_month: 2,
                stories_per_month: 2,
                resume_analysis: false,
                advanced_reporting: false,
                priority_support: false,
            },
            PlanType::Basic => PlanFeatures {
                companions_limit: 3,
                interviews_per_month: 10,
                stories_per_month: 10,
                resume_analysis: true,
                advanced_reporting: false,
                priority_support: false,
            },
            PlanType::Pro => PlanFeatures {
                companions_limit: 10,
                interviews_per_month: 50,
                stories_per_month: 50,
                resume_analysis: true,
                advanced_reporting: true,
                priority_support: true,
            },
        }
    }

    /// Fixed entitlement applied while a trial is active, regardless of the
    /// user's nominal plan. Overrides limits only; the stored plan is
    /// untouched.
    pub fn trial_override() -> PlanFeatures {
        PlanFeatures {
            companions_limit: 3,
            interviews_per_month: 10,
            stories_per_month: 10,
            resume_analysis: true,
            advanced_reporting: false,
            priority_support: false,
        }
    }

    /// Boolean answer for a feature lookup. Limit-valued features report
    /// whether the limit is non-zero.
    pub fn has(&self, feature: FeatureType) -> bool {
        match feature {
            FeatureType::CompanionsLimit => self.companions_limit > 0,
            FeatureType::InterviewsPerMonth => self.interviews_per_month > 0,
            FeatureType::StoriesPerMonth => self.stories_per_month > 0,
            FeatureType::ResumeAnalysis => self.resume_analysis,
            FeatureType::AdvancedReporting => self.advanced_reporting,
            FeatureType::PrioritySupport => self.priority_support,
        }
    }
}

/// The six recognized feature identifiers. Anything else is rejected at
/// parse time rather than answered with a silent `false`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FeatureType {
    CompanionsLimit,
    InterviewsPerMonth,
    StoriesPerMonth,
    ResumeAnalysis,
    AdvancedReporting,
    PrioritySupport,
}

impl FromStr for FeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "companionsLimit" => Ok(FeatureType::CompanionsLimit),
            "interviewsPerMonth" => Ok(FeatureType::InterviewsPerMonth),
            "storiesPerMonth" => Ok(FeatureType::StoriesPerMonth),
            "resumeAnalysis" => Ok(FeatureType::ResumeAnalysis),
            "advancedReporting" => Ok(FeatureType::AdvancedReporting),
            "prioritySupport" => Ok(FeatureType::PrioritySupport),
            other => Err(format!("unknown feature: {}", other)),
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureType::CompanionsLimit => "companionsLimit",
            FeatureType::InterviewsPerMonth => "interviewsPerMonth",
            FeatureType::StoriesPerMonth => "storiesPerMonth",
            FeatureType::ResumeAnalysis => "resumeAnalysis",
            FeatureType::AdvancedReporting => "advancedReporting",
            FeatureType::PrioritySupport => "prioritySupport",
        };
        write!(f, "{}", name)
    }
}

/// One time-boxed trial per user. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trial_start: DateTime<Utc>,
    pub trial_end: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Point-in-time view of a user's trial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrialStatus {
    pub has_trial: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

impl TrialStatus {
    pub fn none() -> TrialStatus {
        TrialStatus {
            has_trial: false,
            is_active: false,
            days_remaining: None,
        }
    }

    /// Evaluate a (possibly absent) trial row against `now`. Active strictly
    /// before `trial_end`; `days_remaining` is the ceiling in whole days and
    /// only present while active.
    pub fn evaluate(trial: Option<&Trial>, now: DateTime<Utc>) -> TrialStatus {
        match trial {
            None => TrialStatus::none(),
            Some(trial) => {
                let is_active = now < trial.trial_end;
                let days_remaining = if is_active {
                    Some(ceil_days(trial.trial_end - now))
                } else {
                    None
                };
                TrialStatus {
                    has_trial: true,
                    is_active,
                    days_remaining,
                }
            }
        }
    }
}

fn ceil_days(remaining: Duration) -> i64 {
    let secs = remaining.num_seconds();
    (secs + 86_399) / 86_400
}

/// Period-scoped consumption counts for a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageSummary {
    pub companions: i64,
    pub interviews: i64,
    pub stories: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn trial_ending(end: DateTime<Utc>) -> Trial {
        Trial {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            trial_start: end - Duration::days(TRIAL_PERIOD_DAYS),
            trial_end: end,
            created_at: end - Duration::days(TRIAL_PERIOD_DAYS),
        }
    }

    #[test]
    fn catalog_is_deterministic() {
        for plan in [PlanType::Free, PlanType::Basic, PlanType::Pro] {
            assert_eq!(PlanFeatures::for_plan(plan), PlanFeatures::for_plan(plan));
        }
    }

    #[test]
    fn free_plan_allows_a_single_companion() {
        assert_eq!(PlanFeatures::for_plan(PlanType::Free).companions_limit, 1);
    }

    #[test]
    fn trial_override_grants_fixed_limits() {
        let features = PlanFeatures::trial_override();
        assert_eq!(features.companions_limit, 3);
        assert_eq!(features.interviews_per_month, 10);
        assert_eq!(features.stories_per_month, 10);
    }

    #[test]
    fn plan_tier_round_trips_through_strings() {
        for plan in [PlanType::Free, PlanType::Basic, PlanType::Pro] {
            assert_eq!(plan.to_string().parse::<PlanType>(), Ok(plan));
        }
        assert!("enterprise".parse::<PlanType>().is_err());
    }

    #[test]
    fn all_six_feature_identifiers_parse() {
        let identifiers = [
            "companionsLimit",
            "interviewsPerMonth",
            "storiesPerMonth",
            "resumeAnalysis",
            "advancedReporting",
            "prioritySupport",
        ];
        for id in identifiers {
            let feature: FeatureType = id.parse().unwrap();
            assert_eq!(feature.to_string(), id);
        }
    }

    #[test]
    fn unrecognized_feature_is_rejected_not_false() {
        assert!("not_a_real_feature".parse::<FeatureType>().is_err());
    }

    #[test]
    fn limit_valued_features_answer_nonzero() {
        let free = PlanFeatures::for_plan(PlanType::Free);
        assert!(free.has(FeatureType::CompanionsLimit));
        assert!(!free.has(FeatureType::ResumeAnalysis));
        let pro = PlanFeatures::for_plan(PlanType::Pro);
        assert!(pro.has(FeatureType::PrioritySupport));
    }

    #[test]
    fn trial_status_without_row() {
        let status = TrialStatus::evaluate(None, Utc::now());
        assert_eq!(status, TrialStatus::none());
    }

    #[test]
    fn trial_is_active_strictly_before_end() {
        let end = Utc.with_ymd_and_hms(2025, 6, 8, 12, 0, 0).unwrap();
        let trial = trial_ending(end);

        let before = TrialStatus::evaluate(Some(&trial), end - Duration::seconds(1));
        assert!(before.is_active);
        assert_eq!(before.days_remaining, Some(1));

        let at_end = TrialStatus::evaluate(Some(&trial), end);
        assert!(at_end.has_trial);
        assert!(!at_end.is_active);
        assert_eq!(at_end.days_remaining, None);

        let after = TrialStatus::evaluate(Some(&trial), end + Duration::days(30));
        assert!(!after.is_active);
    }

    #[test]
    fn days_remaining_rounds_up() {
        let end = Utc.with_ymd_and_hms(2025, 6, 8, 0, 0, 0).unwrap();
        let trial = trial_ending(end);

        let status = TrialStatus::evaluate(Some(&trial), end - Duration::days(3));
        assert_eq!(status.days_remaining, Some(3));

        let status = TrialStatus::evaluate(Some(&trial), end - Duration::days(2) - Duration::hours(1));
        assert_eq!(status.days_remaining, Some(3));
    }
}
