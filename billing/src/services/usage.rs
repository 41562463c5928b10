use crate::errors::ServiceError;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use mentora_database::repositories::UsageRepository;
use mentora_models::billing::UsageSummary;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

/// The calendar-month window containing `now`, in UTC: first instant of the
/// month inclusive, first instant of the next month exclusive. Computed at
/// query time so monthly limits reset without a background job.
pub fn month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .unwrap();
    let (next_year, next_month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let end = Utc.with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0).unwrap();
    (start, end)
}

/// Period-scoped consumption counts, always read fresh from the store.
pub struct UsageService {
    repo: UsageRepository,
}

impl UsageService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: UsageRepository::new(pool),
        }
    }

    /// Lifetime companion count.
    pub async fn companions_created(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        self.repo.companions_created(user_id).await.map_err(|e| {
            error!("Failed to count companions for {}: {:#}", user_id, e);
            ServiceError::Database(format!("{:#}", e))
        })
    }

    /// Interview sessions created in the current UTC calendar month.
    pub async fn interviews_this_month(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        let (start, end) = month_window(Utc::now());
        self.repo
            .interviews_between(user_id, start, end)
            .await
            .map_err(|e| {
                error!("Failed to count interviews for {}: {:#}", user_id, e);
                ServiceError::Database(format!("{:#}", e))
            })
    }

    /// Story sessions created in the current UTC calendar month.
    pub async fn stories_this_month(&self, user_id: Uuid) -> Result<i64, ServiceError> {
        let (start, end) = month_window(Utc::now());
        self.repo
            .stories_between(user_id, start, end)
            .await
            .map_err(|e| {
                error!("Failed to count stories for {}: {:#}", user_id, e);
                ServiceError::Database(format!("{:#}", e))
            })
    }

    pub async fn summary(&self, user_id: Uuid) -> Result<UsageSummary, ServiceError> {
        Ok(UsageSummary {
            companions: self.companions_created(user_id).await?,
            interviews: self.interviews_this_month(user_id).await?,
            stories: self.stories_this_month(user_id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn window_spans_the_containing_month() {
        let now = Utc.with_ymd_and_hms(2025, 6, 17, 15, 30, 0).unwrap();
        let (start, end) = month_window(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn december_rolls_over_to_january() {
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        let (start, end) = month_window(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_boundaries_are_inclusive_exclusive() {
        let now = Utc.with_ymd_and_hms(2025, 6, 17, 0, 0, 0).unwrap();
        let (start, end) = month_window(now);
        let contains = |t: DateTime<Utc>| t >= start && t < end;

        // The counting queries filter created_at >= start AND created_at < end
        assert!(contains(start));
        assert!(contains(end - Duration::nanoseconds(1)));
        assert!(!contains(end));
        assert!(!contains(start - Duration::nanoseconds(1)));
    }
}
