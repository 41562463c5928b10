use crate::errors::ServiceError;
use chrono::Utc;
use mentora_database::repositories::TrialsRepository;
use mentora_models::billing::{Trial, TrialStatus};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

/// Creates and queries the one-per-user trial window.
pub struct TrialService {
    repo: TrialsRepository,
}

impl TrialService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: TrialsRepository::new(pool),
        }
    }

    /// Idempotent: an existing trial is returned unchanged, a missing one is
    /// created starting now. Safe to call repeatedly and concurrently.
    pub async fn ensure_trial(&self, user_id: Uuid) -> Result<Trial, ServiceError> {
        let trial = self.repo.ensure(user_id, Utc::now()).await.map_err(|e| {
            error!("Failed to ensure trial for {}: {:#}", user_id, e);
            ServiceError::Database(format!("{:#}", e))
        })?;
        info!(user_id = %user_id, trial_end = %trial.trial_end, "Trial ensured");
        Ok(trial)
    }

    /// Point-in-time status. Never creates a row.
    pub async fn trial_status(&self, user_id: Uuid) -> Result<TrialStatus, ServiceError> {
        let trial = self.repo.find_by_user(user_id).await.map_err(|e| {
            error!("Failed to fetch trial for {}: {:#}", user_id, e);
            ServiceError::Database(format!("{:#}", e))
        })?;
        Ok(TrialStatus::evaluate(trial.as_ref(), Utc::now()))
    }
}
