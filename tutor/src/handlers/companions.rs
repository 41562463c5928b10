use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use tracing::error;
use validator::Validate;

use mentora_billing::errors::ServiceError;
use mentora_billing::services::{EntitlementService, TrialService};
use mentora_database::repositories::UsageRepository;
use mentora_models::tutoring::CreateCompanionRequest;

/// Create a study companion, gated on the lifetime companion limit. The
/// limit check and the insert run as a single conditional write, so
/// concurrent requests cannot overshoot the limit.
pub async fn create_companion(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    body: web::Json<CreateCompanionRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = super::authenticated_user(&req)?;
    body.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    // A user's first gated action starts their trial
    TrialService::new(pool.get_ref().clone())
        .ensure_trial(user_id)
        .await?;

    let features = EntitlementService::new(pool.get_ref().clone())
        .effective_features(user_id)
        .await;

    let created = UsageRepository::new(pool.get_ref().clone())
        .insert_companion_gated(
            user_id,
            &body.name,
            &body.subject,
            &body.topic,
            i64::from(features.companions_limit),
            Utc::now(),
        )
        .await
        .map_err(|e| {
            error!("Failed to create companion for {}: {:#}", user_id, e);
            ServiceError::Database(format!("{:#}", e))
        })?;

    match created {
        Some(companion) => Ok(HttpResponse::Created().json(companion)),
        None => Err(ServiceError::LimitReached(
            "Companion limit reached for your plan".to_string(),
        )),
    }
}
