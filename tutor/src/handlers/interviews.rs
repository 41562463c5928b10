use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use tracing::error;
use validator::Validate;

use mentora_billing::errors::ServiceError;
use mentora_billing::services::usage::month_window;
use mentora_billing::services::{EntitlementService, TrialService};
use mentora_database::repositories::UsageRepository;
use mentora_models::tutoring::StartInterviewRequest;

/// Start a mock interview, gated on the monthly interview limit. The window
/// is recomputed per request, so the counter resets at each UTC month
/// boundary without any scheduled job.
pub async fn start_interview(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    body: web::Json<StartInterviewRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = super::authenticated_user(&req)?;
    body.validate()
        .map_err(|e| ServiceError::Validation(e.to_string()))?;

    TrialService::new(pool.get_ref().clone())
        .ensure_trial(user_id)
        .await?;

    let features = EntitlementService::new(pool.get_ref().clone())
        .effective_features(user_id)
        .await;

    let now = Utc::now();
    let (start, end) = month_window(now);
    let created = UsageRepository::new(pool.get_ref().clone())
        .insert_interview_gated(
            user_id,
            &body.role,
            &body.level,
            start,
            end,
            i64::from(features.interviews_per_month),
            now,
        )
        .await
        .map_err(|e| {
            error!("Failed to start interview for {}: {:#}", user_id, e);
            ServiceError::Database(format!("{:#}", e))
        })?;

    match created {
        Some(session) => Ok(HttpResponse::Created().json(session)),
        None => Err(ServiceError::LimitReached(
            "Monthly interview limit reached for your plan".to_string(),
        )),
    }
}
