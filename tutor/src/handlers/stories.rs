use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use tracing::error;
use validator::Validate;

use mentora_billing::errors::ServiceError;
use mentora_billing::services::usage::month_window;
use mentora_billing::services::{EntitlementService, TrialService};
use mentora_database::repositories::UsageRepository;
use mentora_models::tutoring::StartStoryRequest;

/// Start a story session, gated on the monthly story limit. Symmetric with
/// the interview gate.
pub async fn start_story(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    body: web::Json<StartStoryRequest>,
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
        .insert_story_gated(
            user_id,
            &body.theme,
            start,
            end,
            i64::from(features.stories_per_month),
            now,
        )
        .await
        .map_err(|e| {
            error!("Failed to start story for {}: {:#}", user_id, e);
            ServiceError::Database(format!("{:#}", e))
        })?;

    match created {
        Some(session) => Ok(HttpResponse::Created().json(session)),
        None => Err(ServiceError::LimitReached(
            "Monthly story limit reached for your plan".to_string(),
        )),
    }
}
