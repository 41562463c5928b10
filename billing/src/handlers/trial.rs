use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::errors::ServiceError;
use crate::services::TrialService;
use mentora_middleware::auth::extract_user_id_from_request;
use mentora_models::billing::TrialStatus;

/// Current trial status. A store outage degrades to "no trial" so the page
/// keeps rendering; limits elsewhere only get tighter from that default.
pub async fn get_trial_status(
    req: HttpRequest,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = extract_user_id_from_request(&req)
        .ok_or_else(|| ServiceError::Unauthorized("Authentication required".to_string()))?;

    let trials = TrialService::new(pool.get_ref().clone());
    let status = match trials.trial_status(user_id).await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!("Trial status degraded to none: {}", e);
            TrialStatus::none()
        }
    };

    Ok(HttpResponse::Ok().json(status))
}

/// Explicit trial initialization. Idempotent: repeated calls return the
/// existing trial unchanged. Write failures surface to the caller.
pub async fn create_trial(
    req: HttpRequest,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = extract_user_id_from_request(&req)
        .ok_or_else(|| ServiceError::Unauthorized("Authentication required".to_string()))?;

    let trials = TrialService::new(pool.get_ref().clone());
    let trial = trials.ensure_trial(user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Free trial active until {}", trial.trial_end.format("%Y-%m-%d")),
        "trial": trial
    })))
}

pub fn configure_trial_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/user/trial", web::get().to(get_trial_status))
        .route("/user/trial", web::post().to(create_trial));
}
