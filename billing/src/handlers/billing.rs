use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::EntitlementService;
use mentora_middleware::auth::extract_user_id_from_request;
use mentora_models::billing::FeatureType;

#[derive(serde::Deserialize)]
pub struct BillingQuery {
    pub action: Option<String>,
    pub feature: Option<String>,
}

fn authenticated_user(req: &HttpRequest) -> Result<Uuid, ServiceError> {
    extract_user_id_from_request(req)
        .ok_or_else(|| ServiceError::Unauthorized("Authentication required".to_string()))
}

// Advisory read endpoints stay usable through a store outage: a failed count
// is answered with the denial-safe value instead of a 5xx.
fn denial_safe(result: Result<bool, ServiceError>, what: &str) -> bool {
    result.unwrap_or_else(|e| {
        tracing::warn!("{} check degraded to deny: {}", what, e);
        false
    })
}

/// Single entitlement query endpoint, dispatched on the `action` parameter.
pub async fn billing_actions(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    query: web::Query<BillingQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = authenticated_user(&req)?;
    let entitlements = EntitlementService::new(pool.get_ref().clone());

    match query.action.as_deref() {
        Some("plan") => {
            let plan = entitlements.current_plan(user_id).await;
            Ok(HttpResponse::Ok().json(json!({ "plan": plan })))
        }
        Some("features") => {
            let features = entitlements.effective_features(user_id).await;
            Ok(HttpResponse::Ok().json(json!({ "features": features })))
        }
        Some("can-create-companion") => {
            let allowed = denial_safe(entitlements.can_create_companion(user_id).await, "Companion");
            Ok(HttpResponse::Ok().json(json!({ "canCreate": allowed })))
        }
        Some("can-start-interview") => {
            let allowed = denial_safe(entitlements.can_start_interview(user_id).await, "Interview");
            Ok(HttpResponse::Ok().json(json!({ "canStart": allowed })))
        }
        Some("can-start-story") => {
            let allowed = denial_safe(entitlements.can_start_story(user_id).await, "Story");
            Ok(HttpResponse::Ok().json(json!({ "canStartStory": allowed })))
        }
        Some("has-feature") => {
            let raw = query.feature.as_deref().ok_or_else(|| {
                ServiceError::Validation("feature parameter is required".to_string())
            })?;
            let feature: FeatureType = raw
                .parse()
                .map_err(|e: String| ServiceError::BadRequest(e))?;
            let has = entitlements.has_feature(user_id, feature).await;
            Ok(HttpResponse::Ok().json(json!({ "hasFeature": has })))
        }
        Some("usage") => {
            let usage = entitlements.usage_summary(user_id).await?;
            Ok(HttpResponse::Ok().json(json!({
                "companions": usage.companions,
                "interviews": usage.interviews,
                "stories": usage.stories
            })))
        }
        Some(other) => Err(ServiceError::BadRequest(format!("unknown action: {}", other))),
        None => Err(ServiceError::Validation("action parameter is required".to_string())),
    }
}

pub fn configure_billing_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/billing", web::get().to(billing_actions));
}
