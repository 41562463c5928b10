use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    Internal(String),
    BadRequest(String),
    Unauthorized(String),
    Database(String),
    Validation(String),
    /// A usage limit was hit. A business outcome, not a failure; rendered as
    /// 403 with a machine-readable code so clients can route to an upgrade
    /// flow instead of an error page.
    LimitReached(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Internal(msg) => write!(f, "Internal Error: {}", msg),
            ServiceError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::Database(msg) => write!(f, "Database Error: {}", msg),
            ServiceError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::LimitReached(msg) => write!(f, "Limit reached: {}", msg),
        }
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            // Never leak internal error text to clients; the detail is logged
            // where the error originated.
            ServiceError::Internal(_) | ServiceError::Database(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
            ServiceError::BadRequest(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Bad request",
                "message": msg
            })),
            ServiceError::Unauthorized(msg) => {
                HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "Unauthorized",
                    "message": msg
                }))
            }
            ServiceError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "message": msg
            })),
            ServiceError::LimitReached(msg) => HttpResponse::Forbidden().json(serde_json::json!({
                "error": "limit_reached",
                "message": msg
            })),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::Database(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn limit_reached_is_a_distinct_business_outcome() {
        let resp = ServiceError::LimitReached("Companion limit reached".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn infrastructure_errors_map_to_500() {
        let resp = ServiceError::Database("connection refused".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let resp = ServiceError::Unauthorized("no identity".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
