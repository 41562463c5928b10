pub mod companions;
pub mod interviews;
pub mod stories;

use actix_web::HttpRequest;
use mentora_billing::errors::ServiceError;
use mentora_middleware::auth::extract_user_id_from_request;
use uuid::Uuid;

pub(crate) fn authenticated_user(req: &HttpRequest) -> Result<Uuid, ServiceError> {
    extract_user_id_from_request(req)
        .ok_or_else(|| ServiceError::Unauthorized("Authentication required".to_string()))
}

pub fn configure_tutor_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.route("/companions", actix_web::web::post().to(companions::create_companion))
        .route("/interviews", actix_web::web::post().to(interviews::start_interview))
        .route("/stories", actix_web::web::post().to(stories::start_story));
}
