use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error as ActixError, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use mentora_models::auth::Claims;
use serde_json::json;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

#[derive(Clone)]
enum AuthMode {
    Enabled(Arc<DecodingKey>),
    Disabled(Claims),
}

pub struct AuthMiddleware<S> {
    service: Rc<S>,
    mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let mode = self.mode.clone();

        Box::pin(async move {
            // Public endpoints skip authentication
            if is_public_endpoint(req.path()) {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            match mode {
                AuthMode::Enabled(decoding_key) => {
                    if let Some(token) = bearer_token(&req) {
                        match verify_jwt_token(&token, &decoding_key) {
                            Ok(claims) => {
                                req.extensions_mut().insert(claims);
                                let res = service.call(req).await?;
                                return Ok(res.map_into_left_body());
                            }
                            Err(e) => {
                                tracing::warn!("JWT verification failed: {}", e);
                                return Ok(req
                                    .into_response(HttpResponse::Unauthorized().json(json!({
                                        "error": "Invalid or expired token"
                                    })))
                                    .map_into_right_body());
                            }
                        }
                    }
                    Ok(req
                        .into_response(HttpResponse::Unauthorized().json(json!({
                            "error": "Authentication required",
                            "message": "Please provide a valid Bearer token in the Authorization header"
                        })))
                        .map_into_right_body())
                }
                AuthMode::Disabled(default_claims) => {
                    // Inject default claims and proceed
                    req.extensions_mut().insert(default_claims.clone());
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

#[derive(Clone)]
pub struct AuthMiddlewareFactory {
    mode: AuthMode,
}

impl AuthMiddlewareFactory {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        match load_decoding_key() {
            Ok(key) => Ok(Self {
                mode: AuthMode::Enabled(Arc::new(key)),
            }),
            Err(e) => {
                tracing::warn!(
                    "JWT public key not found or invalid ({}). Falling back to disabled auth (dev claims). Set `JWT_PUBLIC_KEY_PATH` or `JWT_PUBLIC_KEY` to enable.",
                    e
                );
                Ok(Self::disabled())
            }
        }
    }

    pub fn disabled() -> Self {
        let claims = mentora_models::auth::default_dev_claims();
        Self {
            mode: AuthMode::Disabled(claims),
        }
    }

}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
            mode: self.mode.clone(),
        }))
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

// JWT verification using the identity provider's RS256 public key
fn verify_jwt_token(token: &str, key: &DecodingKey) -> Result<Claims, Box<dyn std::error::Error>> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&["mentora"]);
    validation.set_audience(&["mentora-users"]);

    let token_data = decode::<Claims>(token, key, &validation)?;

    let now = chrono::Utc::now().timestamp() as usize;
    if token_data.claims.exp < now {
        return Err("Token has expired".into());
    }

    Ok(token_data.claims)
}

// Load the verification key from a file path or an inline env var.
// Prefer the path form; multiline PEM values in .env files are fragile.
fn load_decoding_key() -> Result<DecodingKey, Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var("JWT_PUBLIC_KEY_PATH") {
        let pem = std::fs::read_to_string(&path)?;
        return DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
            tracing::error!("Failed parsing JWT_PUBLIC_KEY_PATH ({}): {}", path, e);
            e.into()
        });
    }

    if let Ok(inline) = std::env::var("JWT_PUBLIC_KEY") {
        // Unescape \n so PEM survives single-line env vars
        let pem = inline.trim().replace("\\n", "\n");
        return DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
            tracing::error!("Failed parsing JWT_PUBLIC_KEY env var: {}", e);
            e.into()
        });
    }

    Err("No public key found. Set JWT_PUBLIC_KEY_PATH or JWT_PUBLIC_KEY environment variable".into())
}

// Endpoints reachable without a token
fn is_public_endpoint(path: &str) -> bool {
    let public_paths = ["/health"];
    public_paths.iter().any(|&public_path| path.starts_with(public_path))
}

// Helper functions for extracting identity from requests
pub fn extract_claims_from_request(req: &HttpRequest) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}

pub fn extract_user_id_from_request(req: &HttpRequest) -> Option<uuid::Uuid> {
    extract_claims_from_request(req)?.sub.parse().ok()
}
