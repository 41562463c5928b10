use serde::{Deserialize, Serialize};

/// JWT claims issued by the external identity provider. The services only
/// care about the subject (user id); everything else is carried through for
/// logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id as a UUID string.
    pub sub: String,
    pub email: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

/// Deterministic claims injected when auth is disabled via feature toggles.
pub fn default_dev_claims() -> Claims {
    Claims {
        sub: "550e8400-e29b-41d4-a716-446655440000".to_string(),
        email: Some("dev@mentora.local".to_string()),
        iat: 0,
        exp: usize::MAX,
    }
}
