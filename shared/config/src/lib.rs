pub mod feature_toggles;

pub use feature_toggles::FeatureToggles;

/// Read a service port from the environment with a fallback.
pub fn service_port(var: &str, default: u16) -> u16 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}
