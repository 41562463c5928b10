use serde::Deserialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct FeatureToggles {
    #[serde(flatten)]
    pub flags: HashMap<String, bool>,
}

impl FeatureToggles {
    // Load from a provided path or env var FEATURE_TOGGLES_PATH, defaulting to ./feature-toggles.json
    pub fn from_path(path: Option<String>) -> Self {
        let default_path = std::env::var("FEATURE_TOGGLES_PATH")
            .unwrap_or_else(|_| "feature-toggles.json".to_string());
        let path = path.unwrap_or(default_path);

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => FeatureToggles::default(),
        }
    }

    pub fn from_env_path() -> Self {
        Self::from_path(None)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn is_enabled_or(&self, name: &str, default: bool) -> bool {
        self.flags.get(name).copied().unwrap_or(default)
    }

    // Convenience: read Auth enablement from feature-toggles.json.
    // Disabled auth injects deterministic dev claims instead of verifying tokens.
    pub fn auth_enabled(&self) -> bool {
        self.is_enabled_or("Auth", true)
    }

    pub fn enabled_features(&self) -> Vec<String> {
        self.flags
            .iter()
            .filter(|(_, &enabled)| enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_defaults_to_empty() {
        let toggles = FeatureToggles::from_path(Some("does-not-exist.json".to_string()));
        assert!(toggles.flags.is_empty());
        assert!(toggles.auth_enabled());
        assert!(!toggles.is_enabled("Anything"));
    }

    #[test]
    fn explicit_flags_win_over_defaults() {
        let toggles: FeatureToggles = serde_json::from_str(r#"{"Auth": false}"#).unwrap();
        assert!(!toggles.auth_enabled());
    }
}
