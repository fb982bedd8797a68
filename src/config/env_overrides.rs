use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PSYCHSIM_API_KEY")
            && !key.is_empty()
        {
            self.api_key = Some(key);
        }

        if let Ok(model) = std::env::var("PSYCHSIM_MODEL")
            && !model.is_empty()
        {
            self.model = model;
        }

        if let Ok(base_url) = std::env::var("PSYCHSIM_BASE_URL")
            && !base_url.is_empty()
        {
            self.base_url = base_url;
        }

        if let Ok(temp_str) = std::env::var("PSYCHSIM_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.temperature = temp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_env::{ENV_LOCK, EnvVarGuard};
    use super::*;

    #[test]
    fn env_overrides_replace_file_values() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _key = EnvVarGuard::set("PSYCHSIM_API_KEY", "env-key");
        let _model = EnvVarGuard::set("PSYCHSIM_MODEL", "gemini-env");
        let _url = EnvVarGuard::set("PSYCHSIM_BASE_URL", "http://localhost:9999");
        let _temp = EnvVarGuard::set("PSYCHSIM_TEMPERATURE", "0.3");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.model, "gemini-env");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert!((config.temperature - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_temperature_is_ignored() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _temp = EnvVarGuard::set("PSYCHSIM_TEMPERATURE", "7");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert!((config.temperature - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_values_are_ignored() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _model = EnvVarGuard::set("PSYCHSIM_MODEL", "");
        let _key = EnvVarGuard::unset("PSYCHSIM_API_KEY");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.model, "gemini-3-flash-preview");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn resolve_api_key_falls_back_to_gemini_env() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _gemini = EnvVarGuard::set("GEMINI_API_KEY", "gemini-env-key");
        let _google = EnvVarGuard::unset("GOOGLE_API_KEY");

        let config = Config::default();
        assert_eq!(config.resolve_api_key().as_deref(), Some("gemini-env-key"));

        let configured = Config {
            api_key: Some("file-key".into()),
            ..Config::default()
        };
        assert_eq!(configured.resolve_api_key().as_deref(), Some("file-key"));
    }

    #[test]
    fn resolve_api_key_is_none_without_sources() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _gemini = EnvVarGuard::unset("GEMINI_API_KEY");
        let _google = EnvVarGuard::unset("GOOGLE_API_KEY");

        let config = Config {
            api_key: Some("   ".into()),
            ..Config::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
