use super::Config;
use crate::error::{ConfigError, PsychError, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.psychsim/config.toml`, writing defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
        let psychsim_dir = home.join(".psychsim");

        if !psychsim_dir.exists() {
            fs::create_dir_all(&psychsim_dir).map_err(ConfigError::Io)?;
        }

        Self::load_from(&psychsim_dir.join("config.toml"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(config_path).map_err(ConfigError::Io)?;
            let mut config: Config = toml::from_str(&contents).map_err(|err| {
                ConfigError::Load(format!("{}: {err}", config_path.display()))
            })?;
            config.config_path = config_path.to_path_buf();
            config
        } else {
            let config = Self {
                config_path: config_path.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            tracing::info!(path = %config_path.display(), "wrote default config");
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).map_err(|err| {
            PsychError::Other(anyhow::Error::new(err).context("failed to serialize config"))
        })?;
        fs::write(&self.config_path, toml_str).map_err(ConfigError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_env::{ENV_LOCK, EnvVarGuard};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _model = EnvVarGuard::unset("PSYCHSIM_MODEL");
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.config_path, path);
        assert_eq!(config.model, "gemini-3-flash-preview");
    }

    #[test]
    fn existing_file_is_parsed() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _model = EnvVarGuard::unset("PSYCHSIM_MODEL");
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "model = \"gemini-test\"\n[progress]\ntick_ms = 50\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.model, "gemini-test");
        assert_eq!(config.progress.tick_ms, 50);
    }

    #[test]
    fn invalid_file_fails_validation() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[progress]\nceiling = 100.0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, PsychError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn unparsable_file_is_a_load_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "model = [unterminated\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, PsychError::Config(ConfigError::Load(_))));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn save_round_trips_settings() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config {
            config_path: tmp.path().join("config.toml"),
            ..Config::default()
        };
        config.progress.settle_ms = 500;
        config.save().unwrap();

        let contents = fs::read_to_string(&config.config_path).unwrap();
        let parsed: Config = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.progress.settle_ms, 500);
    }
}
