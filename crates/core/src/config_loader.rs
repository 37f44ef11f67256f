use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging TOML and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads application configuration from a specific TOML file.
    ///
    /// Environment variables prefixed with `APP_` override file values, with
    /// `__` separating nesting levels (e.g. `APP_BITUNIX__API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Figment::new()
            .merge(figment::providers::Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_toml() {
        let path = std::env::temp_dir().join(format!("sentinel-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[bitunix]
api_key = "key"
secret_key = "secret"
base_url = "https://example.test"

[engine]
poll_interval_secs = 2
recovery_delay_secs = 20
"#
        )
        .unwrap();

        let config = ConfigLoader::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.bitunix.api_key, "key");
        assert_eq!(config.bitunix.base_url, "https://example.test");
        assert_eq!(config.engine.poll_interval_secs, 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ConfigLoader::load_from("/nonexistent/Config.toml").unwrap();
        assert_eq!(config.engine.poll_interval_secs, 1);
    }
}
