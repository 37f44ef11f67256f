use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bitunix: BitunixConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitunixConfig {
    pub api_key: String,
    pub secret_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause after every tick, regardless of branch taken.
    pub poll_interval_secs: u64,
    /// Pause after an unrecovered tick error before polling resumes.
    pub recovery_delay_secs: u64,
}

impl EngineConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub const fn recovery_delay(&self) -> Duration {
        Duration::from_secs(self.recovery_delay_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bitunix: BitunixConfig {
                api_key: String::new(),
                secret_key: String::new(),
                base_url: "https://fapi.bitunix.com".to_string(),
            },
            engine: EngineConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1,
            recovery_delay_secs: 10,
        }
    }
}
