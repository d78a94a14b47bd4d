//! Query layer configuration.

use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use rentwise_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_FILE_VAR: &str = "RENTWISE_CONFIG";

/// Prefix for environment overrides; nested keys are split on `__`
/// (e.g. `RENTWISE_QUERY__STALE_AFTER_SECS=60`).
pub const ENV_PREFIX: &str = "RENTWISE_";

/// Configuration for the owner query service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// How long a cached read stays fresh, in seconds (default: 180).
    pub stale_after_secs: u64,
    /// Deadline for a single store call, in seconds (default: 10).
    pub request_timeout_secs: u64,
    /// Maximum number of cached reads across all owners.
    pub cache_capacity: u64,
    /// Newest completed payments carried on the snapshot (default: 5).
    pub recent_payments_limit: usize,
    /// Lets a decided application flip to the opposite decision.
    pub allow_decision_reversal: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: 180,
            request_timeout_secs: 10,
            cache_capacity: 10_000,
            recent_payments_limit: 5,
            allow_decision_reversal: false,
        }
    }
}

impl QueryConfig {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Everything a Rentwise process needs to start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RentwiseConfig {
    pub db: DbConfig,
    pub query: QueryConfig,
}

impl RentwiseConfig {
    /// Layered sources: defaults, then the YAML file named by
    /// [`CONFIG_FILE_VAR`] if set, then prefixed environment variables.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Ok(path) = std::env::var(CONFIG_FILE_VAR) {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }
}
