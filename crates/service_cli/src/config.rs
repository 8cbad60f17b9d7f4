//! Layered CLI configuration.
//!
//! Sources, later ones winning:
//! 1. built-in defaults ([`AppConfig::default`])
//! 2. the TOML file given by `--config` (optional, default `option-pricer.toml`)
//! 3. `OPTION_PRICER__*` environment variables, `__` separating sections,
//!    e.g. `OPTION_PRICER__ENGINE__MONTE_CARLO__SEED=7`
//!
//! `RUST_LOG` takes precedence over `log_level` when the subscriber is built.

use crate::Result;
use pricer_pricing::EngineSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "option-pricer.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "OPTION_PRICER";

/// Effective configuration of one CLI invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Numerical parameters for every engine
    pub engine: EngineSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            engine: EngineSettings::default(),
        }
    }
}

/// Loads the configuration from defaults, `path` and the environment.
pub fn load(path: &Path) -> Result<AppConfig> {
    load_with_prefix(path, ENV_PREFIX)
}

fn load_with_prefix(path: &Path, env_prefix: &str) -> Result<AppConfig> {
    let merged = config::Config::builder()
        .add_source(config::Config::try_from(&AppConfig::default())?)
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = merged.try_deserialize()?;
    app.engine.validate()?;
    Ok(app)
}
