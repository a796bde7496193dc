//! Configuration loading for the pubsub-gen binary.

pub mod duration;

use crate::cli::ConfigOverrides;
use anyhow::Context;
use pubsub_core::GeneratorConfig;
use std::path::Path;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Load the generator configuration.
///
/// An explicit path must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
/// used when present and the built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {path:?}")),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                tracing::info!("Using configuration from {DEFAULT_CONFIG_PATH}");
                GeneratorConfig::from_file(default_path)
                    .with_context(|| format!("Failed to load configuration from {default_path:?}"))
            } else {
                tracing::info!("No configuration file found, using defaults");
                Ok(GeneratorConfig::default())
            }
        }
    }
}

/// Apply command-line overrides on top of a loaded configuration.
pub fn apply_overrides(config: &mut GeneratorConfig, overrides: &ConfigOverrides) {
    if let Some(n) = overrides.num_publications {
        config.num_publications = n;
    }
    if let Some(n) = overrides.num_subscriptions {
        config.num_subscriptions = n;
    }
    if let Some(n) = overrides.num_threads {
        config.num_threads = n;
    }
    if let Some(ratio) = overrides.equality_ratio {
        config.equality_ratio = ratio;
    }
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(timeout) = overrides.join_timeout {
        config.join_timeout_secs = timeout.as_secs();
    }
}
