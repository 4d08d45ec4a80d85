mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

pub async fn load() -> Result<Config> {
    let explicit = env::var("CONFIG_PATH").ok();
    let config_path = explicit.clone().unwrap_or_else(|| "config.yaml".to_string());

    let mut config = if explicit.is_none() && !Path::new(&config_path).exists() {
        debug!("No {} found, using built-in defaults", config_path);
        Config::default()
    } else {
        debug!("Loading configuration from: {}", config_path);
        let config_str = tokio::fs::read_to_string(&config_path).await?;
        from_yaml(&config_str)?
    };

    if let Ok(script) = env::var("GENERATOR_SCRIPT") {
        debug!("Generator script overridden by GENERATOR_SCRIPT: {}", script);
        config.generator.script = script.into();
    }

    validate(&config)?;
    Ok(config)
}

pub fn from_yaml(yaml: &str) -> Result<Config> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn validate(config: &Config) -> Result<()> {
    let generator = &config.generator;
    if generator.interpreter.trim().is_empty() {
        return Err(Error::config("generator.interpreter must not be empty"));
    }
    if generator.script.as_os_str().is_empty() {
        return Err(Error::config("generator.script must not be empty"));
    }
    if generator.timeout_secs == 0 {
        return Err(Error::config("generator.timeout_secs must be greater than zero"));
    }
    Ok(())
}
