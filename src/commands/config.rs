use anyhow::{Context, Result, anyhow};
use log::debug;
use serde_json::Value;
use std::path::PathBuf;

use crate::{
    api::NewsRpm,
    config::{AuthMode, ClientConfig, config_slice},
    runtime::Runtime,
};

/// File name looked up under `<config_dir>/newsrpm/` when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Settings given on the command line or through the environment. Each one
/// that is set wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub auth_mode: Option<AuthMode>,
    pub timeout_ms: Option<u64>,
}

/// `<config_dir>/newsrpm/config.json`, if the platform has a config dir.
pub fn default_config_path<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    runtime
        .config_dir()
        .map(|dir| dir.join("newsrpm").join(DEFAULT_CONFIG_FILE))
}

#[tracing::instrument(skip(runtime, overrides))]
pub fn resolve_config<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<ClientConfig> {
    let path = match overrides.config_path {
        Some(path) => Some(path),
        None => default_config_path(runtime).filter(|p| runtime.exists(p)),
    };

    let mut doc = match &path {
        Some(path) => {
            debug!("Loading NewsRPM config from {:?}", path);
            let text = runtime.read_to_string(path)?;
            let doc: Value = serde_json::from_str(&text)
                .with_context(|| format!("Config file {} is not valid JSON", path.display()))?;
            config_slice(doc)
        }
        None => Value::Object(Default::default()),
    };

    if let Some(api_key) = overrides.api_key.filter(|k| !k.is_empty()) {
        match doc.as_object_mut() {
            Some(fields) => {
                fields.insert("apiKey".to_string(), Value::String(api_key));
            }
            None => return Err(anyhow!("NewsRPM config must be a JSON object")),
        }
    }

    let has_key = doc
        .get("apiKey")
        .and_then(Value::as_str)
        .is_some_and(|k| !k.trim().is_empty());
    if !has_key {
        let source = match &path {
            Some(path) => format!("apiKey in {}", path.display()),
            None => "a config file".to_string(),
        };
        return Err(anyhow!(
            "No NewsRPM API key: pass --api-key, set NEWSRPM_API_KEY, or provide {}",
            source
        ));
    }

    let mut config = ClientConfig::from_value(doc)?;
    if let Some(base_url) = overrides.base_url {
        config.base_url = base_url;
    }
    if let Some(auth_mode) = overrides.auth_mode {
        config.auth_mode = auth_mode;
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        config.request_defaults.timeout_ms = Some(timeout_ms);
    }
    config.validate()?;
    Ok(config)
}

/// Resolves the config and connects a client over reqwest.
pub fn connect<R: Runtime>(runtime: &R, overrides: ConfigOverrides) -> Result<NewsRpm> {
    let config = resolve_config(runtime, overrides)?;
    Ok(NewsRpm::connect(config)?)
}
