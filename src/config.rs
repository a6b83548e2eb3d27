//! Resolver configuration helpers.
//!
//! The config file is optional; command-line flags override it and missing
//! values fall back to a store under the platform data directory.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    pub schema_version: u32,
    /// Root of the file-backed custom script store.
    pub store_dir: PathBuf,
    /// Optional school overlay registry JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlays_path: Option<PathBuf>,
    #[serde(default = "default_prefer_custom")]
    pub prefer_custom: bool,
    #[serde(default)]
    pub soft_fail: bool,
}

fn default_prefer_custom() -> bool {
    true
}

/// Default store location, `<data dir>/walkthrough-resolver/custom`.
pub fn default_store_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow!("cannot determine a data directory for the custom script store"))?;
    Ok(data_dir.join("walkthrough-resolver").join("custom"))
}

/// Build the config written by `wtr init`.
pub fn default_config() -> Result<ResolverConfig> {
    Ok(ResolverConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        store_dir: default_store_dir()?,
        overlays_path: None,
        prefer_custom: true,
        soft_fail: false,
    })
}

/// Render a pretty JSON config stub.
pub fn config_stub() -> Result<String> {
    let config = default_config()?;
    serde_json::to_string_pretty(&config).context("serialize config stub")
}

pub fn load_config(path: &Path) -> Result<ResolverConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: ResolverConfig =
        serde_json::from_slice(&bytes).context("parse resolver config JSON")?;
    validate_config(&config)?;
    Ok(resolve_relative_paths(config, path))
}

/// Persist a config in a stable JSON format.
pub fn write_config(path: &Path, config: &ResolverConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize resolver config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &ResolverConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported resolver config schema_version {}",
            config.schema_version
        ));
    }
    if config.store_dir.as_os_str().is_empty() {
        return Err(anyhow!("store_dir must be non-empty"));
    }
    if let Some(path) = config.overlays_path.as_deref() {
        if path.as_os_str().is_empty() {
            return Err(anyhow!("overlays_path must be non-empty when set"));
        }
    }
    Ok(())
}

/// Relative paths in a config file are relative to the file itself.
fn resolve_relative_paths(mut config: ResolverConfig, config_path: &Path) -> ResolverConfig {
    let Some(base) = config_path.parent() else {
        return config;
    };
    if config.store_dir.is_relative() {
        config.store_dir = base.join(&config.store_dir);
    }
    if let Some(path) = config.overlays_path.as_mut() {
        if path.is_relative() {
            *path = base.join(&*path);
        }
    }
    config
}
