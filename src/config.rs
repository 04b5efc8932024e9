//! Layered configuration lookup.
//!
//! Each layer is optional and read on its own; later layers win key by key.

use crate::error::{Result, SafeRouteError};
use crate::types::config::SafeRouteConfig;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "saferoute.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".saferoute/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/saferoute/config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    Global,
    Repo,
    Local,
}

impl ConfigLayer {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Repo => "repo",
            Self::Local => "local",
        }
    }
}

/// Effective configuration plus the files that contributed to it, lowest first.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: SafeRouteConfig,
    pub applied: Vec<(ConfigLayer, PathBuf)>,
}

pub fn load_config(root: &Path) -> Result<LoadedConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_from(root, global.as_deref())
}

pub(crate) fn load_config_from(root: &Path, global: Option<&Path>) -> Result<LoadedConfig> {
    let layers = global
        .map(|path| (ConfigLayer::Global, path.to_path_buf()))
        .into_iter()
        .chain([
            (ConfigLayer::Repo, root.join(DEFAULT_CONFIG_FILE)),
            (ConfigLayer::Local, root.join(DEFAULT_LOCAL_FILE)),
        ]);

    let mut loaded = LoadedConfig::default();
    for (layer, path) in layers {
        let Some(parsed) = read_layer(&path)? else {
            continue;
        };
        parsed.validate().map_err(|e| in_file(&path, e))?;
        loaded.config.overlay(parsed);
        loaded.applied.push((layer, path));
    }
    loaded.config.validate()?;
    Ok(loaded)
}

fn read_layer(path: &Path) -> Result<Option<SafeRouteConfig>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| SafeRouteError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn in_file(path: &Path, error: SafeRouteError) -> SafeRouteError {
    match error {
        SafeRouteError::ConfigParse(message) => {
            SafeRouteError::ConfigParse(format!("{}: {}", path.display(), message))
        }
        other => other,
    }
}
