//! Host configuration: machine capacities from an optional TOML file at
//! `<config dir>/landin/config.toml`. Command-line flags take precedence.

use landin_core::prelude::*;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub machine: MachineConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub cells: usize,
    pub code: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            cells: Secd::DEFAULT_CELLS,
            code: Secd::DEFAULT_CODE_BYTES,
        }
    }
}

/// A missing file means built-in defaults; a malformed file is reported
/// and ignored.
pub fn load() -> Config {
    let Some(dir) = dirs::config_dir() else {
        return Config::default();
    };
    let path = dir.join("landin").join("config.toml");
    let Ok(text) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("ignoring {}: {e}", path.display());
            Config::default()
        }
    }
}
