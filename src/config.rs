//! Runtime configuration for the binary, read from the environment.

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::data::loader::DEFAULT_PROFILES_DIR;

pub const BIND_VAR: &str = "STATCARD_BIND";
pub const PROFILES_DIR_VAR: &str = "STATCARD_PROFILES_DIR";
pub const WORKERS_VAR: &str = "STATCARD_WORKERS";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Extra `*.profile.yaml` files merged over the built-in profiles.
    pub profiles_dir: PathBuf,
    /// Batch worker threads; 0 uses the Rayon default.
    pub workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            profiles_dir: PathBuf::from(DEFAULT_PROFILES_DIR),
            workers: 0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Blank or invalid values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let value = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(bind_addr) = value(BIND_VAR) {
            config.bind_addr = bind_addr;
        }
        if let Some(dir) = value(PROFILES_DIR_VAR) {
            config.profiles_dir = PathBuf::from(dir);
        }
        if let Some(raw) = value(WORKERS_VAR) {
            match raw.parse() {
                Ok(workers) => config.workers = workers,
                Err(_) => warn!(var = WORKERS_VAR, value = %raw, "invalid worker count, using default"),
            }
        }
        config
    }
}
