//! Load extra conversion profiles from YAML and merge them over the built-ins.
//! Only `*.profile.yaml` and `*.profile.yml` files are read; other files in the directory are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::data::profile::ConversionProfile;
use crate::data::registry::ProfileRegistry;
use crate::data::validate::validate_profile;

pub const DEFAULT_PROFILES_DIR: &str = "data/profiles";

#[derive(Debug, Error)]
pub enum ProfileLoadError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse yaml '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("profile '{id}' in '{path}' is invalid: {}", errors.join("; "))]
    Invalid {
        path: PathBuf,
        id: String,
        errors: Vec<String>,
    },
}

fn is_profile_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".profile.yaml") || n.ends_with(".profile.yml"))
}

/// Deserialize a profile file without structural checks.
pub fn read_profile_file(path: impl AsRef<Path>) -> Result<ConversionProfile, ProfileLoadError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ProfileLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ProfileLoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and structurally validate a single profile file.
pub fn load_profile_file(path: impl AsRef<Path>) -> Result<ConversionProfile, ProfileLoadError> {
    let path = path.as_ref();
    let profile = read_profile_file(path)?;

    let report = validate_profile(&profile);
    if report.has_errors() {
        return Err(ProfileLoadError::Invalid {
            path: path.to_path_buf(),
            id: profile.id,
            errors: report.errors().map(ToString::to_string).collect(),
        });
    }
    for diag in &report.diagnostics {
        debug!(path = %path.display(), %diag, "profile diagnostic");
    }
    Ok(profile)
}

/// Load every profile file in `dir`, sorted by file name. A missing directory yields no profiles;
/// files that fail to load are skipped with a warning.
pub fn load_profile_dir(dir: impl AsRef<Path>) -> Result<Vec<ConversionProfile>, ProfileLoadError> {
    let dir = dir.as_ref();
    let mut profiles = Vec::new();
    if !dir.is_dir() {
        return Ok(profiles);
    }
    let io_err = |source| ProfileLoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_profile_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        match load_profile_file(&path) {
            Ok(profile) => profiles.push(profile),
            Err(err) => warn!(error = %err, "skipping profile file"),
        }
    }
    Ok(profiles)
}

/// Built-in registry extended with the profiles found in `dir`. Files may add new ids but never
/// replace a built-in profile.
pub fn load_registry(dir: impl AsRef<Path>) -> Result<ProfileRegistry, ProfileLoadError> {
    let mut registry = ProfileRegistry::builtin();
    for profile in load_profile_dir(dir)? {
        if registry.contains(&profile.id) {
            warn!(profile_id = %profile.id, "profile file collides with an existing id, skipping");
            continue;
        }
        debug!(profile_id = %profile.id, "loaded extra profile");
        registry = registry.with_profile(profile);
    }
    Ok(registry)
}
