//! YAML config discovery.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::ConfigError;

/// Parse a single YAML file into a [`Config`].
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Recursively load every `*.yaml` / `*.yml` file under `dir`.
///
/// Files are visited in path order. Two documents sharing an `id` is a hard
/// error, as is a directory without any YAML file.
pub fn load_config_dir(dir: &Path) -> Result<Vec<Config>, ConfigError> {
    let mut configs = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_yaml(entry.path()) {
            continue;
        }

        let path = entry.path();
        info!(file = %path.display(), "processing config file");
        let config = load_config_file(path)?;

        if seen.contains_key(&config.id) {
            return Err(ConfigError::DuplicateId {
                id: config.id,
                path: path.to_path_buf(),
            });
        }
        seen.insert(config.id.clone(), path.to_path_buf());
        configs.push(config);
    }

    if configs.is_empty() {
        return Err(ConfigError::Empty(dir.to_path_buf()));
    }

    info!(count = configs.len(), dir = %dir.display(), "processed config files");
    Ok(configs)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false)
}
