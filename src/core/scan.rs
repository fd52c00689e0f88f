use crate::core::error::{RepoDeckError, Result};
use std::path::{Path, PathBuf};

pub fn is_repository(path: &Path) -> bool {
    path.join(".git").is_dir()
}

/// Immediate subdirectories of `base` that contain a `.git` directory,
/// sorted by name. Traversal never goes deeper than one level.
pub fn list_repositories(base: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !base.is_dir() {
        return Err(RepoDeckError::invalid_base_path(base));
    }

    let mut repos = Vec::new();
    for entry in std::fs::read_dir(base)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry in {}: {e}", base.display());
                continue;
            }
        };
        let path = entry.path();
        if !path.is_dir() || !is_repository(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            repos.push((name.to_string(), path.clone()));
        }
    }

    repos.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(repos)
}
