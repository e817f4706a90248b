//! Model-asset provisioning.
//!
//! Landmark engines load a single binary model file from disk. The file is
//! resolved once at startup: an existing path wins, otherwise the asset is
//! downloaded to that path. Download goes to a `.part` sibling first and is
//! renamed into place so a killed process never leaves a truncated model.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Make sure the model file exists at `path`, downloading from `url` when it
/// does not. Returns the resolved path.
pub fn ensure_present(path: &Path, url: &str) -> Result<PathBuf, ModelError> {
    if path.exists() {
        log::debug!("model asset already present at {}", path.display());
        return Ok(path.to_path_buf());
    }

    log::info!("downloading model asset from {}", url);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ModelError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }
    download(url, path)?;
    Ok(path.to_path_buf())
}

fn download(url: &str, dest: &Path) -> Result<(), ModelError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelError::Download {
            url: url.to_string(),
            source: e,
        })?;
    let bytes = response.bytes().map_err(|e| ModelError::Download {
        url: url.to_string(),
        source: e,
    })?;

    let temp_path = dest.with_extension("part");
    let write_err = |e| ModelError::Write {
        path: temp_path.clone(),
        source: e,
    };
    let mut file = fs::File::create(&temp_path).map_err(write_err)?;
    file.write_all(&bytes).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(&temp_path, dest).map_err(|e| ModelError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;
    log::info!("model asset saved to {} ({} bytes)", dest.display(), bytes.len());
    Ok(())
}
