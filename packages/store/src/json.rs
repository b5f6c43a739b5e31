//! Atomic JSON documents.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use missing_streets_street_models::{AuthoritativeIndex, CrowdIndex};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::StoreError;

/// Output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Single line, for large machine-read documents.
    Compact,
    /// Indented, for documents people open.
    Pretty,
}

/// Serializes `value` to `path`, replacing any existing file only once the
/// new document is completely written.
///
/// # Errors
///
/// Returns an error if the file cannot be written or `value` fails to
/// serialize. The destination is untouched in that case.
pub fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    layout: Layout,
) -> Result<(), StoreError> {
    let tmp_path = temp_path(path);
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        crate::paths::ensure_dir(parent).map_err(io_err)?;
    }

    let result = write_to(&tmp_path, value, layout).and_then(|()| {
        std::fs::rename(&tmp_path, path).map_err(io_err)
    });

    if result.is_err() && tmp_path.exists() {
        if let Err(e) = std::fs::remove_file(&tmp_path) {
            log::warn!("Failed to remove {}: {e}", tmp_path.display());
        }
    }

    result
}

fn write_to<T: Serialize + ?Sized>(
    tmp_path: &Path,
    value: &T,
    layout: Layout,
) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: tmp_path.display().to_string(),
        source,
    };
    let json_err = |source| StoreError::Json {
        path: tmp_path.display().to_string(),
        source,
    };

    let mut writer = BufWriter::new(File::create(tmp_path).map_err(io_err)?);
    match layout {
        Layout::Compact => serde_json::to_writer(&mut writer, value).map_err(json_err)?,
        Layout::Pretty => serde_json::to_writer_pretty(&mut writer, value).map_err(json_err)?,
    }
    writer.flush().map_err(io_err)?;
    writer
        .into_inner()
        .map_err(|e| io_err(e.into_error()))?
        .sync_all()
        .map_err(io_err)
}

/// Deserializes a JSON document.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or malformed.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Persists the OSM index.
///
/// # Errors
///
/// See [`write_json`].
pub fn save_crowd_index(path: &Path, index: &CrowdIndex) -> Result<(), StoreError> {
    log::info!(
        "Saving {} OSM streets to {}",
        index.len(),
        path.display()
    );
    write_json(path, index, Layout::Compact)
}

/// Loads a persisted OSM index.
///
/// # Errors
///
/// See [`read_json`].
pub fn load_crowd_index(path: &Path) -> Result<CrowdIndex, StoreError> {
    log::info!("Reading OSM index from {}", path.display());
    read_json(path)
}

/// Persists the authoritative index.
///
/// # Errors
///
/// See [`write_json`].
pub fn save_authoritative_index(
    path: &Path,
    index: &AuthoritativeIndex,
) -> Result<(), StoreError> {
    log::info!(
        "Saving {} authoritative streets to {}",
        index.len(),
        path.display()
    );
    write_json(path, index, Layout::Compact)
}

/// Loads a persisted authoritative index.
///
/// # Errors
///
/// See [`read_json`].
pub fn load_authoritative_index(path: &Path) -> Result<AuthoritativeIndex, StoreError> {
    log::info!("Reading authoritative index from {}", path.display());
    read_json(path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
