//! # Ledger Files
//!
//! A ledger file is a pretty-printed JSON [`RegistrySnapshot`]. Writes go
//! to a sibling temporary file first and are renamed over the target, so a
//! reader never observes a half-written ledger.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::SnapshotError;
use crate::registry::CertificateRegistry;
use crate::snapshot::RegistrySnapshot;

/// Failure to read or write a ledger file.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger at {path} is not a valid snapshot document: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("registry state for {path} could not be encoded: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ledger at {path} failed integrity checks: {source}")]
    Integrity {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },
}

/// Load and validate the registry stored at `path`.
pub fn load(path: &Path) -> Result<CertificateRegistry, LedgerError> {
    let bytes = fs::read(path).map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: RegistrySnapshot =
        serde_json::from_slice(&bytes).map_err(|source| LedgerError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let registry =
        CertificateRegistry::from_snapshot(snapshot).map_err(|source| LedgerError::Integrity {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), "ledger loaded");
    Ok(registry)
}

/// Atomically replace the ledger at `path` with the registry's snapshot.
pub fn save(path: &Path, registry: &CertificateRegistry) -> Result<(), LedgerError> {
    let json = serde_json::to_vec_pretty(&registry.snapshot()).map_err(|source| {
        LedgerError::Encode {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let tmp = temp_sibling(path);
    if let Err(source) = write_then_rename(&tmp, path, &json) {
        let _ = fs::remove_file(&tmp);
        return Err(LedgerError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::debug!(path = %path.display(), bytes = json.len(), "ledger saved");
    Ok(())
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "ledger".into());
    name.push(".tmp");
    path.with_file_name(name)
}
