//! # Ledger Handling
//!
//! Loading, saving and initializing the ledger file every subcommand
//! operates on. Mutating commands go through [`mutate`], which saves only
//! when the registry operation succeeded.

use std::path::Path;

use anyhow::{bail, Context, Result};

use verifycert_core::AccountId;
use verifycert_registry::{ledger, CertificateRegistry, RegistryError};

/// Load the registry from `path`.
pub fn open(path: &Path) -> Result<CertificateRegistry> {
    if !path.exists() {
        bail!(
            "ledger not found: {} (run `verifycert init --owner <account>` first)",
            path.display()
        );
    }
    ledger::load(path).with_context(|| format!("failed to load ledger {}", path.display()))
}

/// Run `op` against the ledger at `path` and save the result.
///
/// A rejected operation leaves the file untouched.
pub fn mutate<R>(
    path: &Path,
    op: impl FnOnce(&mut CertificateRegistry) -> Result<R, RegistryError>,
) -> Result<R> {
    let mut registry = open(path)?;
    let result = op(&mut registry)?;
    ledger::save(path, &registry)
        .with_context(|| format!("failed to save ledger {}", path.display()))?;
    Ok(result)
}

/// Create a new ledger owned by `owner`.
///
/// Refuses to replace an existing ledger unless `force` is set.
pub fn cmd_init(path: &Path, owner: &AccountId, force: bool) -> Result<u8> {
    if path.exists() && !force {
        bail!(
            "ledger already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    let registry = CertificateRegistry::new(*owner)?;
    ledger::save(path, &registry)
        .with_context(|| format!("failed to write ledger {}", path.display()))?;

    tracing::info!(path = %path.display(), %owner, "ledger initialized");
    println!("OK: initialized ledger {}", path.display());
    println!("  Owner: {owner}");
    Ok(0)
}
