//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The registry sits behind a `parking_lot::RwLock`. Handlers only ever
//! hold the lock for a synchronous registry call, never across `.await`,
//! so reads run concurrently and writes are serialized.
//!
//! When a ledger path is configured, every successful mutation is written
//! to disk before the lock is released. A failed write restores the
//! in-memory registry to its state before the mutation, so memory and disk
//! never disagree about a committed operation.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use verifycert_core::AccountId;
use verifycert_registry::{ledger, CertificateRegistry, LedgerError, RegistryError};

use crate::error::AppError;

// -- Configuration ------------------------------------------------------------

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token`.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared bearer secret. If `None`, the service runs in development
    /// mode and trusts the account named in the token.
    pub auth_token: Option<String>,
    /// Owner of a freshly created registry. Ignored when a ledger exists.
    pub registry_owner: Option<AccountId>,
    /// Ledger file for persistence. If `None`, state lives in memory only.
    pub ledger_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("registry_owner", &self.registry_owner)
            .field("ledger_path", &self.ledger_path)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            registry_owner: None,
            ledger_path: None,
        }
    }
}

/// Invalid environment configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("PORT must be a port number, got '{0}'")]
    InvalidPort(String),

    #[error("REGISTRY_OWNER is not a valid account: {0}")]
    InvalidOwner(String),
}

impl AppConfig {
    /// Read configuration from `PORT`, `AUTH_TOKEN`, `REGISTRY_OWNER` and
    /// `LEDGER_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::InvalidPort(p))?,
            None => 8080,
        };
        let auth_token = lookup("AUTH_TOKEN").filter(|t| !t.is_empty());
        let registry_owner = lookup("REGISTRY_OWNER")
            .map(|o| AccountId::parse(&o).map_err(|e| ConfigError::InvalidOwner(e.to_string())))
            .transpose()?;
        let ledger_path = lookup("LEDGER_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            port,
            auth_token,
            registry_owner,
            ledger_path,
        })
    }
}

// -- State --------------------------------------------------------------------

/// Failure to assemble the application state at startup.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("REGISTRY_OWNER is required when no ledger exists")]
    MissingOwner,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    registry: Arc<RwLock<CertificateRegistry>>,
    pub config: AppConfig,
}

impl AppState {
    /// Wrap an existing registry.
    pub fn new(registry: CertificateRegistry, config: AppConfig) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            config,
        }
    }

    /// Load the registry from the configured ledger, or create a new one
    /// owned by `registry_owner` (writing the ledger if a path is set).
    pub fn open(config: AppConfig) -> Result<Self, StateError> {
        let registry = match &config.ledger_path {
            Some(path) if path.exists() => {
                let registry = ledger::load(path)?;
                tracing::info!(
                    path = %path.display(),
                    certificates = registry.total_supply(),
                    "registry loaded from ledger"
                );
                registry
            }
            ledger_path => {
                let owner = config.registry_owner.ok_or(StateError::MissingOwner)?;
                let registry = CertificateRegistry::new(owner)?;
                if let Some(path) = ledger_path {
                    ledger::save(path, &registry)?;
                }
                tracing::info!(%owner, "created new registry");
                registry
            }
        };
        Ok(Self::new(registry, config))
    }

    /// Run a read-only registry query under the shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&CertificateRegistry) -> R) -> R {
        f(&*self.registry.read())
    }

    /// Run a registry mutation under the exclusive lock and persist it.
    ///
    /// Registry rejections pass through unchanged. If persisting fails the
    /// registry is restored and an internal error is returned.
    pub fn mutate<R>(
        &self,
        f: impl FnOnce(&mut CertificateRegistry) -> Result<R, RegistryError>,
    ) -> Result<R, AppError> {
        let mut registry = self.registry.write();

        let Some(path) = &self.config.ledger_path else {
            return f(&mut *registry).map_err(AppError::from);
        };

        let backup = registry.clone();
        let result = f(&mut *registry)?;
        if let Err(err) = ledger::save(path, &registry) {
            *registry = backup;
            tracing::error!(error = %err, "ledger write failed; mutation rolled back");
            return Err(AppError::Internal(err.to_string()));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const OWNER: &str = "0x00000000000000000000000000000000000000a0";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn config_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.auth_token.is_none());
        assert!(config.registry_owner.is_none());
        assert!(config.ledger_path.is_none());
    }

    #[test]
    fn config_reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("AUTH_TOKEN", "s3cret"),
            ("REGISTRY_OWNER", OWNER),
            ("LEDGER_PATH", "/var/lib/verifycert/ledger.json"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
        assert_eq!(config.registry_owner.unwrap().to_string(), OWNER);
        assert!(config.ledger_path.is_some());
    }

    #[test]
    fn config_rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("REGISTRY_OWNER", "alice")])),
            Err(ConfigError::InvalidOwner(_))
        ));
    }

    #[test]
    fn config_debug_redacts_token() {
        let config = AppConfig {
            auth_token: Some("s3cret".into()),
            ..AppConfig::default()
        };
        assert!(!format!("{config:?}").contains("s3cret"));
    }

    #[test]
    fn open_requires_owner_without_ledger() {
        assert!(matches!(
            AppState::open(AppConfig::default()),
            Err(StateError::MissingOwner)
        ));
    }

    #[test]
    fn open_creates_then_reloads_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let owner = AccountId::parse(OWNER).unwrap();
        let config = AppConfig {
            registry_owner: Some(owner),
            ledger_path: Some(path.clone()),
            ..AppConfig::default()
        };

        let state = AppState::open(config.clone()).unwrap();
        assert!(path.exists());
        state
            .mutate(|r| r.authorize_issuer(&owner, &AccountId::from_bytes([7u8; 20])))
            .unwrap();

        let reopened = AppState::open(AppConfig {
            registry_owner: None,
            ..config
        })
        .unwrap();
        assert_eq!(reopened.read(|r| r.authorized_issuers().len()), 1);
    }

    #[test]
    fn failed_persist_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let owner = AccountId::parse(OWNER).unwrap();
        let config = AppConfig {
            ledger_path: Some(dir.path().join("missing-dir").join("ledger.json")),
            ..AppConfig::default()
        };
        let state = AppState::new(CertificateRegistry::new(owner).unwrap(), config);

        let err = state
            .mutate(|r| r.authorize_issuer(&owner, &AccountId::from_bytes([7u8; 20])))
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(state.read(|r| r.authorized_issuers().is_empty()));
        assert_eq!(state.read(|r| r.events().len()), 1);
    }
}
