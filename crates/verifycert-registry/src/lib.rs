//! # verifycert-registry: The Certificate Registry
//!
//! An append-only registry of non-transferable certificate tokens.
//!
//! - **Registry** (`registry.rs`): [`CertificateRegistry`], the single owner
//!   of all registry state. Every entry point takes the calling account
//!   explicitly and either commits completely or fails with a
//!   [`RegistryError`] and leaves state untouched.
//!
//! - **Certificate** (`certificate.rs`): the immutable certificate record
//!   and its content digest.
//!
//! - **Events** (`event.rs`, `journal.rs`): every committed state change
//!   appends a [`RegistryEvent`] to a hash-chained [`EventJournal`] that
//!   indexers can replay and audit.
//!
//! - **Snapshots** (`snapshot.rs`, `ledger.rs`): full serializable state
//!   with integrity checks on restore, and atomic ledger-file persistence.
//!
//! ## Lifecycle
//!
//! ```text
//! issue ──▶ Valid ──revoke──▶ Revoked (terminal)
//! ```
//!
//! Certificates are bound to their recipient forever. Transfer and approval
//! entry points exist only to reject.

pub mod certificate;
pub mod error;
pub mod event;
pub mod journal;
pub mod ledger;
pub mod registry;
pub mod snapshot;

pub use certificate::{Certificate, CertificateDetails};
pub use error::{RegistryError, SnapshotError};
pub use event::RegistryEvent;
pub use journal::{ChainIntegrity, EventJournal, JournalEntry};
pub use ledger::LedgerError;
pub use registry::CertificateRegistry;
pub use snapshot::{RegistrySnapshot, SNAPSHOT_FORMAT_VERSION};
