//! # Registry Errors
//!
//! Every failure rejects the whole operation. No variant is ever returned
//! after a partial state change.

use thiserror::Error;

use verifycert_core::{AccountId, CanonicalizationError, CertificateId};

/// Rejection of a registry entry point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Caller lacks permission to issue or to revoke this certificate.
    #[error("account {caller} is not authorized for this operation")]
    UnauthorizedIssuer {
        /// The rejected caller.
        caller: AccountId,
    },

    /// Certificate recipient is the null account.
    #[error("certificate recipient must not be the null account")]
    InvalidRecipient,

    /// No certificate with this id exists.
    #[error("certificate {0} not found")]
    CertificateNotFound(CertificateId),

    /// Certificate was already revoked.
    #[error("certificate {0} is already revoked")]
    CertificateAlreadyRevoked(CertificateId),

    /// Certificates are bound to their recipient; transfers and approvals
    /// are permanently disabled.
    #[error("certificates are non-transferable: {operation} rejected")]
    TransferNotAllowed {
        /// The rejected entry point.
        operation: &'static str,
    },

    /// Caller is not the registry owner.
    #[error("account {caller} is not the registry owner")]
    NotOwner {
        /// The rejected caller.
        caller: AccountId,
    },

    /// Null account supplied where a real account is required.
    #[error("the null account is not a valid {role}")]
    InvalidAccount {
        /// What the account was meant to be (issuer, owner, holder).
        role: &'static str,
    },

    /// The sequential id space is exhausted.
    #[error("certificate id space exhausted")]
    IdSpaceExhausted,

    /// Journal entry could not be hashed.
    #[error("journal error: {0}")]
    Journal(String),
}

impl From<CanonicalizationError> for RegistryError {
    fn from(err: CanonicalizationError) -> Self {
        Self::Journal(err.to_string())
    }
}

/// Rejection of a snapshot during restoration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Snapshot was written by an incompatible format version.
    #[error("unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version this build reads.
        expected: u32,
        /// Version found in the snapshot.
        found: u32,
    },

    /// Registry owner is the null account.
    #[error("snapshot owner is the null account")]
    InvalidOwner,

    /// Certificate ids are not sequential from 1.
    #[error("certificate ids are not sequential: expected {expected}, found {found}")]
    NonSequentialId {
        /// The id expected at this position.
        expected: CertificateId,
        /// The id found.
        found: CertificateId,
    },

    /// `next_id` does not follow the highest certificate id.
    #[error("next id mismatch: expected {expected}, found {found}")]
    NextIdMismatch {
        /// One past the highest certificate id.
        expected: CertificateId,
        /// The recorded next id.
        found: CertificateId,
    },

    /// A certificate names the null account as recipient or issuer.
    #[error("certificate {0} references the null account")]
    NullAccountInCertificate(CertificateId),

    /// The issuer allow-list contains the null account.
    #[error("issuer allow-list contains the null account")]
    NullIssuerEntry,

    /// The journal hash chain is broken.
    #[error("journal chain broken: {broken_links} broken link(s)")]
    JournalBroken {
        /// Number of broken links.
        broken_links: usize,
    },

    /// The journal disagrees with the certificate table.
    #[error("journal does not match certificate table: {0}")]
    JournalMismatch(String),
}
