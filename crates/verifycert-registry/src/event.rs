//! # Registry Events
//!
//! Notifications emitted by committed state changes, consumed by external
//! indexers through the journal.

use serde::{Deserialize, Serialize};

use verifycert_core::{AccountId, CertificateId};

/// A committed registry state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RegistryEvent {
    /// The registry was created. Always the first journal entry.
    RegistryCreated { owner: AccountId },
    /// A certificate was issued. `digest` is the hex SHA-256 of its content.
    CertificateIssued {
        id: CertificateId,
        issuer: AccountId,
        recipient: AccountId,
        digest: String,
    },
    /// A certificate was revoked.
    CertificateRevoked { id: CertificateId },
    /// An account was added to the issuer allow-list.
    IssuerAuthorized { account: AccountId },
    /// An account was removed from the issuer allow-list.
    IssuerDeauthorized { account: AccountId },
    /// Registry ownership moved to a new account.
    OwnershipTransferred {
        previous_owner: AccountId,
        new_owner: AccountId,
    },
}

impl RegistryEvent {
    /// The event name as indexers see it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegistryCreated { .. } => "RegistryCreated",
            Self::CertificateIssued { .. } => "CertificateIssued",
            Self::CertificateRevoked { .. } => "CertificateRevoked",
            Self::IssuerAuthorized { .. } => "IssuerAuthorized",
            Self::IssuerDeauthorized { .. } => "IssuerDeauthorized",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }

    /// The certificate this event concerns, if any.
    pub fn certificate_id(&self) -> Option<CertificateId> {
        match self {
            Self::CertificateIssued { id, .. } | Self::CertificateRevoked { id } => Some(*id),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
