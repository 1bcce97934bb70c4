//! # Registry Snapshots
//!
//! A [`RegistrySnapshot`] is the complete serializable state of a
//! [`CertificateRegistry`]. Reverse indexes are derived data and are not
//! stored; they are rebuilt on restore.
//!
//! Restoring never trusts the input. [`CertificateRegistry::from_snapshot()`]
//! checks the invariants a live registry maintains and cross-checks the
//! journal against the tables, so a hand-edited ledger file is rejected
//! rather than loaded.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use verifycert_core::{AccountId, CertificateId};

use crate::certificate::Certificate;
use crate::error::SnapshotError;
use crate::event::RegistryEvent;
use crate::journal::{EventJournal, JournalEntry};
use crate::registry::CertificateRegistry;

/// Current snapshot format version.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serializable registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub format_version: u32,
    pub owner: AccountId,
    pub next_id: CertificateId,
    /// Certificates in id order.
    pub certificates: Vec<Certificate>,
    /// Explicit issuer allow-list, sorted.
    pub issuers: Vec<AccountId>,
    pub journal: Vec<JournalEntry>,
}

impl CertificateRegistry {
    /// Capture the full registry state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            owner: self.owner,
            next_id: self.next_id,
            certificates: self.certificates.values().cloned().collect(),
            issuers: self.issuers.iter().copied().collect(),
            journal: self.journal.entries().to_vec(),
        }
    }

    /// Rebuild a registry from a snapshot, validating it first.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] describing the first violated invariant.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self, SnapshotError> {
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                expected: SNAPSHOT_FORMAT_VERSION,
                found: snapshot.format_version,
            });
        }
        if snapshot.owner.is_zero() {
            return Err(SnapshotError::InvalidOwner);
        }

        let mut certificates = BTreeMap::new();
        let mut by_issuer: HashMap<AccountId, Vec<CertificateId>> = HashMap::new();
        let mut by_recipient: HashMap<AccountId, Vec<CertificateId>> = HashMap::new();
        let mut expected = CertificateId::FIRST;

        for cert in snapshot.certificates {
            if cert.id() != expected {
                return Err(SnapshotError::NonSequentialId {
                    expected,
                    found: cert.id(),
                });
            }
            if cert.issuer().is_zero() || cert.recipient().is_zero() {
                return Err(SnapshotError::NullAccountInCertificate(cert.id()));
            }
            by_issuer.entry(cert.issuer()).or_default().push(cert.id());
            by_recipient.entry(cert.recipient()).or_default().push(cert.id());
            // Overflow here means u64::MAX certificates; next_id cannot match.
            expected = cert.id().next().unwrap_or(cert.id());
            certificates.insert(cert.id(), cert);
        }

        if snapshot.next_id != expected {
            return Err(SnapshotError::NextIdMismatch {
                expected,
                found: snapshot.next_id,
            });
        }

        let issuers: BTreeSet<AccountId> = snapshot.issuers.into_iter().collect();
        if issuers.contains(&AccountId::ZERO) {
            return Err(SnapshotError::NullIssuerEntry);
        }

        let journal = EventJournal::from_entries(snapshot.journal);
        let integrity = journal.verify();
        if !integrity.valid {
            return Err(SnapshotError::JournalBroken {
                broken_links: integrity.broken_links,
            });
        }
        check_journal_replay(&journal, &certificates, &issuers, &snapshot.owner)?;

        tracing::debug!(
            certificates = certificates.len(),
            issuers = issuers.len(),
            events = journal.len(),
            "registry restored from snapshot"
        );

        Ok(Self {
            owner: snapshot.owner,
            next_id: snapshot.next_id,
            certificates,
            issuers,
            by_issuer,
            by_recipient,
            journal,
        })
    }
}

/// Replay the journal and compare the result with the stored tables.
///
/// The journal is the authority: the owner must follow from
/// `RegistryCreated` and every ownership transfer, and each certificate
/// must hash to the digest recorded when it was issued.
fn check_journal_replay(
    journal: &EventJournal,
    certificates: &BTreeMap<CertificateId, Certificate>,
    issuers: &BTreeSet<AccountId>,
    owner: &AccountId,
) -> Result<(), SnapshotError> {
    let mut entries = journal.entries().iter();
    let mut current_owner = match entries.next().map(|e| &e.event) {
        Some(RegistryEvent::RegistryCreated { owner }) => *owner,
        _ => {
            return Err(SnapshotError::JournalMismatch(
                "journal does not open with the registry creation".to_string(),
            ))
        }
    };

    let mut issued: Vec<(CertificateId, AccountId, AccountId, &str)> = Vec::new();
    let mut revoked: BTreeSet<CertificateId> = BTreeSet::new();
    let mut replayed_issuers: BTreeSet<AccountId> = BTreeSet::new();

    for entry in entries {
        match &entry.event {
            RegistryEvent::RegistryCreated { .. } => {
                return Err(SnapshotError::JournalMismatch(format!(
                    "registry created again at entry {}",
                    entry.sequence
                )));
            }
            RegistryEvent::CertificateIssued {
                id,
                issuer,
                recipient,
                digest,
            } => issued.push((*id, *issuer, *recipient, digest.as_str())),
            RegistryEvent::CertificateRevoked { id } => {
                if !revoked.insert(*id) {
                    return Err(SnapshotError::JournalMismatch(format!(
                        "certificate {id} revoked twice"
                    )));
                }
            }
            RegistryEvent::IssuerAuthorized { account } => {
                replayed_issuers.insert(*account);
            }
            RegistryEvent::IssuerDeauthorized { account } => {
                replayed_issuers.remove(account);
            }
            RegistryEvent::OwnershipTransferred {
                previous_owner,
                new_owner,
            } => {
                if *previous_owner != current_owner {
                    return Err(SnapshotError::JournalMismatch(format!(
                        "ownership transfer at entry {} starts from {previous_owner}, \
                         owner was {current_owner}",
                        entry.sequence
                    )));
                }
                current_owner = *new_owner;
            }
        }
    }

    if current_owner != *owner {
        return Err(SnapshotError::JournalMismatch(format!(
            "journal names {current_owner} as owner, snapshot names {owner}"
        )));
    }

    if issued.len() != certificates.len() {
        return Err(SnapshotError::JournalMismatch(format!(
            "{} issuance event(s) for {} certificate(s)",
            issued.len(),
            certificates.len()
        )));
    }
    for ((id, issuer, recipient, digest), cert) in issued.iter().zip(certificates.values()) {
        if *id != cert.id() || *issuer != cert.issuer() || *recipient != cert.recipient() {
            return Err(SnapshotError::JournalMismatch(format!(
                "issuance event for certificate {id} disagrees with the stored record"
            )));
        }
        let stored = cert
            .digest()
            .map_err(|e| SnapshotError::JournalMismatch(format!("certificate {id}: {e}")))?;
        if stored.to_hex() != *digest {
            return Err(SnapshotError::JournalMismatch(format!(
                "certificate {id} content does not match its issuance digest"
            )));
        }
    }

    let invalid: BTreeSet<CertificateId> = certificates
        .values()
        .filter(|c| !c.is_valid())
        .map(Certificate::id)
        .collect();
    if invalid != revoked {
        return Err(SnapshotError::JournalMismatch(
            "revocation events disagree with certificate validity".to_string(),
        ));
    }

    if replayed_issuers != *issuers {
        return Err(SnapshotError::JournalMismatch(
            "issuer events disagree with the issuer allow-list".to_string(),
        ));
    }

    Ok(())
}
