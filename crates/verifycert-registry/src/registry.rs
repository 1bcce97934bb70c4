//! # Certificate Registry
//!
//! The registry owns every piece of mutable state: the owner, the issuer
//! allow-list, the id counter, the certificate table, the reverse indexes,
//! and the event journal. There are no globals; each registry value is an
//! independent ledger.
//!
//! ## Atomicity
//!
//! Every mutating entry point follows the same three steps:
//!
//! 1. validate all preconditions against current state;
//! 2. append the event to the journal (the only fallible write);
//! 3. apply the state change, which cannot fail.
//!
//! A rejected call therefore leaves no trace, not even a journal entry.
//!
//! ## Authorization
//!
//! | Operation                    | Permitted callers                          |
//! |------------------------------|--------------------------------------------|
//! | `issue`                      | owner, allow-listed issuers                |
//! | `revoke`                     | owner, the certificate's issuer of record  |
//! | `authorize_issuer` / `revoke_issuer` / `transfer_ownership` | owner       |
//! | `transfer_from` / `approve` / `set_approval_for_all` | nobody            |

use std::collections::{BTreeMap, BTreeSet, HashMap};

use verifycert_core::{AccountId, CertificateId, Timestamp};

use crate::certificate::{Certificate, CertificateDetails};
use crate::error::RegistryError;
use crate::event::RegistryEvent;
use crate::journal::{ChainIntegrity, EventJournal, JournalEntry};

/// An append-only registry of non-transferable certificates.
#[derive(Debug, Clone)]
pub struct CertificateRegistry {
    pub(crate) owner: AccountId,
    pub(crate) next_id: CertificateId,
    pub(crate) certificates: BTreeMap<CertificateId, Certificate>,
    pub(crate) issuers: BTreeSet<AccountId>,
    pub(crate) by_issuer: HashMap<AccountId, Vec<CertificateId>>,
    pub(crate) by_recipient: HashMap<AccountId, Vec<CertificateId>>,
    pub(crate) journal: EventJournal,
}

impl CertificateRegistry {
    /// Create an empty registry owned by `owner` (the deployer).
    ///
    /// The journal opens with a `RegistryCreated` entry naming the owner.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidAccount`] if `owner` is the null account.
    pub fn new(owner: AccountId) -> Result<Self, RegistryError> {
        if owner.is_zero() {
            return Err(RegistryError::InvalidAccount { role: "owner" });
        }
        let mut journal = EventJournal::new();
        journal.append(RegistryEvent::RegistryCreated { owner }, Timestamp::now())?;

        tracing::info!(%owner, "registry created");
        Ok(Self {
            owner,
            next_id: CertificateId::FIRST,
            certificates: BTreeMap::new(),
            issuers: BTreeSet::new(),
            by_issuer: HashMap::new(),
            by_recipient: HashMap::new(),
            journal,
        })
    }

    // ── Certificates ────────────────────────────────────────────────────

    /// Issue a certificate to `recipient`, returning its id.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnauthorizedIssuer`] if `caller` is neither the
    ///   owner nor an allow-listed issuer.
    /// - [`RegistryError::InvalidRecipient`] if `recipient` is the null account.
    pub fn issue(
        &mut self,
        caller: &AccountId,
        recipient: &AccountId,
        details: CertificateDetails,
    ) -> Result<CertificateId, RegistryError> {
        if !self.is_authorized_issuer(caller) {
            return Err(RegistryError::UnauthorizedIssuer { caller: *caller });
        }
        if recipient.is_zero() {
            return Err(RegistryError::InvalidRecipient);
        }
        let id = self.next_id;
        let following = id.next().ok_or(RegistryError::IdSpaceExhausted)?;
        let now = Timestamp::now();
        let certificate = Certificate::issue(id, *caller, *recipient, details, now);
        let digest = certificate.digest()?.to_hex();

        self.journal.append(
            RegistryEvent::CertificateIssued {
                id,
                issuer: *caller,
                recipient: *recipient,
                digest,
            },
            now,
        )?;

        self.certificates.insert(id, certificate);
        self.by_issuer.entry(*caller).or_default().push(id);
        self.by_recipient.entry(*recipient).or_default().push(id);
        self.next_id = following;

        tracing::info!(
            certificate_id = %id,
            issuer = %caller,
            recipient = %recipient,
            "certificate issued"
        );
        Ok(id)
    }

    /// Look up a certificate.
    pub fn get(&self, id: CertificateId) -> Result<&Certificate, RegistryError> {
        self.certificates
            .get(&id)
            .ok_or(RegistryError::CertificateNotFound(id))
    }

    /// Whether `id` names an existing, unrevoked certificate.
    ///
    /// Unknown ids are simply not valid; this never fails.
    pub fn verify(&self, id: CertificateId) -> bool {
        self.certificates.get(&id).is_some_and(Certificate::is_valid)
    }

    /// Revoke a certificate. Irreversible.
    ///
    /// Checks run in order: existence, caller permission, validity. A
    /// stranger probing a revoked certificate sees `UnauthorizedIssuer`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::CertificateNotFound`] for unknown ids.
    /// - [`RegistryError::UnauthorizedIssuer`] if `caller` is neither the
    ///   owner nor the certificate's issuer of record.
    /// - [`RegistryError::CertificateAlreadyRevoked`] on a second revocation.
    pub fn revoke(&mut self, caller: &AccountId, id: CertificateId) -> Result<(), RegistryError> {
        let cert = self.get(id)?;
        if *caller != self.owner && *caller != cert.issuer() {
            return Err(RegistryError::UnauthorizedIssuer { caller: *caller });
        }
        if !cert.is_valid() {
            return Err(RegistryError::CertificateAlreadyRevoked(id));
        }

        self.journal
            .append(RegistryEvent::CertificateRevoked { id }, Timestamp::now())?;

        if let Some(cert) = self.certificates.get_mut(&id) {
            cert.revoke();
        }

        tracing::info!(certificate_id = %id, revoked_by = %caller, "certificate revoked");
        Ok(())
    }

    // ── Issuer allow-list ───────────────────────────────────────────────

    /// Add `account` to the issuer allow-list. Owner only; idempotent.
    pub fn authorize_issuer(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        if account.is_zero() {
            return Err(RegistryError::InvalidAccount { role: "issuer" });
        }
        if self.issuers.contains(account) {
            return Ok(());
        }

        self.journal.append(
            RegistryEvent::IssuerAuthorized { account: *account },
            Timestamp::now(),
        )?;
        self.issuers.insert(*account);

        tracing::info!(issuer = %account, "issuer authorized");
        Ok(())
    }

    /// Remove `account` from the issuer allow-list. Owner only; idempotent.
    ///
    /// Certificates the account already issued stay valid, and the account
    /// may still revoke them as issuer of record.
    pub fn revoke_issuer(
        &mut self,
        caller: &AccountId,
        account: &AccountId,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        if account.is_zero() {
            return Err(RegistryError::InvalidAccount { role: "issuer" });
        }
        if !self.issuers.contains(account) {
            return Ok(());
        }

        self.journal.append(
            RegistryEvent::IssuerDeauthorized { account: *account },
            Timestamp::now(),
        )?;
        self.issuers.remove(account);

        tracing::info!(issuer = %account, "issuer deauthorized");
        Ok(())
    }

    /// Whether `account` may issue. The owner always may.
    pub fn is_authorized_issuer(&self, account: &AccountId) -> bool {
        *account == self.owner || self.issuers.contains(account)
    }

    /// The explicit allow-list, sorted. Does not include the owner unless
    /// it was added explicitly.
    pub fn authorized_issuers(&self) -> Vec<AccountId> {
        self.issuers.iter().copied().collect()
    }

    // ── Registry ownership ──────────────────────────────────────────────

    /// The registry owner.
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Hand registry ownership to `new_owner`. Owner only.
    pub fn transfer_ownership(
        &mut self,
        caller: &AccountId,
        new_owner: &AccountId,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(RegistryError::InvalidAccount { role: "owner" });
        }

        self.journal.append(
            RegistryEvent::OwnershipTransferred {
                previous_owner: self.owner,
                new_owner: *new_owner,
            },
            Timestamp::now(),
        )?;
        let previous = std::mem::replace(&mut self.owner, *new_owner);

        tracing::info!(previous_owner = %previous, new_owner = %new_owner, "registry ownership transferred");
        Ok(())
    }

    fn require_owner(&self, caller: &AccountId) -> Result<(), RegistryError> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(RegistryError::NotOwner { caller: *caller })
        }
    }

    // ── Token ledger ────────────────────────────────────────────────────

    /// The account holding certificate `id`: always its original recipient.
    pub fn owner_of(&self, id: CertificateId) -> Result<AccountId, RegistryError> {
        self.get(id).map(Certificate::recipient)
    }

    /// Number of certificates held by `account`, revoked ones included.
    pub fn balance_of(&self, account: &AccountId) -> Result<usize, RegistryError> {
        if account.is_zero() {
            return Err(RegistryError::InvalidAccount { role: "holder" });
        }
        Ok(self.by_recipient.get(account).map_or(0, Vec::len))
    }

    /// The certificate's metadata URI.
    pub fn token_uri(&self, id: CertificateId) -> Result<&str, RegistryError> {
        self.get(id).map(Certificate::metadata_uri)
    }

    /// Total certificates ever issued.
    pub fn total_supply(&self) -> usize {
        self.certificates.len()
    }

    /// The id the next successful `issue` will allocate.
    pub fn next_id(&self) -> CertificateId {
        self.next_id
    }

    /// The approved operator for `id`: always the null account.
    pub fn get_approved(&self, id: CertificateId) -> Result<AccountId, RegistryError> {
        self.get(id).map(|_| AccountId::ZERO)
    }

    /// Whether `operator` may manage all of `holder`'s certificates: never.
    pub fn is_approved_for_all(&self, _holder: &AccountId, _operator: &AccountId) -> bool {
        false
    }

    /// Ids issued by `issuer`, in issuance order.
    pub fn certificates_by_issuer(&self, issuer: &AccountId) -> &[CertificateId] {
        self.by_issuer.get(issuer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids held by `recipient`, in issuance order.
    pub fn certificates_by_recipient(&self, recipient: &AccountId) -> &[CertificateId] {
        self.by_recipient.get(recipient).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All certificates in id order.
    pub fn certificates(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.values()
    }

    // ── Transfer blocking ───────────────────────────────────────────────
    //
    // These take `&self`: there is no code path from them to a mutation.

    /// Always fails with [`RegistryError::TransferNotAllowed`].
    pub fn transfer_from(
        &self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        id: CertificateId,
    ) -> Result<(), RegistryError> {
        tracing::warn!(%caller, %from, %to, certificate_id = %id, "transfer rejected");
        Err(RegistryError::TransferNotAllowed {
            operation: "transfer_from",
        })
    }

    /// Always fails with [`RegistryError::TransferNotAllowed`].
    pub fn safe_transfer_from(
        &self,
        caller: &AccountId,
        from: &AccountId,
        to: &AccountId,
        id: CertificateId,
    ) -> Result<(), RegistryError> {
        tracing::warn!(%caller, %from, %to, certificate_id = %id, "safe transfer rejected");
        Err(RegistryError::TransferNotAllowed {
            operation: "safe_transfer_from",
        })
    }

    /// Always fails with [`RegistryError::TransferNotAllowed`].
    pub fn approve(
        &self,
        caller: &AccountId,
        approved: &AccountId,
        id: CertificateId,
    ) -> Result<(), RegistryError> {
        tracing::warn!(%caller, %approved, certificate_id = %id, "approval rejected");
        Err(RegistryError::TransferNotAllowed {
            operation: "approve",
        })
    }

    /// Always fails with [`RegistryError::TransferNotAllowed`].
    pub fn set_approval_for_all(
        &self,
        caller: &AccountId,
        operator: &AccountId,
        approved: bool,
    ) -> Result<(), RegistryError> {
        tracing::warn!(%caller, %operator, approved, "operator approval rejected");
        Err(RegistryError::TransferNotAllowed {
            operation: "set_approval_for_all",
        })
    }

    // ── Journal ─────────────────────────────────────────────────────────

    /// Every committed event, in order.
    pub fn events(&self) -> &[JournalEntry] {
        self.journal.entries()
    }

    /// Events committed after journal sequence `sequence`.
    pub fn events_since(&self, sequence: u64) -> &[JournalEntry] {
        self.journal.since(sequence)
    }

    /// Recompute the journal hash chain.
    pub fn verify_journal(&self) -> ChainIntegrity {
        self.journal.verify()
    }
}
