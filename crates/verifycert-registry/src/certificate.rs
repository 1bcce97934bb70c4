//! # Certificate Record
//!
//! A certificate is written once at issuance. Only `is_valid` ever changes,
//! and only from `true` to `false`. The fields are private with read-only
//! accessors so no caller outside the registry can alter a stored record.

use serde::{Deserialize, Serialize};

use verifycert_core::{
    sha256_digest, AccountId, CanonicalBytes, CanonicalizationError, CertificateId,
    ContentDigest, Timestamp,
};

/// The descriptive fields an issuer supplies for a new certificate.
///
/// `metadata_uri` is opaque: the registry stores it and never parses or
/// fetches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateDetails {
    /// Display name of the recipient.
    pub recipient_name: String,
    /// Name of the completed course.
    pub course_name: String,
    /// Name of the issuing institution.
    pub institution_name: String,
    /// Off-chain metadata location.
    pub metadata_uri: String,
}

impl CertificateDetails {
    /// Convenience constructor.
    pub fn new(
        recipient_name: impl Into<String>,
        course_name: impl Into<String>,
        institution_name: impl Into<String>,
        metadata_uri: impl Into<String>,
    ) -> Self {
        Self {
            recipient_name: recipient_name.into(),
            course_name: course_name.into(),
            institution_name: institution_name.into(),
            metadata_uri: metadata_uri.into(),
        }
    }
}

/// An issued certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    id: CertificateId,
    issuer: AccountId,
    recipient: AccountId,
    recipient_name: String,
    course_name: String,
    institution_name: String,
    metadata_uri: String,
    issue_date: Timestamp,
    is_valid: bool,
}

/// The immutable part of a certificate, hashed for its fingerprint.
#[derive(Serialize)]
struct DigestPreimage<'a> {
    id: CertificateId,
    issuer: &'a AccountId,
    recipient: &'a AccountId,
    recipient_name: &'a str,
    course_name: &'a str,
    institution_name: &'a str,
    metadata_uri: &'a str,
    issue_date: &'a Timestamp,
}

impl Certificate {
    pub(crate) fn issue(
        id: CertificateId,
        issuer: AccountId,
        recipient: AccountId,
        details: CertificateDetails,
        issue_date: Timestamp,
    ) -> Self {
        Self {
            id,
            issuer,
            recipient,
            recipient_name: details.recipient_name,
            course_name: details.course_name,
            institution_name: details.institution_name,
            metadata_uri: details.metadata_uri,
            issue_date,
            is_valid: true,
        }
    }

    /// Mark revoked. One-way; the registry checks validity before calling.
    pub(crate) fn revoke(&mut self) {
        self.is_valid = false;
    }

    /// Sequential identifier.
    pub fn id(&self) -> CertificateId {
        self.id
    }

    /// Account that issued the certificate.
    pub fn issuer(&self) -> AccountId {
        self.issuer
    }

    /// Account the certificate is permanently bound to.
    pub fn recipient(&self) -> AccountId {
        self.recipient
    }

    pub fn recipient_name(&self) -> &str {
        &self.recipient_name
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    pub fn institution_name(&self) -> &str {
        &self.institution_name
    }

    pub fn metadata_uri(&self) -> &str {
        &self.metadata_uri
    }

    /// When the certificate was issued.
    pub fn issue_date(&self) -> Timestamp {
        self.issue_date
    }

    /// `true` until revoked.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// The descriptive fields as supplied at issuance.
    pub fn details(&self) -> CertificateDetails {
        CertificateDetails {
            recipient_name: self.recipient_name.clone(),
            course_name: self.course_name.clone(),
            institution_name: self.institution_name.clone(),
            metadata_uri: self.metadata_uri.clone(),
        }
    }

    /// SHA-256 fingerprint of the immutable fields.
    ///
    /// `is_valid` is excluded: the digest does not change on revocation.
    pub fn digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        let preimage = DigestPreimage {
            id: self.id,
            issuer: &self.issuer,
            recipient: &self.recipient,
            recipient_name: &self.recipient_name,
            course_name: &self.course_name,
            institution_name: &self.institution_name,
            metadata_uri: &self.metadata_uri,
            issue_date: &self.issue_date,
        };
        Ok(sha256_digest(&CanonicalBytes::new(&preimage)?))
    }
}
