//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the two identifier namespaces of the
//! registry: ledger accounts and certificates. Each is a distinct type,
//! so an [`AccountId`] can never be passed where a [`CertificateId`] is
//! expected.
//!
//! ## Account Addresses
//!
//! Accounts are 20-byte addresses rendered as `0x` plus 40 lowercase hex
//! digits. Parsing accepts mixed case but always renders lowercase, so the
//! string form of an account is canonical. The all-zero address is the
//! *null account*: it never owns a certificate and is never an issuer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of an account address in bytes.
pub const ACCOUNT_ID_LEN: usize = 20;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A ledger account identity (issuer, recipient, or registry owner).
///
/// Serializes as its canonical `0x…` string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// The null account (`0x0000…0000`).
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_ID_LEN]);

    /// Construct an account from raw address bytes.
    pub const fn from_bytes(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse an account from its `0x`-prefixed hex form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAccount`] if the prefix is missing,
    /// the length is not 40 hex digits, or a non-hex character is present.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| ValidationError::InvalidAccount(s.to_string()))?;
        if hex.len() != ACCOUNT_ID_LEN * 2 {
            return Err(ValidationError::InvalidAccount(s.to_string()));
        }

        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let hi = hex_value(chunk[0]);
            let lo = hex_value(chunk[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => bytes[i] = (hi << 4) | lo,
                _ => return Err(ValidationError::InvalidAccount(s.to_string())),
            }
        }
        Ok(Self(bytes))
    }

    /// Whether this is the null account.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ACCOUNT_ID_LEN]
    }

    /// Access the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    /// Render the canonical lowercase `0x…` form.
    pub fn to_hex(&self) -> String {
        let digits: String = self.0.iter().map(|b| format!("{b:02x}")).collect();
        format!("0x{digits}")
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountId> for String {
    fn from(account: AccountId) -> Self {
        account.to_hex()
    }
}

// ---------------------------------------------------------------------------
// CertificateId
// ---------------------------------------------------------------------------

/// Sequential certificate identifier. The first certificate is `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateId(u64);

impl CertificateId {
    /// The identifier allocated to the first certificate of a registry.
    pub const FIRST: CertificateId = CertificateId(1);

    /// Wrap a raw identifier.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw numeric value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The identifier after this one, or `None` on overflow.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for CertificateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CertificateId {
    type Err = ValidationError;

    /// Parse a positive decimal identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u64>() {
            Ok(0) | Err(_) => Err(ValidationError::InvalidCertificateId(s.to_string())),
            Ok(v) => Ok(Self(v)),
        }
    }
}

impl From<u64> for CertificateId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
