//! # verifycert-core: Foundational Types
//!
//! The leaf of the VerifyCert crate graph. Defines the primitives every
//! other crate builds on: ledger account identities, certificate
//! identifiers, UTC timestamps, and the canonical-bytes digest pipeline.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for identifiers.** `AccountId` and `CertificateId` are
//!    distinct types with validated parsing. An account can never be passed
//!    where a certificate id is expected.
//!
//! 2. **The null account is explicit.** `AccountId::ZERO` is the only way to
//!    name it, and `is_zero()` is the only way to test for it.
//!
//! 3. **`CanonicalBytes` newtype.** Every digest flows through
//!    `CanonicalBytes::new()` (JCS, RFC 8785). `sha256_digest()` accepts
//!    nothing else.
//!
//! 4. **UTC-only timestamps** with seconds precision.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `verifycert-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm, ZERO_HASH_HEX};
pub use error::{CanonicalizationError, ValidationError, VerifyCertError};
pub use identity::{AccountId, CertificateId, ACCOUNT_ID_LEN};
pub use temporal::Timestamp;
