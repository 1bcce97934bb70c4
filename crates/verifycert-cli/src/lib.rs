//! # verifycert-cli : Command-Line Interface for VerifyCert
//!
//! Provides the `verifycert` command, which operates a
//! [`CertificateRegistry`](verifycert_registry::CertificateRegistry) stored
//! in a local ledger file. Every invocation loads the ledger, runs one
//! registry operation as the account given by `--caller`, and writes the
//! ledger back only if the operation succeeded.
//!
//! ## Subcommands
//!
//! - `verifycert init` : Create a ledger with a registry owner.
//! - `verifycert issue | get | verify | revoke | transfer | holdings` : Certificates.
//! - `verifycert issuer` : Issuer allow-list administration.
//! - `verifycert owner` : Registry ownership.
//! - `verifycert events | audit` : Event journal feed and chain audit.
//!
//! ```bash
//! verifycert init --owner 0x00000000000000000000000000000000000000a0
//! verifycert issuer authorize --caller 0x…a0 0x…b1
//! verifycert issue --caller 0x…b1 --recipient 0x…c2 \
//!     --recipient-name "Jane Doe" --course "Course X" \
//!     --institution "Inst Y" --metadata-uri uri://1
//! verifycert verify 1
//! ```
//!
//! Exit status is 0 on success and 1 on any failure, including `verify`
//! of a certificate that is not valid.

pub mod certificate;
pub mod issuer;
pub mod journal;
pub mod ledger;
pub mod owner;

/// Default ledger file, relative to the working directory.
pub const DEFAULT_LEDGER: &str = "verifycert-ledger.json";
