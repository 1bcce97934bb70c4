//! # Certificate Subcommands
//!
//! `issue`, `get`, `verify`, `revoke`, `transfer` and `holdings`.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use verifycert_core::{AccountId, CertificateId};
use verifycert_registry::{Certificate, CertificateDetails};

use crate::ledger;

/// Arguments for `verifycert issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Issuing account (owner or authorized issuer).
    #[arg(long)]
    pub caller: AccountId,
    /// Account the certificate is bound to.
    #[arg(long)]
    pub recipient: AccountId,
    /// Display name of the recipient.
    #[arg(long)]
    pub recipient_name: String,
    /// Name of the completed course.
    #[arg(long)]
    pub course: String,
    /// Name of the issuing institution.
    #[arg(long)]
    pub institution: String,
    /// Off-chain metadata location.
    #[arg(long)]
    pub metadata_uri: String,
}

/// JSON view of a certificate, printed by `get`.
#[derive(Debug, Serialize)]
struct CertificateView<'a> {
    #[serde(flatten)]
    certificate: &'a Certificate,
    digest: String,
}

/// Issue a certificate and print its id.
pub fn cmd_issue(path: &Path, args: &IssueArgs) -> Result<u8> {
    let details = CertificateDetails::new(
        &args.recipient_name,
        &args.course,
        &args.institution,
        &args.metadata_uri,
    );
    let id = ledger::mutate(path, |r| r.issue(&args.caller, &args.recipient, details))?;
    println!("OK: issued certificate {id}");
    println!("  Recipient: {}", args.recipient);
    Ok(0)
}

/// Print a certificate as JSON.
pub fn cmd_get(path: &Path, id: CertificateId) -> Result<u8> {
    let registry = ledger::open(path)?;
    let certificate = registry.get(id)?;
    let view = CertificateView {
        certificate,
        digest: certificate.digest()?.to_string(),
    };
    let json = serde_json::to_string_pretty(&view).context("failed to render certificate")?;
    tracing::debug!(certificate_id = %id, "certificate read");
    println!("{json}");
    Ok(0)
}

/// Print `VALID` (exit 0) or `INVALID` (exit 1).
pub fn cmd_verify(path: &Path, id: CertificateId) -> Result<u8> {
    let registry = ledger::open(path)?;
    if registry.verify(id) {
        println!("VALID: certificate {id}");
        Ok(0)
    } else {
        println!("INVALID: certificate {id}");
        Ok(1)
    }
}

/// Revoke a certificate.
pub fn cmd_revoke(path: &Path, caller: &AccountId, id: CertificateId) -> Result<u8> {
    ledger::mutate(path, |r| r.revoke(caller, id))?;
    println!("OK: revoked certificate {id}");
    Ok(0)
}

/// Attempt a transfer. Always fails: certificates are bound to their recipient.
pub fn cmd_transfer(
    path: &Path,
    caller: &AccountId,
    from: &AccountId,
    to: &AccountId,
    id: CertificateId,
) -> Result<u8> {
    let registry = ledger::open(path)?;
    registry.transfer_from(caller, from, to, id)?;
    Ok(0)
}

/// List the certificates held by `account`.
pub fn cmd_holdings(path: &Path, account: &AccountId) -> Result<u8> {
    let registry = ledger::open(path)?;
    let balance = registry.balance_of(account)?;
    println!("{account}: {balance} certificate(s)");
    for id in registry.certificates_by_recipient(account) {
        let cert = registry.get(*id)?;
        let status = if cert.is_valid() { "valid" } else { "revoked" };
        println!(
            "  #{id} {} ({}) [{status}]",
            cert.course_name(),
            cert.institution_name()
        );
    }
    Ok(0)
}
