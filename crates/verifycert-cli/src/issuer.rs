//! # Issuer Subcommands
//!
//! Administration of the issuer allow-list. Mutations require the
//! registry owner as `--caller`.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use verifycert_core::AccountId;

use crate::ledger;

/// Arguments for `verifycert issuer`.
#[derive(Args, Debug)]
pub struct IssuerArgs {
    #[command(subcommand)]
    pub command: IssuerCommand,
}

#[derive(Subcommand, Debug)]
pub enum IssuerCommand {
    /// Add an account to the allow-list.
    Authorize {
        /// Registry owner.
        #[arg(long)]
        caller: AccountId,
        /// Account to authorize.
        account: AccountId,
    },
    /// Remove an account from the allow-list.
    Revoke {
        /// Registry owner.
        #[arg(long)]
        caller: AccountId,
        /// Account to deauthorize.
        account: AccountId,
    },
    /// Print the explicit allow-list.
    List,
    /// Report whether an account may issue (exit 1 if not).
    Check {
        /// Account to check.
        account: AccountId,
    },
}

pub fn run_issuer(args: &IssuerArgs, path: &Path) -> Result<u8> {
    match &args.command {
        IssuerCommand::Authorize { caller, account } => {
            ledger::mutate(path, |r| r.authorize_issuer(caller, account))?;
            println!("OK: authorized issuer {account}");
            Ok(0)
        }
        IssuerCommand::Revoke { caller, account } => {
            ledger::mutate(path, |r| r.revoke_issuer(caller, account))?;
            println!("OK: deauthorized issuer {account}");
            Ok(0)
        }
        IssuerCommand::List => cmd_list(path),
        IssuerCommand::Check { account } => cmd_check(path, account),
    }
}

fn cmd_list(path: &Path) -> Result<u8> {
    let registry = ledger::open(path)?;
    let issuers = registry.authorized_issuers();
    println!("Owner (implicit issuer): {}", registry.owner());
    println!("Authorized issuers: {}", issuers.len());
    for issuer in issuers {
        println!("  {issuer}");
    }
    Ok(0)
}

fn cmd_check(path: &Path, account: &AccountId) -> Result<u8> {
    let registry = ledger::open(path)?;
    if registry.is_authorized_issuer(account) {
        println!("AUTHORIZED: {account}");
        Ok(0)
    } else {
        println!("NOT AUTHORIZED: {account}");
        Ok(1)
    }
}
