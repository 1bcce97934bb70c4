//! # Owner Subcommands

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use verifycert_core::AccountId;

use crate::ledger;

/// Arguments for `verifycert owner`.
#[derive(Args, Debug)]
pub struct OwnerArgs {
    #[command(subcommand)]
    pub command: OwnerCommand,
}

#[derive(Subcommand, Debug)]
pub enum OwnerCommand {
    /// Print the registry owner and a summary of the ledger.
    Show,
    /// Hand registry ownership to another account.
    Transfer {
        /// Current registry owner.
        #[arg(long)]
        caller: AccountId,
        /// Account receiving ownership.
        new_owner: AccountId,
    },
}

pub fn run_owner(args: &OwnerArgs, path: &Path) -> Result<u8> {
    match &args.command {
        OwnerCommand::Show => {
            let registry = ledger::open(path)?;
            println!("Owner: {}", registry.owner());
            println!("  Certificates issued: {}", registry.total_supply());
            println!("  Next id: {}", registry.next_id());
            println!("  Authorized issuers: {}", registry.authorized_issuers().len());
            println!("  Journal entries: {}", registry.events().len());
            Ok(0)
        }
        OwnerCommand::Transfer { caller, new_owner } => {
            ledger::mutate(path, |r| r.transfer_ownership(caller, new_owner))?;
            println!("OK: registry ownership transferred to {new_owner}");
            Ok(0)
        }
    }
}
