//! # verifycert CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use verifycert_cli::certificate::{self, IssueArgs};
use verifycert_cli::issuer::{run_issuer, IssuerArgs};
use verifycert_cli::journal;
use verifycert_cli::ledger;
use verifycert_cli::owner::{run_owner, OwnerArgs};
use verifycert_cli::DEFAULT_LEDGER;
use verifycert_core::{AccountId, CertificateId};

/// VerifyCert registry CLI
///
/// Issues, verifies and revokes non-transferable course completion
/// certificates held in a local ledger file.
#[derive(Parser, Debug)]
#[command(name = "verifycert", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the ledger file.
    #[arg(long, global = true, env = "VERIFYCERT_LEDGER", default_value = DEFAULT_LEDGER)]
    ledger: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new ledger with the given registry owner.
    Init {
        #[arg(long)]
        owner: AccountId,
        /// Overwrite an existing ledger.
        #[arg(long)]
        force: bool,
    },

    /// Issue a certificate to a recipient.
    Issue(IssueArgs),

    /// Print a certificate as JSON.
    Get { id: CertificateId },

    /// Check whether a certificate exists and is valid.
    Verify { id: CertificateId },

    /// Revoke a certificate (registry owner or issuer of record).
    Revoke {
        #[arg(long)]
        caller: AccountId,
        id: CertificateId,
    },

    /// Attempt to move a certificate. Always refused.
    Transfer {
        #[arg(long)]
        caller: AccountId,
        #[arg(long)]
        from: AccountId,
        #[arg(long)]
        to: AccountId,
        id: CertificateId,
    },

    /// List the certificates held by an account.
    Holdings { account: AccountId },

    /// Issuer allow-list administration.
    Issuer(IssuerArgs),

    /// Registry ownership.
    Owner(OwnerArgs),

    /// Print journal entries as JSON lines.
    Events {
        /// Only entries with a sequence number above this.
        #[arg(long, default_value_t = 0)]
        since: u64,
    },

    /// Verify the journal hash chain.
    Audit,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let path = cli.ledger.as_path();
    tracing::debug!(ledger = %path.display(), "verifycert starting");

    let result = match &cli.command {
        Commands::Init { owner, force } => ledger::cmd_init(path, owner, *force),
        Commands::Issue(args) => certificate::cmd_issue(path, args),
        Commands::Get { id } => certificate::cmd_get(path, *id),
        Commands::Verify { id } => certificate::cmd_verify(path, *id),
        Commands::Revoke { caller, id } => certificate::cmd_revoke(path, caller, *id),
        Commands::Transfer {
            caller,
            from,
            to,
            id,
        } => certificate::cmd_transfer(path, caller, from, to, *id),
        Commands::Holdings { account } => certificate::cmd_holdings(path, account),
        Commands::Issuer(args) => run_issuer(args, path),
        Commands::Owner(args) => run_owner(args, path),
        Commands::Events { since } => journal::cmd_events(path, *since),
        Commands::Audit => journal::cmd_audit(path),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
