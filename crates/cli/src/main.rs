//! Market360 CLI - Deal moderation from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List every approved deal
//! m360-cli deals list
//!
//! # List deals awaiting review (needs MARKET_API_TOKEN)
//! m360-cli deals list --status pending
//!
//! # Show one deal, then approve or reject it
//! m360-cli deals show <id>
//! m360-cli deals approve <id>
//! m360-cli deals reject <id>
//! ```
//!
//! # Commands
//!
//! - `deals list` - List deals, optionally by moderation status
//! - `deals show` - Print one deal in full
//! - `deals approve` / `deals reject` - Record a moderation decision

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::deals::{self, DealsError, Session};

#[derive(Parser)]
#[command(name = "m360-cli")]
#[command(author, version, about = "Market360 moderation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and moderate deals
    Deals {
        #[command(subcommand)]
        action: DealsAction,
    },
}

#[derive(Subcommand)]
enum DealsAction {
    /// List deals
    List {
        /// Moderation status (`pending`, `approved`, `rejected`)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show a single deal
    Show {
        /// Deal ID
        id: String,
    },
    /// Approve a pending deal
    Approve {
        /// Deal ID
        id: String,
    },
    /// Reject a pending deal
    Reject {
        /// Deal ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), DealsError> {
    let session = Session::from_env()?;

    match cli.command {
        Commands::Deals { action } => match action {
            DealsAction::List { status } => {
                let found = deals::list(&session, status.as_deref()).await?;
                if found.is_empty() {
                    println!("No deals found");
                }
                for deal in &found {
                    println!("{}", deals::summary_line(deal));
                }
            }
            DealsAction::Show { id } => {
                let deal = deals::show(&session, &id).await?;
                print!("{}", deals::detail(&deal));
            }
            DealsAction::Approve { id } => deals::approve(&session, &id).await?,
            DealsAction::Reject { id } => deals::reject(&session, &id).await?,
        },
    }
    Ok(())
}
