//! CLI command definitions and dispatch for the `fixit` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod history;
pub mod listing;
pub mod serve;
pub mod token;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Realtime chat between device owners and repair technicians.
#[derive(Parser)]
#[command(name = "fixit", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of `<data dir>/config.toml`.
    #[arg(long, global = true, env = "FIXIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP + WebSocket server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage API tokens for the history endpoint.
    Token {
        #[command(subcommand)]
        action: TokenCommand,
    },

    /// Print the conversation of a listing.
    History {
        /// Listing id.
        listing_id: i64,
    },

    /// Create and inspect listings.
    Listing {
        #[command(subcommand)]
        action: ListingCommand,
    },

    /// Place and accept bids.
    Bid {
        #[command(subcommand)]
        action: BidCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Mint a token for a user. The token is shown once.
    Issue {
        /// User id the token authenticates as.
        #[arg(long)]
        user: i64,
    },

    /// Delete every token of a user.
    Revoke {
        /// User id whose tokens are deleted.
        #[arg(long)]
        user: i64,
    },
}

#[derive(Subcommand)]
pub enum ListingCommand {
    /// Create an open listing.
    Create {
        /// Owner user id.
        #[arg(long)]
        owner: i64,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "other")]
        category: String,

        #[arg(long, default_value = "")]
        image_url: String,
    },

    /// Show a listing with its bids and message count.
    Show {
        /// Listing id.
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BidCommand {
    /// Place a pending bid on an open listing.
    Place {
        #[arg(long)]
        listing: i64,

        /// Repairman user id.
        #[arg(long)]
        repairman: i64,

        /// Offer in minor currency units.
        #[arg(long)]
        amount: i64,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Accept a bid, which opens the chat between owner and repairman.
    Accept {
        #[arg(long)]
        listing: i64,

        #[arg(long)]
        bid: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fixit", "history", "7", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::History { listing_id: 7 }));
    }

    #[test]
    fn serve_flags_are_optional() {
        let cli = Cli::try_parse_from(["fixit", "serve"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: None,
                host: None
            }
        ));
    }
}
