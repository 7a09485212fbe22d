//! Fixit chat server and CLI entry point.
//!
//! Binary name: `fixit`
//!
//! Parses CLI arguments, loads configuration, initializes tracing and the
//! database, then dispatches to the command handler or starts the server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{BidCommand, Cli, Commands, ListingCommand, TokenCommand};
use fixit_infra::config::load_server_config;
use fixit_infra::filesystem::resolve_data_dir;
use fixit_types::listing::{NewBid, NewListing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "fixit", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let (mut config, config_error) = load_server_config(&data_dir, cli.config.as_deref()).await;

    // Set up tracing based on verbosity; RUST_LOG wins when set.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,fixit_core=debug,fixit_api=debug",
        _ => "trace",
    };
    fixit_observe::tracing_setup::init_tracing(filter, config.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    if let Some(err) = config_error {
        tracing::warn!("{err}, using defaults");
    }

    if let Commands::Serve { port, host } = &cli.command {
        if let Some(port) = port {
            config.port = *port;
        }
        if let Some(host) = host {
            config.host = host.clone();
        }
    }

    let state = AppState::init(data_dir, config).await?;

    let result = match cli.command {
        Commands::Serve { .. } => cli::serve::run(state, cli.quiet).await,

        Commands::Token { action } => match action {
            TokenCommand::Issue { user } => cli::token::issue_token(&state, user, cli.json).await,
            TokenCommand::Revoke { user } => {
                cli::token::revoke_tokens(&state, user, cli.json).await
            }
        },

        Commands::History { listing_id } => {
            cli::history::show_history(&state, listing_id, cli.json).await
        }

        Commands::Listing { action } => match action {
            ListingCommand::Create {
                owner,
                title,
                description,
                category,
                image_url,
            } => {
                let new = NewListing {
                    owner_id: owner,
                    title,
                    description,
                    category,
                    image_url,
                };
                cli::listing::create_listing(&state, new, cli.json).await
            }
            ListingCommand::Show { id } => cli::listing::show_listing(&state, id, cli.json).await,
        },

        Commands::Bid { action } => match action {
            BidCommand::Place {
                listing,
                repairman,
                amount,
                comment,
            } => {
                let new = NewBid {
                    listing_id: listing,
                    repairman_id: repairman,
                    amount,
                    comment,
                };
                cli::listing::place_bid(&state, new, cli.json).await
            }
            BidCommand::Accept { listing, bid } => {
                cli::listing::accept_bid(&state, listing, bid, cli.json).await
            }
        },

        Commands::Completions { .. } => unreachable!("handled above"),
    };

    fixit_observe::tracing_setup::shutdown_tracing();
    result
}
