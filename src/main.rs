//! CineDeck - browse, search and bookmark movies
//!
//! # Usage
//!
//! ```bash
//! cinedeck search "blade runner"
//! cinedeck discover Comedy --json
//! cinedeck info 550 --toggle-favorite
//! cinedeck favorites
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cinedeck::cli::{Cli, Command, ExitCode, Output};
use cinedeck::commands::{self, Context};

fn init_tracing(verbose: bool) {
    let default = if verbose { "cinedeck=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run_cli(cli).await.into()
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let mut ctx = match Context::load(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => return output.error(format!("{:#}", e), ExitCode::Error),
    };

    match cli.command {
        Command::Search(cmd) => commands::search_cmd(cmd, &ctx, &output).await,
        Command::Genres => commands::genres_cmd(&ctx, &output).await,
        Command::Discover(cmd) => commands::discover_cmd(cmd, &ctx, &output).await,
        Command::List(cmd) => commands::list_cmd(cmd, &ctx, &output).await,
        Command::Info(cmd) => commands::info_cmd(cmd, &ctx, &output).await,
        Command::Favorites(cmd) => commands::favorites_cmd(cmd, &ctx, &output).await,
        Command::Theme(cmd) => commands::theme_cmd(cmd, &mut ctx, &output),
    }
}
