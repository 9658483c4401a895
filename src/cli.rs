//! CLI - Command Line Interface for CineDeck
//!
//! Every screen of the client is reachable as a subcommand.
//! All output is JSON-parseable with `--json`.
//!
//! # Examples
//!
//! ```bash
//! # Search and browse
//! cinedeck search "the batman" --json
//! cinedeck discover comedy
//! cinedeck list top-rated
//!
//! # Details and favorites
//! cinedeck info 550
//! cinedeck favorites add 550
//! cinedeck favorites
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::MovieList;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Local store could not be read or written
    PersistenceError = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// CineDeck - browse, search and bookmark movies
#[derive(Parser, Debug)]
#[command(
    name = "cinedeck",
    version,
    about = "Browse, search and bookmark movies from the TMDB catalog",
    after_help = "EXAMPLES:\n\
                  cinedeck search \"blade runner\"   Search by keyword\n\
                  cinedeck discover Action          Movies in a genre\n\
                  cinedeck info 550                 Detail + recommendations\n\
                  cinedeck favorites add 550        Bookmark a movie"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search movies by keyword
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// List movie genres
    #[command(visible_alias = "g")]
    Genres,

    /// Movies in a genre
    #[command(visible_alias = "d")]
    Discover(DiscoverCmd),

    /// Home feeds (now playing, upcoming, top rated, popular)
    #[command(visible_alias = "l")]
    List(ListCmd),

    /// Movie detail with favorite flag and recommendations
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Show or edit favorites
    #[command(visible_alias = "fav")]
    Favorites(FavoritesCmd),

    /// Show or toggle dark mode
    Theme(ThemeCmd),
}

/// Search movies by keyword
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Keyword (title words)
    #[arg(required = true)]
    pub keyword: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Movies in a genre
#[derive(Args, Debug)]
pub struct DiscoverCmd {
    /// Genre name or id
    #[arg(required = true)]
    pub genre: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Home feeds
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Feed to show (all feeds when omitted)
    #[arg(value_enum)]
    pub feed: Option<Feed>,

    /// Maximum number of results per feed
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    NowPlaying,
    Upcoming,
    TopRated,
    Popular,
}

impl From<Feed> for MovieList {
    fn from(feed: Feed) -> Self {
        match feed {
            Feed::NowPlaying => MovieList::NowPlaying,
            Feed::Upcoming => MovieList::Upcoming,
            Feed::TopRated => MovieList::TopRated,
            Feed::Popular => MovieList::Popular,
        }
    }
}

/// Movie detail
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// Movie id
    #[arg(required = true)]
    pub id: u64,

    /// Flip the favorite flag after loading
    #[arg(long)]
    pub toggle_favorite: bool,
}

/// Favorites
#[derive(Args, Debug)]
pub struct FavoritesCmd {
    #[command(subcommand)]
    pub action: Option<FavoritesAction>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FavoritesAction {
    /// Resolve and list favorite movies (default)
    List,
    /// Stored ids only, without contacting the catalog
    Ids,
    /// Add a movie id
    Add { id: u64 },
    /// Remove a movie id
    #[command(visible_alias = "rm")]
    Remove { id: u64 },
}

/// Dark mode
#[derive(Args, Debug)]
pub struct ThemeCmd {
    /// Flip dark mode and save it
    #[arg(long, short = 't')]
    pub toggle: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Standard JSON response wrapper
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a list, one `Display` line per item outside JSON mode
    pub fn print_list<T: Serialize + Display>(&self, items: &[T]) -> anyhow::Result<()> {
        if self.json {
            return self.print(items);
        }
        for item in items {
            println!("{}", item);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
