use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::catalog::TimeWindow;

#[derive(Debug, Parser)]
#[command(
    name = "cinetrack",
    version,
    about = "Browse movies and keep a continue-watching shelf"
)]
pub struct Cli {
    /// Database file holding the continue-watching shelf.
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Continue-watching shelf, trending this week and popular movies.
    Home,
    Trending {
        #[arg(long, value_enum, default_value_t = TimeWindow::Week)]
        window: TimeWindow,
    },
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List the genres offered on the home screen.
    Genres,
    /// Most popular movies of a genre (name or numeric id).
    Genre { genre: String },
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show a movie and put it at the front of the shelf.
    Details { id: u64 },
    /// List the continue-watching shelf.
    Shelf,
    /// Remove a movie from the continue-watching shelf.
    Remove { id: u64 },
    Tui,
}

impl Command {
    pub fn is_tui(command: Option<&Self>) -> bool {
        matches!(command, None | Some(Self::Tui))
    }
}
