use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;
mod parsers;


pub use args::{
    FloorArgs, HistoryArgs, ImportArgs, MapArgs, PointerArgs, RememberArgs, SearchArgs, ShowArgs,
};

#[derive(Debug, Parser)]
#[command(name = "waymark")]
#[command(about = "Indoor map marker search, search history and off-screen pin pointers", version)]
pub struct Cli {
    /// SQLite database holding markers and their search index.
    #[arg(long, default_value = ".waymark/markers.db")]
    pub db: PathBuf,

    /// Log debug events to stderr.
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create or migrate the database.
    Init,
    /// Import a JSON marker catalog.
    Import(ImportArgs),
    /// Rank markers of a map against a free-text query.
    Search(SearchArgs),
    /// Show one marker with its text.
    Show(ShowArgs),
    /// List markers of one floor.
    Floor(FloorArgs),
    /// Show the stored pixel geometry of a map.
    Map(MapArgs),
    /// Record a marker picked from search results.
    Remember(RememberArgs),
    /// List the search history of a map, oldest first.
    History(HistoryArgs),
    /// Compute where to draw a pointer to an off-screen pin.
    Pointer(PointerArgs),
}

impl Commands {
    /// Operation name reported in error payloads.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Import(_) => "import",
            Self::Search(_) => "search",
            Self::Show(_) => "show",
            Self::Floor(_) => "floor",
            Self::Map(_) => "map",
            Self::Remember(_) => "remember",
            Self::History(_) => "history",
            Self::Pointer(_) => "pointer",
        }
    }
}
