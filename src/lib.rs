//! tvmaze_browser - Search TV shows and list their episodes
//!
//! This library provides the core functionality for searching the TVMaze
//! show database, rendering the matching shows into a render target, and
//! listing the episodes of a show picked from that list.

mod browser;
mod metadata_retrieval;
mod render;

use thiserror::Error;

// Re-export the event handlers and the page they work on
pub use browser::{
    EpisodesRequested, Page, SearchSubmitted, on_episodes_requested, on_search_submit,
};

// Re-export metadata types
pub use metadata_retrieval::{
    DEFAULT_API_BASE, Episode, MISSING_IMAGE_URL, RequestError, Show, ShowProvider, TvMazeProvider,
};

// Re-export rendering types
pub use render::{
    Container, EntryKey, MemoryContainer, ShowEntries, ShowEntry, episode_line, render_episodes,
    render_error, render_shows,
};

/// Top-level error type for browser operations
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Error while talking to the metadata provider
    #[error("Metadata request error: {0}")]
    Request(#[from] RequestError),

    /// The activated entry is not part of the current show list
    #[error("No listed show for entry {0}")]
    UnknownEntry(EntryKey),
}
