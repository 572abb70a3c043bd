/// Data structures and traits for TV show metadata retrieval.
///
/// This module provides the flat `Show` and `Episode` records the rest of the
/// crate renders, the error type for failed API calls, and the
/// `ShowProvider` trait implemented by metadata sources.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::{DEFAULT_API_BASE, MISSING_IMAGE_URL, TvMazeProvider};

use thiserror::Error;

/// Errors that can occur while talking to a metadata provider.
///
/// Every failure of the API layer is a `RequestError`: the variants only
/// tell apart where in the request the failure happened.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request could not be built or sent, or the connection failed
    #[error("Request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status code
    #[error("HTTP {code} {reason}")]
    Status { code: u16, reason: String },

    /// Failed to parse the provider's JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

/// A TV show as returned by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    /// Identifier assigned by the provider
    pub id: u64,
    /// The name of the show
    pub name: String,
    /// Summary of the show, may contain HTML markup
    pub summary: String,
    /// URL of the show's poster, or the placeholder image if it has none
    pub image: String,
}

/// A single episode of a show.
///
/// Fields are taken over verbatim from the provider. Whatever the provider
/// leaves out stays `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// Identifier assigned by the provider
    pub id: u64,
    /// The episode title
    pub name: Option<String>,
    /// The season number this episode belongs to (1-based)
    pub season: Option<u32>,
    /// The episode number within the season (1-based)
    pub number: Option<u32>,
}

/// Trait for metadata providers that can search shows and list episodes.
pub trait ShowProvider {
    /// Searches for shows matching a free-text query.
    ///
    /// The query is passed through as-is; an empty query is a valid query
    /// that usually yields no results.
    ///
    /// # Returns
    ///
    /// All matching shows in the order the provider ranked them, or an empty
    /// vector if nothing matched.
    fn search_shows(&self, query: &str) -> Result<Vec<Show>, RequestError>;

    /// Fetches the full episode list of a show.
    ///
    /// # Arguments
    ///
    /// * `show_id` - The provider's identifier of the show
    fn get_episodes(&self, show_id: u64) -> Result<Vec<Episode>, RequestError>;
}
