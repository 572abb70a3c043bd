/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
use serde::Deserialize;

/// One entry of the `/search/shows` response.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchResult {
    /// The matched show
    pub show: TvMazeShow,
}

/// A show object as embedded in search results.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u64,
    /// The name of the TV show
    pub name: String,
    /// Show summary in HTML format (may be null)
    #[serde(default)]
    pub summary: Option<String>,
    /// Poster images (null when the show has none)
    #[serde(default)]
    pub image: Option<TvMazeImage>,
}

/// Image URLs of a show. Only the full-size variant is used.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    /// Full-size image URL
    #[serde(default)]
    pub original: Option<String>,
}

/// A single episode from the `/shows/{id}/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    pub id: u64,
    /// Episode title (may be null for episodes without a title)
    #[serde(default)]
    pub name: Option<String>,
    /// Season number
    #[serde(default)]
    pub season: Option<u32>,
    /// Episode number within the season (null for specials)
    #[serde(default)]
    pub number: Option<u32>,
}
