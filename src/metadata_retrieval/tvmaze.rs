/// TVMaze metadata provider implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeSearchResult, TvMazeShow};
use super::{Episode, RequestError, Show, ShowProvider};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

/// Base URL of the public TVMaze API.
pub const DEFAULT_API_BASE: &str = "https://api.tvmaze.com";

/// Placeholder image used for shows without a poster.
pub const MISSING_IMAGE_URL: &str = "https://store-images.s-microsoft.com/image/apps.65316.13510798887490672.6e1ebb25-96c8-4504-b714-1f7cbca3c5ad.f9514a23-1eb8-4916-a18e-99b1a9817d15?mode=scale&q=90&h=300&w=300";

/// Metadata provider for the TVMaze API.
///
/// This provider searches shows through https://api.tvmaze.com/search/shows
/// and lists episodes through https://api.tvmaze.com/shows/{id}/episodes.
pub struct TvMazeProvider {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TvMazeProvider {
    /// Creates a new TVMaze provider instance talking to the public API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Creates a provider talking to a different API base URL.
    ///
    /// A trailing slash on `base_url` is ignored.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_client(reqwest::blocking::Client::new(), base_url)
    }

    /// Creates a provider using an already configured HTTP client.
    pub fn with_client(client: reqwest::blocking::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds the search URL for a query. The query is percent-encoded.
    fn search_url(&self, query: &str) -> Result<Url, RequestError> {
        Url::parse_with_params(&format!("{}/search/shows", self.base_url), &[("q", query)])
            .map_err(|e| RequestError::Transport(format!("Invalid search URL: {}", e)))
    }

    /// Builds the episode list URL for a show.
    fn episodes_url(&self, show_id: u64) -> Result<Url, RequestError> {
        Url::parse(&format!("{}/shows/{}/episodes", self.base_url, show_id))
            .map_err(|e| RequestError::Transport(format!("Invalid episodes URL: {}", e)))
    }

    /// Issues a GET request and parses the JSON body.
    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RequestError> {
        debug!(%url, "requesting");

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        // Ensure request was successful
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "request rejected");
            return Err(RequestError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json()
            .map_err(|e| RequestError::Parse(e.to_string()))
    }

    /// Converts a TVMaze show to our internal Show structure.
    ///
    /// Shows without an image, or with an empty full-size image URL, get the
    /// placeholder image.
    fn convert_show(tvmaze_show: TvMazeShow) -> Show {
        let image = tvmaze_show
            .image
            .and_then(|image| image.original)
            .filter(|original| !original.is_empty())
            .unwrap_or_else(|| MISSING_IMAGE_URL.to_string());

        Show {
            id: tvmaze_show.id,
            name: tvmaze_show.name,
            summary: tvmaze_show.summary.unwrap_or_default(),
            image,
        }
    }

    /// Converts a TVMaze episode to our internal Episode structure.
    fn convert_episode(tvmaze_episode: TvMazeEpisode) -> Episode {
        Episode {
            id: tvmaze_episode.id,
            name: tvmaze_episode.name,
            season: tvmaze_episode.season,
            number: tvmaze_episode.number,
        }
    }
}

impl Default for TvMazeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowProvider for TvMazeProvider {
    fn search_shows(&self, query: &str) -> Result<Vec<Show>, RequestError> {
        let url = self.search_url(query)?;
        let results: Vec<TvMazeSearchResult> = self.get_json(url)?;

        debug!(query, count = results.len(), "search finished");

        Ok(results
            .into_iter()
            .map(|result| Self::convert_show(result.show))
            .collect())
    }

    fn get_episodes(&self, show_id: u64) -> Result<Vec<Episode>, RequestError> {
        let url = self.episodes_url(show_id)?;
        let episodes: Vec<TvMazeEpisode> = self.get_json(url)?;

        debug!(show_id, count = episodes.len(), "episodes fetched");

        Ok(episodes
            .into_iter()
            .map(Self::convert_episode)
            .inspect(|episode| trace!(?episode, "episode"))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serves exactly one HTTP response on a local port.
    ///
    /// Returns the base URL to point the provider at and a handle yielding
    /// the request line the server received.
    fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();

            // Drain headers
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }

            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request_line.trim_end().to_string()
        });

        (base_url, handle)
    }

    fn local_provider(base_url: &str) -> TvMazeProvider {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .unwrap();
        TvMazeProvider::with_client(client, base_url)
    }

    fn parse_show(json: &str) -> Show {
        let result: TvMazeSearchResult = serde_json::from_str(json).unwrap();
        TvMazeProvider::convert_show(result.show)
    }

    #[test]
    fn test_convert_show_with_image() {
        let show = parse_show(
            r#"{"show": {"id": 1, "name": "The Bletchley Circle", "summary": "<p>...</p>",
                "image": {"medium": "http://img/1m.jpg", "original": "http://img/1.jpg"}}}"#,
        );

        assert_eq!(
            show,
            Show {
                id: 1,
                name: "The Bletchley Circle".to_string(),
                summary: "<p>...</p>".to_string(),
                image: "http://img/1.jpg".to_string(),
            }
        );
    }

    #[test]
    fn test_convert_show_without_image() {
        let show = parse_show(r#"{"show": {"id": 2, "name": "X", "summary": "", "image": null}}"#);
        assert_eq!(show.image, MISSING_IMAGE_URL);

        let show = parse_show(r#"{"show": {"id": 3, "name": "Y", "summary": ""}}"#);
        assert_eq!(show.image, MISSING_IMAGE_URL);
    }

    #[test]
    fn test_convert_show_with_empty_original() {
        let show = parse_show(
            r#"{"show": {"id": 4, "name": "Z", "summary": "", "image": {"medium": "m.jpg", "original": ""}}}"#,
        );
        assert_eq!(show.image, MISSING_IMAGE_URL);

        let show = parse_show(
            r#"{"show": {"id": 5, "name": "W", "summary": "", "image": {"medium": "m.jpg"}}}"#,
        );
        assert_eq!(show.image, MISSING_IMAGE_URL);
    }

    #[test]
    fn test_convert_show_null_summary() {
        let show = parse_show(r#"{"show": {"id": 6, "name": "V", "summary": null, "image": null}}"#);
        assert_eq!(show.summary, "");
    }

    #[test]
    fn test_convert_episode_copies_fields() {
        let episode: TvMazeEpisode = serde_json::from_str(
            r#"{"id": 10, "name": "Pilot", "season": 1, "number": 1, "airdate": "2012-09-06"}"#,
        )
        .unwrap();

        assert_eq!(
            TvMazeProvider::convert_episode(episode),
            Episode {
                id: 10,
                name: Some("Pilot".to_string()),
                season: Some(1),
                number: Some(1),
            }
        );
    }

    #[test]
    fn test_convert_episode_keeps_missing_fields_absent() {
        let episode: TvMazeEpisode =
            serde_json::from_str(r#"{"id": 11, "name": null, "season": 2}"#).unwrap();

        let episode = TvMazeProvider::convert_episode(episode);
        assert_eq!(episode.name, None);
        assert_eq!(episode.season, Some(2));
        assert_eq!(episode.number, None);
    }

    #[test]
    fn test_episode_without_id_does_not_parse() {
        let result: Result<Vec<TvMazeEpisode>, _> = serde_json::from_str(
            r#"[{"id": 10, "name": "Pilot", "season": 1, "number": 1},
                {"name": "Untracked", "season": 1, "number": 2}]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_show_without_name_does_not_parse() {
        let result: Result<Vec<TvMazeSearchResult>, _> =
            serde_json::from_str(r#"[{"show": {"id": 8, "summary": null, "image": null}}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_url_encodes_query() {
        let provider = TvMazeProvider::with_base_url("https://api.tvmaze.com/");
        let url = provider.search_url("doctor who & co").unwrap();

        assert_eq!(url.path(), "/search/shows");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("q".to_string(), "doctor who & co".to_string())]);
    }

    #[test]
    fn test_search_url_passes_empty_query() {
        let provider = TvMazeProvider::new();
        let url = provider.search_url("").unwrap();
        assert_eq!(url.as_str(), "https://api.tvmaze.com/search/shows?q=");
    }

    #[test]
    fn test_episodes_url() {
        let provider = TvMazeProvider::new();
        let url = provider.episodes_url(7).unwrap();
        assert_eq!(url.as_str(), "https://api.tvmaze.com/shows/7/episodes");
    }

    #[test]
    fn test_search_shows_over_http() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"score": 0.9, "show": {"id": 1, "name": "The Bletchley Circle", "summary": "<p>...</p>", "image": {"original": "http://img/1.jpg"}}},
                {"score": 0.5, "show": {"id": 2, "name": "The Bletchley Circle: San Francisco", "summary": null, "image": null}}]"#,
        );

        let shows = local_provider(&base_url).search_shows("bletchley").unwrap();

        assert_eq!(server.join().unwrap(), "GET /search/shows?q=bletchley HTTP/1.1");
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].image, "http://img/1.jpg");
        assert_eq!(shows[1].id, 2);
        assert_eq!(shows[1].image, MISSING_IMAGE_URL);
    }

    #[test]
    fn test_search_shows_without_matches() {
        let (base_url, server) = serve_once("200 OK", "[]");

        let shows = local_provider(&base_url).search_shows("").unwrap();

        assert_eq!(server.join().unwrap(), "GET /search/shows?q= HTTP/1.1");
        assert!(shows.is_empty());
    }

    #[test]
    fn test_get_episodes_over_http() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"id": 10, "name": "Pilot", "season": 1, "number": 1}]"#,
        );

        let episodes = local_provider(&base_url).get_episodes(7).unwrap();

        assert_eq!(server.join().unwrap(), "GET /shows/7/episodes HTTP/1.1");
        assert_eq!(
            episodes,
            vec![Episode {
                id: 10,
                name: Some("Pilot".to_string()),
                season: Some(1),
                number: Some(1),
            }]
        );
    }

    #[test]
    fn test_non_success_status_is_request_error() {
        let (base_url, server) = serve_once("404 Not Found", "{}");

        let result = local_provider(&base_url).get_episodes(999_999);
        server.join().unwrap();

        match result {
            Err(RequestError::Status { code, reason }) => {
                assert_eq!(code, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let (base_url, server) = serve_once("200 OK", r#"{"not": "a list"}"#);

        let result = local_provider(&base_url).search_shows("anything");
        server.join().unwrap();

        assert!(matches!(result, Err(RequestError::Parse(_))));
    }

    #[test]
    fn test_episode_list_with_entry_missing_id_is_parse_error() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"id": 10, "name": "Pilot", "season": 1, "number": 1},
                {"name": "Untracked", "season": 1, "number": 2}]"#,
        );

        let result = local_provider(&base_url).get_episodes(7);
        server.join().unwrap();

        assert!(matches!(result, Err(RequestError::Parse(_))));
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        // Bind and drop a listener to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let result = local_provider(&format!("http://127.0.0.1:{}", port)).search_shows("x");
        assert!(matches!(result, Err(RequestError::Transport(_))));
    }
}
