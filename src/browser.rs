//! Event handling for the show browser
//!
//! The two user actions, submitting a search and asking for the episodes of
//! a listed show, are plain functions over a `Page` and a `ShowProvider`.
//! They take the triggering event as a value and work against whatever
//! containers the page holds.

use crate::BrowserError;
use crate::metadata_retrieval::ShowProvider;
use crate::render::{
    Container, EntryKey, ShowEntries, render_episodes, render_error, render_shows,
};
use tracing::{info, warn};

/// The search form was submitted with the given term.
#[derive(Debug, Clone, Copy)]
pub struct SearchSubmitted<'a> {
    pub term: &'a str,
}

/// The "Episodes" control of a rendered show entry was activated.
#[derive(Debug, Clone, Copy)]
pub struct EpisodesRequested {
    pub entry: EntryKey,
}

/// The two render targets of the browser and the entries currently listed.
#[derive(Debug)]
pub struct Page<S, E> {
    shows_list: S,
    episodes_area: E,
    entries: ShowEntries,
}

impl<S: Container, E: Container> Page<S, E> {
    /// Creates a page around the given containers.
    ///
    /// The episode area starts out hidden.
    pub fn new(shows_list: S, mut episodes_area: E) -> Self {
        episodes_area.hide();
        Self {
            shows_list,
            episodes_area,
            entries: ShowEntries::default(),
        }
    }

    pub fn shows_list(&self) -> &S {
        &self.shows_list
    }

    pub fn episodes_area(&self) -> &E {
        &self.episodes_area
    }

    /// The show entries of the most recent search
    pub fn entries(&self) -> &ShowEntries {
        &self.entries
    }
}

/// Handles a search form submission.
///
/// Searches for the submitted term, replaces the show list with the results
/// and hides and clears the episode area. If the search fails, the show list
/// is replaced with an error message instead and the error is returned.
///
/// # Returns
///
/// The number of shows listed
pub fn on_search_submit<P, S, E>(
    provider: &P,
    page: &mut Page<S, E>,
    event: SearchSubmitted<'_>,
) -> Result<usize, BrowserError>
where
    P: ShowProvider + ?Sized,
    S: Container,
    E: Container,
{
    info!(term = event.term, "searching shows");

    let result = provider.search_shows(event.term);
    let generation = page.entries.next_generation();

    page.episodes_area.hide();
    page.episodes_area.clear();

    match result {
        Ok(shows) => {
            page.entries = render_shows(&shows, &mut page.shows_list, generation);
            Ok(shows.len())
        }
        Err(e) => {
            warn!(term = event.term, error = %e, "search failed");
            page.entries = ShowEntries::empty(generation);
            render_error(&format!("Search failed: {}", e), &mut page.shows_list);
            Err(e.into())
        }
    }
}

/// Handles activation of a show entry's "Episodes" control.
///
/// Resolves the entry to its show, fetches the episodes of that show and
/// replaces the contents of the episode area with them. On failure, the
/// episode area shows an error message and the error is returned. Keys that
/// do not belong to the current show list are rejected without a request.
///
/// # Returns
///
/// The number of episodes listed
pub fn on_episodes_requested<P, S, E>(
    provider: &P,
    page: &mut Page<S, E>,
    event: EpisodesRequested,
) -> Result<usize, BrowserError>
where
    P: ShowProvider + ?Sized,
    S: Container,
    E: Container,
{
    let Some(show_id) = page.entries.show_id(event.entry) else {
        warn!(entry = %event.entry, "episodes requested for unknown entry");
        render_error("This show is no longer listed", &mut page.episodes_area);
        return Err(BrowserError::UnknownEntry(event.entry));
    };

    info!(show_id, "listing episodes");

    match provider.get_episodes(show_id) {
        Ok(episodes) => {
            render_episodes(&episodes, &mut page.episodes_area);
            Ok(episodes.len())
        }
        Err(e) => {
            warn!(show_id, error = %e, "fetching episodes failed");
            render_error(
                &format!("Could not load episodes: {}", e),
                &mut page.episodes_area,
            );
            Err(e.into())
        }
    }
}
