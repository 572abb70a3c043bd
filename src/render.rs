//! Rendering module
//!
//! This module turns shows and episodes into HTML markup fragments and places
//! them into render targets. Targets are passed in explicitly as `Container`
//! handles, so the rendering does not depend on any particular UI surface.

use crate::metadata_retrieval::{Episode, Show};
use askama::Template;
use std::fmt;
use tracing::warn;

/// Marker rendered in place of an episode field the provider left out.
const ABSENT_FIELD: &str = "unknown";

/// A destination for rendered markup fragments.
pub trait Container {
    /// Removes all fragments from the container
    fn clear(&mut self);

    /// Appends a fragment after the existing ones
    fn append(&mut self, fragment: String);

    /// Makes the container visible
    fn show(&mut self);

    /// Hides the container without touching its contents
    fn hide(&mut self);
}

/// An in-memory container holding its fragments in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryContainer {
    fragments: Vec<String>,
    visible: bool,
}

impl MemoryContainer {
    /// Creates an empty, visible container
    pub fn visible() -> Self {
        Self {
            fragments: Vec::new(),
            visible: true,
        }
    }

    /// Creates an empty, hidden container
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Converts every fragment to plain text, one block per fragment.
    pub fn to_text(&self) -> Vec<String> {
        self.fragments
            .iter()
            .map(|fragment| nanohtml2text::html2text(fragment).trim().to_string())
            .collect()
    }
}

impl Container for MemoryContainer {
    fn clear(&mut self) {
        self.fragments.clear();
    }

    fn append(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

/// Identity of one rendered show entry.
///
/// Keys carry the generation of the render call that produced them, so a key
/// handed out before a re-render never resolves to an entry of a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKey {
    generation: u64,
    index: usize,
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.generation, self.index)
    }
}

/// A rendered show entry and the show it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowEntry {
    pub key: EntryKey,
    pub show_id: u64,
    pub name: String,
}

/// Mapping from the entries of one `render_shows` call to their show ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowEntries {
    generation: u64,
    entries: Vec<ShowEntry>,
}

impl ShowEntries {
    /// The generation the next render call should use
    pub fn next_generation(&self) -> u64 {
        self.generation + 1
    }

    /// Resolves an entry key to its show id.
    ///
    /// Returns `None` for keys of another generation or out of range.
    pub fn show_id(&self, key: EntryKey) -> Option<u64> {
        if key.generation != self.generation {
            return None;
        }
        self.entries.get(key.index).map(|entry| entry.show_id)
    }

    pub fn entries(&self) -> &[ShowEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// An empty mapping for the given generation
    pub(crate) fn empty(generation: u64) -> Self {
        Self {
            generation,
            entries: Vec::new(),
        }
    }
}

/// Replaces the contents of `container` with one entry per show.
///
/// Each entry shows the image, name and summary of the show plus an
/// "Episodes" control tagged with the entry key. The summary is inserted as
/// markup; name and image URL are escaped.
///
/// # Returns
///
/// The mapping from the rendered entry keys to show ids
pub fn render_shows<C: Container + ?Sized>(
    shows: &[Show],
    container: &mut C,
    generation: u64,
) -> ShowEntries {
    container.clear();

    let mut entries = Vec::with_capacity(shows.len());

    for (index, show) in shows.iter().enumerate() {
        let key = EntryKey { generation, index };
        container.append(show_fragment(show, key));
        entries.push(ShowEntry {
            key,
            show_id: show.id,
            name: show.name.clone(),
        });
    }

    ShowEntries {
        generation,
        entries,
    }
}

/// Replaces the contents of `container` with one list item per episode and
/// makes it visible.
pub fn render_episodes<C: Container + ?Sized>(episodes: &[Episode], container: &mut C) {
    container.clear();

    for episode in episodes {
        container.append(render_fragment(&EpisodeItemTemplate {
            line: episode_line(episode),
        }));
    }

    container.show();
}

/// Replaces the contents of `container` with an error message and makes it
/// visible.
pub fn render_error<C: Container + ?Sized>(message: &str, container: &mut C) {
    container.clear();
    container.append(render_fragment(&ErrorTemplate { message }));
    container.show();
}

/// Formats the plain text of an episode list item:
/// `{name} (season {season}, episode {number})`.
pub fn episode_line(episode: &Episode) -> String {
    let season = episode
        .season
        .map(|s| s.to_string())
        .unwrap_or_else(|| ABSENT_FIELD.to_string());
    let number = episode
        .number
        .map(|n| n.to_string())
        .unwrap_or_else(|| ABSENT_FIELD.to_string());

    format!(
        "{} (season {}, episode {})",
        episode.name.as_deref().unwrap_or(ABSENT_FIELD),
        season,
        number
    )
}

fn show_fragment(show: &Show, key: EntryKey) -> String {
    render_fragment(&ShowEntryTemplate {
        id: show.id,
        key,
        image: &show.image,
        name: &show.name,
        summary: &show.summary,
    })
}

/// Renders a fragment template. A template that fails to render leaves an
/// empty fragment behind.
fn render_fragment<T: Template>(template: &T) -> String {
    template.render().unwrap_or_else(|err| {
        warn!(error = %err, "rendering fragment failed");
        String::new()
    })
}

/// One entry of the show list. The summary is provider markup and goes in
/// unescaped.
#[derive(Template)]
#[template(
    source = r#"<div data-show-id="{{ id }}" data-entry="{{ key }}" class="Show">
  <div class="media">
    <img src="{{ image }}" alt="{{ name }}" class="w-25 mr-3">
    <div class="media-body">
      <h5 class="text-primary">{{ name }}</h5>
      <div><small>{{ summary|safe }}</small></div>
      <button class="btn btn-outline-light btn-sm Show-getEpisodes" data-entry="{{ key }}">Episodes</button>
    </div>
  </div>
</div>"#,
    ext = "html"
)]
struct ShowEntryTemplate<'a> {
    id: u64,
    key: EntryKey,
    image: &'a str,
    name: &'a str,
    summary: &'a str,
}

#[derive(Template)]
#[template(source = "<li>{{ line }}</li>", ext = "html")]
struct EpisodeItemTemplate {
    line: String,
}

#[derive(Template)]
#[template(
    source = r#"<div class="Error"><strong>{{ message }}</strong></div>"#,
    ext = "html"
)]
struct ErrorTemplate<'a> {
    message: &'a str,
}
