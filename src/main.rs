use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::{Input, Select};
use std::process;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tvmaze_browser::{
    BrowserError, DEFAULT_API_BASE, EpisodesRequested, MemoryContainer, Page, SearchSubmitted,
    ShowProvider, TvMazeProvider, on_episodes_requested, on_search_submit, render_episodes,
};

/// Search TV shows on TVMaze and list their episodes
#[derive(Debug, Parser)]
#[command(name = "tvmaze-browser", version, about)]
struct Cli {
    /// Base URL of the TVMaze API
    #[arg(long, global = true, default_value = DEFAULT_API_BASE)]
    api_url: String,

    /// How to print the rendered lists
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactively search shows and browse their episodes (default)
    Browse,
    /// Search shows once and print the list
    Search {
        /// Free-text search query
        query: String,
    },
    /// Print the episodes of a show
    Episodes {
        /// TVMaze id of the show
        show_id: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain text converted from the rendered markup
    Text,
    /// The rendered HTML fragments
    Html,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Prints a container the way the selected format asks for.
/// Hidden containers print nothing.
fn print_container(container: &MemoryContainer, format: OutputFormat) {
    if !container.is_visible() {
        return;
    }

    match format {
        OutputFormat::Text => {
            for block in container.to_text() {
                println!("{}\n", block);
            }
        }
        OutputFormat::Html => {
            for fragment in container.fragments() {
                println!("{}", fragment);
            }
        }
    }
}

fn new_page() -> Page<MemoryContainer, MemoryContainer> {
    Page::new(MemoryContainer::visible(), MemoryContainer::hidden())
}

fn run_search(
    provider: &dyn ShowProvider,
    query: &str,
    format: OutputFormat,
) -> Result<(), CliError> {
    let mut page = new_page();
    let result = on_search_submit(provider, &mut page, SearchSubmitted { term: query });

    print_container(page.shows_list(), format);
    let count = result?;

    if count == 0 {
        println!("No shows found for '{}'.", query);
    }

    Ok(())
}

fn run_episodes(
    provider: &dyn ShowProvider,
    show_id: u64,
    format: OutputFormat,
) -> Result<(), CliError> {
    let episodes = provider.get_episodes(show_id).map_err(BrowserError::from)?;

    let mut area = MemoryContainer::hidden();
    render_episodes(&episodes, &mut area);
    print_container(&area, format);

    if episodes.is_empty() {
        println!("Show {} has no episodes.", show_id);
    }

    Ok(())
}

/// Interactive loop: the text prompt plays the search form, the selection
/// list plays the "Episodes" controls of the listed shows.
fn run_browse(provider: &dyn ShowProvider, format: OutputFormat) -> Result<(), CliError> {
    let mut page = new_page();

    loop {
        let term: String = Input::new()
            .with_prompt("Search shows")
            .allow_empty(true)
            .interact_text()?;

        match on_search_submit(provider, &mut page, SearchSubmitted { term: &term }) {
            Ok(0) => println!("No shows found for '{}'.", term),
            Ok(_) => print_container(page.shows_list(), format),
            Err(e) => {
                print_container(page.shows_list(), format);
                tracing::debug!(error = %e, "search failed");
            }
        }

        loop {
            let entries = page.entries().entries().to_vec();

            let mut items: Vec<String> = entries
                .iter()
                .map(|entry| format!("Episodes of {} (#{})", entry.name, entry.show_id))
                .collect();
            items.push("New search".to_string());
            items.push("Quit".to_string());

            let selection = Select::new()
                .with_prompt("What next?")
                .items(&items)
                .default(0)
                .interact()?;

            if selection == entries.len() {
                break;
            }
            if selection > entries.len() {
                return Ok(());
            }

            let event = EpisodesRequested {
                entry: entries[selection].key,
            };
            match on_episodes_requested(provider, &mut page, event) {
                Ok(0) => println!("{} has no episodes.", entries[selection].name),
                Ok(_) => print_container(page.episodes_area(), format),
                Err(e) => {
                    print_container(page.episodes_area(), format);
                    tracing::debug!(error = %e, "episode listing failed");
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let provider = TvMazeProvider::with_base_url(&cli.api_url);

    let result = match cli.command.unwrap_or(Command::Browse) {
        Command::Browse => run_browse(&provider, cli.format),
        Command::Search { query } => run_search(&provider, &query, cli.format),
        Command::Episodes { show_id } => run_episodes(&provider, show_id, cli.format),
    };

    if let Err(e) = result {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
