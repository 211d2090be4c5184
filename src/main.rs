use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use folio::app::domain::{Carousel, EndBehavior, StartingPosition};
use folio::app::infrastructure::platform::{FixedPreference, OsPreference, SystemPreference};
use folio::app::infrastructure::storage::{JsonFileStorage, Storage};
use folio::app::services::fetch::{Fetcher, FsFetcher, HttpFetcher};
use folio::app::services::syntax::SyntectHighlighter;
use folio::app::{AppError, Result, Site, SiteConfig, page_key_from_query};
use folio::ui::shell::{render_page, standard_shell};

/// Render a page of the site the way the browser scripts would.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Directory holding the site's files
    #[arg(long, conflicts_with = "base_url")]
    site_root: Option<PathBuf>,

    /// Fetch the site's files over HTTP from this URL instead
    #[arg(long)]
    base_url: Option<String>,

    /// Page key to render
    #[arg(long)]
    page: Option<String>,

    /// Query string or URL to take the `page` parameter from
    #[arg(long, conflicts_with = "page")]
    query: Option<String>,

    /// Settings file (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Key/value storage file standing in for the browser's local storage
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Ignore the desktop color scheme and assume this preference
    #[arg(long)]
    prefers_dark: Option<bool>,

    /// Flip the theme after loading
    #[arg(long)]
    toggle_theme: bool,

    /// Markdown article to render into the article container
    #[arg(long)]
    article: Option<String>,

    /// Number of carousel slides in the shell
    #[arg(long, default_value_t = 0)]
    slides: usize,

    /// Write the page here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the configured page keys and exit
    #[arg(long)]
    list_pages: bool,
}

fn build_fetcher(cli: &Cli, config: &SiteConfig) -> Result<Arc<dyn Fetcher>> {
    match (&cli.base_url, &cli.site_root) {
        (Some(url), _) => Ok(Arc::new(HttpFetcher::new(url, config.fetch_timeout_secs)?)),
        (None, Some(root)) => Ok(Arc::new(FsFetcher::new(root))),
        (None, None) => Ok(Arc::new(FsFetcher::new("."))),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SiteConfig::load_from(path),
        None => SiteConfig::load(),
    };

    if cli.list_pages {
        let registry = config.registry()?;
        for key in registry.keys() {
            println!("{}", key);
        }
        println!("{} (fallback)", registry.fallback_key());
        return Ok(());
    }

    let fetcher = build_fetcher(&cli, &config)?;
    let storage = match &cli.storage {
        Some(path) => JsonFileStorage::new(path),
        None => JsonFileStorage::default_location(),
    };
    log::debug!("Theme storage at {}", storage.path().display());
    let storage: Box<dyn Storage> = Box::new(storage);
    let system: Box<dyn SystemPreference> = match cli.prefers_dark {
        Some(dark) => Box::new(FixedPreference(dark)),
        None => Box::new(OsPreference),
    };

    let timeout = Duration::from_secs(config.fetch_timeout_secs.saturating_add(5));
    let dom = standard_shell(&config, cli.slides);
    let mut site = Site::new(dom, config, fetcher, storage, system)?;

    if cli.slides > 0 {
        let carousel = Carousel::new(cli.slides, StartingPosition::Left, EndBehavior::Wrap)?;
        site.set_carousel(Some(carousel));
    }

    let page = match (&cli.page, &cli.query) {
        (Some(page), _) => Some(page.clone()),
        (None, Some(query)) => page_key_from_query(query),
        (None, None) => None,
    };

    site.on_load(page.as_deref());
    if cli.toggle_theme {
        site.toggle_theme();
    }

    if site.config().highlighting_enabled {
        let theme = site.config().current_syntax_theme(site.theme());
        site.set_highlighter(Some(Box::new(SyntectHighlighter::new(theme))));
    }

    if let Some(article) = &cli.article {
        site.load_article(article);
    }

    if !site.settle(timeout) {
        log::warn!("Rendering with {} fetch(es) unfinished", site.in_flight());
    }

    let html = render_page(&site.dom);
    match &cli.output {
        Some(path) => {
            fs::write(path, html)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", html),
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("folio: {}", e);
            match e {
                AppError::Config(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
