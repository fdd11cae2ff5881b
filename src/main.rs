//! prts - command-line harness for the template dropdown engine.
//!
//! Drives the full pipeline against a real host from the terminal: visits a
//! comparison URL on an in-memory page, reports what was discovered and
//! injected, and optionally applies template selections the way dropdown
//! clicks would.
//!
//! The engine is organized into the following modules:
//!
//! - `context`: comparison-URL parsing and repository context
//! - `fetch`: template downloads over HTTP
//! - `discover`: directory-listing scrape for extra templates
//! - `catalog`: the name-to-body map and its cached summary
//! - `render`: fragment substitution from the embedded asset
//! - `page`: the element operations a comparison page must offer
//! - `select`: applying a chosen template to the page
//! - `watch`: location-change handling and activation

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use pr_template_selector::{
    App, ClickOutcome, ComparePage, Config, DropdownClick, MemoryPage, NavigationWatcher,
};

// ============================================================================
// Main
// ============================================================================

#[derive(Parser)]
#[command(name = "prts", about = "PR template dropdown harness", version)]
struct Cli {
    /// Comparison URL to visit (e.g. https://github.com/org/repo/compare/main...topic)
    url: String,

    /// Template to select once the dropdown is up; repeat to select several in order
    #[arg(long = "select")]
    selections: Vec<String>,

    /// Host whose comparison pages are handled (default github.com, or PRTS_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Cache database location (default .prts_db, or PRTS_DB)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let start = match Url::parse(&cli.url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Invalid URL {}: {}", cli.url, e);
            std::process::exit(1);
        }
    };

    let app = Arc::new(App::new(config));
    let page = MemoryPage::new(start);
    let mut watcher = NavigationWatcher::new(app, page);

    if let Err(e) = watcher.visit(&cli.url).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    match watcher.active() {
        Some(active) => {
            println!("Dropdown active for {}", active.context.name_with_owner);
            println!("Templates: {}", active.catalog.names().join(", "));
        }
        None => {
            eprintln!("No dropdown was activated for {}", cli.url);
            eprintln!("Either this is not a comparison URL on the configured host,");
            eprintln!("or template loading failed (re-run with --log-level debug).");
            std::process::exit(1);
        }
    }

    for name in &cli.selections {
        match watcher.on_click(&DropdownClick::item(name)) {
            Ok(ClickOutcome::Handled) => println!("Selected {}", name),
            Ok(ClickOutcome::Ignored) => println!("Ignored {}", name),
            Err(e) => {
                eprintln!("Failed to select {}: {}", name, e);
                std::process::exit(1);
            }
        }
    }

    let page = watcher.page();
    println!();
    println!("Location: {}", page.location());
    println!("Label:    {}", page.label());
    println!("Widget:   {}", page.widget_ref());
    if let Some(previous) = page.history().iter().rev().nth(1) {
        println!("History:  {} entries, previous {}", page.history().len(), previous);
    }
    match page.body.as_deref() {
        Some(body) if !body.is_empty() => {
            println!("Description:");
            println!("{}", body);
        }
        Some(_) => println!("Description: (empty)"),
        None => println!("Description: (no textarea)"),
    }
}
