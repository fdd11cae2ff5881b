//! Pull-request template selection for repository comparison pages.
//!
//! Turns a bare comparison view into one with a template dropdown: discovers
//! the templates a repository ships under `.github/`, renders a selector
//! fragment for the page sidebar, and keeps the PR description, the URL, and
//! the selector widget consistent as templates are chosen and the host
//! application swaps pages in place.

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use sled::Db;

pub mod catalog;
pub mod context;
pub mod discover;
pub mod error;
pub mod fetch;
pub mod page;
pub mod render;
pub mod select;
pub mod watch;

// ============================================================================
// Configuration
// ============================================================================

/// Host whose comparison pages get a dropdown by default.
pub const GITHUB_HOST: &str = "github.com";

/// Name under which the repository's baseline template is offered.
pub const DEFAULT_TEMPLATE: &str = "default";

/// File holding the baseline template, relative to `.github/`.
pub const DEFAULT_TEMPLATE_FILE: &str = "pull_request_template.md";

/// Directory of additional templates, relative to `.github/`.
pub const TEMPLATE_DIR: &str = "PULL_REQUEST_TEMPLATE";

/// Tag distinguishing this feature's cache entries and widget wiring from
/// the branch selectors it borrows its markup from.
pub const PROJECT_TAG: &str = "pr-templates";

/// Element id reserved for the dropdown root.
pub const DROPDOWN_ID: &str = "template-selector";

pub const DB_PATH: &str = ".prts_db";

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host whose comparison pages are handled.
    pub host: String,
    /// Location of the cache database.
    pub db_path: PathBuf,
}

impl Config {
    /// Read settings from `PRTS_HOST` and `PRTS_DB`, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Config {
        let host = std::env::var("PRTS_HOST").unwrap_or_else(|_| GITHUB_HOST.to_string());
        let db_path = std::env::var("PRTS_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DB_PATH));
        Config { host, db_path }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            host: GITHUB_HOST.to_string(),
            db_path: PathBuf::from(DB_PATH),
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Shared state for one selector instance: configuration, the summary cache
/// database, and the HTTP client template fetches go through.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub db: Db,
    pub client: Client,
}

impl App {
    pub fn new(config: Config) -> App {
        let db = sled::open(&config.db_path).expect("Failed to open database");

        // Requests carry cookies so private repositories resolve the same
        // way they do for the signed-in page around us.
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        App { config, db, client }
    }
}

// ============================================================================
// Encoding Helpers
// ============================================================================

/// Encode a value for embedding in an element attribute.
pub fn base64_encode(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

/// Decode an attribute value written by [`base64_encode`]. Malformed input
/// yields `None` rather than an error.
pub fn base64_decode(value: &str) -> Option<String> {
    let bytes = STANDARD.decode(value).ok()?;
    String::from_utf8(bytes).ok()
}

// Re-export commonly used types
pub use catalog::{load_catalog, persist_summary, CatalogSummary, TemplateCatalog};
pub use context::{selected_template, RepoContext};
pub use discover::{base_name, discover_custom, template_paths};
pub use error::SelectorError;
pub use fetch::TemplateFetcher;
pub use page::{inject_dropdown, ComparePage, MemoryPage, PageNotification};
pub use render::{load_asset, render_dropdown};
pub use select::{handle_dropdown_click, ClickOutcome, DropdownClick, SelectionState};
pub use watch::{activate, is_compare_url, ActiveDropdown, NavigationWatcher};
