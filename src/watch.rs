//! Route-change monitoring and dropdown activation.
//!
//! Host applications swap page content in place, so arrival on a comparison
//! view is signalled by location updates rather than page loads. The
//! [`NavigationWatcher`] consumes those signals, activates the dropdown on
//! comparison URLs, and routes later dropdown clicks to the catalog built
//! during activation.

use std::sync::Arc;

use regex::Regex;
use tokio::sync::mpsc;
use url::Url;

use crate::catalog::{load_catalog, TemplateCatalog};
use crate::context::{selected_template, RepoContext};
use crate::error::SelectorError;
use crate::fetch::TemplateFetcher;
use crate::page::{inject_dropdown, ComparePage};
use crate::render::render_dropdown;
use crate::select::{handle_dropdown_click, ClickOutcome, DropdownClick};
use crate::App;

// ============================================================================
// URL filtering
// ============================================================================

/// Whether `href` is a comparison view on `host`. Only such locations get a
/// dropdown; everything else is ignored outright.
pub fn is_compare_url(host: &str, href: &str) -> bool {
    let pattern = format!(r"^https?://{}/.+/compare/.+$", regex::escape(host));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(href),
        Err(_) => false,
    }
}

// ============================================================================
// Activation
// ============================================================================

/// A live dropdown: the repository context it was rendered for and the
/// catalog backing its menu items.
#[derive(Debug)]
pub struct ActiveDropdown {
    pub context: RepoContext,
    pub catalog: TemplateCatalog,
}

/// Run the full activation pipeline for the comparison page at `url`:
/// derive the repository context, load the template catalog, render the
/// fragment for the template named in the URL, and inject it.
pub async fn activate<P: ComparePage>(
    app: &App,
    page: &mut P,
    url: &Url,
) -> Result<ActiveDropdown, SelectorError> {
    let context = RepoContext::from_url(url)?;
    let fetcher = TemplateFetcher::new(app.client.clone(), &context);
    let catalog = load_catalog(&fetcher, &app.db, &context).await?;

    let current = selected_template(url);
    let html = render_dropdown(&context, &current)?;
    inject_dropdown(page, &html)?;

    Ok(ActiveDropdown { context, catalog })
}

// ============================================================================
// Watcher
// ============================================================================

/// Drives one page through location changes and dropdown clicks.
pub struct NavigationWatcher<P: ComparePage> {
    app: Arc<App>,
    page: P,
    active: Option<ActiveDropdown>,
}

impl<P: ComparePage> NavigationWatcher<P> {
    pub fn new(app: Arc<App>, page: P) -> NavigationWatcher<P> {
        NavigationWatcher {
            app,
            page,
            active: None,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    /// The dropdown activated for the current location, when there is one.
    pub fn active(&self) -> Option<&ActiveDropdown> {
        self.active.as_ref()
    }

    /// React to a location update. Non-comparison locations are ignored, as
    /// is any signal that arrives while a dropdown is already in the page;
    /// location signals commonly fire more than once per route change.
    /// Activation failures are logged and swallowed so the watcher keeps
    /// serving later navigations.
    pub async fn on_location_change(&mut self, href: &str) {
        if !is_compare_url(&self.app.config.host, href) {
            return;
        }
        if self.page.dropdown_exists() {
            return;
        }
        let url = match Url::parse(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Failed to parse location {}: {}", href, e);
                return;
            }
        };
        tracing::debug!("Activating dropdown for {}", href);
        match activate(&self.app, &mut self.page, &url).await {
            Ok(active) => {
                tracing::debug!(
                    "Activated dropdown for {} with {} templates",
                    active.context.name_with_owner,
                    active.catalog.len()
                );
                self.active = Some(active);
            }
            Err(e) => {
                tracing::error!("Failed to activate dropdown for {}: {}", href, e);
            }
        }
    }

    /// Navigate the page to `href` and deliver the matching location signal.
    /// This is the harness entry point; a real embedding navigates the page
    /// itself and only forwards signals.
    pub async fn visit(&mut self, href: &str) -> Result<(), SelectorError> {
        let url = Url::parse(href).map_err(|e| SelectorError::Parse(e.to_string()))?;
        self.page.navigate(url);
        self.on_location_change(href).await;
        Ok(())
    }

    /// Route a dropdown click to the active catalog. Clicks arriving while
    /// no dropdown is active are ignored.
    pub fn on_click(&mut self, click: &DropdownClick) -> Result<ClickOutcome, SelectorError> {
        match self.active.as_ref() {
            Some(active) => handle_dropdown_click(&active.catalog, &mut self.page, click),
            None => Ok(ClickOutcome::Ignored),
        }
    }

    /// Consume location signals until the channel closes.
    pub async fn run(&mut self, mut locations: mpsc::Receiver<String>) {
        while let Some(href) = locations.recv().await {
            self.on_location_change(&href).await;
        }
    }
}
