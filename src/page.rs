//! The comparison-page surface the dropdown engine drives.
//!
//! The live page is an external collaborator; this module pins down the
//! element operations the engine relies on as the [`ComparePage`] trait, and
//! provides [`MemoryPage`], an in-memory comparison page used by the `prts`
//! harness and the test suite.

use url::Url;

use crate::base64_decode;
use crate::error::SelectorError;
use crate::{DEFAULT_TEMPLATE, DROPDOWN_ID};

// ============================================================================
// Page contract
// ============================================================================

/// Element operations the engine needs from a comparison page.
///
/// Every mutating method may fail with [`SelectorError::DomContract`] when
/// its target element is absent. Callers fail fast on the first such error
/// and apply no compensation; a half-updated page indicates a page-structure
/// change that should surface through normal diagnostics.
pub trait ComparePage {
    /// Current page location.
    fn location(&self) -> &Url;

    /// A client-side route change landed on `url`; the view re-renders and
    /// per-render element state is replaced.
    fn navigate(&mut self, url: Url);

    /// Whether the dropdown root (reserved id) is already in the document.
    fn dropdown_exists(&self) -> bool;

    /// Insert the rendered fragment immediately after the second sidebar
    /// item.
    fn insert_dropdown_after_sidebar(&mut self, html: &str) -> Result<(), SelectorError>;

    /// Write the chosen template body into the PR description field.
    fn set_pull_request_body(&mut self, text: &str) -> Result<(), SelectorError>;

    /// Check the radio input whose value is `name` and dispatch a bubbling
    /// `change` notification for form listeners.
    fn check_template_radio(&mut self, name: &str) -> Result<(), SelectorError>;

    /// Set (or, for `None`, remove) the selector widget's
    /// `current-committish` attribute, then dispatch `input-entered` with
    /// empty detail so the widget re-syncs its own rendering.
    fn set_ref_selector_committish(&mut self, encoded: Option<&str>) -> Result<(), SelectorError>;

    /// Replace the dropdown's visible label text.
    fn set_dropdown_label(&mut self, name: &str) -> Result<(), SelectorError>;

    /// Push a history entry. Never fires the route-change signal.
    fn push_history(&mut self, url: &Url);
}

/// Insert the rendered fragment unless the dropdown root already exists.
/// Idempotent: a rapid double-fire of the navigation signal must not produce
/// two dropdowns.
pub fn inject_dropdown<P: ComparePage>(page: &mut P, html: &str) -> Result<(), SelectorError> {
    if page.dropdown_exists() {
        return Ok(());
    }
    page.insert_dropdown_after_sidebar(html)
}

// ============================================================================
// In-memory page
// ============================================================================

/// Notifications dispatched into the page, recorded in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageNotification {
    /// Bubbling `change` from the radio whose value is the given name.
    Change(String),
    /// `input-entered` (empty detail) on the selector widget.
    InputEntered,
}

/// An intact comparison page held in memory: two sidebar items, a PR body
/// textarea, and the selector widget's observable state.
///
/// The widget's own rendering is modeled narrowly: on `input-entered` it
/// re-derives its displayed ref from the `current-committish` attribute
/// (base64-decoded), falling back to the default name when the attribute is
/// absent.
#[derive(Debug)]
pub struct MemoryPage {
    location: Url,
    history: Vec<Url>,
    /// Sidebar items present; the dropdown anchors after the second one.
    pub sidebar_items: usize,
    /// PR description content; `None` models a page missing the textarea.
    pub body: Option<String>,
    dropdown_html: Option<String>,
    checked_radio: Option<String>,
    committish_attr: Option<String>,
    label: String,
    widget_ref: String,
    /// Dispatched notifications, oldest first.
    pub notifications: Vec<PageNotification>,
}

impl MemoryPage {
    /// A fresh, intact comparison page at `url`.
    pub fn new(url: Url) -> MemoryPage {
        MemoryPage {
            history: vec![url.clone()],
            location: url,
            sidebar_items: 2,
            body: Some(String::new()),
            dropdown_html: None,
            checked_radio: None,
            committish_attr: None,
            label: String::new(),
            widget_ref: DEFAULT_TEMPLATE.to_string(),
            notifications: Vec::new(),
        }
    }

    /// The injected fragment, when present.
    pub fn dropdown_html(&self) -> Option<&str> {
        self.dropdown_html.as_deref()
    }

    /// Value of the currently checked template radio.
    pub fn checked_radio(&self) -> Option<&str> {
        self.checked_radio.as_deref()
    }

    /// The widget's `current-committish` attribute value.
    pub fn committish(&self) -> Option<&str> {
        self.committish_attr.as_deref()
    }

    /// The dropdown's visible label text.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The ref the widget itself currently displays.
    pub fn widget_ref(&self) -> &str {
        &self.widget_ref
    }

    /// All history entries, oldest first.
    pub fn history(&self) -> &[Url] {
        &self.history
    }

    fn resync_widget(&mut self) {
        self.widget_ref = self
            .committish_attr
            .as_deref()
            .and_then(base64_decode)
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());
    }
}

impl ComparePage for MemoryPage {
    fn location(&self) -> &Url {
        &self.location
    }

    fn navigate(&mut self, url: Url) {
        self.history.push(url.clone());
        self.location = url;
        self.dropdown_html = None;
        self.checked_radio = None;
        self.committish_attr = None;
        self.label.clear();
        self.widget_ref = DEFAULT_TEMPLATE.to_string();
        self.notifications.clear();
    }

    fn dropdown_exists(&self) -> bool {
        self.dropdown_html.is_some()
    }

    fn insert_dropdown_after_sidebar(&mut self, html: &str) -> Result<(), SelectorError> {
        if self.sidebar_items < 2 {
            return Err(SelectorError::DomContract(
                ".discussion-sidebar-item:nth-child(2)".to_string(),
            ));
        }
        self.dropdown_html = Some(html.to_string());
        Ok(())
    }

    fn set_pull_request_body(&mut self, text: &str) -> Result<(), SelectorError> {
        match self.body.as_mut() {
            Some(body) => {
                body.clear();
                body.push_str(text);
                Ok(())
            }
            None => Err(SelectorError::DomContract("#pull_request_body".to_string())),
        }
    }

    fn check_template_radio(&mut self, name: &str) -> Result<(), SelectorError> {
        if self.dropdown_html.is_none() {
            return Err(SelectorError::DomContract(format!(
                r#"input[value="{}"]"#,
                name
            )));
        }
        self.checked_radio = Some(name.to_string());
        self.notifications
            .push(PageNotification::Change(name.to_string()));
        Ok(())
    }

    fn set_ref_selector_committish(&mut self, encoded: Option<&str>) -> Result<(), SelectorError> {
        if self.dropdown_html.is_none() {
            return Err(SelectorError::DomContract(format!(
                "#{} ref-selector",
                DROPDOWN_ID
            )));
        }
        self.committish_attr = encoded.map(|value| value.to_string());
        self.notifications.push(PageNotification::InputEntered);
        self.resync_widget();
        Ok(())
    }

    fn set_dropdown_label(&mut self, name: &str) -> Result<(), SelectorError> {
        if self.dropdown_html.is_none() {
            return Err(SelectorError::DomContract(format!(
                "#{} summary span",
                DROPDOWN_ID
            )));
        }
        self.label = name.to_string();
        Ok(())
    }

    fn push_history(&mut self, url: &Url) {
        self.history.push(url.clone());
        self.location = url.clone();
    }
}
