//! Applying a dropdown selection to the page.
//!
//! A selection fans out into five page mutations (description text, radio,
//! widget attribute, label, history entry). Everything the mutations need is
//! computed up front in a [`SelectionState`] so the writes themselves are a
//! straight fail-fast sequence.

use url::Url;

use crate::base64_encode;
use crate::catalog::TemplateCatalog;
use crate::error::SelectorError;
use crate::page::ComparePage;
use crate::DEFAULT_TEMPLATE;

// ============================================================================
// Click events
// ============================================================================

/// A click observed inside the dropdown. `ref_name` carries the clicked
/// item's template name when the click landed on a menu item at all.
#[derive(Debug, Clone)]
pub struct DropdownClick {
    pub ref_name: Option<String>,
}

impl DropdownClick {
    /// Click on the menu item for `name`.
    pub fn item(name: &str) -> DropdownClick {
        DropdownClick {
            ref_name: Some(name.to_string()),
        }
    }

    /// Click somewhere in the dropdown that is not a menu item.
    pub fn elsewhere() -> DropdownClick {
        DropdownClick { ref_name: None }
    }
}

/// What a dropdown click amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click selected a template and the page was updated.
    Handled,
    /// The click carried no template name; the page was left untouched.
    Ignored,
}

// ============================================================================
// Selection state
// ============================================================================

/// Everything one selection changes on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    /// Selected template name.
    pub name: String,
    /// Location with the selection reflected in its `template` parameter.
    pub url: Url,
    /// Widget committish attribute value; `None` clears the attribute when
    /// the default template is selected.
    pub committish: Option<String>,
}

impl SelectionState {
    /// Compute the state for selecting `name` while the page is at
    /// `current`. Selecting the default template removes the `template`
    /// parameter instead of writing it.
    pub fn new(name: &str, current: &Url) -> SelectionState {
        let is_default = name == DEFAULT_TEMPLATE;
        let url = if is_default {
            with_template_param(current, None)
        } else {
            with_template_param(current, Some(name))
        };
        SelectionState {
            name: name.to_string(),
            url,
            committish: if is_default {
                None
            } else {
                Some(base64_encode(name))
            },
        }
    }

    /// Apply this selection to `page`, with `catalog` supplying the body
    /// text. Mutations run in a fixed order (description, radio, widget
    /// attribute, label, history) and stop at the first contract failure. A
    /// name the catalog does not know writes an empty description; the rest
    /// of the mutations still run.
    pub fn apply<P: ComparePage>(
        &self,
        catalog: &TemplateCatalog,
        page: &mut P,
    ) -> Result<(), SelectorError> {
        page.set_pull_request_body(catalog.get(&self.name).unwrap_or(""))?;
        page.check_template_radio(&self.name)?;
        page.set_ref_selector_committish(self.committish.as_deref())?;
        page.set_dropdown_label(&self.name)?;
        page.push_history(&self.url);
        Ok(())
    }
}

/// React to a click inside the dropdown. Clicks that did not land on a menu
/// item are ignored without touching the page.
pub fn handle_dropdown_click<P: ComparePage>(
    catalog: &TemplateCatalog,
    page: &mut P,
    click: &DropdownClick,
) -> Result<ClickOutcome, SelectorError> {
    let name = match click.ref_name.as_deref() {
        Some(name) => name,
        None => return Ok(ClickOutcome::Ignored),
    };
    let current = page.location().clone();
    SelectionState::new(name, &current).apply(catalog, page)?;
    Ok(ClickOutcome::Handled)
}

// ============================================================================
// Query rewriting
// ============================================================================

/// Rewrite the `template` query parameter the way the browser's search-params
/// API does: setting a value replaces the first occurrence in place and drops
/// any later duplicates, or appends when the parameter is absent; `None`
/// removes every occurrence. All other parameters keep their order. A query
/// left with no pairs disappears entirely rather than serializing as `?`.
fn with_template_param(url: &Url, template: Option<&str>) -> Url {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    match template {
        Some(value) => match pairs.iter().position(|(key, _)| key == "template") {
            Some(first) => {
                pairs[first].1 = value.to_string();
                let mut index = 0;
                pairs.retain(|(key, _)| {
                    let keep = index <= first || key != "template";
                    index += 1;
                    keep
                });
            }
            None => pairs.push(("template".to_string(), value.to_string())),
        },
        None => pairs.retain(|(key, _)| key != "template"),
    }

    let mut next = url.clone();
    if pairs.is_empty() {
        next.set_query(None);
    } else {
        next.query_pairs_mut().clear().extend_pairs(pairs);
    }
    next
}
