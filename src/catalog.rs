//! The per-activation template catalog and its persisted summary.

use indexmap::IndexMap;
use serde::Serialize;

use crate::context::RepoContext;
use crate::discover::discover_custom;
use crate::error::SelectorError;
use crate::fetch::TemplateFetcher;
use crate::{DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_FILE, PROJECT_TAG};

// ============================================================================
// Catalog
// ============================================================================

/// Name → body mapping for one dropdown activation.
///
/// Built once per navigation event, read-only afterwards. The default entry
/// is inserted first; discovered entries follow in listing order. A
/// discovered file literally named `default` overwrites the default body but
/// keeps the first position.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: IndexMap<String, String>,
}

impl TemplateCatalog {
    /// Start a catalog holding only the default template body.
    pub fn new(default_body: String) -> TemplateCatalog {
        let mut templates = IndexMap::new();
        templates.insert(DEFAULT_TEMPLATE.to_string(), default_body);
        TemplateCatalog { templates }
    }

    /// Overlay discovered entries; an existing name is overwritten in place.
    pub fn overlay(&mut self, custom: IndexMap<String, String>) {
        for (name, body) in custom {
            self.templates.insert(name, body);
        }
    }

    /// Body for a template name, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(|body| body.as_str())
    }

    /// All template names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

// ============================================================================
// Persisted summary
// ============================================================================

/// The slice of catalog state the selector widget reads back from durable
/// storage: the ordered ref names plus the widget's cache key.
#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub refs: Vec<String>,
    #[serde(rename = "cacheKey")]
    pub cache_key: String,
}

impl CatalogSummary {
    pub fn of(catalog: &TemplateCatalog) -> CatalogSummary {
        CatalogSummary {
            refs: catalog.names(),
            cache_key: PROJECT_TAG.to_string(),
        }
    }
}

/// Write the summary under the repository's widget key. Fire-and-forget:
/// storage problems never propagate to the activation.
pub fn persist_summary(db: &sled::Db, ctx: &RepoContext, catalog: &TemplateCatalog) {
    let summary = CatalogSummary::of(catalog);
    if let Ok(json) = serde_json::to_vec(&summary) {
        if let Err(e) = db.insert(ctx.storage_key().as_bytes(), json) {
            tracing::debug!("catalog summary write failed: {}", e);
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Fetch the default template and run discovery concurrently, build the
/// catalog, and persist its summary for the widget.
pub async fn load_catalog(
    fetcher: &TemplateFetcher,
    db: &sled::Db,
    ctx: &RepoContext,
) -> Result<TemplateCatalog, SelectorError> {
    let (default_body, custom) = tokio::join!(
        fetcher.fetch_raw(DEFAULT_TEMPLATE_FILE),
        discover_custom(fetcher),
    );

    let mut catalog = TemplateCatalog::new(default_body?);
    catalog.overlay(custom?);

    persist_summary(db, ctx, &catalog);
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn catalog_with_two_custom() -> TemplateCatalog {
        let mut catalog = TemplateCatalog::new("D".to_string());
        let mut custom = IndexMap::new();
        custom.insert("a".to_string(), "A".to_string());
        custom.insert("b".to_string(), "B".to_string());
        catalog.overlay(custom);
        catalog
    }

    #[test]
    fn default_entry_comes_first_then_listing_order() {
        let catalog = catalog_with_two_custom();
        assert_eq!(catalog.names(), vec!["default", "a", "b"]);
        assert_eq!(catalog.get("default"), Some("D"));
        assert_eq!(catalog.get("a"), Some("A"));
        assert_eq!(catalog.get("b"), Some("B"));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(catalog_with_two_custom().get("missing"), None);
    }

    #[test]
    fn custom_entry_named_default_overwrites_in_place() {
        let mut catalog = TemplateCatalog::new("stock".to_string());
        let mut custom = IndexMap::new();
        custom.insert("first.md".to_string(), "1".to_string());
        custom.insert("default".to_string(), "shadowed".to_string());
        catalog.overlay(custom);

        assert_eq!(catalog.get("default"), Some("shadowed"));
        assert_eq!(catalog.names(), vec!["default", "first.md"]);
    }

    #[test]
    fn summary_serializes_with_camel_case_cache_key() {
        let summary = CatalogSummary::of(&catalog_with_two_custom());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "refs": ["default", "a", "b"],
                "cacheKey": "pr-templates",
            })
        );
    }

    #[test]
    fn persist_summary_writes_under_the_widget_key() {
        let dir = tempfile::tempdir().unwrap();
        let db = sled::open(dir.path().join("db")).unwrap();
        let url = Url::parse("https://github.com/org/repo/compare/main...x").unwrap();
        let ctx = RepoContext::from_url(&url).unwrap();

        persist_summary(&db, &ctx, &catalog_with_two_custom());

        let raw = db
            .get(b"ref-selector:org/repo:pr-templates:tag")
            .unwrap()
            .expect("summary should be stored");
        let stored: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(stored["refs"][0], "default");
        assert_eq!(stored["refs"][2], "b");
        assert_eq!(stored["cacheKey"], "pr-templates");
    }
}
