//! Comparison-page URL parsing.
//!
//! A comparison view lives at `{origin}/{owner}/{name}/compare/{range}` where
//! the range is either a bare committish (`feature`) or a two-sided range
//! (`main...feature`). Everything the pipeline needs about the repository is
//! derived from that one URL, once per navigation event.

use regex::Regex;
use url::Url;

use crate::error::SelectorError;
use crate::{DEFAULT_TEMPLATE, PROJECT_TAG};

/// Repository coordinates extracted from a comparison-view URL.
///
/// Immutable for the lifetime of one dropdown activation; a new navigation
/// event builds a fresh one.
#[derive(Debug, Clone)]
pub struct RepoContext {
    /// Repository identifier in `owner/name` form.
    pub name_with_owner: String,
    /// The branch whose templates are fetched: the side after `...`, or the
    /// whole committish when the range has one side.
    pub branch: String,
    /// Scheme + host + repository path, e.g. `https://github.com/org/repo`.
    pub base_url: String,
}

impl RepoContext {
    /// Parse a comparison-view URL.
    ///
    /// The caller is responsible for only invoking this on URLs that already
    /// passed the comparison-page filter; any other path shape is a
    /// [`SelectorError::Parse`].
    pub fn from_url(url: &Url) -> Result<RepoContext, SelectorError> {
        let re = Regex::new(r"^/(.+)/compare/(?:.+\.\.\.)?(.+)$")
            .map_err(|e| SelectorError::Parse(e.to_string()))?;
        let caps = re
            .captures(url.path())
            .ok_or_else(|| SelectorError::Parse(url.path().to_string()))?;

        let name_with_owner = caps[1].to_string();
        let base_url = format!("{}/{}", url.origin().ascii_serialization(), name_with_owner);

        Ok(RepoContext {
            name_with_owner,
            branch: caps[2].to_string(),
            base_url,
        })
    }

    /// Durable-storage key under which the catalog summary is written for the
    /// selector widget.
    pub fn storage_key(&self) -> String {
        format!("ref-selector:{}:{}:tag", self.name_with_owner, PROJECT_TAG)
    }
}

/// The template highlighted on page load: the `template` query parameter, or
/// the default entry when the parameter is absent or empty.
pub fn selected_template(url: &Url) -> String {
    url.query_pairs()
        .find(|(k, _)| k == "template")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn parses_two_sided_range() {
        let ctx = RepoContext::from_url(&url("https://github.com/org/repo/compare/main...feature"))
            .unwrap();
        assert_eq!(ctx.name_with_owner, "org/repo");
        assert_eq!(ctx.branch, "feature");
        assert_eq!(ctx.base_url, "https://github.com/org/repo");
    }

    #[test]
    fn parses_single_committish() {
        let ctx =
            RepoContext::from_url(&url("https://github.com/org/repo/compare/feature")).unwrap();
        assert_eq!(ctx.branch, "feature");
    }

    #[test]
    fn branch_may_contain_slashes() {
        let ctx = RepoContext::from_url(&url(
            "https://github.com/org/repo/compare/main...feat/login/v2",
        ))
        .unwrap();
        assert_eq!(ctx.name_with_owner, "org/repo");
        assert_eq!(ctx.branch, "feat/login/v2");
    }

    #[test]
    fn range_start_with_dots_takes_last_separator() {
        let ctx =
            RepoContext::from_url(&url("https://github.com/org/repo/compare/a...b...c")).unwrap();
        assert_eq!(ctx.branch, "c");
    }

    #[test]
    fn query_parameters_do_not_affect_parsing() {
        let ctx = RepoContext::from_url(&url(
            "https://github.com/org/repo/compare/main...feature?template=bug.md",
        ))
        .unwrap();
        assert_eq!(ctx.branch, "feature");
    }

    #[test]
    fn rejects_paths_without_compare() {
        let err = RepoContext::from_url(&url("https://github.com/org/repo/pulls")).unwrap_err();
        assert!(matches!(err, SelectorError::Parse(_)));
    }

    #[test]
    fn rejects_compare_with_empty_range() {
        assert!(RepoContext::from_url(&url("https://github.com/org/repo/compare/")).is_err());
    }

    #[test]
    fn rejects_root_path() {
        assert!(RepoContext::from_url(&url("https://github.com/")).is_err());
    }

    #[test]
    fn storage_key_combines_repo_and_project_tag() {
        let ctx = RepoContext::from_url(&url("https://github.com/org/repo/compare/main...x"))
            .unwrap();
        assert_eq!(ctx.storage_key(), "ref-selector:org/repo:pr-templates:tag");
    }

    #[test]
    fn selected_template_defaults_when_absent() {
        let u = url("https://github.com/org/repo/compare/main...feature");
        assert_eq!(selected_template(&u), "default");
    }

    #[test]
    fn selected_template_reads_query_parameter() {
        let u = url("https://github.com/org/repo/compare/main...feature?template=bug.md");
        assert_eq!(selected_template(&u), "bug.md");
    }

    #[test]
    fn selected_template_treats_empty_as_absent() {
        let u = url("https://github.com/org/repo/compare/main...feature?template=");
        assert_eq!(selected_template(&u), "default");
    }
}
