//! Template and listing requests against the repository host.

use reqwest::Client;

use crate::context::RepoContext;
use crate::error::SelectorError;
use crate::TEMPLATE_DIR;

/// Issues the raw-file and directory-listing requests for one repository.
///
/// Bodies are taken as text without inspecting the HTTP status: a missing
/// template file yields whatever error page the host serves, and that text
/// becomes the template's content. Only transport failures are errors.
pub struct TemplateFetcher {
    client: Client,
    base_url: String,
    branch: String,
}

impl TemplateFetcher {
    pub fn new(client: Client, ctx: &RepoContext) -> TemplateFetcher {
        TemplateFetcher {
            client,
            base_url: ctx.base_url.clone(),
            branch: ctx.branch.clone(),
        }
    }

    /// URL of a raw file under the repository's `.github/` directory.
    pub fn raw_url(&self, path: &str) -> String {
        format!("{}/raw/{}/.github/{}", self.base_url, self.branch, path)
    }

    /// URL of the custom-template directory listing page.
    pub fn listing_url(&self) -> String {
        format!("{}/tree/{}/.github/{}", self.base_url, self.branch, TEMPLATE_DIR)
    }

    /// Fetch a raw template file, e.g. `pull_request_template.md` or
    /// `PULL_REQUEST_TEMPLATE/bug.md`.
    pub async fn fetch_raw(&self, path: &str) -> Result<String, SelectorError> {
        self.get_text(&self.raw_url(path)).await
    }

    /// Fetch the HTML listing of the custom-template directory.
    pub async fn fetch_template_listing(&self) -> Result<String, SelectorError> {
        self.get_text(&self.listing_url()).await
    }

    async fn get_text(&self, url: &str) -> Result<String, SelectorError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SelectorError::Fetch(format!("{}: {}", url, e)))?;
        response
            .text()
            .await
            .map_err(|e| SelectorError::Fetch(format!("{}: {}", url, e)))
    }
}
