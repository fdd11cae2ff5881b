//! Dropdown fragment rendering from the bundled markup asset.

use rust_embed::Embed;

use crate::context::RepoContext;
use crate::error::SelectorError;
use crate::{base64_encode, DEFAULT_TEMPLATE, PROJECT_TAG};

/// Markup bundled with the crate.
#[derive(Embed)]
#[folder = "assets"]
struct Assets;

/// Name of the dropdown fragment asset.
pub const DROPDOWN_ASSET: &str = "dropdown.html";

/// Load a bundled markup asset as text.
pub fn load_asset(name: &str) -> Result<String, SelectorError> {
    let file = Assets::get(name).ok_or_else(|| SelectorError::AssetLoad(name.to_string()))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|_| SelectorError::AssetLoad(format!("{} is not UTF-8", name)))
}

/// Render the dropdown fragment for one activation.
///
/// The catalog's contents are not embedded here; the selector widget re-reads
/// the ref list from durable storage via the name-with-owner and cache-key
/// values, and only the default name and the currently selected name appear
/// in the markup itself.
pub fn render_dropdown(ctx: &RepoContext, current: &str) -> Result<String, SelectorError> {
    Ok(substitute(&load_asset(DROPDOWN_ASSET)?, ctx, current))
}

/// Literal placeholder substitution, first occurrence only per placeholder.
/// The widget's own `{{ name }}` client-side template tokens use a different
/// spelling and must pass through untouched.
fn substitute(markup: &str, ctx: &RepoContext, current: &str) -> String {
    let scoped = format!("{}:{}", ctx.name_with_owner, PROJECT_TAG);

    markup
        .replacen("{{default-template}}", DEFAULT_TEMPLATE, 1)
        .replacen("{{default-template64}}", &base64_encode(DEFAULT_TEMPLATE), 1)
        .replacen("{{name-with-owner64}}", &base64_encode(&scoped), 1)
        .replacen("{{current-committish}}", current, 1)
        .replacen("{{current-committish64}}", &base64_encode(current), 1)
        .replacen("{{cache-key}}", PROJECT_TAG, 1)
}
