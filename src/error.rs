//! Error types for the template-dropdown pipeline.
//!
//! Every stage maps its failures onto one of four kinds. Pipeline errors are
//! only caught at the navigation watcher, which logs them and gives up on the
//! activation; selection-time errors propagate to the embedder.

use std::fmt;

/// Failure kinds for template discovery, rendering, and page updates.
#[derive(Debug, Clone)]
pub enum SelectorError {
    /// The page URL does not have the comparison-view path shape.
    Parse(String),
    /// A network request for a template or listing failed at the transport level.
    Fetch(String),
    /// The bundled dropdown markup asset is missing or unreadable.
    AssetLoad(String),
    /// An element the page contract promises was absent when we touched it.
    DomContract(String),
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::Parse(msg) => write!(f, "Not a comparison-view URL: {}", msg),
            SelectorError::Fetch(msg) => write!(f, "Template fetch failed: {}", msg),
            SelectorError::AssetLoad(msg) => write!(f, "Dropdown asset unavailable: {}", msg),
            SelectorError::DomContract(msg) => {
                write!(f, "Expected page element missing: {}", msg)
            }
        }
    }
}

impl std::error::Error for SelectorError {}
