//! `[site]` section configuration.
//!
//! Values rendered into the `<head>` of every page.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// Placeholder in `title` replaced with the current page title.
pub const PAGE_NAME_PLACEHOLDER: &str = "%page_name%";

/// `[site]` section in marksite.toml.
///
/// # Example
/// ```toml
/// [site]
/// title = "%page_name% | My Site"
/// favicon = "/resources/favicon.ico"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Document title pattern, may contain `%page_name%`.
    #[serde(default = "defaults::site::title")]
    #[educe(Default = defaults::site::title())]
    pub title: String,

    /// Favicon URL, emitted as `<link rel="icon">` when set.
    #[serde(default = "defaults::site::favicon")]
    #[educe(Default = defaults::site::favicon())]
    pub favicon: Option<String>,

    /// BCP 47 language code for `<html lang>`.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,
}

impl SiteSection {
    /// Substitute the page title into the title pattern.
    pub fn page_title(&self, page_title: Option<&str>) -> String {
        self.title
            .replace(PAGE_NAME_PLACEHOLDER, page_title.unwrap_or_default())
    }
}
