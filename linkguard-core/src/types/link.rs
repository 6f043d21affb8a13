//! Link types.

use serde::{Deserialize, Serialize};

use crate::traits::LinkSource;

/// A hyperlink as found in a document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute target URL
    pub href: String,
    /// Trimmed anchor text
    #[serde(default)]
    pub text: String,
    /// Title attribute, empty when absent
    #[serde(default)]
    pub title: String,
}

impl Link {
    /// Creates a link with only a target URL.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: String::new(),
            title: String::new(),
        }
    }

    /// Sets the anchor text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into().trim().to_string();
        self
    }

    /// Sets the title attribute.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Label used in reports: the anchor text, or the URL when there is none.
    pub fn label(&self) -> &str {
        if self.text.is_empty() {
            &self.href
        } else {
            &self.text
        }
    }
}

/// The links of a page as captured by the page context.
///
/// Page contexts send this along with inspection requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// All links in document order
    #[serde(default)]
    pub links: Vec<Link>,
    /// Link under the current selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<Link>,
}

impl PageSnapshot {
    /// Creates a snapshot from a list of links with no selection.
    pub fn new(links: Vec<Link>) -> Self {
        Self { links, selected: None }
    }

    /// Marks a link as selected.
    pub fn with_selection(mut self, link: Link) -> Self {
        self.selected = Some(link);
        self
    }
}

impl LinkSource for PageSnapshot {
    fn list_links(&self) -> Vec<Link> {
        self.links.clone()
    }

    fn selected_link(&self) -> Option<Link> {
        self.selected.clone()
    }
}
