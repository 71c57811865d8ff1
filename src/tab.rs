//! "Quick add" from the active browser tab.

use crate::model::Link;
use serde::{Deserialize, Serialize};

/// What the browser reports about the focused tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTab {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
}

impl ActiveTab {
    /// Pre-fill a link from this tab.  A blank title falls back to the
    /// URL's domain.
    pub fn to_link(&self) -> Link {
        let title = self.title.trim();
        let name = if title.is_empty() {
            extract_domain(&self.url).unwrap_or_else(|| self.url.clone())
        } else {
            title.to_string()
        };
        Link::new(name, self.url.clone()).with_icon(self.fav_icon_url.clone().unwrap_or_default())
    }
}

/// Host part of `url` without a leading `www.`, if it has one.
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(title: &str, url: &str) -> ActiveTab {
        ActiveTab {
            title: title.into(),
            url: url.into(),
            fav_icon_url: None,
        }
    }

    #[test]
    fn extract_domain_strips_www() {
        assert_eq!(extract_domain("https://www.rust-lang.org/learn").as_deref(), Some("rust-lang.org"));
        assert_eq!(extract_domain("http://docs.rs").as_deref(), Some("docs.rs"));
    }

    #[test]
    fn extract_domain_rejects_non_urls() {
        assert_eq!(extract_domain("not a url"), None);
        assert_eq!(extract_domain("mailto:someone@example.com"), None);
    }

    #[test]
    fn title_is_preferred() {
        let link = tab("Rust", "https://www.rust-lang.org").to_link();
        assert_eq!(link.name, "Rust");
        assert_eq!(link.url, "https://www.rust-lang.org");
    }

    #[test]
    fn blank_title_falls_back_to_domain() {
        let link = tab("  ", "https://www.github.com/rust-lang").to_link();
        assert_eq!(link.name, "github.com");
    }

    #[test]
    fn favicon_becomes_icon() {
        let mut t = tab("Docs", "https://docs.rs");
        t.fav_icon_url = Some("https://docs.rs/favicon.ico".into());
        assert_eq!(t.to_link().icon, "https://docs.rs/favicon.ico");
    }

    #[test]
    fn deserializes_browser_shape() {
        let t: ActiveTab = serde_json::from_str(
            r#"{"title":"X","url":"https://x.example","favIconUrl":"https://x.example/f.png"}"#,
        )
        .unwrap();
        assert_eq!(t.fav_icon_url.as_deref(), Some("https://x.example/f.png"));
    }
}
