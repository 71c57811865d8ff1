//! Bookmark tree import.
//!
//! A bookmark tree is a forest of [`BookmarkNode`]s: nodes with a `url` are
//! links, nodes without one are folders.  [`flatten`] walks the tree
//! depth-first and turns every (selected) link into a [`Link`] candidate
//! ready for [`LinkStore::append_many`](crate::links::LinkStore::append_many).
//!
//! # Tree format
//!
//! [`JsonBookmarkFile`] reads the same shape a browser's bookmark API
//! returns:
//!
//! ```json
//! [{ "id": "0", "title": "", "children": [
//!     { "id": "1", "title": "Bookmarks bar", "children": [
//!         { "id": "5", "title": "Rust", "url": "https://www.rust-lang.org" }
//!     ]}
//! ]}]
//! ```

use crate::model::{Link, MAX_LINK_NAME_CHARS};
use crate::traits::BookmarkSource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Marker appended to names that were shortened.
const ELLIPSIS: char = '…';

/// One node of a bookmark tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    /// A leaf (link) node.
    pub fn link(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: Some(url.into()),
            children: None,
        }
    }

    /// A folder node.
    pub fn folder(id: impl Into<String>, title: impl Into<String>, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: None,
            children: Some(children),
        }
    }

    pub fn is_link(&self) -> bool {
        self.url.is_some()
    }
}

/// Which links of the tree to import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every link in the tree.
    #[default]
    All,
    /// Only links whose id is in the set.
    Ids(HashSet<String>),
}

impl Selection {
    fn includes(&self, id: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Ids(ids) => ids.contains(id),
        }
    }
}

impl From<Option<Vec<String>>> for Selection {
    fn from(ids: Option<Vec<String>>) -> Self {
        match ids {
            Some(ids) => Selection::Ids(ids.into_iter().collect()),
            None => Selection::All,
        }
    }
}

/// Flatten `roots` into link candidates, depth-first in encounter order.
///
/// Candidates carry no icon (bookmark trees do not provide one) and the
/// default colors.  Names longer than the link limit are shortened and end
/// with an ellipsis.
pub fn flatten(roots: &[BookmarkNode], selection: &Selection) -> Vec<Link> {
    let mut out = Vec::new();
    collect(roots, selection, &mut out);
    out
}

fn collect(nodes: &[BookmarkNode], selection: &Selection, out: &mut Vec<Link>) {
    for node in nodes {
        if let Some(url) = &node.url {
            if selection.includes(&node.id) {
                out.push(Link::new(shorten_title(&node.title), url.clone()));
            }
        }
        if let Some(children) = &node.children {
            collect(children, selection, out);
        }
    }
}

/// Shorten `title` to at most [`MAX_LINK_NAME_CHARS`] characters, the last
/// of which is an ellipsis when anything was cut.
pub fn shorten_title(title: &str) -> String {
    if title.chars().count() <= MAX_LINK_NAME_CHARS {
        return title.to_string();
    }
    let mut short: String = title.chars().take(MAX_LINK_NAME_CHARS - 1).collect();
    short.push(ELLIPSIS);
    short
}

//  JSON file source

/// A [`BookmarkSource`] reading a tree dump from a JSON file.
pub struct JsonBookmarkFile {
    path: PathBuf,
}

/// Errors produced while reading a bookmark dump.
#[derive(Debug, thiserror::Error)]
pub enum BookmarkError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("bookmark file is not a valid tree: {0}")]
    Json(#[from] serde_json::Error),
}

impl JsonBookmarkFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl BookmarkSource for JsonBookmarkFile {
    type Error = BookmarkError;

    fn tree(&self) -> Result<Vec<BookmarkNode>, BookmarkError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| BookmarkError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Vec<BookmarkNode> {
        vec![BookmarkNode::folder(
            "0",
            "",
            vec![
                BookmarkNode::folder(
                    "1",
                    "Bar",
                    vec![
                        BookmarkNode::link("10", "First", "https://first"),
                        BookmarkNode::folder(
                            "11",
                            "Nested",
                            vec![BookmarkNode::link("12", "Deep", "https://deep")],
                        ),
                        BookmarkNode::link("13", "Third", "https://third"),
                    ],
                ),
                BookmarkNode::link("2", "Loose", "https://loose"),
            ],
        )]
    }

    fn names(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn flatten_is_depth_first_in_encounter_order() {
        let links = flatten(&sample_tree(), &Selection::All);
        assert_eq!(names(&links), vec!["First", "Deep", "Third", "Loose"]);
    }

    #[test]
    fn flatten_respects_selection() {
        let selection = Selection::from(Some(vec!["12".to_string(), "2".to_string()]));
        let links = flatten(&sample_tree(), &selection);
        assert_eq!(names(&links), vec!["Deep", "Loose"]);
    }

    #[test]
    fn folders_are_never_candidates() {
        let selection = Selection::from(Some(vec!["1".to_string(), "11".to_string()]));
        assert!(flatten(&sample_tree(), &selection).is_empty());
    }

    #[test]
    fn candidates_have_no_icon_and_default_colors() {
        let links = flatten(&sample_tree(), &Selection::All);
        for l in links {
            assert!(l.icon.is_empty());
            assert_eq!(l.bg_color, "#FFFFFF");
            assert!(l.text_icon.is_empty());
            assert_eq!(l.text_bg_color, "#ff4757");
        }
    }

    #[test]
    fn long_titles_are_shortened_with_marker() {
        let short = shorten_title("The Rust Programming Language Book");
        assert_eq!(short.chars().count(), MAX_LINK_NAME_CHARS);
        assert!(short.ends_with('…'));
        assert!(short.starts_with("The Rust Programmin"));
    }

    #[test]
    fn titles_at_the_limit_are_kept() {
        let exact = "x".repeat(MAX_LINK_NAME_CHARS);
        assert_eq!(shorten_title(&exact), exact);
    }

    #[test]
    fn json_file_source_reads_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        std::fs::write(
            &path,
            r#"[{"id":"0","children":[{"id":"5","title":"Rust","url":"https://www.rust-lang.org"}]}]"#,
        )
        .unwrap();
        let tree = JsonBookmarkFile::new(&path).tree().unwrap();
        let links = flatten(&tree, &Selection::All);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://www.rust-lang.org");
    }

    #[test]
    fn json_file_source_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(
            JsonBookmarkFile::new(&path).tree(),
            Err(BookmarkError::Json(_))
        ));
    }
}
