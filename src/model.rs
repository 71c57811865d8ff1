//! Data types shared by every component.
//!
//! [`CategoryId`], [`Category`] and [`Link`] are the records the registry
//! and link store manage; [`CategorizedLinks`] is the persisted map that ties
//! them together.  The on-disk shape uses the same camelCase keys as the
//! import/export document, so one set of serde derives covers both.

use crate::error::LauncherError;
use crate::icon::Icon;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of links a single category can hold.
pub const MAX_LINKS_PER_CATEGORY: usize = 45;

/// Link names are cut to this many characters when written.
pub const MAX_LINK_NAME_CHARS: usize = 20;

/// Default link tile background.
pub const DEFAULT_BG_COLOR: &str = "#FFFFFF";

/// Default badge background.
pub const DEFAULT_TEXT_BG_COLOR: &str = "#ff4757";

/// Map from category id to its ordered links.  A missing key reads as an
/// empty list.
pub type CategorizedLinks = BTreeMap<CategoryId, Vec<Link>>;

/// Identifier of a category.
///
/// Built-in categories use the small fixed ids `0..=4`.  Id `5` is reserved
/// for the "create category" affordance and never names a real bucket.
/// User-created categories get millisecond timestamps.
///
/// On the wire an id may be a JSON number or a numeric string; it is always
/// written back as a number (or as a string key inside JSON objects).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub u64);

impl CategoryId {
    /// The primary built-in category, used as the fallback selection.
    pub const PRIMARY: CategoryId = CategoryId(0);

    /// Id occupied by the "create category" affordance.
    pub const CREATE: CategoryId = CategoryId(5);

    /// Whether this id belongs to a code-defined category.
    pub fn is_builtin(self) -> bool {
        self.0 < Self::CREATE.0
    }

    /// Whether this id is the reserved "create category" id.
    pub fn is_reserved(self) -> bool {
        self == Self::CREATE
    }

    /// Built-in and reserved ids can never be edited or removed.
    pub fn is_protected(self) -> bool {
        self.0 <= Self::CREATE.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for CategoryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = CategoryId;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "non-negative integer or numeric string")
            }
            fn visit_u64<E>(self, n: u64) -> Result<CategoryId, E> {
                Ok(CategoryId(n))
            }
            fn visit_i64<E>(self, n: i64) -> Result<CategoryId, E>
            where
                E: DeError,
            {
                u64::try_from(n)
                    .map(CategoryId)
                    .map_err(|_| DeError::custom(format!("category id must be non-negative, got {}", n)))
            }
            fn visit_str<E>(self, s: &str) -> Result<CategoryId, E>
            where
                E: DeError,
            {
                s.trim()
                    .parse()
                    .map(CategoryId)
                    .map_err(|_| DeError::custom(format!("invalid category id: {:?}", s)))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// A named grouping of links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub icon: Icon,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, icon: Icon) -> Self {
        Self {
            id,
            name: name.into(),
            icon,
        }
    }
}

/// A single shortcut tile.
///
/// Identity inside a category is positional; two links may share a name or
/// URL.  `icon` is either an image URL or inline SVG markup, empty when the
/// tile should fall back to the first letter of its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
    /// Optional badge text drawn in the tile corner.
    #[serde(default)]
    pub text_icon: String,
    #[serde(default = "default_text_bg_color")]
    pub text_bg_color: String,
}

fn default_bg_color() -> String {
    DEFAULT_BG_COLOR.to_string()
}

fn default_text_bg_color() -> String {
    DEFAULT_TEXT_BG_COLOR.to_string()
}

impl Link {
    /// A link with default colors, no icon and no badge.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            icon: String::new(),
            bg_color: default_bg_color(),
            text_icon: String::new(),
            text_bg_color: default_text_bg_color(),
        }
    }

    /// Builder-style icon setter.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Builder-style background color setter.
    pub fn with_bg_color(mut self, color: impl Into<String>) -> Self {
        self.bg_color = color.into();
        self
    }

    /// Form-level validation: name and URL must both be non-blank.
    pub fn validate(&self) -> Result<(), LauncherError> {
        if self.name.trim().is_empty() {
            return Err(LauncherError::Validation("link name must not be empty".into()));
        }
        if self.url.trim().is_empty() {
            return Err(LauncherError::Validation("link url must not be empty".into()));
        }
        Ok(())
    }

    /// Apply write-time normalisation (name length limit).
    pub fn normalized(mut self) -> Self {
        self.name = truncate_chars(&self.name, MAX_LINK_NAME_CHARS);
        self
    }
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
