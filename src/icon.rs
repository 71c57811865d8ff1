//! Symbolic category icons.
//!
//! Categories refer to their icon by name (`"Home"`, `"Code"`, …).  The set
//! of names is closed: [`Icon`] enumerates every icon the sidebar knows how
//! to draw, and any unrecognised name resolves to [`Icon::FALLBACK`] instead
//! of failing, so a hand-edited or imported file never breaks rendering.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Every icon a category can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Home,
    Code,
    Palette,
    Lightbulb,
    Camera,
    Plus,
    Box,
    Heart,
    Music,
    MessageCircle,
    Briefcase,
    GamepadIcon,
    Search,
    ThumbsUp,
    Star,
    FileCode,
    GraduationCap,
    Book,
    Globe,
    Rocket,
    Zap,
    Grid,
    Award,
    Compass,
    Flag,
    Database,
    Send,
    Bookmark,
    Target,
    Cpu,
    Truck,
    ShoppingBag,
}

impl Icon {
    /// Icon used whenever a name cannot be resolved.
    pub const FALLBACK: Icon = Icon::Home;

    /// All icons, in the order the icon picker lists them.
    pub const ALL: [Icon; 32] = [
        Icon::Home,
        Icon::Code,
        Icon::Palette,
        Icon::Lightbulb,
        Icon::Camera,
        Icon::Plus,
        Icon::Box,
        Icon::Heart,
        Icon::Music,
        Icon::MessageCircle,
        Icon::Briefcase,
        Icon::GamepadIcon,
        Icon::Search,
        Icon::ThumbsUp,
        Icon::Star,
        Icon::FileCode,
        Icon::GraduationCap,
        Icon::Book,
        Icon::Globe,
        Icon::Rocket,
        Icon::Zap,
        Icon::Grid,
        Icon::Award,
        Icon::Compass,
        Icon::Flag,
        Icon::Database,
        Icon::Send,
        Icon::Bookmark,
        Icon::Target,
        Icon::Cpu,
        Icon::Truck,
        Icon::ShoppingBag,
    ];

    /// The symbolic name stored on disk and handed to the renderer.
    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Home => "Home",
            Icon::Code => "Code",
            Icon::Palette => "Palette",
            Icon::Lightbulb => "Lightbulb",
            Icon::Camera => "Camera",
            Icon::Plus => "Plus",
            Icon::Box => "Box",
            Icon::Heart => "Heart",
            Icon::Music => "Music",
            Icon::MessageCircle => "MessageCircle",
            Icon::Briefcase => "Briefcase",
            Icon::GamepadIcon => "GamepadIcon",
            Icon::Search => "Search",
            Icon::ThumbsUp => "ThumbsUp",
            Icon::Star => "Star",
            Icon::FileCode => "FileCode",
            Icon::GraduationCap => "GraduationCap",
            Icon::Book => "Book",
            Icon::Globe => "Globe",
            Icon::Rocket => "Rocket",
            Icon::Zap => "Zap",
            Icon::Grid => "Grid",
            Icon::Award => "Award",
            Icon::Compass => "Compass",
            Icon::Flag => "Flag",
            Icon::Database => "Database",
            Icon::Send => "Send",
            Icon::Bookmark => "Bookmark",
            Icon::Target => "Target",
            Icon::Cpu => "Cpu",
            Icon::Truck => "Truck",
            Icon::ShoppingBag => "ShoppingBag",
        }
    }

    /// Resolve a symbolic name.  Matching is exact after trimming.
    pub fn parse(name: &str) -> Option<Icon> {
        let name = name.trim();
        Icon::ALL.iter().copied().find(|icon| icon.as_str() == name)
    }

    /// Resolve a symbolic name, falling back to [`Icon::FALLBACK`].
    pub fn from_name_or_default(name: &str) -> Icon {
        Icon::parse(name).unwrap_or(Icon::FALLBACK)
    }
}

impl Default for Icon {
    fn default() -> Self {
        Icon::FALLBACK
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Icon {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Icon {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Icon::from_name_or_default(&s))
    }
}
