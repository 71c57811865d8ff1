//! The shipped default dataset.
//!
//! Built-in categories are code-defined and never persisted; their link
//! lists are seeded from here on first run, by reconciliation after an
//! update, and on an explicit reset.

use crate::icon::Icon;
use crate::model::{CategorizedLinks, Category, CategoryId, Link};

/// `(id, name, icon)` for every built-in category, in sidebar order.
const BUILTIN_CATEGORIES: [(u64, &str, Icon); 5] = [
    (0, "Home", Icon::Home),
    (1, "Developer", Icon::Code),
    (2, "Design", Icon::Palette),
    (3, "Product", Icon::Lightbulb),
    (4, "Photography", Icon::Camera),
];

/// Label of the "create category" affordance.
pub const CREATE_CATEGORY_NAME: &str = "Add";

/// `(category, name, url, background)` rows of the default link set.
const DEFAULT_LINKS: &[(u64, &str, &str, &str)] = &[
    (0, "Google", "https://www.google.com", "#FFFFFF"),
    (0, "YouTube", "https://www.youtube.com", "#FFFFFF"),
    (0, "Wikipedia", "https://www.wikipedia.org", "#FFFFFF"),
    (0, "Gmail", "https://mail.google.com", "#FFFFFF"),
    (0, "Maps", "https://maps.google.com", "#FFFFFF"),
    (0, "Translate", "https://translate.google.com", "#FFFFFF"),
    (1, "GitHub", "https://github.com", "#24292E"),
    (1, "Stack Overflow", "https://stackoverflow.com", "#FFFFFF"),
    (1, "MDN", "https://developer.mozilla.org", "#FFFFFF"),
    (1, "Rust Docs", "https://doc.rust-lang.org", "#FFFFFF"),
    (1, "crates.io", "https://crates.io", "#3B6837"),
    (1, "Hacker News", "https://news.ycombinator.com", "#FF6600"),
    (2, "Figma", "https://www.figma.com", "#FFFFFF"),
    (2, "Dribbble", "https://dribbble.com", "#EA4C89"),
    (2, "Behance", "https://www.behance.net", "#1769FF"),
    (2, "Coolors", "https://coolors.co", "#FFFFFF"),
    (2, "Google Fonts", "https://fonts.google.com", "#FFFFFF"),
    (3, "Product Hunt", "https://www.producthunt.com", "#DA552F"),
    (3, "Notion", "https://www.notion.so", "#FFFFFF"),
    (3, "Miro", "https://miro.com", "#FFD02F"),
    (3, "Linear", "https://linear.app", "#5E6AD2"),
    (4, "Unsplash", "https://unsplash.com", "#FFFFFF"),
    (4, "500px", "https://500px.com", "#FFFFFF"),
    (4, "Flickr", "https://www.flickr.com", "#FFFFFF"),
    (4, "Pexels", "https://www.pexels.com", "#05A081"),
];

/// The built-in categories, in sidebar order.
pub fn builtin_categories() -> Vec<Category> {
    BUILTIN_CATEGORIES
        .iter()
        .map(|(id, name, icon)| Category::new(CategoryId(*id), *name, *icon))
        .collect()
}

/// The full default link map.  Every built-in category has an entry.
pub fn default_links() -> CategorizedLinks {
    let mut map: CategorizedLinks = builtin_categories()
        .into_iter()
        .map(|c| (c.id, Vec::new()))
        .collect();
    for (cat, name, url, bg) in DEFAULT_LINKS {
        map.entry(CategoryId(*cat))
            .or_default()
            .push(Link::new(*name, *url).with_bg_color(*bg));
    }
    map
}

/// Shipped links for one category, or `None` when it has no defaults
/// (custom categories).
pub fn default_links_for(id: CategoryId) -> Option<Vec<Link>> {
    if !id.is_builtin() {
        return None;
    }
    default_links().remove(&id)
}
