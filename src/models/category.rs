use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Display color, usually a `#rrggbb` hex string.
    pub color: String,
    /// Icon token, e.g. `fitness`.
    pub icon: String,
}

impl Category {
    pub const DEFAULT_COLOR: &'static str = "#6366f1";
    pub const DEFAULT_ICON: &'static str = "star";

    pub fn new(id: CategoryId, name: String, color: String, icon: String) -> Self {
        Self {
            id,
            name,
            color,
            icon,
        }
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id(categories: &[Category], id: CategoryId) -> Option<&Category> {
        categories.iter().find(|c| c.id == id)
    }

    /// Resolve a user-supplied reference: a numeric id first, then a name.
    pub fn resolve<'a>(categories: &'a [Category], reference: &str) -> Option<&'a Category> {
        reference
            .trim()
            .parse::<CategoryId>()
            .ok()
            .and_then(|id| Self::find_by_id(categories, id))
            .or_else(|| Self::find_by_name(categories, reference.trim()))
    }

    /// The next free id: one past the largest existing id.
    pub fn next_id(categories: &[Category]) -> CategoryId {
        categories.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
