//! The fixed set of Thinkerbell content categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four fixed content classes.
///
/// The declaration order is the canonical order used for every tie-break in
/// the engine (argmax over scores, dominant-category selection). Categories
/// are a closed set; there are no dynamic additions at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// A clever suspicion, intuitive idea, or hypothesis
    Hunch,
    /// Strategic insight backed by data, research, or experience
    Wisdom,
    /// A recommended action, behavioral suggestion, or next step
    Nudge,
    /// A magical creative flourish or surprising execution
    Spell,
}

impl Category {
    /// All categories in canonical tie-break order.
    pub const ALL: [Category; 4] = [
        Category::Hunch,
        Category::Wisdom,
        Category::Nudge,
        Category::Spell,
    ];

    /// Number of categories
    pub const COUNT: usize = 4;

    /// Stable zero-based index in canonical order
    pub fn index(&self) -> usize {
        match self {
            Self::Hunch => 0,
            Self::Wisdom => 1,
            Self::Nudge => 2,
            Self::Spell => 3,
        }
    }

    /// Human-readable label, matching the serialized name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hunch => "Hunch",
            Self::Wisdom => "Wisdom",
            Self::Nudge => "Nudge",
            Self::Spell => "Spell",
        }
    }

    /// Parse a label back into a category (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "hunch" => Some(Self::Hunch),
            "wisdom" => Some(Self::Wisdom),
            "nudge" => Some(Self::Nudge),
            "spell" => Some(Self::Spell),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_stable() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert!(Category::Hunch < Category::Wisdom);
        assert!(Category::Nudge < Category::Spell);
    }

    #[test]
    fn labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("WISDOM"), Some(Category::Wisdom));
        assert_eq!(Category::from_label("sparkle"), None);
    }

    #[test]
    fn serializes_as_variant_name() {
        let json = serde_json::to_string(&Category::Spell).unwrap();
        assert_eq!(json, "\"Spell\"");
        let back: Category = serde_json::from_str("\"Hunch\"").unwrap();
        assert_eq!(back, Category::Hunch);
    }
}
