//! Component kind specifications

use crate::registry::subcode_type::SubcodeType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Registry form of a component kind: tag -> (optional rename, subcode kind name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Component kind name
    pub name: String,
    /// Subcodes that occur at most once per component
    #[serde(default)]
    pub singles: IndexMap<String, (Option<String>, String)>,
    /// Subcodes that repeat with a numeric index
    #[serde(default)]
    pub arrays: IndexMap<String, (Option<String>, String)>,
}

/// One subcode entry owned by a component kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcodeSlot {
    /// Whether the subcode repeats with an index
    pub is_array: bool,
    /// Component-level alias usable as a filter key
    pub rename: Option<String>,
    /// Field layout of the subcode
    pub subcode_type: Arc<SubcodeType>,
}

/// A component kind with its resolved subcode slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentType {
    name: String,
    singles: IndexMap<String, SubcodeSlot>,
    arrays: IndexMap<String, SubcodeSlot>,
}

impl ComponentType {
    /// Create a component kind from resolved slots
    pub fn new(
        name: impl Into<String>,
        singles: IndexMap<String, SubcodeSlot>,
        arrays: IndexMap<String, SubcodeSlot>,
    ) -> Self {
        Self {
            name: name.into(),
            singles,
            arrays,
        }
    }

    /// Component kind name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Single-instance slots keyed by tag
    #[must_use]
    pub fn singles(&self) -> &IndexMap<String, SubcodeSlot> {
        &self.singles
    }

    /// Repeatable slots keyed by tag
    #[must_use]
    pub fn arrays(&self) -> &IndexMap<String, SubcodeSlot> {
        &self.arrays
    }

    /// Look up the slot for a tag, singles first
    #[must_use]
    pub fn lookup(&self, tag: &str) -> Option<&SubcodeSlot> {
        self.singles.get(tag).or_else(|| self.arrays.get(tag))
    }

    /// Whether this kind owns `tag`
    #[must_use]
    pub fn owns(&self, tag: &str) -> bool {
        self.singles.contains_key(tag) || self.arrays.contains_key(tag)
    }

    /// Every tag owned by this kind, singles first
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.singles.keys().chain(self.arrays.keys()).map(String::as_str)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Component({})>", self.name)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn slot(is_array: bool, rename: Option<&str>) -> SubcodeSlot {
        SubcodeSlot {
            is_array,
            rename: rename.map(str::to_string),
            subcode_type: Arc::new(SubcodeType::new("Hair", "r", &["Style", "Color"])),
        }
    }

    #[test]
    fn test_lookup_prefers_singles() {
        let mut singles = IndexMap::new();
        singles.insert("ea".to_string(), slot(false, Some("Back")));
        let mut arrays = IndexMap::new();
        arrays.insert("r".to_string(), slot(true, None));

        let kind = ComponentType::new("Hair", singles, arrays);

        assert!(!kind.lookup("ea").unwrap().is_array);
        assert_eq!(kind.lookup("ea").unwrap().rename.as_deref(), Some("Back"));
        assert!(kind.lookup("r").unwrap().is_array);
        assert!(kind.lookup("zz").is_none());
        assert!(kind.owns("r"));
        assert_eq!(kind.tags().collect::<Vec<_>>(), vec!["ea", "r"]);
    }

    #[test]
    fn test_spec_deserialize() {
        let json = r#"{"name": "Hair", "singles": {"ea": ["Back", "Hair"]}, "arrays": {"r": [null, "Hairpiece"]}}"#;
        let spec: ComponentSpec = serde_json::from_str(json).unwrap();

        assert_eq!(spec.name, "Hair");
        assert_eq!(spec.singles["ea"], (Some("Back".to_string()), "Hair".to_string()));
        assert_eq!(spec.arrays["r"], (None, "Hairpiece".to_string()));
    }
}
