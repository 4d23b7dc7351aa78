//! Subcode and component registries
//!
//! The registry is built once from two JSON documents and is read-only
//! afterwards. It is shared behind an [`Arc`] and passed explicitly to every
//! parse entry point.
//!
//! # Data format
//!
//! Subcode kinds:
//!
//! ```json
//! [{"name": "Shoe", "tag": "jd", "names": ["Type", "Color1"], "colors": ["Color1"]}]
//! ```
//!
//! Component kinds map each owned tag to an optional rename and a subcode
//! kind name:
//!
//! ```json
//! [{"name": "Clothing", "singles": {"jd": ["LeftShoe", "Shoe"]}, "arrays": {}}]
//! ```
//!
//! # Example
//!
//! ```
//! use kisekae_formats::Registry;
//!
//! let subcodes = r#"[{"name": "Shoe", "tag": "jd", "names": ["Type", "Color1"]}]"#;
//! let components = r#"[{"name": "Clothing", "singles": {"jd": [null, "Shoe"]}, "arrays": {}}]"#;
//!
//! let registry = Registry::from_json(subcodes, components)?;
//! assert!(registry.is_component("Clothing"));
//! assert_eq!(registry.component_by_tag("jd")?.name(), "Clothing");
//! # Ok::<(), kisekae_formats::FormatError>(())
//! ```

mod component_type;
mod subcode_type;

pub use component_type::{ComponentSpec, ComponentType, SubcodeSlot};
pub use subcode_type::{FieldCategory, SubcodeType};

use crate::error::{FormatError, Result};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Read-only lookup tables for subcode and component kinds
#[derive(Debug, Clone)]
pub struct Registry {
    subcodes: IndexMap<String, Arc<SubcodeType>>,
    components: IndexMap<String, Arc<ComponentType>>,
    by_tag: HashMap<String, Arc<ComponentType>>,
}

impl Registry {
    /// Build a registry from parsed subcode and component definitions
    ///
    /// # Errors
    ///
    /// Returns an error if a name or tag is defined twice or a component
    /// references an unknown subcode kind.
    pub fn new(subcodes: Vec<SubcodeType>, components: Vec<ComponentSpec>) -> Result<Self> {
        let mut subcode_map = IndexMap::with_capacity(subcodes.len());
        for subcode in subcodes {
            if subcode_map.contains_key(&subcode.name) {
                return Err(FormatError::DuplicateDefinition {
                    kind: "subcode type",
                    name: subcode.name,
                });
            }
            subcode_map.insert(subcode.name.clone(), Arc::new(subcode));
        }

        let mut component_map: IndexMap<String, Arc<ComponentType>> =
            IndexMap::with_capacity(components.len());
        let mut by_tag = HashMap::new();

        for spec in components {
            if component_map.contains_key(&spec.name) {
                return Err(FormatError::DuplicateDefinition {
                    kind: "component",
                    name: spec.name,
                });
            }

            let singles = resolve_slots(&subcode_map, spec.singles, false)?;
            let arrays = resolve_slots(&subcode_map, spec.arrays, true)?;
            let component = Arc::new(ComponentType::new(spec.name.clone(), singles, arrays));

            for tag in component.tags() {
                if by_tag.contains_key(tag) {
                    return Err(FormatError::DuplicateDefinition {
                        kind: "tag",
                        name: tag.to_string(),
                    });
                }
                by_tag.insert(tag.to_string(), Arc::clone(&component));
            }
            component_map.insert(spec.name, component);
        }

        debug!(
            "Registry built: {} subcode types, {} components, {} tags",
            subcode_map.len(),
            component_map.len(),
            by_tag.len()
        );

        Ok(Self {
            subcodes: subcode_map,
            components: component_map,
            by_tag,
        })
    }

    /// Build a registry from the two JSON documents
    pub fn from_json(subcodes: &str, components: &str) -> Result<Self> {
        let subcodes: Vec<SubcodeType> = serde_json::from_str(subcodes)?;
        let components: Vec<ComponentSpec> = serde_json::from_str(components)?;
        Self::new(subcodes, components)
    }

    /// Build a registry from the two JSON files
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(subcodes: P, components: Q) -> Result<Self> {
        let subcodes = std::fs::read_to_string(subcodes)?;
        let components = std::fs::read_to_string(components)?;
        Self::from_json(&subcodes, &components)
    }

    /// Look up a subcode kind by name
    pub fn subcode_type(&self, name: &str) -> Result<&Arc<SubcodeType>> {
        self.subcodes
            .get(name)
            .ok_or_else(|| FormatError::UnknownSubcodeType(name.to_string()))
    }

    /// Look up a component kind by name, falling back to any tag it owns
    pub fn component_type(&self, key: &str) -> Result<&Arc<ComponentType>> {
        match self.components.get(key) {
            Some(component) => Ok(component),
            None => self.component_by_tag(key),
        }
    }

    /// Look up the component kind owning a tag
    pub fn component_by_tag(&self, tag: &str) -> Result<&Arc<ComponentType>> {
        self.by_tag
            .get(tag)
            .ok_or_else(|| FormatError::UnknownTag(tag.to_string()))
    }

    /// Whether `name` is a recognised component kind name
    #[must_use]
    pub fn is_component(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Component kinds in declaration order
    pub fn component_types(&self) -> impl Iterator<Item = &Arc<ComponentType>> {
        self.components.values()
    }

    /// Subcode kinds in declaration order
    pub fn subcode_types(&self) -> impl Iterator<Item = &Arc<SubcodeType>> {
        self.subcodes.values()
    }
}

fn resolve_slots(
    subcodes: &IndexMap<String, Arc<SubcodeType>>,
    entries: IndexMap<String, (Option<String>, String)>,
    is_array: bool,
) -> Result<IndexMap<String, SubcodeSlot>> {
    entries
        .into_iter()
        .map(|(tag, (rename, type_name))| -> Result<(String, SubcodeSlot)> {
            let subcode_type = subcodes
                .get(&type_name)
                .cloned()
                .ok_or(FormatError::UnknownSubcodeType(type_name))?;
            Ok((
                tag,
                SubcodeSlot {
                    is_array,
                    rename,
                    subcode_type,
                },
            ))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_registry;

    #[test]
    fn test_lookup_by_name_and_tag() {
        let registry = fixture_registry();

        assert_eq!(registry.component_type("Clothing").unwrap().name(), "Clothing");
        assert_eq!(registry.component_type("jd").unwrap().name(), "Clothing");
        assert_eq!(registry.component_by_tag("r").unwrap().name(), "Hair");
        assert_eq!(registry.subcode_type("Shoe").unwrap().tag, "jd");
    }

    #[test]
    fn test_unknown_lookups_fail() {
        let registry = fixture_registry();

        assert!(matches!(
            registry.component_by_tag("zz"),
            Err(FormatError::UnknownTag(tag)) if tag == "zz"
        ));
        assert!(matches!(
            registry.subcode_type("Nothing"),
            Err(FormatError::UnknownSubcodeType(_))
        ));
    }

    #[test]
    fn test_is_component() {
        let registry = fixture_registry();

        assert!(registry.is_component("Expression"));
        assert!(!registry.is_component("hd"));
        assert!(!registry.is_component("expression"));
    }

    #[test]
    fn test_unknown_subcode_reference() {
        let subcodes = r#"[{"name": "Shoe", "tag": "jd", "names": ["Type"]}]"#;
        let components = r#"[{"name": "Clothing", "singles": {"jd": [null, "Boot"]}}]"#;

        let result = Registry::from_json(subcodes, components);
        assert!(matches!(result, Err(FormatError::UnknownSubcodeType(name)) if name == "Boot"));
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let subcodes = r#"[{"name": "Shoe", "tag": "jd", "names": ["Type"]}]"#;
        let components = r#"[
            {"name": "Clothing", "singles": {"jd": [null, "Shoe"]}},
            {"name": "Spare", "singles": {"jd": [null, "Shoe"]}}
        ]"#;

        let result = Registry::from_json(subcodes, components);
        assert!(matches!(
            result,
            Err(FormatError::DuplicateDefinition { kind: "tag", .. })
        ));
    }

    #[test]
    fn test_duplicate_subcode_rejected() {
        let subcodes = r#"[
            {"name": "Shoe", "tag": "jd", "names": ["Type"]},
            {"name": "Shoe", "tag": "je", "names": ["Type"]}
        ]"#;

        let result = Registry::from_json(subcodes, "[]");
        assert!(matches!(
            result,
            Err(FormatError::DuplicateDefinition { kind: "subcode type", .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let result = Registry::from_json("{", "[]");
        assert!(matches!(result, Err(FormatError::Json(_))));
    }

    #[test]
    fn test_declaration_order() {
        let registry = fixture_registry();
        let names: Vec<&str> = registry.component_types().map(|c| c.name()).collect();

        assert_eq!(
            names,
            vec!["Pose", "Appearance", "Face", "Expression", "Hair", "Clothing", "Decoration", "Scene"]
        );
    }
}
