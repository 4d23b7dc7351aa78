//! Chunks: one character slot or the shared scene

use crate::component::Component;
use crate::consts::{ASSET_DELIM, SUBCODE_DELIM};
use crate::error::Result;
use crate::registry::Registry;
use crate::subcode::{MergeMode, Subcode};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Components of one character or scene, plus opaque trailing assets
///
/// Components are keyed by kind name and created on first reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chunk {
    components: IndexMap<String, Component>,
    /// Asset strings following the asset delimiter, kept verbatim
    pub assets: Vec<String>,
}

impl Chunk {
    /// Create an empty chunk
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a chunk, routing each subcode token to its component
    pub fn parse(text: &str, registry: &Registry) -> Result<Self> {
        let mut parts = text.split(ASSET_DELIM);
        let body = parts.next().unwrap_or_default();
        let mut chunk = Self {
            components: IndexMap::new(),
            assets: parts.map(str::to_string).collect(),
        };

        for token in body.split(SUBCODE_DELIM).filter(|t| !t.is_empty()) {
            let kind = registry.component_by_tag(Subcode::tag_of(token)?)?;
            let subcode = Subcode::parse_in(token, kind)?;
            chunk
                .components
                .entry(kind.name().to_string())
                .or_insert_with(|| Component::new(Arc::clone(kind)))
                .add(subcode);
        }

        trace!(
            "Parsed chunk: {} components, {} assets",
            chunk.components.len(),
            chunk.assets.len()
        );
        Ok(chunk)
    }

    /// Component by kind name or by any tag its kind owns
    #[must_use]
    pub fn component(&self, key: &str) -> Option<&Component> {
        match self.components.get(key) {
            Some(component) => Some(component),
            None => self.components.values().find(|c| c.kind().owns(key)),
        }
    }

    /// Mutable component by kind name or owned tag, if present
    pub fn component_mut(&mut self, key: &str) -> Option<&mut Component> {
        let name = self.resolve_name(key)?;
        self.components.get_mut(&name)
    }

    /// Component by kind name or tag, created empty when missing
    pub fn component_or_insert(&mut self, key: &str, registry: &Registry) -> Result<&mut Component> {
        let kind = registry.component_type(key)?;
        Ok(self
            .components
            .entry(kind.name().to_string())
            .or_insert_with(|| Component::new(Arc::clone(kind))))
    }

    /// Whether a component of the named kind, or owning the tag, is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.component(key).is_some()
    }

    /// Components in insertion order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Whether the chunk has neither components nor assets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.assets.is_empty()
    }

    /// Merge `other` into this chunk, overwriting every field it carries
    pub fn merge(&mut self, other: &Chunk) -> Result<()> {
        self.merge_with(other, &MergeMode::All)
    }

    /// Merge `other` into this chunk using `mode` for field overwrites
    ///
    /// The asset list is replaced by `other`'s.
    pub fn merge_with(&mut self, other: &Chunk, mode: &MergeMode) -> Result<()> {
        self.assets.clone_from(&other.assets);
        for (name, component) in &other.components {
            match self.components.get_mut(name) {
                Some(existing) => existing.merge(component, mode)?,
                None => {
                    self.components.insert(name.clone(), component.clone());
                }
            }
        }
        Ok(())
    }

    /// Drop components not named in `component_names`, then narrow the rest
    /// to the `subcode_keys` each of them owns
    ///
    /// Either set may be empty to skip that stage.
    pub fn filter(&mut self, component_names: &BTreeSet<String>, subcode_keys: &BTreeSet<String>) {
        if !component_names.is_empty() {
            self.components
                .retain(|name, _| component_names.contains(name));
        }
        for component in self.components.values_mut() {
            let owned = component.owned_keys(subcode_keys);
            if !owned.is_empty() {
                component.filter(&owned);
            }
        }
    }

    /// Mark everything missing from each present component as absent
    pub fn exclude(&mut self) {
        for component in self.components.values_mut() {
            component.exclude();
        }
    }

    fn resolve_name(&self, key: &str) -> Option<String> {
        if self.components.contains_key(key) {
            return Some(key.to_string());
        }
        self.components
            .values()
            .find(|c| c.kind().owns(key))
            .map(|c| c.name().to_string())
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .components
            .values()
            .map(ToString::to_string)
            .filter(|s| !s.is_empty())
            .collect();
        f.write_str(&rendered.join(&SUBCODE_DELIM.to_string()))?;
        for asset in &self.assets {
            write!(f, "{ASSET_DELIM}{asset}")?;
        }
        Ok(())
    }
}

impl crate::CodeFormat for Chunk {
    fn parse(text: &str, registry: &Registry) -> Result<Self> {
        Self::parse(text, registry)
    }
}
