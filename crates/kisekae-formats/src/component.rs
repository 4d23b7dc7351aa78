//! Component instances: the subcodes of one category within a chunk

use crate::consts::{SUBCODE_DELIM, format_prefix, max_array_index};
use crate::error::Result;
use crate::registry::ComponentType;
use crate::subcode::{MergeMode, Subcode};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A group of subcodes belonging to one component kind
///
/// Subcodes are keyed by their prefix (tag plus zero-padded index for array
/// members) and keep insertion order, which is the order they render in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    kind: Arc<ComponentType>,
    subcodes: IndexMap<String, Subcode>,
}

impl Component {
    /// Create an empty component of `kind`
    #[must_use]
    pub fn new(kind: Arc<ComponentType>) -> Self {
        Self {
            kind,
            subcodes: IndexMap::new(),
        }
    }

    /// Create a component from `_`-separated subcode tokens
    pub fn parse(kind: Arc<ComponentType>, text: &str) -> Result<Self> {
        let mut component = Self::new(kind);
        for token in text.split(SUBCODE_DELIM).filter(|t| !t.is_empty()) {
            component.add_token(token)?;
        }
        Ok(component)
    }

    /// Component kind
    #[must_use]
    pub fn kind(&self) -> &Arc<ComponentType> {
        &self.kind
    }

    /// Component kind name
    #[must_use]
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Store a subcode under its prefix, replacing any previous entry
    pub fn add(&mut self, subcode: Subcode) {
        self.subcodes.insert(subcode.prefix(), subcode);
    }

    /// Parse a token owned by this component kind and store it
    pub fn add_token(&mut self, token: &str) -> Result<()> {
        let subcode = Subcode::parse_in(token, &self.kind)?;
        self.add(subcode);
        Ok(())
    }

    /// Subcode stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Subcode> {
        self.subcodes.get(key)
    }

    /// Mutable subcode stored under `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Subcode> {
        self.subcodes.get_mut(key)
    }

    /// Parse `key` followed by `data` and store it under `key`
    pub fn set(&mut self, key: &str, data: &str) -> Result<()> {
        let subcode = Subcode::parse_in(&format!("{key}{data}"), &self.kind)?;
        self.subcodes.insert(key.to_string(), subcode);
        Ok(())
    }

    /// Whether a subcode is stored under `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.subcodes.contains_key(key)
    }

    /// Subcodes in insertion order
    pub fn subcodes(&self) -> impl Iterator<Item = &Subcode> {
        self.subcodes.values()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.subcodes.keys().map(String::as_str)
    }

    /// Number of stored subcodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.subcodes.len()
    }

    /// Whether no subcodes are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subcodes.is_empty()
    }

    /// Merge `other` key by key
    ///
    /// Existing keys merge field-wise, new keys are adopted as they are.
    pub fn merge(&mut self, other: &Component, mode: &MergeMode) -> Result<()> {
        for (key, subcode) in &other.subcodes {
            match self.subcodes.get_mut(key) {
                Some(existing) => existing.merge(subcode, mode)?,
                None => {
                    self.subcodes.insert(key.clone(), subcode.clone());
                }
            }
        }
        Ok(())
    }

    /// Keep only subcodes whose tag, key or rename is in `keys`
    ///
    /// An empty `keys` keeps everything.
    pub fn filter(&mut self, keys: &BTreeSet<String>) {
        if keys.is_empty() {
            return;
        }
        let kind = Arc::clone(&self.kind);
        self.subcodes.retain(|key, subcode| {
            keys.contains(subcode.tag())
                || keys.contains(key)
                || kind
                    .lookup(subcode.tag())
                    .and_then(|slot| slot.rename.as_ref())
                    .is_some_and(|rename| keys.contains(rename))
        });
    }

    /// The subset of `keys` that can address something in this component
    #[must_use]
    pub fn owned_keys(&self, keys: &BTreeSet<String>) -> BTreeSet<String> {
        keys.iter()
            .filter(|key| {
                self.kind.owns(key)
                    || self.subcodes.contains_key(key.as_str())
                    || self
                        .kind
                        .singles()
                        .values()
                        .chain(self.kind.arrays().values())
                        .any(|slot| slot.rename.as_deref() == Some(key.as_str()))
            })
            .cloned()
            .collect()
    }

    /// Add explicit absent markers for everything this instance lacks
    ///
    /// Every missing single gets a placeholder. Every array kind gets one
    /// placeholder at its first unused index.
    pub fn exclude(&mut self) {
        let kind = Arc::clone(&self.kind);

        for (tag, slot) in kind.singles() {
            if !self.subcodes.contains_key(tag) {
                self.subcodes.insert(
                    tag.clone(),
                    Subcode::placeholder(Arc::clone(&slot.subcode_type), tag.as_str(), None),
                );
            }
        }

        for (tag, slot) in kind.arrays() {
            let free = (0..max_array_index(tag))
                .map(|i| (i, format_prefix(tag, Some(i))))
                .find(|(_, prefix)| !self.subcodes.contains_key(prefix));
            if let Some((index, prefix)) = free {
                trace!("Excluding {} at {}", tag, prefix);
                self.subcodes.insert(
                    prefix,
                    Subcode::placeholder(Arc::clone(&slot.subcode_type), tag.as_str(), Some(index)),
                );
            }
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, subcode) in self.subcodes.values().enumerate() {
            if i > 0 {
                write!(f, "{SUBCODE_DELIM}")?;
            }
            write!(f, "{subcode}")?;
        }
        Ok(())
    }
}
