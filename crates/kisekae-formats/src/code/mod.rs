//! Full codes: a version, nine character slots and an optional scene
//!
//! # Text layout
//!
//! With a scene chunk every slot is written, `0` marking an empty one:
//!
//! ```text
//! 68***aa1.2*0*0*0*0*0*0*0*0#/]ua1
//! ```
//!
//! Without a scene only slot 0 is written and no slot markers appear:
//!
//! ```text
//! 68**aa1.2
//! ```

mod fastload;
mod migration;

pub use fastload::FastloadEntry;
pub use migration::{MIGRATION_VERSION, NEUTRAL_HEAD_VALUE};

use crate::chunk::Chunk;
use crate::consts::{
    DEFAULT_VERSION, EMPTY_SLOT, MODEL_SLOTS, NO_VERSION, SCENE_DELIM, SCENE_MARKER, SLOT_DELIM,
    VERSION_DELIM,
};
use crate::error::{FormatError, Result};
use crate::registry::Registry;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// A complete exported customization state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    /// Format version, `-1` for an empty code
    pub version: i32,
    /// Character slots
    pub models: [Option<Chunk>; MODEL_SLOTS],
    /// Shared scene chunk
    pub scene: Option<Chunk>,
}

impl Default for Code {
    fn default() -> Self {
        Self::new(NO_VERSION)
    }
}

impl Code {
    /// Create a code with no chunks
    #[must_use]
    pub fn new(version: i32) -> Self {
        Self {
            version,
            models: Default::default(),
            scene: None,
        }
    }

    /// Parse a full code
    ///
    /// Empty input yields an empty code. A missing version prefix defaults to
    /// version 68.
    pub fn parse(text: &str, registry: &Registry) -> Result<Self> {
        if text.is_empty() {
            return Ok(Self::default());
        }

        let mut parts = text.split(VERSION_DELIM);
        let head = parts.next().unwrap_or_default();
        let (version, mut rest) = match parts.next() {
            Some(rest) => {
                let version = head
                    .parse::<i32>()
                    .map_err(|_| FormatError::InvalidVersion(head.to_string()))?;
                (version, rest)
            }
            None => (DEFAULT_VERSION, head),
        };

        let mut code = Self::new(version);
        if let Some(stripped) = rest.strip_prefix(SCENE_MARKER) {
            code.scene = Some(Chunk::new());
            rest = stripped;
        }
        if rest.is_empty() {
            return Ok(code);
        }

        let mut halves = rest.split(SCENE_DELIM);
        let models = halves.next().unwrap_or_default();
        let segments: Vec<&str> = models.split(SLOT_DELIM).collect();
        if segments.len() > MODEL_SLOTS {
            return Err(FormatError::TooManySlots(segments.len()));
        }
        for (slot, segment) in segments.into_iter().enumerate() {
            if segment != EMPTY_SLOT {
                code.models[slot] = Some(Chunk::parse(segment, registry)?);
            }
        }
        if let Some(scene) = halves.next() {
            code.scene = Some(Chunk::parse(scene, registry)?);
        }

        debug!(
            "Parsed code v{}: {} models, scene: {}",
            code.version,
            code.model_count(),
            code.scene.is_some()
        );
        Ok(code)
    }

    /// Number of occupied character slots
    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.iter().flatten().count()
    }

    /// Chunk at a character slot
    #[must_use]
    pub fn model(&self, slot: usize) -> Option<&Chunk> {
        self.models.get(slot).and_then(Option::as_ref)
    }

    /// Mutable chunk at a character slot
    pub fn model_mut(&mut self, slot: usize) -> Option<&mut Chunk> {
        self.models.get_mut(slot).and_then(Option::as_mut)
    }

    /// Merge `other` into this code
    ///
    /// When versions differ the older side is migrated first. `other` is
    /// migrated on a private copy; this code is migrated in place.
    pub fn merge(&mut self, other: &Code) -> Result<()> {
        let upgraded;
        let other = if self.version > other.version {
            let mut copy = other.clone();
            copy.convert_version(self.version);
            upgraded = copy;
            &upgraded
        } else {
            if self.version < other.version {
                self.convert_version(other.version);
            }
            other
        };

        if let Some(scene) = &other.scene {
            self.scene.get_or_insert_with(Chunk::new).merge(scene)?;
        }
        for (here, there) in self.models.iter_mut().zip(&other.models) {
            if let Some(there) = there {
                here.get_or_insert_with(Chunk::new).merge(there)?;
            }
        }
        Ok(())
    }

    /// Keep only the named components and subcode keys in every chunk
    ///
    /// Keys naming a component kind select components; all other keys are
    /// treated as subcode tags, prefixes or renames.
    pub fn filter<I, S>(&mut self, keys: I, registry: &Registry)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (component_names, subcode_keys): (BTreeSet<String>, BTreeSet<String>) = keys
            .into_iter()
            .map(|key| key.as_ref().to_string())
            .partition(|key| registry.is_component(key));

        for chunk in self.scene.iter_mut().chain(self.models.iter_mut().flatten()) {
            chunk.filter(&component_names, &subcode_keys);
        }
    }

    /// Mark everything missing from each character's components as absent
    ///
    /// The scene is left alone.
    pub fn exclude(&mut self) {
        for chunk in self.models.iter_mut().flatten() {
            chunk.exclude();
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{VERSION_DELIM}", self.version)?;
        if let Some(scene) = &self.scene {
            for model in &self.models {
                write!(f, "{SLOT_DELIM}")?;
                // An empty segment would read back as a version delimiter
                let rendered = model.as_ref().map(ToString::to_string);
                match rendered.as_deref() {
                    Some(text) if !text.is_empty() => f.write_str(text)?,
                    _ => f.write_str(EMPTY_SLOT)?,
                }
            }
            write!(f, "{SCENE_DELIM}{scene}")?;
        } else if let Some(first) = &self.models[0] {
            write!(f, "{first}")?;
        }
        Ok(())
    }
}

impl crate::CodeFormat for Code {
    fn parse(text: &str, registry: &Registry) -> Result<Self> {
        Self::parse(text, registry)
    }
}
