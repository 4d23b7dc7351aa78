//! Mixer program model and JSON loading.
//!
//! A program is an ordered list of options; each option lists alternative
//! sources, and each generated code picks exactly one source per option.
//!
//! # Format
//!
//! ```json
//! {
//!   "destdir": "out",
//!   "options": [
//!     {"name": "top", "sources": [
//!       {"source": "internal", "name": "shirt", "path": "clothes/shirt", "tags": ["casual"]}
//!     ]},
//!     {"name": "pose", "sources": [
//!       {"source": "external", "name": "wave", "path": "poses/wave*", "blacklist": ["formal"]}
//!     ]}
//!   ]
//! }
//! ```
//!
//! Unknown fields are rejected.

use crate::error::{MixerError, Result};
use crate::resolver::CodeResolver;
use kisekae_formats::Code;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Where a source's path is resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// The preset bank directory
    Internal,
    /// The working directory
    #[default]
    External,
}

/// A tagged supplier of one or more codes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Source {
    /// Preset bank or user file
    #[serde(default)]
    pub source: SourceKind,
    /// Name used when composing output names
    pub name: String,
    /// File path or glob pattern
    pub path: String,
    /// Tags this source cannot be combined with
    #[serde(default)]
    pub blacklist: BTreeSet<String>,
    /// Tags that must be present once the combination is complete
    #[serde(default)]
    pub whitelist: BTreeSet<String>,
    /// Tags describing this source
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(skip)]
    codes: OnceLock<Vec<Code>>,
}

impl Source {
    /// Create an external source with no tags
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the source kind
    #[must_use]
    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.source = kind;
        self
    }

    /// Add descriptive tags
    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| (*t).to_string()));
        self
    }

    /// Add incompatible tags
    #[must_use]
    pub fn with_blacklist(mut self, tags: &[&str]) -> Self {
        self.blacklist.extend(tags.iter().map(|t| (*t).to_string()));
        self
    }

    /// Add required tags
    #[must_use]
    pub fn with_whitelist(mut self, tags: &[&str]) -> Self {
        self.whitelist.extend(tags.iter().map(|t| (*t).to_string()));
        self
    }

    /// Codes this source resolves to, loaded once per instance
    pub fn codes<R: CodeResolver + ?Sized>(&self, resolver: &R) -> Result<&[Code]> {
        if let Some(codes) = self.codes.get() {
            return Ok(codes);
        }
        let codes = resolver.resolve(self)?;
        debug!("Source {} resolved to {} codes", self.name, codes.len());
        Ok(self.codes.get_or_init(|| codes))
    }
}

/// A named set of mutually exclusive sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixerOption {
    /// Option name
    pub name: String,
    /// Alternatives, one of which is chosen per combination
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// An ordered list of options plus the output prefix
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixerProgram {
    /// Prefix joined onto every generated name
    pub destdir: PathBuf,
    /// Options in combination order
    pub options: Vec<MixerOption>,
}

impl MixerProgram {
    /// Parse a program from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let program: Self = serde_json::from_str(json)?;
        program.log_loaded();
        Ok(program)
    }

    /// Parse a program from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let program: Self = serde_json::from_reader(reader)?;
        program.log_loaded();
        Ok(program)
    }

    /// Load a program from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| MixerError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn log_loaded(&self) {
        debug!(
            "Loaded mixer program: {} options, {} sources, destdir {:?}",
            self.options.len(),
            self.options.iter().map(|o| o.sources.len()).sum::<usize>(),
            self.destdir
        );
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PROGRAM: &str = r#"{
        "destdir": "out",
        "options": [
            {"name": "top", "sources": [
                {"source": "internal", "name": "shirt", "path": "clothes/shirt", "tags": ["casual"]},
                {"name": "dress", "path": "dress.kkl", "tags": ["formal"], "whitelist": ["heels"]}
            ]},
            {"name": "shoes", "sources": [
                {"source": "external", "name": "heels", "path": "heels", "tags": ["heels"], "blacklist": ["casual"]}
            ]}
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let program = MixerProgram::from_json(PROGRAM).unwrap();

        assert_eq!(program.destdir, PathBuf::from("out"));
        assert_eq!(program.options.len(), 2);

        let shirt = &program.options[0].sources[0];
        assert_eq!(shirt.source, SourceKind::Internal);
        assert!(shirt.tags.contains("casual"));
        assert!(shirt.blacklist.is_empty());

        let dress = &program.options[0].sources[1];
        assert_eq!(dress.source, SourceKind::External);
        assert!(dress.whitelist.contains("heels"));
    }

    #[test]
    fn test_from_reader() {
        let program = MixerProgram::from_reader(PROGRAM.as_bytes()).unwrap();
        assert_eq!(program.options[1].sources[0].name, "heels");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = r#"{"destdir": "out", "options": [], "extra": 1}"#;
        assert!(matches!(
            MixerProgram::from_json(json),
            Err(MixerError::InvalidProgram(_))
        ));

        let json = r#"{"destdir": "out", "options": [{"name": "a", "sources": [{"name": "x", "path": "x", "colour": "red"}]}]}"#;
        assert!(MixerProgram::from_json(json).is_err());
    }

    #[test]
    fn test_unknown_source_kind_rejected() {
        let json = r#"{"destdir": "", "options": [{"name": "a", "sources": [{"source": "remote", "name": "x", "path": "x"}]}]}"#;
        assert!(MixerProgram::from_json(json).is_err());
    }

    #[test]
    fn test_sets_are_not_shared() {
        let mut first = Source::new("a", "a");
        let second = Source::new("b", "b");
        first.tags.insert("red".to_string());

        assert!(second.tags.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = MixerProgram::load("/nonexistent/program.json");
        assert!(matches!(result, Err(MixerError::ReadFailed { .. })));
    }
}
