//! Subcode kind specifications

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Semantic category of a subcode field, used by selective merges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCategory {
    /// Colour values
    Color,
    /// Pose and limb placement
    Pose,
    /// Facial expression
    Expr,
    /// Clothing choice and styling
    Clothes,
    /// Body shape
    Body,
}

impl FieldCategory {
    /// Parse a merge-mode keyword (`color`, `pose`, `expr`, `clothes`, `body`)
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "color" => Some(Self::Color),
            "pose" => Some(Self::Pose),
            "expr" => Some(Self::Expr),
            "clothes" => Some(Self::Clothes),
            "body" => Some(Self::Body),
            _ => None,
        }
    }
}

/// Field layout of one subcode kind
///
/// `tag` is the canonical prefix identifying the kind in a code. `names`
/// lists every field in positional order; the category sets hold field
/// names and drive [`Subcode::merge`](crate::Subcode::merge) in selective
/// modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcodeType {
    /// Kind name used in registry references
    pub name: String,
    /// Canonical tag
    pub tag: String,
    /// Field names in positional order
    pub names: Vec<String>,
    /// Fields describing pose
    #[serde(default)]
    pub poses: BTreeSet<String>,
    /// Fields holding colours
    #[serde(default)]
    pub colors: BTreeSet<String>,
    /// Fields describing expression
    #[serde(default)]
    pub exprs: BTreeSet<String>,
    /// Fields describing clothing
    #[serde(default)]
    pub clothes: BTreeSet<String>,
    /// Fields describing body shape
    #[serde(default)]
    pub body: BTreeSet<String>,
    /// Fields that can be interpolated between two codes
    #[serde(default)]
    pub lerp: BTreeSet<String>,
}

impl SubcodeType {
    /// Create a kind with no category information
    pub fn new(name: impl Into<String>, tag: impl Into<String>, names: &[&str]) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            names: names.iter().map(|n| (*n).to_string()).collect(),
            poses: BTreeSet::new(),
            colors: BTreeSet::new(),
            exprs: BTreeSet::new(),
            clothes: BTreeSet::new(),
            body: BTreeSet::new(),
            lerp: BTreeSet::new(),
        }
    }

    /// Add field names to a category set
    #[must_use]
    pub fn with_category(mut self, category: FieldCategory, fields: &[&str]) -> Self {
        let set = match category {
            FieldCategory::Color => &mut self.colors,
            FieldCategory::Pose => &mut self.poses,
            FieldCategory::Expr => &mut self.exprs,
            FieldCategory::Clothes => &mut self.clothes,
            FieldCategory::Body => &mut self.body,
        };
        set.extend(fields.iter().map(|f| (*f).to_string()));
        self
    }

    /// Number of declared fields
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.names.len()
    }

    /// Position of a named field
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Name of the field at a position
    #[must_use]
    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Whether the field at `index` belongs to `category`
    #[must_use]
    pub fn in_category(&self, index: usize, category: FieldCategory) -> bool {
        let Some(name) = self.field_name(index) else {
            return false;
        };
        let set = match category {
            FieldCategory::Color => &self.colors,
            FieldCategory::Pose => &self.poses,
            FieldCategory::Expr => &self.exprs,
            FieldCategory::Clothes => &self.clothes,
            FieldCategory::Body => &self.body,
        };
        set.contains(name)
    }
}

impl fmt::Display for SubcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Subcode {}({:?})[{}]>", self.name, self.tag, self.names.join(", "))
    }
}
