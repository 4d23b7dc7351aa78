//! Subcode instances: one tagged, ordered list of string fields
//!
//! A subcode token is written as its tag, an optional zero-padded array
//! index and the dot-joined field values, e.g. `jd3.0.55.21` or `r011.FF0000`.
//! A subcode whose first piece is empty is *logically absent*: it renders as
//! its prefix alone and reports a length of zero.

use crate::consts::{DEFAULT_PIECE, PIECE_DELIM, format_prefix, is_single_digit};
use crate::error::{FormatError, Result};
use crate::registry::{ComponentType, FieldCategory, Registry, SubcodeType};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

/// Field positions at or past this are ignored by [`Subcode::set`]
pub const MAX_FIELDS: usize = 1024;

/// Field selector for [`Subcode::get`] and [`Subcode::set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey<'a> {
    /// Field name as declared by the subcode kind
    Name(&'a str),
    /// Zero-based field position
    Index(usize),
}

impl<'a> From<&'a str> for FieldKey<'a> {
    fn from(name: &'a str) -> Self {
        FieldKey::Name(name)
    }
}

impl From<usize> for FieldKey<'_> {
    fn from(index: usize) -> Self {
        FieldKey::Index(index)
    }
}

/// Which fields a merge is allowed to overwrite
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Every field, and absence propagates
    #[default]
    All,
    /// Only fields belonging to one of the listed categories
    Only(Vec<FieldCategory>),
}

impl MergeMode {
    fn overrides(&self, subcode_type: &SubcodeType, index: usize) -> bool {
        match self {
            MergeMode::All => true,
            MergeMode::Only(categories) => categories
                .iter()
                .any(|category| subcode_type.in_category(index, *category)),
        }
    }
}

impl FromStr for MergeMode {
    type Err = std::convert::Infallible;

    /// Parse a dot-separated keyword list such as `color.pose`
    ///
    /// Unrecognised keywords are ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "all" {
            return Ok(MergeMode::All);
        }
        Ok(MergeMode::Only(
            s.split(PIECE_DELIM)
                .filter_map(FieldCategory::from_keyword)
                .collect(),
        ))
    }
}

/// One addressable leaf value of a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcode {
    subcode_type: Arc<SubcodeType>,
    pieces: Vec<String>,
    index: Option<usize>,
    tag: String,
}

impl Subcode {
    /// A logically absent instance of `subcode_type` under its canonical tag
    #[must_use]
    pub fn new(subcode_type: Arc<SubcodeType>) -> Self {
        let tag = subcode_type.tag.clone();
        Self::placeholder(subcode_type, tag, None)
    }

    /// A logically absent instance under an explicit tag and index
    pub fn placeholder(
        subcode_type: Arc<SubcodeType>,
        tag: impl Into<String>,
        index: Option<usize>,
    ) -> Self {
        let pieces = vec![String::new(); subcode_type.field_count()];
        Self {
            subcode_type,
            pieces,
            index,
            tag: tag.into(),
        }
    }

    /// Parse a token, resolving its kind through the registry
    pub fn parse(token: &str, registry: &Registry) -> Result<Self> {
        let component = registry.component_by_tag(Self::tag_of(token)?)?;
        Self::parse_in(token, component)
    }

    /// Tag of a token without parsing its fields
    pub fn tag_of(token: &str) -> Result<&str> {
        split_token(token).map(|(tag, _, _)| tag)
    }

    /// Parse a token whose tag must belong to `component`
    pub fn parse_in(token: &str, component: &ComponentType) -> Result<Self> {
        let (tag, index, data) = split_token(token)?;
        let slot = component
            .lookup(tag)
            .ok_or_else(|| FormatError::UnknownTag(tag.to_string()))?;

        trace!("Parsed subcode {} index {:?} into {}", tag, index, component.name());

        Ok(Self {
            subcode_type: Arc::clone(&slot.subcode_type),
            pieces: data.split(PIECE_DELIM).map(str::to_string).collect(),
            index,
            tag: tag.to_string(),
        })
    }

    /// Field layout of this subcode
    #[must_use]
    pub fn subcode_type(&self) -> &Arc<SubcodeType> {
        &self.subcode_type
    }

    /// Tag used in the text, which may differ from the kind's canonical tag
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Array index, if this subcode is an array member
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Raw field values
    #[must_use]
    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }

    /// Tag plus zero-padded index
    #[must_use]
    pub fn prefix(&self) -> String {
        format_prefix(&self.tag, self.index)
    }

    /// Whether the subcode carries no data
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.pieces.first().is_none_or(String::is_empty)
    }

    /// Number of fields, zero when logically absent
    #[must_use]
    pub fn len(&self) -> usize {
        if self.is_absent() { 0 } else { self.pieces.len() }
    }

    /// Same as [`Subcode::is_absent`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_absent()
    }

    /// Field by name or position, `"0"` when it does not exist
    pub fn get<'k>(&self, key: impl Into<FieldKey<'k>>) -> &str {
        self.resolve(key.into())
            .and_then(|index| self.pieces.get(index))
            .map_or(DEFAULT_PIECE, String::as_str)
    }

    /// Assign a field by name or position
    ///
    /// Unknown names and positions from [`MAX_FIELDS`] on are ignored.
    /// Positions past the end pad with `"0"`.
    pub fn set<'k>(&mut self, key: impl Into<FieldKey<'k>>, value: impl Into<String>) {
        let Some(index) = self.resolve(key.into()) else {
            return;
        };
        if index >= MAX_FIELDS {
            trace!("Ignoring set of field {} on {}", index, self.tag);
            return;
        }
        self.pad_to(index + 1);
        self.pieces[index] = value.into();
    }

    /// Drop every piece
    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    /// Replace the pieces with the dot-split `data`
    pub fn set_data(&mut self, data: &str) {
        self.pieces = data.split(PIECE_DELIM).map(str::to_string).collect();
    }

    /// Overwrite fields from `other` as permitted by `mode`
    ///
    /// In [`MergeMode::All`] an absent `other` makes this subcode absent too.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::TypeMismatch`] if the two subcodes are of
    /// different kinds.
    pub fn merge(&mut self, other: &Subcode, mode: &MergeMode) -> Result<()> {
        if !Arc::ptr_eq(&self.subcode_type, &other.subcode_type)
            && self.subcode_type.name != other.subcode_type.name
        {
            return Err(FormatError::TypeMismatch {
                expected: self.subcode_type.name.clone(),
                actual: other.subcode_type.name.clone(),
            });
        }

        if *mode == MergeMode::All && other.is_absent() {
            self.pieces.clear();
            return Ok(());
        }

        for (index, piece) in other.pieces.iter().enumerate() {
            if mode.overrides(&self.subcode_type, index) {
                self.pad_to(index + 1);
                self.pieces[index] = piece.clone();
            }
        }
        Ok(())
    }

    fn resolve(&self, key: FieldKey<'_>) -> Option<usize> {
        match key {
            FieldKey::Index(index) => Some(index),
            FieldKey::Name(name) => self.subcode_type.field_index(name),
        }
    }

    fn pad_to(&mut self, len: usize) {
        if self.pieces.len() < len {
            self.pieces.resize(len, DEFAULT_PIECE.to_string());
        }
    }
}

impl fmt::Display for Subcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix())?;
        if !self.is_absent() {
            for (i, piece) in self.pieces.iter().enumerate() {
                if i > 0 {
                    write!(f, "{PIECE_DELIM}")?;
                }
                f.write_str(piece)?;
            }
        }
        Ok(())
    }
}

impl crate::CodeFormat for Subcode {
    fn parse(text: &str, registry: &Registry) -> Result<Self> {
        Self::parse(text, registry)
    }
}

/// Split a token into tag, index and field data
fn split_token(token: &str) -> Result<(&str, Option<usize>, &str)> {
    let bytes = token.as_bytes();
    if bytes.len() <= 1 {
        return Err(FormatError::InvalidToken(token.to_string()));
    }

    if bytes[1].is_ascii_digit() {
        let tag = token
            .get(..1)
            .ok_or_else(|| FormatError::InvalidToken(token.to_string()))?;
        let width = if is_single_digit(tag) || bytes.len() == 2 { 1 } else { 2 };
        let digits = token
            .get(1..=width)
            .ok_or_else(|| FormatError::InvalidIndex(token.to_string()))?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatError::InvalidIndex(token.to_string()));
        }
        let index = digits
            .parse::<usize>()
            .map_err(|_| FormatError::InvalidIndex(token.to_string()))?;
        Ok((tag, Some(index), &token[width + 1..]))
    } else {
        let tag = token
            .get(..2)
            .ok_or_else(|| FormatError::InvalidToken(token.to_string()))?;
        Ok((tag, None, &token[2..]))
    }
}
