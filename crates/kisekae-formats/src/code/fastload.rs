//! Flattened per-field listing of one character, for incremental updates

use super::Code;
use serde::Serialize;

/// One field assignment: subcode prefix, field position and value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FastloadEntry {
    /// Tag plus zero-padded index, e.g. `aa` or `r00`
    pub prefix: String,
    /// Zero-based field position
    pub position: usize,
    /// Field value
    pub value: String,
}

impl FastloadEntry {
    fn new(prefix: &str, position: usize, value: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            position,
            value: value.to_string(),
        }
    }
}

impl Code {
    /// Flatten every subcode of the character at `slot` into field entries
    ///
    /// Positions are the real field positions. Empty values are skipped, and
    /// absent subcodes contribute nothing, unless `include_empty` is set; an
    /// absent subcode then yields one empty entry per declared field.
    #[must_use]
    pub fn fastload_list(&self, slot: usize, include_empty: bool) -> Vec<FastloadEntry> {
        let Some(chunk) = self.model(slot) else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        for subcode in chunk.components().flat_map(|c| c.subcodes()) {
            let prefix = subcode.prefix();
            if subcode.is_absent() {
                if include_empty {
                    entries.extend(
                        (0..subcode.subcode_type().field_count())
                            .map(|position| FastloadEntry::new(&prefix, position, "")),
                    );
                }
                continue;
            }
            entries.extend(
                subcode
                    .pieces()
                    .iter()
                    .enumerate()
                    .filter(|(_, value)| include_empty || !value.is_empty())
                    .map(|(position, value)| FastloadEntry::new(&prefix, position, value)),
            );
        }
        entries
    }
}
