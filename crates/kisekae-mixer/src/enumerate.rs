//! Recursive cross-product enumeration of a mixer program.
//!
//! Enumeration walks the options depth first, picking one source per
//! option. Each pick carries the union of tags, blacklists and whitelists
//! chosen so far:
//!
//! - a source is skipped when its tags meet the accumulated blacklist, or its
//!   blacklist meets the accumulated tags
//! - at the last option, a chain whose accumulated whitelist is not covered
//!   by the accumulated tags is discarded
//! - a source resolving to several codes forks one branch per code, named
//!   with the code's position
//!
//! Names join the chosen sources with `_` in option order. Codes from later
//! options are merged on top of codes from earlier ones.

use crate::error::Result;
use crate::program::{MixerProgram, Source};
use crate::resolver::CodeResolver;
use indexmap::IndexMap;
use kisekae_formats::Code;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{debug, trace};

/// Tag sets accumulated along one chain of choices
#[derive(Debug, Clone, Default)]
struct Chain {
    tags: BTreeSet<String>,
    blacklist: BTreeSet<String>,
    whitelist: BTreeSet<String>,
}

impl Chain {
    fn rejects(&self, source: &Source) -> bool {
        !source.tags.is_disjoint(&self.blacklist) || !source.blacklist.is_disjoint(&self.tags)
    }

    fn with(&self, source: &Source) -> Self {
        Self {
            tags: self.tags.union(&source.tags).cloned().collect(),
            blacklist: self.blacklist.union(&source.blacklist).cloned().collect(),
            whitelist: self.whitelist.union(&source.whitelist).cloned().collect(),
        }
    }

    fn satisfied(&self) -> bool {
        self.whitelist.is_subset(&self.tags)
    }
}

impl MixerProgram {
    /// Generate every compatible combination, keyed by `destdir` joined with
    /// the composed name
    pub fn enumerate_codes<R: CodeResolver + ?Sized>(
        &self,
        resolver: &R,
    ) -> Result<IndexMap<PathBuf, Code>> {
        let named = self.enumerate_from(0, &Chain::default(), resolver)?;
        debug!("Enumerated {} combinations", named.len());
        Ok(named
            .into_iter()
            .map(|(name, code)| (self.destdir.join(name), code))
            .collect())
    }

    /// Generate combinations keyed by composed name only
    pub fn enumerate_names<R: CodeResolver + ?Sized>(
        &self,
        resolver: &R,
    ) -> Result<IndexMap<String, Code>> {
        self.enumerate_from(0, &Chain::default(), resolver)
    }

    fn enumerate_from<R: CodeResolver + ?Sized>(
        &self,
        index: usize,
        chain: &Chain,
        resolver: &R,
    ) -> Result<IndexMap<String, Code>> {
        let mut total = IndexMap::new();
        let Some(option) = self.options.get(index) else {
            return Ok(total);
        };
        let last = index + 1 == self.options.len();

        for source in &option.sources {
            if chain.rejects(source) {
                trace!("{}: {} blocked by tags", option.name, source.name);
                continue;
            }
            let next = chain.with(source);
            if last && !next.satisfied() {
                trace!("{}: {} leaves whitelist unmet", option.name, source.name);
                continue;
            }

            let codes = source.codes(resolver)?;
            let numbered = codes.len() > 1;
            let base_name = |position: usize| {
                if numbered {
                    format!("{}{}", source.name, position)
                } else {
                    source.name.clone()
                }
            };

            if last {
                for (position, code) in codes.iter().enumerate() {
                    total.insert(base_name(position), code.clone());
                }
                continue;
            }

            if codes.is_empty() {
                continue;
            }
            let tails = self.enumerate_from(index + 1, &next, resolver)?;
            for (position, code) in codes.iter().enumerate() {
                let head = base_name(position);
                for (tail_name, tail_code) in &tails {
                    let mut merged = code.clone();
                    merged.merge(tail_code)?;
                    total.insert(format!("{head}_{tail_name}"), merged);
                }
            }
        }
        Ok(total)
    }
}
