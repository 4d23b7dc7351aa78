//! Splitting a code into selected component groups.
//!
//! A split specifier is a string of letters, optionally followed by `:` and
//! a name for the output file:
//!
//! | Letter | Keeps |
//! |--------|-------|
//! | `c` | clothing |
//! | `u` | underwear only (ignored with `c`) |
//! | `b` | body appearance |
//! | `d` | decorations (moles, marks) |
//! | `f` | face |
//! | `h` | hair |
//! | `e` | expression |
//! | `p` | pose |

use crate::error::{MixerError, Result};
use crate::resolver::CODE_EXTENSION;
use kisekae_formats::{Code, Registry};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LETTERS: &str = "cubdfhep";

const UNDERWEAR: &[&str] = &["ka", "kb", "kc", "kd", "ke", "jc", "ja", "jb"];
const BODY: &[&str] = &["ca", "da", "db", "dd", "dh", "di", "qa", "qb", "dc", "eh"];
const DECORATIONS: &[&str] = &["pb", "pc", "pd", "pe"];

/// Which parts of a code to keep, and what to call the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSpec {
    /// Selection letters as given
    pub letters: String,
    /// Output name replacing the letters in the file name
    pub suffix: Option<String>,
}

impl SplitSpec {
    /// Parse `letters[:suffix]`
    pub fn parse(spec: &str) -> Result<Self> {
        let invalid = |reason: String| MixerError::InvalidSplitSpec {
            spec: spec.to_string(),
            reason,
        };

        let (letters, suffix) = match spec.split_once(':') {
            Some((letters, suffix)) => (letters, Some(suffix)),
            None => (spec, None),
        };
        if letters.is_empty() {
            return Err(invalid("no letters".to_string()));
        }
        if let Some(bad) = letters.chars().find(|c| !LETTERS.contains(*c)) {
            return Err(invalid(format!("unknown letter '{bad}'")));
        }
        if suffix.is_some_and(str::is_empty) {
            return Err(invalid("empty name".to_string()));
        }

        Ok(Self {
            letters: letters.to_string(),
            suffix: suffix.map(str::to_string),
        })
    }

    fn has(&self, letter: char) -> bool {
        self.letters.contains(letter)
    }

    /// Component names and subcode keys to pass to [`Code::filter`]
    #[must_use]
    pub fn retain_keys(&self) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        let mut add = |names: &[&str]| keys.extend(names.iter().map(|n| (*n).to_string()));

        if self.has('c') {
            add(&["Clothing"]);
        } else if self.has('u') {
            add(&["Clothing"]);
            add(UNDERWEAR);
        }
        if self.has('e') {
            add(&["Expression"]);
        }
        if self.has('f') {
            add(&["Face"]);
        }
        if self.has('h') {
            add(&["Hair"]);
        }
        if self.has('b') {
            add(&["Appearance"]);
            add(BODY);
        }
        if self.has('d') {
            add(&["Appearance"]);
            add(DECORATIONS);
        }
        if self.has('p') {
            add(&["Pose"]);
        }
        keys
    }

    /// Where the split of `input` is written
    ///
    /// With a suffix the result is `<output_dir>/<suffix>.kkl`, or
    /// `<input stem>_<suffix>.kkl` beside the input. Without one the letters
    /// take the suffix's place after the input's stem.
    #[must_use]
    pub fn output_path(&self, input: &Path, output_dir: Option<&Path>) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = match (&self.suffix, output_dir) {
            (Some(suffix), Some(_)) => format!("{suffix}.{CODE_EXTENSION}"),
            (Some(suffix), None) => format!("{stem}_{suffix}.{CODE_EXTENSION}"),
            (None, _) => format!("{stem}_{}.{CODE_EXTENSION}", self.letters),
        };
        match output_dir {
            Some(dir) => dir.join(file_name),
            None => input.with_file_name(file_name),
        }
    }
}

impl FromStr for SplitSpec {
    type Err = MixerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Copy of `code` holding only what `spec` selects
#[must_use]
pub fn split_code(code: &Code, spec: &SplitSpec, registry: &Registry) -> Code {
    let mut split = code.clone();
    split.filter(spec.retain_keys(), registry);
    split
}
