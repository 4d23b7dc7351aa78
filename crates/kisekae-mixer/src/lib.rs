//! Combinatorial generator for KisekaeII codes
//!
//! A [`MixerProgram`] lists options, each with alternative [`Source`]s. The
//! mixer picks one source per option, merges their codes in option order
//! and names the result after the chosen sources. Tags on each source rule
//! out incompatible pairs (blacklists) or demand companions (whitelists).
//!
//! Generated codes can be written to disk with [`output_codes`], or rendered
//! to images through any [`Session`] with [`render_program`]. The
//! [`separator`] module goes the other way and cuts one code into parts.
//!
//! # Example
//!
//! ```no_run
//! use kisekae_mixer::{FileResolver, MixerProgram, output_codes};
//! use kisekae_formats::Registry;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(Registry::from_paths("subcodes.json", "components.json")?);
//! let resolver = FileResolver::new(registry, "bank");
//! let program = MixerProgram::load("outfits.json")?;
//!
//! for path in output_codes(&program, &resolver, Path::new("out"))? {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), kisekae_mixer::MixerError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod enumerate;
pub mod error;
pub mod output;
pub mod program;
pub mod render;
pub mod resolver;
pub mod separator;
pub mod session;

pub use config::{Cli, Command, MixerConfig};
pub use error::{MixerError, Result};
pub use output::output_codes;
pub use program::{MixerOption, MixerProgram, Source, SourceKind};
pub use render::{RenderSummary, render_program};
pub use resolver::{CodeResolver, FileResolver, list_presets, match_files, read_code};
pub use separator::{SplitSpec, split_code};
pub use session::{CaptureRequest, Session, apply_character};

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;
