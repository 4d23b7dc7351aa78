//! Parser, writer and merge engine for KisekaeII character codes
//!
//! A code describes the full dress-up state of up to nine characters and a
//! shared scene. This crate models it as four levels:
//!
//! - **[`Code`]**: version number, nine character slots and an optional scene
//! - **[`Chunk`]**: the components of one slot, plus opaque asset strings
//! - **[`Component`]**: the subcodes of one category (clothing, pose, ...)
//! - **[`Subcode`]**: one tagged list of dot-separated field values
//!
//! Field layouts and component groupings come from a [`Registry`] built once
//! from JSON and passed to every parse call.
//!
//! # Example
//!
//! ```
//! use kisekae_formats::{Code, Registry};
//!
//! let subcodes = r#"[{"name": "Arm", "tag": "aa", "names": ["x", "y"]}]"#;
//! let components = r#"[{"name": "Pose", "singles": {"aa": [null, "Arm"]}}]"#;
//! let registry = Registry::from_json(subcodes, components)?;
//!
//! let mut code = Code::parse("68**aa1.2", &registry)?;
//! let arm = code
//!     .model_mut(0)
//!     .and_then(|chunk| chunk.component_mut("Pose"))
//!     .and_then(|pose| pose.get_mut("aa"))
//!     .expect("slot 0 has an arm subcode");
//! assert_eq!(arm.get("x"), "1");
//!
//! arm.set("y", "9");
//! assert_eq!(code.to_string(), "68**aa1.9");
//! # Ok::<(), kisekae_formats::FormatError>(())
//! ```

#![warn(missing_docs)]

pub mod chunk;
/// Full codes, version migration and fastload flattening
pub mod code;
pub mod component;
pub mod consts;
pub mod error;
pub mod registry;
pub mod subcode;

pub use chunk::Chunk;
pub use code::{Code, FastloadEntry};
pub use component::Component;
pub use error::{FormatError, Result};
pub use registry::{ComponentSpec, ComponentType, FieldCategory, Registry, SubcodeSlot, SubcodeType};
pub use subcode::{FieldKey, MergeMode, Subcode};

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

/// Common text format trait implemented by [`Subcode`], [`Chunk`] and [`Code`]
pub trait CodeFormat: Sized + std::fmt::Display + PartialEq + std::fmt::Debug {
    /// Parse from text
    fn parse(text: &str, registry: &Registry) -> Result<Self>;

    /// Render to text
    fn build(&self) -> String {
        self.to_string()
    }

    /// Verify that a second generation round trip is stable
    ///
    /// The first rebuild may normalise the text (slot markers, padding), so
    /// only `parse(build(parse(t)))` and its own rebuild are compared.
    fn verify_round_trip(text: &str, registry: &Registry) -> Result<()> {
        let first = Self::parse(text, registry)?;
        let second = Self::parse(&first.build(), registry)?;
        let third = Self::parse(&second.build(), registry)?;
        if second != third {
            return Err(FormatError::RoundTrip(format!(
                "{:?} != {:?}",
                second, third
            )));
        }
        Ok(())
    }
}
