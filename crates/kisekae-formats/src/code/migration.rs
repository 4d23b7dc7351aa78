//! One-way version migration
//!
//! Codes older than [`MIGRATION_VERSION`] store head offsets on a different
//! scale and use an older shoe numbering. Upgrading rewrites those fields in
//! place; there is no downgrade path.

use super::Code;
use crate::subcode::Subcode;
use tracing::debug;

/// First version using the current head and shoe layout
pub const MIGRATION_VERSION: i32 = 83;

/// Neutral value forced into the head offset and rotation fields
pub const NEUTRAL_HEAD_VALUE: &str = "50";

const HEAD_FIELDS: [&str; 3] = ["OffsetX", "OffsetY", "Rotation"];

const SHOE_TAGS: [&str; 2] = ["jd", "je"];

/// Replacement values for one old shoe type
///
/// `None` in `kind` or `top` keeps the current value. The colour entries name
/// the field of the same shoe to copy from, or `None` to keep the field.
struct ShoeRemap {
    old: &'static str,
    kind: Option<&'static str>,
    top: Option<&'static str>,
    top_color1: Option<&'static str>,
    top_color2: Option<&'static str>,
    color2: Option<&'static str>,
}

#[rustfmt::skip]
const SHOE_REMAP: &[ShoeRemap] = &[
    ShoeRemap { old: "0", kind: None, top: Some("1"), top_color1: Some("Color2"), top_color2: None, color2: Some("Color1") },
    ShoeRemap { old: "1", kind: None, top: Some("2"), top_color1: Some("Color2"), top_color2: None, color2: Some("Color3") },
    ShoeRemap { old: "10", kind: Some("1"), top: Some("3"), top_color1: Some("Color2"), top_color2: None, color2: Some("Color3") },
    ShoeRemap { old: "11", kind: Some("1"), top: Some("4"), top_color1: Some("Color2"), top_color2: None, color2: Some("Color3") },
    ShoeRemap { old: "15", kind: None, top: Some("6"), top_color1: Some("Color2"), top_color2: None, color2: Some("Color1") },
    ShoeRemap { old: "16", kind: Some("1"), top: Some("7"), top_color1: Some("Color2"), top_color2: None, color2: Some("Color3") },
    ShoeRemap { old: "17", kind: Some("14"), top: Some("8"), top_color1: Some("Color1"), top_color2: Some("Color2"), color2: Some("Color3") },
    ShoeRemap { old: "18", kind: Some("14"), top: Some("9"), top_color1: Some("Color1"), top_color2: Some("Color2"), color2: Some("Color3") },
    ShoeRemap { old: "19", kind: Some("15"), top: Some("10"), top_color1: Some("Color2"), top_color2: None, color2: Some("Color3") },
    ShoeRemap { old: "20", kind: Some("16"), top: Some("11"), top_color1: Some("Color2"), top_color2: None, color2: None },
];

impl Code {
    /// Upgrade this code to `target` in place
    ///
    /// Only the transition from below 83 to 83 or later is defined; any other
    /// request leaves the code untouched, version included.
    pub fn convert_version(&mut self, target: i32) {
        if self.version >= MIGRATION_VERSION || target < MIGRATION_VERSION {
            return;
        }

        let mut shoes = 0usize;
        for chunk in self.models.iter_mut().flatten() {
            if let Some(head) = chunk
                .component_mut("Expression")
                .and_then(|expression| expression.get_mut("hd"))
            {
                for field in HEAD_FIELDS {
                    head.set(field, NEUTRAL_HEAD_VALUE);
                }
            }

            if let Some(clothing) = chunk.component_mut("Clothing") {
                for tag in SHOE_TAGS {
                    if let Some(shoe) = clothing.get_mut(tag) {
                        if convert_shoe(shoe) {
                            shoes += 1;
                        }
                    }
                }
            }
        }

        debug!(
            "Converted code from v{} to v{} ({} shoes remapped)",
            self.version, target, shoes
        );
        self.version = target;
    }
}

/// Remap one shoe subcode, returning whether its type had an entry
fn convert_shoe(shoe: &mut Subcode) -> bool {
    if shoe.is_absent() {
        return false;
    }
    let Some(entry) = SHOE_REMAP.iter().find(|entry| entry.old == shoe.get("Type")) else {
        return false;
    };

    // Read every source before writing anything
    let top_color1 = entry.top_color1.map(|field| shoe.get(field).to_string());
    let top_color2 = entry.top_color2.map(|field| shoe.get(field).to_string());
    let color2 = entry.color2.map(|field| shoe.get(field).to_string());

    if let Some(kind) = entry.kind {
        shoe.set("Type", kind);
    }
    if let Some(top) = entry.top {
        shoe.set("Top", top);
    }
    if let Some(value) = top_color1 {
        shoe.set("TopColor1", value);
    }
    if let Some(value) = top_color2 {
        shoe.set("TopColor2", value);
    }
    if let Some(value) = color2 {
        shoe.set("Color2", value);
    }
    true
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_registry;
    use pretty_assertions::assert_eq;

    fn shoe_after(text: &str) -> String {
        let registry = fixture_registry();
        let mut code = Code::parse(text, &registry).unwrap();
        code.convert_version(MIGRATION_VERSION);
        code.to_string()
    }

    #[test]
    fn test_head_neutralised() {
        assert_eq!(shoe_after("68**hd1.2.3.4.5.6"), "83**hd1.2.50.50.50.6");
    }

    #[test]
    fn test_short_head_is_padded() {
        assert_eq!(shoe_after("68**hd1"), "83**hd1.0.50.50.50");
    }

    #[test]
    fn test_absent_subcodes_not_synthesised() {
        assert_eq!(shoe_after("68**fa1_ja2"), "83**fa1_ja2");
    }

    #[test]
    fn test_expression_without_head_untouched() {
        let registry = fixture_registry();
        let mut code = Code::parse("68**fa1.80", &registry).unwrap();

        code.convert_version(MIGRATION_VERSION);

        let expression = code.model(0).unwrap().component("Expression").unwrap();
        assert!(!expression.contains("hd"));
        assert_eq!(expression.len(), 1);
        assert_eq!(code.to_string(), "83**fa1.80");
    }

    #[test]
    fn test_shoe_type_kept_with_copied_colors() {
        // Type 0: Top 1, TopColor1 <- Color2, Color2 <- Color1
        assert_eq!(
            shoe_after("68**jd0.AA.BB.CC.0.0.0.0"),
            "83**jd0.AA.AA.CC.1.BB.0.0"
        );
    }

    #[test]
    fn test_shoe_type_replaced() {
        // Type 17: Type 14, Top 8, TopColor1 <- Color1, TopColor2 <- Color2, Color2 <- Color3
        assert_eq!(
            shoe_after("68**jd17.AA.BB.CC.0.0.0.1_je18.DD.EE.FF"),
            "83**jd14.AA.CC.CC.8.AA.BB.1_je14.DD.FF.FF.9.DD.EE"
        );
    }

    #[test]
    fn test_shoe_color2_untouched_for_type_20() {
        assert_eq!(
            shoe_after("68**jd20.AA.BB.CC.0.0.0.0"),
            "83**jd16.AA.BB.CC.11.BB.0.0"
        );
    }

    #[test]
    fn test_unmapped_shoe_untouched() {
        assert_eq!(shoe_after("68**jd5.AA.BB"), "83**jd5.AA.BB");
    }

    #[test]
    fn test_noop_outside_transition() {
        let registry = fixture_registry();

        let mut current = Code::parse("83**hd1.2.3.4.5", &registry).unwrap();
        current.convert_version(90);
        assert_eq!(current.to_string(), "83**hd1.2.3.4.5");

        let mut old = Code::parse("68**hd1.2.3.4.5", &registry).unwrap();
        old.convert_version(80);
        assert_eq!(old.version, 68);
        assert_eq!(old.to_string(), "68**hd1.2.3.4.5");
    }

    #[test]
    fn test_idempotent() {
        let registry = fixture_registry();
        let mut once = Code::parse("68**hd1.2.3.4.5_jd0.AA.BB.CC", &registry).unwrap();
        once.convert_version(83);
        let mut twice = once.clone();
        twice.convert_version(83);

        assert_eq!(once, twice);
    }
}
