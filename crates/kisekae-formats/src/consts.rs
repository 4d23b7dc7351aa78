//! Delimiters and fixed values of the code text encoding

/// Separates the model slots from the scene chunk
pub const SCENE_DELIM: &str = "#/]";

/// Separates a chunk's subcodes from its trailing asset strings
pub const ASSET_DELIM: &str = "/#]";

/// Separates the version number from the body
pub const VERSION_DELIM: &str = "**";

/// Separates model slots
pub const SLOT_DELIM: char = '*';

/// Leading marker announcing a scene chunk
pub const SCENE_MARKER: char = '*';

/// Separates subcode tokens within a chunk or component
pub const SUBCODE_DELIM: char = '_';

/// Separates field values within a subcode
pub const PIECE_DELIM: char = '.';

/// Model segment meaning "no chunk at this slot"
pub const EMPTY_SLOT: &str = "0";

/// Number of character slots in a code
pub const MODEL_SLOTS: usize = 9;

/// Version assumed when the text carries no version prefix
pub const DEFAULT_VERSION: i32 = 68;

/// Version of an empty code
pub const NO_VERSION: i32 = -1;

/// Array tags whose index is written with a single digit
pub const SINGLE_DIGIT_TAGS: &[&str] = &["u"];

/// Default value returned for fields that do not exist
pub const DEFAULT_PIECE: &str = "0";

/// Whether array indices for `tag` use a single digit
#[must_use]
pub fn is_single_digit(tag: &str) -> bool {
    SINGLE_DIGIT_TAGS.contains(&tag)
}

/// Highest number of array entries addressable for `tag`
#[must_use]
pub fn max_array_index(tag: &str) -> usize {
    if is_single_digit(tag) { 9 } else { 99 }
}

/// Tag plus zero-padded index, as written in a code
#[must_use]
pub fn format_prefix(tag: &str, index: Option<usize>) -> String {
    match index {
        Some(index) if is_single_digit(tag) => format!("{tag}{index:01}"),
        Some(index) => format!("{tag}{index:02}"),
        None => tag.to_string(),
    }
}
