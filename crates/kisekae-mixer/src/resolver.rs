//! Source resolution against the file system.
//!
//! External sources resolve relative to the working directory, internal
//! sources relative to the preset bank. A path without an extension gets
//! `.kkl` appended. Paths may be glob patterns (`*`, `?`, `[..]`, `{a,b}`,
//! and `**` across directories); every matching file becomes one code.

use crate::error::{MixerError, Result};
use crate::program::{Source, SourceKind};
use globset::GlobBuilder;
use kisekae_formats::{Code, Registry};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of code files
pub const CODE_EXTENSION: &str = "kkl";

const GLOB_CHARS: &[char] = &['*', '?', '[', '{'];

/// Turns a source into the codes it names
pub trait CodeResolver {
    /// Resolve every code matched by `source`; no match is an empty list
    fn resolve(&self, source: &Source) -> Result<Vec<Code>>;
}

/// Resolves sources by reading code files
#[derive(Debug, Clone)]
pub struct FileResolver {
    registry: Arc<Registry>,
    preset_dir: PathBuf,
    working_dir: PathBuf,
}

impl FileResolver {
    /// Create a resolver using the current directory for external sources
    pub fn new(registry: Arc<Registry>, preset_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            preset_dir: preset_dir.into(),
            working_dir: PathBuf::from("."),
        }
    }

    /// Resolve external sources relative to `dir`
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Registry used to parse resolved files
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Full pattern for a source, extension included
    #[must_use]
    pub fn pattern_for(&self, source: &Source) -> PathBuf {
        let base = match source.source {
            SourceKind::Internal => &self.preset_dir,
            SourceKind::External => &self.working_dir,
        };
        let mut pattern = base.join(&source.path);
        if pattern.extension().is_none() {
            let mut raw = pattern.into_os_string();
            raw.push(".");
            raw.push(CODE_EXTENSION);
            pattern = PathBuf::from(raw);
        }
        pattern
    }
}

impl CodeResolver for FileResolver {
    fn resolve(&self, source: &Source) -> Result<Vec<Code>> {
        let pattern = self.pattern_for(source);
        let files = match_files(&pattern)?;
        if files.is_empty() {
            warn!("Source {} matched no files ({})", source.name, pattern.display());
        }
        files
            .iter()
            .map(|file| read_code(file, &self.registry))
            .collect()
    }
}

/// Read and parse one code file
pub fn read_code(path: &Path, registry: &Registry) -> Result<Code> {
    let text = std::fs::read_to_string(path).map_err(|source| MixerError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Code::parse(text.trim_end(), registry)?)
}

/// Files matching a path or glob pattern, sorted
pub fn match_files(pattern: &Path) -> Result<Vec<PathBuf>> {
    let components: Vec<Component<'_>> = pattern.components().collect();
    let first_glob = components
        .iter()
        .position(|c| c.as_os_str().to_string_lossy().contains(GLOB_CHARS));

    let Some(first_glob) = first_glob else {
        return Ok(if pattern.is_file() {
            vec![pattern.to_path_buf()]
        } else {
            Vec::new()
        });
    };

    let base: PathBuf = components[..first_glob].iter().collect();
    let base = if base.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        base
    };
    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let pattern_text = pattern.to_string_lossy();
    let matcher = GlobBuilder::new(&pattern_text)
        .literal_separator(true)
        .build()?
        .compile_matcher();

    let mut walker = WalkDir::new(&base);
    if !pattern_text.contains("**") {
        walker = walker.max_depth(components.len() - first_glob);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && matcher.is_match(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    debug!("Pattern {} matched {} files", pattern_text, files.len());
    Ok(files)
}

/// Every code file in the preset bank, relative to it and sorted
///
/// `category` narrows the listing to one subdirectory.
pub fn list_presets(preset_dir: &Path, category: Option<&str>) -> Result<Vec<PathBuf>> {
    let root = match category {
        Some(category) => preset_dir.join(category),
        None => preset_dir.to_path_buf(),
    };
    if !root.is_dir() {
        return Err(MixerError::Config(format!(
            "preset directory not found: {}",
            root.display()
        )));
    }

    let mut presets = Vec::new();
    for entry in WalkDir::new(&root) {
        let entry = entry?;
        let is_code = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == CODE_EXTENSION);
        if entry.file_type().is_file() && is_code {
            let relative = entry
                .path()
                .strip_prefix(preset_dir)
                .unwrap_or(entry.path())
                .to_path_buf();
            presets.push(relative);
        }
    }
    presets.sort();
    Ok(presets)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_registry;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, text: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn bank() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "clothes/shirt.kkl", "68**ja1");
        write(dir.path(), "clothes/skirt.kkl", "68**ja2\n");
        write(dir.path(), "clothes/deep/coat.kkl", "68**ja3");
        write(dir.path(), "pose/wave.kkl", "68**aa1");
        write(dir.path(), "pose/notes.txt", "not a code");
        dir
    }

    #[test]
    fn test_pattern_gets_extension() {
        let resolver = FileResolver::new(fixture_registry(), "/bank").with_working_dir("/work");

        let internal = Source::new("a", "clothes/shirt").with_kind(SourceKind::Internal);
        assert_eq!(
            resolver.pattern_for(&internal),
            PathBuf::from("/bank/clothes/shirt.kkl")
        );

        let external = Source::new("b", "mine/*.txt");
        assert_eq!(
            resolver.pattern_for(&external),
            PathBuf::from("/work/mine/*.txt")
        );
    }

    #[test]
    fn test_literal_path() {
        let dir = bank();
        let resolver = FileResolver::new(fixture_registry(), dir.path());
        let source = Source::new("shirt", "clothes/shirt").with_kind(SourceKind::Internal);

        let codes = resolver.resolve(&source).unwrap();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].to_string(), "68**ja1");
    }

    #[test]
    fn test_glob_is_sorted_and_single_level() {
        let dir = bank();
        let resolver = FileResolver::new(fixture_registry(), dir.path());
        let source = Source::new("clothes", "clothes/*").with_kind(SourceKind::Internal);

        let codes = resolver.resolve(&source).unwrap();
        let texts: Vec<String> = codes.iter().map(ToString::to_string).collect();
        assert_eq!(texts, vec!["68**ja1", "68**ja2"]);
    }

    #[test]
    fn test_recursive_glob() {
        let dir = bank();
        let files = match_files(&dir.path().join("clothes/**/*.kkl")).unwrap();

        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["coat.kkl", "shirt.kkl", "skirt.kkl"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let dir = bank();
        let resolver = FileResolver::new(fixture_registry(), dir.path()).with_working_dir(dir.path());

        assert!(resolver.resolve(&Source::new("x", "missing")).unwrap().is_empty());
        assert!(resolver.resolve(&Source::new("x", "nowhere/*")).unwrap().is_empty());
    }

    #[test]
    fn test_source_memoises() {
        let dir = bank();
        let resolver = FileResolver::new(fixture_registry(), dir.path());
        let source = Source::new("wave", "pose/wave").with_kind(SourceKind::Internal);

        assert_eq!(source.codes(&resolver).unwrap().len(), 1);
        fs::remove_file(dir.path().join("pose/wave.kkl")).unwrap();
        assert_eq!(source.codes(&resolver).unwrap().len(), 1);
    }

    #[test]
    fn test_list_presets() {
        let dir = bank();

        let all = list_presets(dir.path(), None).unwrap();
        assert_eq!(
            all,
            vec![
                PathBuf::from("clothes/deep/coat.kkl"),
                PathBuf::from("clothes/shirt.kkl"),
                PathBuf::from("clothes/skirt.kkl"),
                PathBuf::from("pose/wave.kkl"),
            ]
        );

        let poses = list_presets(dir.path(), Some("pose")).unwrap();
        assert_eq!(poses, vec![PathBuf::from("pose/wave.kkl")]);

        assert!(list_presets(dir.path(), Some("missing")).is_err());
    }
}
