//! Writing generated codes to disk.

use crate::error::{MixerError, Result};
use crate::program::MixerProgram;
use crate::resolver::{CODE_EXTENSION, CodeResolver};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// `<output_dir>/<name>.<extension>`, keeping any dots already in `name`
pub(crate) fn output_path(output_dir: &Path, name: &Path, extension: &str) -> PathBuf {
    let mut raw = output_dir.join(name).into_os_string();
    raw.push(".");
    raw.push(extension);
    PathBuf::from(raw)
}

/// Write `text` to `path`, creating parent directories
pub(crate) fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    };
    write().map_err(|source| MixerError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Enumerate `program` and write every generated code as a `.kkl` file
///
/// Returns the written paths in generation order.
pub fn output_codes<R: CodeResolver + ?Sized>(
    program: &MixerProgram,
    resolver: &R,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let codes = program.enumerate_codes(resolver)?;
    let mut written = Vec::with_capacity(codes.len());

    for (name, code) in &codes {
        let path = output_path(output_dir, name, CODE_EXTENSION);
        debug!("Writing {}", path.display());
        write_file(&path, code.to_string().as_bytes())?;
        written.push(path);
    }

    info!("Wrote {} codes to {}", written.len(), output_dir.display());
    Ok(written)
}
