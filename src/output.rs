//! Serialization of the effective configuration to disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::{ConfigError, Document};

/// Renders a document as YAML.
pub fn render_document(document: &Document) -> Result<String, ConfigError> {
    serde_yaml::to_string(document).map_err(ConfigError::SerializeError)
}

/// Writes `document` to `path` as YAML.
///
/// The file is replaced atomically: either the previous contents remain or
/// the complete new document is in place.
pub fn write_document(document: &Document, path: &Path) -> Result<(), ConfigError> {
    let rendered = render_document(document)?;
    stage(path, rendered.as_bytes())?.commit()
}

/// Writes the effective configuration and its debug copy.
///
/// The document is rendered once, so both files receive identical bytes.
/// Both files are staged before either is replaced, and the debug copy is
/// replaced first, so a failure never leaves a new output beside a stale
/// debug copy.
pub fn emit(document: &Document, output: &Path, debug_output: &Path) -> Result<(), ConfigError> {
    let rendered = render_document(document)?;
    let staged_output = stage(output, rendered.as_bytes())?;
    let staged_debug = stage(debug_output, rendered.as_bytes())?;

    for staged in [staged_debug, staged_output] {
        let path = staged.target;
        staged.commit()?;
        tracing::info!(path = %path.display(), bytes = rendered.len(), "wrote effective configuration");
    }
    Ok(())
}

/// A fully written temp file next to its destination, not yet renamed.
struct StagedFile<'a> {
    target: &'a Path,
    file: NamedTempFile,
}

impl StagedFile<'_> {
    fn commit(self) -> Result<(), ConfigError> {
        let target = self.target;
        self.file
            .persist(target)
            .map_err(|e| ConfigError::WriteError {
                path: target.to_path_buf(),
                source: e.error,
            })?;
        Ok(())
    }
}

fn stage<'a>(path: &'a Path, contents: &[u8]) -> Result<StagedFile<'a>, ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_error)?;

    let mut staged = NamedTempFile::new_in(parent).map_err(write_error)?;
    staged.write_all(contents).map_err(write_error)?;
    staged.as_file().sync_all().map_err(write_error)?;

    // Temp files are created owner-only; keep what the destination had.
    match fs::metadata(path) {
        Ok(existing) => staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(write_error)?,
        Err(_) => set_default_permissions(staged.as_file()).map_err(write_error)?,
    }

    Ok(StagedFile {
        target: path,
        file: staged,
    })
}

#[cfg(unix)]
fn set_default_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}
