//! One merge invocation: prepare the user document, merge the layers, and
//! write the effective configuration with its debug copy.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Document, LayeredConfig};
use crate::output::emit;

/// File name of the forced document inside the defaults directory.
pub const FORCED_FILE_NAME: &str = "forced.yml";

/// Paths for a single merge run.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub defaults_dir: PathBuf,
    pub user: PathBuf,
    pub output: PathBuf,
    pub debug_output: PathBuf,
    /// Forced document; defaults to [`FORCED_FILE_NAME`] in `defaults_dir`.
    pub forced: Option<PathBuf>,
}

impl MergeRequest {
    pub fn new(
        defaults_dir: impl Into<PathBuf>,
        user: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        debug_output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            defaults_dir: defaults_dir.into(),
            user: user.into(),
            output: output.into(),
            debug_output: debug_output.into(),
            forced: None,
        }
    }

    pub fn with_forced(mut self, forced: impl Into<PathBuf>) -> Self {
        self.forced = Some(forced.into());
        self
    }

    pub fn forced_path(&self) -> PathBuf {
        self.forced
            .clone()
            .unwrap_or_else(|| self.defaults_dir.join(FORCED_FILE_NAME))
    }
}

/// Runs one merge and returns the effective configuration that was written.
///
/// Nothing is written unless every source loaded successfully. The user
/// document is created empty first if it does not exist yet.
pub fn run(request: &MergeRequest) -> Result<Document, ConfigError> {
    if ensure_user_document(&request.user)? {
        tracing::info!(path = %request.user.display(), "created empty user config");
    }

    let effective = LayeredConfig::builder()
        .with_defaults_dir(&request.defaults_dir)
        .with_user_file(&request.user)
        .with_forced_file(request.forced_path())
        .excluding(request.defaults_dir.join(FORCED_FILE_NAME))
        .excluding(&request.output)
        .excluding(&request.debug_output)
        .build()?;

    emit(&effective, &request.output, &request.debug_output)?;
    Ok(effective)
}

/// Creates an empty document at `path` if nothing is there.
///
/// Returns `true` when the file was created.
pub fn ensure_user_document(path: &Path) -> Result<bool, ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(write_error(e)),
    }
}
