use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use super::defaults::{discover_defaults, load_defaults};
use super::document::{load_document, Document};
use super::layer::Layer;
use super::merge::{compose, merge_documents};
use super::ConfigError;

/// A document source registered with the builder.
#[derive(Debug)]
enum ConfigSource {
    DefaultsDir(PathBuf),
    File { layer: Layer, path: PathBuf },
}

/// Builder that loads the defaults, user, and forced layers and merges them.
///
/// Within the defaults layer, sources are merged in registration order and a
/// defaults directory contributes its files in file-name order. The layers
/// are then composed as `forced` over `user` over `defaults`. Nested mappings
/// are merged recursively; other values (including sequences) are replaced
/// entirely.
///
/// Every source is optional: a missing file or directory loads as an empty
/// mapping. The first source that fails to load aborts the build.
///
/// ## Example
///
/// ```no_run
/// use config_merge::LayeredConfig;
///
/// let effective = LayeredConfig::builder()
///     .with_defaults_dir("config")
///     .with_user_file("config/user.yml")
///     .with_forced_file("config/forced.yml")
///     .build()?;
///
/// println!("{}", serde_yaml::to_string(&effective).unwrap());
/// # Ok::<(), config_merge::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct LayeredConfig {
    sources: Vec<ConfigSource>,
    excluded: Vec<PathBuf>,
}

impl LayeredConfig {
    /// Creates a new builder with no sources.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds every `yml`, `yaml`, and `toml` file in `dir` to the defaults layer.
    ///
    /// Files registered as user or forced documents, or passed to
    /// [`excluding`](Self::excluding), are skipped.
    pub fn with_defaults_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.sources
            .push(ConfigSource::DefaultsDir(dir.as_ref().to_path_buf()));
        self
    }

    /// Adds a single file to the defaults layer.
    pub fn with_default_file(self, path: impl AsRef<Path>) -> Self {
        self.with_file(Layer::Defaults, path)
    }

    /// Adds a file to the user layer.
    pub fn with_user_file(self, path: impl AsRef<Path>) -> Self {
        self.with_file(Layer::User, path)
    }

    /// Adds a file to the forced layer, which overrides everything else.
    pub fn with_forced_file(self, path: impl AsRef<Path>) -> Self {
        self.with_file(Layer::Forced, path)
    }

    /// Adds a file to the given layer. Files in the same layer merge in
    /// registration order.
    pub fn with_file(mut self, layer: Layer, path: impl AsRef<Path>) -> Self {
        self.sources.push(ConfigSource::File {
            layer,
            path: path.as_ref().to_path_buf(),
        });
        self
    }

    /// Keeps `path` out of defaults directory discovery, e.g. an output file
    /// written next to the defaults.
    pub fn excluding(mut self, path: impl AsRef<Path>) -> Self {
        self.excluded.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads every source and returns the effective configuration document.
    pub fn build(self) -> Result<Document, ConfigError> {
        let mut excluded = self.excluded;
        excluded.extend(self.sources.iter().filter_map(|source| match source {
            ConfigSource::File { layer, path } if *layer != Layer::Defaults => Some(path.clone()),
            _ => None,
        }));

        let mut paths: [Vec<PathBuf>; 3] = Default::default();

        for source in self.sources {
            match source {
                ConfigSource::DefaultsDir(dir) => {
                    let found = discover_defaults(&dir, &excluded)?;
                    tracing::debug!(dir = %dir.display(), files = found.len(), "discovered default documents");
                    paths[slot(Layer::Defaults)].extend(found);
                }
                ConfigSource::File { layer, path } => paths[slot(layer)].push(path),
            }
        }

        let mut layers = Vec::with_capacity(Layer::ALL.len());
        for layer in Layer::ALL {
            layers.push(load_layer(layer, &paths[slot(layer)])?);
        }

        let effective = compose(&layers[0], &layers[1], &layers[2]);
        tracing::info!(
            default_sources = paths[slot(Layer::Defaults)].len(),
            user_sources = paths[slot(Layer::User)].len(),
            forced_sources = paths[slot(Layer::Forced)].len(),
            keys = effective.len(),
            "merged configuration layers"
        );
        Ok(effective)
    }

    /// Builds the effective configuration and deserializes it into `T`.
    pub fn build_into<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        let effective = self.build()?;
        serde_yaml::from_value(Value::Mapping(effective)).map_err(ConfigError::DeserializeError)
    }
}

fn slot(layer: Layer) -> usize {
    usize::from(layer.rank())
}

/// Loads a layer's sources in order and folds them with the deep merge.
fn load_layer(layer: Layer, paths: &[PathBuf]) -> Result<Document, ConfigError> {
    let combined = match layer {
        Layer::Defaults => load_defaults(paths)?,
        _ => {
            let mut combined = Document::new();
            for path in paths {
                let document = load_document(path)?;
                combined = merge_documents(&combined, &document);
            }
            combined
        }
    };
    tracing::debug!(%layer, sources = paths.len(), keys = combined.len(), "loaded layer");
    Ok(combined)
}
