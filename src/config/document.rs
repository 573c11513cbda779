//! Configuration documents and the formats they are read from.

use std::path::Path;

use serde_yaml::{Mapping, Number, Value};

use super::error::FormatError;
use super::ConfigError;

/// A configuration document: a node tree with a mapping at its root.
///
/// Key insertion order is preserved, so merged output is stable.
pub type Document = Mapping;

/// Serialization format of a document source, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
}

impl Format {
    /// `.toml` files are TOML; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Yaml,
        }
    }
}

/// Loads a document from `path`.
///
/// A missing file is not an error: it loads as the empty mapping, so a
/// first run without a user or forced document behaves like an empty one.
pub fn load_document(path: &Path) -> Result<Document, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let document = parse_document(&contents, Format::from_path(path), path)?;
            tracing::debug!(path = %path.display(), keys = document.len(), "loaded config document");
            Ok(document)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config document missing, using empty mapping");
            Ok(Document::new())
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Parses `contents` in the given format. `origin` is only used to label errors.
pub fn parse_document(
    contents: &str,
    format: Format,
    origin: &Path,
) -> Result<Document, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(Document::new());
    }

    let parse_error = |source: FormatError| ConfigError::ParseError {
        path: origin.to_path_buf(),
        source,
    };

    let root = match format {
        Format::Yaml => {
            let mut root = serde_yaml::from_str::<Value>(contents)
                .map_err(|e| parse_error(e.into()))?;
            // `<<: *anchor` keys are folded into their mapping.
            root.apply_merge().map_err(|e| parse_error(e.into()))?;
            root
        }
        Format::Toml => {
            let table = toml::from_str::<toml::Table>(contents)
                .map_err(|e| parse_error(e.into()))?;
            from_toml(toml::Value::Table(table))
        }
    };

    into_document(root, origin)
}

/// Requires a mapping root. `null` (a document with only comments) is empty.
fn into_document(root: Value, origin: &Path) -> Result<Document, ConfigError> {
    match root {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Document::new()),
        other => Err(ConfigError::MalformedDocument {
            path: origin.to_path_buf(),
            found: node_kind(&other),
        }),
    }
}

/// Human-readable name of a node's variant, used in diagnostics.
pub fn node_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Converts a TOML value into the document node model.
fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(Number::from(i)),
        toml::Value::Float(f) => Value::Number(Number::from(f)),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (Value::String(key), from_toml(value)))
                .collect(),
        ),
    }
}
