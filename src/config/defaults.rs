//! Discovery and aggregation of default configuration documents.

use std::path::{Path, PathBuf};

use super::document::{load_document, Document};
use super::merge::merge_documents;
use super::ConfigError;

/// File extensions recognized as default documents.
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["yml", "yaml", "toml"];

/// Lists the default documents in `dir`, sorted by file name.
///
/// Only regular files with a [`DOCUMENT_EXTENSIONS`] extension are returned,
/// minus anything in `excluded`. A missing directory yields no documents.
pub fn discover_defaults(dir: &Path, excluded: &[PathBuf]) -> Result<Vec<PathBuf>, ConfigError> {
    let read_error = |source| ConfigError::ReadError {
        path: dir.to_path_buf(),
        source,
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(dir = %dir.display(), "defaults directory not found, using empty defaults");
            return Ok(Vec::new());
        }
        Err(e) => return Err(read_error(e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(read_error)?.path();
        if !path.is_file() || !has_document_extension(&path) {
            continue;
        }
        if excluded.iter().any(|other| same_file(other, &path)) {
            tracing::debug!(path = %path.display(), "skipping file registered as another layer");
            continue;
        }
        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Folds `documents` left to right with the deep merge; later documents win.
pub fn aggregate_defaults<'a, I>(documents: I) -> Document
where
    I: IntoIterator<Item = &'a Document>,
{
    documents
        .into_iter()
        .fold(Document::new(), |combined, document| {
            merge_documents(&combined, document)
        })
}

/// Loads every path in order and aggregates them into the defaults layer.
///
/// Fails on the first source that does not parse or whose root is not a mapping.
pub fn load_defaults(paths: &[PathBuf]) -> Result<Document, ConfigError> {
    let documents = paths
        .iter()
        .map(|path| load_document(path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(aggregate_defaults(&documents))
}

fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            DOCUMENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn doc(text: &str) -> Document {
        serde_yaml::from_str(text).unwrap()
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_discovery_is_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("20-site.yaml"), "a: 1").unwrap();
        fs::write(dir.path().join("10-base.yml"), "a: 0").unwrap();
        fs::write(dir.path().join("30-extra.toml"), "a = 2").unwrap();
        fs::write(dir.path().join("README.md"), "# notes").unwrap();
        fs::create_dir(dir.path().join("nested.yml")).unwrap();

        let found = discover_defaults(dir.path(), &[]).unwrap();
        assert_eq!(names(&found), ["10-base.yml", "20-site.yaml", "30-extra.toml"]);
    }

    #[test]
    fn test_discovery_excludes_other_layers() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.yml"), "a: 1").unwrap();
        fs::write(dir.path().join("forced.yml"), "a: 2").unwrap();

        let found = discover_defaults(dir.path(), &[dir.path().join("forced.yml")]).unwrap();
        assert_eq!(names(&found), ["default.yml"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let found = discover_defaults(&dir.path().join("absent"), &[]).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_later_defaults_override_earlier() {
        let first = doc("process: {detection: {pfa: 0.001, minDelay: 5}}\nlist: [1, 2]");
        let second = doc("process: {detection: {pfa: 0.01}}\nlist: [3]");

        let combined = aggregate_defaults([&first, &Document::new(), &second]);

        assert_eq!(
            combined,
            doc("process: {detection: {pfa: 0.01, minDelay: 5}}\nlist: [3]")
        );
    }

    #[test]
    fn test_aggregate_nothing_is_empty() {
        assert!(aggregate_defaults(&Vec::<Document>::new()).is_empty());
    }

    #[test]
    fn test_load_defaults_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.yml"), "net: {ip: 0.0.0.0, port: 80}").unwrap();
        fs::write(dir.path().join("b.toml"), "[net]\nport = 8080").unwrap();

        let paths = discover_defaults(dir.path(), &[]).unwrap();
        let defaults = load_defaults(&paths).unwrap();

        assert_eq!(defaults["net"]["ip"].as_str(), Some("0.0.0.0"));
        assert_eq!(defaults["net"]["port"].as_i64(), Some(8080));
    }

    #[test]
    fn test_malformed_default_names_source() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.yml"), "ok: true").unwrap();
        fs::write(dir.path().join("b.yml"), "- not\n- a\n- mapping\n").unwrap();

        let paths = discover_defaults(dir.path(), &[]).unwrap();
        match load_defaults(&paths) {
            Err(ConfigError::MalformedDocument { path, found }) => {
                assert_eq!(path, dir.path().join("b.yml"));
                assert_eq!(found, "sequence");
            }
            other => panic!("expected malformed document, got {other:?}"),
        }
    }
}
