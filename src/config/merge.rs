//! Deep merge of configuration documents and composition of layers.
//!
//! Nested mappings are merged key by key. Every other node (sequences,
//! scalars, null, tagged values) is atomic: an overlay value replaces the
//! base value wholesale, including when the two sides have different kinds.
//!
//! All functions borrow their inputs and return a new document, so a cached
//! defaults document can be shared between callers.

use serde_yaml::{Mapping, Value};

use super::document::Document;

/// Merges `overlay` onto `base`, returning a new node.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            Value::Mapping(merge_documents(base, overlay))
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merges two mapping-rooted documents. Base keys keep their position;
/// keys only in `overlay` are appended in overlay order.
pub fn merge_documents(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let value = match base.get(key) {
            Some(existing) => deep_merge(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

/// Builds the effective configuration: `forced` over `user` over `defaults`.
///
/// Absent layers are passed as empty documents, which leave the base unchanged.
pub fn compose(defaults: &Document, user: &Document, forced: &Document) -> Document {
    let with_user = merge_documents(defaults, user);
    merge_documents(&with_user, forced)
}
