//! Configuration documents, layers, and the deep merge that combines them.

mod builder;
pub mod defaults;
mod document;
mod error;
mod layer;
pub mod merge;

pub use builder::LayeredConfig;
pub use document::{load_document, node_kind, parse_document, Document, Format};
pub use error::{ConfigError, FormatError};
pub use layer::Layer;
