pub mod config;
pub mod output;
pub mod run;

pub use config::{ConfigError, Document, Layer, LayeredConfig};
pub use output::{emit, write_document};
pub use run::{run, MergeRequest};
