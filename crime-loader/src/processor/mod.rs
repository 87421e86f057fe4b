//! Processor module for the complaint loader.
//!
//! Transforms raw CSV rows into complaint documents.

mod column_layout;
mod record_processor;

pub use column_layout::{ColumnLayout, ColumnResolution};
pub use record_processor::RecordProcessor;
