//! Consumer module for the complaint loader.
//!
//! Reads the complaint CSV as a lazy, single-pass sequence of rows.

mod csv_consumer;
mod messages;

pub use csv_consumer::{CsvConsumer, CsvRows};
pub use messages::CsvRow;
