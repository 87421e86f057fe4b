//! # Crime Loader Shared
//!
//! This crate defines the data structures shared across the complaint loader:
//! the field types understood by the search index, the fixed field mapping for
//! the NYPD complaint dataset, and the document produced for each CSV row.

pub mod types;

pub use types::complaint_document::ComplaintDocument;
pub use types::field_mapping::{
    FieldMapping, FieldSpec, MappingError, COMPLAINT_NUMBER_FIELD, GEO_FIELD,
};
pub use types::field_type::FieldType;
