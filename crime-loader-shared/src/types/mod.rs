//! This module defines the core data structures used across the complaint loader.
//! It re-exports the field mapping and document types.

pub mod complaint_document;
pub mod field_mapping;
pub mod field_type;

pub use complaint_document::ComplaintDocument;
pub use field_mapping::{FieldMapping, FieldSpec, MappingError};
pub use field_type::{FieldType, DATE_FORMAT};
