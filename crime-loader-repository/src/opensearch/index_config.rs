//! OpenSearch index configuration and mappings.
//!
//! This module turns a [`FieldMapping`] into the settings-and-mappings body
//! sent with the index creation request.

use crime_loader_shared::FieldMapping;
use serde_json::{json, Map, Value};

/// Shard layout for the complaint index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Number of primary shards.
    pub number_of_shards: u32,
    /// Number of replicas per primary shard.
    pub number_of_replicas: u32,
}

impl IndexConfig {
    pub fn new(number_of_shards: u32, number_of_replicas: u32) -> Self {
        Self {
            number_of_shards,
            number_of_replicas,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Build the `properties` object for a field mapping.
///
/// Each field maps to `{"type": ...}`; date fields also carry their
/// `format`.
pub fn get_mapping_properties(mapping: &FieldMapping) -> Value {
    let mut properties = Map::with_capacity(mapping.len());

    for spec in mapping.iter() {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(spec.field_type.as_str()));
        if let Some(format) = spec.field_type.format() {
            property.insert("format".to_string(), json!(format));
        }
        properties.insert(spec.field_name.clone(), Value::Object(property));
    }

    Value::Object(properties)
}

/// Get the index settings and mappings for the complaint index.
///
/// # Arguments
///
/// * `mapping` - The field mapping to index documents with
/// * `config` - Shard layout
pub fn get_index_settings(mapping: &FieldMapping, config: &IndexConfig) -> Value {
    json!({
        "settings": {
            "number_of_shards": config.number_of_shards,
            "number_of_replicas": config.number_of_replicas
        },
        "mappings": {
            "properties": get_mapping_properties(mapping)
        }
    })
}
