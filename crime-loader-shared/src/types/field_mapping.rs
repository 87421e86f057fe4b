//! Column-to-field mapping for the NYPD complaint dataset.
//!
//! The mapping is an ordered list of [`FieldSpec`]s. Each spec names the CSV
//! header it reads from, the fixed 0-based position of that column in the
//! published 36-column layout, the target document field, and its type.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::field_type::FieldType;

/// Name of the derived geo_point field.
pub const GEO_FIELD: &str = "New Georeferenced Column";

/// Name of the complaint number field, the dataset's natural key.
pub const COMPLAINT_NUMBER_FIELD: &str = "CMPLNT_NUM";

/// Errors raised when a field mapping violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The mapping has no fields.
    #[error("Field mapping is empty")]
    Empty,

    /// Two specs target the same document field.
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// Two specs read the same column position.
    #[error("Duplicate column position: {0}")]
    DuplicatePosition(usize),

    /// More than one geo_point field.
    #[error("Mapping declares more than one geo_point field: {0}")]
    MultipleGeoFields(String),
}

/// One mapped column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Fixed 0-based column position in the published layout.
    pub position: usize,
    /// CSV header name the value is read from.
    pub source_column: String,
    /// Field name in the produced document.
    pub field_name: String,
    /// Backend type of the field.
    pub field_type: FieldType,
}

impl FieldSpec {
    /// A spec whose document field has the same name as its source column.
    pub fn new(position: usize, name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            position,
            source_column: name.clone(),
            field_name: name,
            field_type,
        }
    }
}

/// Ordered, validated list of field specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    fields: Vec<FieldSpec>,
}

impl FieldMapping {
    /// Build a mapping, checking that field names and positions are unique
    /// and that at most one field is a geo_point.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, MappingError> {
        if fields.is_empty() {
            return Err(MappingError::Empty);
        }

        let mut names = HashSet::with_capacity(fields.len());
        let mut positions = HashSet::with_capacity(fields.len());
        let mut geo: Option<&str> = None;

        for spec in &fields {
            if !names.insert(spec.field_name.as_str()) {
                return Err(MappingError::DuplicateField(spec.field_name.clone()));
            }
            if !positions.insert(spec.position) {
                return Err(MappingError::DuplicatePosition(spec.position));
            }
            if spec.field_type == FieldType::GeoPoint {
                if geo.is_some() {
                    return Err(MappingError::MultipleGeoFields(spec.field_name.clone()));
                }
                geo = Some(&spec.field_name);
            }
        }

        Ok(Self { fields })
    }

    /// The canonical mapping for the NYPD complaint dataset.
    ///
    /// Codes and descriptors are `keyword`; columns 5 and 6 (`CMPLNT_TO_DT`,
    /// `CMPLNT_TO_TM`) are not indexed.
    pub fn nypd_complaints() -> Self {
        use FieldType::*;

        let fields = vec![
            FieldSpec::new(0, COMPLAINT_NUMBER_FIELD, Keyword),
            FieldSpec::new(1, "ADDR_PCT_CD", Keyword),
            FieldSpec::new(2, "BORO_NM", Keyword),
            FieldSpec::new(3, "CMPLNT_FR_DT", Date),
            FieldSpec::new(4, "CMPLNT_FR_TM", Keyword),
            FieldSpec::new(7, "CRM_ATPT_CPTD_CD", Keyword),
            FieldSpec::new(8, "HADEVELOPT", Keyword),
            FieldSpec::new(9, "HOUSING_PSA", Keyword),
            FieldSpec::new(10, "JURISDICTION_CODE", Keyword),
            FieldSpec::new(11, "JURIS_DESC", Keyword),
            FieldSpec::new(12, "KY_CD", Keyword),
            FieldSpec::new(13, "LAW_CAT_CD", Keyword),
            FieldSpec::new(14, "LOC_OF_OCCUR_DESC", Keyword),
            FieldSpec::new(15, "OFNS_DESC", Keyword),
            FieldSpec::new(16, "PARKS_NM", Keyword),
            FieldSpec::new(17, "PATROL_BORO", Keyword),
            FieldSpec::new(18, "PD_CD", Keyword),
            FieldSpec::new(19, "PD_DESC", Keyword),
            FieldSpec::new(20, "PREM_TYP_DESC", Keyword),
            FieldSpec::new(21, "RPT_DT", Date),
            FieldSpec::new(22, "STATION_NAME", Keyword),
            FieldSpec::new(23, "SUSP_AGE_GROUP", Keyword),
            FieldSpec::new(24, "SUSP_RACE", Keyword),
            FieldSpec::new(25, "SUSP_SEX", Keyword),
            FieldSpec::new(26, "TRANSIT_DISTRICT", Keyword),
            FieldSpec::new(27, "VIC_AGE_GROUP", Keyword),
            FieldSpec::new(28, "VIC_RACE", Keyword),
            FieldSpec::new(29, "VIC_SEX", Keyword),
            FieldSpec::new(30, "X_COORD_CD", Float),
            FieldSpec::new(31, "Y_COORD_CD", Float),
            FieldSpec::new(32, "Latitude", Float),
            FieldSpec::new(33, "Longitude", Float),
            FieldSpec::new(34, "Lat_Lon", Keyword),
            FieldSpec::new(35, GEO_FIELD, GeoPoint),
        ];

        Self { fields }
    }

    /// All specs in mapping order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a spec by document field name.
    pub fn field(&self, field_name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    /// The geo_point spec, if the mapping has one.
    pub fn geo_field(&self) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.field_type == FieldType::GeoPoint)
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::nypd_complaints()
    }
}
