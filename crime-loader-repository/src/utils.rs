//! Utility functions for the crime loader repository.

use crate::errors::SearchIndexError;

/// Characters the backend refuses in index names.
const FORBIDDEN_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':'];

/// Validate an index name against the backend's naming rules.
///
/// Names must be non-empty, lowercase, free of the characters in
/// `\ / * ? " < > | , # :` and spaces, must not start with `-`, `_` or `+`,
/// and must not be `.` or `..`.
///
/// # Example
///
/// ```
/// use crime_loader_repository::validate_index_name;
///
/// assert!(validate_index_name("nypd_complaints").is_ok());
/// assert!(validate_index_name("NYPD").is_err());
/// ```
pub fn validate_index_name(name: &str) -> Result<(), SearchIndexError> {
    if name.is_empty() {
        return Err(SearchIndexError::validation("Index name is required"));
    }

    if name == "." || name == ".." {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' is reserved",
            name
        )));
    }

    if name.starts_with(['-', '_', '+']) {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' must not start with '-', '_' or '+'",
            name
        )));
    }

    if name.chars().any(|c| c.is_uppercase()) {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' must be lowercase",
            name
        )));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_INDEX_CHARS.contains(c)) {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' contains invalid character '{}'",
            name, c
        )));
    }

    Ok(())
}
