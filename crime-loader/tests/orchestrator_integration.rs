//! Integration tests for the complaint loader orchestrator.
//!
//! These tests run the real delete, create and load pipeline against an
//! in-memory SearchIndexProvider and temporary CSV files.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crime_loader::errors::IngestError;
use crime_loader::loader::LoadState;
use crime_loader::{Dependencies, IndexingError, LoaderSettings};
use crime_loader_repository::{SearchIndexError, SearchIndexProvider};
use crime_loader_shared::{ComplaintDocument, FieldMapping, GEO_FIELD};

/// The 36 columns of the complaint dataset, in file order.
const HEADER: [&str; 36] = [
    "CMPLNT_NUM",
    "ADDR_PCT_CD",
    "BORO_NM",
    "CMPLNT_FR_DT",
    "CMPLNT_FR_TM",
    "CMPLNT_TO_DT",
    "CMPLNT_TO_TM",
    "CRM_ATPT_CPTD_CD",
    "HADEVELOPT",
    "HOUSING_PSA",
    "JURISDICTION_CODE",
    "JURIS_DESC",
    "KY_CD",
    "LAW_CAT_CD",
    "LOC_OF_OCCUR_DESC",
    "OFNS_DESC",
    "PARKS_NM",
    "PATROL_BORO",
    "PD_CD",
    "PD_DESC",
    "PREM_TYP_DESC",
    "RPT_DT",
    "STATION_NAME",
    "SUSP_AGE_GROUP",
    "SUSP_RACE",
    "SUSP_SEX",
    "TRANSIT_DISTRICT",
    "VIC_AGE_GROUP",
    "VIC_RACE",
    "VIC_SEX",
    "X_COORD_CD",
    "Y_COORD_CD",
    "Latitude",
    "Longitude",
    "Lat_Lon",
    "New Georeferenced Column",
];

#[derive(Default)]
struct BackendState {
    indices: HashMap<String, BTreeMap<String, ComplaintDocument>>,
    mappings: HashMap<String, FieldMapping>,
    calls: Vec<String>,
    unavailable: bool,
}

/// In-memory backend shared between the test and the pipeline.
#[derive(Clone, Default)]
struct MockBackend {
    state: Arc<Mutex<BackendState>>,
}

impl MockBackend {
    fn unavailable() -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().unavailable = true;
        backend
    }

    fn documents(&self, index: &str) -> BTreeMap<String, ComplaintDocument> {
        self.state
            .lock()
            .unwrap()
            .indices
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn mapping(&self, index: &str) -> Option<FieldMapping> {
        self.state.lock().unwrap().mappings.get(index).cloned()
    }
}

#[async_trait]
impl SearchIndexProvider for MockBackend {
    async fn create_index(&self, index: &str, mapping: &FieldMapping) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(SearchIndexError::backend_unavailable("connection refused"));
        }
        state.calls.push(format!("create:{}", index));
        if state.indices.contains_key(index) {
            return Err(SearchIndexError::index_already_exists(index));
        }
        state.indices.insert(index.to_string(), BTreeMap::new());
        state.mappings.insert(index.to_string(), mapping.clone());
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(SearchIndexError::backend_unavailable("connection refused"));
        }
        state.calls.push(format!("delete:{}", index));
        state.mappings.remove(index);
        match state.indices.remove(index) {
            Some(_) => Ok(()),
            None => Err(SearchIndexError::index_not_found(index)),
        }
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &ComplaintDocument,
    ) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(SearchIndexError::backend_unavailable("connection refused"));
        }
        let docs = state
            .indices
            .get_mut(index)
            .ok_or_else(|| SearchIndexError::index_not_found(index))?;
        docs.insert(id.to_string(), document.clone());
        Ok(())
    }

    async fn count_documents(&self, index: &str) -> Result<u64, SearchIndexError> {
        let state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(SearchIndexError::backend_unavailable("connection refused"));
        }
        state
            .indices
            .get(index)
            .map(|docs| docs.len() as u64)
            .ok_or_else(|| SearchIndexError::index_not_found(index))
    }
}

/// A complete 36-field row with the given complaint number, borough and geo cell.
fn complaint(num: &str, borough: &str, geo: &str) -> Vec<String> {
    let mut fields: Vec<String> = HEADER.iter().map(|_| String::new()).collect();
    fields[0] = num.to_string();
    fields[1] = "75".to_string();
    fields[2] = borough.to_string();
    fields[3] = "04/01/2024".to_string();
    fields[4] = "13:45:00".to_string();
    fields[5] = "04/02/2024".to_string();
    fields[6] = "08:00:00".to_string();
    fields[15] = "PETIT LARCENY".to_string();
    fields[21] = "04/02/2024".to_string();
    fields[32] = "40.65".to_string();
    fields[33] = "-73.95".to_string();
    fields[35] = geo.to_string();
    fields
}

fn write_csv(header: &[&str], rows: &[Vec<String>]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut file);
        writer.write_record(header).unwrap();
        for row in rows {
            writer.write_record(row).unwrap();
        }
        writer.flush().unwrap();
    }
    file.flush().unwrap();
    file
}

fn settings(csv_path: &Path, loader_options: &str) -> LoaderSettings {
    let yaml = format!(
        r#"
elastic:
  host: https://localhost
  port: 9200
  ca_certs: http_ca.crt
  user: elastic
  password: changeme
  index: nypd
loader:
  csv_path: '{}'
{}"#,
        csv_path.display(),
        loader_options
    );
    LoaderSettings::from_yaml_str(&yaml).unwrap()
}

fn pipeline(backend: &MockBackend, settings: &LoaderSettings) -> Dependencies {
    Dependencies::with_provider(settings, Box::new(backend.clone()))
}

const SEQUENTIAL: &str = "  document_id: sequential\n";

#[tokio::test]
async fn test_brooklyn_row_becomes_document_zero() {
    let mut row = complaint("1001", "BROOKLYN", "(40.65, -73.95)");
    row[1] = "075".to_string();
    row[3] = "01/01/2024".to_string();
    row[4] = "0500".to_string();
    let file = write_csv(&HEADER, &[row]);
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), SEQUENTIAL));

    let summary = deps.orchestrator.run().await.unwrap();

    assert_eq!(summary.documents_indexed, 1);
    let docs = backend.documents("nypd");
    let doc = docs.get("0").expect("document 0");
    assert_eq!(doc.get("CMPLNT_NUM"), Some("1001"));
    assert_eq!(doc.get("ADDR_PCT_CD"), Some("075"));
    assert_eq!(doc.get("BORO_NM"), Some("BROOKLYN"));
    assert_eq!(doc.get(GEO_FIELD), Some("(40.65, -73.95)"));
    assert_eq!(doc.len(), 34);
    assert!(!doc.contains_field("CMPLNT_TO_DT"));
    assert!(!doc.contains_field("CMPLNT_TO_TM"));
}

#[tokio::test]
async fn test_empty_geo_cell_is_indexed_as_null() {
    let file = write_csv(&HEADER, &[complaint("123", "BROOKLYN", "")]);
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), SEQUENTIAL));

    deps.orchestrator.run().await.unwrap();

    let docs = backend.documents("nypd");
    let doc = &docs["0"];
    assert!(doc.contains_field(GEO_FIELD));
    assert!(doc.is_null(GEO_FIELD));

    let json = serde_json::to_value(doc).unwrap();
    assert_eq!(json[GEO_FIELD], serde_json::Value::Null);
}

#[tokio::test]
async fn test_ten_rows_give_count_ten_with_sequential_ids() {
    let rows: Vec<Vec<String>> = (0..10)
        .map(|i| complaint(&format!("{}", 1000 + i), "QUEENS", ""))
        .collect();
    let file = write_csv(&HEADER, &rows);
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), SEQUENTIAL));

    let summary = deps.orchestrator.run().await.unwrap();

    assert_eq!(summary.rows_read, 10);
    assert_eq!(summary.documents_indexed, 10);
    assert_eq!(summary.backend_count, 10);
    assert!(summary.is_complete());

    let docs = backend.documents("nypd");
    for i in 0..10 {
        let doc = &docs[&i.to_string()];
        assert_eq!(doc.get("CMPLNT_NUM"), Some(format!("{}", 1000 + i).as_str()));
    }
    assert_eq!(deps.orchestrator.loader().state(), LoadState::Completed);
}

#[tokio::test]
async fn test_run_deletes_then_creates_with_mapping() {
    let file = write_csv(&HEADER, &[complaint("123", "BRONX", "")]);
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), ""));

    deps.orchestrator.run().await.unwrap();

    assert_eq!(backend.calls(), vec!["delete:nypd", "create:nypd"]);
    assert_eq!(backend.mapping("nypd"), Some(FieldMapping::nypd_complaints()));
}

#[tokio::test]
async fn test_rerun_replaces_index() {
    let rows: Vec<Vec<String>> = (0..4)
        .map(|i| complaint(&format!("{}", 500 + i), "MANHATTAN", ""))
        .collect();
    let file = write_csv(&HEADER, &rows);
    let backend = MockBackend::default();
    let settings = settings(file.path(), "");

    let first = pipeline(&backend, &settings).orchestrator.run().await.unwrap();
    let first_docs = backend.documents("nypd");

    let second = pipeline(&backend, &settings).orchestrator.run().await.unwrap();
    let second_docs = backend.documents("nypd");

    assert_eq!(first.backend_count, 4);
    assert_eq!(second.backend_count, 4);
    assert_eq!(first_docs, second_docs);
    assert!(second_docs.contains_key("500"));
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(
        backend.calls(),
        vec!["delete:nypd", "create:nypd", "delete:nypd", "create:nypd"]
    );
}

#[tokio::test]
async fn test_complaint_number_ids_are_stable() {
    let file = write_csv(
        &HEADER,
        &[
            complaint("271828", "BROOKLYN", ""),
            complaint("314159", "QUEENS", ""),
        ],
    );
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), ""));

    deps.orchestrator.run().await.unwrap();

    let ids: Vec<String> = backend.documents("nypd").into_keys().collect();
    assert_eq!(ids, vec!["271828", "314159"]);
}

#[tokio::test]
async fn test_header_resolution_handles_reordered_columns() {
    let mut header: Vec<&str> = HEADER.to_vec();
    header.reverse();
    let mut row = complaint("123", "STATEN ISLAND", "(40.58, -74.15)");
    row.reverse();
    let file = write_csv(&header, &[row]);
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), ""));

    deps.orchestrator.run().await.unwrap();

    let docs = backend.documents("nypd");
    let doc = &docs["123"];
    assert_eq!(doc.get("BORO_NM"), Some("STATEN ISLAND"));
    assert_eq!(doc.get("CMPLNT_FR_DT"), Some("04/01/2024"));
    assert_eq!(doc.get(GEO_FIELD), Some("(40.58, -74.15)"));
}

#[tokio::test]
async fn test_positional_resolution_ignores_header_names() {
    let header: Vec<String> = (0..36).map(|i| format!("col{}", i)).collect();
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    let file = write_csv(&header, &[complaint("123", "BRONX", "")]);
    let backend = MockBackend::default();
    let options = "  column_resolution: positional\n";
    let mut deps = pipeline(&backend, &settings(file.path(), options));

    deps.orchestrator.run().await.unwrap();

    assert_eq!(backend.documents("nypd")["123"].get("BORO_NM"), Some("BRONX"));
}

#[tokio::test]
async fn test_missing_header_column_fails_before_indexing() {
    let header: Vec<&str> = HEADER.iter().copied().filter(|h| *h != "BORO_NM").collect();
    let mut row = complaint("123", "BRONX", "");
    row.remove(2);
    let file = write_csv(&header, &[row]);
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), ""));

    let err = deps.orchestrator.run().await.unwrap_err();

    assert!(matches!(err, IngestError::Schema(ref msg) if msg.contains("BORO_NM")));
    assert!(backend.documents("nypd").is_empty());
    assert_eq!(deps.orchestrator.loader().state(), LoadState::Failed);
}

#[tokio::test]
async fn test_skip_policy_indexes_remaining_rows() {
    let rows = vec![
        complaint("1", "BRONX", ""),
        vec!["2".to_string(), "44".to_string(), "BRONX".to_string()],
        complaint("3", "BRONX", ""),
    ];
    let file = write_csv(&HEADER, &rows);
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), ""));

    let summary = deps.orchestrator.run().await.unwrap();

    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.documents_indexed, 2);
    assert_eq!(summary.rows_skipped, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].line, Some(3));
    assert_eq!(
        summary.failures[0].error,
        IngestError::short_row(3, 36, 3)
    );
    assert_eq!(summary.backend_count, 2);
}

#[tokio::test]
async fn test_fail_fast_policy_stops_at_malformed_row() {
    let rows = vec![
        complaint("1", "BRONX", ""),
        vec!["2".to_string(), "44".to_string(), "BRONX".to_string()],
        complaint("3", "BRONX", ""),
    ];
    let file = write_csv(&HEADER, &rows);
    let backend = MockBackend::default();
    let options = "  row_error_policy: fail_fast\n";
    let mut deps = pipeline(&backend, &settings(file.path(), options));

    let err = deps.orchestrator.run().await.unwrap_err();

    assert!(matches!(err, IngestError::MalformedRow { line: 3, .. }));
    assert_eq!(backend.documents("nypd").len(), 1);
    assert_eq!(deps.orchestrator.loader().state(), LoadState::Failed);
}

#[tokio::test]
async fn test_header_only_file_loads_nothing() {
    let file = write_csv(&HEADER, &[]);
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), ""));

    let summary = deps.orchestrator.run().await.unwrap();

    assert_eq!(summary.rows_read, 0);
    assert_eq!(summary.backend_count, 0);
    assert!(summary.is_complete());
}

#[tokio::test]
async fn test_empty_file_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), ""));

    let err = deps.orchestrator.run().await.unwrap_err();

    assert!(matches!(err, IngestError::EmptyFile(_)));
}

#[tokio::test]
async fn test_missing_input_file_is_io_error() {
    let backend = MockBackend::default();
    let mut deps = pipeline(
        &backend,
        &settings(Path::new("/nonexistent/complaints.csv"), ""),
    );

    let err = deps.orchestrator.run().await.unwrap_err();

    assert!(matches!(err, IngestError::Io(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_unavailable_backend_fails_run() {
    let file = write_csv(&HEADER, &[complaint("1", "BRONX", "")]);
    let backend = MockBackend::unavailable();
    let mut deps = pipeline(&backend, &settings(file.path(), ""));

    let err = deps.orchestrator.run().await.unwrap_err();

    assert!(matches!(
        err,
        IngestError::Index(SearchIndexError::BackendUnavailable(_))
    ));

    let top: IndexingError = err.into();
    assert!(top.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_orchestrator_runs_only_once() {
    let file = write_csv(&HEADER, &[complaint("1", "BRONX", "")]);
    let backend = MockBackend::default();
    let mut deps = pipeline(&backend, &settings(file.path(), ""));

    deps.orchestrator.run().await.unwrap();
    let err = deps.orchestrator.run().await.unwrap_err();

    assert!(matches!(err, IngestError::InvalidState(_)));
    assert_eq!(backend.calls(), vec!["delete:nypd", "create:nypd"]);
    assert_eq!(backend.documents("nypd").len(), 1);
}
