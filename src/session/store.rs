//! Record persistence contract and the JSON-file implementation used by the CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task;

use super::EditorContext;
use crate::annotation::{Marker, MarkerKind, MarkerSeed};
use crate::util::NormalizedPoint;

/// Errors reported by a [`RecordStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store rejected the records: {0}")]
    Rejected(String),

    #[error("Store transport failed: {0}")]
    Transport(String),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One marker as submitted to the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub company: String,
    pub branch: String,
    pub recorder: String,
    /// RFC 3339 save time
    pub saved_at: String,
    pub label: String,
    pub serial: String,
    pub name: String,
    pub kind: MarkerKind,
    pub position: NormalizedPoint,
}

impl MarkerRecord {
    pub fn from_marker(marker: &Marker, context: &EditorContext, saved_at: &DateTime<Local>) -> Self {
        Self {
            company: context.company.clone(),
            branch: context.branch.clone(),
            recorder: context.recorder.clone(),
            saved_at: saved_at.to_rfc3339(),
            label: marker.label().to_string(),
            serial: marker.serial().to_string(),
            name: marker.name().to_string(),
            kind: marker.kind(),
            position: marker.position(),
        }
    }

    /// Marker data for restoring this record into an annotation model.
    pub fn seed(&self) -> MarkerSeed {
        MarkerSeed {
            label: self.label.clone(),
            position: self.position,
            kind: self.kind,
            serial: self.serial.clone(),
            name: self.name.clone(),
        }
    }
}

/// Filter for [`RecordStore::fetch`]. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub company: Option<String>,
    pub branch: Option<String>,
}

impl RecordQuery {
    /// Query for every record of one company branch.
    pub fn for_context(context: &EditorContext) -> Self {
        Self {
            company: Some(context.company.clone()),
            branch: Some(context.branch.clone()),
        }
    }

    pub fn matches(&self, record: &MarkerRecord) -> bool {
        let field_matches = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .is_none_or(|wanted| wanted.eq_ignore_ascii_case(actual))
        };
        field_matches(&self.company, &record.company) && field_matches(&self.branch, &record.branch)
    }
}

/// Backing store for marker records.
///
/// The engine calls it once per save and never retries; retry policy belongs
/// to the implementation or the host.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save(&self, records: Vec<MarkerRecord>) -> Result<(), StoreError>;

    async fn fetch(&self, query: &RecordQuery) -> Result<Vec<MarkerRecord>, StoreError>;
}

/// Stores records as a JSON array in a single file.
#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_records(path: &Path) -> Result<Vec<MarkerRecord>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read(path)?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(&data)?)
}

fn append_records(path: &Path, records: Vec<MarkerRecord>) -> Result<usize, StoreError> {
    let mut all = read_records(path)?;
    all.extend(records);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_vec_pretty(&all)?;
    std::fs::write(path, json)?;
    Ok(all.len())
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn save(&self, records: Vec<MarkerRecord>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        let added = records.len();
        let total = task::spawn_blocking(move || append_records(&path, records))
            .await
            .map_err(|e| StoreError::Transport(format!("Save task failed: {}", e)))??;
        log::info!(
            "Stored {added} record(s) in {} ({total} total)",
            self.path.display()
        );
        Ok(())
    }

    async fn fetch(&self, query: &RecordQuery) -> Result<Vec<MarkerRecord>, StoreError> {
        let path = self.path.clone();
        let all = task::spawn_blocking(move || read_records(&path))
            .await
            .map_err(|e| StoreError::Transport(format!("Fetch task failed: {}", e)))??;
        let matching: Vec<_> = all.into_iter().filter(|r| query.matches(r)).collect();
        log::debug!(
            "Fetched {} record(s) from {}",
            matching.len(),
            self.path.display()
        );
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(company: &str, branch: &str, label: &str) -> MarkerRecord {
        MarkerRecord {
            company: company.into(),
            branch: branch.into(),
            recorder: "op".into(),
            saved_at: Local
                .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                .unwrap()
                .to_rfc3339(),
            label: label.into(),
            serial: "S".into(),
            name: "N".into(),
            kind: MarkerKind::Single,
            position: NormalizedPoint::new(10.0, 20.0),
        }
    }

    #[test]
    fn query_matches_case_insensitively() {
        let query = RecordQuery {
            company: Some("lotus".into()),
            branch: None,
        };
        assert!(query.matches(&record("Lotus", "Bangna", "1")));
        assert!(!query.matches(&record("Makro", "Bangna", "1")));
        assert!(RecordQuery::default().matches(&record("Any", "Where", "1")));
    }

    #[test]
    fn record_seed_keeps_metadata() {
        let seed = record("C", "B", "7").seed();
        assert_eq!(seed.label, "7");
        assert_eq!(seed.position, NormalizedPoint::new(10.0, 20.0));
    }

    #[tokio::test]
    async fn json_store_appends_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("records.json"));
        assert!(store.fetch(&RecordQuery::default()).await.unwrap().is_empty());

        store
            .save(vec![record("C", "North", "1"), record("C", "South", "2")])
            .await
            .unwrap();
        store.save(vec![record("C", "North", "3")]).await.unwrap();

        let north = store
            .fetch(&RecordQuery {
                company: Some("C".into()),
                branch: Some("North".into()),
            })
            .await
            .unwrap();
        let labels: Vec<_> = north.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["1", "3"]);
    }

    #[tokio::test]
    async fn malformed_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::new(path)
            .fetch(&RecordQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
