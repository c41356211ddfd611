//! Hand-off of finished assessments to storage.
//!
//! Scoring never waits on storage: [`submit`] returns the computed result
//! right away and saves it from a background task. A failed save is logged
//! and reported through [`SaveStatus`], the result itself stays valid.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::scoring::AssessmentResult;
use crate::selection::Selection;
use crate::store::ResponseStore;

/// Stored payload of one completed assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub user_id: Option<String>,
    pub selected_categories: Vec<String>,
    pub responses: ResponseStore,
    pub results: AssessmentResult,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for completed assessments.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn save(&self, record: AssessmentRecord) -> Result<(), PersistError>;
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<AssessmentRecord>>,
}

impl MemorySink {
    pub async fn records(&self) -> Vec<AssessmentRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn save(&self, record: AssessmentRecord) -> Result<(), PersistError> {
        self.records.lock().await.push(record);
        Ok(())
    }
}

/// Appends one JSON document per line.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read_all(&self) -> Result<Vec<AssessmentRecord>, PersistError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(PersistError::from))
            .collect()
    }
}

#[async_trait]
impl ResultSink for JsonLinesSink {
    async fn save(&self, record: AssessmentRecord) -> Result<(), PersistError> {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Outcome of the background save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    /// No signed-in user; nothing was stored.
    Skipped,
    /// Non-fatal; carries the message shown to the respondent.
    Failed(String),
}

#[derive(Debug)]
enum SaveTask {
    Done(SaveStatus),
    Running(JoinHandle<SaveStatus>),
}

/// A scored assessment whose save may still be in flight.
#[derive(Debug)]
pub struct Submission {
    pub result: AssessmentResult,
    save: SaveTask,
}

impl Submission {
    pub async fn wait(self) -> SaveStatus {
        match self.save {
            SaveTask::Done(status) => status,
            SaveTask::Running(handle) => handle.await.unwrap_or_else(|err| {
                warn!(error = %err, "assessment save task did not finish");
                SaveStatus::Failed(format!("could not save your results: {err}"))
            }),
        }
    }
}

/// Starts saving `record` in the background and returns immediately.
///
/// Records without a user are not saved. Outside a Tokio runtime the save is
/// reported as failed; the result is returned either way.
pub fn submit(sink: Arc<dyn ResultSink>, record: AssessmentRecord) -> Submission {
    let result = record.results.clone();
    if record.user_id.is_none() {
        info!("no signed-in user, skipping save");
        return Submission {
            result,
            save: SaveTask::Done(SaveStatus::Skipped),
        };
    }
    let Ok(runtime) = Handle::try_current() else {
        warn!("no async runtime available, assessment not saved");
        return Submission {
            result,
            save: SaveTask::Done(SaveStatus::Failed(
                "no async runtime available".to_string(),
            )),
        };
    };

    let save = runtime.spawn(async move {
        let user_id = record.user_id.clone().unwrap_or_default();
        match sink.save(record).await {
            Ok(()) => {
                info!(%user_id, "assessment saved");
                SaveStatus::Saved
            }
            Err(err) => {
                warn!(%user_id, error = %err, "failed to save assessment");
                SaveStatus::Failed(format!("could not save your results: {err}"))
            }
        }
    });
    Submission {
        result,
        save: SaveTask::Running(save),
    }
}

/// Builds the record for a finished assessment, stamped with the current time.
pub fn record(
    user_id: Option<String>,
    selection: &Selection,
    responses: ResponseStore,
    results: AssessmentResult,
) -> AssessmentRecord {
    AssessmentRecord {
        user_id,
        selected_categories: selection.to_strings(),
        responses,
        results,
        completed_at: Utc::now(),
    }
}
