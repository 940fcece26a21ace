//! Post-interview report: the proctoring summary plus a per-question digest
//! of each whiteboard, stamped with a report id and generation time.
//!
//! Reports are built from a [`KeyValueStore`] holding what the browser
//! persisted. Offline, that is a `localStorage` export loaded with
//! [`store_from_dump`].

use std::collections::{BTreeMap, HashMap};

use proctoring::{ProctoringSummary, aggregate, load_events};
use serde::Serialize;
use storage::{KeyValueStore, MemoryStore, StorageError};
use tracing::info;
use uuid::Uuid;
use whiteboard::doc::{Document, ShapeKind};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("storage dump is not a JSON object of strings: {0}")]
    Dump(#[source] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What one question's whiteboard contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteboardDigest {
    pub question_id: String,
    pub path_count: usize,
    /// Paths per shape kind. Kinds with no paths are omitted.
    pub shapes: BTreeMap<ShapeKind, usize>,
    /// Text content and labels in draw order.
    pub texts: Vec<String>,
}

impl WhiteboardDigest {
    #[must_use]
    pub fn from_document(question_id: &str, doc: &Document) -> Self {
        let mut shapes = BTreeMap::new();
        for path in doc.paths() {
            *shapes.entry(path.kind()).or_insert(0) += 1;
        }
        let texts = doc
            .paths()
            .iter()
            .map(whiteboard::doc::Path::text)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect();
        Self { question_id: question_id.to_owned(), path_count: doc.len(), shapes, texts }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewReport {
    pub id: Uuid,
    pub interview_id: String,
    /// Milliseconds since the Unix epoch; also the aggregation cutoff.
    pub generated_at: i64,
    pub proctoring: ProctoringSummary,
    pub whiteboards: Vec<WhiteboardDigest>,
}

impl InterviewReport {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the report for `interview_id` from everything in `store`.
///
/// `now` closes any still-open blur. Missing or unreadable data yields an
/// empty proctoring summary or an empty whiteboard, never an error.
pub fn build_report<Q: AsRef<str>>(
    store: &impl KeyValueStore,
    interview_id: &str,
    question_ids: &[Q],
    now: i64,
) -> InterviewReport {
    let events = load_events(store, interview_id);
    let proctoring = aggregate(&events, now);

    let whiteboards = question_ids
        .iter()
        .map(|q| {
            let q = q.as_ref();
            WhiteboardDigest::from_document(q, &Document::load(store, q))
        })
        .collect::<Vec<_>>();

    let report = InterviewReport {
        id: Uuid::new_v4(),
        interview_id: interview_id.to_owned(),
        generated_at: now,
        proctoring,
        whiteboards,
    };
    info!(
        report_id = %report.id,
        interview_id,
        events = events.len(),
        violations = report.proctoring.counts.total,
        boards = report.whiteboards.len(),
        "built interview report"
    );
    report
}

/// Load a `localStorage` export (a JSON object of string values) into a
/// [`MemoryStore`].
///
/// # Errors
///
/// Returns [`ReportError::Dump`] if `raw` is not such an object.
pub fn store_from_dump(raw: &str) -> Result<MemoryStore, ReportError> {
    let entries: HashMap<String, String> = serde_json::from_str(raw).map_err(ReportError::Dump)?;
    let mut store = MemoryStore::new();
    for (key, value) in entries {
        store.set(&key, value)?;
    }
    Ok(store)
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
