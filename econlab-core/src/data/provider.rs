//! Series provider trait and structured error types.
//!
//! The SeriesProvider trait abstracts over the two upstream statistics APIs
//! (Banxico SIE, INEGI BIE) so the orchestrator treats them alike and tests
//! can point either one at a mock server.

use crate::series::{Observation, SeriesKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for fetch and save operations.
///
/// Every variant is handled the same way by the fetchers (log, skip the
/// series), but they stay distinct so the log line says what went wrong.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("authentication rejected by {provider}: HTTP {status}")]
    AuthenticationRequired { provider: &'static str, status: u16 },

    #[error("HTTP {status} from {provider}")]
    Http { provider: &'static str, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("series not found: {code}")]
    SeriesNotFound { code: String },

    #[error("{kind} is not served by {provider}")]
    UnsupportedSeries {
        provider: &'static str,
        kind: SeriesKind,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DataError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Raw observations for one series as returned by a provider.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub kind: SeriesKind,
    pub observations: Vec<Observation>,
    pub source: DataSource,
}

/// Which upstream produced the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    BanxicoSie,
    InegiBie,
    InegiBise,
}

/// Trait for upstream statistics providers.
///
/// Implementations fire exactly one logical request per call. No retries:
/// a failure is reported to the caller, which logs it and skips the series.
pub trait SeriesProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &'static str;

    /// Series this provider can serve.
    fn kinds(&self) -> &'static [SeriesKind];

    /// Fetch one series over an inclusive date range.
    fn fetch(
        &self,
        kind: SeriesKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}

/// Progress callback for multi-series fetches.
pub trait FetchProgress {
    /// Called when starting to fetch a series.
    fn on_start(&self, kind: SeriesKind, index: usize, total: usize);

    /// Called when a series has been fetched and saved (or failed).
    fn on_complete(&self, kind: SeriesKind, result: &Result<crate::data::SavedSeries, DataError>);

    /// Called once the whole batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that emits tracing events.
pub struct TracingProgress;

impl FetchProgress for TracingProgress {
    fn on_start(&self, kind: SeriesKind, index: usize, total: usize) {
        tracing::info!(series = %kind, "[{}/{}] fetching", index + 1, total);
    }

    fn on_complete(&self, kind: SeriesKind, result: &Result<crate::data::SavedSeries, DataError>) {
        match result {
            Ok(saved) => tracing::info!(
                series = %kind,
                rows = saved.rows,
                path = %saved.path.display(),
                hash = %saved.short_hash(),
                "data saved"
            ),
            Err(e) => tracing::error!(series = %kind, error = %e, "series skipped"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        tracing::info!(succeeded, failed, total, "fetch complete");
    }
}
