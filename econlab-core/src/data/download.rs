//! Fetch orchestrator: runs each series through fetch → normalize → save.
//!
//! Series are independent: a failed fetch or save is recorded and the next
//! series still runs. Nothing is retried, and a failed series leaves any
//! previous file untouched.

use super::provider::{DataError, FetchProgress, SeriesProvider};
use super::store::{CsvStore, SavedSeries};
use crate::series::{Series, SeriesKind};
use chrono::NaiveDate;

/// Fetch and persist every series in `kinds` from one provider.
pub fn fetch_and_save(
    provider: &dyn SeriesProvider,
    store: &CsvStore,
    kinds: &[SeriesKind],
    start: NaiveDate,
    end: NaiveDate,
    progress: &dyn FetchProgress,
) -> FetchSummary {
    let total = kinds.len();
    let mut saved = Vec::new();
    let mut errors = Vec::new();

    for (i, &kind) in kinds.iter().enumerate() {
        progress.on_start(kind, i, total);

        let result = fetch_single(provider, store, kind, start, end);
        progress.on_complete(kind, &result);

        match result {
            Ok(s) => saved.push(s),
            Err(e) => errors.push((kind, e)),
        }
    }

    progress.on_batch_complete(saved.len(), errors.len(), total);

    FetchSummary {
        total,
        saved,
        errors,
    }
}

/// One series: fetch → normalize → write.
fn fetch_single(
    provider: &dyn SeriesProvider,
    store: &CsvStore,
    kind: SeriesKind,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SavedSeries, DataError> {
    let fetched = provider.fetch(kind, start, end)?;
    let (series, duplicates) = Series::from_observations(kind, fetched.observations);
    if duplicates > 0 {
        tracing::warn!(series = %kind, duplicates, "dropped duplicate dates");
    }
    tracing::debug!(series = %kind, source = ?fetched.source, rows = series.len(), "normalized");
    store.write(&series)
}

/// Summary of one fetcher run.
#[derive(Debug)]
pub struct FetchSummary {
    pub total: usize,
    pub saved: Vec<SavedSeries>,
    pub errors: Vec<(SeriesKind, DataError)>,
}

impl FetchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}
