//! Upstream providers, the CSV store and the fetch-and-save orchestrator.

pub mod banxico;
pub mod download;
pub mod inegi;
pub mod provider;
pub mod store;

pub use banxico::BanxicoProvider;
pub use download::{fetch_and_save, FetchSummary};
pub use inegi::InegiProvider;
pub use provider::{
    DataError, DataSource, FetchProgress, FetchResult, SeriesProvider, TracingProgress,
};
pub use store::{CsvStore, SavedSeries, StoredSeriesStatus};
