//! EconLab Core: series types, configuration, upstream providers, CSV store.
//!
//! This crate contains everything the fetchers need:
//! - Domain types for the three macro series (exchange rate, interest rate, inflation)
//! - TOML configuration with date-range validation
//! - Banxico SIE and INEGI BIE providers behind a common trait
//! - Fetch-normalize-persist orchestration with per-series failure isolation
//! - Atomic CSV store with content hashing
//! - Logging initialization shared by every binary

pub mod config;
pub mod data;
pub mod logging;
pub mod series;

pub use config::{AppConfig, ConfigError};
pub use series::{Observation, Series, SeriesKind};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain types can cross into the dashboard's blocking pool.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Series>();
        require_sync::<Series>();
        require_send::<Observation>();
        require_sync::<Observation>();
        require_send::<SeriesKind>();
        require_sync::<SeriesKind>();
        require_send::<AppConfig>();
        require_sync::<AppConfig>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::store::CsvStore>();
        require_sync::<data::store::CsvStore>();
    }
}
