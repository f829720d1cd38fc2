//! EconLab Analysis: federated join over stored series and OLS regression panels.
//!
//! This crate builds on `econlab-core` to provide:
//! - A catalog mapping SQL table names to the CSV files the fetchers write
//! - The three-way inner join, executed as SQL directly over those files
//! - Closed-form simple linear regression with R²
//! - The three fixed regression panels the dashboard renders

pub mod catalog;
pub mod panels;
pub mod query;
pub mod regression;

pub use catalog::Catalog;
pub use panels::{build_panels, PanelSpec, PanelSummary, RegressionPanel, PANELS};
pub use query::{run_join, JoinedRow, JoinedTable, QueryError, JOIN_QUERY};
pub use regression::{fit, linspace, LinearFit, RegressionError};
