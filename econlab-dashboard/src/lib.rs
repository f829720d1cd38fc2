//! EconLab Dashboard: browser view of the joined series and regression panels.
//!
//! Serves one HTML page with three scatter plots and their fitted lines, a
//! JSON summary of the fits, and a health probe.

pub mod chart;
pub mod config;
pub mod page;
pub mod server;

pub use config::DashboardConfig;
pub use page::{load_view, render_page, DashboardError, DashboardView};
pub use server::{create_router, run_server, AppState};
