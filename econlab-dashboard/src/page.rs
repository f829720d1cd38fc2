//! Page assembly: join, fit, and render the dashboard HTML.

use crate::chart::render_panel_svg;
use askama::Template;
use econlab_analysis::{
    build_panels, run_join, Catalog, JoinedTable, PanelSummary, QueryError, RegressionError,
    RegressionPanel,
};
use econlab_core::SeriesKind;
use std::path::Path;
use thiserror::Error;

/// Errors that prevent the panels from being produced.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("regression failed: {0}")]
    Regression(#[from] RegressionError),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

/// Everything one page load needs.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub table: JoinedTable,
    pub panels: Vec<RegressionPanel>,
}

impl DashboardView {
    pub fn summaries(&self) -> Vec<PanelSummary> {
        self.panels.iter().map(RegressionPanel::summary).collect()
    }
}

/// Run the join over the files in `data_dir` and fit all panels.
pub fn load_view(data_dir: &Path) -> Result<DashboardView, DashboardError> {
    let catalog = Catalog::from_data_dir(data_dir);
    let table = run_join(&catalog)?;
    let panels = build_panels(&table)?;
    tracing::debug!(rows = table.len(), "dashboard view loaded");
    Ok(DashboardView { table, panels })
}

struct PanelCard {
    svg: String,
    slope: String,
    intercept: String,
    r_squared: String,
}

struct TableRow {
    date: String,
    tipo_de_cambio: String,
    tasa_de_interes: String,
    inflacion: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    descriptions: Vec<(&'static str, &'static str)>,
    has_error: bool,
    error: String,
    row_count: usize,
    panels: Vec<PanelCard>,
    rows: Vec<TableRow>,
}

fn descriptions() -> Vec<(&'static str, &'static str)> {
    SeriesKind::ALL
        .iter()
        .map(|kind| {
            let text = match kind {
                SeriesKind::ExchangeRate => "FIX exchange rate, pesos per US dollar (Banxico SF43718)",
                SeriesKind::InterestRate => "Interbank equilibrium interest rate (Banxico SF61745)",
                SeriesKind::Inflation => "General inflation rate (INEGI 628229)",
            };
            (kind.label(), text)
        })
        .collect()
}

/// Render the page from a load result. Errors become the banner; nothing else
/// is shown in that case.
pub fn render_page(view: &Result<DashboardView, DashboardError>) -> Result<String, DashboardError> {
    let template = match view {
        Ok(view) => DashboardTemplate {
            descriptions: descriptions(),
            has_error: false,
            error: String::new(),
            row_count: view.table.len(),
            panels: view
                .panels
                .iter()
                .map(|p| PanelCard {
                    svg: render_panel_svg(p),
                    slope: format!("{:.4}", p.fit.slope),
                    intercept: format!("{:.4}", p.fit.intercept),
                    r_squared: format!("{:.4}", p.fit.r_squared),
                })
                .collect(),
            rows: view
                .table
                .rows
                .iter()
                .map(|r| TableRow {
                    date: r.date.to_string(),
                    tipo_de_cambio: r.tipo_de_cambio.to_string(),
                    tasa_de_interes: r.tasa_de_interes.to_string(),
                    inflacion: r.inflacion.to_string(),
                })
                .collect(),
        },
        Err(e) => DashboardTemplate {
            descriptions: descriptions(),
            has_error: true,
            error: e.to_string(),
            row_count: 0,
            panels: Vec::new(),
            rows: Vec::new(),
        },
    };
    Ok(template.render()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_page_shows_banner_only() {
        let err: Result<DashboardView, DashboardError> =
            Err(DashboardError::Query(QueryError::MissingTable {
                table: "inflacion".into(),
                path: PathBuf::from("data/inegi/inflacion.csv"),
            }));

        let html = render_page(&err).unwrap();

        assert!(html.contains("Error loading data:"));
        assert!(html.contains("inflacion"));
        assert!(!html.contains("<svg"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn descriptions_name_each_series_by_its_code() {
        let text: Vec<String> = descriptions().iter().map(|(l, d)| format!("{l}: {d}")).collect();

        assert_eq!(text.len(), 3);
        assert!(text[0].contains("SF43718"));
        assert_eq!(
            text[1],
            "Interest Rate: Interbank equilibrium interest rate (Banxico SF61745)"
        );
        assert!(text[2].contains("628229"));
    }

    #[test]
    fn empty_join_reports_regression_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = econlab_core::data::CsvStore::new(dir.path());
        for kind in SeriesKind::ALL {
            let day = match kind {
                SeriesKind::ExchangeRate => 1,
                SeriesKind::InterestRate => 2,
                SeriesKind::Inflation => 3,
            };
            let obs = vec![econlab_core::Observation::new(
                chrono::NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                1.0,
            )];
            let (series, _) = econlab_core::Series::from_observations(kind, obs);
            store.write(&series).unwrap();
        }

        let err = load_view(dir.path()).unwrap_err();
        assert!(matches!(err, DashboardError::Regression(RegressionError::TooFewPoints(0))));
    }
}
