//! The three fixed regression panels.

use crate::query::JoinedTable;
use crate::regression::{fit, linspace, LinearFit, RegressionError};
use econlab_core::SeriesKind;
use serde::Serialize;

/// Samples along the fitted line.
pub const LINE_POINTS: usize = 100;

/// Which pair a panel regresses: `y` on `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelSpec {
    pub title: &'static str,
    pub x: SeriesKind,
    pub y: SeriesKind,
}

pub const PANELS: [PanelSpec; 3] = [
    PanelSpec {
        title: "Exchange Rate vs Interest Rate",
        x: SeriesKind::InterestRate,
        y: SeriesKind::ExchangeRate,
    },
    PanelSpec {
        title: "Interest Rate vs Inflation",
        x: SeriesKind::Inflation,
        y: SeriesKind::InterestRate,
    },
    PanelSpec {
        title: "Exchange Rate vs Inflation",
        x: SeriesKind::Inflation,
        y: SeriesKind::ExchangeRate,
    },
];

/// A fitted panel: scatter points plus the sampled fit line.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionPanel {
    pub spec: PanelSpec,
    pub points: Vec<(f64, f64)>,
    pub fit: LinearFit,
    pub line: Vec<(f64, f64)>,
}

impl RegressionPanel {
    /// Legend text, R² to four decimals.
    pub fn legend(&self) -> String {
        format!("R² = {:.4}", self.fit.r_squared)
    }

    pub fn summary(&self) -> PanelSummary {
        PanelSummary {
            title: self.spec.title,
            x: self.spec.x.value_column(),
            y: self.spec.y.value_column(),
            fit: self.fit,
        }
    }
}

/// Serializable panel statistics.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSummary {
    pub title: &'static str,
    pub x: &'static str,
    pub y: &'static str,
    #[serde(flatten)]
    pub fit: LinearFit,
}

/// Fit one panel from the joined table.
pub fn build_panel(table: &JoinedTable, spec: PanelSpec) -> Result<RegressionPanel, RegressionError> {
    let x = table.column(spec.x);
    let y = table.column(spec.y);
    let fit = fit(&x, &y)?;

    let (min_x, max_x) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let line = linspace(min_x, max_x, LINE_POINTS)
        .into_iter()
        .map(|xv| (xv, fit.predict(xv)))
        .collect();

    Ok(RegressionPanel {
        spec,
        points: x.into_iter().zip(y).collect(),
        fit,
        line,
    })
}

/// Fit all three panels. Any failure fails the whole set.
pub fn build_panels(table: &JoinedTable) -> Result<Vec<RegressionPanel>, RegressionError> {
    PANELS.iter().map(|spec| build_panel(table, *spec)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::JoinedRow;
    use chrono::NaiveDate;

    fn table(n: u32) -> JoinedTable {
        let rows = (1..=n)
            .map(|i| {
                let v = f64::from(i);
                JoinedRow {
                    date: NaiveDate::from_ymd_opt(2024, 1, i).unwrap(),
                    tipo_de_cambio: 2.0 * v,
                    tasa_de_interes: v,
                    inflacion: 10.0 - v,
                }
            })
            .collect();
        JoinedTable { rows }
    }

    #[test]
    fn panels_follow_fixed_pairs() {
        let panels = build_panels(&table(10)).unwrap();

        assert_eq!(panels.len(), 3);
        // exchange = 2 * rate
        assert!((panels[0].fit.slope - 2.0).abs() < 1e-12);
        // rate = 10 - inflation
        assert!((panels[1].fit.slope + 1.0).abs() < 1e-12);
        // exchange = 20 - 2 * inflation
        assert!((panels[2].fit.intercept - 20.0).abs() < 1e-9);
        for p in &panels {
            assert_eq!(p.legend(), "R² = 1.0000");
        }
    }

    #[test]
    fn line_spans_x_range() {
        let panel = build_panel(&table(10), PANELS[0]).unwrap();

        assert_eq!(panel.line.len(), LINE_POINTS);
        assert_eq!(panel.line.first().unwrap().0, 1.0);
        assert!((panel.line.last().unwrap().0 - 10.0).abs() < 1e-12);
        assert_eq!(panel.points.len(), 10);
    }

    #[test]
    fn too_few_rows_fail_every_panel() {
        let err = build_panels(&table(1)).unwrap_err();
        assert_eq!(err, RegressionError::TooFewPoints(1));
    }

    #[test]
    fn flat_policy_rate_still_renders_every_panel() {
        let mut t = table(6);
        for row in &mut t.rows {
            row.tasa_de_interes = 11.25;
        }

        let panels = build_panels(&t).unwrap();

        assert_eq!(panels.len(), 3);
        // rate on x: flat line through mean(exchange) = 2 * 3.5
        assert_eq!(panels[0].fit.slope, 0.0);
        assert!((panels[0].fit.intercept - 7.0).abs() < 1e-12);
        assert_eq!(panels[0].legend(), "R² = 0.0000");
        assert!(panels[0].line.iter().all(|&(_, y)| (y - 7.0).abs() < 1e-12));
        // rate on y: constant, exactly predicted
        assert_eq!(panels[1].legend(), "R² = 1.0000");
    }

    #[test]
    fn summary_names_columns() {
        let panel = build_panel(&table(5), PANELS[1]).unwrap();
        let summary = panel.summary();
        assert_eq!(summary.x, "inflacion");
        assert_eq!(summary.y, "tasa_de_interes");
        assert_eq!(summary.fit.n, 5);
    }
}
