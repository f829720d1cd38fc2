//! The federated join over the three series tables.
//!
//! Inner join on `date`: a date missing from any one series is dropped from
//! the result. Rows come back sorted by date.

use crate::catalog::Catalog;
use chrono::NaiveDate;
use econlab_core::SeriesKind;
use polars::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Joins the three series on date.
pub const JOIN_QUERY: &str = "\
SELECT
    tc.date,
    tc.tipo_de_cambio,
    ti.tasa_de_interes,
    inf.inflacion
FROM tipo_de_cambio tc
JOIN tasa_de_interes ti ON tc.date = ti.date
JOIN inflacion inf ON tc.date = inf.date";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("table '{table}' has no data file at {path}")]
    MissingTable { table: String, path: PathBuf },

    #[error("query failed: {0}")]
    Polars(#[from] PolarsError),

    #[error("bad value in column '{column}' at row {row}: {reason}")]
    BadValue {
        column: String,
        row: usize,
        reason: String,
    },
}

/// One row of the joined table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoinedRow {
    pub date: NaiveDate,
    pub tipo_de_cambio: f64,
    pub tasa_de_interes: f64,
    pub inflacion: f64,
}

impl JoinedRow {
    pub fn value(&self, kind: SeriesKind) -> f64 {
        match kind {
            SeriesKind::ExchangeRate => self.tipo_de_cambio,
            SeriesKind::InterestRate => self.tasa_de_interes,
            SeriesKind::Inflation => self.inflacion,
        }
    }
}

/// The denormalized table the dashboard works from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JoinedTable {
    pub rows: Vec<JoinedRow>,
}

impl JoinedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one series, in date order.
    pub fn column(&self, kind: SeriesKind) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(kind)).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }
}

/// Execute [`JOIN_QUERY`] against the catalog.
pub fn run_join(catalog: &Catalog) -> Result<JoinedTable, QueryError> {
    let mut ctx = catalog.sql_context()?;
    let df = ctx.execute(JOIN_QUERY)?.collect()?;
    tracing::debug!(rows = df.height(), "join executed");
    dataframe_to_table(&df)
}

/// Convert the join result to typed rows sorted by date.
fn dataframe_to_table(df: &DataFrame) -> Result<JoinedTable, QueryError> {
    let dates = df.column("date")?.cast(&DataType::String)?;
    let dates = dates.as_materialized_series().str()?;

    let fx = float_column(df, SeriesKind::ExchangeRate.value_column())?;
    let rate = float_column(df, SeriesKind::InterestRate.value_column())?;
    let infl = float_column(df, SeriesKind::Inflation.value_column())?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let raw = dates.get(i).ok_or_else(|| QueryError::BadValue {
            column: "date".into(),
            row: i,
            reason: "null".into(),
        })?;
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| QueryError::BadValue {
            column: "date".into(),
            row: i,
            reason: format!("'{raw}': {e}"),
        })?;

        rows.push(JoinedRow {
            date,
            tipo_de_cambio: value_at(&fx, SeriesKind::ExchangeRate, i)?,
            tasa_de_interes: value_at(&rate, SeriesKind::InterestRate, i)?,
            inflacion: value_at(&infl, SeriesKind::Inflation, i)?,
        });
    }

    rows.sort_by_key(|r| r.date);
    Ok(JoinedTable { rows })
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, QueryError> {
    let col = df.column(name)?.cast(&DataType::Float64)?;
    Ok(col.as_materialized_series().f64()?.into_iter().collect())
}

fn value_at(values: &[Option<f64>], kind: SeriesKind, row: usize) -> Result<f64, QueryError> {
    values
        .get(row)
        .copied()
        .flatten()
        .ok_or_else(|| QueryError::BadValue {
            column: kind.value_column().to_string(),
            row,
            reason: "null".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataframe_conversion_sorts_by_date() {
        let df = df!(
            "date" => ["2024-01-03", "2024-01-02"],
            "tipo_de_cambio" => [17.0, 16.9],
            "tasa_de_interes" => [11.5, 11.4],
            "inflacion" => [4.9, 4.8],
        )
        .unwrap();

        let table = dataframe_to_table(&df).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(table.column(SeriesKind::ExchangeRate), vec![16.9, 17.0]);
    }

    #[test]
    fn integer_columns_are_widened() {
        let df = df!(
            "date" => ["2024-01-02"],
            "tipo_de_cambio" => [17i64],
            "tasa_de_interes" => [11i64],
            "inflacion" => [5i64],
        )
        .unwrap();

        let table = dataframe_to_table(&df).unwrap();
        assert_eq!(table.rows[0].inflacion, 5.0);
    }

    #[test]
    fn null_value_is_an_error() {
        let df = df!(
            "date" => ["2024-01-02"],
            "tipo_de_cambio" => [Some(17.0)],
            "tasa_de_interes" => [None::<f64>],
            "inflacion" => [Some(5.0)],
        )
        .unwrap();

        let err = dataframe_to_table(&df).unwrap_err();
        assert!(matches!(err, QueryError::BadValue { ref column, .. } if column == "tasa_de_interes"));
    }
}
