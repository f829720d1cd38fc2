//! Domain types for the three macroeconomic series.
//!
//! Each series is a date-keyed table with a single numeric column. The kind
//! carries everything that differs between them: upstream code, column name,
//! file name and SQL table name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which of the three tracked series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Peso/USD FIX exchange rate (Banxico SF43718).
    ExchangeRate,
    /// Interbank equilibrium interest rate (Banxico SF61745).
    InterestRate,
    /// General inflation (INEGI 628229).
    Inflation,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 3] = [
        SeriesKind::ExchangeRate,
        SeriesKind::InterestRate,
        SeriesKind::Inflation,
    ];

    /// Upstream identifier: Banxico series id or INEGI indicator code.
    pub fn upstream_code(self) -> &'static str {
        match self {
            SeriesKind::ExchangeRate => "SF43718",
            SeriesKind::InterestRate => "SF61745",
            SeriesKind::Inflation => "628229",
        }
    }

    /// Name of the value column, both in the CSV header and the SQL table.
    pub fn value_column(self) -> &'static str {
        match self {
            SeriesKind::ExchangeRate => "tipo_de_cambio",
            SeriesKind::InterestRate => "tasa_de_interes",
            SeriesKind::Inflation => "inflacion",
        }
    }

    /// SQL table name the series is registered under.
    pub fn table_name(self) -> &'static str {
        self.value_column()
    }

    /// File name inside the provider directory.
    pub fn file_name(self) -> &'static str {
        match self {
            SeriesKind::ExchangeRate => "tipo_cambio.csv",
            SeriesKind::InterestRate => "tasa_interes.csv",
            SeriesKind::Inflation => "inflacion.csv",
        }
    }

    /// Subdirectory of the data dir, named after the upstream provider.
    pub fn provider_dir(self) -> &'static str {
        match self {
            SeriesKind::ExchangeRate | SeriesKind::InterestRate => "banxico",
            SeriesKind::Inflation => "inegi",
        }
    }

    /// Human-readable label used on charts.
    pub fn label(self) -> &'static str {
        match self {
            SeriesKind::ExchangeRate => "Exchange Rate",
            SeriesKind::InterestRate => "Interest Rate",
            SeriesKind::Inflation => "Inflation",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value_column(), self.upstream_code())
    }
}

/// One dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A normalized series: sorted ascending by date, one row per date.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    kind: SeriesKind,
    observations: Vec<Observation>,
}

impl Series {
    /// Normalize raw observations into a series.
    ///
    /// Sorts by date and keeps the last value seen for a duplicated date.
    /// Returns the series and the number of duplicates dropped.
    pub fn from_observations(kind: SeriesKind, raw: Vec<Observation>) -> (Self, usize) {
        let total = raw.len();
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for obs in raw {
            by_date.insert(obs.date, obs.value);
        }
        let duplicates = total - by_date.len();
        let observations = by_date
            .into_iter()
            .map(|(date, value)| Observation { date, value })
            .collect();
        (Self { kind, observations }, duplicates)
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// First and last date, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
