//! Table catalog for the federated query.
//!
//! Maps SQL table names to CSV files. Registering a table scans the file
//! lazily, so the query reads the flat files directly with no load step.

use crate::query::QueryError;
use econlab_core::data::CsvStore;
use econlab_core::SeriesKind;
use polars::prelude::*;
use polars::sql::SQLContext;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// SQL table name → CSV path.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: BTreeMap<String, PathBuf>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog exposing the three series tables written by the fetchers.
    pub fn from_store(store: &CsvStore) -> Self {
        let mut catalog = Self::new();
        for kind in SeriesKind::ALL {
            catalog.register(kind.table_name(), store.path_for(kind));
        }
        catalog
    }

    /// Catalog for a data directory laid out by [`CsvStore`].
    pub fn from_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::from_store(&CsvStore::new(data_dir))
    }

    /// Register (or replace) a table.
    pub fn register(&mut self, table: impl Into<String>, path: impl Into<PathBuf>) {
        self.tables.insert(table.into(), path.into());
    }

    pub fn path(&self, table: &str) -> Option<&Path> {
        self.tables.get(table).map(PathBuf::as_path)
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.tables.iter().map(|(t, p)| (t.as_str(), p.as_path()))
    }

    /// Build a SQL context with every table scanned from its CSV.
    ///
    /// A table whose file is missing is an error: the join needs all of them.
    pub fn sql_context(&self) -> Result<SQLContext, QueryError> {
        let mut ctx = SQLContext::new();
        for (table, path) in &self.tables {
            if !path.is_file() {
                return Err(QueryError::MissingTable {
                    table: table.clone(),
                    path: path.clone(),
                });
            }
            let lf = LazyCsvReader::new(path).with_has_header(true).finish()?;
            ctx.register(table, lf);
        }
        Ok(ctx)
    }
}
