//! Flat-file CSV store for normalized series.
//!
//! Layout: `{data_dir}/{provider}/{file}`: `banxico/tipo_cambio.csv`,
//! `banxico/tasa_interes.csv`, `inegi/inflacion.csv`.
//!
//! Each file is a two-column table (`date,<value column>`) with a header row.
//! Writes render the whole file in memory, then write to `.tmp` and rename,
//! so a file is replaced wholesale and identical series give identical bytes.

use super::provider::DataError;
use crate::series::{Observation, Series, SeriesKind};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a successful save.
#[derive(Debug, Clone)]
pub struct SavedSeries {
    pub kind: SeriesKind,
    pub path: PathBuf,
    pub rows: usize,
    /// BLAKE3 hash of the file contents (hex).
    pub content_hash: String,
}

impl SavedSeries {
    pub fn short_hash(&self) -> &str {
        &self.content_hash[..self.content_hash.len().min(12)]
    }
}

/// What is currently on disk for one series.
#[derive(Debug, Clone)]
pub struct StoredSeriesStatus {
    pub kind: SeriesKind,
    pub path: PathBuf,
    pub present: bool,
    pub rows: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub size_bytes: u64,
    pub content_hash: Option<String>,
}

/// The CSV store.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Root directory of the store.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the CSV file for a series.
    pub fn path_for(&self, kind: SeriesKind) -> PathBuf {
        self.data_dir.join(kind.provider_dir()).join(kind.file_name())
    }

    /// Write a series, replacing any previous file.
    pub fn write(&self, series: &Series) -> Result<SavedSeries, DataError> {
        let kind = series.kind();
        let path = self.path_for(kind);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| DataError::io(dir, e))?;
        }

        let bytes = render_csv(series)?;
        let tmp_path = path.with_extension("csv.tmp");
        fs::write(&tmp_path, &bytes).map_err(|e| DataError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::io(&path, e)
        })?;

        Ok(SavedSeries {
            kind,
            path,
            rows: series.len(),
            content_hash: blake3::hash(&bytes).to_hex().to_string(),
        })
    }

    /// Load a stored series.
    pub fn load(&self, kind: SeriesKind) -> Result<Series, DataError> {
        let path = self.path_for(kind);
        let file = fs::File::open(&path).map_err(|e| DataError::io(&path, e))?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        let expected = ["date", kind.value_column()];
        if headers.iter().ne(expected.iter().copied()) {
            return Err(DataError::ResponseFormatChanged(format!(
                "{}: unexpected header {:?}",
                path.display(),
                headers
            )));
        }

        let mut observations = Vec::new();
        for row in reader.deserialize() {
            let (date, value): (NaiveDate, f64) = row?;
            observations.push(Observation::new(date, value));
        }
        let (series, _) = Series::from_observations(kind, observations);
        Ok(series)
    }

    /// Report what is stored for each requested series.
    pub fn status(&self, kinds: &[SeriesKind]) -> Vec<StoredSeriesStatus> {
        kinds
            .iter()
            .map(|&kind| {
                let path = self.path_for(kind);
                let bytes = fs::read(&path).ok();
                let loaded = bytes.as_ref().and_then(|_| self.load(kind).ok());
                StoredSeriesStatus {
                    kind,
                    present: bytes.is_some(),
                    rows: loaded.as_ref().map(Series::len).unwrap_or(0),
                    date_range: loaded.as_ref().and_then(Series::date_range),
                    size_bytes: bytes.as_ref().map(|b| b.len() as u64).unwrap_or(0),
                    content_hash: bytes.map(|b| blake3::hash(&b).to_hex().to_string()),
                    path,
                }
            })
            .collect()
    }
}

/// Render a series as CSV bytes.
fn render_csv(series: &Series) -> Result<Vec<u8>, DataError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(["date", series.kind().value_column()])?;
    for obs in series.observations() {
        writer.serialize((obs.date, obs.value))?;
    }
    writer
        .into_inner()
        .map_err(|e| DataError::ResponseFormatChanged(format!("CSV buffer flush: {e}")))
}
