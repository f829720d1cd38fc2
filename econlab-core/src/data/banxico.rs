//! Banxico SIE provider.
//!
//! Fetches the FIX exchange rate (SF43718) and the interbank equilibrium
//! interest rate (SF61745) from the SIE REST API:
//!
//! `GET {base}/series/{id}/datos/{YYYY-MM-DD}/{YYYY-MM-DD}` with a `Bmx-Token` header.
//!
//! One request per series, no retry.

use super::provider::{DataError, DataSource, FetchResult, SeriesProvider};
use crate::config::EndpointConfig;
use crate::series::{Observation, SeriesKind};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

/// Marker SIE uses for an observation that was never published.
const NOT_AVAILABLE: &str = "N/E";

/// Date format of the `fecha` field.
const SIE_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Deserialize)]
struct SieResponse {
    bmx: SieBody,
}

#[derive(Debug, Deserialize)]
struct SieBody {
    #[serde(default)]
    series: Vec<SieSeries>,
}

#[derive(Debug, Deserialize)]
struct SieSeries {
    #[serde(rename = "idSerie")]
    id_serie: String,
    #[serde(default)]
    titulo: String,
    datos: Option<Vec<SieDatum>>,
}

#[derive(Debug, Deserialize)]
struct SieDatum {
    fecha: String,
    dato: String,
}

/// Banxico SIE data provider.
pub struct BanxicoProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl BanxicoProvider {
    pub fn new(endpoint: &EndpointConfig, token: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Build the series URL for an id and date range.
    fn series_url(&self, id: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/series/{id}/datos/{}/{}",
            self.base_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }

    /// Parse an SIE response into observations.
    fn parse_response(kind: SeriesKind, resp: SieResponse) -> Result<Vec<Observation>, DataError> {
        let code = kind.upstream_code();
        let series = resp
            .bmx
            .series
            .into_iter()
            .find(|s| s.id_serie == code)
            .ok_or_else(|| DataError::SeriesNotFound {
                code: code.to_string(),
            })?;

        let datos = match series.datos {
            Some(datos) if !datos.is_empty() => datos,
            _ => {
                return Err(DataError::SeriesNotFound {
                    code: code.to_string(),
                })
            }
        };

        tracing::debug!(series = code, title = %series.titulo, points = datos.len(), "SIE response");

        let mut observations = Vec::with_capacity(datos.len());
        for datum in datos {
            let value = datum.dato.trim();
            if value == NOT_AVAILABLE {
                tracing::debug!(series = code, fecha = %datum.fecha, "skipping N/E observation");
                continue;
            }

            let date = NaiveDate::parse_from_str(datum.fecha.trim(), SIE_DATE_FORMAT).map_err(|_| {
                DataError::ResponseFormatChanged(format!("{code}: bad fecha '{}'", datum.fecha))
            })?;
            let value = parse_sie_number(value).ok_or_else(|| {
                DataError::ResponseFormatChanged(format!("{code}: bad dato '{}'", datum.dato))
            })?;

            observations.push(Observation::new(date, value));
        }

        Ok(observations)
    }
}

/// SIE numbers may carry thousands separators ("1,234.5600").
fn parse_sie_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl SeriesProvider for BanxicoProvider {
    fn name(&self) -> &'static str {
        "banxico_sie"
    }

    fn kinds(&self) -> &'static [SeriesKind] {
        &[SeriesKind::ExchangeRate, SeriesKind::InterestRate]
    }

    fn fetch(
        &self,
        kind: SeriesKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if !self.kinds().contains(&kind) {
            return Err(DataError::UnsupportedSeries {
                provider: self.name(),
                kind,
            });
        }

        let url = self.series_url(kind.upstream_code(), start, end);
        let resp = self
            .client
            .get(&url)
            .header("Bmx-Token", &self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.without_url().to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired {
                provider: self.name(),
                status: status.as_u16(),
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SeriesNotFound {
                code: kind.upstream_code().to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Http {
                provider: self.name(),
                status: status.as_u16(),
            });
        }

        let body: SieResponse = resp.json().map_err(|e| {
            let e = e.without_url();
            DataError::ResponseFormatChanged(format!(
                "failed to parse SIE response for {}: {e}",
                kind.upstream_code()
            ))
        })?;

        Ok(FetchResult {
            kind,
            observations: Self::parse_response(kind, body)?,
            source: DataSource::BanxicoSie,
        })
    }
}
