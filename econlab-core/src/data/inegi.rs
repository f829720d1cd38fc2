//! INEGI indicator provider.
//!
//! Fetches general inflation (indicator 628229) from the INEGI indicators API:
//!
//! `GET {base}/INDICATOR/{code}/es/0700/false/{BIE|BISE}/2.0/{token}?type=json`
//!
//! The endpoint returns the whole history, so the date range is applied
//! client-side on compact `YYYYMMDD` bounds. BIE is queried first; if it has
//! no such indicator the same request goes once to BISE.

use super::provider::{DataError, DataSource, FetchResult, SeriesProvider};
use crate::config::EndpointConfig;
use crate::series::{Observation, SeriesKind};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

/// Geographic area code for the national aggregate.
const NATIONAL_AREA: &str = "0700";

/// INEGI frequency codes that need period-to-month mapping.
const FREQ_SEMIANNUAL: &str = "4";
const FREQ_QUARTERLY: &str = "6";

#[derive(Debug, Deserialize)]
struct IndicatorResponse {
    #[serde(rename = "Series", default)]
    series: Vec<IndicatorSeries>,
}

#[derive(Debug, Deserialize)]
struct IndicatorSeries {
    #[serde(rename = "INDICADOR")]
    indicador: String,
    #[serde(rename = "FREQ", default)]
    freq: String,
    #[serde(rename = "OBSERVATIONS", default)]
    observations: Vec<IndicatorObservation>,
}

#[derive(Debug, Deserialize)]
struct IndicatorObservation {
    #[serde(rename = "TIME_PERIOD")]
    time_period: String,
    #[serde(rename = "OBS_VALUE")]
    obs_value: Option<String>,
}

/// Databank an indicator lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Databank {
    Bie,
    Bise,
}

impl Databank {
    fn as_str(self) -> &'static str {
        match self {
            Databank::Bie => "BIE",
            Databank::Bise => "BISE",
        }
    }

    fn source(self) -> DataSource {
        match self {
            Databank::Bie => DataSource::InegiBie,
            Databank::Bise => DataSource::InegiBise,
        }
    }
}

/// Format a date as the compact `YYYYMMDD` string the indicator range uses.
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// INEGI indicators data provider.
pub struct InegiProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl InegiProvider {
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

    fn indicator_url(&self, code: &str, bank: Databank) -> String {
        format!(
            "{}/INDICATOR/{code}/es/{NATIONAL_AREA}/false/{}/2.0/{}",
            self.base_url,
            bank.as_str(),
            self.token
        )
    }

    /// One request against one databank.
    fn fetch_from(&self, code: &str, bank: Databank) -> Result<Vec<Observation>, DataError> {
        let url = self.indicator_url(code, bank);
        let resp = self
            .client
            .get(&url)
            .query(&[("type", "json")])
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.without_url().to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired {
                provider: self.name(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Http {
                provider: self.name(),
                status: status.as_u16(),
            });
        }

        let body: IndicatorResponse = resp.json().map_err(|e| {
            let e = e.without_url();
            DataError::ResponseFormatChanged(format!("failed to parse INEGI response for {code}: {e}"))
        })?;

        parse_response(code, body)
    }
}

/// Parse an indicator response into observations (whole history).
fn parse_response(code: &str, resp: IndicatorResponse) -> Result<Vec<Observation>, DataError> {
    let series = resp
        .series
        .into_iter()
        .find(|s| s.indicador == code)
        .filter(|s| !s.observations.is_empty())
        .ok_or_else(|| DataError::SeriesNotFound {
            code: code.to_string(),
        })?;

    let mut observations = Vec::with_capacity(series.observations.len());
    for obs in &series.observations {
        let raw = match obs.obs_value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => continue,
        };
        let date = parse_time_period(&obs.time_period, &series.freq).ok_or_else(|| {
            DataError::ResponseFormatChanged(format!(
                "{code}: bad TIME_PERIOD '{}' (FREQ {})",
                obs.time_period, series.freq
            ))
        })?;
        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("{code}: bad OBS_VALUE '{raw}'")))?;
        observations.push(Observation::new(date, value));
    }

    Ok(observations)
}

/// Map an INEGI period to the first day it covers.
///
/// `YYYY` → Jan 1, `YYYY/MM` → first of month, `YYYY/MM/DD` as is.
/// Quarterly and semiannual series number their sub-periods instead of months.
fn parse_time_period(period: &str, freq: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = period.trim().split('/').collect();
    let year: i32 = parts.first()?.parse().ok()?;
    match parts.len() {
        1 => NaiveDate::from_ymd_opt(year, 1, 1),
        2 => {
            let sub: u32 = parts[1].parse().ok()?;
            let month = match freq {
                FREQ_QUARTERLY if (1..=4).contains(&sub) => (sub - 1) * 3 + 1,
                FREQ_SEMIANNUAL if (1..=2).contains(&sub) => (sub - 1) * 6 + 1,
                _ => sub,
            };
            NaiveDate::from_ymd_opt(year, month, 1)
        }
        3 => {
            let month: u32 = parts[1].parse().ok()?;
            let day: u32 = parts[2].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        _ => None,
    }
}

/// Keep observations whose compact date falls inside `[inicio, fin]`.
fn filter_compact_range(observations: Vec<Observation>, inicio: &str, fin: &str) -> Vec<Observation> {
    observations
        .into_iter()
        .filter(|obs| {
            let key = compact_date(obs.date);
            key.as_str() >= inicio && key.as_str() <= fin
        })
        .collect()
}

impl SeriesProvider for InegiProvider {
    fn name(&self) -> &'static str {
        "inegi"
    }

    fn kinds(&self) -> &'static [SeriesKind] {
        &[SeriesKind::Inflation]
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

        let code = kind.upstream_code();
        let (observations, bank) = match self.fetch_from(code, Databank::Bie) {
            Ok(obs) => (obs, Databank::Bie),
            Err(e @ (DataError::SeriesNotFound { .. } | DataError::Http { .. })) => {
                tracing::debug!(indicator = code, error = %e, "not in BIE, trying BISE");
                (self.fetch_from(code, Databank::Bise)?, Databank::Bise)
            }
            Err(e) => return Err(e),
        };

        let inicio = compact_date(start);
        let fin = compact_date(end);
        let total = observations.len();
        let observations = filter_compact_range(observations, &inicio, &fin);
        tracing::debug!(
            indicator = code,
            databank = bank.as_str(),
            total,
            kept = observations.len(),
            %inicio,
            %fin,
            "filtered indicator history"
        );

        Ok(FetchResult {
            kind,
            observations,
            source: bank.source(),
        })
    }
}
