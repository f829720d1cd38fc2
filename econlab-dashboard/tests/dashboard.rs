//! Router-level tests against a temporary data directory.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use econlab_core::data::CsvStore;
use econlab_core::{Observation, Series, SeriesKind};
use econlab_dashboard::{create_router, AppState, DashboardConfig};
use std::path::Path;
use tower::ServiceExt;

fn seed(dir: &Path) {
    let store = CsvStore::new(dir);
    for kind in SeriesKind::ALL {
        let obs = (1..=12u32)
            .map(|day| {
                let t = f64::from(day);
                let value = match kind {
                    SeriesKind::ExchangeRate => 17.0 + 0.1 * t,
                    SeriesKind::InterestRate => 11.0 - 0.05 * t,
                    SeriesKind::Inflation => 4.0 + 0.02 * t + if day % 2 == 0 { 0.01 } else { 0.0 },
                };
                Observation::new(NaiveDate::from_ymd_opt(2024, 3, day).unwrap(), value)
            })
            .collect();
        let (series, _) = Series::from_observations(kind, obs);
        store.write(&series).unwrap();
    }
}

fn router(dir: &Path) -> axum::Router {
    create_router(AppState::new(DashboardConfig {
        data_dir: dir.to_path_buf(),
        port: 0,
    }))
}

async fn get(dir: &Path, uri: &str) -> (StatusCode, String) {
    let response = router(dir)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn page_shows_three_panels_and_raw_table() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let (status, html) = get(dir.path(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Economic Indicators Analysis"));
    assert_eq!(html.matches("<svg").count(), 3);
    assert!(html.contains("Exchange Rate vs Interest Rate"));
    assert!(html.contains("Interest Rate vs Inflation"));
    assert!(html.contains("Exchange Rate vs Inflation"));
    assert!(html.contains("12 observation dates"));
    assert!(html.contains("<td>2024-03-01</td>"));
    assert!(!html.contains("Error loading data"));
}

#[tokio::test]
async fn missing_data_renders_error_banner_only() {
    let dir = tempfile::tempdir().unwrap();

    let (status, html) = get(dir.path(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Error loading data:"));
    assert!(!html.contains("<svg"));
    assert!(!html.contains("<table"));
}

#[tokio::test]
async fn api_reports_fits() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let (status, body) = get(dir.path(), "/api/panels").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["rows"], 12);
    let panels = json["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 3);
    assert_eq!(panels[0]["x"], "tasa_de_interes");
    assert_eq!(panels[0]["y"], "tipo_de_cambio");
    // exchange = 17 + 0.1t, rate = 11 - 0.05t, so exchange = 39 - 2 * rate
    let slope = panels[0]["slope"].as_f64().unwrap();
    assert!((slope + 2.0).abs() < 1e-9, "slope = {slope}");
    let r2 = panels[0]["r_squared"].as_f64().unwrap();
    assert!((r2 - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn api_error_is_json() {
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = get(dir.path(), "/api/panels").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("has no data file"));
}

#[tokio::test]
async fn health_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = get(dir.path(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
