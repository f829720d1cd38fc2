//! Exit-code and end-to-end tests of the `econlab` binary.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;

fn econlab() -> Command {
    let mut cmd = Command::cargo_bin("econlab").unwrap();
    cmd.env("RUST_LOG", "info");
    cmd
}

fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let data_dir = dir.join("data");
    std::fs::write(
        &path,
        format!(
            "banxico_token = \"tok\"\ninegi_token = \"tok\"\nstart_date = \"2024-01-01\"\nend_date = \"2024-01-31\"\ndata_dir = {:?}\n{extra}",
            data_dir.to_str().unwrap()
        ),
    )
    .unwrap();
    path
}

#[test]
fn missing_config_exits_one_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");

    econlab()
        .args(["banxico", "--config"])
        .arg(dir.path().join("absent.toml"))
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .code(1);

    assert!(!data_dir.exists());
}

#[test]
fn unparsable_config_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "start_date = \n").unwrap();

    econlab().args(["inegi", "--config"]).arg(&path).assert().code(1);
}

#[test]
fn empty_token_is_logged_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let data_dir = dir.path().join("data");
    std::fs::write(
        &path,
        "banxico_token = \"\"\nstart_date = \"2024-01-01\"\nend_date = \"2024-01-31\"\n",
    )
    .unwrap();

    econlab()
        .args(["banxico", "--config"])
        .arg(&path)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("banxico_token"));

    assert!(!data_dir.exists());
}

#[test]
fn unreachable_upstream_exits_zero_without_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "[banxico]\nbase_url = \"http://127.0.0.1:9\"\ntimeout_secs = 2\n",
    );

    econlab().args(["banxico", "--config"]).arg(&config).assert().success();

    assert!(!dir.path().join("data/banxico/tipo_cambio.csv").exists());
    assert!(!dir.path().join("data/banxico/tasa_interes.csv").exists());
}

#[test]
fn inegi_fetch_writes_inflation_csv() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/INDICATOR/628229/es/0700/false/BIE/2.0/tok");
        then.status(200).json_body(json!({
            "Series": [ {
                "INDICADOR": "628229",
                "FREQ": "8",
                "OBSERVATIONS": [
                    { "TIME_PERIOD": "2024/01", "OBS_VALUE": "4.88" },
                    { "TIME_PERIOD": "2023/12", "OBS_VALUE": "4.66" }
                ]
            } ]
        }));
    });

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        &format!("[inegi]\nbase_url = \"{}\"\n", server.base_url()),
    );

    econlab().args(["inegi", "--config"]).arg(&config).assert().success();

    mock.assert();
    let csv = std::fs::read_to_string(dir.path().join("data/inegi/inflacion.csv")).unwrap();
    assert_eq!(csv, "date,inflacion\n2024-01-01,4.88\n");
}

#[test]
fn status_reports_missing_and_present_series() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(data_dir.join("inegi")).unwrap();
    std::fs::write(
        data_dir.join("inegi/inflacion.csv"),
        "date,inflacion\n2024-01-01,4.88\n2024-02-01,4.4\n",
    )
    .unwrap();

    econlab()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Series: 1/3"))
        .stdout(predicate::str::contains("2024-01-01 to 2024-02-01"))
        .stdout(predicate::str::contains("(missing)"));
}
