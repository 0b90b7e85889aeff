//! End-to-end CLI tests for the jarhttp binary.

use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use jarhttp::{Cookie, CookieJar};
mod support;
use support::socket_guard::start_mock_server_or_skip;

fn jarhttp() -> Command {
    let mut cmd = Command::cargo_bin("jarhttp").unwrap();
    cmd.env_remove("JARHTTP_COOKIE_FILE")
        .env_remove("JARHTTP_PROXY")
        .env_remove("JARHTTP_TIMEOUT_SECS")
        .env_remove("JARHTTP_CONNECT_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    jarhttp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("persistent per-host cookie jar"));
}

#[test]
fn test_binary_version_displays_version() {
    jarhttp()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jarhttp"));
}

#[test]
fn test_binary_without_subcommand_fails() {
    jarhttp().assert().failure();
}

#[test]
fn test_cookies_lists_names_without_values() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let cookie_path = temp_dir.path().join("cookies.json");
    let jar = CookieJar::new();
    jar.set(
        "example.com",
        vec![Cookie::new("sid", "very-secret"), Cookie::new("lang", "en")],
    );
    jar.set("other.example:8080", vec![Cookie::new("token", "hidden")]);
    std::fs::write(&cookie_path, jar.serialize().unwrap()).unwrap();

    jarhttp()
        .args(["cookies", "--cookie-file"])
        .arg(&cookie_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com\tsid"))
        .stdout(predicate::str::contains("example.com\tlang"))
        .stdout(predicate::str::contains("other.example:8080\ttoken"))
        .stdout(predicate::str::contains("very-secret").not());

    jarhttp()
        .args(["cookies", "other.example:8080", "-c"])
        .arg(&cookie_path)
        .assert()
        .success()
        .stdout(predicate::eq("other.example:8080\ttoken\n"));
}

#[test]
fn test_cookies_without_cookie_file_fails() {
    jarhttp()
        .arg("cookies")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No cookie file given"));
}

#[test]
fn test_cookies_rejects_malformed_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let cookie_path = temp_dir.path().join("cookies.json");
    std::fs::write(&cookie_path, "garbage").unwrap();

    jarhttp()
        .args(["cookies", "-c"])
        .arg(&cookie_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot load cookie file"));
}

#[test]
fn test_invalid_config_timeout_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, r#"{"timeout_secs": 0}"#).unwrap();

    jarhttp()
        .args(["get", "http://127.0.0.1:9/", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_prints_body_and_saves_cookie_file() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = tempfile::TempDir::new().unwrap();
    let cookie_path = temp_dir.path().join("cookies.json");

    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "visited=1")
                .set_body_string("hello from server"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/hello", mock_server.uri());
    jarhttp()
        .args(["get", url.as_str(), "-q", "-c"])
        .arg(&cookie_path)
        .assert()
        .success()
        .stdout(predicate::eq("hello from server"));

    let saved = CookieJar::load(&cookie_path).unwrap();
    let host = mock_server.address().to_string();
    assert_eq!(saved.get(&host)[0].name, "visited");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_sends_form_and_replays_cookie_from_env_file() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = tempfile::TempDir::new().unwrap();
    let cookie_path = temp_dir.path().join("cookies.json");

    let host = mock_server.address().to_string();
    let jar = CookieJar::new();
    jar.set(&host, vec![Cookie::new("sid", "stored")]);
    std::fs::write(&cookie_path, jar.serialize().unwrap()).unwrap();

    Mock::given(method("POST"))
        .and(path("/form"))
        .and(header("cookie", "sid=stored"))
        .and(body_string("a=1&b=two"))
        .respond_with(ResponseTemplate::new(200).set_body_string("accepted"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/form", mock_server.uri());
    jarhttp()
        .env("JARHTTP_COOKIE_FILE", &cookie_path)
        .args([
            "post",
            url.as_str(),
            "-d",
            "a=1",
            "-d",
            "b=two",
        ])
        .assert()
        .success()
        .stdout(predicate::eq("accepted"));
}
