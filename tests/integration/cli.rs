//! The `iconlens` binary against an isolated home directory.
//!
//! The demo collection comes from a custom collection file and the CDN points
//! at an unroutable address, so nothing here touches the network unless a
//! test asks for a collection that is not local.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use predicates::prelude::*;
use std::fs;

use crate::common::TestHome;
use iconlens_cli::test_utils::demo_icon_set_json;

const OFFLINE_CDN: &str = "http://127.0.0.1:9/collections";

#[test]
fn info_prints_geometry() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "").unwrap();

    home.command()
        .args(["info", "demo:a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("collection: demo"))
        .stdout(predicate::str::contains("20x10 (ratio 2)"));
}

#[test]
fn info_json_output() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "").unwrap();

    let output = home.command().args(["info", "demo:square-turned", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["key"], "demo:square-turned");
    assert_eq!(json["rotate"], 1);
    assert_eq!(json["width"], 24.0);
    assert!(json.get("hFlip").is_none());
}

#[test]
fn alias_from_config() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "[aliases]\nwide = \"demo:a\"").unwrap();

    home.command()
        .args(["info", "wide"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo:a"));

    home.command()
        .args(["info", "wide", "--no-aliases"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid icon key: wide"));
}

#[test]
fn malformed_key_is_reported_as_invalid() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "").unwrap();

    home.command()
        .args(["svg", "no separator"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid icon key"))
        .stderr(predicate::str::contains("collection:name"));
}

#[test]
fn missing_icon_exits_with_2() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "").unwrap();

    home.command()
        .args(["info", "demo:nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Icon 'demo:nope' not found"));
}

#[test]
fn unreachable_collection_exits_with_2() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "").unwrap();

    home.command()
        .env("NO_COLOR", "1")
        .args(["info", "mdi:home"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error: Failed to load icon collection 'mdi'"))
        .stderr(predicate::str::contains("Icon collection 'mdi' is unavailable"));
}

#[test]
fn custom_aliases_only_rejects_plain_keys() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "custom_aliases_only = true").unwrap();

    home.command()
        .args(["info", "demo:a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Icon 'demo:a' not found"));
}

#[test]
fn svg_command() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "").unwrap();

    home.command()
        .args(["svg", "demo:a", "--size", "16"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<svg "))
        .stdout(predicate::str::contains("width=\"32px\" height=\"16px\""));
}

#[test]
fn data_url_uses_color_flag() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "").unwrap();

    let output = home
        .command()
        .args(["data-url", "demo:square", "--color", "#123456"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let payload = stdout.trim().strip_prefix("data:image/svg+xml;base64,").unwrap();
    let svg = String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap();
    assert!(svg.contains("fill=\"#123456\""));
    assert!(svg.contains("height=\"32px\""));
}

#[test]
fn list_collection() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "").unwrap();

    home.command()
        .args(["list", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo:a\n"))
        .stdout(predicate::str::contains("demo:square-mirrored\n"));
}

#[test]
fn cache_migrate_info_and_clear() {
    let home = TestHome::new().unwrap();
    home.write_config(OFFLINE_CDN, "").unwrap();

    let mut legacy = serde_json::Map::new();
    legacy.insert("icons-extra".to_string(), demo_icon_set_json().replace("\"demo\"", "\"extra\"").into());
    legacy.insert("theme".to_string(), "dark".into());
    fs::write(home.state_path(), serde_json::to_string(&legacy).unwrap()).unwrap();

    home.command()
        .args(["cache", "migrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated 1 collection(s)"));

    assert!(home.cache_dir().join("extra.json").exists());
    let state: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(home.state_path()).unwrap()).unwrap();
    assert!(state.get("icons-extra").is_none());
    assert_eq!(state["theme"], "dark");

    home.command().args(["cache", "migrate"]).assert().success().stdout("Nothing to migrate\n");

    home.command()
        .args(["cache", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Collections: 1"))
        .stdout(predicate::str::contains("- extra"));

    home.command().args(["info", "extra:a"]).assert().success();

    home.command().args(["cache", "clear"]).assert().success();
    assert!(!home.cache_dir().exists());
}

#[test]
fn invalid_config_fails_with_1() {
    let home = TestHome::new().unwrap();
    fs::write(home.config_path(), "color = [").unwrap();

    home.command().args(["info", "demo:a"]).assert().code(1);
}
