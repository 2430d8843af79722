use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use httptest::{matchers::*, responders::*, Expectation, Server};

mod common;

#[test]
fn get_installs_a_package_into_the_project_store() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/snwfdhmp/go.duckpkg.ini"))
            .times(1)
            .respond_with(status_code(200).body("[package]\nname = \"go\"\n")),
    );
    let project = common::project_fixture(&[("mock", &server.url_str("/"))]);

    let assert = cargo_bin_cmd!("duck")
        .current_dir(project.path())
        .args(["get", "snwfdhmp/go"])
        .assert()
        .success();

    let manifest = project
        .path()
        .join(".duck")
        .join("packages")
        .join("snwfdhmp")
        .join("go.duckpkg.ini");
    assert_eq!(
        fs::read_to_string(manifest).expect("manifest"),
        "[package]\nname = \"go\"\n"
    );
    let stdout = common::stdout_of(&assert);
    assert!(stdout.contains("installed"), "missing status: {stdout}");
    assert!(stdout.contains("mock"), "missing source repo: {stdout}");
}

#[test]
fn json_envelope_reports_the_source_repository() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/snwfdhmp/go.duckpkg.ini"))
            .times(1)
            .respond_with(status_code(200).body("manifest")),
    );
    let project = common::project_fixture(&[("mock", &server.url_str("/"))]);

    let assert = cargo_bin_cmd!("duck")
        .current_dir(project.path())
        .args(["--json", "get", "snwfdhmp/go"])
        .assert()
        .success();

    let payload = common::parse_json(&assert);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["code"], 0);
    assert_eq!(payload["command"], "get");
    let packages = payload["details"]["packages"].as_array().expect("packages");
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0]["status"], "installed");
    assert_eq!(packages[0]["repo"], "mock");
}

#[test]
fn repository_fallback_installs_from_the_first_that_responds() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/a/pkg.duckpkg.ini"))
            .times(1)
            .respond_with(status_code(404)),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/b/pkg.duckpkg.ini"))
            .times(1)
            .respond_with(status_code(200).body("from b")),
    );
    let project = common::project_fixture(&[
        ("first", &server.url_str("/a/")),
        ("second", &server.url_str("/b/")),
    ]);

    let assert = cargo_bin_cmd!("duck")
        .current_dir(project.path())
        .args(["--json", "get", "pkg"])
        .assert()
        .success();

    let payload = common::parse_json(&assert);
    assert_eq!(payload["details"]["packages"][0]["repo"], "second");
}

#[test]
fn exhausting_every_repository_exits_with_failure() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/gone.duckpkg.ini"))
            .times(1)
            .respond_with(status_code(404)),
    );
    let project = common::project_fixture(&[("mock", &server.url_str("/"))]);

    cargo_bin_cmd!("duck")
        .current_dir(project.path())
        .args(["get", "gone"])
        .assert()
        .code(2);
}

#[test]
fn already_installed_fails_without_force_and_overwrites_with_it() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/go.duckpkg.ini"))
            .times(1)
            .respond_with(status_code(200).body("replacement")),
    );
    let project = common::project_fixture(&[("mock", &server.url_str("/"))]);
    let target = project
        .path()
        .join(".duck")
        .join("packages")
        .join("go.duckpkg.ini");
    fs::write(&target, b"original").expect("seed manifest");

    cargo_bin_cmd!("duck")
        .current_dir(project.path())
        .args(["get", "go"])
        .assert()
        .code(1);
    assert_eq!(fs::read(&target).expect("read"), b"original");

    cargo_bin_cmd!("duck")
        .current_dir(project.path())
        .args(["get", "--force", "go"])
        .assert()
        .success();
    assert_eq!(fs::read(&target).expect("read"), b"replacement");
}

#[test]
fn batch_reports_every_package_and_keeps_going() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/lost.duckpkg.ini"))
            .times(1)
            .respond_with(status_code(404)),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/found.duckpkg.ini"))
            .times(1)
            .respond_with(status_code(200).body("here")),
    );
    let project = common::project_fixture(&[("mock", &server.url_str("/"))]);

    let assert = cargo_bin_cmd!("duck")
        .current_dir(project.path())
        .args(["--json", "get", "lost", "found"])
        .assert()
        .code(2);

    let payload = common::parse_json(&assert);
    let packages = payload["details"]["packages"].as_array().expect("packages");
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0]["package"], "lost");
    assert_eq!(packages[0]["status"], "failed");
    assert_eq!(packages[1]["package"], "found");
    assert_eq!(packages[1]["status"], "installed");
    assert!(project
        .path()
        .join(".duck")
        .join("packages")
        .join("found.duckpkg.ini")
        .exists());
}

#[test]
fn global_get_installs_under_the_configured_store() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/snwfdhmp/go.duckpkg.ini"))
            .times(1)
            .respond_with(status_code(200).body("global manifest")),
    );
    let global = common::global_fixture(&[("mock", &server.url_str("/"))]);
    // No project config anywhere near this directory.
    let scratch = tempfile::tempdir().expect("tempdir");

    cargo_bin_cmd!("duck")
        .current_dir(scratch.path())
        .env("DUCK_CONFIG_DIR", global.path())
        .args(["get", "--global", "snwfdhmp/go"])
        .assert()
        .success();

    let manifest = global
        .path()
        .join("packages")
        .join("snwfdhmp")
        .join("go.duckpkg.ini");
    assert_eq!(
        fs::read_to_string(manifest).expect("manifest"),
        "global manifest"
    );
}

#[test]
fn get_without_project_config_is_a_user_error() {
    let scratch = tempfile::tempdir().expect("tempdir");

    cargo_bin_cmd!("duck")
        .current_dir(scratch.path())
        .args(["get", "snwfdhmp/go"])
        .assert()
        .code(1);
}

#[test]
fn empty_registry_is_seeded_with_the_default_repository() {
    let project = common::project_fixture(&[]);

    // The install itself may fail (the default repository is a real remote);
    // seeding must happen and persist regardless.
    cargo_bin_cmd!("duck")
        .current_dir(project.path())
        .args(["get", "definitely/not-a-package"])
        .assert();

    let config = fs::read_to_string(project.path().join(".duck").join("duck.toml"))
        .expect("config");
    let doc: toml_edit::DocumentMut = config.parse().expect("valid config");
    assert_eq!(
        doc["repos"]["core"].as_str(),
        Some("http://raw.githubusercontent.com/snwfdhmp/duck-core/master/")
    );
}
