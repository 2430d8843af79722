#![allow(dead_code)]

use std::{fs, path::Path};

use assert_cmd::assert::Assert;
use serde_json::Value;
use tempfile::TempDir;

/// A project directory holding `.duck/duck.toml` and an empty package store.
pub fn project_fixture(repos: &[(&str, &str)]) -> TempDir {
    let temp = tempfile::Builder::new()
        .prefix("duck-project")
        .tempdir()
        .expect("tempdir");
    write_project_config(temp.path(), repos);
    temp
}

pub fn write_project_config(root: &Path, repos: &[(&str, &str)]) {
    let conf_dir = root.join(".duck");
    fs::create_dir_all(conf_dir.join("packages")).expect("create store");
    let mut contents = String::from("[packages]\ndirectory = \"packages\"\n");
    if !repos.is_empty() {
        contents.push_str("\n[repos]\n");
        for (name, url) in repos {
            contents.push_str(&format!("{name} = \"{url}\"\n"));
        }
    }
    fs::write(conf_dir.join("duck.toml"), contents).expect("write config");
}

/// A directory usable as `DUCK_CONFIG_DIR` with pre-configured repositories.
pub fn global_fixture(repos: &[(&str, &str)]) -> TempDir {
    let temp = tempfile::Builder::new()
        .prefix("duck-global")
        .tempdir()
        .expect("tempdir");
    let mut contents = String::from("[repos]\n");
    for (name, url) in repos {
        contents.push_str(&format!("{name} = \"{url}\"\n"));
    }
    fs::write(temp.path().join("duck.toml"), contents).expect("write config");
    temp
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn stdout_of(assert: &Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout")
}
