//! Shared helpers for driving the `wtr` binary in integration tests.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated store and scratch directory for one test.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, serde_json::to_vec_pretty(value).expect("encode json"))
            .expect("write json");
        path
    }

    /// Run `wtr` against this workspace's store.
    pub fn wtr(&self, args: &[&str]) -> Output {
        run_wtr(args, Some(&self.store_dir()))
    }
}

pub fn run_wtr(args: &[&str], store: Option<&Path>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wtr"));
    if let Some(store) = store {
        cmd.arg("--store").arg(store);
    }
    cmd.args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run wtr")
}

pub fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "wtr failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("parse wtr stdout as JSON")
}

pub fn section_names(script: &Value) -> Vec<String> {
    script
        .as_array()
        .expect("script array")
        .iter()
        .filter_map(|section| section["section"].as_str().map(str::to_string))
        .collect()
}
