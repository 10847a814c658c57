#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const HAIRPIN: &str = "1 gggaaa\n7 ccc\n";

pub const TOY_SEQUENCE: &str = "1 gggaaacccaaa\n13 ggguuu\n";

/// Write `contents` to `name` inside `dir` and return the path
pub fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// The stemfold binary with the input file preset
pub fn stemfold(input: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stemfold").unwrap();
    cmd.arg("-i").arg(input).arg("-q");
    cmd
}

/// Runs stemfold and returns its stdout
pub fn run_stemfold(input: &Path, args: &[&str]) -> String {
    let output = stemfold(input).args(args).assert().success();
    String::from_utf8(output.get_output().stdout.clone()).unwrap()
}
