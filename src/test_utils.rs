//! Test utilities shared across the codebase

use std::fs;
use std::path::{Path, PathBuf};

/// Write a fixture file below `dir`, creating intermediate directories.
/// Returns the path of the written file.
pub fn write_fixture(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture");
    path
}
