//! Whole-file load/save wrappers.
//!
//! The rewrite loop deliberately does one full read and one full overwrite
//! per processed address; the site counts involved are small.

use anyhow::{Context, Result};
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file {}", path.display()))
}
