use std::fs;

use anthem_presets::runtime;
use anyhow::Context;

/// Reads preset files from the local file system.
pub struct Local;

impl runtime::Runtime for Local {
    fn read_file(&self, path: &str) -> runtime::Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("Failed to read {path}"))
    }
}
