use hashbrown::HashMap;

use crate::runtime::{self, Runtime};

/// Serves preset files from memory.
#[derive(Default)]
pub struct MemoryRuntime {
    files: HashMap<String, String>,
}

impl MemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }
}

impl Runtime for MemoryRuntime {
    fn read_file(&self, path: &str) -> runtime::Result<Vec<u8>> {
        match self.files.get(path) {
            Some(content) => Ok(content.as_bytes().to_vec()),
            None => anyhow::bail!("No such file: {path}"),
        }
    }
}
