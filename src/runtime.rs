use alloc::vec::Vec;

pub type Result<T> = anyhow::Result<T>;

/// Access to the files the presets are read from.
pub trait Runtime: 'static {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
}
