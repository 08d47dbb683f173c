#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod error;
pub mod resolver;
pub mod runtime;

#[cfg(test)]
mod testing;

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::debug;

use crate::config::{Store, Substitutions};
pub use crate::error::PresetError;
pub use crate::resolver::ResolvedOptions;

/// Expand `preset` from the first loadable file in `files` into build-script
/// arguments: the script options, `--`, then the implementation options.
pub fn get_preset_options(
    runtime: &dyn runtime::Runtime,
    substitutions: &Substitutions,
    files: &[String],
    preset: &str,
) -> Result<Vec<String>, PresetError> {
    let store = Store::load(runtime, files, substitutions)?;

    let Some(resolved) = resolver::resolve(&store, preset)? else {
        return Err(PresetError::PresetNotFound(preset.to_string()));
    };

    if !resolved.missing_opts.is_empty() {
        return Err(PresetError::MissingPresetOptions {
            preset: preset.to_string(),
            missing: resolved.missing_opts,
        });
    }

    if resolved.is_empty() {
        return Err(PresetError::PresetNotFound(preset.to_string()));
    }

    debug!(
        "Preset '{preset}' expands to {} script and {} impl options",
        resolved.script_opts.len(),
        resolved.impl_opts.len()
    );

    Ok(resolved.into_arguments())
}

/// Names of all presets in the first loadable file in `files`.
pub fn get_all_preset_names(
    runtime: &dyn runtime::Runtime,
    files: &[String],
) -> Result<Vec<String>, PresetError> {
    let store = Store::load(runtime, files, &Substitutions::new())?;
    Ok(store
        .section_names()
        .filter_map(resolver::preset_name)
        .map(String::from)
        .collect())
}

pub struct Presets {
    runtime: Box<dyn runtime::Runtime>,
    files: Vec<String>,
    substitutions: Substitutions,
}

impl Presets {
    pub fn new(runtime: impl runtime::Runtime) -> Self {
        let runtime = Box::new(runtime);
        Self {
            runtime,
            files: Vec::new(),
            substitutions: Default::default(),
        }
    }

    /// Add a candidate preset file. Candidates are tried in the order added.
    pub fn file(&mut self, path: impl Into<String>) -> &mut Self {
        self.files.push(path.into());
        self
    }

    pub fn substitution(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.substitutions.insert(name.into(), value.into());
        self
    }

    pub fn options(&self, preset: &str) -> Result<Vec<String>, PresetError> {
        get_preset_options(&*self.runtime, &self.substitutions, &self.files, preset)
    }

    pub fn names(&self) -> Result<Vec<String>, PresetError> {
        get_all_preset_names(&*self.runtime, &self.files)
    }
}
