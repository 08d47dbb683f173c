use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::config::InterpolationError;

#[derive(Debug)]
pub enum PresetError {
    /// None of the candidate preset files could be read and parsed.
    PresetFileNotFound { tried: Vec<String> },
    PresetNotFound(String),
    /// Options of the preset (or any of its mixins) referenced unknown substitutions.
    MissingPresetOptions { preset: String, missing: Vec<String> },
    MixinNotFound { preset: String, mixin: String },
    /// A preset mixes itself in, directly or through other mixins.
    MixinCycle { chain: Vec<String> },
    Interpolation {
        section: String,
        option: String,
        source: InterpolationError,
    },
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PresetError::PresetFileNotFound { tried } => {
                write!(f, "preset file not found (tried {tried:?})")
            }
            PresetError::PresetNotFound(name) => write!(f, "preset '{name}' not found"),
            PresetError::MissingPresetOptions { preset, missing } => write!(
                f,
                "missing option(s) for preset '{preset}': {}",
                missing.join(", ")
            ),
            PresetError::MixinNotFound { preset, mixin } => {
                write!(f, "preset '{preset}' mixes in unknown preset '{mixin}'")
            }
            PresetError::MixinCycle { chain } => {
                write!(f, "mixin cycle detected: {}", chain.join(" -> "))
            }
            PresetError::Interpolation {
                section,
                option,
                source,
            } => write!(f, "bad value for '{option}' in [{section}]: {source}"),
        }
    }
}

impl core::error::Error for PresetError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            PresetError::Interpolation { source, .. } => Some(source),
            _ => None,
        }
    }
}
