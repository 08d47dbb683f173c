use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::debug;

use crate::config::{InterpolationError, Store};
use crate::error::PresetError;

pub const PRESET_PREFIX: &str = "preset: ";

const MIXIN_KEY: &str = "mixin-preset";
const DASH_DASH_KEY: &str = "dash-dash";

/// The options a preset expands to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedOptions {
    /// Options for the build script itself.
    pub script_opts: Vec<String>,
    /// Options forwarded to the build script implementation, after `--`.
    pub impl_opts: Vec<String>,
    /// Substitutions referenced by options but not defined.
    pub missing_opts: Vec<String>,
}

impl ResolvedOptions {
    fn extend(&mut self, other: ResolvedOptions) {
        self.script_opts.extend(other.script_opts);
        self.impl_opts.extend(other.impl_opts);
        self.missing_opts.extend(other.missing_opts);
    }

    pub fn is_empty(&self) -> bool {
        self.script_opts.is_empty() && self.impl_opts.is_empty()
    }

    /// `script_opts`, then `--`, then `impl_opts`.
    pub fn into_arguments(self) -> Vec<String> {
        let mut args = self.script_opts;
        args.push("--".into());
        args.extend(self.impl_opts);
        args
    }
}

pub fn section_name(preset: &str) -> String {
    format!("{PRESET_PREFIX}{preset}")
}

pub fn preset_name(section: &str) -> Option<&str> {
    section.strip_prefix(PRESET_PREFIX)
}

/// Expand `preset` and all of its mixins. Returns `None` when the store has
/// no such preset.
pub fn resolve(store: &Store, preset: &str) -> Result<Option<ResolvedOptions>, PresetError> {
    if !store.has_section(&section_name(preset)) {
        return Ok(None);
    }
    let mut stack = Vec::new();
    resolve_preset(store, preset, &mut stack).map(Some)
}

fn resolve_preset(
    store: &Store,
    preset: &str,
    stack: &mut Vec<String>,
) -> Result<ResolvedOptions, PresetError> {
    if let Some(pos) = stack.iter().position(|p| p == preset) {
        let mut chain = stack[pos..].to_vec();
        chain.push(preset.to_string());
        return Err(PresetError::MixinCycle { chain });
    }

    let section = section_name(preset);
    let keys: Vec<&str> = store.options(&section).into_iter().flatten().collect();

    stack.push(preset.to_string());

    let mut resolved = ResolvedOptions::default();
    let mut dash_dash_seen = false;

    for key in keys {
        let value = match store.get(&section, key) {
            Ok(value) => value.unwrap_or_default(),
            Err(InterpolationError::MissingOption { reference, .. }) => {
                resolved.missing_opts.push(reference);
                continue;
            }
            Err(source) => {
                return Err(PresetError::Interpolation {
                    section: section.clone(),
                    option: key.to_string(),
                    source,
                });
            }
        };

        if store.substitutions().contains_key(key) {
            continue;
        }

        match key {
            MIXIN_KEY => {
                let mixins = value.lines().map(str::trim).filter(|m| !m.is_empty());
                for mixin in mixins {
                    if !store.has_section(&section_name(mixin)) {
                        return Err(PresetError::MixinNotFound {
                            preset: preset.to_string(),
                            mixin: mixin.to_string(),
                        });
                    }
                    debug!("Mixing preset '{mixin}' into '{preset}'");
                    let base = resolve_preset(store, mixin, stack)?;
                    resolved.extend(base);
                }
            }
            // The separator only applies to the options of this section
            DASH_DASH_KEY => dash_dash_seen = true,
            _ => {
                let opt = if value.is_empty() {
                    format!("--{key}")
                } else {
                    format!("--{key}={value}")
                };
                if dash_dash_seen {
                    resolved.impl_opts.push(opt);
                } else {
                    resolved.script_opts.push(opt);
                }
            }
        }
    }

    stack.pop();
    Ok(resolved)
}
