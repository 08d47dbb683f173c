use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;

/// Candidate preset files used when no `--preset-file` is given.
pub const DEFAULT_PRESET_FILE: &str = "utils/build-presets.ini";
pub const USER_PRESET_FILE: &str = ".anthem-build-presets";

#[derive(Parser, Debug)]
#[command(name = "anthem-preset")]
#[command(about = "Expand build presets into a build script invocation")]
#[command(version)]
pub struct Args {
    /// Preset file to read (can be used multiple times, the first one that loads is used)
    #[arg(long = "preset-file", value_name = "path")]
    pub preset_files: Vec<PathBuf>,

    /// Preset to expand
    #[arg(
        long,
        value_name = "name",
        conflicts_with = "show_presets",
        required_unless_present = "show_presets"
    )]
    pub preset: Option<String>,

    /// List the available presets
    #[arg(long)]
    pub show_presets: bool,

    /// Build script the expanded options are passed to
    #[arg(long, value_name = "path", default_value = "build-anthem")]
    pub build_script: String,

    /// Print debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Values for `%(name)s` references in the presets
    #[arg(value_name = "name=value")]
    pub substitutions: Vec<Substitution>,
}

impl Args {
    /// The preset files to try, in order.
    pub fn preset_files(&self) -> Vec<String> {
        let files = if self.preset_files.is_empty() {
            default_preset_files()
        } else {
            self.preset_files.clone()
        };
        files
            .into_iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect()
    }
}

fn default_preset_files() -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Some(home) = dirs::home_dir() {
        files.push(home.join(USER_PRESET_FILE));
    }
    files.push(PathBuf::from(DEFAULT_PRESET_FILE));
    files
}

#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub name: String,
    pub value: String,
}

impl FromStr for Substitution {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once("=")
            .context("No value specified for substitution")?;
        if name.is_empty() {
            anyhow::bail!("No name specified for substitution");
        }
        Ok(Substitution {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution() {
        let sub: Substitution = "toolchain=/opt/llvm=17".parse().unwrap();
        assert_eq!(sub.name, "toolchain");
        assert_eq!(sub.value, "/opt/llvm=17");

        let sub: Substitution = "empty=".parse().unwrap();
        assert_eq!(sub.value, "");

        "novalue".parse::<Substitution>().unwrap_err();
        "=value".parse::<Substitution>().unwrap_err();
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from([
            "anthem-preset",
            "--preset-file",
            "a.ini",
            "--preset-file=b.ini",
            "--preset",
            "buildbot",
            "install_destdir=/tmp/install",
        ])
        .unwrap();

        assert_eq!(args.preset.as_deref(), Some("buildbot"));
        assert_eq!(args.preset_files(), vec!["a.ini", "b.ini"]);
        assert_eq!(
            args.substitutions,
            vec![Substitution {
                name: "install_destdir".into(),
                value: "/tmp/install".into()
            }]
        );
        assert_eq!(args.build_script, "build-anthem");
    }

    #[test]
    fn test_default_preset_files() {
        let args = Args::try_parse_from(["anthem-preset", "--show-presets"]).unwrap();
        let files = args.preset_files();

        assert_eq!(files.last().map(String::as_str), Some(DEFAULT_PRESET_FILE));
    }

    #[test]
    fn test_preset_or_show_presets_required() {
        Args::try_parse_from(["anthem-preset"]).unwrap_err();
        Args::try_parse_from(["anthem-preset", "--preset", "a", "--show-presets"]).unwrap_err();
    }
}
