use anthem_presets::Presets;
use anyhow::Context;
use log::LevelFilter;

mod cli;
mod diagnostics;
mod runtime;

use runtime::Local;

fn main() {
    let args = cli::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(args) {
        diagnostics::fatal(&e);
    }
}

fn run(args: cli::Args) -> anyhow::Result<()> {
    log::debug!("Parsed arguments: {args:?}");

    let mut presets = Presets::new(Local);
    for file in args.preset_files() {
        presets.file(file);
    }

    if args.show_presets {
        let mut names = presets.names()?;
        names.sort();
        names.dedup();
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    for sub in &args.substitutions {
        presets.substitution(&sub.name, &sub.value);
    }

    let preset = args.preset.context("No preset specified")?;
    let options = presets.options(&preset)?;

    diagnostics::note(&format!("using preset '{preset}', which expands to"));
    println!();
    println!("{}", invocation(&args.build_script, &options)?);
    println!();

    Ok(())
}

/// The shell command line running `build_script` with `options`.
fn invocation(build_script: &str, options: &[String]) -> anyhow::Result<String> {
    let words = std::iter::once(build_script).chain(options.iter().map(String::as_str));
    shlex::try_join(words).context("Preset options cannot be quoted for the shell")
}
