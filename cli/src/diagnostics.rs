use std::env;
use std::path::Path;
use std::process;

use colored::Colorize;

fn program() -> String {
    env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "anthem-preset".into())
}

pub fn note(msg: &str) {
    println!("{}: {}", program(), format!("note: {msg}").blue());
}

/// Report `err` and exit with a failure code.
pub fn fatal(err: &anyhow::Error) -> ! {
    eprintln!(
        "{}: {}",
        program(),
        format!("fatal error: {err:#}").red().bold()
    );
    process::exit(1);
}
