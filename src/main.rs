use clap::Parser;
use fods_minimizer::{batch, Mode};
use std::path::PathBuf;
use std::process::ExitCode;

/// Minimizes flat ODF spreadsheets (`.fods`) in place so that they diff and
/// merge well under version control.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory searched recursively for `.fods` files. Files starting with `_` are skipped.
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Report files that are not minimized without rewriting them.
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    pretty_env_logger::formatted_builder()
        .filter_module("fods_minimizer", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    log::debug!("Root directory is {:?}", args.root);

    let mode = if args.check { Mode::Check } else { Mode::Write };
    if batch::run(&args.root, mode).is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
