use std::process;

use clap::Parser;
use colored::Colorize;

use mo_tools::cli::HighlightArgs;
use mo_tools::highlight;

fn main() {
    env_logger::init();

    let args = HighlightArgs::parse();

    if let Err(err) = highlight::run(args) {
        eprintln!("{} {}", "x".red(), err);
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}
