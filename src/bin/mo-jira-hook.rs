use std::process;

use mo_tools::cli::HookArgs;
use mo_tools::error::{self, Result};
use mo_tools::hook::{self, FAILURE_EXIT_CODE};
use mo_tools::HookConfig;

fn main() {
    env_logger::init();

    let argv: Vec<String> = std::env::args().collect();
    let mut admin = HookConfig::default().admin;

    let result = (|| -> Result<()> {
        hook::exit_on_interrupt()?;
        let args = HookArgs::parse_args(&argv)?;
        let repo_dir = std::env::current_dir()?;
        let config = HookConfig::load(&repo_dir)?;
        admin = config.admin.clone();
        hook::run(&args, &repo_dir, &config)
    })();

    if let Err(err) = result {
        println!("{}", error::report(&err, &argv, &admin));
        process::exit(FAILURE_EXIT_CODE);
    }
}
