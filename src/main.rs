use anyhow::Result;
use clap::Parser;

use issue_digest::cli::Cli;
use issue_digest::utils::load_env_files;

fn main() -> Result<()> {
    // .env values have to be in place before RUST_LOG and the env-backed
    // flags are read
    load_env_files();
    issue_digest::setup_logging();

    let cli = Cli::parse();

    issue_digest::run(&cli)
}
