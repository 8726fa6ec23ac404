use anyhow::Result;
use clap::Parser;
use playscan::cli::Cli;

fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let cli = Cli::parse();
    playscan::run(&cli)
}
