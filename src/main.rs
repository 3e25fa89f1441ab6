use anyhow::Context;
use clap::Parser;
use magicsort::cli::{Cli, run_cli};
use magicsort::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    run_cli(&cli).with_context(|| {
        format!(
            "could not organize {} into {}",
            cli.source.display(),
            cli.destination.display()
        )
    })?;
    Ok(())
}
