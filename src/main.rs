use anyhow::Context;
use clap::Parser;
use logwatch::cli::Cli;
use logwatch::{logging, ExitReason, LogWatcher};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version go to stdout and succeed
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(ExitReason::LogDeleted) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("logwatch: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitReason> {
    let config = cli.to_config().context("resolve log path")?;
    logging::init_logging(config.debug);

    let mut watcher = LogWatcher::open(&config)
        .with_context(|| format!("watch {}", config.log_path().display()))?;
    Ok(watcher.run()?)
}
