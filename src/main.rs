mod cli;

use breakpoint_sources::console::Console;
use breakpoint_sources::logging::{init_logging, LogConfig, LogFormat};
use breakpoint_sources::snapshot::Snapshot;
use breakpoint_sources::{dap, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command) {
        error!(error = %e, "exiting with error");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Dap => dap::run_dap_mode(),
        Command::Console => run_interactive_mode(),
        Command::Aggregate { snapshot, pretty } => {
            let groups = Snapshot::load(&snapshot)?.aggregate();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if pretty {
                serde_json::to_writer_pretty(&mut out, &groups)?;
            } else {
                serde_json::to_writer(&mut out, &groups)?;
            }
            writeln!(out)?;
            Ok(())
        }
    }
}

fn run_interactive_mode() -> Result<()> {
    info!("starting interactive console");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let interactive = stdin.is_terminal();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    if !interactive {
        console = console.without_prompt();
    }
    console.run()
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        use_env_filter: cli.log_level.is_none(),
        log_file: cli.log_file.clone(),
        with_ansi: cli.log_file.is_none() && io::stderr().is_terminal(),
        ..LogConfig::default()
    };
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config
}
