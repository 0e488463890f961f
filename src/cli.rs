use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "breakpoint-sources", version, about = "Breakpoints panel backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level; `RUST_LOG` applies when omitted.
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevelArg>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve DAP-style requests on stdin/stdout.
    #[command(alias = "debug-adapter")]
    Dap,
    /// Interactive console on the terminal.
    Console,
    /// Print the panel groups for a JSON snapshot.
    Aggregate {
        snapshot: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
