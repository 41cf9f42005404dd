//! Command-line interface parsing.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

const LONG_ABOUT: &str = "Parse a MIFARE Classic dump FILE and show keys, access bits and permissions per block.

Accepted dump sizes are 320 (Mini), 1024 (1K), 2048 (2K) and 4096 (4K) bytes.
Use - as FILE to read the dump from standard input.";

#[derive(Parser, Debug)]
#[command(
    name = "mfdread",
    version,
    about = "MIFARE Classic dump decoder",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        value_name = "FILE",
        long_help = "Dump file to decode, or - for standard input."
    )]
    pub input: PathBuf,
    #[arg(
        short = '1',
        long = "force-1k",
        action = ArgAction::SetTrue,
        long_help = "Interpret the dump as a 1K card and ignore everything past the first 1024 bytes."
    )]
    pub force_1k: bool,
    #[arg(
        short = 'n',
        long = "no-color",
        action = ArgAction::SetTrue,
        long_help = "Do not colorize the output. Colors are also off when stdout is not a terminal."
    )]
    pub no_color: bool,
    #[arg(
        short = 'j',
        long = "json",
        action = ArgAction::SetTrue,
        long_help = "Print the report as JSON instead of a table."
    )]
    pub json: bool,
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        long_help = "Raise the log level on stderr by one step per flag: warn, info, debug, trace."
    )]
    pub verbose: u8,
}

impl Cli {
    /// Whether the input is standard input.
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }

    /// Log filter for the requested verbosity.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
