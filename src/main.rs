//! CLI entrypoint for mfdread.

use std::error::Error;
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use log::debug;

use mfdread::report::{Dump, Report, ReportOptions, build_report};

mod cli;
mod render;

use cli::Cli;
use render::Palette;

type BoxError = Box<dyn Error>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut stdout = io::stdout().lock();
    let colored = !cli.no_color && stdout.is_terminal();
    let result = open_input(&cli).and_then(|input| run(&cli, input, &mut stdout, colored));
    finish(result, &mut io::stderr().lock())
}

fn open_input(cli: &Cli) -> Result<Box<dyn Read>, BoxError> {
    if cli.reads_stdin() {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(&cli.input)
        .map_err(|e| format!("error opening the input file {}: {e}", cli.input.display()))?;
    Ok(Box::new(file))
}

fn run<R: Read, W: Write>(cli: &Cli, input: R, out: &mut W, colored: bool) -> Result<(), BoxError> {
    let dump = Dump::read_from(input)?;
    let options = ReportOptions {
        force_1k: cli.force_1k,
    };
    let report = build_report(dump.as_bytes(), options)?;
    debug!(
        "{} blocks decoded, {} with inconsistent access bits",
        report.blocks.len(),
        report.error_count()
    );

    if cli.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write_table(out, &report, Palette::new(colored))?;
    }
    Ok(())
}

fn write_table<W: Write>(w: &mut W, report: &Report, palette: Palette) -> io::Result<()> {
    w.write_all(render::table(report, palette).as_bytes())?;
    w.flush()
}

/// Report a fatal error on `err` and pick the exit status. Written directly
/// rather than logged so that no `RUST_LOG` filter can hide it.
fn finish<W: Write>(result: Result<(), BoxError>, err: &mut W) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "mfdread: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("mfdread").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn wrong_size_is_reported_on_stderr() {
        let mut out = Vec::new();
        let result = run(&cli(&["-"]), &[0u8; 100][..], &mut out, false);
        let mut err = Vec::new();
        assert_eq!(finish(result, &mut err), ExitCode::FAILURE);
        let msg = String::from_utf8(err).unwrap();
        assert!(msg.starts_with("mfdread: wrong dump size: 100 bytes"), "{msg}");
        assert!(out.is_empty());
    }

    #[test]
    fn valid_dump_succeeds_silently() {
        let mut out = Vec::new();
        let result = run(&cli(&["-n", "-"]), &[0u8; 320][..], &mut out, false);
        let mut err = Vec::new();
        assert_eq!(finish(result, &mut err), ExitCode::SUCCESS);
        assert!(err.is_empty());
        assert!(String::from_utf8(out).unwrap().contains("Expected 5 sectors"));
    }

    #[test]
    fn json_output_is_valid() {
        let mut out = Vec::new();
        run(&cli(&["-j", "-"]), &[0u8; 1024][..], &mut out, false).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["sector_count"], 16);
        assert_eq!(v["blocks"][3]["error"], true);
    }
}
