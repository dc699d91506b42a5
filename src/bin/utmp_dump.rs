// src/bin/utmp_dump.rs

//! Driver program _utmp-dump_ drives the [_utmplib_].
//!
//! Processes user-passed command-line arguments, reads all records of the
//! passed utmp/wtmp file with a [`UtmpReader`], then writes them with an
//! [`Exporter`].
//!
//! Any error is printed to stderr and the process exits with a failure
//! status. An unsupported `--format` is rejected during argument
//! processing, before the file is read.
//!
//! [_utmplib_]: utmplib
//! [`UtmpReader`]: utmplib::readers::utmpreader::UtmpReader
//! [`Exporter`]: utmplib::printer::exporter::Exporter

#![allow(non_camel_case_types)]

use std::process::ExitCode;
use std::str::FromStr;

use ::anyhow::Context;
use ::clap::Parser;
use ::const_format::concatcp;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use ::utmplib::common::FPath;
use ::utmplib::data::datetime::{parse_tz_offset, TimeZoneSrc};
use ::utmplib::{e_err, e_wrn};
use ::utmplib::printer::exporter::{Destination, ExportFormat, Exporter};
use ::utmplib::readers::utmpreader::{PosToEntry, Truncation, UtmpReader};

const CLI_HELP_AFTER: &str = concatcp!(
    r#"Record timestamps are printed as "YYYY-MM-DD HH:MM:SS" in the local
system timezone unless --tz-offset is passed.

Records are keyed by their 1-based position in the file.

---

Version: "#, env!("CARGO_PKG_VERSION"), r#"
MSRV: "#, env!("CARGO_PKG_RUST_VERSION"), r#"
License: "#, env!("CARGO_PKG_LICENSE"), r#"
"#
);

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    name = "utmp-dump",
    version = env!("CARGO_PKG_VERSION"),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of a utmp, wtmp, or btmp file.
    #[clap(
        required = true,
        verbatim_doc_comment,
    )]
    src: String,

    /// Output file. Standard output if not passed or passed "stdout".
    #[clap(
        short = 'd',
        long = "dst",
        verbatim_doc_comment,
    )]
    dst: Option<String>,

    /// Output format: "json", "yaml", or "yml".
    #[clap(
        short = 'f',
        long = "format",
        verbatim_doc_comment,
        default_value = "json",
        value_parser = cli_process_format,
    )]
    format: ExportFormat,

    /// Append to the output file instead of overwriting it.
    #[clap(
        short = 'a',
        long = "append",
        verbatim_doc_comment,
    )]
    append: bool,

    /// Timezone offset for printed timestamps.
    /// Example values, "+12", "-0800", "+02:00", or "Z".
    /// To pass a value with leading "-" use "=" notation, e.g. "-t=-0800".
    /// If not passed then the local system timezone is used.
    #[clap(
        short = 't',
        long = "tz-offset",
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
    )]
    tz_offset: Option<TimeZoneSrc>,

    /// Fail if the file ends with a partial record.
    /// By default a trailing partial record is ignored.
    #[clap(
        long = "strict",
        verbatim_doc_comment,
    )]
    strict: bool,

    /// Print a summary of the file read to stderr.
    #[clap(
        short = 's',
        long = "summary",
        verbatim_doc_comment,
    )]
    summary: bool,
}

/// `clap` argument processor for `--format`.
fn cli_process_format(format: &str) -> std::result::Result<ExportFormat, String> {
    ExportFormat::from_str(format).map_err(|err| err.to_string())
}

/// `clap` argument processor for `--tz-offset`.
fn cli_process_tz_offset(tzo: &str) -> std::result::Result<TimeZoneSrc, String> {
    parse_tz_offset(tzo).map(TimeZoneSrc::Fixed)
}

/// Read the `src` file then export its records.
fn process(args: &CLI_Args) -> anyhow::Result<()> {
    defn!();
    let truncation: Truncation = match args.strict {
        true => Truncation::Strict,
        false => Truncation::Lenient,
    };
    let tz: TimeZoneSrc = args.tz_offset.unwrap_or_default();
    let mut utmpreader = UtmpReader::new(FPath::from(args.src.as_str()), tz, truncation);
    let entries: PosToEntry = utmpreader
        .read()
        .context("reading records failed")?;
    defo!("read {} entries", entries.len());
    let summary = utmpreader.summary();
    if summary.utmpreader_trailing_bytes != 0 {
        e_wrn!(
            "{:?}: discarded {} trailing bytes of a partial record",
            summary.utmpreader_path, summary.utmpreader_trailing_bytes
        );
    }

    let destination = Destination::from_dst(args.dst.as_deref(), args.append);
    let exporter = Exporter::new(args.format, destination);
    exporter
        .export(&entries)
        .with_context(|| format!("exporting {} records as {} failed", entries.len(), args.format))?;

    if args.summary {
        eprintln!("{}", summary);
    }
    defx!();

    Ok(())
}

pub fn main() -> ExitCode {
    let args = CLI_Args::parse();
    defñ!("{:?}", args);

    match process(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
