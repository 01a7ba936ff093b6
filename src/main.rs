//! Command-line front end: reads a CSV file and writes its PDF report.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use csvreport::report::{self, FontSet};

/// Generate a PDF summary report from a CSV file
#[derive(Parser, Debug)]
#[command(name = "csvreport", version, about, long_about = None)]
struct Args {
    /// CSV file to summarize
    #[arg(short, long, value_name = "FILE", default_value = "data.csv")]
    input: PathBuf,

    /// Where to write the report
    #[arg(short, long, value_name = "FILE", default_value = "report.pdf")]
    output: PathBuf,

    /// Directory searched first for the DejaVu Sans Condensed fonts
    #[arg(long, value_name = "DIR")]
    font_dir: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if !args.input.exists() {
        println!("File {} not found!", args.input.display());
        return ExitCode::FAILURE;
    }

    println!("Starting PDF report generation...");
    let fonts = FontSet::discover(args.font_dir.as_deref());
    if report::generate_report_with_fonts(&args.input, &args.output, &fonts) {
        println!("Report generation completed successfully!");
        ExitCode::SUCCESS
    } else {
        println!("An error occurred while generating the report");
        ExitCode::FAILURE
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
