mod classify;
mod density;
mod pca;
mod report;
mod synth;
mod util;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use classify::ClassifyArgs;
use density::DensityArgs;
use pca::PcaArgs;
use report::ReportArgs;
use synth::SynthArgs;
use tracing_subscriber::EnvFilter;

/// Feature analysis and classification for tabular data
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// More logging on stderr, repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    tool: Tool,
}

#[derive(Subcommand, Debug)]
enum Tool {
    /// Principal component analysis
    #[command(version, about, long_about = None)]
    Pca(PcaArgs),

    /// Train a classifier and report accuracy, precision, recall and F1
    #[command(version, about, long_about = None)]
    Classify(ClassifyArgs),

    /// Per-class Gaussian density surfaces
    #[command(version, about, long_about = None)]
    Density(DensityArgs),

    /// Full dashboard report as JSON
    #[command(version, about, long_about = None)]
    Report(ReportArgs),

    /// Generate a demo dataset
    #[command(version, about, long_about = None)]
    Synth(SynthArgs),
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.tool {
        Tool::Pca(args) => pca::pca_main(args),
        Tool::Classify(args) => classify::classify_main(args),
        Tool::Density(args) => density::density_main(args),
        Tool::Report(args) => report::report_main(args),
        Tool::Synth(args) => synth::synth_main(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
