use anyhow::Result;
use clap::Args;
use featurelens::synthetic::Preset;

use crate::util::DemoData;

/// Write one of the demo datasets as CSV
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct SynthArgs {
    /// Which dataset to generate
    #[arg(value_enum)]
    preset: DemoData,
    /// Random seed, the same seed gives the same rows
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// CSV delimiter
    #[arg(long, default_value_t = String::from(","))]
    csv_delim: String,
}

pub fn synth_main(args: SynthArgs) -> Result<()> {
    let table = Preset::from(args.preset).generate(args.seed)?;
    println!("{}", table.to_csv(&args.csv_delim));
    Ok(())
}
