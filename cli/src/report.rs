use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use featurelens::{
    report::{analyze_table, AnalysisConfig},
    synthetic::Preset,
};
use tracing::info;

use crate::util::{print_json, DemoData, InputArgs, Model};

/// Everything the dashboard shows for one feature selection
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct ReportArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Use a generated demo dataset instead of reading a file
    #[arg(value_enum, long, conflicts_with = "filename")]
    preset: Option<DemoData>,
    /// Seed for --preset
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// JSON file with analysis settings, overridden by the flags below
    #[arg(long)]
    config: Option<PathBuf>,
    /// Label column
    #[arg(short, long)]
    target: Option<String>,
    /// Comma separated feature columns, every numeric column by default
    #[arg(short, long, value_delimiter = ',')]
    features: Option<Vec<String>>,
    /// Classifier to train
    #[arg(value_enum, short, long)]
    model: Option<Model>,
    /// Run PCA on raw values instead of z-scores
    #[arg(long)]
    raw: bool,
    /// Density grid ticks per axis
    #[arg(short, long)]
    steps: Option<usize>,
}

impl ReportArgs {
    fn config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Reading config {}", path.to_string_lossy()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Parsing config {}", path.to_string_lossy()))?
            }
            None => AnalysisConfig::default(),
        };

        if let Some(target) = &self.target {
            config.target = target.clone();
        } else if config.target.is_empty() {
            if let Some(preset) = self.preset {
                config.target = Preset::from(preset).target().to_string();
            }
        }
        if let Some(features) = &self.features {
            config.features = Some(features.clone());
        }
        if let Some(model) = self.model {
            config.model = model.into();
        }
        if self.raw {
            config.normalize = false;
        }
        if let Some(steps) = self.steps {
            config.surface_steps = steps;
        }
        Ok(config)
    }
}

pub fn report_main(args: ReportArgs) -> Result<()> {
    let config = args.config()?;
    if config.target.is_empty() {
        anyhow::bail!("No target column. Pass --target or set it in --config");
    }

    let table = match args.preset {
        Some(preset) => Preset::from(preset).generate(args.seed)?,
        None => args.input.read_table()?,
    };
    info!(rows = table.len(), target = %config.target, "loaded table");

    let report = analyze_table(&table, &config)?;
    print_json(&report)
}
