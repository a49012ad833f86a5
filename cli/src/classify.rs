use anyhow::{Context, Result};
use clap::Args;
use featurelens::{classify::ModelKind, dataset::Dataset, metrics::Metrics, report::classify};
use serde::Serialize;

use crate::util::{print_json, InputArgs, Model};

/// Train a classifier and score it on the same rows
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct ClassifyArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Label column
    #[arg(short, long)]
    target: String,
    /// Comma separated feature columns, every numeric column by default
    #[arg(short, long, value_delimiter = ',')]
    features: Option<Vec<String>>,
    /// Classifier to train
    #[arg(value_enum, short, long, default_value_t = Model::Bayes)]
    model: Model,
    /// Z-score each feature first
    #[arg(short, long)]
    normalize: bool,
}

#[derive(Debug, Serialize)]
struct ClassifyOutput {
    model: ModelKind,
    feature_names: Vec<String>,
    metrics: Metrics,
}

pub fn classify_main(args: ClassifyArgs) -> Result<()> {
    let table = args.input.read_table()?;
    let mut dataset = Dataset::from_table(&table, &args.target, args.features.as_deref())
        .context("Building dataset")?;
    if args.normalize {
        dataset = dataset.standardized();
    }

    let model = ModelKind::from(args.model);
    let metrics = classify(&dataset, model)?;

    print_json(&ClassifyOutput {
        model,
        feature_names: dataset.feature_names,
        metrics,
    })
}
