use anyhow::{Context, Result};
use clap::Args;
use featurelens::{
    dataset::{feature_matrix, numeric_features},
    linalg::Matrix,
    pca::{run_pca, Pca},
    stats::standardize,
};
use serde::Serialize;
use tracing::info;

use crate::util::{print_json, InputArgs};

/// Principal component analysis
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct PcaArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Comma separated feature columns, every numeric column by default
    #[arg(short, long, value_delimiter = ',')]
    features: Option<Vec<String>>,
    /// Column echoed next to each projected row
    #[arg(short, long)]
    target: Option<String>,
    /// Z-score each feature first
    #[arg(short, long)]
    normalize: bool,
    /// Number of components to project onto
    #[arg(long, default_value_t = 3)]
    components: usize,
}

#[derive(Debug, Serialize)]
struct PcaOutput {
    feature_names: Vec<String>,
    pca: Pca,
    projections: Matrix,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<String>>,
}

pub fn pca_main(args: PcaArgs) -> Result<()> {
    let table = args.input.read_table()?;

    let feature_names = match args.features {
        Some(f) => f,
        None => numeric_features(&table, args.target.as_deref()),
    };
    let mut matrix = feature_matrix(&table, &feature_names).context("Building feature matrix")?;
    if args.normalize {
        matrix = standardize(&matrix);
    }
    let labels = args.target
        .map(|t| table.text(&t))
        .transpose()
        .context("Reading target column")?;

    let pca = run_pca(&matrix);
    info!(iterations = pca.iterations, converged = pca.converged, "pca done");
    let projections = pca.project(&matrix, args.components).context("Projecting onto components")?;

    print_json(&PcaOutput {
        feature_names,
        pca,
        projections,
        labels,
    })
}
