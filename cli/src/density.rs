use anyhow::{bail, Context, Result};
use clap::Args;
use featurelens::{
    dataset::Dataset,
    density::{density_surface, Grid, Surface},
    stats::class_moments,
};
use serde::Serialize;
use tracing::debug;

use crate::util::{print_json, InputArgs};

/// Per-class Gaussian likelihood surfaces over two features
#[derive(Debug, Args)]
#[command(version, about, long_about = None)]
pub struct DensityArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Label column
    #[arg(short, long)]
    target: String,
    /// The two feature columns, first two numeric columns by default
    #[arg(short, long, value_delimiter = ',')]
    features: Option<Vec<String>>,
    /// Grid ticks per axis
    #[arg(short, long, default_value_t = 50)]
    steps: usize,
    /// Grid padding as a fraction of each feature's range
    #[arg(short, long, default_value_t = 0.2)]
    padding: f64,
}

#[derive(Debug, Serialize)]
struct ClassDensity {
    label: String,
    count: usize,
    mean: Vec<f64>,
    surface: Surface,
}

#[derive(Debug, Serialize)]
struct DensityOutput {
    feature_names: Vec<String>,
    classes: Vec<ClassDensity>,
}

impl DensityArgs {
    /// An explicit feature list must name exactly the two plotted axes.
    fn check_features(&self) -> Result<()> {
        match &self.features {
            Some(f) if f.len() != 2 => {
                bail!("Density surfaces take exactly two features, got {}", f.len())
            }
            _ => Ok(()),
        }
    }
}

pub fn density_main(args: DensityArgs) -> Result<()> {
    args.check_features()?;
    let table = args.input.read_table()?;
    let dataset = Dataset::from_table(&table, &args.target, args.features.as_deref())
        .context("Building dataset")?;
    if dataset.n_features() < 2 {
        bail!("Density surfaces need two features, found {}", dataset.n_features());
    }
    let plane = dataset.select(&dataset.feature_names[..2])?;

    let grid = Grid::spanning(
        &plane.matrix.get_col(0)?,
        &plane.matrix.get_col(1)?,
        args.padding,
        args.steps,
    );
    let classes: Vec<ClassDensity> = class_moments(&plane.matrix, &plane.labels)?
        .into_iter()
        .map(|(label, moments)| {
            debug!(%label, count = moments.count, "class surface");
            ClassDensity {
                surface: density_surface(&grid, &moments.mean, &moments.covariance),
                label,
                count: moments.count,
                mean: moments.mean,
            }
        })
        .collect();

    print_json(&DensityOutput {
        feature_names: plane.feature_names,
        classes,
    })
}
