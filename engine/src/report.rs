//! The full dashboard computation for one configuration: baseline and
//! current classification scores, PCA with projections, and per-class
//! likelihood surfaces over the first two selected features.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::ModelKind;
use crate::dataset::Dataset;
use crate::density::{density_surface, Grid, Surface};
use crate::linalg::{Matrix, SquareMatrix};
use crate::metrics::{calculate_metrics, Metrics};
use crate::pca::{run_pca, Pca};
use crate::stats::class_moments;
use crate::table::Table;

/// Everything a report depends on. Two equal configs over the same data
/// give equal reports, so this doubles as a cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub target: String,
    /// `None` selects every numeric column except the target.
    pub features: Option<Vec<String>>,
    /// Z-score features before PCA.
    pub normalize: bool,
    pub model: ModelKind,
    pub surface_steps: usize,
    pub surface_padding: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            features: None,
            normalize: true,
            model: ModelKind::default(),
            surface_steps: 50,
            surface_padding: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub label: String,
    pub pc1: f64,
    pub pc2: f64,
    pub pc3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSurface {
    pub mean: Vec<f64>,
    pub covariance: SquareMatrix,
    pub surface: Surface,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub target_name: String,
    pub feature_names: Vec<String>,
    pub model: ModelKind,
    /// Scores using every numeric feature.
    pub baseline: Metrics,
    /// Scores using the selected features, absent when none are selected.
    pub current: Option<Metrics>,
    /// Absent when fewer than two features or three rows are selected.
    pub pca: Option<Pca>,
    pub projections: Vec<Projection>,
    pub surfaces: BTreeMap<String, ClassSurface>,
}

/// Build the dataset described by `config` from `table` and analyze it.
pub fn analyze_table(table: &Table, config: &AnalysisConfig) -> Result<Report> {
    let all = Dataset::from_table(table, &config.target, None)
        .with_context(|| format!("Extract features for target {}", config.target))?;
    analyze(&all, config)
}

/// `all` holds every candidate feature; `config.features` narrows it down.
pub fn analyze(all: &Dataset, config: &AnalysisConfig) -> Result<Report> {
    let selected = match &config.features {
        Some(features) => all.select(features).context("Select features")?,
        None => all.clone(),
    };
    info!(
        rows = selected.n_rows(),
        features = selected.n_features(),
        model = ?config.model,
        "running analysis"
    );

    let baseline = classify(all, config.model).context("Baseline classification")?;
    let current = if selected.n_features() == 0 {
        debug!("no features selected, skipping current scores");
        None
    } else {
        Some(classify(&selected, config.model).context("Classification on selected features")?)
    };

    let pca_input = if config.normalize {
        selected.standardized()
    } else {
        selected.clone()
    };
    let (pca, projections) = if Pca::is_meaningful(pca_input.n_rows(), pca_input.n_features()) {
        let pca = run_pca(&pca_input.matrix);
        let projections = project(&pca, &pca_input).context("Projecting onto components")?;
        (Some(pca), projections)
    } else {
        debug!("too few rows or features for pca");
        (None, Vec::new())
    };

    let surfaces = surfaces(&selected, config.surface_padding, config.surface_steps)
        .context("Class density surfaces")?;

    Ok(Report {
        target_name: selected.target_name.clone(),
        feature_names: selected.feature_names.clone(),
        model: config.model,
        baseline,
        current,
        pca,
        projections,
        surfaces,
    })
}

/// Fit on the whole dataset and score the predictions on the same rows.
pub fn classify(dataset: &Dataset, model: ModelKind) -> Result<Metrics> {
    let mut classifier = model.build();
    classifier.fit(&dataset.matrix, &dataset.labels)?;
    let predicted = classifier.predict(&dataset.matrix)?;
    Ok(calculate_metrics(&dataset.labels, &predicted)?)
}

fn project(pca: &Pca, dataset: &Dataset) -> Result<Vec<Projection>> {
    let pcs = pca.project(&dataset.matrix, 3)?;
    Ok(pcs.rows()
        .zip(&dataset.labels)
        .map(|(pc, label)| Projection {
            label: label.clone(),
            pc1: pc[0],
            pc2: pc[1],
            pc3: pc[2],
        })
        .collect())
}

fn surfaces(
    dataset: &Dataset,
    padding: f64,
    steps: usize,
) -> Result<BTreeMap<String, ClassSurface>> {
    let mut result = BTreeMap::new();
    if dataset.n_features() < 2 {
        return Ok(result);
    }

    let plane: Matrix = dataset.matrix.select_cols(&[0, 1])?;
    let grid = Grid::spanning(&plane.get_col(0)?, &plane.get_col(1)?, padding, steps);

    for (label, moments) in class_moments(&plane, &dataset.labels)? {
        let surface = density_surface(&grid, &moments.mean, &moments.covariance);
        result.insert(label, ClassSurface {
            mean: moments.mean,
            covariance: moments.covariance,
            surface,
        });
    }
    debug!(classes = result.len(), steps, "built density surfaces");
    Ok(result)
}
