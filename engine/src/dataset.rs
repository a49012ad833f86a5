//! Feature matrix plus label vector extracted from a table.

use thiserror::Error;

use crate::linalg::{Matrix, MatrixError};
use crate::stats::standardize;
use crate::table::{ColType, Table, TableError};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub matrix: Matrix,
    pub labels: Vec<String>,
}

impl Dataset {
    pub fn new(
        feature_names: Vec<String>,
        target_name: String,
        matrix: Matrix,
        labels: Vec<String>,
    ) -> Result<Self, DatasetError> {
        if matrix.width() != feature_names.len() {
            return Err(DatasetError::FeatureCount {
                names: feature_names.len(),
                columns: matrix.width(),
            });
        }
        if matrix.height() != labels.len() {
            return Err(DatasetError::LabelCount {
                rows: matrix.height(),
                labels: labels.len(),
            });
        }
        Ok(Self {
            feature_names,
            target_name,
            matrix,
            labels,
        })
    }

    /// Take `target` as the labels and `features` as the matrix columns.
    /// Without an explicit feature list every numeric column other than the
    /// target is used.
    pub fn from_table(
        table: &Table,
        target: &str,
        features: Option<&[String]>,
    ) -> Result<Self, DatasetError> {
        let labels = table.text(target)?;

        let feature_names: Vec<String> = match features {
            Some(names) => {
                if let Some(name) = names.iter().find(|n| *n == target) {
                    return Err(DatasetError::TargetAsFeature(name.clone()));
                }
                names.to_vec()
            }
            None => numeric_features(table, Some(target)),
        };
        let matrix = feature_matrix(table, &feature_names)?;

        Self::new(feature_names, target.to_string(), matrix, labels)
    }

    /// Keep only the named features, in the given order.
    pub fn select(&self, features: &[String]) -> Result<Self, DatasetError> {
        let indices = features.iter()
            .map(|name| {
                self.feature_names.iter()
                    .position(|f| f == name)
                    .ok_or_else(|| DatasetError::UnknownFeature(name.clone()))
            })
            .collect::<Result<Vec<usize>, DatasetError>>()?;
        Ok(Self {
            feature_names: features.to_vec(),
            target_name: self.target_name.clone(),
            matrix: self.matrix.select_cols(&indices)?,
            labels: self.labels.clone(),
        })
    }

    /// Copy with every feature z-scored.
    pub fn standardized(&self) -> Self {
        Self {
            matrix: standardize(&self.matrix),
            ..self.clone()
        }
    }

    pub fn n_rows(&self) -> usize {
        self.matrix.height()
    }

    pub fn n_features(&self) -> usize {
        self.matrix.width()
    }
}

/// Every numeric column of `table` except `exclude`, in header order.
pub fn numeric_features(table: &Table, exclude: Option<&str>) -> Vec<String> {
    table.numeric_columns()
        .into_iter()
        .filter(|h| Some(*h) != exclude)
        .map(String::from)
        .collect()
}

/// The named numeric columns of `table` side by side, one row per table row.
pub fn feature_matrix(table: &Table, names: &[String]) -> Result<Matrix, DatasetError> {
    let columns = names.iter()
        .map(|name| {
            if table.col_type(name)? != ColType::Numeric {
                return Err(TableError::ColumnNotNumeric(name.clone()));
            }
            table.numeric(name)
        })
        .collect::<Result<Vec<&[f64]>, TableError>>()?;
    let mut matrix = Matrix::zeros(table.len(), columns.len());
    for (j, column) in columns.iter().enumerate() {
        for (i, value) in column.iter().enumerate() {
            matrix.set(i, j, *value)?;
        }
    }
    Ok(matrix)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("feature {0} is not part of the dataset")]
    UnknownFeature(String),
    #[error("target column {0} cannot also be a feature")]
    TargetAsFeature(String),
    #[error("{names} feature names for {columns} columns")]
    FeatureCount { names: usize, columns: usize },
    #[error("{rows} rows but {labels} labels")]
    LabelCount { rows: usize, labels: usize },
}
