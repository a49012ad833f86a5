use std::cmp::min;

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    // Row-major. Only f64 is needed by the analysis code.
    elements: Vec<f64>,
    width: usize,
    height: usize,
}

impl Matrix {
    pub fn new(elements: Vec<f64>, height: usize, width: usize) -> Result<Self, MatrixError> {
        if elements.len() != width * height {
            return Err(MatrixError::SizeMismatch);
        }

        Ok(Self {
            elements,
            height,
            width,
        })
    }

    /// Build a matrix from a list of rows. Every row must have the length of
    /// the first one; an empty list gives a `0 x 0` matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut elements = Vec::with_capacity(width * height);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(MatrixError::RaggedRows {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }
            elements.extend(row);
        }
        Ok(Self {
            elements,
            width,
            height,
        })
    }

    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            elements: vec![0.0; width * height],
            width,
            height,
        }
    }

    pub fn identity(width: usize, height: usize) -> Self {
        let mut elements = vec![0.0; width * height];
        let n = min(width, height);
        for i in 0..n {
            elements[i * width + i] = 1.0;
        }
        Self {
            elements,
            width,
            height,
        }
    }

    pub fn mul(&self, matrix: &Matrix) -> Result<Matrix, MatrixError> {
        if self.width != matrix.height {
            return Err(MatrixError::SizeMismatch);
        }

        let mut elements: Vec<f64> = Vec::with_capacity(self.height * matrix.width);
        for ij in 0..self.height * matrix.width {
            let column = ij % matrix.width;
            let row = ij / matrix.width;
            let mut value = 0.0;
            for i in 0..self.width {
                value += self.get_unchecked(row, i) * matrix.get_unchecked(i, column);
            }
            elements.push(value);
        }
        Ok(Matrix {
            elements,
            width: matrix.width,
            height: self.height,
        })
    }

    pub fn transpose(&self) -> Matrix {
        let mut elements: Vec<f64> = Vec::with_capacity(self.elements.len());
        for i in 0..self.width {
            for j in 0..self.height {
                elements.push(self.get_unchecked(j, i));
            }
        }
        Matrix {
            elements,
            width: self.height,
            height: self.width,
        }
    }

    /// Largest absolute element-wise difference. Shapes must agree.
    pub fn max_abs_diff(&self, matrix: &Matrix) -> Result<f64, MatrixError> {
        if self.width != matrix.width || self.height != matrix.height {
            return Err(MatrixError::SizeMismatch);
        }
        Ok(self.elements.iter()
            .zip(matrix.elements.iter())
            .fold(0.0, |acc: f64, (a, b)| acc.max((a - b).abs())))
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), MatrixError> {
        if row >= self.height || col >= self.width {
            Err(MatrixError::OutOfBounds)
        } else {
            self.set_unchecked(row, col, value);
            Ok(())
        }
    }

    pub fn set_unchecked(&mut self, row: usize, col: usize, value: f64) {
        self.elements[row * self.width + col] = value;
    }

    pub fn get_unchecked(&self, row: usize, col: usize) -> f64 {
        self.elements[row * self.width + col]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.elements[i * self.width..(i + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.height).map(move |i| self.row(i))
    }

    pub fn get_col(&self, i: usize) -> Result<Vec<f64>, MatrixError> {
        if i >= self.width {
            return Err(MatrixError::OutOfBounds);
        }
        Ok((0..self.height).map(|j| self.get_unchecked(j, i)).collect())
    }

    /// New matrix made of the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Matrix, MatrixError> {
        let mut elements = Vec::with_capacity(indices.len() * self.width);
        for &i in indices {
            if i >= self.height {
                return Err(MatrixError::OutOfBounds);
            }
            elements.extend_from_slice(self.row(i));
        }
        Ok(Matrix {
            elements,
            width: self.width,
            height: indices.len(),
        })
    }

    /// New matrix made of the given columns, in the given order.
    pub fn select_cols(&self, indices: &[usize]) -> Result<Matrix, MatrixError> {
        if indices.iter().any(|&i| i >= self.width) {
            return Err(MatrixError::OutOfBounds);
        }
        let mut elements = Vec::with_capacity(indices.len() * self.height);
        for row in self.rows() {
            elements.extend(indices.iter().map(|&i| row[i]));
        }
        Ok(Matrix {
            elements,
            width: indices.len(),
            height: self.height,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    matrix: Matrix,
    n: usize,
}

impl SquareMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            matrix: Matrix::zeros(n, n),
            n,
        }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            matrix: Matrix::identity(n, n),
            n,
        }
    }

    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        Matrix::from_rows(rows)?.try_into()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get_unchecked(&self, row: usize, col: usize) -> f64 {
        self.matrix.get_unchecked(row, col)
    }

    pub fn set_unchecked(&mut self, row: usize, col: usize, value: f64) {
        self.matrix.set_unchecked(row, col, value);
    }

    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.get_unchecked(i, i)).collect()
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        for i in 0..self.n {
            for j in i + 1..self.n {
                if (self.get_unchecked(i, j) - self.get_unchecked(j, i)).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    pub fn as_matrix(&self) -> &Matrix {
        &self.matrix
    }
}

impl TryFrom<Matrix> for SquareMatrix {
    type Error = MatrixError;
    fn try_from(value: Matrix) -> Result<Self, Self::Error> {
        if value.height != value.width {
            Err(MatrixError::NotSquare)
        } else {
            Ok(SquareMatrix {
                n: value.width,
                matrix: value,
            })
        }
    }
}

impl Serialize for SquareMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.matrix.serialize(serializer)
    }
}

pub fn dot(u: &[f64], v: &[f64]) -> f64 {
    u.iter()
        .zip(v.iter())
        .fold(0.0, |acc, (a, b)| acc + a * b)
}

pub fn squared_distance(u: &[f64], v: &[f64]) -> f64 {
    u.iter()
        .zip(v.iter())
        .fold(0.0, |acc, (a, b)| acc + (a - b) * (a - b))
}

pub fn round(u: &[f64], places: i32) -> Vec<f64> {
    let shift = 10.0_f64.powi(places);
    u.iter()
        .map(|a| (a * shift).round() / shift)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MatrixError {
    #[error("element count does not match the matrix dimensions")]
    SizeMismatch,
    #[error("index out of bounds")]
    OutOfBounds,
    #[error("matrix is not square")]
    NotSquare,
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
}
