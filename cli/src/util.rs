use std::{
    fs::OpenOptions,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use featurelens::{classify::ModelKind, synthetic::Preset, table::Table};
use serde::Serialize;
use thiserror::Error;

pub fn get_buff_reader(filename: &Option<PathBuf>) -> Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if let Some(filename) = filename {
        let file = OpenOptions::new()
            .read(true)
            .open(filename)
            .with_context(|| format!("Could not open {}", filename.to_string_lossy()))?;

        Box::new(BufReader::new(file))
    } else {
        let stdin = io::stdin();
        Box::new(BufReader::new(stdin))
    };
    Ok(reader)
}

#[derive(Debug, ValueEnum, Clone, Copy)]
pub enum DataType {
    /// Comma separated values
    Csv,
}

impl DataType {
    pub fn from_filename(filename: &Path) -> Result<Self, DataTypeError> {
        filename.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| DataType::from_str(e, true).ok())
            .ok_or_else(|| DataTypeError::CouldNotGetFromFileExt(
                filename.to_string_lossy().to_string()))
    }
}

#[derive(Debug, Error)]
pub enum DataTypeError {
    #[error("File extension couldn't be identified on {0}")]
    CouldNotGetFromFileExt(String),
    #[error("No file provided. --datatype must be specified")]
    Unspecified,
}

/// Where the data comes from and how to parse it.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// The format of the file
    #[arg(value_enum, short, long)]
    datatype: Option<DataType>,
    /// CSV delimiter
    #[arg(long, default_value_t = String::from(","))]
    csv_delim: String,
    /// File containing data, stdin when omitted
    pub(crate) filename: Option<PathBuf>,
}

impl InputArgs {
    pub fn read_table(&self) -> Result<Table> {
        let datatype = match (self.datatype, &self.filename) {
            (Some(d), _) => d,
            (None, Some(f)) => DataType::from_filename(f)?,
            (None, None) => return Err(DataTypeError::Unspecified.into()),
        };
        let reader = get_buff_reader(&self.filename)?;
        match datatype {
            DataType::Csv => Table::from_csv(reader, &self.csv_delim),
        }
    }
}

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    /// Gaussian Naive Bayes
    Bayes,
    /// Nearest class centroid
    Mindist,
}

impl From<Model> for ModelKind {
    fn from(model: Model) -> Self {
        match model {
            Model::Bayes => ModelKind::NaiveBayes,
            Model::Mindist => ModelKind::MinimumDistance,
        }
    }
}

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    /// 150 rows, three species
    Iris,
    /// 178 rows, three cultivars
    Wine,
    /// 200 rows, malignant or benign
    Cancer,
}

impl From<DemoData> for Preset {
    fn from(demo: DemoData) -> Self {
        match demo {
            DemoData::Iris => Preset::Iris,
            DemoData::Wine => Preset::Wine,
            DemoData::Cancer => Preset::Cancer,
        }
    }
}

/// Pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("Writing JSON output")?;
    writeln!(stdout)?;
    Ok(())
}
