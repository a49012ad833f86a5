use std::io::BufRead;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColType {
    Numeric,
    Categorical,
}

/// A column handed to `Table::from_columns`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }
}

/// Column-oriented table. A column is numeric only when every one of its
/// cells parses as a finite number; anything else is kept as text.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    col_types: Vec<ColType>,
    numerics: Vec<Vec<f64>>,
    strings: Vec<Vec<String>>,
    col_to_numeric: Vec<Option<usize>>,
    col_to_string: Vec<Option<usize>>,
    len: usize,
}

impl Table {
    pub fn from_csv(reader: impl BufRead, delimiter: &str) -> Result<Self> {
        let context = "Parsing CSV to Table";

        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line.context(context)?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            lines.push(trimmed.to_string());
        }
        let mut lines = lines.into_iter();

        let headers: Vec<String> = match lines.next() {
            Some(l) => split_line(&l, delimiter),
            None => return Err(TableParserError::EmptyFile).context(context),
        };

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        let mut line_num = 1;
        for line in lines {
            let entries = split_line(&line, delimiter);
            if entries.len() != headers.len() {
                return Err(TableParserError::LineSizeConflict(line_num)).context(context);
            }
            for (column, entry) in cells.iter_mut().zip(entries) {
                column.push(entry);
            }
            line_num += 1;
        }
        if line_num == 1 {
            return Err(TableParserError::NoData).context(context);
        }

        let columns = headers.into_iter()
            .zip(cells)
            .map(|(header, column)| {
                let parsed: Option<Vec<f64>> = column.iter()
                    .map(|c| c.parse::<f64>().ok().filter(|v| v.is_finite()))
                    .collect();
                match parsed {
                    Some(values) => (header, Column::Numeric(values)),
                    None => {
                        debug!(column = %header, "column kept as categorical");
                        (header, Column::Categorical(column))
                    }
                }
            })
            .collect();

        Self::from_columns(columns).context(context)
    }

    /// Build a table from named columns of equal length.
    pub fn from_columns(columns: Vec<(String, Column)>) -> Result<Self> {
        let len = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut table = Self {
            headers: Vec::with_capacity(columns.len()),
            col_types: Vec::with_capacity(columns.len()),
            numerics: Vec::new(),
            strings: Vec::new(),
            col_to_numeric: Vec::with_capacity(columns.len()),
            col_to_string: Vec::with_capacity(columns.len()),
            len,
        };

        for (header, column) in columns {
            if column.len() != len {
                return Err(TableError::ColumnLength {
                    column: header,
                    expected: len,
                    found: column.len(),
                }.into());
            }
            table.headers.push(header);
            match column {
                Column::Numeric(values) => {
                    table.col_types.push(ColType::Numeric);
                    table.col_to_numeric.push(Some(table.numerics.len()));
                    table.col_to_string.push(None);
                    table.numerics.push(values);
                }
                Column::Categorical(values) => {
                    table.col_types.push(ColType::Categorical);
                    table.col_to_numeric.push(None);
                    table.col_to_string.push(Some(table.strings.len()));
                    table.strings.push(values);
                }
            }
        }
        Ok(table)
    }

    pub fn to_csv(&self, delimiter: &str) -> String {
        let mut lines = Vec::with_capacity(self.len + 1);
        lines.push(self.headers.join(delimiter));
        for i in 0..self.len {
            let line: Vec<String> = (0..self.headers.len())
                .map(|j| self.cell(j, i))
                .collect();
            lines.push(line.join(delimiter));
        }
        lines.join("\n")
    }

    fn cell(&self, col: usize, row: usize) -> String {
        match (self.col_to_numeric[col], self.col_to_string[col]) {
            (Some(index), _) => self.numerics[index][row].to_string(),
            (None, Some(index)) => self.strings[index][row].clone(),
            (None, None) => String::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn col_type(&self, name: &str) -> Result<ColType, TableError> {
        Ok(self.col_types[self.position(name)?])
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns_of(ColType::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns_of(ColType::Categorical)
    }

    fn columns_of(&self, col_type: ColType) -> Vec<&str> {
        self.headers.iter()
            .zip(&self.col_types)
            .filter(|(_, t)| **t == col_type)
            .map(|(h, _)| h.as_str())
            .collect()
    }

    pub fn numeric(&self, name: &str) -> Result<&[f64], TableError> {
        match self.col_to_numeric[self.position(name)?] {
            Some(i) => Ok(&self.numerics[i]),
            None => Err(TableError::ColumnNotNumeric(name.to_string())),
        }
    }

    /// Every cell of a column as text, whatever its type.
    pub fn text(&self, name: &str) -> Result<Vec<String>, TableError> {
        let col = self.position(name)?;
        Ok((0..self.len).map(|row| self.cell(col, row)).collect())
    }

    fn position(&self, name: &str) -> Result<usize, TableError> {
        self.headers.iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }
}

/// Split on the delimiter, trim each cell and drop one pair of surrounding
/// quotes.
fn split_line(line: &str, delimiter: &str) -> Vec<String> {
    line.split(delimiter)
        .map(|cell| unquote(cell.trim()).to_string())
        .collect()
}

fn unquote(cell: &str) -> &str {
    for quote in ['"', '\''] {
        if cell.len() >= 2 && cell.starts_with(quote) && cell.ends_with(quote) {
            return &cell[1..cell.len() - 1];
        }
    }
    cell
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("column {0} not found")]
    ColumnNotFound(String),
    #[error("column {0} is not numeric")]
    ColumnNotNumeric(String),
    #[error("column {column} has {found} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableParserError {
    #[error("file has no header")]
    EmptyFile,
    #[error("file has a header but no data")]
    NoData,
    #[error("wrong number of cells on data line {0}")]
    LineSizeConflict(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Result<Table> {
        Table::from_csv(csv.as_bytes(), ",")
    }

    #[test]
    fn test_from_csv_types_columns() {
        let table = parse(
            "# comment\n\
             sepal, petal, species\n\
             5.1, 1.4, setosa\n\
             \n\
             6.3, 4.9, \"virginica\"\n",
        ).unwrap();

        assert_eq!(table.headers(), &["sepal", "petal", "species"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.numeric_columns(), vec!["sepal", "petal"]);
        assert_eq!(table.categorical_columns(), vec!["species"]);
        assert_eq!(table.numeric("petal").unwrap(), &[1.4, 4.9]);
        assert_eq!(table.text("species").unwrap(), vec!["setosa", "virginica"]);
    }

    #[test]
    fn test_mixed_column_is_categorical() {
        let table = parse("a,b\n1,2\nx,3\n").unwrap();

        assert_eq!(table.col_type("a").unwrap(), ColType::Categorical);
        assert_eq!(table.col_type("b").unwrap(), ColType::Numeric);
        assert_eq!(
            table.numeric("a").err(),
            Some(TableError::ColumnNotNumeric("a".to_string()))
        );
    }

    #[test]
    fn test_non_finite_is_categorical() {
        let table = parse("a,b\nNaN,1\n2,inf\n").unwrap();

        assert_eq!(table.numeric_columns(), Vec::<&str>::new());
    }

    #[test]
    fn test_line_size_conflict() {
        let err = parse("a,b\n1,2\n3\n").unwrap_err();

        let cause: Option<&TableParserError> = err.downcast_ref();
        assert_eq!(cause, Some(&TableParserError::LineSizeConflict(2)));
    }

    #[test]
    fn test_empty_and_header_only() {
        let empty = parse("").unwrap_err();
        assert_eq!(empty.downcast_ref::<TableParserError>(), Some(&TableParserError::EmptyFile));

        let header_only = parse("a,b\n").unwrap_err();
        assert_eq!(header_only.downcast_ref::<TableParserError>(), Some(&TableParserError::NoData));
    }

    #[test]
    fn test_column_not_found() {
        let table = parse("a\n1\n").unwrap();
        assert_eq!(
            table.numeric("b").err(),
            Some(TableError::ColumnNotFound("b".to_string()))
        );
    }

    #[test]
    fn test_numeric_target_as_text() {
        let table = parse("x,class\n0.5,1\n0.7,2\n").unwrap();
        assert_eq!(table.text("class").unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn test_to_csv_round_trip() {
        let csv = "x;label\n1.5;a\n2;b";
        let table = Table::from_csv(csv.as_bytes(), ";").unwrap();

        assert_eq!(table.to_csv(";"), csv);
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let result = Table::from_columns(vec![
            ("a".to_string(), Column::Numeric(vec![1.0, 2.0])),
            ("b".to_string(), Column::Categorical(vec!["x".to_string()])),
        ]);

        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<TableError>(), Some(TableError::ColumnLength { .. })));
    }
}
