//! Column-typed in-memory table with CSV round-tripping.
//!
//! A [`Frame`] is the unit of data every ingestion and transformation step
//! operates on: an ordered set of named columns, each either numeric
//! ([`Column::Float`], `NaN` marks a missing value) or categorical
//! ([`Column::Text`], `None` marks a missing value).
//!
//! CSV loading infers a column as numeric when every non-empty cell parses as
//! `f64`; empty cells round-trip as missing in both directions.

use std::path::Path;

use crate::error::{PipelineError, Result};

pub mod matrix;
pub use matrix::Matrix;

/// One named column of a [`Frame`].
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Numeric values; `NaN` is the missing marker.
    Float(Vec<f64>),
    /// Categorical values; `None` is the missing marker.
    Text(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric values, if this is a numeric column.
    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            Column::Float(v) => Some(v),
            Column::Text(_) => None,
        }
    }

    /// Categorical values, if this is a text column.
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Text(v) => Some(v),
            Column::Float(_) => None,
        }
    }

    fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Float(v) => Column::Float(indices.iter().map(|&i| v[i]).collect()),
            Column::Text(v) => Column::Text(indices.iter().map(|&i| v[i].clone()).collect()),
        }
    }

    fn append(&mut self, other: &Column) -> Result<()> {
        match (self, other) {
            (Column::Float(a), Column::Float(b)) => a.extend_from_slice(b),
            (Column::Text(a), Column::Text(b)) => a.extend_from_slice(b),
            _ => {
                return Err(PipelineError::SchemaMismatch {
                    expected: "columns of the same type".to_string(),
                    got: "numeric vs text".to_string(),
                })
            }
        }
        Ok(())
    }

    fn cell_to_string(&self, row: usize) -> String {
        match self {
            Column::Float(v) => {
                let x = v[row];
                if x.is_nan() {
                    String::new()
                } else {
                    format!("{}", x)
                }
            }
            Column::Text(v) => v[row].clone().unwrap_or_default(),
        }
    }
}

/// Ordered collection of equally-sized named columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    columns: Vec<(String, Column)>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows (zero for a frame with no columns).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Column lookup that fails with a schema error instead of `None`.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| PipelineError::SchemaMismatch {
            expected: format!("column {:?}", name),
            got: format!("columns {:?}", self.names()),
        })
    }

    /// Append a column on the right. All columns must share a row count.
    pub fn push_column(&mut self, name: &str, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(PipelineError::SchemaMismatch {
                expected: format!("{} rows", self.n_rows()),
                got: format!("{} rows", column.len()),
            });
        }
        if self.column(name).is_some() {
            return Err(PipelineError::InvalidParameter(format!(
                "duplicate column {:?}",
                name
            )));
        }
        self.columns.push((name.to_string(), column));
        Ok(())
    }

    /// Remove the listed columns; names that are not present are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        self.columns.retain(|(n, _)| !names.contains(&n.as_str()));
    }

    /// Rows where `mask` is true, in order.
    pub fn filter(&self, mask: &[bool]) -> Frame {
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        self.take(&indices)
    }

    /// Rows at the given indices, in the given order.
    pub fn take(&self, indices: &[usize]) -> Frame {
        Frame {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.take(indices)))
                .collect(),
        }
    }

    /// Row-wise concatenation of two frames with identical column layout.
    pub fn concat(&self, other: &Frame) -> Result<Frame> {
        if self.names() != other.names() {
            return Err(PipelineError::SchemaMismatch {
                expected: format!("columns {:?}", self.names()),
                got: format!("columns {:?}", other.names()),
            });
        }
        let mut out = self.clone();
        for ((_, dst), (_, src)) in out.columns.iter_mut().zip(other.columns.iter()) {
            dst.append(src)?;
        }
        Ok(out)
    }

    /// Load a CSV file with a header row.
    ///
    /// A column is numeric iff every non-empty cell parses as `f64`.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Frame> {
        let mut reader =
            csv::Reader::from_path(&path).map_err(|e| PipelineError::from(e).with_path(&path))?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| PipelineError::from(e).with_path(&path))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record.map_err(|e| PipelineError::from(e).with_path(&path))?;
            if record.len() != headers.len() {
                return Err(PipelineError::SchemaMismatch {
                    expected: format!("{} fields", headers.len()),
                    got: format!("{} fields", record.len()),
                });
            }
            for (col, value) in record.iter().enumerate() {
                cells[col].push(value.to_string());
            }
        }

        let mut frame = Frame::new();
        for (name, values) in headers.iter().zip(cells.into_iter()) {
            frame.push_column(name, infer_column(values))?;
        }
        Ok(frame)
    }

    /// Write the frame as CSV with a header row; missing values become empty
    /// cells.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PipelineError::from(e).with_path(&path))?;
            }
        }
        let mut writer =
            csv::Writer::from_path(&path).map_err(|e| PipelineError::from(e).with_path(&path))?;
        writer
            .write_record(self.names())
            .map_err(|e| PipelineError::from(e).with_path(&path))?;
        for row in 0..self.n_rows() {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|(_, c)| c.cell_to_string(row))
                .collect();
            writer
                .write_record(&record)
                .map_err(|e| PipelineError::from(e).with_path(&path))?;
        }
        writer
            .flush()
            .map_err(|e| PipelineError::from(e).with_path(&path))?;
        Ok(())
    }
}

fn infer_column(values: Vec<String>) -> Column {
    let numeric = values
        .iter()
        .filter(|v| !v.is_empty())
        .all(|v| v.trim().parse::<f64>().is_ok());
    if numeric {
        Column::Float(
            values
                .iter()
                .map(|v| {
                    if v.is_empty() {
                        f64::NAN
                    } else {
                        v.trim().parse::<f64>().unwrap_or(f64::NAN)
                    }
                })
                .collect(),
        )
    } else {
        Column::Text(
            values
                .into_iter()
                .map(|v| if v.is_empty() { None } else { Some(v) })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        let mut frame = Frame::new();
        frame
            .push_column(
                "brand",
                Column::Text(vec![
                    Some("Toyota".to_string()),
                    Some("Honda".to_string()),
                    None,
                ]),
            )
            .unwrap();
        frame
            .push_column("price", Column::Float(vec![100.0, 250.0, f64::NAN]))
            .unwrap();
        frame
    }

    #[test]
    fn test_frame_shape_and_lookup() {
        let frame = sample_frame();
        assert_eq!(frame.n_rows(), 3);
        assert_eq!(frame.n_cols(), 2);
        assert_eq!(frame.names(), vec!["brand", "price"]);
        assert!(frame.column("price").is_some());
        assert!(frame.column("model").is_none());
    }

    #[test]
    fn test_require_column_error() {
        let frame = sample_frame();
        let result = frame.require_column("model");
        assert!(matches!(result, Err(PipelineError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_push_column_row_mismatch() {
        let mut frame = sample_frame();
        let result = frame.push_column("seats", Column::Float(vec![4.0]));
        assert!(result.is_err());
    }

    #[test]
    fn test_push_duplicate_column() {
        let mut frame = sample_frame();
        let result = frame.push_column("price", Column::Float(vec![1.0, 2.0, 3.0]));
        assert!(matches!(result, Err(PipelineError::InvalidParameter(_))));
    }

    #[test]
    fn test_drop_columns_ignores_missing() {
        let mut frame = sample_frame();
        frame.drop_columns(&["brand", "nonexistent"]);
        assert_eq!(frame.names(), vec!["price"]);
    }

    #[test]
    fn test_filter_and_take() {
        let frame = sample_frame();
        let filtered = frame.filter(&[true, false, true]);
        assert_eq!(filtered.n_rows(), 2);
        assert_eq!(
            filtered.column("brand").unwrap().as_text().unwrap()[1],
            None
        );

        let taken = frame.take(&[2, 0]);
        assert_eq!(taken.n_rows(), 2);
        assert!(taken.column("price").unwrap().as_float().unwrap()[0].is_nan());
        assert_eq!(taken.column("price").unwrap().as_float().unwrap()[1], 100.0);
    }

    #[test]
    fn test_concat_preserves_row_count() {
        let frame = sample_frame();
        let combined = frame.concat(&frame).unwrap();
        assert_eq!(combined.n_rows(), 6);
        assert_eq!(combined.names(), frame.names());
    }

    #[test]
    fn test_concat_schema_mismatch() {
        let frame = sample_frame();
        let mut other = Frame::new();
        other
            .push_column("price", Column::Float(vec![1.0]))
            .unwrap();
        assert!(frame.concat(&other).is_err());
    }

    #[test]
    fn test_csv_roundtrip_with_missing_values() {
        let frame = sample_frame();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        frame.write_csv(&path).unwrap();

        let loaded = Frame::read_csv(&path).unwrap();
        assert_eq!(loaded.names(), frame.names());
        assert_eq!(loaded.n_rows(), 3);

        let brand = loaded.column("brand").unwrap().as_text().unwrap();
        assert_eq!(brand[0].as_deref(), Some("Toyota"));
        assert_eq!(brand[2], None);

        let price = loaded.column("price").unwrap().as_float().unwrap();
        assert_eq!(price[1], 250.0);
        assert!(price[2].is_nan());
    }

    #[test]
    fn test_csv_numeric_inference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.csv");
        std::fs::write(&path, "year,gearbox\n2015,MT\n2018,AT\n,AT\n").unwrap();

        let frame = Frame::read_csv(&path).unwrap();
        let year = frame.column("year").unwrap().as_float().unwrap();
        assert_eq!(year[0], 2015.0);
        assert!(year[2].is_nan());
        assert!(frame.column("gearbox").unwrap().as_text().is_some());
    }
}
