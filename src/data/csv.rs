//! Labelled CSV output of kernel matrices
//!
//! The layout is a header row `,<col label>,...` followed by one row per
//! matrix row, `<row label>,<value>,...`. Values are written with full
//! round-trip precision.

use crate::core::{Result, SSKError};
use crate::matrix::KernelMatrix;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `matrix` with row and column labels as CSV
pub fn write_matrix_csv<W: Write>(
    mut writer: W,
    matrix: &KernelMatrix,
    row_labels: &[String],
    col_labels: &[String],
) -> Result<()> {
    if row_labels.len() != matrix.rows() {
        return Err(SSKError::DimensionMismatch {
            expected: matrix.rows(),
            actual: row_labels.len(),
        });
    }
    if col_labels.len() != matrix.cols() {
        return Err(SSKError::DimensionMismatch {
            expected: matrix.cols(),
            actual: col_labels.len(),
        });
    }

    for label in col_labels {
        write!(writer, ",{}", escape(label))?;
    }
    writeln!(writer)?;

    for (i, label) in row_labels.iter().enumerate() {
        write!(writer, "{}", escape(label))?;
        for value in matrix.row(i) {
            write!(writer, ",{value}")?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write `matrix` with labels to a CSV file
pub fn save_matrix_csv<P: AsRef<Path>>(
    path: P,
    matrix: &KernelMatrix,
    row_labels: &[String],
    col_labels: &[String],
) -> Result<()> {
    let file = File::create(path)?;
    write_matrix_csv(BufWriter::new(file), matrix, row_labels, col_labels)
}

fn escape(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_layout() {
        let matrix = KernelMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.25, 1.0]]).unwrap();
        let mut out = Vec::new();
        write_matrix_csv(&mut out, &matrix, &labels(&["a", "b"]), &labels(&["c", "d"])).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ",c,d\na,1,0.5\nb,0.25,1\n");
    }

    #[test]
    fn test_label_escaping() {
        let matrix = KernelMatrix::from_rows(vec![vec![1.0]]).unwrap();
        let mut out = Vec::new();
        write_matrix_csv(&mut out, &matrix, &labels(&["x,y"]), &labels(&["q\"r"])).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ",\"q\"\"r\"\n\"x,y\",1\n");
    }

    #[test]
    fn test_carriage_return_is_quoted() {
        let matrix = KernelMatrix::from_rows(vec![vec![1.0]]).unwrap();
        let mut out = Vec::new();
        write_matrix_csv(&mut out, &matrix, &labels(&["a\rb"]), &labels(&["c"])).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ",c\n\"a\rb\",1\n");
    }

    #[test]
    fn test_label_count_mismatch() {
        let matrix = KernelMatrix::zeros(2, 2);
        let mut out = Vec::new();
        assert!(matches!(
            write_matrix_csv(&mut out, &matrix, &labels(&["a"]), &labels(&["c", "d"])),
            Err(SSKError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_precision_survives() {
        let value = 36.0 / 65.0;
        let matrix = KernelMatrix::from_rows(vec![vec![value]]).unwrap();
        let file = NamedTempFile::new().unwrap();
        save_matrix_csv(file.path(), &matrix, &labels(&["a"]), &labels(&["b"])).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let parsed: f64 = text.lines().nth(1).unwrap().split(',').nth(1).unwrap().parse().unwrap();
        assert_eq!(parsed, value);
    }
}
