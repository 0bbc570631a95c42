//! Exact row-by-row comparison of two import files.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::reader::read_records;
use crate::CsvError;

/// Report at most this many differing rows.
pub const MAX_DIVERGENCES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// 1-based file line, header included (first data row is 2).
    pub row: usize,
    pub actual: Vec<String>,
    pub expected: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub equal: bool,
    pub divergences: Vec<Divergence>,
    pub actual_rows: usize,
    pub expected_rows: usize,
}

impl DiffReport {
    pub fn is_equal(&self) -> bool {
        self.equal
    }

    pub fn length_mismatch(&self) -> Option<(usize, usize)> {
        (self.actual_rows != self.expected_rows).then_some((self.actual_rows, self.expected_rows))
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.divergences {
            writeln!(f, "Row {} differs:", d.row)?;
            writeln!(f, "  actual:   {:?}", d.actual)?;
            writeln!(f, "  expected: {:?}", d.expected)?;
        }
        if let Some((actual, expected)) = self.length_mismatch() {
            writeln!(f, "Length differs: actual={actual} expected={expected}")?;
        }
        Ok(())
    }
}

pub fn compare(actual: &[Vec<String>], expected: &[Vec<String>]) -> DiffReport {
    let equal = actual == expected;
    let divergences = if equal {
        Vec::new()
    } else {
        actual
            .iter()
            .zip(expected)
            .enumerate()
            .filter(|(_, (a, e))| a != e)
            .take(MAX_DIVERGENCES)
            .map(|(i, (a, e))| Divergence { row: i + 2, actual: a.clone(), expected: e.clone() })
            .collect()
    };
    DiffReport { equal, divergences, actual_rows: actual.len(), expected_rows: expected.len() }
}

pub fn compare_readers<A: Read, E: Read>(actual: A, expected: E) -> Result<DiffReport, CsvError> {
    Ok(compare(&read_records(actual)?, &read_records(expected)?))
}

pub fn compare_files(actual: &Path, expected: &Path) -> Result<DiffReport, CsvError> {
    compare_readers(File::open(actual)?, File::open(expected)?)
}
