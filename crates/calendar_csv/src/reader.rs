use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{CsvError, HEADERS, UTF8_BOM};

/// Data rows of an import file, cells trimmed. The header must match
/// [`HEADERS`] exactly, in order.
pub fn read_records<R: Read>(mut input: R) -> Result<Vec<Vec<String>>, CsvError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let body = text.strip_prefix(UTF8_BOM).unwrap_or(&text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut records = reader.records();

    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|c| c.trim().to_string()).collect(),
        None => Vec::new(),
    };
    if header.iter().map(String::as_str).ne(HEADERS) {
        return Err(CsvError::SchemaMismatch { found: header });
    }

    let mut rows = Vec::new();
    for record in records {
        rows.push(record?.iter().map(|c| c.trim().to_string()).collect());
    }
    Ok(rows)
}

pub fn read_records_from_path(path: &Path) -> Result<Vec<Vec<String>>, CsvError> {
    read_records(File::open(path)?)
}
