//! CSV parser for recipient uploads

use crate::error::{Error, Result};
use crate::rowset::RowSet;

/// Parse raw delimited text into a RowSet.
///
/// The first record is the header list; every subsequent record becomes one
/// row. Quoting follows RFC 4180: a quoted field may contain the delimiter
/// or a newline literally, and a doubled quote (`""`) is one literal quote.
///
/// Pure function over the input text; a failed parse produces no RowSet at
/// all (all-or-nothing). Media-type validation happens at the ingestion
/// boundary, not here.
pub fn parse_csv(raw: &str) -> Result<RowSet> {
    if raw.trim().is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // width enforcement is RowSet's job, with row indices
        .from_reader(raw.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(str::to_string).collect());
    }

    RowSet::new(headers, records)
}
