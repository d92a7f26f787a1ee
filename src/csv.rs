// src/csv.rs
use std::io::{Read, Write};

use crate::error::Result;
use crate::store::DataSet;

/* ---------------- Parsing ---------------- */

/// Read a CSV with a header row. Ragged rows are accepted as-is; a UTF-8 BOM on the
/// first header is stripped.
pub fn read_table<R: Read>(reader: R) -> Result<DataSet> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = s!(stripped);
        }
    }

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        rows.push(rec.iter().map(String::from).collect());
    }
    Ok(DataSet { headers: Some(headers), rows })
}

/* ---------------- Writing ---------------- */

/// Write headers (if any) then rows. Quoting is left to the csv writer.
pub fn write_table<W: Write>(writer: W, ds: &DataSet) -> Result<()> {
    let mut wtr = ::csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    if let Some(h) = &ds.headers {
        wtr.write_record(h)?;
    }
    for r in &ds.rows {
        wtr.write_record(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Whole table as a CSV string (tests, diffs).
pub fn to_csv_string(ds: &DataSet) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_table(&mut buf, ds)?;
    Ok(match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    })
}
