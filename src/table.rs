use crate::error::*;
use crate::record::RunRecord;
use crate::summary::AverageRow;
use serde::Serialize;
use std::path::Path;

fn table_error(path: &Path) -> impl FnOnce(csv::Error) -> Error + '_ {
    move |source| Error::Table {
        path: path.to_path_buf(),
        source,
    }
}

/// The header comes from the first serialized row, so an empty table
/// gets `columns` written out instead.
fn write_rows<P: AsRef<Path>, T: Serialize>(
    rows: &[T],
    columns: &[&str],
    path: &P,
) -> Result<()> {
    let path = path.as_ref();
    log::info!("Writing: {path:?}");
    let mut writer = csv::Writer::from_path(path).map_err(table_error(path))?;
    if rows.is_empty() {
        writer.write_record(columns).map_err(table_error(path))?;
    }
    for row in rows {
        writer.serialize(row).map_err(table_error(path))?;
    }
    writer
        .flush()
        .map_err(|e| table_error(path)(csv::Error::from(e)))?;
    Ok(())
}

/// One row per record, header first.
pub fn write_records<P: AsRef<Path>>(
    records: &[RunRecord],
    path: &P,
) -> Result<()> {
    write_rows(records, &RunRecord::COLUMNS, path)
}

pub fn write_averages<P: AsRef<Path>>(
    rows: &[AverageRow],
    path: &P,
) -> Result<()> {
    write_rows(rows, &AverageRow::COLUMNS, path)
}

/// Load a results table written by `write_records`.
/// Captured output is not part of the table and comes back empty.
pub fn read_records<P: AsRef<Path>>(path: &P) -> Result<Vec<RunRecord>> {
    let path = path.as_ref();
    log::info!("Reading: {path:?}");
    let mut reader = csv::Reader::from_path(path).map_err(table_error(path))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<RunRecord>, _>>()
        .map_err(table_error(path))
}
