#![deny(warnings)]

//! Persistence layer: flat CSV export of generated tables and JSON snapshots.
//!
//! Nothing is ever read back into the simulation; [`read_csv`] exists so an
//! export can be checked or reloaded for plotting.

use oil_core::{file_stem, table_header, SeriesTable, ValidationError, YearRow};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Header row does not match the export layout.
    #[error("unexpected header: {found:?}")]
    Header { found: Vec<String> },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// File name of the CSV export, e.g. `Lavande_pharmacopoeia_data_2000_2025.csv`.
pub fn csv_file_name(oil: &str, start_year: i32, end_year: i32) -> String {
    format!("{}_pharmacopoeia_data_{start_year}_{end_year}.csv", file_stem(oil))
}

/// Writes `table` as CSV: the `Annee` column, then every metric.
pub fn write_table<W: Write>(table: &SeriesTable, out: W) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(table_header())?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `table` to `dir/file_name`, returning the full path.
pub fn write_csv(
    table: &SeriesTable,
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name);
    let file = File::create(&path)?;
    write_table(table, BufWriter::new(file))?;
    info!(path = %path.display(), rows = table.len(), "table exported");
    Ok(path)
}

/// Reads a table previously written by [`write_table`].
pub fn read_table<R: Read>(input: R) -> Result<SeriesTable, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);
    let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if found != table_header() {
        return Err(ExportError::Header { found });
    }
    let rows = reader
        .deserialize::<YearRow>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SeriesTable::new(rows)?)
}

pub fn read_csv(path: &Path) -> Result<SeriesTable, ExportError> {
    read_table(File::open(path)?)
}

/// Writes any serializable value as pretty JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    info!(path = %path.display(), "json written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oil_core::{resolve_profile, Metric, SimConfig};
    use oil_sim::MetricSimulator;
    use proptest::prelude::*;

    fn generated() -> SeriesTable {
        MetricSimulator::new(resolve_profile("Eucalyptus"), SimConfig::default())
            .unwrap()
            .run()
            .unwrap()
    }

    #[test]
    fn file_name_follows_pattern() {
        assert_eq!(
            csv_file_name("Lavande", 2000, 2025),
            "Lavande_pharmacopoeia_data_2000_2025.csv"
        );
        assert_eq!(
            csv_file_name("Arbre à Thé", 1990, 2000),
            "Arbre à Thé_pharmacopoeia_data_1990_2000.csv"
        );
        assert_eq!(
            csv_file_name("../x", 2000, 2001),
            ".._x_pharmacopoeia_data_2000_2001.csv"
        );
    }

    #[test]
    fn csv_roundtrip_through_file() {
        let table = generated();
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&table, dir.path(), &csv_file_name("Eucalyptus", 2000, 2025)).unwrap();
        assert!(path.exists());

        let text = std::fs::read_to_string(&path).unwrap();
        let header: Vec<&str> = text.lines().next().unwrap().split(',').collect();
        assert_eq!(header, table_header());
        assert_eq!(text.lines().count(), 27);

        let back = read_csv(&path).unwrap();
        assert_eq!(back.len(), table.len());
        assert_eq!(back.years(), table.years());
        for (a, b) in table.rows().iter().zip(back.rows()) {
            for m in Metric::ALL {
                let (x, y) = (a.get(m), b.get(m));
                assert!((x - y).abs() <= 1e-9 * x.abs().max(1.0), "{m:?}: {x} vs {y}");
            }
        }
    }

    #[test]
    fn empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_table(&SeriesTable::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        let back = read_table(text.as_bytes()).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn foreign_header_is_rejected() {
        let input = "year,production\n2000,1.0\n";
        match read_table(input.as_bytes()) {
            Err(ExportError::Header { found }) => assert_eq!(found, vec!["year", "production"]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn gap_in_years_is_rejected() {
        let table = generated();
        let mut buf = Vec::new();
        write_table(&table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines: Vec<&str> = text.lines().collect();
        lines.remove(3);
        let broken = lines.join("\n");
        assert!(matches!(
            read_table(broken.as_bytes()),
            Err(ExportError::Invalid(ValidationError::NonContiguousYears { .. }))
        ));
    }

    #[test]
    fn json_snapshot_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        write_json(&resolve_profile("Lavande"), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["production_base"], 150.0);
    }

    proptest! {
        #[test]
        fn arbitrary_values_roundtrip(values in proptest::collection::vec(-1e6f64..1e6, 20)) {
            let row = Metric::ALL
                .into_iter()
                .zip(values.iter().copied())
                .fold(oil_core::YearRow::empty(2000), |r, (m, v)| r.with(m, v));
            let table = SeriesTable::new(vec![row.clone()]).unwrap();
            let mut buf = Vec::new();
            write_table(&table, &mut buf).unwrap();
            let back = read_table(buf.as_slice()).unwrap();
            prop_assert_eq!(back.rows()[0].clone(), row);
        }
    }
}
