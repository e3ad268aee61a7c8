use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use rust_xlsxwriter::{Workbook, XlsxError};
use thiserror::Error;

use crate::model::stats::SummaryRecord;

pub const COLUMNS: [&str; 4] = ["name", "mean_distance", "mean_velocity", "orbit_count"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn default_path(self) -> PathBuf {
        PathBuf::from(format!("output.{}", self.extension()))
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not write spreadsheet: {0}")]
    Xlsx(#[from] XlsxError),
}

pub fn export(
    records: &[SummaryRecord],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.to_owned(),
        source,
    };

    match format {
        ExportFormat::Csv => {
            let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
            write_csv(records, &mut writer).map_err(io_error)
        }
        ExportFormat::Json => {
            let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
            write_json(records, &mut writer)?;
            writer.flush().map_err(io_error)
        }
        ExportFormat::Xlsx => Ok(write_xlsx(records, path)?),
    }
}

pub fn write_csv<W: Write>(records: &[SummaryRecord], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", COLUMNS.join(","))?;
    for record in records {
        writeln!(
            writer,
            "{},{},{},{}",
            csv_field(&record.name),
            record.mean_distance,
            record.mean_velocity,
            record.orbit_count
        )?;
    }
    writer.flush()
}

fn csv_field(field: &str) -> String {
    if field.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

pub fn write_json<W: Write>(
    records: &[SummaryRecord],
    writer: &mut W,
) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(writer, records)
}

pub fn write_xlsx(records: &[SummaryRecord], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;

    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *title)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, record.name.as_str())?;
        sheet.write_number(row, 1, record.mean_distance)?;
        sheet.write_number(row, 2, record.mean_velocity)?;
        sheet.write_number(row, 3, record.orbit_count as f64)?;
    }

    workbook.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<SummaryRecord> {
        vec![
            SummaryRecord {
                name: "Earth".to_owned(),
                mean_distance: 300.5,
                mean_velocity: 3.0,
                orbit_count: 2,
            },
            SummaryRecord {
                name: "Planet, X".to_owned(),
                mean_distance: 10.0,
                mean_velocity: 0.25,
                orbit_count: 0,
            },
        ]
    }

    #[test]
    fn test_csv() {
        let mut out = Vec::new();
        write_csv(&records(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "name,mean_distance,mean_velocity,orbit_count\n\
             Earth,300.5,3,2\n\
             \"Planet, X\",10,0.25,0\n"
        );
    }

    #[test]
    fn test_json_has_four_fields_per_record() {
        let mut out = Vec::new();
        write_json(&records(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        let first = array[0].as_object().unwrap();
        let keys: Vec<_> = first.keys().map(String::as_str).collect();
        assert_eq!(keys, COLUMNS.to_vec());
        assert_eq!(first["orbit_count"], 2);

        let parsed: Vec<SummaryRecord> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, records());
    }

    #[test]
    fn test_default_paths() {
        assert_eq!(ExportFormat::Json.default_path(), PathBuf::from("output.json"));
        assert_eq!(ExportFormat::Csv.default_path(), PathBuf::from("output.csv"));
        assert_eq!(ExportFormat::Xlsx.default_path(), PathBuf::from("output.xlsx"));
    }

    #[test]
    fn test_export_to_disk() {
        let dir = std::env::temp_dir().join(format!("planet-sim-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Xlsx] {
            let path = dir.join(format.default_path());
            export(&records(), format, &path).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
