//! File renderings of a query result for download.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::TabularResult;

const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Download name, e.g. `query_results_2025-01-31.csv`
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!("query_results_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Header row plus one line per row, quoting only where needed.
/// Spreadsheet targets want the BOM to pick up UTF-8.
pub fn to_csv(result: &TabularResult, with_bom: bool) -> Result<String, AppError> {
    if result.column_count() == 0 {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(result.columns())?;
    for row in result.rows() {
        writer.write_record(row.iter().map(|cell| cell.display()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Export(e.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|e| AppError::Export(e.to_string()))?;

    let mut out = String::with_capacity(body.len() + UTF8_BOM.len());
    if with_bom {
        out.push_str(UTF8_BOM);
    }
    // no trailing newline after the last record
    out.push_str(body.trim_end_matches('\n'));
    Ok(out)
}

/// Pretty-printed array of objects in column order.
pub fn to_json(result: &TabularResult) -> Result<String, AppError> {
    if result.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_json::to_string_pretty(&result.to_records())?)
}

pub fn render(result: &TabularResult, format: ExportFormat) -> Result<String, AppError> {
    match format {
        ExportFormat::Csv => to_csv(result, true),
        ExportFormat::Json => to_json(result),
    }
}
