//! CSV export of a report selection.
//!
//! Comma-separated, CRLF between rows, fields quoted only when they contain a
//! quote, comma, or line break.

use std::borrow::Cow;

use super::draft::ReportMetadata;
use super::selection::SelectedRow;

const METADATA_HEADERS: [&str; 3] = ["Entidad", "Gestor", "Plazo"];
const ITEM_HEADERS: [&str; 6] = [
    "Comisión",
    "Instrucción",
    "Materia",
    "Submateria",
    "Línea de trabajo",
    "Año",
];

/// Header row: report metadata columns, then item columns.
#[must_use]
pub fn headers() -> Vec<&'static str> {
    METADATA_HEADERS.iter().chain(ITEM_HEADERS.iter()).copied().collect()
}

/// One record per row. `Plazo` is the row's own deadline.
#[must_use]
pub fn rows(metadata: &ReportMetadata, rows: &[&SelectedRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            let item = &row.item;
            vec![
                metadata.entity.clone(),
                metadata.manager.clone(),
                row.deadline.clone(),
                item.commission.clone(),
                item.instruction.clone(),
                item.matter.clone(),
                item.submatter.clone(),
                item.work_line.clone().unwrap_or_default(),
                item.year.to_string(),
            ]
        })
        .collect()
}

/// Join records into CSV text.
#[must_use]
pub fn stringify<R, S>(records: &[R]) -> String
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    records
        .iter()
        .map(|record| {
            record
                .as_ref()
                .iter()
                .map(|value| escape(value.as_ref()))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Full document: header row followed by one record per row.
#[must_use]
pub fn render(metadata: &ReportMetadata, selected: &[&SelectedRow]) -> String {
    let header: Vec<String> = headers().into_iter().map(str::to_string).collect();
    let mut records = Vec::with_capacity(selected.len() + 1);
    records.push(header);
    records.extend(rows(metadata, selected));
    stringify(&records)
}

fn escape(value: &str) -> Cow<'_, str> {
    if value.contains(['"', ',', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
