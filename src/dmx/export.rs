//! Export formatting for address rows
//!
//! Pure formatting over `AddressRow` slices: a CSV document for patch
//! sheets, a tab-separated block for pasting into spreadsheets or chat,
//! and a column-aligned table for the terminal.

use super::plan::AddressRow;

const CSV_HEADER: &str = "#,Name,Universe,Address,Footprint,End,Notes";

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// CSV document with CRLF rows; Name and Notes are quoted
pub fn to_csv(rows: &[AddressRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for row in rows {
        lines.push(format!(
            "{},{},{},{},{},{},{}",
            row.sequence_index,
            csv_quote(&row.label),
            row.universe,
            row.address,
            row.footprint,
            row.end_address,
            csv_quote(&row.notes),
        ));
    }

    lines.join("\r\n")
}

/// Tab-separated clipboard text, one line per fixture
pub fn to_clipboard_text(rows: &[AddressRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\tU{}\t@{}\t{}ch\tend {}\t{}",
                row.sequence_index,
                row.label,
                row.universe,
                row.address,
                row.footprint,
                row.end_address,
                row.notes,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Column-aligned text table for terminal display
pub fn to_table(rows: &[AddressRow]) -> String {
    let headers = ["#", "Name", "Universe", "Address", "Footprint", "End", "Notes"];
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();

    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|row| {
            [
                row.sequence_index.to_string(),
                row.label.clone(),
                row.universe.to_string(),
                row.address.to_string(),
                row.footprint.to_string(),
                row.end_address.to_string(),
                row.notes.clone(),
            ]
        })
        .collect();

    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = Vec::with_capacity(cells.len() + 2);
    out.push(format_line(&headers.map(String::from), &widths));
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        out.push(format_line(row, &widths));
    }

    out.join("\n")
}

fn format_line(cells: &[String; 7], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
