//! Plain-text rendering of the column list and the generated table.

use tablesmith_core::Schema;
use tablesmith_generate::Dataset;

pub const EMPTY_SCHEMA_MESSAGE: &str = "Add columns to generate data";
pub const NO_COLUMNS_MESSAGE: &str = "No columns added";
const MAX_CELL_WIDTH: usize = 40;

/// One line per column: position, name and description.
pub fn render_columns(schema: &Schema) -> String {
    if schema.is_empty() {
        return NO_COLUMNS_MESSAGE.to_string();
    }

    schema
        .iter()
        .enumerate()
        .map(|(idx, col)| format!("[{idx}] {}: {}", col.name, col.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the committed rows against the live schema.
///
/// Image columns show their value as an image reference; the value itself is
/// not altered.
pub fn render_table(schema: &Schema, dataset: &Dataset) -> String {
    if schema.is_empty() {
        return EMPTY_SCHEMA_MESSAGE.to_string();
    }

    let mut header = vec!["#".to_string()];
    header.extend(schema.iter().map(|col| col.name.clone()));

    let mut body: Vec<Vec<String>> = Vec::with_capacity(dataset.len());
    for (idx, cells) in dataset.project(schema).into_iter().enumerate() {
        let mut line = vec![(idx + 1).to_string()];
        for (col, cell) in schema.iter().zip(cells) {
            if col.is_image() && !cell.is_empty() {
                line.push(format!("[image] {cell}"));
            } else {
                line.push(cell);
            }
        }
        body.push(line);
    }

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(body.iter())
                .map(|line| display_width(&line[col]))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(format_line(&header, &widths));
    out.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for line in &body {
        out.push(format_line(line, &widths));
    }
    if body.is_empty() {
        out.push("(no rows)".to_string());
    }
    out.join("\n")
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let cell = truncate(cell, *width);
            let pad = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn truncate(cell: &str, width: usize) -> String {
    let cell = cell.replace('\n', " ");
    if display_width(&cell) <= width {
        return cell;
    }
    let mut out: String = cell.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn display_width(cell: &str) -> usize {
    cell.chars().count()
}
