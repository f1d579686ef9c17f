use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tablesmith_core::Schema;

use crate::errors::ExportError;
use crate::model::Dataset;

/// File name used for downloaded exports.
pub const EXPORT_FILE_NAME: &str = "generated_data.csv";

/// Encode the dataset as CSV in live schema column order.
///
/// Every field is double-quoted with inner quotes doubled, the header row
/// comes first and missing values are empty fields. An empty schema still
/// emits one blank line for the header and one per row.
pub fn encode_csv(schema: &Schema, dataset: &Dataset) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, schema, dataset)?;
    Ok(String::from_utf8(buffer)?)
}

/// Write the CSV export to `path`, returning the number of bytes written.
pub fn write_csv(path: &Path, schema: &Schema, dataset: &Dataset) -> Result<u64, ExportError> {
    let writer = BufWriter::new(File::create(path)?);
    let mut counting = CountingWriter::new(writer);
    write_records(&mut counting, schema, dataset)?;
    counting.flush()?;
    Ok(counting.bytes_written())
}

fn write_records<W: Write>(
    mut out: W,
    schema: &Schema,
    dataset: &Dataset,
) -> Result<(), ExportError> {
    if schema.is_empty() {
        for _ in 0..=dataset.len() {
            out.write_all(b"\n")?;
        }
        out.flush()?;
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(schema.names())?;
    for record in dataset.project(schema) {
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tablesmith_core::ColumnDefinition;

    use super::*;
    use crate::model::Row;

    fn schema(names: &[&str]) -> Schema {
        names
            .iter()
            .map(|name| ColumnDefinition::new(*name, ""))
            .collect()
    }

    #[test]
    fn quotes_every_field_and_doubles_inner_quotes() {
        let row: Row = [("name", json!("Widget \"Pro\"")), ("price", json!(9.5))]
            .into_iter()
            .collect();
        let dataset = Dataset::new(Schema::new(), vec![row]);

        let csv = encode_csv(&schema(&["name", "price"]), &dataset).expect("encode");
        assert_eq!(csv, "\"name\",\"price\"\n\"Widget \"\"Pro\"\"\",\"9.5\"\n");
    }

    #[test]
    fn missing_and_null_values_are_empty_fields() {
        let row: Row = [("a", json!(null))].into_iter().collect();
        let dataset = Dataset::new(Schema::new(), vec![row]);

        let csv = encode_csv(&schema(&["a", "b"]), &dataset).expect("encode");
        assert_eq!(csv, "\"a\",\"b\"\n\"\",\"\"\n");
        assert!(!csv.contains("null"));
    }

    #[test]
    fn empty_dataset_is_header_only() {
        let csv = encode_csv(&schema(&["id"]), &Dataset::empty()).expect("encode");
        assert_eq!(csv, "\"id\"\n");
    }

    #[test]
    fn empty_schema_keeps_one_line_per_row() {
        let rows: Vec<Row> = (0..2)
            .map(|idx| [("gone", json!(idx))].into_iter().collect())
            .collect();
        let dataset = Dataset::new(schema(&["gone"]), rows);

        assert_eq!(encode_csv(&Schema::new(), &dataset).expect("encode"), "\n\n\n");
        assert_eq!(encode_csv(&Schema::new(), &Dataset::empty()).expect("encode"), "\n");
    }

    #[test]
    fn write_reports_bytes() {
        let path = std::env::temp_dir().join(format!(
            "tablesmith_export_{}_{}",
            std::process::id(),
            EXPORT_FILE_NAME
        ));
        let bytes = write_csv(&path, &schema(&["id"]), &Dataset::empty()).expect("write csv");
        assert_eq!(bytes, 5);
        assert_eq!(std::fs::read_to_string(&path).expect("read csv"), "\"id\"\n");
        std::fs::remove_file(&path).ok();
    }
}
