//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// A generic resource listing: raw records plus the columns to show
/// in table mode. JSON mode emits the records unmodified.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Attribute names shown as table columns, in order.
    pub columns: Vec<String>,
    /// The records as the service returned them.
    pub items: Vec<Value>,
}

impl Listing {
    /// A listing showing the given attributes of each record.
    #[must_use]
    pub fn new(columns: &[&str], items: Vec<Value>) -> Self {
        Self {
            columns: columns.iter().map(ToString::to_string).collect(),
            items,
        }
    }

    fn cell(&self, item: &Value, column: &str) -> String {
        match item.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl TableDisplay for Listing {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.items.is_empty() {
            writeln!(writer, "No results")?;
            return Ok(());
        }

        let mut widths: Vec<usize> = self.columns.iter().map(String::len).collect();
        let rows: Vec<Vec<String>> = self
            .items
            .iter()
            .map(|item| {
                self.columns
                    .iter()
                    .map(|column| self.cell(item, column))
                    .collect()
            })
            .collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        for (column, &width) in self.columns.iter().zip(&widths) {
            write!(writer, "{:<width$}  ", column.to_uppercase())?;
        }
        writeln!(writer)?;
        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len();
        writeln!(writer, "{}", "─".repeat(total))?;
        for row in &rows {
            for (cell, &width) in row.iter().zip(&widths) {
                write!(writer, "{cell:<width$}  ")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

/// A single resource shown as key/value lines.
#[derive(Debug, Clone)]
pub struct Detail {
    /// The record as the service returned it.
    pub item: Value,
}

impl Serialize for Detail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.item.serialize(serializer)
    }
}

impl TableDisplay for Detail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let Value::Object(map) = &self.item else {
            writeln!(writer, "{}", self.item)?;
            return Ok(());
        };
        let width = map.keys().map(String::len).max().unwrap_or(0);
        for (key, value) in map {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            writeln!(writer, "{key:<width$}  {rendered}")?;
        }
        Ok(())
    }
}

/// One row of the supported-versions table.
#[derive(Debug, Clone, Serialize)]
pub struct VersionSupport {
    /// Service name.
    pub service: String,
    /// Versions this client can speak.
    pub supported: Vec<String>,
    /// Version preferred without an explicit request.
    pub default: String,
}

/// Supported API versions, per service.
#[derive(Debug, Clone, Serialize)]
pub struct VersionSupportList {
    /// One entry per service.
    pub services: Vec<VersionSupport>,
}

impl TableDisplay for VersionSupportList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "{:<14}  {:<20}  {:<8}",
            "SERVICE", "SUPPORTED", "DEFAULT"
        )?;
        writeln!(writer, "{}", "─".repeat(48))?;
        for entry in &self.services {
            writeln!(
                writer,
                "{:<14}  {:<20}  {:<8}",
                entry.service,
                entry.supported.join(", "),
                entry.default
            )?;
        }
        Ok(())
    }
}

/// The outcome of a version negotiation.
#[derive(Debug, Clone, Serialize)]
pub struct Negotiation {
    /// Service negotiated with.
    pub service: String,
    /// Version the server committed to.
    pub server_version: String,
    /// Version the client speaks.
    pub client_version: String,
    /// Endpoint the client is bound to.
    pub endpoint: String,
}

impl TableDisplay for Negotiation {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Service:         {}", self.service)?;
        writeln!(writer, "Server version:  {}", self.server_version)?;
        writeln!(writer, "Client version:  {}", self.client_version)?;
        writeln!(writer, "Endpoint:        {}", self.endpoint)?;
        Ok(())
    }
}

/// A simple status message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
}

impl Message {
    /// A success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Message", 2)?;
        state.serialize_field("success", &self.success)?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn listing_table_shows_the_requested_columns() {
        let listing = Listing::new(
            &["name", "status"],
            vec![
                json!({"id": "1", "name": "web", "status": "ACTIVE"}),
                json!({"id": "2", "name": "db", "status": "SHUTOFF"}),
            ],
        );
        let format = OutputFormat::new(Format::Table);
        let mut buf = Vec::new();
        format.write(&mut buf, &listing).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("NAME"));
        assert!(out.contains("web"));
        assert!(out.contains("SHUTOFF"));
        assert!(!out.contains("\"id\""));
    }

    #[test]
    fn listing_json_emits_the_raw_records() {
        let listing = Listing::new(&["name"], vec![json!({"id": "1", "name": "web"})]);
        let format = OutputFormat::new(Format::Json);
        let mut buf = Vec::new();
        format.write(&mut buf, &listing).unwrap();
        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, json!([{"id": "1", "name": "web"}]));
    }

    #[test]
    fn empty_listing_says_so() {
        let listing = Listing::new(&["name"], vec![]);
        let mut buf = Vec::new();
        listing.write_table(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No results\n");
    }

    #[test]
    fn detail_table_lines_up_keys() {
        let detail = Detail {
            item: json!({"id": "abc", "name": "net0"}),
        };
        let mut buf = Vec::new();
        detail.write_table(&mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("id    abc"));
        assert!(out.contains("name  net0"));
    }

    #[test]
    fn missing_attributes_render_empty() {
        let listing = Listing::new(&["name", "size"], vec![json!({"name": "x"})]);
        assert_eq!(listing.cell(&listing.items[0], "size"), "");
    }
}
