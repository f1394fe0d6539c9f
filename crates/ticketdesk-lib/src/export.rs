//! Read-only export snapshots (CSV and JSON).
//!
//! Exports are not re-importable; the JSON dump uses the same shape as the
//! backing file, the CSV flattens each ticket into one row.

use std::io::Write;

use serde::Serialize;

use crate::error::{Result, TicketError};
use crate::json_file;
use crate::model::{Ticket, Timestamp};

/// CSV column order.
pub const CSV_COLUMNS: [&str; 10] = [
    "id",
    "title",
    "category",
    "priority",
    "status",
    "created_at",
    "exchanges",
    "answered",
    "last_response_at",
    "tags",
];

/// Supported export formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(TicketError::validation(
                "format",
                format!("unknown export format '{other}' (csv, json)"),
            )),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: u64,
    title: &'a str,
    category: &'a str,
    priority: &'a str,
    status: &'a str,
    created_at: &'a str,
    exchanges: usize,
    answered: usize,
    last_response_at: &'a str,
    tags: String,
}

impl<'a> CsvRow<'a> {
    fn from_ticket(ticket: &'a Ticket) -> Self {
        Self {
            id: ticket.id,
            title: &ticket.title,
            category: &ticket.category,
            priority: &ticket.priority,
            status: &ticket.status,
            created_at: ticket.created_at.as_str(),
            exchanges: ticket.exchanges.len(),
            answered: ticket.answered_count(),
            last_response_at: ticket.latest_response_at().map_or("", Timestamp::as_str),
            tags: ticket.tags.join("; "),
        }
    }
}

/// Write tickets as CSV, header first (also for an empty input).
///
/// # Errors
///
/// Returns `Csv` if a row cannot be written.
pub fn write_csv<'a, W, I>(writer: W, tickets: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Ticket>,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_COLUMNS)?;
    for ticket in tickets {
        wtr.serialize(CsvRow::from_ticket(ticket))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render tickets as a CSV string.
///
/// # Errors
///
/// Returns `Csv` on serialization failure or `Export` if the buffer is
/// not valid UTF-8.
pub fn to_csv<'a, I>(tickets: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    let mut buf = Vec::new();
    write_csv(&mut buf, tickets)?;
    String::from_utf8(buf).map_err(|e| TicketError::Export(e.to_string()))
}

/// Render tickets in the chosen format.
///
/// # Errors
///
/// Propagates CSV or JSON serialization failures.
pub fn export<'a, I>(tickets: I, format: ExportFormat) -> Result<String>
where
    I: IntoIterator<Item = &'a Ticket>,
{
    match format {
        ExportFormat::Csv => to_csv(tickets),
        ExportFormat::Json => {
            let owned: Vec<Ticket> = tickets.into_iter().cloned().collect();
            json_file::to_pretty_json(&owned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Exchange;

    fn ticket() -> Ticket {
        let at = Timestamp::from_raw("2024-04-02 09:15:00");
        Ticket {
            id: 12,
            title: "Printer, 3rd floor".to_string(),
            description: "Paper jam".to_string(),
            category: "Bug".to_string(),
            priority: "High".to_string(),
            status: "Open".to_string(),
            created_at: at.clone(),
            tags: vec!["hardware".into(), "office".into()],
            comments: Vec::new(),
            exchanges: vec![
                Exchange {
                    response_at: Some(Timestamp::from_raw("2024-04-02 10:00:00")),
                    ..Exchange::question("Paper jam", at.clone())
                },
                Exchange::question("Still jammed", at),
            ],
            support_response_at: Some(Timestamp::from_raw("2024-04-02 10:00:00")),
        }
    }

    #[test]
    fn csv_has_header_and_quotes_commas() {
        let tickets = vec![ticket()];
        let csv = to_csv(&tickets).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_COLUMNS.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some("12,\"Printer, 3rd floor\",Bug,High,Open,2024-04-02 09:15:00,2,1,2024-04-02 10:00:00,hardware; office")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_of_empty_collection_is_header_only() {
        let csv = to_csv(std::iter::empty()).unwrap();
        assert_eq!(csv, format!("{}\n", CSV_COLUMNS.join(",")));
    }

    #[test]
    fn json_export_matches_file_shape() {
        let tickets = vec![ticket()];
        let json = export(&tickets, ExportFormat::Json).unwrap();
        let parsed: Vec<Ticket> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tickets);
    }

    #[test]
    fn format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
