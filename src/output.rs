//! Terminal rendering for records and table reports

use owo_colors::OwoColorize;
use tabled::{settings::Style, Table, Tabled};

use crate::record::NotificationRecord;
use crate::resolver::TableReport;

const TEXT_PREVIEW_CHARS: usize = 60;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "App")]
    app: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Text")]
    text: String,
    #[tabled(rename = "When")]
    datetime: String,
}

/// Render resolved records as a rounded table, newest first as given
pub fn records_table(records: &[NotificationRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let rows: Vec<RecordRow> = records
        .iter()
        .map(|record| RecordRow {
            app: record.app.clone(),
            title: truncate(&record.title, TEXT_PREVIEW_CHARS),
            text: truncate(&record.text, TEXT_PREVIEW_CHARS),
            datetime: record.datetime.to_string(),
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Columns")]
    columns: String,
    #[tabled(rename = "Mapped")]
    mapped: String,
    #[tabled(rename = "Candidate")]
    candidate: String,
}

/// Render the per-table resolver view: columns, mapping, verdict
pub fn tables_report(reports: &[TableReport]) -> String {
    if reports.is_empty() {
        return String::new();
    }

    let rows: Vec<ReportRow> = reports
        .iter()
        .map(|report| {
            let columns: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
            let mapped: Vec<String> = report
                .mapping
                .mapped()
                .iter()
                .map(|(field, column)| format!("{}←{}", field, column))
                .collect();
            ReportRow {
                table: report.name.clone(),
                columns: truncate(&columns.join(", "), TEXT_PREVIEW_CHARS),
                mapped: mapped.join(", "),
                candidate: if report.is_candidate() { "yes" } else { "" }.to_string(),
            }
        })
        .collect();

    Table::new(&rows).with(Style::rounded()).to_string()
}

/// Dimmed empty-state line
pub fn empty_state(message: &str) -> String {
    format!("∅ {}", message.dimmed())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Timestamp;

    #[test]
    fn test_records_table_contains_fields() {
        let records = vec![NotificationRecord {
            id: "1".to_string(),
            app: "Mail".to_string(),
            title: "Hello".to_string(),
            text: "world".to_string(),
            datetime: Timestamp::Invalid("soonish".to_string()),
        }];

        let rendered = records_table(&records);
        assert!(rendered.contains("Mail"));
        assert!(rendered.contains("Hello"));
        assert!(rendered.contains("soonish"));
    }

    #[test]
    fn test_empty_records_render_nothing() {
        assert_eq!(records_table(&[]), "");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 60), "short");
        let long = "ä".repeat(100);
        let cut = truncate(&long, 60);
        assert_eq!(cut.chars().count(), 61); // 60 chars plus ellipsis
    }
}
