//! Schema resolver
//!
//! Decides which table of a schema-unknown database holds notification-like
//! data and maps its columns onto the canonical record shape.
//!
//! Resolution order:
//! 1. A table literally named `notifications` is authoritative and queried
//!    for the five canonical columns by exact name
//! 2. Otherwise tables are scanned in catalog order; the first structurally
//!    qualifying table wins, even when it holds zero rows
//!
//! The scan is a linear search with no scoring. An ambiguous database with
//! several candidate tables resolves by catalog enumeration order, which is
//! a known fragility kept deliberately over a best-match upgrade.

use crate::loader::{quote_identifier, ColumnDescriptor, Database, Tabular};
use crate::record::{NotificationRecord, Timestamp};
use crate::{Error, Result};

/// Table name treated as authoritative when present (case-sensitive)
const EXACT_TABLE: &str = "notifications";

/// A heuristic table must map at least this many of the five canonical
/// fields. Guards against tables with just an app-like column and one
/// content column but nothing else usable.
const MIN_MAPPED_FIELDS: usize = 3;

/// Recognized column names per canonical field, in priority order.
/// First match wins; matching is exact equality after lowercasing, never
/// substring or fuzzy. Process-wide immutable configuration.
const SYNONYMS: &[(&str, &[&str])] = &[
    ("id", &["id", "_id"]),
    ("app", &["app"]),
    ("title", &["title", "subject"]),
    ("text", &["text", "body", "content"]),
    ("datetime", &["datetime", "date", "timestamp"]),
];

fn synonyms_for(field: &str) -> &'static [&'static str] {
    SYNONYMS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, candidates)| *candidates)
        .unwrap_or(&[])
}

/// Which source column (if any) each canonical field mapped to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    pub id: Option<String>,
    pub app: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub datetime: Option<String>,
}

impl FieldMapping {
    /// Map a table's columns onto the canonical fields.
    ///
    /// Column ordinal order is irrelevant; only lowercased names matter.
    pub fn from_columns(columns: &[ColumnDescriptor]) -> Self {
        let names: Vec<String> = columns.iter().map(|c| c.name.to_lowercase()).collect();
        let pick = |field: &str| {
            synonyms_for(field)
                .iter()
                .find(|candidate| names.iter().any(|name| name == *candidate))
                .map(|candidate| candidate.to_string())
        };

        Self {
            id: pick("id"),
            app: pick("app"),
            title: pick("title"),
            text: pick("text"),
            datetime: pick("datetime"),
        }
    }

    /// Qualification rule: an app column plus at least one content column
    pub fn qualifies(&self) -> bool {
        self.app.is_some() && (self.title.is_some() || self.text.is_some())
    }

    /// How many of the five canonical fields found a source column
    pub fn mapped_count(&self) -> usize {
        self.mapped().len()
    }

    /// Mapped (canonical field, source column) pairs in canonical order
    pub fn mapped(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(col) = &self.id {
            pairs.push(("id", col.as_str()));
        }
        if let Some(col) = &self.app {
            pairs.push(("app", col.as_str()));
        }
        if let Some(col) = &self.title {
            pairs.push(("title", col.as_str()));
        }
        if let Some(col) = &self.text {
            pairs.push(("text", col.as_str()));
        }
        if let Some(col) = &self.datetime {
            pairs.push(("datetime", col.as_str()));
        }
        pairs
    }
}

/// Resolve a loaded database into notification records.
///
/// "No notification data found" is a valid empty result, never an error.
/// Database-access faults surface as distinct error kinds: table
/// enumeration failure is [`Error::SchemaDiscovery`], a malformed exact
/// `notifications` table is [`Error::ExactTableMapping`]. Per-candidate
/// query failures during the heuristic scan are logged and skipped.
///
/// Stateless across invocations; a refresh simply calls this again.
pub fn resolve(db: &Database) -> Result<Vec<NotificationRecord>> {
    let tables = db.tables()?;

    if tables.iter().any(|t| t == EXACT_TABLE) {
        return resolve_exact(db);
    }

    for table in &tables {
        let columns = match db.columns(table) {
            Ok(columns) => columns,
            Err(e) => {
                tracing::warn!("skipping table '{}': {}", table, e);
                continue;
            }
        };
        if columns.is_empty() {
            continue;
        }

        let mapping = FieldMapping::from_columns(&columns);
        if !mapping.qualifies() {
            tracing::debug!("table '{}' does not qualify", table);
            continue;
        }
        if mapping.mapped_count() < MIN_MAPPED_FIELDS {
            tracing::debug!(
                "table '{}' qualifies but maps only {} fields",
                table,
                mapping.mapped_count()
            );
            continue;
        }

        tracing::info!("found candidate notification table '{}'", table);
        let sql = build_select(table, &mapping);

        match db.query(&sql) {
            // First structurally qualifying table wins, even when empty
            Ok(result) => return Ok(materialize(&result)),
            Err(e) => {
                let err = Error::QueryExecution(table.clone(), e.to_string());
                tracing::warn!("{}", err);
                continue;
            }
        }
    }

    Ok(Vec::new())
}

/// Query the exact-name table for the five canonical columns.
///
/// The table is assumed well-formed by construction; a missing column is a
/// fatal mapping error, not a reason to fall back to the heuristic scan.
fn resolve_exact(db: &Database) -> Result<Vec<NotificationRecord>> {
    let sql = "SELECT id, app, title, text, datetime FROM notifications ORDER BY datetime DESC";
    let result = db
        .query(sql)
        .map_err(|e| Error::ExactTableMapping(e.to_string()))?;
    Ok(materialize(&result))
}

/// Build the select over the mapped columns, aliased to canonical names,
/// newest first. Falls back to `rowid` ordering when no timestamp column
/// was mapped, as a deterministic stand-in for insertion order.
fn build_select(table: &str, mapping: &FieldMapping) -> String {
    let select: Vec<String> = mapping
        .mapped()
        .iter()
        .map(|(field, column)| format!("{} AS {}", quote_identifier(column), field))
        .collect();

    let order = mapping
        .datetime
        .as_deref()
        .map(quote_identifier)
        .unwrap_or_else(|| "rowid".to_string());

    format!(
        "SELECT {} FROM {} ORDER BY {} DESC",
        select.join(", "),
        quote_identifier(table),
        order
    )
}

/// Turn query rows into full five-field records.
///
/// Every selected column passes through as display text except the
/// `datetime` alias, which is parsed; unselected fields keep their
/// empty-string defaults.
fn materialize(result: &Tabular) -> Vec<NotificationRecord> {
    result
        .rows
        .iter()
        .map(|row| {
            let mut record = NotificationRecord::empty();
            for (i, column) in result.columns.iter().enumerate() {
                match column.as_str() {
                    "id" => record.id = row[i].to_display_string(),
                    "app" => record.app = row[i].to_display_string(),
                    "title" => record.title = row[i].to_display_string(),
                    "text" => record.text = row[i].to_display_string(),
                    "datetime" => record.datetime = Timestamp::parse(&row[i]),
                    _ => {}
                }
            }
            record
        })
        .collect()
}

/// Count notification rows without materializing them.
///
/// Counts the exact `notifications` table when present, otherwise the first
/// table that can be counted. Failures are logged and reported as zero.
pub fn count(db: &Database) -> usize {
    let tables = match db.tables() {
        Ok(tables) => tables,
        Err(e) => {
            tracing::warn!("count failed: {}", e);
            return 0;
        }
    };

    if tables.iter().any(|t| t == EXACT_TABLE) {
        return count_table(db, EXACT_TABLE).unwrap_or(0);
    }

    for table in &tables {
        match count_table(db, table) {
            Ok(n) => return n,
            Err(e) => {
                tracing::debug!("could not count table '{}': {}", table, e);
                continue;
            }
        }
    }

    0
}

fn count_table(db: &Database, table: &str) -> Result<usize> {
    let sql = format!("SELECT count(*) FROM {}", quote_identifier(table));
    let result = db.query(&sql)?;
    match result.rows.first().and_then(|row| row.first()) {
        Some(crate::loader::Scalar::Integer(n)) => Ok(*n as usize),
        _ => Ok(0),
    }
}

/// What the resolver sees in one table: its columns, the field mapping
/// they produce, and the qualification verdict
#[derive(Debug, Clone)]
pub struct TableReport {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub mapping: FieldMapping,
}

impl TableReport {
    /// Whether the heuristic scan would accept this table
    pub fn is_candidate(&self) -> bool {
        self.mapping.qualifies() && self.mapping.mapped_count() >= MIN_MAPPED_FIELDS
    }
}

/// Describe every table the way the resolver would see it
pub fn inspect(db: &Database) -> Result<Vec<TableReport>> {
    let mut reports = Vec::new();
    for table in db.tables()? {
        let columns = match db.columns(&table) {
            Ok(columns) => columns,
            Err(e) => {
                tracing::warn!("could not read columns of '{}': {}", table, e);
                Vec::new()
            }
        };
        let mapping = FieldMapping::from_columns(&columns);
        reports.push(TableReport {
            name: table,
            columns,
            mapping,
        });
    }
    Ok(reports)
}
