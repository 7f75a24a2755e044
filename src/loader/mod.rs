//! Database loader
//!
//! Materializes a raw SQLite byte buffer into a queryable instance and
//! exposes the generic primitives the schema resolver builds on: list
//! tables, list a table's columns, run a query and get typed rows.
//!
//! Opened buffers are read-only; nothing in this crate writes to a loaded
//! database. The buffer is spooled to a private temp file owned by the
//! handle, which removes it on drop.

pub mod engine;
pub mod value;

use std::io::Write;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tempfile::NamedTempFile;

use crate::{Error, Result};
pub use engine::Engine;
pub use value::Scalar;

/// SQLite magic header: every well-formed database file starts with this.
const SQLITE_MAGIC: &[u8] = b"SQLite format 3\0";

/// A column as reported by the table catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Zero-based position within the table definition
    pub ordinal: i64,
    /// Column name as declared (comparisons elsewhere are case-insensitive)
    pub name: String,
    /// Declared type, possibly empty for untyped columns
    pub declared_type: String,
}

/// A generic query result: column names plus rows of typed scalars
#[derive(Debug, Clone)]
pub struct Tabular {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

/// Handle to a loaded SQLite database
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    // Keeps the backing temp file alive for byte-buffer opens
    _spool: Option<NamedTempFile>,
}

impl Database {
    /// Open a raw byte buffer as a read-only database instance.
    ///
    /// Fails with [`Error::CorruptDatabase`] when the buffer is not a
    /// readable SQLite file.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        Engine::global();

        if bytes.len() < SQLITE_MAGIC.len() || !bytes.starts_with(SQLITE_MAGIC) {
            return Err(Error::CorruptDatabase(
                "missing SQLite file header".to_string(),
            ));
        }

        let mut spool = NamedTempFile::new()?;
        spool.write_all(bytes)?;
        spool.flush()?;

        let conn = Connection::open_with_flags(
            spool.path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::CorruptDatabase(e.to_string()))?;

        // Trial schema read: a truncated or garbled file often opens fine
        // and only fails on first access.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| Error::CorruptDatabase(e.to_string()))?;

        Ok(Self {
            conn,
            _spool: Some(spool),
        })
    }

    /// Open a database file from disk.
    ///
    /// Reads the file and delegates to [`Database::open`] so both entry
    /// points share the same validation.
    pub fn open_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::open(&bytes)
    }

    /// Open a writable in-memory database (for testing and fixtures)
    pub fn open_in_memory() -> Result<Self> {
        Engine::global();
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, _spool: None })
    }

    /// Execute a batch of SQL statements (for testing and fixtures)
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// List user table names in catalog order, excluding SQLite internals.
    ///
    /// Failure here is fatal to resolution: without the table list nothing
    /// downstream can run, so it surfaces as [`Error::SchemaDiscovery`].
    pub fn tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'")
            .map_err(|e| Error::SchemaDiscovery(e.to_string()))?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| Error::SchemaDiscovery(e.to_string()))?;

        Ok(names)
    }

    /// Fetch the column descriptors for a table in declaration order
    pub fn columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let sql = format!("PRAGMA table_info({})", quote_identifier(table));
        let mut stmt = self.conn.prepare(&sql)?;

        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnDescriptor {
                    ordinal: row.get(0)?,
                    name: row.get(1)?,
                    declared_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(columns)
    }

    /// Run a query and materialize every row as typed scalars
    pub fn query(&self, sql: &str) -> Result<Tabular> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let count = stmt.column_count();

        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(count);
                for i in 0..count {
                    values.push(Scalar::from(row.get_ref(i)?));
                }
                Ok(values)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Tabular { columns, rows })
    }
}

/// Double-quote an identifier for safe interpolation into SQL text.
///
/// Table names come from the catalog of an untrusted file, so they are
/// always quoted rather than spliced in bare.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.execute_batch(
            r#"
            CREATE TABLE msgs (_id INTEGER PRIMARY KEY, app TEXT, content TEXT);
            INSERT INTO msgs VALUES (1, 'Mail', 'Hello world');
            CREATE TABLE settings (key TEXT, value TEXT);
            "#,
        )
        .unwrap();
        db
    }

    #[test]
    fn test_tables_in_catalog_order() {
        let db = sample_db();
        assert_eq!(db.tables().unwrap(), vec!["msgs", "settings"]);
    }

    #[test]
    fn test_columns() {
        let db = sample_db();
        let cols = db.columns("msgs").unwrap();
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0].name, "_id");
        assert_eq!(cols[0].ordinal, 0);
        assert_eq!(cols[1].declared_type, "TEXT");
    }

    #[test]
    fn test_query_typed_rows() {
        let db = sample_db();
        let result = db.query("SELECT _id, app FROM msgs").unwrap();
        assert_eq!(result.columns, vec!["_id", "app"]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0][0], Scalar::Integer(1));
        assert_eq!(result.rows[0][1], Scalar::Text("Mail".to_string()));
    }

    #[test]
    fn test_open_rejects_garbage() {
        let err = Database::open(b"definitely not a database").unwrap_err();
        assert!(matches!(err, Error::CorruptDatabase(_)));
    }

    #[test]
    fn test_open_rejects_truncated_header() {
        let err = Database::open(b"SQLi").unwrap_err();
        assert!(matches!(err, Error::CorruptDatabase(_)));
    }

    #[test]
    fn test_open_from_bytes_roundtrip() {
        // Author a real database file, then reload it through the byte path.
        let file = NamedTempFile::new().unwrap();
        {
            let conn = Connection::open(file.path()).unwrap();
            conn.execute_batch(
                "CREATE TABLE notes (app TEXT, body TEXT);
                 INSERT INTO notes VALUES ('Chat', 'ping');",
            )
            .unwrap();
        }

        let bytes = std::fs::read(file.path()).unwrap();
        let db = Database::open(&bytes).unwrap();
        assert_eq!(db.tables().unwrap(), vec!["notes"]);

        let result = db.query("SELECT body FROM notes").unwrap();
        assert_eq!(result.rows[0][0], Scalar::Text("ping".to_string()));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("msgs"), "\"msgs\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
