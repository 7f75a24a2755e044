//! Scalar values crossing the loader boundary
//!
//! Query results leave rusqlite as a small closed variant type so the
//! resolver's column-mapping logic never performs unchecked type assumptions.

use rusqlite::types::ValueRef;

/// A single cell value from a query result.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Scalar {
    /// Render the value as display text.
    ///
    /// Integers and reals format naturally, text passes through, and null
    /// and blob values render empty. This is the coercion used for every
    /// canonical record field except `datetime`.
    pub fn to_display_string(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Integer(n) => n.to_string(),
            Scalar::Real(f) => f.to_string(),
            Scalar::Text(s) => s.clone(),
            Scalar::Blob(_) => String::new(),
        }
    }

    /// Check whether this is a SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl From<ValueRef<'_>> for Scalar {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Scalar::Null,
            ValueRef::Integer(n) => Scalar::Integer(n),
            ValueRef::Real(f) => Scalar::Real(f),
            ValueRef::Text(t) => Scalar::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Scalar::Blob(b.to_vec()),
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}
