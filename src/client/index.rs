//! Index descriptors
//!
//! A logical (database, table, index, columns) tuple that the server turns
//! into a small integer id on first use.

use crate::protocol::{Value, OPEN_INDEX};

/// Default index name when none is given
pub const PRIMARY: &str = "PRIMARY";

/// Descriptor of an index to open
///
/// Identity is the full tuple in fixed order: two descriptors that differ
/// only in column order are distinct indexes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    database: String,
    table: String,
    index: String,
    columns: Vec<String>,
    filter_columns: Option<Vec<String>>,
}

impl IndexSpec {
    /// Descriptor over the primary index with no read columns
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            index: PRIMARY.to_string(),
            columns: Vec::new(),
            filter_columns: None,
        }
    }

    /// Use a named index; an empty name falls back to the primary index
    pub fn index(mut self, name: &str) -> Self {
        self.index = if name.is_empty() {
            PRIMARY.to_string()
        } else {
            name.to_string()
        };
        self
    }

    /// Columns returned by reads (and targeted by updates/inserts)
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Columns available to filter clauses
    pub fn filter_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Registry key: the identity tuple joined in fixed order
    pub(crate) fn registry_key(&self) -> String {
        let mut parts = vec![
            self.database.clone(),
            self.table.clone(),
            self.index.clone(),
            self.columns.join(","),
        ];
        if let Some(fcolumns) = &self.filter_columns {
            parts.push(fcolumns.join(","));
        }
        parts.join(";")
    }

    /// Fields of the open-index command for an assigned id
    pub(crate) fn open_fields(&self, id: u32) -> Vec<Value> {
        let mut fields = vec![
            Value::from(OPEN_INDEX),
            Value::from(id),
            Value::from(self.database.as_str()),
            Value::from(self.table.as_str()),
            Value::from(self.index.as_str()),
            Value::from(self.columns.join(",")),
        ];
        if let Some(fcolumns) = &self.filter_columns {
            fields.push(Value::from(fcolumns.join(",")));
        }
        fields
    }
}
