use std::collections::BTreeMap;

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentRow {
    pub data: Vec<u8>,
    pub name: String,
    pub id: i64,
}

impl AttachmentRow {
    pub fn new(id: i64, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            name: name.into(),
            id,
        }
    }
}

/// A store of tables holding attachment rows.
pub trait AttachmentSource {
    fn table_names(&self) -> Result<Vec<String>>;
    fn rows(&self, table: &str) -> Result<Vec<AttachmentRow>>;
}

/// Tables kept in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    tables: BTreeMap<String, Vec<AttachmentRow>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<AttachmentRow>) -> Self {
        self.tables.insert(name.into(), rows);
        self
    }
}

impl AttachmentSource for MemorySource {
    fn table_names(&self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn rows(&self, table: &str) -> Result<Vec<AttachmentRow>> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| Error::UnknownTable(table.to_string()))
    }
}
