use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::contacts::phone::normalize;
use crate::models::contact::ContactRow;

/// Upload metadata reported by `GET /api/contacts`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStatus {
    pub file_name: Option<String>,
    pub rows: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Table {
    rows: Vec<ContactRow>,
    file_name: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
}

/// In-memory contact table from the latest spreadsheet upload.
///
/// Each load swaps the whole table under one write lock, so a concurrent
/// lookup sees either the old table or the new one, never a mix.
#[derive(Default)]
pub struct ContactDirectory {
    table: RwLock<Table>,
}

impl ContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the table with `rows`, keeping their order. `source` is the
    /// uploaded file name reported by [`status`](Self::status).
    pub fn load(&self, rows: Vec<ContactRow>, source: Option<String>) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        *table = Table {
            rows,
            file_name: source,
            loaded_at: Some(Utc::now()),
        };
    }

    /// First row, in table order, whose normalized phone equals `normalized_phone`.
    pub fn find_by_phone(&self, normalized_phone: &str) -> Option<ContactRow> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table
            .rows
            .iter()
            .find(|row| normalize(&row.phone) == normalized_phone)
            .cloned()
    }

    pub fn status(&self) -> DirectoryStatus {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        DirectoryStatus {
            file_name: table.file_name.clone(),
            rows: table.rows.len(),
            loaded_at: table.loaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ContactRow> {
        vec![
            ContactRow::new("+7 (495) 123-45-67", "Ivanov", "Acme"),
            ContactRow::new("8 800 555 35 35", "Petrov", "Globex"),
            ContactRow::new("74951234567", "Sidorov", "Initech"),
        ]
    }

    #[test]
    fn test_empty_directory_finds_nothing() {
        let dir = ContactDirectory::new();
        assert!(dir.find_by_phone("74951234567").is_none());
        assert!(dir.find_by_phone("").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let dir = ContactDirectory::new();
        dir.load(rows(), None);
        let found = dir.find_by_phone("74951234567").unwrap();
        assert_eq!(found.name, "Ivanov");
    }

    #[test]
    fn test_lookup_every_row_by_its_normalized_phone() {
        let dir = ContactDirectory::new();
        let rows = rows();
        dir.load(rows.clone(), None);
        for row in &rows {
            let key = normalize(&row.phone);
            let expected = rows.iter().find(|r| normalize(&r.phone) == key).unwrap();
            assert_eq!(dir.find_by_phone(&key).as_ref(), Some(expected));
        }
    }

    #[test]
    fn test_lookup_expects_normalized_key() {
        let dir = ContactDirectory::new();
        dir.load(rows(), None);
        assert!(dir.find_by_phone("+7 (495) 123-45-67").is_none());
    }

    #[test]
    fn test_reload_replaces_previous_rows() {
        let dir = ContactDirectory::new();
        dir.load(rows(), None);
        dir.load(
            vec![ContactRow::new("+1 555 0100", "Smith", "Umbrella")],
            Some("second.xlsx".to_string()),
        );

        assert!(dir.find_by_phone("74951234567").is_none());
        assert!(dir.find_by_phone("88005553535").is_none());
        assert_eq!(dir.find_by_phone("15550100").unwrap().company, "Umbrella");

        let status = dir.status();
        assert_eq!(status.rows, 1);
        assert_eq!(status.file_name.as_deref(), Some("second.xlsx"));
        assert!(status.loaded_at.is_some());
    }

    #[test]
    fn test_load_empty_clears_table() {
        let dir = ContactDirectory::new();
        dir.load(rows(), None);
        dir.load(Vec::new(), None);
        assert!(dir.find_by_phone("74951234567").is_none());
        assert_eq!(dir.status().rows, 0);
    }
}
