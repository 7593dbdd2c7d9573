use super::{GuestInsert, GuestRow, GuestTable, GuestUpdate, TableError};
use crate::model::GuestId;
use chrono::Utc;

/// In-process guest table with autoincrement ids.
///
/// Rows keep insertion order, which is also creation order.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    rows: Vec<GuestRow>,
    last_id: GuestId,
}

impl MemoryTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(&self) -> &[GuestRow] {
        &self.rows
    }
}

impl GuestTable for MemoryTable {
    fn select_all(&mut self) -> Result<Vec<GuestRow>, TableError> {
        Ok(self.rows.clone())
    }

    fn insert(&mut self, rows: &[GuestInsert]) -> Result<Vec<GuestRow>, TableError> {
        let now = Utc::now();
        let inserted: Vec<GuestRow> = rows
            .iter()
            .map(|row| {
                self.last_id += 1;
                GuestRow {
                    id: self.last_id,
                    name: row.name.clone(),
                    table_number: row.table_number.clone(),
                    checked_in: row.checked_in.unwrap_or(false),
                    vip: row.vip,
                    created_at: now,
                    updated_at: now,
                }
            })
            .collect();
        self.rows.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    fn delete(&mut self, id: GuestId) -> Result<(), TableError> {
        self.rows.retain(|row| row.id != id);
        Ok(())
    }

    fn update(&mut self, id: GuestId, update: &GuestUpdate) -> Result<(), TableError> {
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
            if let Some(checked_in) = update.checked_in {
                row.checked_in = checked_in;
            }
            row.updated_at = update.updated_at;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(name: &str) -> GuestInsert {
        GuestInsert {
            name: name.into(),
            table_number: "1".into(),
            vip: false,
            checked_in: None,
        }
    }

    #[test]
    fn ids_keep_increasing_after_delete() {
        let mut table = MemoryTable::new();
        let first = table.insert(&[insert("A"), insert("B")]).expect("insert");
        table.delete(first[1].id).expect("delete");
        let next = table.insert(&[insert("C")]).expect("insert");
        assert_eq!(next[0].id, 3);
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn update_sets_flag() {
        let mut table = MemoryTable::new();
        let id = table.insert(&[insert("A")]).expect("insert")[0].id;
        table
            .update(id, &GuestUpdate::check_in(true, Utc::now()))
            .expect("update");
        assert!(table.rows()[0].checked_in);
    }
}
