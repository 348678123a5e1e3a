//! Column Store: the ordered set of status columns, persisted locally.
//!
//! Columns are a display preference of this client, so they never travel to
//! the project service. Every mutation re-serializes the whole set to the
//! durable store before it becomes visible.

use std::sync::Arc;

use nightwing_common::{Column, ColumnColor, ColumnId, ColumnPatch, ValidationError};
use uuid::Uuid;

use super::storage::KeyValueStore;
use crate::errors::{BoardError, BoardResult};

/// Durable key holding the JSON array of columns.
pub const COLUMNS_KEY: &str = "kanban-columns";

/// The columns a fresh board starts with. Identifiers match the statuses the
/// project service assigns.
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new("pending", "To Do", ColumnColor::Gray, 1),
        Column::new("in_progress", "In Progress", ColumnColor::Blue, 2),
        Column::new("completed", "Done", ColumnColor::Green, 3),
    ]
}

pub struct ColumnStore {
    store: Arc<dyn KeyValueStore>,
    /// Insertion order; `list()` applies the display order.
    columns: Vec<Column>,
}

impl ColumnStore {
    /// Load the persisted column set, seeding (and persisting) the defaults
    /// when nothing usable is stored.
    pub fn load(store: Arc<dyn KeyValueStore>) -> BoardResult<Self> {
        let persisted = store.get(COLUMNS_KEY).map_err(BoardError::Storage)?;

        let columns = match persisted {
            Some(raw) => match serde_json::from_str::<Vec<Column>>(&raw) {
                Ok(columns) => Some(columns),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored columns are unreadable, reseeding defaults");
                    None
                }
            },
            None => None,
        };

        let mut this = Self {
            store,
            columns: Vec::new(),
        };
        match columns {
            Some(columns) => this.columns = columns,
            None => {
                tracing::info!("Seeding default columns");
                this.commit(default_columns())?;
            }
        }
        Ok(this)
    }

    /// Columns ordered by `order`; ties keep insertion order.
    pub fn list(&self) -> Vec<Column> {
        let mut sorted = self.columns.clone();
        sorted.sort_by_key(|c| c.order);
        sorted
    }

    pub fn get(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &ColumnId) -> bool {
        self.get(id).is_some()
    }

    /// Leftmost column, where new projects land by default.
    pub fn first(&self) -> Option<Column> {
        self.list().into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn create(&mut self, name: &str, color: ColumnColor) -> BoardResult<Column> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError { field: "column name" }.into());
        }

        // max + 1 rather than len + 1: stays unique across delete/create cycles.
        let mut next = self.columns.clone();
        let order = match next.iter().map(|c| c.order).max() {
            None => 1,
            Some(max) => match max.checked_add(1) {
                Some(order) => order,
                None => {
                    tracing::warn!(max, "Column orders exhausted, re-packing");
                    next = self.list();
                    repack(&mut next);
                    next.len() as i32 + 1
                }
            },
        };
        let column = Column::new(Uuid::new_v4().to_string(), name, color, order);
        next.push(column.clone());
        self.commit(next)?;

        tracing::info!(column_id = %column.id, order, "Created column");
        Ok(column)
    }

    pub fn update(&mut self, id: &ColumnId, patch: &ColumnPatch) -> BoardResult<Column> {
        patch.validate()?;

        let mut next = self.columns.clone();
        let column = next
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| BoardError::ColumnNotFound { id: id.to_string() })?;
        column.apply(patch);
        let updated = column.clone();

        self.commit(next)?;
        tracing::info!(column_id = %id, "Updated column");
        Ok(updated)
    }

    /// Remove a column. Projects pointing at it are left alone and simply stop
    /// appearing in any lane. Returns whether anything was removed; the set is
    /// persisted either way.
    pub fn delete(&mut self, id: &ColumnId) -> BoardResult<bool> {
        let next: Vec<Column> = self.columns.iter().filter(|c| &c.id != id).cloned().collect();
        let removed = next.len() != self.columns.len();
        self.commit(next)?;
        tracing::info!(column_id = %id, removed, "Deleted column");
        Ok(removed)
    }

    /// Move a column to a zero-based display position and re-pack every order
    /// to 1..=n. Positions past the end clamp to the last slot.
    pub fn reorder(&mut self, id: &ColumnId, position: usize) -> BoardResult<Vec<Column>> {
        let mut sorted = self.list();
        let from = sorted
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| BoardError::ColumnNotFound { id: id.to_string() })?;

        let column = sorted.remove(from);
        let to = position.min(sorted.len());
        sorted.insert(to, column);
        repack(&mut sorted);

        self.commit(sorted)?;
        tracing::info!(column_id = %id, position = to, "Reordered column");
        Ok(self.list())
    }

    fn commit(&mut self, next: Vec<Column>) -> BoardResult<()> {
        let raw = serde_json::to_string(&next)
            .map_err(|e| BoardError::Storage(anyhow::Error::new(e)))?;
        self.store.set(COLUMNS_KEY, &raw).map_err(BoardError::Storage)?;
        self.columns = next;
        Ok(())
    }
}

/// Renumber already-sorted columns to 1..=n.
fn repack(columns: &mut [Column]) {
    for (i, column) in columns.iter_mut().enumerate() {
        column.order = i as i32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::storage::MemoryStore;

    fn fresh() -> (MemoryStore, ColumnStore) {
        let mem = MemoryStore::new();
        let store = ColumnStore::load(Arc::new(mem.clone())).unwrap();
        (mem, store)
    }

    fn ids(columns: &[Column]) -> Vec<String> {
        columns.iter().map(|c| c.id.to_string()).collect()
    }

    #[test]
    fn test_empty_store_seeds_three_defaults() {
        let (mem, store) = fresh();
        let columns = store.list();
        assert_eq!(ids(&columns), vec!["pending", "in_progress", "completed"]);
        assert_eq!(columns.iter().map(|c| c.order).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(mem.get(COLUMNS_KEY).unwrap().is_some());
    }

    #[test]
    fn test_persisted_empty_set_is_not_reseeded() {
        let mem = MemoryStore::new();
        mem.set(COLUMNS_KEY, "[]").unwrap();
        let store = ColumnStore::load(Arc::new(mem)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_state_reseeds_defaults() {
        let mem = MemoryStore::new();
        mem.set(COLUMNS_KEY, "{not json").unwrap();
        let store = ColumnStore::load(Arc::new(mem.clone())).unwrap();
        assert_eq!(store.len(), 3);
        let raw = mem.get(COLUMNS_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<Column>>(&raw).is_ok());
    }

    #[test]
    fn test_list_is_stable_on_order_ties() {
        let mem = MemoryStore::new();
        let stored = vec![
            Column::new("c", "C", ColumnColor::Gray, 2),
            Column::new("a", "A", ColumnColor::Gray, 1),
            Column::new("b", "B", ColumnColor::Gray, 2),
            Column::new("d", "D", ColumnColor::Gray, 1),
        ];
        mem.set(COLUMNS_KEY, &serde_json::to_string(&stored).unwrap()).unwrap();
        let store = ColumnStore::load(Arc::new(mem)).unwrap();
        assert_eq!(ids(&store.list()), vec!["a", "d", "c", "b"]);
    }

    #[test]
    fn test_create_appends_after_max_order() {
        let (_, mut store) = fresh();
        store.delete(&ColumnId::new("in_progress")).unwrap();
        let created = store.create("Review", ColumnColor::Purple).unwrap();
        assert_eq!(created.order, 4);
        let again = store.create("QA", ColumnColor::Pink).unwrap();
        assert_eq!(again.order, 5);
        assert_ne!(created.id, again.id);
    }

    #[test]
    fn test_create_after_max_order_repacks_instead_of_overflowing() {
        let mem = MemoryStore::new();
        let stored = vec![
            Column::new("last", "Last", ColumnColor::Gray, i32::MAX),
            Column::new("first", "First", ColumnColor::Gray, -5),
        ];
        mem.set(COLUMNS_KEY, &serde_json::to_string(&stored).unwrap()).unwrap();
        let mut store = ColumnStore::load(Arc::new(mem.clone())).unwrap();

        let created = store.create("Review", ColumnColor::Purple).unwrap();
        assert_eq!(created.order, 3);
        let columns = store.list();
        assert_eq!(ids(&columns[..2]), vec!["first", "last"]);
        assert_eq!(columns.iter().map(|c| c.order).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(columns[2].name, "Review");

        let reloaded = ColumnStore::load(Arc::new(mem)).unwrap();
        assert_eq!(reloaded.list(), columns);
    }

    #[test]
    fn test_create_rejects_blank_name_without_persisting() {
        let (mem, mut store) = fresh();
        let before = mem.get(COLUMNS_KEY).unwrap();
        let err = store.create("   ", ColumnColor::Red).unwrap_err();
        assert!(matches!(err, BoardError::Validation(_)));
        assert_eq!(mem.get(COLUMNS_KEY).unwrap(), before);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_update_renames_and_recolors() {
        let (_, mut store) = fresh();
        let id = ColumnId::new("pending");
        store.update(&id, &ColumnPatch::rename("Backlog")).unwrap();
        let updated = store.update(&id, &ColumnPatch::recolor(ColumnColor::Yellow)).unwrap();
        assert_eq!(updated.name, "Backlog");
        assert_eq!(updated.color, ColumnColor::Yellow);
        assert_eq!(updated.order, 1);
    }

    #[test]
    fn test_update_unknown_column() {
        let (_, mut store) = fresh();
        let err = store
            .update(&ColumnId::new("nope"), &ColumnPatch::rename("x"))
            .unwrap_err();
        assert!(matches!(err, BoardError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_delete_missing_column_is_not_an_error() {
        let (_, mut store) = fresh();
        assert!(!store.delete(&ColumnId::new("ghost")).unwrap());
        assert!(store.delete(&ColumnId::new("completed")).unwrap());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reorder_moves_and_repacks() {
        let (_, mut store) = fresh();
        let columns = store.reorder(&ColumnId::new("completed"), 0).unwrap();
        assert_eq!(ids(&columns), vec!["completed", "pending", "in_progress"]);
        assert_eq!(columns.iter().map(|c| c.order).collect::<Vec<_>>(), vec![1, 2, 3]);

        let columns = store.reorder(&ColumnId::new("completed"), 99).unwrap();
        assert_eq!(ids(&columns), vec!["pending", "in_progress", "completed"]);
    }

    #[test]
    fn test_reload_yields_identical_sequence() {
        let (mem, mut store) = fresh();
        store.create("Blocked", ColumnColor::Red).unwrap();
        store.reorder(&ColumnId::new("pending"), 2).unwrap();
        store.update(&ColumnId::new("completed"), &ColumnPatch::rename("Shipped")).unwrap();
        let before = store.list();

        let reloaded = ColumnStore::load(Arc::new(mem)).unwrap();
        assert_eq!(reloaded.list(), before);
    }
}
