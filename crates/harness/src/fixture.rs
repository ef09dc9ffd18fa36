use navdeck_core::{Category, CategoryPlacement};
use navdeck_engine::{Directory, DirectoryError};
use navdeck_storage::SqliteStore;

/// Test fixture around a directory on an in-memory store.
pub struct TestDirectory {
    pub directory: Directory,
}

impl TestDirectory {
    pub fn new() -> Result<Self, DirectoryError> {
        Ok(Self {
            directory: Directory::new(SqliteStore::open_in_memory()?),
        })
    }

    pub fn open(path: &str) -> Result<Self, DirectoryError> {
        Ok(Self {
            directory: Directory::new(SqliteStore::open(path)?),
        })
    }

    /// Creates one category per name, in order, and returns the records.
    pub fn create_categories(
        &mut self,
        names: &[&str],
    ) -> Result<Vec<Category>, DirectoryError> {
        names
            .iter()
            .map(|name| self.directory.create_category(name))
            .collect()
    }

    /// Category ids in listing order (ascending by order key).
    pub fn ordered_ids(&self) -> Result<Vec<i64>, DirectoryError> {
        Ok(self
            .directory
            .list_categories()?
            .iter()
            .map(|c| c.id)
            .collect())
    }

    /// Order keys in listing order.
    pub fn order_keys(&self) -> Result<Vec<i64>, DirectoryError> {
        Ok(self
            .directory
            .list_categories()?
            .iter()
            .map(|c| c.order_num)
            .collect())
    }

    /// True when the order keys are exactly `1..=N` in listing order.
    pub fn is_dense(&self) -> Result<bool, DirectoryError> {
        let keys = self.order_keys()?;
        Ok(keys == (1..=keys.len() as i64).collect::<Vec<_>>())
    }

    /// Shorthand for a full-permutation bulk reorder given ids in their
    /// desired final order.
    pub fn bulk_arrange(&mut self, ids_in_order: &[i64]) -> Result<(), DirectoryError> {
        let placements: Vec<CategoryPlacement> = ids_in_order
            .iter()
            .enumerate()
            .map(|(i, &id)| CategoryPlacement {
                id,
                order_num: i as i64 + 1,
            })
            .collect();
        self.directory.bulk_reorder_categories(&placements)
    }
}
