pub mod error;

pub use error::DirectoryError;

use std::collections::BTreeSet;

use navdeck_core::{Category, CategoryPlacement, Site, model};
use navdeck_storage::{SqliteStore, Store};

/// Service layer over the ordered store. Validates input before any store
/// mutation is attempted and enforces the bulk-reorder caller contract the
/// store itself leaves open (the keys must form a dense permutation).
pub struct Directory {
    store: SqliteStore,
}

impl Directory {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SqliteStore {
        &mut self.store
    }

    pub fn create_category(&mut self, name: &str) -> Result<Category, DirectoryError> {
        let name = model::validate_label(name)?;
        Ok(self.store.create_category(name)?)
    }

    pub fn rename_category(&mut self, id: i64, name: &str) -> Result<(), DirectoryError> {
        let name = model::validate_label(name)?;
        Ok(self.store.rename_category(id, name)?)
    }

    pub fn reorder_category(&mut self, id: i64, target_key: i64) -> Result<(), DirectoryError> {
        Ok(self.store.reorder_category(id, target_key)?)
    }

    /// Replaces the whole ordering. Rejects anything that is not a full
    /// permutation before touching the store: every existing category exactly
    /// once, keys exactly `1..N`.
    pub fn bulk_reorder_categories(
        &mut self,
        placements: &[CategoryPlacement],
    ) -> Result<(), DirectoryError> {
        let existing: BTreeSet<i64> = self
            .store
            .list_categories()?
            .iter()
            .map(|c| c.id)
            .collect();

        let mut ids = BTreeSet::new();
        let mut keys = BTreeSet::new();
        for p in placements {
            if !existing.contains(&p.id) {
                return Err(DirectoryError::Validation(format!(
                    "unknown category {}",
                    p.id
                )));
            }
            if !ids.insert(p.id) {
                return Err(DirectoryError::Validation(format!(
                    "category {} listed twice",
                    p.id
                )));
            }
            if !keys.insert(p.order_num) {
                return Err(DirectoryError::Validation(format!(
                    "order key {} listed twice",
                    p.order_num
                )));
            }
        }
        if ids.len() != existing.len() {
            return Err(DirectoryError::Validation(format!(
                "expected {} categories, got {}",
                existing.len(),
                ids.len()
            )));
        }
        let n = placements.len() as i64;
        if keys.first().is_some_and(|&k| k != 1) || keys.last().is_some_and(|&k| k != n) {
            return Err(DirectoryError::Validation(format!(
                "order keys must be a permutation of 1..={n}"
            )));
        }

        Ok(self.store.bulk_reorder_categories(placements)?)
    }

    pub fn delete_category(&mut self, id: i64) -> Result<(), DirectoryError> {
        Ok(self.store.delete_category(id)?)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, DirectoryError> {
        Ok(self.store.list_categories()?)
    }

    pub fn create_site(
        &mut self,
        name: &str,
        url: &str,
        category_id: Option<i64>,
    ) -> Result<Site, DirectoryError> {
        let name = model::validate_label(name)?;
        let url = model::validate_url(url)?;
        Ok(self.store.create_site(name, url, category_id)?)
    }

    pub fn update_site(&mut self, site: &Site) -> Result<(), DirectoryError> {
        let name = model::validate_label(&site.name)?;
        let url = model::validate_url(&site.url)?;
        let site = Site {
            id: site.id,
            name: name.to_string(),
            url: url.to_string(),
            category_id: site.category_id,
        };
        Ok(self.store.update_site(&site)?)
    }

    pub fn delete_site(&mut self, id: i64) -> Result<(), DirectoryError> {
        Ok(self.store.delete_site(id)?)
    }

    pub fn get_site(&self, id: i64) -> Result<Option<Site>, DirectoryError> {
        Ok(self.store.get_site(id)?)
    }

    pub fn list_sites(&self) -> Result<Vec<Site>, DirectoryError> {
        Ok(self.store.list_sites()?)
    }
}
