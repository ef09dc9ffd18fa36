use navdeck_core::{Category, CategoryPlacement, Site};

use crate::error::StorageError;

/// The ordered-collection store. Every multi-statement operation runs inside
/// a single transaction with rollback-on-error, so readers never observe a
/// duplicate order key or a partially cascaded delete.
pub trait Store {
    /// Appends a category at order key `max + 1` (1 if empty) and returns the
    /// materialized record. Append never collides with the uniqueness
    /// constraint, so the only failure mode is a store failure.
    fn create_category(&mut self, name: &str) -> Result<Category, StorageError>;

    /// Label edit only; order keys are untouched.
    fn rename_category(&mut self, id: i64, name: &str) -> Result<(), StorageError>;

    /// Moves one category to `target_key`, shifting the others and keeping
    /// the ordering dense. `target_key` is clamped below to 1; a target
    /// beyond the current range moves the category to the end. The vacated
    /// slot is always recompacted away in the same transaction.
    fn reorder_category(&mut self, id: i64, target_key: i64) -> Result<(), StorageError>;

    /// Replaces the entire ordering in one transaction: every existing order
    /// key is negated first (disjoint from any positive target), then each
    /// requested assignment is applied. The negate phase is what lets the
    /// swap bypass the uniqueness constraint; it is a correctness-critical
    /// step, not an optimization.
    ///
    /// The store does not validate density. A caller supplying keys that are
    /// not a permutation of `1..N` either hits `Conflict` (duplicate key,
    /// rolled back) or commits a unique-but-non-dense ordering; passing a
    /// full permutation is the caller's contract.
    fn bulk_reorder_categories(
        &mut self,
        placements: &[CategoryPlacement],
    ) -> Result<(), StorageError>;

    /// Atomically deletes the category, cascades to every site referencing
    /// it, and closes the gap by decrementing all higher order keys.
    fn delete_category(&mut self, id: i64) -> Result<(), StorageError>;

    /// All categories, ascending by order key.
    fn list_categories(&self) -> Result<Vec<Category>, StorageError>;

    fn create_site(
        &mut self,
        name: &str,
        url: &str,
        category_id: Option<i64>,
    ) -> Result<Site, StorageError>;

    fn update_site(&mut self, site: &Site) -> Result<(), StorageError>;

    fn delete_site(&mut self, id: i64) -> Result<(), StorageError>;

    fn get_site(&self, id: i64) -> Result<Option<Site>, StorageError>;

    fn list_sites(&self) -> Result<Vec<Site>, StorageError>;
}
