use rusqlite::{Connection, OptionalExtension, params};

use navdeck_core::{Category, CategoryPlacement, Site};

use crate::error::StorageError;
use crate::traits::Store;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn read_categories(conn: &Connection) -> Result<Vec<Category>, StorageError> {
    let mut stmt = conn.prepare("SELECT id, name, order_num FROM categories ORDER BY order_num")?;
    let rows = stmt.query_map([], |row| {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            order_num: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn read_site_row(row: &rusqlite::Row) -> Result<Site, rusqlite::Error> {
    Ok(Site {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        category_id: row.get(3)?,
    })
}

/// Rewrites order keys inside `tx` using the two-phase negate-then-reassign
/// protocol: negating every existing key first moves the whole set onto
/// values disjoint from any positive target, so the assignment phase never
/// trips the uniqueness constraint no matter which row SQLite visits first.
/// A naive in-place shift (`order_num = order_num + 1`) has no such
/// guarantee: the constraint is checked per row, mid-statement.
fn assign_order(
    tx: &rusqlite::Transaction,
    assignments: &[(i64, i64)],
) -> Result<(), StorageError> {
    tx.execute("UPDATE categories SET order_num = -order_num", [])?;
    let mut stmt = tx.prepare("UPDATE categories SET order_num = ?1 WHERE id = ?2")?;
    for &(id, key) in assignments {
        stmt.execute(params![key, id])
            .map_err(|e| StorageError::from_order_write(e, &format!("order key {key}")))?;
    }
    Ok(())
}

impl Store for SqliteStore {
    fn create_category(&mut self, name: &str) -> Result<Category, StorageError> {
        self.conn.execute(
            "INSERT INTO categories (name, order_num)
             VALUES (?1, (SELECT COALESCE(MAX(order_num), 0) + 1 FROM categories))",
            params![name],
        )?;
        let id = self.conn.last_insert_rowid();
        let category = self.conn.query_row(
            "SELECT id, name, order_num FROM categories WHERE id = ?1",
            params![id],
            |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    order_num: row.get(2)?,
                })
            },
        )?;
        Ok(category)
    }

    fn rename_category(&mut self, id: i64, name: &str) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("category {id}")));
        }
        Ok(())
    }

    fn reorder_category(&mut self, id: i64, target_key: i64) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let ordered = read_categories(&tx)?;
        if !ordered.iter().any(|c| c.id == id) {
            return Err(StorageError::NotFound(format!("category {id}")));
        }

        // Targets below 1 are treated as 1. There is no upper clamp: the
        // recompaction below turns any target beyond the current range into
        // a move to the end.
        let target = target_key.max(1);

        // Shift semantics: every other category at key >= target moves up one
        // slot, the moved category takes the target, and ranks recompact to
        // 1..N. Expressed as a list insert before the current holder of the
        // target key.
        let rest: Vec<&Category> = ordered.iter().filter(|c| c.id != id).collect();
        let insert_at = rest
            .iter()
            .position(|c| c.order_num >= target)
            .unwrap_or(rest.len());
        let mut order: Vec<i64> = rest.iter().map(|c| c.id).collect();
        order.insert(insert_at, id);

        if order.iter().zip(ordered.iter()).all(|(a, b)| *a == b.id) {
            // Already in place; reordering to the current key is a no-op.
            return Ok(());
        }

        let assignments: Vec<(i64, i64)> = order
            .iter()
            .enumerate()
            .map(|(i, &cid)| (cid, i as i64 + 1))
            .collect();
        assign_order(&tx, &assignments)?;
        tx.commit()?;
        Ok(())
    }

    fn bulk_reorder_categories(
        &mut self,
        placements: &[CategoryPlacement],
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let assignments: Vec<(i64, i64)> =
            placements.iter().map(|p| (p.id, p.order_num)).collect();
        assign_order(&tx, &assignments)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_category(&mut self, id: i64) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let ordered = read_categories(&tx)?;
        if !ordered.iter().any(|c| c.id == id) {
            return Err(StorageError::NotFound(format!("category {id}")));
        }

        tx.execute("DELETE FROM sites WHERE category_id = ?1", params![id])?;
        tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;

        // Compact the tail: survivors keep their relative order, every key
        // above the deleted one comes down by exactly one.
        let survivors: Vec<(i64, i64)> = ordered
            .iter()
            .filter(|c| c.id != id)
            .enumerate()
            .map(|(i, c)| (c.id, i as i64 + 1))
            .collect();
        assign_order(&tx, &survivors)?;
        tx.commit()?;
        Ok(())
    }

    fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        read_categories(&self.conn)
    }

    fn create_site(
        &mut self,
        name: &str,
        url: &str,
        category_id: Option<i64>,
    ) -> Result<Site, StorageError> {
        self.conn.execute(
            "INSERT INTO sites (name, url, category_id) VALUES (?1, ?2, ?3)",
            params![name, url, category_id],
        )?;
        Ok(Site {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            url: url.to_string(),
            category_id,
        })
    }

    fn update_site(&mut self, site: &Site) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE sites SET name = ?1, url = ?2, category_id = ?3 WHERE id = ?4",
            params![site.name, site.url, site.category_id, site.id],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("site {}", site.id)));
        }
        Ok(())
    }

    fn delete_site(&mut self, id: i64) -> Result<(), StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM sites WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("site {id}")));
        }
        Ok(())
    }

    fn get_site(&self, id: i64) -> Result<Option<Site>, StorageError> {
        let site = self
            .conn
            .query_row(
                "SELECT id, name, url, category_id FROM sites WHERE id = ?1",
                params![id],
                read_site_row,
            )
            .optional()?;
        Ok(site)
    }

    fn list_sites(&self) -> Result<Vec<Site>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, url, category_id FROM sites ORDER BY id")?;
        let rows = stmt.query_map([], read_site_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
