//! Selected-product set with write-through persistence.
//!
//! DESIGN
//! ======
//! The selection is an ordered, duplicate-free list of product ids stored as
//! a JSON array under [`SELECTION_KEY`]. Every mutation builds the next list,
//! writes it to the [`KeyValueStore`], and only then swaps it into memory, so
//! a failed write leaves memory and storage agreeing on the previous value.

use crate::catalog::{Catalog, Product, ProductId};
use crate::storage::{self, KeyValueStore, StorageError};

/// Durable key holding the JSON-encoded id array.
pub const SELECTION_KEY: &str = "selectedProductIds";

pub struct SelectionStore {
    ids: Vec<ProductId>,
    store: Box<dyn KeyValueStore>,
}

impl SelectionStore {
    /// Read the persisted selection from `store`.
    ///
    /// An absent key is an empty selection. An undecodable value is also
    /// treated as empty (with a warning) and is overwritten on the next
    /// mutation. Repeated ids are collapsed, keeping first occurrence.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] only if the store itself cannot be read.
    pub fn load(store: Box<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let ids = match storage::load_json::<Vec<ProductId>>(store.as_ref(), SELECTION_KEY) {
            Ok(Some(ids)) => dedup_keep_first(ids),
            Ok(None) => Vec::new(),
            Err(StorageError::Decode { reason, .. }) => {
                tracing::warn!(key = SELECTION_KEY, %reason, "discarding unreadable selection");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        Ok(Self { ids, store })
    }

    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Append `id` unless already present. Returns `true` if it was added.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write fails; the selection is unchanged.
    pub fn add(&mut self, id: ProductId) -> Result<bool, StorageError> {
        if self.contains(id) {
            return Ok(false);
        }
        let mut next = self.ids.clone();
        next.push(id);
        self.commit(next)?;
        tracing::debug!(%id, "product selected");
        Ok(true)
    }

    /// Remove `id` if present. Returns `true` if it was removed; an absent id
    /// is a no-op and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write fails; the selection is unchanged.
    pub fn remove(&mut self, id: ProductId) -> Result<bool, StorageError> {
        if !self.contains(id) {
            return Ok(false);
        }
        let next = self.ids.iter().copied().filter(|&s| s != id).collect();
        self.commit(next)?;
        tracing::debug!(%id, "product deselected");
        Ok(true)
    }

    /// Drop ids that `catalog` does not contain, then persist. Returns the
    /// pruned ids.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write fails; the selection is unchanged.
    pub fn reconcile(&mut self, catalog: &Catalog) -> Result<Vec<ProductId>, StorageError> {
        let (kept, pruned): (Vec<ProductId>, Vec<ProductId>) =
            self.ids.iter().copied().partition(|&id| catalog.contains(id));
        self.commit(kept)?;
        if !pruned.is_empty() {
            tracing::info!(pruned = ?pruned, "pruned stale selection ids");
        }
        Ok(pruned)
    }

    /// Remove every id and persist the empty set.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write fails; the selection is unchanged.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.commit(Vec::new())
    }

    /// Resolve ids to products in selection order, skipping unknown ids.
    #[must_use]
    pub fn selected_products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        self.ids.iter().filter_map(|&id| catalog.get(id)).collect()
    }

    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Give back the underlying store, e.g. to reload it.
    #[must_use]
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn commit(&mut self, next: Vec<ProductId>) -> Result<(), StorageError> {
        storage::save_json(self.store.as_mut(), SELECTION_KEY, &next)?;
        self.ids = next;
        Ok(())
    }
}

fn dedup_keep_first(ids: Vec<ProductId>) -> Vec<ProductId> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
