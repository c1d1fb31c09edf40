//! Item inventory.
//!
//! The inventory maps each [`ItemKind`] to a positive count. An entry that
//! would drop to zero is removed rather than kept, so iteration only ever
//! yields items the player actually holds. All arithmetic is checked -- no
//! silent overflows, no panics.

use std::collections::BTreeMap;

use blockquest_types::ItemKind;

use crate::error::PlayerError;

/// Owned item counts with a "no zero entries" invariant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inventory {
    counts: BTreeMap<ItemKind, u32>,
}

impl Inventory {
    /// An empty inventory.
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Build an inventory from `(item, count)` pairs, stacking duplicates.
    ///
    /// # Errors
    ///
    /// [`PlayerError::ZeroCount`] for a zero count,
    /// [`PlayerError::InventoryOverflow`] if stacking overflows.
    pub fn from_entries<I>(entries: I) -> Result<Self, PlayerError>
    where
        I: IntoIterator<Item = (ItemKind, u32)>,
    {
        let mut inventory = Self::new();
        for (item, count) in entries {
            if count == 0 {
                return Err(PlayerError::ZeroCount { item });
            }
            inventory.add(item, count)?;
        }
        Ok(inventory)
    }

    /// How many of `item` are held.
    pub fn count(&self, item: ItemKind) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// Whether at least `amount` of `item` is held.
    pub fn has(&self, item: ItemKind, amount: u32) -> bool {
        self.count(item) >= amount
    }

    /// Add `amount` of `item`. Adding zero is a no-op.
    ///
    /// # Errors
    ///
    /// [`PlayerError::InventoryOverflow`] if the count would exceed `u32::MAX`.
    pub fn add(&mut self, item: ItemKind, amount: u32) -> Result<(), PlayerError> {
        if amount == 0 {
            return Ok(());
        }
        let next = self
            .count(item)
            .checked_add(amount)
            .ok_or(PlayerError::InventoryOverflow {
                item,
                attempted: amount,
            })?;
        self.counts.insert(item, next);
        Ok(())
    }

    /// Remove `amount` of `item`, dropping the entry when it reaches zero.
    ///
    /// # Errors
    ///
    /// [`PlayerError::InsufficientItem`] if fewer than `amount` are held.
    /// The inventory is unchanged on error.
    pub fn remove(&mut self, item: ItemKind, amount: u32) -> Result<(), PlayerError> {
        let available = self.count(item);
        let remaining = available
            .checked_sub(amount)
            .ok_or(PlayerError::InsufficientItem {
                item,
                requested: amount,
                available,
            })?;
        if remaining == 0 {
            self.counts.remove(&item);
        } else {
            self.counts.insert(item, remaining);
        }
        Ok(())
    }

    /// Remove every `(item, amount)` in `cost`, or nothing at all.
    ///
    /// # Errors
    ///
    /// [`PlayerError::InsufficientItem`] for the first short item. The
    /// inventory is unchanged on error.
    pub fn consume_all(&mut self, cost: &BTreeMap<ItemKind, u32>) -> Result<(), PlayerError> {
        if let Some((item, amount)) = cost.iter().find(|(item, amount)| !self.has(**item, **amount)) {
            return Err(PlayerError::InsufficientItem {
                item: *item,
                requested: *amount,
                available: self.count(*item),
            });
        }
        for (item, amount) in cost {
            self.remove(*item, *amount)?;
        }
        Ok(())
    }

    /// Held items in [`ItemKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        self.counts.iter().map(|(item, count)| (*item, *count))
    }

    /// Borrow the underlying map.
    pub const fn as_map(&self) -> &BTreeMap<ItemKind, u32> {
        &self.counts
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
