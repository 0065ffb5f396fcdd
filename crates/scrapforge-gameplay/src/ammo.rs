//! Owner-side ammunition.
//!
//! The owning player's reserve is external to weapons: a weapon only reads the
//! reserve for its ammo kind and asks the owner to remove what a shot costs.
//! [`AmmoPool`] is a plain implementation used by the headless simulation.

use scrapforge_common::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of ammunition drawn from the owner's reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmmoKind {
    /// Primary weapon ammo.
    Primary,
    /// Metal (engineer resource, spent by the scrap launcher).
    Metal,
}

/// An entity that owns a weapon and holds its reserve ammunition.
pub trait AmmoOwner {
    /// Owner entity.
    fn id(&self) -> EntityId;

    /// Reserve ammo of the given kind.
    fn reserve_ammo(&self, kind: AmmoKind) -> i32;

    /// Remove ammo after a shot. Never goes below zero.
    fn remove_ammo(&mut self, kind: AmmoKind, amount: i32);
}

/// Reserve ammo for one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmoPool {
    /// Owner entity.
    owner: EntityId,
    /// Ammo counts by kind.
    ammo: HashMap<AmmoKind, i32>,
}

impl AmmoPool {
    /// Create an empty pool for an owner.
    #[must_use]
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            ammo: HashMap::new(),
        }
    }

    /// Set ammo of a kind.
    #[must_use]
    pub fn with(mut self, kind: AmmoKind, count: i32) -> Self {
        self.set(kind, count);
        self
    }

    /// Set ammo of a kind, clamped at zero.
    pub fn set(&mut self, kind: AmmoKind, count: i32) {
        self.ammo.insert(kind, count.max(0));
    }
}

impl AmmoOwner for AmmoPool {
    fn id(&self) -> EntityId {
        self.owner
    }

    fn reserve_ammo(&self, kind: AmmoKind) -> i32 {
        self.ammo.get(&kind).copied().unwrap_or(0)
    }

    fn remove_ammo(&mut self, kind: AmmoKind, amount: i32) {
        if let Some(current) = self.ammo.get_mut(&kind) {
            *current = current.saturating_sub(amount.max(0)).max(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ammo_pool_counts() {
        let mut pool = AmmoPool::new(EntityId::from_raw(1)).with(AmmoKind::Metal, 200);

        assert_eq!(pool.reserve_ammo(AmmoKind::Metal), 200);
        assert_eq!(pool.reserve_ammo(AmmoKind::Primary), 0);

        pool.remove_ammo(AmmoKind::Metal, 75);
        assert_eq!(pool.reserve_ammo(AmmoKind::Metal), 125);

        pool.set(AmmoKind::Metal, 150);
        assert_eq!(pool.reserve_ammo(AmmoKind::Metal), 150);
    }

    #[test]
    fn test_ammo_pool_never_negative() {
        let mut pool = AmmoPool::new(EntityId::from_raw(1)).with(AmmoKind::Metal, 40);

        pool.remove_ammo(AmmoKind::Metal, 75);
        assert_eq!(pool.reserve_ammo(AmmoKind::Metal), 0);

        pool.set(AmmoKind::Primary, -5);
        assert_eq!(pool.reserve_ammo(AmmoKind::Primary), 0);
    }
}
