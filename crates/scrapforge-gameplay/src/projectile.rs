//! Fired projectiles.
//!
//! Projectile simulation belongs to the host. Weapons see two firing
//! primitives on [`ProjectileFactory`]:
//! - `fire_base_projectile`: plain gun launch, nothing tracked on the owner
//! - `fire_pipebomb`: launch and record the bomb in the owner's live
//!   pipebomb list (for remote detonation)
//!
//! [`ProjectileLedger`] records what was fired for the headless simulation.

use scrapforge_common::{EntityId, ProjectileId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of projectile a weapon launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Remote-detonated sticky bomb.
    Pipebomb,
    /// Charged ball of scrap metal.
    ScrapBall,
}

/// Record of a fired projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiredProjectile {
    /// Projectile id.
    pub id: ProjectileId,
    /// Owner entity.
    pub owner: EntityId,
    /// Projectile kind.
    pub kind: ProjectileKind,
    /// When it was fired.
    pub fired_at: Timestamp,
    /// Metal spent on this shot, read later by explosion scaling.
    pub metal_cost: Option<i32>,
}

/// Spawns and configures fired entities.
pub trait ProjectileFactory {
    /// Plain gun launch.
    fn fire_base_projectile(
        &mut self,
        owner: EntityId,
        kind: ProjectileKind,
        now: Timestamp,
    ) -> Option<ProjectileId>;

    /// Launch and add the projectile to the owner's live pipebomb list.
    fn fire_pipebomb(&mut self, owner: EntityId, now: Timestamp) -> Option<ProjectileId>;

    /// Attach the metal cost to a fired projectile.
    fn set_metal_cost(&mut self, id: ProjectileId, cost: i32);
}

/// Records fired projectiles.
#[derive(Debug, Default)]
pub struct ProjectileLedger {
    /// Fired projectiles in launch order.
    fired: Vec<FiredProjectile>,
    /// Live pipebombs by owner.
    pipebombs: HashMap<EntityId, Vec<ProjectileId>>,
    /// Next id to hand out.
    next_id: u32,
    /// Refuse to spawn (simulates the engine failing to create the entity).
    spawn_blocked: bool,
}

impl ProjectileLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent spawn fail (or succeed again).
    pub fn set_spawn_blocked(&mut self, blocked: bool) {
        self.spawn_blocked = blocked;
    }

    fn spawn(
        &mut self,
        owner: EntityId,
        kind: ProjectileKind,
        now: Timestamp,
    ) -> Option<ProjectileId> {
        if self.spawn_blocked {
            return None;
        }
        self.next_id += 1;
        let id = ProjectileId::new(self.next_id);
        self.fired.push(FiredProjectile {
            id,
            owner,
            kind,
            fired_at: now,
            metal_cost: None,
        });
        Some(id)
    }

    /// All fired projectiles.
    #[must_use]
    pub fn fired(&self) -> &[FiredProjectile] {
        &self.fired
    }

    /// Look up a fired projectile.
    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&FiredProjectile> {
        self.fired.iter().find(|p| p.id == id)
    }

    /// Live pipebombs of an owner.
    #[must_use]
    pub fn pipebombs(&self, owner: EntityId) -> &[ProjectileId] {
        self.pipebombs
            .get(&owner)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total metal spent by an owner across recorded shots.
    #[must_use]
    pub fn metal_spent(&self, owner: EntityId) -> i32 {
        self.fired
            .iter()
            .filter(|p| p.owner == owner)
            .filter_map(|p| p.metal_cost)
            .sum()
    }
}

impl ProjectileFactory for ProjectileLedger {
    fn fire_base_projectile(
        &mut self,
        owner: EntityId,
        kind: ProjectileKind,
        now: Timestamp,
    ) -> Option<ProjectileId> {
        self.spawn(owner, kind, now)
    }

    fn fire_pipebomb(&mut self, owner: EntityId, now: Timestamp) -> Option<ProjectileId> {
        let id = self.spawn(owner, ProjectileKind::Pipebomb, now)?;
        self.pipebombs.entry(owner).or_default().push(id);
        Some(id)
    }

    fn set_metal_cost(&mut self, id: ProjectileId, cost: i32) {
        if let Some(projectile) = self.fired.iter_mut().find(|p| p.id == id) {
            projectile.metal_cost = Some(cost);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> EntityId {
        EntityId::from_raw(7)
    }

    #[test]
    fn test_base_projectile_not_tracked_as_pipebomb() {
        let mut ledger = ProjectileLedger::new();
        let now = Timestamp::from_secs(1.0);

        let id = ledger
            .fire_base_projectile(owner(), ProjectileKind::ScrapBall, now)
            .expect("spawned");

        assert!(ledger.pipebombs(owner()).is_empty());
        assert_eq!(ledger.get(id).map(|p| p.kind), Some(ProjectileKind::ScrapBall));
    }

    #[test]
    fn test_pipebomb_tracked() {
        let mut ledger = ProjectileLedger::new();
        let id = ledger
            .fire_pipebomb(owner(), Timestamp::from_secs(1.0))
            .expect("spawned");

        assert_eq!(ledger.pipebombs(owner()), &[id]);
    }

    #[test]
    fn test_metal_cost_metadata() {
        let mut ledger = ProjectileLedger::new();
        let now = Timestamp::from_secs(1.0);
        let a = ledger
            .fire_base_projectile(owner(), ProjectileKind::ScrapBall, now)
            .expect("spawned");
        let b = ledger
            .fire_base_projectile(owner(), ProjectileKind::ScrapBall, now)
            .expect("spawned");

        ledger.set_metal_cost(a, 30);
        ledger.set_metal_cost(b, 75);

        assert_eq!(ledger.get(a).and_then(|p| p.metal_cost), Some(30));
        assert_eq!(ledger.metal_spent(owner()), 105);
    }

    #[test]
    fn test_blocked_spawn() {
        let mut ledger = ProjectileLedger::new();
        ledger.set_spawn_blocked(true);

        assert!(ledger
            .fire_base_projectile(owner(), ProjectileKind::ScrapBall, Timestamp::from_secs(1.0))
            .is_none());
        assert!(ledger.fired().is_empty());
    }
}
