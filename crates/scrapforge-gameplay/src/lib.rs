//! # Scrapforge Gameplay
//!
//! Weapon behaviours for Scrapforge.
//!
//! This crate provides the weapon layer the engine drives each tick:
//! - Weapon hook trait and shared weapon base
//! - Charged scrap launcher (charge, cancel cooldown, metal cost)
//! - Owner ammo reserves
//! - Projectile factory interface and a recording ledger
//! - Presentation cues (sounds, view-model animations)
//! - Launcher tuning loaded from TOML

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ammo;
pub mod charged_launcher;
pub mod config;
pub mod presentation;
pub mod projectile;
pub mod weapon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ammo::*;
    pub use crate::charged_launcher::*;
    pub use crate::config::*;
    pub use crate::presentation::*;
    pub use crate::projectile::*;
    pub use crate::weapon::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use scrapforge_common::{EntityId, Timestamp};

    #[test]
    fn test_launcher_spends_owner_metal() {
        let mut launcher = ChargedLauncher::default();
        let mut pool = AmmoPool::new(EntityId::from_raw(1)).with(AmmoKind::Metal, 100);
        let mut ledger = ProjectileLedger::new();
        let mut presentation = NullPresentation;
        let gate = FixedGate(true);

        for (now, buttons) in [(1.0, Buttons::ATTACK), (1.5, Buttons::NONE)] {
            let mut ctx = WeaponContext {
                now: Timestamp::from_secs(now),
                buttons,
                owner: Some(&mut pool),
                gate: &gate,
                projectiles: &mut ledger,
                presentation: &mut presentation,
            };
            launcher.item_post_frame(&mut ctx);
        }

        // Half a second of charge
        assert_eq!(ledger.fired().len(), 1);
        assert_eq!(ledger.metal_spent(EntityId::from_raw(1)), 35);
        assert_eq!(pool.reserve_ammo(AmmoKind::Metal), 65);
    }

    #[test]
    fn test_launcher_is_a_weapon_behavior() {
        let launcher: Box<dyn WeaponBehavior> = Box::new(ChargedLauncher::default());
        assert_eq!(launcher.base().primary_ammo, AmmoKind::Metal);
        assert!(!launcher.is_charging());
    }
}
