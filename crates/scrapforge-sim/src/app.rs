//! Scripted simulation run.
//!
//! Drives one charged launcher through the configured button script at a
//! fixed tick rate, the same way the engine would call the weapon each frame,
//! and collects what happened into a [`SimReport`].

use serde::Serialize;
use tracing::{debug, info};

use scrapforge_common::{EntityId, Timestamp};
use scrapforge_gameplay::{
    AmmoKind, AmmoOwner, AmmoPool, ChargedLauncher, CueBus, FixedGate, ProjectileLedger,
    WeaponBehavior, WeaponContext,
};

use crate::config::SimConfig;
use crate::timing::TickClock;

/// Owner entity used for scripted runs.
const OWNER: EntityId = EntityId::from_raw(1);

/// One launched scrap ball.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotRecord {
    /// Launch time.
    pub at: Timestamp,
    /// Metal cost tagged on the projectile.
    pub metal_cost: Option<i32>,
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    /// Ticks simulated.
    pub ticks: u64,
    /// Charges started.
    pub charges: u32,
    /// Charges cancelled.
    pub cancels: u32,
    /// Launched scrap balls.
    pub shots: Vec<ShotRecord>,
    /// Metal spent.
    pub metal_spent: i32,
    /// Metal left.
    pub metal_remaining: i32,
    /// Presentation cues emitted.
    pub cues: usize,
}

/// Run the scripted simulation.
pub fn run(config: &SimConfig) -> SimReport {
    let mut clock = TickClock::new(config.tick_rate, config.start_time);
    let mut launcher = ChargedLauncher::new(config.launcher.clone());
    let mut pool = AmmoPool::new(OWNER).with(AmmoKind::Metal, config.reserve_metal);
    let mut ledger = ProjectileLedger::new();
    let mut cues = CueBus::new(1024).with_renders(config.renders);
    let gate = FixedGate(config.can_attack);

    let end = Timestamp::from_secs(config.start_time + config.duration);
    let mut charges = 0;
    let mut cancels = 0;
    let mut cue_count = 0;

    info!(
        tick_rate = config.tick_rate,
        interval = clock.interval(),
        reserve = config.reserve_metal,
        "simulation starting"
    );

    let mut now = clock.now();
    while now < end {
        let before = launcher.state();
        let buttons = config.buttons_at(now.secs());

        let mut ctx = WeaponContext {
            now,
            buttons,
            owner: Some(&mut pool),
            gate: &gate,
            projectiles: &mut ledger,
            presentation: &mut cues,
        };
        launcher.item_post_frame(&mut ctx);

        let after = launcher.state();
        if !before.is_charging() && after.is_charging() {
            charges += 1;
        }
        if after.charge_cancel_until != before.charge_cancel_until {
            cancels += 1;
        }

        for cue in cues.drain() {
            debug!(%now, ?cue, "presentation cue");
            cue_count += 1;
        }

        now = clock.advance();
    }

    let shots: Vec<ShotRecord> = ledger
        .fired()
        .iter()
        .map(|p| ShotRecord {
            at: p.fired_at,
            metal_cost: p.metal_cost,
        })
        .collect();

    let report = SimReport {
        ticks: clock.tick_count(),
        charges,
        cancels,
        shots,
        metal_spent: ledger.metal_spent(OWNER),
        metal_remaining: pool.reserve_ammo(AmmoKind::Metal),
        cues: cue_count,
    };

    info!(
        shots = report.shots.len(),
        spent = report.metal_spent,
        remaining = report.metal_remaining,
        charging = launcher.is_charging(),
        "simulation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ButtonKind, InputSpan};
    use scrapforge_gameplay::LauncherConfig;

    fn script(inputs: Vec<InputSpan>) -> SimConfig {
        SimConfig {
            inputs,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_run() {
        let config = SimConfig::default();
        let report = run(&config);

        assert_eq!(report.ticks, 14 * 66);
        assert_eq!(report.charges, 4);
        assert_eq!(report.cancels, 1);
        assert_eq!(report.shots.len(), 3);
        for shot in &report.shots {
            let cost = shot.metal_cost.expect("cost tagged");
            assert!((30..=75).contains(&cost));
        }
        assert_eq!(
            report.metal_spent + report.metal_remaining,
            config.reserve_metal
        );
    }

    #[test]
    fn test_tap_costs_minimum() {
        let config = script(vec![InputSpan::new(ButtonKind::Attack, 1.0, 1.05)]);
        let report = run(&config);

        assert_eq!(report.shots.len(), 1);
        assert_eq!(report.shots[0].metal_cost, Some(30));
        assert_eq!(report.metal_remaining, 170);
    }

    #[test]
    fn test_cancel_only() {
        let config = script(vec![
            InputSpan::new(ButtonKind::Attack, 1.0, 2.0),
            InputSpan::new(ButtonKind::Attack2, 1.5, 1.6),
        ]);
        let report = run(&config);

        assert_eq!(report.charges, 1);
        assert_eq!(report.cancels, 1);
        assert!(report.shots.is_empty());
        assert_eq!(report.metal_remaining, 200);
    }

    #[test]
    fn test_closed_gate_never_charges() {
        let config = SimConfig {
            can_attack: false,
            ..Default::default()
        };
        let report = run(&config);

        assert_eq!(report.charges, 0);
        assert!(report.shots.is_empty());
    }

    #[test]
    fn test_poor_owner_fires_at_minimum() {
        let config = SimConfig {
            reserve_metal: 30,
            launcher: LauncherConfig::default(),
            ..script(vec![InputSpan::new(ButtonKind::Attack, 1.0, 3.0)])
        };
        let report = run(&config);

        assert_eq!(report.shots.len(), 1);
        assert_eq!(report.shots[0].metal_cost, Some(30));
        assert_eq!(report.metal_remaining, 0);
    }
}
