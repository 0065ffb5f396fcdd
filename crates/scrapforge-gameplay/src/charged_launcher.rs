//! Charged scrap launcher.
//!
//! Holding primary attack charges the launcher. The longer the charge, the more
//! metal the shot costs, from [`MIN_COST`] for a tap up to [`MAX_COST`] at full
//! charge. Releasing the button launches; holding past the owner's affordable
//! charge launches automatically. Secondary attack cancels a charge and blocks
//! charging for [`CANCEL_COOLDOWN`] seconds.
//!
//! Scrap balls are fired through the plain gun primitive, so they never enter
//! the owner's pipebomb list.
//!
//! [`MIN_COST`]: crate::config::MIN_COST
//! [`MAX_COST`]: crate::config::MAX_COST
//! [`CANCEL_COOLDOWN`]: crate::config::CANCEL_COOLDOWN

use scrapforge_common::{ProjectileId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ammo::AmmoKind;
use crate::config::LauncherConfig;
use crate::presentation::{WeaponAnim, WeaponSound};
use crate::projectile::ProjectileKind;
use crate::weapon::{
    base_item_post_frame, base_launch, fire_gun_projectile, WeaponBase, WeaponBehavior,
    WeaponContext, WeaponMode, INFINITE_CLIP,
};

/// Predicted, replicated charge fields.
///
/// `charge_begin_time` is zero while idle. It is never set while
/// `charge_cancel_until` lies in the future.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChargeState {
    /// When the current charge started, or zero.
    pub charge_begin_time: Timestamp,
    /// Charging is blocked until this time.
    pub charge_cancel_until: Timestamp,
}

impl ChargeState {
    /// Check if a charge is in progress.
    #[must_use]
    pub fn is_charging(&self) -> bool {
        self.charge_begin_time.is_set()
    }

    /// Check if the cancel cooldown is still running.
    #[must_use]
    pub fn in_cooldown(&self, now: Timestamp) -> bool {
        self.charge_cancel_until > now
    }
}

/// The charged scrap launcher.
#[derive(Debug, Clone)]
pub struct ChargedLauncher {
    base: WeaponBase,
    state: ChargeState,
    config: LauncherConfig,
}

impl Default for ChargedLauncher {
    fn default() -> Self {
        Self::new(LauncherConfig::default())
    }
}

impl ChargedLauncher {
    /// Create a launcher from config. It fires metal straight from the owner's reserve.
    ///
    /// The config must pass [`LauncherConfig::validate`].
    #[must_use]
    pub fn new(config: LauncherConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "launcher config must be validated before use: {config:?}"
        );
        let base = WeaponBase {
            clip: INFINITE_CLIP,
            primary_ammo: AmmoKind::Metal,
            max_charge_time: config.max_charge_time,
            fire_interval: config.fire_interval,
            reloads_singly: false,
            ..WeaponBase::default()
        };
        Self {
            base,
            state: ChargeState::default(),
            config,
        }
    }

    /// Current charge fields.
    #[must_use]
    pub fn state(&self) -> ChargeState {
        self.state
    }

    /// Overwrite the charge fields, e.g. when rewinding for prediction.
    pub fn restore(&mut self, state: ChargeState) {
        self.state = state;
    }

    /// Tuning in use.
    #[must_use]
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Charge progress in `[0, 1]` for the charge meter.
    #[must_use]
    pub fn charge_fraction(&self, now: Timestamp) -> f32 {
        if !self.state.is_charging() || self.base.max_charge_time <= 0.0 {
            return 0.0;
        }
        (now.since(self.state.charge_begin_time) / self.base.max_charge_time).clamp(0.0, 1.0)
    }

    /// Charge time after which the launcher fires on its own.
    ///
    /// Scales with how much of the cost range the owner can pay, so an owner
    /// holding only the minimum fires immediately.
    #[must_use]
    pub fn fire_threshold(&self, reserve: i32) -> f32 {
        let (min, max) = (self.config.min_cost, self.config.max_cost);
        if max <= min {
            return 0.0;
        }
        let limit = reserve.clamp(min, max);
        self.base.max_charge_time * (limit - min) as f32 / (max - min) as f32
    }

    fn clear_charge(&mut self) {
        self.state.charge_begin_time = Timestamp::ZERO;
    }
}

/// Linear remap of `value` from `[a, b]` onto `[c, d]`, clamped to the output range.
fn remap_clamped(value: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    if a == b {
        return if value >= b { d } else { c };
    }
    let t = ((value - a) / (b - a)).clamp(0.0, 1.0);
    c + (d - c) * t
}

impl WeaponBehavior for ChargedLauncher {
    fn base(&self) -> &WeaponBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WeaponBase {
        &mut self.base
    }

    fn is_charging(&self) -> bool {
        self.state.is_charging()
    }

    fn reset_charge(&mut self) {
        self.clear_charge();
    }

    /// Metal cost of a shot launched at `now`.
    ///
    /// Stale or invalid charge windows cost the minimum.
    fn ammo_per_shot(&self, now: Timestamp) -> i32 {
        let elapsed = now.since(self.state.charge_begin_time);
        let max_time = self.base.max_charge_time;
        if elapsed <= 0.0 || elapsed > max_time + self.config.cost_window_slack || max_time <= 0.0
        {
            return self.config.min_cost;
        }

        remap_clamped(
            elapsed,
            0.0,
            max_time,
            self.config.min_cost as f32,
            self.config.max_cost as f32,
        ) as i32
    }

    fn primary_attack(&mut self, ctx: &mut WeaponContext<'_>) {
        let now = ctx.now;

        if self.state.in_cooldown(now) {
            trace!(%now, until = %self.state.charge_cancel_until, "charge blocked by cancel cooldown");
            self.clear_charge();
            return;
        }

        let reserve = ctx.reserve_ammo(self.base.primary_ammo).unwrap_or(0);
        if self.base.clip_empty() || reserve < self.config.min_cost {
            trace!(reserve, min_cost = self.config.min_cost, "not enough metal to charge");
            return;
        }

        if !self.base.primary_ready(now) {
            return;
        }

        if !ctx.gate.can_attack() {
            self.clear_charge();
            return;
        }

        if self.state.is_charging() {
            let elapsed = now.since(self.state.charge_begin_time);
            if elapsed >= self.fire_threshold(reserve) {
                self.launch(ctx);
            }
        } else {
            self.base.weapon_mode = WeaponMode::Primary;
            self.state.charge_begin_time = now;

            ctx.presentation.play_animation(WeaponAnim::Pullback);
            if ctx.presentation.renders() {
                ctx.presentation.play_sound(WeaponSound::ChargeUp);
            }
            debug!(%now, reserve, "charge started");
        }
    }

    /// Cancel the charge instead of detonating.
    fn secondary_attack(&mut self, ctx: &mut WeaponContext<'_>) {
        if !ctx.gate.can_attack() || !self.state.is_charging() {
            return;
        }

        self.clear_charge();
        self.state.charge_cancel_until = ctx.now.after(self.config.cancel_cooldown);

        if ctx.presentation.renders() {
            ctx.presentation.stop_sound(WeaponSound::ChargeUp);
        }
        ctx.presentation.play_sound(WeaponSound::Denied);
        debug!(now = %ctx.now, until = %self.state.charge_cancel_until, "charge cancelled");
    }

    fn item_post_frame(&mut self, ctx: &mut WeaponContext<'_>) {
        if self.state.in_cooldown(ctx.now) {
            self.clear_charge();
        }

        base_item_post_frame(self, ctx);
    }

    fn launch(&mut self, ctx: &mut WeaponContext<'_>) -> Option<ProjectileId> {
        let projectile = base_launch(self, ctx);
        self.clear_charge();
        projectile
    }

    /// Fire a scrap ball and tag it with the metal it cost.
    fn fire_projectile(&mut self, ctx: &mut WeaponContext<'_>) -> Option<ProjectileId> {
        if ctx.owner.is_none() {
            return None;
        }

        let projectile = fire_gun_projectile(self, ctx, ProjectileKind::ScrapBall);
        let cost = self.ammo_per_shot(ctx.now);
        if let Some(id) = projectile {
            ctx.projectiles.set_metal_cost(id, cost);
            debug!(%id, cost, "scrap ball launched");
        }

        projectile
    }
}
