//! Weapon hook set and the shared weapon base.
//!
//! The engine drives every weapon through [`WeaponBehavior`]: it calls
//! `item_post_frame` once per simulation tick, which dispatches to the attack
//! handlers. Concrete weapons override the hooks they need and call back into
//! the `base_*` functions where the engine would call the parent class.
//!
//! All collaborators for one tick are passed in a [`WeaponContext`]; weapons
//! never read global time or global entity state.

use scrapforge_common::{EntityId, ProjectileId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ammo::{AmmoKind, AmmoOwner};
use crate::presentation::{Presentation, WeaponAnim, WeaponSound};
use crate::projectile::{ProjectileFactory, ProjectileKind};

/// Clip value meaning the weapon draws straight from the owner's reserve.
pub const INFINITE_CLIP: i32 = -1;

/// Default maximum charge time in seconds.
pub const DEFAULT_MAX_CHARGE_TIME: f32 = 4.0;

/// Default refire delay after a launch, in seconds.
pub const DEFAULT_FIRE_INTERVAL: f32 = 0.6;

/// Which attack mode the weapon is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeaponMode {
    /// Primary fire.
    #[default]
    Primary,
    /// Secondary fire.
    Secondary,
}

/// Attack buttons held this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Buttons {
    /// Primary attack held.
    pub attack: bool,
    /// Secondary attack held.
    pub attack2: bool,
}

impl Buttons {
    /// No buttons held.
    pub const NONE: Self = Self {
        attack: false,
        attack2: false,
    };

    /// Only primary attack held.
    pub const ATTACK: Self = Self {
        attack: true,
        attack2: false,
    };

    /// Only secondary attack held.
    pub const ATTACK2: Self = Self {
        attack: false,
        attack2: true,
    };
}

/// Engine-side check whether the owner may attack at all (stunned, taunting, etc.).
pub trait AttackGate {
    /// Returns true if attacking is allowed this tick.
    fn can_attack(&self) -> bool;
}

/// Gate with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedGate(pub bool);

impl AttackGate for FixedGate {
    fn can_attack(&self) -> bool {
        self.0
    }
}

/// Engine-owned weapon fields shared by every weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponBase {
    /// Rounds in the clip, or [`INFINITE_CLIP`].
    pub clip: i32,
    /// Rounds a full clip holds, or [`INFINITE_CLIP`].
    pub clip_size: i32,
    /// Reserve ammo kind the weapon fires.
    pub primary_ammo: AmmoKind,
    /// Earliest time the next primary attack may happen.
    pub next_primary_attack: Timestamp,
    /// Current attack mode.
    pub weapon_mode: WeaponMode,
    /// Time to reach full charge, in seconds.
    pub max_charge_time: f32,
    /// Delay between launches, in seconds.
    pub fire_interval: f32,
    /// Reloads one round at a time.
    pub reloads_singly: bool,
}

impl Default for WeaponBase {
    fn default() -> Self {
        Self {
            clip: INFINITE_CLIP,
            clip_size: INFINITE_CLIP,
            primary_ammo: AmmoKind::Primary,
            next_primary_attack: Timestamp::ZERO,
            weapon_mode: WeaponMode::Primary,
            max_charge_time: DEFAULT_MAX_CHARGE_TIME,
            fire_interval: DEFAULT_FIRE_INTERVAL,
            reloads_singly: true,
        }
    }
}

impl WeaponBase {
    /// Create a base firing the given ammo kind.
    #[must_use]
    pub fn new(primary_ammo: AmmoKind) -> Self {
        Self {
            primary_ammo,
            ..Default::default()
        }
    }

    /// Set the clip size and fill the clip.
    #[must_use]
    pub fn with_clip(mut self, clip: i32) -> Self {
        self.clip = clip;
        self.clip_size = clip;
        self
    }

    /// Check if the clip is empty. An infinite clip is never empty.
    #[must_use]
    pub fn clip_empty(&self) -> bool {
        self.clip <= 0 && self.clip != INFINITE_CLIP
    }

    /// Check if the refire delay has passed.
    #[must_use]
    pub fn primary_ready(&self, now: Timestamp) -> bool {
        self.next_primary_attack <= now
    }

    /// Take the cost of one shot from the clip, or from the owner for an infinite clip.
    pub fn remove_projectile_ammo(&mut self, owner: &mut dyn AmmoOwner, amount: i32) {
        if self.clip == INFINITE_CLIP {
            owner.remove_ammo(self.primary_ammo, amount);
        } else {
            self.clip = (self.clip - amount).max(0);
        }
    }
}

/// Everything a weapon may touch during one tick.
pub struct WeaponContext<'a> {
    /// Current simulation time.
    pub now: Timestamp,
    /// Buttons held this tick.
    pub buttons: Buttons,
    /// Owning player, if the weapon is held.
    pub owner: Option<&'a mut dyn AmmoOwner>,
    /// Attack permission check.
    pub gate: &'a dyn AttackGate,
    /// Projectile spawner.
    pub projectiles: &'a mut dyn ProjectileFactory,
    /// Sound and animation sink.
    pub presentation: &'a mut dyn Presentation,
}

impl WeaponContext<'_> {
    /// Owner's reserve ammo of a kind, `None` without an owner.
    #[must_use]
    pub fn reserve_ammo(&self, kind: AmmoKind) -> Option<i32> {
        self.owner.as_deref().map(|owner| owner.reserve_ammo(kind))
    }

    /// Owner entity, `None` without an owner.
    #[must_use]
    pub fn owner_id(&self) -> Option<EntityId> {
        self.owner.as_deref().map(|owner| owner.id())
    }
}

/// Hooks the engine calls on a held weapon.
pub trait WeaponBehavior {
    /// Shared weapon fields.
    fn base(&self) -> &WeaponBase;

    /// Shared weapon fields, mutably.
    fn base_mut(&mut self) -> &mut WeaponBase;

    /// Whether an attack charge is in progress.
    fn is_charging(&self) -> bool {
        false
    }

    /// Drop any charge in progress.
    fn reset_charge(&mut self) {}

    /// Ammo one shot costs at `now`.
    fn ammo_per_shot(&self, _now: Timestamp) -> i32 {
        1
    }

    /// Primary attack button handler.
    fn primary_attack(&mut self, ctx: &mut WeaponContext<'_>) {
        base_primary_attack(self, ctx);
    }

    /// Secondary attack button handler.
    fn secondary_attack(&mut self, ctx: &mut WeaponContext<'_>) {
        base_secondary_attack(self, ctx);
    }

    /// Per-tick update.
    fn item_post_frame(&mut self, ctx: &mut WeaponContext<'_>) {
        base_item_post_frame(self, ctx);
    }

    /// Launch one projectile and schedule the next attack.
    fn launch(&mut self, ctx: &mut WeaponContext<'_>) -> Option<ProjectileId> {
        base_launch(self, ctx)
    }

    /// Create the projectile entity.
    fn fire_projectile(&mut self, ctx: &mut WeaponContext<'_>) -> Option<ProjectileId> {
        fire_pipebomb_projectile(self, ctx)
    }
}

/// Default primary attack: fire right away when allowed.
pub fn base_primary_attack<W: WeaponBehavior + ?Sized>(weapon: &mut W, ctx: &mut WeaponContext<'_>) {
    let base = weapon.base();
    if !base.primary_ready(ctx.now) || base.clip_empty() {
        return;
    }
    if base.clip == INFINITE_CLIP {
        let cost = weapon.ammo_per_shot(ctx.now);
        if ctx.reserve_ammo(base.primary_ammo).unwrap_or(0) < cost {
            return;
        }
    }
    if !ctx.gate.can_attack() {
        return;
    }

    weapon.base_mut().weapon_mode = WeaponMode::Primary;
    weapon.launch(ctx);
}

/// Default secondary attack: switch to secondary mode when allowed.
pub fn base_secondary_attack<W: WeaponBehavior + ?Sized>(
    weapon: &mut W,
    ctx: &mut WeaponContext<'_>,
) {
    if ctx.gate.can_attack() {
        weapon.base_mut().weapon_mode = WeaponMode::Secondary;
    }
}

/// Default per-tick dispatch.
///
/// Secondary is handled before primary. Letting go of the primary button while
/// a charge is in progress launches it. With no attack held the clip reloads.
pub fn base_item_post_frame<W: WeaponBehavior + ?Sized>(
    weapon: &mut W,
    ctx: &mut WeaponContext<'_>,
) {
    if ctx.buttons.attack2 {
        weapon.secondary_attack(ctx);
    }

    if ctx.buttons.attack {
        weapon.primary_attack(ctx);
    } else if weapon.is_charging() && !weapon.base().clip_empty() {
        trace!(now = %ctx.now, "attack released while charging");
        weapon.launch(ctx);
    } else if !ctx.buttons.attack2 {
        base_reload(weapon, ctx);
    }
}

/// Move rounds from the owner's reserve into a finite clip.
///
/// A weapon that reloads singly takes one round per refire interval, otherwise
/// the clip is topped up at once. Returns the rounds loaded.
pub fn base_reload<W: WeaponBehavior + ?Sized>(
    weapon: &mut W,
    ctx: &mut WeaponContext<'_>,
) -> i32 {
    let base = weapon.base();
    if base.clip == INFINITE_CLIP || base.clip >= base.clip_size || !base.primary_ready(ctx.now) {
        return 0;
    }
    let kind = base.primary_ammo;
    let missing = base.clip_size - base.clip;
    let reloads_singly = base.reloads_singly;

    let Some(owner) = ctx.owner.as_deref_mut() else {
        return 0;
    };
    let reserve = owner.reserve_ammo(kind);
    if reserve <= 0 {
        return 0;
    }

    let rounds = if reloads_singly { 1 } else { missing.min(reserve) };
    owner.remove_ammo(kind, rounds);

    let base = weapon.base_mut();
    base.clip += rounds;
    base.next_primary_attack = ctx.now.after(base.fire_interval);
    trace!(now = %ctx.now, rounds, clip = base.clip, "reloaded");
    rounds
}

/// Default launch: create the projectile, schedule the refire and drop the charge.
pub fn base_launch<W: WeaponBehavior + ?Sized>(
    weapon: &mut W,
    ctx: &mut WeaponContext<'_>,
) -> Option<ProjectileId> {
    ctx.presentation.play_animation(WeaponAnim::PrimaryFire);

    let projectile = weapon.fire_projectile(ctx);

    let base = weapon.base_mut();
    base.next_primary_attack = ctx.now.after(base.fire_interval);
    weapon.reset_charge();

    projectile
}

/// Gun firing primitive: spawn an untracked projectile and pay for the shot.
pub fn fire_gun_projectile<W: WeaponBehavior + ?Sized>(
    weapon: &mut W,
    ctx: &mut WeaponContext<'_>,
    kind: ProjectileKind,
) -> Option<ProjectileId> {
    fire_with(weapon, ctx, |factory, owner, now| {
        factory.fire_base_projectile(owner, kind, now)
    })
}

/// Pipebomb firing primitive: like [`fire_gun_projectile`] but the bomb is
/// added to the owner's live pipebomb list.
pub fn fire_pipebomb_projectile<W: WeaponBehavior + ?Sized>(
    weapon: &mut W,
    ctx: &mut WeaponContext<'_>,
) -> Option<ProjectileId> {
    fire_with(weapon, ctx, |factory, owner, now| factory.fire_pipebomb(owner, now))
}

fn fire_with<W, F>(weapon: &mut W, ctx: &mut WeaponContext<'_>, spawn: F) -> Option<ProjectileId>
where
    W: WeaponBehavior + ?Sized,
    F: FnOnce(&mut dyn ProjectileFactory, EntityId, Timestamp) -> Option<ProjectileId>,
{
    let now = ctx.now;
    let cost = weapon.ammo_per_shot(now);
    let owner = ctx.owner.as_deref_mut()?;
    let owner_id = owner.id();

    ctx.presentation.play_sound(WeaponSound::Shoot);
    let projectile = spawn(&mut *ctx.projectiles, owner_id, now);

    // Ammo is paid even when the spawn fails.
    weapon.base_mut().remove_projectile_ammo(owner, cost);

    debug!(owner = owner_id.raw(), cost, ?projectile, "projectile fired");
    projectile
}
