//! Presentation cues for weapons (sounds and view-model animations).
//!
//! Weapons never play audio or animations directly. They call into a
//! [`Presentation`] implementation supplied by the host:
//! - [`NullPresentation`] on the simulation-only side (and during predicted
//!   re-simulation, where one-shot cues must not repeat)
//! - [`CueBus`] on a rendering side, which queues [`PresentationCue`]s on a
//!   bounded channel for the audio/animation layers to drain

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// View-model animation requested by a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponAnim {
    /// Pull back to start a charge.
    Pullback,
    /// Primary fire.
    PrimaryFire,
}

/// Weapon sound slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponSound {
    /// Looping charge-up sound while the attack button is held.
    ChargeUp,
    /// "Denied" sound played when a charge is cancelled.
    Denied,
    /// Single shot.
    Shoot,
}

impl WeaponSound {
    /// Sound script name used by the audio layer.
    #[must_use]
    pub const fn script_name(&self) -> &'static str {
        match self {
            Self::ChargeUp => "Weapon_StickyBombLauncher.ChargeUp",
            Self::Denied => "Weapon_BMMH.Denied",
            Self::Shoot => "Weapon_BMMH.Single",
        }
    }
}

/// Sink for weapon sounds and animations.
pub trait Presentation {
    /// Whether this side actually renders cues (client) or only simulates (server).
    fn renders(&self) -> bool;

    /// Play a view-model animation.
    fn play_animation(&mut self, anim: WeaponAnim);

    /// Start a sound.
    fn play_sound(&mut self, sound: WeaponSound);

    /// Stop a sound that may still be playing.
    fn stop_sound(&mut self, sound: WeaponSound);
}

/// Presentation for the simulation-only side. Drops every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn renders(&self) -> bool {
        false
    }

    fn play_animation(&mut self, _anim: WeaponAnim) {}

    fn play_sound(&mut self, _sound: WeaponSound) {}

    fn stop_sound(&mut self, _sound: WeaponSound) {}
}

/// A queued presentation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationCue {
    /// Animation started.
    Animation(WeaponAnim),
    /// Sound started.
    PlaySound(WeaponSound),
    /// Sound stopped.
    StopSound(WeaponSound),
}

/// Channel-backed presentation for the rendering side.
#[derive(Debug)]
pub struct CueBus {
    /// Sender for queued cues
    sender: Sender<PresentationCue>,
    /// Receiver drained by the audio/animation layers
    receiver: Receiver<PresentationCue>,
    /// Whether cues guarded to the rendering side are emitted
    renders: bool,
}

impl Default for CueBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl CueBus {
    /// Creates a rendering cue bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            renders: true,
        }
    }

    /// Sets whether this bus reports itself as rendering.
    #[must_use]
    pub fn with_renders(mut self, renders: bool) -> Self {
        self.renders = renders;
        self
    }

    fn publish(&self, cue: PresentationCue) {
        // Non-blocking send - if full, cue is dropped
        let _ = self.sender.try_send(cue);
    }

    /// Drains all pending cues.
    pub fn drain(&self) -> Vec<PresentationCue> {
        let mut cues = Vec::new();
        while let Ok(cue) = self.receiver.try_recv() {
            cues.push(cue);
        }
        cues
    }

    /// Returns the number of pending cues.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

impl Presentation for CueBus {
    fn renders(&self) -> bool {
        self.renders
    }

    fn play_animation(&mut self, anim: WeaponAnim) {
        self.publish(PresentationCue::Animation(anim));
    }

    fn play_sound(&mut self, sound: WeaponSound) {
        self.publish(PresentationCue::PlaySound(sound));
    }

    fn stop_sound(&mut self, sound: WeaponSound) {
        self.publish(PresentationCue::StopSound(sound));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_bus_drain_order() {
        let mut bus = CueBus::new(8);
        bus.play_animation(WeaponAnim::Pullback);
        bus.play_sound(WeaponSound::ChargeUp);
        bus.stop_sound(WeaponSound::ChargeUp);

        assert_eq!(bus.pending_count(), 3);
        assert_eq!(
            bus.drain(),
            vec![
                PresentationCue::Animation(WeaponAnim::Pullback),
                PresentationCue::PlaySound(WeaponSound::ChargeUp),
                PresentationCue::StopSound(WeaponSound::ChargeUp),
            ]
        );
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_cue_bus_drops_when_full() {
        let mut bus = CueBus::new(1);
        bus.play_sound(WeaponSound::Shoot);
        bus.play_sound(WeaponSound::Denied);

        assert_eq!(bus.drain(), vec![PresentationCue::PlaySound(WeaponSound::Shoot)]);
    }

    #[test]
    fn test_null_presentation_does_not_render() {
        assert!(!NullPresentation.renders());
        assert!(CueBus::default().renders());
        assert!(!CueBus::default().with_renders(false).renders());
    }
}
