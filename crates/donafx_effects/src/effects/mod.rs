//! # Timed Effects
//!
//! One running effect = one [`EffectInstance`] bound to one target object.
//!
//! ## Lifecycle
//!
//! ```text
//! Created ──start()──> Running ──elapsed >= duration──> Completed
//!    │                    │                                ^
//!    │ start failed       └────────────stop()──────────────┤
//!    └─────────────────────────────────────────────────────┘
//! ```
//!
//! `update()` and `stop()` on a Completed instance are no-ops.
//!
//! ## Variants
//!
//! | Variant        | Mutates                 | Creates                   |
//! |----------------|-------------------------|---------------------------|
//! | Rotation       | rotation and/or scale   | -                         |
//! | Rotation3D     | scale                   | -                         |
//! | Kaleidoscope   | rotation + scale        | -                         |
//! | Shake          | position                | -                         |
//! | Blink          | visibility              | -                         |
//! | HueShift       | -                       | one colour filter         |
//! | ProgressBar    | -                       | one text object           |
//! | RandomShapes   | -                       | N shape proxies           |
//! | ParticleSystem | -                       | N particle proxies        |

mod blink;
mod hue;
mod instance;
mod particles;
mod progress;
mod proxies;
mod rotation;
mod shake;
mod shapes;

pub use blink::BlinkEffect;
pub use hue::HueShiftEffect;
pub use instance::{EffectInstance, EffectKind};
pub use particles::{Particle, ParticleKind, ParticleSystemEffect};
pub use progress::ProgressBarEffect;
pub use rotation::{KaleidoscopeEffect, Rotation3DEffect, RotationEffect, RotationMode};
pub use shake::ShakeEffect;
pub use shapes::{RandomShapesEffect, Shape, ShapeType};

use donafx_core::{ObjectRef, SceneGateway};
use donafx_shared::Transform;
use std::fmt;

/// Unique id of an effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of effect kinds.
///
/// The discriminant is the index used by uniform random selection.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectType {
    /// Continuous rotation
    Rotation = 0,
    /// Visibility square wave
    Blink = 1,
    /// Random jitter around the original position
    Shake = 2,
    /// Colour filter sweeping the hue
    HueShift = 3,
    /// Pseudo-3D spin on both axes
    Rotation3D = 4,
    /// Bouncing shapes
    RandomShapes = 5,
    /// Particle fountain
    ParticleSystem = 6,
    /// Text progress label
    ProgressBar = 7,
    /// Spin plus scale pulse
    Kaleidoscope = 8,
}

impl EffectType {
    /// Every kind, in selection order
    pub const ALL: [Self; 9] = [
        Self::Rotation,
        Self::Blink,
        Self::Shake,
        Self::HueShift,
        Self::Rotation3D,
        Self::RandomShapes,
        Self::ParticleSystem,
        Self::ProgressBar,
        Self::Kaleidoscope,
    ];

    /// Kind for a selection index
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Rotation),
            1 => Some(Self::Blink),
            2 => Some(Self::Shake),
            3 => Some(Self::HueShift),
            4 => Some(Self::Rotation3D),
            5 => Some(Self::RandomShapes),
            6 => Some(Self::ParticleSystem),
            7 => Some(Self::ProgressBar),
            8 => Some(Self::Kaleidoscope),
            _ => None,
        }
    }

    /// Short snake-case name, also used in temporary object names
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rotation => "rotation",
            Self::Blink => "blink",
            Self::Shake => "shake",
            Self::HueShift => "hue_shift",
            Self::Rotation3D => "rotation_3d",
            Self::RandomShapes => "shape",
            Self::ParticleSystem => "particle",
            Self::ProgressBar => "progress_bar",
            Self::Kaleidoscope => "kaleidoscope",
        }
    }

    /// Does this kind mutate the target itself (as opposed to spawning objects)?
    #[must_use]
    pub const fn mutates_target(self) -> bool {
        !matches!(
            self,
            Self::RandomShapes | Self::ParticleSystem | Self::ProgressBar
        )
    }
}

/// Lifecycle phase of an instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectPhase {
    /// Built, not started
    Created,
    /// Ticking
    Running,
    /// Stopped; never runs again
    Completed,
}

/// Pre-effect state of the target, captured once at start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    /// Transform before the effect
    pub transform: Transform,
    /// Visibility before the effect
    pub visible: bool,
}

impl Snapshot {
    /// Captures the current state of `target`, if it exists.
    #[must_use]
    pub fn capture(scene: &dyn SceneGateway, target: &ObjectRef) -> Option<Self> {
        Some(Self {
            transform: scene.transform(target)?,
            visible: scene.is_visible(target)?,
        })
    }
}

/// Everything a variant sees during start, update and stop.
pub(crate) struct EffectContext<'a> {
    /// Host scene
    pub scene: &'a mut dyn SceneGateway,
    /// Target object
    pub target: &'a ObjectRef,
    /// Owning instance id
    pub id: EffectId,
    /// Pre-effect state of the target
    pub snapshot: Snapshot,
    /// Instance-private random stream
    pub rng: &'a mut rand_chacha::ChaCha8Rng,
    /// Seconds since start
    pub elapsed: f64,
    /// Total lifetime in seconds
    pub duration: f64,
    /// Step of this tick in seconds
    pub dt: f64,
}

impl EffectContext<'_> {
    /// Name of the single temporary object or filter of this instance.
    pub fn temp_name(&self, kind: EffectType) -> String {
        format!("{}{}_{}", donafx_shared::constants::TEMP_PREFIX, kind.label(), self.id)
    }

    /// Name of the `n`-th temporary object of this instance.
    pub fn temp_name_n(&self, kind: EffectType, n: usize) -> String {
        format!("{}_{n}", self.temp_name(kind))
    }

    /// Puts the snapshot rotation back.
    pub fn restore_rotation(&mut self) {
        self.scene
            .set_rotation(self.target, self.snapshot.transform.rotation);
    }

    /// Puts the snapshot scale back.
    pub fn restore_scale(&mut self) {
        self.scene.set_scale(self.target, self.snapshot.transform.scale);
    }

    /// Puts the snapshot position back.
    pub fn restore_position(&mut self) {
        self.scene
            .set_position(self.target, self.snapshot.transform.position);
    }

    /// Puts the snapshot visibility back.
    pub fn restore_visibility(&mut self) {
        self.scene.set_visible(self.target, self.snapshot.visible);
    }
}

/// Scale factor that fakes an out-of-plane rotation by `degrees`.
#[inline]
#[must_use]
pub(crate) fn squash(degrees: f64) -> f64 {
    0.2 + 0.8 * degrees.to_radians().cos().abs()
}
