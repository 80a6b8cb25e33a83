//! Particle systems.
//!
//! Five kinds share one simulation loop and differ only in their spawn and
//! step rules:
//!
//! - **Fountain**: shoots up from the bottom edge, falls back under gravity
//! - **Explosion**: one burst from the canvas centre, decelerating, red to gray
//! - **Rain**: accelerates down, splashes briefly on the ground, respawns on top
//! - **Snow**: falls slowly, swaying sideways
//! - **Star**: stays put and twinkles
//!
//! Every particle is mirrored into one scene proxy each tick.

#![allow(clippy::cast_possible_truncation)]

use super::proxies::{ProxySet, MAX_PROXIES};
use super::{EffectContext, EffectType};
use crate::error::{EffectError, EffectResult};
use donafx_core::{ObjectDescriptor, SettingValue, SourceKind};
use donafx_shared::{Vec2, CANVAS_HEIGHT, CANVAS_WIDTH};
use rand::Rng;
use std::f32::consts::{PI, TAU};

// =============================================================================
// TUNING
// =============================================================================

/// Fountain gravity (px/s², +y is down)
const FOUNTAIN_GRAVITY: f32 = 200.0;
/// Fountain particle lifetime in seconds
const FOUNTAIN_LIFE: f32 = 3.0;
/// Rain gravity (px/s²)
const RAIN_GRAVITY: f32 = 980.0;
/// Length of a rain splash in seconds
const SPLASH_TIME: f32 = 0.2;
/// Fraction of explosion speed lost per second
const EXPLOSION_DRAG: f32 = 1.5;

/// Explosion colour ramp by remaining life fraction
const EXPLOSION_RED: u32 = 0xFFFF_2000;
const EXPLOSION_YELLOW: u32 = 0xFFFF_D000;
const EXPLOSION_WHITE: u32 = 0xFFFF_FFFF;
const EXPLOSION_GRAY: u32 = 0xFF80_8080;

const RAIN_COLOR: u32 = 0xFF70_A0FF;
const SPLASH_COLOR: u32 = 0xFFC0_E0FF;
const SNOW_COLOR: u32 = 0xFFFF_FFFF;
const STAR_COLOR: u32 = 0xFFFF_F0A0;

/// Particle behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParticleKind {
    /// Upward spray from the bottom edge
    #[default]
    Fountain,
    /// Single burst from the centre
    Explosion,
    /// Falling drops with splashes
    Rain,
    /// Swaying flakes
    Snow,
    /// Twinkling points
    Star,
}

impl ParticleKind {
    /// Kind for a configuration code: 0 explosion, 1 rain, 2 snow, else star.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Explosion,
            1 => Self::Rain,
            2 => Self::Snow,
            _ => Self::Star,
        }
    }

    /// Short name used in logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fountain => "fountain",
            Self::Explosion => "explosion",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Star => "star",
        }
    }
}

/// One simulated particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in canvas pixels
    pub position: Vec2,
    /// Velocity in pixels per second
    pub velocity: Vec2,
    /// Remaining life in seconds
    pub life: f32,
    /// Life at spawn
    pub max_life: f32,
    /// Diameter in pixels
    pub size: f32,
    /// ARGB colour
    pub color: u32,
    /// 0.0 (transparent) to 1.0 (opaque)
    pub opacity: f32,
    /// Remaining splash time (rain only, 0 = falling)
    pub splash: f32,
    /// Sway centre line (snow only)
    pub anchor_x: f32,
    /// Sway amplitude in pixels (snow only)
    pub sway_amplitude: f32,
    /// Sway frequency in Hz (snow only)
    pub sway_frequency: f32,
    /// Sway phase in radians (snow only)
    pub sway_phase: f32,
    /// False once an explosion particle burned out
    pub alive: bool,
}

impl Particle {
    const BLANK: Self = Self {
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        life: 1.0,
        max_life: 1.0,
        size: 1.0,
        color: 0xFFFF_FFFF,
        opacity: 1.0,
        splash: 0.0,
        anchor_x: 0.0,
        sway_amplitude: 0.0,
        sway_frequency: 0.0,
        sway_phase: 0.0,
        alive: true,
    };

    /// Spawns a particle of `kind`. `initial` is true for the first
    /// generation, which is staggered so the system starts out populated.
    pub fn spawn(kind: ParticleKind, rng: &mut impl Rng, initial: bool) -> Self {
        let mut p = Self::BLANK;
        match kind {
            ParticleKind::Fountain => {
                p.position = Vec2::new(rng.gen_range(0.0..CANVAS_WIDTH), CANVAS_HEIGHT);
                p.velocity = Vec2::new(rng.gen_range(-100.0..100.0), rng.gen_range(-300.0..-100.0));
                p.max_life = FOUNTAIN_LIFE;
                p.life = if initial { rng.gen_range(0.0..1.0) } else { FOUNTAIN_LIFE };
                p.size = 5.0;
                p.color = rng.gen::<u32>() | 0xFF00_0000;
            }
            ParticleKind::Explosion => {
                let angle: f32 = rng.gen_range(0.0..TAU);
                let speed: f32 = rng.gen_range(200.0..500.0);
                p.position = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
                p.velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
                p.max_life = rng.gen_range(1.0..2.0);
                p.life = p.max_life;
                p.size = 8.0;
                p.color = EXPLOSION_RED;
            }
            ParticleKind::Rain => {
                let y = if initial { rng.gen_range(-CANVAS_HEIGHT..0.0) } else { -20.0 };
                p.position = Vec2::new(rng.gen_range(0.0..CANVAS_WIDTH), y);
                p.velocity = Vec2::new(rng.gen_range(-20.0..20.0), rng.gen_range(400.0..700.0));
                p.size = 3.0;
                p.color = RAIN_COLOR;
            }
            ParticleKind::Snow => {
                let y = if initial { rng.gen_range(-CANVAS_HEIGHT..0.0) } else { -10.0 };
                p.anchor_x = rng.gen_range(0.0..CANVAS_WIDTH);
                p.position = Vec2::new(p.anchor_x, y);
                p.velocity = Vec2::new(0.0, rng.gen_range(30.0..80.0));
                p.sway_amplitude = rng.gen_range(20.0..50.0);
                p.sway_frequency = rng.gen_range(0.5..1.5);
                p.sway_phase = rng.gen_range(0.0..TAU);
                p.size = rng.gen_range(4.0..10.0);
                p.color = SNOW_COLOR;
            }
            ParticleKind::Star => {
                p.position = Vec2::new(rng.gen_range(0.0..CANVAS_WIDTH), rng.gen_range(0.0..CANVAS_HEIGHT));
                p.max_life = rng.gen_range(1.0..3.0);
                p.life = if initial { rng.gen_range(0.0..p.max_life) } else { p.max_life };
                p.color = STAR_COLOR;
                p.opacity = 0.0;
                p.size = 2.0;
            }
        }
        p
    }

    /// Remaining life as a fraction of the spawn life.
    #[inline]
    #[must_use]
    pub fn life_fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Advances by `dt` seconds; `time` is the effect's elapsed time.
    /// Returns `true` if the particle burned out on this step.
    pub fn step(&mut self, kind: ParticleKind, dt: f32, time: f32, rng: &mut impl Rng) -> bool {
        match kind {
            ParticleKind::Fountain => {
                self.life -= dt;
                if self.life <= 0.0 {
                    *self = Self::spawn(kind, rng, false);
                }
                self.position += self.velocity * dt;
                self.velocity.y += FOUNTAIN_GRAVITY * dt;
                self.size = 5.0 * self.life;
            }
            ParticleKind::Explosion => {
                if !self.alive {
                    return false;
                }
                self.life -= dt;
                if self.life <= 0.0 {
                    self.alive = false;
                    self.opacity = 0.0;
                    return true;
                }
                self.position += self.velocity * dt;
                self.velocity = self.velocity * (1.0 - EXPLOSION_DRAG * dt).max(0.0);
                let frac = self.life_fraction();
                self.color = explosion_color(frac);
                self.size = 2.0 + 6.0 * frac;
            }
            ParticleKind::Rain => {
                if self.splash > 0.0 {
                    self.splash -= dt;
                    if self.splash <= 0.0 {
                        *self = Self::spawn(kind, rng, false);
                    } else {
                        self.size = 8.0 * (self.splash / SPLASH_TIME);
                    }
                    return false;
                }
                self.velocity.y += RAIN_GRAVITY * dt;
                self.position += self.velocity * dt;
                if self.position.y >= CANVAS_HEIGHT {
                    self.position.y = CANVAS_HEIGHT;
                    self.velocity = Vec2::ZERO;
                    self.splash = SPLASH_TIME;
                    self.color = SPLASH_COLOR;
                    self.size = 8.0;
                }
            }
            ParticleKind::Snow => {
                self.position.y += self.velocity.y * dt;
                self.position.x = self.anchor_x
                    + self.sway_amplitude * (TAU * self.sway_frequency * time + self.sway_phase).sin();
                if self.position.y > CANVAS_HEIGHT {
                    *self = Self::spawn(kind, rng, false);
                }
            }
            ParticleKind::Star => {
                self.life -= dt;
                if self.life <= 0.0 {
                    *self = Self::spawn(kind, rng, false);
                }
                let twinkle = (PI * self.life_fraction()).sin().max(0.0);
                self.size = 2.0 + 8.0 * twinkle;
                self.opacity = twinkle;
            }
        }
        false
    }

    fn descriptor(&self, name: String) -> ObjectDescriptor {
        ObjectDescriptor::new(name, SourceKind::Particle)
            .with_setting("color", self.color)
            .with_setting("size", f64::from(self.size))
            .with_setting("opacity", f64::from(self.opacity))
            .at(self.position)
    }
}

/// Explosion colour for a remaining-life fraction: red, yellow, white, gray.
#[must_use]
pub fn explosion_color(life_fraction: f32) -> u32 {
    if life_fraction > 0.75 {
        EXPLOSION_RED
    } else if life_fraction > 0.5 {
        EXPLOSION_YELLOW
    } else if life_fraction > 0.25 {
        EXPLOSION_WHITE
    } else {
        EXPLOSION_GRAY
    }
}

/// A particle system of one kind.
#[derive(Debug, Default)]
pub struct ParticleSystemEffect {
    /// Particle behaviour
    pub kind: ParticleKind,
    /// Requested particle count
    pub count: usize,
    particles: Vec<Particle>,
    proxies: ProxySet,
}

impl ParticleSystemEffect {
    /// Creates a particle system.
    #[must_use]
    pub fn new(kind: ParticleKind, count: usize) -> Self {
        Self {
            kind,
            count: count.min(MAX_PROXIES),
            particles: Vec::new(),
            proxies: ProxySet::default(),
        }
    }

    /// Current particle states.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn start(&mut self, ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        let kind = self.kind;
        self.particles = (0..self.count)
            .map(|_| Particle::spawn(kind, ctx.rng, true))
            .collect();

        let descriptors: Vec<ObjectDescriptor> = self
            .particles
            .iter()
            .enumerate()
            .map(|(i, p)| p.descriptor(ctx.temp_name_n(EffectType::ParticleSystem, i)))
            .collect();
        if let Err(e) = self.proxies.spawn(ctx.scene, descriptors) {
            self.particles.clear();
            return Err(EffectError::creation(EffectType::ParticleSystem.label(), &e));
        }

        tracing::debug!(
            "particles: {} x {} spawned for effect {}",
            self.count,
            kind.label(),
            ctx.id
        );
        Ok(())
    }

    pub(crate) fn update(&mut self, ctx: &mut EffectContext<'_>) {
        let dt = ctx.dt as f32;
        let time = ctx.elapsed as f32;
        for (i, particle) in self.particles.iter_mut().enumerate() {
            let burned_out = particle.step(self.kind, dt, time, ctx.rng);
            let Some(proxy) = self.proxies.get(i) else {
                continue;
            };
            if burned_out {
                ctx.scene.set_visible(proxy, false);
            }
            if !particle.alive {
                continue;
            }
            ctx.scene.set_position(proxy, particle.position);
            ctx.scene
                .update_setting(proxy, "size", SettingValue::Float(f64::from(particle.size)));
            ctx.scene
                .update_setting(proxy, "color", SettingValue::from(particle.color));
            ctx.scene.update_setting(
                proxy,
                "opacity",
                SettingValue::Float(f64::from(particle.opacity)),
            );
        }
    }

    pub(crate) fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        self.proxies.clear(ctx.scene);
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_config_codes() {
        assert_eq!(ParticleKind::from_code(0), ParticleKind::Explosion);
        assert_eq!(ParticleKind::from_code(1), ParticleKind::Rain);
        assert_eq!(ParticleKind::from_code(2), ParticleKind::Snow);
        assert_eq!(ParticleKind::from_code(3), ParticleKind::Star);
        assert_eq!(ParticleKind::from_code(42), ParticleKind::Star);
    }

    #[test]
    fn test_fountain_spawn_rules() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let p = Particle::spawn(ParticleKind::Fountain, &mut rng, true);
            assert_eq!(p.position.y, CANVAS_HEIGHT);
            assert!((-300.0..-100.0).contains(&p.velocity.y));
            assert!((0.0..1.0).contains(&p.life));
        }
        let p = Particle::spawn(ParticleKind::Fountain, &mut rng, false);
        assert_eq!(p.life, FOUNTAIN_LIFE);
    }

    #[test]
    fn test_fountain_gravity() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut p = Particle::spawn(ParticleKind::Fountain, &mut rng, false);
        let vy = p.velocity.y;
        p.step(ParticleKind::Fountain, 0.1, 0.1, &mut rng);
        assert!((p.velocity.y - (vy + 20.0)).abs() < 1e-3);
        assert!((p.size - 5.0 * 2.9).abs() < 1e-3);
    }

    #[test]
    fn test_explosion_color_ramp() {
        assert_eq!(explosion_color(0.9), EXPLOSION_RED);
        assert_eq!(explosion_color(0.6), EXPLOSION_YELLOW);
        assert_eq!(explosion_color(0.3), EXPLOSION_WHITE);
        assert_eq!(explosion_color(0.1), EXPLOSION_GRAY);
    }

    #[test]
    fn test_explosion_burns_out_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut p = Particle::spawn(ParticleKind::Explosion, &mut rng, true);
        let start_speed = p.velocity.length();
        assert!(!p.step(ParticleKind::Explosion, 0.1, 0.1, &mut rng));
        assert!(p.velocity.length() < start_speed);
        assert!(p.step(ParticleKind::Explosion, 5.0, 5.1, &mut rng));
        assert!(!p.alive);
        assert!(!p.step(ParticleKind::Explosion, 0.1, 5.2, &mut rng));
    }

    #[test]
    fn test_rain_splashes_then_respawns() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut p = Particle::spawn(ParticleKind::Rain, &mut rng, false);
        p.position.y = CANVAS_HEIGHT - 1.0;
        p.step(ParticleKind::Rain, 0.016, 0.0, &mut rng);
        assert!(p.splash > 0.0);
        assert_eq!(p.position.y, CANVAS_HEIGHT);
        assert_eq!(p.color, SPLASH_COLOR);

        for _ in 0..20 {
            p.step(ParticleKind::Rain, 0.016, 0.0, &mut rng);
            if p.splash == 0.0 {
                break;
            }
        }
        assert_eq!(p.splash, 0.0);
        assert_eq!(p.position.y, -20.0);
    }

    #[test]
    fn test_snow_sways_around_anchor() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut p = Particle::spawn(ParticleKind::Snow, &mut rng, false);
        for i in 0..100 {
            p.step(ParticleKind::Snow, 0.016, i as f32 * 0.016, &mut rng);
            assert!((p.position.x - p.anchor_x).abs() <= p.sway_amplitude + 1e-3);
        }
    }

    #[test]
    fn test_star_twinkle_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut p = Particle::spawn(ParticleKind::Star, &mut rng, true);
        for _ in 0..500 {
            p.step(ParticleKind::Star, 0.016, 0.0, &mut rng);
            assert!((0.0..=1.0).contains(&p.opacity));
            assert!((2.0..=10.0).contains(&p.size));
        }
    }
}
