//! Random shapes bouncing around the canvas.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use super::proxies::{ProxySet, MAX_PROXIES};
use super::{EffectContext, EffectType};
use crate::error::{EffectError, EffectResult};
use donafx_core::{ObjectDescriptor, SourceKind};
use donafx_shared::{Vec2, CANVAS_HEIGHT, CANVAS_WIDTH};
use rand::Rng;

/// Outline of a shape proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeType {
    /// Axis-aligned rectangle
    Rectangle,
    /// Circle
    Circle,
    /// Triangle
    Triangle,
}

impl ShapeType {
    /// Shape for a random index 0..3
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Self::Rectangle,
            1 => Self::Circle,
            _ => Self::Triangle,
        }
    }

    /// Setting value written to the proxy
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
        }
    }
}

/// One simulated shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    /// Position in canvas pixels
    pub position: Vec2,
    /// Velocity in pixels per second
    pub velocity: Vec2,
    /// Edge length / diameter in pixels
    pub size: f32,
    /// Opaque ARGB colour
    pub color: u32,
    /// Outline
    pub shape: ShapeType,
}

impl Shape {
    /// Random shape somewhere on the canvas.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            position: Vec2::new(rng.gen_range(0.0..CANVAS_WIDTH), rng.gen_range(0.0..CANVAS_HEIGHT)),
            velocity: Vec2::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)),
            size: rng.gen_range(20.0..100.0),
            color: rng.gen_range(0x4000_0000_u32..=0xFFFF_FFFF) | 0xFF00_0000,
            shape: ShapeType::from_index(rng.gen_range(0..3)),
        }
    }

    /// Advances by `dt` seconds, bouncing off the canvas edges.
    pub fn step(&mut self, dt: f32) {
        self.position += self.velocity * dt;

        if self.position.x < 0.0 || self.position.x > CANVAS_WIDTH {
            self.velocity.x = -self.velocity.x;
            self.position.x = self.position.x.clamp(0.0, CANVAS_WIDTH);
        }
        if self.position.y < 0.0 || self.position.y > CANVAS_HEIGHT {
            self.velocity.y = -self.velocity.y;
            self.position.y = self.position.y.clamp(0.0, CANVAS_HEIGHT);
        }
    }

    fn descriptor(&self, name: String) -> ObjectDescriptor {
        ObjectDescriptor::new(name, SourceKind::Shape)
            .with_setting("shape", self.shape.label())
            .with_setting("color", self.color)
            .with_setting("width", f64::from(self.size))
            .with_setting("height", f64::from(self.size))
            .at(self.position)
    }
}

/// `count` shapes drifting with constant velocity and bouncing at the edges.
#[derive(Debug, Default)]
pub struct RandomShapesEffect {
    /// Requested shape count
    pub count: usize,
    shapes: Vec<Shape>,
    proxies: ProxySet,
}

impl RandomShapesEffect {
    /// Creates a shapes effect.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            count: count.min(MAX_PROXIES),
            shapes: Vec::new(),
            proxies: ProxySet::default(),
        }
    }

    /// Current shape states.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub(crate) fn start(&mut self, ctx: &mut EffectContext<'_>) -> EffectResult<()> {
        self.shapes = (0..self.count).map(|_| Shape::random(ctx.rng)).collect();

        let descriptors: Vec<ObjectDescriptor> = self
            .shapes
            .iter()
            .enumerate()
            .map(|(i, s)| s.descriptor(ctx.temp_name_n(EffectType::RandomShapes, i)))
            .collect();
        if let Err(e) = self.proxies.spawn(ctx.scene, descriptors) {
            self.shapes.clear();
            return Err(EffectError::creation(EffectType::RandomShapes.label(), &e));
        }
        Ok(())
    }

    pub(crate) fn update(&mut self, ctx: &mut EffectContext<'_>) {
        let dt = ctx.dt as f32;
        for (i, shape) in self.shapes.iter_mut().enumerate() {
            shape.step(dt);
            if let Some(proxy) = self.proxies.get(i) {
                ctx.scene.set_position(proxy, shape.position);
            }
        }
    }

    pub(crate) fn stop(&mut self, ctx: &mut EffectContext<'_>) {
        self.proxies.clear(ctx.scene);
        self.shapes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_shape_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let s = Shape::random(&mut rng);
            assert!((0.0..CANVAS_WIDTH).contains(&s.position.x));
            assert!((0.0..CANVAS_HEIGHT).contains(&s.position.y));
            assert!((20.0..100.0).contains(&s.size));
            assert_eq!(s.color >> 24, 0xFF);
        }
    }

    #[test]
    fn test_bounce_reflects_and_clamps() {
        let mut s = Shape {
            position: Vec2::new(CANVAS_WIDTH - 1.0, 5.0),
            velocity: Vec2::new(100.0, -1000.0),
            size: 20.0,
            color: 0xFFFF_0000,
            shape: ShapeType::Circle,
        };
        s.step(0.016);
        assert_eq!(s.position.x, CANVAS_WIDTH);
        assert!(s.velocity.x < 0.0);
        assert_eq!(s.position.y, 0.0);
        assert!(s.velocity.y > 0.0);
    }
}
