//! Particle effects
//!
//! An emitter owns a batch of stationary, fading dots scattered inside a
//! rectangle. Recurring emitters re-roll a particle when it fades out; others
//! drop it. An emitter with no particles left unregisters itself.

use glam::DVec2;
use rand::Rng;

use super::context::SimContext;
use super::pickup::PowerKind;
use super::registry::EntityId;
use super::state::Bounds;
use crate::render::{Color, DrawCommand, DrawItem};

/// Stars in a 1280x720 arena; other sizes scale by area
const STARFIELD_STARS: f64 = 300.0;
const STARFIELD_REFERENCE_AREA: f64 = 1280.0 * 720.0;

/// Random ranges a particle is rolled from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpec {
    /// Top-left corner of the spawn rectangle
    pub origin: DVec2,
    /// Spawn rectangle size
    pub extent: DVec2,
    /// Diameter range
    pub size: (f64, f64),
    /// Initial alpha range (0-255)
    pub alpha: (f64, f64),
    /// Alpha lost per step
    pub fade: (f64, f64),
    /// 0xRRGGBB
    pub color: u32,
}

impl ParticleSpec {
    /// Twinkling background covering the arena plus a small margin
    pub fn starfield(bounds: Bounds) -> Self {
        Self {
            origin: DVec2::splat(-10.0),
            extent: DVec2::new(bounds.width + 10.0, bounds.height + 10.0),
            size: (3.0, 20.0),
            alpha: (80.0, 220.0),
            fade: (0.025, 5.0),
            color: 0xAB9AB2,
        }
    }

    /// Star count for an arena, scaled from the reference density
    pub fn starfield_count(bounds: Bounds) -> usize {
        (STARFIELD_STARS * bounds.width * bounds.height / STARFIELD_REFERENCE_AREA) as usize
    }

    /// Debris cloud around a dying asteroid
    pub fn asteroid_debris(center: DVec2, size: u32) -> Self {
        let half = size as f64 * 3.0;
        Self {
            origin: center - DVec2::splat(half),
            extent: DVec2::splat(half * 2.0),
            size: (15.0, 40.0),
            alpha: (30.0, 200.0),
            fade: (2.0, 5.0),
            color: 0x7C2B2B,
        }
    }

    /// Fireball where the ship blew up
    pub fn ship_explosion(center: DVec2) -> Self {
        Self {
            origin: center - DVec2::splat(40.0),
            extent: DVec2::splat(40.0),
            size: (15.0, 40.0),
            alpha: (30.0, 200.0),
            fade: (2.0, 5.0),
            color: 0x551111,
        }
    }

    /// Puff shown when the ship (re)spawns
    pub fn spawn_smoke(center: DVec2) -> Self {
        Self {
            origin: center - DVec2::splat(40.0),
            extent: DVec2::splat(40.0),
            size: (30.0, 60.0),
            alpha: (40.0, 250.0),
            fade: (1.0, 4.0),
            color: 0xEEFFEE,
        }
    }

    /// Burst left behind by a collected power-up
    pub fn pickup_puff(center: DVec2) -> Self {
        Self {
            origin: center - DVec2::splat(25.0),
            extent: DVec2::splat(50.0),
            size: (15.0, 40.0),
            alpha: (30.0, 150.0),
            fade: (2.0, 3.0),
            color: 0x117711,
        }
    }

    /// One exhaust spark behind the ship; the green channel flickers
    pub fn thrust_trail<R: Rng>(center: DVec2, rng: &mut R) -> Self {
        let flicker: u32 = rng.random_range(0x11..0x55);
        Self {
            origin: center - DVec2::splat(7.0),
            extent: DVec2::splat(7.0),
            size: (5.0, 15.0),
            alpha: (50.0, 180.0),
            fade: (0.5, 2.0),
            color: 0xCC2222 + (flicker << 8),
        }
    }

    fn roll<R: Rng>(&self, rng: &mut R) -> Particle {
        Particle {
            position: self.origin
                + DVec2::new(
                    sample(rng, 0.0, self.extent.x),
                    sample(rng, 0.0, self.extent.y),
                ),
            size: sample(rng, self.size.0, self.size.1).floor(),
            alpha: sample(rng, self.alpha.0, self.alpha.1).floor(),
            fade: sample(rng, self.fade.0, self.fade.1),
        }
    }
}

/// Uniform in [lo, hi), or `lo` for an empty range
pub(crate) fn sample<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Top-left of the dot's bounding square
    pub position: DVec2,
    pub size: f64,
    pub alpha: f64,
    pub fade: f64,
}

#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    spec: ParticleSpec,
    particles: Vec<Particle>,
    z_index: i32,
    recurring: bool,
}

impl ParticleEmitter {
    pub fn new<R: Rng>(spec: ParticleSpec, count: usize, z_index: i32, recurring: bool, rng: &mut R) -> Self {
        Self {
            spec,
            particles: (0..count).map(|_| spec.roll(rng)).collect(),
            z_index,
            recurring,
        }
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring
    }

    /// Once off, faded particles are dropped instead of re-rolled
    pub fn set_recurring(&mut self, recurring: bool) {
        self.recurring = recurring;
    }

    pub fn update(&mut self, id: EntityId, ctx: &mut SimContext<'_>) {
        if self.particles.is_empty() {
            ctx.registry.unregister(id);
            return;
        }
        if ctx.power_active(PowerKind::Freezer) {
            return;
        }
        self.fade_step(&mut *ctx.rng);
    }

    /// Fade every particle one step, re-rolling or dropping the spent ones
    pub fn fade_step<R: Rng>(&mut self, rng: &mut R) {
        let spec = self.spec;
        let recurring = self.recurring;
        self.particles.retain_mut(|particle| {
            particle.alpha -= particle.fade;
            if particle.alpha > 0.0 {
                return true;
            }
            if recurring {
                *particle = spec.roll(rng);
                true
            } else {
                false
            }
        });
    }

    pub fn draw(&self, out: &mut Vec<DrawItem>) {
        for particle in &self.particles {
            let radius = particle.size / 2.0;
            let alpha = particle.alpha.clamp(0.0, 255.0) as u8;
            out.push(DrawItem {
                z: self.z_index,
                command: DrawCommand::disc(
                    particle.position + DVec2::splat(radius),
                    radius,
                    Color::rgba(self.spec.color, alpha),
                ),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn puff() -> ParticleSpec {
        ParticleSpec::pickup_puff(DVec2::new(100.0, 100.0))
    }

    #[test]
    fn test_particles_roll_inside_spec() {
        let mut rng = Pcg32::seed_from_u64(1);
        let spec = puff();
        let emitter = ParticleEmitter::new(spec, 50, 30, false, &mut rng);
        assert_eq!(emitter.particles().len(), 50);
        for p in emitter.particles() {
            assert!(p.position.x >= 75.0 && p.position.x < 125.0);
            assert!(p.size >= 15.0 && p.size < 40.0);
            assert!(p.alpha >= 30.0 && p.alpha < 150.0);
            assert!(p.fade >= 2.0 && p.fade < 3.0);
        }
    }

    #[test]
    fn test_non_recurring_emitter_drains() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut emitter = ParticleEmitter::new(puff(), 20, 30, false, &mut rng);
        // Slowest particle: alpha < 150 at fade >= 2 needs < 75 steps
        for _ in 0..80 {
            emitter.fade_step(&mut rng);
        }
        assert!(emitter.particles().is_empty());
    }

    #[test]
    fn test_recurring_emitter_keeps_count() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut emitter = ParticleEmitter::new(puff(), 20, 30, true, &mut rng);
        for _ in 0..200 {
            emitter.fade_step(&mut rng);
        }
        assert_eq!(emitter.particles().len(), 20);
        emitter.set_recurring(false);
        for _ in 0..80 {
            emitter.fade_step(&mut rng);
        }
        assert!(emitter.particles().is_empty());
    }

    #[test]
    fn test_starfield_density() {
        let bounds = Bounds::new(1280.0, 720.0);
        assert_eq!(ParticleSpec::starfield_count(bounds), 300);
        let bounds = Bounds::new(640.0, 360.0);
        assert_eq!(ParticleSpec::starfield_count(bounds), 75);
    }

    #[test]
    fn test_draw_one_disc_per_particle() {
        let mut rng = Pcg32::seed_from_u64(4);
        let emitter = ParticleEmitter::new(puff(), 5, 30, false, &mut rng);
        let mut out = Vec::new();
        emitter.draw(&mut out);
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|item| item.z == 30));
    }
}
