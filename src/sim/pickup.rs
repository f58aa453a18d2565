//! Power-ups
//!
//! A power-up sits still, fading in, until the ship passes within reach of it.
//! Kinds are drawn by weighted roll; common ones are cheap, strong ones rare.

use glam::DVec2;
use rand::Rng;

use super::context::SimContext;
use super::particle::{ParticleSpec, sample};
use super::registry::EntityId;
use super::state::Bounds;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::render::{Color, DrawCommand, DrawItem};

const FADE_SPEED: f64 = 0.15;
const Z_INDEX: i32 = 20;
const PUFF_Z_INDEX: i32 = 30;
/// Power-ups never spawn closer than this to an arena edge
const EDGE_MARGIN: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerKind {
    DoubleDamage,
    FireRate,
    BigBoom,
    DoubleScore,
    Invincible,
    AddScore,
    Freezer,
    Shrink,
}

impl PowerKind {
    pub const ALL: [PowerKind; 8] = [
        PowerKind::DoubleDamage,
        PowerKind::FireRate,
        PowerKind::BigBoom,
        PowerKind::DoubleScore,
        PowerKind::Invincible,
        PowerKind::AddScore,
        PowerKind::Freezer,
        PowerKind::Shrink,
    ];

    /// Relative spawn weight
    pub fn weight(self) -> u32 {
        match self {
            PowerKind::DoubleDamage => 25,
            PowerKind::FireRate => 25,
            PowerKind::BigBoom => 75,
            PowerKind::DoubleScore => 100,
            PowerKind::Invincible => 10,
            PowerKind::AddScore => 250,
            PowerKind::Freezer => 75,
            PowerKind::Shrink => 50,
        }
    }

    /// Ticks the effect lasts; 0 for one-shot kinds
    pub fn duration(self) -> u32 {
        match self {
            PowerKind::DoubleDamage | PowerKind::FireRate | PowerKind::Shrink => 600,
            PowerKind::DoubleScore => 900,
            PowerKind::Invincible => 360,
            PowerKind::Freezer => 300,
            PowerKind::BigBoom | PowerKind::AddScore => 0,
        }
    }

    /// Badge colour, 0xRRGGBB
    pub fn color(self) -> u32 {
        match self {
            PowerKind::DoubleDamage => 0x880000,
            PowerKind::FireRate => 0x888800,
            PowerKind::BigBoom => 0x884422,
            PowerKind::DoubleScore => 0x008800,
            PowerKind::Invincible => 0x440088,
            PowerKind::AddScore => 0x008844,
            PowerKind::Freezer => 0x008888,
            PowerKind::Shrink => 0x226688,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PowerKind::DoubleDamage => "D",
            PowerKind::FireRate => "R",
            PowerKind::BigBoom => "B",
            PowerKind::DoubleScore => "S",
            PowerKind::Invincible => "I",
            PowerKind::AddScore => "+",
            PowerKind::Freezer => "F",
            PowerKind::Shrink => "s",
        }
    }

    pub fn total_weight() -> u32 {
        Self::ALL.iter().map(|kind| kind.weight()).sum()
    }

    /// Weighted pick
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        Self::pick(rng.random_range(0..Self::total_weight()))
    }

    /// Kind owning `value` on the cumulative weight line
    pub fn pick(value: u32) -> Self {
        let mut cumulative = 0;
        for kind in Self::ALL {
            cumulative += kind.weight();
            if value < cumulative {
                return kind;
            }
        }
        PowerKind::DoubleScore
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    position: DVec2,
    kind: PowerKind,
    /// 0-255, rises every step
    alpha: f64,
}

impl PowerUp {
    pub fn new(position: DVec2, kind: PowerKind) -> Self {
        Self {
            position,
            kind,
            alpha: 0.0,
        }
    }

    /// Random kind at a random spot away from the edges
    pub fn random<R: Rng>(bounds: Bounds, rng: &mut R) -> Self {
        let x = sample(rng, EDGE_MARGIN, bounds.width - EDGE_MARGIN);
        let y = sample(rng, EDGE_MARGIN, bounds.height - EDGE_MARGIN);
        Self::new(DVec2::new(x, y), PowerKind::roll(rng))
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn kind(&self) -> PowerKind {
        self.kind
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn z_index(&self) -> i32 {
        Z_INDEX
    }

    pub fn update(&mut self) {
        self.alpha = (self.alpha + FADE_SPEED).min(255.0);
    }

    /// Remove from play, leaving a puff of smoke
    pub fn kill(&self, id: EntityId, ctx: &mut SimContext<'_>) {
        ctx.registry.unregister(id);
        ctx.play(SoundEffect::Puff);
        ctx.emit(ParticleSpec::pickup_puff(self.position), 50, PUFF_Z_INDEX, false);
    }

    pub fn draw(&self, out: &mut Vec<DrawItem>) {
        let alpha = self.alpha as u8;
        out.push(DrawItem {
            z: Z_INDEX,
            command: DrawCommand::ring(
                self.position,
                POWER_UP_RADIUS,
                Color::rgba(self.kind.color(), alpha),
                Color::WHITE.with_alpha(alpha),
                3.0,
            ),
        });
        out.push(DrawItem {
            z: Z_INDEX,
            command: DrawCommand::Text {
                position: self.position,
                text: self.kind.symbol().to_string(),
                size: 20.0,
                color: Color::WHITE.with_alpha(alpha),
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pick_walks_cumulative_weights() {
        assert_eq!(PowerKind::pick(0), PowerKind::DoubleDamage);
        assert_eq!(PowerKind::pick(24), PowerKind::DoubleDamage);
        assert_eq!(PowerKind::pick(25), PowerKind::FireRate);
        assert_eq!(PowerKind::pick(50), PowerKind::BigBoom);
        let last = PowerKind::total_weight() - 1;
        assert_eq!(PowerKind::pick(last), PowerKind::Shrink);
    }

    #[test]
    fn test_roll_follows_weights() {
        let mut rng = Pcg32::seed_from_u64(11);
        let rolls: Vec<PowerKind> = (0..6100).map(|_| PowerKind::roll(&mut rng)).collect();
        let add_score = rolls.iter().filter(|k| **k == PowerKind::AddScore).count();
        let invincible = rolls.iter().filter(|k| **k == PowerKind::Invincible).count();
        // 250/610 vs 10/610
        assert!(add_score > invincible * 5);
        assert!(PowerKind::ALL.iter().all(|k| rolls.contains(k)));
    }

    #[test]
    fn test_spawn_stays_off_the_edges() {
        let mut rng = Pcg32::seed_from_u64(12);
        let bounds = Bounds::new(400.0, 300.0);
        for _ in 0..100 {
            let p = PowerUp::random(bounds, &mut rng).position();
            assert!(p.x >= 25.0 && p.x < 375.0);
            assert!(p.y >= 25.0 && p.y < 275.0);
        }
    }

    #[test]
    fn test_fades_in_and_saturates() {
        let mut power_up = PowerUp::new(DVec2::ZERO, PowerKind::Freezer);
        power_up.update();
        assert!((power_up.alpha() - FADE_SPEED).abs() < 1e-12);
        for _ in 0..3000 {
            power_up.update();
        }
        assert_eq!(power_up.alpha(), 255.0);
    }
}
