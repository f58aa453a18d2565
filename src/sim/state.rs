//! Game state and core simulation types
//!
//! The `World` owns everything one run needs: the entity registry, the score,
//! the seeded RNG and the pause flag. Nothing here is persisted; a fresh
//! process starts a fresh world.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::Asteroid;
use super::context::SimContext;
use super::entity::{Entity, EntityKind};
use super::particle::{ParticleEmitter, ParticleSpec};
use super::registry::{EntityId, Registry, Role};
use super::ship::Ship;
use crate::audio::AudioManager;
use crate::platform::InputSource;
use crate::render::shapes::sort_by_z;
use crate::render::{Color, DrawCommand, DrawItem, Snapshot};
use crate::score::{ScoreSink, Scoreboard};
use crate::settings::Settings;

const STARFIELD_Z_INDEX: i32 = 0;
const SMOKE_PARTICLES: usize = 50;
const SMOKE_Z_INDEX: i32 = 100;
/// Overlay text and panels sit above every entity
const HUD_Z_INDEX: i32 = 1000;

/// Rectangular play area anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Inside `[0, width] x [0, height]`, edges included
    pub fn contains(&self, point: DVec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Further than `margin` outside the area on any side
    pub fn is_outside(&self, point: DVec2, margin: f64) -> bool {
        point.x < -margin
            || point.x > self.width + margin
            || point.y < -margin
            || point.y > self.height + margin
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Complete simulation state for one run
#[derive(Debug)]
pub struct World {
    pub registry: Registry,
    pub score: Scoreboard,
    pub bounds: Bounds,
    pub settings: Settings,
    /// RNG for all gameplay randomness
    pub rng: Pcg32,
    pub ship_id: EntityId,
    pub paused: bool,
    /// Steps simulated so far
    pub tick_count: u64,
    /// Asteroids live at the start of the current step
    pub asteroid_count: usize,
    seed: u64,
}

impl World {
    /// Build a world with the ship centred and the starfield running.
    /// Asteroids arrive on the first step.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let bounds = Bounds::new(settings.arena_width, settings.arena_height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut registry = Registry::new();

        if settings.quality.starfield_enabled() {
            let count = settings.particle_count(ParticleSpec::starfield_count(bounds));
            if count > 0 {
                registry.register(ParticleEmitter::new(
                    ParticleSpec::starfield(bounds),
                    count,
                    STARFIELD_Z_INDEX,
                    true,
                    &mut rng,
                ));
            }
        }

        let ship_id = registry.register(Ship::new(bounds.center()));

        let smoke = settings.particle_count(SMOKE_PARTICLES);
        if smoke > 0 {
            registry.register(ParticleEmitter::new(
                ParticleSpec::spawn_smoke(bounds.center()),
                smoke,
                SMOKE_Z_INDEX,
                false,
                &mut rng,
            ));
        }
        registry.refresh();

        log::info!(
            "World started: seed {}, arena {}x{}, quality {}",
            seed,
            bounds.width,
            bounds.height,
            settings.quality.as_str()
        );

        Self {
            registry,
            score: Scoreboard::new(settings.update_rate),
            bounds,
            settings,
            rng,
            ship_id,
            paused: false,
            tick_count: 0,
            asteroid_count: 0,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.registry.get(self.ship_id).and_then(Entity::as_ship)
    }

    /// Borrow the world as the context handed to entity updates
    pub fn context<'a>(
        &'a mut self,
        input: &'a mut dyn InputSource,
        audio: &'a mut AudioManager,
    ) -> SimContext<'a> {
        SimContext {
            registry: &mut self.registry,
            rng: &mut self.rng,
            input,
            audio,
            score: &mut self.score,
            settings: &self.settings,
            bounds: self.bounds,
            ship_id: self.ship_id,
            asteroid_count: self.asteroid_count,
            tick: self.tick_count,
        }
    }

    /// Bring in the initial wave if no asteroid is live
    pub fn seed_asteroids(&mut self) {
        if self.registry.count_of(EntityKind::Asteroid) > 0 {
            return;
        }
        let count = self.settings.initial_asteroids;
        for _ in 0..count {
            let asteroid = Asteroid::incoming(self.bounds, self.asteroid_count, &mut self.rng);
            self.registry.register(asteroid);
        }
        self.asteroid_count = count;
        log::debug!("Seeded {} asteroids at step {}", count, self.tick_count);
    }

    /// Start a new run: clear the field, bring the ship back, bank the score
    pub fn restart(&mut self, input: &mut dyn InputSource, audio: &mut AudioManager) {
        log::info!(
            "Restarting at step {}, final score {}",
            self.tick_count,
            self.score.score()
        );
        let center = self.bounds.center();
        let mut ctx = self.context(input, audio);

        for id in ctx.registry.ids_of(EntityKind::Asteroid) {
            ctx.with_entity(id, |entity, ctx| {
                if let Some(asteroid) = entity.as_asteroid_mut() {
                    asteroid.kill(ctx);
                }
            });
        }
        for id in ctx.registry.ids_of(EntityKind::PowerUp) {
            ctx.with_entity(id, |entity, ctx| {
                if let Some(power_up) = entity.as_power_up() {
                    power_up.kill(id, ctx);
                }
            });
        }
        ctx.with_ship(|ship, ctx| ship.resurrect(center, ctx));

        self.seed_asteroids();
        self.score.reset();
    }

    /// Frame for the presentation sink: every drawable in z order, then the HUD
    pub fn snapshot(&self) -> Snapshot {
        let mut items = Vec::new();
        for (_, entity) in self.registry.iter_live() {
            if entity.has_role(Role::Drawable) {
                entity.draw(&mut items);
            }
        }
        sort_by_z(&mut items);

        let ship_destroyed = self.ship().is_some_and(Ship::is_destroyed);
        self.draw_hud(ship_destroyed, &mut items);

        Snapshot {
            tick: self.tick_count,
            items,
            score: self.score.score(),
            best_score: self.score.best_score(),
            paused: self.paused,
            ship_destroyed,
        }
    }

    fn draw_hud(&self, ship_destroyed: bool, out: &mut Vec<DrawItem>) {
        let text = |position: DVec2, text: String, size: f32| DrawItem {
            z: HUD_Z_INDEX,
            command: DrawCommand::Text {
                position,
                text,
                size,
                color: Color::WHITE,
            },
        };
        let center = self.bounds.center();

        if !ship_destroyed {
            let x = self.bounds.width - 250.0;
            out.push(text(
                DVec2::new(x, 50.0),
                format!("Best score: {}", self.score.best_score()),
                24.0,
            ));
            out.push(text(DVec2::new(x, 75.0), format!("Score: {}", self.score.score()), 24.0));
            if self.paused {
                self.draw_panel(out);
                out.push(text(center, "PAUSED".to_string(), 64.0));
            }
            return;
        }

        self.draw_panel(out);
        out.push(text(center - DVec2::new(0.0, 30.0), "You have crashed!".to_string(), 64.0));
        if self.ship().is_some_and(Ship::can_restart) {
            let banner = if self.score.is_record() {
                format!("New record! Your score: {}. Press R to restart!", self.score.score())
            } else {
                format!(
                    "Best score: {}. Your score: {}. Press R to restart!",
                    self.score.best_score(),
                    self.score.score()
                )
            };
            out.push(text(center + DVec2::new(0.0, 10.0), banner, 24.0));
        }
    }

    fn draw_panel(&self, out: &mut Vec<DrawItem>) {
        out.push(DrawItem {
            z: HUD_Z_INDEX,
            command: DrawCommand::Rect {
                origin: self.bounds.center() - DVec2::new(360.0, 120.0),
                size: DVec2::new(720.0, 150.0),
                fill: Color::BLACK,
            },
        });
    }
}
