//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one step: refresh the registry,
//! handle game controls, update every simulatable entity in id order, then
//! apply the passive survival score and reseed asteroids if the field is empty.

use super::entity::EntityKind;
use super::registry::Role;
use super::ship::Ship;
use super::state::World;
use crate::audio::AudioManager;
use crate::platform::{InputSource, Key};
use crate::score::{ScoreSink, Scoreboard};

/// Advance the world by one fixed step
pub fn tick(world: &mut World, input: &mut dyn InputSource, audio: &mut AudioManager) {
    world.registry.refresh();
    world.tick_count += 1;
    world.asteroid_count = world.registry.count_of(EntityKind::Asteroid);

    control(world, input, audio);
    if world.paused {
        return;
    }

    let ids = world.registry.with_role(Role::Simulatable);
    let mut ctx = world.context(input, audio);
    for id in ids {
        ctx.with_entity(id, |entity, ctx| entity.update(id, ctx));
    }

    survival_score(world);
    world.seed_asteroids();
}

fn control(world: &mut World, input: &mut dyn InputSource, audio: &mut AudioManager) {
    if input.consume_press(Key::Pause) {
        world.paused = !world.paused;
        log::info!(
            "{} at step {}",
            if world.paused { "Paused" } else { "Resumed" },
            world.tick_count
        );
    }

    if world.ship().is_some_and(Ship::can_restart) && input.consume_press(Key::Restart) {
        world.restart(input, audio);
    }
}

fn survival_score(world: &mut World) {
    let bonus = Scoreboard::survival_bonus(world.asteroid_count);
    let Some(points) = world.ship().and_then(|ship| ship.scaled_award(bonus)) else {
        return;
    };
    if world.score.tick() {
        world.score.add_score(points);
    }
}
