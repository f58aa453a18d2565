//! Keyboard state for the simulation
//!
//! The host feeds key-down/key-up events; the simulation polls held keys and
//! consumes one-shot presses. A consumed press stays memorized until the physical
//! key is released, so holding a key fires its action exactly once.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Thrust,
    Brake,
    Fire,
    Pause,
    Restart,
}

/// What the simulation reads input through
pub trait InputSource {
    /// Key is physically held
    fn is_pressed(&self, key: Key) -> bool;

    /// Edge-triggered read: true once per physical press of `key`
    fn consume_press(&mut self, key: Key) -> bool;
}

/// Held and memorized key sets
#[derive(Debug, Default, Clone)]
pub struct Keyboard {
    pressed: HashSet<Key>,
    memorized: HashSet<Key>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    /// Releasing a key also forgets that its press was consumed
    pub fn key_up(&mut self, key: Key) {
        self.pressed.remove(&key);
        self.memorized.remove(&key);
    }

    pub fn is_memorized(&self, key: Key) -> bool {
        self.memorized.contains(&key)
    }

    /// Mark the current press as consumed. No-op if the key isn't held.
    pub fn memorize_press(&mut self, key: Key) {
        if self.pressed.contains(&key) {
            self.memorized.insert(key);
        }
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.memorized.clear();
    }
}

impl InputSource for Keyboard {
    fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn consume_press(&mut self, key: Key) -> bool {
        if self.is_pressed(key) && !self.is_memorized(key) {
            self.memorize_press(key);
            true
        } else {
            false
        }
    }
}

/// Keyboard shared between the host's event thread and the updater
#[derive(Debug, Default, Clone)]
pub struct SharedKeyboard(Arc<Mutex<Keyboard>>);

impl SharedKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&self, key: Key) {
        self.with(|keyboard| keyboard.key_down(key));
    }

    pub fn key_up(&self, key: Key) {
        self.with(|keyboard| keyboard.key_up(key));
    }

    fn with<T>(&self, f: impl FnOnce(&mut Keyboard) -> T) -> T {
        let mut guard = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl InputSource for SharedKeyboard {
    fn is_pressed(&self, key: Key) -> bool {
        self.with(|keyboard| keyboard.is_pressed(key))
    }

    fn consume_press(&mut self, key: Key) -> bool {
        self.with(|keyboard| keyboard.consume_press(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_key_fires_once() {
        let mut kb = Keyboard::new();
        kb.key_down(Key::Fire);
        assert!(kb.consume_press(Key::Fire));
        assert!(!kb.consume_press(Key::Fire));
        assert!(kb.is_pressed(Key::Fire));
    }

    #[test]
    fn test_release_rearms() {
        let mut kb = Keyboard::new();
        kb.key_down(Key::Pause);
        assert!(kb.consume_press(Key::Pause));
        kb.key_up(Key::Pause);
        assert!(!kb.is_memorized(Key::Pause));
        kb.key_down(Key::Pause);
        assert!(kb.consume_press(Key::Pause));
    }

    #[test]
    fn test_memorize_requires_held_key() {
        let mut kb = Keyboard::new();
        kb.memorize_press(Key::Restart);
        assert!(!kb.is_memorized(Key::Restart));
        assert!(!kb.consume_press(Key::Restart));
    }

    #[test]
    fn test_shared_keyboard_sees_host_events() {
        let host = SharedKeyboard::new();
        let mut sim = host.clone();
        host.key_down(Key::Thrust);
        assert!(sim.is_pressed(Key::Thrust));
        assert!(sim.consume_press(Key::Thrust));
        host.key_up(Key::Thrust);
        assert!(!sim.is_pressed(Key::Thrust));
    }
}
