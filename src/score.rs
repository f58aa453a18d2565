//! Score keeping
//!
//! Scores live for the process lifetime only. The best score is folded in when a
//! run ends.

/// What the simulation reports score through
pub trait ScoreSink {
    fn add_score(&mut self, delta: u64);
    fn score(&self) -> u64;
    /// Best finished score, or the current score if that is higher
    fn best_score(&self) -> u64;
}

/// Current/best score plus the passive survival timer
#[derive(Debug, Clone)]
pub struct Scoreboard {
    score: u64,
    best: u64,
    /// Ticks until the next passive award
    timer: u32,
    /// Ticks between passive awards
    update_rate: u32,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(crate::consts::UPDATE_RATE)
    }
}

impl Scoreboard {
    pub fn new(update_rate: u32) -> Self {
        let update_rate = update_rate.max(1);
        Self {
            score: 0,
            best: 0,
            timer: update_rate,
            update_rate,
        }
    }

    /// Advance the passive timer by one tick.
    /// Returns true when a passive award is due.
    pub fn tick(&mut self) -> bool {
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.timer = self.update_rate;
            true
        } else {
            false
        }
    }

    /// Passive award for surviving one interval with `asteroid_count` rocks alive
    pub fn survival_bonus(asteroid_count: usize) -> u64 {
        1 + (asteroid_count / 5) as u64
    }

    /// End the current run: fold the score into best and start over
    pub fn reset(&mut self) {
        self.best = self.best.max(self.score);
        self.score = 0;
        self.timer = self.update_rate;
    }

    /// The current score beats every finished run
    pub fn is_record(&self) -> bool {
        self.score > self.best
    }
}

impl ScoreSink for Scoreboard {
    fn add_score(&mut self, delta: u64) {
        self.score = self.score.saturating_add(delta);
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn best_score(&self) -> u64 {
        self.best.max(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_every_interval() {
        let mut board = Scoreboard::new(60);
        let fired: Vec<u32> = (1..=180).filter(|_| board.tick()).collect();
        assert_eq!(fired.len(), 3);
    }

    #[test]
    fn test_survival_bonus() {
        assert_eq!(Scoreboard::survival_bonus(0), 1);
        assert_eq!(Scoreboard::survival_bonus(10), 3);
        assert_eq!(Scoreboard::survival_bonus(14), 3);
    }

    #[test]
    fn test_reset_keeps_best() {
        let mut board = Scoreboard::default();
        board.add_score(120);
        assert!(board.is_record());
        board.reset();
        assert_eq!(board.score(), 0);
        assert_eq!(board.best_score(), 120);
        board.add_score(50);
        assert!(!board.is_record());
        board.reset();
        assert_eq!(board.best_score(), 120);
    }
}
