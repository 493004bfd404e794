#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scripted behaviour of the level boss.
//!
//! The boss drifts vertically following a shuffled move pattern, fires with a
//! fixed per-tick chance, and periodically raises a shield that absorbs all
//! damage for a bounded number of ticks. Every random decision draws from the
//! caller-provided generator so that seeded runs replay identically.

use rand::{seq::SliceRandom, Rng};
use sky_battle_core::{BossTuning, Probability};

/// Change of shield state reported by [`BossBehavior::update_shield`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShieldChange {
    /// The shield was raised this tick.
    Raised,
    /// The shield expired this tick.
    Dropped,
}

/// Movement, firing, and shield state machine of the boss.
#[derive(Clone, Debug)]
pub struct BossBehavior {
    move_pattern: Vec<i32>,
    frames_per_move: u32,
    consecutive_moves: u32,
    index: usize,
    fire_probability: Probability,
    shield_probability: Probability,
    shield_duration: u32,
    shielded: bool,
    frames_with_shield: u32,
}

impl BossBehavior {
    /// Creates the behaviour with a freshly shuffled move pattern.
    ///
    /// The pattern holds `moves_per_cycle` copies each of an upward move, a
    /// downward move, and a pause. The cycle count is capped at
    /// [`BossTuning::MAX_MOVES_PER_CYCLE`].
    pub fn new<R: Rng + ?Sized>(tuning: &BossTuning, rng: &mut R) -> Self {
        let velocity = tuning.vertical_velocity.saturating_abs();
        let cycles = tuning.moves_per_cycle.min(BossTuning::MAX_MOVES_PER_CYCLE);
        let mut move_pattern = Vec::with_capacity(cycles as usize * 3);
        for _ in 0..cycles {
            move_pattern.push(velocity);
            move_pattern.push(-velocity);
            move_pattern.push(0);
        }
        move_pattern.shuffle(rng);

        Self {
            move_pattern,
            frames_per_move: tuning.frames_per_move.max(1),
            consecutive_moves: 0,
            index: 0,
            fire_probability: tuning.fire_probability,
            shield_probability: tuning.shield_probability,
            shield_duration: tuning.shield_duration.max(1),
            shielded: false,
            frames_with_shield: 0,
        }
    }

    /// Returns the vertical move for the current tick and advances the pattern.
    ///
    /// Each entry is held for `frames_per_move` consecutive ticks. Leaving an
    /// entry reshuffles the pattern and steps the index, wrapping at the end.
    pub fn next_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i32 {
        let Some(&current) = self.move_pattern.get(self.index) else {
            return 0;
        };

        self.consecutive_moves += 1;
        if self.consecutive_moves >= self.frames_per_move {
            self.move_pattern.shuffle(rng);
            self.consecutive_moves = 0;
            self.index += 1;
        }
        if self.index >= self.move_pattern.len() {
            self.index = 0;
        }
        current
    }

    /// Advances the shield state machine by a single tick.
    ///
    /// An active shield counts the ticks it has been up and drops once the
    /// count reaches the configured duration. An inactive shield is raised
    /// with the configured per-tick chance.
    pub fn update_shield<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ShieldChange> {
        if self.shielded {
            self.frames_with_shield += 1;
            if self.frames_with_shield >= self.shield_duration {
                self.shielded = false;
                self.frames_with_shield = 0;
                return Some(ShieldChange::Dropped);
            }
            None
        } else if rng.gen_bool(self.shield_probability.get()) {
            self.shielded = true;
            Some(ShieldChange::Raised)
        } else {
            None
        }
    }

    /// Decides whether the boss fires this tick.
    pub fn fires<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.fire_probability.get())
    }

    /// Reports whether the shield currently absorbs damage.
    #[must_use]
    pub const fn is_shielded(&self) -> bool {
        self.shielded
    }

    /// Ticks the active shield has been up.
    #[must_use]
    pub const fn frames_with_shield(&self) -> u32 {
        self.frames_with_shield
    }

    /// Current ordering of the move pattern.
    #[must_use]
    pub fn move_pattern(&self) -> &[i32] {
        &self.move_pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    fn sorted(values: &[i32]) -> Vec<i32> {
        let mut values = values.to_vec();
        values.sort_unstable();
        values
    }

    #[test]
    fn pattern_contains_balanced_moves() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let boss = BossBehavior::new(&BossTuning::default(), &mut rng);
        let pattern = sorted(boss.move_pattern());
        assert_eq!(pattern.len(), 15);
        assert_eq!(pattern.iter().filter(|&&step| step == 8).count(), 5);
        assert_eq!(pattern.iter().filter(|&&step| step == -8).count(), 5);
        assert_eq!(pattern.iter().filter(|&&step| step == 0).count(), 5);
    }

    #[test]
    fn zero_frames_per_move_still_advances() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tuning = BossTuning {
            frames_per_move: 0,
            ..BossTuning::default()
        };
        let mut boss = BossBehavior::new(&tuning, &mut rng);
        let original = sorted(boss.move_pattern());
        for _ in 0..40 {
            let _ = boss.next_move(&mut rng);
        }
        assert_eq!(sorted(boss.move_pattern()), original);
    }

    #[test]
    fn unvalidated_extremes_build_a_bounded_pattern() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let tuning = BossTuning {
            vertical_velocity: i32::MIN,
            moves_per_cycle: u32::MAX,
            ..BossTuning::default()
        };
        let boss = BossBehavior::new(&tuning, &mut rng);
        let pattern = boss.move_pattern();
        assert_eq!(pattern.len(), BossTuning::MAX_MOVES_PER_CYCLE as usize * 3);
        assert!(pattern.iter().all(|&step| step == 0 || step.abs() == i32::MAX));
    }

    #[test]
    fn shield_duration_is_clamped_to_a_single_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let tuning = BossTuning {
            shield_probability: Probability::ALWAYS,
            shield_duration: 0,
            ..BossTuning::default()
        };
        let mut boss = BossBehavior::new(&tuning, &mut rng);
        assert_eq!(boss.update_shield(&mut rng), Some(ShieldChange::Raised));
        assert_eq!(boss.update_shield(&mut rng), Some(ShieldChange::Dropped));
    }
}
