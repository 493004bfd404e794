#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use sky_battle_core::{Census, Command, LevelStatus, SpawnPolicy};

const SPAWNING_STREAM: u64 = 1;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    maximum_y: f32,
}

impl Config {
    /// Creates a new configuration using the provided seed and entry band.
    ///
    /// New enemies receive a vertical position drawn from `[0, maximum_y)`.
    #[must_use]
    pub const fn new(rng_seed: u64, maximum_y: f32) -> Self {
        Self { rng_seed, maximum_y }
    }
}

/// Pure system that emits spawn commands at the start of every tick.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    maximum_y: f32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        rng.set_stream(SPAWNING_STREAM);
        Self {
            rng,
            maximum_y: config.maximum_y.max(0.0),
        }
    }

    /// Consumes the spawn policy and population census to emit spawn commands.
    ///
    /// Squadron levels run one trial per missing slot below the enemy cap.
    /// Boss levels request the boss once the enemy collection is empty.
    pub fn handle(
        &mut self,
        policy: &SpawnPolicy,
        status: LevelStatus,
        census: Census,
        out: &mut Vec<Command>,
    ) {
        if !status.is_running() {
            return;
        }

        match *policy {
            SpawnPolicy::Squadron {
                max_enemies,
                spawn_probability,
            } => {
                let missing = max_enemies.saturating_sub(census.enemies);
                for _ in 0..missing {
                    if self.rng.gen_bool(spawn_probability.get()) {
                        let y = self.rng.gen::<f32>() * self.maximum_y;
                        out.push(Command::SpawnEnemy { y });
                    }
                }
            }
            SpawnPolicy::Boss => {
                if census.enemies == 0 && !census.boss_spawned {
                    out.push(Command::SpawnBoss);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_battle_core::Probability;

    #[test]
    fn full_squadron_requests_nothing() {
        let mut spawning = Spawning::new(Config::new(1, 600.0));
        let policy = SpawnPolicy::Squadron {
            max_enemies: 3,
            spawn_probability: Probability::ALWAYS,
        };
        let mut commands = Vec::new();
        spawning.handle(
            &policy,
            LevelStatus::Running,
            Census {
                enemies: 5,
                boss_spawned: false,
            },
            &mut commands,
        );
        assert!(commands.is_empty());
    }
}
