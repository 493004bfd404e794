//! Gameplay tuning shared by the world, the systems, and the adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Point, Size};

/// Errors raised when tuning values fall outside their valid domain.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TuningError {
    /// A probability was not a finite value within `[0, 1]`.
    #[error("probability must lie within [0, 1] (received {value})")]
    InvalidProbability {
        /// Value that failed validation.
        value: f64,
    },
    /// A dimension or distance that must be positive was not.
    #[error("{field} must be positive (received {value})")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f64,
    },
    /// A counter that must be non-zero was zero.
    #[error("{field} must be non-zero")]
    Zero {
        /// Dotted path of the offending field.
        field: &'static str,
    },
    /// An integer fell outside its permitted range.
    #[error("{field} must lie within [{min}, {max}] (received {value})")]
    OutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: i64,
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
}

/// Chance of a Bernoulli trial succeeding.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Trial that never succeeds.
    pub const NEVER: Self = Self(0.0);
    /// Trial that always succeeds.
    pub const ALWAYS: Self = Self(1.0);

    /// Creates a probability, rejecting values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, TuningError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TuningError::InvalidProbability { value })
        }
    }

    /// Creates a probability from a value known to be valid at compile time.
    ///
    /// Callers must pass a value within `[0, 1]`.
    #[must_use]
    pub const fn from_const(value: f64) -> Self {
        Self(value)
    }

    /// Retrieves the underlying chance.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = TuningError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(value: Probability) -> Self {
        value.0
    }
}

/// Complete set of gameplay constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed interval between ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Playfield dimensions.
    pub screen: ScreenTuning,
    /// Player plane handling.
    pub player: PlayerTuning,
    /// Enemy fighter behaviour.
    pub enemy: EnemyTuning,
    /// Boss behaviour.
    pub boss: BossTuning,
    /// Projectile speeds.
    pub projectiles: ProjectileTuning,
    /// Power-up behaviour.
    pub power_up: PowerUpTuning,
    /// Bounding sizes of every actor kind.
    pub dimensions: Dimensions,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            screen: ScreenTuning::default(),
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            boss: BossTuning::default(),
            projectiles: ProjectileTuning::default(),
            power_up: PowerUpTuning::default(),
            dimensions: Dimensions::default(),
        }
    }
}

impl Tuning {
    /// Fixed interval between ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Verifies that every value lies within its valid domain.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.tick_interval_ms == 0 {
            return Err(TuningError::Zero {
                field: "tick_interval_ms",
            });
        }
        positive("screen.width", self.screen.width)?;
        positive("screen.height", self.screen.height)?;
        if self.enemy.health == 0 {
            return Err(TuningError::Zero {
                field: "enemy.health",
            });
        }
        if self.boss.health == 0 {
            return Err(TuningError::Zero {
                field: "boss.health",
            });
        }
        if self.boss.moves_per_cycle == 0 {
            return Err(TuningError::Zero {
                field: "boss.moves_per_cycle",
            });
        }
        within(
            "boss.moves_per_cycle",
            i64::from(self.boss.moves_per_cycle),
            1,
            i64::from(BossTuning::MAX_MOVES_PER_CYCLE),
        )?;
        within(
            "boss.vertical_velocity",
            i64::from(self.boss.vertical_velocity),
            0,
            i64::from(i32::MAX),
        )?;
        if self.boss.frames_per_move == 0 {
            return Err(TuningError::Zero {
                field: "boss.frames_per_move",
            });
        }
        if self.boss.shield_duration == 0 {
            return Err(TuningError::Zero {
                field: "boss.shield_duration",
            });
        }
        self.dimensions.validate()
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive {
            field,
            value: f64::from(value),
        })
    }
}

fn within(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), TuningError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// Playfield dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenTuning {
    /// Width of the playfield in screen units.
    pub width: f32,
    /// Height of the playfield in screen units.
    pub height: f32,
    /// Band at the bottom of the playfield in which enemies never enter.
    pub spawn_margin: f32,
}

impl ScreenTuning {
    /// Largest vertical layout position assigned to a new enemy.
    #[must_use]
    pub fn enemy_maximum_y(&self) -> f32 {
        (self.height - self.spawn_margin).max(0.0)
    }
}

impl Default for ScreenTuning {
    fn default() -> Self {
        Self {
            width: 1300.0,
            height: 750.0,
            spawn_margin: 150.0,
        }
    }
}

/// Player plane handling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Layout position of the plane when a level starts.
    pub origin: Point,
    /// Distance covered per tick while moving vertically.
    pub vertical_velocity: f32,
    /// Smallest permitted vertical position.
    pub upper_bound: f32,
    /// Largest permitted vertical position.
    pub lower_bound: f32,
    /// Horizontal position of freshly fired projectiles.
    pub projectile_x: f32,
    /// Vertical offset of freshly fired projectiles.
    pub projectile_offset_y: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            origin: Point::new(5.0, 300.0),
            vertical_velocity: 8.0,
            upper_bound: -40.0,
            lower_bound: 600.0,
            projectile_x: 110.0,
            projectile_offset_y: 20.0,
        }
    }
}

/// Enemy fighter behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Horizontal distance covered per tick.
    pub horizontal_velocity: f32,
    /// Hits an enemy absorbs before it is destroyed.
    pub health: u32,
    /// Chance of firing on a given tick.
    pub fire_probability: Probability,
    /// Offset of fired projectiles relative to the enemy's position.
    pub projectile_offset: Point,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            horizontal_velocity: -5.0,
            health: 1,
            fire_probability: Probability::from_const(0.01),
            projectile_offset: Point::new(-100.0, 50.0),
        }
    }
}

/// Boss behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Layout position of the boss when it enters.
    pub origin: Point,
    /// Hits the boss absorbs before it is destroyed.
    pub health: u32,
    /// Magnitude of a single vertical move.
    pub vertical_velocity: i32,
    /// Number of up and down moves in a single pattern.
    pub moves_per_cycle: u32,
    /// Consecutive frames spent on a pattern entry.
    pub frames_per_move: u32,
    /// Smallest permitted vertical position.
    pub upper_bound: f32,
    /// Largest permitted vertical position.
    pub lower_bound: f32,
    /// Chance of firing on a given tick.
    pub fire_probability: Probability,
    /// Horizontal position of fired projectiles.
    pub projectile_x: f32,
    /// Vertical offset of fired projectiles.
    pub projectile_offset_y: f32,
    /// Chance of raising the shield on an unshielded tick.
    pub shield_probability: Probability,
    /// Ticks the shield stays raised once activated.
    pub shield_duration: u32,
}

impl BossTuning {
    /// Largest number of up and down moves accepted in a single pattern.
    pub const MAX_MOVES_PER_CYCLE: u32 = 1_000;
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            origin: Point::new(1000.0, 400.0),
            health: 10,
            vertical_velocity: 8,
            moves_per_cycle: 5,
            frames_per_move: 10,
            upper_bound: -100.0,
            lower_bound: 475.0,
            fire_probability: Probability::from_const(0.04),
            projectile_x: 950.0,
            projectile_offset_y: 75.0,
            shield_probability: Probability::from_const(0.002),
            shield_duration: 50,
        }
    }
}

/// Projectile speeds; positive values travel right.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Speed of projectiles fired by the player and followers.
    pub user_velocity: f32,
    /// Speed of projectiles fired by enemy fighters.
    pub enemy_velocity: f32,
    /// Speed of projectiles fired by the boss.
    pub boss_velocity: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            user_velocity: 30.0,
            enemy_velocity: -20.0,
            boss_velocity: -15.0,
        }
    }
}

/// Power-up behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    /// Layout position of a released power-up.
    pub origin: Point,
    /// Distance covered per tick while seeking the player.
    pub speed: f32,
    /// Offset from the player's position held by an attached follower.
    pub follow_offset: Point,
    /// Offset from the follower's position of projectiles it fires.
    pub fire_offset: Point,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            origin: Point::new(800.0, 300.0),
            speed: 8.0,
            follow_offset: Point::new(0.0, 50.0),
            fire_offset: Point::new(110.0, 0.0),
        }
    }
}

/// Bounding sizes of every actor kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    /// Player plane.
    pub user: Size,
    /// Enemy fighter.
    pub enemy: Size,
    /// Boss.
    pub boss: Size,
    /// Player projectile.
    pub user_projectile: Size,
    /// Enemy projectile.
    pub enemy_projectile: Size,
    /// Boss projectile.
    pub boss_projectile: Size,
    /// Seeking power-up.
    pub power_up: Size,
    /// Attached follower plane.
    pub follower: Size,
}

impl Dimensions {
    fn validate(&self) -> Result<(), TuningError> {
        let entries = [
            ("dimensions.user", self.user),
            ("dimensions.enemy", self.enemy),
            ("dimensions.boss", self.boss),
            ("dimensions.user_projectile", self.user_projectile),
            ("dimensions.enemy_projectile", self.enemy_projectile),
            ("dimensions.boss_projectile", self.boss_projectile),
            ("dimensions.power_up", self.power_up),
            ("dimensions.follower", self.follower),
        ];
        for (field, size) in entries {
            positive(field, size.width)?;
            positive(field, size.height)?;
        }
        Ok(())
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            user: Size::new(110.0, 50.0),
            enemy: Size::new(75.0, 30.0),
            boss: Size::new(250.0, 100.0),
            user_projectile: Size::new(30.0, 15.0),
            enemy_projectile: Size::new(40.0, 20.0),
            boss_projectile: Size::new(50.0, 50.0),
            power_up: Size::new(80.0, 80.0),
            follower: Size::new(200.0, 50.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BossTuning, Probability, Tuning, TuningError};

    #[test]
    fn probability_rejects_out_of_range_values() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert_eq!(
            Probability::new(1.5),
            Err(TuningError::InvalidProbability { value: 1.5 })
        );
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(f64::NAN).is_err());
    }

    #[test]
    fn default_tuning_is_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn zero_shield_duration_is_rejected() {
        let mut tuning = Tuning::default();
        tuning.boss.shield_duration = 0;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::Zero {
                field: "boss.shield_duration"
            })
        );
    }

    #[test]
    fn negative_boss_velocity_is_rejected() {
        let mut tuning = Tuning::default();
        tuning.boss.vertical_velocity = i32::MIN;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::OutOfRange {
                field: "boss.vertical_velocity",
                value: i64::from(i32::MIN),
                min: 0,
                max: i64::from(i32::MAX),
            })
        );

        tuning.boss.vertical_velocity = -8;
        assert!(tuning.validate().is_err());

        tuning.boss.vertical_velocity = i32::MAX;
        assert_eq!(tuning.validate(), Ok(()));
    }

    #[test]
    fn oversized_move_pattern_is_rejected() {
        let mut tuning = Tuning::default();
        tuning.boss.moves_per_cycle = u32::MAX;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::OutOfRange {
                field: "boss.moves_per_cycle",
                ..
            })
        ));

        tuning.boss.moves_per_cycle = BossTuning::MAX_MOVES_PER_CYCLE;
        assert_eq!(tuning.validate(), Ok(()));
    }

    #[test]
    fn collapsed_dimensions_are_rejected() {
        let mut tuning = Tuning::default();
        tuning.dimensions.boss.height = 0.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive {
                field: "dimensions.boss",
                ..
            })
        ));
    }

    #[test]
    fn enemy_spawn_band_excludes_the_bottom_margin() {
        let tuning = Tuning::default();
        assert_eq!(tuning.screen.enemy_maximum_y(), 600.0);
    }
}
