#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Sky Battle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative level world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that displays and the campaign navigator react to. Systems consume
//! immutable snapshots such as [`ActorView`] and respond exclusively with new
//! command batches.

use std::fmt;

use serde::{Deserialize, Serialize};

mod tuning;

pub use tuning::{
    BossTuning, Dimensions, EnemyTuning, PlayerTuning, PowerUpTuning, Probability,
    ProjectileTuning, ScreenTuning, Tuning, TuningError,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Sky Battle.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Runs a single fixed-interval tick of the level pipeline.
    Tick,
    /// Starts moving the user plane upwards.
    MoveUp,
    /// Starts moving the user plane downwards.
    MoveDown,
    /// Halts vertical movement of the user plane.
    StopVertical,
    /// Fires a user projectile, together with every attached follower.
    Fire,
    /// Requests that an enemy plane enter at the right screen edge.
    SpawnEnemy {
        /// Vertical layout position assigned to the new enemy.
        y: f32,
    },
    /// Requests that the level boss enter the fight.
    SpawnBoss,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the level pipeline completed a tick.
    TimeAdvanced {
        /// Zero-based index of the tick that completed.
        tick: u64,
    },
    /// Confirms that a new plane or power-up entered the level.
    ActorSpawned {
        /// Identifier assigned to the new actor.
        actor: ActorId,
        /// Kind of actor that was spawned.
        kind: ActorKind,
    },
    /// Confirms that a projectile was released.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ActorId,
        /// Kind of projectile that was released.
        kind: ActorKind,
        /// Actor responsible for the shot.
        source: ActorId,
    },
    /// Reports that an enemy slipped past the player's defence.
    EnemyPenetrated {
        /// Identifier of the enemy that breached the defence.
        enemy: ActorId,
    },
    /// Confirms that a destroyed or expired actor left every collection.
    ActorRemoved {
        /// Identifier of the removed actor.
        actor: ActorId,
        /// Kind of the removed actor.
        kind: ActorKind,
    },
    /// Reports that a seeking power-up reached the player and now escorts it.
    FollowerAttached {
        /// Identifier of the power-up that became a follower plane.
        follower: ActorId,
    },
    /// Reports that the boss raised or dropped its shield.
    BossShieldChanged {
        /// Whether the shield is active after the change.
        active: bool,
    },
    /// Pushes the player's remaining hearts to the display.
    HealthChanged {
        /// Hearts remaining after the change.
        remaining: u32,
    },
    /// Pushes the kill counter and its target to the display.
    KillProgressChanged {
        /// Enemies removed from play so far.
        kills: u32,
        /// Number of kills required to clear the level.
        target: u32,
    },
    /// Pushes the boss's remaining health to the display.
    BossHealthChanged {
        /// Health remaining after the change.
        health: u32,
    },
    /// Announces that the player plane was destroyed.
    PlayerDefeated,
    /// Announces that the level objective was met and names the next level.
    LevelCleared {
        /// Level the navigator should load next.
        next: LevelId,
    },
    /// Announces that the boss was destroyed.
    BossDefeated,
}

/// Outcome of a tick reported to the external navigator.
///
/// A terminal variant is produced exactly once, on the tick that enters the
/// terminal state. Every later call yields [`LevelTransition::None`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelTransition {
    /// The level keeps running or has already halted.
    None,
    /// The player plane was destroyed.
    PlayerDefeated,
    /// The kill objective was met; the navigator should load `next`.
    LevelCleared {
        /// Level that follows the cleared one.
        next: LevelId,
    },
    /// The boss was destroyed.
    BossDefeated,
}

impl LevelTransition {
    /// Reports whether the transition ends the current level.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Lifecycle state of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelStatus {
    /// The fixed-tick loop is active.
    Running,
    /// The objective was met; the loop is halted and input disabled.
    Won,
    /// The player was destroyed; the loop is halted and input disabled.
    Lost,
}

impl LevelStatus {
    /// Reports whether the level still accepts ticks and input.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Unique identifier assigned to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a level within a campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.0)
    }
}

/// Every kind of entity that can appear within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// The player-controlled plane.
    UserPlane,
    /// A drifting enemy fighter.
    EnemyPlane,
    /// The scripted, shielded boss.
    Boss,
    /// A projectile fired by the player or a follower.
    UserProjectile,
    /// A projectile fired by an enemy fighter.
    EnemyProjectile,
    /// A projectile fired by the boss.
    BossProjectile,
    /// A power-up still seeking the player.
    PowerUp,
    /// A power-up that attached itself to the player.
    Follower,
}

impl ActorKind {
    /// Reports whether the kind is a projectile.
    #[must_use]
    pub const fn is_projectile(self) -> bool {
        matches!(
            self,
            Self::UserProjectile | Self::EnemyProjectile | Self::BossProjectile
        )
    }

    /// Reports whether the kind is a fighter plane carrying health.
    #[must_use]
    pub const fn is_fighter(self) -> bool {
        matches!(self, Self::UserPlane | Self::EnemyPlane | Self::Boss)
    }
}

/// Location expressed in screen units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate; grows to the right.
    pub x: f32,
    /// Vertical coordinate; grows downwards.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the point shifted by the provided offset.
    #[must_use]
    pub fn offset(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// Width and height of an actor's bounding rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent in screen units.
    pub width: f32,
    /// Vertical extent in screen units.
    pub height: f32,
}

impl Size {
    /// Creates a new size descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding rectangle used for collision detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    origin: Point,
    size: Size,
}

impl Bounds {
    /// Constructs a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Dimensions of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Smallest horizontal coordinate covered by the rectangle.
    #[must_use]
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    /// Largest horizontal coordinate covered by the rectangle.
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Smallest vertical coordinate covered by the rectangle.
    #[must_use]
    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    /// Largest vertical coordinate covered by the rectangle.
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width * 0.5,
            self.origin.y + self.size.height * 0.5,
        )
    }

    /// Reports whether two rectangles overlap. Touching edges count as contact.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x() <= other.max_x()
            && other.min_x() <= self.max_x()
            && self.min_y() <= other.max_y()
            && other.min_y() <= self.max_y()
    }

    /// Reports whether the rectangle lies entirely outside `[0, width]` horizontally.
    #[must_use]
    pub fn is_beyond_horizontal_range(&self, width: f32) -> bool {
        self.max_x() < 0.0 || self.min_x() > width
    }
}

/// Immutable representation of a single actor used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorSnapshot {
    /// Unique identifier assigned to the actor.
    pub id: ActorId,
    /// Kind of the actor.
    pub kind: ActorKind,
    /// Bounding rectangle in absolute screen coordinates.
    pub bounds: Bounds,
    /// Remaining health for fighters; `None` for projectiles and power-ups.
    pub health: Option<u32>,
    /// Whether the actor is destroyed and awaiting removal.
    pub destroyed: bool,
}

/// Read-only snapshot describing a group of actors.
#[derive(Clone, Debug, Default)]
pub struct ActorView {
    snapshots: Vec<ActorSnapshot>,
}

impl ActorView {
    /// Creates a new actor view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ActorSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ActorSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ActorSnapshot> {
        self.snapshots
    }
}

/// Values pushed to the heads-up display widgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudSnapshot {
    /// Hearts the player has left.
    pub health: u32,
    /// Enemies removed from play so far.
    pub kills: u32,
    /// Kill objective of the level, if it has one.
    pub kill_target: Option<u32>,
    /// Health of the boss once it entered the fight.
    pub boss_health: Option<u32>,
    /// Whether the boss shield is currently raised.
    pub boss_shielded: bool,
}

/// Population counts consumed by the spawning system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Census {
    /// Enemy planes and bosses currently in play.
    pub enemies: u32,
    /// Whether the boss has entered the level at some point.
    pub boss_spawned: bool,
}

/// Goal that ends a level in victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    /// Remove `kills` enemies from play, then advance to `next`.
    KillTarget {
        /// Kills required to clear the level.
        kills: u32,
        /// Level the navigator loads after the clear.
        next: LevelId,
    },
    /// Destroy the boss.
    DefeatBoss,
}

/// Policy the spawning system follows at the start of every tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Each missing slot below `max_enemies` is refilled with the given probability.
    Squadron {
        /// Maximum number of simultaneous enemy planes.
        max_enemies: u32,
        /// Chance of refilling a single missing slot on a given tick.
        spawn_probability: Probability,
    },
    /// The boss enters once the enemy collection is empty.
    Boss,
}

/// Static description of a single level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Identifier of the level within its campaign.
    pub id: LevelId,
    /// Hearts the player starts the level with.
    pub player_health: u32,
    /// Goal that ends the level in victory.
    pub objective: Objective,
    /// Spawn behaviour applied every tick.
    pub spawn: SpawnPolicy,
    /// Number of power-ups released when the level starts.
    #[serde(default)]
    pub power_ups: u32,
}

impl LevelDefinition {
    /// Creates a level that must be cleared by reaching a kill target.
    #[must_use]
    pub const fn squadron(
        id: LevelId,
        player_health: u32,
        max_enemies: u32,
        spawn_probability: Probability,
        kills: u32,
        next: LevelId,
    ) -> Self {
        Self {
            id,
            player_health,
            objective: Objective::KillTarget { kills, next },
            spawn: SpawnPolicy::Squadron {
                max_enemies,
                spawn_probability,
            },
            power_ups: 0,
        }
    }

    /// Creates a level that ends once the boss is destroyed.
    #[must_use]
    pub const fn boss_fight(id: LevelId, player_health: u32, power_ups: u32) -> Self {
        Self {
            id,
            player_health,
            objective: Objective::DefeatBoss,
            spawn: SpawnPolicy::Boss,
            power_ups,
        }
    }

    /// Kill target of the level, if its objective is kill based.
    #[must_use]
    pub const fn kill_target(&self) -> Option<u32> {
        match self.objective {
            Objective::KillTarget { kills, .. } => Some(kills),
            Objective::DefeatBoss => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ActorId, ActorKind, Bounds, LevelId, LevelTransition, Point, Size};
    use serde::{de::DeserializeOwned, Serialize};

    fn bounds(x: f32, y: f32, width: f32, height: f32) -> Bounds {
        Bounds::from_origin_and_size(Point::new(x, y), Size::new(width, height))
    }

    #[test]
    fn overlapping_bounds_intersect_symmetrically() {
        let first = bounds(0.0, 0.0, 10.0, 10.0);
        let second = bounds(5.0, 5.0, 10.0, 10.0);
        assert!(first.intersects(&second));
        assert!(second.intersects(&first));
    }

    #[test]
    fn touching_edges_count_as_contact() {
        let first = bounds(0.0, 0.0, 10.0, 10.0);
        let second = bounds(10.0, 0.0, 5.0, 5.0);
        assert!(first.intersects(&second));
    }

    #[test]
    fn separated_bounds_do_not_intersect() {
        let first = bounds(0.0, 0.0, 10.0, 10.0);
        assert!(!first.intersects(&bounds(10.5, 0.0, 5.0, 5.0)));
        assert!(!first.intersects(&bounds(0.0, -6.0, 5.0, 5.0)));
    }

    #[test]
    fn horizontal_range_check_requires_full_exit() {
        let width = 100.0;
        assert!(!bounds(95.0, 0.0, 10.0, 10.0).is_beyond_horizontal_range(width));
        assert!(bounds(100.5, 0.0, 10.0, 10.0).is_beyond_horizontal_range(width));
        assert!(bounds(-20.0, 0.0, 10.0, 10.0).is_beyond_horizontal_range(width));
    }

    #[test]
    fn only_terminal_transitions_report_terminal() {
        assert!(!LevelTransition::None.is_terminal());
        assert!(LevelTransition::PlayerDefeated.is_terminal());
        assert!(LevelTransition::BossDefeated.is_terminal());
        assert!(LevelTransition::LevelCleared {
            next: LevelId::new(2)
        }
        .is_terminal());
    }

    #[test]
    fn projectile_and_fighter_kinds_are_disjoint() {
        let kinds = [
            ActorKind::UserPlane,
            ActorKind::EnemyPlane,
            ActorKind::Boss,
            ActorKind::UserProjectile,
            ActorKind::EnemyProjectile,
            ActorKind::BossProjectile,
            ActorKind::PowerUp,
            ActorKind::Follower,
        ];
        for kind in kinds {
            assert!(!(kind.is_projectile() && kind.is_fighter()), "{kind:?}");
        }
        assert!(!ActorKind::Follower.is_fighter());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&ActorId::new(42));
        assert_round_trip(&LevelId::new(2));
        assert_round_trip(&ActorKind::BossProjectile);
    }

    #[test]
    fn level_id_display_names_the_level() {
        assert_eq!(LevelId::new(2).to_string(), "level 2");
    }
}
