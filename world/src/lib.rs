#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Sky Battle.
//!
//! The world owns the player plane, the enemy units, both projectile
//! collections, and any power-ups of the active level. It mutates exclusively
//! through [`apply`], which executes a [`Command`], appends the resulting
//! [`Event`] values, and reports the level transition produced by a tick.

mod actor;
mod power_up;

use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use sky_battle_core::{
    ActorId, ActorKind, ActorSnapshot, Command, Event, HudSnapshot, LevelDefinition,
    LevelStatus, LevelTransition, Objective, Tuning, WELCOME_BANNER,
};
use sky_battle_system_boss::ShieldChange;
use sky_battle_system_collision::{Collisions, Contact};
use tracing::{debug, info, warn};

use crate::{
    actor::{Actor, Damageable, Launch, Movable, Shooter, VerticalIntent},
    power_up::PowerUp,
};

/// Actor collections that take part in collision resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Group {
    Friendly,
    EnemyUnits,
    UserProjectiles,
    EnemyProjectiles,
}

/// Represents the authoritative state of a single level.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    level: LevelDefinition,
    tuning: Tuning,
    rng: ChaCha8Rng,
    status: LevelStatus,
    next_actor_id: u32,
    user: Actor,
    power_ups: Vec<PowerUp>,
    enemy_units: Vec<Actor>,
    user_projectiles: Vec<Actor>,
    enemy_projectiles: Vec<Actor>,
    kills: u32,
    boss_spawned: bool,
    tick_index: u64,
    collisions: Collisions,
    contacts: Vec<Contact>,
    pushed_hud: HudSnapshot,
}

impl World {
    /// Creates a level world seeded with the provided value.
    ///
    /// The player plane and the level's power-ups exist immediately; enemies
    /// only enter through spawn commands.
    #[must_use]
    pub fn new(level: LevelDefinition, tuning: Tuning, seed: u64) -> Self {
        let user = Actor::user(ActorId::new(0), level.player_health, &tuning);
        let mut world = Self {
            banner: WELCOME_BANNER,
            level,
            rng: ChaCha8Rng::seed_from_u64(seed),
            status: LevelStatus::Running,
            next_actor_id: 1,
            user,
            power_ups: Vec::new(),
            enemy_units: Vec::new(),
            user_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            kills: 0,
            boss_spawned: false,
            tick_index: 0,
            collisions: Collisions::new(),
            contacts: Vec::new(),
            pushed_hud: HudSnapshot {
                health: level.player_health,
                kills: 0,
                kill_target: level.kill_target(),
                boss_health: None,
                boss_shielded: false,
            },
            tuning,
        };

        for _ in 0..level.power_ups {
            let id = world.allocate_id();
            world.power_ups.push(PowerUp::new(
                id,
                &world.tuning.power_up,
                world.tuning.dimensions.power_up,
            ));
        }
        world
    }

    fn allocate_id(&mut self) -> ActorId {
        let id = ActorId::new(self.next_actor_id);
        self.next_actor_id = self.next_actor_id.saturating_add(1);
        id
    }

    fn boss(&self) -> Option<&Actor> {
        self.enemy_units
            .iter()
            .find(|actor| actor.kind() == ActorKind::Boss)
    }

    fn hud(&self) -> HudSnapshot {
        let boss = self.boss();
        HudSnapshot {
            health: self.user.health().unwrap_or(0),
            kills: self.kills,
            kill_target: self.level.kill_target(),
            boss_health: self
                .boss_spawned
                .then(|| boss.and_then(Actor::health).unwrap_or(0)),
            boss_shielded: boss.is_some_and(Actor::is_shielded),
        }
    }

    fn steer(&mut self, intent: VerticalIntent) {
        if self.status.is_running() {
            self.user.steer(intent);
        }
    }

    fn spawn_projectile(&mut self, source: ActorId, launch: Launch, out_events: &mut Vec<Event>) {
        let id = self.allocate_id();
        let projectile = Actor::projectile(id, launch, &self.tuning);
        out_events.push(Event::ProjectileFired {
            projectile: id,
            kind: launch.kind,
            source,
        });
        if launch.kind == ActorKind::UserProjectile {
            self.user_projectiles.push(projectile);
        } else {
            self.enemy_projectiles.push(projectile);
        }
    }

    fn fire_user_projectiles(&mut self, out_events: &mut Vec<Event>) {
        if !self.status.is_running() || self.user.is_destroyed() {
            return;
        }

        let mut launches = Vec::with_capacity(self.power_ups.len() + 1);
        for follower in &mut self.power_ups {
            if let Some(launch) = follower.fire_projectile(&mut self.rng) {
                launches.push((follower.id(), launch));
            }
        }
        if let Some(launch) = self.user.fire_projectile(&mut self.rng) {
            launches.push((self.user.id(), launch));
        }

        for (source, launch) in launches {
            self.spawn_projectile(source, launch, out_events);
        }
    }

    fn spawn_enemy(&mut self, y: f32, out_events: &mut Vec<Event>) {
        if !self.status.is_running() {
            return;
        }
        if !y.is_finite() {
            warn!(y, "ignoring enemy spawn at non-finite position");
            return;
        }

        let id = self.allocate_id();
        self.enemy_units.push(Actor::enemy(id, y, &self.tuning));
        debug!(actor = id.get(), y, "enemy entered");
        out_events.push(Event::ActorSpawned {
            actor: id,
            kind: ActorKind::EnemyPlane,
        });
    }

    fn spawn_boss(&mut self, out_events: &mut Vec<Event>) {
        if !self.status.is_running() || self.boss_spawned {
            return;
        }

        let id = self.allocate_id();
        let boss = Actor::boss(id, &self.tuning, &mut self.rng);
        self.enemy_units.push(boss);
        self.boss_spawned = true;
        info!(actor = id.get(), level = %self.level.id, "boss entered");
        out_events.push(Event::ActorSpawned {
            actor: id,
            kind: ActorKind::Boss,
        });
    }

    fn run_tick(&mut self, out_events: &mut Vec<Event>) -> LevelTransition {
        if !self.status.is_running() {
            return LevelTransition::None;
        }

        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });
        self.tick_index = self.tick_index.saturating_add(1);

        self.update_actors(out_events);
        self.generate_enemy_fire(out_events);
        let enemies_before = self.enemy_units.len();
        self.handle_enemy_penetration(out_events);
        self.handle_collisions(Group::UserProjectiles, Group::EnemyUnits);
        self.handle_collisions(Group::EnemyProjectiles, Group::Friendly);
        self.handle_collisions(Group::Friendly, Group::EnemyUnits);
        self.remove_destroyed_actors(out_events);
        self.update_kill_count(enemies_before);
        self.push_hud(out_events);
        self.evaluate_terminal(out_events)
    }

    fn update_actors(&mut self, out_events: &mut Vec<Event>) {
        let _ = self.user.update_actor(&mut self.rng);

        let leader = self.user.position();
        let leader_bounds = self.user.bounds();
        let follower_size = self.tuning.dimensions.follower;
        for power_up in &mut self.power_ups {
            if power_up.is_attached() {
                power_up.follow(leader);
            } else if power_up.seek(leader, &leader_bounds, follower_size) {
                debug!(actor = power_up.id().get(), "power-up attached");
                out_events.push(Event::FollowerAttached {
                    follower: power_up.id(),
                });
            }
        }

        for enemy in &mut self.enemy_units {
            if let Some(change) = enemy.update_actor(&mut self.rng) {
                let active = change == ShieldChange::Raised;
                debug!(actor = enemy.id().get(), active, "boss shield changed");
                out_events.push(Event::BossShieldChanged { active });
            }
        }
        for projectile in self
            .user_projectiles
            .iter_mut()
            .chain(self.enemy_projectiles.iter_mut())
        {
            let _ = projectile.update_actor(&mut self.rng);
        }
    }

    fn generate_enemy_fire(&mut self, out_events: &mut Vec<Event>) {
        let mut launches = Vec::new();
        for enemy in &mut self.enemy_units {
            if let Some(launch) = enemy.fire_projectile(&mut self.rng) {
                launches.push((enemy.id(), launch));
            }
        }
        for (source, launch) in launches {
            self.spawn_projectile(source, launch, out_events);
        }
    }

    fn handle_enemy_penetration(&mut self, out_events: &mut Vec<Event>) {
        let width = self.tuning.screen.width;
        for enemy in &mut self.enemy_units {
            if !enemy.is_destroyed() && enemy.has_penetrated(width) {
                self.user.take_damage();
                enemy.destroy();
                debug!(actor = enemy.id().get(), "enemy penetrated the defence");
                out_events.push(Event::EnemyPenetrated { enemy: enemy.id() });
            }
        }
    }

    fn group(&self, group: Group) -> &[Actor] {
        match group {
            Group::Friendly => std::slice::from_ref(&self.user),
            Group::EnemyUnits => &self.enemy_units,
            Group::UserProjectiles => &self.user_projectiles,
            Group::EnemyProjectiles => &self.enemy_projectiles,
        }
    }

    fn group_mut(&mut self, group: Group) -> &mut [Actor] {
        match group {
            Group::Friendly => std::slice::from_mut(&mut self.user),
            Group::EnemyUnits => &mut self.enemy_units,
            Group::UserProjectiles => &mut self.user_projectiles,
            Group::EnemyProjectiles => &mut self.enemy_projectiles,
        }
    }

    fn damage(&mut self, group: Group, id: ActorId) {
        if let Some(actor) = self
            .group_mut(group)
            .iter_mut()
            .find(|actor| actor.id() == id)
        {
            actor.take_damage();
        }
    }

    /// Applies one hit to both members of every intersecting pair.
    fn handle_collisions(&mut self, first: Group, second: Group) {
        let first_snapshots: Vec<ActorSnapshot> =
            self.group(first).iter().map(Actor::snapshot).collect();
        let second_snapshots: Vec<ActorSnapshot> =
            self.group(second).iter().map(Actor::snapshot).collect();

        let mut contacts = std::mem::take(&mut self.contacts);
        contacts.clear();
        self.collisions
            .detect(&first_snapshots, &second_snapshots, &mut contacts);
        for contact in &contacts {
            self.damage(second, contact.second);
            self.damage(first, contact.first);
        }
        self.contacts = contacts;
    }

    fn remove_destroyed_actors(&mut self, out_events: &mut Vec<Event>) {
        let width = self.tuning.screen.width;
        purge(&mut self.enemy_units, None, out_events);
        purge(&mut self.user_projectiles, Some(width), out_events);
        purge(&mut self.enemy_projectiles, Some(width), out_events);
    }

    fn update_kill_count(&mut self, enemies_before: usize) {
        let removed = enemies_before.saturating_sub(self.enemy_units.len());
        let removed = u32::try_from(removed).unwrap_or(u32::MAX);
        self.kills = self.kills.saturating_add(removed);
    }

    fn push_hud(&mut self, out_events: &mut Vec<Event>) {
        let hud = self.hud();
        if hud.health != self.pushed_hud.health {
            out_events.push(Event::HealthChanged {
                remaining: hud.health,
            });
        }
        if let Some(target) = hud.kill_target {
            if hud.kills != self.pushed_hud.kills {
                out_events.push(Event::KillProgressChanged {
                    kills: hud.kills,
                    target,
                });
            }
        }
        if let Some(health) = hud.boss_health {
            if hud.boss_health != self.pushed_hud.boss_health {
                out_events.push(Event::BossHealthChanged { health });
            }
        }
        self.pushed_hud = hud;
    }

    fn evaluate_terminal(&mut self, out_events: &mut Vec<Event>) -> LevelTransition {
        let transition = if self.user.is_destroyed() {
            self.status = LevelStatus::Lost;
            out_events.push(Event::PlayerDefeated);
            LevelTransition::PlayerDefeated
        } else {
            match self.level.objective {
                Objective::KillTarget { kills, next } if self.kills >= kills => {
                    self.status = LevelStatus::Won;
                    out_events.push(Event::LevelCleared { next });
                    LevelTransition::LevelCleared { next }
                }
                Objective::DefeatBoss if self.boss_spawned && self.boss().is_none() => {
                    self.status = LevelStatus::Won;
                    out_events.push(Event::BossDefeated);
                    LevelTransition::BossDefeated
                }
                _ => LevelTransition::None,
            }
        };

        if transition.is_terminal() {
            self.user.steer(VerticalIntent::Idle);
            info!(
                level = %self.level.id,
                tick = self.tick_index,
                kills = self.kills,
                ?transition,
                "level finished"
            );
        }
        transition
    }
}

/// Drops destroyed actors and, when `width` is given, actors that left the screen.
fn purge(actors: &mut Vec<Actor>, width: Option<f32>, out_events: &mut Vec<Event>) {
    actors.retain(|actor| {
        let expired = width.is_some_and(|width| actor.bounds().is_beyond_horizontal_range(width));
        if actor.is_destroyed() || expired {
            out_events.push(Event::ActorRemoved {
                actor: actor.id(),
                kind: actor.kind(),
            });
            false
        } else {
            true
        }
    });
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Only [`Command::Tick`] can end the level; every other command yields
/// [`LevelTransition::None`]. Commands other than ticks are ignored once the
/// level reached a terminal state.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) -> LevelTransition {
    match command {
        Command::Tick => return world.run_tick(out_events),
        Command::MoveUp => world.steer(VerticalIntent::Up),
        Command::MoveDown => world.steer(VerticalIntent::Down),
        Command::StopVertical => world.steer(VerticalIntent::Idle),
        Command::Fire => world.fire_user_projectiles(out_events),
        Command::SpawnEnemy { y } => world.spawn_enemy(y, out_events),
        Command::SpawnBoss => world.spawn_boss(out_events),
    }
    LevelTransition::None
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use sky_battle_core::{
        ActorKind, ActorSnapshot, ActorView, Census, HudSnapshot, LevelDefinition, LevelStatus,
        Tuning,
    };

    use super::{Actor, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Lifecycle state of the level.
    #[must_use]
    pub fn status(world: &World) -> LevelStatus {
        world.status
    }

    /// Definition the level was created from.
    #[must_use]
    pub fn level(world: &World) -> &LevelDefinition {
        &world.level
    }

    /// Tuning the level runs with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Number of ticks executed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Enemies removed from play so far.
    #[must_use]
    pub fn kills(world: &World) -> u32 {
        world.kills
    }

    /// Values currently shown by the heads-up display.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        world.hud()
    }

    /// Snapshot of the player plane.
    #[must_use]
    pub fn user(world: &World) -> ActorSnapshot {
        world.user.snapshot()
    }

    /// Snapshot of the boss while it is in play.
    #[must_use]
    pub fn boss(world: &World) -> Option<ActorSnapshot> {
        world.boss().map(Actor::snapshot)
    }

    /// Reports whether the boss shield is raised.
    #[must_use]
    pub fn boss_shielded(world: &World) -> bool {
        world.boss().is_some_and(Actor::is_shielded)
    }

    /// Population counts consumed by the spawning system.
    #[must_use]
    pub fn census(world: &World) -> Census {
        Census {
            enemies: u32::try_from(world.enemy_units.len()).unwrap_or(u32::MAX),
            boss_spawned: world.boss_spawned,
        }
    }

    /// Captures a read-only view of every actor in the level.
    #[must_use]
    pub fn actor_view(world: &World) -> ActorView {
        let snapshots = std::iter::once(&world.user)
            .chain(world.enemy_units.iter())
            .chain(world.user_projectiles.iter())
            .chain(world.enemy_projectiles.iter())
            .map(Actor::snapshot)
            .chain(world.power_ups.iter().map(|power_up| power_up.snapshot()))
            .collect();
        ActorView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the actors of a single kind.
    #[must_use]
    pub fn actors_of_kind(world: &World, kind: ActorKind) -> ActorView {
        let snapshots = actor_view(world)
            .into_vec()
            .into_iter()
            .filter(|snapshot| snapshot.kind == kind)
            .collect();
        ActorView::from_snapshots(snapshots)
    }
}
