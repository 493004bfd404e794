//! Flat actor representation and the capabilities the level loop drives.

use rand::Rng;
use sky_battle_core::{ActorId, ActorKind, ActorSnapshot, Bounds, Point, Probability, Size, Tuning};
use sky_battle_system_boss::{BossBehavior, ShieldChange};

/// Per-tick spatial and state updates.
pub(crate) trait Movable {
    /// Applies the actor's movement for the current tick.
    fn update_position<R: Rng + ?Sized>(&mut self, rng: &mut R);

    /// Runs the full per-tick update, reporting shield changes of the boss.
    fn update_actor<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ShieldChange>;
}

/// Health loss and destruction.
pub(crate) trait Damageable {
    /// Applies a single hit.
    fn take_damage(&mut self);

    /// Marks the actor destroyed without any other side effect.
    fn destroy(&mut self);

    /// Reports whether the actor is destroyed and awaiting removal.
    fn is_destroyed(&self) -> bool;
}

/// Ability to release projectiles.
pub(crate) trait Shooter {
    /// Returns the projectile released this tick, if any.
    fn fire_projectile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Launch>;
}

/// Request to materialise a projectile at the given position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Launch {
    pub(crate) kind: ActorKind,
    pub(crate) origin: Point,
}

/// Layout position plus accumulated translation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Body {
    layout: Point,
    translate: Point,
    size: Size,
}

impl Body {
    pub(crate) const fn new(layout: Point, size: Size) -> Self {
        Self {
            layout,
            translate: Point::new(0.0, 0.0),
            size,
        }
    }

    pub(crate) fn position(&self) -> Point {
        self.layout.offset(self.translate)
    }

    pub(crate) fn bounds(&self) -> Bounds {
        Bounds::from_origin_and_size(self.position(), self.size)
    }

    pub(crate) fn translation(&self) -> Point {
        self.translate
    }

    pub(crate) fn move_horizontally(&mut self, dx: f32) {
        self.translate.x += dx;
    }

    /// Moves vertically, rolling the move back when it leaves `range`.
    fn move_vertically_within(&mut self, dy: f32, range: VerticalRange) {
        let previous = self.translate.y;
        self.translate.y += dy;
        if !range.contains(self.position().y) {
            self.translate.y = previous;
        }
    }

    pub(crate) fn place(&mut self, position: Point) {
        self.layout = position;
        self.translate = Point::new(0.0, 0.0);
    }

    pub(crate) fn resize(&mut self, size: Size) {
        self.size = size;
    }
}

/// Closed interval of permitted vertical positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct VerticalRange {
    upper: f32,
    lower: f32,
}

impl VerticalRange {
    pub(crate) const fn new(upper: f32, lower: f32) -> Self {
        Self { upper, lower }
    }

    fn contains(self, y: f32) -> bool {
        y >= self.upper && y <= self.lower
    }
}

/// Direction requested by the player's discrete input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VerticalIntent {
    Up,
    Down,
    Idle,
}

impl VerticalIntent {
    const fn multiplier(self) -> f32 {
        match self {
            Self::Up => -1.0,
            Self::Down => 1.0,
            Self::Idle => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hull {
    Fragile,
    Plated { health: u32 },
}

/// Movement and firing strategy of an actor kind.
#[derive(Debug)]
enum Pilot {
    Ballistic {
        velocity: f32,
    },
    Drone {
        velocity: f32,
        fire_probability: Probability,
        projectile_offset: Point,
    },
    Player {
        intent: VerticalIntent,
        speed: f32,
        range: VerticalRange,
        projectile_x: f32,
        projectile_offset_y: f32,
    },
    Boss {
        behavior: Box<BossBehavior>,
        range: VerticalRange,
        projectile_x: f32,
        projectile_offset_y: f32,
    },
}

/// Any plane or projectile taking part in combat.
#[derive(Debug)]
pub(crate) struct Actor {
    id: ActorId,
    kind: ActorKind,
    body: Body,
    hull: Hull,
    pilot: Pilot,
    destroyed: bool,
}

impl Actor {
    fn with_hull(id: ActorId, kind: ActorKind, body: Body, hull: Hull, pilot: Pilot) -> Self {
        let destroyed = matches!(hull, Hull::Plated { health: 0 });
        Self {
            id,
            kind,
            body,
            hull,
            pilot,
            destroyed,
        }
    }

    /// Creates the player plane.
    pub(crate) fn user(id: ActorId, health: u32, tuning: &Tuning) -> Self {
        let player = &tuning.player;
        Self::with_hull(
            id,
            ActorKind::UserPlane,
            Body::new(player.origin, tuning.dimensions.user),
            Hull::Plated { health },
            Pilot::Player {
                intent: VerticalIntent::Idle,
                speed: player.vertical_velocity,
                range: VerticalRange::new(player.upper_bound, player.lower_bound),
                projectile_x: player.projectile_x,
                projectile_offset_y: player.projectile_offset_y,
            },
        )
    }

    /// Creates an enemy fighter entering at the right screen edge.
    pub(crate) fn enemy(id: ActorId, y: f32, tuning: &Tuning) -> Self {
        let enemy = &tuning.enemy;
        Self::with_hull(
            id,
            ActorKind::EnemyPlane,
            Body::new(Point::new(tuning.screen.width, y), tuning.dimensions.enemy),
            Hull::Plated {
                health: enemy.health,
            },
            Pilot::Drone {
                velocity: enemy.horizontal_velocity,
                fire_probability: enemy.fire_probability,
                projectile_offset: enemy.projectile_offset,
            },
        )
    }

    /// Creates the boss with a freshly shuffled move pattern.
    pub(crate) fn boss<R: Rng + ?Sized>(id: ActorId, tuning: &Tuning, rng: &mut R) -> Self {
        let boss = &tuning.boss;
        Self::with_hull(
            id,
            ActorKind::Boss,
            Body::new(boss.origin, tuning.dimensions.boss),
            Hull::Plated {
                health: boss.health,
            },
            Pilot::Boss {
                behavior: Box::new(BossBehavior::new(boss, rng)),
                range: VerticalRange::new(boss.upper_bound, boss.lower_bound),
                projectile_x: boss.projectile_x,
                projectile_offset_y: boss.projectile_offset_y,
            },
        )
    }

    /// Creates a projectile of the launched kind.
    pub(crate) fn projectile(id: ActorId, launch: Launch, tuning: &Tuning) -> Self {
        let (velocity, size) = match launch.kind {
            ActorKind::EnemyProjectile => (
                tuning.projectiles.enemy_velocity,
                tuning.dimensions.enemy_projectile,
            ),
            ActorKind::BossProjectile => (
                tuning.projectiles.boss_velocity,
                tuning.dimensions.boss_projectile,
            ),
            _ => (
                tuning.projectiles.user_velocity,
                tuning.dimensions.user_projectile,
            ),
        };
        Self::with_hull(
            id,
            launch.kind,
            Body::new(launch.origin, size),
            Hull::Fragile,
            Pilot::Ballistic { velocity },
        )
    }

    pub(crate) const fn id(&self) -> ActorId {
        self.id
    }

    pub(crate) const fn kind(&self) -> ActorKind {
        self.kind
    }

    pub(crate) fn position(&self) -> Point {
        self.body.position()
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.body.bounds()
    }

    pub(crate) const fn health(&self) -> Option<u32> {
        match self.hull {
            Hull::Fragile => None,
            Hull::Plated { health } => Some(health),
        }
    }

    pub(crate) fn is_shielded(&self) -> bool {
        match &self.pilot {
            Pilot::Boss { behavior, .. } => behavior.is_shielded(),
            _ => false,
        }
    }

    /// Reports whether the actor travelled further left than the screen is wide.
    pub(crate) fn has_penetrated(&self, screen_width: f32) -> bool {
        self.body.translation().x.abs() > screen_width
    }

    /// Records the player's requested vertical direction.
    pub(crate) fn steer(&mut self, requested: VerticalIntent) {
        if let Pilot::Player { intent, .. } = &mut self.pilot {
            *intent = requested;
        }
    }

    pub(crate) fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            kind: self.kind,
            bounds: self.bounds(),
            health: self.health(),
            destroyed: self.destroyed,
        }
    }
}

impl Movable for Actor {
    fn update_position<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.destroyed {
            return;
        }

        match &mut self.pilot {
            Pilot::Ballistic { velocity } | Pilot::Drone { velocity, .. } => {
                self.body.move_horizontally(*velocity);
            }
            Pilot::Player {
                intent,
                speed,
                range,
                ..
            } => {
                if *intent != VerticalIntent::Idle {
                    self.body
                        .move_vertically_within(*speed * intent.multiplier(), *range);
                }
            }
            Pilot::Boss {
                behavior, range, ..
            } => {
                let step = behavior.next_move(rng);
                self.body.move_vertically_within(step as f32, *range);
            }
        }
    }

    fn update_actor<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ShieldChange> {
        if self.destroyed {
            return None;
        }

        self.update_position(rng);
        match &mut self.pilot {
            Pilot::Boss { behavior, .. } => behavior.update_shield(rng),
            _ => None,
        }
    }
}

impl Damageable for Actor {
    fn take_damage(&mut self) {
        if self.destroyed || self.is_shielded() {
            return;
        }

        match &mut self.hull {
            Hull::Fragile => self.destroyed = true,
            Hull::Plated { health } => {
                *health = health.saturating_sub(1);
                if *health == 0 {
                    self.destroyed = true;
                }
            }
        }
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl Shooter for Actor {
    fn fire_projectile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Launch> {
        if self.destroyed {
            return None;
        }

        let position = self.position();
        match &self.pilot {
            Pilot::Ballistic { .. } => None,
            Pilot::Drone {
                fire_probability,
                projectile_offset,
                ..
            } => rng.gen_bool(fire_probability.get()).then(|| Launch {
                kind: ActorKind::EnemyProjectile,
                origin: position.offset(*projectile_offset),
            }),
            Pilot::Player {
                projectile_x,
                projectile_offset_y,
                ..
            } => Some(Launch {
                kind: ActorKind::UserProjectile,
                origin: Point::new(*projectile_x, position.y + projectile_offset_y),
            }),
            Pilot::Boss {
                behavior,
                projectile_x,
                projectile_offset_y,
                ..
            } => behavior.fires(rng).then(|| Launch {
                kind: ActorKind::BossProjectile,
                origin: Point::new(*projectile_x, position.y + projectile_offset_y),
            }),
        }
    }
}
