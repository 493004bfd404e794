use sky_battle_core::{ActorKind, Command};
use sky_battle_world::{query, World};

/// Vertical distance within which the autopilot considers itself aligned.
const DEADBAND: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Steering {
    Up,
    Down,
    Hold,
}

/// Deterministic pilot used by headless runs.
///
/// Lines the plane up with the closest hostile fighter and fires on a fixed cadence.
#[derive(Clone, Debug)]
pub(crate) struct Autopilot {
    fire_every: u64,
    ticks: u64,
    steering: Steering,
}

impl Autopilot {
    pub(crate) fn new(fire_every: u64) -> Self {
        Self {
            fire_every: fire_every.max(1),
            ticks: 0,
            steering: Steering::Hold,
        }
    }

    /// Emits the commands for the upcoming tick.
    pub(crate) fn decide(&mut self, world: &World, out: &mut Vec<Command>) {
        let user = query::user(world);
        let own = user.bounds.center();

        let target = query::actor_view(world)
            .iter()
            .filter(|actor| matches!(actor.kind, ActorKind::EnemyPlane | ActorKind::Boss))
            .filter(|actor| actor.bounds.min_x() > own.x)
            .min_by(|left, right| left.bounds.min_x().total_cmp(&right.bounds.min_x()))
            .map(|actor| actor.bounds.center().y);

        let steering = match target {
            Some(y) if y < own.y - DEADBAND => Steering::Up,
            Some(y) if y > own.y + DEADBAND => Steering::Down,
            _ => Steering::Hold,
        };
        if steering != self.steering {
            out.push(match steering {
                Steering::Up => Command::MoveUp,
                Steering::Down => Command::MoveDown,
                Steering::Hold => Command::StopVertical,
            });
            self.steering = steering;
        }

        if self.ticks % self.fire_every == 0 {
            out.push(Command::Fire);
        }
        self.ticks += 1;
    }

    /// Forgets the steering state when a new level is loaded.
    pub(crate) fn reset(&mut self) {
        self.steering = Steering::Hold;
    }
}
