//! Power-ups that seek the player and then escort it as follower planes.

use rand::Rng;
use sky_battle_core::{ActorId, ActorKind, ActorSnapshot, Bounds, Point, PowerUpTuning, Size};

use crate::actor::{Body, Launch, Shooter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Seeking,
    Attached,
}

/// Pickup released at level start; becomes a co-firing follower on contact.
#[derive(Debug)]
pub(crate) struct PowerUp {
    id: ActorId,
    body: Body,
    stage: Stage,
    speed: f32,
    follow_offset: Point,
    fire_offset: Point,
}

impl PowerUp {
    pub(crate) fn new(id: ActorId, tuning: &PowerUpTuning, size: Size) -> Self {
        Self {
            id,
            body: Body::new(tuning.origin, size),
            stage: Stage::Seeking,
            speed: tuning.speed,
            follow_offset: tuning.follow_offset,
            fire_offset: tuning.fire_offset,
        }
    }

    pub(crate) const fn id(&self) -> ActorId {
        self.id
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.stage == Stage::Attached
    }

    /// Steps towards the player's position and attaches on contact.
    ///
    /// Returns `true` on the tick the power-up becomes a follower.
    pub(crate) fn seek(&mut self, target: Point, target_bounds: &Bounds, follower_size: Size) -> bool {
        if self.is_attached() {
            return false;
        }

        let position = self.body.position();
        let dx = target.x - position.x;
        let dy = target.y - position.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > f32::EPSILON {
            let step = self.speed.min(distance);
            self.body.place(Point::new(
                position.x + step * dx / distance,
                position.y + step * dy / distance,
            ));
        }

        if self.body.bounds().intersects(target_bounds) {
            self.stage = Stage::Attached;
            self.body.resize(follower_size);
            return true;
        }
        false
    }

    /// Keeps an attached follower at its offset from the player.
    pub(crate) fn follow(&mut self, leader: Point) {
        if self.is_attached() {
            self.body.place(leader.offset(self.follow_offset));
        }
    }

    pub(crate) fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            kind: if self.is_attached() {
                ActorKind::Follower
            } else {
                ActorKind::PowerUp
            },
            bounds: self.body.bounds(),
            health: None,
            destroyed: false,
        }
    }
}

impl Shooter for PowerUp {
    fn fire_projectile<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> Option<Launch> {
        self.is_attached().then(|| Launch {
            kind: ActorKind::UserProjectile,
            origin: self.body.position().offset(self.fire_offset),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use sky_battle_core::Tuning;

    #[test]
    fn seeks_player_and_attaches_on_contact() {
        let tuning = Tuning::default();
        let mut power_up = PowerUp::new(ActorId::new(1), &tuning.power_up, tuning.dimensions.power_up);
        let player = Point::new(5.0, 300.0);
        let player_bounds = Bounds::from_origin_and_size(player, tuning.dimensions.user);

        let mut attached_after = None;
        for tick in 1..=200 {
            if power_up.seek(player, &player_bounds, tuning.dimensions.follower) {
                attached_after = Some(tick);
                break;
            }
        }

        assert!(attached_after.is_some(), "power-up never reached the player");
        assert!(power_up.is_attached());
        assert_eq!(power_up.snapshot().kind, ActorKind::Follower);
        assert_eq!(power_up.snapshot().bounds.size(), tuning.dimensions.follower);
    }

    #[test]
    fn seeking_power_up_holds_fire() {
        let tuning = Tuning::default();
        let mut power_up = PowerUp::new(ActorId::new(1), &tuning.power_up, tuning.dimensions.power_up);
        assert_eq!(power_up.fire_projectile(&mut ChaCha8Rng::seed_from_u64(1)), None);
    }

    #[test]
    fn follower_trails_player_and_fires_ahead() {
        let tuning = Tuning::default();
        let mut power_up = PowerUp::new(ActorId::new(1), &tuning.power_up, tuning.dimensions.power_up);
        let origin = tuning.power_up.origin;
        let bounds = Bounds::from_origin_and_size(origin, tuning.dimensions.user);
        assert!(power_up.seek(origin, &bounds, tuning.dimensions.follower));

        power_up.follow(Point::new(5.0, 200.0));
        assert_eq!(power_up.snapshot().bounds.origin(), Point::new(5.0, 250.0));

        let launch = power_up.fire_projectile(&mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(
            launch,
            Some(Launch {
                kind: ActorKind::UserProjectile,
                origin: Point::new(115.0, 250.0),
            })
        );
    }
}
