use std::time::Duration;

use sky_battle_core::{Command, Event, LevelDefinition, LevelId, LevelTransition, Tuning};
use sky_battle_system_spawning::{Config as SpawningConfig, Spawning};
use sky_battle_world::{self as world, query, World};
use tracing::{debug, info};

use crate::{Campaign, CampaignError, FixedStepScheduler};

/// Where the session stands within its campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// The level is running.
    Playing {
        /// Level being played.
        level: LevelId,
    },
    /// A level was cleared; the session waits before loading its successor.
    AwaitingNextLevel {
        /// Level that was cleared.
        cleared: LevelId,
        /// Level that will be loaded next.
        next: LevelId,
    },
    /// The player was destroyed.
    Defeated {
        /// Level in which the player fell.
        level: LevelId,
    },
    /// The boss was destroyed.
    Victorious {
        /// Level in which the boss fell.
        level: LevelId,
    },
}

impl SessionState {
    /// Reports whether the session ended in defeat or victory.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Defeated { .. } | Self::Victorious { .. })
    }
}

/// Plays through a campaign one level at a time.
#[derive(Debug)]
pub struct Session {
    campaign: Campaign,
    tuning: Tuning,
    seed: u64,
    world: World,
    spawning: Spawning,
    scheduler: FixedStepScheduler,
    state: SessionState,
    commands: Vec<Command>,
}

impl Session {
    /// Starts a session at the campaign's opening level.
    pub fn new(campaign: Campaign, tuning: Tuning, seed: u64) -> Result<Self, CampaignError> {
        let first = campaign.first();
        Self::starting_at(campaign, tuning, seed, first)
    }

    /// Starts a session at the provided level.
    pub fn starting_at(
        campaign: Campaign,
        tuning: Tuning,
        seed: u64,
        level: LevelId,
    ) -> Result<Self, CampaignError> {
        tuning.validate()?;
        let definition = *campaign.level(level)?;
        let (world, spawning) = load_level(&definition, &tuning, seed);
        info!(%level, seed, "level started");
        Ok(Self {
            scheduler: FixedStepScheduler::new(tuning.tick_interval()),
            campaign,
            tuning,
            seed,
            world,
            spawning,
            state: SessionState::Playing { level },
            commands: Vec::new(),
        })
    }

    /// Current state of the session.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// World of the level currently loaded.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Campaign the session plays through.
    #[must_use]
    pub const fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    /// Seed every level of the session derives its randomness from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Forwards a player input command to the active level.
    ///
    /// Ticks are driven by [`Session::advance`] and [`Session::tick`]; a
    /// submitted [`Command::Tick`] runs a full tick including spawning.
    pub fn submit(
        &mut self,
        command: Command,
        out_events: &mut Vec<Event>,
    ) -> Result<LevelTransition, CampaignError> {
        if command == Command::Tick {
            return self.tick(out_events);
        }
        if matches!(self.state, SessionState::Playing { .. }) {
            let _ = world::apply(&mut self.world, command, out_events);
        }
        Ok(LevelTransition::None)
    }

    /// Feeds elapsed wall-clock time to the scheduler and runs every due tick.
    ///
    /// Returns the terminal transition if one of the ticks ended the level.
    pub fn advance(
        &mut self,
        elapsed: Duration,
        out_events: &mut Vec<Event>,
    ) -> Result<LevelTransition, CampaignError> {
        let due = self.scheduler.advance(elapsed);
        for _ in 0..due {
            let transition = self.tick(out_events)?;
            if transition.is_terminal() {
                return Ok(transition);
            }
        }
        Ok(LevelTransition::None)
    }

    /// Runs a single tick: spawning first, then the level pipeline.
    pub fn tick(&mut self, out_events: &mut Vec<Event>) -> Result<LevelTransition, CampaignError> {
        let SessionState::Playing { level } = self.state else {
            return Ok(LevelTransition::None);
        };

        self.commands.clear();
        self.spawning.handle(
            &query::level(&self.world).spawn,
            query::status(&self.world),
            query::census(&self.world),
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            let _ = world::apply(&mut self.world, command, out_events);
        }

        let transition = world::apply(&mut self.world, Command::Tick, out_events);
        match transition {
            LevelTransition::None => {}
            LevelTransition::PlayerDefeated => {
                self.scheduler.stop();
                self.state = SessionState::Defeated { level };
                info!(%level, "player defeated");
            }
            LevelTransition::LevelCleared { next } => {
                self.scheduler.stop();
                self.state = SessionState::AwaitingNextLevel {
                    cleared: level,
                    next,
                };
                info!(%level, %next, "level cleared");
            }
            LevelTransition::BossDefeated => {
                self.scheduler.stop();
                self.state = SessionState::Victorious { level };
                info!(%level, "boss defeated");
            }
        }
        Ok(transition)
    }

    /// Loads the successor of a cleared level and resumes the scheduler.
    pub fn continue_to_next_level(&mut self) -> Result<LevelId, CampaignError> {
        let next = match self.state {
            SessionState::AwaitingNextLevel { next, .. } => next,
            SessionState::Playing { .. } => return Err(CampaignError::NoLevelPending),
            SessionState::Defeated { .. } | SessionState::Victorious { .. } => {
                return Err(CampaignError::SessionOver)
            }
        };

        let definition = *self.campaign.level(next)?;
        let (world, spawning) = load_level(&definition, &self.tuning, self.seed);
        self.world = world;
        self.spawning = spawning;
        self.state = SessionState::Playing { level: next };
        self.scheduler.restart();
        info!(level = %next, "level started");
        Ok(next)
    }

    /// Halts the tick loop at the current tick boundary.
    pub fn stop(&mut self) {
        debug!("session stopped");
        self.scheduler.stop();
    }

    /// Reports whether the tick loop was halted.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.scheduler.is_stopped()
    }
}

/// Builds the world and spawning system of a level from the session seed.
fn load_level(definition: &LevelDefinition, tuning: &Tuning, seed: u64) -> (World, Spawning) {
    let level_seed = seed.wrapping_add(u64::from(definition.id.get()));
    let world = World::new(*definition, tuning.clone(), level_seed);
    let spawning = Spawning::new(SpawningConfig::new(
        level_seed,
        tuning.screen.enemy_maximum_y(),
    ));
    (world, spawning)
}
