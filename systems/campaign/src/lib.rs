#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Campaign navigation for Sky Battle.
//!
//! A [`Campaign`] is a static table of level definitions. A [`Session`] plays
//! through that table: it drives the active level with a fixed-step scheduler,
//! consumes the [`LevelTransition`](sky_battle_core::LevelTransition) values
//! produced by each tick, and maps cleared levels onto their successors.

mod scheduler;
mod session;

use sky_battle_core::{LevelDefinition, LevelId, Probability, TuningError};
use thiserror::Error;

pub use scheduler::{FixedStepScheduler, MAX_CATCH_UP_TICKS, TICK_INTERVAL};
pub use session::{Session, SessionState};

/// Errors raised while navigating a campaign.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CampaignError {
    /// A transition named a level the campaign does not contain.
    #[error("unknown {0}")]
    UnknownLevel(LevelId),
    /// The session was asked to advance while no cleared level awaits a successor.
    #[error("no cleared level is awaiting its successor")]
    NoLevelPending,
    /// The session already ended in defeat or victory.
    #[error("the session is over")]
    SessionOver,
    /// The supplied tuning is invalid.
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// Static table mapping level identifiers onto their definitions.
#[derive(Clone, Debug, PartialEq)]
pub struct Campaign {
    levels: Vec<LevelDefinition>,
    first: LevelId,
}

impl Campaign {
    /// Creates a campaign that starts at `first`.
    pub fn new(levels: Vec<LevelDefinition>, first: LevelId) -> Result<Self, CampaignError> {
        let campaign = Self { levels, first };
        let _ = campaign.level(first)?;
        Ok(campaign)
    }

    /// Standard two-level campaign: a squadron, then the boss.
    #[must_use]
    pub fn standard() -> Self {
        let level_one = LevelId::new(1);
        let level_two = LevelId::new(2);
        Self {
            levels: vec![
                LevelDefinition::squadron(
                    level_one,
                    5,
                    10,
                    Probability::from_const(0.20),
                    10,
                    level_two,
                ),
                LevelDefinition::boss_fight(level_two, 5, 1),
            ],
            first: level_one,
        }
    }

    /// Identifier of the opening level.
    #[must_use]
    pub const fn first(&self) -> LevelId {
        self.first
    }

    /// Looks up the definition of a level.
    pub fn level(&self, id: LevelId) -> Result<&LevelDefinition, CampaignError> {
        self.levels
            .iter()
            .find(|level| level.id == id)
            .ok_or(CampaignError::UnknownLevel(id))
    }

    /// Every level of the campaign in table order.
    #[must_use]
    pub fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }
}

impl Default for Campaign {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_battle_core::{Objective, SpawnPolicy};

    #[test]
    fn standard_campaign_links_squadron_to_boss() {
        let campaign = Campaign::standard();
        let first = campaign.level(campaign.first()).expect("first level");
        let Objective::KillTarget { kills, next } = first.objective else {
            panic!("level one should be kill based");
        };
        assert_eq!(kills, 10);

        let second = campaign.level(next).expect("second level");
        assert_eq!(second.objective, Objective::DefeatBoss);
        assert_eq!(second.spawn, SpawnPolicy::Boss);
        assert_eq!(second.power_ups, 1);
    }

    #[test]
    fn unknown_levels_are_reported() {
        let campaign = Campaign::standard();
        assert_eq!(
            campaign.level(LevelId::new(9)),
            Err(CampaignError::UnknownLevel(LevelId::new(9)))
        );
        assert_eq!(
            Campaign::new(Vec::new(), LevelId::new(1)),
            Err(CampaignError::UnknownLevel(LevelId::new(1)))
        );
    }

    #[test]
    fn lookup_error_names_the_level() {
        assert_eq!(
            CampaignError::UnknownLevel(LevelId::new(3)).to_string(),
            "unknown level 3"
        );
    }
}
