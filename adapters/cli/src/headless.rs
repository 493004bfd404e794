use std::fmt;

use anyhow::{Context, Result};
use sky_battle_core::{Event, HudSnapshot, LevelId};
use sky_battle_system_campaign::{Session, SessionState};
use sky_battle_world::query;
use tracing::{debug, info};

use crate::autopilot::Autopilot;

/// Outcome of a headless run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) seed: u64,
    pub(crate) ticks: u64,
    pub(crate) state: SessionState,
    pub(crate) levels_cleared: Vec<LevelId>,
    pub(crate) kills: u32,
    pub(crate) hud: HudSnapshot,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.state {
            SessionState::Playing { level } => format!("still playing {level}"),
            SessionState::AwaitingNextLevel { cleared, .. } => format!("cleared {cleared}"),
            SessionState::Defeated { level } => format!("defeated in {level}"),
            SessionState::Victorious { level } => format!("boss destroyed in {level}"),
        };
        writeln!(f, "seed: {}", self.seed)?;
        writeln!(f, "ticks: {}", self.ticks)?;
        writeln!(f, "outcome: {outcome}")?;
        writeln!(f, "levels cleared: {}", self.levels_cleared.len())?;
        writeln!(f, "kills: {}", self.kills)?;
        write!(f, "health: {}", self.hud.health)
    }
}

/// Plays a session without a window until it ends or `max_ticks` elapse.
///
/// Cleared levels are continued automatically.
pub(crate) fn run(mut session: Session, mut autopilot: Autopilot, max_ticks: u64) -> Result<Summary> {
    let mut commands = Vec::new();
    let mut events: Vec<Event> = Vec::new();
    let mut levels_cleared = Vec::new();
    let mut kills = 0;
    let mut ticks = 0;

    while ticks < max_ticks {
        if let SessionState::AwaitingNextLevel { cleared, next } = session.state() {
            kills += query::kills(session.world());
            levels_cleared.push(cleared);
            let _ = session
                .continue_to_next_level()
                .with_context(|| format!("failed to continue from {cleared} to {next}"))?;
            autopilot.reset();
        }
        if session.state().is_over() {
            break;
        }

        commands.clear();
        autopilot.decide(session.world(), &mut commands);
        for command in commands.drain(..) {
            let _ = session.submit(command, &mut events)?;
        }
        let _ = session.tick(&mut events)?;
        ticks += 1;

        debug!(tick = ticks, events = events.len(), "headless tick");
        events.clear();
    }

    if !matches!(session.state(), SessionState::AwaitingNextLevel { .. }) {
        kills += query::kills(session.world());
    }
    info!(ticks, state = ?session.state(), "headless run finished");

    Ok(Summary {
        seed: session.seed(),
        ticks,
        state: session.state(),
        levels_cleared,
        kills,
        hud: query::hud(session.world()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_battle_core::{LevelDefinition, Probability, Tuning};
    use sky_battle_system_campaign::{Campaign, CampaignError};

    fn play(seed: u64, max_ticks: u64) -> Summary {
        let session = Session::new(Campaign::standard(), Tuning::default(), seed).expect("session");
        run(session, Autopilot::new(4), max_ticks).expect("headless run")
    }

    #[test]
    fn headless_runs_are_reproducible() {
        assert_eq!(play(42, 3_000), play(42, 3_000));
    }

    #[test]
    fn run_stops_at_the_tick_budget() {
        let summary = play(1, 25);
        assert_eq!(summary.ticks, 25);
        assert_eq!(
            summary.state,
            SessionState::Playing {
                level: LevelId::new(1)
            }
        );
    }

    #[test]
    fn unknown_successor_aborts_the_run() {
        let campaign = Campaign::new(
            vec![LevelDefinition::squadron(
                LevelId::new(1),
                5,
                0,
                Probability::NEVER,
                0,
                LevelId::new(9),
            )],
            LevelId::new(1),
        )
        .expect("campaign");
        let session = Session::new(campaign, Tuning::default(), 3).expect("session");

        let error = run(session, Autopilot::new(4), 10).expect_err("unknown level");
        assert_eq!(
            error.downcast_ref::<CampaignError>(),
            Some(&CampaignError::UnknownLevel(LevelId::new(9)))
        );
    }

    #[test]
    fn summary_reports_the_outcome() {
        let summary = Summary {
            seed: 7,
            ticks: 120,
            state: SessionState::Defeated {
                level: LevelId::new(2),
            },
            levels_cleared: vec![LevelId::new(1)],
            kills: 10,
            hud: HudSnapshot {
                health: 0,
                kills: 0,
                kill_target: None,
                boss_health: Some(4),
                boss_shielded: false,
            },
        };
        let text = summary.to_string();
        assert!(text.contains("outcome: defeated in level 2"));
        assert!(text.contains("levels cleared: 1"));
    }
}
