use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::{anyhow, Context, Result};
use sky_battle_core::{Command, Event, WELCOME_BANNER};
use sky_battle_rendering::{
    Color, FrameInput, Overlay, Palette, Presentation, RenderingBackend, Scene,
};
use sky_battle_rendering_macroquad::MacroquadBackend;
use sky_battle_system_campaign::{CampaignError, Session, SessionState};
use sky_battle_world::query;
use tracing::{error, info};

/// Overlay shown for a session state, if any.
pub(crate) fn overlay_for(state: SessionState) -> Option<Overlay> {
    match state {
        SessionState::Playing { .. } => None,
        SessionState::AwaitingNextLevel { next, .. } => Some(Overlay::LevelCleared { next }),
        SessionState::Defeated { .. } => Some(Overlay::GameOver),
        SessionState::Victorious { .. } => Some(Overlay::Victory),
    }
}

/// Applies one frame of input and elapsed time to the session.
pub(crate) fn step(
    session: &mut Session,
    dt: Duration,
    input: FrameInput,
    commands: &mut Vec<Command>,
    events: &mut Vec<Event>,
) -> Result<(), CampaignError> {
    match session.state() {
        SessionState::Playing { .. } => {
            input.commands(commands);
            for command in commands.drain(..) {
                let _ = session.submit(command, events)?;
            }
            let _ = session.advance(dt, events)?;
        }
        SessionState::AwaitingNextLevel { .. } => {
            if input.confirm {
                let _ = session.continue_to_next_level()?;
            }
        }
        SessionState::Defeated { .. } | SessionState::Victorious { .. } => {}
    }
    Ok(())
}

/// Opens the game window and plays the session until the window closes.
///
/// A fatal campaign error halts the loop, stays on screen and is returned once
/// the window is closed.
pub(crate) fn run(session: Session, vsync: bool) -> Result<()> {
    let tuning = query::tuning(session.world());
    let scene = Scene::new(tuning.screen.width, tuning.screen.height, Palette::default())
        .context("failed to describe the playfield")?;
    let presentation = Presentation::new(
        "Sky Battle",
        Color::from_rgb_u8(0x87, 0xce, 0xeb),
        scene,
    );
    info!("{WELCOME_BANNER}");

    let fatal: Rc<RefCell<Option<CampaignError>>> = Rc::new(RefCell::new(None));
    let fatal_in_loop = Rc::clone(&fatal);
    let mut session = session;
    let mut commands = Vec::new();
    let mut events = Vec::new();

    MacroquadBackend::new()
        .with_vsync(vsync)
        .run(presentation, move |dt, input, scene| {
            if fatal_in_loop.borrow().is_none() {
                if let Err(failure) = step(&mut session, dt, input, &mut commands, &mut events) {
                    error!(%failure, "game loop halted");
                    session.stop();
                    scene.overlay = Some(Overlay::Fatal {
                        message: failure.to_string(),
                    });
                    *fatal_in_loop.borrow_mut() = Some(failure);
                } else {
                    scene.overlay = overlay_for(session.state());
                }
                events.clear();
            }

            scene.refresh(
                &query::actor_view(session.world()),
                query::hud(session.world()),
            );
            true
        })
        .context("rendering backend failed")?;

    let failure = fatal.borrow_mut().take();
    match failure {
        Some(failure) => Err(anyhow!(failure)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_battle_core::{LevelDefinition, LevelId, Probability, Tuning};
    use sky_battle_system_campaign::Campaign;

    fn instant_clear(next: LevelId) -> Session {
        let campaign = Campaign::new(
            vec![
                LevelDefinition::squadron(LevelId::new(1), 5, 0, Probability::NEVER, 0, next),
                LevelDefinition::boss_fight(LevelId::new(2), 5, 0),
            ],
            LevelId::new(1),
        )
        .expect("campaign");
        Session::new(campaign, Tuning::default(), 5).expect("session")
    }

    #[test]
    fn overlays_follow_the_session_state() {
        let level = LevelId::new(1);
        assert_eq!(overlay_for(SessionState::Playing { level }), None);
        assert_eq!(
            overlay_for(SessionState::Defeated { level }),
            Some(Overlay::GameOver)
        );
        assert_eq!(
            overlay_for(SessionState::Victorious { level }),
            Some(Overlay::Victory)
        );
    }

    #[test]
    fn confirm_continues_after_a_cleared_level() {
        let mut session = instant_clear(LevelId::new(2));
        let mut commands = Vec::new();
        let mut events = Vec::new();
        let frame = Duration::from_millis(50);

        step(&mut session, frame, FrameInput::default(), &mut commands, &mut events)
            .expect("first frame");
        assert!(matches!(
            session.state(),
            SessionState::AwaitingNextLevel { .. }
        ));

        step(&mut session, frame, FrameInput::default(), &mut commands, &mut events)
            .expect("waiting frame");
        assert!(matches!(
            session.state(),
            SessionState::AwaitingNextLevel { .. }
        ));

        let confirm = FrameInput {
            confirm: true,
            ..FrameInput::default()
        };
        step(&mut session, frame, confirm, &mut commands, &mut events).expect("confirm");
        assert_eq!(
            session.state(),
            SessionState::Playing {
                level: LevelId::new(2)
            }
        );
    }

    #[test]
    fn unknown_successor_is_fatal() {
        let mut session = instant_clear(LevelId::new(8));
        let mut commands = Vec::new();
        let mut events = Vec::new();
        let frame = Duration::from_millis(50);
        let confirm = FrameInput {
            confirm: true,
            ..FrameInput::default()
        };

        step(&mut session, frame, confirm, &mut commands, &mut events).expect("first frame");
        assert_eq!(
            step(&mut session, frame, confirm, &mut commands, &mut events),
            Err(CampaignError::UnknownLevel(LevelId::new(8)))
        );
    }

    #[test]
    fn player_input_reaches_the_level() {
        let mut session = Session::new(Campaign::standard(), Tuning::default(), 9).expect("session");
        let mut commands = Vec::new();
        let mut events = Vec::new();
        let fire = FrameInput {
            fire: true,
            ..FrameInput::default()
        };

        step(&mut session, Duration::ZERO, fire, &mut commands, &mut events).expect("frame");
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { .. })));
    }
}
