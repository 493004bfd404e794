use std::time::Duration;

use sky_battle_core::{
    ActorKind, Command, Event, LevelDefinition, LevelId, LevelTransition, Probability, Tuning,
    TuningError,
};
use sky_battle_system_campaign::{Campaign, CampaignError, Session, SessionState};
use sky_battle_world::query;

fn level(id: u32) -> LevelId {
    LevelId::new(id)
}

fn instant_clear_campaign(next: LevelId) -> Campaign {
    Campaign::new(
        vec![
            LevelDefinition::squadron(level(1), 5, 0, Probability::NEVER, 0, next),
            LevelDefinition::boss_fight(level(2), 5, 0),
        ],
        level(1),
    )
    .expect("campaign starts at a known level")
}

#[test]
fn cleared_level_waits_for_the_navigator() {
    let mut session =
        Session::new(instant_clear_campaign(level(2)), Tuning::default(), 1).expect("session");
    let mut events = Vec::new();

    let transition = session.tick(&mut events).expect("tick");
    assert_eq!(transition, LevelTransition::LevelCleared { next: level(2) });
    assert_eq!(
        session.state(),
        SessionState::AwaitingNextLevel {
            cleared: level(1),
            next: level(2),
        }
    );
    assert!(session.is_stopped());
    assert_eq!(
        session.advance(Duration::from_secs(5), &mut events),
        Ok(LevelTransition::None)
    );

    assert_eq!(session.continue_to_next_level(), Ok(level(2)));
    assert_eq!(session.state(), SessionState::Playing { level: level(2) });
    assert_eq!(query::level(session.world()).id, level(2));
    assert!(!session.is_stopped());
}

#[test]
fn unknown_successor_is_a_fatal_lookup_error() {
    let mut session =
        Session::new(instant_clear_campaign(level(7)), Tuning::default(), 2).expect("session");
    let mut events = Vec::new();
    let _ = session.tick(&mut events).expect("tick");

    assert_eq!(
        session.continue_to_next_level(),
        Err(CampaignError::UnknownLevel(level(7)))
    );
}

#[test]
fn continuing_requires_a_cleared_level() {
    let mut session = Session::new(Campaign::standard(), Tuning::default(), 3).expect("session");
    assert_eq!(
        session.continue_to_next_level(),
        Err(CampaignError::NoLevelPending)
    );
}

#[test]
fn defeat_ends_the_session() {
    let campaign = Campaign::new(
        vec![LevelDefinition::boss_fight(level(1), 0, 0)],
        level(1),
    )
    .expect("campaign");
    let mut session = Session::new(campaign, Tuning::default(), 4).expect("session");
    let mut events = Vec::new();

    let transition = session
        .advance(Duration::from_millis(500), &mut events)
        .expect("advance");
    assert_eq!(transition, LevelTransition::PlayerDefeated);
    assert_eq!(session.state(), SessionState::Defeated { level: level(1) });
    assert!(session.state().is_over());
    assert_eq!(query::tick_index(session.world()), 1, "the loop halts at the tick boundary");
    assert_eq!(
        session.continue_to_next_level(),
        Err(CampaignError::SessionOver)
    );

    events.clear();
    let _ = session.submit(Command::Fire, &mut events).expect("submit");
    let _ = session.tick(&mut events).expect("tick");
    assert!(events.is_empty());
}

#[test]
fn scheduler_runs_one_tick_per_interval() {
    let mut session = Session::new(Campaign::standard(), Tuning::default(), 5).expect("session");
    let mut events = Vec::new();

    let _ = session
        .advance(Duration::from_millis(120), &mut events)
        .expect("advance");
    assert_eq!(query::tick_index(session.world()), 2);

    let _ = session
        .advance(Duration::from_millis(30), &mut events)
        .expect("advance");
    assert_eq!(query::tick_index(session.world()), 3);

    session.stop();
    let _ = session
        .advance(Duration::from_secs(1), &mut events)
        .expect("advance");
    assert_eq!(query::tick_index(session.world()), 3);
}

#[test]
fn spawning_runs_before_the_level_pipeline() {
    let campaign = Campaign::new(
        vec![LevelDefinition::squadron(
            level(1),
            5,
            10,
            Probability::ALWAYS,
            10,
            level(2),
        )],
        level(1),
    )
    .expect("campaign");
    let mut session = Session::new(campaign, Tuning::default(), 6).expect("session");
    let mut events = Vec::new();

    let _ = session.tick(&mut events).expect("tick");

    let spawned = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::ActorSpawned {
                    kind: ActorKind::EnemyPlane,
                    ..
                }
            )
        })
        .count();
    assert_eq!(spawned, 10);
    let first_tick = events
        .iter()
        .position(|event| matches!(event, Event::TimeAdvanced { .. }))
        .expect("tick event");
    assert_eq!(first_tick, 10, "spawns precede the tick");
}

#[test]
fn boss_level_brings_in_the_boss_on_the_first_tick() {
    let mut session = Session::starting_at(Campaign::standard(), Tuning::default(), 7, level(2))
        .expect("session");
    let mut events = Vec::new();
    assert!(query::boss(session.world()).is_none());

    let _ = session.tick(&mut events).expect("tick");

    assert!(query::boss(session.world()).is_some());
    assert_eq!(query::actors_of_kind(session.world(), ActorKind::PowerUp).len(), 1);
}

#[test]
fn invalid_tuning_is_rejected() {
    let mut tuning = Tuning::default();
    tuning.tick_interval_ms = 0;
    let result = Session::new(Campaign::standard(), tuning, 8);
    assert!(matches!(
        result,
        Err(CampaignError::Tuning(TuningError::Zero {
            field: "tick_interval_ms"
        }))
    ));
}

#[test]
fn unknown_start_level_is_rejected() {
    let result = Session::starting_at(Campaign::standard(), Tuning::default(), 9, level(5));
    assert!(matches!(result, Err(CampaignError::UnknownLevel(id)) if id == level(5)));
}

#[test]
fn seeded_sessions_replay_identically() {
    let run = || {
        let mut session =
            Session::new(Campaign::standard(), Tuning::default(), 0x5eed).expect("session");
        let mut events = Vec::new();
        for frame in 0..2_000 {
            if frame % 5 == 0 {
                let _ = session.submit(Command::Fire, &mut events).expect("submit");
            }
            let _ = session
                .advance(Duration::from_millis(50), &mut events)
                .expect("advance");
            if matches!(session.state(), SessionState::AwaitingNextLevel { .. }) {
                let _ = session.continue_to_next_level().expect("next level");
            }
        }
        (events, session.state(), query::hud(session.world()))
    };

    assert_eq!(run(), run());
}
