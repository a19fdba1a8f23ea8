/// Encounter lifecycles through the engine: clan wars, boss fights,
/// scope ownership, and reward distribution.
mod common;

use grindbot::game::{EncounterState, GameError, Side};

#[tokio::test]
async fn clan_war_lifecycle_pending_active_resolved() {
    let (engine, _dir) = common::fast_engine();
    let encounter = engine
        .start_clan_war(
            "ana",
            "lobos",
            vec!["ana".to_string(), "beto".to_string()],
            "cuervos",
            vec!["carla".to_string()],
        )
        .expect("war");
    assert_eq!(encounter.state, EncounterState::Pending);
    let scope = encounter.scope.clone();

    // Attacks before acceptance bounce.
    assert!(matches!(
        engine
            .resolve_combat_attack(&scope, Side::Challenger, "ana")
            .await,
        Err(GameError::NoActiveEncounter(_))
    ));

    engine.accept_clan_war(&scope).expect("accept");

    let mut side = Side::Challenger;
    let mut payouts = None;
    for _ in 0..10_000 {
        let report = engine
            .resolve_combat_attack(&scope, side, "ana")
            .await
            .expect("attack");
        assert!(report.attack.defender_hp >= 0);
        assert!(report.attack.attacker_hp >= 0);
        if let Some(p) = report.payouts {
            payouts = Some(p);
            break;
        }
        side = side.opposite();
    }
    let payouts = payouts.expect("war resolved");
    // Every roster member got paid something, winners and losers alike.
    assert_eq!(payouts.len(), 3);
    for payout in &payouts {
        assert!(payout.coins > 0);
        let player = engine.store().get_player(&payout.player_id).expect("player");
        assert!(player.balance >= payout.coins);
        assert!(player.experience >= payout.xp);
    }

    // The stored encounter is terminal now.
    let stored = engine.store().get_encounter(&scope).expect("stored");
    assert!(matches!(stored.state, EncounterState::Resolved { .. }));
    assert!(matches!(
        engine
            .resolve_combat_attack(&scope, Side::Challenger, "ana")
            .await,
        Err(GameError::EncounterResolved)
    ));
}

#[tokio::test]
async fn a_new_boss_takes_over_the_scope() {
    let (engine, _dir) = common::fast_engine();
    let first = engine
        .spawn_boss("ana", "guild-1", vec!["ana".to_string()])
        .expect("spawn");
    let second = engine
        .spawn_boss("beto", "guild-1", vec!["beto".to_string()])
        .expect("respawn");
    let current = engine.store().get_encounter("guild-1").expect("current");
    assert_eq!(current.id, second.id);
    assert_ne!(current.id, first.id);
}

#[tokio::test]
async fn self_war_is_rejected() {
    let (engine, _dir) = common::engine();
    assert!(matches!(
        engine.start_clan_war("ana", "lobos", vec!["ana".to_string()], "lobos", vec![]),
        Err(GameError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn boss_fight_wears_the_chosen_weapon() {
    let (engine, _dir) = common::interactive_engine();
    let engine = std::sync::Arc::new(engine);
    let sword = engine.grant_item("ana", "espada_solar").expect("weapon");
    engine
        .spawn_boss("ana", "guild-1", vec!["ana".to_string()])
        .expect("spawn");

    let flow = {
        let engine = engine.clone();
        tokio::spawn(async move {
            engine
                .resolve_combat_attack("guild-1", Side::Challenger, "ana")
                .await
        })
    };
    // Pick the sword when the item-choice flow opens.
    let handle = loop {
        if let Some(h) = engine
            .sessions()
            .lookup("ana", grindbot::game::FlowKind::WeaponChoice)
        {
            break h;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    };
    engine
        .submit_choice(handle, "ana", &sword.id.to_string())
        .expect("submit");
    let report = flow.await.expect("join").expect("attack");

    // Weapon-range base damage, and the sword shows the wear.
    assert!(report.attack.base_damage >= 40 && report.attack.base_damage <= 80);
    let worn = engine.store().get_item("ana", sword.id).expect("sword");
    assert_eq!(worn.durability, 98);
}

#[tokio::test]
async fn losing_side_of_a_boss_fight_still_reports_resolution() {
    let (engine, _dir) = common::fast_engine();
    engine
        .spawn_boss("ana", "guild-9", vec!["ana".to_string()])
        .expect("spawn");
    let mut resolved_state = None;
    for turn in 0..10_000 {
        let side = if turn % 2 == 0 {
            Side::Challenger
        } else {
            Side::Defender
        };
        match engine.resolve_combat_attack("guild-9", side, "ana").await {
            Ok(report) => {
                if let EncounterState::Resolved { winner } = report.attack.state {
                    resolved_state = Some(winner);
                    break;
                }
            }
            Err(GameError::EncounterResolved) => break,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
    let winner = resolved_state.expect("fight resolved");
    let stored = engine.store().get_encounter("guild-9").expect("stored");
    assert_eq!(stored.state, EncounterState::Resolved { winner });
}
