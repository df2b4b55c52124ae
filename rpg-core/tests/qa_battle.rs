//! QA tests for the battle loop.
//!
//! Run with: `cargo test -p rpg-core --test qa_battle`

use rpg_core::actors::{EnemyId, EnemyKind};
use rpg_core::testing::{assert_exploring, assert_in_battle_with, outcome_of, TestHarness};
use rpg_core::{BattleAction, BattleOutcome, Cue, Effect, Position, SessionError};

fn enemy_hp(harness: &TestHarness, id: &str) -> Option<i32> {
    harness
        .state()
        .enemy(&EnemyId::new(id))
        .map(|enemy| enemy.hp)
}

// =============================================================================
// Attacking
// =============================================================================

#[test]
fn test_attacks_strictly_decrease_enemy_hp() {
    for seed in 0..20 {
        let mut harness = TestHarness::with_seed(seed);
        harness.engage("s1");

        let mut last = enemy_hp(&harness, "s1").unwrap();
        loop {
            let response = harness.act(BattleAction::Attack).unwrap();
            match enemy_hp(&harness, "s1") {
                Some(hp) => {
                    assert!(hp < last, "seed {seed}: {hp} !< {last}");
                    assert!(last - hp >= 6 && last - hp <= 19);
                    last = hp;
                }
                None => {
                    assert_eq!(outcome_of(&response), Some(BattleOutcome::Victory));
                    break;
                }
            }
        }
    }
}

#[test]
fn test_victory_removes_enemy_and_pays_gold() {
    for seed in 0..50 {
        let mut harness = TestHarness::with_seed(seed);
        harness.set_gold(3).engage("g1");

        let outcome = harness.fight(BattleAction::Attack).unwrap();

        assert_eq!(outcome, Some(BattleOutcome::Victory), "seed {seed}");
        assert_exploring(&harness);
        assert!(enemy_hp(&harness, "g1").is_none());
        assert_eq!(harness.state().enemies.len(), 1);

        let gained = harness.gold() - 3;
        assert!((2..=7).contains(&gained), "seed {seed}: gained {gained}");
    }
}

#[test]
fn test_one_hit_kill() {
    let mut harness = TestHarness::new();
    harness
        .place_enemy("rat", EnemyKind::Goblin, Position::new(2, 1), 6)
        .engage("rat");

    let response = harness.act(BattleAction::Attack).unwrap();

    assert_eq!(outcome_of(&response), Some(BattleOutcome::Victory));
    assert_eq!(response.cues, vec![Cue::Attack, Cue::Win]);
    assert_eq!(response.messages.last().unwrap(), "You won! Gained gold.");
    assert!(!response
        .effects
        .iter()
        .any(|e| matches!(e, Effect::PlayerDamaged { .. })));
    assert_eq!(harness.state().player.hp, 100);
}

#[test]
fn test_enemy_strikes_back() {
    let mut harness = TestHarness::new();
    harness
        .place_enemy("ogre", EnemyKind::Skeleton, Position::new(2, 1), 500)
        .engage("ogre");

    let response = harness.act(BattleAction::Attack).unwrap();

    assert_eq!(response.cues, vec![Cue::Attack]);
    let lost = 100 - harness.state().player.hp;
    assert!((4..=15).contains(&lost));
    assert!(response
        .messages
        .iter()
        .any(|m| m == &format!("The skeleton hits you for {lost}.")));
    assert_in_battle_with(&harness, "ogre");
}

// =============================================================================
// Defending and running
// =============================================================================

#[test]
fn test_defend_does_not_hurt_enemy() {
    let mut harness = TestHarness::new();
    harness.engage("g1");

    let response = harness.act(BattleAction::Defend).unwrap();

    assert_eq!(enemy_hp(&harness, "g1"), Some(30));
    assert!(response.cues.is_empty());
    assert_eq!(response.messages[0], "You brace yourself.");
    assert!(harness.state().player.hp < 100);
}

#[test]
fn test_running_eventually_escapes_and_leaves_enemy() {
    let mut harness = TestHarness::with_seed(11);
    harness.set_hp(10_000).engage("g1");

    let outcome = harness.fight(BattleAction::Run).unwrap();

    assert_eq!(outcome, Some(BattleOutcome::Escaped));
    assert_exploring(&harness);
    assert_eq!(enemy_hp(&harness, "g1"), Some(30));
    assert_eq!(
        harness.session.battle_view(),
        None,
        "no battle view after escaping"
    );
}

#[test]
fn test_defeat_returns_to_exploring() {
    let mut harness = TestHarness::new();
    harness.set_hp(1).engage("g1");

    let response = harness.act(BattleAction::Defend).unwrap();

    assert_eq!(outcome_of(&response), Some(BattleOutcome::Defeat));
    assert_eq!(
        response.messages.last().unwrap(),
        "You were defeated..."
    );
    assert_exploring(&harness);
    assert!(harness.state().player.hp <= 0);
    assert_eq!(enemy_hp(&harness, "g1"), Some(30));
}

// =============================================================================
// Guards
// =============================================================================

#[test]
fn test_battle_action_outside_battle() {
    let mut harness = TestHarness::new();
    assert!(matches!(
        harness.act(BattleAction::Attack),
        Err(SessionError::NotInBattle)
    ));
    assert_eq!(harness.state().player.hp, 100);
}

#[test]
fn test_vanished_enemy_ends_battle() {
    let mut harness = TestHarness::new();
    harness.engage("nobody");

    let response = harness.act(BattleAction::Attack).unwrap();

    assert_eq!(outcome_of(&response), Some(BattleOutcome::Escaped));
    assert_exploring(&harness);
}
