//! Testing utilities for the game.
//!
//! This module provides tools for integration testing:
//! - `TestHarness` for scripted scenarios on a seeded session
//! - Fixture content and state setters for tuned encounters
//! - Assertion helpers for verifying game state

use crate::actors::{Enemy, EnemyId, EnemyKind};
use crate::battle::{BattleAction, BattleOutcome};
use crate::content::Content;
use crate::dialogue::{DialogueLibrary, DialogueOption, DialogueTree, Goto, Line};
use crate::grid::{Direction, Position};
use crate::persist::MemorySaveStore;
use crate::quest::{QuestBook, QuestDef};
use crate::session::{GameSession, Response, SessionError};
use crate::world::{GameState, Mode};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seed used when none is given.
pub const DEFAULT_TEST_SEED: u64 = 0x5eed;

/// Upper bound on battle turns in [`TestHarness::fight`].
pub const MAX_BATTLE_TURNS: usize = 100;

/// Test harness wrapping a seeded session with an in-memory save store.
pub struct TestHarness {
    pub session: GameSession,
}

impl TestHarness {
    /// Built-in content, default seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_TEST_SEED)
    }

    pub fn with_seed(seed: u64) -> Self {
        let content = Content::builtin().expect("built-in content parses");
        Self::with_content(content, seed)
    }

    pub fn with_content(content: Content, seed: u64) -> Self {
        let session = GameSession::with_content(content, StdRng::seed_from_u64(seed))
            .with_store(MemorySaveStore::new());
        Self { session }
    }

    pub fn state(&self) -> &GameState {
        self.session.state()
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        self.session.state_mut()
    }

    pub fn mode(&self) -> &Mode {
        self.session.mode()
    }

    pub fn position(&self) -> Position {
        self.session.state().player.position
    }

    pub fn gold(&self) -> u32 {
        self.session.state().player.gold
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Put the player on `pos` without any checks.
    pub fn teleport(&mut self, pos: Position) -> &mut Self {
        self.state_mut().player.position = pos;
        self
    }

    pub fn set_gold(&mut self, gold: u32) -> &mut Self {
        self.state_mut().player.gold = gold;
        self
    }

    pub fn set_hp(&mut self, hp: i32) -> &mut Self {
        self.state_mut().player.hp = hp;
        self
    }

    /// Add an enemy to the roster.
    pub fn place_enemy(
        &mut self,
        id: &str,
        kind: EnemyKind,
        pos: Position,
        hp: i32,
    ) -> &mut Self {
        self.state_mut().enemies.push(Enemy::new(id, kind, pos, hp));
        self
    }

    /// Start a battle directly with `id`.
    pub fn engage(&mut self, id: &str) -> &mut Self {
        self.state_mut().start_battle(EnemyId::new(id));
        self
    }

    // ========================================================================
    // Driving
    // ========================================================================

    pub fn step(&mut self, direction: Direction) -> Response {
        self.session.move_player(direction)
    }

    /// Take each step in order, returning all responses.
    pub fn walk(&mut self, directions: &[Direction]) -> Vec<Response> {
        directions.iter().map(|d| self.step(*d)).collect()
    }

    pub fn choose(&mut self, index: usize) -> Result<Response, SessionError> {
        self.session.choose_option(index)
    }

    pub fn act(&mut self, action: BattleAction) -> Result<Response, SessionError> {
        self.session.battle_action(action)
    }

    /// Repeat `action` until the battle ends, returning the outcome.
    ///
    /// Returns `None` if the battle is still running after
    /// [`MAX_BATTLE_TURNS`] turns.
    pub fn fight(&mut self, action: BattleAction) -> Result<Option<BattleOutcome>, SessionError> {
        for _ in 0..MAX_BATTLE_TURNS {
            let response = self.act(action)?;
            if let Some(outcome) = outcome_of(&response) {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// The battle outcome carried by a response, if any.
pub fn outcome_of(response: &Response) -> Option<BattleOutcome> {
    response.effects.iter().find_map(|effect| match effect {
        crate::battle::Effect::BattleEnded { outcome } => Some(*outcome),
        _ => None,
    })
}

// ============================================================================
// Fixtures
// ============================================================================

/// A one-line tree whose only option ends the conversation.
pub fn farewell_tree(text: &str) -> DialogueTree {
    DialogueTree {
        lines: vec![Line {
            id: "start".to_string(),
            text: text.to_string(),
            options: vec![DialogueOption {
                text: "Goodbye".to_string(),
                goto: Goto::End,
            }],
        }],
    }
}

/// Content with the given trees and one gold quest per `(id, threshold, reward)`.
pub fn fixture_content(
    trees: Vec<(&str, DialogueTree)>,
    quests: &[(&str, u32, &str)],
) -> Content {
    let mut dialogues = DialogueLibrary::new();
    for (name, tree) in trees {
        dialogues.insert(name, tree);
    }

    let mut book = QuestBook::new();
    for (id, gold, reward) in quests {
        book.insert(QuestDef::new(
            *id,
            format!("Quest {id}"),
            crate::quest::QuestGoal::gold(*gold),
            *reward,
        ));
    }

    Content {
        dialogues,
        quests: book,
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the player stands on `pos`.
#[track_caller]
pub fn assert_position(harness: &TestHarness, pos: Position) {
    let actual = harness.position();
    assert_eq!(actual, pos, "Expected player at {pos}, got {actual}");
}

/// Assert the session is exploring.
#[track_caller]
pub fn assert_exploring(harness: &TestHarness) {
    assert!(
        harness.mode().is_exploring(),
        "Expected to be exploring, mode is {}",
        harness.mode()
    );
}

/// Assert a battle against `enemy` is running.
#[track_caller]
pub fn assert_in_battle_with(harness: &TestHarness, enemy: &str) {
    match harness.mode() {
        Mode::InBattle { enemy: id } => assert_eq!(id.as_str(), enemy),
        other => panic!("Expected battle with {enemy}, mode is {other}"),
    }
}

/// Assert a conversation with `npc` is open.
#[track_caller]
pub fn assert_in_dialogue_with(harness: &TestHarness, npc: &str) {
    match harness.mode() {
        Mode::InDialogue(dialogue) => assert_eq!(dialogue.npc.as_str(), npc),
        other => panic!("Expected dialogue with {npc}, mode is {other}"),
    }
}
