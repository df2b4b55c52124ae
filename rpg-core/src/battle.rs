//! Turn-based battle resolution with an Action/Effect pipeline.
//!
//! 1. The player picks a [`BattleAction`]
//! 2. [`BattleEngine::resolve`] rolls the dice against a read-only view of
//!    the state and produces a [`Resolution`]
//! 3. [`apply_effects`] commits the effects to the [`GameState`]
//!
//! Keeping resolution pure means a turn can be inspected (or logged) before
//! anything changes, and a seeded RNG replays it exactly.

use crate::actors::{Enemy, EnemyId, EnemyKind};
use crate::dice::{
    chance, defend_self_damage, RollResult, ATTACK_DAMAGE, DEFEND_ROLL, ENEMY_DAMAGE,
    ESCAPE_THRESHOLD, VICTORY_GOLD,
};
use crate::world::GameState;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the player does on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleAction {
    Attack,
    Defend,
    Run,
}

impl BattleAction {
    pub fn name(&self) -> &'static str {
        match self {
            BattleAction::Attack => "attack",
            BattleAction::Defend => "defend",
            BattleAction::Run => "run",
        }
    }
}

impl fmt::Display for BattleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a battle finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Escaped,
}

impl BattleOutcome {
    /// Message shown when the battle closes.
    pub fn message(&self) -> &'static str {
        match self {
            BattleOutcome::Victory => "You won! Gained gold.",
            BattleOutcome::Defeat => "You were defeated...",
            BattleOutcome::Escaped => "You escaped!",
        }
    }
}

/// A concrete state change produced by resolving an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// A roll happened
    DiceRolled { roll: RollResult, purpose: String },

    /// Enemy lost hp
    EnemyDamaged {
        enemy_id: EnemyId,
        amount: i32,
        remaining: i32,
    },

    /// Player lost hp (the new value may be negative)
    PlayerDamaged {
        amount: i32,
        new_hp: i32,
        source: String,
    },

    /// Victory payout
    GoldGained { amount: u32, new_total: u32 },

    /// Battle is over; mode returns to exploration
    BattleEnded { outcome: BattleOutcome },
}

/// The result of resolving one action.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub effects: Vec<Effect>,
    pub narrative: Vec<String>,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.narrative.push(line.into());
        self
    }

    /// The outcome, if this resolution closes the battle.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.effects.iter().find_map(|e| match e {
            Effect::BattleEnded { outcome } => Some(*outcome),
            _ => None,
        })
    }

    fn end(self, outcome: BattleOutcome) -> Self {
        self.with_effect(Effect::BattleEnded { outcome })
            .with_line(outcome.message())
    }
}

/// Render-ready summary of the engaged enemy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleView {
    pub enemy_id: EnemyId,
    pub kind: EnemyKind,
    pub hp: i32,
}

impl BattleView {
    pub fn from_state(state: &GameState) -> Option<Self> {
        state.current_enemy().map(|e| Self {
            enemy_id: e.id.clone(),
            kind: e.kind,
            hp: e.hp,
        })
    }

    /// Enemy info line, with hp clamped at zero for display.
    pub fn info(&self) -> String {
        format!("{} HP: {}", self.kind, self.hp.max(0))
    }
}

/// Resolves battle actions into effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct BattleEngine;

impl BattleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Resolve one player action against the engaged enemy.
    pub fn resolve<R: Rng>(
        &self,
        state: &GameState,
        action: BattleAction,
        rng: &mut R,
    ) -> Resolution {
        let Some(enemy) = state.current_enemy() else {
            return Resolution::new()
                .with_line("There is no one left to fight.")
                .end(BattleOutcome::Escaped);
        };

        match action {
            BattleAction::Attack => self.resolve_attack(state, enemy, rng),
            BattleAction::Defend => self.resolve_defend(state, enemy, rng),
            BattleAction::Run => self.resolve_run(state, enemy, rng),
        }
    }

    fn resolve_attack<R: Rng>(&self, state: &GameState, enemy: &Enemy, rng: &mut R) -> Resolution {
        let roll = ATTACK_DAMAGE.roll_with_rng(rng);
        let remaining = enemy.hp - roll.value;

        let resolution = Resolution::new()
            .with_effect(Effect::DiceRolled {
                roll,
                purpose: "Attack damage".to_string(),
            })
            .with_effect(Effect::EnemyDamaged {
                enemy_id: enemy.id.clone(),
                amount: roll.value,
                remaining,
            })
            .with_line(format!(
                "You hit the {} for {}. {} HP: {}",
                enemy.kind,
                roll.value,
                enemy.kind,
                remaining.max(0)
            ));

        if remaining <= 0 {
            let gold = VICTORY_GOLD.roll_with_rng(rng);
            let amount = gold.value.max(0) as u32;
            return resolution
                .with_effect(Effect::DiceRolled {
                    roll: gold,
                    purpose: "Victory gold".to_string(),
                })
                .with_effect(Effect::GoldGained {
                    amount,
                    new_total: state.player.gold.saturating_add(amount),
                })
                .end(BattleOutcome::Victory);
        }

        self.enemy_attack(resolution, enemy, state.player.hp, rng)
    }

    fn resolve_defend<R: Rng>(&self, state: &GameState, enemy: &Enemy, rng: &mut R) -> Resolution {
        let roll = DEFEND_ROLL.roll_with_rng(rng);
        let self_damage = defend_self_damage(&roll);
        let hp = state.player.hp - self_damage;

        let mut resolution = Resolution::new()
            .with_effect(Effect::DiceRolled {
                roll,
                purpose: "Defend".to_string(),
            })
            .with_line("You brace yourself.");

        if self_damage > 0 {
            resolution = resolution
                .with_effect(Effect::PlayerDamaged {
                    amount: self_damage,
                    new_hp: hp,
                    source: "strain".to_string(),
                })
                .with_line(format!("The strain costs you {self_damage} HP."));
        }

        self.enemy_attack(resolution, enemy, hp, rng)
    }

    fn resolve_run<R: Rng>(&self, state: &GameState, enemy: &Enemy, rng: &mut R) -> Resolution {
        if chance(rng) > ESCAPE_THRESHOLD {
            return Resolution::new().end(BattleOutcome::Escaped);
        }

        let resolution = Resolution::new().with_line("You failed to get away.");
        self.enemy_attack(resolution, enemy, state.player.hp, rng)
    }

    /// Enemy counter-attack against a player currently at `player_hp`.
    fn enemy_attack<R: Rng>(
        &self,
        resolution: Resolution,
        enemy: &Enemy,
        player_hp: i32,
        rng: &mut R,
    ) -> Resolution {
        let roll = ENEMY_DAMAGE.roll_with_rng(rng);
        let new_hp = player_hp - roll.value;

        let resolution = resolution
            .with_effect(Effect::DiceRolled {
                roll,
                purpose: format!("{} attack", enemy.kind),
            })
            .with_effect(Effect::PlayerDamaged {
                amount: roll.value,
                new_hp,
                source: enemy.kind.to_string(),
            })
            .with_line(format!("The {} hits you for {}.", enemy.kind, roll.value));

        if new_hp <= 0 {
            return resolution.end(BattleOutcome::Defeat);
        }
        resolution
    }
}

/// Apply effects to the game state.
pub fn apply_effects(state: &mut GameState, effects: &[Effect]) {
    for effect in effects {
        apply_effect(state, effect);
    }
}

/// Apply a single effect to the game state.
pub fn apply_effect(state: &mut GameState, effect: &Effect) {
    match effect {
        Effect::DiceRolled { roll, purpose } => {
            tracing::debug!(%roll, purpose = %purpose, "dice rolled");
        }
        Effect::EnemyDamaged {
            enemy_id, amount, ..
        } => {
            if let Some(enemy) = state.enemy_mut(enemy_id) {
                enemy.take_damage(*amount);
            }
        }
        Effect::PlayerDamaged { amount, .. } => {
            state.player.take_damage(*amount);
        }
        Effect::GoldGained { amount, .. } => {
            state.player.add_gold(*amount);
        }
        Effect::BattleEnded { outcome } => {
            tracing::info!(?outcome, "battle ended");
            state.end_battle();
        }
    }
}
