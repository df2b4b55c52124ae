//! The aggregate game state.
//!
//! `GameState` is the single unit of save and restore: player, enemy roster,
//! NPCs, the tile map, the current mode and the active-quest records.

use crate::actors::{starting_enemies, starting_npcs, Enemy, EnemyId, Npc, Player};
use crate::dialogue::DialogueState;
use crate::grid::{Position, TileMap};
use crate::quest::ActiveQuests;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the player is currently doing. Exactly one mode is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Exploring,
    InDialogue(DialogueState),
    InBattle { enemy: EnemyId },
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Exploring => "Exploring",
            Mode::InDialogue(_) => "Dialogue",
            Mode::InBattle { .. } => "Battle",
        }
    }

    pub fn is_exploring(&self) -> bool {
        matches!(self, Mode::Exploring)
    }

    pub fn in_battle(&self) -> bool {
        matches!(self, Mode::InBattle { .. })
    }

    pub fn in_dialogue(&self) -> bool {
        matches!(self, Mode::InDialogue(_))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub npcs: Vec<Npc>,
    pub map: TileMap,
    pub mode: Mode,
    pub active_quests: ActiveQuests,
}

impl GameState {
    /// A fresh game: generated map, starting roster, player at (1, 1).
    pub fn new() -> Self {
        Self {
            player: Player::default(),
            enemies: starting_enemies(),
            npcs: starting_npcs(),
            map: TileMap::generate(),
            mode: Mode::Exploring,
            active_quests: ActiveQuests::new(),
        }
    }

    /// True if the cell is off the map, wall or water, or held by a live enemy.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.map.is_terrain_blocked(pos) || self.enemy_at(pos).is_some()
    }

    pub fn npc_at(&self, pos: Position) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.position == pos)
    }

    /// The live enemy standing on `pos`, if any.
    pub fn enemy_at(&self, pos: Position) -> Option<&Enemy> {
        self.enemies
            .iter()
            .find(|e| e.position == pos && e.is_alive())
    }

    pub fn enemy(&self, id: &EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| &e.id == id)
    }

    pub fn enemy_mut(&mut self, id: &EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| &e.id == id)
    }

    /// The enemy currently engaged, if a battle is running.
    pub fn current_enemy(&self) -> Option<&Enemy> {
        match &self.mode {
            Mode::InBattle { enemy } => self.enemy(enemy),
            _ => None,
        }
    }

    pub fn start_battle(&mut self, enemy: EnemyId) {
        self.mode = Mode::InBattle { enemy };
    }

    /// Leave battle and drop every enemy that is no longer alive.
    pub fn end_battle(&mut self) {
        self.mode = Mode::Exploring;
        self.enemies.retain(Enemy::is_alive);
    }

    pub fn start_dialogue(&mut self, state: DialogueState) {
        self.mode = Mode::InDialogue(state);
    }

    pub fn end_dialogue(&mut self) {
        if self.mode.in_dialogue() {
            self.mode = Mode::Exploring;
        }
    }

    /// Number of quests marked completed.
    pub fn quests_completed(&self) -> usize {
        self.active_quests.values().filter(|q| q.completed).count()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
