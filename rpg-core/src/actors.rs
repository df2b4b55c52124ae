//! Actor records: the player, enemies and NPCs.
//!
//! Lookups are linear scans over small rosters; a map holds at most a few
//! dozen actors so no spatial index is kept.

use crate::grid::{Direction, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ID Types
// ============================================================================

/// Identifier of an enemy, as written in content (e.g. `"g1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyId(pub String);

impl EnemyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an NPC (e.g. `"npc_1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NpcId(pub String);

impl NpcId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Player
// ============================================================================

/// Starting hit points for a new player.
pub const STARTING_HP: i32 = 100;

/// The player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    /// May drop below zero while a blow is being resolved.
    pub hp: i32,
    pub gold: u32,
    pub level: u32,
    /// Item identifiers in pickup order. Duplicates are kept.
    pub inventory: Vec<String>,
}

impl Player {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            hp: STARTING_HP,
            gold: 0,
            level: 1,
            inventory: Vec::new(),
        }
    }

    /// The cell the player would enter by stepping in `direction`.
    pub fn target(&self, direction: Direction) -> Position {
        self.position.step(direction)
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0
    }

    pub fn add_gold(&mut self, amount: u32) -> u32 {
        self.gold = self.gold.saturating_add(amount);
        self.gold
    }

    pub fn add_item(&mut self, item: impl Into<String>) {
        self.inventory.push(item.into());
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|i| i == item)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Position::new(1, 1))
    }
}

// ============================================================================
// Enemies
// ============================================================================

/// Enemy species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Goblin,
    Skeleton,
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Goblin => "goblin",
            EnemyKind::Skeleton => "skeleton",
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A hostile actor. Static on the map until the player bumps into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Position,
    pub hp: i32,
}

impl Enemy {
    pub fn new(id: impl Into<String>, kind: EnemyKind, position: Position, hp: i32) -> Self {
        Self {
            id: EnemyId::new(id),
            kind,
            position,
            hp,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply damage and return the remaining hp (possibly negative).
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.hp -= amount;
        self.hp
    }
}

// ============================================================================
// NPCs
// ============================================================================

/// A friendly character that opens a dialogue tree when bumped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    pub id: NpcId,
    pub position: Position,
    /// Name of the dialogue tree in the loaded content.
    pub dialogue: String,
}

impl Npc {
    pub fn new(id: impl Into<String>, position: Position, dialogue: impl Into<String>) -> Self {
        Self {
            id: NpcId::new(id),
            position,
            dialogue: dialogue.into(),
        }
    }
}

// ============================================================================
// Starting roster
// ============================================================================

/// The enemies placed on a fresh map.
pub fn starting_enemies() -> Vec<Enemy> {
    vec![
        Enemy::new("g1", EnemyKind::Goblin, Position::new(6, 6), 30),
        Enemy::new("s1", EnemyKind::Skeleton, Position::new(10, 4), 40),
    ]
}

/// The NPCs placed on a fresh map.
pub fn starting_npcs() -> Vec<Npc> {
    vec![
        Npc::new("npc_1", Position::new(3, 3), "npc_1"),
        Npc::new("npc_2", Position::new(8, 2), "npc_2"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player() {
        let player = Player::default();
        assert_eq!(player.position, Position::new(1, 1));
        assert_eq!(player.hp, 100);
        assert_eq!(player.gold, 0);
        assert_eq!(player.level, 1);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_player_hp_can_go_negative() {
        let mut player = Player::default();
        player.hp = 5;
        player.take_damage(12);
        assert_eq!(player.hp, -7);
        assert!(player.is_down());
    }

    #[test]
    fn test_inventory_keeps_duplicates() {
        let mut player = Player::default();
        player.add_item("Potion");
        player.add_item("Potion");
        assert_eq!(player.inventory, vec!["Potion", "Potion"]);
        assert!(player.has_item("Potion"));
    }

    #[test]
    fn test_enemy_damage() {
        let mut goblin = Enemy::new("g1", EnemyKind::Goblin, Position::new(6, 6), 10);
        assert!(goblin.is_alive());
        assert_eq!(goblin.take_damage(4), 6);
        assert_eq!(goblin.take_damage(9), -3);
        assert!(!goblin.is_alive());
    }

    #[test]
    fn test_starting_roster() {
        let enemies = starting_enemies();
        assert_eq!(enemies.len(), 2);
        assert_eq!(enemies[0].id.as_str(), "g1");
        assert_eq!(enemies[0].kind, EnemyKind::Goblin);
        assert_eq!(enemies[1].hp, 40);

        let npcs = starting_npcs();
        assert_eq!(npcs[1].position, Position::new(8, 2));
        assert_eq!(npcs[1].dialogue, "npc_2");
    }

    #[test]
    fn test_ids_serialize_as_strings() {
        let json = serde_json::to_string(&EnemyId::new("g1")).unwrap();
        assert_eq!(json, "\"g1\"");
    }
}
