//! Render-facing snapshot of the player's status.

use crate::battle::BattleView;
use crate::world::GameState;

/// Everything the HUD shows, copied out of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub hp: i32,
    pub gold: u32,
    pub level: u32,
    pub inventory: Vec<String>,
    /// One label per active quest, `"<title> (Done)"` once completed.
    pub quests: Vec<String>,
    pub mode: &'static str,
    /// Enemy info line while a battle is running.
    pub enemy: Option<String>,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            hp: state.player.hp,
            gold: state.player.gold,
            level: state.player.level,
            inventory: state.player.inventory.clone(),
            quests: state.active_quests.values().map(|q| q.label()).collect(),
            mode: state.mode.name(),
            enemy: BattleView::from_state(state).map(|v| v.info()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::EnemyId;
    use crate::quest::{ActiveQuest, QuestId};

    #[test]
    fn test_hud_exploring() {
        let mut state = GameState::new();
        state.player.gold = 7;
        state.player.add_item("Healing Herb");
        state.active_quests.insert(
            QuestId::new("q_gold"),
            ActiveQuest {
                title: "Pocket Money".to_string(),
                completed: true,
            },
        );

        let hud = Hud::from_state(&state);
        assert_eq!(hud.hp, 100);
        assert_eq!(hud.gold, 7);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.inventory, vec!["Healing Herb"]);
        assert_eq!(hud.quests, vec!["Pocket Money (Done)"]);
        assert_eq!(hud.mode, "Exploring");
        assert_eq!(hud.enemy, None);
    }

    #[test]
    fn test_hud_in_battle() {
        let mut state = GameState::new();
        state.start_battle(EnemyId::new("s1"));
        let hud = Hud::from_state(&state);
        assert_eq!(hud.mode, "Battle");
        assert_eq!(hud.enemy.as_deref(), Some("skeleton HP: 40"));
    }
}
