//! Quest definitions and goal evaluation.
//!
//! Quests are declarative: a goal predicate over the player and a single
//! reward item. Evaluation is idempotent because a quest that already has an
//! entry in the active-quest map is never considered again.

use crate::actors::Player;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a quest (e.g. `"q_gold"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestId(pub String);

impl QuestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Goal predicate. Only the gold threshold is supported; a goal without one,
/// or with a zero threshold, is never satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestGoal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<u32>,
}

impl QuestGoal {
    pub fn gold(threshold: u32) -> Self {
        Self {
            gold: Some(threshold),
        }
    }

    pub fn is_met_by(&self, player: &Player) -> bool {
        match self.gold {
            Some(threshold) if threshold > 0 => player.gold >= threshold,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    pub item: String,
}

/// A quest as authored in content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: QuestId,
    pub title: String,
    pub goal: QuestGoal,
    pub reward: QuestReward,
}

impl QuestDef {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        goal: QuestGoal,
        reward_item: impl Into<String>,
    ) -> Self {
        Self {
            id: QuestId::new(id),
            title: title.into(),
            goal,
            reward: QuestReward {
                item: reward_item.into(),
            },
        }
    }
}

/// Progress record kept in the game state once a quest's goal is first met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuest {
    pub title: String,
    pub completed: bool,
}

impl ActiveQuest {
    /// Label shown in the quest list.
    pub fn label(&self) -> String {
        if self.completed {
            format!("{} (Done)", self.title)
        } else {
            self.title.clone()
        }
    }
}

/// Active quests keyed by quest id.
pub type ActiveQuests = BTreeMap<QuestId, ActiveQuest>;

/// A quest that was completed by the latest evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCompletion {
    pub id: QuestId,
    pub title: String,
    pub reward: String,
}

/// All quest definitions, keyed as in the content file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestBook {
    quests: BTreeMap<String, QuestDef>,
}

impl QuestBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quest: QuestDef) {
        self.quests.insert(quest.id.0.clone(), quest);
    }

    pub fn get(&self, id: &str) -> Option<&QuestDef> {
        self.quests.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestDef> {
        self.quests.values()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Quests whose goal holds and that are not yet recorded.
    pub fn satisfied<'a>(
        &'a self,
        player: &Player,
        active: &ActiveQuests,
    ) -> Vec<&'a QuestDef> {
        self.iter()
            .filter(|q| !active.contains_key(&q.id) && q.goal.is_met_by(player))
            .collect()
    }

    /// Record every newly satisfied quest and hand out its reward.
    pub fn evaluate(&self, player: &mut Player, active: &mut ActiveQuests) -> Vec<QuestCompletion> {
        let completed: Vec<QuestCompletion> = self
            .satisfied(player, active)
            .into_iter()
            .map(|q| QuestCompletion {
                id: q.id.clone(),
                title: q.title.clone(),
                reward: q.reward.item.clone(),
            })
            .collect();

        for completion in &completed {
            active.insert(
                completion.id.clone(),
                ActiveQuest {
                    title: completion.title.clone(),
                    completed: true,
                },
            );
            player.add_item(completion.reward.clone());
        }

        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> QuestBook {
        let json = r#"{
            "q_gold": {"id": "q_gold", "title": "Pocket Money", "goal": {"gold": 5}, "reward": {"item": "Lucky Coin"}},
            "q_rich": {"id": "q_rich", "title": "Treasure Hunter", "goal": {"gold": 20}, "reward": {"item": "Lucky Coin"}},
            "q_odd": {"id": "q_odd", "title": "Unknown Goal", "goal": {}, "reward": {"item": "Nothing"}}
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_book() {
        let book = book();
        assert_eq!(book.len(), 3);
        let quest = book.get("q_gold").unwrap();
        assert_eq!(quest.goal, QuestGoal::gold(5));
        assert_eq!(quest.reward.item, "Lucky Coin");
        assert_eq!(book.get("q_odd").unwrap().goal.gold, None);
    }

    #[test]
    fn test_nothing_below_threshold() {
        let book = book();
        let mut player = Player::default();
        player.gold = 4;
        let mut active = ActiveQuests::new();

        assert!(book.evaluate(&mut player, &mut active).is_empty());
        assert!(active.is_empty());
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_completion_grants_reward_once() {
        let book = book();
        let mut player = Player::default();
        player.gold = 5;
        let mut active = ActiveQuests::new();

        let done = book.evaluate(&mut player, &mut active);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id.as_str(), "q_gold");
        assert_eq!(player.inventory, vec!["Lucky Coin"]);

        // Re-evaluating must not re-fire.
        for _ in 0..3 {
            assert!(book.evaluate(&mut player, &mut active).is_empty());
        }
        assert_eq!(active.len(), 1);
        assert_eq!(player.inventory.len(), 1);
        assert!(active[&QuestId::new("q_gold")].completed);
    }

    #[test]
    fn test_shared_reward_duplicates_in_inventory() {
        let book = book();
        let mut player = Player::default();
        player.gold = 25;
        let mut active = ActiveQuests::new();

        let done = book.evaluate(&mut player, &mut active);
        let ids: Vec<_> = done.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["q_gold", "q_rich"]);
        assert_eq!(player.inventory, vec!["Lucky Coin", "Lucky Coin"]);
    }

    #[test]
    fn test_goal_without_predicate_never_met() {
        let mut player = Player::default();
        player.gold = 1_000;
        assert!(!QuestGoal::default().is_met_by(&player));
    }

    #[test]
    fn test_zero_threshold_never_met() {
        let player = Player::default();
        assert!(!QuestGoal::gold(0).is_met_by(&player));

        let mut rich = Player::default();
        rich.gold = 1_000;
        assert!(!QuestGoal::gold(0).is_met_by(&rich));
    }

    #[test]
    fn test_evaluation_follows_id_order_not_file_order() {
        let json = r#"{
            "q_b": {"id": "q_b", "title": "Second", "goal": {"gold": 1}, "reward": {"item": "B"}},
            "q_a": {"id": "q_a", "title": "First", "goal": {"gold": 1}, "reward": {"item": "A"}}
        }"#;
        let book: QuestBook = serde_json::from_str(json).unwrap();
        let mut player = Player::default();
        player.gold = 1;
        let mut active = ActiveQuests::new();

        let done = book.evaluate(&mut player, &mut active);
        let titles: Vec<_> = done.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(player.inventory, vec!["A", "B"]);
    }

    #[test]
    fn test_label() {
        let quest = ActiveQuest {
            title: "Pocket Money".to_string(),
            completed: true,
        };
        assert_eq!(quest.label(), "Pocket Money (Done)");
    }
}
