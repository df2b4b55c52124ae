//! Dialogue trees and the traversal state machine.
//!
//! A tree is an ordered list of lines. Each line offers options whose `goto`
//! either names another line in the same tree or ends the conversation.
//! Traversal is pure: [`DialogueLibrary::choose`] never mutates the state it
//! is given, so a failed choice leaves the conversation where it was.

use crate::actors::{Npc, NpcId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Goto value that closes the conversation.
pub const END_MARKER: &str = "end";

/// Errors from dialogue traversal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogueError {
    #[error("No dialogue tree named '{0}'")]
    UnknownTree(String),

    #[error("Dialogue tree '{0}' has no lines")]
    EmptyTree(String),

    #[error("Line '{line}' has no option {index}")]
    NoSuchOption { line: String, index: usize },

    #[error("Dialogue tree '{tree}' has no line '{line}'")]
    MissingLine { tree: String, line: String },
}

// ============================================================================
// Content types
// ============================================================================

/// Where an option leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Goto {
    Line(String),
    End,
}

impl From<String> for Goto {
    fn from(value: String) -> Self {
        if value == END_MARKER {
            Goto::End
        } else {
            Goto::Line(value)
        }
    }
}

impl From<Goto> for String {
    fn from(value: Goto) -> Self {
        match value {
            Goto::Line(id) => id,
            Goto::End => END_MARKER.to_string(),
        }
    }
}

/// A selectable reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueOption {
    pub text: String,
    pub goto: Goto,
}

/// One node of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<DialogueOption>,
}

/// A full conversation. The first line is the entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTree {
    pub lines: Vec<Line>,
}

impl DialogueTree {
    pub fn first_line(&self) -> Option<&Line> {
        self.lines.first()
    }

    pub fn line(&self, id: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }
}

// ============================================================================
// State machine
// ============================================================================

/// Position inside an active conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    /// Tree name in the library.
    pub tree: String,
    pub line_id: String,
    pub npc: NpcId,
}

/// Result of picking an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Conversation continues at a new line.
    Advance(DialogueState),
    /// The option ended the conversation.
    End,
}

/// Render-ready view of the current line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueView {
    pub npc: NpcId,
    pub text: String,
    pub options: Vec<String>,
}

/// An option whose goto names a line that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingGoto {
    pub tree: String,
    pub line: String,
    pub target: String,
}

/// All dialogue trees, keyed by tree name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueLibrary {
    trees: BTreeMap<String, DialogueTree>,
}

impl DialogueLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, tree: DialogueTree) {
        self.trees.insert(name.into(), tree);
    }

    pub fn tree(&self, name: &str) -> Option<&DialogueTree> {
        self.trees.get(name)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Open the NPC's tree at its first line.
    pub fn start(&self, npc: &Npc) -> Result<DialogueState, DialogueError> {
        let tree = self
            .tree(&npc.dialogue)
            .ok_or_else(|| DialogueError::UnknownTree(npc.dialogue.clone()))?;
        let first = tree
            .first_line()
            .ok_or_else(|| DialogueError::EmptyTree(npc.dialogue.clone()))?;

        Ok(DialogueState {
            tree: npc.dialogue.clone(),
            line_id: first.id.clone(),
            npc: npc.id.clone(),
        })
    }

    /// The line the state currently points at.
    pub fn current_line(&self, state: &DialogueState) -> Result<&Line, DialogueError> {
        let tree = self
            .tree(&state.tree)
            .ok_or_else(|| DialogueError::UnknownTree(state.tree.clone()))?;
        tree.line(&state.line_id)
            .ok_or_else(|| DialogueError::MissingLine {
                tree: state.tree.clone(),
                line: state.line_id.clone(),
            })
    }

    /// Pick option `index` (zero-based) at the current line.
    ///
    /// A goto that names a missing line is reported as
    /// [`DialogueError::MissingLine`] instead of silently ending the talk.
    pub fn choose(&self, state: &DialogueState, index: usize) -> Result<Choice, DialogueError> {
        let line = self.current_line(state)?;
        let option = line
            .options
            .get(index)
            .ok_or_else(|| DialogueError::NoSuchOption {
                line: line.id.clone(),
                index,
            })?;

        match &option.goto {
            Goto::End => Ok(Choice::End),
            Goto::Line(target) => {
                let next = DialogueState {
                    line_id: target.clone(),
                    ..state.clone()
                };
                // Resolve eagerly so a dangling target fails here.
                self.current_line(&next)?;
                Ok(Choice::Advance(next))
            }
        }
    }

    pub fn view(&self, state: &DialogueState) -> Result<DialogueView, DialogueError> {
        let line = self.current_line(state)?;
        Ok(DialogueView {
            npc: state.npc.clone(),
            text: line.text.clone(),
            options: line.options.iter().map(|o| o.text.clone()).collect(),
        })
    }

    /// Every option that points at a line missing from its tree.
    pub fn validate(&self) -> Vec<DanglingGoto> {
        let mut dangling = Vec::new();
        for (name, tree) in &self.trees {
            for line in &tree.lines {
                for option in &line.options {
                    if let Goto::Line(target) = &option.goto {
                        if tree.line(target).is_none() {
                            dangling.push(DanglingGoto {
                                tree: name.clone(),
                                line: line.id.clone(),
                                target: target.clone(),
                            });
                        }
                    }
                }
            }
        }
        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    fn sample_library() -> DialogueLibrary {
        let json = r#"{
            "elder": {
                "lines": [
                    {"id": "greet", "text": "Welcome.", "options": [
                        {"text": "Tell me more", "goto": "lore"},
                        {"text": "Bye", "goto": "end"}
                    ]},
                    {"id": "lore", "text": "Goblins roam east.", "options": [
                        {"text": "Again", "goto": "greet"},
                        {"text": "Broken", "goto": "nowhere"},
                        {"text": "Thanks", "goto": "end"}
                    ]}
                ]
            },
            "mute": {"lines": []}
        }"#;
        serde_json::from_str(json).unwrap()
    }

    fn elder() -> Npc {
        Npc::new("npc_1", Position::new(3, 3), "elder")
    }

    #[test]
    fn test_goto_parsing() {
        let option: DialogueOption =
            serde_json::from_str(r#"{"text": "x", "goto": "end"}"#).unwrap();
        assert_eq!(option.goto, Goto::End);

        let option: DialogueOption =
            serde_json::from_str(r#"{"text": "x", "goto": "lore"}"#).unwrap();
        assert_eq!(option.goto, Goto::Line("lore".to_string()));

        let json = serde_json::to_string(&Goto::End).unwrap();
        assert_eq!(json, "\"end\"");
    }

    #[test]
    fn test_start_at_first_line() {
        let library = sample_library();
        let state = library.start(&elder()).unwrap();
        assert_eq!(state.tree, "elder");
        assert_eq!(state.line_id, "greet");
        assert_eq!(state.npc.as_str(), "npc_1");
    }

    #[test]
    fn test_start_unknown_or_empty_tree() {
        let library = sample_library();
        let stranger = Npc::new("npc_9", Position::new(1, 1), "missing");
        assert_eq!(
            library.start(&stranger),
            Err(DialogueError::UnknownTree("missing".to_string()))
        );

        let mute = Npc::new("npc_8", Position::new(1, 1), "mute");
        assert_eq!(
            library.start(&mute),
            Err(DialogueError::EmptyTree("mute".to_string()))
        );
    }

    #[test]
    fn test_choose_advances_and_loops() {
        let library = sample_library();
        let state = library.start(&elder()).unwrap();

        let Choice::Advance(state) = library.choose(&state, 0).unwrap() else {
            panic!("expected to advance");
        };
        assert_eq!(state.line_id, "lore");

        // Cycles are allowed; traversal is bounded by the player.
        let Choice::Advance(state) = library.choose(&state, 0).unwrap() else {
            panic!("expected to advance");
        };
        assert_eq!(state.line_id, "greet");
    }

    #[test]
    fn test_choose_end() {
        let library = sample_library();
        let state = library.start(&elder()).unwrap();
        assert_eq!(library.choose(&state, 1).unwrap(), Choice::End);
    }

    #[test]
    fn test_choose_out_of_range() {
        let library = sample_library();
        let state = library.start(&elder()).unwrap();
        assert_eq!(
            library.choose(&state, 5),
            Err(DialogueError::NoSuchOption {
                line: "greet".to_string(),
                index: 5
            })
        );
    }

    #[test]
    fn test_choose_missing_target_fails() {
        let library = sample_library();
        let state = DialogueState {
            tree: "elder".to_string(),
            line_id: "lore".to_string(),
            npc: NpcId::new("npc_1"),
        };
        assert_eq!(
            library.choose(&state, 1),
            Err(DialogueError::MissingLine {
                tree: "elder".to_string(),
                line: "nowhere".to_string()
            })
        );
    }

    #[test]
    fn test_view() {
        let library = sample_library();
        let state = library.start(&elder()).unwrap();
        let view = library.view(&state).unwrap();
        assert_eq!(view.text, "Welcome.");
        assert_eq!(view.options, vec!["Tell me more", "Bye"]);
    }

    #[test]
    fn test_validate_reports_dangling() {
        let library = sample_library();
        let dangling = library.validate();
        assert_eq!(
            dangling,
            vec![DanglingGoto {
                tree: "elder".to_string(),
                line: "lore".to_string(),
                target: "nowhere".to_string(),
            }]
        );
    }
}
