//! Startup content: dialogue trees and quest definitions.
//!
//! Content is read once before the first frame and treated as read-only
//! afterwards. It comes either from a data directory holding
//! `dialogues.json` and `quests.json`, or from the copies compiled into the
//! crate.

use crate::dialogue::DialogueLibrary;
use crate::quest::QuestBook;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// File name of the dialogue data.
pub const DIALOGUES_FILE: &str = "dialogues.json";

/// File name of the quest data.
pub const QUESTS_FILE: &str = "quests.json";

const BUILTIN_DIALOGUES: &str = include_str!("../data/dialogues.json");
const BUILTIN_QUESTS: &str = include_str!("../data/quests.json");

/// Errors from loading content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the session reads from data files.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub dialogues: DialogueLibrary,
    pub quests: QuestBook,
}

impl Content {
    /// Parse the content pack compiled into the crate.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN_DIALOGUES, BUILTIN_QUESTS)
    }

    /// Parse content from JSON text.
    pub fn from_json(dialogues: &str, quests: &str) -> Result<Self, ContentError> {
        let content = Self {
            dialogues: parse(Path::new(DIALOGUES_FILE), dialogues)?,
            quests: parse(Path::new(QUESTS_FILE), quests)?,
        };
        content.report_problems();
        Ok(content)
    }

    /// Load `dialogues.json` and `quests.json` from `dir`, in that order.
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let dialogues_path = dir.join(DIALOGUES_FILE);
        let quests_path = dir.join(QUESTS_FILE);

        let dialogues = read(&dialogues_path).await?;
        let quests = read(&quests_path).await?;

        let content = Self {
            dialogues: parse(&dialogues_path, &dialogues)?,
            quests: parse(&quests_path, &quests)?,
        };

        tracing::info!(
            dir = %dir.display(),
            dialogues = content.dialogues.len(),
            quests = content.quests.len(),
            "content loaded"
        );
        content.report_problems();
        Ok(content)
    }

    /// Log authoring mistakes that are not fatal at load time.
    fn report_problems(&self) {
        for dangling in self.dialogues.validate() {
            tracing::warn!(
                tree = %dangling.tree,
                line = %dangling.line,
                target = %dangling.target,
                "dialogue option points at a missing line"
            );
        }
        for quest in self.quests.iter() {
            if !matches!(quest.goal.gold, Some(threshold) if threshold > 0) {
                tracing::warn!(quest = %quest.id, "quest has no supported goal and can never complete");
            }
        }
    }
}

async fn read(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path)
        .await
        .map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, text: &str) -> Result<T, ContentError> {
    serde_json::from_str(text).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}
