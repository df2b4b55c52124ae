//! GameSession - the controller that owns the game.
//!
//! All state lives in one [`GameState`] owned by the session, and every
//! transition goes through `&mut self`. Inputs are dispatched on the current
//! [`Mode`]: movement while exploring, option picks while in dialogue, and
//! battle actions while fighting.

use crate::battle::{apply_effects, BattleAction, BattleEngine, BattleOutcome, BattleView, Effect};
use crate::content::{Content, ContentError};
use crate::dialogue::{Choice, DialogueError, DialogueView};
use crate::grid::Direction;
use crate::hud::Hud;
use crate::persist::{
    FileSaveStore, MemorySaveStore, PersistError, SaveStore, SavedGame, DEFAULT_SLOT,
};
use crate::quest::QuestCompletion;
use crate::world::{GameState, Mode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;

/// Message shown when an NPC has nothing to say.
pub const PLACEHOLDER_LINE: &str = "...";

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Dialogue error: {0}")]
    Dialogue(#[from] DialogueError),

    #[error("No save found in slot '{0}'")]
    NoSave(String),

    #[error("Not in a dialogue")]
    NotInDialogue,

    #[error("Not in a battle")]
    NotInBattle,
}

/// Configuration for creating a new game session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding `dialogues.json` and `quests.json`.
    /// `None` uses the built-in content.
    pub data_dir: Option<PathBuf>,

    /// Directory for save slots.
    pub save_dir: PathBuf,

    /// Slot used by save and load.
    pub save_slot: String,

    /// Seed for battle rolls. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            data_dir: None,
            save_dir: PathBuf::from("saves"),
            save_slot: DEFAULT_SLOT.to_string(),
            seed: None,
        }
    }

    /// Read `RPG_DATA_DIR`, `RPG_SAVE_DIR`, `RPG_SAVE_SLOT` and `RPG_SEED`.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(dir) = std::env::var("RPG_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(dir) = std::env::var("RPG_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Ok(slot) = std::env::var("RPG_SAVE_SLOT") {
            config.save_slot = slot;
        }
        if let Ok(seed) = std::env::var("RPG_SEED") {
            match seed.parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => tracing::warn!(value = %seed, "ignoring non-numeric RPG_SEED"),
            }
        }
        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    pub fn with_save_slot(mut self, slot: impl Into<String>) -> Self {
        self.save_slot = slot.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// An audio event for the frontend to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Attack,
    Win,
    MusicOn,
    MusicOff,
}

/// What happened as a result of one input.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Lines for the message panel.
    pub messages: Vec<String>,

    /// Audio cues, in order.
    pub cues: Vec<Cue>,

    /// Battle effects that were applied.
    pub effects: Vec<Effect>,

    /// Quests completed by this input.
    pub completed_quests: Vec<QuestCompletion>,

    /// Whether a quest evaluation pass ran.
    pub quests_evaluated: bool,
}

impl Response {
    fn message(text: impl Into<String>) -> Self {
        Self {
            messages: vec![text.into()],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.cues.is_empty() && self.effects.is_empty()
    }
}

/// A game session.
///
/// Construction finishes all content loading, so a session that exists is
/// ready for input.
pub struct GameSession {
    state: GameState,
    content: Content,
    engine: BattleEngine,
    rng: StdRng,
    store: Box<dyn SaveStore>,
    slot: String,
    music_on: bool,
}

impl GameSession {
    /// Load content, build the world and open the save store.
    pub async fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let content = match &config.data_dir {
            Some(dir) => Content::load_dir(dir).await?,
            None => Content::builtin()?,
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            save_dir = %config.save_dir.display(),
            slot = %config.save_slot,
            seeded = config.seed.is_some(),
            "session ready"
        );

        Ok(Self::with_content(content, rng)
            .with_store(FileSaveStore::new(config.save_dir))
            .with_slot(config.save_slot))
    }

    /// Build a session from already-loaded content, saving to memory.
    pub fn with_content(content: Content, rng: StdRng) -> Self {
        Self {
            state: GameState::new(),
            content,
            engine: BattleEngine::new(),
            rng,
            store: Box::new(MemorySaveStore::new()),
            slot: DEFAULT_SLOT.to_string(),
            music_on: false,
        }
    }

    pub fn with_store(mut self, store: impl SaveStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    // ========================================================================
    // Exploration
    // ========================================================================

    /// Step one cell. Bumping an NPC opens dialogue, bumping a live enemy
    /// starts a battle, anything else blocked is ignored.
    pub fn move_player(&mut self, direction: Direction) -> Response {
        match &self.state.mode {
            Mode::InBattle { .. } => {
                tracing::debug!(%direction, "move ignored during battle");
                return Response::default();
            }
            Mode::InDialogue(dialogue) => {
                tracing::debug!(npc = %dialogue.npc, "dialogue abandoned by moving away");
                self.state.end_dialogue();
            }
            Mode::Exploring => {}
        }

        let target = self.state.player.target(direction);

        if let Some(npc) = self.state.npc_at(target).cloned() {
            return self.open_dialogue(&npc);
        }

        if self.state.is_blocked(target) {
            if let Some(enemy) = self.state.enemy_at(target) {
                let id = enemy.id.clone();
                let kind = enemy.kind;
                let info = format!("{} HP: {}", enemy.kind, enemy.hp);
                tracing::info!(enemy = %id, %kind, "battle started");
                self.state.start_battle(id);
                return Response {
                    messages: vec![format!("A {kind} blocks your path!"), info],
                    ..Response::default()
                };
            }
            tracing::debug!(%target, "move blocked");
            return Response::default();
        }

        tracing::debug!(from = %self.state.player.position, to = %target, "player moved");
        self.state.player.position = target;
        Response::default()
    }

    fn open_dialogue(&mut self, npc: &crate::actors::Npc) -> Response {
        match self.content.dialogues.start(npc) {
            Ok(dialogue) => {
                let mut response = Response::default();
                if let Ok(view) = self.content.dialogues.view(&dialogue) {
                    response.messages.push(format!("NPC: {}", view.text));
                }
                tracing::debug!(npc = %npc.id, tree = %dialogue.tree, "dialogue started");
                self.state.start_dialogue(dialogue);
                response
            }
            Err(e) => {
                tracing::warn!(npc = %npc.id, error = %e, "no usable dialogue");
                Response::message(PLACEHOLDER_LINE)
            }
        }
    }

    // ========================================================================
    // Dialogue
    // ========================================================================

    /// Pick option `index` (zero-based) of the current line.
    ///
    /// Ending the conversation runs one quest evaluation pass.
    pub fn choose_option(&mut self, index: usize) -> Result<Response, SessionError> {
        let Mode::InDialogue(dialogue) = &self.state.mode else {
            return Err(SessionError::NotInDialogue);
        };

        match self.content.dialogues.choose(dialogue, index)? {
            Choice::Advance(next) => {
                let view = self.content.dialogues.view(&next)?;
                self.state.start_dialogue(next);
                Ok(Response::message(format!("NPC: {}", view.text)))
            }
            Choice::End => {
                self.state.end_dialogue();
                let mut response = Response::message("Dialogue ended.");
                self.check_quest_completion(&mut response);
                Ok(response)
            }
        }
    }

    /// Run one quest evaluation pass and record the results in `response`.
    fn check_quest_completion(&mut self, response: &mut Response) {
        let completed = self.evaluate_quests();
        for quest in &completed {
            response
                .messages
                .push(format!("Quest completed: {}", quest.title));
            response
                .messages
                .push(format!("Reward received: {}", quest.reward));
            response.cues.push(Cue::Win);
        }
        response.completed_quests.extend(completed);
        response.quests_evaluated = true;
    }

    /// Record newly satisfied quests and grant their rewards.
    pub fn evaluate_quests(&mut self) -> Vec<QuestCompletion> {
        let completed = self
            .content
            .quests
            .evaluate(&mut self.state.player, &mut self.state.active_quests);
        for quest in &completed {
            tracing::info!(quest = %quest.id, reward = %quest.reward, "quest completed");
        }
        completed
    }

    // ========================================================================
    // Battle
    // ========================================================================

    /// Take one battle turn.
    pub fn battle_action(&mut self, action: BattleAction) -> Result<Response, SessionError> {
        if !self.state.mode.in_battle() {
            return Err(SessionError::NotInBattle);
        }

        let resolution = self.engine.resolve(&self.state, action, &mut self.rng);
        apply_effects(&mut self.state, &resolution.effects);

        let mut cues = Vec::new();
        if action == BattleAction::Attack {
            cues.push(Cue::Attack);
        }
        if resolution.outcome() == Some(BattleOutcome::Victory) {
            cues.push(Cue::Win);
        }

        Ok(Response {
            messages: resolution.narrative,
            cues,
            effects: resolution.effects,
            ..Response::default()
        })
    }

    // ========================================================================
    // Save / load / music
    // ========================================================================

    /// Write the whole state to the configured slot.
    pub async fn save(&self) -> Result<Response, SessionError> {
        let saved = SavedGame::new(self.state.clone());
        self.store.put(&self.slot, &saved.encode()?).await?;
        tracing::info!(slot = %self.slot, "game saved");
        Ok(Response::message("Game saved."))
    }

    /// Replace the whole state with the one in the configured slot.
    pub async fn load(&mut self) -> Result<Response, SessionError> {
        let text = self
            .store
            .get(&self.slot)
            .await?
            .ok_or_else(|| SessionError::NoSave(self.slot.clone()))?;
        let saved = SavedGame::decode(&text)?;
        self.state = saved.state;
        tracing::info!(slot = %self.slot, "game loaded");
        Ok(Response::message("Save loaded."))
    }

    pub fn toggle_music(&mut self) -> Response {
        self.music_on = !self.music_on;
        let cue = if self.music_on {
            Cue::MusicOn
        } else {
            Cue::MusicOff
        };
        Response {
            cues: vec![cue],
            ..Response::default()
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access to the state.
    ///
    /// Use with caution - direct modifications bypass the mode checks.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn mode(&self) -> &Mode {
        &self.state.mode
    }

    pub fn hud(&self) -> Hud {
        Hud::from_state(&self.state)
    }

    pub fn dialogue_view(&self) -> Option<DialogueView> {
        match &self.state.mode {
            Mode::InDialogue(dialogue) => self.content.dialogues.view(dialogue).ok(),
            _ => None,
        }
    }

    pub fn battle_view(&self) -> Option<BattleView> {
        BattleView::from_state(&self.state)
    }

    pub fn music_on(&self) -> bool {
        self.music_on
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }
}
