//! Headless mode for the tile RPG.
//!
//! A line-oriented protocol on stdin/stdout for scripts and automated play.
//! Each input line is one command (`help` lists them). Output lines are game
//! messages, with `[CUE]`, `[BATTLE]`, `[DIALOGUE]` and `[ERROR]` prefixes for
//! everything that is not.

use rpg_core::headless::{Command, HeadlessGame, HELP_TEXT};
use rpg_core::{Cue, Response, SessionConfig, SessionError};
use std::io::{self, BufRead, Write};

/// Run the game in headless mode.
pub async fn run_headless(config: SessionConfig) -> Result<(), SessionError> {
    let mut game = HeadlessGame::new(config).await?;

    println!("=== Tile RPG Headless Mode ===");
    for line in game.status_lines() {
        println!("[STATUS] {line}");
    }
    println!();
    for line in HELP_TEXT {
        println!("{line}");
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                println!("[ERROR] {e}. Type 'help' for help.");
                continue;
            }
        };

        match game.execute(command).await {
            Ok(response) => print_response(&game, &response),
            Err(SessionError::NoSave(_)) => println!("[ERROR] No save found."),
            Err(e) => println!("[ERROR] {e}"),
        }
        stdout.flush().ok();

        if game.is_finished() {
            break;
        }
    }

    Ok(())
}

fn print_response(game: &HeadlessGame, response: &Response) {
    for message in &response.messages {
        println!("{message}");
    }
    for cue in &response.cues {
        println!("[CUE] {}", cue_label(*cue));
    }

    let session = game.session();
    if let Some(view) = session.battle_view() {
        println!(
            "[BATTLE] {} | Your HP: {}",
            view.info(),
            session.state().player.hp
        );
    }
    if let Some(view) = session.dialogue_view() {
        for (i, option) in view.options.iter().enumerate() {
            println!("[DIALOGUE] {}. {}", i + 1, option);
        }
    }
}

fn cue_label(cue: Cue) -> &'static str {
    match cue {
        Cue::Attack => "attack",
        Cue::Win => "win",
        Cue::MusicOn => "music on",
        Cue::MusicOff => "music off",
    }
}
