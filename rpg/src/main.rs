//! Tile RPG terminal application.
//!
//! Walk a small map, talk to villagers, fight what blocks the road.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-based interface suitable for scripts:
//!
//! ```bash
//! printf 'down\nright\nstatus\nquit\n' | cargo run -p tile-rpg -- --headless --seed 7
//! ```

mod app;
mod events;
mod headless;
mod ui;

use anyhow::{bail, Context};
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use rpg_core::{GameSession, SessionConfig};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Log file written inside the save directory in TUI mode.
const LOG_FILE: &str = "tile-rpg.log";

/// Command line options. Anything unset falls back to the environment.
#[derive(Debug, Default, PartialEq, Eq)]
struct CliOptions {
    headless: bool,
    help: bool,
    data_dir: Option<PathBuf>,
    save_dir: Option<PathBuf>,
    seed: Option<u64>,
}

impl CliOptions {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut options = Self::default();
        let mut args = args.iter().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--headless" => options.headless = true,
                "-h" | "--help" => options.help = true,
                "--data" => options.data_dir = Some(PathBuf::from(value(&mut args, arg)?)),
                "--saves" => options.save_dir = Some(PathBuf::from(value(&mut args, arg)?)),
                "--seed" => {
                    let seed = value(&mut args, arg)?;
                    options.seed = Some(
                        seed.parse()
                            .with_context(|| format!("--seed expects a number, got '{seed}'"))?,
                    );
                }
                other => bail!("Unknown option '{other}'. Try --help."),
            }
        }

        Ok(options)
    }

    /// Layer these options over `config`.
    fn apply(self, mut config: SessionConfig) -> SessionConfig {
        if let Some(dir) = self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(dir) = self.save_dir {
            config = config.with_save_dir(dir);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn value<'a>(args: &mut impl Iterator<Item = &'a String>, flag: &str) -> anyhow::Result<&'a str> {
    match args.next() {
        Some(v) => Ok(v.as_str()),
        None => bail!("{flag} needs a value"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let options = CliOptions::parse(&args)?;

    if options.help {
        print_help();
        return Ok(());
    }

    let headless = options.headless;
    let config = options.apply(SessionConfig::from_env());

    if headless {
        init_tracing(None)?;
        return headless::run_headless(config)
            .await
            .context("headless session failed");
    }

    init_tracing(Some(&config.save_dir))?;

    // Load content before touching the terminal so errors stay readable
    let session = GameSession::new(config)
        .await
        .context("failed to start game session")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("terminal error")
}

/// Install the tracing subscriber.
///
/// With a directory, logs go to a file there so they do not tear the TUI;
/// without one they go to stderr.
fn init_tracing(log_dir: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tile_rpg=info,rpg_core=info"));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
            let path = dir.join(LOG_FILE);
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Save and load await the store, so they run here rather than in the key handler
        app.run_pending_io().await;

        if event::poll(Duration::from_millis(100))? {
            if handle_event(app, event::read()?) == EventResult::Quit {
                return Ok(());
            }
        }
    }
}

fn print_help() {
    println!("Tile RPG - a small tile-based role-playing game");
    println!();
    println!("USAGE:");
    println!("  tile-rpg [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!("  --headless       Read commands from stdin instead of running the TUI");
    println!("  --data <DIR>     Load dialogues.json and quests.json from DIR");
    println!("  --saves <DIR>    Directory for save slots (default: saves)");
    println!("  --seed <N>       Seed battle rolls for a repeatable game");
    println!();
    println!("ENVIRONMENT:");
    println!("  RPG_DATA_DIR, RPG_SAVE_DIR, RPG_SAVE_SLOT, RPG_SEED");
    println!("  RUST_LOG         Log filter (default: tile_rpg=info,rpg_core=info)");
    println!();
    println!("KEYS:");
    println!("  Arrow keys move, 1-9 pick dialogue options, a/d/r attack/defend/run,");
    println!("  s save, l load, m music, ? help, q quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("tile-rpg")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(CliOptions::parse(&args(&[])).unwrap(), CliOptions::default());
    }

    #[test]
    fn test_parse_all_flags() {
        let options = CliOptions::parse(&args(&[
            "--headless", "--data", "assets", "--saves", "/tmp/s", "--seed", "42",
        ]))
        .unwrap();

        assert!(options.headless);
        assert_eq!(options.data_dir, Some(PathBuf::from("assets")));
        assert_eq!(options.save_dir, Some(PathBuf::from("/tmp/s")));
        assert_eq!(options.seed, Some(42));
    }

    #[test]
    fn test_parse_errors() {
        assert!(CliOptions::parse(&args(&["--seed", "many"])).is_err());
        assert!(CliOptions::parse(&args(&["--data"])).is_err());
        assert!(CliOptions::parse(&args(&["--fly"])).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let config = SessionConfig::new().with_seed(1).with_save_slot("keep");
        let options = CliOptions {
            seed: Some(9),
            save_dir: Some(PathBuf::from("elsewhere")),
            ..CliOptions::default()
        };

        let config = options.apply(config);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.save_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.save_slot, "keep");
    }
}
