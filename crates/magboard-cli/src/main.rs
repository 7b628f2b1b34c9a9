//! Command-line shell for a magboard stored on disk.

use clap::{Parser, Subcommand};
use kurbo::{Point, Rect};
use magboard_core::storage::FileStorage;
use magboard_core::{
    Board, BoardSession, Confirm, ItemId, MemoryStorage, Palette, SettingKey, Storage,
};
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "magboard", version, about = "Arrange name magnets into teams")]
struct Cli {
    /// Directory holding the saved board (defaults to the platform data dir).
    #[arg(long, env = "MAGBOARD_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List items and settings.
    Show,
    /// Create one magnet per name. Reads stdin when no text is given.
    Paste {
        text: Option<String>,
        /// Palette index or color name.
        #[arg(long, default_value = "0")]
        color: String,
    },
    /// Add a team label.
    Label,
    /// Change an item's text.
    Rename { id: String, text: String },
    /// Remove an item.
    Delete { id: String },
    /// Recolor an item by palette index or color name.
    Color { id: String, color: String },
    /// Flip grid, snap or lock.
    Toggle { setting: SettingKey },
    /// Drop an item at a pointer position given in viewport coordinates.
    Drag {
        id: String,
        x: f64,
        y: f64,
        #[arg(long, default_value_t = 0.0)]
        left: f64,
        #[arg(long, default_value_t = 0.0)]
        top: f64,
        #[arg(long, default_value_t = 1200.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },
    /// Remove everything and reset settings.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Write the board as pretty JSON.
    Export { path: Option<PathBuf> },
    /// Replace the board with a JSON document.
    Import { path: PathBuf },
    /// Lock the board and print it.
    Print,
    /// Show the onboarding message unless it was dismissed.
    Intro {
        #[arg(long)]
        dismiss: bool,
    },
}

/// Asks on the terminal and waits for an answer.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

const INTRO_TEXT: &str = "Paste names to create magnets, add labels for teams, \
then drag magnets under their team. The board is saved automatically.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut session = BoardSession::open(open_storage(cli.data_dir));

    match cli.command {
        Commands::Show => print_board(session.board()),
        Commands::Paste { text, color } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let ids = session.paste_names(&text, parse_color(&color)?);
            println!("Added {} magnets", ids.len());
        }
        Commands::Label => {
            let id = session.add_label();
            println!("Added label {}", id);
        }
        Commands::Rename { id, text } => {
            let id = resolve_id(session.board(), &id);
            session.update_text(&id, &text);
        }
        Commands::Delete { id } => {
            let id = resolve_id(session.board(), &id);
            session.delete_item(&id);
        }
        Commands::Color { id, color } => {
            let id = resolve_id(session.board(), &id);
            session.set_color(&id, parse_color(&color)?);
        }
        Commands::Toggle { setting } => {
            session.toggle_setting(setting);
            println!("{:?} = {}", setting, session.board().settings().get(setting));
        }
        Commands::Drag {
            id,
            x,
            y,
            left,
            top,
            width,
            height,
        } => {
            if !session.can_drag() {
                println!("Board is locked");
                return Ok(());
            }
            let id = resolve_id(session.board(), &id);
            let board_rect = Rect::new(left, top, left + width, top + height);
            if session.drag_end(&id, Point::new(x, y), board_rect) {
                if let Some(item) = session.board().item(&id) {
                    let p = item.position();
                    println!("Moved to ({}, {})", p.x, p.y);
                }
            } else {
                println!("Nothing moved");
            }
        }
        Commands::Clear { yes } => {
            let cleared = if yes {
                session.clear(&mut |_: &str| true)
            } else {
                session.clear(&mut TerminalConfirm)
            };
            if !cleared {
                println!("Board kept");
            }
        }
        Commands::Export { path } => {
            let file = session.export()?;
            let path = path.unwrap_or_else(|| PathBuf::from(file.file_name));
            std::fs::write(&path, &file.contents)?;
            println!("Wrote {} ({})", path.display(), file.mime_type);
        }
        Commands::Import { path } => {
            let text = std::fs::read_to_string(&path)?;
            session
                .import_text(&text)
                .map_err(|e| format!("Import failed, board unchanged: {}", e))?;
            println!("Imported {} items", session.board().len());
        }
        Commands::Print => {
            let job = session.prepare_print();
            std::thread::sleep(job.delay);
            print_board(session.board());
        }
        Commands::Intro { dismiss } => {
            if dismiss {
                session.dismiss_intro();
            } else if session.should_show_intro() {
                println!("{}", INTRO_TEXT);
            }
        }
    }

    Ok(())
}

/// Open the on-disk store. When it cannot be used, the board lives in memory
/// for this run only.
fn open_storage(data_dir: Option<PathBuf>) -> Arc<dyn Storage> {
    let storage = match data_dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::default_location(),
    };
    match storage {
        Ok(storage) => {
            log::debug!("Using board storage at {}", storage.base_path().display());
            Arc::new(storage)
        }
        Err(e) => {
            log::warn!("Board storage unavailable, changes will not be saved: {}", e);
            Arc::new(MemoryStorage::new())
        }
    }
}

/// Accept a palette index or a color name.
fn parse_color(value: &str) -> Result<i64, String> {
    value
        .parse::<i64>()
        .ok()
        .or_else(|| Palette::by_name(value).map(|i| i as i64))
        .ok_or_else(|| format!("unknown color: {}", value))
}

/// Match an exact id or a unique id prefix. Anything else is passed through
/// and ends up as a no-op.
fn resolve_id(board: &Board, raw: &str) -> ItemId {
    let exact = ItemId::from(raw);
    if board.item(&exact).is_some() {
        return exact;
    }
    let mut matches = board
        .items()
        .iter()
        .filter(|item| item.id().as_str().starts_with(raw));
    match (matches.next(), matches.next()) {
        (Some(item), None) => item.id().clone(),
        _ => {
            log::warn!("No single item matches id {}", raw);
            exact
        }
    }
}

fn print_board(board: &Board) {
    let settings = board.settings();
    println!(
        "grid: {}  snap: {}  locked: {}",
        on_off(settings.grid_visible),
        on_off(settings.snap_enabled),
        on_off(settings.locked)
    );
    if board.is_empty() {
        println!("(empty board)");
        return;
    }
    for item in board.items() {
        let p = item.position();
        let short_id: String = item.id().as_str().chars().take(8).collect();
        println!(
            "{:8}  {:6}  {:>6} {:>6}  {:7}  {}",
            short_id,
            format!("{:?}", item.kind).to_lowercase(),
            p.x,
            p.y,
            Palette::color(item.color_index).name,
            item.text
        );
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
