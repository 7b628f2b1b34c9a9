//! Editing session: the current board plus its persistence.
//!
//! A presentation layer owns one [`BoardSession`] and routes every user
//! action through it. Each action swaps in a new [`Board`] value and mirrors
//! it to storage.

use crate::board::{Board, ItemId, SettingKey, create_label, create_magnets_from_text};
use crate::codec::{self, CodecError, ExportFile};
use crate::storage::{AutoSave, Storage};
use kurbo::{Point, Rect};
use std::sync::Arc;
use std::time::Duration;

/// Pause between locking the board and opening the print dialog, so the
/// locked board is rendered first.
pub const PRINT_SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Question put to the user before [`BoardSession::clear`].
pub const CLEAR_PROMPT: &str = "Remove all magnets and labels and reset the board settings?";

/// A blocking yes/no decision from the user.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Returned by [`BoardSession::prepare_print`]: the board is locked, and the
/// print dialog should be opened once `delay` has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintJob {
    pub delay: Duration,
}

/// The live board and the store it is mirrored to.
pub struct BoardSession<S: Storage + ?Sized> {
    board: Board,
    autosave: AutoSave<S>,
}

impl<S: Storage + ?Sized> BoardSession<S> {
    /// Start a session, restoring the saved board if there is a usable one.
    pub fn open(storage: Arc<S>) -> Self {
        let mut autosave = AutoSave::new(storage);
        let board = autosave.load().unwrap_or_default();
        Self { board, autosave }
    }

    /// The current board snapshot.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Create one magnet per pasted name. Returns the new ids in order.
    pub fn paste_names(&mut self, text: &str, color_index: i64) -> Vec<ItemId> {
        let items = create_magnets_from_text(text, color_index);
        if items.is_empty() {
            return Vec::new();
        }
        let start = self.board.len();
        let next = self.board.add_items(items);
        self.commit(next);
        log::debug!("Pasted {} names", self.board.len() - start);
        self.board.items()[start..]
            .iter()
            .map(|item| item.id().clone())
            .collect()
    }

    /// Add a team label. Returns its id.
    pub fn add_label(&mut self) -> ItemId {
        let label = create_label();
        let id = label.id().clone();
        let next = self.board.add_items([label]);
        self.commit(next);
        // add_items only renames on collision, which a fresh uuid never hits
        self.board
            .items()
            .last()
            .map(|item| item.id().clone())
            .unwrap_or(id)
    }

    pub fn update_text(&mut self, id: &ItemId, text: &str) {
        let next = self.board.update_item_text(id, text);
        self.commit(next);
    }

    pub fn delete_item(&mut self, id: &ItemId) {
        let next = self.board.delete_item(id);
        self.commit(next);
    }

    pub fn set_color(&mut self, id: &ItemId, color_index: i64) {
        let next = self.board.set_color(id, color_index);
        self.commit(next);
    }

    pub fn toggle_setting(&mut self, key: SettingKey) {
        let next = self.board.toggle_setting(key);
        self.commit(next);
    }

    /// Whether drags may start at all.
    pub fn can_drag(&self) -> bool {
        !self.board.settings().locked
    }

    /// Commit a drag release. Returns true if the item moved.
    pub fn drag_end(&mut self, id: &ItemId, viewport_point: Point, board_rect: Rect) -> bool {
        let next = self.board.place_item(id, viewport_point, board_rect);
        self.commit(next)
    }

    /// Reset to an empty board, if the user agrees.
    ///
    /// Returns false, leaving the board untouched, when the user declines.
    pub fn clear(&mut self, confirm: &mut impl Confirm) -> bool {
        if !confirm.confirm(CLEAR_PROMPT) {
            log::debug!("Clear declined");
            return false;
        }
        let next = self.board.cleared();
        self.commit(next);
        log::info!("Board cleared");
        true
    }

    /// Replace the board with an imported document.
    ///
    /// On error the current board is kept as is.
    pub fn import_text(&mut self, text: &str) -> Result<(), CodecError> {
        let board = codec::deserialize(text).inspect_err(|e| {
            log::warn!("Import rejected: {}", e);
        })?;
        log::info!("Imported board with {} items", board.len());
        self.commit(board);
        Ok(())
    }

    /// The current board as a downloadable file.
    pub fn export(&self) -> Result<ExportFile, serde_json::Error> {
        let file = ExportFile::new(&self.board)?;
        log::info!("Exported {} items to {}", self.board.len(), file.file_name);
        Ok(file)
    }

    /// Lock the board ahead of printing.
    pub fn prepare_print(&mut self) -> PrintJob {
        let next = self.board.locked();
        self.commit(next);
        log::info!("Board locked for printing");
        PrintJob {
            delay: PRINT_SETTLE_DELAY,
        }
    }

    /// Whether the onboarding message should be shown.
    pub fn should_show_intro(&mut self) -> bool {
        !self.autosave.intro_shown()
    }

    pub fn dismiss_intro(&mut self) {
        self.autosave.mark_intro_shown();
    }

    /// Swap in `next` and persist it. Returns false if nothing changed.
    fn commit(&mut self, next: Board) -> bool {
        if next == self.board {
            return false;
        }
        self.board = next;
        self.autosave.save(&self.board);
        true
    }
}
