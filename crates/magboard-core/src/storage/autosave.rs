//! Auto-save: mirror every board revision into the key-value store.
//!
//! Storage failures never reach the caller. They are logged and the board
//! lives on in memory for the rest of the session.

use crate::board::Board;
use crate::codec;
use crate::storage::Storage;
use std::sync::Arc;

/// Key holding the serialized board.
pub const BOARD_KEY: &str = "mag-whiteboard-v1";
/// Key set once the onboarding message has been dismissed.
pub const INTRO_SHOWN_KEY: &str = "mag-whiteboard-intro-shown";
/// Value stored under [`INTRO_SHOWN_KEY`].
pub const INTRO_SHOWN_VALUE: &str = "1";

/// Writes the board after each mutation and restores it on start.
pub struct AutoSave<S: Storage + ?Sized> {
    /// Storage backend.
    storage: Arc<S>,
    /// Whether a storage failure has already been reported at warn level.
    reported_failure: bool,
}

impl<S: Storage + ?Sized> AutoSave<S> {
    /// Create an auto-saver over the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            reported_failure: false,
        }
    }

    /// Read the stored board. Absent, unreadable or malformed data gives `None`.
    pub fn load(&mut self) -> Option<Board> {
        let text = match self.storage.get(BOARD_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::debug!("No saved board under {}", BOARD_KEY);
                return None;
            }
            Err(e) => {
                self.report(&e);
                return None;
            }
        };
        match codec::deserialize(&text) {
            Ok(board) => {
                log::info!("Restored board with {} items", board.len());
                Some(board)
            }
            Err(e) => {
                log::warn!("Ignoring saved board: {}", e);
                None
            }
        }
    }

    /// Write `board`. Returns true if it reached the store.
    pub fn save(&mut self, board: &Board) -> bool {
        let text = match codec::serialize(board) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to encode board: {}", e);
                return false;
            }
        };
        match self.storage.set(BOARD_KEY, &text) {
            Ok(()) => true,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Whether the onboarding message was dismissed before.
    ///
    /// An unreadable store counts as "not dismissed".
    pub fn intro_shown(&mut self) -> bool {
        match self.storage.get(INTRO_SHOWN_KEY) {
            Ok(value) => value.is_some(),
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Remember that the onboarding message was dismissed.
    pub fn mark_intro_shown(&mut self) {
        if let Err(e) = self.storage.set(INTRO_SHOWN_KEY, INTRO_SHOWN_VALUE) {
            self.report(&e);
        }
    }

    fn report(&mut self, error: &crate::storage::StorageError) {
        if self.reported_failure {
            log::debug!("Storage still failing: {}", error);
        } else {
            log::warn!("Persistence disabled for this operation: {}", error);
            self.reported_failure = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::create_magnets_from_text;
    use crate::storage::MemoryStorage;
    use crate::storage::tests::UnavailableStorage;

    #[test]
    fn test_save_then_load() {
        let storage = Arc::new(MemoryStorage::new());
        let board = Board::new().add_items(create_magnets_from_text("Alice, Bob", 3));

        let mut saver = AutoSave::new(storage.clone());
        assert!(saver.save(&board));

        let mut restorer = AutoSave::new(storage);
        assert_eq!(restorer.load(), Some(board));
    }

    #[test]
    fn test_load_absent() {
        let mut saver = AutoSave::new(Arc::new(MemoryStorage::new()));
        assert_eq!(saver.load(), None);
    }

    #[test]
    fn test_load_corrupt() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(BOARD_KEY, "{\"items\": [").unwrap();
        let mut saver = AutoSave::new(storage.clone());
        assert_eq!(saver.load(), None);

        storage.set(BOARD_KEY, "{}").unwrap();
        assert_eq!(saver.load(), None);
    }

    #[test]
    fn test_unavailable_storage_is_swallowed() {
        let mut saver = AutoSave::new(Arc::new(UnavailableStorage));
        assert!(!saver.save(&Board::new()));
        assert!(!saver.save(&Board::new()));
        assert_eq!(saver.load(), None);
        assert!(!saver.intro_shown());
        saver.mark_intro_shown();
    }

    #[test]
    fn test_intro_flag() {
        let storage = Arc::new(MemoryStorage::new());
        let mut saver = AutoSave::new(storage.clone());
        assert!(!saver.intro_shown());

        saver.mark_intro_shown();
        assert!(saver.intro_shown());
        assert_eq!(storage.get(INTRO_SHOWN_KEY).unwrap().as_deref(), Some("1"));
    }
}
