//! Magboard Core Library
//!
//! Platform-agnostic board model, drag placement and persistence for the
//! magboard team whiteboard.

pub mod board;
pub mod codec;
pub mod palette;
pub mod placement;
pub mod session;
pub mod storage;

pub use board::{
    Board, Item, ItemId, ItemKind, SettingKey, Settings, create_label, create_magnets_from_text,
    parse_names,
};
pub use codec::{CodecError, ExportFile, deserialize, serialize};
pub use palette::{PALETTE, Palette, PaletteColor};
pub use placement::{GRID_SIZE, ITEM_HEIGHT, ITEM_WIDTH, place, snap_to_grid};
pub use session::{BoardSession, Confirm, PRINT_SETTLE_DELAY, PrintJob};
pub use storage::{MemoryStorage, Storage, StorageError};
