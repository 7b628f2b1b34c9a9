//! Board document: magnets, labels and board-wide settings.
//!
//! A [`Board`] is an immutable value. Every transition takes `&self` and
//! returns the next board, so the previous snapshot stays valid for anyone
//! still holding it.

use kurbo::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Distance of the first bulk-created magnet from the board's top-left corner.
pub const MARGIN: f64 = 24.0;
/// Magnets per row in the bulk layout.
pub const COLUMNS: usize = 4;
/// Horizontal distance between bulk layout columns.
pub const COLUMN_SPACING: f64 = 140.0;
/// Vertical distance between bulk layout rows.
pub const ROW_SPACING: f64 = 60.0;

/// Text of a freshly created label.
pub const DEFAULT_LABEL_TEXT: &str = "Team A";
/// Palette index of a freshly created label.
pub const DEFAULT_LABEL_COLOR: i64 = 3;
/// Width of the jitter window for new labels (x in `[24, 124)`).
pub const LABEL_JITTER_X: u32 = 100;
/// Height of the jitter window for new labels (y in `[24, 84)`).
pub const LABEL_JITTER_Y: u32 = 60;

/// Opaque item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// What an item represents on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A single person's name tag.
    #[default]
    Magnet,
    /// A team heading.
    Label,
}

impl ItemKind {
    /// Whether the per-magnet delete affordance applies to this kind.
    pub fn shows_delete(self) -> bool {
        matches!(self, ItemKind::Magnet)
    }
}

/// A magnet or label placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default)]
    pub(crate) id: ItemId,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub(crate) x: f64,
    #[serde(default)]
    pub(crate) y: f64,
    /// Index into [`crate::palette::PALETTE`]; resolved leniently on lookup.
    #[serde(default)]
    pub color_index: i64,
}

impl Item {
    /// Create an item with a fresh id. Non-finite coordinates become 0.
    pub fn new(kind: ItemKind, text: impl Into<String>, position: Point, color_index: i64) -> Self {
        Self {
            id: ItemId::new(),
            kind,
            text: text.into(),
            x: finite_or_zero(position.x),
            y: finite_or_zero(position.y),
            color_index,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Top-left corner in board-local pixels.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_label(&self) -> bool {
        self.kind == ItemKind::Label
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Name of a board-wide toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    GridVisible,
    SnapEnabled,
    Locked,
}

#[derive(Debug, Error)]
#[error("unknown setting: {0} (expected grid, snap or lock)")]
pub struct UnknownSetting(String);

impl FromStr for SettingKey {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" | "gridvisible" => Ok(SettingKey::GridVisible),
            "snap" | "snapenabled" => Ok(SettingKey::SnapEnabled),
            "lock" | "locked" => Ok(SettingKey::Locked),
            _ => Err(UnknownSetting(s.to_string())),
        }
    }
}

/// Board-wide display and interaction toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(alias = "grid")]
    pub grid_visible: bool,
    #[serde(alias = "snap")]
    pub snap_enabled: bool,
    #[serde(alias = "lock")]
    pub locked: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_visible: true,
            snap_enabled: true,
            locked: false,
        }
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::GridVisible => self.grid_visible,
            SettingKey::SnapEnabled => self.snap_enabled,
            SettingKey::Locked => self.locked,
        }
    }

    /// Copy of these settings with `key` flipped.
    #[must_use]
    pub fn toggled(mut self, key: SettingKey) -> Self {
        let flag = match key {
            SettingKey::GridVisible => &mut self.grid_visible,
            SettingKey::SnapEnabled => &mut self.snap_enabled,
            SettingKey::Locked => &mut self.locked,
        };
        *flag = !*flag;
        self
    }
}

/// The whole board: items in creation order plus settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    items: Vec<Item>,
    settings: Settings,
}

impl Board {
    /// An empty board with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in creation order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn magnets(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.kind == ItemKind::Magnet)
    }

    pub fn labels(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.kind == ItemKind::Label)
    }

    /// Append items. An incoming id that is already taken gets a fresh one.
    #[must_use]
    pub fn add_items(&self, items: impl IntoIterator<Item = Item>) -> Self {
        let mut next = self.clone();
        for mut item in items {
            while next.item(&item.id).is_some() {
                log::debug!("Reassigning duplicate item id {}", item.id);
                item.id = ItemId::new();
            }
            next.items.push(item);
        }
        next
    }

    /// Rebuild the item list so that no two items share an id.
    ///
    /// The first holder of an id keeps it; later duplicates get fresh ones.
    pub(crate) fn with_unique_ids(self) -> Self {
        let Board { items, settings } = self;
        Board {
            items: Vec::with_capacity(items.len()),
            settings,
        }
        .add_items(items)
    }

    /// Replace the text of one item. Unknown ids leave the board as is.
    #[must_use]
    pub fn update_item_text(&self, id: &ItemId, text: impl Into<String>) -> Self {
        let text = text.into();
        self.map_item(id, |item| item.text = text)
    }

    /// Remove one item. Unknown ids leave the board as is.
    #[must_use]
    pub fn delete_item(&self, id: &ItemId) -> Self {
        let mut next = self.clone();
        next.items.retain(|item| &item.id != id);
        next
    }

    /// Set an item's palette index. The index is stored as given.
    #[must_use]
    pub fn set_color(&self, id: &ItemId, color_index: i64) -> Self {
        self.map_item(id, |item| item.color_index = color_index)
    }

    #[must_use]
    pub fn toggle_setting(&self, key: SettingKey) -> Self {
        let mut next = self.clone();
        next.settings = next.settings.toggled(key);
        next
    }

    /// Copy of this board with `locked` forced on.
    #[must_use]
    pub fn locked(&self) -> Self {
        let mut next = self.clone();
        next.settings.locked = true;
        next
    }

    /// The empty board with default settings.
    ///
    /// Callers must have obtained the user's confirmation first; see
    /// [`crate::session::BoardSession::clear`].
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self::default()
    }

    /// Move one item to `position` without any placement rules.
    pub(crate) fn with_item_position(&self, id: &ItemId, position: Point) -> Self {
        self.map_item(id, |item| {
            item.x = position.x;
            item.y = position.y;
        })
    }

    fn map_item(&self, id: &ItemId, f: impl FnOnce(&mut Item)) -> Self {
        let mut next = self.clone();
        if let Some(item) = next.items.iter_mut().find(|item| &item.id == id) {
            f(item);
        }
        next
    }
}

/// Split pasted text into names.
///
/// Newlines, commas and semicolons all separate names; runs of separators and
/// surrounding whitespace produce no empty names.
pub fn parse_names(text: &str) -> Vec<&str> {
    text.split(['\n', ',', ';'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Initial position of the `index`-th magnet in a bulk paste.
pub fn grid_fill_position(index: usize) -> Point {
    let column = (index % COLUMNS) as f64;
    let row = (index / COLUMNS) as f64;
    Point::new(MARGIN + column * COLUMN_SPACING, MARGIN + row * ROW_SPACING)
}

/// One magnet per name in `text`, laid out four to a row.
pub fn create_magnets_from_text(text: &str, color_index: i64) -> Vec<Item> {
    parse_names(text)
        .into_iter()
        .enumerate()
        .map(|(i, name)| Item::new(ItemKind::Magnet, name, grid_fill_position(i), color_index))
        .collect()
}

/// A new team label at a jittered spot near the top-left corner.
pub fn create_label() -> Item {
    create_label_with(&mut rand::rng())
}

/// Like [`create_label`], drawing the jitter from `rng`.
pub fn create_label_with<R: Rng + ?Sized>(rng: &mut R) -> Item {
    let x = MARGIN + f64::from(rng.random_range(0..LABEL_JITTER_X));
    let y = MARGIN + f64::from(rng.random_range(0..LABEL_JITTER_Y));
    Item::new(
        ItemKind::Label,
        DEFAULT_LABEL_TEXT,
        Point::new(x, y),
        DEFAULT_LABEL_COLOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_board() -> Board {
        Board::new().add_items(create_magnets_from_text("Alice\nBob", 0))
    }

    #[test]
    fn test_parse_names_mixed_delimiters() {
        assert_eq!(
            parse_names("Alice, Bob;  Carol\nDave"),
            vec!["Alice", "Bob", "Carol", "Dave"]
        );
    }

    #[test]
    fn test_parse_names_collapses_runs() {
        assert_eq!(parse_names(",,Alice;;\n\n, Bob ,"), vec!["Alice", "Bob"]);
        assert_eq!(parse_names("Eve\r\nMallory"), vec!["Eve", "Mallory"]);
    }

    #[test]
    fn test_create_magnets_layout() {
        let items = create_magnets_from_text("Alice, Bob;  Carol\nDave", 2);
        let texts: Vec<_> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Alice", "Bob", "Carol", "Dave"]);

        let positions: Vec<_> = items.iter().map(|i| (i.x, i.y)).collect();
        assert_eq!(
            positions,
            vec![(24.0, 24.0), (164.0, 24.0), (304.0, 24.0), (444.0, 24.0)]
        );
        assert!(items.iter().all(|i| i.kind == ItemKind::Magnet && i.color_index == 2));
    }

    #[test]
    fn test_create_magnets_wraps_rows() {
        let items = create_magnets_from_text("a,b,c,d,e,f", 0);
        assert_eq!(items[4].position(), Point::new(24.0, 84.0));
        assert_eq!(items[5].position(), Point::new(164.0, 84.0));
    }

    #[test]
    fn test_create_magnets_whitespace_only() {
        assert!(create_magnets_from_text("   ", 0).is_empty());
        assert!(create_magnets_from_text("", 0).is_empty());

        let board = sample_board();
        let next = board.add_items(create_magnets_from_text(" \n ; , ", 1));
        assert_eq!(next.len(), board.len());
    }

    #[test]
    fn test_create_label_defaults() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let label = create_label_with(&mut rng);
            assert_eq!(label.kind, ItemKind::Label);
            assert_eq!(label.text, DEFAULT_LABEL_TEXT);
            assert_eq!(label.color_index, DEFAULT_LABEL_COLOR);
            assert!((24.0..124.0).contains(&label.x));
            assert!((24.0..84.0).contains(&label.y));
        }
    }

    #[test]
    fn test_ids_unique() {
        let board = Board::new()
            .add_items(create_magnets_from_text("a,b,c", 0))
            .add_items([create_label()]);
        let mut ids: Vec<_> = board.items().iter().map(|i| i.id().clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_add_items_reassigns_duplicate_id() {
        let board = sample_board();
        let copy = board.items()[0].clone();
        let next = board.add_items([copy.clone()]);
        assert_eq!(next.len(), 3);
        assert_ne!(next.items()[2].id(), copy.id());
        assert_eq!(next.items()[2].text, copy.text);
    }

    #[test]
    fn test_item_new_rejects_non_finite_position() {
        let item = Item::new(ItemKind::Magnet, "A", Point::new(f64::NAN, 10.0), 0);
        assert_eq!(item.position(), Point::new(0.0, 10.0));

        let item = Item::new(ItemKind::Label, "B", Point::new(5.0, f64::NEG_INFINITY), 0);
        assert_eq!(item.position(), Point::new(5.0, 0.0));
    }

    #[test]
    fn test_with_unique_ids() {
        let board = sample_board();
        let first = board.items()[0].clone();
        let mut duplicated = board.clone();
        duplicated.items.push(first.clone());

        let fixed = duplicated.with_unique_ids();
        assert_eq!(fixed.len(), 3);
        assert_eq!(fixed.items()[0].id(), first.id());
        assert_ne!(fixed.items()[2].id(), first.id());
        assert_eq!(fixed.items()[2].text, first.text);
        assert_eq!(sample_board().with_unique_ids().len(), 2);
    }

    #[test]
    fn test_update_item_text() {
        let board = sample_board();
        let id = board.items()[1].id().clone();
        let next = board.update_item_text(&id, "Robert");
        assert_eq!(next.item(&id).map(|i| i.text.as_str()), Some("Robert"));
        // Previous snapshot is untouched
        assert_eq!(board.item(&id).map(|i| i.text.as_str()), Some("Bob"));
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let board = sample_board();
        assert_eq!(board.update_item_text(&ItemId::from("missing"), "x"), board);
    }

    #[test]
    fn test_delete_item() {
        let board = sample_board();
        let id = board.items()[0].id().clone();
        let next = board.delete_item(&id);
        assert_eq!(next.len(), 1);
        assert!(next.item(&id).is_none());
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let board = sample_board();
        let next = board.delete_item(&ItemId::from("missing"));
        assert_eq!(next, board);
        assert_eq!(next.delete_item(&ItemId::from("missing")), board);
    }

    #[test]
    fn test_set_color_stores_raw_index() {
        let board = sample_board();
        let id = board.items()[0].id().clone();
        let next = board.set_color(&id, 42);
        assert_eq!(next.item(&id).map(|i| i.color_index), Some(42));
        assert_eq!(crate::palette::Palette::color(42).name, "Yellow");
    }

    #[test]
    fn test_toggle_setting() {
        let board = Board::new();
        assert_eq!(*board.settings(), Settings::default());

        let next = board.toggle_setting(SettingKey::Locked);
        assert!(next.settings().locked);
        assert!(next.settings().grid_visible);

        let back = next.toggle_setting(SettingKey::Locked);
        assert!(!back.settings().locked);

        let no_grid = board.toggle_setting(SettingKey::GridVisible);
        assert!(!no_grid.settings().grid_visible);
        assert!(no_grid.settings().snap_enabled);
    }

    #[test]
    fn test_setting_key_from_str() {
        assert_eq!("grid".parse::<SettingKey>().ok(), Some(SettingKey::GridVisible));
        assert_eq!("Snap".parse::<SettingKey>().ok(), Some(SettingKey::SnapEnabled));
        assert_eq!("locked".parse::<SettingKey>().ok(), Some(SettingKey::Locked));
        assert!("zoom".parse::<SettingKey>().is_err());
    }

    #[test]
    fn test_cleared_resets_settings() {
        let board = sample_board()
            .toggle_setting(SettingKey::SnapEnabled)
            .toggle_setting(SettingKey::Locked);
        let cleared = board.cleared();
        assert!(cleared.is_empty());
        assert_eq!(*cleared.settings(), Settings::default());
    }

    #[test]
    fn test_magnets_and_labels() {
        let board = sample_board().add_items([create_label()]);
        assert_eq!(board.magnets().count(), 2);
        assert_eq!(board.labels().count(), 1);
        assert!(board.magnets().all(|i| i.kind.shows_delete()));
        assert!(board.labels().all(|i| !i.kind.shows_delete()));
    }
}
