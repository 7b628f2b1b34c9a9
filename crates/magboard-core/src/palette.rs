//! Fixed magnet color palette.

/// A named swatch in the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    /// Display name (e.g., "Yellow")
    pub name: &'static str,
    /// Fill color as `#rrggbb`.
    pub hex: &'static str,
}

impl PaletteColor {
    const fn new(name: &'static str, hex: &'static str) -> Self {
        Self { name, hex }
    }

    /// Red, green and blue channels parsed from the hex string.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.hex[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }
}

/// Number of swatches in the palette.
pub const PALETTE_SIZE: usize = 8;

/// Palette entries in swatch order. Index 0 is the fallback color.
pub const PALETTE: [PaletteColor; PALETTE_SIZE] = [
    PaletteColor::new("Yellow", "#fde68a"),
    PaletteColor::new("Pink", "#fbcfe8"),
    PaletteColor::new("Blue", "#bfdbfe"),
    PaletteColor::new("Green", "#bbf7d0"),
    PaletteColor::new("Orange", "#fed7aa"),
    PaletteColor::new("Purple", "#ddd6fe"),
    PaletteColor::new("Teal", "#99f6e4"),
    PaletteColor::new("Gray", "#e5e7eb"),
];

/// Lookup into [`PALETTE`].
pub struct Palette;

impl Palette {
    /// Resolve a stored color index. Anything outside the palette resolves to index 0.
    pub fn color(index: i64) -> &'static PaletteColor {
        &PALETTE[Self::normalize(index)]
    }

    /// Map a stored color index onto a valid palette index.
    pub fn normalize(index: i64) -> usize {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < PALETTE_SIZE)
            .unwrap_or(0)
    }

    /// Find a swatch index by case-insensitive name.
    pub fn by_name(name: &str) -> Option<usize> {
        PALETTE
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_lookup() {
        assert_eq!(Palette::color(2).name, "Blue");
        assert_eq!(Palette::color(7).name, "Gray");
    }

    #[test]
    fn test_out_of_range_falls_back() {
        assert_eq!(Palette::color(8), &PALETTE[0]);
        assert_eq!(Palette::color(-1), &PALETTE[0]);
        assert_eq!(Palette::color(i64::MAX), &PALETTE[0]);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(Palette::by_name("green"), Some(3));
        assert_eq!(Palette::by_name("magenta"), None);
    }

    #[test]
    fn test_rgb() {
        assert_eq!(PALETTE[0].rgb(), (0xfd, 0xe6, 0x8a));
    }
}
