//! Cycling colour palette.
//!
//! The palette is an ordered list of unique colours with a cursor selecting
//! the current one. Every stamp uses the current colour and then advances
//! the cursor, so a multi-colour palette cycles through its colours along a
//! stroke.

use super::Colour;

/// Ordered, never-empty list of unique colours with a current-colour cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colours: Vec<Colour>,
    cursor: usize,
}

impl Palette {
    /// Colour used when the palette would otherwise be empty.
    pub const DEFAULT_COLOUR: Colour = Colour::BLACK;

    /// Create the single-colour default palette.
    pub fn new() -> Self {
        Self {
            colours: vec![Self::DEFAULT_COLOUR],
            cursor: 0,
        }
    }

    /// Build a palette from a list of colours.
    ///
    /// Duplicates are dropped (first occurrence wins). An empty list gives
    /// the default palette.
    pub fn from_colours(colours: impl IntoIterator<Item = Colour>) -> Self {
        let mut unique: Vec<Colour> = Vec::new();
        for colour in colours {
            if !unique.contains(&colour) {
                unique.push(colour);
            }
        }
        if unique.is_empty() {
            return Self::new();
        }
        Self {
            colours: unique,
            cursor: 0,
        }
    }

    /// Append a colour unless it is already present.
    ///
    /// Returns `true` if the palette changed. The cursor is not moved.
    pub fn add_colour(&mut self, colour: Colour) -> bool {
        if self.contains(colour) {
            return false;
        }
        self.colours.push(colour);
        true
    }

    /// Remove a colour.
    ///
    /// Removing the last colour resets the palette to the default colour.
    /// If the cursor falls off the end it is reset to the first colour.
    /// Returns `true` if the colour was present.
    pub fn remove_colour(&mut self, colour: Colour) -> bool {
        let before = self.colours.len();
        self.colours.retain(|&c| c != colour);
        if self.colours.len() == before {
            return false;
        }

        if self.colours.is_empty() {
            self.colours.push(Self::DEFAULT_COLOUR);
            self.cursor = 0;
        } else if self.cursor >= self.colours.len() {
            self.cursor = 0;
        }
        true
    }

    /// The colour under the cursor.
    pub fn current(&self) -> Colour {
        self.colours
            .get(self.cursor)
            .copied()
            .unwrap_or(Self::DEFAULT_COLOUR)
    }

    /// Move the cursor to the next colour, wrapping around.
    ///
    /// No-op for a single-colour palette.
    pub fn advance(&mut self) {
        if self.colours.len() > 1 {
            self.cursor = (self.cursor + 1) % self.colours.len();
        }
    }

    /// Point the cursor at a specific colour index.
    ///
    /// Returns `false` and leaves the cursor alone when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.colours.len() {
            return false;
        }
        self.cursor = index;
        true
    }

    /// Current cursor index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Colours in insertion order.
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    /// Check whether a colour is in the palette.
    pub fn contains(&self, colour: Colour) -> bool {
        self.colours.contains(&colour)
    }

    /// Number of colours. Always at least one.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Colour = Colour::rgb(255, 0, 0);
    const GREEN: Colour = Colour::rgb(0, 255, 0);
    const BLUE: Colour = Colour::rgb(0, 0, 255);

    fn assert_invariant(palette: &Palette) {
        assert!(!palette.is_empty());
        assert!(palette.cursor() < palette.len());
    }

    #[test]
    fn test_add_colour_appends() {
        let mut palette = Palette::new();
        assert!(palette.add_colour(RED));
        assert_eq!(palette.colours(), &[Colour::BLACK, RED]);
        assert_eq!(palette.cursor(), 0);
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut palette = Palette::new();
        palette.add_colour(RED);
        assert!(!palette.add_colour(Colour::from_hex("#FF0000").unwrap()));
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_remove_current_at_end_resets_cursor() {
        let mut palette = Palette::from_colours([Colour::BLACK, RED]);
        palette.advance();
        assert_eq!(palette.cursor(), 1);

        assert!(palette.remove_colour(RED));
        assert_eq!(palette.colours(), &[Colour::BLACK]);
        assert_eq!(palette.cursor(), 0);
    }

    #[test]
    fn test_remove_last_colour_restores_default() {
        let mut palette = Palette::from_colours([RED]);
        palette.remove_colour(RED);
        assert_eq!(palette.colours(), &[Palette::DEFAULT_COLOUR]);
        assert_eq!(palette.cursor(), 0);
    }

    #[test]
    fn test_remove_earlier_colour_keeps_valid_cursor() {
        let mut palette = Palette::from_colours([RED, GREEN, BLUE]);
        palette.select(1);
        palette.remove_colour(RED);
        // Cursor index is kept as long as it stays in range.
        assert_eq!(palette.cursor(), 1);
        assert_eq!(palette.current(), BLUE);
    }

    #[test]
    fn test_remove_missing_colour() {
        let mut palette = Palette::from_colours([RED, GREEN]);
        assert!(!palette.remove_colour(BLUE));
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_advance_cycles() {
        let mut palette = Palette::from_colours([RED, GREEN, BLUE]);
        let start = palette.cursor();
        let mut seen = Vec::new();
        for _ in 0..palette.len() {
            seen.push(palette.current());
            palette.advance();
        }
        assert_eq!(seen, vec![RED, GREEN, BLUE]);
        assert_eq!(palette.cursor(), start);
    }

    #[test]
    fn test_advance_single_colour_is_noop() {
        let mut palette = Palette::new();
        for _ in 0..5 {
            palette.advance();
            assert_eq!(palette.cursor(), 0);
        }
    }

    #[test]
    fn test_from_colours_dedups_and_defaults() {
        let palette = Palette::from_colours([RED, RED, GREEN]);
        assert_eq!(palette.colours(), &[RED, GREEN]);

        let empty = Palette::from_colours(Vec::new());
        assert_eq!(empty, Palette::new());
    }

    #[test]
    fn test_select_out_of_range() {
        let mut palette = Palette::from_colours([RED, GREEN]);
        assert!(!palette.select(2));
        assert_eq!(palette.cursor(), 0);
        assert!(palette.select(1));
        assert_eq!(palette.current(), GREEN);
    }

    #[test]
    fn test_invariant_over_mixed_operations() {
        let colours = [Colour::BLACK, RED, GREEN, BLUE];
        let mut palette = Palette::new();

        // Deterministic walk over add/remove/advance combinations.
        for step in 0..200usize {
            let colour = colours[(step * 7 + step / 3) % colours.len()];
            match step % 5 {
                0 | 1 => {
                    palette.add_colour(colour);
                }
                2 => {
                    palette.remove_colour(colour);
                }
                3 => palette.advance(),
                _ => {
                    palette.select(step % 4);
                }
            }
            assert_invariant(&palette);
        }
    }
}
