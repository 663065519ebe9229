//! Append-only color palette: maps [`Rgba`] values to compact indices and back.
//!
//! Insertion order is significant — it becomes the on-disk palette order when
//! a volume is exported. The palette only ever grows; colors stay in the table
//! even after every voxel referencing them has been overwritten or cleared.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A voxel color: four unsigned 8-bit channels, one byte each.
///
/// Equality is by-value over all four channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba {
    /// Creates a color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Errors raised by palette index lookups.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// The index does not name any entry in the palette.
    #[error("palette index {index} out of range ({len} colors)")]
    IndexOutOfRange {
        /// The offending index.
        index: u16,
        /// Palette size at the time of the lookup.
        len: usize,
    },
}

/// Order-preserving collection of unique colors.
///
/// `index_or_insert` gives O(1)-amortized find-or-insert through a reverse
/// hash map; the dense `Vec` preserves insertion order for export. There is
/// no removal operation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaletteTable {
    /// Unique colors in insertion order (`index == position`).
    colors: Vec<Rgba>,
    /// Reverse lookup: color → index into `colors`.
    index_of: FxHashMap<Rgba, u16>,
}

impl PaletteTable {
    /// Creates an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `color`, appending it first if it is not present.
    ///
    /// Adding a color that already exists returns the original index and
    /// leaves the palette unchanged.
    pub fn index_or_insert(&mut self, color: Rgba) -> u16 {
        if let Some(&index) = self.index_of.get(&color) {
            return index;
        }
        let index = self.colors.len() as u16;
        self.colors.push(color);
        self.index_of.insert(color, index);
        index
    }

    /// Returns the color stored at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::IndexOutOfRange`] when `index` is not below the
    /// current count. The volume's empty-slot sentinel trips this error by
    /// construction, so reading an empty voxel surfaces here.
    pub fn color(&self, index: u16) -> Result<Rgba, PaletteError> {
        self.colors
            .get(index as usize)
            .copied()
            .ok_or(PaletteError::IndexOutOfRange {
                index,
                len: self.colors.len(),
            })
    }

    /// Returns the number of unique colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if no color has been added yet.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterates colors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rgba> {
        self.colors.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_returns_sequential_indices() {
        let mut palette = PaletteTable::new();
        assert_eq!(palette.index_or_insert(Rgba::new(1, 0, 0, 255)), 0);
        assert_eq!(palette.index_or_insert(Rgba::new(0, 2, 0, 255)), 1);
        assert_eq!(palette.index_or_insert(Rgba::new(0, 0, 3, 255)), 2);
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn test_index_or_insert_is_idempotent() {
        let mut palette = PaletteTable::new();
        let color = Rgba::new(10, 20, 30, 40);
        let first = palette.index_or_insert(color);
        let second = palette.index_or_insert(color);
        assert_eq!(first, second);
        assert_eq!(palette.len(), 1, "duplicate insert must not grow the palette");
    }

    #[test]
    fn test_channels_participate_in_equality() {
        let mut palette = PaletteTable::new();
        palette.index_or_insert(Rgba::new(5, 5, 5, 255));
        // Same RGB, different alpha: a distinct color.
        palette.index_or_insert(Rgba::new(5, 5, 5, 128));
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_color_roundtrip() {
        let mut palette = PaletteTable::new();
        let color = Rgba::new(200, 100, 50, 25);
        let index = palette.index_or_insert(color);
        assert_eq!(palette.color(index).unwrap(), color);
    }

    #[test]
    fn test_color_out_of_range() {
        let palette = PaletteTable::new();
        let result = palette.color(0);
        assert!(
            matches!(result, Err(PaletteError::IndexOutOfRange { index: 0, len: 0 })),
            "expected IndexOutOfRange, got {result:?}"
        );
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let mut palette = PaletteTable::new();
        let colors = [
            Rgba::new(9, 8, 7, 6),
            Rgba::new(1, 2, 3, 4),
            Rgba::new(255, 0, 255, 0),
        ];
        for &c in &colors {
            palette.index_or_insert(c);
        }
        let stored: Vec<Rgba> = palette.iter().copied().collect();
        assert_eq!(stored, colors);
    }
}
