//! Dense, fixed-extent 3D grid of palette indices with an embedded [`PaletteTable`].
//!
//! Storage is one slot layer per z, each layer holding `width × length` `u16`
//! slots addressed `x * length + y`. The linear order of a layer is exactly
//! the order the XRAW exporter streams voxels in.
//!
//! Access follows a deliberate asymmetry: reads at invalid coordinates are
//! errors, writes at invalid coordinates are tolerated no-ops, so bulk-fill
//! callers never have to pre-clip their coordinates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::{PaletteError, PaletteTable, Rgba};

/// Maximum extent per axis.
pub const MAX_EXTENT: u32 = 2048;

/// Reserved all-ones slot value meaning "no voxel present".
///
/// The bit pattern is part of the 16-bit XRAW stream, where empty slots are
/// written through unchanged.
pub const EMPTY_SLOT: u16 = u16::MAX;

/// Errors raised by voxel reads.
#[derive(Debug, Error)]
pub enum GridError {
    /// A coordinate lies outside `[0, extent)` for its axis.
    #[error("voxel coordinates ({x}, {y}, {z}) out of bounds")]
    OutOfBounds {
        /// Requested x.
        x: i32,
        /// Requested y.
        y: i32,
        /// Requested z.
        z: i32,
    },
    /// The slot did not resolve to a palette entry. Reading an empty voxel
    /// lands here: the sentinel is out of range for every palette.
    #[error("unresolvable palette slot: {0}")]
    Palette(#[from] PaletteError),
}

/// A dense voxel grid addressed by `(x, y, z)`, backed by palette indices.
///
/// The palette lives inside the volume for its whole lifetime. It grows as
/// new colors are written and is never pruned by [`resize`](Self::resize) or
/// [`clear`](Self::clear).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoxelVolume {
    /// X extent.
    width: u32,
    /// Y extent.
    length: u32,
    /// Z extent.
    height: u32,
    /// One slot layer per z, each `width * length` entries at `x * length + y`.
    layers: Vec<Vec<u16>>,
    /// Colors referenced by the slots, shared across the whole volume.
    palette: PaletteTable,
}

impl VoxelVolume {
    /// Creates a volume with the given extents.
    ///
    /// Extents above [`MAX_EXTENT`] are rejected by the internal resize and
    /// leave a zero-extent volume. Freshly allocated slots hold index 0, not
    /// the empty sentinel; call [`clear`](Self::clear) for an empty volume.
    pub fn new(width: u32, length: u32, height: u32) -> Self {
        let mut volume = Self {
            width: 0,
            length: 0,
            height: 0,
            layers: Vec::new(),
            palette: PaletteTable::new(),
        };
        volume.resize(width, length, height);
        volume
    }

    /// Returns the x extent.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the y extent.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Returns the z extent.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the volume's palette.
    pub fn palette(&self) -> &PaletteTable {
        &self.palette
    }

    /// Checks whether all three coordinates are within `[0, extent)`.
    pub fn is_valid_coords(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as u32) < self.width
            && (y as u32) < self.length
            && (z as u32) < self.height
    }

    /// Returns the color at `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// [`GridError::OutOfBounds`] for invalid coordinates. Reading an empty
    /// slot (or a zero-filled slot after [`resize`](Self::resize) before any
    /// color exists) is a caller error and surfaces as [`GridError::Palette`];
    /// check [`occupied`](Self::occupied) first.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Result<Rgba, GridError> {
        if !self.is_valid_coords(x, y, z) {
            return Err(GridError::OutOfBounds { x, y, z });
        }
        let slot = self.layers[z as usize][self.slot_index(x, y)];
        Ok(self.palette.color(slot)?)
    }

    /// Sets the voxel at `(x, y, z)` to `color`, growing the palette if the
    /// color is new.
    ///
    /// No-op if any coordinate is invalid.
    pub fn set(&mut self, x: i32, y: i32, z: i32, color: Rgba) {
        if !self.is_valid_coords(x, y, z) {
            tracing::warn!("VoxelVolume::set out of bounds: ({}, {}, {})", x, y, z);
            return;
        }
        let index = self.palette.index_or_insert(color);
        let slot = self.slot_index(x, y);
        self.layers[z as usize][slot] = index;
    }

    /// Stores a raw palette index without touching the palette.
    ///
    /// For indices already resolved through the palette, e.g. when re-applying
    /// a color across many slots. No-op if any coordinate is invalid.
    pub fn set_index(&mut self, x: i32, y: i32, z: i32, index: u16) {
        if !self.is_valid_coords(x, y, z) {
            tracing::warn!("VoxelVolume::set_index out of bounds: ({}, {}, {})", x, y, z);
            return;
        }
        let slot = self.slot_index(x, y);
        self.layers[z as usize][slot] = index;
    }

    /// Marks the voxel at `(x, y, z)` as empty.
    ///
    /// No-op if any coordinate is invalid. The palette keeps the color the
    /// slot previously referenced.
    pub fn clear_voxel(&mut self, x: i32, y: i32, z: i32) {
        if !self.is_valid_coords(x, y, z) {
            return;
        }
        let slot = self.slot_index(x, y);
        self.layers[z as usize][slot] = EMPTY_SLOT;
    }

    /// Repaints the `(x, y)` column: clears the full height, then fills with
    /// `color` — only slot `z_max` when `z_min == z_max`, otherwise every z in
    /// `(z_min, z_max]` (`z_min` excluded, `z_max` included).
    ///
    /// Calling repeatedly with rising `z_max` raises a column's top surface
    /// the way heightmap-driven terrain construction does; the initial clear
    /// guarantees no stale voxels survive from a previous span. The color is
    /// resolved into the palette even when the column is out of bounds.
    pub fn set_column(&mut self, color: Rgba, x: i32, y: i32, z_min: i32, z_max: i32) {
        let index = self.palette.index_or_insert(color);
        for z in 0..self.height as i32 {
            self.clear_voxel(x, y, z);
        }
        if z_min == z_max {
            self.set_index(x, y, z_max, index);
        } else {
            for z in (z_min + 1)..=z_max {
                self.set_index(x, y, z, index);
            }
        }
    }

    /// Replaces the backing storage with new extents, discarding all voxel
    /// data. Returns `false` without mutating anything when the extents are
    /// unchanged or any extent exceeds [`MAX_EXTENT`].
    ///
    /// Fresh slots hold index 0, not the empty sentinel — callers wanting an
    /// empty volume must [`clear`](Self::clear) afterwards. The palette is
    /// untouched either way.
    pub fn resize(&mut self, width: u32, length: u32, height: u32) -> bool {
        if width == self.width && length == self.length && height == self.height {
            return false; // no size change
        }
        if width > MAX_EXTENT || length > MAX_EXTENT || height > MAX_EXTENT {
            return false; // too big
        }
        let layer_len = width as usize * length as usize;
        self.layers = (0..height).map(|_| vec![0u16; layer_len]).collect();
        self.width = width;
        self.length = length;
        self.height = height;
        true
    }

    /// Marks every slot in the current extents as empty without reallocating.
    /// Does not touch the palette.
    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.fill(EMPTY_SLOT);
        }
    }

    /// Returns `true` iff the coordinates are valid and the slot holds a
    /// voxel (is not the empty sentinel).
    pub fn occupied(&self, x: i32, y: i32, z: i32) -> bool {
        self.is_valid_coords(x, y, z)
            && self.layers[z as usize][self.slot_index(x, y)] != EMPTY_SLOT
    }

    /// Iterates raw slot layers in ascending z order.
    ///
    /// Each layer's linear order is the on-disk voxel stream order; slots
    /// carry raw indices including [`EMPTY_SLOT`]. This is the exporter's
    /// view of the storage.
    pub fn layers(&self) -> impl ExactSizeIterator<Item = &[u16]> {
        self.layers.iter().map(Vec::as_slice)
    }

    /// Converts valid `(x, y)` to a linear index within a layer (y varies
    /// fastest).
    fn slot_index(&self, x: i32, y: i32) -> usize {
        debug_assert!(x >= 0 && y >= 0);
        x as usize * self.length as usize + y as usize
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
