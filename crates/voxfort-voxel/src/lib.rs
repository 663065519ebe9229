//! Dense voxel volume storage with deduplicated, order-preserving palette colors.

pub mod palette;
pub mod volume;

pub use palette::{PaletteError, PaletteTable, Rgba};
pub use volume::{EMPTY_SLOT, GridError, MAX_EXTENT, VoxelVolume};
