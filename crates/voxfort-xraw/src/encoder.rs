//! Binary encoder serializing a [`VoxelVolume`] to the XRAW voxel-exchange format.
//!
//! XRAW is a write-only target here: there is no decoder, no compression, and
//! only the 4-channel 8-bit-per-channel color layout.
//!
//! ## Binary layout (little-endian)
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | Magic bytes `"XRAW"` |
//! | 4 | 1 | Channel type (0 = unsigned integer) |
//! | 5 | 1 | Channel count (4, RGBA) |
//! | 6 | 1 | Bits per channel (8) |
//! | 7 | 1 | Bits per index (8 or 16) |
//! | 8 | 4 | Width (x extent, `u32`) |
//! | 12 | 4 | Length (y extent, `u32`) |
//! | 16 | 4 | Height (z extent, `u32`) |
//! | 20 | 4 | Declared palette count (`u32`) |
//! | 24 | W×L×H × 1 or 2 | Voxel indices, z-major then x-major (y fastest) |
//! | … | 4 × N | Palette block, raw `[r, g, b, a]` entries |
//!
//! With fewer than 256 palette colors the file uses 8-bit indices and
//! declares exactly 256 palette entries: index 0 is a reserved empty slot,
//! every real color shifts up by one, and the palette block is padded with
//! placeholder entries. At 256 colors and beyond, indices are raw `u16`
//! values (the empty sentinel's all-ones pattern included) and the palette
//! block holds exactly the real colors.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use voxfort_voxel::{EMPTY_SLOT, VoxelVolume};

use crate::observer::EncodeObserver;

/// Magic bytes identifying the XRAW format.
const MAGIC: [u8; 4] = *b"XRAW";

/// Filler for the reserved index-0 slot and for palette-block padding in
/// low-color mode.
const PLACEHOLDER: [u8; 4] = *b"FAKE";

/// Fixed scale for progress reporting: layer completion is mapped into
/// `[0, 2048)`.
const PROGRESS_SCALE: u32 = 2048;

/// Errors that can occur while encoding.
///
/// Any failure aborts the whole write; partially written output is left
/// as-is (no cleanup, no retry).
#[derive(Debug, thiserror::Error)]
pub enum XRawError {
    /// The underlying writer failed (disk full, permissions, invalid path).
    #[error("xraw write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Encodes `volume` into `writer` in the XRAW format.
///
/// `label` names the destination in progress messages. The observer's
/// [`progress`](EncodeObserver::progress) fires after each z-layer; the
/// completion callback is the caller's job (see [`save_xraw`]), since only
/// the caller knows the real destination.
///
/// Returns the number of non-empty voxels written.
pub fn write_xraw<W: Write, O: EncodeObserver>(
    mut writer: W,
    volume: &VoxelVolume,
    label: &str,
    observer: &mut O,
) -> Result<u64, XRawError> {
    let palette = volume.palette();
    let low_color = palette.len() < 256;

    // Header
    writer.write_all(&MAGIC)?;
    writer.write_all(&[0])?; // unsigned integer channels
    writer.write_all(&[4])?; // RGBA
    writer.write_all(&[8])?; // bits per channel
    writer.write_all(&[if low_color { 8 } else { 16 }])?; // bits per index
    writer.write_all(&volume.width().to_le_bytes())?;
    writer.write_all(&volume.length().to_le_bytes())?;
    writer.write_all(&volume.height().to_le_bytes())?;
    let declared_count: u32 = if low_color { 256 } else { palette.len() as u32 };
    writer.write_all(&declared_count.to_le_bytes())?;

    // Voxel index stream, one z-layer at a time.
    let height = volume.height();
    let mut voxel_count: u64 = 0;
    for (z, layer) in volume.layers().enumerate() {
        for &slot in layer {
            if low_color {
                if slot == EMPTY_SLOT {
                    writer.write_all(&[0])?;
                } else {
                    // Shift past the reserved empty slot at index 0.
                    writer.write_all(&[(slot + 1) as u8])?;
                    voxel_count += 1;
                }
            } else {
                writer.write_all(&slot.to_le_bytes())?;
                if slot != EMPTY_SLOT {
                    voxel_count += 1;
                }
            }
        }
        writer.flush()?;
        observer.progress(z as u32 * PROGRESS_SCALE / height, &format!("Saving {label}"));
    }

    // Palette block.
    if low_color {
        // The reserved empty slot promised by the declared count of 256.
        writer.write_all(&PLACEHOLDER)?;
        // The padding bound below tops out at 255 real colors; a low-color
        // palette beyond that would silently emit a short block.
        debug_assert!(palette.len() <= 255);
    }
    for color in palette.iter() {
        writer.write_all(&[color.r, color.g, color.b, color.a])?;
    }
    for _ in palette.len()..255 {
        writer.write_all(&PLACEHOLDER)?;
    }
    writer.flush()?;

    Ok(voxel_count)
}

/// Creates `path` and encodes `volume` into it, then fires the observer's
/// one-shot completion callback with the path, the unique color count, and
/// the non-empty voxel count.
///
/// Returns the non-empty voxel count.
pub fn save_xraw<O: EncodeObserver>(
    path: &Path,
    volume: &VoxelVolume,
    observer: &mut O,
) -> Result<u64, XRawError> {
    tracing::info!(
        width = volume.width(),
        length = volume.length(),
        height = volume.height(),
        "saving XRAW to {}",
        path.display()
    );
    let file = File::create(path)?;
    let label = path.display().to_string();
    let voxel_count = write_xraw(BufWriter::new(file), volume, &label, observer)?;
    tracing::info!(
        unique_colors = volume.palette().len(),
        voxel_count,
        "XRAW save complete: {}",
        path.display()
    );
    observer.finished(path, volume.palette().len(), voxel_count);
    Ok(voxel_count)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
