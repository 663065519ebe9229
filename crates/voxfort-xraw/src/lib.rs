//! XRAW export for [`voxfort_voxel::VoxelVolume`]: write-only serialization to
//! the XRAW voxel-exchange format, with progress reported through an injected
//! observer.

pub mod encoder;
pub mod observer;

pub use encoder::{XRawError, save_xraw, write_xraw};
pub use observer::{EncodeObserver, TracingObserver};
