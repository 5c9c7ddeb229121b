//! Raster storage, loading and resizing for Infizoom.
//!
//! This module provides functionality for:
//! - Holding RGB pixel buffers shared between the history, the enhancement
//!   pipeline and the animators
//! - Decoding uploaded images (JPEG, PNG) with EXIF orientation applied
//! - Resizing rasters with the `image` crate's filters
//!
//! # Ownership
//!
//! Rasters are immutable once built. Components pass them around as
//! [`RasterHandle`] (an `Arc<Raster>`), and only the history replaces the
//! current image, always wholesale.
//!
//! # Examples
//!
//! ```ignore
//! use infizoom_core::raster::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let raster = decode_image(&bytes).unwrap();
//! println!("Loaded {}x{} image", raster.width, raster.height);
//! ```

mod decode;
mod resize;
mod types;

pub use decode::{decode_image, read_orientation};
pub use resize::{resize, resize_to_fit};
pub use types::{DecodeError, FilterType, Orientation, Raster, RasterHandle};
