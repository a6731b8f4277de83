//! Photo loading, pure Rust with no external tools.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Read** | `std::fs::read` (whole file into memory) |
//! | **Identify** | `image::ImageReader::into_dimensions` (header only, no full decode) |
//! | **Display size** | [`display_size`]: stretch or fit into a box |
//!
//! The module is split into:
//! - **Calculations**: pure functions for dimension math (unit testable)
//! - **Photo**: reading a file and identifying its format and size

mod calculations;
mod photo;

pub use calculations::{display_size, fit_within};
pub use photo::{Dimensions, ImagingError, Photo, load_photo, photo_exists, resolve_photo};
