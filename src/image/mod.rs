//! Single-channel rasters used by the flow estimator.
//!
//! - [`ImageU8`]: borrowed 8-bit view over a grayscale frame.
//! - [`ImageF32`]: owned float raster for derivatives, flow components and the
//!   needle map.
//! - [`io`]: frame loading and raster writing on top of the `image` crate.
//! - [`draw`]: the line primitive used by the needle map.
pub mod draw;
pub mod f32;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::traits::{ImageView, Rows};
pub use self::u8::ImageU8;
