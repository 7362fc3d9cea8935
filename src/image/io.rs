//! I/O helpers for grayscale frames, float rasters and JSON.
//!
//! - `load_gray_frame`: read a PNG/JPEG/BMP into an owned 8-bit gray buffer.
//! - `load_frame_pair`: load both frames and enforce equal dimensions.
//! - `save_raster_f32`: write an `ImageF32` holding 0..255 intensities.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageU8, ImageView};
use crate::error::{FlowError, Result};
use image::{GrayImage, Luma};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit grayscale buffer with stride and borrowed view conversion.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer given raw bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        let stride = width;
        Self {
            width,
            height,
            stride,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.stride,
            data: &self.data,
        }
    }
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_gray_frame(path: &Path) -> Result<GrayImageU8> {
    let img = image::open(path)
        .map_err(|source| FlowError::Load {
            path: path.to_path_buf(),
            source,
        })?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw();
    Ok(GrayImageU8::new(width, height, data))
}

/// Load the frames at time t and t + dt; both must decode and share the same
/// width and height.
pub fn load_frame_pair(first: &Path, second: &Path) -> Result<(GrayImageU8, GrayImageU8)> {
    let a = load_gray_frame(first)?;
    let b = load_gray_frame(second)?;
    if !a.as_view().conforms_to(&b.as_view()) {
        return Err(FlowError::DimensionMismatch {
            first: (a.width(), a.height()),
            second: (b.width(), b.height()),
        });
    }
    debug!(
        "load_frame_pair {}x{} from {} and {}",
        a.width(),
        a.height(),
        first.display(),
        second.display()
    );
    Ok((a, b))
}

/// Save a float raster as 8-bit grayscale, clamping values to [0, 255].
/// The encoder is chosen from the file extension.
pub fn save_raster_f32(image: &ImageF32, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = px.clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path).map_err(|source| FlowError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| FlowError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| FlowError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| FlowError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
