//! Owned single-channel f32 raster in row-major layout (stride == width).
//!
//! Backs the derivative images, both slots of the flow field and the needle
//! map. Cells default to zero, which the estimator relies on for the border
//! rows and columns it never writes.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    /// Construct a buffer of size `w × h` with every cell set to `value`.
    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Copy column `x` into `out` (one value per row).
    pub fn read_column(&self, x: usize, out: &mut [f32]) {
        for (y, slot) in out.iter_mut().enumerate().take(self.h) {
            *slot = self.get(x, y);
        }
    }

    /// Overwrite column `x` with `values` (one value per row).
    pub fn write_column(&mut self, x: usize, values: &[f32]) {
        for (y, &v) in values.iter().enumerate().take(self.h) {
            self.set(x, y, v);
        }
    }

    /// Copy `count` columns from `src` starting at `src_x` into `self` at
    /// `dst_x`. Both rasters must share the same height.
    pub fn copy_columns_from(&mut self, src: &ImageF32, src_x: usize, dst_x: usize, count: usize) {
        debug_assert_eq!(self.h, src.h);
        for y in 0..self.h {
            let s = src.idx(src_x, y);
            let d = self.idx(dst_x, y);
            self.data[d..d + count].copy_from_slice(&src.data[s..s + count]);
        }
    }
}

impl crate::image::traits::ImageView for ImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_round_trip_preserves_other_columns() {
        let mut img = ImageF32::new(3, 4);
        img.write_column(1, &[1.0, 2.0, 3.0, 4.0]);
        let mut col = vec![0.0; 4];
        img.read_column(1, &mut col);
        assert_eq!(col, vec![1.0, 2.0, 3.0, 4.0]);
        img.read_column(0, &mut col);
        assert!(col.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn copy_columns_moves_a_block() {
        let mut src = ImageF32::new(4, 2);
        for y in 0..2 {
            for x in 0..4 {
                src.set(x, y, (10 * y + x) as f32);
            }
        }
        let mut dst = ImageF32::new(2, 2);
        dst.copy_columns_from(&src, 1, 0, 2);
        assert_eq!(dst.data, vec![1.0, 2.0, 11.0, 12.0]);
    }
}
