//! Spatio-temporal brightness derivatives over a 2×2×2 cube.
//!
//! Each derivative at (x, y) averages four forward differences taken from the
//! pixel block {x, x+1} × {y, y+1} of both frames. The differences are summed
//! in integer arithmetic and scaled by 1/4 once, so the result is exact for
//! 8-bit input.
//!
//! The last row and column have no forward neighbor and keep zero.
use crate::error::{FlowError, Result};
use crate::image::{ImageF32, ImageU8, ImageView};
use log::debug;

/// Brightness derivatives shared read-only by all relaxation workers.
///
/// `idx` is the difference operator paired with the `u` component and runs
/// between raster rows (`y + 1` minus `y`); `idy` is paired with `v` and runs
/// between raster columns (`x + 1` minus `x`). The needle map draws `u` along
/// raster x, so horizontal motion shows up in `v`.
#[derive(Clone, Debug)]
pub struct DerivativeSet {
    /// Difference between rows, paired with `u`
    pub idx: ImageF32,
    /// Difference between columns, paired with `v`
    pub idy: ImageF32,
    /// Derivative along time (second frame minus first)
    pub idt: ImageF32,
}

impl DerivativeSet {
    /// Zero derivatives for a `w × h` image.
    pub fn zeros(w: usize, h: usize) -> Self {
        Self {
            idx: ImageF32::new(w, h),
            idy: ImageF32::new(w, h),
            idt: ImageF32::new(w, h),
        }
    }

    pub fn width(&self) -> usize {
        self.idx.w
    }

    pub fn height(&self) -> usize {
        self.idx.h
    }

    /// `(Idx, Idy, Idt)` at (x, y).
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> (f32, f32, f32) {
        let i = self.idx.idx(x, y);
        (self.idx.data[i], self.idy.data[i], self.idt.data[i])
    }
}

/// Compute `Idx`, `Idy`, `Idt` for the frame pair (`first` at t, `second` at
/// t + dt). The frames must have identical dimensions.
pub fn compute_derivatives(first: ImageU8<'_>, second: ImageU8<'_>) -> Result<DerivativeSet> {
    if !first.conforms_to(&second) {
        return Err(FlowError::DimensionMismatch {
            first: first.dims(),
            second: second.dims(),
        });
    }
    let (w, h) = first.dims();
    let mut out = DerivativeSet::zeros(w, h);
    if w < 2 || h < 2 {
        return Ok(out);
    }

    let rows = h - 1;
    {
        let DerivativeSet { idx, idy, idt } = &mut out;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            idx.data
                .par_chunks_mut(w)
                .zip(idy.data.par_chunks_mut(w))
                .zip(idt.data.par_chunks_mut(w))
                .take(rows)
                .enumerate()
                .for_each(|(y, ((dx, dy), dt))| fill_row(&first, &second, y, dx, dy, dt));
        }

        #[cfg(not(feature = "parallel"))]
        {
            idx.data
                .chunks_mut(w)
                .zip(idy.data.chunks_mut(w))
                .zip(idt.data.chunks_mut(w))
                .take(rows)
                .enumerate()
                .for_each(|(y, ((dx, dy), dt))| fill_row(&first, &second, y, dx, dy, dt));
        }
    }

    debug!("compute_derivatives w={} h={}", w, h);
    Ok(out)
}

fn fill_row(
    f1: &ImageU8<'_>,
    f2: &ImageU8<'_>,
    y: usize,
    dx: &mut [f32],
    dy: &mut [f32],
    dt: &mut [f32],
) {
    let w = f1.w;
    for x in 0..w - 1 {
        // Corners of the 2×2 block: a=(x,y) b=(x+1,y) c=(x,y+1) d=(x+1,y+1).
        let [a1, b1, c1, d1] = block(f1, x, y);
        let [a2, b2, c2, d2] = block(f2, x, y);

        let sx = (c1 - a1) + (d1 - b1) + (c2 - a2) + (d2 - b2);
        let sy = (b1 - a1) + (d1 - c1) + (b2 - a2) + (d2 - c2);
        let st = (a2 - a1) + (b2 - b1) + (c2 - c1) + (d2 - d1);

        dx[x] = 0.25 * sx as f32;
        dy[x] = 0.25 * sy as f32;
        dt[x] = 0.25 * st as f32;
    }
}

#[inline]
fn block(img: &ImageU8<'_>, x: usize, y: usize) -> [i32; 4] {
    [
        img.intensity(x, y),
        img.intensity(x + 1, y),
        img.intensity(x, y + 1),
        img.intensity(x + 1, y + 1),
    ]
}
