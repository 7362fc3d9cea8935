//! Weighted 8-neighborhood average used as the smoothness term.
//!
//! Kernel (Horn–Schunck Laplacian approximation):
//! ```text
//! 1/12  1/6  1/12
//! 1/6    0   1/6
//! 1/12  1/6  1/12
//! ```
use crate::image::ImageF32;

const EDGE_WEIGHT: f32 = 1.0 / 6.0;
const CORNER_WEIGHT: f32 = 1.0 / 12.0;

/// Kernel evaluated at (x, y) without bounds handling. The caller guarantees
/// `1 <= x < w-1` and `1 <= y < h-1`.
#[inline]
pub fn neighborhood_average(r: &ImageF32, x: usize, y: usize) -> f32 {
    let up = r.idx(x, y - 1);
    let mid = r.idx(x, y);
    let down = r.idx(x, y + 1);
    let d = &r.data;

    let edges = d[mid - 1] + d[down] + d[mid + 1] + d[up];
    let corners = d[up - 1] + d[down - 1] + d[down + 1] + d[up + 1];
    EDGE_WEIGHT * edges + CORNER_WEIGHT * corners
}

/// Local average of `r` around (x, y).
///
/// Returns 0 on the outer frame of the raster (x = 0, y = 0, x = w-1 or
/// y = h-1). This biases border velocities toward zero and is kept on purpose.
#[inline]
pub fn local_average(r: &ImageF32, x: usize, y: usize) -> f32 {
    if x == 0 || y == 0 || x + 1 >= r.w || y + 1 >= r.h {
        return 0.0;
    }
    neighborhood_average(r, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(w: usize, h: usize) -> ImageF32 {
        let mut img = ImageF32::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set(x, y, (y * w + x) as f32 + 1.0);
            }
        }
        img
    }

    #[test]
    fn interior_average_matches_kernel() {
        let img = numbered(5, 4);
        let (x, y) = (2, 1);
        let edges = img.get(x - 1, y) + img.get(x + 1, y) + img.get(x, y - 1) + img.get(x, y + 1);
        let corners = img.get(x - 1, y - 1)
            + img.get(x + 1, y - 1)
            + img.get(x - 1, y + 1)
            + img.get(x + 1, y + 1);
        let expected = edges / 6.0 + corners / 12.0;
        let got = local_average(&img, x, y);
        assert!(
            (got - expected).abs() < 1e-5,
            "expected {expected}, got {got}"
        );
    }

    #[test]
    fn constant_field_averages_to_its_value() {
        let img = ImageF32::filled(4, 4, 3.0);
        let got = local_average(&img, 1, 2);
        assert!((got - 3.0).abs() < 1e-6, "got {got}");
    }

    #[test]
    fn border_pixels_average_to_zero() {
        let img = ImageF32::filled(5, 5, 7.0);
        for i in 0..5 {
            assert_eq!(local_average(&img, 0, i), 0.0);
            assert_eq!(local_average(&img, i, 0), 0.0);
            assert_eq!(local_average(&img, 4, i), 0.0);
            assert_eq!(local_average(&img, i, 4), 0.0);
        }
    }

    #[test]
    fn checked_and_unchecked_agree_inside() {
        let img = numbered(6, 6);
        for y in 1..5 {
            for x in 1..5 {
                assert_eq!(
                    local_average(&img, x, y).to_bits(),
                    neighborhood_average(&img, x, y).to_bits()
                );
            }
        }
    }
}
