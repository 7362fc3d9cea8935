//! Needle-map visualization of a flow field.
//!
//! The two flow slots are averaged, the output is filled with a background
//! value, and a short segment from (x, y) to (x + u, y + v) is drawn at every
//! sample point of a coarse grid where both averaged components are non-zero.
use crate::error::{FlowError, Result};
use crate::flow::FlowField;
use crate::image::draw::draw_line;
use crate::image::{ImageF32, ImageView};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Sampling grid and intensities of the needle map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedleMapOptions {
    /// Fill value of the output raster.
    pub background: f32,
    /// Value written along each needle.
    pub needle_value: f32,
    /// Sample every `column_step`-th column (>= 1).
    pub column_step: usize,
    /// Sample every `row_step`-th row (>= 1).
    pub row_step: usize,
}

impl Default for NeedleMapOptions {
    fn default() -> Self {
        Self {
            background: 255.0,
            needle_value: 0.0,
            column_step: 2,
            row_step: 4,
        }
    }
}

impl NeedleMapOptions {
    pub fn validate(&self) -> Result<()> {
        if self.column_step == 0 || self.row_step == 0 {
            return Err(FlowError::Config(format!(
                "needle sampling steps must be positive, got column_step={} row_step={}",
                self.column_step, self.row_step
            )));
        }
        Ok(())
    }
}

/// Rendered needle map and the number of needles drawn into it.
#[derive(Clone, Debug)]
pub struct NeedleMap {
    pub image: ImageF32,
    pub needles: usize,
}

impl NeedleMap {
    /// Build the needle map from both slots of `field`.
    pub fn from_field(field: &FlowField, options: &NeedleMapOptions) -> Result<Self> {
        let (odd, even) = field.odd_even();
        build_needle_map(odd.u, even.u, odd.v, even.v, options)
    }
}

/// Average `(u_odd, u_even)` and `(v_odd, v_even)` and draw the sampled
/// needles. All four rasters must share the same dimensions.
pub fn build_needle_map(
    u_odd: &ImageF32,
    u_even: &ImageF32,
    v_odd: &ImageF32,
    v_even: &ImageF32,
    options: &NeedleMapOptions,
) -> Result<NeedleMap> {
    options.validate()?;
    let (w, h) = (u_odd.w, u_odd.h);
    for other in [u_even, v_odd, v_even] {
        if (other.w, other.h) != (w, h) {
            return Err(FlowError::DimensionMismatch {
                first: (w, h),
                second: (other.w, other.h),
            });
        }
    }

    let u_avg = average(u_odd, u_even);
    let v_avg = average(v_odd, v_even);

    let mut image = ImageF32::filled(w, h, options.background);
    let mut needles = 0usize;
    let mut skipped = 0usize;
    for y in (0..h).step_by(options.row_step) {
        for x in (0..w).step_by(options.column_step) {
            let u = u_avg.get(x, y);
            let v = v_avg.get(x, y);
            if u == 0.0 || v == 0.0 {
                continue;
            }
            let (ex, ey) = (x as f32 + u, y as f32 + v);
            if !ex.is_finite() || !ey.is_finite() {
                skipped += 1;
                continue;
            }
            // Endpoints truncate toward zero like an integer cast.
            draw_line(
                &mut image,
                x as i64,
                y as i64,
                ex as i64,
                ey as i64,
                options.needle_value,
            );
            needles += 1;
        }
    }

    if skipped > 0 {
        warn!("build_needle_map skipped {} needles with non-finite flow", skipped);
    }
    debug!("build_needle_map w={} h={} needles={}", w, h, needles);
    Ok(NeedleMap { image, needles })
}

fn average(a: &ImageF32, b: &ImageF32) -> ImageF32 {
    let mut out = ImageF32::new(a.w, a.h);
    let rows = out.data.chunks_mut(a.w.max(1)).zip(a.rows()).zip(b.rows());
    for ((dst, ra), rb) in rows {
        for ((o, &x), &y) in dst.iter_mut().zip(ra).zip(rb) {
            *o = (x + y) / 2.0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_field_leaves_background_untouched() {
        let field = FlowField::new(4, 4);
        let map = NeedleMap::from_field(&field, &NeedleMapOptions::default()).unwrap();
        assert_eq!(map.needles, 0);
        assert_eq!(map.image, ImageF32::filled(4, 4, 255.0));
    }

    #[test]
    fn needles_start_at_sample_points_only() {
        let (w, h) = (9, 9);
        let u = ImageF32::filled(w, h, 2.0);
        let v = ImageF32::filled(w, h, 1.0);
        let map = build_needle_map(&u, &u, &v, &v, &NeedleMapOptions::default()).unwrap();
        // Samples at x in {0,2,4,6,8} and y in {0,4,8}.
        assert_eq!(map.needles, 15);
        assert_eq!(map.image.get(0, 0), 0.0);
        assert_eq!(map.image.get(2, 1), 0.0);
        // Row 2 is neither a sample row nor reached by any needle.
        assert!((0..w).all(|x| map.image.get(x, 2) == 255.0));
    }

    #[test]
    fn one_zero_component_suppresses_the_needle() {
        let (w, h) = (4, 4);
        let u = ImageF32::filled(w, h, 3.0);
        let v = ImageF32::new(w, h);
        let map = build_needle_map(&u, &u, &v, &v, &NeedleMapOptions::default()).unwrap();
        assert_eq!(map.needles, 0);
        assert!(map.image.data.iter().all(|&p| p == 255.0));
    }

    #[test]
    fn slots_are_averaged_before_sampling() {
        let (w, h) = (4, 4);
        let u_odd = ImageF32::filled(w, h, 1.0);
        let u_even = ImageF32::filled(w, h, -1.0);
        let v = ImageF32::filled(w, h, 1.0);
        let map = build_needle_map(&u_odd, &u_even, &v, &v, &NeedleMapOptions::default()).unwrap();
        assert_eq!(map.needles, 0);
    }

    #[test]
    fn non_finite_flow_is_skipped() {
        let (w, h) = (4, 4);
        let mut u = ImageF32::filled(w, h, 1.0);
        u.set(0, 0, f32::INFINITY);
        u.set(2, 0, f32::NAN);
        let v = ImageF32::filled(w, h, 1.0);
        let map = build_needle_map(&u, &u, &v, &v, &NeedleMapOptions::default()).unwrap();
        // Only row 0 is sampled on a 4×4 raster; both of its needles are dropped.
        assert_eq!(map.needles, 0);
        assert_eq!(map.image, ImageF32::filled(w, h, 255.0));
    }

    #[test]
    fn huge_flow_draws_a_clipped_needle() {
        let (w, h) = (4, 4);
        let u = ImageF32::filled(w, h, 1e12);
        let v = ImageF32::filled(w, h, 1e12);
        let map = build_needle_map(&u, &u, &v, &v, &NeedleMapOptions::default()).unwrap();
        assert_eq!(map.needles, 2);
        for (x, y) in [(0, 0), (1, 1), (2, 2), (3, 3), (2, 0), (3, 1)] {
            assert_eq!(map.image.get(x, y), 0.0, "({x}, {y})");
        }
    }

    #[test]
    fn invalid_sampling_and_shapes_are_rejected() {
        let a = ImageF32::new(4, 4);
        let b = ImageF32::new(4, 5);
        let opts = NeedleMapOptions {
            row_step: 0,
            ..Default::default()
        };
        assert!(matches!(
            build_needle_map(&a, &a, &a, &a, &opts),
            Err(FlowError::Config(_))
        ));
        assert!(matches!(
            build_needle_map(&a, &a, &b, &a, &NeedleMapOptions::default()),
            Err(FlowError::DimensionMismatch { .. })
        ));
    }
}
