//! Integer line rasterization on float rasters.
use super::ImageF32;

/// Draw a line from (x0, y0) to (x1, y1) inclusive with Bresenham's
/// algorithm, setting touched cells to `value`.
///
/// The segment is clipped to the raster before rasterizing, so the cost is
/// bounded by the raster size however far outside the endpoints lie.
pub fn draw_line(img: &mut ImageF32, x0: i64, y0: i64, x1: i64, y1: i64, value: f32) {
    if img.w == 0 || img.h == 0 {
        return;
    }
    let (xmax, ymax) = ((img.w - 1) as f64, (img.h - 1) as f64);
    let Some(((fx0, fy0), (fx1, fy1))) = clip_segment(
        (x0 as f64, y0 as f64),
        (x1 as f64, y1 as f64),
        xmax,
        ymax,
    ) else {
        return;
    };
    let snap = |v: f64, max: f64| v.round().clamp(0.0, max) as i64;
    let (x0, y0) = (snap(fx0, xmax), snap(fy0, ymax));
    let (x1, y1) = (snap(fx1, xmax), snap(fy1, ymax));

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut cx, mut cy) = (x0, y0);

    loop {
        img.set(cx as usize, cy as usize, value);
        if cx == x1 && cy == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cx += sx;
        }
        if e2 <= dx {
            err += dx;
            cy += sy;
        }
    }
}

/// Liang–Barsky clip of the segment `p0 → p1` against `[0, xmax] × [0, ymax]`.
/// Returns `None` when the segment misses the box.
fn clip_segment(
    p0: (f64, f64),
    p1: (f64, f64),
    xmax: f64,
    ymax: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, p0.0), (dx, xmax - p0.0), (-dy, p0.1), (dy, ymax - p0.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (p0.0 + t0 * dx, p0.1 + t0 * dy),
        (p0.0 + t1 * dx, p0.1 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touched(img: &ImageF32) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..img.h {
            for x in 0..img.w {
                if img.get(x, y) == 1.0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn horizontal_line_covers_both_endpoints() {
        let mut img = ImageF32::new(5, 3);
        draw_line(&mut img, 1, 1, 3, 1, 1.0);
        assert_eq!(touched(&img), vec![(1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn diagonal_line_steps_both_axes() {
        let mut img = ImageF32::new(4, 4);
        draw_line(&mut img, 3, 3, 0, 0, 1.0);
        assert_eq!(touched(&img), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn out_of_bounds_segments_are_clipped() {
        let mut img = ImageF32::new(3, 3);
        draw_line(&mut img, -2, 1, 5, 1, 1.0);
        assert_eq!(touched(&img), vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn far_away_endpoints_are_clipped_before_rasterizing() {
        let mut img = ImageF32::new(4, 4);
        draw_line(&mut img, 1, 1, 1_000_000_000_000, 1_000_000_000_000, 1.0);
        assert_eq!(touched(&img), vec![(1, 1), (2, 2), (3, 3)]);

        let mut img = ImageF32::new(4, 4);
        draw_line(&mut img, 0, 2, i64::MAX, 2, 1.0);
        draw_line(&mut img, 3, 0, i64::MIN, 0, 1.0);
        assert_eq!(
            touched(&img),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (0, 2), (1, 2), (2, 2), (3, 2)]
        );
    }

    #[test]
    fn segments_missing_the_raster_draw_nothing() {
        let mut img = ImageF32::new(3, 3);
        draw_line(&mut img, -5, -1, 10, -1, 1.0);
        draw_line(&mut img, 4, 0, 9, 2, 1.0);
        assert!(touched(&img).is_empty());
    }

    #[test]
    fn degenerate_line_is_a_single_point() {
        let mut img = ImageF32::new(3, 3);
        draw_line(&mut img, 2, 0, 2, 0, 1.0);
        assert_eq!(touched(&img), vec![(2, 0)]);
    }
}
