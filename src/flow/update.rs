//! Per-pixel Horn–Schunck update.
use super::params::FlowParams;

/// Regularization term for one velocity component.
///
/// `d` is the derivative along the component being updated (`dx` for u,
/// `dy` for v).
#[inline]
pub fn alpha(lambda: f32, d: f32, dx: f32, dy: f32, dt: f32, u_avg: f32, v_avg: f32) -> f32 {
    let numerator = d * (dx * u_avg + dy * v_avg + dt);
    let denominator = lambda * lambda + dx * dx + dy * dy;
    numerator / denominator
}

/// Next `(u, v)` at a pixel with derivatives `(dx, dy, dt)` and local flow
/// averages `(u_avg, v_avg)`.
#[inline]
pub fn update_pixel(
    params: &FlowParams,
    (dx, dy, dt): (f32, f32, f32),
    u_avg: f32,
    v_avg: f32,
) -> (f32, f32) {
    let FlowParams { lambda, step } = *params;
    let u = u_avg - step * alpha(lambda, dx, dx, dy, dt, u_avg, v_avg);
    let v = v_avg - step * alpha(lambda, dy, dx, dy, dt, u_avg, v_avg);
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_temporal_change_keeps_averages() {
        let params = FlowParams::default();
        // Averages already satisfy dx*u + dy*v + dt = 0.
        let (u, v) = update_pixel(&params, (2.0, 1.0, -4.0), 1.5, 1.0);
        assert_eq!((u, v), (1.5, 1.0));
    }

    #[test]
    fn alpha_matches_closed_form() {
        let a = alpha(1.2, 3.0, 3.0, 4.0, 2.0, 0.0, 0.0);
        let expected = 3.0 * 2.0 / (1.44 + 9.0 + 16.0);
        assert!((a - expected).abs() < 1e-6, "alpha={a} expected={expected}");
    }

    #[test]
    fn first_step_from_rest_moves_against_brightness_change() {
        let params = FlowParams::default();
        // Positive gradient along the `dx` axis while the pixel darkens: the
        // pattern moves toward positive u.
        let (u, v) = update_pixel(&params, (10.0, 0.0, -5.0), 0.0, 0.0);
        assert!(u > 0.0, "u={u}");
        assert_eq!(v, 0.0);
    }
}
