#![allow(dead_code)]

/// Smooth periodic texture shifted by `(dx, dy)` whole pixels.
///
/// Sample `(x, y)` of the shifted frame shows the texture at `(x - dx, y - dy)`,
/// so the content moves by `(+dx, +dy)`.
pub fn shifted_texture_u8(width: usize, height: usize, dx: i32, dy: i32) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let sx = (x as i32 - dx) as f32;
            let sy = (y as i32 - dy) as f32;
            let v = 128.0 + 60.0 * (sx * 0.35).sin() + 50.0 * (sy * 0.27).cos();
            img[y * width + x] = v.clamp(0.0, 255.0) as u8;
        }
    }
    img
}

/// Uniform frame.
pub fn flat_u8(width: usize, height: usize, value: u8) -> Vec<u8> {
    vec![value; width * height]
}
