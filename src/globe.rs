//! Geometry for the point-cloud globe.

/// Axial tilt applied to the globe, in radians (23.4°).
pub const AXIAL_TILT: f32 = 0.408_407;

/// Radians the globe turns per frame.
pub const SPIN_PER_FRAME: f32 = 0.003;

/// `count` points spread evenly over the unit sphere (Fibonacci lattice),
/// flattened as `x, y, z` triples.
pub fn sphere_points(count: usize) -> Vec<f32> {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let mut out = Vec::with_capacity(count * 3);
    let last = count.saturating_sub(1).max(1) as f32;
    for i in 0..count {
        let y = 1.0 - (i as f32 / last) * 2.0;
        let r = (1.0 - y * y).max(0.0).sqrt();
        let theta = golden_angle * i as f32;
        out.extend_from_slice(&[theta.cos() * r, y, theta.sin() * r]);
    }
    out
}
