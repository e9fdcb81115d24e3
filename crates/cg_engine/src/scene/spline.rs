//! Closed-loop Catmull-Rom splines

use crate::foundation::math::Vec3;

/// One Catmull-Rom segment between `p1` and `p2` at local parameter `t ∈ [0, 1]`
pub fn catmull_rom_segment(p0: &Vec3, p1: &Vec3, p2: &Vec3, p3: &Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    (p1 * 2.0
        + (-p0 + p2) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (-p0 + p1 * 3.0 - p2 * 3.0 + p3) * t3)
        * 0.5
}

/// Point at global parameter `t` on the closed loop through `points`.
///
/// `t = k / n` lands exactly on `points[k]`; values outside `[0, 1)` wrap
/// around the loop. Returns `None` for an empty point list or a non-finite `t`.
pub fn catmull_rom(points: &[Vec3], t: f32) -> Option<Vec3> {
    let n = points.len();
    if n == 0 || !t.is_finite() {
        return None;
    }

    let total = t.rem_euclid(1.0) * n as f32;
    let segment = total.floor();
    let local = total - segment;

    let segment = (segment as usize) % n;
    let wrap = |offset: usize| &points[(segment + offset) % n];

    Some(catmull_rom_segment(wrap(n - 1), wrap(0), wrap(1), wrap(2), local))
}

/// The loop sampled at `t = k / samples` for `k` in `0..=samples`.
///
/// The last sample coincides with the first, closing the polyline.
pub fn closed_curve(points: &[Vec3], samples: usize) -> Vec<Vec3> {
    if points.is_empty() || samples == 0 {
        return Vec::new();
    }
    (0..=samples)
        .filter_map(|k| catmull_rom(points, k as f32 / samples as f32))
        .collect()
}
