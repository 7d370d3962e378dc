//! Resampled lookup table derived from a control-point list.

use super::ControlPoint;

/// Number of samples in a resampled lookup table.
pub const LUT_SIZE: usize = 256;

/// GPU-ready RGBA resampling of a transfer function.
///
/// Derived deterministically from a control-point list; never persisted,
/// always regenerable. Entry `i` holds the color at normalized intensity
/// `i / 255`.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable([[f32; 4]; LUT_SIZE]);

impl LookupTable {
    /// Resample a sorted control-point list into a 256-entry table.
    ///
    /// A single scan pointer advances forward through the list as `t`
    /// increases, so the whole table is built in O(256 + n). The first and
    /// last samples map directly to the boundary points' colors with no
    /// interpolation.
    ///
    /// Callers must uphold the model invariants: at least two points,
    /// strictly ascending unique positions, boundaries pinned at 0 and 1.
    pub(crate) fn from_points(points: &[ControlPoint]) -> Self {
        let mut table = [[0.0_f32; 4]; LUT_SIZE];
        let last = points.len() - 1;

        // Index of the upper bracketing point; only ever moves forward.
        let mut hi = 1;

        for (i, entry) in table.iter_mut().enumerate() {
            if i == 0 {
                *entry = points[0].color;
                continue;
            }
            if i == LUT_SIZE - 1 {
                *entry = points[last].color;
                continue;
            }

            let t = i as f32 / (LUT_SIZE - 1) as f32;
            while hi < last && t > points[hi].position {
                hi += 1;
            }

            let lo = &points[hi - 1];
            let up = &points[hi];
            let frac = (t - lo.position) / (up.position - lo.position);
            for (channel, value) in entry.iter_mut().enumerate() {
                *value = lo.color[channel]
                    + frac * (up.color[channel] - lo.color[channel]);
            }
        }

        Self(table)
    }

    /// All 256 RGBA entries, in intensity order.
    #[must_use]
    pub fn entries(&self) -> &[[f32; 4]; LUT_SIZE] {
        &self.0
    }

    /// The RGBA entry for sample index `i`; `i` must be below [`LUT_SIZE`].
    #[must_use]
    pub fn entry(&self, i: usize) -> [f32; 4] {
        self.0[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::TransferFunction;

    const EPS: f32 = 1e-5;

    fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < EPS)
    }

    #[test]
    fn endpoints_match_boundary_points_exactly() {
        let tf = TransferFunction::new();
        let lut = tf.lookup_table();
        assert_eq!(lut.entry(0), [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(lut.entry(LUT_SIZE - 1), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn two_point_midpoint_is_half_gray() {
        let tf = TransferFunction::new();
        let lut = tf.lookup_table();
        // Sample 128 sits at t = 128/255, not exactly 0.5; check the value
        // the piecewise-linear curve should produce there.
        let t = 128.0 / 255.0;
        assert!(approx(lut.entry(128), [t, t, t, t]));
        // And the curve value at t = 0.5 via the two straddling samples.
        let below = lut.entry(127)[0];
        let above = lut.entry(128)[0];
        assert!(below <= 0.5 && 0.5 <= above);
    }

    #[test]
    fn recompute_is_deterministic() {
        let mut tf = TransferFunction::new();
        let _ = tf.insert(0.3, [1.0, 0.0, 0.0, 0.5]).unwrap();
        let _ = tf.insert(0.7, [0.0, 1.0, 0.0, 0.25]).unwrap();
        assert_eq!(tf.lookup_table(), tf.lookup_table());
    }

    #[test]
    fn interior_point_is_hit_exactly_when_sample_aligns() {
        let mut tf = TransferFunction::new();
        // 51/255 = 0.2, so sample 51 lands exactly on the control point.
        let _ = tf.insert(0.2, [0.0, 0.0, 1.0, 1.0]).unwrap();
        let lut = tf.lookup_table();
        assert!(approx(lut.entry(51), [0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn every_sample_lies_within_its_bracketing_interval() {
        let mut tf = TransferFunction::new();
        // Cluster points tightly so a single sample step spans several
        // intervals; the scan must still bracket every t correctly.
        for (i, pos) in [0.01, 0.012, 0.014, 0.016, 0.5].iter().enumerate() {
            let c = i as f32 / 5.0;
            let _ = tf.insert(*pos, [c, c, c, c]).unwrap();
        }
        let lut = tf.lookup_table();
        let points = tf.points();
        for i in 0..LUT_SIZE {
            let t = i as f32 / (LUT_SIZE - 1) as f32;
            let entry = lut.entry(i);
            // Interpolated alpha must stay within the range spanned by the
            // two control points bracketing t.
            let hi = points
                .iter()
                .position(|p| p.position >= t)
                .unwrap_or(points.len() - 1)
                .max(1);
            let (lo_a, hi_a) =
                (points[hi - 1].color[3], points[hi].color[3]);
            let (min_a, max_a) = (lo_a.min(hi_a), lo_a.max(hi_a));
            assert!(
                entry[3] >= min_a - EPS && entry[3] <= max_a + EPS,
                "sample {i} alpha {} outside [{min_a}, {max_a}]",
                entry[3]
            );
        }
    }
}
