//! Scalar ranges and color transfer functions.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An RGB color with components in `[0, 1]`.
pub type Rgb = Vec3;

/// Closed numeric range of a scalar field. Invariant: `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarRange {
    pub min: f64,
    pub max: f64,
}

impl ScalarRange {
    /// Creates a range, swapping the bounds if given in reverse.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Computes the range of the finite values in `values`.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Self>, v| match acc {
                None => Some(Self { min: v, max: v }),
                Some(r) => Some(Self {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }

    /// Returns `max - min`.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Number of integer buckets covering the range: `max - min + 1`.
    ///
    /// Non-integer spans are floored, so `[0, 0.5]` yields a single bucket.
    pub fn bucket_count(&self) -> usize {
        let span = self.span();
        if span.is_finite() {
            (span.floor() as usize).saturating_add(1)
        } else {
            1
        }
    }

    /// Clamps `v` into the range.
    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

/// A `(value, color)` stop of a transfer function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub value: f64,
    pub color: Rgb,
}

/// Maps scalar values to colors by interpolating between control points,
/// optionally snapping to a fixed number of evenly spaced colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTransferFunction {
    points: Vec<ControlPoint>,
    range: ScalarRange,
    discretize: bool,
    number_of_values: usize,
}

impl ColorTransferFunction {
    /// Creates an empty, continuous transfer function over `range`.
    pub fn new(range: ScalarRange) -> Self {
        Self {
            points: Vec::new(),
            range,
            discretize: false,
            number_of_values: 256,
        }
    }

    /// Adds a control point, keeping points sorted by value. A point at an
    /// existing value replaces it.
    pub fn add_rgb_point(&mut self, value: f64, color: Rgb) {
        let point = ControlPoint { value, color };
        match self
            .points
            .binary_search_by(|p| p.value.total_cmp(&value))
        {
            Ok(idx) => self.points[idx] = point,
            Err(idx) => self.points.insert(idx, point),
        }
    }

    /// Enables or disables discretization.
    pub fn set_discretize(&mut self, discretize: bool) {
        self.discretize = discretize;
    }

    /// Sets the number of discrete colors (at least 1).
    pub fn set_number_of_values(&mut self, n: usize) {
        self.number_of_values = n.max(1);
    }

    /// Sets the mapped range.
    pub fn set_range(&mut self, range: ScalarRange) {
        self.range = range;
    }

    /// Returns the control points in ascending value order.
    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Returns the mapped range.
    pub fn range(&self) -> ScalarRange {
        self.range
    }

    /// Returns whether output colors are discretized.
    pub fn discretize(&self) -> bool {
        self.discretize
    }

    /// Returns the number of discrete colors.
    pub fn number_of_values(&self) -> usize {
        self.number_of_values
    }

    /// Maps a scalar value to a color.
    ///
    /// Values are clamped into the range. Non-finite values map to the color
    /// at the range minimum.
    pub fn map_value(&self, value: f64) -> Rgb {
        let v = if value.is_finite() {
            self.range.clamp(value)
        } else {
            self.range.min
        };
        let v = if self.discretize {
            self.snap(v)
        } else {
            v
        };
        self.interpolate(v)
    }

    fn snap(&self, v: f64) -> f64 {
        let span = self.range.span();
        let n = self.number_of_values;
        if n <= 1 || span <= 0.0 {
            return self.range.min;
        }
        let t = (v - self.range.min) / span;
        let idx = ((t * n as f64).floor() as usize).min(n - 1);
        self.range.min + span * idx as f64 / (n - 1) as f64
    }

    fn interpolate(&self, v: f64) -> Rgb {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return Vec3::ZERO;
        };
        if v <= first.value {
            return first.color;
        }
        if v >= last.value {
            return last.color;
        }
        let idx = self.points.partition_point(|p| p.value <= v);
        let lo = self.points[idx - 1];
        let hi = self.points[idx];
        let span = hi.value - lo.value;
        if span <= 0.0 {
            return hi.color;
        }
        let t = ((v - lo.value) / span) as f32;
        lo.color.lerp(hi.color, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(min: f64, max: f64) -> ColorTransferFunction {
        let mut ctf = ColorTransferFunction::new(ScalarRange::new(min, max));
        ctf.add_rgb_point(min, Vec3::ZERO);
        ctf.add_rgb_point(max, Vec3::ONE);
        ctf
    }

    #[test]
    fn test_range_from_values() {
        let range = ScalarRange::from_values([3.0, -2.0, 7.5]).unwrap();
        assert_eq!(range, ScalarRange { min: -2.0, max: 7.5 });
        assert!(ScalarRange::from_values([]).is_none());
        assert!(ScalarRange::from_values([f64::NAN, f64::INFINITY]).is_none());
    }

    #[test]
    fn test_range_new_orders_bounds() {
        let range = ScalarRange::new(5.0, 1.0);
        assert_eq!((range.min, range.max), (1.0, 5.0));
    }

    #[test]
    fn test_bucket_count() {
        assert_eq!(ScalarRange::new(10.0, 200.0).bucket_count(), 191);
        assert_eq!(ScalarRange::new(4.0, 4.0).bucket_count(), 1);
        assert_eq!(ScalarRange::new(0.0, 0.5).bucket_count(), 1);
        assert_eq!(ScalarRange::new(0.0, 2.7).bucket_count(), 3);
    }

    #[test]
    fn test_bucket_count_saturates_on_huge_span() {
        assert_eq!(ScalarRange::new(0.0, 1e20).bucket_count(), usize::MAX);
        assert_eq!(ScalarRange::new(-f64::MAX, f64::MAX).bucket_count(), 1);
    }

    #[test]
    fn test_control_points_sorted_and_replaced() {
        let mut ctf = ColorTransferFunction::new(ScalarRange::new(0.0, 1.0));
        ctf.add_rgb_point(1.0, Vec3::X);
        ctf.add_rgb_point(0.0, Vec3::Y);
        ctf.add_rgb_point(1.0, Vec3::Z);
        let values: Vec<f64> = ctf.control_points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0.0, 1.0]);
        assert_eq!(ctf.control_points()[1].color, Vec3::Z);
    }

    #[test]
    fn test_continuous_interpolation() {
        let ctf = ramp(0.0, 10.0);
        assert_eq!(ctf.map_value(0.0), Vec3::ZERO);
        assert_eq!(ctf.map_value(10.0), Vec3::ONE);
        assert!((ctf.map_value(5.0).x - 0.5).abs() < 1e-6);
        // Out-of-range values clamp.
        assert_eq!(ctf.map_value(-4.0), Vec3::ZERO);
        assert_eq!(ctf.map_value(40.0), Vec3::ONE);
        assert_eq!(ctf.map_value(f64::NAN), Vec3::ZERO);
    }

    #[test]
    fn test_discretized_colors_are_limited() {
        let mut ctf = ramp(0.0, 10.0);
        ctf.set_discretize(true);
        ctf.set_number_of_values(3);

        let mut distinct: Vec<[u32; 3]> = (0..=100)
            .map(|i| {
                let c = ctf.map_value(f64::from(i) / 10.0);
                [c.x.to_bits(), c.y.to_bits(), c.z.to_bits()]
            })
            .collect();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 3);
        assert_eq!(ctf.map_value(0.0), Vec3::ZERO);
        assert_eq!(ctf.map_value(10.0), Vec3::ONE);
    }

    #[test]
    fn test_empty_function_maps_to_black() {
        let ctf = ColorTransferFunction::new(ScalarRange::new(0.0, 1.0));
        assert_eq!(ctf.map_value(0.5), Vec3::ZERO);
    }
}
