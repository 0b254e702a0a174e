//! Piecewise-linear width profile along a branch.

use serde::{Deserialize, Serialize};

use crate::root_tree::RootPoint;

/// One key of a [`WidthCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthKey {
    /// Normalised arc length in `[0, 1]`.
    pub time: f32,
    /// Branch width at `time`.
    pub width: f32,
}

/// Width keyed by normalised arc length, sorted by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidthCurve {
    keys: Vec<WidthKey>,
}

impl WidthCurve {
    /// Builds the curve for a branch of known total length.
    ///
    /// A key is emitted at every point whose width differs from the last
    /// emitted width, starting from an implicit width of zero. The curve is
    /// empty when `total_length` is zero.
    pub fn from_points(points: &[RootPoint], total_length: f32) -> Self {
        let mut curve = Self::default();
        if total_length <= 0.0 || points.is_empty() {
            return curve;
        }

        let mut travelled = 0.0;
        let mut last_position = points[0].position;
        let mut last_width = 0.0;
        for point in points {
            travelled += last_position.distance(point.position);
            if point.width != last_width {
                curve.add_key(travelled / total_length, point.width);
                last_width = point.width;
            }
            last_position = point.position;
        }
        curve
    }

    /// Inserts a key, replacing any key at the same time.
    pub fn add_key(&mut self, time: f32, width: f32) {
        match self
            .keys
            .binary_search_by(|key| key.time.total_cmp(&time))
        {
            Ok(existing) => self.keys[existing].width = width,
            Err(slot) => self.keys.insert(slot, WidthKey { time, width }),
        }
    }

    /// Keys in ascending time order.
    pub fn keys(&self) -> &[WidthKey] {
        &self.keys
    }

    /// Returns `true` if the curve has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Width at `time`, linearly interpolated and clamped at both ends.
    /// An empty curve evaluates to zero.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if time <= first.time {
            return first.width;
        }
        if time >= last.time {
            return last.width;
        }
        let next = self.keys.partition_point(|key| key.time <= time);
        let a = self.keys[next - 1];
        let b = self.keys[next];
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.width;
        }
        a.width + (b.width - a.width) * ((time - a.time) / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn point(x: f32, y: f32, width: f32) -> RootPoint {
        RootPoint::new(Vec2::new(x, y), width)
    }

    #[test]
    fn test_empty_for_zero_length() {
        let single = [point(0.0, 0.0, 1.0)];
        assert!(WidthCurve::from_points(&single, 0.0).is_empty());

        let coincident = [point(1.0, 1.0, 1.0), point(1.0, 1.0, 0.5)];
        assert!(WidthCurve::from_points(&coincident, 0.0).is_empty());
    }

    #[test]
    fn test_keys_only_on_width_change() {
        let points = [
            point(0.0, 0.0, 1.0),
            point(0.0, -1.0, 1.0),
            point(0.0, -2.0, 0.5),
            point(0.0, -3.0, 0.5),
            point(0.0, -4.0, 0.5),
        ];
        let curve = WidthCurve::from_points(&points, 4.0);
        assert_eq!(
            curve.keys(),
            &[
                WidthKey { time: 0.0, width: 1.0 },
                WidthKey { time: 0.5, width: 0.5 },
            ]
        );
    }

    #[test]
    fn test_equal_time_overwrites() {
        let mut curve = WidthCurve::default();
        curve.add_key(0.5, 1.0);
        curve.add_key(0.5, 2.0);
        curve.add_key(0.25, 3.0);
        assert_eq!(curve.keys().len(), 2);
        assert_eq!(curve.keys()[0].time, 0.25);
        assert_eq!(curve.keys()[1].width, 2.0);
    }

    #[test]
    fn test_evaluate_interpolates_and_clamps() {
        let mut curve = WidthCurve::default();
        curve.add_key(0.0, 1.0);
        curve.add_key(1.0, 0.0);
        assert!((curve.evaluate(0.25) - 0.75).abs() < 1e-6);
        assert_eq!(curve.evaluate(-1.0), 1.0);
        assert_eq!(curve.evaluate(2.0), 0.0);
        assert_eq!(WidthCurve::default().evaluate(0.5), 0.0);
    }
}
