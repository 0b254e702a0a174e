//! End-of-day recap path: the active branch simplified and traced back to the origin.

use glam::Vec2;

/// Default simplification tolerance in world units.
pub const RECAP_TOLERANCE: f32 = 0.375;

/// Ramer-Douglas-Peucker simplification. Endpoints are always kept.
pub fn simplify(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut spans = vec![(0, points.len() - 1)];
    while let Some((start, end)) = spans.pop() {
        if end <= start + 1 {
            continue;
        }
        let mut farthest = start;
        let mut max_distance = 0.0;
        for i in (start + 1)..end {
            let distance = distance_to_segment(points[i], points[start], points[end]);
            if distance > max_distance {
                max_distance = distance;
                farthest = i;
            }
        }
        if max_distance > tolerance {
            keep[farthest] = true;
            spans.push((start, farthest));
            spans.push((farthest, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(point, kept)| kept.then_some(*point))
        .collect()
}

fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_squared();
    if length_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// The path the recap camera follows: the simplified branch walked from its
/// tip back to its seed, ending at `origin`.
pub fn recap_line(points: &[Vec2], tolerance: f32, origin: Vec2) -> Vec<Vec2> {
    let mut line = simplify(points, tolerance);
    line.reverse();
    if line.last() != Some(&origin) {
        line.push(origin);
    }
    line
}
