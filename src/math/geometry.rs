use std::f64::consts::TAU;

use nalgebra::Point2;

/// Point on an axis-aligned ellipse around `center`, at parametric angle `angle`.
pub fn ellipse_point(center: &Point2<f64>, a: f64, b: f64, angle: f64) -> Point2<f64> {
    Point2::new(center.x + a * angle.cos(), center.y + b * angle.sin())
}

/// Closed polyline approximating an ellipse; the first point is repeated at the end.
pub fn ellipse_outline(center: &Point2<f64>, a: f64, b: f64, segments: usize) -> Vec<Point2<f64>> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| ellipse_point(center, a, b, TAU * i as f64 / segments as f64))
        .collect()
}

pub fn distance(from: &Point2<f64>, to: &Point2<f64>) -> f64 {
    (to - from).norm()
}

/// Compass-style angle of `to` as seen from `from`, in degrees in [0, 360).
///
/// Screen y grows downward, so dy is flipped to make counterclockwise positive.
pub fn bearing_degrees(from: &Point2<f64>, to: &Point2<f64>) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let degrees = (-dy).atan2(dx).rem_euclid(TAU).to_degrees();
    // rem_euclid of a tiny negative angle rounds up to exactly TAU
    if degrees >= 360.0 {
        0.0
    } else {
        degrees
    }
}
