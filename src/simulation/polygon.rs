//! Oriented footprint of a car

use std::f64::consts::PI;

use super::types::{Point, Polygon};

/// Build the rectangle a car occupies at the given pose
///
/// Corners are emitted front-right, front-left, back-left, back-right for a
/// car facing -y, so consecutive points are the rectangle's sides.
pub fn car_polygon(center: Point, angle: f64, width: f64, height: f64) -> Polygon {
    let radius = width.hypot(height) / 2.0;
    let half_angle = width.atan2(height);

    let corners = [
        angle - half_angle,
        angle + half_angle,
        PI + angle - half_angle,
        PI + angle + half_angle,
    ];

    Polygon::new(
        corners
            .iter()
            .map(|theta| center.project(*theta, radius))
            .collect(),
    )
}
