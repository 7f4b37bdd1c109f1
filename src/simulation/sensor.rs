//! Ray-casting sensor mounted on network-driven cars
//!
//! Every update the rays are regenerated from the car's pose and each ray
//! reports its nearest hit against the road borders and traffic footprints.

use std::f64::consts::PI;

use ordered_float::OrderedFloat;

use super::geometry::get_intersection;
use super::types::{lerp, Intersection, Point, Polygon, Segment};

/// Default number of rays in the fan
pub const DEFAULT_RAY_COUNT: usize = 7;

/// Default angle covered by the fan, in radians (120 degrees)
pub const DEFAULT_RAY_SPREAD: f64 = PI / 1.5;

/// Ray length as a multiple of the car's height
pub const DEFAULT_RAY_LENGTH_FACTOR: f64 = 3.0;

/// A fixed fan of rays and the latest reading for each of them
#[derive(Debug, Clone)]
pub struct Sensor {
    ray_count: usize,
    ray_length: f64,
    ray_spread: f64,
    rays: Vec<Segment>,
    readings: Vec<Option<Intersection>>,
}

impl Sensor {
    /// Sensor with the default fan for a car of the given height
    pub fn new(car_height: f64) -> Self {
        Self::with_config(
            DEFAULT_RAY_COUNT,
            car_height * DEFAULT_RAY_LENGTH_FACTOR,
            DEFAULT_RAY_SPREAD,
        )
    }

    pub fn with_config(ray_count: usize, ray_length: f64, ray_spread: f64) -> Self {
        Self {
            ray_count,
            ray_length,
            ray_spread,
            rays: Vec::with_capacity(ray_count),
            readings: Vec::with_capacity(ray_count),
        }
    }

    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    pub fn ray_length(&self) -> f64 {
        self.ray_length
    }

    pub fn ray_spread(&self) -> f64 {
        self.ray_spread
    }

    /// Rays cast on the last update, leftmost first
    pub fn rays(&self) -> &[Segment] {
        &self.rays
    }

    /// Nearest hit per ray, index-aligned with [`Sensor::rays`]
    pub fn readings(&self) -> &[Option<Intersection>] {
        &self.readings
    }

    /// Network inputs: `1 - offset` for a hit, `0` for a clear ray
    pub fn offsets(&self) -> Vec<f64> {
        self.readings
            .iter()
            .map(|reading| reading.map_or(0.0, |touch| 1.0 - touch.offset))
            .collect()
    }

    /// Recast every ray from `origin` and take fresh readings
    ///
    /// `traffic` must not contain the footprint of the car carrying this sensor.
    pub fn update(&mut self, origin: Point, angle: f64, borders: &[Segment], traffic: &[&Polygon]) {
        self.cast_rays(origin, angle);

        self.readings.clear();
        for ray in &self.rays {
            self.readings.push(Self::reading(ray, borders, traffic));
        }
    }

    fn cast_rays(&mut self, origin: Point, angle: f64) {
        self.rays.clear();

        for i in 0..self.ray_count {
            let t = if self.ray_count == 1 {
                0.5
            } else {
                i as f64 / (self.ray_count - 1) as f64
            };
            let ray_angle = lerp(self.ray_spread / 2.0, -self.ray_spread / 2.0, t) + angle;

            self.rays
                .push(Segment::new(origin, origin.project(ray_angle, self.ray_length)));
        }
    }

    fn reading(ray: &Segment, borders: &[Segment], traffic: &[&Polygon]) -> Option<Intersection> {
        let (start, end) = (ray.start, ray.end);

        let border_touches = borders
            .iter()
            .filter_map(move |border| get_intersection(start, end, border.start, border.end));

        let traffic_touches = traffic.iter().flat_map(move |polygon| {
            polygon
                .edges()
                .filter_map(move |edge| get_intersection(start, end, edge.start, edge.end))
        });

        // min_by_key keeps the first of equally close touches
        border_touches
            .chain(traffic_touches)
            .min_by_key(|touch| OrderedFloat(touch.offset))
    }
}
