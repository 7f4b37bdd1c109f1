//! Straight multi-lane road
//!
//! The road runs vertically and is bounded by two border segments that
//! stretch far enough in both directions to be treated as unbounded.

use super::error::SimError;
use super::types::{lerp, Point, Segment, DEFAULT_LANE_COUNT, ROAD_INFINITY};

#[derive(Debug, Clone, PartialEq)]
pub struct SimRoad {
    pub x: f64,
    pub width: f64,
    lane_count: usize,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    borders: [Segment; 2],
}

impl SimRoad {
    /// Road centred on `x`, `width` wide, split into `lane_count` equal lanes
    pub fn new(x: f64, width: f64, lane_count: usize) -> Result<Self, SimError> {
        if lane_count == 0 {
            return Err(SimError::InvalidRoad("lane count must be at least 1".to_string()));
        }
        if !(width > 0.0) {
            return Err(SimError::InvalidRoad(format!("width must be positive, got {}", width)));
        }

        let top = -ROAD_INFINITY;
        let bottom = ROAD_INFINITY;
        let left = x - width / 2.0;
        let right = x + width / 2.0;

        let borders = [
            Segment::new(Point::new(left, top), Point::new(left, bottom)),
            Segment::new(Point::new(right, top), Point::new(right, bottom)),
        ];

        Ok(Self {
            x,
            width,
            lane_count,
            top,
            bottom,
            left,
            right,
            borders,
        })
    }

    /// Three-lane road
    pub fn with_default_lanes(x: f64, width: f64) -> Result<Self, SimError> {
        Self::new(x, width, DEFAULT_LANE_COUNT)
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn lane_width(&self) -> f64 {
        self.width / self.lane_count as f64
    }

    pub fn borders(&self) -> &[Segment] {
        &self.borders
    }

    /// Centre x of lane `index`; out-of-range indices clamp to the outer lanes
    pub fn lane_center(&self, index: i64) -> f64 {
        let last = self.lane_count as i64 - 1;
        let index = index.clamp(0, last);
        self.left + self.lane_width() * (index as f64 + 0.5)
    }

    /// Lane the given x falls in, clamped to the road
    pub fn lane_of(&self, x: f64) -> usize {
        let lane = ((x - self.left) / self.lane_width()).floor();
        lane.clamp(0.0, (self.lane_count - 1) as f64) as usize
    }

    /// X positions of the dashed lines between lanes
    pub fn lane_dividers(&self) -> Vec<f64> {
        (1..self.lane_count)
            .map(|i| lerp(self.left, self.right, i as f64 / self.lane_count as f64))
            .collect()
    }
}
