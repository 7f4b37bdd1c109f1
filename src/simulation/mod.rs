//! Self-driving car simulation core
//!
//! Geometry, sensing, the threshold network and car kinematics, tied
//! together by [`SimWorld`]. Nothing in here draws, reads the keyboard or
//! schedules frames; those live with whoever drives the world.

mod car;
mod config;
mod controls;
mod error;
mod geometry;
mod network;
mod polygon;
mod road;
mod sensor;
mod store;
mod types;
mod world;

pub use car::{CarKind, CarUpdateResult, KinematicProfile, SimCar, CONTROL_OUTPUTS};
pub use config::SimConfig;
pub use controls::{Controls, Direction};
pub use error::SimError;
pub use geometry::{
    get_intersection, polygon_touches_segment, polygons_intersect, segment_intersection,
};
pub use network::{Level, LevelData, NeuralNetwork};
pub use polygon::car_polygon;
pub use road::SimRoad;
pub use sensor::{Sensor, DEFAULT_RAY_COUNT, DEFAULT_RAY_LENGTH_FACTOR, DEFAULT_RAY_SPREAD};
pub use store::{SimStore, BEST_BRAIN_KEY, TRAFFIC_KEY};
pub use types::{
    in_range, lerp, CarId, Intersection, Point, Polygon, Segment, DEFAULT_LANE_COUNT, ROAD_INFINITY,
};
pub use world::{RunStats, SimWorld, TickReport};
