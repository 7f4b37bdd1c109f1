//! Run configuration for the simulation world

use super::sensor::{DEFAULT_RAY_COUNT, DEFAULT_RAY_LENGTH_FACTOR, DEFAULT_RAY_SPREAD};
use super::types::DEFAULT_LANE_COUNT;

/// Everything needed to lay out one generation of cars on a road
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Centre x of the road
    pub road_x: f64,
    pub road_width: f64,
    pub lane_count: usize,

    pub car_width: f64,
    pub car_height: f64,

    /// Number of network-driven cars competing in this generation
    pub agent_count: usize,
    /// Number of scripted traffic cars
    pub traffic_count: usize,
    /// Vertical gap between consecutive traffic cars
    pub traffic_spacing: f64,
    /// Y coordinate of the start line
    pub start_y: f64,

    pub ray_count: usize,
    pub ray_spread: f64,
    /// Ray length as a multiple of car height
    pub ray_length_factor: f64,

    /// How far copies of a seeded brain drift towards randomness, in `[0, 1]`
    pub mutation_amount: f64,

    /// RNG seed; a random one is picked (and logged) when unset
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            road_x: 100.0,
            road_width: 190.0,
            lane_count: DEFAULT_LANE_COUNT,
            car_width: 30.0,
            car_height: 50.0,
            agent_count: 100,
            traffic_count: 7,
            traffic_spacing: 200.0,
            start_y: 100.0,
            ray_count: DEFAULT_RAY_COUNT,
            ray_spread: DEFAULT_RAY_SPREAD,
            ray_length_factor: DEFAULT_RAY_LENGTH_FACTOR,
            mutation_amount: 0.1,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Neuron counts for an agent brain: one input per ray, a hidden layer
    /// two wider, and four control outputs
    pub fn brain_topology(&self) -> Vec<usize> {
        vec![self.ray_count, self.ray_count + 2, super::car::CONTROL_OUTPUTS]
    }

    pub fn ray_length(&self) -> f64 {
        self.car_height * self.ray_length_factor
    }
}
