//! Self-Driving Car Simulation Library
//!
//! Cars on a multi-lane road, steered by small threshold networks that are
//! improved only by mutating the best one found so far.

pub mod simulation;
