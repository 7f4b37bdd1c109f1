//! Contract violations raised by the simulation core

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A forward pass was handed an input vector of the wrong length
    #[error("level expects {expected} inputs, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Persisted level data does not describe a usable network
    #[error("invalid network parameters: {0}")]
    InvalidNetwork(String),

    /// A network needs at least an input and an output layer
    #[error("invalid topology {0:?}: at least two neuron counts are required")]
    InvalidTopology(Vec<usize>),

    #[error("invalid road: {0}")]
    InvalidRoad(String),

    /// Only input-driven cars accept controls from outside
    #[error("controls can only be injected into input-driven cars")]
    ControlsNotExternal,
}
