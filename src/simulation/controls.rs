//! Driving controls: four independent on/off signals

use serde::{Deserialize, Serialize};

/// One of the four control signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Reverse,
    Left,
    Right,
}

impl Direction {
    /// Order in which network outputs map onto controls
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Reverse,
        Direction::Left,
        Direction::Right,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
}

impl Controls {
    /// Scripted traffic: throttle held down for the car's whole life
    pub fn scripted() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    pub fn set_direction(&mut self, direction: Direction, value: bool) {
        match direction {
            Direction::Forward => self.forward = value,
            Direction::Reverse => self.reverse = value,
            Direction::Left => self.left = value,
            Direction::Right => self.right = value,
        }
    }

    pub fn direction(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.forward,
            Direction::Reverse => self.reverse,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Overwrite all four signals from network outputs; any non-zero output is "on"
    pub fn apply_outputs(&mut self, outputs: &[f64]) {
        for (direction, output) in Direction::ALL.iter().zip(outputs) {
            self.set_direction(*direction, *output != 0.0);
        }
    }
}
