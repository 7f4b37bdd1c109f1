//! Feedforward threshold network used as a car's driving policy
//!
//! Each [`Level`] is a dense layer of step units: an output fires (1.0) only
//! when its weighted input sum is strictly greater than its bias. There is no
//! gradient anywhere; the only way a network changes is [`NeuralNetwork::mutate`].

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use super::types::lerp;

/// Plain parameter bundle for one level, as saved to and loaded from storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub inputs: Vec<f64>,
    pub outputs: Vec<f64>,
    pub biases: Vec<f64>,
    pub weights: Vec<Vec<f64>>,
}

/// One dense layer
///
/// `inputs` and `outputs` are scratch buffers written by [`Level::feed_forward`];
/// they are kept so a visualiser can show the last activation.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
    biases: Vec<f64>,
    /// `weights[i][j]` connects input `i` to output `j`
    weights: Vec<Vec<f64>>,
}

impl Level {
    /// Level with every weight and bias drawn uniformly from `[-1, 1]`
    pub fn random<R: Rng + ?Sized>(input_count: usize, output_count: usize, rng: &mut R) -> Self {
        let weights: Vec<Vec<f64>> = (0..input_count)
            .map(|_| {
                (0..output_count)
                    .map(|_| rng.random_range(-1.0..=1.0))
                    .collect()
            })
            .collect();
        let biases: Vec<f64> = (0..output_count)
            .map(|_| rng.random_range(-1.0..=1.0))
            .collect();

        Self {
            inputs: vec![0.0; input_count],
            outputs: vec![0.0; output_count],
            biases,
            weights,
        }
    }

    /// Rebuild a level verbatim from saved parameters
    pub fn from_data(data: LevelData) -> Result<Self, SimError> {
        let LevelData {
            inputs,
            outputs,
            biases,
            weights,
        } = data;

        if biases.len() != outputs.len() {
            return Err(SimError::InvalidNetwork(format!(
                "{} biases for {} outputs",
                biases.len(),
                outputs.len()
            )));
        }
        if weights.len() != inputs.len() {
            return Err(SimError::InvalidNetwork(format!(
                "{} weight rows for {} inputs",
                weights.len(),
                inputs.len()
            )));
        }
        if let Some(row) = weights.iter().find(|row| row.len() != outputs.len()) {
            return Err(SimError::InvalidNetwork(format!(
                "weight row of length {} for {} outputs",
                row.len(),
                outputs.len()
            )));
        }

        Ok(Self {
            inputs,
            outputs,
            biases,
            weights,
        })
    }

    pub fn to_data(&self) -> LevelData {
        LevelData {
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            biases: self.biases.clone(),
            weights: self.weights.clone(),
        }
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// Evaluate the level; `inputs` must have exactly [`Level::input_count`] values
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<&[f64], SimError> {
        if inputs.len() != self.inputs.len() {
            return Err(SimError::DimensionMismatch {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }
        self.inputs.copy_from_slice(inputs);

        for (j, output) in self.outputs.iter_mut().enumerate() {
            let sum: f64 = self
                .inputs
                .iter()
                .zip(&self.weights)
                .map(|(input, row)| input * row[j])
                .sum();

            *output = if sum > self.biases[j] { 1.0 } else { 0.0 };
        }

        Ok(&self.outputs)
    }

    fn mutate<R: Rng + ?Sized>(&mut self, amount: f64, rng: &mut R) {
        for bias in &mut self.biases {
            *bias = lerp(*bias, rng.random_range(-1.0..=1.0), amount);
        }
        for weight in self.weights.iter_mut().flatten() {
            *weight = lerp(*weight, rng.random_range(-1.0..=1.0), amount);
        }
    }
}

/// Ordered stack of levels; each level's outputs feed the next level's inputs
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNetwork {
    levels: Vec<Level>,
}

impl NeuralNetwork {
    /// Randomly initialised network, e.g. `[7, 9, 4]` for seven sensor rays
    /// and four controls
    pub fn new<R: Rng + ?Sized>(neuron_counts: &[usize], rng: &mut R) -> Result<Self, SimError> {
        if neuron_counts.len() < 2 {
            return Err(SimError::InvalidTopology(neuron_counts.to_vec()));
        }

        let levels = neuron_counts
            .windows(2)
            .map(|pair| Level::random(pair[0], pair[1], rng))
            .collect();

        Ok(Self { levels })
    }

    /// Rebuild a network from saved level data without re-randomising anything
    pub fn from_levels(levels: Vec<LevelData>) -> Result<Self, SimError> {
        if levels.is_empty() {
            return Err(SimError::InvalidNetwork("no levels".to_string()));
        }

        let levels = levels
            .into_iter()
            .map(Level::from_data)
            .collect::<Result<Vec<_>, _>>()?;

        for (index, pair) in levels.windows(2).enumerate() {
            if pair[0].output_count() != pair[1].input_count() {
                return Err(SimError::InvalidNetwork(format!(
                    "level {} has {} outputs but level {} takes {} inputs",
                    index,
                    pair[0].output_count(),
                    index + 1,
                    pair[1].input_count()
                )));
            }
        }

        Ok(Self { levels })
    }

    /// Like [`NeuralNetwork::from_levels`], additionally requiring a given topology
    pub fn from_levels_with_topology(
        levels: Vec<LevelData>,
        neuron_counts: &[usize],
    ) -> Result<Self, SimError> {
        let network = Self::from_levels(levels)?;
        let topology = network.topology();

        if topology != neuron_counts {
            return Err(SimError::InvalidNetwork(format!(
                "topology {:?} does not match expected {:?}",
                topology, neuron_counts
            )));
        }

        Ok(network)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Export every level's parameters for persistence
    pub fn to_levels(&self) -> Vec<LevelData> {
        self.levels.iter().map(Level::to_data).collect()
    }

    /// Neuron count per layer, input layer first
    pub fn topology(&self) -> Vec<usize> {
        let mut counts = Vec::with_capacity(self.levels.len() + 1);
        if let Some(first) = self.levels.first() {
            counts.push(first.input_count());
        }
        counts.extend(self.levels.iter().map(Level::output_count));
        counts
    }

    /// Run `inputs` through every level and return the final outputs
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<Vec<f64>, SimError> {
        let mut signal = inputs.to_vec();
        for level in &mut self.levels {
            signal = level.feed_forward(&signal)?.to_vec();
        }
        Ok(signal)
    }

    /// Blend every weight and bias towards a fresh random value
    ///
    /// `amount = 0` keeps the network unchanged, `amount = 1` replaces every
    /// parameter.
    pub fn mutate<R: Rng + ?Sized>(&mut self, amount: f64, rng: &mut R) {
        debug!("Mutating network {:?} by {}", self.topology(), amount);
        for level in &mut self.levels {
            level.mutate(amount, rng);
        }
    }
}
