//! Feed-forward network evaluator.
//!
//! Weights are plain serde data so whatever evolves them can hand them over
//! as JSON. A network always takes the three sensor readings as input; its
//! output layer may be any width, and only the first output decides the flap.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flappy_core::constants::INPUT_COUNT;
use flappy_core::decision::{DecisionError, DecisionFunction, SensorInputs};

/// Input to `exp` is clamped to this magnitude.
const EXP_CLAMP: f64 = 60.0;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("network has no layers")]
    NoLayers,
    #[error("layer {layer} has no outputs")]
    EmptyLayer { layer: usize },
    #[error("layer {layer} has {actual} weights, expected {expected}")]
    Shape {
        layer: usize,
        expected: usize,
        actual: usize,
    },
    #[error("layer {layer} takes {actual} inputs, expected {expected}")]
    InputMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },
    #[error("layer {layer} has a non-finite weight or bias")]
    NonFinite { layer: usize },
    #[error("failed to parse network weights: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Node activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Steepened logistic, 1 / (1 + e^(-5z)).
    #[default]
    Sigmoid,
    /// tanh(2.5z).
    Tanh,
    Relu,
    Identity,
}

impl Activation {
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Self::Sigmoid => 1.0 / (1.0 + (-(5.0 * z).clamp(-EXP_CLAMP, EXP_CLAMP)).exp()),
            Self::Tanh => (2.5 * z).clamp(-EXP_CLAMP, EXP_CLAMP).tanh(),
            Self::Relu => z.max(0.0),
            Self::Identity => z,
        }
    }
}

/// One dense layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Row-major: one row of input weights per output node.
    pub weights: Vec<f64>,
    /// One bias per output node.
    pub biases: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl Layer {
    pub fn outputs(&self) -> usize {
        self.biases.len()
    }

    /// Input width implied by the weight count.
    pub fn inputs(&self) -> usize {
        match self.outputs() {
            0 => 0,
            n => self.weights.len() / n,
        }
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let width = input.len();
        self.biases
            .iter()
            .enumerate()
            .map(|(node, bias)| {
                let row = &self.weights[node * width..(node + 1) * width];
                let z: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias;
                self.activation.apply(z)
            })
            .collect()
    }

    fn random(inputs: usize, outputs: usize, activation: Activation, rng: &mut impl Rng) -> Self {
        Self {
            weights: (0..inputs * outputs).map(|_| rng.gen_range(-1.0..1.0)).collect(),
            biases: (0..outputs).map(|_| rng.gen_range(-1.0..1.0)).collect(),
            activation,
        }
    }
}

/// Validated layer stack taking `INPUT_COUNT` inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Layer>", into = "Vec<Layer>")]
pub struct FeedForwardWeights {
    layers: Vec<Layer>,
}

impl FeedForwardWeights {
    pub fn new(layers: Vec<Layer>) -> Result<Self, NetworkError> {
        if layers.is_empty() {
            return Err(NetworkError::NoLayers);
        }

        let mut width = INPUT_COUNT;
        for (index, layer) in layers.iter().enumerate() {
            if layer.outputs() == 0 {
                return Err(NetworkError::EmptyLayer { layer: index });
            }
            let expected = width * layer.outputs();
            if layer.weights.len() != expected {
                return Err(NetworkError::Shape {
                    layer: index,
                    expected,
                    actual: layer.weights.len(),
                });
            }
            if !layer
                .weights
                .iter()
                .chain(&layer.biases)
                .all(|v| v.is_finite())
            {
                return Err(NetworkError::NonFinite { layer: index });
            }
            width = layer.outputs();
        }
        Ok(Self { layers })
    }

    /// Random weights in [-1, 1) for the node counts in `shape`, input layer
    /// first. Hidden layers use `hidden`, the output layer sigmoid.
    pub fn random(
        shape: &[usize],
        hidden: Activation,
        rng: &mut impl Rng,
    ) -> Result<Self, NetworkError> {
        let Some((&inputs, rest)) = shape.split_first() else {
            return Err(NetworkError::NoLayers);
        };
        if inputs != INPUT_COUNT {
            return Err(NetworkError::InputMismatch {
                layer: 0,
                expected: INPUT_COUNT,
                actual: inputs,
            });
        }

        let mut layers = Vec::with_capacity(rest.len());
        let mut width = inputs;
        for (index, &outputs) in rest.iter().enumerate() {
            let activation = if index + 1 == rest.len() {
                Activation::Sigmoid
            } else {
                hidden
            };
            layers.push(Layer::random(width, outputs, activation, rng));
            width = outputs;
        }
        Self::new(layers)
    }

    pub fn from_json_str(json: &str) -> Result<Self, NetworkError> {
        let layers: Vec<Layer> = serde_json::from_str(json)?;
        Self::new(layers)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Width of the output layer.
    pub fn output_arity(&self) -> usize {
        self.layers.last().map_or(0, Layer::outputs)
    }

    pub fn forward(&self, inputs: &[f64; INPUT_COUNT]) -> Vec<f64> {
        self.layers
            .iter()
            .fold(inputs.to_vec(), |activations, layer| layer.forward(&activations))
    }
}

impl TryFrom<Vec<Layer>> for FeedForwardWeights {
    type Error = NetworkError;

    fn try_from(layers: Vec<Layer>) -> Result<Self, Self::Error> {
        Self::new(layers)
    }
}

impl From<FeedForwardWeights> for Vec<Layer> {
    fn from(weights: FeedForwardWeights) -> Self {
        weights.layers
    }
}

/// Decision function backed by a feed-forward network.
#[derive(Debug, Clone)]
pub struct FeedForwardPilot {
    network: FeedForwardWeights,
}

impl FeedForwardPilot {
    pub fn new(network: FeedForwardWeights) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &FeedForwardWeights {
        &self.network
    }
}

impl DecisionFunction for FeedForwardPilot {
    fn output_arity(&self) -> usize {
        self.network.output_arity()
    }

    fn evaluate(&mut self, inputs: &SensorInputs) -> Result<Vec<f64>, DecisionError> {
        let outputs = self.network.forward(&inputs.as_array());
        if let Some(bad) = outputs.iter().position(|v| !v.is_finite()) {
            return Err(DecisionError::new(format!(
                "network output {bad} is not finite"
            )));
        }
        Ok(outputs)
    }
}
