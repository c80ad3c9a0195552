//! Decision-function capability: anything that maps the three sensor
//! readings to an output vector whose first element decides the jump.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::INPUT_COUNT;

/// Failure raised by a decision function. Fatal for the episode.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct DecisionError {
    pub message: String,
}

impl DecisionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sensor readings for one agent in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorInputs {
    /// Agent vertical position.
    pub y: f64,
    /// |y - gap top| of the sensed obstacle.
    pub to_gap_top: f64,
    /// |y - gap bottom| of the sensed obstacle.
    pub to_gap_bottom: f64,
}

impl SensorInputs {
    /// Readings for an agent at `y` against a gap spanning `gap_top..gap_bottom`.
    pub fn sense(y: f64, gap_top: f64, gap_bottom: f64) -> Self {
        Self {
            y,
            to_gap_top: (y - gap_top).abs(),
            to_gap_bottom: (y - gap_bottom).abs(),
        }
    }

    /// Inputs in the fixed network order: y, gap top distance, gap bottom distance.
    pub fn as_array(&self) -> [f64; INPUT_COUNT] {
        [self.y, self.to_gap_top, self.to_gap_bottom]
    }
}

/// An external predictor driving one agent.
///
/// The neuroevolution network is one implementation; tests substitute
/// closures. Plain closures `FnMut(&SensorInputs) -> f64` implement this
/// with a single output.
pub trait DecisionFunction {
    /// Number of values `evaluate` returns. Must be at least 1.
    fn output_arity(&self) -> usize;

    /// Evaluate the sensor readings. Only `output[0]` is consulted.
    fn evaluate(&mut self, inputs: &SensorInputs) -> Result<Vec<f64>, DecisionError>;
}

impl<F> DecisionFunction for F
where
    F: FnMut(&SensorInputs) -> f64,
{
    fn output_arity(&self) -> usize {
        1
    }

    fn evaluate(&mut self, inputs: &SensorInputs) -> Result<Vec<f64>, DecisionError> {
        Ok(vec![self(inputs)])
    }
}

/// Boxed decision function as handed over by a population provider.
pub type BoxedDecision = Box<dyn DecisionFunction + Send>;
