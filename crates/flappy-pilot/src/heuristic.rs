//! Hand-written pilots.
//!
//! Pure functions of the sensor readings. No network, no state.

use flappy_core::decision::{BoxedDecision, DecisionError, DecisionFunction, SensorInputs};

/// Distance below the gap top at which `GapCenteringPilot` starts flapping.
/// One flap climbs about 92 pixels, so this keeps the whole arc inside a
/// 160-pixel gap.
pub const DEFAULT_CLEARANCE: f64 = 94.0;

/// Emits the same signal every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantPilot(pub f64);

impl ConstantPilot {
    /// Never flaps.
    pub const IDLE: Self = Self(0.0);
    /// Flaps every tick.
    pub const FLAP: Self = Self(1.0);

    pub fn boxed(self) -> BoxedDecision {
        Box::new(self)
    }
}

impl DecisionFunction for ConstantPilot {
    fn output_arity(&self) -> usize {
        1
    }

    fn evaluate(&mut self, _inputs: &SensorInputs) -> Result<Vec<f64>, DecisionError> {
        Ok(vec![self.0])
    }
}

/// Flaps when the agent is in the lower half of the gap (or below it) and
/// more than `clearance` pixels under the gap top.
///
/// Works from the absolute distances alone: the agent is below the gap
/// centre exactly when it is nearer the gap bottom than the gap top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapCenteringPilot {
    pub clearance: f64,
}

impl Default for GapCenteringPilot {
    fn default() -> Self {
        Self {
            clearance: DEFAULT_CLEARANCE,
        }
    }
}

impl GapCenteringPilot {
    pub fn new(clearance: f64) -> Self {
        Self { clearance }
    }

    pub fn boxed(self) -> BoxedDecision {
        Box::new(self)
    }

    pub fn wants_flap(&self, inputs: &SensorInputs) -> bool {
        inputs.to_gap_bottom < inputs.to_gap_top && inputs.to_gap_top > self.clearance
    }
}

impl DecisionFunction for GapCenteringPilot {
    fn output_arity(&self) -> usize {
        1
    }

    fn evaluate(&mut self, inputs: &SensorInputs) -> Result<Vec<f64>, DecisionError> {
        Ok(vec![if self.wants_flap(inputs) { 1.0 } else { 0.0 }])
    }
}
