//! Parameter types configuring the relaxation.
//!
//! [`FlowParams`] holds the two constants of the update rule. [`SolverParams`]
//! adds the iteration budget, the worker count and the sweep policy. The
//! iteration count has no default and must be chosen by the caller.

use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};

/// Constants of the Horn–Schunck update rule.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    /// Smoothness weight; enters the denominator as `lambda²`.
    pub lambda: f32,
    /// Under-relaxation factor applied to the correction term.
    pub step: f32,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            lambda: 1.2,
            step: 0.8,
        }
    }
}

impl FlowParams {
    pub fn validate(&self) -> Result<()> {
        if !self.lambda.is_finite() || self.lambda == 0.0 {
            return Err(FlowError::Config(format!(
                "lambda must be finite and non-zero, got {}",
                self.lambda
            )));
        }
        if !self.step.is_finite() {
            return Err(FlowError::Config(format!(
                "step must be finite, got {}",
                self.step
            )));
        }
        Ok(())
    }
}

/// What one relaxation step covers before the flow slots are swapped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPolicy {
    /// Visit every updatable pixel of the strip, then swap once. Jacobi
    /// semantics; matches the serial reference for any worker count.
    #[default]
    PerSweep,
    /// Visit one row of the strip (rows taken cyclically), then swap. Each row
    /// counts as one step. Follows a different numerical trajectory than
    /// `PerSweep` and does not converge to the same field for a given T.
    PerRow,
}

/// Full solver configuration for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverParams {
    /// Number of column strips / worker threads (>= 1).
    pub workers: usize,
    /// Number of relaxation steps T (>= 1).
    pub iterations: usize,
    /// Swap cadence of every worker.
    pub policy: SweepPolicy,
    /// Update-rule constants.
    pub flow: FlowParams,
}

impl SolverParams {
    /// Two workers, per-sweep swaps and default update constants.
    pub fn new(iterations: usize) -> Self {
        Self {
            workers: 2,
            iterations,
            policy: SweepPolicy::PerSweep,
            flow: FlowParams::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_policy(mut self, policy: SweepPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_flow(mut self, flow: FlowParams) -> Self {
        self.flow = flow;
        self
    }

    /// Reject configurations that cannot start a run.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(FlowError::Config("workers must be at least 1".into()));
        }
        if self.iterations == 0 {
            return Err(FlowError::Config("iterations must be at least 1".into()));
        }
        self.flow.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_constants() {
        let p = SolverParams::new(500);
        assert_eq!(p.workers, 2);
        assert_eq!(p.policy, SweepPolicy::PerSweep);
        assert_eq!(p.flow.lambda, 1.2);
        assert_eq!(p.flow.step, 0.8);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_workers_or_iterations_are_rejected() {
        assert!(matches!(
            SolverParams::new(10).with_workers(0).validate(),
            Err(FlowError::Config(_))
        ));
        assert!(matches!(
            SolverParams::new(0).validate(),
            Err(FlowError::Config(_))
        ));
    }

    #[test]
    fn degenerate_lambda_is_rejected() {
        let flow = FlowParams {
            lambda: 0.0,
            step: 0.8,
        };
        assert!(SolverParams::new(1).with_flow(flow).validate().is_err());
        let flow = FlowParams {
            lambda: 1.2,
            step: f32::NAN,
        };
        assert!(flow.validate().is_err());
    }

    #[test]
    fn policy_uses_snake_case_names() {
        let p: SweepPolicy = serde_json::from_str("\"per_row\"").unwrap();
        assert_eq!(p, SweepPolicy::PerRow);
    }
}
