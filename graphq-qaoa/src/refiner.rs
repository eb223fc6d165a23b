//! Local refinement seam for the parameter search
//!
//! The optimizer only needs "minimize this bounded function from here". Any
//! derivative-free method can plug in by implementing [`Refiner`]; the
//! bundled [`NelderMead`](crate::NelderMead) is available with the `refine`
//! feature.

use serde::{Deserialize, Serialize};

/// Result of a single refinement run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementOutcome {
    /// Best parameters found, inside the bounds
    pub parameters: Vec<f64>,
    /// Objective value at `parameters`
    pub value: f64,
    /// Whether the method met its convergence criterion
    pub success: bool,
    /// Human-readable termination reason
    pub message: String,
    /// Iterations performed
    pub iterations: usize,
    /// Objective evaluations performed
    pub evaluations: usize,
}

/// Bounded derivative-free minimizer
pub trait Refiner: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Minimize `objective` starting at `initial`
    ///
    /// `bounds` holds one inclusive `(low, high)` range per coordinate.
    /// Implementations must not run more than `max_iterations` iterations
    /// and report non-convergence through [`RefinementOutcome::success`]
    /// rather than panicking.
    fn refine(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        initial: &[f64],
        bounds: &[(f64, f64)],
        max_iterations: usize,
    ) -> RefinementOutcome;
}
