//! Parameter search configuration

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

/// What the optimizer keeps when the refiner reports failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RefinementPolicy {
    /// Adopt the refined point regardless of the reported status
    #[default]
    AdoptAlways,
    /// Keep the grid optimum unless the refiner reports success
    FallbackOnFailure,
}

impl RefinementPolicy {
    /// Get a description of the policy
    pub fn description(&self) -> &'static str {
        match self {
            RefinementPolicy::AdoptAlways => "adopt the refined point even on failure",
            RefinementPolicy::FallbackOnFailure => "keep the grid optimum on failure",
        }
    }
}

/// Configuration for [`QaoaOptimizer::search`](crate::QaoaOptimizer::search)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Points per axis of the uniform inclusive grid
    ///
    /// Default: 20
    pub grid_res: usize,

    /// Inclusive range for the cost angle γ
    ///
    /// Default: `(0, π/2)`
    pub gamma_bounds: (f64, f64),

    /// Inclusive range for the mixer angle β
    ///
    /// Default: `(0, π/2)`
    pub beta_bounds: (f64, f64),

    /// Run local refinement from the best grid point
    ///
    /// Default: true
    pub refine: bool,

    /// Adoption rule for the refined point
    ///
    /// Default: [`RefinementPolicy::AdoptAlways`]
    pub refinement_policy: RefinementPolicy,

    /// Iteration cap handed to the refiner
    ///
    /// Default: 200
    pub refine_max_iterations: usize,

    /// Evaluate the grid on the rayon thread pool
    ///
    /// Default: false
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            grid_res: 20,
            gamma_bounds: (0.0, FRAC_PI_2),
            beta_bounds: (0.0, FRAC_PI_2),
            refine: true,
            refinement_policy: RefinementPolicy::AdoptAlways,
            refine_max_iterations: 200,
            parallel: false,
        }
    }
}

impl SearchConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set grid resolution
    pub fn with_grid_res(mut self, grid_res: usize) -> Self {
        self.grid_res = grid_res;
        self
    }

    /// Set γ bounds
    pub fn with_gamma_bounds(mut self, low: f64, high: f64) -> Self {
        self.gamma_bounds = (low, high);
        self
    }

    /// Set β bounds
    pub fn with_beta_bounds(mut self, low: f64, high: f64) -> Self {
        self.beta_bounds = (low, high);
        self
    }

    /// Enable or disable refinement
    pub fn with_refine(mut self, enabled: bool) -> Self {
        self.refine = enabled;
        self
    }

    /// Set the refinement adoption policy
    pub fn with_refinement_policy(mut self, policy: RefinementPolicy) -> Self {
        self.refinement_policy = policy;
        self
    }

    /// Set the refiner iteration cap
    pub fn with_refine_max_iterations(mut self, iterations: usize) -> Self {
        self.refine_max_iterations = iterations;
        self
    }

    /// Enable or disable parallel grid evaluation
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Number of objective evaluations the grid scan performs
    pub fn grid_points(&self) -> usize {
        self.grid_res * self.grid_res
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_res == 0 {
            return Err("grid_res must be >= 1".to_string());
        }

        for (name, (low, high)) in [("gamma", self.gamma_bounds), ("beta", self.beta_bounds)] {
            if !low.is_finite() || !high.is_finite() {
                return Err(format!("{}_bounds must be finite, got ({}, {})", name, low, high));
            }
            if low > high {
                return Err(format!(
                    "{}_bounds must satisfy low <= high, got ({}, {})",
                    name, low, high
                ));
            }
        }

        Ok(())
    }
}
