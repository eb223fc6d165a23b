//! Bounded Nelder-Mead simplex minimizer

use log::trace;
use serde::{Deserialize, Serialize};

use crate::refiner::{RefinementOutcome, Refiner};

/// Termination message when the simplex collapsed below tolerance
pub const CONVERGED_MESSAGE: &str = "Optimization terminated successfully.";

/// Termination message when the iteration cap was hit
pub const MAX_ITERATIONS_MESSAGE: &str = "Maximum number of iterations has been exceeded.";

/// Configuration for the Nelder-Mead minimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NelderMeadConfig {
    /// Iteration cap used by [`NelderMead::minimize`]
    pub max_iterations: usize,

    /// Convergence tolerance for simplex size
    pub tolerance: f64,

    /// Reflection coefficient (default: 1.0)
    pub alpha: f64,

    /// Expansion coefficient (default: 2.0)
    pub gamma: f64,

    /// Contraction coefficient (default: 0.5)
    pub rho: f64,

    /// Shrink coefficient (default: 0.5)
    pub sigma: f64,

    /// Relative perturbation for the initial simplex (default: 0.05)
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-6,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

impl NelderMeadConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the simplex-size tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the initial simplex perturbation
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.tolerance <= 0.0 {
            return Err("tolerance must be > 0".to_string());
        }
        if self.alpha <= 0.0 {
            return Err("alpha must be > 0".to_string());
        }
        if self.gamma <= 1.0 {
            return Err("gamma must be > 1".to_string());
        }
        if self.rho <= 0.0 || self.rho >= 1.0 {
            return Err("rho must be in (0, 1)".to_string());
        }
        if self.sigma <= 0.0 || self.sigma >= 1.0 {
            return Err("sigma must be in (0, 1)".to_string());
        }
        if self.initial_step <= 0.0 {
            return Err("initial_step must be > 0".to_string());
        }
        Ok(())
    }
}

/// Nelder-Mead simplex minimizer with box constraints
///
/// Maintains n+1 points in n dimensions and moves the worst one by
/// reflection, expansion, contraction or a shrink toward the best point.
/// Every trial point is clamped into the bounds before it is evaluated.
/// Converges when the largest distance from the simplex centroid drops
/// below the tolerance.
#[derive(Debug, Clone, Default)]
pub struct NelderMead {
    config: NelderMeadConfig,
}

struct Counted<'a> {
    objective: &'a dyn Fn(&[f64]) -> f64,
    evaluations: usize,
}

impl Counted<'_> {
    fn eval(&mut self, point: &[f64]) -> f64 {
        self.evaluations += 1;
        let value = (self.objective)(point);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    }
}

impl NelderMead {
    /// Create a minimizer
    pub fn new(config: NelderMeadConfig) -> Self {
        Self { config }
    }

    /// Minimizer configuration
    pub fn config(&self) -> &NelderMeadConfig {
        &self.config
    }

    /// Minimize with the configured iteration cap
    pub fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        initial: &[f64],
        bounds: &[(f64, f64)],
    ) -> RefinementOutcome {
        self.run(objective, initial, bounds, self.config.max_iterations)
    }

    fn run(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        initial: &[f64],
        bounds: &[(f64, f64)],
        max_iterations: usize,
    ) -> RefinementOutcome {
        let n = initial.len();
        let mut f = Counted {
            objective,
            evaluations: 0,
        };

        let mut simplex = self.initialize_simplex(initial, bounds);
        let mut values: Vec<f64> = simplex.iter().map(|p| f.eval(p)).collect();
        let mut indices: Vec<usize>;
        let mut iteration = 0;
        let mut converged = false;

        loop {
            indices = (0..simplex.len()).collect();
            indices.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

            if n == 0 || self.simplex_size(&simplex) < self.config.tolerance {
                converged = true;
                break;
            }
            if iteration >= max_iterations {
                break;
            }

            let best = indices[0];
            let worst = indices[n];
            let second_worst = indices[n - 1];
            let worst_value = values[worst];

            let center = centroid(&simplex, &indices[..n]);

            let reflected = self.clamp(self.reflect(&simplex[worst], &center), bounds);
            let reflected_value = f.eval(&reflected);

            if reflected_value < values[best] {
                let expanded = self.clamp(self.expand(&reflected, &center), bounds);
                let expanded_value = f.eval(&expanded);

                if expanded_value < reflected_value {
                    trace!("nelder-mead {}: expand", iteration);
                    simplex[worst] = expanded;
                    values[worst] = expanded_value;
                } else {
                    trace!("nelder-mead {}: reflect", iteration);
                    simplex[worst] = reflected;
                    values[worst] = reflected_value;
                }
            } else if reflected_value < values[second_worst] {
                trace!("nelder-mead {}: reflect", iteration);
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            } else {
                let contracted = if reflected_value < worst_value {
                    self.contract_outside(&reflected, &center)
                } else {
                    self.contract_inside(&simplex[worst], &center)
                };
                let contracted = self.clamp(contracted, bounds);
                let contracted_value = f.eval(&contracted);

                if contracted_value < worst_value.min(reflected_value) {
                    trace!("nelder-mead {}: contract", iteration);
                    simplex[worst] = contracted;
                    values[worst] = contracted_value;
                } else {
                    trace!("nelder-mead {}: shrink", iteration);
                    let best_point = simplex[best].clone();
                    self.shrink(&mut simplex, &best_point);
                    for i in 0..simplex.len() {
                        if i != best {
                            values[i] = f.eval(&simplex[i]);
                        }
                    }
                }
            }

            iteration += 1;
        }

        let best = indices[0];
        RefinementOutcome {
            parameters: simplex[best].clone(),
            value: values[best],
            success: converged,
            message: if converged {
                CONVERGED_MESSAGE
            } else {
                MAX_ITERATIONS_MESSAGE
            }
            .to_string(),
            iterations: iteration,
            evaluations: f.evaluations,
        }
    }

    /// Initial simplex by perturbing one coordinate per vertex
    ///
    /// A perturbation that would leave the box is taken in the opposite
    /// direction.
    fn initialize_simplex(&self, initial: &[f64], bounds: &[(f64, f64)]) -> Vec<Vec<f64>> {
        let start = self.clamp(initial.to_vec(), bounds);
        let mut simplex = vec![start.clone()];

        for i in 0..start.len() {
            let mut vertex = start.clone();
            let step = if vertex[i].abs() > 1e-10 {
                vertex[i] * self.config.initial_step
            } else {
                self.config.initial_step
            };
            let (_, high) = bound(bounds, i);
            vertex[i] = if vertex[i] + step > high {
                vertex[i] - step
            } else {
                vertex[i] + step
            };
            simplex.push(self.clamp(vertex, bounds));
        }

        simplex
    }

    fn clamp(&self, mut point: Vec<f64>, bounds: &[(f64, f64)]) -> Vec<f64> {
        for (i, x) in point.iter_mut().enumerate() {
            let (low, high) = bound(bounds, i);
            *x = x.max(low).min(high);
        }
        point
    }

    fn reflect(&self, worst: &[f64], centroid: &[f64]) -> Vec<f64> {
        worst
            .iter()
            .zip(centroid)
            .map(|(&w, &c)| c + self.config.alpha * (c - w))
            .collect()
    }

    fn expand(&self, reflected: &[f64], centroid: &[f64]) -> Vec<f64> {
        reflected
            .iter()
            .zip(centroid)
            .map(|(&r, &c)| c + self.config.gamma * (r - c))
            .collect()
    }

    fn contract_outside(&self, reflected: &[f64], centroid: &[f64]) -> Vec<f64> {
        reflected
            .iter()
            .zip(centroid)
            .map(|(&r, &c)| c + self.config.rho * (r - c))
            .collect()
    }

    fn contract_inside(&self, worst: &[f64], centroid: &[f64]) -> Vec<f64> {
        worst
            .iter()
            .zip(centroid)
            .map(|(&w, &c)| c + self.config.rho * (w - c))
            .collect()
    }

    fn shrink(&self, simplex: &mut [Vec<f64>], best: &[f64]) {
        for vertex in simplex.iter_mut() {
            for (x, &b) in vertex.iter_mut().zip(best) {
                *x = b + self.config.sigma * (*x - b);
            }
        }
    }

    /// Max distance of any vertex from the centroid
    fn simplex_size(&self, simplex: &[Vec<f64>]) -> f64 {
        let all: Vec<usize> = (0..simplex.len()).collect();
        let center = centroid(simplex, &all);
        simplex
            .iter()
            .map(|p| {
                p.iter()
                    .zip(&center)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max)
    }
}

impl Refiner for NelderMead {
    fn name(&self) -> &str {
        "nelder-mead"
    }

    fn refine(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        initial: &[f64],
        bounds: &[(f64, f64)],
        max_iterations: usize,
    ) -> RefinementOutcome {
        self.run(objective, initial, bounds, max_iterations)
    }
}

fn bound(bounds: &[(f64, f64)], i: usize) -> (f64, f64) {
    bounds
        .get(i)
        .copied()
        .unwrap_or((f64::NEG_INFINITY, f64::INFINITY))
}

fn centroid(simplex: &[Vec<f64>], indices: &[usize]) -> Vec<f64> {
    let n = simplex.first().map_or(0, Vec::len);
    let mut center = vec![0.0; n];

    for &idx in indices {
        for (c, x) in center.iter_mut().zip(&simplex[idx]) {
            *c += x;
        }
    }

    let count = indices.len().max(1) as f64;
    for c in center.iter_mut() {
        *c /= count;
    }

    center
}
