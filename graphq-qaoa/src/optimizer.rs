//! Grid search with optional local refinement for (γ, β)
//!
//! The search evaluates the analytic objective on a uniform inclusive grid,
//! keeps the first strict maximum in row-major order (γ outer, β inner) and
//! then, if a [`Refiner`] is available, polishes that point inside the same
//! bounds.

use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{RefinementPolicy, SearchConfig};
use crate::error::{QaoaError, Result};
use crate::objective::QaoaObjective;
use crate::refiner::Refiner;

/// A point of the parameter space with its objective value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub gamma: f64,
    pub beta: f64,
    pub value: f64,
}

/// What the refiner reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementStatus {
    /// Whether the refiner met its convergence criterion
    pub success: bool,
    /// Termination reason as reported by the refiner
    pub message: String,
    /// Iterations the refiner ran
    pub iterations: usize,
    /// Whether the refined point replaced the grid optimum
    pub adopted: bool,
}

/// Outcome of a parameter search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Selected γ
    pub gamma: f64,
    /// Selected β
    pub beta: f64,
    /// Objective value at the selected point
    pub value: f64,
    /// Best grid point before refinement
    pub grid_best: GridPoint,
    /// Objective evaluations across grid and refinement
    pub evaluations: usize,
    /// Refiner report, `None` if refinement was skipped
    pub refinement: Option<RefinementStatus>,
}

/// Maximizes a [`QaoaObjective`] over (γ, β)
pub struct QaoaOptimizer {
    objective: QaoaObjective,
    refiner: Option<Box<dyn Refiner>>,
}

impl std::fmt::Debug for QaoaOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QaoaOptimizer")
            .field("objective", &self.objective)
            .field("refiner", &self.refiner.as_ref().map(|r| r.name()))
            .finish()
    }
}

impl QaoaOptimizer {
    /// Create an optimizer with the default refiner, if one is compiled in
    pub fn new(objective: QaoaObjective) -> Self {
        Self {
            objective,
            refiner: default_refiner(),
        }
    }

    /// Create an optimizer that never refines
    pub fn grid_only(objective: QaoaObjective) -> Self {
        Self {
            objective,
            refiner: None,
        }
    }

    /// Replace the refiner
    pub fn with_refiner<R: Refiner + 'static>(mut self, refiner: R) -> Self {
        self.refiner = Some(Box::new(refiner));
        self
    }

    /// Check if a refiner is available
    pub fn has_refiner(&self) -> bool {
        self.refiner.is_some()
    }

    /// The objective being maximized
    pub fn objective(&self) -> &QaoaObjective {
        &self.objective
    }

    /// Search for the (γ, β) maximizing the expected cut
    pub fn search(&self, config: &SearchConfig) -> Result<SearchResult> {
        config.validate().map_err(QaoaError::InvalidConfig)?;

        let grid_best = self.scan_grid(config);
        let mut evaluations = config.grid_points();
        debug!(
            "grid optimum over {} points: gamma {:.6}, beta {:.6}, value {:.6}",
            evaluations, grid_best.gamma, grid_best.beta, grid_best.value
        );

        let mut result = SearchResult {
            gamma: grid_best.gamma,
            beta: grid_best.beta,
            value: grid_best.value,
            grid_best,
            evaluations,
            refinement: None,
        };

        if !config.refine {
            return Ok(result);
        }
        let Some(refiner) = self.refiner.as_deref() else {
            warn!("refinement requested but no refiner is available, keeping grid optimum");
            return Ok(result);
        };

        let negated = |p: &[f64]| -self.objective.expected_cut(p[0], p[1]);
        let outcome = refiner.refine(
            &negated,
            &[grid_best.gamma, grid_best.beta],
            &[config.gamma_bounds, config.beta_bounds],
            config.refine_max_iterations,
        );
        evaluations += outcome.evaluations;

        let adopted = match config.refinement_policy {
            RefinementPolicy::AdoptAlways => {
                if !outcome.success {
                    warn!(
                        "{} did not converge ({}), adopting its point anyway",
                        refiner.name(),
                        outcome.message
                    );
                }
                true
            }
            RefinementPolicy::FallbackOnFailure => outcome.success,
        };
        debug!(
            "{} finished after {} iterations: success {}, value {:.6}, adopted {}",
            refiner.name(),
            outcome.iterations,
            outcome.success,
            -outcome.value,
            adopted
        );

        if adopted {
            if let [gamma, beta] = outcome.parameters[..] {
                result.gamma = gamma;
                result.beta = beta;
                result.value = -outcome.value;
            }
        }
        result.evaluations = evaluations;
        result.refinement = Some(RefinementStatus {
            success: outcome.success,
            message: outcome.message,
            iterations: outcome.iterations,
            adopted,
        });

        Ok(result)
    }

    fn scan_grid(&self, config: &SearchConfig) -> GridPoint {
        let gammas = linspace(config.gamma_bounds, config.grid_res);
        let betas = linspace(config.beta_bounds, config.grid_res);
        let points: Vec<(f64, f64)> = gammas
            .iter()
            .flat_map(|&g| betas.iter().map(move |&b| (g, b)))
            .collect();

        let objective = &self.objective;
        let evaluate = |&(g, b): &(f64, f64)| objective.expected_cut(g, b);
        let values: Vec<f64> = if config.parallel {
            points.par_iter().map(evaluate).collect()
        } else {
            points.iter().map(evaluate).collect()
        };

        let mut best = GridPoint {
            gamma: points[0].0,
            beta: points[0].1,
            value: values[0],
        };
        for (&(gamma, beta), &value) in points.iter().zip(&values).skip(1) {
            if value > best.value {
                best = GridPoint { gamma, beta, value };
            }
        }
        best
    }
}

/// `count` evenly spaced values covering `[low, high]`; `count == 1` gives `[low]`
pub fn linspace((low, high): (f64, f64), count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let step = (high - low) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { high } else { low + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(feature = "refine")]
fn default_refiner() -> Option<Box<dyn Refiner>> {
    Some(Box::new(crate::nelder_mead::NelderMead::default()))
}

#[cfg(not(feature = "refine"))]
fn default_refiner() -> Option<Box<dyn Refiner>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refiner::RefinementOutcome;
    use approx::assert_relative_eq;
    use graphq_core::Graph;
    use std::f64::consts::FRAC_PI_2;

    /// Jumps to a fixed point and reports a fixed status
    struct Scripted {
        parameters: Vec<f64>,
        success: bool,
    }

    impl Refiner for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn refine(
            &self,
            objective: &dyn Fn(&[f64]) -> f64,
            _initial: &[f64],
            _bounds: &[(f64, f64)],
            _max_iterations: usize,
        ) -> RefinementOutcome {
            RefinementOutcome {
                parameters: self.parameters.clone(),
                value: objective(&self.parameters),
                success: self.success,
                message: if self.success { "done" } else { "gave up" }.to_string(),
                iterations: 7,
                evaluations: 1,
            }
        }
    }

    fn triangle_optimizer() -> QaoaOptimizer {
        QaoaOptimizer::grid_only(QaoaObjective::new(&Graph::complete(3)))
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace((0.0, 1.0), 1), vec![0.0]);
        assert_eq!(linspace((0.0, 1.0), 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace((0.0, FRAC_PI_2), 20)[19], FRAC_PI_2);
        assert!(linspace((0.0, 1.0), 0).is_empty());
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let optimizer = triangle_optimizer();
        let err = optimizer
            .search(&SearchConfig::new().with_grid_res(0))
            .unwrap_err();
        assert!(matches!(err, QaoaError::InvalidConfig(_)));
    }

    #[test]
    fn test_single_point_grid_is_lower_bound() {
        let optimizer = triangle_optimizer();
        let config = SearchConfig::new()
            .with_grid_res(1)
            .with_gamma_bounds(0.2, 1.0)
            .with_beta_bounds(0.1, 1.0)
            .with_refine(false);
        let result = optimizer.search(&config).unwrap();

        assert_eq!((result.gamma, result.beta), (0.2, 0.1));
        assert_eq!(result.evaluations, 1);
        assert!(result.refinement.is_none());
    }

    #[test]
    fn test_ties_resolve_to_first_in_scan_order() {
        // Every point with gamma = 0 evaluates to half the total weight
        let optimizer = triangle_optimizer();
        let config = SearchConfig::new()
            .with_grid_res(4)
            .with_gamma_bounds(0.0, 0.0)
            .with_refine(false);
        let result = optimizer.search(&config).unwrap();

        assert_eq!((result.gamma, result.beta), (0.0, 0.0));
        assert_relative_eq!(result.value, 1.5);
    }

    #[test]
    fn test_parallel_scan_matches_sequential() {
        let optimizer = QaoaOptimizer::grid_only(QaoaObjective::new(&Graph::complete(5)));
        let config = SearchConfig::new().with_grid_res(15).with_refine(false);
        let sequential = optimizer.search(&config).unwrap();
        let parallel = optimizer.search(&config.clone().with_parallel(true)).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_missing_refiner_degrades_to_grid() {
        let optimizer = triangle_optimizer();
        assert!(!optimizer.has_refiner());
        let result = optimizer
            .search(&SearchConfig::new().with_grid_res(5))
            .unwrap();
        assert!(result.refinement.is_none());
        assert_eq!(result.value, result.grid_best.value);
    }

    #[test]
    fn test_adopt_always_takes_failed_refinement() {
        let optimizer = triangle_optimizer().with_refiner(Scripted {
            parameters: vec![0.1, 0.1],
            success: false,
        });
        let result = optimizer
            .search(&SearchConfig::new().with_grid_res(5))
            .unwrap();

        let status = result.refinement.as_ref().unwrap();
        assert!(!status.success);
        assert!(status.adopted);
        assert_eq!(status.message, "gave up");
        assert_eq!((result.gamma, result.beta), (0.1, 0.1));
        assert_relative_eq!(
            result.value,
            optimizer.objective().expected_cut(0.1, 0.1),
            epsilon = 1e-12
        );
        assert_eq!(result.evaluations, 26);
    }

    #[test]
    fn test_fallback_keeps_grid_on_failure() {
        let optimizer = triangle_optimizer().with_refiner(Scripted {
            parameters: vec![0.1, 0.1],
            success: false,
        });
        let config = SearchConfig::new()
            .with_grid_res(5)
            .with_refinement_policy(RefinementPolicy::FallbackOnFailure);
        let result = optimizer.search(&config).unwrap();

        let status = result.refinement.as_ref().unwrap();
        assert!(!status.adopted);
        assert_eq!(result.gamma, result.grid_best.gamma);
        assert_eq!(result.beta, result.grid_best.beta);
        assert_eq!(result.value, result.grid_best.value);
    }

    #[test]
    fn test_fallback_adopts_successful_refinement() {
        let optimizer = triangle_optimizer().with_refiner(Scripted {
            parameters: vec![0.2, 0.3],
            success: true,
        });
        let config = SearchConfig::new()
            .with_grid_res(3)
            .with_refinement_policy(RefinementPolicy::FallbackOnFailure);
        let result = optimizer.search(&config).unwrap();

        assert!(result.refinement.as_ref().unwrap().adopted);
        assert_eq!((result.gamma, result.beta), (0.2, 0.3));
    }

    #[test]
    fn test_refine_disabled_skips_refiner() {
        let optimizer = triangle_optimizer().with_refiner(Scripted {
            parameters: vec![0.1, 0.1],
            success: true,
        });
        let result = optimizer
            .search(&SearchConfig::new().with_grid_res(3).with_refine(false))
            .unwrap();
        assert!(result.refinement.is_none());
        assert_eq!(result.evaluations, 9);
    }

    #[cfg(feature = "refine")]
    #[test]
    fn test_default_refiner_present() {
        let optimizer = QaoaOptimizer::new(QaoaObjective::new(&Graph::path(2)));
        assert!(optimizer.has_refiner());
    }

    #[cfg(not(feature = "refine"))]
    #[test]
    fn test_no_default_refiner_without_feature() {
        let optimizer = QaoaOptimizer::new(QaoaObjective::new(&Graph::path(2)));
        assert!(!optimizer.has_refiner());
    }
}
