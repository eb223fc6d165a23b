//! End-to-end parameter search and objective properties

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8};

use approx::{assert_abs_diff_eq, assert_relative_eq};
use graphq_core::generators::erdos_renyi;
use graphq_core::Graph;
use graphq_qaoa::{QaoaObjective, QaoaOptimizer, SearchConfig};
use graphq_solvers::MaxCutSolver;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_zero_angle_boundary() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..5 {
        let graph = erdos_renyi(7, 0.5, 1..=9, &mut rng).unwrap();
        let objective = QaoaObjective::new(&graph);
        let half = 0.5 * graph.total_weight();
        let angle: f64 = rng.gen_range(-3.0..3.0);

        assert_relative_eq!(objective.expected_cut(0.0, 0.0), half, epsilon = 1e-9);
        assert_relative_eq!(objective.expected_cut(0.0, angle), half, epsilon = 1e-9);
        assert_relative_eq!(objective.expected_cut(angle, 0.0), half, epsilon = 1e-9);
        for term in objective.edge_terms(0.0, angle) {
            assert!(term > 0.0);
        }
    }
}

#[test]
fn test_triangle_scenario() {
    let objective = QaoaObjective::new(&Graph::complete(3));
    assert_eq!(objective.expected_cut(0.0, 0.0), 1.5);
    assert_eq!(objective.total_weight(), 3.0);
}

#[test]
fn test_expected_cut_never_beats_exact_max_cut() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..5 {
        let graph = erdos_renyi(8, 0.4, 1..=5, &mut rng).unwrap();
        let exact = MaxCutSolver::new(&graph).max_cut_bruteforce().unwrap();
        let objective = QaoaObjective::new(&graph);

        for _ in 0..20 {
            let gamma = rng.gen_range(-3.2..3.2);
            let beta = rng.gen_range(-3.2..3.2);
            let value = objective.expected_cut(gamma, beta);
            assert!(value >= -1e-9);
            assert!(value <= exact.weight + 1e-9);
        }
    }
}

#[test]
fn test_degree_one_endpoints_are_finite() {
    // Leaves have deg - 1 = 0 and isolated pairs have deg - 1 = 0 on both ends
    let mut graph = Graph::star(4);
    graph.add_edge(10, 11, 2.0).unwrap();
    let objective = QaoaObjective::new(&graph);

    for stats in objective.edge_statistics() {
        assert!(stats.du >= 0 && stats.dv >= 0);
        assert!(stats.du + stats.dv - 2 * stats.triangles >= 0);
    }
    let value = objective.expected_cut(FRAC_PI_2, FRAC_PI_8);
    assert!(value.is_finite());
    // The isolated edge alone reaches its optimum here
    assert_relative_eq!(objective.edge_terms(FRAC_PI_2, FRAC_PI_8)[3], 2.0, epsilon = 1e-12);
}

#[test]
fn test_grid_only_search_on_cycle() {
    let optimizer = QaoaOptimizer::grid_only(QaoaObjective::new(&Graph::cycle(4)));
    let config = SearchConfig::new().with_grid_res(9);
    let result = optimizer.search(&config).unwrap();

    // pi/4 and pi/8 lie on the 9-point grid over [0, pi/2]
    assert_abs_diff_eq!(result.gamma, FRAC_PI_4, epsilon = 1e-12);
    assert_abs_diff_eq!(result.beta, FRAC_PI_8, epsilon = 1e-12);
    assert_relative_eq!(result.value, 3.0, epsilon = 1e-12);
    assert_eq!(result.evaluations, 81);
}

#[test]
fn test_search_result_serializes() {
    let optimizer = QaoaOptimizer::grid_only(QaoaObjective::new(&Graph::cycle(4)));
    let result = optimizer
        .search(&SearchConfig::new().with_grid_res(3))
        .unwrap();

    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["evaluations"], 9);
    assert!(json["refinement"].is_null());
    assert!(json["grid_best"]["value"].is_number());
}

#[cfg(feature = "refine")]
mod refined {
    use super::*;
    use graphq_qaoa::RefinementPolicy;

    #[test]
    fn test_single_edge_reaches_optimum() {
        let optimizer = QaoaOptimizer::new(QaoaObjective::new(&Graph::path(2)));
        let result = optimizer.search(&SearchConfig::default()).unwrap();

        let status = result.refinement.as_ref().unwrap();
        assert!(status.success);
        assert!(status.adopted);
        assert_relative_eq!(result.value, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.gamma, FRAC_PI_2, epsilon = 1e-9);
        assert_abs_diff_eq!(result.beta, FRAC_PI_8, epsilon = 1e-4);
        assert!(result.evaluations > 400);
    }

    #[test]
    fn test_cycle_refines_off_grid() {
        let optimizer = QaoaOptimizer::new(QaoaObjective::new(&Graph::cycle(4)));
        let result = optimizer
            .search(&SearchConfig::new().with_grid_res(10))
            .unwrap();

        assert!(result.grid_best.value < 3.0 - 1e-3);
        assert_relative_eq!(result.value, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.gamma, FRAC_PI_4, epsilon = 1e-4);
        assert_abs_diff_eq!(result.beta, FRAC_PI_8, epsilon = 1e-4);
    }

    #[test]
    fn test_triangle_reaches_full_cut() {
        let optimizer = QaoaOptimizer::new(QaoaObjective::new(&Graph::complete(3)));
        let result = optimizer.search(&SearchConfig::default()).unwrap();
        assert_relative_eq!(result.value, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_refinement_never_loses_to_grid() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..5 {
            let graph = erdos_renyi(6, 0.6, 1..=4, &mut rng).unwrap();
            let optimizer = QaoaOptimizer::new(QaoaObjective::new(&graph));
            let result = optimizer
                .search(&SearchConfig::new().with_grid_res(8).with_parallel(true))
                .unwrap();

            assert!(result.value >= result.grid_best.value);
            assert!(result.gamma >= 0.0 && result.gamma <= FRAC_PI_2);
            assert!(result.beta >= 0.0 && result.beta <= FRAC_PI_2);
        }
    }

    #[test]
    fn test_iteration_cap_under_both_policies() {
        let objective = QaoaObjective::new(&Graph::cycle(4));
        let config = SearchConfig::new()
            .with_grid_res(10)
            .with_refine_max_iterations(2);

        let adopt = QaoaOptimizer::new(objective.clone()).search(&config).unwrap();
        let status = adopt.refinement.as_ref().unwrap();
        assert!(!status.success);
        assert!(status.adopted);
        assert_eq!(status.iterations, 2);
        assert_eq!(status.message, "Maximum number of iterations has been exceeded.");

        let fallback = QaoaOptimizer::new(objective)
            .search(&config.with_refinement_policy(RefinementPolicy::FallbackOnFailure))
            .unwrap();
        assert!(!fallback.refinement.as_ref().unwrap().adopted);
        assert_eq!(fallback.value, fallback.grid_best.value);
        assert_eq!(fallback.gamma, adopt.grid_best.gamma);
    }
}
