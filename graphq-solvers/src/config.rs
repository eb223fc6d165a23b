//! Solver configuration

use serde::{Deserialize, Serialize};

/// How the MST-preorder tour prices consecutive vertices that the original
/// graph does not join directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShortcutPolicy {
    /// Fail with `SolverError::TourInfeasible` naming the missing edge
    #[default]
    Strict,
    /// Charge the weight of the spanning-tree path between the two vertices
    TreePath,
}

impl ShortcutPolicy {
    /// Get a description of the policy
    pub fn description(&self) -> &'static str {
        match self {
            ShortcutPolicy::Strict => "fail on a missing shortcut edge",
            ShortcutPolicy::TreePath => "price a missing shortcut by its tree path",
        }
    }
}

/// Configuration shared by the Max-Cut and TSP solvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Policy for non-adjacent consecutive vertices in the MST-preorder tour
    ///
    /// Default: [`ShortcutPolicy::Strict`]
    pub shortcut_policy: ShortcutPolicy,

    /// Randomize the random-sampling subset size among
    /// {⌊n/2⌋−1, ⌊n/2⌋, ⌊n/2⌋+1} instead of always using ⌊n/2⌋
    ///
    /// Default: false
    pub size_jitter: bool,

    /// Largest vertex count accepted by exact Max-Cut (2ⁿ assignments)
    ///
    /// Default: 32
    pub max_exact_cut_vertices: usize,

    /// Largest vertex count accepted by exact TSP (n! permutations)
    ///
    /// Default: 20, the largest n with n! representable in a u64
    pub max_exact_tour_vertices: usize,
}

/// Hard ceiling for exact Max-Cut: assignments are u64 bitmasks
pub const MAX_CUT_INDEX_BITS: usize = 63;

/// Hard ceiling for exact TSP: 20! is the largest factorial in a u64
pub const MAX_TOUR_INDEX_VERTICES: usize = 20;

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            shortcut_policy: ShortcutPolicy::Strict,
            size_jitter: false,
            max_exact_cut_vertices: 32,
            max_exact_tour_vertices: MAX_TOUR_INDEX_VERTICES,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the MST shortcut policy
    pub fn with_shortcut_policy(mut self, policy: ShortcutPolicy) -> Self {
        self.shortcut_policy = policy;
        self
    }

    /// Enable or disable subset-size jitter for random sampling
    pub fn with_size_jitter(mut self, enabled: bool) -> Self {
        self.size_jitter = enabled;
        self
    }

    /// Set the exact Max-Cut vertex limit
    pub fn with_max_exact_cut_vertices(mut self, limit: usize) -> Self {
        self.max_exact_cut_vertices = limit;
        self
    }

    /// Set the exact TSP vertex limit
    pub fn with_max_exact_tour_vertices(mut self, limit: usize) -> Self {
        self.max_exact_tour_vertices = limit;
        self
    }

    /// Exact Max-Cut vertex limit, capped at [`MAX_CUT_INDEX_BITS`]
    pub fn exact_cut_limit(&self) -> usize {
        self.max_exact_cut_vertices.min(MAX_CUT_INDEX_BITS)
    }

    /// Exact TSP vertex limit, capped at [`MAX_TOUR_INDEX_VERTICES`]
    pub fn exact_tour_limit(&self) -> usize {
        self.max_exact_tour_vertices.min(MAX_TOUR_INDEX_VERTICES)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_exact_cut_vertices > MAX_CUT_INDEX_BITS {
            return Err(format!(
                "max_exact_cut_vertices must be <= {}, got {}",
                MAX_CUT_INDEX_BITS, self.max_exact_cut_vertices
            ));
        }

        if self.max_exact_tour_vertices > MAX_TOUR_INDEX_VERTICES {
            return Err(format!(
                "max_exact_tour_vertices must be <= {}, got {}",
                MAX_TOUR_INDEX_VERTICES, self.max_exact_tour_vertices
            ));
        }

        Ok(())
    }
}
