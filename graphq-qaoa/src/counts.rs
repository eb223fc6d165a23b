//! Decoding sampled bitstrings from a quantum executor into cuts
//!
//! An executor running the QAOA circuit reports how often each bitstring
//! was measured. Character `k` of a bitstring is the measured side of one
//! vertex; [`BitOrder`] fixes which one. `'0'` places a vertex in S and
//! `'1'` in T.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use graphq_core::{Bipartition, CutEvaluator, Graph};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{QaoaError, Result};

/// Mapping between bitstring positions and vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BitOrder {
    /// The rightmost character is vertex index 0 (little-endian register)
    #[default]
    LsbFirst,
    /// The leftmost character is vertex index 0
    MsbFirst,
}

/// Measurement outcome counts
///
/// Maps bitstrings (measurement outcomes) to the number of times they were observed.
/// The shot total starts as the sum of the counts and grows with [`add`](Self::add);
/// an executor that reports its own total (for example after discarding shots)
/// sets it with [`with_total_shots`](Self::with_total_shots).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementCounts {
    counts: HashMap<String, usize>,
    total_shots: usize,
}

impl MeasurementCounts {
    /// Create an empty set of counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a counts map
    pub fn from_counts(counts: HashMap<String, usize>) -> Self {
        let total_shots = counts.values().sum();
        Self {
            counts,
            total_shots,
        }
    }

    /// Replace the shot total with the one reported by the executor
    ///
    /// Expectations divide by this total rather than by the sum of counts.
    pub fn with_total_shots(mut self, total_shots: usize) -> Self {
        self.total_shots = total_shots;
        self
    }

    /// Record `count` more observations of `bitstring`
    pub fn add(&mut self, bitstring: impl Into<String>, count: usize) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
        self.total_shots += count;
    }

    /// Get the count for a specific bitstring
    pub fn get(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Get the probability of a specific bitstring
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.total_shots == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / self.total_shots as f64
        }
    }

    /// Iterate over `(bitstring, count)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(bs, &count)| (bs.as_str(), count))
    }

    /// Get total number of shots
    pub fn total_shots(&self) -> usize {
        self.total_shots
    }

    /// Get number of unique outcomes observed
    pub fn num_outcomes(&self) -> usize {
        self.counts.len()
    }

    /// Get the most common outcome, ties broken by the smaller bitstring
    pub fn most_common(&self) -> Option<(&str, usize)> {
        self.sorted().into_iter().next()
    }

    /// Get outcomes sorted by frequency (descending), then by bitstring
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }
}

impl FromIterator<(String, usize)> for MeasurementCounts {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (bitstring, count) in iter {
            counts.add(bitstring, count);
        }
        counts
    }
}

/// The best cut among observed outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledCut<V> {
    pub bitstring: String,
    pub partition: Bipartition<V>,
    pub weight: f64,
}

/// Decode a bitstring into per-vertex sides (`true` = T)
pub fn decode_bitstring(
    bitstring: &str,
    num_vertices: usize,
    order: BitOrder,
) -> Result<Vec<bool>> {
    let bits = bitstring.as_bytes();
    let length = bitstring.chars().count();
    if bits.len() != num_vertices || length != num_vertices {
        return Err(QaoaError::malformed(
            bitstring,
            format!("expected {} bits, got {}", num_vertices, length),
        ));
    }

    let mut sides = Vec::with_capacity(num_vertices);
    for i in 0..num_vertices {
        let pos = match order {
            BitOrder::LsbFirst => num_vertices - 1 - i,
            BitOrder::MsbFirst => i,
        };
        match bits[pos] {
            b'0' => sides.push(false),
            b'1' => sides.push(true),
            other => {
                return Err(QaoaError::malformed(
                    bitstring,
                    format!("non-binary character '{}'", other as char),
                ))
            }
        }
    }
    Ok(sides)
}

/// Cut weight of a single measured bitstring
pub fn sample_cut<V>(graph: &Graph<V>, bitstring: &str, order: BitOrder) -> Result<f64>
where
    V: Clone + Eq + Hash + Debug,
{
    let sides = decode_bitstring(bitstring, graph.num_vertices(), order)?;
    Ok(CutEvaluator::new(graph).cut_weight_sides(&sides))
}

/// Bipartition encoded by a measured bitstring
pub fn sample_partition<V>(
    graph: &Graph<V>,
    bitstring: &str,
    order: BitOrder,
) -> Result<Bipartition<V>>
where
    V: Clone + Eq + Hash + Debug,
{
    let sides = decode_bitstring(bitstring, graph.num_vertices(), order)?;
    Ok(CutEvaluator::new(graph).bipartition(&sides)?)
}

/// Shot-weighted mean cut weight, Σ count · cut / shots
///
/// Every recorded bitstring is validated, including ones with zero count.
pub fn empirical_expected_cut<V>(
    graph: &Graph<V>,
    counts: &MeasurementCounts,
    order: BitOrder,
) -> Result<f64>
where
    V: Clone + Eq + Hash + Debug,
{
    if counts.total_shots() == 0 {
        return Err(QaoaError::NoShots);
    }

    let eval = CutEvaluator::new(graph);
    let mut total = 0.0;
    for (bitstring, count) in counts.iter() {
        let sides = decode_bitstring(bitstring, graph.num_vertices(), order)?;
        total += eval.cut_weight_sides(&sides) * count as f64;
    }

    let expected = total / counts.total_shots() as f64;
    debug!(
        "empirical expected cut over {} shots, {} outcomes: {}",
        counts.total_shots(),
        counts.num_outcomes(),
        expected
    );
    Ok(expected)
}

/// Highest-weight cut among outcomes observed at least once
///
/// Ties go to the lexicographically smaller bitstring.
pub fn best_sampled_cut<V>(
    graph: &Graph<V>,
    counts: &MeasurementCounts,
    order: BitOrder,
) -> Result<SampledCut<V>>
where
    V: Clone + Eq + Hash + Debug,
{
    let eval = CutEvaluator::new(graph);
    let mut best: Option<(&str, Vec<bool>, f64)> = None;

    for (bitstring, count) in counts.iter() {
        if count == 0 {
            continue;
        }
        let sides = decode_bitstring(bitstring, graph.num_vertices(), order)?;
        let weight = eval.cut_weight_sides(&sides);
        let better = match &best {
            None => true,
            Some((b, _, w)) => weight > *w || (weight == *w && bitstring < *b),
        };
        if better {
            best = Some((bitstring, sides, weight));
        }
    }

    let (bitstring, sides, weight) = best.ok_or(QaoaError::NoShots)?;
    Ok(SampledCut {
        bitstring: bitstring.to_string(),
        partition: eval.bipartition(&sides)?,
        weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn weighted_path() -> Graph {
        // 0 -1.0- 1 -2.0- 2
        Graph::from_edges(0..3, &[(0, 1, 1.0), (1, 2, 2.0)]).unwrap()
    }

    #[test]
    fn test_measurement_counts() {
        let mut counts = MeasurementCounts::new();
        counts.add("00", 30);
        counts.add("11", 70);
        counts.add("00", 10);

        assert_eq!(counts.total_shots(), 110);
        assert_eq!(counts.get("00"), 40);
        assert_eq!(counts.get("01"), 0);
        assert_eq!(counts.num_outcomes(), 2);
        assert_relative_eq!(counts.probability("11"), 70.0 / 110.0);
        assert_eq!(counts.most_common(), Some(("11", 70)));
    }

    #[test]
    fn test_sorted_breaks_ties_by_bitstring() {
        let counts: MeasurementCounts = [("10", 5), ("01", 5), ("11", 9)]
            .into_iter()
            .map(|(b, c)| (b.to_string(), c))
            .collect();
        let sorted = counts.sorted();
        assert_eq!(sorted, vec![("11", 9), ("01", 5), ("10", 5)]);
    }

    #[test]
    fn test_bit_order() {
        // "001": rightmost char is vertex 0 under LsbFirst
        assert_eq!(
            decode_bitstring("001", 3, BitOrder::LsbFirst).unwrap(),
            vec![true, false, false]
        );
        assert_eq!(
            decode_bitstring("001", 3, BitOrder::MsbFirst).unwrap(),
            vec![false, false, true]
        );
    }

    #[test]
    fn test_sample_cut_depends_on_order() {
        let graph = weighted_path();
        // LsbFirst: vertex 0 alone in T, cuts edge (0,1)
        assert_eq!(sample_cut(&graph, "001", BitOrder::LsbFirst).unwrap(), 1.0);
        // MsbFirst: vertex 2 alone in T, cuts edge (1,2)
        assert_eq!(sample_cut(&graph, "001", BitOrder::MsbFirst).unwrap(), 2.0);
    }

    #[test]
    fn test_malformed_bitstrings() {
        let graph = weighted_path();
        assert!(matches!(
            sample_cut(&graph, "01", BitOrder::LsbFirst),
            Err(QaoaError::MalformedBitstring { .. })
        ));
        assert!(matches!(
            sample_cut(&graph, "0a1", BitOrder::LsbFirst),
            Err(QaoaError::MalformedBitstring { .. })
        ));
        assert!(matches!(
            sample_cut(&graph, "0é", BitOrder::LsbFirst),
            Err(QaoaError::MalformedBitstring { .. })
        ));
    }

    #[test]
    fn test_empirical_expected_cut() {
        let graph = weighted_path();
        let mut counts = MeasurementCounts::new();
        counts.add("010", 50); // cuts both edges: 3.0
        counts.add("000", 25); // 0.0
        counts.add("001", 25); // 1.0

        let expected = empirical_expected_cut(&graph, &counts, BitOrder::LsbFirst).unwrap();
        assert_relative_eq!(expected, (50.0 * 3.0 + 25.0 * 1.0) / 100.0);
    }

    #[test]
    fn test_reported_shot_total_is_the_divisor() {
        let graph = weighted_path();
        let mut counts = MeasurementCounts::new();
        counts.add("010", 50);
        assert_eq!(counts.total_shots(), 50);

        let counts = counts.with_total_shots(100);
        assert_eq!(counts.total_shots(), 100);
        assert_relative_eq!(counts.probability("010"), 0.5);
        let expected = empirical_expected_cut(&graph, &counts, BitOrder::LsbFirst).unwrap();
        assert_relative_eq!(expected, 50.0 * 3.0 / 100.0);

        assert_eq!(
            empirical_expected_cut(&graph, &counts.with_total_shots(0), BitOrder::LsbFirst),
            Err(QaoaError::NoShots)
        );
    }

    #[test]
    fn test_empirical_expected_cut_requires_shots() {
        let graph = weighted_path();
        assert_eq!(
            empirical_expected_cut(&graph, &MeasurementCounts::new(), BitOrder::LsbFirst),
            Err(QaoaError::NoShots)
        );
    }

    #[test]
    fn test_best_sampled_cut() {
        let graph = weighted_path();
        let mut counts = MeasurementCounts::new();
        counts.add("010", 1);
        counts.add("101", 3);
        counts.add("100", 0);

        let best = best_sampled_cut(&graph, &counts, BitOrder::LsbFirst).unwrap();
        // "010" and "101" both cut everything; the smaller string wins
        assert_eq!(best.bitstring, "010");
        assert_eq!(best.weight, 3.0);
        assert_eq!(best.partition.s, vec![0, 2]);
        assert_eq!(best.partition.t, vec![1]);
    }

    #[test]
    fn test_sample_partition() {
        let graph = weighted_path();
        let partition = sample_partition(&graph, "110", BitOrder::LsbFirst).unwrap();
        assert_eq!(partition.s, vec![0]);
        assert_eq!(partition.t, vec![1, 2]);
    }
}
