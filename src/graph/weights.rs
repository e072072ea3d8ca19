//! Re-weighting of edges: small random jitter on current weights, or
//! random street conditions drawn from a fixed probability table.

use log::debug;
use rand::Rng;

use super::{Graph, is_valid_weight};
use crate::errors::GraphError;


/// A street condition with its weight range and probability of being drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Condition {
    pub name: &'static str,
    pub min_weight: u32,
    pub max_weight: u32,
    pub probability: f64,
}

/// Possible street conditions, probabilities sum to 1
pub const CONDITIONS: [Condition; 7] = [
    Condition { name: "Expressway", min_weight: 1, max_weight: 2, probability: 0.10 },
    Condition { name: "Free flow", min_weight: 2, max_weight: 4, probability: 0.30 },
    Condition { name: "Moderate traffic", min_weight: 4, max_weight: 7, probability: 0.25 },
    Condition { name: "Heavy traffic", min_weight: 7, max_weight: 10, probability: 0.20 },
    Condition { name: "Roadworks", min_weight: 10, max_weight: 15, probability: 0.08 },
    Condition { name: "Accident", min_weight: 12, max_weight: 18, probability: 0.05 },
    Condition { name: "Road closed", min_weight: 999, max_weight: 999, probability: 0.02 },
];

/// Used when the cumulative probabilities fall short due to rounding
pub const FALLBACK_CONDITION: (f64, &str) = (5.0, "Normal condition");


/// Draw a condition by cumulative probability, then a whole weight within its range
pub fn random_condition<R: Rng>(rng: &mut R) -> (f64, &'static str) {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;

    for condition in &CONDITIONS {
        cumulative += condition.probability;
        if roll <= cumulative {
            let weight = rng.random_range(condition.min_weight..=condition.max_weight);
            return (weight as f64, condition.name);
        }
    }

    FALLBACK_CONDITION
}

/// Give every edge a fresh random condition as weight and annotation
pub fn assign_conditions<R: Rng>(graph: &mut Graph, rng: &mut R) -> Result<(), GraphError> {
    for id in graph.edge_ids() {
        let (weight, name) = random_condition(rng);
        graph.update_weight(id, weight)?;
        graph.set_annotation(id, Some(name.to_string()))?;
    }
    debug!("assigned random conditions to {} edges", graph.edge_count());
    Ok(())
}

/// Nudge every weight by a uniform amount in [-amplitude, amplitude]
/// Results are rounded to 2 decimals and never drop below min_weight.
/// An invalid min_weight is rejected before any edge changes.
pub fn jitter_weights<R: Rng>(
    graph: &mut Graph,
    rng: &mut R,
    amplitude: f64,
    min_weight: f64,
) -> Result<(), GraphError> {
    if !is_valid_weight(min_weight) {
        return Err(GraphError::InvalidWeight(min_weight));
    }
    for id in graph.edge_ids() {
        let current = graph.edge(id).ok_or(GraphError::UnknownEdge(id.0))?.weight;
        let offset = if amplitude > 0.0 && amplitude.is_finite() {
            rng.random_range(-amplitude..=amplitude)
        } else {
            0.0
        };
        graph.update_weight(id, round2(current + offset).max(min_weight))?;
    }
    debug!("jittered {} edge weights by up to {amplitude}", graph.edge_count());
    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::document::{GraphDocument, RawEdge, RawVertex};
    use crate::graph::EdgeId;
    use rand::{SeedableRng, rngs::StdRng};

    fn path_graph() -> Graph {
        let doc = GraphDocument {
            vertices: ["a", "b", "c", "d"].iter().enumerate().map(|(i, id)| RawVertex {
                id: id.to_string(),
                label: id.to_string(),
                x: i as f64,
                y: 0.0,
            }).collect(),
            edges: vec![
                RawEdge { a: "a".into(), b: "b".into(), weight: Some(1.2), annotation: None },
                RawEdge { a: "b".into(), b: "c".into(), weight: Some(5.0), annotation: None },
                RawEdge { a: "c".into(), b: "d".into(), weight: Some(40.0), annotation: None },
            ],
            ..GraphDocument::default()
        };
        let mut graph = Graph::new();
        graph.load(&doc);
        graph
    }

    #[test]
    fn test_condition_table_sums_to_one() {
        let total: f64 = CONDITIONS.iter().map(|c| c.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_condition_is_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let (weight, name) = random_condition(&mut rng);
            let condition = CONDITIONS.iter().find(|c| c.name == name);
            match condition {
                Some(c) => assert!(weight >= c.min_weight as f64 && weight <= c.max_weight as f64),
                None => assert_eq!((weight, name), FALLBACK_CONDITION),
            }
        }
    }

    #[test]
    fn test_assign_conditions_annotates_every_edge() {
        let mut graph = path_graph();
        let mut rng = StdRng::seed_from_u64(42);
        assign_conditions(&mut graph, &mut rng).unwrap();

        for (_, edge) in graph.edges() {
            assert!(edge.weight >= 1.0);
            assert!(edge.annotation.is_some());
        }
    }

    #[test]
    fn test_jitter_stays_close_and_clamped() {
        let mut graph = path_graph();
        let mut rng = StdRng::seed_from_u64(3);
        jitter_weights(&mut graph, &mut rng, 0.6, 1.0).unwrap();

        let a_b = graph.edge(EdgeId(0)).unwrap().weight;
        let b_c = graph.edge(EdgeId(1)).unwrap().weight;
        let c_d = graph.edge(EdgeId(2)).unwrap().weight;
        assert!(a_b >= 1.0 && a_b <= 1.8);
        assert!((b_c - 5.0).abs() <= 0.6 + 1e-9);
        assert!((c_d - 40.0).abs() <= 0.6 + 1e-9);
        // two decimals at most
        for w in [a_b, b_c, c_d] {
            assert!(((w * 100.0).round() - w * 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_jitter_with_zero_amplitude_only_clamps() {
        let mut graph = path_graph();
        let mut rng = StdRng::seed_from_u64(3);
        jitter_weights(&mut graph, &mut rng, 0.0, 2.0).unwrap();

        assert_eq!(graph.edge(EdgeId(0)).unwrap().weight, 2.0);
        assert_eq!(graph.edge(EdgeId(1)).unwrap().weight, 5.0);
    }

    #[test]
    fn test_jitter_rejects_invalid_floor() {
        let mut graph = path_graph();
        let mut rng = StdRng::seed_from_u64(3);
        for floor in [-3.0, f64::NAN, f64::INFINITY] {
            let result = jitter_weights(&mut graph, &mut rng, 0.6, floor);
            assert!(matches!(result, Err(GraphError::InvalidWeight(_))));
        }
        // nothing moved
        assert_eq!(graph.edge(EdgeId(0)).unwrap().weight, 1.2);
        assert_eq!(graph.edge(EdgeId(2)).unwrap().weight, 40.0);
    }
}
