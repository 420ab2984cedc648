// model.rs - local actions for the field models

use crate::error::{Error, Result};
use crate::graph::WeightedGraph;
use crate::utils::rng::RandomStream;

/// What a field model has to provide for local and cluster updates.
///
/// Cluster moves reflect values (v → -v), so a model whose action is not
/// invariant under a global reflection must not be driven by
/// `wolff_update`/`swendsen_wang_update`.
pub trait FieldModel {
    /// Value of every node after a cold start.
    fn cold_value(&self) -> f64;

    /// Random initial value of one node.
    fn hot_value(&self, rng: &mut RandomStream) -> f64;

    /// Metropolis proposal for a node currently holding `old`.
    fn propose(&self, old: f64, rng: &mut RandomStream) -> f64;

    /// Change in the (unnormalized) action when `site` goes from `old` to `new`.
    fn delta_action(&self, graph: &WeightedGraph, field: &[f64], site: usize, old: f64, new: f64) -> f64;

    /// Total action divided by the volume.
    fn action(&self, graph: &WeightedGraph, field: &[f64]) -> f64;

    /// Bond activation rate for a link of weight `weight` joining values `a`, `b`.
    /// The bond is activated with probability `1 - exp(rate)` when `rate < 0`.
    fn bond_rate(&self, a: f64, b: f64, weight: f64) -> f64;

    /// Checks per-node parameters against the graph they will run on.
    fn validate(&self, _graph: &WeightedGraph) -> Result<()> {
        Ok(())
    }

    /// Microcanonical partner of `field[site]`: a value with the same
    /// kinetic term, or `None` if the model has no overrelaxation move.
    fn overrelax_value(&self, _graph: &WeightedGraph, _field: &[f64], _site: usize) -> Option<f64> {
        None
    }
}

/// Z2 spins ±1 with S = -β Σ_links J s_a s_b.
#[derive(Debug, Clone, Copy)]
pub struct Ising {
    pub beta: f64,
}

impl Ising {
    pub fn new(beta: f64) -> Self {
        Self { beta }
    }
}

impl FieldModel for Ising {
    fn cold_value(&self) -> f64 {
        1.0
    }

    fn hot_value(&self, rng: &mut RandomStream) -> f64 {
        if rng.bool() { 1.0 } else { -1.0 }
    }

    fn propose(&self, old: f64, _rng: &mut RandomStream) -> f64 {
        -old
    }

    fn delta_action(&self, graph: &WeightedGraph, field: &[f64], site: usize, old: f64, new: f64) -> f64 {
        // for a flip this is 2 β s_i Σ J s_n
        -self.beta * (new - old) * graph.weighted_neighbor_sum(site, field)
    }

    fn action(&self, graph: &WeightedGraph, field: &[f64]) -> f64 {
        let s: f64 = graph
            .links()
            .iter()
            .map(|l| -self.beta * field[l.a] * field[l.b] * l.weight)
            .sum();
        s / graph.volume()
    }

    #[inline(always)]
    fn bond_rate(&self, a: f64, b: f64, weight: f64) -> f64 {
        -2.0 * self.beta * a * b * weight
    }
}

/// Real scalar φ⁴ theory:
/// S = Σ_links ½J(φ_a - φ_b)² + Σ_sites w_i [½(m² + c_i)φ_i² + λφ_i⁴].
///
/// `msq_ct` holds the per-site mass counterterm c_i (curvature correction on
/// curved geometries); an empty vector means zero everywhere, otherwise it
/// must have one entry per node.
#[derive(Debug, Clone)]
pub struct Phi4 {
    pub msq: f64,
    pub lambda: f64,
    /// Half-width of the uniform Metropolis step.
    pub metropolis_z: f64,
    pub msq_ct: Vec<f64>,
}

impl Phi4 {
    pub fn new(msq: f64, lambda: f64) -> Self {
        Self { msq, lambda, metropolis_z: 0.1, msq_ct: Vec::new() }
    }

    pub fn with_counterterms(mut self, msq_ct: Vec<f64>) -> Self {
        self.msq_ct = msq_ct;
        self
    }

    #[inline(always)]
    fn site_mass(&self, site: usize) -> f64 {
        self.msq + self.msq_ct.get(site).copied().unwrap_or(0.0)
    }

    #[inline(always)]
    fn site_potential(&self, site: usize, phi: f64) -> f64 {
        let phi2 = phi * phi;
        0.5 * self.site_mass(site) * phi2 + self.lambda * phi2 * phi2
    }
}

impl FieldModel for Phi4 {
    fn cold_value(&self) -> f64 {
        1.0
    }

    fn hot_value(&self, rng: &mut RandomStream) -> f64 {
        rng.normal()
    }

    fn propose(&self, old: f64, rng: &mut RandomStream) -> f64 {
        old + rng.symmetric(self.metropolis_z)
    }

    fn delta_action(&self, graph: &WeightedGraph, field: &[f64], site: usize, old: f64, new: f64) -> f64 {
        let mut j_sum = 0.0;
        let mut j_phi = 0.0;
        for &(l, nb) in graph.neighbors(site) {
            let j = graph.edge_weight(l);
            j_sum += j;
            j_phi += j * field[nb];
        }
        let kinetic = 0.5 * (new * new - old * old) * j_sum - (new - old) * j_phi;
        let potential = graph.node_weight(site)
            * (self.site_potential(site, new) - self.site_potential(site, old));
        kinetic + potential
    }

    fn action(&self, graph: &WeightedGraph, field: &[f64]) -> f64 {
        let kinetic: f64 = graph
            .links()
            .iter()
            .map(|l| {
                let d = field[l.a] - field[l.b];
                0.5 * l.weight * d * d
            })
            .sum();
        let potential: f64 = (0..graph.n())
            .map(|s| graph.node_weight(s) * self.site_potential(s, field[s]))
            .sum();
        (kinetic + potential) / graph.volume()
    }

    #[inline(always)]
    fn bond_rate(&self, a: f64, b: f64, weight: f64) -> f64 {
        -2.0 * a * b * weight
    }

    fn validate(&self, graph: &WeightedGraph) -> Result<()> {
        if !self.msq_ct.is_empty() && self.msq_ct.len() != graph.n() {
            return Err(Error::FieldLength { expected: graph.n(), found: self.msq_ct.len() });
        }
        Ok(())
    }

    /// Reflection of φ_i about the weighted mean of its neighbors,
    /// φ' = 2 Σ J φ_n / Σ J - φ_i, which leaves the kinetic term unchanged.
    fn overrelax_value(&self, graph: &WeightedGraph, field: &[f64], site: usize) -> Option<f64> {
        let mut j_sum = 0.0;
        let mut j_phi = 0.0;
        for &(l, nb) in graph.neighbors(site) {
            let j = graph.edge_weight(l);
            j_sum += j;
            j_phi += j * field[nb];
        }
        if j_sum == 0.0 {
            return None;
        }
        Some(2.0 * j_phi / j_sum - field[site])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice;

    #[test]
    fn ising_delta_matches_action_difference() {
        let g = lattice::rectangle(4, 4, 0.4, 0.6).unwrap();
        let model = Ising::new(0.7);
        let mut rng = RandomStream::new(3);
        let mut field: Vec<f64> = (0..g.n()).map(|_| model.hot_value(&mut rng)).collect();

        let before = model.action(&g, &field) * g.volume();
        let old = field[5];
        let delta = model.delta_action(&g, &field, 5, old, -old);
        field[5] = -old;
        let after = model.action(&g, &field) * g.volume();
        assert!((after - before - delta).abs() < 1e-12);
    }

    #[test]
    fn phi4_delta_matches_action_difference() {
        let g = lattice::rectangle(3, 5, 1.0, 1.3).unwrap();
        let ct: Vec<f64> = (0..g.n()).map(|s| 0.01 * s as f64).collect();
        let model = Phi4::new(-1.27, 0.25).with_counterterms(ct);
        let mut rng = RandomStream::new(11);
        let mut field: Vec<f64> = (0..g.n()).map(|_| model.hot_value(&mut rng)).collect();

        for site in [0, 7, 14] {
            let before = model.action(&g, &field) * g.volume();
            let old = field[site];
            let new = old + 0.37;
            let delta = model.delta_action(&g, &field, site, old, new);
            field[site] = new;
            let after = model.action(&g, &field) * g.volume();
            assert!((after - before - delta).abs() < 1e-10);
        }
    }

    #[test]
    fn phi4_overrelaxation_keeps_kinetic_term() {
        let g = lattice::rectangle(4, 3, 0.7, 1.2).unwrap();
        let free = Phi4::new(0.0, 0.0);
        let mut rng = RandomStream::new(9);
        let mut field: Vec<f64> = (0..g.n()).map(|_| free.hot_value(&mut rng)).collect();

        // with m² = λ = 0 the action is purely kinetic
        let before = free.action(&g, &field);
        field[4] = free.overrelax_value(&g, &field, 4).unwrap();
        assert!((free.action(&g, &field) - before).abs() < 1e-12);

        assert!(Ising::new(1.0).overrelax_value(&g, &field, 4).is_none());
    }

    #[test]
    fn phi4_counterterms_must_cover_every_node() {
        let g = lattice::cycle(5, 1.0).unwrap();
        assert!(Phi4::new(-1.0, 0.2).validate(&g).is_ok());
        assert!(Phi4::new(-1.0, 0.2).with_counterterms(vec![0.1; 5]).validate(&g).is_ok());
        assert!(matches!(
            Phi4::new(-1.0, 0.2).with_counterterms(vec![0.1; 3]).validate(&g),
            Err(Error::FieldLength { expected: 5, found: 3 })
        ));
    }

    #[test]
    fn phi4_action_is_reflection_invariant() {
        let g = lattice::cycle(7, 1.0).unwrap();
        let model = Phi4::new(-0.5, 0.1);
        let mut rng = RandomStream::new(5);
        let field: Vec<f64> = (0..g.n()).map(|_| model.hot_value(&mut rng)).collect();
        let flipped: Vec<f64> = field.iter().map(|v| -v).collect();
        assert!((model.action(&g, &field) - model.action(&g, &flipped)).abs() < 1e-12);
    }
}
