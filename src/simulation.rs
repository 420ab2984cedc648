// simulation.rs - one Markov chain: field, random stream and update entry points

use crate::cluster::ClusterWorkspace;
use crate::error::{Error, Result};
use crate::graph::WeightedGraph;
use crate::model::FieldModel;
use crate::utils::rng::RandomStream;

/// A single simulation context.
///
/// Owns the field, its random stream and the cluster scratch space; only
/// borrows the graph, which may back several contexts at once.
pub struct Simulation<'g, M: FieldModel> {
    graph: &'g WeightedGraph,
    pub model: M,
    field: Vec<f64>,
    rng: RandomStream,
    workspace: ClusterWorkspace,
    /// Energy held by the overrelaxation demon, never negative.
    demon: f64,
}

impl<'g, M: FieldModel> Simulation<'g, M> {
    /// New chain, cold-started. Fails if the model's per-node parameters
    /// do not match the graph.
    pub fn new(graph: &'g WeightedGraph, model: M, rng: RandomStream) -> Result<Self> {
        model.validate(graph)?;
        let n = graph.n();
        let mut sim = Self {
            graph,
            model,
            field: vec![0.0; n],
            rng,
            workspace: ClusterWorkspace::new(n),
            demon: 0.0,
        };
        sim.cold_start();
        Ok(sim)
    }

    pub fn graph(&self) -> &'g WeightedGraph {
        self.graph
    }

    pub fn field(&self) -> &[f64] {
        &self.field
    }

    /// Replace the whole field, e.g. after decoding a stored configuration.
    pub fn set_field(&mut self, values: Vec<f64>) -> Result<()> {
        if values.len() != self.graph.n() {
            return Err(Error::FieldLength { expected: self.graph.n(), found: values.len() });
        }
        self.field = values;
        Ok(())
    }

    #[inline(always)]
    pub fn value(&self, site: usize) -> f64 {
        self.field[site]
    }

    #[inline(always)]
    pub fn set_value(&mut self, site: usize, value: f64) {
        self.field[site] = value;
    }

    /// Random per-node initialization, nodes in id order. Empties the demon.
    pub fn hot_start(&mut self) {
        for v in self.field.iter_mut() {
            *v = self.model.hot_value(&mut self.rng);
        }
        self.demon = 0.0;
    }

    pub fn cold_start(&mut self) {
        let v = self.model.cold_value();
        self.field.iter_mut().for_each(|x| *x = v);
        self.demon = 0.0;
    }

    pub fn demon(&self) -> f64 {
        self.demon
    }

    /// S / V for the current field.
    pub fn action(&self) -> f64 {
        self.model.action(self.graph, &self.field)
    }

    /// Σ w_i φ_i / V.
    pub fn magnetization(&self) -> f64 {
        let m: f64 = self
            .field
            .iter()
            .enumerate()
            .map(|(s, v)| v * self.graph.node_weight(s))
            .sum();
        m / self.graph.volume()
    }

    /// One Metropolis trial at every node, visited in id order.
    /// Returns the acceptance fraction.
    pub fn metropolis_sweep(&mut self) -> f64 {
        let n = self.graph.n();
        if n == 0 {
            return 0.0;
        }
        let mut accept = 0usize;
        for s in 0..n {
            let old = self.field[s];
            let new = self.model.propose(old, &mut self.rng);
            let delta_s = self.model.delta_action(self.graph, &self.field, s, old, new);

            if delta_s <= 0.0 || self.rng.uniform01() < (-delta_s).exp() {
                self.field[s] = new;
                accept += 1;
            }
        }
        accept as f64 / n as f64
    }

    /// One overrelaxation pass over the nodes in id order (M. Creutz,
    /// PRD 36, 515 (1987) demon). A move that raises the action by ΔS is
    /// accepted only if the demon can pay for it; a move that lowers it
    /// hands the energy to the demon, so action + demon is conserved.
    ///
    /// Draws nothing. Returns the acceptance fraction, 0 for models without
    /// an overrelaxation move.
    pub fn overrelax(&mut self) -> f64 {
        let n = self.graph.n();
        if n == 0 {
            return 0.0;
        }
        let mut accept = 0usize;
        for s in 0..n {
            let Some(new) = self.model.overrelax_value(self.graph, &self.field, s) else {
                continue;
            };
            let old = self.field[s];
            let delta_s = self.model.delta_action(self.graph, &self.field, s, old, new);

            if delta_s <= self.demon {
                self.demon -= delta_s;
                self.field[s] = new;
                accept += 1;
            }
        }
        accept as f64 / n as f64
    }

    /// Returns the size of the flipped cluster.
    pub fn wolff_update(&mut self) -> usize {
        self.workspace.wolff(self.graph, &mut self.field, &self.model, &mut self.rng)
    }

    /// Returns the number of clusters formed.
    pub fn swendsen_wang_update(&mut self) -> usize {
        self.workspace.swendsen_wang(self.graph, &mut self.field, &self.model, &mut self.rng)
    }

    pub fn last_cluster(&self) -> &[usize] {
        self.workspace.last_cluster()
    }

    pub fn sw_cluster_labels(&self) -> &[usize] {
        self.workspace.labels()
    }

    /// Members of every cluster of the most recent Swendsen-Wang update.
    pub fn sw_clusters(&self) -> &[Vec<usize>] {
        self.workspace.clusters()
    }
}
