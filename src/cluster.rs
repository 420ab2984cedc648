// cluster.rs - Wolff and Swendsen-Wang cluster updates over a WeightedGraph

use crate::graph::WeightedGraph;
use crate::model::FieldModel;
use crate::union_find::UnionFind;
use crate::utils::rng::RandomStream;

const UNLABELED: usize = usize::MAX;

/// Scratch buffers reused across cluster updates of one simulation context.
#[derive(Debug, Clone, Default)]
pub struct ClusterWorkspace {
    is_clustered: Vec<bool>,
    stack: Vec<usize>,
    cluster: Vec<usize>,
    forest: UnionFind,
    root_label: Vec<usize>,
    labels: Vec<usize>,
    flipped: Vec<bool>,
    members: Vec<Vec<usize>>,
    n_clusters: usize,
}

/// Draws the bond test for one link; `true` means the bond is activated.
///
/// No draw is consumed when the rate is non-negative.
#[inline(always)]
fn activate(rate: f64, rng: &mut RandomStream) -> bool {
    !(rate >= 0.0 || rng.uniform01() < rate.exp())
}

impl ClusterWorkspace {
    pub fn new(n: usize) -> Self {
        Self {
            is_clustered: vec![false; n],
            stack: Vec::with_capacity(n),
            cluster: Vec::with_capacity(n),
            forest: UnionFind::new(n),
            root_label: vec![UNLABELED; n],
            labels: vec![0; n],
            flipped: Vec::new(),
            members: Vec::new(),
            n_clusters: 0,
        }
    }

    /// Members of the most recent Wolff cluster.
    pub fn last_cluster(&self) -> &[usize] {
        &self.cluster
    }

    /// Cluster label of every node after the most recent Swendsen-Wang
    /// update, numbered by first appearance.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Member lists of the most recent Swendsen-Wang clusters, indexed by
    /// label; members appear in increasing node id.
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.members[..self.n_clusters]
    }

    /// Single-cluster update (U. Wolff, PRL 62, 361 (1989)).
    ///
    /// Draws: one integer for the seed, then one uniform per tested bond
    /// with negative rate. Returns the cluster size, or 0 on an empty graph.
    pub fn wolff<M: FieldModel + ?Sized>(
        &mut self,
        graph: &WeightedGraph,
        field: &mut [f64],
        model: &M,
        rng: &mut RandomStream,
    ) -> usize {
        let n = graph.n();
        self.cluster.clear();
        self.stack.clear();
        if n == 0 {
            return 0;
        }
        self.is_clustered.clear();
        self.is_clustered.resize(n, false);

        let seed = rng.uniform_int(0, n - 1);
        self.cluster.push(seed);
        self.is_clustered[seed] = true;
        self.stack.push(seed);

        while let Some(s) = self.stack.pop() {
            // flip first; bond tests use the value held before the flip
            let value = field[s];
            field[s] = -value;

            for &(l, nb) in graph.neighbors(s) {
                if self.is_clustered[nb] {
                    continue;
                }
                let rate = model.bond_rate(value, field[nb], graph.edge_weight(l));
                if !activate(rate, rng) {
                    continue;
                }
                self.cluster.push(nb);
                self.is_clustered[nb] = true;
                self.stack.push(nb);
            }
        }

        self.cluster.len()
    }

    /// Multi-cluster update (R.H. Swendsen and J.S. Wang, PRL 58, 86 (1987)).
    ///
    /// Draws: one uniform per link with negative rate, in link order, then one
    /// coin per cluster in order of the cluster's lowest node id. Returns the
    /// number of distinct clusters.
    pub fn swendsen_wang<M: FieldModel + ?Sized>(
        &mut self,
        graph: &WeightedGraph,
        field: &mut [f64],
        model: &M,
        rng: &mut RandomStream,
    ) -> usize {
        let n = graph.n();
        self.forest.reset(n);

        for link in graph.links() {
            let rate = model.bond_rate(field[link.a], field[link.b], link.weight);
            if activate(rate, rng) {
                self.forest.union(link.a, link.b);
            }
        }

        self.root_label.clear();
        self.root_label.resize(n, UNLABELED);
        self.labels.clear();
        self.labels.resize(n, 0);
        self.flipped.clear();
        self.members.iter_mut().for_each(Vec::clear);

        let mut n_clusters = 0;
        for s in 0..n {
            let r = self.forest.find(s);
            if self.root_label[r] == UNLABELED {
                self.root_label[r] = n_clusters;
                self.flipped.push(rng.bool());
                if self.members.len() == n_clusters {
                    self.members.push(Vec::new());
                }
                n_clusters += 1;
            }
            let c = self.root_label[r];
            self.labels[s] = c;
            self.members[c].push(s);
            if self.flipped[c] {
                field[s] = -field[s];
            }
        }

        self.n_clusters = n_clusters;
        n_clusters
    }
}
