// graph.rs - fixed-topology weighted graph shared by every update algorithm

use crate::error::{Error, Result};

/// A vertex: statistical weight plus its incident links.
#[derive(Debug, Clone)]
struct Node {
    weight: f64,
    /// `(link id, neighbor id)` for every incident link, in insertion order.
    adjacency: Vec<(usize, usize)>,
}

/// An undirected link with coupling weight J.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

/// Nodes and links of a discretized geometry.
///
/// Geometry generators append nodes and links; after that the graph is only
/// read, so one instance can back any number of simulations.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    volume: f64,
}

fn check_weight(weight: f64) -> Result<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidWeight { weight })
    }
}

impl WeightedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// `n` isolated nodes of weight `weight`.
    pub fn with_nodes(n: usize, weight: f64) -> Result<Self> {
        check_weight(weight)?;
        let mut g = Self {
            nodes: Vec::with_capacity(n),
            links: Vec::new(),
            volume: 0.0,
        };
        for _ in 0..n {
            g.add_node(weight)?;
        }
        Ok(g)
    }

    /// Append a node and return its id.
    pub fn add_node(&mut self, weight: f64) -> Result<usize> {
        check_weight(weight)?;
        self.nodes.push(Node { weight, adjacency: Vec::new() });
        self.volume += weight;
        Ok(self.nodes.len() - 1)
    }

    /// Append the link (a, b) and return its id.
    ///
    /// Everything is validated before the graph is touched, so a failed call
    /// leaves no partial link behind.
    pub fn add_edge(&mut self, a: usize, b: usize, weight: f64) -> Result<usize> {
        let n = self.n();
        if a >= n {
            return Err(Error::NodeOutOfRange { id: a, n });
        }
        if b >= n {
            return Err(Error::NodeOutOfRange { id: b, n });
        }
        if a == b {
            return Err(Error::SelfLoop { node: a });
        }
        check_weight(weight)?;

        let id = self.links.len();
        self.links.push(Link { a, b, weight });
        self.nodes[a].adjacency.push((id, b));
        self.nodes[b].adjacency.push((id, a));
        Ok(id)
    }

    /// Number of nodes.
    #[inline(always)]
    pub fn n(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    #[inline(always)]
    pub fn m(&self) -> usize {
        self.links.len()
    }

    /// V = Σ w_i.
    #[inline(always)]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    #[inline(always)]
    pub fn neighbors(&self, id: usize) -> &[(usize, usize)] {
        &self.nodes[id].adjacency
    }

    #[inline(always)]
    pub fn degree(&self, id: usize) -> usize {
        self.nodes[id].adjacency.len()
    }

    #[inline(always)]
    pub fn edge_weight(&self, link: usize) -> f64 {
        self.links[link].weight
    }

    #[inline(always)]
    pub fn node_weight(&self, id: usize) -> f64 {
        self.nodes[id].weight
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Nodes with at least one link; isolated nodes never join a cluster.
    pub fn connected_nodes(&self) -> usize {
        self.nodes.iter().filter(|s| !s.adjacency.is_empty()).count()
    }

    /// Σ_n J_in f(n) over the neighbors of `id`.
    #[inline(always)]
    pub fn weighted_neighbor_sum(&self, id: usize, field: &[f64]) -> f64 {
        self.nodes[id]
            .adjacency
            .iter()
            .map(|&(l, nb)| self.links[l].weight * field[nb])
            .sum()
    }
}
