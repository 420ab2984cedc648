//! Geometry generators. Each one builds a plain `WeightedGraph`; nothing
//! downstream knows which generator produced it.

use crate::error::Result;
use crate::graph::WeightedGraph;
use rand::Rng;
use std::ops::Range;

/// Ring of `n` unit-weight nodes, every link with coupling `weight`.
pub fn cycle(n: usize, weight: f64) -> Result<WeightedGraph> {
    let mut g = WeightedGraph::with_nodes(n, 1.0)?;
    if n < 2 {
        return Ok(g);
    }
    // n == 2 would double the single link
    let links = if n == 2 { 1 } else { n };
    for i in 0..links {
        g.add_edge(i, (i + 1) % n, weight)?;
    }
    Ok(g)
}

/// Periodic `nx` × `ny` rectangle, site `s = x + nx * y`.
///
/// `k1` couples neighbors along x and `k2` along y. For the anisotropic
/// critical Ising model use `k1 = asinh(1 / r) / 2`, `k2 = asinh(r) / 2`.
pub fn rectangle(nx: usize, ny: usize, k1: f64, k2: f64) -> Result<WeightedGraph> {
    let mut g = WeightedGraph::with_nodes(nx * ny, 1.0)?;
    for y in 0..ny {
        for x in 0..nx {
            let s = x + nx * y;
            if nx > 2 || (nx == 2 && x == 0) {
                g.add_edge(s, (x + 1) % nx + nx * y, k1)?;
            }
            if ny > 2 || (ny == 2 && y == 0) {
                g.add_edge(s, x + nx * ((y + 1) % ny), k2)?;
            }
        }
    }
    Ok(g)
}

/// Complete graph on `n` nodes with couplings drawn uniformly from `range`,
/// using a caller-supplied RNG (preferred for reproducibility).
pub fn complete_random(rng: &mut impl Rng, n: usize, range: Range<f64>) -> Result<WeightedGraph> {
    let mut g = WeightedGraph::with_nodes(n, 1.0)?;
    for i in 0..n {
        for j in (i + 1)..n {
            let weight = rng.gen_range(range.clone());
            g.add_edge(i, j, weight)?;
        }
    }
    Ok(g)
}
