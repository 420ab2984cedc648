// correlator.rs - Fourier-transformed two-point function on a periodic rectangle

use crate::error::Result;
use crate::statistics::{Accumulator, Summary};
use std::f64::consts::PI;

/// Shape of the measured correlator: an `nx × ny` rectangle with node ids
/// `x + nx·y` (as built by `lattice::rectangle`) and momenta `0..=k_max`
/// along x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelatorShape {
    pub nx: usize,
    pub ny: usize,
    pub k_max: usize,
}

/// G(k, |dy|) = Σ_{a,b} cos(2πk dx/nx) ⟨s_a s_b⟩ / V², binned by |dy|.
///
/// Separations wrap to `[-n/2, n/2]` in both directions. Unordered pairs are
/// summed once and counted twice at |dy| ∈ {0, ny/2}, so every bin collects
/// the same number of ordered pairs.
#[derive(Debug, Clone)]
pub struct FourierCorrelator {
    shape: CorrelatorShape,
    sums: Vec<Vec<f64>>,
    series: Vec<Vec<Accumulator>>,
}

#[inline(always)]
fn wrap(d: i64, n: i64) -> i64 {
    if d < -n / 2 {
        d + n
    } else if d > n / 2 {
        d - n
    } else {
        d
    }
}

impl FourierCorrelator {
    pub fn new(shape: CorrelatorShape) -> Self {
        let n_half = shape.ny / 2 + 1;
        Self {
            shape,
            sums: vec![vec![0.0; n_half]; shape.k_max + 1],
            series: vec![vec![Accumulator::new(); n_half]; shape.k_max + 1],
        }
    }

    pub fn shape(&self) -> CorrelatorShape {
        self.shape
    }

    /// Number of |dy| bins, `ny/2 + 1`.
    pub fn n_half(&self) -> usize {
        self.shape.ny / 2 + 1
    }

    /// Sums of the most recent measurement, `[k][|dy|]`, before the 1/V²
    /// normalization.
    pub fn sums(&self) -> &[Vec<f64>] {
        &self.sums
    }

    pub fn series(&self, k: usize, dy: usize) -> &Accumulator {
        &self.series[k][dy]
    }

    fn add_pair(&mut self, s1: usize, s2: usize, weight: f64) {
        let (nx, ny) = (self.shape.nx as i64, self.shape.ny as i64);
        let (x1, y1) = (s1 as i64 % nx, s1 as i64 / nx);
        let (x2, y2) = (s2 as i64 % nx, s2 as i64 / nx);
        let dx = wrap(x2 - x1, nx);
        let ady = wrap(y2 - y1, ny).abs();

        let y_inc = if ady == 0 || ady == ny / 2 { 2.0 } else { 1.0 };
        let theta = 2.0 * PI * dx as f64 / nx as f64;
        for (k, row) in self.sums.iter_mut().enumerate() {
            row[ady as usize] += weight * y_inc * (k as f64 * theta).cos();
        }
    }

    fn reset_sums(&mut self) {
        self.sums.iter_mut().for_each(|row| row.fill(0.0));
    }

    /// Cluster-improved sums: ⟨s_a s_b⟩ is 1 within a Swendsen-Wang
    /// cluster and averages to 0 across clusters.
    pub fn cluster_sums(&mut self, clusters: &[Vec<usize>]) -> &[Vec<f64>] {
        self.reset_sums();
        for members in clusters {
            for (i1, &s1) in members.iter().enumerate() {
                self.sums.iter_mut().for_each(|row| row[0] += 1.0);
                for &s2 in &members[i1 + 1..] {
                    self.add_pair(s1, s2, 1.0);
                }
            }
        }
        &self.sums
    }

    /// Plain sums with s_a s_b taken from the field.
    pub fn field_sums(&mut self, field: &[f64]) -> &[Vec<f64>] {
        self.reset_sums();
        for (s1, &v1) in field.iter().enumerate() {
            let diag = v1 * v1;
            self.sums.iter_mut().for_each(|row| row[0] += diag);
            for (s2, &v2) in field.iter().enumerate().skip(s1 + 1) {
                self.add_pair(s1, s2, v1 * v2);
            }
        }
        &self.sums
    }

    /// Records the cluster-improved estimate of one configuration.
    pub fn measure(&mut self, clusters: &[Vec<usize>]) {
        self.cluster_sums(clusters);
        let vol = (self.shape.nx * self.shape.ny) as f64;
        let vol_sq = vol * vol;
        for (sums, series) in self.sums.iter().zip(self.series.iter_mut()) {
            for (&x, acc) in sums.iter().zip(series.iter_mut()) {
                acc.record(x / vol_sq);
            }
        }
    }

    /// One row per `(k, |dy|)`, named `fourier_2pt_<k>_<dy>`.
    pub fn summaries(&self) -> Result<Vec<Summary>> {
        let mut rows = Vec::with_capacity(self.series.len() * self.n_half());
        for (k, series) in self.series.iter().enumerate() {
            for (dy, acc) in series.iter().enumerate() {
                rows.push(acc.summary(&format!("fourier_2pt_{k}_{dy}"))?);
            }
        }
        Ok(rows)
    }
}
