// run.rs - thermalize / measure loop shared by the driver and tests

use crate::correlator::{CorrelatorShape, FourierCorrelator};
use crate::error::Result;
use crate::model::FieldModel;
use crate::simulation::Simulation;
use crate::statistics::{self, Accumulator, Summary};
use indicatif::ProgressBar;

/// Run-time configuration (single source of truth).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub n_therm: usize,
    pub n_traj: usize,
    /// Measure every `n_skip` trajectories after thermalization.
    pub n_skip: usize,
    pub n_wolff: usize,
    pub n_metropolis: usize,
    /// Overrelaxation passes per trajectory; no-ops for models without a
    /// microcanonical move.
    pub n_overrelax: usize,
    /// One Swendsen-Wang update before each measurement.
    pub swendsen_wang: bool,
    /// Cluster-improved two-point function on a periodic rectangle.
    /// Implies a Swendsen-Wang update before each measurement.
    pub correlator: Option<CorrelatorShape>,
    pub hot_start: bool,
    /// Redraw Wolff updates seeded on a node with no links.
    pub skip_isolated_seeds: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_therm: 2000,
            n_traj: 50_000,
            n_skip: 20,
            n_wolff: 3,
            n_metropolis: 5,
            n_overrelax: 0,
            swendsen_wang: false,
            correlator: None,
            hot_start: true,
            skip_isolated_seeds: false,
        }
    }
}

/// Per-chain observables.
#[derive(Debug, Clone, Default)]
pub struct Measurements {
    pub action: Accumulator,
    pub mag_abs: Accumulator,
    pub mag2: Accumulator,
    pub mag4: Accumulator,
    /// Σ Wolff cluster sizes per trajectory / number of nodes.
    pub cluster_size: Accumulator,
    /// Σ acceptance fractions over the sweeps of one trajectory.
    pub accept_metropolis: Accumulator,
    /// Σ acceptance fractions over the overrelaxation passes of one trajectory.
    pub accept_overrelax: Accumulator,
    pub demon: Accumulator,
    pub sw_clusters: Accumulator,
    pub fourier_2pt: Option<FourierCorrelator>,
}

impl Measurements {
    /// Summary rows for every recorded series plus U4 and χ.
    pub fn summaries(&self) -> Result<Vec<Summary>> {
        let mut rows = vec![
            self.cluster_size.summary("cluster_size/V")?,
            self.accept_metropolis.summary("accept_metro")?,
            self.action.summary("action")?,
            self.mag_abs.summary("|m|")?,
            self.mag2.summary("m^2")?,
            self.mag4.summary("m^4")?,
        ];
        if !self.accept_overrelax.is_empty() {
            rows.push(self.accept_overrelax.summary("accept_overrelax")?);
            rows.push(self.demon.summary("demon")?);
        }
        if !self.sw_clusters.is_empty() {
            rows.push(self.sw_clusters.summary("sw_clusters")?);
        }

        let n = self.mag2.len();
        let u4 = statistics::binder_cumulant(self.mag2.samples(), self.mag4.samples())?;
        let u4_jk = statistics::jackknife_binder_cumulant(self.mag2.samples(), self.mag4.samples())?;
        rows.push(Summary::derived("U4", u4_jk, u4, n));

        let chi = statistics::susceptibility(self.mag2.samples(), self.mag_abs.samples())?;
        let chi_jk = statistics::jackknife_susceptibility(self.mag2.samples(), self.mag_abs.samples())?;
        rows.push(Summary::derived("m_susc", chi_jk, chi, n));

        if let Some(corr) = &self.fourier_2pt {
            rows.extend(corr.summaries()?);
        }
        Ok(rows)
    }
}

fn wolff_sweeps<M: FieldModel>(sim: &mut Simulation<'_, M>, cfg: &RunConfig) -> usize {
    let graph = sim.graph();
    let skip = cfg.skip_isolated_seeds && graph.connected_nodes() > 0;
    let mut sum = 0;
    let mut done = 0;
    while done < cfg.n_wolff {
        let size = sim.wolff_update();
        if skip && size == 1 && graph.degree(sim.last_cluster()[0]) == 0 {
            continue;
        }
        sum += size;
        done += 1;
    }
    sum
}

/// Thermalize, then run `n_traj` trajectories and record observables.
pub fn run_chain<M: FieldModel>(
    sim: &mut Simulation<'_, M>,
    cfg: &RunConfig,
    bar: Option<&ProgressBar>,
) -> Measurements {
    if cfg.hot_start {
        sim.hot_start();
    } else {
        sim.cold_start();
    }

    let norm = sim.graph().n().max(1) as f64;
    let mut meas = Measurements {
        fourier_2pt: cfg.correlator.map(FourierCorrelator::new),
        ..Measurements::default()
    };

    for n in 0..(cfg.n_therm + cfg.n_traj) {
        let cluster_sum = wolff_sweeps(sim, cfg);
        let accept_sum: f64 = (0..cfg.n_metropolis).map(|_| sim.metropolis_sweep()).sum();
        let overrelax_sum: f64 = (0..cfg.n_overrelax).map(|_| sim.overrelax()).sum();

        if let Some(bar) = bar {
            bar.inc(1);
        }
        if n < cfg.n_therm {
            continue;
        }
        meas.cluster_size.record(cluster_sum as f64 / norm);
        meas.accept_metropolis.record(accept_sum);
        if cfg.n_overrelax > 0 {
            meas.accept_overrelax.record(overrelax_sum);
        }

        if (n - cfg.n_therm) % cfg.n_skip.max(1) != 0 {
            continue;
        }
        if cfg.n_overrelax > 0 {
            meas.demon.record(sim.demon());
        }
        if cfg.swendsen_wang || cfg.correlator.is_some() {
            meas.sw_clusters.record(sim.swendsen_wang_update() as f64);
        }
        if let Some(corr) = meas.fourier_2pt.as_mut() {
            corr.measure(sim.sw_clusters());
        }

        let m = sim.magnetization();
        let m2 = m * m;
        meas.action.record(sim.action());
        meas.mag_abs.record(m.abs());
        meas.mag2.record(m2);
        meas.mag4.record(m2 * m2);
    }

    meas
}
