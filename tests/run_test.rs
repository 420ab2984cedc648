use wolffgraph::run::{run_chain, RunConfig};
use wolffgraph::{lattice, Ising, Phi4, RandomStream, Simulation, WeightedGraph};

fn small_config() -> RunConfig {
    RunConfig {
        n_therm: 100,
        n_traj: 1000,
        n_skip: 10,
        n_wolff: 2,
        n_metropolis: 1,
        n_overrelax: 0,
        swendsen_wang: true,
        correlator: None,
        hot_start: true,
        skip_isolated_seeds: false,
    }
}

#[test]
fn test_run_chain_records_every_series() {
    let g = lattice::rectangle(6, 6, 0.44, 0.44).unwrap();
    let mut sim = Simulation::new(&g, Ising::new(1.0), RandomStream::new(42)).unwrap();
    let cfg = small_config();
    let meas = run_chain(&mut sim, &cfg, None);

    assert_eq!(meas.cluster_size.len(), cfg.n_traj);
    assert_eq!(meas.accept_metropolis.len(), cfg.n_traj);
    assert_eq!(meas.mag2.len(), cfg.n_traj / cfg.n_skip);
    assert_eq!(meas.sw_clusters.len(), cfg.n_traj / cfg.n_skip);

    let rows = meas.summaries().unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    for expected in ["action", "|m|", "m^2", "m^4", "U4", "m_susc", "sw_clusters"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    assert!(rows.iter().all(|r| r.value.is_finite() && r.error.is_finite()));
}

#[test]
fn test_ordered_ising_has_binder_near_one() {
    // deep in the ordered phase |m| ≈ 1 and U4 → 1
    let g = lattice::rectangle(6, 6, 1.0, 1.0).unwrap();
    let mut sim = Simulation::new(&g, Ising::new(2.0), RandomStream::new(1)).unwrap();
    let meas = run_chain(&mut sim, &small_config(), None);

    let rows = meas.summaries().unwrap();
    let u4 = rows.iter().find(|r| r.name == "U4").unwrap();
    assert!((u4.value - 1.0).abs() < 1e-3, "U4 = {}", u4.value);
}

#[test]
fn test_identical_runs_are_identical() {
    let g = lattice::rectangle(5, 5, 1.0, 1.0).unwrap();
    let cfg = small_config();
    let mut a = Simulation::new(&g, Phi4::new(-1.0, 0.25), RandomStream::new(5)).unwrap();
    let mut b = Simulation::new(&g, Phi4::new(-1.0, 0.25), RandomStream::new(5)).unwrap();
    let ma = run_chain(&mut a, &cfg, None);
    let mb = run_chain(&mut b, &cfg, None);

    assert_eq!(ma.action.samples(), mb.action.samples());
    assert_eq!(a.field(), b.field());
}

#[test]
fn test_isolated_seeds_can_be_skipped() {
    let mut g = WeightedGraph::with_nodes(8, 1.0).unwrap();
    g.add_edge(0, 1, 1.0).unwrap();
    let mut cfg = small_config();
    cfg.skip_isolated_seeds = true;
    cfg.swendsen_wang = false;

    let mut sim = Simulation::new(&g, Ising::new(0.0), RandomStream::new(3)).unwrap();
    let meas = run_chain(&mut sim, &cfg, None);

    // only nodes 0 and 1 can seed, and at β = 0 clusters are single sites:
    // two updates of size 1 over 8 nodes
    assert!(meas.cluster_size.samples().iter().all(|&c| c == 0.25));
}

#[test]
fn test_cluster_size_is_per_node() {
    let mut g = WeightedGraph::with_nodes(4, 1.0).unwrap();
    g.add_edge(0, 1, 1.0).unwrap();
    let cfg = RunConfig {
        n_therm: 0,
        n_traj: 50,
        n_wolff: 1,
        n_metropolis: 0,
        ..RunConfig::default()
    };

    let mut sim = Simulation::new(&g, Ising::new(0.0), RandomStream::new(8)).unwrap();
    let meas = run_chain(&mut sim, &cfg, None);
    assert!(meas.cluster_size.samples().iter().all(|&c| c == 0.25));
}
