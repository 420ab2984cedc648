//! φ⁴ overrelaxation with an energy demon.

use wolffgraph::run::{run_chain, RunConfig};
use wolffgraph::{lattice, Ising, Phi4, RandomStream, Simulation};

#[test]
fn test_action_plus_demon_is_conserved() {
    let g = lattice::rectangle(4, 4, 1.0, 1.0).unwrap();
    let vol = g.volume();
    let mut sim = Simulation::new(&g, Phi4::new(-1.27, 0.25), RandomStream::new(17)).unwrap();
    sim.hot_start();
    assert_eq!(sim.demon(), 0.0);

    let total = |sim: &Simulation<'_, Phi4>| sim.action() * vol + sim.demon();
    let mut accepted = 0.0;
    for _ in 0..50 {
        let before = total(&sim);
        let acc = sim.overrelax();
        assert!((0.0..=1.0).contains(&acc));
        accepted += acc;

        assert!((total(&sim) - before).abs() < 1e-9, "energy leaked");
        assert!(sim.demon() >= 0.0);
    }
    assert!(accepted > 0.0, "no overrelaxation move was ever accepted");
}

#[test]
fn test_overrelaxation_draws_nothing() {
    let g = lattice::rectangle(3, 3, 1.0, 1.0).unwrap();
    let mut a = Simulation::new(&g, Phi4::new(-1.0, 0.2), RandomStream::new(4)).unwrap();
    let mut b = Simulation::new(&g, Phi4::new(-1.0, 0.2), RandomStream::new(4)).unwrap();
    a.hot_start();
    b.hot_start();

    for _ in 0..10 {
        a.overrelax();
    }
    a.hot_start();
    b.hot_start();
    assert_eq!(a.field(), b.field());
    assert_eq!(a.demon(), 0.0);
}

#[test]
fn test_ising_has_no_overrelaxation_move() {
    let g = lattice::cycle(6, 1.0).unwrap();
    let mut sim = Simulation::new(&g, Ising::new(0.5), RandomStream::new(2)).unwrap();
    sim.hot_start();
    let before = sim.field().to_vec();

    assert_eq!(sim.overrelax(), 0.0);
    assert_eq!(sim.field(), &before[..]);
    assert_eq!(sim.demon(), 0.0);
}

#[test]
fn test_counterterm_length_is_checked() {
    let g = lattice::rectangle(3, 3, 1.0, 1.0).unwrap();
    let model = Phi4::new(-1.0, 0.2).with_counterterms(vec![0.0; 4]);
    assert!(Simulation::new(&g, model, RandomStream::new(1)).is_err());

    let model = Phi4::new(-1.0, 0.2).with_counterterms(vec![0.0; 9]);
    assert!(Simulation::new(&g, model, RandomStream::new(1)).is_ok());
}

#[test]
fn test_run_chain_records_demon_series() {
    let g = lattice::rectangle(5, 5, 1.0, 1.0).unwrap();
    let cfg = RunConfig {
        n_therm: 50,
        n_traj: 400,
        n_skip: 4,
        n_wolff: 2,
        n_metropolis: 2,
        n_overrelax: 1,
        ..RunConfig::default()
    };
    let mut sim = Simulation::new(&g, Phi4::new(-1.27, 0.25), RandomStream::new(6)).unwrap();
    let meas = run_chain(&mut sim, &cfg, None);

    assert_eq!(meas.accept_overrelax.len(), cfg.n_traj);
    assert_eq!(meas.demon.len(), cfg.n_traj / cfg.n_skip);
    assert!(meas.demon.samples().iter().all(|&d| d >= 0.0));

    let rows = meas.summaries().unwrap();
    for expected in ["accept_overrelax", "demon"] {
        assert!(rows.iter().any(|r| r.name == expected), "missing {expected}");
    }
}
