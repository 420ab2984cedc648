//! Unit‑test: sanity checks on the Metropolis sweep.

use wolffgraph::{lattice, Ising, Phi4, RandomStream, Simulation};

#[test]
fn test_metropolis_acceptance_rate() {
    // -----------------------------------------------------------
    // Deterministic stream so the test is repeatable.
    // -----------------------------------------------------------
    let g = lattice::rectangle(8, 8, 0.44, 0.44).unwrap();
    let mut sim = Simulation::new(&g, Phi4::new(-1.0, 0.25), RandomStream::new(0xDEADBEEF)).unwrap();
    sim.model.metropolis_z = 0.5;
    sim.hot_start();

    let n_sweeps = 200;
    let mut acc_sum = 0.0;
    for _ in 0..n_sweeps {
        let acc = sim.metropolis_sweep();
        assert!((0.0..=1.0).contains(&acc));
        acc_sum += acc;
    }
    let acc_rate = acc_sum / n_sweeps as f64;

    // For a sensible step width we expect a rate strictly between 0 % and 100 %.
    assert!(
        (0.01..=0.99).contains(&acc_rate),
        "Acceptance rate {acc_rate:.3} is outside plausible range"
    );
}

#[test]
fn test_zero_beta_accepts_every_flip() {
    let g = lattice::cycle(10, 1.0).unwrap();
    let mut sim = Simulation::new(&g, Ising::new(0.0), RandomStream::new(1)).unwrap();
    sim.hot_start();
    let before = sim.field().to_vec();

    assert_eq!(sim.metropolis_sweep(), 1.0);
    for (s, &v) in before.iter().enumerate() {
        assert_eq!(sim.value(s), -v);
    }
}

#[test]
fn test_ordered_state_resists_flips_at_large_beta() {
    let g = lattice::rectangle(6, 6, 1.0, 1.0).unwrap();
    let mut sim = Simulation::new(&g, Ising::new(20.0), RandomStream::new(2)).unwrap();
    sim.cold_start();

    // each flip costs ΔS = 2 β · 4 = 160
    assert_eq!(sim.metropolis_sweep(), 0.0);
    assert!(sim.field().iter().all(|&s| s == 1.0));
    assert!((sim.magnetization() - 1.0).abs() < 1e-12);
}

#[test]
fn test_sweeps_are_reproducible() {
    let g = lattice::rectangle(7, 4, 0.3, 0.5).unwrap();
    let mut a = Simulation::new(&g, Ising::new(0.6), RandomStream::new(77)).unwrap();
    let mut b = Simulation::new(&g, Ising::new(0.6), RandomStream::new(77)).unwrap();
    a.hot_start();
    b.hot_start();

    let rates_a: Vec<f64> = (0..50).map(|_| a.metropolis_sweep()).collect();
    let rates_b: Vec<f64> = (0..50).map(|_| b.metropolis_sweep()).collect();
    assert_eq!(rates_a, rates_b);
    assert_eq!(a.field(), b.field());
}

#[test]
fn test_cold_start_action() {
    let g = lattice::rectangle(4, 4, 1.0, 1.0).unwrap();
    let sim = Simulation::new(&g, Ising::new(0.5), RandomStream::new(0)).unwrap();

    // 32 links, all aligned: S = -β · 32 / 16
    assert!((sim.action() + 1.0).abs() < 1e-12);
}
