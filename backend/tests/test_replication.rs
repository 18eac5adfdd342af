//! Seeded batches of independent replications

use ed_simulator_core::orchestrator::{replication_seeds, run_replication_batch};
use ed_simulator_core::{
    fingerprint, run_replication, run_replications, AveragedResult, SimulationConfig,
    SimulationError,
};

fn config() -> SimulationConfig {
    SimulationConfig {
        horizon_minutes: 480.0,
        rng_seed: 31337,
        ..Default::default()
    }
}

#[test]
fn test_zero_replications_is_invalid() {
    assert!(matches!(
        run_replications(&config(), 0),
        Err(SimulationError::InvalidConfig(_))
    ));
}

#[test]
fn test_batch_uses_derived_seeds() {
    let cfg = config();
    let seeds = replication_seeds(cfg.rng_seed, 3);
    let batch = run_replication_batch(&cfg, 3).unwrap();

    for (seed, result) in seeds.iter().zip(&batch) {
        let single = run_replication(&SimulationConfig {
            rng_seed: *seed,
            ..cfg.clone()
        })
        .unwrap();
        assert_eq!(&single, result);
    }
}

#[test]
fn test_average_matches_batch() {
    let cfg = config();
    let batch = run_replication_batch(&cfg, 4).unwrap();
    let averaged = run_replications(&cfg, 4).unwrap();

    assert_eq!(averaged, AveragedResult::average(&batch).unwrap());
    assert_eq!(averaged.replications, 4);

    let mean_admitted =
        batch.iter().map(|r| r.patients_admitted as f64).sum::<f64>() / 4.0;
    assert!((averaged.patients_admitted - mean_admitted).abs() < 1e-9);
}

#[test]
fn test_batches_are_reproducible() {
    let a = run_replications(&config(), 3).unwrap();
    let b = run_replications(&config(), 3).unwrap();
    assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
}

#[test]
fn test_invalid_config_rejected_before_running() {
    let cfg = SimulationConfig {
        specialists: 0,
        ..config()
    };
    assert!(matches!(
        run_replications(&cfg, 2),
        Err(SimulationError::InvalidConfig(_))
    ));
}
