//! Bed backfill precedence when a patient leaves the department

use ed_simulator_core::{
    Bucket, PatientId, PatientLocation, ScriptedVariates, Simulation, SimulationConfig, Zone,
};

fn inv(x: f64) -> f64 {
    let u = 1.0 - (-x).exp();
    assert!(u < 1.0, "inv({}) rounds to 1.0", x);
    u
}

/// One bed per zone, plenty of doctors, 1-minute mean gaps and workups
fn tight_beds_config() -> SimulationConfig {
    let mut config = SimulationConfig {
        horizon_minutes: 1_000.0,
        doctors: 5,
        zone_beds: [1, 1, 1, 1],
        ..Default::default()
    };
    config.arrivals.rate_per_hour = 60.0;
    config.service.workup_rate_per_hour = [60.0; 5];
    config
}

fn run_steps(draws: Vec<f64>, steps: usize) -> Simulation<ScriptedVariates> {
    let mut sim =
        Simulation::with_variates(tight_beds_config(), ScriptedVariates::new(draws)).unwrap();
    for _ in 0..steps {
        sim.step().unwrap();
        sim.verify_invariants().unwrap();
    }
    assert_eq!(sim.variates().remaining(), 0);
    sim
}

#[test]
fn test_zone_three_bed_serves_class_two_before_class_345() {
    let draws = vec![
        inv(1.0), 0.1, 0.6, inv(4.5), // t=0: class 3 → zone 3, done at 4.5
        inv(1.0), 0.1, 0.6, inv(30.0), // t=1: class 3 → zone 4
        inv(1.0), 0.1, 0.3, inv(30.0), // t=2: class 2 → zone 2
        inv(1.0), 0.1, 0.3, // t=3: class 2, zones 2-4 full → bed wait
        inv(30.0), 0.1, 0.9, // t=4: class 4, zones 3-4 full → bed wait
        0.9,        // t=4.5: no referral, class 3 leaves
        inv(25.0),  // backfilled class 2 starts workup
    ];
    let sim = run_steps(draws, 6);

    let backfilled = sim.state().patient(PatientId(4)).unwrap();
    assert_eq!(backfilled.zone(), Some(Zone::Three));
    assert_eq!(backfilled.location(), PatientLocation::InWorkup);

    assert_eq!(
        sim.state().patient(PatientId(5)).unwrap().location(),
        PatientLocation::BedQueue(Bucket::Class345)
    );
    assert_eq!(sim.state().queues().bed.len(Bucket::Class2), 0);
    assert_eq!(sim.stats().departed(), 1);
    assert_eq!(sim.state().beds().occupied(Zone::Three), 1);
}

#[test]
fn test_bed_wait_is_first_come_first_served() {
    let draws = vec![
        inv(1.0), 0.1, 0.6, inv(4.5), // t=0: class 3 → zone 3
        inv(1.0), 0.1, 0.6, inv(30.0), // t=1: class 3 → zone 4
        inv(1.0), 0.1, 0.9, // t=2: class 4 waits
        inv(30.0), 0.1, 0.6, // t=3: class 3 waits behind it
        0.9,       // t=4.5: class 3 leaves zone 3
        inv(25.0), // the class 4 that waited longest moves in
    ];
    let sim = run_steps(draws, 5);

    assert_eq!(
        sim.state().patient(PatientId(3)).unwrap().zone(),
        Some(Zone::Three)
    );
    assert_eq!(
        sim.state().patient(PatientId(4)).unwrap().location(),
        PatientLocation::BedQueue(Bucket::Class345)
    );
}

#[test]
fn test_interrupted_patient_keeps_its_bed() {
    let config = SimulationConfig {
        doctors: 2,
        ..tight_beds_config()
    };
    let draws = vec![
        inv(1.0), 0.1, 0.6, inv(4.5), // t=0: class 3 → zone 3, doctor 1
        inv(1.0), 0.1, 0.6, inv(30.0), // t=1: class 3 → zone 4, doctor 2
        inv(1.0), 0.1, 0.3, inv(30.0), // t=2: class 2 → zone 2, preempts zone 3 patient
        inv(30.0), 0.1, 0.9, // t=3: class 4 waits for a bed
    ];
    let mut sim = Simulation::with_variates(config, ScriptedVariates::new(draws)).unwrap();
    for _ in 0..4 {
        sim.step().unwrap();
        sim.verify_invariants().unwrap();
    }

    // The preempted class 3 still holds its zone 3 bed while interrupted
    let interrupted = sim.state().patient(PatientId(1)).unwrap();
    assert_eq!(
        interrupted.location(),
        PatientLocation::Interrupted(Bucket::Class345)
    );
    assert_eq!(interrupted.zone(), Some(Zone::Three));
    assert_eq!(
        sim.state().patient(PatientId(4)).unwrap().location(),
        PatientLocation::BedQueue(Bucket::Class345)
    );
}
