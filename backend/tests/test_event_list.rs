//! Tests for the future event list

use ed_simulator_core::{Event, EventKind, FutureEventList, PatientId, SimTime, SimulationError};

fn at(minutes: f64, kind: EventKind) -> Event {
    Event::new(SimTime::new(minutes).unwrap(), kind)
}

#[test]
fn test_pops_in_time_order_and_advances_clock() {
    let mut fel = FutureEventList::new();
    fel.schedule(at(5.0, EventKind::WorkupDeparture(PatientId(1))))
        .unwrap();
    fel.schedule(at(1.0, EventKind::Arrival)).unwrap();
    fel.schedule(at(3.0, EventKind::TriageDeparture(PatientId(2))))
        .unwrap();

    let mut seen = Vec::new();
    while let Some(event) = fel.pop_earliest().unwrap() {
        assert_eq!(fel.now(), event.time());
        seen.push(event.time().minutes());
    }
    assert_eq!(seen, vec![1.0, 3.0, 5.0]);
    assert!(fel.is_empty());
}

#[test]
fn test_ties_pop_in_insertion_order() {
    let mut fel = FutureEventList::new();
    for id in 1..=4 {
        fel.schedule(at(2.0, EventKind::SpecialistDeparture(PatientId(id))))
            .unwrap();
    }

    let order: Vec<PatientId> = std::iter::from_fn(|| fel.pop_earliest().unwrap())
        .filter_map(|e| e.patient())
        .collect();
    assert_eq!(
        order,
        vec![PatientId(1), PatientId(2), PatientId(3), PatientId(4)]
    );
}

#[test]
fn test_scheduling_into_the_past_fails() {
    let mut fel = FutureEventList::new();
    fel.schedule(at(10.0, EventKind::Arrival)).unwrap();
    fel.pop_earliest().unwrap();

    let err = fel.schedule(at(9.0, EventKind::Arrival)).unwrap_err();
    assert!(matches!(err, SimulationError::InvariantViolation(_)));

    // At the current instant is fine
    fel.schedule(at(10.0, EventKind::Arrival)).unwrap();
}

#[test]
fn test_find_and_remove_takes_earliest_match_without_moving_clock() {
    let mut fel = FutureEventList::new();
    fel.schedule(at(8.0, EventKind::WorkupDeparture(PatientId(1))))
        .unwrap();
    fel.schedule(at(4.0, EventKind::WorkupDeparture(PatientId(2))))
        .unwrap();
    fel.schedule(at(2.0, EventKind::Arrival)).unwrap();

    let removed = fel
        .find_and_remove(|e| e.is_workup_departure())
        .unwrap();
    assert_eq!(removed.patient(), Some(PatientId(2)));
    assert_eq!(fel.len(), 2);
    assert_eq!(fel.now(), SimTime::ZERO);

    assert!(fel
        .find_and_remove(|e| e.patient() == Some(PatientId(99)))
        .is_none());
    assert_eq!(fel.len(), 2);
}

#[test]
fn test_peek_does_not_remove() {
    let mut fel = FutureEventList::new();
    assert!(fel.peek().is_none());
    fel.schedule(at(1.0, EventKind::Arrival)).unwrap();
    assert_eq!(fel.peek().map(|e| e.kind()), Some(EventKind::Arrival));
    assert_eq!(fel.len(), 1);
}

#[test]
fn test_empty_list_pops_none() {
    let mut fel = FutureEventList::new();
    assert!(fel.pop_earliest().unwrap().is_none());
}
