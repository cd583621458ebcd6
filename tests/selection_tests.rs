mod common;

use std::sync::Arc;

use ridership::{
    engine::{SelectionState, UnknownLineError},
    shared::{Granularity, Line},
};

fn state() -> SelectionState {
    SelectionState::new(Arc::new(common::geometry()), Line::Lrt2, Granularity::Year)
}

#[test]
fn starts_on_first_station_test() {
    let state = state();
    assert_eq!(state.selection().line, Line::Lrt2);
    assert_eq!(state.selection().station.as_deref(), Some("Recto Station"));
}

#[test]
fn line_change_resets_station_test() {
    let mut state = state();
    assert!(state.select_station("Pureza Station"));

    let (stations, station) = state.select_line("MRT3", None).unwrap();
    assert_eq!(stations.len(), 3);
    assert_eq!(station.as_deref(), Some("North Avenue Station"));
    assert_eq!(state.selection().line, Line::Mrt3);
    assert_eq!(state.selection().station.as_deref(), Some("North Avenue Station"));
}

#[test]
fn line_change_keeps_requested_member_test() {
    let mut state = state();
    let (_, station) = state.select_line("LRT1", Some("Libertad Station")).unwrap();
    assert_eq!(station.as_deref(), Some("Libertad Station"));
}

#[test]
fn line_change_rejects_foreign_station_test() {
    let mut state = state();
    let (_, station) = state.select_line("LRT1", Some("Recto Station")).unwrap();
    assert_eq!(station.as_deref(), Some("Baclaran Station"));
}

#[test]
fn unknown_line_test() {
    let mut state = state();
    assert_eq!(
        state.select_line("Bus 12", None).unwrap_err(),
        UnknownLineError("Bus 12".into())
    );
    // The current selection is untouched.
    assert_eq!(state.selection().line, Line::Lrt2);
    assert_eq!(state.selection().station.as_deref(), Some("Recto Station"));
}

#[test]
fn select_station_must_be_on_line_test() {
    let mut state = state();
    assert!(!state.select_station("Ayala Station"));
    assert_eq!(state.selection().station.as_deref(), Some("Recto Station"));
    assert!(state.select_station("Legarda Station"));
    assert_eq!(state.selection().station.as_deref(), Some("Legarda Station"));
}

#[test]
fn granularity_test() {
    let mut state = state();
    state.select_granularity(Granularity::Weekday);
    assert_eq!(state.selection().granularity, Granularity::Weekday);
}
