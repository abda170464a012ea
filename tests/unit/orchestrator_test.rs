//! Tests for the sequential batch driver

use std::time::Duration;

use statsync::config::ProjectConfig;
use statsync::core::models::{RefreshMode, RunStatus, UnitOutcome};
use statsync::core::services::Orchestrator;
use statsync::{ConfigError, RefreshError};

use crate::common::mocks::{MockProducer, NeverStop, RecordingPacer, StopAfter, units};

#[test]
fn test_all_units_succeed_in_order() {
    let producer = MockProducer::new();
    let pacer = RecordingPacer::default();
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, Duration::ZERO);

    let run = orchestrator.run(&units(&["A", "B", "C"], RefreshMode::Update)).unwrap();

    assert_eq!(run.status, RunStatus::CompletedAllSuccess);
    assert_eq!(producer.called(), vec!["A", "B", "C"]);
    assert_eq!(run.succeeded(), 3);
    assert!(run.finished_at.is_some());
    assert!(run.is_clean());
}

#[test]
fn test_failure_does_not_stop_batch() {
    let producer = MockProducer::failing(&["B"]);
    let pacer = RecordingPacer::default();
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, Duration::ZERO);

    let run = orchestrator.run(&units(&["A", "B", "C"], RefreshMode::Update)).unwrap();

    assert_eq!(run.status, RunStatus::CompletedPartial);
    assert_eq!(producer.called(), vec!["A", "B", "C"]);
    assert_eq!(run.outcome_of("A"), Some(UnitOutcome::Success));
    assert_eq!(run.outcome_of("B"), Some(UnitOutcome::Failed));
    assert_eq!(run.outcome_of("C"), Some(UnitOutcome::Success));
    assert_eq!(run.successful_units(), vec!["A", "C"]);
    assert!(!run.is_clean());
}

#[test]
fn test_every_unit_failing_still_completes() {
    let producer = MockProducer::failing(&["A", "B"]);
    let pacer = RecordingPacer::default();
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, Duration::ZERO);

    let run = orchestrator.run(&units(&["A", "B"], RefreshMode::Build)).unwrap();

    assert_eq!(run.status, RunStatus::CompletedPartial);
    assert_eq!(run.failed(), 2);
    assert_eq!(run.pending(), 0);
}

#[test]
fn test_empty_unit_list_is_rejected() {
    let producer = MockProducer::new();
    let pacer = RecordingPacer::default();
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, Duration::ZERO);

    let err = orchestrator.run(&[]).unwrap_err();

    assert!(matches!(err, RefreshError::Configuration(ConfigError::EmptyUnitList)));
    assert_eq!(err.exit_code(), 2);
    assert!(producer.called().is_empty());
}

#[test]
fn test_duplicate_unit_is_rejected_before_any_producer_runs() {
    let producer = MockProducer::new();
    let pacer = RecordingPacer::default();
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, Duration::ZERO);

    let err = orchestrator.run(&units(&["A", "B", "A"], RefreshMode::Update)).unwrap_err();

    assert!(matches!(
        err,
        RefreshError::Configuration(ConfigError::DuplicateUnit(ref name)) if name == "A"
    ));
    assert!(producer.called().is_empty());
}

#[test]
fn test_delay_between_units_regardless_of_outcome() {
    let producer = MockProducer::failing(&["A"]);
    let pacer = RecordingPacer::default();
    let delay = Duration::from_secs(60);
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, delay);

    orchestrator.run(&units(&["A", "B", "C"], RefreshMode::Update)).unwrap();

    // Between units only: none before the first or after the last
    assert_eq!(pacer.pauses(), vec![delay, delay]);
}

#[test]
fn test_zero_delay_never_pauses() {
    let producer = MockProducer::new();
    let pacer = RecordingPacer::default();
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, Duration::ZERO);

    orchestrator.run(&units(&["A", "B"], RefreshMode::Update)).unwrap();

    assert!(pacer.pauses().is_empty());
}

#[test]
fn test_single_unit_never_pauses() {
    let producer = MockProducer::new();
    let pacer = RecordingPacer::default();
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, Duration::from_secs(5));

    let run = orchestrator.run(&units(&["minutes"], RefreshMode::Update)).unwrap();

    assert_eq!(run.status, RunStatus::CompletedAllSuccess);
    assert!(pacer.pauses().is_empty());
}

#[test]
fn test_stop_request_between_units() {
    let producer = MockProducer::new();
    let pacer = RecordingPacer::default();
    let stop = StopAfter::new(1);
    let orchestrator = Orchestrator::new(&producer, &pacer, &stop, Duration::ZERO);

    let run = orchestrator.run(&units(&["A", "B", "C"], RefreshMode::Update)).unwrap();

    assert_eq!(run.status, RunStatus::Cancelled);
    assert_eq!(producer.called(), vec!["A"]);
    assert_eq!(run.succeeded(), 1);
    assert_eq!(run.pending(), 2);
    assert!(!run.is_clean());
}

#[test]
fn test_stop_request_skips_the_delay() {
    let producer = MockProducer::new();
    let pacer = RecordingPacer::default();
    let stop = StopAfter::new(1);
    let orchestrator = Orchestrator::new(&producer, &pacer, &stop, Duration::from_secs(60));

    let run = orchestrator.run(&units(&["A", "B", "C"], RefreshMode::Update)).unwrap();

    assert_eq!(run.status, RunStatus::Cancelled);
    assert_eq!(producer.called(), vec!["A"]);
    assert!(pacer.pauses().is_empty());
}

#[test]
fn test_stop_request_during_delay() {
    let producer = MockProducer::new();
    let pacer = RecordingPacer::default();
    let stop = StopAfter::new(2);
    let delay = Duration::from_secs(60);
    let orchestrator = Orchestrator::new(&producer, &pacer, &stop, delay);

    let run = orchestrator.run(&units(&["A", "B", "C"], RefreshMode::Update)).unwrap();

    assert_eq!(run.status, RunStatus::Cancelled);
    assert_eq!(producer.called(), vec!["A"]);
    assert_eq!(pacer.pauses(), vec![delay]);
    assert_eq!(run.pending(), 2);
}

#[test]
fn test_mode_flag_reaches_producer() {
    let producer = MockProducer::new();
    let pacer = RecordingPacer::default();
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, Duration::ZERO);

    let run = orchestrator.run(&units(&["A"], RefreshMode::Build)).unwrap();

    assert_eq!(run.mode, RefreshMode::Build);
    assert_eq!(producer.arguments(), vec![vec!["--build".to_string()]]);
}

#[test]
fn test_full_league_batch_with_failures() {
    let config = ProjectConfig::default_for_season("2025-26");
    let units = config.work_units(RefreshMode::Update);
    let producer = MockProducer::failing(&["Boston Celtics", "Utah Jazz", "funnels"]);
    let pacer = RecordingPacer::default();
    let orchestrator = Orchestrator::new(&producer, &pacer, &NeverStop, config.delay());

    let run = orchestrator.run(&units).unwrap();

    assert_eq!(producer.called().len(), 32);
    assert_eq!(run.succeeded(), 29);
    assert_eq!(run.failed(), 3);
    assert_eq!(pacer.pauses().len(), 31);
    assert_eq!(run.status, RunStatus::CompletedPartial);
}
