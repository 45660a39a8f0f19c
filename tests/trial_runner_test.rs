//! Trial runner behaviour against scripted and seeded bit sources

use lln_sim::bits::{RecordingBitSource, ScriptedBitSource, SeededBitSource};
use lln_sim::{CriticalBand, TrialOutcome, TrialRecord, TrialRunner};

/// Recompute running frequencies from raw flips
#[allow(clippy::cast_precision_loss)]
fn frequencies_from_flips(flips: &[bool]) -> Vec<f64> {
    let mut heads = 0_u32;
    flips
        .iter()
        .enumerate()
        .map(|(i, &bit)| {
            if bit {
                heads += 1;
            }
            f64::from(heads) / (i + 1) as f64
        })
        .collect()
}

fn assert_record_invariants(record: &TrialRecord, runner: &TrialRunner) {
    assert_eq!(record.flip_counts().len(), record.running_frequencies().len());
    for (i, &n) in record.flip_counts().iter().enumerate() {
        assert_eq!(n as usize, i + 1);
    }

    let band = runner.band();
    match record.outcome() {
        TrialOutcome::Critical { flip_count } => {
            assert_eq!(Some(flip_count), record.flip_counts().last().copied());
            assert!(flip_count > runner.threshold());
            assert!(band.contains(*record.running_frequencies().last().unwrap()));
        }
        TrialOutcome::NoCriticalPoint => {
            assert_eq!(record.len(), runner.max_flips() as usize);
        }
    }

    // No earlier flip beyond the threshold may sit inside the band
    let earlier = record.len().saturating_sub(usize::from(record.critical_found()));
    for (&n, &f) in record
        .flip_counts()
        .iter()
        .zip(record.running_frequencies())
        .take(earlier)
    {
        assert!(n <= runner.threshold() || !band.contains(f), "missed stop at flip {n}");
    }
}

#[test]
fn test_alternating_sequence_matches_expected_frequencies() {
    let runner = TrialRunner::new(10, 5);
    let record = runner.run_trial(1, &mut ScriptedBitSource::alternating());

    let expected = [1.0, 0.5, 2.0 / 3.0, 0.5, 0.6, 0.5];
    assert_eq!(record.len(), expected.len());
    for (got, want) in record.running_frequencies().iter().zip(expected) {
        assert!((got - want).abs() < 1e-12, "{got} != {want}");
    }
    assert_eq!(record.critical_flip_count(), Some(6));
}

#[test]
fn test_critical_at_flip_two_when_threshold_below_two() {
    for threshold in [0, 1] {
        let runner = TrialRunner::new(100, threshold);
        let record = runner.run_trial(1, &mut ScriptedBitSource::alternating());
        assert_eq!(record.critical_flip_count(), Some(2));
        assert!(record.critical_found());
    }
}

#[test]
fn test_no_critical_point_is_data_not_error() {
    let runner = TrialRunner::new(40, 20);
    let record = runner.run_trial(7, &mut ScriptedBitSource::new(vec![true, true, false]));

    assert_eq!(record.outcome(), TrialOutcome::NoCriticalPoint);
    assert_eq!(record.critical_flip_count(), None);
    assert_eq!(record.len(), 40);
    assert_record_invariants(&record, &runner);
}

#[test]
fn test_running_frequencies_match_raw_flips() {
    let runner = TrialRunner::new(1000, 20);
    let mut source = RecordingBitSource::new(SeededBitSource::from_seed(2024));

    for trial_index in 1..=20 {
        let record = runner.run_trial(trial_index, &mut source);
        let flips = source.take_history();

        assert_eq!(flips.len(), record.len());
        let expected = frequencies_from_flips(&flips);
        assert_eq!(record.running_frequencies(), expected.as_slice());
        assert_record_invariants(&record, &runner);
    }
}

#[test]
fn test_wide_band_stops_right_after_threshold() {
    let band = CriticalBand::new(0.0, 1.0).unwrap();
    let runner = TrialRunner::new(100, 10).with_band(band);
    // H, T, T repeating: strictly inside (0, 1) from flip 2 on
    let record = runner.run_trial(1, &mut ScriptedBitSource::new(vec![true, false, false]));
    assert_eq!(record.critical_flip_count(), Some(11));
}

#[test]
fn test_seeded_trials_are_reproducible() {
    let runner = TrialRunner::new(1000, 20);
    let first = runner.run_trial(1, &mut SeededBitSource::from_seed(5));
    let second = runner.run_trial(1, &mut SeededBitSource::from_seed(5));
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn test_runner_from_config() {
    let config = lln_sim::SimulationConfig::builder()
        .max_flips(300)
        .threshold(12)
        .band(0.45, 0.55)
        .build()
        .unwrap();
    let runner = TrialRunner::from_config(&config);
    assert_eq!(runner.max_flips(), 300);
    assert_eq!(runner.threshold(), 12);
    assert_eq!(runner.band(), config.band());
}
