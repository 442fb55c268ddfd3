//! Mathematical properties of the strategies, aggregates and error metric.

use ferrocast_tests::*;

// =============================================================================
// Strategy Properties
// =============================================================================

#[test]
fn csp_prediction_always_lies_within_five_percent_of_open() {
    let records = synthetic_series(200);
    let result = run_pipeline(&records, &PipelineConfig::default()).expect("runs");

    for prediction in result.predictions() {
        let open = records[prediction.position].open.expect("open present");
        assert!(
            prediction.csp >= open * 0.95 - EPSILON && prediction.csp <= open * 1.05 + EPSILON,
            "csp {} outside band around open {}",
            prediction.csp,
            open
        );
    }
}

#[test]
fn csp_clamps_wide_ranges_to_the_band_edges() {
    let records = vec![
        bar("UP", 100.0, 200.0, 150.0, 120.0, 1.0),
        bar("DN", 100.0, 60.0, 20.0, 80.0, 1.0),
    ];
    let result = run_pipeline(&records, &PipelineConfig::default()).expect("runs");

    assert!(close_to(result.predictions()[0].csp, 105.0));
    assert!(close_to(result.predictions()[1].csp, 95.0));
}

#[test]
fn fol_returns_open_unless_open_is_strictly_inside_the_range() {
    let records = synthetic_series(150);
    let result = run_pipeline(&records, &PipelineConfig::default()).expect("runs");

    for prediction in result.predictions() {
        let record = &records[prediction.position];
        let (open, high, low) = (
            record.open.expect("open"),
            record.high.expect("high"),
            record.low.expect("low"),
        );
        if high > open && low < open {
            assert!(close_to(prediction.fol, (high + low) / 2.0));
        } else {
            assert_eq!(prediction.fol, open);
        }
    }
}

#[test]
fn fol_falls_back_to_open_when_open_touches_the_high() {
    let records = vec![bar("EQ", 10.0, 10.0, 9.0, 9.5, 1.0)];
    let result = run_pipeline(&records, &PipelineConfig::default()).expect("runs");

    assert_eq!(result.predictions()[0].fol, 10.0);
}

#[test]
fn heuristic_is_always_one_percent_away_from_open() {
    let records = synthetic_series(120);
    let result = run_pipeline(&records, &PipelineConfig::default()).expect("runs");

    for prediction in result.predictions() {
        let open = records[prediction.position].open.expect("open");
        assert!(
            close_to(prediction.heuristic, open * 1.01) || close_to(prediction.heuristic, open * 0.99),
            "heuristic {} for open {}",
            prediction.heuristic,
            open
        );
    }
}

#[test]
fn linear_model_uses_fixed_weights() {
    let records = vec![bar("LIN", 10.0, 20.0, 30.0, 0.0, 100_000_000.0)];
    let result = run_pipeline(&records, &PipelineConfig::default()).expect("runs");

    // 0.3 * 60 + 1e-8 * 1e8
    assert!(close_to(result.predictions()[0].model, 19.0));
}

// =============================================================================
// Aggregates
// =============================================================================

#[test]
fn aggregate_average_equals_sum_over_count_for_every_symbol() {
    let records = synthetic_series(61);
    let screening = screen(&records, &PipelineConfig::default()).expect("valid");
    let groups = RecordGrouper::group(&screening.accepted).expect("non-empty");
    let aggregates = RecordGrouper::aggregate_all(&groups);

    for group in groups.iter() {
        let aggregate = aggregates.get(group.symbol()).expect("aggregate per group");
        let expected_sum: f64 = group.records().iter().map(|r| r.bar.volume).sum();
        assert_eq!(aggregate.count(), group.len());
        assert!(close_to(aggregate.sum(), expected_sum));
        assert!(close_to(aggregate.average(), expected_sum / group.len() as f64));
    }
}

#[test]
fn missing_volume_counts_as_zero_in_the_average() {
    let records = vec![
        bar("AAL", 10.0, 11.0, 9.0, 10.0, 1000.0),
        bar_without_volume("AAL", 10.0, 11.0, 9.0, 10.0),
    ];
    let screening = screen(&records, &PipelineConfig::default()).expect("valid");
    let groups = RecordGrouper::group(&screening.accepted).expect("non-empty");
    let aggregates = RecordGrouper::aggregate_all(&groups);

    let aggregate = aggregates.get(&symbol("AAL")).expect("AAL");
    assert_eq!(aggregate.count(), 2);
    assert!(close_to(aggregate.average(), 500.0));
}

// =============================================================================
// Mean Absolute Error
// =============================================================================

#[test]
fn mae_of_identical_series_is_zero() {
    let series = [1.5, -2.0, 3.25, 100.0];
    assert_eq!(mean_absolute_error(&series, &series), Ok(0.0));
}

#[test]
fn mae_is_symmetric_and_non_negative() {
    let actual = [10.0, 11.0, 12.5, 9.0];
    let predicted = [9.0, 11.5, 12.0, 10.0];

    let forward = mean_absolute_error(&actual, &predicted).expect("same length");
    let backward = mean_absolute_error(&predicted, &actual).expect("same length");

    assert!(forward >= 0.0);
    assert!(close_to(forward, backward));
    assert!(close_to(forward, 0.75));
}

#[test]
fn every_strategy_error_is_finite_and_non_negative() {
    let records = synthetic_series(90);
    let result = run_pipeline(&records, &PipelineConfig::default()).expect("runs");

    assert_eq!(result.errors().iter().count(), Strategy::ALL.len());
    for entry in result.errors().iter() {
        assert!(entry.mae.is_finite() && entry.mae >= 0.0, "{:?}", entry);
    }
}

#[test]
fn best_strategy_has_the_minimum_error() {
    let records = synthetic_series(90);
    let result = run_pipeline(&records, &PipelineConfig::default()).expect("runs");

    let best = result.errors().best().expect("four entries");
    assert!(result.errors().iter().all(|entry| best.mae <= entry.mae));
}

#[test]
fn evaluation_matches_manual_mae_per_strategy() {
    let records = synthetic_series(40);
    let result = run_pipeline(&records, &PipelineConfig::default()).expect("runs");
    let summary = evaluate_all(result.predictions()).expect("non-empty");

    for strategy in Strategy::ALL {
        let manual: f64 = result
            .predictions()
            .iter()
            .map(|p| (p.actual - p.predicted(strategy)).abs())
            .sum::<f64>()
            / result.predictions().len() as f64;
        assert!(close_to(summary.get(strategy).expect("entry"), manual));
    }
}
