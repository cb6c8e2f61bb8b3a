use quantile_sketch::{
    median, quantile, quantile_with_options, QuantileError, QuantileSketch, SketchOptions,
};

fn assert_rank_error(data_len: usize, result: f64, rank: f64, epsilon: f64) {
    // data is 1..=n, so the rank of a value is the value itself
    let n = data_len as f64;
    let target = (rank * n).ceil().max(1.0);
    let margin = epsilon * n + 1.0;
    assert!(
        (result - target).abs() <= margin,
        "value {result} outside rank target {target} +- {margin}"
    );
}

#[test]
fn median_of_small_sets_is_exact() -> Result<(), QuantileError> {
    assert_eq!(median(&[7.5])?, 7.5);
    assert_eq!(median(&[4.0, 5.0, 3.0])?, 4.0);
    assert_eq!(median(&[10.0, 2.0, 8.0, 4.0, 6.0])?, 6.0);
    Ok(())
}

#[test]
fn quantiles_respect_rank_error_bound() -> Result<(), QuantileError> {
    let data: Vec<f64> = (1..=1000).map(|v| v as f64).collect();
    for &rank in &[0.1, 0.25, 0.5, 0.75, 0.9] {
        let estimate = quantile(&data, rank)?;
        assert_rank_error(data.len(), estimate, rank, 0.001);
    }
    Ok(())
}

#[test]
fn coarse_epsilon_still_bounded() -> Result<(), QuantileError> {
    let data: Vec<f64> = (1..=1000).map(|v| v as f64).collect();
    let options = SketchOptions { epsilon: 0.05 };
    for &rank in &[0.25, 0.5, 0.75] {
        let estimate = quantile_with_options(&data, rank, options)?;
        assert_rank_error(data.len(), estimate, rank, 0.05);
    }
    Ok(())
}

#[test]
fn input_order_does_not_change_result() -> Result<(), QuantileError> {
    let ascending: Vec<f64> = (1..=500).map(|v| v as f64).collect();
    let descending: Vec<f64> = ascending.iter().rev().copied().collect();
    for &rank in &[0.25, 0.5, 0.75] {
        assert_eq!(quantile(&ascending, rank)?, quantile(&descending, rank)?);
    }
    Ok(())
}

#[test]
fn repeated_runs_are_identical() -> Result<(), QuantileError> {
    let data: Vec<f64> = (0..300).map(|v| ((v * 7919) % 300) as f64).collect();
    let first = quantile(&data, 0.5)?;
    let second = quantile(&data, 0.5)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn streaming_inserts_match_convenience_path() -> Result<(), QuantileError> {
    let mut data: Vec<f64> = (1..=200).map(|v| v as f64).collect();
    data.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mut sketch = QuantileSketch::new(0.001)?;
    for &value in &data {
        sketch.insert(value)?;
    }
    assert_eq!(sketch.count(), 200);
    assert_eq!(sketch.query(0.5)?, quantile(&data, 0.5)?);
    Ok(())
}

#[test]
fn input_validation() {
    assert_eq!(median(&[]), Err(QuantileError::EmptyInput));
    assert_eq!(median(&[1.0, f64::NAN]), Err(QuantileError::NonFiniteValue));
    assert_eq!(
        quantile(&[1.0], 1.5).unwrap_err(),
        QuantileError::InvalidRank
    );
    assert!(matches!(
        QuantileSketch::new(0.0),
        Err(QuantileError::InvalidEpsilon)
    ));
    assert!(matches!(
        QuantileSketch::new(0.75),
        Err(QuantileError::InvalidEpsilon)
    ));
}
