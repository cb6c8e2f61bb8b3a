mod gk;

pub use gk::QuantileSketch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantileError {
    EmptyInput,
    NonFiniteValue,
    InvalidEpsilon,
    InvalidRank,
}

impl std::fmt::Display for QuantileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantileError::EmptyInput => write!(f, "quantile requires at least one value"),
            QuantileError::NonFiniteValue => {
                write!(f, "input must not contain NaN or infinite values")
            }
            QuantileError::InvalidEpsilon => {
                write!(f, "epsilon must lie in (0, 0.5]")
            }
            QuantileError::InvalidRank => write!(f, "rank must lie in [0, 1]"),
        }
    }
}

impl std::error::Error for QuantileError {}

/// Accuracy knob for the sketch. A quantile query answers with rank
/// error at most `epsilon * n`.
#[derive(Debug, Clone, Copy)]
pub struct SketchOptions {
    pub epsilon: f64,
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self { epsilon: 0.001 }
    }
}

/// One-shot quantile over a slice with default accuracy.
///
/// The slice is copied and sorted before insertion, so the result is
/// deterministic regardless of input order.
pub fn quantile(data: &[f64], rank: f64) -> Result<f64, QuantileError> {
    quantile_with_options(data, rank, SketchOptions::default())
}

pub fn quantile_with_options(
    data: &[f64],
    rank: f64,
    options: SketchOptions,
) -> Result<f64, QuantileError> {
    let mut sketch = QuantileSketch::new(options.epsilon)?;
    let mut sorted = data.to_vec();
    if sorted.iter().any(|v| !v.is_finite()) {
        return Err(QuantileError::NonFiniteValue);
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    for value in sorted {
        sketch.insert(value)?;
    }
    sketch.query(rank)
}

/// Convenience wrapper for the 50th percentile.
pub fn median(data: &[f64]) -> Result<f64, QuantileError> {
    quantile(data, 0.5)
}
