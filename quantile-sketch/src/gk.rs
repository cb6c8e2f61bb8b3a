use crate::QuantileError;

#[derive(Debug, Clone)]
struct Tuple {
    value: f64,
    g: u64,
    delta: u64,
}

/// Greenwald-Khanna streaming quantile sketch.
///
/// Maintains a summary of at most O(log(epsilon * n) / epsilon)
/// tuples; `query(q)` answers with rank error at most `epsilon * n`.
/// Fully deterministic for a fixed epsilon and insertion order.
#[derive(Debug, Clone)]
pub struct QuantileSketch {
    epsilon: f64,
    tuples: Vec<Tuple>,
    count: u64,
    compress_period: u64,
    inserts_since_compress: u64,
}

impl QuantileSketch {
    pub fn new(epsilon: f64) -> Result<Self, QuantileError> {
        if !epsilon.is_finite() || epsilon <= 0.0 || epsilon > 0.5 {
            return Err(QuantileError::InvalidEpsilon);
        }
        let compress_period = (1.0 / (2.0 * epsilon)).floor().max(1.0) as u64;
        Ok(Self {
            epsilon,
            tuples: Vec::new(),
            count: 0,
            compress_period,
            inserts_since_compress: 0,
        })
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn insert(&mut self, value: f64) -> Result<(), QuantileError> {
        if !value.is_finite() {
            return Err(QuantileError::NonFiniteValue);
        }
        let pos = self.tuples.partition_point(|t| t.value <= value);
        // new extrema are exact; interior inserts take the loosest
        // delta that keeps g + delta within the 2*epsilon*n envelope
        let delta = if pos == 0 || pos == self.tuples.len() {
            0
        } else {
            self.capacity().saturating_sub(1)
        };
        self.tuples.insert(pos, Tuple { value, g: 1, delta });
        self.count += 1;
        self.inserts_since_compress += 1;
        if self.inserts_since_compress >= self.compress_period {
            self.compress();
            self.inserts_since_compress = 0;
        }
        Ok(())
    }

    pub fn query(&self, rank: f64) -> Result<f64, QuantileError> {
        if !(0.0..=1.0).contains(&rank) {
            return Err(QuantileError::InvalidRank);
        }
        if self.tuples.is_empty() {
            return Err(QuantileError::EmptyInput);
        }
        let target = (rank * self.count as f64).ceil().max(1.0);
        let margin = self.epsilon * self.count as f64;
        let mut rmin = 0.0;
        for (i, tuple) in self.tuples.iter().enumerate() {
            rmin += tuple.g as f64;
            match self.tuples.get(i + 1) {
                Some(next) => {
                    if rmin + next.g as f64 + next.delta as f64 > target + margin {
                        return Ok(tuple.value);
                    }
                }
                None => return Ok(tuple.value),
            }
        }
        Ok(self.tuples[self.tuples.len() - 1].value)
    }

    // Maximum allowed span (g + delta) for a tuple at the current count.
    fn capacity(&self) -> u64 {
        (2.0 * self.epsilon * self.count as f64).floor() as u64
    }

    fn compress(&mut self) {
        if self.tuples.len() < 3 {
            return;
        }
        let cap = self.capacity();
        let mut i = self.tuples.len() - 2;
        while i >= 1 {
            let merged = self.tuples[i].g + self.tuples[i + 1].g + self.tuples[i + 1].delta;
            if merged <= cap {
                self.tuples[i + 1].g += self.tuples[i].g;
                self.tuples.remove(i);
            }
            i -= 1;
        }
    }
}
