use rfconversions::power::linear_to_db;

use crate::error::{LinkError, LinkResult};

/// SINR observations of one scenario, in the order the PHY reported them.
///
/// Created empty when a scenario starts and dropped after its comparison, so a
/// series never outlives the scenario that filled it.
#[derive(Clone, Debug, Default)]
pub struct SinrAccumulator {
    samples: Vec<f64>, // linear
}

impl SinrAccumulator {
    pub fn new() -> SinrAccumulator {
        SinrAccumulator::default()
    }

    pub fn record(&mut self, sinr_linear: f64) {
        self.samples.push(sinr_linear);
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First sample in dB, the value checked by single-sample scenarios.
    ///
    /// Zero, negative or NaN samples are not clamped: they come out as -inf or
    /// NaN and fail any tolerance check.
    pub fn first_sinr_db(&self, scenario: &str) -> LinkResult<f64> {
        let first = self
            .samples
            .first()
            .copied()
            .ok_or_else(|| LinkError::InsufficientData {
                scenario: scenario.to_string(),
            })?;
        Ok(linear_to_db(first))
    }

    /// Hand the series over once the run is done.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_arrival_order() {
        let mut acc = SinrAccumulator::new();
        acc.record(2.0);
        acc.record(0.5);
        acc.record(100.0);
        assert_eq!(acc.samples(), &[2.0, 0.5, 100.0]);
        assert_eq!(acc.len(), 3);
    }

    #[test]
    fn first_sample_in_db() {
        let mut acc = SinrAccumulator::new();
        acc.record(100.0);
        acc.record(1.0);
        assert!((acc.first_sinr_db("first").unwrap() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn garbage_first_sample_is_not_finite() {
        let mut acc = SinrAccumulator::new();
        acc.record(f64::NAN);
        assert!(acc.first_sinr_db("nan").unwrap().is_nan());

        let mut acc = SinrAccumulator::new();
        acc.record(-3.0);
        assert!(acc.first_sinr_db("negative").unwrap().is_nan());

        let mut acc = SinrAccumulator::new();
        acc.record(0.0);
        assert_eq!(acc.first_sinr_db("zero").unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn empty_is_insufficient_data() {
        let acc = SinrAccumulator::new();
        assert!(acc.is_empty());
        assert_eq!(
            acc.first_sinr_db("empty"),
            Err(LinkError::InsufficientData {
                scenario: "empty".to_string()
            })
        );
    }
}
