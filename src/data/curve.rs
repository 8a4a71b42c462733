use serde::Serialize;

use crate::simulator::SimulationError;

/// A sampled concentration-time curve
///
/// Times (h) start at 0 and are strictly increasing; concentrations (ng/mL) are
/// finite and non-negative. The curve is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    times: Vec<f64>,
    concentrations: Vec<f64>,
}

impl Curve {
    /// Create a curve from parallel time and concentration arrays
    ///
    /// # Errors
    /// Returns [SimulationError::InvalidParameter] if the arrays differ in length, are
    /// empty, do not start at `t = 0`, are not strictly increasing in time, or contain
    /// negative or non-finite values.
    pub fn new(times: Vec<f64>, concentrations: Vec<f64>) -> Result<Self, SimulationError> {
        if times.len() != concentrations.len() {
            return Err(SimulationError::invalid(
                "curve",
                format!(
                    "array lengths mismatch: times={}, concentrations={}",
                    times.len(),
                    concentrations.len()
                ),
            ));
        }
        match times.first() {
            None => return Err(SimulationError::invalid("curve", "empty")),
            Some(&t0) if t0 != 0.0 => {
                return Err(SimulationError::invalid("curve", format!("starts at t = {}", t0)))
            }
            _ => {}
        }
        if times.windows(2).any(|w| !(w[1] > w[0]) || !w[1].is_finite()) {
            return Err(SimulationError::invalid(
                "curve",
                "times are not strictly increasing",
            ));
        }
        if let Some(c) = concentrations
            .iter()
            .find(|c| !c.is_finite() || **c < 0.0)
        {
            return Err(SimulationError::invalid("concentration", c));
        }

        Ok(Self {
            times,
            concentrations,
        })
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn concentrations(&self) -> &[f64] {
        &self.concentrations
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Never true for a curve built by [Curve::new]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// `(time, concentration)` pairs in time order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.concentrations.iter().copied())
    }

    /// Last sampled time
    pub fn end_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Concentration at the first sample with time `>= t`, or at the last sample
    pub fn sample_at(&self, t: f64) -> f64 {
        let idx = self
            .times
            .partition_point(|&time| time < t)
            .min(self.len() - 1);
        self.concentrations[idx]
    }

    /// Keep the samples with time `<= end`
    ///
    /// The first sample is always kept, so the result is never empty.
    pub fn truncated(&self, end: f64) -> Curve {
        let keep = self.times.partition_point(|&time| time <= end).max(1);
        Curve {
            times: self.times[..keep].to_vec(),
            concentrations: self.concentrations[..keep].to_vec(),
        }
    }
}
