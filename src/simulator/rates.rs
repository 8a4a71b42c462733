use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;

use crate::data::parameters::positive;
use crate::simulator::SimulationError;

/// Smallest separation kept between `ka` and `k`, and the floor applied to
/// accumulation denominators in the multi-dose model
pub const RATE_EPSILON: f64 = 1e-9;

/// Elimination rate constant `k = ln(2) / t½` (1/h)
pub fn elimination_rate(half_life: f64) -> Result<f64, SimulationError> {
    positive("half_life", half_life)?;
    Ok(LN_2 / half_life)
}

/// Elimination and absorption rate constants of an oral dose (1/h)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConstants {
    /// Elimination rate constant
    pub k: f64,
    /// Absorption rate constant
    pub ka: f64,
    /// `ka` was moved away from `k` to keep `1 / (ka - k)` finite
    pub perturbed: bool,
}

impl RateConstants {
    /// Derive `k` and `ka` from the half-life and the time to peak
    ///
    /// `ka = ln(2) / t_max + k`. When `ka` and `k` are closer than [RATE_EPSILON] the
    /// absorption constant is replaced by `k + RATE_EPSILON`. This is a modeling
    /// approximation of the `ka = k` limit, and is reported through
    /// [RateConstants::perturbed].
    pub fn oral(half_life: f64, time_to_peak: f64) -> Result<Self, SimulationError> {
        let k = elimination_rate(half_life)?;
        positive("time_to_peak", time_to_peak)?;

        let ka = LN_2 / time_to_peak + k;
        if (ka - k).abs() < RATE_EPSILON {
            let ka = k + RATE_EPSILON;
            tracing::debug!(k, ka, "absorption rate constant perturbed away from k");
            return Ok(Self {
                k,
                ka,
                perturbed: true,
            });
        }

        Ok(Self {
            k,
            ka,
            perturbed: false,
        })
    }
}
