//! Time grids and curve sampling

use serde::{Deserialize, Serialize};

use crate::data::curve::Curve;
use crate::data::parameters::Route;
use crate::simulator::equation::Kinetics;
use crate::simulator::SimulationError;

/// Upper bound on the number of samples in a single curve
pub const MAX_SAMPLES: usize = 1_000_000;

/// Density of the uniform time grid a model is sampled on
///
/// Coarse grids are cheaper but blur the interpolated crossing times. The per-route
/// defaults keep the interpolation error well under 1% of the threshold for half-lives
/// between 1 and 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// Fixed step (h); the grid stops at the last step not beyond the horizon
    #[serde(rename = "dt")]
    Step(f64),
    /// Fixed number of samples, evenly spaced from 0 to the horizon inclusive
    #[serde(rename = "sample_count")]
    Count(usize),
}

impl Resolution {
    /// Grid used for a route when none is configured
    pub fn default_for(route: &Route) -> Self {
        match route {
            Route::OralSingle => Resolution::Count(1000),
            Route::OralMulti { .. } => Resolution::Step(0.05),
            Route::PatchInstant { .. } => Resolution::Count(10_000),
            Route::PatchWashout { .. } => Resolution::Count(20_000),
        }
    }

    /// Grid times from 0 up to `horizon`
    pub fn times(&self, horizon: f64) -> Result<Vec<f64>, SimulationError> {
        if !(horizon.is_finite() && horizon > 0.0) {
            return Err(SimulationError::invalid("horizon", horizon));
        }

        match *self {
            Resolution::Step(dt) => {
                if !(dt.is_finite() && dt > 0.0) {
                    return Err(SimulationError::invalid("dt", dt));
                }
                // Tolerate horizons that are a whole number of steps up to rounding
                let steps = (horizon / dt + 1e-9).floor();
                if steps + 1.0 > MAX_SAMPLES as f64 {
                    return Err(SimulationError::invalid(
                        "dt",
                        format!("{} gives more than {} samples", dt, MAX_SAMPLES),
                    ));
                }
                let n = steps as usize + 1;
                if n < 2 {
                    return Err(SimulationError::invalid(
                        "dt",
                        format!("{} is longer than the horizon {}", dt, horizon),
                    ));
                }
                Ok((0..n).map(|i| i as f64 * dt).collect())
            }
            Resolution::Count(n) => {
                if !(2..=MAX_SAMPLES).contains(&n) {
                    return Err(SimulationError::invalid("sample_count", n));
                }
                let step = horizon / (n - 1) as f64;
                let mut times: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
                times[n - 1] = horizon;
                Ok(times)
            }
        }
    }
}

/// Evaluate `model` on the grid described by `resolution`
///
/// The grid spans `[0, model.horizon()]`. Either the whole curve is produced or an
/// error is returned.
pub fn sample<K: Kinetics + ?Sized>(
    model: &K,
    resolution: Resolution,
) -> Result<Curve, SimulationError> {
    let times = resolution.times(model.horizon())?;
    let concentrations = model.profile(&times);
    Curve::new(times, concentrations)
}
