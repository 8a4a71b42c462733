//! Concentration curve simulation
//!
//! A simulation takes one drug's [DrugParameters] and its [SimulationOptions], builds the
//! concentration model for the route, samples it on a uniform grid and extracts the
//! clinical markers of the resulting curve.
//!
//! Simulations share no state, so batches are mapped in parallel with [simulate_many].
//!
//! ```rust
//! use pkcurve::prelude::*;
//!
//! let params = DrugParameters::builder("example")
//!     .dose(10.0)
//!     .bioavailability(1.0)
//!     .volume_per_kg(0.5)
//!     .half_life(4.0)
//!     .time_to_peak(1.0)
//!     .onset_time(0.5)
//!     .end_threshold(1.0)
//!     .build();
//!
//! let simulation = simulate(&params, &SimulationOptions::new(Route::OralSingle)).unwrap();
//! println!("Cmax {:.1} ng/mL at {:.2} h", simulation.markers.peak.concentration, simulation.markers.peak.time);
//! ```

pub mod equation;
mod error;
pub mod grid;
mod options;
pub mod rates;

pub use equation::{Kinetics, Model};
pub use error::SimulationError;
pub use grid::{sample, Resolution};
pub use options::SimulationOptions;
pub use rates::RateConstants;

use rayon::prelude::*;
use serde::Serialize;

use crate::data::curve::Curve;
use crate::data::parameters::{DrugParameters, Route};
use crate::markers::{self, EventMarkers, OnsetReference};

/// One drug to simulate
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub params: DrugParameters,
    pub options: SimulationOptions,
}

/// Result of simulating one drug
#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    /// Name of the simulated drug
    pub drug: String,
    pub route: Route,
    /// Elimination rate constant (1/h)
    pub k: f64,
    /// Oral rate constants, including whether `ka` had to be perturbed
    pub rate_constants: Option<RateConstants>,
    /// Simulated time span before truncation (h)
    pub horizon: f64,
    /// Administration times (h)
    pub dose_times: Vec<f64>,
    /// Time the patch is removed (h)
    pub removal_time: Option<f64>,
    /// The sampled curve, cut at [EventMarkers::truncated_at] when set
    pub curve: Curve,
    pub markers: EventMarkers,
}

impl Simulation {
    /// Whether the absorption rate constant was moved away from `k`
    pub fn rates_perturbed(&self) -> bool {
        self.rate_constants.map(|r| r.perturbed).unwrap_or(false)
    }
}

/// Simulate one drug
///
/// # Errors
/// [SimulationError::InvalidParameter] when a parameter the route depends on is out of
/// range. No curve is produced in that case.
pub fn simulate(
    params: &DrugParameters,
    options: &SimulationOptions,
) -> Result<Simulation, SimulationError> {
    options.validate()?;
    let model = Model::new(params, &options.route)?;
    let full = sample(&model, options.resolution())?;

    let onset = OnsetReference {
        time: params.onset_time,
        concentration: model
            .concentration_at(params.onset_time)
            .unwrap_or_else(|| full.sample_at(params.onset_time)),
    };
    let markers = markers::extract(&full, onset, params.end_threshold, options.tail_margin);
    let curve = markers::visible_curve(&full, &markers);

    tracing::debug!(
        drug = %params.name,
        route = %options.route,
        samples = full.len(),
        "simulated concentration curve"
    );

    Ok(Simulation {
        drug: params.name.clone(),
        route: options.route,
        k: model.elimination_rate(),
        rate_constants: model.rate_constants(),
        horizon: model.horizon(),
        dose_times: options.route.dose_times(),
        removal_time: options.route.patch_duration(),
        curve,
        markers,
    })
}

/// Simulate every request in parallel
///
/// Results are returned in request order. A failing drug is logged and reported in its
/// own slot; it does not affect the others.
pub fn simulate_many(requests: &[SimulationRequest]) -> Vec<Result<Simulation, SimulationError>> {
    requests
        .par_iter()
        .map(|request| {
            let result = simulate(&request.params, &request.options);
            if let Err(e) = &result {
                tracing::warn!(drug = %request.params.name, error = %e, "simulation failed");
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_drug() -> DrugParameters {
        DrugParameters::builder("reference")
            .dose(10.0)
            .bioavailability(1.0)
            .volume_per_kg(0.5)
            .body_weight(70.0)
            .half_life(4.0)
            .time_to_peak(1.0)
            .onset_time(0.5)
            .end_threshold(5.0)
            .build()
    }

    #[test]
    fn test_oral_single_simulation() {
        let simulation =
            simulate(&reference_drug(), &SimulationOptions::new(Route::OralSingle)).unwrap();

        assert_eq!(simulation.curve.len(), 1000);
        assert_eq!(simulation.horizon, 28.0);
        assert_eq!(simulation.dose_times, vec![0.0]);
        assert!(!simulation.rates_perturbed());

        let rates = simulation.rate_constants.unwrap();
        let analytic_tmax = (rates.ka / rates.k).ln() / (rates.ka - rates.k);
        let step = 28.0 / 999.0;
        assert!((simulation.markers.peak.time - analytic_tmax).abs() <= step);
        assert!(simulation.markers.peak.concentration < 1000.0 * 10.0 / 35.0);

        // The onset threshold is reached at the onset time itself
        let rising = simulation.markers.rising().unwrap();
        assert_relative_eq!(rising.time, 0.5, epsilon = step);
        assert!(simulation.markers.falling().is_some());
        assert!(simulation.markers.end_point.is_some());
    }

    #[test]
    fn test_truncation_after_falling_crossing() {
        let options = SimulationOptions::new(Route::OralSingle).with_tail_margin(2.0);
        let simulation = simulate(&reference_drug(), &options).unwrap();

        let falling = simulation.markers.falling().unwrap().time;
        assert_relative_eq!(simulation.markers.truncated_at.unwrap(), falling + 2.0);
        assert!(simulation.curve.end_time() <= falling + 2.0);
        assert!(simulation.curve.end_time() > falling + 2.0 - 28.0 / 999.0);
    }

    #[test]
    fn test_margin_past_horizon_keeps_full_curve() {
        let options = SimulationOptions::new(Route::OralSingle).with_tail_margin(100.0);
        let simulation = simulate(&reference_drug(), &options).unwrap();

        assert!(simulation.markers.falling().is_some());
        assert_eq!(simulation.markers.truncated_at, None);
        assert_eq!(simulation.curve.end_time(), simulation.horizon);
        assert_eq!(simulation.curve.len(), 1000);
    }

    #[test]
    fn test_invalid_parameters_produce_no_curve() {
        let mut params = reference_drug();
        params.half_life = -1.0;
        let result = simulate(&params, &SimulationOptions::new(Route::OralSingle));
        assert_eq!(
            result.unwrap_err(),
            SimulationError::InvalidParameter {
                param: "half_life".to_string(),
                value: "-1".to_string()
            }
        );
    }

    #[test]
    fn test_patch_removal_time() {
        let mut params = reference_drug();
        params.time_to_peak = None;
        params.onset_time = 12.0;
        let options = SimulationOptions::new(Route::PatchInstant {
            patch_duration: 72.0,
        });
        let simulation = simulate(&params, &options).unwrap();

        assert_eq!(simulation.removal_time, Some(72.0));
        assert!(simulation.rate_constants.is_none());
        assert_relative_eq!(simulation.k, std::f64::consts::LN_2 / 4.0);
        // max(2 · 72, 7 · 4)
        assert_eq!(simulation.horizon, 144.0);
    }

    #[test]
    fn test_simulate_many_isolates_failures() {
        let good = SimulationRequest {
            params: reference_drug(),
            options: SimulationOptions::new(Route::OralSingle),
        };
        let mut bad = good.clone();
        bad.params.bioavailability = 2.0;

        let results = simulate_many(&[good.clone(), bad, good]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
