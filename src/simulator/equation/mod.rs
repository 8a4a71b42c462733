//! Concentration models
//!
//! Every model reports plasma concentration in ng/mL with time in hours. Closed-form
//! models can be evaluated at any time; models without a closed form are only defined
//! on a time grid and return `None` from [Kinetics::concentration_at].

pub mod oral;
pub mod patch;

pub use oral::{OralMultiDose, OralSingleDose, MG_PER_L_TO_NG_PER_ML};
pub use patch::{PatchZeroOrder, Removal};

use crate::data::parameters::{DrugParameters, Route};
use crate::simulator::rates::{elimination_rate, RateConstants};
use crate::simulator::SimulationError;

/// Common interface of the concentration models
pub trait Kinetics {
    /// Time span the model is simulated over (h)
    fn horizon(&self) -> f64;

    /// Closed-form concentration at `t`, when the model has one
    fn concentration_at(&self, t: f64) -> Option<f64>;

    /// Concentration at each of the (ascending, zero-based) grid times
    ///
    /// Returned values are finite and non-negative.
    fn profile(&self, times: &[f64]) -> Vec<f64>;
}

/// The model selected by a [Route]
#[derive(Debug, Clone)]
pub enum Model {
    OralSingle(OralSingleDose),
    OralMulti(OralMultiDose),
    Patch(PatchZeroOrder),
}

impl Model {
    /// Build the model for `route`, validating the parameters it depends on
    pub fn new(params: &DrugParameters, route: &Route) -> Result<Self, SimulationError> {
        params.validate(route)?;
        let volume = params.volume_total();

        let model = match *route {
            Route::OralSingle | Route::OralMulti { .. } => {
                let t_max = params
                    .time_to_peak
                    .ok_or_else(|| SimulationError::invalid("time_to_peak", "missing"))?;
                let rates = RateConstants::oral(params.half_life, t_max)?;
                let single = OralSingleDose::new(
                    rates,
                    params.bioavailability,
                    params.dose,
                    volume,
                    params.half_life,
                );
                match *route {
                    Route::OralMulti { tau, n_doses } => {
                        Model::OralMulti(OralMultiDose::new(single, tau, n_doses))
                    }
                    _ => Model::OralSingle(single),
                }
            }
            Route::PatchInstant { patch_duration } => Model::Patch(PatchZeroOrder::new(
                elimination_rate(params.half_life)?,
                params,
                patch_duration,
                Removal::Instant,
            )),
            Route::PatchWashout {
                patch_duration,
                tau_off,
            } => Model::Patch(PatchZeroOrder::new(
                elimination_rate(params.half_life)?,
                params,
                patch_duration,
                Removal::Washout { tau_off },
            )),
        };
        Ok(model)
    }

    /// Rate constants of the oral models
    pub fn rate_constants(&self) -> Option<RateConstants> {
        match self {
            Model::OralSingle(m) => Some(m.rates()),
            Model::OralMulti(m) => Some(m.rates()),
            Model::Patch(_) => None,
        }
    }

    /// Elimination rate constant (1/h)
    pub fn elimination_rate(&self) -> f64 {
        match self {
            Model::OralSingle(m) => m.rates().k,
            Model::OralMulti(m) => m.rates().k,
            Model::Patch(m) => m.k(),
        }
    }

    fn inner(&self) -> &dyn Kinetics {
        match self {
            Model::OralSingle(m) => m,
            Model::OralMulti(m) => m,
            Model::Patch(m) => m,
        }
    }
}

impl Kinetics for Model {
    fn horizon(&self) -> f64 {
        self.inner().horizon()
    }

    fn concentration_at(&self, t: f64) -> Option<f64> {
        self.inner().concentration_at(t)
    }

    fn profile(&self, times: &[f64]) -> Vec<f64> {
        self.inner().profile(times)
    }
}
