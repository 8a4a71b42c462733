use serde::{Deserialize, Serialize};
use std::fmt;

use crate::simulator::SimulationError;

/// Body weight used when the caller does not provide one (kg)
pub const DEFAULT_BODY_WEIGHT: f64 = 70.0;

/// Residual absorption time constant after patch removal (hours)
pub const DEFAULT_TAU_OFF: f64 = 6.0;

/// Number of administrations for multi-dose regimens without an explicit count
pub const DEFAULT_N_DOSES: usize = 4;

/// Pharmacokinetic description of one drug
///
/// Units: dose in mg, bioavailability as a fraction, distribution volume in L/kg,
/// body weight in kg, times in hours and concentrations in ng/mL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugParameters {
    /// Name used to identify the drug in results and logs
    pub name: String,
    /// Administered dose (mg)
    pub dose: f64,
    /// Fraction of the dose reaching systemic circulation
    pub bioavailability: f64,
    /// Distribution volume per body mass (L/kg)
    pub volume_per_kg: f64,
    /// Body weight (kg)
    pub body_weight: f64,
    /// Elimination half-life (h)
    pub half_life: f64,
    /// Time to peak concentration after an oral dose (h)
    pub time_to_peak: Option<f64>,
    /// Time at which the drug is considered effective (h)
    pub onset_time: f64,
    /// Concentration under which the drug is considered absent (ng/mL)
    pub end_threshold: f64,
}

impl DrugParameters {
    pub fn builder(name: impl Into<String>) -> DrugParametersBuilder {
        DrugParametersBuilder::new(name)
    }

    /// Total distribution volume (L)
    pub fn volume_total(&self) -> f64 {
        self.volume_per_kg * self.body_weight
    }

    /// Check every parameter the given route depends on
    pub fn validate(&self, route: &Route) -> Result<(), SimulationError> {
        positive("dose", self.dose)?;
        if !(0.0..=1.0).contains(&self.bioavailability) {
            return Err(SimulationError::invalid(
                "bioavailability",
                self.bioavailability,
            ));
        }
        positive("volume_per_kg", self.volume_per_kg)?;
        positive("body_weight", self.body_weight)?;
        positive("half_life", self.half_life)?;
        non_negative("onset_time", self.onset_time)?;
        non_negative("end_threshold", self.end_threshold)?;

        if route.is_oral() {
            match self.time_to_peak {
                Some(t_max) => positive("time_to_peak", t_max)?,
                None => return Err(SimulationError::invalid("time_to_peak", "missing")),
            }
        }
        route.validate()
    }
}

pub(crate) fn positive(param: &str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(param, value))
    }
}

pub(crate) fn non_negative(param: &str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(param, value))
    }
}

/// Builder for [DrugParameters]
#[derive(Debug, Clone)]
pub struct DrugParametersBuilder {
    params: DrugParameters,
}

impl DrugParametersBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            params: DrugParameters {
                name: name.into(),
                dose: 0.0,
                bioavailability: 1.0,
                volume_per_kg: 1.0,
                body_weight: DEFAULT_BODY_WEIGHT,
                half_life: 0.0,
                time_to_peak: None,
                onset_time: 0.0,
                end_threshold: 0.0,
            },
        }
    }

    pub fn dose(mut self, dose: f64) -> Self {
        self.params.dose = dose;
        self
    }

    pub fn bioavailability(mut self, fraction: f64) -> Self {
        self.params.bioavailability = fraction;
        self
    }

    pub fn volume_per_kg(mut self, volume: f64) -> Self {
        self.params.volume_per_kg = volume;
        self
    }

    pub fn body_weight(mut self, weight: f64) -> Self {
        self.params.body_weight = weight;
        self
    }

    pub fn half_life(mut self, half_life: f64) -> Self {
        self.params.half_life = half_life;
        self
    }

    pub fn time_to_peak(mut self, t_max: f64) -> Self {
        self.params.time_to_peak = Some(t_max);
        self
    }

    pub fn onset_time(mut self, onset: f64) -> Self {
        self.params.onset_time = onset;
        self
    }

    pub fn end_threshold(mut self, threshold: f64) -> Self {
        self.params.end_threshold = threshold;
        self
    }

    pub fn build(self) -> DrugParameters {
        self.params
    }
}

/// Administration route together with its regimen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "kebab-case")]
pub enum Route {
    /// One oral dose at t = 0
    OralSingle,
    /// `n_doses` oral doses every `tau` hours, starting at t = 0
    OralMulti { tau: f64, n_doses: usize },
    /// Zero-order patch; input stops as soon as the patch is removed
    PatchInstant { patch_duration: f64 },
    /// Zero-order patch; residual drug keeps being absorbed after removal
    PatchWashout {
        patch_duration: f64,
        #[serde(default = "default_tau_off")]
        tau_off: f64,
    },
}

fn default_tau_off() -> f64 {
    DEFAULT_TAU_OFF
}

impl Route {
    pub fn oral_multi(tau: f64) -> Self {
        Route::OralMulti {
            tau,
            n_doses: DEFAULT_N_DOSES,
        }
    }

    pub fn patch_washout(patch_duration: f64) -> Self {
        Route::PatchWashout {
            patch_duration,
            tau_off: DEFAULT_TAU_OFF,
        }
    }

    pub fn is_oral(&self) -> bool {
        matches!(self, Route::OralSingle | Route::OralMulti { .. })
    }

    /// Time at which the patch comes off, if this is a patch route
    pub fn patch_duration(&self) -> Option<f64> {
        match self {
            Route::PatchInstant { patch_duration } | Route::PatchWashout { patch_duration, .. } => {
                Some(*patch_duration)
            }
            _ => None,
        }
    }

    /// Administration times within the regimen
    pub fn dose_times(&self) -> Vec<f64> {
        match self {
            Route::OralMulti { tau, n_doses } => (0..*n_doses).map(|i| i as f64 * tau).collect(),
            _ => vec![0.0],
        }
    }

    fn validate(&self) -> Result<(), SimulationError> {
        match *self {
            Route::OralSingle => Ok(()),
            Route::OralMulti { tau, n_doses } => {
                positive("tau", tau)?;
                if n_doses == 0 {
                    return Err(SimulationError::invalid("n_doses", n_doses));
                }
                Ok(())
            }
            Route::PatchInstant { patch_duration } => positive("patch_duration", patch_duration),
            Route::PatchWashout {
                patch_duration,
                tau_off,
            } => {
                positive("patch_duration", patch_duration)?;
                positive("tau_off", tau_off)
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Route::OralSingle => "oral-single",
            Route::OralMulti { .. } => "oral-multi",
            Route::PatchInstant { .. } => "patch-instant",
            Route::PatchWashout { .. } => "patch-washout",
        };
        write!(f, "{}", label)
    }
}
