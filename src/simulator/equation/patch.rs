//! Transdermal patch with zero-order release
//!
//! While the patch is worn the drug enters circulation at the constant rate
//! `R0 = D·1e6·F / patch_duration` (ng/h) and is eliminated with first-order rate `k`:
//!
//! ```text
//! C(t) = R0 / (k·V) · (1 − e^(−k·t))        0 ≤ t ≤ patch_duration
//! ```
//!
//! What happens after removal depends on the [Removal] policy.

use crate::data::parameters::DrugParameters;
use crate::simulator::equation::Kinetics;

/// Number of half-lives a patch is followed for, at minimum
const HALF_LIVES_FOLLOWED: f64 = 7.0;

/// Input policy once the patch comes off
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Removal {
    /// Input stops immediately, leaving pure first-order decay from `C(patch_duration)`
    Instant,
    /// Residual drug on the skin keeps being absorbed at
    /// `R0·e^(−(t − patch_duration)/tau_off)`
    ///
    /// This has no closed form and is integrated with forward Euler on the sampling grid.
    Washout { tau_off: f64 },
}

#[derive(Debug, Clone)]
pub struct PatchZeroOrder {
    k: f64,
    input_rate: f64,
    volume: f64,
    patch_duration: f64,
    removal: Removal,
    horizon: f64,
}

impl PatchZeroOrder {
    /// # Arguments
    /// * `k` - Elimination rate constant (1/h)
    /// * `params` - Drug parameters (dose, bioavailability, volume, half-life)
    /// * `patch_duration` - Wear time (h)
    /// * `removal` - Input policy after removal
    pub fn new(k: f64, params: &DrugParameters, patch_duration: f64, removal: Removal) -> Self {
        let input_rate = (params.dose * 1e6 * params.bioavailability) / patch_duration;
        let horizon = (2.0 * patch_duration).max(HALF_LIVES_FOLLOWED * params.half_life);
        Self {
            k,
            input_rate,
            volume: params.volume_total(),
            patch_duration,
            removal,
            horizon,
        }
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn patch_duration(&self) -> f64 {
        self.patch_duration
    }

    pub fn removal(&self) -> Removal {
        self.removal
    }

    /// Release rate while the patch is worn (ng/h)
    pub fn release_rate(&self) -> f64 {
        self.input_rate
    }

    /// Drug input rate at time `t` (ng/h)
    pub fn input_rate(&self, t: f64) -> f64 {
        if t <= self.patch_duration {
            return self.input_rate;
        }
        match self.removal {
            Removal::Instant => 0.0,
            Removal::Washout { tau_off } => {
                self.input_rate * (-(t - self.patch_duration) / tau_off).exp()
            }
        }
    }

    fn worn(&self, t: f64) -> f64 {
        self.input_rate / (self.k * self.volume) * (1.0 - (-self.k * t).exp())
    }

    /// Closed-form concentration for instant removal
    fn instant(&self, t: f64) -> f64 {
        let c = if t <= self.patch_duration {
            self.worn(t)
        } else {
            self.worn(self.patch_duration) * (-self.k * (t - self.patch_duration)).exp()
        };
        c.max(0.0)
    }

    /// Forward Euler integration of `dC/dt = R(t)/V − k·C`, `C(0) = 0`
    fn integrate(&self, times: &[f64]) -> Vec<f64> {
        let mut concentrations = vec![0.0; times.len()];
        for i in 1..times.len() {
            let dt = times[i] - times[i - 1];
            let previous = concentrations[i - 1];
            let dc = (self.input_rate(times[i]) / self.volume - self.k * previous) * dt;
            concentrations[i] = (previous + dc).max(0.0);
        }
        concentrations
    }
}

impl Kinetics for PatchZeroOrder {
    fn horizon(&self) -> f64 {
        self.horizon
    }

    fn concentration_at(&self, t: f64) -> Option<f64> {
        match self.removal {
            Removal::Instant if t >= 0.0 => Some(self.instant(t)),
            Removal::Instant => Some(0.0),
            Removal::Washout { .. } => None,
        }
    }

    fn profile(&self, times: &[f64]) -> Vec<f64> {
        match self.removal {
            Removal::Instant => times.iter().map(|&t| self.instant(t.max(0.0))).collect(),
            Removal::Washout { .. } => self.integrate(times),
        }
    }
}
