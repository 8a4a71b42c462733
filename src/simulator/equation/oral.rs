use crate::simulator::equation::Kinetics;
use crate::simulator::rates::{RateConstants, RATE_EPSILON};

/// Converts mg/L to ng/mL
pub const MG_PER_L_TO_NG_PER_ML: f64 = 1000.0;

/// Number of half-lives a single oral dose is followed for
const HALF_LIVES_FOLLOWED: f64 = 7.0;

/// One-compartment model with first-order absorption, single oral dose
///
/// `C(t) = 1000 · ka·F·D / (V·(ka − k)) · (e^(−k·t) − e^(−ka·t))`
///
/// Negative values, which appear through cancellation close to `t = 0`, are clamped to 0.
#[derive(Debug, Clone)]
pub struct OralSingleDose {
    rates: RateConstants,
    bioavailability: f64,
    dose: f64,
    volume: f64,
    horizon: f64,
}

impl OralSingleDose {
    /// # Arguments
    /// * `rates` - Elimination and absorption rate constants (1/h)
    /// * `bioavailability` - Absorbed fraction of the dose
    /// * `dose` - Dose (mg)
    /// * `volume` - Total distribution volume (L)
    /// * `half_life` - Elimination half-life (h), sets the simulated horizon
    pub fn new(
        rates: RateConstants,
        bioavailability: f64,
        dose: f64,
        volume: f64,
        half_life: f64,
    ) -> Self {
        Self {
            rates,
            bioavailability,
            dose,
            volume,
            horizon: HALF_LIVES_FOLLOWED * half_life,
        }
    }

    pub fn rates(&self) -> RateConstants {
        self.rates
    }

    /// `ka·F·D / (V·(ka − k))` in mg/L
    fn coefficient(&self) -> f64 {
        let RateConstants { k, ka, .. } = self.rates;
        (ka * self.bioavailability * self.dose) / (self.volume * (ka - k))
    }

    /// Concentration (ng/mL) at `t` hours after the dose
    pub fn concentration(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        let RateConstants { k, ka, .. } = self.rates;
        let c = MG_PER_L_TO_NG_PER_ML * self.coefficient() * ((-k * t).exp() - (-ka * t).exp());
        c.max(0.0)
    }
}

impl Kinetics for OralSingleDose {
    fn horizon(&self) -> f64 {
        self.horizon
    }

    fn concentration_at(&self, t: f64) -> Option<f64> {
        Some(self.concentration(t))
    }

    fn profile(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.concentration(t)).collect()
    }
}

/// Repeated oral doses every `tau` hours, `n_doses` administrations
///
/// Superposition of the single-dose kinetics in closed form. With `n` doses given by
/// time `t` and `t'` the time since the last of them:
///
/// `C(t) = 1000 · coef · (A_k(n)·e^(−k·t') − A_ka(n)·e^(−ka·t'))`
///
/// where `A_r(n) = (1 − e^(−n·r·τ)) / (1 − e^(−r·τ))` is the geometric accumulation
/// factor of each exponential.
#[derive(Debug, Clone)]
pub struct OralMultiDose {
    single: OralSingleDose,
    tau: f64,
    n_doses: usize,
}

impl OralMultiDose {
    pub fn new(single: OralSingleDose, tau: f64, n_doses: usize) -> Self {
        Self {
            single,
            tau,
            n_doses,
        }
    }

    pub fn rates(&self) -> RateConstants {
        self.single.rates
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn n_doses(&self) -> usize {
        self.n_doses
    }

    /// Number of doses administered by time `t`, bounded by the regimen
    pub fn doses_given(&self, t: f64) -> usize {
        let n = (t / self.tau).floor() + 1.0;
        n.clamp(0.0, self.n_doses as f64) as usize
    }

    /// Accumulation factor of the exponential with rate `r` after `n` doses
    fn accumulation(&self, r: f64, n: usize) -> f64 {
        let n = n as f64;
        let mut den = 1.0 - (-r * self.tau).exp();
        // r·τ close to zero: floor the denominator rather than divide by zero
        if den.abs() < RATE_EPSILON {
            den = RATE_EPSILON;
        }
        (1.0 - (-n * r * self.tau).exp()) / den
    }

    /// Concentration (ng/mL) at `t` hours after the first dose
    pub fn concentration(&self, t: f64) -> f64 {
        let n = self.doses_given(t);
        if n == 0 {
            return 0.0;
        }
        let RateConstants { k, ka, .. } = self.single.rates;
        let since_last = t - (n - 1) as f64 * self.tau;

        let c = MG_PER_L_TO_NG_PER_ML
            * self.single.coefficient()
            * (self.accumulation(k, n) * (-k * since_last).exp()
                - self.accumulation(ka, n) * (-ka * since_last).exp());
        c.max(0.0)
    }
}

impl Kinetics for OralMultiDose {
    fn horizon(&self) -> f64 {
        self.n_doses as f64 * self.tau
    }

    fn concentration_at(&self, t: f64) -> Option<f64> {
        Some(self.concentration(t))
    }

    fn profile(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.concentration(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_dose() -> OralSingleDose {
        // t½ = 4 h, t_max = 1 h, F = 1, D = 10 mg, V = 0.5 L/kg × 70 kg
        let rates = RateConstants::oral(4.0, 1.0).unwrap();
        OralSingleDose::new(rates, 1.0, 10.0, 35.0, 4.0)
    }

    /// Explicit sum of shifted single-dose curves
    fn summed(single: &OralSingleDose, tau: f64, n_doses: usize, t: f64) -> f64 {
        (0..n_doses)
            .map(|i| t - i as f64 * tau)
            .filter(|&dt| dt >= 0.0)
            .map(|dt| single.concentration(dt))
            .sum()
    }

    #[test]
    fn test_single_dose_starts_at_zero() {
        let model = reference_dose();
        assert_eq!(model.concentration(0.0), 0.0);
        assert_eq!(model.horizon(), 28.0);
    }

    #[test]
    fn test_single_dose_peak_matches_analytic_tmax() {
        let model = reference_dose();
        let RateConstants { k, ka, .. } = model.rates();
        let t_peak = (ka / k).ln() / (ka - k);

        let c_peak = model.concentration(t_peak);
        assert!(c_peak > model.concentration(t_peak - 0.01));
        assert!(c_peak > model.concentration(t_peak + 0.01));
        assert!(c_peak < 1000.0 * 10.0 / 35.0);
    }

    #[test]
    fn test_single_dose_is_finite_and_non_negative() {
        let model = reference_dose();
        for i in 0..=2000 {
            let c = model.concentration(i as f64 * 0.1);
            assert!(c.is_finite() && c >= 0.0);
        }
    }

    #[test]
    fn test_one_dose_reproduces_single_dose() {
        let single = reference_dose();
        let multi = OralMultiDose::new(single.clone(), 8.0, 1);

        for i in 0..=400 {
            let t = i as f64 * 0.07;
            assert_eq!(multi.concentration(t), single.concentration(t), "t = {}", t);
        }
    }

    #[test]
    fn test_closed_form_matches_explicit_superposition() {
        let single = reference_dose();
        let multi = OralMultiDose::new(single.clone(), 8.0, 4);

        for i in 0..=320 {
            let t = i as f64 * 0.1;
            assert_relative_eq!(
                multi.concentration(t),
                summed(&single, 8.0, 4, t),
                epsilon = 1e-9,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_troughs_accumulate() {
        let multi = OralMultiDose::new(reference_dose(), 8.0, 4);
        let troughs: Vec<f64> = [8.0, 16.0, 24.0]
            .iter()
            .map(|&t| multi.concentration(t - 1e-6))
            .collect();

        assert!(troughs[0] < troughs[1]);
        assert!(troughs[1] < troughs[2]);
    }

    #[test]
    fn test_last_interval_decays_after_peak() {
        let multi = OralMultiDose::new(reference_dose(), 8.0, 4);
        let peak = (0..=800)
            .map(|i| multi.concentration(24.0 + i as f64 * 0.01))
            .fold(0.0, f64::max);

        assert!(multi.concentration(32.0) < peak);
        assert_eq!(multi.horizon(), 32.0);
    }

    #[test]
    fn test_doses_given_is_clipped() {
        let multi = OralMultiDose::new(reference_dose(), 8.0, 4);
        assert_eq!(multi.tau(), 8.0);
        assert_eq!(multi.n_doses(), 4);
        assert_eq!(multi.doses_given(0.0), 1);
        assert_eq!(multi.doses_given(7.99), 1);
        assert_eq!(multi.doses_given(8.0), 2);
        assert_eq!(multi.doses_given(100.0), 4);
        assert_eq!(multi.doses_given(-1.0), 0);
        assert_eq!(multi.concentration(-1.0), 0.0);
    }

    #[test]
    fn test_tiny_rate_times_tau_stays_finite() {
        // k·τ far below the denominator floor
        let rates = RateConstants::oral(1e12, 1.0).unwrap();
        let single = OralSingleDose::new(rates, 1.0, 10.0, 35.0, 1e12);
        let multi = OralMultiDose::new(single, 1e-3, 3);
        for i in 0..=30 {
            let c = multi.concentration(i as f64 * 1e-4);
            assert!(c.is_finite() && c >= 0.0);
        }
    }
}
