//! Pure calculation functions on sampled curves

use super::types::Peak;
use crate::data::curve::Curve;

/// Highest sample of the curve; ties go to the earliest sample
pub fn peak(curve: &Curve) -> Peak {
    let c = curve.concentrations();
    let mut index = 0;
    for i in 1..c.len() {
        if c[i] > c[index] {
            index = i;
        }
    }
    Peak {
        time: curve.times()[index],
        concentration: c[index],
        index,
    }
}

/// Linear trapezoidal AUC for a segment
#[inline]
fn auc_linear(c1: f64, c2: f64, dt: f64) -> f64 {
    (c1 + c2) / 2.0 * dt
}

/// Area under the sampled curve from its first to its last sample
pub fn auc(curve: &Curve) -> f64 {
    let t = curve.times();
    let c = curve.concentrations();
    (1..curve.len())
        .map(|i| auc_linear(c[i - 1], c[i], t[i] - t[i - 1]))
        .sum()
}
