//! Clinical markers of a sampled concentration curve
//!
//! Given a [Curve], this module finds:
//!
//! | Marker | Description |
//! |--------|-------------|
//! | Peak | Highest sample and its time (first one on ties) |
//! | Onset crossings | Interpolated times where the curve rises to and falls below the onset concentration |
//! | End point | First fall below the "effectively absent" threshold after the peak |
//! | Truncation | End of the visible curve, `falling + tail_margin` when that falls inside the curve |
//! | AUC | Linear trapezoidal area under the sampled curve |
//!
//! Crossing times are linearly interpolated between the two bracketing samples, which is
//! exact for piecewise-linear curves and otherwise limited by the sampling density.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pkcurve::markers::{extract, OnsetReference};
//!
//! let onset = OnsetReference { time: 1.0, concentration: 42.0 };
//! let markers = extract(&curve, onset, 0.5, Some(6.0));
//! if let Some(falling) = markers.falling() {
//!     println!("Effect wears off at {:.1} h", falling.time);
//! }
//! ```

mod calc;
mod crossing;
mod types;

pub use calc::{auc, peak};
pub use crossing::{crossings, falling_crossing, interpolate_time, Crossings};
pub use types::{Crossing, Direction, EventMarkers, Peak};

use crate::data::curve::Curve;

/// Concentration at the caller's onset time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnsetReference {
    /// Onset time (h)
    pub time: f64,
    /// Concentration at the onset time (ng/mL)
    pub concentration: f64,
}

/// Extract every marker of `curve`
///
/// # Arguments
/// * `curve` - The full sampled curve
/// * `onset` - Onset time and the concentration used as the "still effective" threshold
/// * `end_threshold` - Concentration under which the drug is considered absent
/// * `tail_margin` - Hours of curve kept after the falling onset crossing; `None`, or a
///   margin reaching past the last sample, keeps the whole curve
pub fn extract(
    curve: &Curve,
    onset: OnsetReference,
    end_threshold: f64,
    tail_margin: Option<f64>,
) -> EventMarkers {
    let onset_crossings: Vec<Crossing> = crossings(curve, onset.concentration).collect();

    // A cut at or past the last sample leaves the curve whole
    let truncated_at = tail_margin
        .and_then(|margin| {
            onset_crossings
                .iter()
                .find(|c| c.direction == Direction::Falling)
                .map(|c| c.time + margin)
        })
        .filter(|&end| end < curve.end_time());

    EventMarkers {
        peak: peak(curve),
        onset_time: onset.time,
        onset_concentration: onset.concentration,
        onset_crossings,
        end_threshold,
        end_point: falling_crossing(curve, end_threshold),
        truncated_at,
        auc: auc(curve),
    }
}

/// The caller-visible part of `curve`
///
/// Cut at [EventMarkers::truncated_at] when set, otherwise the full curve.
pub fn visible_curve(curve: &Curve, markers: &EventMarkers) -> Curve {
    match markers.truncated_at {
        Some(end) => curve.truncated(end),
        None => curve.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> Curve {
        let times: Vec<f64> = (0..=20).map(|i| i as f64).collect();
        let concentrations = times
            .iter()
            .map(|&t| if t <= 4.0 { 10.0 * t } else { (40.0 - 2.5 * (t - 4.0)).max(0.0) })
            .collect();
        Curve::new(times, concentrations).unwrap()
    }

    #[test]
    fn test_extract() {
        let curve = triangle();
        let onset = OnsetReference {
            time: 1.0,
            concentration: 10.0,
        };
        let markers = extract(&curve, onset, 5.0, Some(2.0));

        assert_eq!(markers.peak.time, 4.0);
        assert_eq!(markers.peak.concentration, 40.0);
        assert_relative_eq!(markers.rising().unwrap().time, 1.0);
        assert_relative_eq!(markers.falling().unwrap().time, 16.0);
        assert_relative_eq!(markers.effect_duration().unwrap(), 15.0);
        assert_relative_eq!(markers.end_point.unwrap().time, 18.0);
        assert_relative_eq!(markers.truncated_at.unwrap(), 18.0);

        let visible = visible_curve(&curve, &markers);
        assert_eq!(visible.end_time(), 18.0);
    }

    #[test]
    fn test_no_falling_crossing_keeps_full_curve() {
        let curve = triangle();
        let onset = OnsetReference {
            time: 0.0,
            concentration: 0.0,
        };
        let markers = extract(&curve, onset, 0.0, Some(2.0));

        assert!(markers.onset_crossings.is_empty());
        assert!(markers.end_point.is_none());
        assert!(markers.truncated_at.is_none());
        assert_eq!(visible_curve(&curve, &markers), curve);
    }

    #[test]
    fn test_tail_past_curve_end_keeps_full_curve() {
        let curve = triangle();
        let onset = OnsetReference {
            time: 1.0,
            concentration: 10.0,
        };
        // Falling crossing at 16 h, curve ends at 20 h
        let markers = extract(&curve, onset, 5.0, Some(10.0));
        assert!(markers.falling().is_some());
        assert!(markers.truncated_at.is_none());
        assert_eq!(visible_curve(&curve, &markers), curve);
    }

    #[test]
    fn test_without_tail_margin() {
        let curve = triangle();
        let onset = OnsetReference {
            time: 1.0,
            concentration: 10.0,
        };
        let markers = extract(&curve, onset, 5.0, None);
        assert!(markers.falling().is_some());
        assert!(markers.truncated_at.is_none());
    }
}
