//! Marker types extracted from a sampled curve

use serde::{Deserialize, Serialize};

/// Highest sampled concentration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Time of the peak (h)
    pub time: f64,
    /// Peak concentration (ng/mL)
    pub concentration: f64,
    /// Sample index of the peak
    pub index: usize,
}

/// Whether the curve crosses a threshold upwards or downwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rising,
    Falling,
}

/// Interpolated point where the curve crosses a threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    /// Interpolated crossing time (h)
    pub time: f64,
    /// The threshold that was crossed (ng/mL)
    pub concentration: f64,
    pub direction: Direction,
}

/// Clinical markers of one simulated curve
///
/// Absent crossings mean the marker does not apply to this curve; they are not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMarkers {
    pub peak: Peak,
    /// Time the drug is considered effective (h)
    pub onset_time: f64,
    /// Concentration at the onset time, the threshold for "still effective" (ng/mL)
    pub onset_concentration: f64,
    /// Rising then falling crossing of the onset concentration, at most one of each
    pub onset_crossings: Vec<Crossing>,
    /// Threshold under which the drug is considered absent (ng/mL)
    pub end_threshold: f64,
    /// First fall below the absence threshold after the peak
    pub end_point: Option<Crossing>,
    /// End of the caller-visible curve, when it was cut short after the falling crossing
    pub truncated_at: Option<f64>,
    /// Linear trapezoidal area under the full sampled curve (ng·h/mL)
    pub auc: f64,
}

impl EventMarkers {
    /// Time at which the curve first reaches the onset concentration
    pub fn rising(&self) -> Option<&Crossing> {
        self.onset_crossings
            .iter()
            .find(|c| c.direction == Direction::Rising)
    }

    /// Time at which the curve falls back below the onset concentration
    pub fn falling(&self) -> Option<&Crossing> {
        self.onset_crossings
            .iter()
            .find(|c| c.direction == Direction::Falling)
    }

    /// Hours between the onset time and the falling crossing
    pub fn effect_duration(&self) -> Option<f64> {
        self.falling().map(|c| c.time - self.onset_time)
    }
}
