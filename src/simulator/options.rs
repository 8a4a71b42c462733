use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::parameters::{non_negative, Route};
use crate::error::PkError;
use crate::simulator::grid::Resolution;
use crate::simulator::SimulationError;

/// Simulation configuration
///
/// # Example
///
/// ```rust
/// use pkcurve::prelude::*;
///
/// let options = SimulationOptions::new(Route::oral_multi(8.0))
///     .with_resolution(Resolution::Step(0.1))
///     .with_tail_margin(6.0);
/// assert_eq!(options.resolution(), Resolution::Step(0.1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Administration route and regimen
    #[serde(flatten)]
    pub route: Route,
    /// Grid density; `None` uses [Resolution::default_for] the route
    #[serde(default)]
    pub resolution: Option<Resolution>,
    /// Hours of curve kept after the falling onset crossing; `None` keeps the full curve
    #[serde(default)]
    pub tail_margin: Option<f64>,
}

impl SimulationOptions {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            resolution: None,
            tail_margin: None,
        }
    }

    /// Set the grid density
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Cut the returned curve `margin` hours after the falling onset crossing
    pub fn with_tail_margin(mut self, margin: f64) -> Self {
        self.tail_margin = Some(margin);
        self
    }

    /// Effective grid density
    pub fn resolution(&self) -> Resolution {
        self.resolution
            .unwrap_or_else(|| Resolution::default_for(&self.route))
    }

    pub(crate) fn validate(&self) -> Result<(), SimulationError> {
        if let Some(margin) = self.tail_margin {
            non_negative("tail_margin", margin)?;
        }
        Ok(())
    }

    /// Read options from a JSON file
    ///
    /// ```json
    /// { "route": "oral-multi", "tau": 8.0, "n_doses": 4, "resolution": { "dt": 0.05 } }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PkError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Read options from a JSON file, or use the defaults for `route` if that fails
    pub fn load_or_default(path: impl AsRef<Path>, route: Route) -> Self {
        match Self::from_json_file(path.as_ref()) {
            Ok(options) => {
                tracing::info!(path = %path.as_ref().display(), "loaded simulation options");
                options
            }
            Err(PkError::Io(e)) => {
                tracing::info!(path = %path.as_ref().display(), error = %e, "simulation options not found, using defaults");
                Self::new(route)
            }
            Err(e) => {
                tracing::warn!(path = %path.as_ref().display(), error = %e, "failed to parse simulation options, using defaults");
                Self::new(route)
            }
        }
    }
}
