//! Simulation error types

use thiserror::Error;

/// Errors that abort the simulation of a single drug
///
/// A failed simulation never produces a partial curve, and in batch runs it never
/// affects the simulation of other drugs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A parameter is outside its documented range
    #[error("Invalid parameter: {param} = {value}")]
    InvalidParameter { param: String, value: String },
}

impl SimulationError {
    pub(crate) fn invalid(param: &str, value: impl ToString) -> Self {
        SimulationError::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
        }
    }
}
