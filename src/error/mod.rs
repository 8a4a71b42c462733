use thiserror::Error;

use crate::data::parser::TableError;
use crate::simulator::SimulationError;

#[derive(Error, Debug)]
pub enum PkError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}
