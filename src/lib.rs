pub mod data;
pub mod error;
pub mod markers;
pub mod simulator;

pub use crate::data::*;
pub use crate::markers::{Crossing, Direction, EventMarkers, Peak};
pub use crate::simulator::{
    simulate, simulate_many, Kinetics, Model, RateConstants, Resolution, Simulation,
    SimulationError, SimulationOptions, SimulationRequest,
};
pub use error::PkError;

pub mod prelude {
    pub mod data {
        pub use crate::data::{
            parser::{read_drug_rows, read_drug_table},
            Curve, DrugParameters, DrugRow, Route, RouteKind,
        };
    }
    pub mod simulator {
        pub use crate::simulator::{
            equation::{Kinetics, Model},
            grid::sample,
            simulate, simulate_many, RateConstants, Resolution, Simulation, SimulationOptions,
            SimulationRequest,
        };
    }
    pub mod models {
        pub use crate::simulator::equation::oral::{OralMultiDose, OralSingleDose};
        pub use crate::simulator::equation::patch::{PatchZeroOrder, Removal};
    }

    pub use crate::data::*;
    pub use crate::markers::{Crossing, Direction, EventMarkers, Peak};
    pub use crate::simulator::{
        simulate, simulate_many, Kinetics, Model, RateConstants, Resolution, Simulation,
        SimulationError, SimulationOptions, SimulationRequest,
    };
    pub use crate::PkError;
}
