pub mod curve;
pub mod parameters;
pub mod parser;
pub use curve::Curve;
pub use parameters::{DrugParameters, DrugParametersBuilder, Route};
pub use parser::{read_drug_rows, read_drug_table, DrugRow, RouteKind, TableError};
