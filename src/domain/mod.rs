// Domain layer: card rule records, value types and ports. No dependencies beyond serde/chrono.

pub mod model;
pub mod ports;
