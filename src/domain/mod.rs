// Domain layer: models and ports only, adapters live under crate::adapters.

pub mod model;
pub mod ports;
