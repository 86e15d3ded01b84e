// Domain layer: models and the ports the forecast engine talks through.

pub mod model;
pub mod ports;
