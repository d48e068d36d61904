// Domain layer: consent records and the ports the compiler talks through.

pub mod model;
pub mod ports;
