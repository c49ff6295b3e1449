// Domain layer: models, repository ports and the services enforcing line invariants.

pub mod model;
pub mod ports;
pub mod services;
