// Domain layer: the data model the pipeline stages pass between each other.

pub mod model;
