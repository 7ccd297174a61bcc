mod measurement;
mod noise_model;
mod graph;

pub use measurement::{BetweenMeasurement, MeasurementModel, PriorMeasurement, RangeMeasurement};
pub use noise_model::NoiseModelFactor;
pub use graph::NonlinearFactorGraph;
