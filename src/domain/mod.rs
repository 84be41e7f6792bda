// Domain layer - Pure data models for generation, datasets and diagnostics
pub mod country;
pub mod dataset;
pub mod emissions;
pub mod generation;
pub mod validation;
pub mod window;
