// Presentation layer - CLI and operator output
pub mod cli;
pub mod report;
