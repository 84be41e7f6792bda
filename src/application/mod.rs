// Application layer - Pipeline use cases and the seams they depend on
pub mod coverage_service;
pub mod daily_aggregator;
pub mod data_validator;
pub mod dataset_repository;
pub mod emissions_service;
pub mod generation_source;
pub mod incremental_merger;
pub mod ingest_service;
pub mod interval_normalizer;
pub mod resume_tracker;
