//! Local job pipeline for the authoritative apply path: consumes job
//! requests, tracks job records, and persists scaled GeoJSON artifacts
//! without ever modifying the originals.

pub mod jobs;
pub mod processor;
