//! Evaluation engine — per-line scoring, aggregation, and report assembly.

pub mod aggregator;
pub mod report;
pub mod scoring;
