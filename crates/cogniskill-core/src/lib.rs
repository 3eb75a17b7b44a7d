//! cogniskill-core: Synthetic student data and its statistical analysis.
//!
//! This crate defines the student record model, the seeded generator, and
//! the descriptive, regression, and clustering stages that the rest of the
//! workspace builds on.

pub mod clustering;
pub mod config;
pub mod derived;
pub mod error;
pub mod generator;
pub mod model;
pub mod pipeline;
pub mod regression;
pub mod statistics;
pub mod summary;

pub use error::PipelineError;
