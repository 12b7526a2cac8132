//! Ingestion-boundary normalization.
//!
//! Upstream records arrive with odds in three notations and confidence in
//! two unit conventions. Both ambiguities are resolved exactly once, here,
//! into typed wrappers that downstream code cannot re-normalize by accident.

pub mod confidence;
pub mod odds;
