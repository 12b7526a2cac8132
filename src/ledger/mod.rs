//! Ledger — per-event profit/loss and the chronological running total.
//!
//! The pipeline is dedup → grade filter → chronological sort → profit
//! arithmetic. Every stage is a pure function of its input; nothing here
//! holds state between calls, so independent views can recompute on every
//! refresh without interfering.

pub mod dedup;
pub mod engine;
pub mod export;
