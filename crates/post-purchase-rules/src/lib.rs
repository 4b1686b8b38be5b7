//! Deterministic, explainable post-purchase recommendations for e-commerce orders.
//!
//! Every order row is scored independently by a declarative rule book: a suggested
//! edit window, an upsell prompt flag, a strict address validation flag and an early
//! lock flag, each with the weighted factors that produced it.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
