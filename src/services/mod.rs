// src/services/mod.rs

pub mod aggregator;
pub mod dashboard;
pub mod fan_out;
