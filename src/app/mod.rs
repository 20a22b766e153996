// Collection Report - app/mod.rs
//
// Application layer: orchestration of a report run.
// Dependencies: core layer.

pub mod report;
