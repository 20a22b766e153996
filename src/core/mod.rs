// Collection Report - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app or platform. File contents are only ever read
// through the `aggregate::LogSource` trait.

pub mod aggregate;
pub mod discovery;
pub mod export;
pub mod marker;
pub mod model;
