//! Decision Audit - Streaming decision evaluation core
//!
//! Consumes the backend's decision event stream, ranks candidate options
//! against the user's priorities and exposes immutable audit snapshots.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
