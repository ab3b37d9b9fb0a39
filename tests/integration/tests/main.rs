//! End-to-end tests for realm creation, loading and password checks.
//!
//! Resources are written to a temporary directory and resolved through the
//! file-system resolver, the same path a deployed application takes.

mod config_realm;
mod file_realm;
mod reload;
mod round_trip;
mod startup;
