//! rolesctl library crate.
//!
//! # Purpose
//! Exposes configuration, tracing setup, and command evaluation for the
//! `rolesctl` binary and its tests.
//!
//! # Notes
//! Commands only read the process-wide reserved-role registry.
pub mod commands;
pub mod config;
pub mod observability;
