//! Conformance testing harness for frankeniconv.
//!
//! This crate provides:
//! - Fixture sets: conversion cases as JSON (hex-encoded input chunks and
//!   expected output or error kind)
//! - Fixture runner: executes cases on worker threads against the core
//!   engine
//! - Structured logging: canonical JSONL records plus a schema validator
//! - Report generation: markdown + JSON conformance reports keyed by the
//!   fixture SHA-256

#![forbid(unsafe_code)]

pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureOperation, FixtureSet, LoadedFixture};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
