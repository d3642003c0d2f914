// api-probe-config/src/lib.rs
// ============================================================================
// Module: API Probe Config Library
// Description: Canonical config model, resolution, and validation.
// Purpose: Single source of truth for api-probe.toml and override semantics.
// Dependencies: serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! `api-probe-config` resolves the immutable [`ExecutionConfig`] consumed by
//! every probe within a run. Resolution layers an explicit override record
//! over an optional TOML file over compiled defaults, and fails closed: a
//! malformed override or config file halts the run before any request is
//! dispatched.
//!
//! Security posture: config inputs are untrusted; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
