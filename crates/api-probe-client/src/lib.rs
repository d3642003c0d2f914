// api-probe-client/src/lib.rs
// ============================================================================
// Module: API Probe Client Library
// Description: HTTP dispatch shim applying resolved execution settings.
// Purpose: Turn an ExecutionConfig into bounded single-request probes.
// Dependencies: api-probe-config, reqwest, url
// ============================================================================

//! ## Overview
//! `api-probe-client` is the thin seam between the resolved
//! [`ExecutionConfig`](api_probe_config::ExecutionConfig) and the HTTP
//! collaborator. It builds one client per run with the configured connect and
//! read deadlines, dispatches single GET probes, and reads responses through
//! a hard size cap.
//!
//! Security posture: probe targets and responses are untrusted; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::MAX_RESPONSE_BYTES;
pub use client::ProbeClient;
pub use client::ProbeError;
pub use client::ProbeReport;
