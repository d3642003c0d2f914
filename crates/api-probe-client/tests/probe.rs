// api-probe-client/tests/probe.rs
// ============================================================================
// Module: Probe Client Tests
// Description: Tests for single-request dispatch with configured deadlines.
// Purpose: Validate status reporting, path joining, size caps, and timeouts.
// Dependencies: api-probe-client, api-probe-config, tiny_http
// ============================================================================

//! ## Overview
//! Tests the probe client for:
//! - Happy path: status and report fields for 2xx and 4xx answers
//! - Target formation: base path prefixes preserved, absolute paths rejected
//! - Boundary enforcement: response size cap, read deadline
//! - Error handling: connection refusal

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::net::TcpListener;
use std::thread;

use api_probe_client::MAX_RESPONSE_BYTES;
use api_probe_client::ProbeClient;
use api_probe_client::ProbeError;
use api_probe_config::ExecutionConfig;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Builds a validated config pointing at `base_url` with 5s deadlines.
fn local_config(base_url: &str) -> ExecutionConfig {
    ExecutionConfig::new(base_url, 5_000, 5_000).unwrap()
}

/// Spawns a local test server that answers one request with `body`/`status`.
fn spawn_server(body: String, status: u16) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = format!("http://{addr}");

    let handle = thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response = Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
        }
    });

    (url, handle)
}

// ============================================================================
// SECTION: Status Reporting
// ============================================================================

/// Tests that a 200 answer is reported with its body size.
#[test]
fn probe_reports_success_status() {
    let (url, handle) = spawn_server("ok".to_string(), 200);
    let client = ProbeClient::new(&local_config(&url)).unwrap();

    let report = client.probe("/").unwrap();
    assert_eq!(report.status, 200);
    assert!(report.is_success());
    assert_eq!(report.body_bytes, 2);

    handle.join().unwrap();
}

/// Tests that a 404 answer is reported, not raised as an error.
#[test]
fn probe_reports_failure_status() {
    let (url, handle) = spawn_server("not found".to_string(), 404);
    let client = ProbeClient::new(&local_config(&url)).unwrap();

    let report = client.probe("/missing").unwrap();
    assert_eq!(report.status, 404);
    assert!(!report.is_success());

    handle.join().unwrap();
}

/// Tests that the content type header is captured when present.
#[test]
fn probe_captures_content_type() {
    let (url, handle) = spawn_server("ok".to_string(), 200);
    let client = ProbeClient::new(&local_config(&url)).unwrap();

    let report = client.probe("/").unwrap();
    assert!(report.content_type.is_some());

    handle.join().unwrap();
}

// ============================================================================
// SECTION: Target Formation
// ============================================================================

/// Tests that a base path prefix is preserved when joining probe paths.
#[test]
fn probe_preserves_base_path_prefix() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{addr}/v1");

    let handle = thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let status = if request.url() == "/v1/health" { 200 } else { 404 };
            let _ = request.respond(Response::from_string("").with_status_code(status));
        }
    });

    let client = ProbeClient::new(&local_config(&base)).unwrap();
    let report = client.probe("/health").unwrap();
    assert_eq!(report.status, 200);

    handle.join().unwrap();
}

/// Tests that an absolute URL supplied as a path is rejected.
#[test]
fn probe_rejects_absolute_url_path() {
    let client = ProbeClient::new(&local_config("http://127.0.0.1:8080")).unwrap();
    let result = client.probe("http://example.com/");
    assert!(matches!(result, Err(ProbeError::InvalidTarget(_))));
}

/// Tests that whitespace in a probe path is rejected.
#[test]
fn probe_rejects_whitespace_path() {
    let client = ProbeClient::new(&local_config("http://127.0.0.1:8080")).unwrap();
    let result = client.probe("/health check");
    assert!(matches!(result, Err(ProbeError::InvalidTarget(_))));
}

// ============================================================================
// SECTION: Boundary Enforcement
// ============================================================================

/// Tests that a response above the size cap fails closed.
#[test]
fn probe_enforces_response_size_cap() {
    let oversized = "x".repeat(MAX_RESPONSE_BYTES + 1);
    let (url, handle) = spawn_server(oversized, 200);
    let client = ProbeClient::new(&local_config(&url)).unwrap();

    let result = client.probe("/");
    assert!(matches!(result, Err(ProbeError::TooLarge { .. })));

    handle.join().unwrap();
}

/// Tests that the read deadline fails a probe when no response arrives.
#[test]
fn probe_honors_read_deadline() {
    // Bound but never accepted: connects succeed, reads stall.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{addr}");

    let config = ExecutionConfig::new(&url, 1_000, 200).unwrap();
    let client = ProbeClient::new(&config).unwrap();
    let result = client.probe("/");
    assert!(matches!(result, Err(ProbeError::Http(_))));
}

// ============================================================================
// SECTION: Error Handling
// ============================================================================

/// Tests that connection refusal surfaces as a transport error.
#[test]
fn probe_reports_connection_refusal() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ProbeClient::new(&local_config(&format!("http://{addr}"))).unwrap();
    let result = client.probe("/");
    assert!(matches!(result, Err(ProbeError::Http(_))));
}
