//! Tests for main.rs startup validation (JWT secret, token lifetimes)

use std::process::{Command, Output, Stdio};

fn run(envs: &[(&str, &str)], args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_reelpass"));
    command
        .env_remove("JWT_SECRET")
        .env_remove("ACCESS_TTL_SECS")
        .env_remove("REFRESH_TTL_SECS")
        .args(["--database", ":memory:"])
        .args(args)
        .stderr(Stdio::piped())
        .stdout(Stdio::piped());
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("Failed to run binary")
}

fn combined_output(output: &Output) -> String {
    // tracing logs to stdout by default
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn test_missing_jwt_secret_exits_with_error() {
    let output = run(&[], &[]);

    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(
        combined.contains("JWT_SECRET") && combined.contains("required"),
        "Should mention JWT_SECRET is required, got: {}",
        combined
    );
}

#[test]
fn test_short_jwt_secret_exits_with_error() {
    let output = run(&[("JWT_SECRET", "too-short")], &[]);

    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(
        combined.contains("shorter than 32"),
        "Should reject short secret, got: {}",
        combined
    );
}

#[test]
fn test_unreadable_secret_file_exits_with_error() {
    let output = run(
        &[],
        &["--jwt-secret-file", "/nonexistent/reelpass/jwt-secret"],
    );

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("Failed to read JWT secret file"));
}

#[test]
fn test_refresh_lifetime_must_exceed_access_lifetime() {
    let output = run(
        &[("JWT_SECRET", "test-secret-that-is-long-enough!!")],
        &["--access-ttl-secs", "3600", "--refresh-ttl-secs", "600"],
    );

    assert!(!output.status.success());
    assert!(
        combined_output(&output).contains("Refresh token lifetime must exceed"),
        "Should reject inverted lifetimes"
    );
}

#[test]
fn test_zero_lifetime_rejected_by_parser() {
    let output = run(
        &[("JWT_SECRET", "test-secret-that-is-long-enough!!")],
        &["--access-ttl-secs", "0"],
    );

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("access-ttl-secs"));
}

#[test]
fn test_over_large_refresh_lifetime_rejected_by_parser() {
    let output = run(
        &[("JWT_SECRET", "test-secret-that-is-long-enough!!")],
        &["--refresh-ttl-secs", "18446744073709551615"],
    );

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("refresh-ttl-secs"));
}

#[test]
fn test_cookie_domain_with_attribute_injection_rejected() {
    let output = run(
        &[("JWT_SECRET", "test-secret-that-is-long-enough!!")],
        &["--cookie-domain", "example.com; SameSite=None"],
    );

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("Cookie domain contains invalid characters"));
}
