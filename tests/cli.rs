//! End-to-end tests against the `seidan` binary.

mod common;

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use chrono::Utc;
use seidan_hsm::KeyFamily;

fn seidan(keystore: &Path, args: &[&str]) -> Output {
    seidan_in_cluster(OsStr::new("test"), keystore, args)
}

fn seidan_in_cluster(cluster: &OsStr, keystore: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seidan"))
        .args(args)
        .env("CLUSTER", cluster)
        .env("SEIDAN_KEYSTORE", keystore)
        .env("RUST_LOG", "info")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn gen_with_expiration() {
    let store = tempfile::tempdir().unwrap();
    let signer = common::provision(store.path(), "seidan:test", "primary", KeyFamily::EcP256);
    let host_key = common::host_key(KeyFamily::EcP256);

    let before = Utc::now().timestamp();
    let output = seidan(store.path(), &["gen", "host1", &host_key, "30"]);
    let after = Utc::now().timestamp();

    assert!(output.status.success());
    let out = stdout(&output);
    assert_eq!(out.lines().count(), 1);

    let decoded = common::verify(out.trim_end(), &signer);
    assert_eq!(decoded.header["alg"], "ES256");
    assert_eq!(decoded.payload["iss"], "test");
    assert_eq!(decoded.payload["nam"], "host1");
    assert_eq!(decoded.payload["sub"], host_key.as_str());

    let iat = decoded.payload["iat"].as_i64().unwrap();
    let exp = decoded.payload["exp"].as_i64().unwrap();
    assert!(iat >= before && iat <= after);
    assert_eq!(exp, iat + 30 * 86_400);
}

#[test]
fn gen_without_expiration() {
    let store = tempfile::tempdir().unwrap();
    let signer = common::provision(store.path(), "seidan:test", "primary", KeyFamily::EcP256);
    let host_key = common::host_key(KeyFamily::Ed25519);

    let output = seidan(store.path(), &["gen", "host1", &host_key]);

    assert!(output.status.success());
    let decoded = common::verify(stdout(&output).trim_end(), &signer);
    assert!(decoded.payload.get("exp").is_none());
}

#[test]
fn gen_without_cluster_key() {
    let store = tempfile::tempdir().unwrap();
    common::provision(store.path(), "seidan:prod", "primary", KeyFamily::EcP256);
    let host_key = common::host_key(KeyFamily::EcP256);

    let output = seidan(store.path(), &["gen", "host1", &host_key, "30"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no keys"));
}

#[test]
fn gen_with_invalid_host_key() {
    let store = tempfile::tempdir().unwrap();
    common::provision(store.path(), "seidan:test", "primary", KeyFamily::EcP256);

    let output = seidan(store.path(), &["gen", "host1", "not*base64url", "30"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn gen_with_missing_arguments_prints_usage() {
    let store = tempfile::tempdir().unwrap();

    let output = seidan(store.path(), &["gen", "host1"]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("Usage: "));
    assert!(out.trim_end().ends_with("gen name key [expiration]"));
}

#[test]
fn gen_with_malformed_expiration() {
    let store = tempfile::tempdir().unwrap();
    common::provision(store.path(), "seidan:test", "primary", KeyFamily::Ed25519);
    let host_key = common::host_key(KeyFamily::Ed25519);

    let output = seidan(store.path(), &["gen", "host1", &host_key, "soon"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn no_command_prints_usage() {
    let store = tempfile::tempdir().unwrap();

    let output = seidan(store.path(), &[]);

    assert!(output.status.success());
    assert!(stdout(&output).trim_end().ends_with(" command"));
}

#[test]
fn unknown_command_fails() {
    let store = tempfile::tempdir().unwrap();

    let output = seidan(store.path(), &["rotate"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no valid command provided"));
}

#[test]
fn kid_prints_signer_identifier() {
    let store = tempfile::tempdir().unwrap();
    let signer = common::provision(store.path(), "seidan:test", "primary", KeyFamily::Ed25519);
    let host_key = common::host_key(KeyFamily::Ed25519);

    let kid = seidan(store.path(), &["KID"]);
    let token = seidan(store.path(), &["gen", "host1", &host_key]);

    assert!(kid.status.success());
    let decoded = common::verify(stdout(&token).trim_end(), &signer);
    assert_eq!(decoded.header["kid"], stdout(&kid).trim_end());
}

#[test]
fn gen_accepts_hyphenated_name() {
    let store = tempfile::tempdir().unwrap();
    let signer = common::provision(store.path(), "seidan:test", "primary", KeyFamily::Ed25519);
    let host_key = common::host_key(KeyFamily::Ed25519);

    let output = seidan(store.path(), &["gen", "-edge1", &host_key]);

    assert!(output.status.success());
    let decoded = common::verify(stdout(&output).trim_end(), &signer);
    assert_eq!(decoded.payload["nam"], "-edge1");
}

#[cfg(unix)]
#[test]
fn non_utf8_cluster_does_not_fall_back_to_default() {
    use std::os::unix::ffi::OsStrExt;

    let store = tempfile::tempdir().unwrap();
    common::provision(store.path(), "seidan:default", "primary", KeyFamily::Ed25519);
    let host_key = common::host_key(KeyFamily::Ed25519);

    let output = seidan_in_cluster(
        OsStr::from_bytes(b"prod\xff"),
        store.path(),
        &["gen", "host1", &host_key],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid CLUSTER"));
}

#[test]
fn diagnostics_are_plain_text_when_captured() {
    let store = tempfile::tempdir().unwrap();

    let output = seidan(store.path(), &["rotate"]);

    assert!(!output.stderr.contains(&0x1b));
}
