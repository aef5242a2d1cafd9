//! Command-line behaviour of the pass-server binary.

mod support;

use predicates::prelude::*;
use support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();
    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_list_prints_identifiers() {
    let t = Test::with_secrets(STANDARD_SECRETS);
    let output = t.list();

    assert_success(&output);
    assert_stdout_contains(&output, "example.com/alice");
    assert_stdout_contains(&output, "work/github.com/carol");
    assert_stdout_excludes(&output, "PGP MESSAGE");
}

#[test]
fn test_list_json_has_records() {
    let t = Test::with_secrets(STANDARD_SECRETS);
    let output = t.list_json();
    assert_success(&output);

    let records: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), STANDARD_SECRETS.len());
    for record in records {
        for field in ["domain", "path", "username", "username_normalized"] {
            assert!(record.get(field).is_some(), "missing {}", field);
        }
    }
}

#[test]
fn test_list_empty_store() {
    let t = Test::new();
    let output = t.list();

    assert_success(&output);
    assert_stderr_contains(&output, "no secrets found");
}

#[test]
fn test_list_store_flag_overrides_env() {
    let t = Test::new();
    let other = Test::with_secrets(STANDARD_SECRETS);

    t.cmd()
        .args(["--store"])
        .arg(other.root())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com/bob"));
}

#[test]
fn test_index_without_gpg_id_fails() {
    let t = Test::bare();
    t.secret("example.com/alice.gpg", b"x");

    t.cmd()
        .arg("index")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("✗ unable to load password store"))
        .stderr(predicate::str::contains(".gpg-id"));
}

#[test]
fn test_index_with_missing_gpg_binary_fails() {
    let t = Test::with_secrets(STANDARD_SECRETS);
    let config = t.config("[gpg]\nbinary = \"definitely-not-gpg-pass-server\"\n");

    t.cmd()
        .arg("--config")
        .arg(&config)
        .arg("index")
        .assert()
        .failure()
        .stderr(predicate::str::contains("gpg binary not found"))
        .stderr(predicate::str::contains("install GnuPG"));
}

#[test]
fn test_bad_config_file_fails() {
    let t = Test::new();
    let config = t.config("[store\n");

    t.cmd()
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_serve_rejects_bad_bind() {
    let t = Test::new();

    t.cmd()
        .args(["serve", "--bind", "not-an-address"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid bind address"));
}
