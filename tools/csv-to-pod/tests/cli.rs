//! Integration tests for the csv-to-pod converter.
//!
//! Each test writes fixture CSVs into a temporary directory, invokes
//! the binary via `assert_cmd`, and checks outputs and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;

use ticket_pod::pod::{Pod, PodValue};

const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

fn csv_to_pod() -> Command {
    Command::cargo_bin("csv-to-pod").expect("csv-to-pod binary not found")
}

fn read_output(path: &std::path::Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(path).expect("open output csv");
    assert_eq!(
        reader.headers().expect("headers"),
        &csv::StringRecord::from(vec!["EMAIL", "POD"])
    );
    reader.records().map(|r| r.expect("record")).collect()
}

#[test]
fn converts_attendees_to_signed_pods() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("attendees.csv");
    std::fs::write(
        &input,
        "attendeeName,attendeeEmail,ticketName,ticketSecret,ticketId\n\
         Ada,ada@example.com,GA,s3cret,t-1\n\
         Bob,bob@example.com,GA,hunter2,t-2\n",
    )
    .unwrap();
    let output = dir.path().join("pods.csv");

    csv_to_pod()
        .args([input.to_str().unwrap(), KEY, output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 attendees"))
        .stdout(predicate::str::contains("Created POD for ada@example.com"))
        .stdout(predicate::str::contains("Created POD for bob@example.com"));

    let rows = read_output(&output);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(0), Some("ada@example.com"));

    let pod = Pod::from_json_str(rows[0].get(1).expect("pod cell")).expect("pod json");
    assert!(pod.verify_signature());
    assert_eq!(
        pod.entries.get("attendeeName"),
        Some(&PodValue::String("Ada".to_owned()))
    );
    assert_eq!(
        pod.entries.get("eventName"),
        Some(&PodValue::String("Devcon 7".to_owned()))
    );
    assert_eq!(pod.entries.len(), 17);
}

#[test]
fn accepts_snake_case_headers() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("attendees.csv");
    std::fs::write(
        &input,
        "attendee_name,attendee_email,ticket_name,ticket_secret,ticket_id\n\
         Ada,ada@example.com,GA,s3cret,t-1\n",
    )
    .unwrap();
    let output = dir.path().join("pods.csv");

    csv_to_pod()
        .args([input.to_str().unwrap(), KEY, output.to_str().unwrap()])
        .assert()
        .success();

    let rows = read_output(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0), Some("ada@example.com"));
}

#[test]
fn missing_required_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("attendees.csv");
    // No ticketSecret column in either spelling.
    std::fs::write(
        &input,
        "attendeeName,attendeeEmail,ticketName,ticketId\nAda,ada@example.com,GA,t-1\n",
    )
    .unwrap();
    let output = dir.path().join("pods.csv");

    csv_to_pod()
        .args([input.to_str().unwrap(), KEY, output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required column ticketSecret"));
    assert!(!output.exists());
}

#[test]
fn missing_input_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("pods.csv");

    csv_to_pod()
        .args([
            dir.path().join("nope.csv").to_str().unwrap(),
            KEY,
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read input csv"));
}

#[test]
fn header_only_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("attendees.csv");
    std::fs::write(
        &input,
        "attendeeName,attendeeEmail,ticketName,ticketSecret,ticketId\n",
    )
    .unwrap();
    let output = dir.path().join("pods.csv");

    csv_to_pod()
        .args([input.to_str().unwrap(), KEY, output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no attendees found"));
}

#[test]
fn invalid_key_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("attendees.csv");
    std::fs::write(
        &input,
        "attendeeName,attendeeEmail,ticketName,ticketSecret,ticketId\n\
         Ada,ada@example.com,GA,s3cret,t-1\n",
    )
    .unwrap();

    csv_to_pod()
        .args([
            input.to_str().unwrap(),
            "not-a-key",
            dir.path().join("pods.csv").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid signer private key"));
}

#[test]
fn wrong_argument_count_is_fatal() {
    csv_to_pod().args(["only-one-arg"]).assert().failure();
}
