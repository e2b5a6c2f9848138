//! CLI tests for the `tc` binary

use assert_cmd::Command;
use predicates::prelude::*;

fn tc() -> Command {
    Command::cargo_bin("tc").expect("tc binary builds")
}

#[test]
fn test_new_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let trip_path = dir.path().join("kyoto.json");

    tc().args([
        "new",
        "Kyoto",
        "--start",
        "2025-06-01",
        "--end",
        "2025-06-03",
        "-o",
    ])
    .arg(&trip_path)
    .assert()
    .success()
    .stdout(predicate::str::contains("3 days"));

    tc().arg("show")
        .arg(&trip_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Kyoto"))
        .stdout(predicate::str::contains("Day 1"))
        .stdout(predicate::str::contains("2025-06-01 to 2025-06-03"));
}

#[test]
fn test_show_json_format() {
    let dir = tempfile::tempdir().unwrap();
    let trip_path = dir.path().join("trip.json");

    tc().args(["new", "Lisbon", "-o"]).arg(&trip_path).assert().success();

    tc().args(["show", "--format", "json"])
        .arg(&trip_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"destination\": \"Lisbon\""));
}

#[test]
fn test_new_rejects_inverted_dates() {
    let dir = tempfile::tempdir().unwrap();
    let trip_path = dir.path().join("bad.json");

    tc().args(["new", "Nowhere", "--start", "2025-06-10", "--end", "2025-06-01", "-o"])
        .arg(&trip_path)
        .assert()
        .failure();
}

#[test]
fn test_merge_booking_reports_day() {
    let dir = tempfile::tempdir().unwrap();
    let trip_path = dir.path().join("trip.json");
    let booking_path = dir.path().join("booking.json");

    tc().args([
        "new",
        "Tokyo",
        "--start",
        "2025-06-01",
        "--end",
        "2025-06-03",
        "-o",
    ])
    .arg(&trip_path)
    .assert()
    .success();

    std::fs::write(
        &booking_path,
        r#"{
            "origin": "SFO",
            "destination": "NRT",
            "departDate": "2025-06-01",
            "returnDate": "2025-06-03",
            "airline": "ANA",
            "flightNumber": "NH107",
            "passengers": 2,
            "totalPrice": 2400
        }"#,
    )
    .unwrap();

    tc().arg("merge-booking")
        .arg(&trip_path)
        .arg("--booking")
        .arg(&booking_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Outbound flight placed on day 1"))
        .stdout(predicate::str::contains("Flight: SFO → NRT"));

    // The merged trip was written back in place
    let saved = std::fs::read_to_string(&trip_path).unwrap();
    assert!(saved.contains("Flight: NRT → SFO"));
}

#[test]
fn test_show_missing_file_fails() {
    tc().args(["show", "/nonexistent/trip.json"]).assert().failure();
}
