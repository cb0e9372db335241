use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

use interstellar_trip_calculator::export::sweep::write_csv;
use interstellar_trip_calculator::integrator::{IntegratorOptions, TripParameters};
use interstellar_trip_calculator::propulsion::{ReactionDrive, Vehicle};
use interstellar_trip_calculator::sweep::{ExhaustSweep, run_sweep};

#[test]
fn sweep_plot_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("sweep.csv");
    let png_path = dir.path().join("sweep.png");

    let base = TripParameters::from_light_years(
        10.0,
        100.0,
        &Vehicle::new("hull", 1.0e6),
        ReactionDrive::from_fraction_c(0.3),
    );
    let options = IntegratorOptions::default().with_time_step(86_400.0);
    let rows = run_sweep(&base, &ExhaustSweep::new(0.3, 0.2, 1.0), &options).expect("sweep");
    assert_eq!(rows.len(), 4);
    write_csv(&csv_path, &rows).expect("csv");

    Command::cargo_bin("sweep_plot")
        .expect("sweep_plot bin")
        .arg("--input")
        .arg(&csv_path)
        .arg("--output")
        .arg(&png_path)
        .args(["--width", "400", "--height", "300"])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn sweep_plot_rejects_empty_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("empty.csv");
    write_csv(&csv_path, &[]).expect("csv");

    Command::cargo_bin("sweep_plot")
        .expect("sweep_plot bin")
        .arg("--input")
        .arg(&csv_path)
        .arg("--output")
        .arg(dir.path().join("empty.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No plottable sweep rows"));
    assert!(!dir.path().join("empty.png").exists());
}
