// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use indoc::indoc;
use tempfile::TempDir;

use crate::{galphot, get_cmd_output, write_file};

const ALLWISE_EXTRACT: &str = indoc! {"
    designation,ra,dec,w4mpro,w4sigmpro
    J100000.00-020000.0,150.0,-2.0,6.5,0.1
    J093000.00+010000.0,142.5,1.0,8.0,
"};

const GALEX_EXTRACT: &str = indoc! {"
    ra,dec,fuv_mag,fuv_magerr
    150.0,-2.0,19.5,0.08
"};

#[test]
fn w4_flux_from_an_extract() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let extract = write_file(tmp_dir.path(), "allwise.csv", ALLWISE_EXTRACT);
    let output = tmp_dir.path().join("w4.json");

    #[rustfmt::skip]
    let cmd = galphot()
        .args([
            "w4-flux",
            "--ra", "150.0", "142.5",
            "--dec", "-2.0", "1.0",
            "--distance", "80", "90",
            "--allwise-csv", &extract.display().to_string(),
            "--output", &output.display().to_string(),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "w4-flux failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("W4 results"));

    let records: Vec<serde_json::Value> =
        serde_json::from_reader(std::fs::File::open(output).unwrap()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["distance_mpc"], 90.0);
    assert!(records[0]["w4_lum"].as_f64().unwrap() > 0.0);
}

#[test]
fn fuv_flux_with_an_args_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let extract = write_file(tmp_dir.path(), "galex.csv", GALEX_EXTRACT);
    let output = tmp_dir.path().join("fuv.csv");
    let args_file = write_file(
        tmp_dir.path(),
        "fuv.toml",
        &format!(
            indoc! {r#"
                galex_csv = "{}"
                output = "{}"

                [sources]
                ra = [150.0, 10.0]
                dec = [-2.0, 10.0]
                distance = [100.0, 100.0]
            "#},
            extract.display(),
            output.display()
        ),
    );
    let saved = tmp_dir.path().join("saved.toml");

    #[rustfmt::skip]
    let cmd = galphot()
        .args([
            "fuv-flux",
            &args_file.display().to_string(),
            "--little-h", "0.7",
            "--save-toml", &saved.display().to_string(),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "fuv-flux failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    // The second source has no GALEX counterpart.
    assert!(stdout.contains("No FUV magnitude"));

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][3], "19.5");
    assert_eq!(&rows[1][3], "");

    let saved = std::fs::read_to_string(saved).unwrap();
    assert!(saved.contains("little_h = 0.7"));
    assert!(saved.contains("[sources]"));
}

#[test]
fn missing_distances_fail() {
    #[rustfmt::skip]
    let cmd = galphot()
        .args([
            "w4-flux",
            "--ra", "150.0",
            "--dec", "-2.0",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("--distance"), "unexpected stderr: {stderr}");
}

#[test]
fn dry_runs_need_no_network() {
    #[rustfmt::skip]
    let cmd = galphot()
        .args([
            "fuv-flux",
            "--ra", "150.0",
            "--dec", "-2.0",
            "--distance", "100",
            "--mast-url", "http://localhost:1/invoke",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "fuv-flux --dry-run failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("http://localhost:1/invoke"));
    assert!(stdout.contains("Dry run"));
}
