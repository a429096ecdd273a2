// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use indoc::indoc;
use tempfile::TempDir;

use crate::{galphot, get_cmd_output, write_file};

const NSA_101: &str = indoc! {r#"
    [
        {"IAUNAME": "J000000.00+000000.0", "NSAID": 0, "RA": 0, "DEC": 0, "Z": 0,
         "ZDIST": 0, "SERSIC_N": 0, "SERSIC_ABSMAG": [0, 0, 0, 0, 0, 0, 0],
         "ELPETRO_TH50_R": 0, "ELPETRO_MASS": 0},
        {"IAUNAME": "J100000.00+020000.0", "NSAID": 31, "RA": 150.0, "DEC": 2.0,
         "Z": 0.031, "ZDIST": 0.031, "SERSIC_N": 2.25,
         "SERSIC_ABSMAG": [-16.0, -18.0, -19.0, -19.5, -19.8, -20.0, -20.5],
         "ELPETRO_TH50_R": 3.0004, "ELPETRO_MASS": 16851777651.03729}
    ]
"#};

#[test]
fn nsa_search_prints_the_row() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let table = write_file(tmp_dir.path(), "nsa_v1_0_1.json", NSA_101);

    #[rustfmt::skip]
    let cmd = galphot()
        .args([
            "nsa-search",
            "--table", &table.display().to_string(),
            "--name", "J100000.00+020000.0",
        ])
        .ok();
    assert!(cmd.is_ok(), "nsa-search failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("NSAID : 31"));
    assert!(stdout.contains("ELPETRO_MASS : 16851777651.03729"));
}

#[test]
fn nsa_summary_of_a_v101_galaxy() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let table = write_file(tmp_dir.path(), "nsa_v1_0_1.json", NSA_101);
    let output = tmp_dir.path().join("summary.json");

    #[rustfmt::skip]
    let cmd = galphot()
        .args([
            "nsa-summary",
            "--table", &table.display().to_string(),
            "--nsaid", "31",
            "--kind", "v1.0.1",
            "--output", &output.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "nsa-summary failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("SERSIC_ABSMAG g-band: -18 / FUV-band: -20.5"));

    let records: Vec<serde_json::Value> =
        serde_json::from_reader(std::fs::File::open(output).unwrap()).unwrap();
    assert_eq!(records.len(), 9);
    let mass = records
        .iter()
        .find(|r| r["name"] == "ELPETRO_MASS")
        .expect("no ELPETRO_MASS in the summary");
    assert_eq!(mass["value"], 10.5);
}

#[test]
fn nsa_summary_without_a_match() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let table = write_file(tmp_dir.path(), "nsa_v1_0_1.json", NSA_101);

    // Row 0 is never reported by default.
    #[rustfmt::skip]
    let cmd = galphot()
        .args([
            "nsa-summary",
            "--table", &table.display().to_string(),
            "--nsaid", "0",
            "--kind", "v1.0.1",
        ])
        .ok();
    assert!(cmd.is_ok(), "nsa-summary failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("No matches for 0"));
}

#[test]
fn bad_nsaids_fail() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let table = write_file(tmp_dir.path(), "nsa_v1_0_1.json", NSA_101);

    #[rustfmt::skip]
    let cmd = galphot()
        .args([
            "nsa-search",
            "--table", &table.display().to_string(),
            "--nsaid", "thirty-one",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("not a valid NSAID"), "unexpected stderr: {stderr}");
}
