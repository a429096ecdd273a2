// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Catalog services are stood in for by CSV extracts, so these tests don't
//! need a network.

mod nsa;
mod photometry;

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

fn galphot() -> Command {
    Command::cargo_bin("galphot").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).expect("couldn't create a test file");
    f.write_all(contents.as_bytes())
        .expect("couldn't write a test file");
    path
}

#[test]
fn help_lists_subcommands() {
    let cmd = galphot().arg("--help").ok();
    assert!(cmd.is_ok(), "{:?}", cmd.err());
    let (stdout, _) = get_cmd_output(cmd);
    for sub_command in ["w4-flux", "fuv-flux", "nsa-search", "nsa-summary"] {
        assert!(stdout.contains(sub_command), "no {sub_command} in help");
    }
}

#[test]
fn version_is_printed() {
    let cmd = galphot().arg("--version").ok();
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
