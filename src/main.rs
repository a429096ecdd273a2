// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The main galphot binary.

use clap::Parser;

use galphot::Galphot;

fn main() {
    // Run galphot, only performing extra steps if it returns an error.
    if let Err(e) = Galphot::parse().run() {
        // Errors are logged where possible, but the logger may not have been
        // set up yet.
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
