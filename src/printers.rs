// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tree-style printers for reports. Everything goes through `log`, so reports
//! respect the verbosity the user asked for.

use std::{borrow::Cow, sync::Mutex};

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

lazy_static::lazy_static! {
    static ref WARNINGS: Mutex<Vec<Vec<Cow<'static, str>>>> = Mutex::new(vec![]);
}

/// Prefix each line of each block with a tree symbol. The first line of a
/// block gets a branch; the last block's single line closes the tree.
fn tree_lines(blocks: &[Vec<Cow<'static, str>>]) -> Vec<String> {
    let num_blocks = blocks.len();
    let mut lines = vec![];
    for (i_block, block) in blocks.iter().enumerate() {
        let num_lines = block.len();
        for (i_line, line) in block.iter().enumerate() {
            let symbol = match (i_line, i_line + 1 == num_lines, i_block + 1 == num_blocks) {
                (0, false, _) | (0, _, false) => VERTICAL_AND_RIGHT,
                (0, true, true) => UP_AND_RIGHT,
                _ => VERTICAL,
            };
            lines.push(format!("{symbol} {line}"));
        }
    }
    lines
}

pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        tree_lines(&self.blocks)
    }

    pub(crate) fn display(self) {
        log::info!("{}", console::style(&self.title).bold());
        for line in self.lines() {
            log::info!("{line}");
        }
        log::info!("");
    }
}

pub(crate) trait Warn {
    fn warn(self);
}

fn push_warning(block: Vec<Cow<'static, str>>) {
    // A poisoned lock only means another thread panicked mid-push.
    let mut warnings = WARNINGS.lock().unwrap_or_else(|e| e.into_inner());
    warnings.push(block);
}

impl Warn for &'static str {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for String {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        push_warning(self);
    }
}

/// Print out any warnings that have been collected, then forget them.
pub(crate) fn display_warnings() {
    let mut warnings = WARNINGS.lock().unwrap_or_else(|e| e.into_inner());
    log::debug!("Displaying {} warnings", warnings.len());
    if warnings.is_empty() {
        return;
    }

    log::warn!("{}", console::style("Warnings").bold());
    for line in tree_lines(&warnings) {
        log::warn!("{line}");
    }
    log::warn!("");
    warnings.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_symbols() {
        let mut printer = InfoPrinter::new("Galaxy".into());
        printer.push_line("IAUNAME : J095641.38+005057.1".into());
        printer.push_block(vec!["ZDIST : 0.02134".into(), "87.7 Mpc".into()]);
        printer.push_block(vec![]);
        printer.push_line("D4000 : 1.23".into());
        assert_eq!(
            printer.lines(),
            [
                "├ IAUNAME : J095641.38+005057.1",
                "├ ZDIST : 0.02134",
                "│ 87.7 Mpc",
                "└ D4000 : 1.23",
            ]
        );
    }
}
