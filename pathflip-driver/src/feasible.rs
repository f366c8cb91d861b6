// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::ArgMatches;
use pathflip::{is_feasible, Assignment, Formula};

use crate::common::read_json;
use crate::report_cli_error::report_cli_error_and_exit;

fn feasible(matches: &ArgMatches) -> anyhow::Result<bool> {
    let formula_path = matches
        .get_one::<String>("formula")
        .context("missing formula file")?;
    let formula: Formula = read_json(formula_path, "formula")?;
    let new_inputs: Assignment = read_json(
        matches.get_one::<String>("new").context("missing --new")?,
        "new inputs",
    )?;
    let old_inputs: Option<Assignment> = match matches.get_one::<String>("old") {
        Some(path) => Some(read_json(path, "old inputs")?),
        None => None,
    };
    Ok(is_feasible(&formula, &new_inputs, old_inputs.as_ref()))
}

pub fn handle_feasible(matches: &ArgMatches) {
    match feasible(matches) {
        Ok(answer) => println!("{}", answer),
        Err(e) => report_cli_error_and_exit(&format!("{:#}", e), Some("feasible"), vec![]),
    }
}
