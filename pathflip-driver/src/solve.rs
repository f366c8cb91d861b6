// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::ArgMatches;
use pathflip::{Assignment, Formula, PathConstraint, ProcessSolver, SolveDriver, SolveOutcome};

use crate::common::{bool_flag, parse_flag, read_json};
use crate::report_cli_error::report_cli_error_and_exit;
use crate::solver_config::{get_recorder, get_solve_options, get_solver_config, PathflipConfig};

fn solve(matches: &ArgMatches, config: &Option<PathflipConfig>) -> anyhow::Result<serde_json::Value> {
    let pc_path = matches
        .get_one::<String>("path_constraint")
        .context("missing path constraint file")?;
    let branch = parse_flag::<usize>(matches, "branch")?.context("missing --branch")?;
    let pc: PathConstraint<Formula> = read_json(pc_path, "path constraint")?;

    let solver = ProcessSolver::new(get_solver_config(matches, config)?)?;
    log::info!("using decision procedure {}", solver.exe().display());
    let driver = SolveDriver::with_options(solver, get_solve_options(matches, config)?);
    let outcome = pc.solve_flipped(branch, &driver)?;

    let mut result = serde_json::to_value(&outcome).context("serializing outcome")?;
    if let SolveOutcome::Satisfiable { inputs, .. } = &outcome {
        if bool_flag(matches, "record").unwrap_or(false) {
            let original: Assignment = match matches.get_one::<String>("inputs") {
                Some(path) => read_json(path, "original inputs")?,
                None => inputs.clone(),
            };
            let index = parse_flag::<usize>(matches, "solution_index")?.unwrap_or(0);
            let record = get_recorder(matches, config)?.write_inputs(inputs, &original, index)?;
            result["recorded_run"] = serde_json::json!(record.run);
            result["record_file"] = serde_json::json!(record.path.display().to_string());
        }
    }
    Ok(result)
}

pub fn handle_solve(matches: &ArgMatches, config: &Option<PathflipConfig>) {
    match solve(matches, config) {
        Ok(result) => println!("{}", result),
        Err(e) => report_cli_error_and_exit(&format!("{:#}", e), Some("solve"), vec![]),
    }
}
