// SPDX-License-Identifier: Apache-2.0

//! Command line driver for concolic input generation.
//!
//! Commands are given like:
//!
//! ```text
//! pathflip-driver <global-options> <command> <command-args-and-options>
//! ```
//!
//! Commands are:
//!
//! - solve: Flips one branch of a path constraint and solves for inputs that
//!   take the other side, optionally recording them for replay.
//! - feasible: Checks whether known inputs already satisfy a formula.
//! - version: Prints the driver version.
//!
//! Sample usage:
//!
//! ```shell
//! $ pathflip-driver --config=pathflip.toml \
//!     solve path.json --branch 2 --record true --record_dir runs
//! $ pathflip-driver feasible formula.json --new inputs.json
//! ```

mod common;
mod feasible;
mod report_cli_error;
mod solve;
mod solver_config;

use clap::{Arg, ArgAction};

use crate::report_cli_error::report_cli_error_and_exit;
use crate::solver_config::PathflipConfig;

trait AppExt {
    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self;
    fn add_solver_args(self) -> Self;
}

impl AppExt for clap::Command {
    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self {
        (self as clap::Command).arg(
            Arg::new(long)
                .long(long)
                .value_name("BOOL")
                .action(ArgAction::Set)
                .value_parser(["true", "false"])
                .num_args(1)
                .help(help),
        )
    }

    fn add_solver_args(self) -> Self {
        (self as clap::Command)
            .arg(
                Arg::new("solver")
                    .long("solver")
                    .value_name("SOLVER")
                    .help("Decision procedure binary (default: cvc3 on PATH)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("timeout_ms")
                    .long("timeout_ms")
                    .value_name("MILLISECONDS")
                    .help("Time budget per solver invocation; 0 disables it")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("work_dir")
                    .long("work_dir")
                    .value_name("DIR")
                    .help("Directory for solver session files")
                    .action(ArgAction::Set),
            )
            .add_bool_arg(
                "keep_session_files",
                "Keep solver request/response files after solving",
            )
            .arg(
                Arg::new("max_trials")
                    .long("max_trials")
                    .value_name("N")
                    .help("Maximum number of integer solutions to try")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("fill_char")
                    .long("fill_char")
                    .value_name("CHAR")
                    .help("Character for string positions the model leaves open")
                    .action(ArgAction::Set),
            )
    }
}

fn load_config(path: Option<String>) -> Option<PathflipConfig> {
    let mut path = path;

    // If there is no config flag specified, but there is a pathflip.toml in
    // the current directory, use that.
    if path.is_none() {
        if let Ok(cwd) = std::env::current_dir() {
            let cwd_toml_path = cwd.join("pathflip.toml");
            if cwd_toml_path.exists() {
                log::info!(
                    "Using pathflip.toml in current directory: {}",
                    cwd_toml_path.display()
                );
                path = Some(cwd_toml_path.display().to_string());
            }
        }
    }

    path.map(|path| {
        if !std::path::Path::new(&path).exists() {
            let cwd = std::env::current_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_default();
            report_cli_error_and_exit(
                "config toml file does not exist",
                None,
                vec![("path", &path), ("working directory", &cwd)],
            );
        }
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => report_cli_error_and_exit(
                "could not read config toml file",
                None,
                vec![("path", &path), ("error", &e.to_string())],
            ),
        };
        match toml::from_str::<PathflipConfig>(&text) {
            Ok(config) => config,
            Err(e) => report_cli_error_and_exit(
                "could not parse config toml file",
                None,
                vec![("path", &path), ("error", &e.to_string())],
            ),
        }
    })
}

fn main() {
    let _ = env_logger::try_init();

    log::info!(
        "pathflip-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = clap::Command::new("pathflip-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Concolic test-input generation via an external decision procedure")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("CONFIG")
                .help("Path to a pathflip.toml file")
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("solve")
                .about("Solves for inputs that flip one branch of a path constraint")
                .arg(
                    Arg::new("path_constraint")
                        .help("JSON array of {\"index\", \"condition\"} branch records")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("branch")
                        .long("branch")
                        .value_name("I")
                        .help("Position of the branch to flip")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .add_solver_args()
                .add_bool_arg("record", "Record the solution for replay")
                .arg(
                    Arg::new("inputs")
                        .long("inputs")
                        .value_name("JSON")
                        .help("Inputs of the run the path constraint came from")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("solution_index")
                        .long("solution_index")
                        .value_name("K")
                        .help("Solution index written to the run record")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("record_dir")
                        .long("record_dir")
                        .value_name("DIR")
                        .help("Directory holding run records and the run counter")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            clap::Command::new("feasible")
                .about("Checks whether inputs satisfy a formula without invoking a solver")
                .arg(
                    Arg::new("formula")
                        .help("Formula JSON file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("new")
                        .long("new")
                        .value_name("JSON")
                        .help("Assignment to check")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("old")
                        .long("old")
                        .value_name("JSON")
                        .help("Earlier assignment; entries in --new take precedence")
                        .action(ArgAction::Set),
                ),
        )
        .get_matches();

    let config = load_config(matches.get_one::<String>("config").cloned());

    if let Some(matches) = matches.subcommand_matches("solve") {
        solve::handle_solve(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("feasible") {
        feasible::handle_feasible(matches);
    } else if let Some(_matches) = matches.subcommand_matches("version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
    } else {
        report_cli_error_and_exit("No valid subcommand provided.", None, vec![]);
    }
}
