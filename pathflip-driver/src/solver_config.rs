// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use pathflip::run_recorder::{RecorderConfig, RunRecorder};
use pathflip::{SolveOptions, SolverConfig};
use serde::Deserialize;

use crate::common::{bool_flag, parse_flag};

/// Contents of a `pathflip.toml` file.
#[derive(Debug, Default, Deserialize)]
pub struct PathflipConfig {
    pub solver: Option<SolverSection>,
    pub recorder: Option<RecorderSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SolverSection {
    /// Decision procedure binary; looked up on `PATH` when not absolute.
    pub path: Option<String>,

    /// Extra arguments passed to the decision procedure.
    pub args: Option<Vec<String>>,

    /// Per-invocation time budget in milliseconds. Zero disables the timeout.
    pub timeout_ms: Option<u64>,

    /// Directory under which per-call session directories are created.
    pub work_dir: Option<String>,

    /// Leave request/response files behind after each solve.
    pub keep_session_files: Option<bool>,

    pub max_trials: Option<usize>,

    /// Character used for string positions the model leaves unconstrained.
    pub fill_char: Option<char>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecorderSection {
    pub dir: Option<String>,
    pub tail_file_name: Option<String>,
    pub inputs_file_prefix: Option<String>,
    pub instruction_prefix: Option<String>,

    /// Regex selecting which plain inputs get replay instructions.
    pub input_pattern: Option<String>,
}

fn solver_section(config: &Option<PathflipConfig>) -> Option<&SolverSection> {
    config.as_ref().and_then(|c| c.solver.as_ref())
}

fn recorder_section(config: &Option<PathflipConfig>) -> Option<&RecorderSection> {
    config.as_ref().and_then(|c| c.recorder.as_ref())
}

/// Builds the solver configuration from command line flags, falling back to
/// the config file and then to the CVC3 defaults.
pub fn get_solver_config(
    matches: &ArgMatches,
    config: &Option<PathflipConfig>,
) -> anyhow::Result<SolverConfig> {
    let section = solver_section(config);
    let mut solver = SolverConfig::cvc3();

    if let Some(path) = matches
        .get_one::<String>("solver")
        .cloned()
        .or_else(|| section.and_then(|s| s.path.clone()))
    {
        solver = solver.with_solver_path(path);
    }
    if let Some(args) = section.and_then(|s| s.args.clone()) {
        solver.solver_args = args;
    }

    let timeout_ms = match parse_flag::<u64>(matches, "timeout_ms")? {
        Some(ms) => Some(ms),
        None => section.and_then(|s| s.timeout_ms),
    };
    if let Some(ms) = timeout_ms {
        solver = solver.with_timeout(if ms == 0 {
            None
        } else {
            Some(Duration::from_millis(ms))
        });
    }

    if let Some(dir) = matches
        .get_one::<String>("work_dir")
        .cloned()
        .or_else(|| section.and_then(|s| s.work_dir.clone()))
    {
        solver = solver.with_work_dir(dir);
    }
    if let Some(keep) = bool_flag(matches, "keep_session_files")
        .or_else(|| section.and_then(|s| s.keep_session_files))
    {
        solver.keep_session_files = keep;
    }
    Ok(solver)
}

pub fn get_solve_options(
    matches: &ArgMatches,
    config: &Option<PathflipConfig>,
) -> anyhow::Result<SolveOptions> {
    let section = solver_section(config);
    let mut options = SolveOptions::default();
    if let Some(n) = parse_flag::<usize>(matches, "max_trials")?
        .or_else(|| section.and_then(|s| s.max_trials))
    {
        if n == 0 {
            anyhow::bail!("max_trials must be at least 1");
        }
        options.max_trials = n;
    }
    if let Some(c) = parse_flag::<char>(matches, "fill_char")?
        .or_else(|| section.and_then(|s| s.fill_char))
    {
        options.fill_char = c;
    }
    Ok(options)
}

/// Record directory from `--record_dir`, then the config file, then the
/// current directory.
pub fn get_record_dir(matches: &ArgMatches, config: &Option<PathflipConfig>) -> PathBuf {
    matches
        .get_one::<String>("record_dir")
        .cloned()
        .or_else(|| recorder_section(config).and_then(|s| s.dir.clone()))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn get_recorder(
    matches: &ArgMatches,
    config: &Option<PathflipConfig>,
) -> anyhow::Result<RunRecorder> {
    let mut recorder_config = RecorderConfig::default();
    if let Some(section) = recorder_section(config) {
        if let Some(name) = &section.tail_file_name {
            recorder_config.tail_file_name = name.clone();
        }
        if let Some(prefix) = &section.inputs_file_prefix {
            recorder_config.inputs_file_prefix = prefix.clone();
        }
        if let Some(prefix) = &section.instruction_prefix {
            recorder_config.instruction_prefix = prefix.clone();
        }
        if let Some(pattern) = &section.input_pattern {
            recorder_config.input_pattern = regex::Regex::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid recorder input_pattern {:?}: {}", pattern, e))?;
        }
    }
    Ok(RunRecorder::with_config(
        get_record_dir(matches, config),
        recorder_config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matches_for(args: &[&str]) -> ArgMatches {
        clap::Command::new("t")
            .arg(clap::Arg::new("solver").long("solver"))
            .arg(clap::Arg::new("timeout_ms").long("timeout_ms"))
            .arg(clap::Arg::new("work_dir").long("work_dir"))
            .arg(clap::Arg::new("keep_session_files").long("keep_session_files"))
            .arg(clap::Arg::new("max_trials").long("max_trials"))
            .arg(clap::Arg::new("fill_char").long("fill_char"))
            .arg(clap::Arg::new("record_dir").long("record_dir"))
            .get_matches_from(std::iter::once("t").chain(args.iter().copied()))
    }

    fn parse(text: &str) -> Option<PathflipConfig> {
        Some(toml::from_str(text).unwrap())
    }

    #[test]
    fn test_defaults_without_config() {
        let solver = get_solver_config(&matches_for(&[]), &None).unwrap();
        assert_eq!(solver, SolverConfig::cvc3());
        let options = get_solve_options(&matches_for(&[]), &None).unwrap();
        assert_eq!(options, SolveOptions::default());
        assert_eq!(get_record_dir(&matches_for(&[]), &None), PathBuf::from("."));
    }

    #[test]
    fn test_config_file_values() {
        let config = parse(
            r#"
            [solver]
            path = "/opt/cvc3/bin/cvc3"
            args = ["+interactive"]
            timeout_ms = 0
            max_trials = 7
            fill_char = "z"

            [recorder]
            dir = "runs"
            instruction_prefix = "J$"
            "#,
        );
        let solver = get_solver_config(&matches_for(&[]), &config).unwrap();
        assert_eq!(solver.solver_path, PathBuf::from("/opt/cvc3/bin/cvc3"));
        assert_eq!(solver.solver_args, vec!["+interactive".to_string()]);
        assert_eq!(solver.timeout, None);
        let options = get_solve_options(&matches_for(&[]), &config).unwrap();
        assert_eq!(options.max_trials, 7);
        assert_eq!(options.fill_char, 'z');
        let recorder = get_recorder(&matches_for(&[]), &config).unwrap();
        assert_eq!(recorder.dir(), std::path::Path::new("runs"));
        assert_eq!(recorder.config().instruction_prefix, "J$");
    }

    #[test]
    fn test_flags_override_config() {
        let config = parse(
            r#"
            [solver]
            path = "from-config"
            timeout_ms = 5000
            max_trials = 7
            "#,
        );
        let matches = matches_for(&[
            "--solver",
            "from-flag",
            "--timeout_ms",
            "250",
            "--max_trials",
            "3",
            "--keep_session_files",
            "true",
        ]);
        let solver = get_solver_config(&matches, &config).unwrap();
        assert_eq!(solver.solver_path, PathBuf::from("from-flag"));
        assert_eq!(solver.timeout, Some(Duration::from_millis(250)));
        assert!(solver.keep_session_files);
        assert_eq!(get_solve_options(&matches, &config).unwrap().max_trials, 3);
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(get_solve_options(&matches_for(&["--max_trials", "0"]), &None).is_err());
        assert!(get_solve_options(&matches_for(&["--max_trials", "many"]), &None).is_err());
        let config = parse("[recorder]\ninput_pattern = \"(\"\n");
        assert!(get_recorder(&matches_for(&[]), &config).is_err());
    }
}
