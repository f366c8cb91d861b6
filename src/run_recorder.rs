// SPDX-License-Identifier: Apache-2.0

//! Persists chosen inputs so the replay harness can pick them up.
//!
//! Every call to [`RunRecorder::write_inputs`] produces one record file
//! `<inputs_file_prefix><N>` holding replay instructions, and advances the
//! counter stored in `<tail_file_name>` to `N`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use regex::Regex;
use tempfile::NamedTempFile;

use crate::formula::{Assignment, Value, Var};
use crate::pathflip_error::PathflipError;

pub const DEFAULT_INSTRUCTION_PREFIX: &str = "$7";
pub const DEFAULT_INPUT_PATTERN: &str = "x";
pub const DEFAULT_TAIL_FILE_NAME: &str = "pathflip_tail";
pub const DEFAULT_INPUTS_FILE_PREFIX: &str = "pathflip_inputs";

#[derive(Debug, Clone)]
pub struct RecorderConfig {
    pub tail_file_name: String,
    pub inputs_file_prefix: String,
    /// Receiver the replay instructions are called on.
    pub instruction_prefix: String,
    /// Only plain inputs whose name matches are replayed.
    pub input_pattern: Regex,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            tail_file_name: DEFAULT_TAIL_FILE_NAME.to_string(),
            inputs_file_prefix: DEFAULT_INPUTS_FILE_PREFIX.to_string(),
            instruction_prefix: DEFAULT_INSTRUCTION_PREFIX.to_string(),
            input_pattern: Regex::new(DEFAULT_INPUT_PATTERN)
                .expect("default input pattern is a valid regex"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub run: u64,
    pub path: PathBuf,
}

pub struct RunRecorder {
    dir: PathBuf,
    config: RecorderConfig,
}

impl RunRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_config(dir, RecorderConfig::default())
    }

    pub fn with_config(dir: impl Into<PathBuf>, config: RecorderConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    pub fn tail_path(&self) -> PathBuf {
        self.dir.join(&self.config.tail_file_name)
    }

    pub fn record_path(&self, run: u64) -> PathBuf {
        self.dir
            .join(format!("{}{}", self.config.inputs_file_prefix, run))
    }

    /// Index of the most recently recorded run, or -1 if there is none.
    ///
    /// An unreadable or corrupt counter is treated as missing.
    pub fn current_run(&self) -> i64 {
        let path = self.tail_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => return -1,
        };
        match serde_json::from_str::<i64>(text.trim()) {
            Ok(n) if n >= -1 => n,
            Ok(n) => {
                warn!("run counter {} in {} is negative; restarting at 0", n, path.display());
                -1
            }
            Err(e) => {
                warn!("corrupt run counter in {}: {}; restarting at 0", path.display(), e);
                -1
            }
        }
    }

    pub fn write_inputs(
        &self,
        current_solution: &Assignment,
        inputs: &Assignment,
        index: usize,
    ) -> Result<RunRecord, PathflipError> {
        let run = self
            .current_run()
            .checked_add(1)
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| PathflipError::RunCounterExhausted {
                path: self.tail_path(),
            })?;
        let path = self.record_path(run);

        let file = File::create(&path)
            .map_err(|e| PathflipError::io(format!("creating {}", path.display()), e))?;
        let mut writer = BufWriter::new(file);
        self.write_instructions(&mut writer, current_solution, inputs, index)
            .map_err(|e| PathflipError::io(format!("writing {}", path.display()), e))?;
        let file = writer
            .into_inner()
            .map_err(|e| PathflipError::io(format!("flushing {}", path.display()), e.into_error()))?;
        file.sync_all()
            .map_err(|e| PathflipError::io(format!("syncing {}", path.display()), e))?;

        self.persist_counter(run)?;
        info!("recorded run {} to {}", run, path.display());
        Ok(RunRecord { run, path })
    }

    fn write_instructions(
        &self,
        w: &mut impl Write,
        current_solution: &Assignment,
        inputs: &Assignment,
        index: usize,
    ) -> Result<(), std::io::Error> {
        let p = &self.config.instruction_prefix;
        writeln!(w, "{}.setCurrentSolutionIndex({});", p, index)?;
        let solution = serde_json::to_string(current_solution).map_err(std::io::Error::other)?;
        writeln!(w, "{}.setCurrentSolution({});", p, solution)?;
        for (var, value) in inputs.iter() {
            let Var::Plain(name) = var else {
                continue;
            };
            // Names with the helper separator are never program inputs.
            if name.contains("__") || !self.config.input_pattern.is_match(name) {
                continue;
            }
            let value = current_solution.get(var).unwrap_or(value);
            writeln!(
                w,
                "{}.setInput({},{});",
                p,
                json_string(name)?,
                json_value(value)?
            )?;
        }
        Ok(())
    }

    fn persist_counter(&self, run: u64) -> Result<(), PathflipError> {
        let tail = self.tail_path();
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .map_err(|e| PathflipError::io(format!("creating temp file in {}", self.dir.display()), e))?;
        let text = serde_json::to_string(&run)
            .map_err(|e| PathflipError::json("serializing run counter", e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| PathflipError::io(format!("writing {}", tail.display()), e))?;
        tmp.persist(&tail)
            .map_err(|e| PathflipError::io(format!("replacing {}", tail.display()), e.error))?;
        Ok(())
    }
}

fn json_string(s: &str) -> Result<String, std::io::Error> {
    serde_json::to_string(s).map_err(std::io::Error::other)
}

fn json_value(v: &Value) -> Result<String, std::io::Error> {
    serde_json::to_string(v).map_err(std::io::Error::other)
}
