// SPDX-License-Identifier: Apache-2.0

//! Two-phase bounded search for concrete inputs.
//!
//! Each trial first solves the integer abstraction of the formula, which fixes
//! plain integers and the length of every string. The formula is then
//! re-encoded in string mode under those lengths and solved for character
//! codes. When no character-level solution exists for the chosen lengths the
//! integer solution is excluded and the next trial starts over.

use log::{debug, info};
use serde::Serialize;

use crate::encoder::{encode, Encoding, SolverRequest};
use crate::exclusion::Exclusions;
use crate::formula::{Assignment, Mode, SymbolicFormula};
use crate::pathflip_error::PathflipError;
use crate::reify::{reify_strings_with, DEFAULT_FILL_CHAR};
use crate::solution_parser::{parse_response, SolverResponse};
use crate::solver_process::DecisionProcedure;

pub const MAX_TRIALS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SolveOptions {
    pub max_trials: usize,
    pub fill_char: char,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_trials: MAX_TRIALS,
            fill_char: DEFAULT_FILL_CHAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SolveOutcome {
    /// Concrete inputs (including string helper variables) reaching the
    /// target, found on trial number `trials`.
    Satisfiable { inputs: Assignment, trials: usize },
    /// The decision procedure proved the formula unsatisfiable.
    Infeasible,
    /// The search ended without a proof either way.
    Unknown { reason: UnknownReason },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnknownReason {
    TrialsExhausted { trials: usize },
    SolverTimeout { timeout_ms: u64 },
    SolverUnknown,
    /// A string-level failure followed an empty integer model, so there was
    /// nothing to exclude.
    NoProgress,
}

pub struct SolveDriver<P: DecisionProcedure> {
    procedure: P,
    options: SolveOptions,
}

impl<P: DecisionProcedure> SolveDriver<P> {
    pub fn new(procedure: P) -> Self {
        Self::with_options(procedure, SolveOptions::default())
    }

    pub fn with_options(procedure: P, options: SolveOptions) -> Self {
        Self { procedure, options }
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    pub fn procedure(&self) -> &P {
        &self.procedure
    }

    /// Searches for inputs satisfying `formula`.
    ///
    /// Errors are reserved for a broken back-end or an unparseable response;
    /// a timeout is reported as [`UnknownReason::SolverTimeout`].
    pub fn generate_inputs<F: SymbolicFormula>(
        &self,
        formula: &F,
    ) -> Result<SolveOutcome, PathflipError> {
        let mut session = self.procedure.open_session()?;
        match self.search(&mut session, formula) {
            Err(PathflipError::SolverTimeout(timeout)) => {
                info!("solver timed out after {:?}", timeout);
                Ok(SolveOutcome::Unknown {
                    reason: UnknownReason::SolverTimeout {
                        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    },
                })
            }
            other => other,
        }
    }

    fn search<F: SymbolicFormula>(
        &self,
        session: &mut P::Session,
        formula: &F,
    ) -> Result<SolveOutcome, PathflipError> {
        let mut extra = Exclusions::new();
        for trial in 1..=self.options.max_trials {
            let request = match encode(formula, Mode::Integer, &Assignment::new(), Some(&extra)) {
                Encoding::Trivial => {
                    return Ok(SolveOutcome::Satisfiable {
                        inputs: Assignment::new(),
                        trials: trial,
                    })
                }
                Encoding::Request(request) => request,
            };
            let model = match self.invoke(session, &request)? {
                SolverResponse::Sat(model) => model,
                SolverResponse::Unsat => {
                    info!("integer abstraction unsatisfiable on trial #{}", trial);
                    return Ok(SolveOutcome::Infeasible);
                }
                SolverResponse::Unknown => {
                    return Ok(SolveOutcome::Unknown {
                        reason: UnknownReason::SolverUnknown,
                    })
                }
            };

            let mut inputs = model.assignment;
            let strings_solved = match encode(formula, Mode::String, &inputs, None) {
                Encoding::Trivial => true,
                Encoding::Request(request) => match self.invoke(session, &request)? {
                    SolverResponse::Sat(string_model) => {
                        inputs.extend(string_model.assignment);
                        true
                    }
                    SolverResponse::Unsat | SolverResponse::Unknown => false,
                },
            };

            if strings_solved {
                reify_strings_with(&mut inputs, self.options.fill_char);
                if trial > 1 {
                    info!("Solved constraint after trial #{}", trial);
                }
                return Ok(SolveOutcome::Satisfiable {
                    inputs,
                    trials: trial,
                });
            }

            if model.negated.is_empty() {
                return Ok(SolveOutcome::Unknown {
                    reason: UnknownReason::NoProgress,
                });
            }
            debug!(
                "no string solution on trial #{}; excluding {}",
                trial, model.negated
            );
            extra.push(model.negated);
        }
        Ok(SolveOutcome::Unknown {
            reason: UnknownReason::TrialsExhausted {
                trials: self.options.max_trials,
            },
        })
    }

    fn invoke(
        &self,
        session: &mut P::Session,
        request: &SolverRequest,
    ) -> Result<SolverResponse, PathflipError> {
        let text = self.procedure.check(session, request)?;
        parse_response(&text)
    }
}
