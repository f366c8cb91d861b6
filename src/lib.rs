// SPDX-License-Identifier: Apache-2.0

//! Concolic input generation: flip one branch of a recorded path, ask an
//! external decision procedure for inputs that take the other side, and
//! record them for the next run.

pub mod encoder;
pub mod exclusion;
pub mod feasibility;
pub mod formula;
pub mod path_constraint;
pub mod pathflip_error;
pub mod reify;
pub mod run_recorder;
pub mod solution_parser;
pub mod solve_driver;
pub mod solver_process;

pub use encoder::{encode, Encoding, SolverRequest};
pub use feasibility::is_feasible;
pub use formula::{Assignment, CmpOp, Formula, Mode, SymbolicFormula, Term, Value, Var};
pub use path_constraint::{Branch, PathConstraint};
pub use pathflip_error::PathflipError;
pub use reify::{reify_strings, DEFAULT_FILL_CHAR};
pub use run_recorder::{RecorderConfig, RunRecord, RunRecorder};
pub use solve_driver::{SolveDriver, SolveOptions, SolveOutcome, UnknownReason, MAX_TRIALS};
pub use solver_process::{DecisionProcedure, ProcessSolver, SolverConfig, SolverSession};
