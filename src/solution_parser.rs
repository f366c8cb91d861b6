// SPDX-License-Identifier: Apache-2.0

//! Parses the decision procedure's response.
//!
//! The first line carries the verdict; after `Satisfiable` every non-blank
//! line must be a model assignment of the form `ASSERT (NAME = VALUE);`.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::exclusion::NegatedSolution;
use crate::formula::{Assignment, Var};
use crate::pathflip_error::PathflipError;

static MODEL_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ASSERT\s*\(\s*([A-Za-z_][A-Za-z0-9_']*)\s*=\s*(\(?\s*-?\s*[0-9]+\s*\)?)\s*\)\s*;$")
        .unwrap()
});

#[derive(Debug, PartialEq)]
pub enum SolverResponse {
    Sat(Model),
    Unsat,
    Unknown,
}

/// A satisfying assignment and the clause that excludes exactly it.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub assignment: Assignment,
    pub negated: NegatedSolution,
}

pub fn parse_response(text: &str) -> Result<SolverResponse, PathflipError> {
    let mut lines = text.lines().enumerate();
    let status = match lines.next() {
        Some((_, line)) => line.trim(),
        None => {
            warn!("empty solver response; treating as unsatisfiable");
            return Ok(SolverResponse::Unsat);
        }
    };
    match status.trim_end_matches('.') {
        "Satisfiable" => {}
        "Unsatisfiable" => return Ok(SolverResponse::Unsat),
        "Unknown" => return Ok(SolverResponse::Unknown),
        other => {
            warn!(
                "unrecognized solver verdict {:?}; treating as unsatisfiable",
                other
            );
            return Ok(SolverResponse::Unsat);
        }
    }

    let mut assignment = Assignment::new();
    let mut negated = NegatedSolution::new();
    for (i, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let violation = || PathflipError::ProtocolViolation {
            line_no: i + 1,
            line: line.to_string(),
        };
        let caps = MODEL_LINE_RE.captures(line).ok_or_else(violation)?;
        let var: Var = caps[1]
            .parse()
            .unwrap_or_else(|never: std::convert::Infallible| match never {});
        let digits: String = caps[2]
            .chars()
            .filter(|c| *c == '-' || c.is_ascii_digit())
            .collect();
        let value: i64 = digits.parse().map_err(|_| violation())?;
        negated.push(&var, value);
        assignment.insert(var, value);
    }
    Ok(SolverResponse::Sat(Model {
        assignment,
        negated,
    }))
}
