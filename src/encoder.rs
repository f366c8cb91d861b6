// SPDX-License-Identifier: Apache-2.0

//! Builds the request text for the decision procedure.
//!
//! A request looks like:
//!
//! ```text
//! x : INT;
//! s__length : INT;
//! ASSERT (s__length >= 0);
//! ASSERT (NOT (s__length = 1));
//! CHECKSAT ((x > 0) AND (s__length > 1));
//! COUNTERMODEL;
//! ```

use std::collections::BTreeSet;

use crate::exclusion::Exclusions;
use crate::formula::{Assignment, Mode, SymbolicFormula, Var};

/// Largest UTF-16 code unit a character variable may take.
pub const MAX_CHAR_CODE: i64 = 0xFFFF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverRequest {
    pub mode: Mode,
    pub text: String,
    pub free_vars: BTreeSet<Var>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// The formula is already true under the assignment; nothing to ask.
    Trivial,
    Request(SolverRequest),
}

pub fn encode<F: SymbolicFormula>(
    formula: &F,
    mode: Mode,
    assignment: &Assignment,
    extra: Option<&Exclusions>,
) -> Encoding {
    let rendered = formula.substitute(assignment).render(mode, assignment);
    if rendered.is_true() {
        return Encoding::Trivial;
    }

    let mut text = String::new();
    for var in &rendered.free_vars {
        text.push_str(&format!("{} : INT;\n", var));
    }
    for var in &rendered.free_vars {
        match var {
            Var::Plain(_) => {}
            Var::StringLength(_) => text.push_str(&format!("ASSERT ({} >= 0);\n", var)),
            Var::StringChar(..) => text.push_str(&format!(
                "ASSERT (({} >= 0) AND ({} <= {}));\n",
                var, var, MAX_CHAR_CODE
            )),
        }
    }
    if let Some(extra) = extra.filter(|e| !e.is_empty()) {
        text.push_str(&format!("ASSERT {};\n", extra));
    }
    text.push_str(&format!("CHECKSAT {};\n", rendered.text));
    text.push_str("COUNTERMODEL;\n");

    Encoding::Request(SolverRequest {
        mode,
        text,
        free_vars: rendered.free_vars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::NegatedSolution;
    use crate::formula::{CmpOp, Formula, Term};
    use pretty_assertions::assert_eq;

    fn flipped_formula() -> Formula {
        Formula::cmp(CmpOp::Gt, Term::var("x"), Term::int(0))
            .and(Formula::cmp(CmpOp::Lt, Term::var("x"), Term::int(10)).not())
    }

    fn request(encoding: Encoding) -> SolverRequest {
        match encoding {
            Encoding::Request(r) => r,
            Encoding::Trivial => panic!("expected a solver request"),
        }
    }

    #[test]
    fn test_integer_request_text() {
        let r = request(encode(
            &flipped_formula(),
            Mode::Integer,
            &Assignment::new(),
            None,
        ));
        assert_eq!(
            r.text,
            "x : INT;\nCHECKSAT ((x > 0) AND (NOT (x < 10)));\nCOUNTERMODEL;\n"
        );
        assert_eq!(r.mode, Mode::Integer);
    }

    #[test]
    fn test_extra_hypothesis_precedes_query() {
        let mut clause = NegatedSolution::new();
        clause.push(&Var::plain("x"), 10);
        let mut extra = Exclusions::new();
        extra.push(clause);
        let r = request(encode(
            &flipped_formula(),
            Mode::Integer,
            &Assignment::new(),
            Some(&extra),
        ));
        assert_eq!(
            r.text,
            "x : INT;\nASSERT (NOT (x = 10));\nCHECKSAT ((x > 0) AND (NOT (x < 10)));\nCOUNTERMODEL;\n"
        );
    }

    #[test]
    fn test_empty_exclusions_are_omitted() {
        let r = request(encode(
            &flipped_formula(),
            Mode::Integer,
            &Assignment::new(),
            Some(&Exclusions::new()),
        ));
        assert!(!r.text.contains("ASSERT"));
    }

    #[test]
    fn test_satisfied_formula_is_trivial() {
        let mut a = Assignment::new();
        a.insert(Var::plain("x"), 12);
        assert_eq!(
            encode(&flipped_formula(), Mode::String, &a, None),
            Encoding::Trivial
        );
        assert_eq!(
            encode(&Formula::True, Mode::Integer, &Assignment::new(), None),
            Encoding::Trivial
        );
    }

    #[test]
    fn test_string_helpers_get_domain_constraints() {
        let f = Formula::str_eq("s", "a");
        let r = request(encode(&f, Mode::Integer, &Assignment::new(), None));
        assert_eq!(
            r.text,
            "s__length : INT;\nASSERT (s__length >= 0);\nCHECKSAT (s__length = 1);\nCOUNTERMODEL;\n"
        );

        let mut a = Assignment::new();
        a.insert(Var::length("s"), 1);
        let r = request(encode(&f, Mode::String, &a, None));
        assert_eq!(
            r.text,
            "s__0 : INT;\nASSERT ((s__0 >= 0) AND (s__0 <= 65535));\nCHECKSAT (s__0 = 97);\nCOUNTERMODEL;\n"
        );
    }
}
