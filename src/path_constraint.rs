// SPDX-License-Identifier: Apache-2.0

//! Branch decisions recorded during one concrete run, and the flipped
//! formulas derived from them.

use log::info;
use serde::{Deserialize, Serialize};

use crate::formula::SymbolicFormula;
use crate::pathflip_error::PathflipError;
use crate::solve_driver::{SolveDriver, SolveOutcome};
use crate::solver_process::DecisionProcedure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch<F> {
    pub index: usize,
    pub condition: F,
}

/// Ordered, append-only list of branch conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathConstraint<F> {
    branches: Vec<Branch<F>>,
}

impl<F> Default for PathConstraint<F> {
    fn default() -> Self {
        Self {
            branches: Vec::new(),
        }
    }
}

impl<F: SymbolicFormula> PathConstraint<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, condition: F) {
        self.branches.push(Branch { index, condition });
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn branches(&self) -> &[Branch<F>] {
        &self.branches
    }

    /// `cond_0 AND ... AND cond_{i-1} AND NOT cond_i`.
    pub fn negated_at(&self, i: usize) -> Result<F, PathflipError> {
        let target = self
            .branches
            .get(i)
            .ok_or(PathflipError::BranchOutOfRange {
                index: i,
                len: self.branches.len(),
            })?;
        let flipped = target.condition.clone().not();
        Ok(self.branches[..i]
            .iter()
            .rev()
            .fold(flipped, |acc, branch| branch.condition.clone().and(acc)))
    }

    /// Searches for inputs that follow this path up to branch `i` and then
    /// take the other side of it.
    pub fn solve_flipped<P: DecisionProcedure>(
        &self,
        i: usize,
        driver: &SolveDriver<P>,
    ) -> Result<SolveOutcome, PathflipError> {
        let formula = self.negated_at(i)?;
        info!(
            "flipping branch {} of {} (site {})",
            i,
            self.branches.len(),
            self.branches[i].index
        );
        driver.generate_inputs(&formula)
    }
}

impl<F> FromIterator<Branch<F>> for PathConstraint<F> {
    fn from_iter<I: IntoIterator<Item = Branch<F>>>(iter: I) -> Self {
        Self {
            branches: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feasibility::is_feasible;
    use crate::formula::{Assignment, CmpOp, Formula, Mode, Term, Var};
    use crate::solve_driver::tests::ScriptedProcedure;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn gt(name: &str, value: i64) -> Formula {
        Formula::cmp(CmpOp::Gt, Term::var(name), Term::int(value))
    }

    fn three_branches() -> PathConstraint<Formula> {
        let mut pc = PathConstraint::new();
        pc.push(11, gt("x", 0));
        pc.push(17, Formula::cmp(CmpOp::Lt, Term::var("x"), Term::int(10)));
        pc.push(23, gt("y", 5));
        pc
    }

    #[test]
    fn test_first_branch_is_plain_negation() {
        let pc = three_branches();
        assert_eq!(pc.negated_at(0).unwrap(), gt("x", 0).not());
    }

    #[test]
    fn test_negation_keeps_prefix() {
        let pc = three_branches();
        let expected = Formula::cmp(CmpOp::Lt, Term::var("x"), Term::int(10))
            .and(gt("y", 5).not());
        assert_eq!(pc.negated_at(2).unwrap(), gt("x", 0).and(expected));
        assert_eq!(
            pc.negated_at(2)
                .unwrap()
                .render(Mode::Integer, &Assignment::new())
                .text,
            "((x > 0) AND (x < 10) AND (NOT (y > 5)))"
        );
    }

    #[test]
    fn test_index_past_end() {
        let pc = three_branches();
        assert!(matches!(
            pc.negated_at(3),
            Err(PathflipError::BranchOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test_case(0, &[("x", -1), ("y", 0)] ; "flip first")]
    #[test_case(1, &[("x", 10), ("y", 0)] ; "flip second")]
    #[test_case(2, &[("x", 3), ("y", 5)] ; "flip third")]
    fn test_solution_follows_prefix_then_flips(i: usize, values: &[(&str, i64)]) {
        let pc = three_branches();
        let inputs: Assignment = values
            .iter()
            .map(|(n, v)| (Var::plain(*n), (*v).into()))
            .collect();
        assert!(is_feasible(&pc.negated_at(i).unwrap(), &inputs, None));
        for branch in &pc.branches()[..i] {
            assert!(is_feasible(&branch.condition, &inputs, None));
        }
        assert!(!is_feasible(&pc.branches()[i].condition, &inputs, None));
    }

    #[test]
    fn test_solve_flipped_delegates() {
        let driver = SolveDriver::new(ScriptedProcedure::new(&["Satisfiable.\nASSERT (x = 10);\n"]));
        let pc = three_branches();
        let outcome = pc.solve_flipped(1, &driver).unwrap();
        match outcome {
            SolveOutcome::Satisfiable { inputs, .. } => {
                assert_eq!(inputs.get_int(&Var::plain("x")), Some(10));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        let requests = driver.procedure().requests.borrow();
        assert_eq!(
            requests[0].text,
            "x : INT;\nCHECKSAT ((x > 0) AND (NOT (x < 10)));\nCOUNTERMODEL;\n"
        );
    }

    #[test]
    fn test_json_shape() {
        let json = r#"[{"index": 4, "condition": {"op": "cmp", "cmp": "gt", "lhs": {"op": "var", "name": "x"}, "rhs": {"op": "const", "value": 0}}}]"#;
        let pc: PathConstraint<Formula> = serde_json::from_str(json).unwrap();
        assert_eq!(pc.len(), 1);
        assert_eq!(pc.branches()[0].index, 4);
        assert_eq!(pc.branches()[0].condition, gt("x", 0));
    }
}
