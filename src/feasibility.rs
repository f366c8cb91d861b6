// SPDX-License-Identifier: Apache-2.0

use crate::formula::{Assignment, SymbolicFormula};

/// Whether `formula` already holds under `old_inputs` overridden by
/// `new_inputs`. Decided by substitution alone; no solver is involved.
pub fn is_feasible<F: SymbolicFormula>(
    formula: &F,
    new_inputs: &Assignment,
    old_inputs: Option<&Assignment>,
) -> bool {
    let merged = match old_inputs {
        Some(old) => {
            let mut merged = old.clone();
            merged.extend(new_inputs.clone());
            merged
        }
        None => new_inputs.clone(),
    };
    formula.substitute(&merged).is_true()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{CmpOp, Formula, Term, Var};

    fn between_formula() -> Formula {
        Formula::cmp(CmpOp::Gt, Term::var("x"), Term::int(0))
            .and(Formula::cmp(CmpOp::Lt, Term::var("y"), Term::var("x")))
    }

    #[test]
    fn test_new_inputs_override_old() {
        let mut old = Assignment::new();
        old.insert(Var::plain("x"), -1);
        old.insert(Var::plain("y"), 0);
        assert!(!is_feasible(&between_formula(), &Assignment::new(), Some(&old)));

        let mut new = Assignment::new();
        new.insert(Var::plain("x"), 5);
        assert!(is_feasible(&between_formula(), &new, Some(&old)));
    }

    #[test]
    fn test_partial_assignment_is_not_enough() {
        let mut new = Assignment::new();
        new.insert(Var::plain("x"), 5);
        assert!(!is_feasible(&between_formula(), &new, None));
    }

    #[test]
    fn test_reified_strings_satisfy_string_constraints() {
        let f = Formula::str_eq("s", "ok").and(Formula::cmp(
            CmpOp::Eq,
            Term::length("s"),
            Term::int(2),
        ));
        let mut new = Assignment::new();
        new.insert(Var::plain("s"), "ok");
        assert!(is_feasible(&f, &new, None));
        new.insert(Var::plain("s"), "no!");
        assert!(!is_feasible(&f, &new, None));
    }

    #[test]
    fn test_constant_true_is_always_feasible() {
        assert!(is_feasible(&Formula::True, &Assignment::new(), None));
    }
}
