// SPDX-License-Identifier: Apache-2.0

//! Clauses that rule out integer solutions the search already rejected.

use std::fmt;

use crate::formula::{render_int, Var};

/// `NOT` of the conjunction of one model's equalities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegatedSolution {
    equalities: Vec<String>,
}

impl NegatedSolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, var: &Var, value: i64) {
        self.equalities
            .push(format!("({} = {})", var, render_int(value)));
    }

    pub fn is_empty(&self) -> bool {
        self.equalities.is_empty()
    }
}

impl fmt::Display for NegatedSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.equalities.as_slice() {
            [] => write!(f, "FALSE"),
            [single] => write!(f, "(NOT {})", single),
            many => write!(f, "(NOT ({}))", many.join(" AND ")),
        }
    }
}

/// Accumulated hypothesis sent alongside each integer-mode request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    clauses: Vec<NegatedSolution>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: NegatedSolution) {
        self.clauses.push(clause);
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for Exclusions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_equality() {
        let mut n = NegatedSolution::new();
        n.push(&Var::plain("x"), 10);
        assert_eq!(n.to_string(), "(NOT (x = 10))");
    }

    #[test]
    fn test_conjoined_clauses() {
        let mut first = NegatedSolution::new();
        first.push(&Var::length("s"), 1);
        first.push(&Var::plain("y"), -2);
        let mut second = NegatedSolution::new();
        second.push(&Var::length("s"), 3);

        let mut all = Exclusions::new();
        all.push(first);
        all.push(second);
        assert_eq!(
            all.to_string(),
            "(NOT ((s__length = 1) AND (y = (0 - 2)))) AND (NOT (s__length = 3))"
        );
    }
}
