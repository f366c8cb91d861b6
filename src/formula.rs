// SPDX-License-Identifier: Apache-2.0

//! Symbolic formulas over integer and string inputs.
//!
//! The decision procedure only reasons about integers, so a string input `s`
//! is encoded as an integer length `s__length` plus one integer character code
//! `s__<i>` per position. Rendering happens in one of two modes:
//!
//! - [`Mode::Integer`]: string constraints are abstracted to constraints over
//!   lengths only.
//! - [`Mode::String`]: lengths are fixed by the assignment passed to
//!   [`SymbolicFormula::render`] and character-level constraints are emitted
//!   over the `s__<i>` variables that exist for those lengths.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SEPARATOR: &str = "__";
const LENGTH_SUFFIX: &str = "length";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    Integer,
    String,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Integer => write!(f, "integer"),
            Mode::String => write!(f, "string"),
        }
    }
}

/// A solver-level variable, tagged with the role it plays.
///
/// The textual form (`x`, `s__length`, `s__3`) only exists on the wire; inside
/// the crate roles are always carried by the variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Var {
    Plain(String),
    StringLength(String),
    StringChar(String, usize),
}

impl Var {
    pub fn plain(name: impl Into<String>) -> Self {
        Var::Plain(name.into())
    }

    pub fn length(name: impl Into<String>) -> Self {
        Var::StringLength(name.into())
    }

    pub fn char_at(name: impl Into<String>, index: usize) -> Self {
        Var::StringChar(name.into(), index)
    }

    /// Name of the program input this variable belongs to.
    pub fn base_name(&self) -> &str {
        match self {
            Var::Plain(name) | Var::StringLength(name) | Var::StringChar(name, _) => name,
        }
    }

    /// True for the length/character variables that encode a string.
    pub fn is_helper(&self) -> bool {
        !matches!(self, Var::Plain(_))
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Plain(name) => write!(f, "{}", name),
            Var::StringLength(name) => write!(f, "{}{}{}", name, SEPARATOR, LENGTH_SUFFIX),
            Var::StringChar(name, index) => write!(f, "{}{}{}", name, SEPARATOR, index),
        }
    }
}

impl FromStr for Var {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((base, suffix)) = s.rsplit_once(SEPARATOR) {
            if !base.is_empty() {
                if suffix == LENGTH_SUFFIX {
                    return Ok(Var::StringLength(base.to_string()));
                }
                if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(index) = suffix.parse::<usize>() {
                        return Ok(Var::StringChar(base.to_string(), index));
                    }
                }
            }
        }
        Ok(Var::Plain(s.to_string()))
    }
}

impl Serialize for Var {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Var {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(text.parse::<Var>().unwrap_or_else(|never| match never {}))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

/// Concrete values for some set of variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    values: BTreeMap<Var, Value>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, var: Var, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(var, value.into())
    }

    pub fn get(&self, var: &Var) -> Option<&Value> {
        self.values.get(var)
    }

    pub fn get_int(&self, var: &Var) -> Option<i64> {
        match self.values.get(var) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, var: &Var) -> Option<&str> {
        match self.values.get(var) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn contains(&self, var: &Var) -> bool {
        self.values.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Value)> {
        self.values.iter()
    }

    /// Copies every entry of `other` into `self`; entries of `other` win.
    pub fn extend(&mut self, other: Assignment) {
        self.values.extend(other.values);
    }

    /// Length in UTF-16 code units of string `name`, if the assignment fixes
    /// it either directly or through its length variable.
    pub fn string_length(&self, name: &str) -> Option<i64> {
        if let Some(s) = self.get_str(&Var::plain(name)) {
            return Some(s.encode_utf16().count() as i64);
        }
        self.get_int(&Var::length(name))
    }
}

impl FromIterator<(Var, Value)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Var, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Text handed to the decision procedure plus the variables it mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub free_vars: BTreeSet<Var>,
}

impl Rendered {
    pub fn is_true(&self) -> bool {
        self.text == TRUE_TEXT
    }
}

/// The interface the solver engine needs from a formula representation.
pub trait SymbolicFormula: Clone {
    fn constant_true() -> Self;

    fn is_true(&self) -> bool;

    fn and(self, other: Self) -> Self;

    fn not(self) -> Self;

    /// Replaces variables fixed by `assignment` with their values and
    /// simplifies.
    fn substitute(&self, assignment: &Assignment) -> Self;

    fn render(&self, mode: Mode, assignment: &Assignment) -> Rendered;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn eval(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "/=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    // Comparisons against an out-of-range character behave like NaN.
    fn eval_undefined(self) -> bool {
        self == CmpOp::Ne
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithOp {
    Add,
    Sub,
    Mul,
}

impl ArithOp {
    fn fold(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            ArithOp::Add => lhs.checked_add(rhs),
            ArithOp::Sub => lhs.checked_sub(rhs),
            ArithOp::Mul => lhs.checked_mul(rhs),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Term {
    Const { value: i64 },
    Var { name: String },
    Length { string: String },
    CharCodeAt { string: String, index: usize },
    Add { lhs: Box<Term>, rhs: Box<Term> },
    Sub { lhs: Box<Term>, rhs: Box<Term> },
    Mul { lhs: Box<Term>, rhs: Box<Term> },
    /// Result of reading past the end of a string.
    Undefined,
}

impl Term {
    pub fn int(value: i64) -> Self {
        Term::Const { value }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Var { name: name.into() }
    }

    pub fn length(string: impl Into<String>) -> Self {
        Term::Length {
            string: string.into(),
        }
    }

    pub fn char_code_at(string: impl Into<String>, index: usize) -> Self {
        Term::CharCodeAt {
            string: string.into(),
            index,
        }
    }

    fn arith(op: ArithOp, lhs: Term, rhs: Term) -> Term {
        match (&lhs, &rhs) {
            (Term::Undefined, _) | (_, Term::Undefined) => return Term::Undefined,
            (Term::Const { value: l }, Term::Const { value: r }) => {
                if let Some(value) = op.fold(*l, *r) {
                    return Term::Const { value };
                }
            }
            _ => {}
        }
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match op {
            ArithOp::Add => Term::Add { lhs, rhs },
            ArithOp::Sub => Term::Sub { lhs, rhs },
            ArithOp::Mul => Term::Mul { lhs, rhs },
        }
    }

    fn substitute(&self, assignment: &Assignment) -> Term {
        match self {
            Term::Const { .. } | Term::Undefined => self.clone(),
            Term::Var { name } => match assignment.get(&Var::plain(name.as_str())) {
                Some(Value::Int(value)) => Term::int(*value),
                _ => self.clone(),
            },
            Term::Length { string } => match assignment.string_length(string) {
                Some(len) => Term::int(len),
                None => self.clone(),
            },
            Term::CharCodeAt { string, index } => {
                if let Some(s) = assignment.get_str(&Var::plain(string.as_str())) {
                    return match s.encode_utf16().nth(*index) {
                        Some(unit) => Term::int(i64::from(unit)),
                        None => Term::Undefined,
                    };
                }
                if let Some(len) = assignment.string_length(string) {
                    if i64::try_from(*index).map_or(true, |i| i >= len) {
                        return Term::Undefined;
                    }
                }
                match assignment.get_int(&Var::char_at(string.as_str(), *index)) {
                    Some(code) => Term::int(code),
                    None => self.clone(),
                }
            }
            Term::Add { lhs, rhs } => Term::arith(
                ArithOp::Add,
                lhs.substitute(assignment),
                rhs.substitute(assignment),
            ),
            Term::Sub { lhs, rhs } => Term::arith(
                ArithOp::Sub,
                lhs.substitute(assignment),
                rhs.substitute(assignment),
            ),
            Term::Mul { lhs, rhs } => Term::arith(
                ArithOp::Mul,
                lhs.substitute(assignment),
                rhs.substitute(assignment),
            ),
        }
    }

    fn is_undefined(&self) -> bool {
        match self {
            Term::Undefined => true,
            Term::Add { lhs, rhs } | Term::Sub { lhs, rhs } | Term::Mul { lhs, rhs } => {
                lhs.is_undefined() || rhs.is_undefined()
            }
            _ => false,
        }
    }

    fn collect_char_refs(&self, out: &mut BTreeSet<(String, usize)>) {
        match self {
            Term::CharCodeAt { string, index } => {
                out.insert((string.clone(), *index));
            }
            Term::Add { lhs, rhs } | Term::Sub { lhs, rhs } | Term::Mul { lhs, rhs } => {
                lhs.collect_char_refs(out);
                rhs.collect_char_refs(out);
            }
            _ => {}
        }
    }
}

impl std::ops::Add for Term {
    type Output = Term;

    fn add(self, rhs: Term) -> Term {
        Term::Add {
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }
}

impl std::ops::Sub for Term {
    type Output = Term;

    fn sub(self, rhs: Term) -> Term {
        Term::Sub {
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }
}

impl std::ops::Mul for Term {
    type Output = Term;

    fn mul(self, rhs: Term) -> Term {
        Term::Mul {
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Formula {
    True,
    False,
    Cmp { cmp: CmpOp, lhs: Term, rhs: Term },
    /// String variable `string` equals `literal`.
    StrEq { string: String, literal: String },
    Not { arg: Box<Formula> },
    And { args: Vec<Formula> },
    Or { args: Vec<Formula> },
}

impl Formula {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Formula::True
        } else {
            Formula::False
        }
    }

    pub fn cmp(cmp: CmpOp, lhs: Term, rhs: Term) -> Self {
        Formula::Cmp { cmp, lhs, rhs }
    }

    pub fn str_eq(string: impl Into<String>, literal: impl Into<String>) -> Self {
        Formula::StrEq {
            string: string.into(),
            literal: literal.into(),
        }
    }

    /// Conjunction with constant folding; nested conjunctions are flattened.
    pub fn conjunction(parts: impl IntoIterator<Item = Formula>) -> Self {
        let mut args = Vec::new();
        for part in parts {
            match part {
                Formula::True => {}
                Formula::False => return Formula::False,
                Formula::And { args: inner } => args.extend(inner),
                other => args.push(other),
            }
        }
        match args.len() {
            0 => Formula::True,
            1 => args.remove(0),
            _ => Formula::And { args },
        }
    }

    /// Disjunction with constant folding; nested disjunctions are flattened.
    pub fn disjunction(parts: impl IntoIterator<Item = Formula>) -> Self {
        let mut args = Vec::new();
        for part in parts {
            match part {
                Formula::False => {}
                Formula::True => return Formula::True,
                Formula::Or { args: inner } => args.extend(inner),
                other => args.push(other),
            }
        }
        match args.len() {
            0 => Formula::False,
            1 => args.remove(0),
            _ => Formula::Or { args },
        }
    }

    pub fn negation(self) -> Self {
        match self {
            Formula::True => Formula::False,
            Formula::False => Formula::True,
            Formula::Not { arg } => *arg,
            other => Formula::Not {
                arg: Box::new(other),
            },
        }
    }

    fn substitute_str_eq(string: &str, literal: &str, assignment: &Assignment) -> Formula {
        if let Some(s) = assignment.get_str(&Var::plain(string)) {
            return Formula::from_bool(s == literal);
        }
        let units: Vec<u16> = literal.encode_utf16().collect();
        if let Some(len) = assignment.string_length(string) {
            if len != units.len() as i64 {
                return Formula::False;
            }
        }
        let mut all_known = assignment.string_length(string).is_some();
        for (i, unit) in units.iter().enumerate() {
            match assignment.get_int(&Var::char_at(string, i)) {
                Some(code) if code == i64::from(*unit) => {}
                Some(_) => return Formula::False,
                None => all_known = false,
            }
        }
        if all_known {
            Formula::True
        } else {
            Formula::str_eq(string, literal)
        }
    }
}

impl SymbolicFormula for Formula {
    fn constant_true() -> Self {
        Formula::True
    }

    fn is_true(&self) -> bool {
        matches!(self, Formula::True)
    }

    fn and(self, other: Self) -> Self {
        Formula::And {
            args: vec![self, other],
        }
    }

    fn not(self) -> Self {
        Formula::Not {
            arg: Box::new(self),
        }
    }

    fn substitute(&self, assignment: &Assignment) -> Self {
        match self {
            Formula::True | Formula::False => self.clone(),
            Formula::Cmp { cmp, lhs, rhs } => {
                let lhs = lhs.substitute(assignment);
                let rhs = rhs.substitute(assignment);
                if lhs.is_undefined() || rhs.is_undefined() {
                    return Formula::from_bool(cmp.eval_undefined());
                }
                match (&lhs, &rhs) {
                    (Term::Const { value: l }, Term::Const { value: r }) => {
                        Formula::from_bool(cmp.eval(*l, *r))
                    }
                    _ => Formula::cmp(*cmp, lhs, rhs),
                }
            }
            Formula::StrEq { string, literal } => {
                Formula::substitute_str_eq(string, literal, assignment)
            }
            Formula::Not { arg } => arg.substitute(assignment).negation(),
            Formula::And { args } => {
                Formula::conjunction(args.iter().map(|f| f.substitute(assignment)))
            }
            Formula::Or { args } => {
                Formula::disjunction(args.iter().map(|f| f.substitute(assignment)))
            }
        }
    }

    fn render(&self, mode: Mode, assignment: &Assignment) -> Rendered {
        let simplified = self.substitute(assignment);
        let mut renderer = Renderer {
            mode,
            assignment,
            free_vars: BTreeSet::new(),
        };
        let text = renderer.formula(&simplified, true).into_text();
        Rendered {
            text,
            free_vars: renderer.free_vars,
        }
    }
}

const TRUE_TEXT: &str = "TRUE";
const FALSE_TEXT: &str = "FALSE";

/// Renders an integer literal in a form the presentation language accepts.
pub(crate) fn render_int(value: i64) -> String {
    if value < 0 {
        format!("(0 - {})", i128::from(value).abs())
    } else {
        value.to_string()
    }
}

enum Lit {
    Const(bool),
    Text(String),
}

impl Lit {
    fn negate(self) -> Lit {
        match self {
            Lit::Const(b) => Lit::Const(!b),
            Lit::Text(t) => Lit::Text(format!("(NOT {})", t)),
        }
    }

    fn into_text(self) -> String {
        match self {
            Lit::Const(true) => TRUE_TEXT.to_string(),
            Lit::Const(false) => FALSE_TEXT.to_string(),
            Lit::Text(t) => t,
        }
    }

    fn join(parts: Vec<Lit>, conjunctive: bool) -> Lit {
        let mut texts = Vec::new();
        for part in parts {
            match part {
                Lit::Const(b) if b == conjunctive => {}
                Lit::Const(b) => return Lit::Const(b),
                Lit::Text(t) => texts.push(t),
            }
        }
        match texts.len() {
            0 => Lit::Const(conjunctive),
            1 => Lit::Text(texts.remove(0)),
            _ => {
                let sep = if conjunctive { " AND " } else { " OR " };
                Lit::Text(format!("({})", texts.join(sep)))
            }
        }
    }
}

struct Renderer<'a> {
    mode: Mode,
    assignment: &'a Assignment,
    free_vars: BTreeSet<Var>,
}

impl Renderer<'_> {
    fn formula(&mut self, f: &Formula, positive: bool) -> Lit {
        match f {
            Formula::True => Lit::Const(positive),
            Formula::False => Lit::Const(!positive),
            Formula::Not { arg } => self.formula(arg, !positive),
            Formula::And { args } => {
                let parts = args.iter().map(|a| self.formula(a, positive)).collect();
                Lit::join(parts, positive)
            }
            Formula::Or { args } => {
                let parts = args.iter().map(|a| self.formula(a, positive)).collect();
                Lit::join(parts, !positive)
            }
            Formula::Cmp { cmp, lhs, rhs } => self.cmp(*cmp, lhs, rhs, positive),
            Formula::StrEq { string, literal } => self.str_eq(string, literal, positive),
        }
    }

    fn cmp(&mut self, cmp: CmpOp, lhs: &Term, rhs: &Term, positive: bool) -> Lit {
        if lhs.is_undefined() || rhs.is_undefined() {
            return Lit::Const(cmp.eval_undefined() == positive);
        }
        if self.mode == Mode::Integer {
            let mut refs = BTreeSet::new();
            lhs.collect_char_refs(&mut refs);
            rhs.collect_char_refs(&mut refs);
            if !refs.is_empty() {
                let holds_when_out_of_range = cmp.eval_undefined() == positive;
                return self.char_abstraction(&refs, !holds_when_out_of_range);
            }
        }
        let text = format!("({} {} {})", self.term(lhs), cmp.symbol(), self.term(rhs));
        let lit = Lit::Text(text);
        if positive {
            lit
        } else {
            lit.negate()
        }
    }

    // In integer mode a character-level atom only constrains lengths. When an
    // out-of-range access would falsify the literal, every referenced
    // position must exist; otherwise each string merely needs a length.
    fn char_abstraction(&mut self, refs: &BTreeSet<(String, usize)>, needs_positions: bool) -> Lit {
        let parts = if needs_positions {
            refs.iter()
                .map(|(string, index)| {
                    let index = i64::try_from(*index).unwrap_or(i64::MAX);
                    self.length_atom(string, CmpOp::Gt, index)
                })
                .collect()
        } else {
            let strings: BTreeSet<&String> = refs.iter().map(|(s, _)| s).collect();
            strings
                .into_iter()
                .map(|string| self.length_atom(string, CmpOp::Ge, 0))
                .collect()
        };
        Lit::join(parts, true)
    }

    fn str_eq(&mut self, string: &str, literal: &str, positive: bool) -> Lit {
        let units: Vec<u16> = literal.encode_utf16().collect();
        match self.mode {
            Mode::Integer => {
                if positive {
                    self.length_atom(string, CmpOp::Eq, units.len() as i64)
                } else {
                    self.length_atom(string, CmpOp::Ge, 0)
                }
            }
            Mode::String => {
                let mut parts = Vec::with_capacity(units.len() + 1);
                if self.assignment.string_length(string).is_none() {
                    parts.push(self.length_atom(string, CmpOp::Eq, units.len() as i64));
                }
                for (i, unit) in units.iter().enumerate() {
                    let code = i64::from(*unit);
                    let var = Var::char_at(string, i);
                    match self.assignment.get_int(&var) {
                        Some(known) => parts.push(Lit::Const(known == code)),
                        None => {
                            let text = format!("({} = {})", var, code);
                            self.free_vars.insert(var);
                            parts.push(Lit::Text(text));
                        }
                    }
                }
                let lit = Lit::join(parts, true);
                if positive {
                    lit
                } else {
                    lit.negate()
                }
            }
        }
    }

    fn length_atom(&mut self, string: &str, cmp: CmpOp, rhs: i64) -> Lit {
        match self.assignment.string_length(string) {
            Some(len) => Lit::Const(cmp.eval(len, rhs)),
            None => {
                let var = Var::length(string);
                let text = format!("({} {} {})", var, cmp.symbol(), render_int(rhs));
                self.free_vars.insert(var);
                Lit::Text(text)
            }
        }
    }

    fn term(&mut self, t: &Term) -> String {
        match t {
            Term::Const { value } => render_int(*value),
            Term::Var { name } => {
                let var = Var::plain(name.as_str());
                let text = var.to_string();
                self.free_vars.insert(var);
                text
            }
            Term::Length { string } => match self.assignment.string_length(string) {
                Some(len) => render_int(len),
                None => {
                    let var = Var::length(string.as_str());
                    let text = var.to_string();
                    self.free_vars.insert(var);
                    text
                }
            },
            Term::CharCodeAt { string, index } => {
                let var = Var::char_at(string.as_str(), *index);
                let text = var.to_string();
                self.free_vars.insert(var);
                text
            }
            Term::Add { lhs, rhs } => self.arith(ArithOp::Add, lhs, rhs),
            Term::Sub { lhs, rhs } => self.arith(ArithOp::Sub, lhs, rhs),
            Term::Mul { lhs, rhs } => self.arith(ArithOp::Mul, lhs, rhs),
            // Atoms over undefined terms are decided before rendering.
            Term::Undefined => FALSE_TEXT.to_string(),
        }
    }

    fn arith(&mut self, op: ArithOp, lhs: &Term, rhs: &Term) -> String {
        format!("({} {} {})", self.term(lhs), op.symbol(), self.term(rhs))
    }
}
