//! Command tokens
//!
//! Wire tokens for the execute-command grammar.

use super::Value;

/// Authentication command
pub const AUTH: &str = "A";

/// Open-index command
pub const OPEN_INDEX: &str = "P";

/// Multi-value IN clause marker, placed after limit/offset
pub const IN_CLAUSE: &str = "@";

/// Comparison operators for index scans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl Operator {
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
        }
    }
}

/// Mutating commands appended after the match clauses
///
/// `Insert` doubles as the operator token of a standalone insert request,
/// where the values align with the open-index column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Update,
    Delete,
    Insert,
    Decrement,
}

impl Mutation {
    pub fn token(&self) -> &'static str {
        match self {
            Mutation::Update => "U",
            Mutation::Delete => "D",
            Mutation::Insert => "+",
            Mutation::Decrement => "-",
        }
    }
}

/// Filter clause kinds
///
/// `Filter` skips non-matching rows, `While` stops the scan at the first
/// non-matching row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Filter,
    While,
}

impl FilterType {
    pub fn token(&self) -> &'static str {
        match self {
            FilterType::Filter => "F",
            FilterType::While => "W",
        }
    }
}

impl From<Operator> for Value {
    fn from(op: Operator) -> Self {
        Value::from(op.token())
    }
}

impl From<Mutation> for Value {
    fn from(cmd: Mutation) -> Self {
        Value::from(cmd.token())
    }
}

impl From<FilterType> for Value {
    fn from(ftype: FilterType) -> Self {
        Value::from(ftype.token())
    }
}
