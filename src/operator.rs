//! Filter comparison operators

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scanner::Scanner;

/// Comparison operator of a WHERE condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
    Includes,
    Excludes,
}

/// Operator spellings in the order they are tried. Longer forms come first
/// so `NOT IN` wins over `IN` and `INCLUDES` is never read as `IN`.
pub const OPERATOR_PRECEDENCE: &[(&[&str], Operator)] = &[
    (&["NOT", "IN"], Operator::NotIn),
    (&["INCLUDES"], Operator::Includes),
    (&["EXCLUDES"], Operator::Excludes),
    (&["IN"], Operator::In),
    (&["NOT", "LIKE"], Operator::NotLike),
    (&["LIKE"], Operator::Like),
    (&["!="], Operator::NotEq),
    (&["<>"], Operator::NotEq),
    (&["<="], Operator::Le),
    (&[">="], Operator::Ge),
    (&["="], Operator::Eq),
    (&["<"], Operator::Lt),
    (&[">"], Operator::Gt),
];

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Includes => "INCLUDES",
            Operator::Excludes => "EXCLUDES",
        }
    }

    /// Operators whose right-hand side is a parenthesized list or subquery
    pub fn takes_list(&self) -> bool {
        matches!(
            self,
            Operator::In | Operator::NotIn | Operator::Includes | Operator::Excludes
        )
    }

    /// `IN` / `NOT IN`, the only operators accepting a semi-join subquery
    pub fn is_membership(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    pub fn is_like(&self) -> bool {
        matches!(self, Operator::Like | Operator::NotLike)
    }

    /// Match an operator at the scanner's current token, returning it and
    /// the number of tokens it spans
    pub fn match_at(scanner: &Scanner<'_>) -> Option<(Operator, usize)> {
        OPERATOR_PRECEDENCE.iter().find_map(|(words, op)| {
            let matched = words.iter().enumerate().all(|(i, word)| {
                scanner
                    .peek_nth(i)
                    .is_some_and(|t| scanner.text(t).eq_ignore_ascii_case(word))
            });
            matched.then_some((*op, words.len()))
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown operator: {0}")]
pub struct OperatorParseError(pub String);

impl FromStr for Operator {
    type Err = OperatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        let scanner = Scanner::new(&normalized);
        match Operator::match_at(&scanner) {
            Some((op, len)) if scanner.tokens().len() == len => Ok(op),
            _ => Err(OperatorParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = OperatorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}
