//! Type definitions shared by the matcher, extractor, loader and evaluator.
//!
//! This module contains the token kinds, bracket kinds and binary operators,
//! plus the fixed-capacity string type used for symbol names.

use crate::Real;
use crate::error::ExprError;

/// Maximum length in bytes of a scalar or array name.
pub const MAX_NAME_LEN: usize = 64;

/// Fixed-capacity string used for symbol names.
pub type HString = heapless::String<MAX_NAME_LEN>;

/// Conversion into a fixed-capacity [`HString`].
pub trait TryIntoHeaplessString {
    fn try_into_heapless(&self) -> Result<HString, ExprError>;
}

impl TryIntoHeaplessString for str {
    fn try_into_heapless(&self) -> Result<HString, ExprError> {
        let mut s = HString::new();
        s.push_str(self).map_err(|_| ExprError::StringTooLong)?;
        Ok(s)
    }
}

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Anything not starting with a letter; parsed as an integer literal on use.
    Number,
    /// A letter-led name. Whether it names a scalar or an array depends on
    /// whether the next token is `[`.
    Identifier,
    /// One of `+ - * /`.
    Operator,
    /// `(` or `[`
    Open,
    /// `)` or `]`
    Close,
}

/// The two kinds of brackets an expression may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BracketKind {
    /// `(` `)` grouping
    Paren,
    /// `[` `]` array subscript
    Square,
}

impl BracketKind {
    /// Classify an opening bracket character.
    pub fn from_open(c: char) -> Option<Self> {
        match c {
            '(' => Some(BracketKind::Paren),
            '[' => Some(BracketKind::Square),
            _ => None,
        }
    }

    /// Classify a closing bracket character.
    pub fn from_close(c: char) -> Option<Self> {
        match c {
            ')' => Some(BracketKind::Paren),
            ']' => Some(BracketKind::Square),
            _ => None,
        }
    }

    pub fn open_char(self) -> char {
        match self {
            BracketKind::Paren => '(',
            BracketKind::Square => '[',
        }
    }

    pub fn close_char(self) -> char {
        match self {
            BracketKind::Paren => ')',
            BracketKind::Square => ']',
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    /// Parse an operator token.
    pub fn from_symbol(op: &str) -> Result<Self, ExprError> {
        match op {
            "+" => Ok(BinaryOp::Add),
            "-" => Ok(BinaryOp::Subtract),
            "*" => Ok(BinaryOp::Multiply),
            "/" => Ok(BinaryOp::Divide),
            _ => Err(ExprError::Syntax(format!("Unknown operator: {}", op))),
        }
    }

    /// `*` and `/` bind tighter than `+` and `-`.
    pub fn binds_tight(self) -> bool {
        matches!(self, BinaryOp::Multiply | BinaryOp::Divide)
    }

    /// Apply a binary operation to two values
    pub fn apply(self, left: Real, right: Real) -> Real {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Subtract => left - right,
            BinaryOp::Multiply => left * right,
            BinaryOp::Divide => left / right,
        }
    }
}
