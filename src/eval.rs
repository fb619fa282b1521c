//! Recursive evaluation.
//!
//! The evaluator walks the token stream of a byte range of the expression,
//! keeping an operand stack and an operator stack. Every bracketed
//! subexpression is evaluated by a recursive call on the range strictly
//! between its brackets, found through the [`BracketMap`]. A bracket cursor is
//! threaded through the recursion so pairs are consumed in opening order
//! across all levels.
//!
//! `*` and `/` are resolved as soon as their right operand is pushed. What is
//! left on the stacks at the end of a range is a chain of `+` and `-`, folded
//! left to right.
//!
//! A bracketed operand counts as pushed once its range is evaluated, so
//! `1+2*(3)` is `7`: the `*` resolves against `(3)` just as it would against
//! a literal `3`.

use crate::Real;
use crate::brackets::BracketMap;
use crate::error::{ExprError, Result};
use crate::lexer::Lexer;
use crate::symbols::SymbolTables;
use crate::types::{BinaryOp, BracketKind, TokenKind};

/// Default bound on bracket nesting during evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Deepest bracket nesting evaluated before failing with
    /// [`ExprError::RecursionLimit`].
    pub max_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Evaluate `expr` with default options.
///
/// `brackets` must be the map of this same text and `symbols` must hold every
/// name the text references.
pub fn evaluate(expr: &str, brackets: &BracketMap, symbols: &SymbolTables) -> Result<Real> {
    evaluate_with_options(expr, brackets, symbols, EvalOptions::default())
}

pub fn evaluate_with_options(
    expr: &str,
    brackets: &BracketMap,
    symbols: &SymbolTables,
    options: EvalOptions,
) -> Result<Real> {
    let evaluator = Evaluator {
        expr,
        brackets,
        symbols,
        options,
    };
    let mut cursor = 0;
    evaluator.eval_range(0, expr.len(), &mut cursor, 0)
}

struct Evaluator<'a> {
    expr: &'a str,
    brackets: &'a BracketMap,
    symbols: &'a SymbolTables,
    options: EvalOptions,
}

impl<'a> Evaluator<'a> {
    /// Evaluate `expr[start..end]`. `cursor` indexes the next unconsumed pair
    /// of the bracket map.
    fn eval_range(&self, start: usize, end: usize, cursor: &mut usize, depth: usize) -> Result<Real> {
        if depth > self.options.max_depth {
            return Err(ExprError::RecursionLimit(format!(
                "bracket nesting deeper than {}",
                self.options.max_depth
            )));
        }
        log::trace!("evaluating {:?} at depth {}", &self.expr[start..end], depth);

        let mut operands: Vec<Real> = Vec::new();
        let mut operators: Vec<BinaryOp> = Vec::new();
        let mut array_name: Option<&'a str> = None;
        let mut lexer = Lexer::with_range(self.expr, start, end);

        while let Some(token) = lexer.next_token() {
            match token.kind {
                TokenKind::Open => {
                    let (kind, open, close) = self
                        .brackets
                        .pair(*cursor)
                        .filter(|&(_, open, _)| open == token.position)
                        .ok_or_else(|| {
                            ExprError::Syntax(format!(
                                "bracket at position {} is not in the bracket map",
                                token.position
                            ))
                        })?;
                    *cursor += 1;

                    let inner = self.eval_range(open + 1, close, cursor, depth + 1)?;
                    let value = match kind {
                        BracketKind::Paren => inner,
                        BracketKind::Square => {
                            let name = array_name.take().ok_or_else(|| {
                                ExprError::Syntax(format!(
                                    "subscript at position {} has no array name",
                                    open
                                ))
                            })?;
                            self.index_array(name, inner)?
                        }
                    };
                    operands.push(value);
                    resolve_tight(&mut operators, &mut operands)?;
                    lexer.seek(close + 1);
                }
                TokenKind::Close => {
                    return Err(ExprError::Syntax(format!(
                        "unexpected '{}' at position {}",
                        token.text, token.position
                    )));
                }
                TokenKind::Identifier => {
                    if lexer.peek_token().is_some_and(|next| next.text == "[") {
                        array_name = Some(token.text);
                        continue;
                    }
                    let scalar = self.symbols.scalar(token.text).ok_or_else(|| {
                        ExprError::UnknownVariable {
                            name: token.text.to_string(),
                        }
                    })?;
                    operands.push(scalar.value as Real);
                    resolve_tight(&mut operators, &mut operands)?;
                }
                TokenKind::Number => {
                    let value: i64 = token.text.parse()?;
                    operands.push(value as Real);
                    resolve_tight(&mut operators, &mut operands)?;
                }
                TokenKind::Operator => operators.push(BinaryOp::from_symbol(token.text)?),
            }
        }

        fold(operators, operands)
    }

    /// Look up `name[subscript]`, truncating the subscript toward zero.
    fn index_array(&self, name: &str, subscript: Real) -> Result<Real> {
        let array = self
            .symbols
            .array(name)
            .ok_or_else(|| ExprError::UnknownArray {
                name: name.to_string(),
            })?;
        let index = subscript as i64;
        usize::try_from(index)
            .ok()
            .and_then(|i| array.get(i))
            .map(|value| value as Real)
            .ok_or_else(|| ExprError::ArrayIndexOutOfBounds {
                name: name.to_string(),
                index,
                len: array.len(),
            })
    }
}

/// If the top operator is `*` or `/`, replace it and the top two operands
/// with their result.
fn resolve_tight(operators: &mut Vec<BinaryOp>, operands: &mut Vec<Real>) -> Result<()> {
    match operators.last() {
        Some(op) if op.binds_tight() => {}
        _ => return Ok(()),
    }
    let (Some(op), Some(right), Some(left)) = (operators.pop(), operands.pop(), operands.pop())
    else {
        return Err(ExprError::Syntax("missing left operand".to_string()));
    };
    operands.push(op.apply(left, right));
    Ok(())
}

/// Fold the remaining operators over the operands, left to right.
fn fold(operators: Vec<BinaryOp>, operands: Vec<Real>) -> Result<Real> {
    if operands.len() != operators.len() + 1 {
        let msg = if operands.is_empty() {
            "empty expression"
        } else if operands.len() <= operators.len() {
            "missing operand"
        } else {
            "missing operator"
        };
        return Err(ExprError::Syntax(msg.to_string()));
    }
    let mut values = operands.into_iter();
    let first = values.next().unwrap_or_default();
    Ok(operators
        .into_iter()
        .zip(values)
        .fold(first, |acc, (op, value)| op.apply(acc, value)))
}
