//! Evaluation sessions.
//!
//! An [`Expression`] owns the text of one expression together with its bracket
//! map and symbol tables, and runs the matcher, extractor, loader and
//! evaluator over them. Every call takes the state it needs explicitly, so
//! independent sessions can be evaluated concurrently.

use std::borrow::Cow;
use std::io::BufRead;

use crate::Real;
use crate::brackets::BracketMap;
use crate::error::Result;
use crate::eval::{EvalOptions, evaluate_with_options};
use crate::loader::{load_symbol_values, load_symbol_values_from_reader};
use crate::symbols::{ArraySymbol, ScalarSymbol, SymbolTables, build_symbols};

/// One expression and the state built up while preparing it for evaluation.
///
/// # Examples
///
/// ```
/// use symexpr::Expression;
///
/// let mut expr = Expression::new("a - B[a] * 2");
/// expr.build_symbols().unwrap();
/// expr.load_symbol_values(["a 1", "B 2 (1,4)"]).unwrap();
/// assert_eq!(expr.evaluate().unwrap(), -7.0);
/// ```
#[derive(Debug, Clone)]
pub struct Expression {
    text: String,
    brackets: Option<BracketMap>,
    symbols: SymbolTables,
    options: EvalOptions,
}

impl Expression {
    pub fn new(text: impl Into<String>) -> Self {
        Expression {
            text: text.into(),
            brackets: None,
            symbols: SymbolTables::new(),
            options: EvalOptions::default(),
        }
    }

    /// Replace the evaluation options.
    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Match brackets and keep the resulting map for evaluation.
    ///
    /// A failed match clears any previously stored map.
    pub fn match_brackets(&mut self) -> Result<&BracketMap> {
        self.brackets = None;
        let map = BracketMap::match_brackets(&self.text)?;
        Ok(self.brackets.insert(map))
    }

    /// Returns `true` if brackets are matched correctly, storing the map.
    pub fn is_legally_matched(&mut self) -> bool {
        self.match_brackets().is_ok()
    }

    /// The stored bracket map, if brackets have been matched successfully.
    pub fn bracket_map(&self) -> Option<&BracketMap> {
        self.brackets.as_ref()
    }

    /// Rebuild the symbol tables from the expression text. Previously loaded
    /// values are discarded.
    pub fn build_symbols(&mut self) -> Result<&SymbolTables> {
        self.symbols = build_symbols(&self.text)?;
        Ok(&self.symbols)
    }

    pub fn symbols(&self) -> &SymbolTables {
        &self.symbols
    }

    pub fn scalars(&self) -> &[ScalarSymbol] {
        &self.symbols.scalars
    }

    pub fn arrays(&self) -> &[ArraySymbol] {
        &self.symbols.arrays
    }

    /// Bind values from `lines` to the extracted symbols.
    pub fn load_symbol_values<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        load_symbol_values(&mut self.symbols, lines)
    }

    pub fn load_symbol_values_from_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        load_symbol_values_from_reader(&mut self.symbols, reader)
    }

    /// Evaluate the whole expression.
    ///
    /// Uses the stored bracket map when there is one and matches brackets
    /// otherwise, so an ill-formed expression never reaches the evaluator.
    pub fn evaluate(&self) -> Result<Real> {
        let brackets = match &self.brackets {
            Some(map) => Cow::Borrowed(map),
            None => Cow::Owned(BracketMap::match_brackets(&self.text)?),
        };
        let result = evaluate_with_options(&self.text, &brackets, &self.symbols, self.options)?;
        log::debug!("{:?} evaluated to {}", self.text, result);
        Ok(result)
    }
}

/// Match, extract, load and evaluate `expr` in one call.
///
/// ```
/// use symexpr::interp;
///
/// assert_eq!(interp("(2+3)*4", Vec::<&str>::new()).unwrap(), 20.0);
/// assert_eq!(interp("x+1", ["x 5", "unused 9"]).unwrap(), 6.0);
/// ```
pub fn interp<I, S>(expr: &str, lines: I) -> Result<Real>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut expression = Expression::new(expr);
    expression.match_brackets()?;
    expression.build_symbols()?;
    expression.load_symbol_values(lines)?;
    expression.evaluate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExprError;

    #[test]
    fn test_session_steps() {
        let mut expr = Expression::new("(a+(b-c))*(d+A[4])");
        assert!(expr.bracket_map().is_none());
        assert!(expr.is_legally_matched());
        assert_eq!(expr.bracket_map().unwrap().len(), 4);

        expr.build_symbols().unwrap();
        assert_eq!(expr.scalars().len(), 4);
        assert_eq!(expr.arrays().len(), 1);

        expr.load_symbol_values(["a 2", "b 5", "c 1", "d 0", "A 5 (4,3)"]).unwrap();
        assert_eq!(expr.evaluate().unwrap(), 18.0);
    }

    #[test]
    fn test_failed_match_clears_map() {
        let mut expr = Expression::new("(1]");
        assert!(!expr.is_legally_matched());
        assert!(expr.bracket_map().is_none());
        assert!(matches!(
            expr.evaluate(),
            Err(ExprError::MismatchedBracket { .. })
        ));
    }

    #[test]
    fn test_evaluate_without_explicit_match() {
        let mut expr = Expression::new("x*(x+1)");
        expr.build_symbols().unwrap();
        expr.load_symbol_values(["x 3"]).unwrap();
        assert_eq!(expr.evaluate().unwrap(), 12.0);
    }

    #[test]
    fn test_rebuild_discards_values() {
        let mut expr = Expression::new("n");
        expr.build_symbols().unwrap();
        expr.load_symbol_values(["n 4"]).unwrap();
        assert_eq!(expr.evaluate().unwrap(), 4.0);
        expr.build_symbols().unwrap();
        assert_eq!(expr.evaluate().unwrap(), 0.0);
    }

    #[test]
    fn test_options_are_applied() {
        let expr = Expression::new("((1))").with_options(EvalOptions { max_depth: 1 });
        assert!(matches!(expr.evaluate(), Err(ExprError::RecursionLimit(_))));
    }
}
