//! Bracket matching.
//!
//! [`BracketMap::match_brackets`] validates that `(` `)` and `[` `]` are
//! balanced and strictly nested, and records for each opener the position of
//! its closer. Entries are ordered by opening position, so a left-to-right
//! evaluation consumes them in order with a single cursor.

use crate::error::{ExprError, Result};
use crate::types::BracketKind;
use serde::{Deserialize, Serialize};

/// Positions of matched bracket pairs.
///
/// `opening[i]` and `closing[i]` are byte offsets of the same pair. For
/// `(a+(b-c))*(d+A[4])` the map is `opening = [0, 3, 10, 14]`,
/// `closing = [8, 7, 17, 16]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMap {
    opening: Vec<usize>,
    closing: Vec<usize>,
    kinds: Vec<BracketKind>,
}

impl BracketMap {
    /// Match every bracket in `expr`.
    ///
    /// Fails on the first closer with no opener or of the wrong kind, and on
    /// any opener left unclosed at the end of the text.
    pub fn match_brackets(expr: &str) -> Result<Self> {
        let mut map = BracketMap::default();
        // (kind, opening position, reserved slot)
        let mut stack: Vec<(BracketKind, usize, usize)> = Vec::new();

        for (i, c) in expr.char_indices() {
            if let Some(kind) = BracketKind::from_open(c) {
                let slot = map.opening.len();
                map.opening.push(i);
                map.closing.push(0);
                map.kinds.push(kind);
                stack.push((kind, i, slot));
            } else if let Some(kind) = BracketKind::from_close(c) {
                let Some((open_kind, _, slot)) = stack.pop() else {
                    return Err(ExprError::UnmatchedBracket {
                        position: i,
                        found: c,
                    });
                };
                if open_kind != kind {
                    return Err(ExprError::MismatchedBracket {
                        position: i,
                        expected: open_kind.close_char(),
                        found: c,
                    });
                }
                map.closing[slot] = i;
            }
        }

        if let Some((kind, position, _)) = stack.pop() {
            return Err(ExprError::UnclosedBracket {
                position,
                found: kind.open_char(),
            });
        }

        log::debug!("matched {} bracket pairs in {:?}", map.len(), expr);
        Ok(map)
    }

    /// Positions of opening brackets, in the order they appear.
    pub fn opening_indices(&self) -> &[usize] {
        &self.opening
    }

    /// `closing_indices()[i]` closes the bracket at `opening_indices()[i]`.
    pub fn closing_indices(&self) -> &[usize] {
        &self.closing
    }

    /// The `i`-th pair as `(kind, open, close)`.
    pub fn pair(&self, i: usize) -> Option<(BracketKind, usize, usize)> {
        Some((*self.kinds.get(i)?, self.opening[i], self.closing[i]))
    }

    pub fn len(&self) -> usize {
        self.opening.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opening.is_empty()
    }
}

/// Returns `true` if every bracket in `expr` is matched by a closer of the
/// same kind with correct nesting.
pub fn is_legally_matched(expr: &str) -> bool {
    BracketMap::match_brackets(expr).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_pairs_fill_out_of_order() {
        let map = BracketMap::match_brackets("(a+(b-c))*(d+A[4])").unwrap();
        assert_eq!(map.opening_indices(), &[0, 3, 10, 14]);
        assert_eq!(map.closing_indices(), &[8, 7, 17, 16]);
        assert_eq!(map.pair(3), Some((BracketKind::Square, 14, 16)));
    }

    #[test]
    fn test_no_brackets() {
        let map = BracketMap::match_brackets("a + b * 3").unwrap();
        assert!(map.is_empty());
        assert!(is_legally_matched(""));
    }

    #[test]
    fn test_unmatched_closer() {
        assert_eq!(
            BracketMap::match_brackets("a)"),
            Err(ExprError::UnmatchedBracket {
                position: 1,
                found: ')'
            })
        );
    }

    #[test]
    fn test_mismatched_kind() {
        assert_eq!(
            BracketMap::match_brackets("A[(1])"),
            Err(ExprError::MismatchedBracket {
                position: 4,
                expected: ')',
                found: ']'
            })
        );
        assert!(!is_legally_matched("(]"));
    }

    #[test]
    fn test_unclosed_opener() {
        assert_eq!(
            BracketMap::match_brackets("((a)"),
            Err(ExprError::UnclosedBracket {
                position: 0,
                found: '('
            })
        );
        assert!(!is_legally_matched("A[1"));
    }
}
