//! Tokenizer for expression text.
//!
//! Names and literals are the runs of characters between delimiters:
//! whitespace, `+ - * /` and the four bracket characters.

use crate::types::TokenKind;
use bitflags::bitflags;

bitflags! {
    /// Character classes of the delimiter set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharClass: u8 {
        const WHITESPACE = 0b0001;
        const OPERATOR = 0b0010;
        const OPEN = 0b0100;
        const CLOSE = 0b1000;
        /// Characters that end a name or number token.
        const DELIMITER = Self::WHITESPACE.bits()
            | Self::OPERATOR.bits()
            | Self::OPEN.bits()
            | Self::CLOSE.bits();
    }
}

impl CharClass {
    pub fn of(c: char) -> Self {
        match c {
            ' ' | '\t' | '\n' | '\r' => CharClass::WHITESPACE,
            '+' | '-' | '*' | '/' => CharClass::OPERATOR,
            '(' | '[' => CharClass::OPEN,
            ')' | ']' => CharClass::CLOSE,
            _ => CharClass::empty(),
        }
    }
}

/// A token produced by the lexer. `text` borrows from the expression and
/// `position` is a byte offset into the whole expression, not the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub position: usize,
}

/// Splits a byte range of an expression on whitespace, the four operators and
/// the four bracket characters. Delimiters other than whitespace are returned
/// as single-character tokens.
#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pub pos: usize,
    end: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_range(input, 0, input.len())
    }

    /// Lex only `input[start..end]`, reporting positions relative to `input`.
    pub fn with_range(input: &'a str, start: usize, end: usize) -> Self {
        let end = end.min(input.len());
        Self {
            input,
            pos: start.min(end),
            end,
        }
    }

    fn peek(&self) -> Option<char> {
        if self.pos >= self.end {
            return None;
        }
        self.input[self.pos..self.end].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if CharClass::of(c).contains(CharClass::WHITESPACE) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Restart lexing at `pos`, keeping the current end of range.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
    }

    /// Peek at the next token without consuming it
    pub fn peek_token(&self) -> Option<Token<'a>> {
        let mut lexer_copy = self.clone();
        lexer_copy.next_token()
    }

    /// Get the next token from the input.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        self.skip_whitespace();
        let start_pos = self.pos;
        let c = self.peek()?;
        let class = CharClass::of(c);

        if class.intersects(CharClass::DELIMITER) {
            self.advance();
            let kind = if class.contains(CharClass::OPEN) {
                TokenKind::Open
            } else if class.contains(CharClass::CLOSE) {
                TokenKind::Close
            } else {
                TokenKind::Operator
            };
            return Some(Token {
                kind,
                text: &self.input[start_pos..self.pos],
                position: start_pos,
            });
        }

        while let Some(nc) = self.peek() {
            if CharClass::of(nc).intersects(CharClass::DELIMITER) {
                break;
            }
            self.advance();
        }

        let kind = if c.is_ascii_alphabetic() {
            TokenKind::Identifier
        } else {
            TokenKind::Number
        };
        Some(Token {
            kind,
            text: &self.input[start_pos..self.pos],
            position: start_pos,
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_tokenization_all_types() {
        let kinds: Vec<TokenKind> = Lexer::new("12 + foo * (B[3]) / x1 - 4")
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Open,
                TokenKind::Identifier,
                TokenKind::Open,
                TokenKind::Number,
                TokenKind::Close,
                TokenKind::Close,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn test_lexer_positions_are_absolute() {
        let input = "(a+bc)*2";
        let tokens: Vec<_> = Lexer::with_range(input, 1, 5).collect();
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["a", "+", "bc"]);
        assert_eq!(tokens[2].position, 3);
    }

    #[test]
    fn test_lexer_keeps_non_delimiters_together() {
        // Malformed literals stay whole so that parsing reports them.
        let texts: Vec<_> = Lexer::new("2.5+3x,y").map(|t| t.text).collect();
        assert_eq!(texts, vec!["2.5", "+", "3x,y"]);
    }

    #[test]
    fn test_peek_and_seek() {
        let mut lexer = Lexer::new("A [ 1 ]");
        assert_eq!(lexer.next_token().unwrap().text, "A");
        assert_eq!(lexer.peek_token().unwrap().kind, TokenKind::Open);
        lexer.seek(6);
        assert_eq!(lexer.next_token().unwrap().text, "]");
        assert_eq!(lexer.next_token(), None);
    }
}
