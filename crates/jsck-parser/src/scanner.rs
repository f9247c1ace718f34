//! Tokenizer for the JavaScript subset accepted by the parser.

use crate::ParseError;
use jsck_common::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    String,
    // Keywords
    Var,
    Function,
    Return,
    If,
    Else,
    Break,
    Continue,
    This,
    Null,
    True,
    False,
    Typeof,
    // Punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Equals,
    /// Binary operator; the token text holds the operator
    Operator,
    Bang,
    Eof,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    Some(match word {
        "var" => TokenKind::Var,
        "function" => TokenKind::Function,
        "return" => TokenKind::Return,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "this" => TokenKind::This,
        "null" => TokenKind::Null,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "typeof" => TokenKind::Typeof,
        _ => return None,
    })
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Operators sorted longest first so `===` wins over `==`.
const OPERATORS: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "+", "-", "*", "/", "%", "<", ">",
];

/// Tokenizer state over one source text.
pub struct ScannerState<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> ScannerState<'a> {
    pub fn new(source: &'a str) -> Self {
        ScannerState { source, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            let rest = self.rest();
            if let Some(ch) = rest.chars().next().filter(|ch| ch.is_whitespace()) {
                self.pos += ch.len_utf8();
            } else if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                let Some(close) = rest[2..].find("*/") else {
                    return Err(ParseError::new(
                        "unterminated comment",
                        Span::new(self.pos as u32, self.source.len() as u32),
                    ));
                };
                self.pos += close + 4;
            } else {
                return Ok(());
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            text: self.source[start..self.pos].to_string(),
            span: Span::new(start as u32, self.pos as u32),
        }
    }

    /// Scan the next token, returning `Eof` at the end of input.
    pub fn scan(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia()?;
        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return Ok(self.token(TokenKind::Eof, start));
        };

        if is_identifier_start(ch) {
            let len = self
                .rest()
                .find(|c: char| !is_identifier_part(c))
                .unwrap_or(self.rest().len());
            self.pos += len;
            let kind = keyword_kind(&self.source[start..self.pos]).unwrap_or(TokenKind::Identifier);
            return Ok(self.token(kind, start));
        }

        if ch.is_ascii_digit() {
            let len = self
                .rest()
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.'))
                .unwrap_or(self.rest().len());
            self.pos += len;
            return Ok(self.token(TokenKind::Number, start));
        }

        if ch == '"' || ch == '\'' {
            return self.scan_string(ch, start);
        }

        let single = match ch {
            '(' => Some(TokenKind::OpenParen),
            ')' => Some(TokenKind::CloseParen),
            '{' => Some(TokenKind::OpenBrace),
            '}' => Some(TokenKind::CloseBrace),
            ',' => Some(TokenKind::Comma),
            ';' => Some(TokenKind::Semicolon),
            ':' => Some(TokenKind::Colon),
            '.' => Some(TokenKind::Dot),
            _ => None,
        };
        if let Some(kind) = single {
            self.pos += 1;
            return Ok(self.token(kind, start));
        }

        if let Some(op) = OPERATORS.iter().find(|op| self.rest().starts_with(**op)) {
            self.pos += op.len();
            return Ok(self.token(TokenKind::Operator, start));
        }
        if ch == '=' {
            self.pos += 1;
            return Ok(self.token(TokenKind::Equals, start));
        }
        if ch == '!' {
            self.pos += 1;
            return Ok(self.token(TokenKind::Bang, start));
        }

        Err(ParseError::new(
            format!("unexpected character '{ch}'"),
            Span::new(start as u32, (start + ch.len_utf8()) as u32),
        ))
    }

    fn scan_string(&mut self, quote: char, start: usize) -> Result<Token, ParseError> {
        let mut escaped = false;
        for (offset, ch) in self.rest().char_indices().skip(1) {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                self.pos += offset + 1;
                let mut token = self.token(TokenKind::String, start);
                // Keep the contents only
                token.text = token.text[1..token.text.len() - 1].to_string();
                return Ok(token);
            } else if ch == '\n' {
                break;
            }
        }
        Err(ParseError::new(
            "unterminated string literal",
            Span::new(start as u32, self.source.len() as u32),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = ScannerState::new(source);
        let mut out = Vec::new();
        loop {
            let token = scanner.scan().expect("scan");
            let kind = token.kind;
            out.push(kind);
            if kind == TokenKind::Eof {
                return out;
            }
        }
    }

    #[test]
    fn test_scan_declaration() {
        assert_eq!(
            kinds("var a = b.c; // trailing"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        let mut scanner = ScannerState::new("a === b");
        scanner.scan().expect("a");
        let op = scanner.scan().expect("op");
        assert_eq!(op.kind, TokenKind::Operator);
        assert_eq!(op.text, "===");
        assert_eq!(op.span, Span::new(2, 5));
    }

    #[test]
    fn test_string_contents_and_block_comment() {
        let mut scanner = ScannerState::new("/* c */ 'it\\'s'");
        let token = scanner.scan().expect("string");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.text, "it\\'s");
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let mut scanner = ScannerState::new("\"abc");
        let err = scanner.scan().expect_err("unterminated");
        assert_eq!(err.message, "unterminated string literal");
    }
}
