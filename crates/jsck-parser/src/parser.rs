//! Recursive-descent parser producing nodes in a shared [`NodeArena`].
//!
//! Several scripts of one program are parsed into the same arena, so the
//! parser borrows the arena rather than owning it.

use crate::ast::{Node, NodeArena, NodeIndex, NodeKind};
use crate::scanner::{ScannerState, Token, TokenKind};
use jsck_common::limits::MAX_NESTING_DEPTH;
use jsck_common::{InputId, Span};
use std::fmt;
use tracing::{Level, span};

/// A syntax error with its location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.span.start)
    }
}

impl std::error::Error for ParseError {}

/// Binary operator precedence; higher binds tighter.
fn binary_precedence(op: &str) -> Option<u8> {
    Some(match op {
        "||" => 1,
        "&&" => 2,
        "==" | "!=" | "===" | "!==" => 3,
        "<" | ">" | "<=" | ">=" => 4,
        "+" | "-" => 5,
        "*" | "/" | "%" => 6,
        _ => return None,
    })
}

pub struct ParserState<'a> {
    scanner: ScannerState<'a>,
    arena: &'a mut NodeArena,
    current: Token,
    /// Token after `current`, scanned on demand for label detection
    lookahead: Option<Token>,
    /// Current syntactic nesting, bounded by `MAX_NESTING_DEPTH`
    depth: u32,
}

impl<'a> ParserState<'a> {
    pub fn new(source: &'a str, arena: &'a mut NodeArena) -> Result<Self, ParseError> {
        let mut scanner = ScannerState::new(source);
        let current = scanner.scan()?;
        Ok(ParserState {
            scanner,
            arena,
            current,
            lookahead: None,
            depth: 0,
        })
    }

    /// Parse a whole source text as one `Script` node tagged with `input`.
    pub fn parse_script(mut self, input: InputId) -> Result<NodeIndex, ParseError> {
        let _span = span!(Level::DEBUG, "parse_script", input = input.0).entered();

        let start = self.current.span.start;
        let mut statements = Vec::new();
        while self.current.kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
        }
        let end = self.current.span.end;

        let mut script = Node::new(NodeKind::Script, Span::new(start, end));
        script.input = Some(input);
        Ok(self.arena.add_with_children(script, &statements))
    }

    // --- Token Buffer Management ---

    fn advance(&mut self) -> Result<Token, ParseError> {
        let next = match self.lookahead.take() {
            Some(token) => token,
            None => self.scanner.scan()?,
        };
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn peek(&mut self) -> Result<&Token, ParseError> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.scanner.scan()?);
        }
        Ok(self.lookahead.as_ref().unwrap_or(&self.current))
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, what: &str) -> ParseError {
        let found = if self.current.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            format!("'{}'", self.current.text)
        };
        ParseError::new(format!("expected {what}, found {found}"), self.current.span)
    }

    // --- Nesting ---

    fn enter_nesting(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::new(
                format!("nesting exceeds {MAX_NESTING_DEPTH} levels"),
                self.current.span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `parse` one nesting level deeper.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let outer = self.depth;
        self.enter_nesting()?;
        let result = parse(self);
        self.depth = outer;
        result
    }

    fn name_node(&mut self, token: &Token) -> NodeIndex {
        self.arena
            .add(Node::with_text(NodeKind::Name, token.text.clone(), token.span))
    }

    fn span_of(&self, idx: NodeIndex) -> Span {
        self.arena.span(idx)
    }

    // --- Statements ---

    fn parse_statement(&mut self) -> Result<NodeIndex, ParseError> {
        self.nested(Self::parse_statement_kind)
    }

    fn parse_statement_kind(&mut self) -> Result<NodeIndex, ParseError> {
        let kind = self.current.kind;
        match kind {
            TokenKind::Var => self.parse_var(),
            TokenKind::Function => self.parse_function(),
            TokenKind::OpenBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => self.parse_jump(NodeKind::Break),
            TokenKind::Continue => self.parse_jump(NodeKind::Continue),
            TokenKind::Semicolon => {
                let token = self.advance()?;
                Ok(self.arena.add(Node::new(NodeKind::Empty, token.span)))
            }
            TokenKind::Identifier if self.peek()?.kind == TokenKind::Colon => self.parse_label(),
            _ => {
                let expr = self.parse_expression()?;
                let span = self.finish_statement(self.span_of(expr))?;
                Ok(self
                    .arena
                    .add_with_children(Node::new(NodeKind::ExprResult, span), &[expr]))
            }
        }
    }

    fn finish_statement(&mut self, span: Span) -> Result<Span, ParseError> {
        if self.check(TokenKind::Semicolon) {
            Ok(span.to(self.advance()?.span))
        } else {
            Ok(span)
        }
    }

    fn parse_var(&mut self) -> Result<NodeIndex, ParseError> {
        let keyword = self.advance()?;
        let mut names = Vec::new();
        let mut end;
        loop {
            let token = self.expect(TokenKind::Identifier, "variable name")?;
            let name = self.name_node(&token);
            end = token.span;
            if self.eat(TokenKind::Equals)? {
                let init = self.parse_assignment()?;
                end = self.span_of(init);
                self.arena.add_child_to_back(name, init);
            }
            names.push(name);
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        let span = self.finish_statement(keyword.span.to(end))?;
        Ok(self
            .arena
            .add_with_children(Node::new(NodeKind::Var, span), &names))
    }

    /// Parse `function name?(params) { body }`.
    ///
    /// In statement position the name is optional as well: an anonymous
    /// function statement is accepted here and diagnosed by later passes.
    fn parse_function(&mut self) -> Result<NodeIndex, ParseError> {
        let keyword = self.advance()?;
        let name = if self.check(TokenKind::Identifier) {
            let token = self.advance()?;
            self.name_node(&token)
        } else {
            let at = Span::new(keyword.span.end, keyword.span.end);
            self.arena.add(Node::with_text(NodeKind::Name, "", at))
        };

        let open = self.expect(TokenKind::OpenParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::CloseParen) {
            loop {
                let token = self.expect(TokenKind::Identifier, "parameter name")?;
                params.push(self.name_node(&token));
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::CloseParen, "')'")?;
        let param_list = self.arena.add_with_children(
            Node::new(NodeKind::ParamList, open.span.to(close.span)),
            &params,
        );

        let body = self.parse_block()?;
        let span = keyword.span.to(self.span_of(body));
        Ok(self.arena.add_with_children(
            Node::new(NodeKind::Function, span),
            &[name, param_list, body],
        ))
    }

    fn parse_block(&mut self) -> Result<NodeIndex, ParseError> {
        let open = self.expect(TokenKind::OpenBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::CloseBrace) {
            if self.check(TokenKind::Eof) {
                return Err(self.unexpected("'}'"));
            }
            statements.push(self.parse_statement()?);
        }
        let close = self.advance()?;
        Ok(self.arena.add_with_children(
            Node::new(NodeKind::Block, open.span.to(close.span)),
            &statements,
        ))
    }

    fn parse_if(&mut self) -> Result<NodeIndex, ParseError> {
        let keyword = self.advance()?;
        self.expect(TokenKind::OpenParen, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::CloseParen, "')'")?;
        let then_branch = self.parse_branch()?;
        let mut children = vec![condition, then_branch];
        if self.eat(TokenKind::Else)? {
            children.push(self.parse_branch()?);
        }
        let last = children.last().map(|&c| self.span_of(c)).unwrap_or(keyword.span);
        Ok(self
            .arena
            .add_with_children(Node::new(NodeKind::If, keyword.span.to(last)), &children))
    }

    /// An `if` branch, always a `Block` so a function in it is a declaration.
    fn parse_branch(&mut self) -> Result<NodeIndex, ParseError> {
        let statement = self.parse_statement()?;
        if self.arena.kind(statement) == Some(NodeKind::Block) {
            return Ok(statement);
        }
        let span = self.span_of(statement);
        Ok(self
            .arena
            .add_with_children(Node::new(NodeKind::Block, span), &[statement]))
    }

    fn parse_return(&mut self) -> Result<NodeIndex, ParseError> {
        let keyword = self.advance()?;
        let mut children = Vec::new();
        if !matches!(
            self.current.kind,
            TokenKind::Semicolon | TokenKind::CloseBrace | TokenKind::Eof
        ) {
            children.push(self.parse_expression()?);
        }
        let last = children.last().map(|&c| self.span_of(c)).unwrap_or(keyword.span);
        let span = self.finish_statement(keyword.span.to(last))?;
        Ok(self
            .arena
            .add_with_children(Node::new(NodeKind::Return, span), &children))
    }

    fn parse_jump(&mut self, kind: NodeKind) -> Result<NodeIndex, ParseError> {
        let keyword = self.advance()?;
        let mut children = Vec::new();
        if self.check(TokenKind::Identifier) {
            let token = self.advance()?;
            children.push(self.name_node(&token));
        }
        let last = children.last().map(|&c| self.span_of(c)).unwrap_or(keyword.span);
        let span = self.finish_statement(keyword.span.to(last))?;
        Ok(self.arena.add_with_children(Node::new(kind, span), &children))
    }

    fn parse_label(&mut self) -> Result<NodeIndex, ParseError> {
        let token = self.advance()?;
        let label = self.name_node(&token);
        self.expect(TokenKind::Colon, "':'")?;
        let statement = self.parse_statement()?;
        let span = token.span.to(self.span_of(statement));
        Ok(self
            .arena
            .add_with_children(Node::new(NodeKind::Label, span), &[label, statement]))
    }

    // --- Expressions ---

    pub(crate) fn parse_expression(&mut self) -> Result<NodeIndex, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<NodeIndex, ParseError> {
        self.nested(Self::parse_assignment_target)
    }

    fn parse_assignment_target(&mut self) -> Result<NodeIndex, ParseError> {
        let target = self.parse_binary(0)?;
        if !self.check(TokenKind::Equals) {
            return Ok(target);
        }
        if !matches!(
            self.arena.kind(target),
            Some(NodeKind::Name | NodeKind::GetProp)
        ) {
            return Err(ParseError::new(
                "invalid assignment target",
                self.span_of(target),
            ));
        }
        self.advance()?;
        let value = self.parse_assignment()?;
        let span = self.span_of(target).to(self.span_of(value));
        Ok(self
            .arena
            .add_with_children(Node::new(NodeKind::Assign, span), &[target, value]))
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<NodeIndex, ParseError> {
        let outer = self.depth;
        let result = self.parse_binary_chain(min_precedence);
        self.depth = outer;
        result
    }

    /// Left-associative operators build a left-deep tree; each link nests.
    fn parse_binary_chain(&mut self, min_precedence: u8) -> Result<NodeIndex, ParseError> {
        let mut left = self.parse_unary()?;
        while self.check(TokenKind::Operator) {
            let Some(precedence) = binary_precedence(&self.current.text) else {
                break;
            };
            if precedence <= min_precedence {
                break;
            }
            self.enter_nesting()?;
            let op = self.advance()?;
            let right = self.parse_binary(precedence)?;
            let span = self.span_of(left).to(self.span_of(right));
            left = self.arena.add_with_children(
                Node::with_text(NodeKind::Binary, op.text, span),
                &[left, right],
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeIndex, ParseError> {
        let is_unary = match self.current.kind {
            TokenKind::Bang | TokenKind::Typeof => true,
            TokenKind::Operator => self.current.text == "-" || self.current.text == "+",
            _ => false,
        };
        if !is_unary {
            return self.parse_postfix();
        }
        let op = self.advance()?;
        let operand = self.nested(Self::parse_unary)?;
        let span = op.span.to(self.span_of(operand));
        Ok(self.arena.add_with_children(
            Node::with_text(NodeKind::Unary, op.text, span),
            &[operand],
        ))
    }

    fn parse_postfix(&mut self) -> Result<NodeIndex, ParseError> {
        let outer = self.depth;
        let result = self.parse_postfix_chain();
        self.depth = outer;
        result
    }

    /// Member and call chains build a left-deep tree; each link nests.
    fn parse_postfix_chain(&mut self) -> Result<NodeIndex, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if matches!(self.current.kind, TokenKind::Dot | TokenKind::OpenParen) {
                self.enter_nesting()?;
            }
            if self.eat(TokenKind::Dot)? {
                let token = self.expect(TokenKind::Identifier, "property name")?;
                let property = self.arena.add(Node::with_text(
                    NodeKind::PropertyName,
                    token.text.clone(),
                    token.span,
                ));
                let span = self.span_of(expr).to(token.span);
                expr = self
                    .arena
                    .add_with_children(Node::new(NodeKind::GetProp, span), &[expr, property]);
            } else if self.eat(TokenKind::OpenParen)? {
                let mut children = vec![expr];
                if !self.check(TokenKind::CloseParen) {
                    loop {
                        children.push(self.parse_assignment()?);
                        if !self.eat(TokenKind::Comma)? {
                            break;
                        }
                    }
                }
                let close = self.expect(TokenKind::CloseParen, "')'")?;
                let span = self.span_of(expr).to(close.span);
                expr = self
                    .arena
                    .add_with_children(Node::new(NodeKind::Call, span), &children);
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<NodeIndex, ParseError> {
        let literal = match self.current.kind {
            TokenKind::Identifier => Some(NodeKind::Name),
            TokenKind::Number => Some(NodeKind::Number),
            TokenKind::String => Some(NodeKind::String),
            TokenKind::This => Some(NodeKind::This),
            TokenKind::Null => Some(NodeKind::Null),
            TokenKind::True => Some(NodeKind::True),
            TokenKind::False => Some(NodeKind::False),
            _ => None,
        };
        if let Some(kind) = literal {
            let token = self.advance()?;
            return Ok(self.arena.add(Node::with_text(kind, token.text, token.span)));
        }

        match self.current.kind {
            TokenKind::Function => self.parse_function(),
            TokenKind::OpenParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::CloseParen, "')'")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("expression")),
        }
    }
}

/// Parse `source` into `arena` as the script for `input`.
pub fn parse_script(
    arena: &mut NodeArena,
    input: InputId,
    source: &str,
) -> Result<NodeIndex, ParseError> {
    ParserState::new(source, arena)?.parse_script(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (NodeArena, NodeIndex) {
        let mut arena = NodeArena::new();
        let script = parse_script(&mut arena, InputId(0), source).expect("parse");
        (arena, script)
    }

    #[test]
    fn test_binary_precedence() {
        let (arena, script) = parse("a + b * c;");
        let stmt = arena.children(script)[0];
        let add = arena.children(stmt)[0];
        assert_eq!(arena.text(add), "+");
        let mul = arena.children(add)[1];
        assert_eq!(arena.kind(mul), Some(NodeKind::Binary));
        assert_eq!(arena.text(mul), "*");
    }

    #[test]
    fn test_parenthesized_function_call() {
        let (arena, script) = parse("(function(){ return 1; })();");
        let stmt = arena.children(script)[0];
        let call = arena.children(stmt)[0];
        assert_eq!(arena.kind(call), Some(NodeKind::Call));
        let function = arena.children(call)[0];
        assert_eq!(arena.kind(function), Some(NodeKind::Function));
        assert_eq!(arena.parent(function), call);
    }

    #[test]
    fn test_if_branch_is_wrapped_in_block() {
        let (arena, script) = parse("if (a) b(); else { c(); }");
        let if_node = arena.children(script)[0];
        let branches = &arena.children(if_node)[1..];
        assert_eq!(arena.kind(branches[0]), Some(NodeKind::Block));
        assert_eq!(arena.kind(arena.children(branches[0])[0]), Some(NodeKind::ExprResult));
        // An existing block is not wrapped again
        assert_eq!(arena.kind(arena.children(branches[1])[0]), Some(NodeKind::ExprResult));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let mut arena = NodeArena::new();
        let err = parse_script(&mut arena, InputId(0), "1 = a;").expect_err("bad target");
        assert_eq!(err.message, "invalid assignment target");
    }
}
