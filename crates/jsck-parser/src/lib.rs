//! JavaScript scanner, parser and AST types for the jsck checker.
//!
//! This crate provides the front end:
//! - `ScannerState` - Tokenizer over one source text
//! - `ParserState` - Recursive-descent parser into a shared `NodeArena`
//! - `NodeKind` / `Node` / `NodeIndex` - The AST and its arena
//! - Syntactic queries used by passes (`is_label_name`, `is_function_declaration`, ...)

pub mod ast;
pub use ast::{
    Node, NodeArena, NodeIndex, NodeKind, function_body, function_name, function_params,
    is_function_declaration, is_function_expression, is_label_name,
};

pub mod scanner;
pub use scanner::{ScannerState, Token, TokenKind};

pub mod parser;
pub use parser::{ParseError, ParserState, parse_script};
