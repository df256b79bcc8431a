// SQLite-flavored SELECT parser with a canonicalizing deparser.
//
// text -> token::tokenize -> parser::Parser -> ast::Ast -> canonical text

pub mod ast;
pub mod config;
pub mod deparse;
pub mod error;
pub mod expr;
pub mod parser;
pub mod token;
pub mod visit;

// Re-export commonly used types
pub use ast::{Ast, Select, SelectColumn, Statement, Table, Where, WhereKind};
pub use config::{ParserConfig, DEFAULT_MAX_IDENTIFIER_LEN};
pub use error::SyntaxError;
pub use expr::{
    BetweenOp, BinaryOp, CaseExpr, CmpOp, Column, ConvertType, Expr, UnaryOp, Value, ValueKind,
    When,
};
pub use parser::{canonicalize, parse, parse_with, ParseResult, Parser};
pub use token::{tokenize, Token, TokenKind};
pub use visit::{walk_ast, walk_expr, walk_select, walk_select_column, Visitor};
