// The statement parser and the public entry points.
//
// Grammar: SELECT <columns> FROM <table> [WHERE <expr>]
//          [GROUP BY <exprs> [HAVING <expr>]] [;]

use crate::ast::{Ast, Select, SelectColumn, Statement, Table, Where, WhereKind};
use crate::config::ParserConfig;
use crate::error::{Backtrace, SyntaxError};
use crate::expr::{Column, Expr};
use crate::token::{tokenize, Token, TokenKind};

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Cursor over one tokenized input, with error tracking.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    backtrace: Backtrace,
    input: &'a str, // Original input for error messages
    config: ParserConfig,
}

impl<'a> Parser<'a> {
    /// Tokenize `input` and position the cursor on the first token.
    pub fn new(input: &'a str, config: &ParserConfig) -> ParseResult<Self> {
        let tokens = tokenize(input, config)?;

        Ok(Parser {
            tokens,
            pos: 0,
            backtrace: Backtrace::new(),
            input,
            config: *config,
        })
    }

    /// Current token. The list always ends with `Eof`, and the cursor never
    /// moves past it.
    pub fn current(&self) -> &Token<'a> {
        &self.tokens[self.pos]
    }

    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Kind of the token `n` positions ahead.
    pub fn peek(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Advance to next token, returning the one consumed.
    pub fn advance(&mut self) -> Token<'a> {
        let token = self.tokens[self.pos].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// The most recently consumed token.
    pub(crate) fn previous(&self) -> &Token<'a> {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Expect a specific token kind
    pub fn expect(&mut self, expected: TokenKind) -> ParseResult<Token<'a>> {
        if self.kind() == expected {
            Ok(self.advance())
        } else {
            Err(self.error_expected(&expected.to_string()))
        }
    }

    /// Try to consume a token. A miss is remembered as an alternative the
    /// error message can list.
    pub fn try_consume(&mut self, kind: TokenKind) -> bool {
        if self.kind() == kind {
            self.advance();
            true
        } else {
            self.track(&kind.to_string());
            false
        }
    }

    /// Parse identifier
    pub fn parse_identifier(&mut self) -> ParseResult<&'a str> {
        if self.kind() == TokenKind::Identifier {
            Ok(self.advance().text)
        } else {
            Err(self.error_expected("identifier"))
        }
    }

    /// Whether the cursor sits on a `-` glued to integer digits.
    pub(crate) fn at_signed_integer(&self) -> bool {
        match (self.tokens.get(self.pos), self.tokens.get(self.pos + 1)) {
            (Some(minus), Some(digits)) => {
                minus.kind == TokenKind::Minus
                    && digits.kind == TokenKind::Number
                    && minus.span.end == digits.span.start
            }
            _ => false,
        }
    }

    /// Consume the `-` and the digits after it as one literal, borrowed
    /// from the input.
    pub(crate) fn take_signed_integer(&mut self) -> &'a str {
        let input = self.input;
        let start = self.advance().span.start;
        let end = self.advance().span.end;
        &input[start..end]
    }

    pub(crate) fn track(&self, expected: &str) {
        let token = self.current();
        let found = (token.kind != TokenKind::Eof).then_some(token.text);
        self.backtrace
            .track_error(token.span.start, expected, found);
    }

    /// Error at the current token, listing everything that would have been
    /// accepted there.
    pub(crate) fn error_expected(&self, expected: &str) -> SyntaxError {
        self.track(expected);
        self.backtrace.get_error(self.input)
    }

    /// Error anchored on the token just consumed.
    pub(crate) fn error_at_previous(&self, expected: &str) -> SyntaxError {
        let token = self.previous();
        self.backtrace
            .track_error(token.span.start, expected, Some(token.text));
        self.backtrace.get_error(self.input)
    }

    /// Parse a complete SQL statement, requiring all input to be consumed.
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        let select = self.parse_select()?;

        self.try_consume(TokenKind::Semicolon);
        self.expect(TokenKind::Eof)?;

        Ok(Statement::Select(Box::new(select)))
    }

    /// Parse SELECT statement
    pub fn parse_select(&mut self) -> ParseResult<Select> {
        self.expect(TokenKind::Select)?;

        let columns = self.parse_select_columns()?;

        self.expect(TokenKind::From)?;
        let from = Table::new(self.parse_identifier()?);

        let where_clause = if self.try_consume(TokenKind::Where) {
            Some(Where {
                kind: WhereKind::Where,
                expr: self.parse_expr()?,
            })
        } else {
            None
        };

        let group_by = if self.try_consume(TokenKind::Group) {
            self.expect(TokenKind::By)?;
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        let having = if !group_by.is_empty() && self.try_consume(TokenKind::Having) {
            Some(Where {
                kind: WhereKind::Having,
                expr: self.parse_expr()?,
            })
        } else {
            None
        };

        Ok(Select {
            columns,
            from,
            where_clause,
            group_by,
            having,
        })
    }

    fn parse_select_columns(&mut self) -> ParseResult<Vec<SelectColumn>> {
        let mut columns = vec![self.parse_select_column()?];

        while self.try_consume(TokenKind::Comma) {
            columns.push(self.parse_select_column()?);
        }

        Ok(columns)
    }

    fn parse_select_column(&mut self) -> ParseResult<SelectColumn> {
        if self.try_consume(TokenKind::Star) {
            return Ok(SelectColumn::Star);
        }

        let expr = self.parse_expr()?;

        let alias = if self.try_consume(TokenKind::As) {
            Some(Column::new(self.parse_identifier()?))
        } else if self.config.implicit_alias && self.kind() == TokenKind::Identifier {
            Some(Column::new(self.advance().text))
        } else {
            None
        };

        Ok(SelectColumn::Aliased { expr, alias })
    }

    /// Parse comma-separated expression list
    fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];

        while self.try_consume(TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }

        Ok(exprs)
    }
}

/// Parse SQL text with the default configuration.
pub fn parse(sql: &str) -> ParseResult<Ast> {
    parse_with(sql, &ParserConfig::default())
}

/// Parse SQL text. Either the whole input is a valid statement and a
/// complete tree comes back, or nothing does.
pub fn parse_with(sql: &str, config: &ParserConfig) -> ParseResult<Ast> {
    let span = tracing::debug_span!("parse", len = sql.len());
    let _guard = span.enter();

    let result = Parser::new(sql, config).and_then(|mut parser| {
        tracing::trace!(tokens = parser.tokens.len(), "tokenized");
        parser.parse_statement()
    });

    match result {
        Ok(root) => Ok(Ast::new(root)),
        Err(error) => {
            tracing::debug!(
                offset = error.offset,
                message = %error.message,
                "parse failed"
            );
            Err(error)
        }
    }
}

/// Parse and immediately regenerate canonical text.
pub fn canonicalize(sql: &str) -> ParseResult<String> {
    parse(sql).map(|ast| ast.to_canonical_text())
}
