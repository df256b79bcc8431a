// Expression nodes and the precedence-climbing parser that builds them.
//
// Precedence is data: `get_precedence` is the whole binary/postfix operator
// table, and a single climbing loop consults it. Prefix forms (unary
// operators, `NOT`) and `COLLATE` are handled around the loop.

use crate::ast::Table;
use crate::parser::{ParseResult, Parser};
use crate::token::TokenKind;

/// Expression AST. Every node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Value(Value),

    /// Literal `NULL`
    Null,

    Column(Column),

    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Comparison, with the `ESCAPE` operand of the keyword forms.
    Cmp {
        op: CmpOp,
        left: Box<Expr>,
        right: Box<Expr>,
        escape: Option<Box<Expr>>,
    },

    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `left IS right`; `IS NOT` wraps `right` in `Not`.
    Is {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Not(Box<Expr>),

    IsNull(Box<Expr>),

    /// Both `NOTNULL` and `NOT NULL`.
    NotNull(Box<Expr>),

    /// `CAST (expr AS type)`
    Convert {
        expr: Box<Expr>,
        target: ConvertType,
    },

    Collate {
        expr: Box<Expr>,
        collation: String,
    },

    Between {
        op: BetweenOp,
        left: Box<Expr>,
        from: Box<Expr>,
        to: Box<Expr>,
    },

    /// Parenthesized tuple of two or more expressions.
    List(Vec<Expr>),

    Case(CaseExpr),
}

/// A literal in source form.
///
/// `raw` is the text as written, minus the quotes of strings and the
/// `x'...'` wrapper of blobs. Booleans are stored as `true`/`false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub kind: ValueKind,
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Str,
    Int,
    Float,
    HexNum,
    Blob,
}

impl Value {
    pub fn new(kind: ValueKind, raw: impl Into<String>) -> Self {
        Value {
            kind,
            raw: raw.into(),
        }
    }

    pub fn bool(value: bool) -> Self {
        Value::new(ValueKind::Bool, if value { "true" } else { "false" })
    }
}

/// Column reference, optionally qualified by a table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub table_ref: Option<Table>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            table_ref: None,
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            table_ref: Some(Table::new(table)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseExpr {
    pub subject: Option<Box<Expr>>,
    pub whens: Vec<When>,
    pub else_: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct When {
    pub condition: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Minus,
    Plus,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Plus,
    Minus,
    Mult,
    Div,
    Mod,
    BitAnd,
    BitOr,
    ShiftLeft,
    ShiftRight,
    Concat,
    JsonExtract,
    JsonUnquoteExtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Like,
    NotLike,
    Glob,
    NotGlob,
    Regexp,
    NotRegexp,
    Match,
    NotMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetweenOp {
    Between,
    NotBetween,
}

/// `CAST` target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertType {
    Text,
    Real,
    None,
    Numeric,
    Integer,
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(Column::new(name))
    }

    pub fn value(kind: ValueKind, raw: impl Into<String>) -> Self {
        Expr::Value(Value::new(kind, raw))
    }

    /// The loosest tier this node can appear in without parentheses.
    /// Self-delimiting nodes bind like a primary.
    pub(crate) fn precedence(&self) -> Precedence {
        match self {
            Expr::Or { .. } => Precedence::Or,
            Expr::And { .. } => Precedence::And,
            Expr::Not(_) => Precedence::Not,
            Expr::Is { .. } | Expr::IsNull(_) | Expr::NotNull(_) | Expr::Between { .. } => {
                Precedence::Is
            }
            Expr::Cmp { .. } => Precedence::Comparison,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { .. } => Precedence::Unary,
            Expr::Value(_)
            | Expr::Null
            | Expr::Column(_)
            | Expr::Convert { .. }
            | Expr::Collate { .. }
            | Expr::List(_)
            | Expr::Case(_) => Precedence::Collate,
        }
    }
}

impl Expr {
    /// Move every direct child out into `out`, leaving cheap leaves behind.
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        fn take(child: &mut Expr) -> Expr {
            std::mem::replace(child, Expr::Null)
        }

        match self {
            Expr::Value(_) | Expr::Null | Expr::Column(_) => {}
            Expr::Unary { expr, .. }
            | Expr::Not(expr)
            | Expr::IsNull(expr)
            | Expr::NotNull(expr)
            | Expr::Convert { expr, .. }
            | Expr::Collate { expr, .. } => out.push(take(expr)),
            Expr::Binary { left, right, .. }
            | Expr::And { left, right }
            | Expr::Or { left, right }
            | Expr::Is { left, right } => {
                out.push(take(left));
                out.push(take(right));
            }
            Expr::Cmp {
                left,
                right,
                escape,
                ..
            } => {
                out.push(take(left));
                out.push(take(right));
                if let Some(escape) = escape {
                    out.push(take(escape));
                }
            }
            Expr::Between { left, from, to, .. } => {
                out.push(take(left));
                out.push(take(from));
                out.push(take(to));
            }
            Expr::List(items) => out.append(items),
            Expr::Case(case) => {
                if let Some(subject) = &mut case.subject {
                    out.push(take(subject));
                }
                for when in std::mem::take(&mut case.whens) {
                    out.push(when.condition);
                    out.push(when.value);
                }
                if let Some(else_) = &mut case.else_ {
                    out.push(take(else_));
                }
            }
        }
    }
}

/// Tears nested children down from an explicit stack rather than one call
/// frame per level.
impl Drop for Expr {
    fn drop(&mut self) {
        if matches!(self, Expr::Value(_) | Expr::Null | Expr::Column(_)) {
            return;
        }

        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut expr) = stack.pop() {
            expr.detach_children(&mut stack);
        }
    }
}

impl UnaryOp {
    fn from_token(token: TokenKind) -> Option<Self> {
        match token {
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        }
    }
}

impl BinaryOp {
    /// Convert token to binary operator
    pub fn from_token(token: TokenKind) -> Option<Self> {
        match token {
            TokenKind::Plus => Some(BinaryOp::Plus),
            TokenKind::Minus => Some(BinaryOp::Minus),
            TokenKind::Star => Some(BinaryOp::Mult),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            TokenKind::Ampersand => Some(BinaryOp::BitAnd),
            TokenKind::Pipe => Some(BinaryOp::BitOr),
            TokenKind::ShiftLeft => Some(BinaryOp::ShiftLeft),
            TokenKind::ShiftRight => Some(BinaryOp::ShiftRight),
            TokenKind::Concat => Some(BinaryOp::Concat),
            TokenKind::Arrow => Some(BinaryOp::JsonExtract),
            TokenKind::LongArrow => Some(BinaryOp::JsonUnquoteExtract),
            _ => None,
        }
    }
}

impl BinaryOp {
    pub(crate) fn precedence(self) -> Precedence {
        match self {
            BinaryOp::BitAnd | BinaryOp::BitOr => Precedence::Bitwise,
            BinaryOp::ShiftLeft | BinaryOp::ShiftRight => Precedence::Shift,
            BinaryOp::Plus | BinaryOp::Minus => Precedence::Additive,
            BinaryOp::Mult | BinaryOp::Div | BinaryOp::Mod => Precedence::Multiplicative,
            BinaryOp::Concat | BinaryOp::JsonExtract | BinaryOp::JsonUnquoteExtract => {
                Precedence::Concat
            }
        }
    }
}

impl CmpOp {
    /// Comparison operator for a token, with `negated` for the `NOT` forms.
    pub fn from_token(token: TokenKind, negated: bool) -> Option<Self> {
        let op = match (token, negated) {
            (TokenKind::Equal, false) => CmpOp::Equal,
            (TokenKind::NotEqual, false) => CmpOp::NotEqual,
            (TokenKind::Greater, false) => CmpOp::Greater,
            (TokenKind::GreaterEqual, false) => CmpOp::GreaterEqual,
            (TokenKind::Less, false) => CmpOp::Less,
            (TokenKind::LessEqual, false) => CmpOp::LessEqual,
            (TokenKind::Like, false) => CmpOp::Like,
            (TokenKind::Like, true) => CmpOp::NotLike,
            (TokenKind::Glob, false) => CmpOp::Glob,
            (TokenKind::Glob, true) => CmpOp::NotGlob,
            (TokenKind::Regexp, false) => CmpOp::Regexp,
            (TokenKind::Regexp, true) => CmpOp::NotRegexp,
            (TokenKind::Match, false) => CmpOp::Match,
            (TokenKind::Match, true) => CmpOp::NotMatch,
            _ => return None,
        };
        Some(op)
    }

    /// Keyword comparisons take an optional `ESCAPE` operand.
    fn takes_escape(self) -> bool {
        !matches!(
            self,
            CmpOp::Equal
                | CmpOp::NotEqual
                | CmpOp::Greater
                | CmpOp::GreaterEqual
                | CmpOp::Less
                | CmpOp::LessEqual
        )
    }
}

impl ConvertType {
    fn from_token(token: TokenKind) -> Option<Self> {
        match token {
            TokenKind::TypeText => Some(ConvertType::Text),
            TokenKind::TypeReal => Some(ConvertType::Real),
            TokenKind::TypeNone => Some(ConvertType::None),
            TokenKind::TypeNumeric => Some(ConvertType::Numeric),
            TokenKind::TypeInteger => Some(ConvertType::Integer),
            _ => None,
        }
    }
}

/// Binding tiers, loosest first. Derived `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Or,
    And,
    /// Prefix `NOT`
    Not,
    /// `IS`, `ISNULL`, `NOTNULL`, `NOT NULL`, `BETWEEN`
    Is,
    Comparison,
    Bitwise,
    Shift,
    Additive,
    Multiplicative,
    /// `||`, `->`, `->>`
    Concat,
    Unary,
    Collate,
}

impl Precedence {
    /// The tier that binds one step tighter.
    pub(crate) fn next(self) -> Self {
        match self {
            Precedence::Lowest => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Not,
            Precedence::Not => Precedence::Is,
            Precedence::Is => Precedence::Comparison,
            Precedence::Comparison => Precedence::Bitwise,
            Precedence::Bitwise => Precedence::Shift,
            Precedence::Shift => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Concat,
            Precedence::Concat => Precedence::Unary,
            Precedence::Unary | Precedence::Collate => Precedence::Collate,
        }
    }
}

/// Operator precedence table: `(tier, is_left_associative)` for every token
/// that continues an expression after an operand.
fn get_precedence(token: TokenKind) -> Option<(Precedence, bool)> {
    match token {
        TokenKind::Or => Some((Precedence::Or, true)),
        TokenKind::And => Some((Precedence::And, true)),
        TokenKind::Is | TokenKind::IsNull | TokenKind::NotNull | TokenKind::Between => {
            Some((Precedence::Is, true))
        }
        TokenKind::Equal
        | TokenKind::NotEqual
        | TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::Less
        | TokenKind::LessEqual
        | TokenKind::Like
        | TokenKind::Glob
        | TokenKind::Regexp
        | TokenKind::Match => Some((Precedence::Comparison, true)),
        TokenKind::Ampersand | TokenKind::Pipe => Some((Precedence::Bitwise, true)),
        TokenKind::ShiftLeft | TokenKind::ShiftRight => Some((Precedence::Shift, true)),
        TokenKind::Plus | TokenKind::Minus => Some((Precedence::Additive, true)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
            Some((Precedence::Multiplicative, true))
        }
        TokenKind::Concat | TokenKind::Arrow | TokenKind::LongArrow => {
            Some((Precedence::Concat, true))
        }
        _ => None,
    }
}

impl<'a> Parser<'a> {
    /// Parse an expression using precedence climbing
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_with_precedence(Precedence::Lowest)
    }

    /// Infix tier of the upcoming token. `NOT` only continues an expression
    /// when it introduces `NOT LIKE`, `NOT BETWEEN`, `NOT NULL` and friends.
    fn infix_precedence(&self) -> Option<(Precedence, bool)> {
        match self.kind() {
            TokenKind::Not => match self.peek(1) {
                TokenKind::Null => Some((Precedence::Is, true)),
                next @ (TokenKind::Between
                | TokenKind::Like
                | TokenKind::Glob
                | TokenKind::Regexp
                | TokenKind::Match) => get_precedence(next),
                _ => None,
            },
            kind => get_precedence(kind),
        }
    }

    /// Parse expression with minimum precedence
    #[recursive::recursive]
    fn parse_expr_with_precedence(&mut self, min_prec: Precedence) -> ParseResult<Expr> {
        let mut left = if self.kind() == TokenKind::Not {
            self.advance();
            Expr::Not(Box::new(
                self.parse_expr_with_precedence(Precedence::Not.next())?,
            ))
        } else {
            self.parse_unary()?
        };

        loop {
            let Some((prec, is_left)) = self.infix_precedence() else {
                self.track("operator");
                break;
            };
            if prec < min_prec {
                break;
            }
            let next_min_prec = if is_left { prec.next() } else { prec };
            left = self.parse_infix(left, next_min_prec)?;
        }

        Ok(left)
    }

    /// Consume one infix or postfix operator and its operands.
    fn parse_infix(&mut self, left: Expr, next_min_prec: Precedence) -> ParseResult<Expr> {
        let left = Box::new(left);
        let op_kind = self.advance().kind;

        let expr = match op_kind {
            TokenKind::Or => Expr::Or {
                left,
                right: Box::new(self.parse_expr_with_precedence(next_min_prec)?),
            },
            TokenKind::And => Expr::And {
                left,
                right: Box::new(self.parse_expr_with_precedence(next_min_prec)?),
            },
            TokenKind::Is => {
                let negated = self.try_consume(TokenKind::Not);
                let right = self.parse_expr_with_precedence(next_min_prec)?;
                let right = if negated {
                    Expr::Not(Box::new(right))
                } else {
                    right
                };
                Expr::Is {
                    left,
                    right: Box::new(right),
                }
            }
            TokenKind::IsNull => Expr::IsNull(left),
            TokenKind::NotNull => Expr::NotNull(left),
            TokenKind::Between => self.parse_between(left, BetweenOp::Between)?,
            TokenKind::Not => {
                let negated_kind = self.advance().kind;
                match negated_kind {
                    TokenKind::Null => Expr::NotNull(left),
                    TokenKind::Between => self.parse_between(left, BetweenOp::NotBetween)?,
                    kind => match CmpOp::from_token(kind, true) {
                        Some(op) => self.parse_comparison(left, op, next_min_prec)?,
                        None => {
                            return Err(
                                self.error_at_previous("LIKE, GLOB, REGEXP, MATCH, BETWEEN or NULL")
                            )
                        }
                    },
                }
            }
            kind => {
                if let Some(op) = CmpOp::from_token(kind, false) {
                    self.parse_comparison(left, op, next_min_prec)?
                } else if let Some(op) = BinaryOp::from_token(kind) {
                    Expr::Binary {
                        op,
                        left,
                        right: Box::new(self.parse_expr_with_precedence(next_min_prec)?),
                    }
                } else {
                    return Err(self.error_at_previous("operator"));
                }
            }
        };

        Ok(expr)
    }

    fn parse_comparison(
        &mut self,
        left: Box<Expr>,
        op: CmpOp,
        next_min_prec: Precedence,
    ) -> ParseResult<Expr> {
        let right = Box::new(self.parse_expr_with_precedence(next_min_prec)?);

        let escape = if op.takes_escape() && self.try_consume(TokenKind::Escape) {
            Some(Box::new(self.parse_expr_with_precedence(next_min_prec)?))
        } else {
            None
        };

        Ok(Expr::Cmp {
            op,
            left,
            right,
            escape,
        })
    }

    /// Bounds are parsed at the additive tier so the `AND` separating them
    /// is never taken for a logical `AND`.
    fn parse_between(&mut self, left: Box<Expr>, op: BetweenOp) -> ParseResult<Expr> {
        let from = Box::new(self.parse_expr_with_precedence(Precedence::Additive)?);
        self.expect(TokenKind::And)?;
        let to = Box::new(self.parse_expr_with_precedence(Precedence::Additive)?);

        Ok(Expr::Between { op, left, from, to })
    }

    /// Prefix `-`, `+`, `~`, right-recursive so they nest. A `-` glued to
    /// integer digits is a sign, not an operator.
    #[recursive::recursive]
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.at_signed_integer() {
            return self.parse_collated_primary();
        }

        match UnaryOp::from_token(self.kind()) {
            Some(op) => {
                self.advance();
                Ok(Expr::Unary {
                    op,
                    expr: Box::new(self.parse_unary()?),
                })
            }
            None => self.parse_collated_primary(),
        }
    }

    /// A primary followed by any number of `COLLATE name` suffixes.
    fn parse_collated_primary(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;

        while self.try_consume(TokenKind::Collate) {
            let collation = self.parse_identifier()?.to_string();
            expr = Expr::Collate {
                expr: Box::new(expr),
                collation,
            };
        }

        Ok(expr)
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.current().clone();
        let text = token.text;

        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(Expr::value(ValueKind::Int, text))
            }
            TokenKind::Minus if self.at_signed_integer() => {
                Ok(Expr::value(ValueKind::Int, self.take_signed_integer()))
            }
            TokenKind::Float => {
                self.advance();
                Ok(Expr::value(ValueKind::Float, text))
            }
            TokenKind::HexNumber => {
                self.advance();
                Ok(Expr::value(ValueKind::HexNum, text))
            }
            TokenKind::String => {
                self.advance();
                // Remove quotes
                Ok(Expr::value(ValueKind::Str, &text[1..text.len() - 1]))
            }
            TokenKind::Blob => {
                self.advance();
                // Remove x' and '
                Ok(Expr::value(ValueKind::Blob, &text[2..text.len() - 1]))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(Expr::Value(Value::bool(token.kind == TokenKind::True)))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Null)
            }
            TokenKind::Identifier => {
                self.advance();
                if self.try_consume(TokenKind::Dot) {
                    let name = self.parse_identifier()?;
                    Ok(Expr::Column(Column::qualified(text, name)))
                } else {
                    Ok(Expr::column(text))
                }
            }
            TokenKind::Cast => self.parse_cast(),
            TokenKind::Case => self.parse_case(),
            TokenKind::LeftParen => {
                self.advance();
                let first = self.parse_expr()?;
                if self.try_consume(TokenKind::Comma) {
                    let mut items = vec![first, self.parse_expr()?];
                    while self.try_consume(TokenKind::Comma) {
                        items.push(self.parse_expr()?);
                    }
                    self.expect(TokenKind::RightParen)?;
                    Ok(Expr::List(items))
                } else {
                    self.expect(TokenKind::RightParen)?;
                    Ok(first)
                }
            }
            _ => Err(self.error_expected("expression")),
        }
    }

    /// `CAST ( expr AS type )`
    fn parse_cast(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::Cast)?;
        self.expect(TokenKind::LeftParen)?;
        let expr = Box::new(self.parse_expr()?);
        self.expect(TokenKind::As)?;

        let target = match ConvertType::from_token(self.kind()) {
            Some(target) => {
                self.advance();
                target
            }
            None => return Err(self.error_expected("TEXT, REAL, NONE, NUMERIC or INTEGER")),
        };

        self.expect(TokenKind::RightParen)?;
        Ok(Expr::Convert { expr, target })
    }

    /// `CASE [expr] (WHEN expr THEN expr)+ [ELSE expr] END`
    fn parse_case(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::Case)?;

        let subject = if self.kind() == TokenKind::When {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut whens = Vec::new();
        while self.try_consume(TokenKind::When) {
            let condition = self.parse_expr()?;
            self.expect(TokenKind::Then)?;
            let value = self.parse_expr()?;
            whens.push(When { condition, value });
        }
        if whens.is_empty() {
            return Err(self.error_expected("WHEN"));
        }

        let else_ = if self.try_consume(TokenKind::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };

        self.expect(TokenKind::End)?;
        Ok(Expr::Case(CaseExpr {
            subject,
            whens,
            else_,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;

    fn parse_expr(input: &str) -> Expr {
        let config = ParserConfig::default();
        let mut parser = Parser::new(input, &config).unwrap();
        let expr = parser.parse_expr().unwrap();
        assert_eq!(parser.kind(), TokenKind::Eof, "trailing input in {input}");
        expr
    }

    fn col(name: &str) -> Box<Expr> {
        Box::new(Expr::column(name))
    }

    fn int(raw: &str) -> Box<Expr> {
        Box::new(Expr::value(ValueKind::Int, raw))
    }

    #[test]
    fn test_precedence() {
        // Should parse as (2 + (3 * 4))
        assert_eq!(
            parse_expr("2 + 3 * 4"),
            Expr::Binary {
                op: BinaryOp::Plus,
                left: int("2"),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Mult,
                    left: int("3"),
                    right: int("4"),
                }),
            }
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse_expr("a - b - c"),
            Expr::Binary {
                op: BinaryOp::Minus,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Minus,
                    left: col("a"),
                    right: col("b"),
                }),
                right: col("c"),
            }
        );
    }

    #[test]
    fn test_or_is_root() {
        let expr = parse_expr("age > 18 AND status = 'active' OR admin = 1");
        let Expr::Or { left, .. } = &expr else {
            panic!("expected OR at the root");
        };
        assert!(matches!(**left, Expr::And { .. }));
    }

    #[test]
    fn test_collate_binds_to_operand() {
        assert_eq!(
            parse_expr("c1 = c2 COLLATE rtrim"),
            Expr::Cmp {
                op: CmpOp::Equal,
                left: col("c1"),
                right: Box::new(Expr::Collate {
                    expr: col("c2"),
                    collation: "rtrim".to_string(),
                }),
                escape: None,
            }
        );
    }

    #[test]
    fn test_unary_nests() {
        assert_eq!(
            parse_expr("- -column"),
            Expr::Unary {
                op: UnaryOp::Minus,
                expr: Box::new(Expr::Unary {
                    op: UnaryOp::Minus,
                    expr: col("column"),
                }),
            }
        );
    }

    #[test]
    fn test_is_not() {
        assert_eq!(
            parse_expr("a is not b"),
            Expr::Is {
                left: col("a"),
                right: Box::new(Expr::Not(col("b"))),
            }
        );
    }

    #[test]
    fn test_not_null_spellings() {
        assert_eq!(parse_expr("a not null"), Expr::NotNull(col("a")));
        assert_eq!(parse_expr("a notnull"), Expr::NotNull(col("a")));
        assert_eq!(parse_expr("a isnull"), Expr::IsNull(col("a")));
    }

    #[test]
    fn test_between_bounds_stop_before_and() {
        let expr = parse_expr("a between 1 + 1 and 5 and b");
        assert_eq!(
            expr,
            Expr::And {
                left: Box::new(Expr::Between {
                    op: BetweenOp::Between,
                    left: col("a"),
                    from: Box::new(Expr::Binary {
                        op: BinaryOp::Plus,
                        left: int("1"),
                        right: int("1"),
                    }),
                    to: int("5"),
                }),
                right: col("b"),
            }
        );
    }

    #[test]
    fn test_prefix_not() {
        assert_eq!(
            parse_expr("NOT a = 1 AND b"),
            Expr::And {
                left: Box::new(Expr::Not(Box::new(Expr::Cmp {
                    op: CmpOp::Equal,
                    left: col("a"),
                    right: int("1"),
                    escape: None,
                }))),
                right: col("b"),
            }
        );
    }

    #[test]
    fn test_like_escape() {
        let expr = parse_expr(r"a not like '%a\%%' escape '\'");
        assert_eq!(
            expr,
            Expr::Cmp {
                op: CmpOp::NotLike,
                left: col("a"),
                right: Box::new(Expr::value(ValueKind::Str, r"%a\%%")),
                escape: Some(Box::new(Expr::value(ValueKind::Str, r"\"))),
            }
        );
    }

    #[test]
    fn test_parenthesized_single_collapses() {
        assert_eq!(parse_expr("((a))"), Expr::column("a"));
        assert_eq!(
            parse_expr("(a, b)"),
            Expr::List(vec![Expr::column("a"), Expr::column("b")])
        );
    }

    #[test]
    fn test_qualified_column() {
        assert_eq!(
            parse_expr("t.b"),
            Expr::Column(Column::qualified("t", "b"))
        );
    }

    #[test]
    fn test_precedence_table_is_ordered() {
        assert!(Precedence::Or < Precedence::And);
        assert!(Precedence::Is < Precedence::Comparison);
        assert!(Precedence::Concat > Precedence::Multiplicative);
        assert_eq!(Precedence::Collate.next(), Precedence::Collate);
        assert_eq!(
            get_precedence(TokenKind::Arrow),
            Some((Precedence::Concat, true))
        );
        assert_eq!(get_precedence(TokenKind::Comma), None);
    }

    #[test]
    fn test_dangling_operator_fails() {
        let config = ParserConfig::default();
        let mut parser = Parser::new("a +", &config).unwrap();
        let err = parser.parse_expr().unwrap_err();
        assert!(err.message.contains("expression"));
        assert_eq!(err.lexeme, None);
    }

    #[test]
    fn test_signed_integer_only_in_operand_position() {
        assert_eq!(parse_expr("-12"), *int("-12"));
        assert_eq!(
            parse_expr("- 12"),
            Expr::Unary {
                op: UnaryOp::Minus,
                expr: int("12"),
            }
        );

        let minus = |left: Box<Expr>, right: Box<Expr>| Expr::Binary {
            op: BinaryOp::Minus,
            left,
            right,
        };
        assert_eq!(parse_expr("5-3"), minus(int("5"), int("3")));
        assert_eq!(parse_expr("c1 -10"), minus(col("c1"), int("10")));
        assert_eq!(parse_expr("(c1)-1"), minus(col("c1"), int("1")));
        assert_eq!(parse_expr("a - -1"), minus(col("a"), int("-1")));
        assert_eq!(
            parse_expr("-2.3"),
            Expr::Unary {
                op: UnaryOp::Minus,
                expr: Box::new(Expr::value(ValueKind::Float, "2.3")),
            }
        );
    }

    #[test]
    fn test_deep_tree_drops() {
        let depth = 100_000;
        let config = ParserConfig::default();
        let sql = format!("{}c", "~".repeat(depth));
        let mut parser = Parser::new(&sql, &config).unwrap();
        let expr = parser.parse_expr().unwrap();
        assert!(matches!(expr, Expr::Unary { .. }));
        drop(expr);
    }

    #[test]
    fn test_malformed_case_fails() {
        let config = ParserConfig::default();
        let mut parser = Parser::new("CASE a ELSE b END", &config).unwrap();
        assert!(parser.parse_expr().is_err());
    }
}
