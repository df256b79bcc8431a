// Canonical SQL text for any tree the parser can build.
//
// Keywords and operators come out lowercase, `<>` as `!=`, `NOT NULL` as
// `notnull`, blobs as `X'..'`. Literal payloads and identifiers are written
// back exactly as captured.
//
// Parentheses appear only where the grammar needs them. Besides `CAST (...)`
// and tuples, that is a slot which parses a restricted form: the operand of
// a unary operator or `COLLATE`, and each `BETWEEN` bound. A subtree in such
// a slot is written with exact grouping so it parses back as itself. A `NOT`
// operand looser than `NOT` is parenthesized too. Elsewhere only the token
// order is printed, and any parse of that text prints the same text again.

use crate::ast::{Ast, Select, SelectColumn, Statement, Table, Where, WhereKind};
use crate::expr::{
    BetweenOp, BinaryOp, CaseExpr, CmpOp, Column, ConvertType, Expr, Precedence, UnaryOp, Value,
    ValueKind,
};
use std::fmt;

impl Ast {
    /// Regenerate canonical SQL text. Never fails.
    pub fn to_canonical_text(&self) -> String {
        self.to_string()
    }
}

/// Write `items` separated by `, `.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "select ")?;
        write_list(f, &self.columns)?;
        write!(f, " from {}", self.from)?;

        if let Some(where_clause) = &self.where_clause {
            write!(f, " {}", where_clause)?;
        }

        if !self.group_by.is_empty() {
            write!(f, " group by ")?;
            write_list(f, &self.group_by)?;
        }

        if let Some(having) = &self.having {
            write!(f, " {}", having)?;
        }

        Ok(())
    }
}

impl fmt::Display for SelectColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectColumn::Star => write!(f, "*"),
            SelectColumn::Aliased { expr, alias } => {
                write!(f, "{}", expr)?;
                if let Some(alias) = alias {
                    write!(f, " as {}", alias)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.kind {
            WhereKind::Where => "where",
            WhereKind::Having => "having",
        };
        write!(f, "{} {}", keyword, self.expr)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(table) = &self.table_ref {
            write!(f, "{}.", table)?;
        }
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueKind::Str => write!(f, "'{}'", self.raw),
            ValueKind::Blob => write!(f, "X'{}'", self.raw),
            ValueKind::Bool | ValueKind::Int | ValueKind::Float | ValueKind::HexNum => {
                write!(f, "{}", self.raw)
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self, Grouping::Minimal)
    }
}

impl fmt::Display for CaseExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_case(f, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// Parenthesize restricted slots only.
    Minimal,
    /// Parenthesize every operand that binds looser than its slot.
    Exact,
}

#[recursive::recursive]
fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, grouping: Grouping) -> fmt::Result {
    match expr {
        Expr::Value(value) => write!(f, "{}", value),
        Expr::Null => write!(f, "null"),
        Expr::Column(column) => write!(f, "{}", column),
        Expr::Unary { op, expr } => {
            write!(f, "{}", op)?;
            // `- -x` must not collapse into a `--` comment or a signed literal.
            if needs_space_after_unary(expr) {
                write!(f, " ")?;
            }
            write_operand(f, expr, Precedence::Unary, Grouping::Exact)
        }
        Expr::Binary { op, left, right } => {
            let prec = op.precedence();
            write_child(f, left, prec, grouping)?;
            write!(f, " {} ", op)?;
            write_child(f, right, prec.next(), grouping)
        }
        Expr::Cmp {
            op,
            left,
            right,
            escape,
        } => {
            write_child(f, left, Precedence::Comparison, grouping)?;
            write!(f, " {} ", op)?;
            write_child(f, right, Precedence::Bitwise, grouping)?;
            if let Some(escape) = escape {
                write!(f, " escape ")?;
                write_child(f, escape, Precedence::Bitwise, grouping)?;
            }
            Ok(())
        }
        Expr::And { left, right } => {
            write_child(f, left, Precedence::And, grouping)?;
            write!(f, " and ")?;
            write_child(f, right, Precedence::Not, grouping)
        }
        Expr::Or { left, right } => {
            write_child(f, left, Precedence::Or, grouping)?;
            write!(f, " or ")?;
            write_child(f, right, Precedence::And, grouping)
        }
        Expr::Is { left, right } => {
            write_child(f, left, Precedence::Is, grouping)?;
            match &**right {
                Expr::Not(negated) => {
                    write!(f, " is not ")?;
                    write_child(f, negated, Precedence::Comparison, grouping)
                }
                right => {
                    write!(f, " is ")?;
                    write_child(f, right, Precedence::Comparison, grouping)
                }
            }
        }
        Expr::Not(expr) => {
            write!(f, "not ")?;
            write_operand(f, expr, Precedence::Not, grouping)
        }
        Expr::IsNull(expr) => {
            write_child(f, expr, Precedence::Is, grouping)?;
            write!(f, " isnull")
        }
        Expr::NotNull(expr) => {
            write_child(f, expr, Precedence::Is, grouping)?;
            write!(f, " notnull")
        }
        Expr::Convert { expr, target } => {
            write!(f, "cast (")?;
            write_expr(f, expr, Grouping::Minimal)?;
            write!(f, " as {})", target)
        }
        Expr::Collate { expr, collation } => {
            write_operand(f, expr, Precedence::Collate, Grouping::Exact)?;
            write!(f, " collate {}", collation)
        }
        Expr::Between { op, left, from, to } => {
            write_child(f, left, Precedence::Is, grouping)?;
            write!(f, " {} ", op)?;
            write_operand(f, from, Precedence::Additive, Grouping::Exact)?;
            write!(f, " and ")?;
            write_operand(f, to, Precedence::Additive, Grouping::Exact)
        }
        Expr::List(items) => {
            write!(f, "(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_expr(f, item, Grouping::Minimal)?;
            }
            write!(f, ")")
        }
        Expr::Case(case) => write_case(f, case),
    }
}

/// An operand of an infix or postfix operator. Only exact grouping guards
/// these slots.
fn write_child(
    f: &mut fmt::Formatter<'_>,
    expr: &Expr,
    slot: Precedence,
    grouping: Grouping,
) -> fmt::Result {
    match grouping {
        Grouping::Minimal => write_expr(f, expr, grouping),
        Grouping::Exact => write_operand(f, expr, slot, grouping),
    }
}

/// Write `expr` into a slot that parses nothing looser than `slot`.
fn write_operand(
    f: &mut fmt::Formatter<'_>,
    expr: &Expr,
    slot: Precedence,
    grouping: Grouping,
) -> fmt::Result {
    if expr.precedence() < slot {
        write!(f, "(")?;
        write_expr(f, expr, grouping)?;
        write!(f, ")")
    } else {
        write_expr(f, expr, grouping)
    }
}

/// Whether a unary operand must be set apart from its operator: a nested
/// unary, or a signed literal (possibly under `COLLATE` suffixes).
fn needs_space_after_unary(operand: &Expr) -> bool {
    let mut expr = operand;
    loop {
        match expr {
            Expr::Unary { .. } => return true,
            Expr::Value(value) => return value.raw.starts_with('-'),
            Expr::Collate { expr: inner, .. } if inner.precedence() >= Precedence::Collate => {
                expr = &**inner
            }
            _ => return false,
        }
    }
}

fn write_case(f: &mut fmt::Formatter<'_>, case: &CaseExpr) -> fmt::Result {
    write!(f, "case")?;
    if let Some(subject) = &case.subject {
        write!(f, " ")?;
        write_expr(f, subject, Grouping::Minimal)?;
    }
    for when in &case.whens {
        write!(f, " when ")?;
        write_expr(f, &when.condition, Grouping::Minimal)?;
        write!(f, " then ")?;
        write_expr(f, &when.value, Grouping::Minimal)?;
    }
    if let Some(else_) = &case.else_ {
        write!(f, " else ")?;
        write_expr(f, else_, Grouping::Minimal)?;
    }
    write!(f, " end")
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Mult => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Concat => "||",
            BinaryOp::JsonExtract => "->",
            BinaryOp::JsonUnquoteExtract => "->>",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpOp::Equal => "=",
            CmpOp::NotEqual => "!=",
            CmpOp::Greater => ">",
            CmpOp::GreaterEqual => ">=",
            CmpOp::Less => "<",
            CmpOp::LessEqual => "<=",
            CmpOp::Like => "like",
            CmpOp::NotLike => "not like",
            CmpOp::Glob => "glob",
            CmpOp::NotGlob => "not glob",
            CmpOp::Regexp => "regexp",
            CmpOp::NotRegexp => "not regexp",
            CmpOp::Match => "match",
            CmpOp::NotMatch => "not match",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for BetweenOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetweenOp::Between => write!(f, "between"),
            BetweenOp::NotBetween => write!(f, "not between"),
        }
    }
}

impl fmt::Display for ConvertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConvertType::Text => "text",
            ConvertType::Real => "real",
            ConvertType::None => "none",
            ConvertType::Numeric => "numeric",
            ConvertType::Integer => "integer",
        };
        write!(f, "{}", s)
    }
}
