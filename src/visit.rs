// Read-only traversal over the AST.
//
// `Visitor` hooks default to walking into children, so an implementation
// overrides only the nodes it cares about and calls the matching `walk_*`
// function if it still wants to descend.

use crate::ast::{Ast, Select, SelectColumn, Statement, Table, Where};
use crate::expr::{Column, Expr, Value};

pub trait Visitor {
    fn visit_select(&mut self, select: &Select) {
        walk_select(self, select);
    }

    fn visit_select_column(&mut self, column: &SelectColumn) {
        walk_select_column(self, column);
    }

    fn visit_where(&mut self, where_clause: &Where) {
        self.visit_expr(&where_clause.expr);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_table(&mut self, _table: &Table) {}

    fn visit_column(&mut self, column: &Column) {
        if let Some(table) = &column.table_ref {
            self.visit_table(table);
        }
    }

    fn visit_value(&mut self, _value: &Value) {}
}

pub fn walk_ast<V: Visitor + ?Sized>(visitor: &mut V, ast: &Ast) {
    match &ast.root {
        Statement::Select(select) => visitor.visit_select(select),
    }
}

pub fn walk_select<V: Visitor + ?Sized>(visitor: &mut V, select: &Select) {
    for column in &select.columns {
        visitor.visit_select_column(column);
    }
    visitor.visit_table(&select.from);
    if let Some(where_clause) = &select.where_clause {
        visitor.visit_where(where_clause);
    }
    for expr in &select.group_by {
        visitor.visit_expr(expr);
    }
    if let Some(having) = &select.having {
        visitor.visit_where(having);
    }
}

pub fn walk_select_column<V: Visitor + ?Sized>(visitor: &mut V, column: &SelectColumn) {
    if let SelectColumn::Aliased { expr, alias } = column {
        visitor.visit_expr(expr);
        if let Some(alias) = alias {
            visitor.visit_column(alias);
        }
    }
}

/// Recurses through `visit_expr`; the stack grows on demand, so arbitrarily
/// deep trees are fine.
#[recursive::recursive]
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Column(column) => visitor.visit_column(column),
        Expr::Value(value) => visitor.visit_value(value),
        _ => {
            for child in expr.children() {
                visitor.visit_expr(child);
            }
        }
    }
}

impl Expr {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Value(_) | Expr::Null | Expr::Column(_) => Vec::new(),
            Expr::Unary { expr, .. }
            | Expr::Not(expr)
            | Expr::IsNull(expr)
            | Expr::NotNull(expr)
            | Expr::Convert { expr, .. }
            | Expr::Collate { expr, .. } => vec![&**expr],
            Expr::Binary { left, right, .. }
            | Expr::And { left, right }
            | Expr::Or { left, right }
            | Expr::Is { left, right } => vec![&**left, &**right],
            Expr::Cmp {
                left,
                right,
                escape,
                ..
            } => {
                let mut children = vec![&**left, &**right];
                children.extend(escape.as_deref());
                children
            }
            Expr::Between { left, from, to, .. } => vec![&**left, &**from, &**to],
            Expr::List(items) => items.iter().collect(),
            Expr::Case(case) => {
                let mut children = Vec::new();
                children.extend(case.subject.as_deref());
                for when in &case.whens {
                    children.push(&when.condition);
                    children.push(&when.value);
                }
                children.extend(case.else_.as_deref());
                children
            }
        }
    }
}

impl Ast {
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        walk_ast(visitor, self);
    }
}
