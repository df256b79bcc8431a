// Statement-level AST nodes.
//
// Nodes are plain owned data: built once by the parser, read by the deparser
// and by callers, never mutated in place.

use crate::expr::{Column, Expr};

/// Root of a parsed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    pub root: Statement,
}

/// SQL Statement types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(Box<Select>),
    // Other statement kinds can be layered on later.
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub columns: Vec<SelectColumn>,
    pub from: Table,
    pub where_clause: Option<Where>,
    /// Empty when there is no `GROUP BY`.
    pub group_by: Vec<Expr>,
    pub having: Option<Where>,
}

/// One item of the select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectColumn {
    Star,
    Aliased { expr: Expr, alias: Option<Column> },
}

/// Table reference. Identity is the name; nothing is resolved against a
/// catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    pub name: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table { name: name.into() }
    }
}

/// A filtering clause. `kind` tells `WHERE` from `HAVING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Where {
    pub kind: WhereKind,
    pub expr: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhereKind {
    Where,
    Having,
}

impl Ast {
    pub fn new(root: Statement) -> Self {
        Ast { root }
    }

    /// The SELECT at the root.
    pub fn select(&self) -> &Select {
        match &self.root {
            Statement::Select(select) => select,
        }
    }
}

impl SelectColumn {
    pub fn expr(expr: Expr) -> Self {
        SelectColumn::Aliased { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        SelectColumn::Aliased {
            expr,
            alias: Some(Column::new(alias)),
        }
    }
}

impl Select {
    /// A bare `SELECT <columns> FROM <table>`.
    pub fn new(columns: Vec<SelectColumn>, from: Table) -> Self {
        Select {
            columns,
            from,
            where_clause: None,
            group_by: Vec::new(),
            having: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_select_accessor() {
        let ast = parse("SELECT * FROM t").unwrap();
        let select = ast.select();
        assert_eq!(select.columns, vec![SelectColumn::Star]);
        assert_eq!(select.from, Table::new("t"));
        assert!(select.where_clause.is_none());
        assert!(select.group_by.is_empty());
    }

    #[test]
    fn test_transformations_build_new_trees() {
        let ast = parse("SELECT a FROM t").unwrap();

        let mut select = ast.select().clone();
        select.from = Table::new("u");
        let rewritten = Ast::new(Statement::Select(Box::new(select)));

        assert_eq!(ast.select().from.name, "t");
        assert_eq!(rewritten.select().from.name, "u");
        assert_eq!(rewritten.select().columns, vec![SelectColumn::expr(Expr::column("a"))]);
    }
}
