//! Tree dump of the Logix AST.
//!
//! Renders statements and expressions one node per line, with box-drawing
//! connectors showing the nesting:
//!
//! ```text
//! Program [0..9]
//! └── ExprStmt [0..9]
//!     └── Binary + [0..9]
//!         ├── Identifier a [0..1]
//!         └── Binary * [4..9]
//!             ├── Identifier b [4..5]
//!             └── Identifier c [8..9]
//! ```
//!
//! Used by the compile driver for `Debug`-level AST dumps.

use std::fmt;

use crate::ast::{Expr, Stmt};
use crate::span::{Span, Spanned};

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Configuration for tree dumps.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Append `[start..end]` to every node
    pub show_spans: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { show_spans: true }
    }
}

/// One line of the tree and what hangs below it.
enum Node<'a> {
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    /// Unspanned label grouping related children, e.g. `params`.
    Group(&'static str, Vec<Node<'a>>),
}

/// Renders AST nodes as an indented tree.
#[derive(Debug, Default)]
pub struct TreePrinter {
    /// Configuration
    config: TreeConfig,
}

impl TreePrinter {
    /// Creates a printer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Renders a statement and everything below it.
    #[must_use]
    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        self.render(Node::Stmt(stmt))
    }

    /// Renders an expression and everything below it.
    #[must_use]
    pub fn print_expr(&self, expr: &Expr) -> String {
        self.render(Node::Expr(expr))
    }

    fn render(&self, root: Node<'_>) -> String {
        let mut out = String::new();
        let (label, children) = self.describe(root);
        out.push_str(&label);
        out.push('\n');
        self.render_children(&mut out, children, "");
        out
    }

    fn render_children(&self, out: &mut String, children: Vec<Node<'_>>, prefix: &str) {
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            let last = i + 1 == count;
            let (label, grandchildren) = self.describe(child);
            out.push_str(prefix);
            out.push_str(if last { LAST } else { BRANCH });
            out.push_str(&label);
            out.push('\n');

            let nested = format!("{prefix}{}", if last { SPACE } else { PIPE });
            self.render_children(out, grandchildren, &nested);
        }
    }

    fn describe<'a>(&self, node: Node<'a>) -> (String, Vec<Node<'a>>) {
        match node {
            Node::Stmt(stmt) => {
                let (label, children) = stmt_parts(stmt);
                (self.labelled(label, stmt.span()), children)
            }
            Node::Expr(expr) => {
                let (label, children) = expr_parts(expr);
                (self.labelled(label, expr.span()), children)
            }
            Node::Group(name, children) => (name.to_owned(), children),
        }
    }

    fn labelled(&self, label: String, span: Span) -> String {
        if self.config.show_spans {
            format!("{label} [{}..{}]", span.start, span.end)
        } else {
            label
        }
    }
}

fn stmt_parts(stmt: &Stmt) -> (String, Vec<Node<'_>>) {
    let name = stmt.kind_name();
    match stmt {
        Stmt::Program { stmts, .. } | Stmt::Block { stmts, .. } => {
            (name.to_owned(), stmts.iter().map(Node::Stmt).collect())
        }
        Stmt::Expr { expr, .. } => (name.to_owned(), vec![Node::Expr(expr)]),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            let mut children = vec![
                Node::Group("condition", vec![Node::Expr(condition)]),
                Node::Group("then", vec![Node::Stmt(then_branch)]),
            ];
            if let Some(else_branch) = else_branch {
                children.push(Node::Group("else", vec![Node::Stmt(else_branch)]));
            }
            (name.to_owned(), children)
        }
        Stmt::For {
            var,
            iterable,
            body,
            ..
        } => {
            let label = match var {
                Some(var) => format!("{name} {var}"),
                None => name.to_owned(),
            };
            let mut children: Vec<_> = iterable.iter().map(Node::Expr).collect();
            children.push(Node::Stmt(body));
            (label, children)
        }
        Stmt::While {
            condition, body, ..
        } => (
            name.to_owned(),
            vec![Node::Expr(condition), Node::Stmt(body)],
        ),
        Stmt::Break { .. } | Stmt::Continue { .. } => (name.to_owned(), Vec::new()),
        Stmt::Fn {
            name: fn_name,
            params,
            results,
            body,
            ..
        } => {
            let mut children = vec![Node::Group(
                "params",
                params.iter().map(Node::Expr).collect(),
            )];
            if !results.is_empty() {
                children.push(Node::Group(
                    "results",
                    results.iter().map(Node::Expr).collect(),
                ));
            }
            children.push(Node::Stmt(body));
            (format!("{name} {fn_name}"), children)
        }
        Stmt::Return { value, .. } => (name.to_owned(), value.iter().map(Node::Expr).collect()),
        Stmt::Assign {
            target, op, value, ..
        } => {
            let label = match op {
                Some(op) => format!("{name} {op}="),
                None => name.to_owned(),
            };
            (label, vec![Node::Expr(target), Node::Expr(value)])
        }
        Stmt::SetVar {
            target, op, value, ..
        } => {
            let label = match op {
                Some(op) => format!("{name} {op}="),
                None => name.to_owned(),
            };
            let mut children = vec![Node::Expr(target)];
            children.extend(value.iter().map(Node::Expr));
            (label, children)
        }
    }
}

fn expr_parts(expr: &Expr) -> (String, Vec<Node<'_>>) {
    let name = expr.kind_name();
    match expr {
        Expr::Literal { value, .. } => (format!("{name} {value}"), Vec::new()),
        Expr::Identifier(ident) => (format!("{name} {ident}"), Vec::new()),
        Expr::Unary { op, operand, .. } => (format!("{name} {op}"), vec![Node::Expr(operand)]),
        Expr::Binary {
            left, op, right, ..
        } => (
            format!("{name} {op}"),
            vec![Node::Expr(left), Node::Expr(right)],
        ),
        Expr::Array { elements, .. } => (name.to_owned(), elements.iter().map(Node::Expr).collect()),
        Expr::Index { target, index, .. } => {
            (name.to_owned(), vec![Node::Expr(target), Node::Expr(index)])
        }
        Expr::Range {
            start,
            end,
            inclusive,
            ..
        } => {
            let op = if *inclusive { "..=" } else { ".." };
            let mut children = Vec::new();
            if let Some(start) = start {
                children.push(Node::Group("start", vec![Node::Expr(start)]));
            }
            if let Some(end) = end {
                children.push(Node::Group("end", vec![Node::Expr(end)]));
            }
            (format!("{name} {op}"), children)
        }
        Expr::Call { callee, args, .. } => (
            name.to_owned(),
            vec![
                Node::Expr(callee),
                Node::Group("args", args.iter().map(Node::Expr).collect()),
            ],
        ),
        Expr::Get { object, field, .. } => {
            (name.to_owned(), vec![Node::Expr(object), Node::Expr(field)])
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TreePrinter::new().print_stmt(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TreePrinter::new().print_expr(self))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::source_map::SourceMap;

    fn parse(text: &str) -> Stmt {
        let mut diagnostics = Diagnostics::new();
        let mut lexer = Lexer::new(Arc::new(SourceMap::new(0, text)));
        let program = Parser::new(&mut lexer, &mut diagnostics).parse();
        assert!(!diagnostics.has_errors());
        program
    }

    #[test]
    fn test_tree_config_default() {
        let config = TreeConfig::default();
        assert!(config.show_spans);
    }

    #[test]
    fn test_print_precedence_tree() {
        let program = parse("a + b * c");
        let expected = "\
Program [0..9]
└── ExprStmt [0..9]
    └── Binary + [0..9]
        ├── Identifier a [0..1]
        └── Binary * [4..9]
            ├── Identifier b [4..5]
            └── Identifier c [8..9]
";
        assert_eq!(TreePrinter::new().print_stmt(&program), expected);
    }

    #[test]
    fn test_print_without_spans() {
        let program = parse("fn add(a, b) -> r { r += a }");
        let printer = TreePrinter::new().with_config(TreeConfig { show_spans: false });
        let expected = "\
Program
└── Fn add
    ├── params
    │   ├── Identifier a
    │   └── Identifier b
    ├── results
    │   └── Identifier r
    └── Block
        └── Assign +=
            ├── Identifier r
            └── Identifier a
";
        assert_eq!(printer.print_stmt(&program), expected);
    }

    #[test]
    fn test_print_range_and_call() {
        let program = parse("f(..=3)");
        let printer = TreePrinter::new().with_config(TreeConfig { show_spans: false });
        let expected = "\
Program
└── ExprStmt
    └── Call
        ├── Identifier f
        └── args
            └── Range ..=
                └── end
                    └── Literal 3
";
        assert_eq!(printer.print_stmt(&program), expected);
    }

    #[test]
    fn test_display_uses_tree() {
        let program = parse("x");
        assert!(program.to_string().starts_with("Program [0..1]\n"));
    }
}
