//! AST node types for Vectra scripts.
//!
//! A script is a sequence of single-line statements. Every node carries a
//! [`Span`] for error reporting.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `name = expr`
    Assign { target: Ident, value: Expr },
    /// A bare expression; evaluated for its errors only.
    Expr(Expr),
}

impl Statement {
    /// The assignment target, if this line is in `name = expr` form.
    pub fn target(&self) -> Option<&Ident> {
        match &self.kind {
            StatementKind::Assign { target, .. } => Some(target),
            StatementKind::Expr(_) => None,
        }
    }

    /// The expression on the right-hand side (or the whole line).
    pub fn value(&self) -> &Expr {
        match &self.kind {
            StatementKind::Assign { value, .. } => value,
            StatementKind::Expr(expr) => expr,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the identifier name if this expression is a bare identifier,
    /// looking through parentheses.
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            ExprKind::Paren(inner) => inner.as_identifier(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `42`, `3.14`, `1e-3`
    NumberLit(f64),
    /// `[a, b, c]`, `[[1, 2], [3, 4]]`, or `[1, 2; 3, 4]` (rows desugared
    /// into nested lists by the parser)
    ListLit(Vec<Expr>),
    /// `a`, `basis_x`
    Identifier(String),
    /// `cross(a, b)`
    Call { name: Ident, args: Vec<Expr> },
    /// `a + b`, `m * v`, `a ^ 2`
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `-x`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `(expr)`
    Paren(Box<Expr>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}
