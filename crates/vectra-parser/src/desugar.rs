//! Vector-product desugaring.
//!
//! `a * b` and `a ^ b` mean different things depending on what `a` and `b`
//! hold. Once both operands are known to be vectors the operators are
//! rewritten into explicit calls:
//!
//! ```text
//! a * b   →   cross(a, b)
//! a ^ b   →   dot(a, b)
//! ```
//!
//! Every other expression passes through untouched.

use std::collections::BTreeMap;

use vectra_types::ast::{BinOp, Expr, ExprKind, Ident, Statement, StatementKind};

/// Statically inferred shape of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Vector,
    Matrix,
    Unknown,
}

/// Answers "what shape does this name currently hold?".
pub trait ShapeLookup {
    fn shape_of(&self, name: &str) -> Shape;
}

impl ShapeLookup for BTreeMap<String, Shape> {
    fn shape_of(&self, name: &str) -> Shape {
        self.get(name).copied().unwrap_or(Shape::Unknown)
    }
}

/// Infer the shape of an expression without evaluating it.
pub fn infer_shape(expr: &Expr, env: &impl ShapeLookup) -> Shape {
    match &expr.kind {
        ExprKind::NumberLit(_) => Shape::Scalar,
        ExprKind::Identifier(name) => env.shape_of(name),
        ExprKind::Paren(inner) => infer_shape(inner, env),
        ExprKind::Unary { operand, .. } => infer_shape(operand, env),
        ExprKind::ListLit(elements) => {
            list_shape(elements.iter().map(|e| infer_shape(e, env)).collect())
        }
        ExprKind::Call { name, .. } => call_shape(&name.name),
        ExprKind::Binary { left, op, right } => {
            binary_shape(*op, infer_shape(left, env), infer_shape(right, env))
        }
    }
}

fn list_shape(shapes: Vec<Shape>) -> Shape {
    if shapes.is_empty() {
        Shape::Unknown
    } else if shapes.iter().all(|s| *s == Shape::Scalar) {
        Shape::Vector
    } else if shapes.iter().all(|s| *s == Shape::Vector) {
        Shape::Matrix
    } else {
        Shape::Unknown
    }
}

fn call_shape(name: &str) -> Shape {
    match name {
        "cross" => Shape::Vector,
        "dot" | "det" | "norm" | "rank" => Shape::Scalar,
        "inv" | "transpose" => Shape::Matrix,
        _ => Shape::Unknown,
    }
}

fn binary_shape(op: BinOp, left: Shape, right: Shape) -> Shape {
    use Shape::*;
    match op {
        BinOp::Add | BinOp::Sub => match (left, right) {
            (Unknown, _) | (_, Unknown) => Unknown,
            (l, r) if l == r => l,
            (Scalar, other) | (other, Scalar) => other,
            _ => Unknown,
        },
        BinOp::Mul => match (left, right) {
            (Unknown, _) | (_, Unknown) => Unknown,
            (Scalar, other) | (other, Scalar) => other,
            (Matrix, Matrix) => Matrix,
            (Matrix, Vector) | (Vector, Vector) => Vector,
            (Vector, Matrix) => Unknown,
        },
        BinOp::Div => match (left, right) {
            (other, Scalar) if other != Unknown => other,
            _ => Unknown,
        },
        BinOp::Pow => match (left, right) {
            (Vector, Vector) | (Scalar, Scalar) => Scalar,
            (Matrix, Scalar) => Matrix,
            _ => Unknown,
        },
    }
}

/// Rewrite vector products in a statement, bottom-up.
pub fn desugar_statement(stmt: &Statement, env: &impl ShapeLookup) -> Statement {
    let kind = match &stmt.kind {
        StatementKind::Assign { target, value } => StatementKind::Assign {
            target: target.clone(),
            value: desugar_expr(value, env).0,
        },
        StatementKind::Expr(expr) => StatementKind::Expr(desugar_expr(expr, env).0),
    };
    Statement {
        kind,
        span: stmt.span,
    }
}

/// Rewrite `expr` and return it with its shape, computed in the same walk.
fn desugar_expr(expr: &Expr, env: &impl ShapeLookup) -> (Expr, Shape) {
    let (kind, shape) = match &expr.kind {
        ExprKind::NumberLit(_) => (expr.kind.clone(), Shape::Scalar),
        ExprKind::Identifier(name) => (expr.kind.clone(), env.shape_of(name)),
        ExprKind::Paren(inner) => {
            let (inner, shape) = desugar_expr(inner, env);
            (ExprKind::Paren(Box::new(inner)), shape)
        }
        ExprKind::Unary { op, operand } => {
            let (operand, shape) = desugar_expr(operand, env);
            let kind = ExprKind::Unary {
                op: *op,
                operand: Box::new(operand),
            };
            (kind, shape)
        }
        ExprKind::ListLit(elements) => {
            let (elements, shapes): (Vec<Expr>, Vec<Shape>) =
                elements.iter().map(|e| desugar_expr(e, env)).unzip();
            (ExprKind::ListLit(elements), list_shape(shapes))
        }
        ExprKind::Call { name, args } => {
            let kind = ExprKind::Call {
                name: name.clone(),
                args: args.iter().map(|a| desugar_expr(a, env).0).collect(),
            };
            (kind, call_shape(&name.name))
        }
        ExprKind::Binary { left, op, right } => {
            let (left, left_shape) = desugar_expr(left, env);
            let (right, right_shape) = desugar_expr(right, env);
            let shape = binary_shape(*op, left_shape, right_shape);
            let both_vectors = left_shape == Shape::Vector && right_shape == Shape::Vector;
            let callee = match op {
                BinOp::Mul if both_vectors => Some("cross"),
                BinOp::Pow if both_vectors => Some("dot"),
                _ => None,
            };
            let kind = match callee {
                Some(callee) => {
                    log::trace!("rewrote `{}` at {} into {callee}()", op.as_str(), expr.span);
                    ExprKind::Call {
                        name: Ident::new(callee, expr.span),
                        args: vec![left, right],
                    }
                }
                None => ExprKind::Binary {
                    left: Box::new(left),
                    op: *op,
                    right: Box::new(right),
                },
            };
            (kind, shape)
        }
    };
    (Expr::new(kind, expr.span), shape)
}
