//! Core expression and statement evaluator.

use vectra_linalg as linalg;
use vectra_parser::desugar_statement;
use vectra_types::ast::*;
use vectra_types::{MatrixValue, Span, Value};

use crate::env::SymbolTable;
use crate::error::{AtSpan, EvalError, EvalResult};

/// Outcome of executing one statement.
#[derive(Debug, Clone)]
pub struct Executed {
    /// The statement after vector-product desugaring.
    pub statement: Statement,
    pub value: Value,
}

/// Walks AST nodes and produces [`Value`]s.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    pub symbols: SymbolTable,
}

impl Evaluator {
    pub fn new(symbols: SymbolTable) -> Self {
        Self { symbols }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    /// Desugar, evaluate, and bind one statement.
    ///
    /// An assignment binds its target only when evaluation succeeds, so a
    /// failing line leaves any earlier binding of the name in place.
    pub fn execute(&mut self, stmt: &Statement) -> EvalResult<Executed> {
        let statement = desugar_statement(stmt, &self.symbols);
        let value = self.eval_expr(statement.value())?;
        if let Some(target) = statement.target() {
            self.symbols.define(&target.name, value.clone());
        }
        Ok(Executed { statement, value })
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Scalar(*n)),
            ExprKind::Identifier(name) => self.eval_identifier(name, expr.span),
            ExprKind::ListLit(elems) => self.eval_list_literal(elems, expr.span),
            ExprKind::Call { name, args } => self.eval_call(name, args, expr.span),
            ExprKind::Binary { left, op, right } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                eval_binary(*op, l, r, expr.span)
            }
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => Ok(negate(self.eval_expr(operand)?)),
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    fn eval_identifier(&self, name: &str, span: Span) -> EvalResult<Value> {
        self.symbols
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: name.to_string(),
                span,
            })
    }

    // ── Literals ──────────────────────────────────────────────────────────

    /// All scalars → vector; equal-length vectors → matrix; anything else
    /// has no representation.
    fn eval_list_literal(&self, elems: &[Expr], span: Span) -> EvalResult<Value> {
        if elems.is_empty() {
            return Err(EvalError::UnsupportedShape {
                message: "empty list".to_string(),
                span,
            });
        }
        let values = elems
            .iter()
            .map(|e| self.eval_expr(e))
            .collect::<EvalResult<Vec<_>>>()?;

        if values.iter().all(|v| matches!(v, Value::Scalar(_))) {
            let components = values
                .into_iter()
                .filter_map(|v| match v {
                    Value::Scalar(x) => Some(x),
                    _ => None,
                })
                .collect();
            return Ok(Value::Vector(components));
        }

        if values.iter().all(|v| matches!(v, Value::Vector(_))) {
            let rows = values
                .into_iter()
                .filter_map(|v| match v {
                    Value::Vector(row) => Some(row),
                    _ => None,
                })
                .collect();
            return MatrixValue::new(rows)
                .map(Value::Matrix)
                .map_err(|e| EvalError::UnsupportedShape {
                    message: e.to_string(),
                    span,
                });
        }

        let message = if values.iter().any(|v| matches!(v, Value::Matrix(_))) {
            "lists nested deeper than a matrix are not supported".to_string()
        } else {
            "a list must hold only numbers or only vectors".to_string()
        };
        Err(EvalError::UnsupportedShape { message, span })
    }

    // ── Built-in functions ────────────────────────────────────────────────

    fn eval_call(&self, name: &Ident, args: &[Expr], span: Span) -> EvalResult<Value> {
        let arity = match name.name.as_str() {
            "dot" | "cross" => 2,
            "norm" | "inv" | "det" | "transpose" | "rank" => 1,
            other => {
                return Err(EvalError::UnknownFunction {
                    name: other.to_string(),
                    span: name.span,
                })
            }
        };
        if args.len() != arity {
            return Err(EvalError::WrongArgCount {
                name: name.name.clone(),
                expected: arity,
                found: args.len(),
                span,
            });
        }
        let values = args
            .iter()
            .map(|a| self.eval_expr(a))
            .collect::<EvalResult<Vec<_>>>()?;

        match (name.name.as_str(), values.as_slice()) {
            ("dot", [Value::Vector(a), Value::Vector(b)]) => {
                linalg::dot_product(a, b).at(span).map(Value::Scalar)
            }
            ("cross", [Value::Vector(a), Value::Vector(b)]) => {
                linalg::cross_product(a, b).at(span).map(Value::Vector)
            }
            ("norm", [Value::Vector(v)]) => Ok(Value::Scalar(linalg::norm(v))),
            ("inv", [Value::Matrix(m)]) => linalg::invert_matrix(m).at(span).map(Value::Matrix),
            ("det", [Value::Matrix(m)]) => linalg::determinant(m).at(span).map(Value::Scalar),
            ("transpose", [Value::Matrix(m)]) => Ok(Value::Matrix(linalg::transpose(m))),
            ("rank", [Value::Matrix(m)]) => Ok(Value::Scalar(linalg::rank(m) as f64)),
            (fname, _) => {
                let expected = match fname {
                    "dot" | "cross" | "norm" => "vector",
                    _ => "matrix",
                };
                let got: Vec<String> = values.iter().map(Value::type_name).collect();
                Err(EvalError::TypeMismatch {
                    message: format!("{fname}() expects {expected} arguments, got {}", got.join(", ")),
                    span,
                })
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════

fn negate(value: Value) -> Value {
    match value {
        Value::Scalar(x) => Value::Scalar(-x),
        Value::Vector(v) => Value::Vector(v.iter().map(|x| -x).collect()),
        Value::Matrix(m) => Value::Matrix(m.map(|x| -x)),
    }
}

fn eval_binary(op: BinOp, left: Value, right: Value, span: Span) -> EvalResult<Value> {
    match op {
        BinOp::Add => elementwise(op, left, right, span, |a, b| a + b),
        BinOp::Sub => elementwise(op, left, right, span, |a, b| a - b),
        BinOp::Mul => multiply(left, right, span),
        BinOp::Div => divide(left, right, span),
        BinOp::Pow => power(left, right, span),
    }
}

fn mismatch(op: BinOp, left: &Value, right: &Value, span: Span) -> EvalError {
    EvalError::TypeMismatch {
        message: format!(
            "cannot apply '{}' to {} and {}",
            op.as_str(),
            left.type_name(),
            right.type_name()
        ),
        span,
    }
}

/// `+` and `-`: equal shapes pair up entries, scalars broadcast.
fn elementwise(
    op: BinOp,
    left: Value,
    right: Value,
    span: Span,
    f: impl Fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    match (&left, &right) {
        (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(f(*a, *b))),
        (Value::Vector(a), Value::Vector(b)) => {
            let result = match op {
                BinOp::Add => linalg::add_vectors(a, b),
                _ => linalg::subtract_vectors(a, b),
            };
            result
                .map(Value::Vector)
                .map_err(|_| EvalError::DimensionMismatch {
                    message: format!(
                        "cannot apply '{}' to {} and {}",
                        op.as_str(),
                        left.type_name(),
                        right.type_name()
                    ),
                    span,
                })
        }
        (Value::Matrix(a), Value::Matrix(b)) => {
            if a.shape() != b.shape() {
                return Err(EvalError::DimensionMismatch {
                    message: format!(
                        "cannot apply '{}' to {} and {}",
                        op.as_str(),
                        left.type_name(),
                        right.type_name()
                    ),
                    span,
                });
            }
            let rows = a
                .rows()
                .iter()
                .zip(b.rows())
                .map(|(ra, rb)| ra.iter().zip(rb).map(|(x, y)| f(*x, *y)).collect())
                .collect();
            MatrixValue::new(rows)
                .map(Value::Matrix)
                .map_err(|e| EvalError::UnsupportedShape {
                    message: e.to_string(),
                    span,
                })
        }
        (Value::Scalar(s), Value::Vector(v)) => {
            Ok(Value::Vector(v.iter().map(|x| f(*s, *x)).collect()))
        }
        (Value::Vector(v), Value::Scalar(s)) => {
            Ok(Value::Vector(v.iter().map(|x| f(*x, *s)).collect()))
        }
        (Value::Scalar(s), Value::Matrix(m)) => Ok(Value::Matrix(m.map(|x| f(*s, x)))),
        (Value::Matrix(m), Value::Scalar(s)) => Ok(Value::Matrix(m.map(|x| f(x, *s)))),
        _ => Err(mismatch(op, &left, &right, span)),
    }
}

fn multiply(left: Value, right: Value, span: Span) -> EvalResult<Value> {
    match (&left, &right) {
        (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(a * b)),
        (Value::Scalar(s), Value::Vector(v)) | (Value::Vector(v), Value::Scalar(s)) => {
            Ok(Value::Vector(linalg::scale_vector(v, *s)))
        }
        (Value::Scalar(s), Value::Matrix(m)) | (Value::Matrix(m), Value::Scalar(s)) => {
            Ok(Value::Matrix(m.map(|x| x * s)))
        }
        (Value::Matrix(a), Value::Matrix(b)) => {
            linalg::multiply_matrices(a, b).at(span).map(Value::Matrix)
        }
        (Value::Matrix(m), Value::Vector(v)) => {
            linalg::matrix_vector_product(m, v).at(span).map(Value::Vector)
        }
        (Value::Vector(_), Value::Vector(_)) => Err(EvalError::TypeMismatch {
            message: "vector * vector has no meaning here".to_string(),
            span,
        }),
        _ => Err(mismatch(BinOp::Mul, &left, &right, span)),
    }
}

fn divide(left: Value, right: Value, span: Span) -> EvalResult<Value> {
    let Value::Scalar(divisor) = right else {
        return Err(mismatch(BinOp::Div, &left, &right, span));
    };
    if divisor == 0.0 {
        return Err(EvalError::ArithmeticTrap {
            message: "division by zero".to_string(),
            span,
        });
    }
    Ok(match left {
        Value::Scalar(x) => Value::Scalar(x / divisor),
        Value::Vector(v) => Value::Vector(v.iter().map(|x| x / divisor).collect()),
        Value::Matrix(m) => Value::Matrix(m.map(|x| x / divisor)),
    })
}

fn power(left: Value, right: Value, span: Span) -> EvalResult<Value> {
    match (&left, &right) {
        (Value::Scalar(base), Value::Scalar(exp)) => {
            let result = base.powf(*exp);
            if !result.is_finite() {
                return Err(EvalError::ArithmeticTrap {
                    message: format!("{base} ^ {exp} is not a finite number"),
                    span,
                });
            }
            Ok(Value::Scalar(result))
        }
        (Value::Matrix(m), Value::Scalar(exp)) => {
            if *exp < 0.0 || exp.fract() != 0.0 || *exp > f64::from(u32::MAX) {
                return Err(EvalError::TypeMismatch {
                    message: format!("matrix powers need a non-negative integer exponent, got {exp}"),
                    span,
                });
            }
            linalg::matrix_power(m, *exp as u32)
                .at(span)
                .map(Value::Matrix)
        }
        _ => Err(mismatch(BinOp::Pow, &left, &right, span)),
    }
}
