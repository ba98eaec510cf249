//! Parser tests: precedence, literals, calls, per-line recovery, error codes,
//! and desugaring of vector products.

use std::collections::BTreeMap;

use vectra_parser::{desugar_statement, parse_script, ParsedScript, Shape};
use vectra_types::ast::*;
use vectra_types::scene::LineId;
use vectra_types::ErrorCode;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Parse a single-line script and return its statement, panicking on errors.
fn parse_ok(source: &str) -> Statement {
    let parsed = parse_script(source);
    assert_eq!(parsed.lines.len(), 1, "expected exactly one line in {source:?}");
    match &parsed.lines[0].outcome {
        Ok(stmt) => stmt.clone(),
        Err(e) => panic!("unexpected error for {source:?}: {e}"),
    }
}

/// Parse a single-line script and return its error code.
fn parse_err(source: &str) -> ErrorCode {
    let parsed = parse_script(source);
    match &parsed.lines[0].outcome {
        Ok(stmt) => panic!("expected error for {source:?}, got {stmt:?}"),
        Err(e) => e.code,
    }
}

/// Render an expression as a fully parenthesized string for easy comparison.
fn show(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::NumberLit(n) => format!("{n}"),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Paren(inner) => show(inner),
        ExprKind::Unary { operand, .. } => format!("(-{})", show(operand)),
        ExprKind::Binary { left, op, right } => {
            format!("({} {} {})", show(left), op.as_str(), show(right))
        }
        ExprKind::Call { name, args } => {
            let args: Vec<String> = args.iter().map(show).collect();
            format!("{}({})", name.name, args.join(", "))
        }
        ExprKind::ListLit(elements) => {
            let elements: Vec<String> = elements.iter().map(show).collect();
            format!("[{}]", elements.join(", "))
        }
    }
}

fn rhs(source: &str) -> String {
    show(parse_ok(source).value())
}

fn error_lines(parsed: &ParsedScript) -> Vec<usize> {
    parsed.errors().map(|(line, _)| line.0).collect()
}

// ─────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_assignment() {
    let stmt = parse_ok("c = a + b");
    assert_eq!(stmt.target().map(|t| t.name.as_str()), Some("c"));
    assert_eq!(show(stmt.value()), "(a + b)");
}

#[test]
fn test_bare_expression() {
    let stmt = parse_ok("a * 2");
    assert!(stmt.target().is_none());
    assert_eq!(show(stmt.value()), "(a * 2)");
}

#[test]
fn test_blank_and_comment_lines_are_skipped() {
    let parsed = parse_script("\n# setup\na = 1\n\n   \nb = 2\n");
    let lines: Vec<LineId> = parsed.lines.iter().map(|l| l.line).collect();
    assert_eq!(lines, vec![LineId(2), LineId(5)]);
}

// ─────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(rhs("x = a + b * c"), "(a + (b * c))");
    assert_eq!(rhs("x = a - b - c"), "((a - b) - c)");
    assert_eq!(rhs("x = a / b * c"), "((a / b) * c)");
}

#[test]
fn test_power_is_right_associative() {
    assert_eq!(rhs("x = 2 ^ 3 ^ 2"), "(2 ^ (3 ^ 2))");
}

#[test]
fn test_unary_minus_and_power() {
    assert_eq!(rhs("x = -a ^ 2"), "(-(a ^ 2))");
    assert_eq!(rhs("x = 2 ^ -1"), "(2 ^ (-1))");
    assert_eq!(rhs("x = --a"), "(-(-a))");
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(rhs("x = (a + b) * c"), "((a + b) * c)");
}

// ─────────────────────────────────────────────────────────────────────
// Literals & calls
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_vector_literal() {
    assert_eq!(rhs("v = [1, 2, 3]"), "[1, 2, 3]");
}

#[test]
fn test_matrix_literal_rows() {
    assert_eq!(rhs("M = [1, 2; 3, 4]"), "[[1, 2], [3, 4]]");
}

#[test]
fn test_nested_list_literal() {
    assert_eq!(rhs("M = [[1, 0], [0, 1]]"), "[[1, 0], [0, 1]]");
}

#[test]
fn test_empty_list_literal() {
    assert_eq!(rhs("v = []"), "[]");
}

#[test]
fn test_call_arguments() {
    assert_eq!(rhs("d = dot(a, b + c)"), "dot(a, (b + c))");
    assert_eq!(rhs("z = f()"), "f()");
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_assignment_target() {
    assert_eq!(parse_err("1 = 2"), ErrorCode::INVALID_ASSIGNMENT_TARGET);
}

#[test]
fn test_trailing_tokens() {
    assert_eq!(parse_err("a = 1 2"), ErrorCode::UNEXPECTED_TOKEN);
}

#[test]
fn test_missing_operand() {
    assert_eq!(parse_err("a = 1 +"), ErrorCode::UNEXPECTED_TOKEN);
}

#[test]
fn test_unclosed_delimiters() {
    assert_eq!(parse_err("a = (1 + 2"), ErrorCode::UNCLOSED_DELIMITER);
    assert_eq!(parse_err("a = [1, 2"), ErrorCode::UNCLOSED_DELIMITER);
}

#[test]
fn test_nesting_limit() {
    let deep = format!("a = {}1{}", "(".repeat(40), ")".repeat(40));
    assert_eq!(parse_err(&deep), ErrorCode::STRUCTURAL_LIMIT_EXCEEDED);

    let shallow = format!("a = {}1{}", "(".repeat(10), ")".repeat(10));
    parse_ok(&shallow);
}

#[test]
fn test_operator_chain_limit() {
    let long = format!("x = 1{}", "+1".repeat(3000));
    assert_eq!(parse_err(&long), ErrorCode::STRUCTURAL_LIMIT_EXCEEDED);
    let long_product = format!("x = 2{}", "*2".repeat(3000));
    assert_eq!(parse_err(&long_product), ErrorCode::STRUCTURAL_LIMIT_EXCEEDED);

    let within = format!("x = 1{}", "+1".repeat(200));
    parse_ok(&within);
}

#[test]
fn test_operator_budget_is_per_line() {
    let chain = "+1".repeat(200);
    let source = format!("a = 1{chain}\nb = 1{chain}\nc = 1{}\nd = 2", "+1".repeat(3000));
    let parsed = parse_script(&source);
    assert_eq!(error_lines(&parsed), vec![2]);
    assert_eq!(parsed.statements().count(), 3);
}

#[test]
fn test_lexer_error_is_reported_for_its_line() {
    let parsed = parse_script("a = 1 $ 2\nb = 3");
    let errors: Vec<_> = parsed.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, LineId(0));
    assert_eq!(errors[0].1.code, ErrorCode::UNEXPECTED_CHARACTER);
}

#[test]
fn test_line_of_only_bad_characters() {
    let parsed = parse_script("a = 1\n$$\nb = 2");
    assert_eq!(error_lines(&parsed), vec![1]);
    assert_eq!(parsed.statements().count(), 2);
}

#[test]
fn test_error_does_not_spread_to_following_lines() {
    let parsed = parse_script("a = [1, 0, 0]\nb = (\nc = a * 2");
    assert_eq!(error_lines(&parsed), vec![1]);
    let names: Vec<_> = parsed
        .statements()
        .filter_map(|(_, s)| s.target().map(|t| t.name.clone()))
        .collect();
    assert_eq!(names, vec!["a", "c"]);
}

#[test]
fn test_error_message_format() {
    let parsed = parse_script("a = 1\nb = + )");
    let (_, err) = parsed.errors().next().unwrap();
    let rendered = err.to_string();
    assert!(rendered.starts_with("E100 at 2:5"), "got {rendered}");
    assert_eq!(err.source_line, "b = + )");
}

// ─────────────────────────────────────────────────────────────────────
// Desugaring
// ─────────────────────────────────────────────────────────────────────

fn shapes() -> BTreeMap<String, Shape> {
    BTreeMap::from([
        ("a".to_string(), Shape::Vector),
        ("b".to_string(), Shape::Vector),
        ("k".to_string(), Shape::Scalar),
        ("M".to_string(), Shape::Matrix),
    ])
}

fn desugared(source: &str) -> String {
    show(desugar_statement(&parse_ok(source), &shapes()).value())
}

#[test]
fn test_vector_star_becomes_cross() {
    assert_eq!(desugared("c = a * b"), "cross(a, b)");
}

#[test]
fn test_vector_caret_becomes_dot() {
    assert_eq!(desugared("d = a ^ b"), "dot(a, b)");
}

#[test]
fn test_literal_vectors_are_rewritten() {
    assert_eq!(
        desugared("c = [1, 0, 0] * [0, 1, 0]"),
        "cross([1, 0, 0], [0, 1, 0])"
    );
}

#[test]
fn test_non_vector_products_are_untouched() {
    assert_eq!(desugared("x = k * a"), "(k * a)");
    assert_eq!(desugared("x = M * a"), "(M * a)");
    assert_eq!(desugared("x = M ^ 2"), "(M ^ 2)");
    assert_eq!(desugared("x = q * a"), "(q * a)");
}

#[test]
fn test_matrix_vector_product_feeds_cross() {
    // M * a is a vector, so its product with b is a cross product
    assert_eq!(desugared("x = (M * a) * b"), "cross((M * a), b)");
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "a = [1, 0, 0]\nb = [0, 1, 0]\nc = a * b + (2 ^ 3)\nbad = (";
    let first = parse_script(source);
    for i in 0..100 {
        assert_eq!(first, parse_script(source), "Determinism failure at iteration {i}");
    }
}
