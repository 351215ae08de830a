use crate::parser::Expr;
use bumpalo::Bump;

use super::parser::parse;

// Helper function to parse an expression and return the AST.
//
// We test precedence by comparing whether two expressions parenthesized in
// different ways yield the same AST.
fn ast<'a>(arena: &'a Bump, source: &'a str) -> &'a Expr<'a> {
    let parsed = parse(arena, source)
        .unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", source, e));
    parsed.expr
}

#[test]
fn test_addition_vs_subtraction() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a + b - c"), ast(&arena, "(a + b) - c"));
    assert_eq!(ast(&arena, "a - b + c"), ast(&arena, "(a - b) + c"));
    assert_eq!(
        ast(&arena, "a + b - c + d - e + f"),
        ast(&arena, "((((a + b) - c) + d) - e) + f")
    );
}

#[test]
fn test_addition_vs_multiplication() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a + b * c"), ast(&arena, "a + (b * c)"));
    assert_eq!(ast(&arena, "a * b + c"), ast(&arena, "(a * b) + c"));
    assert_eq!(ast(&arena, "a // b % c"), ast(&arena, "(a // b) % c"));
}

#[test]
fn test_power_is_right_associative() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a ** b ** c"), ast(&arena, "a ** (b ** c)"));
}

#[test]
fn test_unary_minus_vs_power() {
    let arena = Bump::new();
    // `-2 ** 2` is `-(2 ** 2)`.
    assert_eq!(ast(&arena, "-a ** b"), ast(&arena, "-(a ** b)"));
    assert_eq!(ast(&arena, "-a * b"), ast(&arena, "(-a) * b"));
    assert_eq!(ast(&arena, "- - a"), ast(&arena, "-(-a)"));
}

#[test]
fn test_and_vs_or() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a and b or c"), ast(&arena, "(a and b) or c"));
    assert_eq!(ast(&arena, "a or b and c"), ast(&arena, "a or (b and c)"));
}

#[test]
fn test_not_vs_comparison() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "not a == b"), ast(&arena, "not (a == b)"));
    assert_eq!(ast(&arena, "not a and b"), ast(&arena, "(not a) and b"));
}

#[test]
fn test_bitwise_levels() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a | b ^ c & d"), ast(&arena, "a | (b ^ (c & d))"));
    assert_eq!(ast(&arena, "a & b << c"), ast(&arena, "a & (b << c)"));
    assert_eq!(ast(&arena, "a << b + c"), ast(&arena, "a << (b + c)"));
}

#[test]
fn test_comparison_vs_bitwise() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "a < b | c"), ast(&arena, "a < (b | c)"));
    assert_eq!(ast(&arena, "a in b + c"), ast(&arena, "a in (b + c)"));
}

#[test]
fn test_postfix_binds_tightest() {
    let arena = Bump::new();
    assert_eq!(ast(&arena, "-a.b"), ast(&arena, "-(a.b)"));
    assert_eq!(ast(&arena, "-f(x)"), ast(&arena, "-(f(x))"));
    assert_eq!(ast(&arena, "a ** b[0]"), ast(&arena, "a ** (b[0])"));
    assert_eq!(
        ast(&arena, "datetime.datetime(1, 2, 3)"),
        ast(&arena, "(datetime.datetime)(1, 2, 3)")
    );
}

#[test]
fn test_conditional_is_lowest() {
    let arena = Bump::new();
    assert_eq!(
        ast(&arena, "a or b if c else d"),
        ast(&arena, "(a or b) if c else d")
    );
    assert_eq!(
        ast(&arena, "a if b else c if d else e"),
        ast(&arena, "a if b else (c if d else e)")
    );
}
