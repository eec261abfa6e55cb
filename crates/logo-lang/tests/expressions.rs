//! Expression evaluation tests.
//!
//! Each case compiles a standalone expression and evaluates it against a fresh
//! interpreter.

use logo_lang::{compile_expression, Interpreter, RuntimeErrorKind};
use std::f32::consts::FRAC_PI_4;

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn eval(src: &str) -> f32 {
    let expr = compile_expression(src).unwrap_or_else(|errs| {
        panic!("compile failed for {src:?}: {errs:#?}");
    });
    Interpreter::new()
        .evaluate(&expr)
        .unwrap_or_else(|e| panic!("evaluation of {src:?} failed: {e}"))
}

fn eval_err(src: &str) -> RuntimeErrorKind {
    let expr = compile_expression(src).unwrap_or_else(|errs| {
        panic!("compile failed (expected runtime error, not compile error): {errs:#?}");
    });
    match Interpreter::new().evaluate(&expr) {
        Ok(v) => panic!("expected {src:?} to fail, got {v}"),
        Err(e) => e.kind,
    }
}

fn assert_close(src: &str, expected: f32, delta: f32) {
    let got = eval(src);
    assert!((got - expected).abs() <= delta, "{src}: expected {expected} ± {delta}, got {got}");
}

// ─── Literals ────────────────────────────────────────────────────────────────

#[test]
fn number_literals() {
    assert_eq!(eval("4"), 4.0);
    assert_eq!(eval("4.5"), 4.5);
    assert_eq!(eval(".5"), 0.5);
    assert_eq!(eval("-3.2"), -3.2);
}

#[test]
fn boolean_literals() {
    assert_eq!(eval("true"), 1.0);
    assert_eq!(eval("false"), 0.0);
}

#[test]
fn unbound_variable_reads_zero() {
    assert_eq!(eval(":nothing + 1"), 1.0);
}

// ─── Prefix operators ────────────────────────────────────────────────────────

#[test]
fn arithmetic_prefix_forms() {
    assert_close("sum 4 3.2", 7.2, 1e-5);
    assert_close("difference 4 3.2", 0.8, 1e-5);
    assert_close("product 2 4.3", 8.6, 1e-5);
    assert_eq!(eval("quotient 3 2"), 1.5);
    assert_eq!(eval("power 2 3"), 8.0);
    assert_eq!(eval("minus 4"), -4.0);
}

#[test]
fn remainder_and_modulo_signs() {
    assert_eq!(eval("remainder 2 2"), 0.0);
    assert_eq!(eval("modulo 2 2"), 0.0);
    assert_eq!(eval("remainder -3 2"), -1.0);
    assert_eq!(eval("remainder 3 -2"), 1.0);
    assert_eq!(eval("modulo -3 2"), 1.0);
    assert_eq!(eval("modulo 3 -2"), -1.0);
}

#[test]
fn variadic_forms() {
    assert_eq!(eval("(sum 1 2 3 4 5 6 7 8 9)"), 45.0);
    assert_eq!(eval("(product 4 3 2 1)"), 24.0);
    assert_eq!(eval("(quotient 4)"), 0.25);
    assert_eq!(eval("(and 1 1 -1)"), 1.0);
    assert_eq!(eval("(or 0 0 0.5)"), 0.0);
}

#[test]
fn rounding_and_roots() {
    assert_close("abs -10.2", 10.2, 1e-5);
    assert_eq!(eval("int 5.5"), 5.0);
    assert_eq!(eval("round 5.5"), 6.0);
    assert_eq!(eval("sqrt 4"), 2.0);
    assert_close("sqrt 5", 2.236, 0.001);
}

#[test]
fn logarithms() {
    assert_close("exp 4", 54.598, 0.001);
    assert_close("Log10 11", 1.041, 0.001);
    assert_close("Ln 10", 2.302, 0.001);
}

#[test]
fn trigonometry() {
    assert_close("sin 3.1415", 0.0, 0.001);
    assert_close("cos 3.1415", -1.0, 0.001);
    assert_close("tan 3.1415", 0.0, 0.001);
    assert_close("radsin 180", 0.0, 0.001);
    assert_close("radcos 180", -1.0, 0.001);
    assert_close("radtan 180", 0.0, 0.001);
}

#[test]
fn arctangents() {
    assert_close("arctan 3.1415", 1.2626, 0.001);
    assert_close("radarctan 180", 1.2626, 0.001);
    assert_close("(arctan 3.1415 3.1415)", FRAC_PI_4, 0.001);
    assert_close("(radarctan 180 180)", FRAC_PI_4, 0.001);
}

#[test]
fn comparison_prefix_names() {
    assert_eq!(eval("less? 1 2"), 1.0);
    assert_eq!(eval("lessp 2 1"), 0.0);
    assert_eq!(eval("greaterEqual? 2 2"), 1.0);
    assert_eq!(eval("not 0.5"), 1.0);
}

// ─── Infix operators ─────────────────────────────────────────────────────────

#[test]
fn infix_arithmetic() {
    assert_close("4 + 3.2", 7.2, 1e-5);
    assert_close("3 - 2.1", 0.9, 1e-5);
    assert_close("3 * 2.3", 6.9, 1e-5);
    assert_eq!(eval("2 / 4"), 0.5);
    assert_eq!(eval("2 % 4"), 2.0);
    assert_close("9.3 ^ 2", 86.49, 1e-3);
}

#[test]
fn infix_comparisons() {
    assert_eq!(eval("1 < 2"), 1.0);
    assert_eq!(eval("1 > 2"), 0.0);
    assert_eq!(eval("2 <= 2"), 1.0);
    assert_eq!(eval("1 >= 2"), 0.0);
    assert_eq!(eval("3 = 3"), 1.0);
    assert_eq!(eval("3 <> 3"), 0.0);
}

// ─── Precedence ──────────────────────────────────────────────────────────────

#[test]
fn precedence() {
    assert_eq!(eval("2 * 3 + 4"), 10.0);
    assert_eq!(eval("4 + 3 * 2"), 10.0);
    assert_eq!(eval("2 + 3 ^ 2"), 11.0);
    assert_eq!(eval("3 ^ 2 + 2"), 11.0);
    assert_eq!(eval(" 3 * - 2"), -6.0);
    assert_eq!(eval("(2 + 3) * 4"), 20.0);
    assert_eq!(eval("1 + 1 < 3"), 1.0);
}

#[test]
fn power_is_right_associative() {
    assert_close("3 ^ 2 ^ 3", 6561.0, 1e-2);
    assert_eq!(eval("2 ^ 3 ^ 0"), 2.0);
}

#[test]
fn unary_minus_binds_looser_than_power() {
    assert_eq!(eval("- 2 ^ 2"), -4.0);
}

// ─── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn division_by_zero() {
    assert_eq!(eval_err("10/0"), RuntimeErrorKind::DivideByZero);
    assert_eq!(eval_err("(quotient 0)"), RuntimeErrorKind::DivideByZero);
    assert_eq!(eval_err("remainder 3 0"), RuntimeErrorKind::DivideByZero);
}

#[test]
fn wrong_variadic_count() {
    let err = eval_err("(difference 1 2 3)");
    assert!(matches!(err, RuntimeErrorKind::Arity { found: 3, .. }), "got {err:?}");
}

#[test]
fn trailing_tokens_are_rejected() {
    let errs = compile_expression("1 2").unwrap_err();
    assert_eq!(errs[0].code, logo_lang::ErrorCode::P001);
}
