//! Rendering of lowering failures.
//!
//! Each test lowers a type the code generator cannot represent yet, renders
//! the reported failure and checks the code, message and label survive.

use ember_codegen::backend::table::TypeTable;
use ember_codegen::diagnostics::{error_code, render_diagnostic, DiagnosticOptions};
use ember_codegen::{LowerError, TypeLowerer};
use ember_types::{DefKind, Member, SymbolTable, TextRange, TypeDef, TypeExpr};

// ── Helpers ────────────────────────────────────────────────────────────

fn at(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

/// Lower `ty` and return the single reported failure.
fn first_error(symbols: &SymbolTable, ty: &TypeExpr) -> LowerError {
    let mut table = TypeTable::new();
    let mut errors: Vec<LowerError> = Vec::new();
    let result = TypeLowerer::new(symbols, &mut table, &mut errors).lower(ty);
    assert!(result.is_err(), "expected `{}` to fail", ty);
    assert_eq!(errors.len(), 1);
    errors.remove(0)
}

fn render(err: &LowerError, src: &str) -> String {
    render_diagnostic(err, src, "test.em", &DiagnosticOptions::colorless())
}

// ── Tests ──────────────────────────────────────────────────────────────

/// A trait used as a field type points at the field's annotation.
#[test]
fn test_diag_trait_field() {
    let src = "class Entry\n  var key: Hashable\n";
    let mut symbols = SymbolTable::with_builtins();
    let hashable = symbols.define(TypeDef::new("Hashable", DefKind::Trait, TextRange::default()));
    let key = TypeExpr::nominal("Hashable", vec![], hashable, at(23, 31));
    symbols.define(
        TypeDef::new("Entry", DefKind::Class, at(6, 11)).with_members(vec![Member::var("key", key)]),
    );
    let entry = symbols.lookup("Entry").unwrap();

    let err = first_error(&symbols, &TypeExpr::nominal("Entry", vec![], entry, at(6, 11)));
    assert_eq!(err.span(), at(23, 31));

    let output = render(&err, src);
    assert!(output.contains("C0005"), "{}", output);
    assert!(output.contains("not implemented (lowering for traits)"), "{}", output);
    assert!(output.contains("trait used as a concrete type here"), "{}", output);
}

/// Colorless output carries no ANSI escapes.
#[test]
fn test_diag_colorless_has_no_escapes() {
    let src = "var pair: (I32, Bool)";
    let symbols = SymbolTable::with_builtins();
    let i32_ty = TypeExpr::nominal("I32", vec![], symbols.lookup("I32").unwrap(), at(11, 14));
    let bool_ty = TypeExpr::nominal("Bool", vec![], symbols.lookup("Bool").unwrap(), at(16, 20));
    let err = first_error(&symbols, &TypeExpr::tuple(vec![i32_ty, bool_ty], at(10, 21)));

    let output = render(&err, src);
    assert!(output.contains(error_code(&err)));
    assert!(output.contains("tuple type used here"));
    assert!(!output.contains('\u{1b}'));
}

/// JSON output is one parseable object with the failure's span.
#[test]
fn test_diag_json() {
    let symbols = SymbolTable::with_builtins();
    let u8_ty = TypeExpr::nominal("U8", vec![], symbols.lookup("U8").unwrap(), at(0, 2));
    let err = first_error(&symbols, &TypeExpr::intersection(u8_ty.clone(), u8_ty, at(0, 7)));

    let output = render_diagnostic(&err, "U8 & U8", "test.em", &DiagnosticOptions::json());
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["code"], "C0001");
    assert_eq!(value["severity"], "error");
    assert_eq!(value["spans"][0]["start"], 0);
    assert_eq!(value["spans"][0]["end"], 7);
    assert_eq!(value["spans"][0]["label"], "intersection type used here");
}
