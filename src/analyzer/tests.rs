//! End-to-end tests driving the full pipeline (parse -> scope build -> rule
//! engine) against the concrete scenarios and invariants this pass is meant
//! to uphold.

use crate::analyzer::{analyze_ast, AnalyzerConfig, DiagnosticKind};
use crate::parser::{parse_js, ParserConfig, SourceTypeConfig};

fn diagnostics(source: &str, config: &AnalyzerConfig) -> Vec<DiagnosticKind> {
    let parser_config = ParserConfig {
        preserve_trivia: true,
        ..ParserConfig::default()
    };
    let parse_result = parse_js(source, "test.js", &parser_config);
    assert!(
        parse_result.errors.is_empty(),
        "unexpected parse errors: {:?}",
        parse_result.errors
    );
    let ast = parse_result.ast.expect("AST should be present");
    let analysis = analyze_ast(&ast, config, parse_result.trivia.as_ref())
        .expect("analysis should not produce an internal error");
    analysis.diagnostics.into_iter().map(|d| d.kind).collect()
}

fn diagnostics_default(source: &str) -> Vec<DiagnosticKind> {
    diagnostics(source, &AnalyzerConfig::default())
}

fn diagnostics_script(source: &str, config: &AnalyzerConfig) -> Vec<DiagnosticKind> {
    let parser_config = ParserConfig {
        preserve_trivia: true,
        source_type: SourceTypeConfig::Script,
        ..ParserConfig::default()
    };
    let parse_result = parse_js(source, "test.js", &parser_config);
    assert!(
        parse_result.errors.is_empty(),
        "unexpected parse errors: {:?}",
        parse_result.errors
    );
    let ast = parse_result.ast.expect("AST should be present");
    let analysis = analyze_ast(&ast, config, parse_result.trivia.as_ref())
        .expect("analysis should not produce an internal error");
    analysis.diagnostics.into_iter().map(|d| d.kind).collect()
}

// ---- spec.md §8 "Concrete end-to-end scenarios" ---------------------------

#[test]
fn scenario_1_let_self_initializer_is_tdz_violation() {
    let diags = diagnostics_default("let x = x;");
    assert_eq!(diags, vec![DiagnosticKind::EarlyReferenceError]);
}

#[test]
fn scenario_2_redeclared_var_in_function_scope_warns() {
    let diags = diagnostics_default("function f() { var a = 2; var a = 3; }");
    assert_eq!(diags, vec![DiagnosticKind::RedeclaredVariable]);
}

#[test]
fn scenario_3_reassigned_const_is_an_error() {
    let diags = diagnostics_default("const a = 0; a = 1;");
    assert_eq!(diags, vec![DiagnosticKind::ReassignedConstant]);
}

#[test]
fn scenario_4_let_directly_in_if_body_is_malformed() {
    let diags = diagnostics_default("if (true) let x = 3;");
    assert_eq!(diags, vec![DiagnosticKind::DeclarationNotDirectlyInBlock]);
}

#[test]
fn scenario_5_unused_local_flagged_when_enabled() {
    let config = AnalyzerConfig {
        unused_local_variable_check_enabled: true,
        verbose: false,
    };
    let diags = diagnostics("function f() { var a; }", &config);
    assert_eq!(diags, vec![DiagnosticKind::UnusedLocalAssignment]);
}

#[test]
fn scenario_6_catch_param_var_collision_not_covered_by_suppress() {
    let source = r#"
        var e = 0;
        try {
            throw 1;
        } catch (e) {
            /** @suppress {duplicate} */
            var e = 2;
        }
    "#;
    let diags = diagnostics_default(source);
    assert_eq!(diags, vec![DiagnosticKind::RedeclaredVariableError]);
}

#[test]
fn scenario_7_arrow_default_param_capture_is_lazy() {
    let diags = diagnostics_default("function f(x = () => x) {}");
    assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
}

#[test]
fn scenario_8_duplicate_import_and_let_is_an_error() {
    let diags = diagnostics_default("import {x} from 'm'; let x = 0;");
    assert_eq!(diags, vec![DiagnosticKind::RedeclaredVariableError]);
}

#[test]
fn scenario_9_goog_scope_body_suppresses_unused_local() {
    let config = AnalyzerConfig {
        unused_local_variable_check_enabled: true,
        verbose: false,
    };
    let diags = diagnostics("goog.scope(function(){ var a; });", &config);
    assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
}

// ---- additional coverage of §4.4 rules -------------------------------------

#[test]
fn var_collision_at_true_global_scope_is_deferred_to_var_check() {
    let config = AnalyzerConfig::default();
    let diags = diagnostics_script("var a = 1; var a = 2;", &config);
    assert!(
        diags.is_empty(),
        "global var/var collisions are VarCheck's job, not this pass's: {:?}",
        diags
    );
}

#[test]
fn let_redeclaration_in_block_scope_is_an_error() {
    let diags = diagnostics_default("function f() { let x = 1; let x = 2; }");
    assert_eq!(diags, vec![DiagnosticKind::RedeclaredVariableError]);
}

#[test]
fn param_colliding_with_let_in_body_is_an_error() {
    let diags = diagnostics_default("function f(x) { let x = 1; }");
    assert_eq!(diags, vec![DiagnosticKind::RedeclaredVariableError]);
}

#[test]
fn named_function_expression_self_binding_resolves_inside_its_own_body() {
    // "bleeding" function name: a named function expression's own name is
    // visible only inside its own body, bound there as if by `const`.
    let diags = diagnostics_default("var f = function named() { return named(); };");
    assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
}

#[test]
fn function_declaration_colliding_with_its_own_bleeding_name_is_an_error() {
    // The bleeding name occupies the function's own scope like a `const`, so
    // a `function` declaration of the same name directly inside that body
    // collides with it (the block-scoped side always wins R2's classification).
    let diags =
        diagnostics_default("var f = function named() { function named() { return 1; } };");
    assert_eq!(diags, vec![DiagnosticKind::RedeclaredVariableError]);
}

#[test]
fn var_read_inside_function_declared_before_assignment_does_not_warn() {
    // The classic `function f(){ a = 2 } var a = 2;` idiom: the call to `f`
    // (and thus the read of `a`) never runs before `var a` has executed, so
    // no EARLY_REFERENCE fires even though `f` is textually declared first.
    let diags = diagnostics_default("function f() { a = 2; } var a = 2; f();");
    assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
}

#[test]
fn early_var_read_in_same_scope_warns() {
    let diags = diagnostics_default("console.log(a); var a = 1;");
    assert_eq!(diags, vec![DiagnosticKind::EarlyReference]);
}

#[test]
fn reassigning_an_imported_binding_is_an_error() {
    let diags = diagnostics_default("import {x} from 'm'; x = 1;");
    assert_eq!(diags, vec![DiagnosticKind::ReassignedConstant]);
}

#[test]
fn compound_assignment_to_const_is_reported_once() {
    let diags = diagnostics_default("const a = 1; a += 2;");
    assert_eq!(diags, vec![DiagnosticKind::ReassignedConstant]);
}

#[test]
fn const_with_no_reassignment_is_clean() {
    let diags = diagnostics_default("const a = 1; console.log(a);");
    assert!(diags.is_empty());
}

#[test]
fn unused_var_nested_in_an_if_block_is_flagged_exactly_once() {
    // Regression: a hoisted `var` nested inside a block used to be declared
    // twice (once by the enclosing function's hoist pre-pass, once more by
    // the block's own redundant pre-pass), producing a spurious second
    // REDECLARED_VARIABLE alongside the real UNUSED_LOCAL_ASSIGNMENT.
    let config = AnalyzerConfig {
        unused_local_variable_check_enabled: true,
        verbose: false,
    };
    let diags = diagnostics("function f() { if (true) { var a = 1; } }", &config);
    assert_eq!(diags, vec![DiagnosticKind::UnusedLocalAssignment]);
}

#[test]
fn single_var_declared_once_inside_a_try_block_never_self_collides() {
    let diags = diagnostics_default("function f() { try { var a = 1; } catch (e) {} return a; }");
    assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
}

#[test]
fn suppress_duplicate_silences_redeclaration_for_the_annotated_pair() {
    let source = r#"
        function f() {
            var a = 1;
            /** @suppress {duplicate} */
            var a = 2;
        }
    "#;
    let diags = diagnostics_default(source);
    assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
}

#[test]
fn unused_import_is_not_flagged_known_behavior() {
    // Open question in spec.md: unused imports currently are not flagged.
    let config = AnalyzerConfig {
        unused_local_variable_check_enabled: true,
        verbose: false,
    };
    let diags = diagnostics("import Foo from 'foo';", &config);
    assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
}

#[test]
fn var_destructuring_target_is_not_flagged_as_unused() {
    let config = AnalyzerConfig {
        unused_local_variable_check_enabled: true,
        verbose: false,
    };
    let diags = diagnostics("function f() { var {x} = {}; }", &config);
    assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
}

// ---- property-style invariants (spec.md §8 "Universal invariants") --------

#[test]
fn analysis_is_deterministic_across_runs() {
    let source = "function f() { var a = 2; var a = 3; let x = x; const c = 1; c = 2; }";
    let first = diagnostics_default(source);
    let second = diagnostics_default(source);
    assert_eq!(first, second);
}

#[test]
fn unused_binding_with_only_a_declaration_is_flagged_exactly_once() {
    let config = AnalyzerConfig {
        unused_local_variable_check_enabled: true,
        verbose: false,
    };
    let diags = diagnostics("function f() { var onlyDeclared; }", &config);
    assert_eq!(diags, vec![DiagnosticKind::UnusedLocalAssignment]);
}

#[test]
fn const_with_no_lvalue_other_than_initializer_never_reassigns() {
    let diags = diagnostics_default("function f() { const c = 1; return c; }");
    assert!(!diags.contains(&DiagnosticKind::ReassignedConstant));
}
