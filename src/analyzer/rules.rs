//! R1 through R5: the rule engine proper.
//!
//! R1 (declaration shape) and R2 (redeclaration) are purely structural - they
//! only need the two declaration sites involved, so `scope_builder` applies
//! them immediately while it declares bindings. R3 (early reference), R4
//! (reassigned constant), and R5 (unused local) all need a binding's complete
//! reference list, so they run once per scope after `scope_builder` has
//! finished building it (the "deferred, scope-exit" discipline).
//!
//! Precedence across all five rules is R1 > R2 > R3 > R4 > R5: once a rule has
//! emitted anything for a binding, no lower-precedence rule runs for it.
//! `Binding::higher_precedence_diagnosed` records whether R1/R2 already fired
//! before `run_deferred_rules_for_scope` gets to a binding; within the
//! deferred pass itself, `run_r3`/`run_r4` report whether they emitted so the
//! caller can skip the rest.

use crate::parser::ast_types::{Statement, VariableDeclarationKind};

use super::{Binding, BindingKind, BindingTable, Diagnostic, DiagnosticKind, Scope, ScopeId, ScopeKind, ScopeTree, AnalyzerConfig};

/// R1: a `let`/`const`/`class`/`function` declaration directly in the body
/// position of an `if`/`while`/`for`/`with`/label statement (not wrapped in a
/// block) is malformed - `var` is exempt, since it was never block-scoped to
/// begin with. Returns the position and name to report when `body` matches.
pub fn check_declaration_not_in_block(body: &Statement) -> Option<(u32, String)> {
    match body {
        Statement::VariableDeclaration { kind, declarations }
            if *kind != VariableDeclarationKind::Var =>
        {
            let first = declarations.first()?;
            let id = first.id.as_simple_identifier()?;
            Some((id.span_start, id.name.clone()))
        }
        Statement::ClassDeclaration { id: Some(id), .. } => Some((id.span_start, id.name.clone())),
        Statement::FunctionDeclaration { id: Some(id), .. } => {
            Some((id.span_start, id.name.clone()))
        }
        _ => None,
    }
}

/// R2: classifies a collision between an existing declaration and an incoming
/// one of the same name in the same scope. Returns `None` when the collision
/// is legal (suppressed, or two `var`/`function` hoists colliding at global
/// scope, where `VarCheck`-equivalent tooling outside this pass owns it).
pub fn classify_redeclaration(
    scope_kind: ScopeKind,
    existing_kind: BindingKind,
    existing_suppress_duplicate: bool,
    incoming_kind: BindingKind,
    incoming_suppress_duplicate: bool,
) -> Option<DiagnosticKind> {
    let is_catch_var_collision = (existing_kind == BindingKind::CatchParam
        && incoming_kind == BindingKind::Var)
        || (incoming_kind == BindingKind::CatchParam && existing_kind == BindingKind::Var);

    // @suppress {duplicate} never covers a catch-parameter/var collision
    // (the "issue 166" family): the two bindings occupy genuinely different
    // scopes semantically even though they share a name.
    if !is_catch_var_collision && (existing_suppress_duplicate || incoming_suppress_duplicate) {
        return None;
    }

    let either_block_scoped = existing_kind.is_block_scoped() || incoming_kind.is_block_scoped();
    if is_catch_var_collision || either_block_scoped {
        return Some(DiagnosticKind::RedeclaredVariableError);
    }

    // Both sides are hoisted (var/function-declaration). At true global
    // scope, collisions are left to external `VarCheck`-equivalent tooling
    // that understands cross-file global declarations; everywhere else
    // (function/module/goog.module bodies) it's a same-scope warning.
    if scope_kind == ScopeKind::Global {
        return None;
    }

    Some(DiagnosticKind::RedeclaredVariable)
}

/// Runs R3, R4, and R5 over every binding declared directly in `scope_id`.
/// Call once that scope's traversal has fully finished (`scope_builder`'s
/// scope-exit hook) so every reference to its bindings is already recorded.
pub fn run_deferred_rules_for_scope(
    scope_id: ScopeId,
    scope_tree: &ScopeTree,
    binding_table: &mut BindingTable,
    config: &AnalyzerConfig,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(scope) = scope_tree.get_scope(scope_id) else {
        return;
    };
    if scope.is_externs {
        return;
    }
    let scope = scope.clone();

    for binding_id in scope.bindings.clone() {
        let Some(binding) = binding_table.bindings.get(&binding_id) else {
            continue;
        };
        if binding.higher_precedence_diagnosed {
            continue;
        }

        if run_r3(binding, diagnostics) {
            continue;
        }
        if run_r4(binding, diagnostics) {
            continue;
        }
        if config.unused_local_variable_check_enabled {
            run_r5(binding, &scope, diagnostics);
        }
    }
}

/// R3: early reference. Returns `true` if it emitted anything for `binding`,
/// short-circuiting R4/R5 for it.
fn run_r3(binding: &Binding, diagnostics: &mut Vec<Diagnostic>) -> bool {
    let mut emitted = false;

    for reference in &binding.references {
        if reference.is_declaration {
            continue;
        }
        if reference.source_position >= binding.declaration_position {
            continue;
        }

        // Default-parameter mini-scope: a reference evaluated eagerly inside
        // a parameter's default-value expression, to a name declared later
        // in the same function (a later parameter, or a body-local
        // var/let/const), is always an error - parameters initialize before
        // the function body's `var`s even exist, so the usual "var is only a
        // warning" leniency does not apply here.
        if reference.in_default_param_initializer_of.is_some() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::EarlyReferenceError,
                reference.source_position,
                binding.name.clone(),
            ));
            emitted = true;
            continue;
        }

        if binding.is_block_scoped() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::EarlyReferenceError,
                reference.source_position,
                binding.name.clone(),
            ));
            emitted = true;
            continue;
        }

        // Var/FunctionDecl/ImplicitGlobal: hoisting means an early read is
        // only a real hazard when it runs eagerly, in the same direct scope
        // as the declaration. A read from inside a nested function (or
        // arrow, including one lazily capturing a default-parameter value)
        // is deferred until that function is called, by which point the
        // declaration has long since executed.
        if reference.enclosing_scope != binding.scope {
            continue;
        }

        if binding.kind == BindingKind::FunctionDecl && binding.declared_at_top_of_function {
            continue;
        }

        diagnostics.push(Diagnostic::new(
            DiagnosticKind::EarlyReference,
            reference.source_position,
            binding.name.clone(),
        ));
        emitted = true;
    }

    emitted
}

/// R4: reassignment of an immutable binding (`const`, imports).
fn run_r4(binding: &Binding, diagnostics: &mut Vec<Diagnostic>) -> bool {
    if !binding.is_immutable() {
        return false;
    }

    let mut emitted = false;
    for reference in &binding.references {
        if reference.is_declaration || !reference.is_lvalue {
            continue;
        }
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::ReassignedConstant,
            reference.source_position,
            binding.name.clone(),
        ));
        emitted = true;
    }
    emitted
}

/// R5: unused local assignment. Opt-in, gated by `AnalyzerConfig`.
fn run_r5(binding: &Binding, scope: &Scope, diagnostics: &mut Vec<Diagnostic>) {
    if scope.kind == ScopeKind::Global {
        return;
    }
    if scope.is_goog_scope_body {
        return;
    }
    // TODO(unused-imports): `Import` is exempt for now; wiring this up needs
    // an `AnalyzerConfig` toggle of its own since unused-import checking has
    // a different false-positive profile than unused locals.
    if matches!(
        binding.kind,
        BindingKind::Param | BindingKind::CatchParam | BindingKind::FunctionDecl | BindingKind::Import
    ) {
        return;
    }
    if binding.is_typedef {
        return;
    }
    if binding.bound_via_destructuring {
        return;
    }
    if binding.references.iter().any(|r| r.is_read) {
        return;
    }

    let last_assignment_position = binding
        .references
        .iter()
        .filter(|r| r.is_lvalue || r.is_declaration)
        .map(|r| r.source_position)
        .max()
        .unwrap_or(binding.declaration_position);

    diagnostics.push(Diagnostic::new(
        DiagnosticKind::UnusedLocalAssignment,
        last_assignment_position,
        binding.name.clone(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Reference;

    fn binding(kind: BindingKind, declaration_position: u32) -> Binding {
        Binding {
            id: 0,
            name: "x".to_string(),
            kind,
            scope: 0,
            declaration_position,
            declared_at_top_of_function: true,
            suppress_duplicate: false,
            is_typedef: false,
            is_exported: false,
            bound_via_destructuring: false,
            references: Vec::new(),
            other_declarations: Vec::new(),
            higher_precedence_diagnosed: false,
        }
    }

    fn reference(source_position: u32, is_declaration: bool) -> Reference {
        Reference {
            binding: Some(0),
            enclosing_scope: 0,
            source_position,
            is_declaration,
            is_hoisted_declaration: false,
            is_lvalue: is_declaration,
            is_read: false,
            is_initializing: is_declaration,
            in_default_param_initializer_of: None,
        }
    }

    #[test]
    fn should_flag_early_reference_to_block_scoped_binding() {
        let mut b = binding(BindingKind::Let, 20);
        b.references.push(Reference {
            is_read: true,
            ..reference(5, false)
        });
        let mut diagnostics = Vec::new();
        assert!(run_r3(&b, &mut diagnostics));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EarlyReferenceError);
    }

    #[test]
    fn should_not_flag_var_read_from_a_nested_function_scope() {
        let mut b = binding(BindingKind::Var, 20);
        b.references.push(Reference {
            enclosing_scope: 1,
            is_read: true,
            ..reference(5, false)
        });
        let mut diagnostics = Vec::new();
        assert!(!run_r3(&b, &mut diagnostics));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn should_flag_reassigned_constant() {
        let mut b = binding(BindingKind::Const, 0);
        b.references.push(reference(0, true));
        b.references.push(Reference {
            is_lvalue: true,
            ..reference(10, false)
        });
        let mut diagnostics = Vec::new();
        assert!(run_r4(&b, &mut diagnostics));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::ReassignedConstant);
    }

    #[test]
    fn should_flag_unused_local_with_only_a_declaration() {
        let mut b = binding(BindingKind::Var, 0);
        b.references.push(reference(0, true));
        let scope = Scope {
            id: 0,
            kind: ScopeKind::Function,
            parent_id: None,
            children: Vec::new(),
            bindings: Vec::new(),
            is_externs: false,
            is_goog_scope_body: false,
        };
        let mut diagnostics = Vec::new();
        run_r5(&b, &scope, &mut diagnostics);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnusedLocalAssignment);
    }

    #[test]
    fn should_not_flag_an_unused_destructured_var() {
        let mut b = binding(BindingKind::Var, 0);
        b.bound_via_destructuring = true;
        b.references.push(reference(0, true));
        let scope = Scope {
            id: 0,
            kind: ScopeKind::Function,
            parent_id: None,
            children: Vec::new(),
            bindings: Vec::new(),
            is_externs: false,
            is_goog_scope_body: false,
        };
        let mut diagnostics = Vec::new();
        run_r5(&b, &scope, &mut diagnostics);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn should_suppress_duplicate_redeclaration_between_two_vars() {
        let result = classify_redeclaration(
            ScopeKind::Function,
            BindingKind::Var,
            true,
            BindingKind::Var,
            false,
        );
        assert_eq!(result, None);
    }

    #[test]
    fn should_not_let_suppress_duplicate_cover_catch_var_collision() {
        let result = classify_redeclaration(
            ScopeKind::Function,
            BindingKind::CatchParam,
            true,
            BindingKind::Var,
            false,
        );
        assert_eq!(result, Some(DiagnosticKind::RedeclaredVariableError));
    }

    #[test]
    fn should_warn_on_var_var_collision_in_function_scope() {
        let result = classify_redeclaration(
            ScopeKind::Function,
            BindingKind::Var,
            false,
            BindingKind::Var,
            false,
        );
        assert_eq!(result, Some(DiagnosticKind::RedeclaredVariable));
    }

    #[test]
    fn should_not_report_var_var_collision_at_global_scope() {
        let result = classify_redeclaration(
            ScopeKind::Global,
            BindingKind::Var,
            false,
            BindingKind::Var,
            false,
        );
        assert_eq!(result, None);
    }

    #[test]
    fn should_error_on_let_var_collision() {
        let result = classify_redeclaration(
            ScopeKind::Function,
            BindingKind::Let,
            false,
            BindingKind::Var,
            false,
        );
        assert_eq!(result, Some(DiagnosticKind::RedeclaredVariableError));
    }
}
