//! Builds the scope tree and binding table for a parsed program in a single
//! traversal, applying R1/R2 immediately as bindings are declared and
//! deferring R3/R4/R5 to each scope's exit (see `rules.rs` for why).
//!
//! Two passes happen at the top of every function-like body (and the
//! program root): a hoist pre-pass walks the body collecting every `var`
//! declarator and function declaration before anything else is declared, so
//! that a forward reference to a hoisted name resolves to its binding
//! instead of silently becoming an implicit global. The sequential walk that
//! follows then processes each statement for real: non-hoisted declarations
//! (`let`/`const`/`class`/params/catch params/imports) get declared as they
//! are reached, while `var`/function declarations are looked up (never
//! re-declared - that would manufacture a spurious self-collision) and only
//! contribute a reference plus, for `var`, an initializer walk.

use crate::parser::ast_types::{
    ArrowFunctionBody, ClassElement, Expression, ForHeadLeft, ForInit, Identifier, ImportSpecifier,
    ObjectPatternProperty, Pattern, Program, ProgramSourceType, Statement,
    VariableDeclarationKind, VariableDeclarator,
};

use super::jsdoc::JsDocIndex;
use super::{
    AnalysisResult, AnalyzerConfig, Binding, BindingId, BindingKind, BindingTable, Diagnostic,
    DiagnosticKind, OtherDeclaration, Reference, Scope, ScopeId, ScopeKind, ScopeTree,
};

/// Runs the full scope-building and rule-application pass over `ast`.
pub fn build(
    ast: &Program,
    config: &AnalyzerConfig,
    jsdoc_index: &JsDocIndex,
) -> AnalysisResult<(ScopeTree, BindingTable, Vec<Diagnostic>)> {
    let root_kind = classify_root_kind(ast);
    let scope_tree = ScopeTree::new(root_kind);
    let mut builder = Builder {
        scope_tree,
        binding_table: BindingTable::new(),
        diagnostics: Vec::new(),
        config,
        jsdoc_index,
        self_initializing: None,
    };

    let root_scope_id = builder.scope_tree.root_scope_id;
    builder.hoist_and_walk_body(&ast.body, root_scope_id, root_scope_id);
    builder.exit_scope(root_scope_id);

    Ok((builder.scope_tree, builder.binding_table, builder.diagnostics))
}

fn classify_root_kind(ast: &Program) -> ScopeKind {
    if ast
        .body
        .iter()
        .any(|stmt| is_goog_member_call_stmt(stmt, "module"))
    {
        return ScopeKind::GoogModule;
    }
    match ast.source_type {
        ProgramSourceType::Module => ScopeKind::Module,
        ProgramSourceType::Script => ScopeKind::Global,
    }
}

fn is_goog_member_call_stmt(stmt: &Statement, method: &str) -> bool {
    matches!(
        stmt,
        Statement::ExpressionStatement { expression }
            if is_goog_member_call(expression, method).is_some()
    )
}

/// Matches `goog.<method>(...)`, returning the call arguments.
fn is_goog_member_call<'a>(expr: &'a Expression, method: &str) -> Option<&'a [Expression]> {
    let Expression::CallExpression { callee, arguments } = expr else {
        return None;
    };
    let Expression::MemberExpression {
        object,
        property,
        computed: false,
    } = callee.as_ref()
    else {
        return None;
    };
    let Expression::Identifier(object_id) = object.as_ref() else {
        return None;
    };
    if object_id.name != "goog" {
        return None;
    }
    let Expression::Identifier(property_id) = property.as_ref() else {
        return None;
    };
    if property_id.name != method {
        return None;
    }
    Some(arguments)
}

/// Pulls `(params, body)` out of a function expression or arrow function
/// with a block body - the two callback shapes `goog.scope`/
/// `goog.loadModule` accept.
fn function_like_params_and_body(
    expr: &Expression,
) -> Option<(&[Pattern], &crate::parser::ast_types::BlockStatement)> {
    match expr {
        Expression::FunctionExpression(f) => Some((&f.params, &f.body)),
        Expression::ArrowFunctionExpression { params, body, .. } => match body {
            ArrowFunctionBody::BlockStatement(block) => Some((params, block)),
            ArrowFunctionBody::Expression(_) => None,
        },
        _ => None,
    }
}

fn extract_goog_scope_callback(
    expr: &Expression,
) -> Option<&crate::parser::ast_types::BlockStatement> {
    let arguments = is_goog_member_call(expr, "scope")?;
    let (_, body) = function_like_params_and_body(arguments.first()?)?;
    Some(body)
}

fn extract_goog_load_module_callback(
    expr: &Expression,
) -> Option<(&Pattern, &crate::parser::ast_types::BlockStatement)> {
    let arguments = is_goog_member_call(expr, "loadModule")?;
    let (params, body) = function_like_params_and_body(arguments.first()?)?;
    Some((params.first()?, body))
}

struct Builder<'a> {
    scope_tree: ScopeTree,
    binding_table: BindingTable,
    diagnostics: Vec<Diagnostic>,
    config: &'a AnalyzerConfig,
    jsdoc_index: &'a JsDocIndex,
    /// Set while walking a `let`/`const`/`class` declaration's own
    /// initializer or heritage clause: `(scope, names)` where `names` are
    /// every identifier the declaration binds. A reference to one of these
    /// names encountered in that scope while the flag is set is the binding
    /// reading itself before its own declaration has finished (`let x = x;`,
    /// `class A extends A {}`) - always an early reference regardless of the
    /// textual position of the read relative to the declaration, since the
    /// two sit on the same line.
    self_initializing: Option<(ScopeId, Vec<String>)>,
}

/// A hoist candidate found while pre-scanning a function/program body.
enum Hoisted<'a> {
    Var {
        pattern: &'a Pattern,
        at_top: bool,
    },
    Func {
        stmt: &'a Statement,
        at_top: bool,
    },
}

impl<'a> Builder<'a> {
    fn new_binding_id(&mut self) -> BindingId {
        self.binding_table.next_id()
    }

    fn push_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let id = self.scope_tree.next_id();
        self.scope_tree.scopes.insert(
            id,
            Scope {
                id,
                kind,
                parent_id: Some(parent),
                children: Vec::new(),
                bindings: Vec::new(),
                is_externs: false,
                is_goog_scope_body: false,
            },
        );
        if let Some(parent_scope) = self.scope_tree.get_scope_mut(parent) {
            parent_scope.children.push(id);
        }
        id
    }

    /// Runs the deferred rules (R3-R5) for every binding declared directly in
    /// `scope_id`. Call exactly once, after that scope's traversal is done.
    fn exit_scope(&mut self, scope_id: ScopeId) {
        super::rules::run_deferred_rules_for_scope(
            scope_id,
            &self.scope_tree,
            &mut self.binding_table,
            self.config,
            &mut self.diagnostics,
        );
    }

    /// Declares `name` directly in `scope_id`. If a binding with that name
    /// already exists there, runs R2 (`classify_redeclaration`) and records
    /// the collision rather than creating a second binding - returns the
    /// canonical (possibly pre-existing) binding id either way.
    #[allow(clippy::too_many_arguments)]
    fn declare(
        &mut self,
        scope_id: ScopeId,
        name: &str,
        kind: BindingKind,
        position: u32,
        declared_at_top_of_function: bool,
        bound_via_destructuring: bool,
        is_exported: bool,
    ) -> BindingId {
        let suppress_duplicate = self.jsdoc_index.suppresses_duplicate(position);
        let is_typedef = self.jsdoc_index.is_typedef(position);

        let existing_id = self
            .binding_table
            .scope_bindings
            .get(&scope_id)
            .and_then(|names| names.get(name))
            .copied();

        if let Some(existing_id) = existing_id {
            let scope_kind = self
                .scope_tree
                .get_scope(scope_id)
                .map(|s| s.kind)
                .unwrap_or(ScopeKind::Global);

            let (existing_kind, existing_suppress) = {
                let existing = self.binding_table.bindings.get(&existing_id).unwrap();
                (existing.kind, existing.suppress_duplicate)
            };

            let verdict = super::rules::classify_redeclaration(
                scope_kind,
                existing_kind,
                existing_suppress,
                kind,
                suppress_duplicate,
            );

            let existing = self.binding_table.bindings.get_mut(&existing_id).unwrap();
            existing.other_declarations.push(OtherDeclaration {
                kind,
                position,
                suppress_duplicate,
            });
            if let Some(diagnostic_kind) = verdict {
                self.diagnostics
                    .push(Diagnostic::new(diagnostic_kind, position, name.to_string()));
                existing.higher_precedence_diagnosed = true;
            }
            if bound_via_destructuring {
                existing.bound_via_destructuring = true;
            }
            if is_exported {
                existing.is_exported = true;
            }
            return existing_id;
        }

        let id = self.new_binding_id();
        let binding = Binding {
            id,
            name: name.to_string(),
            kind,
            scope: scope_id,
            declaration_position: position,
            declared_at_top_of_function,
            suppress_duplicate,
            is_typedef,
            is_exported,
            bound_via_destructuring,
            references: Vec::new(),
            other_declarations: Vec::new(),
            higher_precedence_diagnosed: false,
        };
        self.binding_table.bindings.insert(id, binding);
        self.binding_table
            .scope_bindings
            .entry(scope_id)
            .or_default()
            .insert(name.to_string(), id);
        if let Some(scope) = self.scope_tree.get_scope_mut(scope_id) {
            scope.bindings.push(id);
        }
        id
    }

    /// Resolves `name` starting at `scope_id` and walking up through
    /// parents. Synthesizes an `ImplicitGlobal` at the program root on first
    /// failure to resolve, with its `declaration_position` pinned to this
    /// reference's own position (so it is never flagged as early).
    fn resolve_name(&mut self, scope_id: ScopeId, name: &str, position: u32) -> BindingId {
        let mut current = Some(scope_id);
        while let Some(id) = current {
            if let Some(binding_id) = self
                .binding_table
                .scope_bindings
                .get(&id)
                .and_then(|names| names.get(name))
            {
                return *binding_id;
            }
            current = self.scope_tree.get_scope(id).and_then(|s| s.parent_id);
        }

        let root = self.scope_tree.root_scope_id;
        self.declare(
            root,
            name,
            BindingKind::ImplicitGlobal,
            position,
            true,
            false,
            false,
        )
    }

    fn push_reference(&mut self, binding_id: BindingId, reference: Reference) {
        if let Some(binding) = self.binding_table.bindings.get_mut(&binding_id) {
            binding.references.push(reference);
        }
    }

    /// Resolves `name` in `scope_id` and attaches a reference to it.
    #[allow(clippy::too_many_arguments)]
    fn reference(
        &mut self,
        scope_id: ScopeId,
        name: &str,
        position: u32,
        is_declaration: bool,
        is_hoisted_declaration: bool,
        is_lvalue: bool,
        is_read: bool,
        is_initializing: bool,
        default_ctx: Option<&str>,
    ) -> BindingId {
        let binding_id = self.resolve_name(scope_id, name, position);
        self.push_reference(
            binding_id,
            Reference {
                binding: Some(binding_id),
                enclosing_scope: scope_id,
                source_position: position,
                is_declaration,
                is_hoisted_declaration,
                is_lvalue,
                is_read,
                is_initializing,
                in_default_param_initializer_of: default_ctx.map(|s| s.to_string()),
            },
        );

        if !is_declaration {
            if let Some((tainted_scope, names)) = &self.self_initializing {
                if *tainted_scope == scope_id && names.iter().any(|n| n == name) {
                    self.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::EarlyReferenceError,
                        position,
                        name.to_string(),
                    ));
                }
            }
        }

        binding_id
    }

    /// Walks `expr` - a `let`/`const` declarator's initializer, or a class's
    /// heritage clause - with every name in `names` tainted as "still being
    /// declared" in `scope_id`: any reference to one of them found inside
    /// `expr` is forced to be an early reference (see `self_initializing`),
    /// regardless of its byte offset relative to the declaration.
    fn walk_own_initializer(&mut self, names: Vec<String>, scope_id: ScopeId, expr: &'a Expression) {
        let previous = self.self_initializing.replace((scope_id, names));
        self.walk_expression(expr, scope_id, None);
        self.self_initializing = previous;
    }

    // ---- hoist pre-pass --------------------------------------------------

    /// Runs the hoist pre-pass over `body`, then walks it sequentially,
    /// exiting any scopes the hoist pass itself did not need (hoisting never
    /// opens scopes; it only declares into `target_scope`).
    fn hoist_and_walk_body(
        &mut self,
        body: &'a [Statement],
        declare_scope: ScopeId,
        walk_scope: ScopeId,
    ) {
        let mut hoisted = Vec::new();
        for stmt in body {
            collect_hoists_stmt(stmt, true, &mut hoisted);
        }
        for item in hoisted {
            match item {
                Hoisted::Var { pattern, at_top } => {
                    self.hoist_var_pattern(pattern, declare_scope, at_top);
                }
                Hoisted::Func { stmt, at_top } => {
                    self.hoist_func_decl(stmt, declare_scope, at_top);
                }
            }
        }

        self.declare_lexical_prepass(body, walk_scope);

        for stmt in body {
            self.walk_statement(stmt, walk_scope);
        }
    }

    /// Walks `body` in `walk_scope` without running a hoist pre-pass over it.
    /// Used for block-like constructs nested inside a function/program body
    /// (a bare `{}` block, a `try`/`catch`/`finally` body) - their `var`s and
    /// function declarations were already discovered and declared by the
    /// enclosing function/program's own pre-pass (`collect_hoists_stmt`
    /// recurses through these constructs without stopping), so re-running
    /// the pre-pass here would `declare()` the same binding a second time
    /// and manufacture a spurious self-collision.
    fn walk_body_only(&mut self, body: &'a [Statement], walk_scope: ScopeId) {
        self.declare_lexical_prepass(body, walk_scope);
        for stmt in body {
            self.walk_statement(stmt, walk_scope);
        }
    }

    /// Declares every `let`/`const`/`class` name directly in `body` before
    /// any statement in it is walked - mirroring `collect_hoists_stmt`/
    /// `hoist_var_pattern`'s hoist pre-pass, but for lexical declarations.
    /// Without this, a forward reference to one of these names from an
    /// earlier statement in the same block (or the declaration's own
    /// initializer) cannot resolve to the real binding: `resolve_name` would
    /// walk past the not-yet-declared scope and either find an outer binding
    /// or synthesize an `ImplicitGlobal`, and the later `declare()` call
    /// would then misclassify the pair as a same-scope redeclaration instead
    /// of letting R3 see it as an early reference. Unlike hoisting, this
    /// never recurses into nested blocks: `let`/`const`/`class` are scoped
    /// to the block they textually sit in, never hoisted past it.
    fn declare_lexical_prepass(&mut self, body: &'a [Statement], scope_id: ScopeId) {
        for stmt in body {
            self.declare_lexical_prepass_stmt(stmt, scope_id, false);
        }
    }

    fn declare_lexical_prepass_stmt(
        &mut self,
        stmt: &'a Statement,
        scope_id: ScopeId,
        is_exported: bool,
    ) {
        match stmt {
            Statement::VariableDeclaration { declarations, kind }
                if *kind != VariableDeclarationKind::Var =>
            {
                let binding_kind = match kind {
                    VariableDeclarationKind::Let => BindingKind::Let,
                    VariableDeclarationKind::Const => BindingKind::Const,
                    VariableDeclarationKind::Var => unreachable!(),
                };
                for declarator in declarations {
                    self.declare_pattern_names_only_lexical(
                        &declarator.id,
                        scope_id,
                        binding_kind,
                        is_exported,
                    );
                }
            }
            Statement::ClassDeclaration { id: Some(id), .. } => {
                self.declare(
                    scope_id,
                    &id.name,
                    BindingKind::Class,
                    id.span_start,
                    true,
                    false,
                    is_exported,
                );
            }
            Statement::ExportNamedDeclaration {
                declaration: Some(declaration),
                ..
            } => {
                self.declare_lexical_prepass_stmt(declaration, scope_id, true);
            }
            _ => {}
        }
    }

    /// Declares every identifier bound by a `let`/`const` pattern, without
    /// walking any expression - including a destructuring default's value,
    /// which is walked later, at its normal sequential-walk time, once every
    /// name in the block already exists.
    fn declare_pattern_names_only_lexical(
        &mut self,
        pattern: &'a Pattern,
        scope_id: ScopeId,
        kind: BindingKind,
        is_exported: bool,
    ) {
        self.declare_pattern_names_only_lexical_inner(pattern, scope_id, kind, is_exported, false);
    }

    fn declare_pattern_names_only_lexical_inner(
        &mut self,
        pattern: &'a Pattern,
        scope_id: ScopeId,
        kind: BindingKind,
        is_exported: bool,
        via_destructuring: bool,
    ) {
        match pattern {
            Pattern::Identifier(id) => {
                self.declare(
                    scope_id,
                    &id.name,
                    kind,
                    id.span_start,
                    true,
                    via_destructuring,
                    is_exported,
                );
            }
            Pattern::ArrayPattern { elements } => {
                for element in elements.iter().flatten() {
                    self.declare_pattern_names_only_lexical_inner(
                        element, scope_id, kind, is_exported, true,
                    );
                }
            }
            Pattern::ObjectPattern { properties } => {
                for property in properties {
                    match property {
                        ObjectPatternProperty::Property { value, .. } => {
                            self.declare_pattern_names_only_lexical_inner(
                                value, scope_id, kind, is_exported, true,
                            );
                        }
                        ObjectPatternProperty::RestElement { argument } => {
                            self.declare_pattern_names_only_lexical_inner(
                                argument, scope_id, kind, is_exported, true,
                            );
                        }
                    }
                }
            }
            Pattern::AssignmentPattern { left, .. } => {
                self.declare_pattern_names_only_lexical_inner(
                    left,
                    scope_id,
                    kind,
                    is_exported,
                    via_destructuring,
                );
            }
            Pattern::RestElement { argument } => {
                self.declare_pattern_names_only_lexical_inner(
                    argument, scope_id, kind, is_exported, true,
                );
            }
        }
    }

    /// Finalizes a `let`/`const` declarator already declared by
    /// `declare_lexical_prepass`: walks the initializer (tainting a
    /// self-reference to the names being declared as an early reference),
    /// then attaches the declaration/lvalue reference the same way a hoisted
    /// `var` does.
    fn finalize_lexical_declarator(&mut self, declarator: &'a VariableDeclarator, scope_id: ScopeId) {
        self.reference_assignment_pattern(&declarator.id, scope_id, declarator.init.is_some(), false);
        if let Some(init) = &declarator.init {
            let mut names = Vec::new();
            pattern_bound_names(&declarator.id, &mut names);
            self.walk_own_initializer(names, scope_id, init);
        }
    }

    fn hoist_var_pattern(&mut self, pattern: &'a Pattern, scope_id: ScopeId, at_top: bool) {
        self.hoist_var_pattern_inner(pattern, scope_id, at_top, false);
    }

    fn hoist_var_pattern_inner(
        &mut self,
        pattern: &'a Pattern,
        scope_id: ScopeId,
        at_top: bool,
        via_destructuring: bool,
    ) {
        match pattern {
            Pattern::Identifier(id) => {
                self.declare(
                    scope_id,
                    &id.name,
                    BindingKind::Var,
                    id.span_start,
                    at_top,
                    via_destructuring,
                    false,
                );
            }
            Pattern::ArrayPattern { elements } => {
                for element in elements.iter().flatten() {
                    self.hoist_var_pattern_inner(element, scope_id, at_top, true);
                }
            }
            Pattern::ObjectPattern { properties } => {
                for property in properties {
                    match property {
                        ObjectPatternProperty::Property { value, .. } => {
                            self.hoist_var_pattern_inner(value, scope_id, at_top, true);
                        }
                        ObjectPatternProperty::RestElement { argument } => {
                            self.hoist_var_pattern_inner(argument, scope_id, at_top, true);
                        }
                    }
                }
            }
            Pattern::AssignmentPattern { left, .. } => {
                self.hoist_var_pattern_inner(left, scope_id, at_top, via_destructuring);
            }
            Pattern::RestElement { argument } => {
                self.hoist_var_pattern_inner(argument, scope_id, at_top, true);
            }
        }
    }

    fn hoist_func_decl(&mut self, stmt: &'a Statement, scope_id: ScopeId, at_top: bool) {
        let Statement::FunctionDeclaration { id: Some(id), .. } = stmt else {
            return;
        };
        self.declare(
            scope_id,
            &id.name,
            BindingKind::FunctionDecl,
            id.span_start,
            at_top,
            false,
            false,
        );
    }

    /// Looks up an already-hoisted binding and attaches a reference, walking
    /// any initializer. Never re-declares: the hoist pre-pass already created
    /// the binding.
    fn assign_hoisted_pattern(&mut self, declarator: &'a VariableDeclarator, scope_id: ScopeId) {
        self.reference_assignment_pattern(&declarator.id, scope_id, declarator.init.is_some(), true);
        if let Some(init) = &declarator.init {
            self.walk_expression(init, scope_id, None);
        }
    }

    #[allow(dead_code)]
    fn assign_hoisted_name(&mut self, id: &'a Identifier, scope_id: ScopeId) {
        self.reference(
            scope_id,
            &id.name,
            id.span_start,
            true,
            true,
            true,
            false,
            false,
            None,
        );
    }

    // ---- non-hoisted declaration ------------------------------------------

    fn declare_pattern(
        &mut self,
        pattern: &'a Pattern,
        scope_id: ScopeId,
        kind: BindingKind,
        is_exported: bool,
    ) {
        self.declare_pattern_inner(pattern, scope_id, kind, is_exported, false);
    }

    fn declare_pattern_inner(
        &mut self,
        pattern: &'a Pattern,
        scope_id: ScopeId,
        kind: BindingKind,
        is_exported: bool,
        via_destructuring: bool,
    ) {
        match pattern {
            Pattern::Identifier(id) => {
                self.declare(
                    scope_id,
                    &id.name,
                    kind,
                    id.span_start,
                    true,
                    via_destructuring,
                    is_exported,
                );
                // Declaring a name is itself a reference to it (the
                // declaration site) - `Param`/`CatchParam`/`Import` and the
                // `for-in`/`for-of` Let/Const header all declare through
                // here, so this is the one place that needs to record it for
                // all of them.
                self.reference(
                    scope_id,
                    &id.name,
                    id.span_start,
                    true,
                    false,
                    true,
                    false,
                    true,
                    None,
                );
            }
            Pattern::ArrayPattern { elements } => {
                for element in elements.iter().flatten() {
                    self.declare_pattern_inner(element, scope_id, kind, is_exported, true);
                }
            }
            Pattern::ObjectPattern { properties } => {
                for property in properties {
                    match property {
                        ObjectPatternProperty::Property { value, .. } => {
                            self.declare_pattern_inner(value, scope_id, kind, is_exported, true);
                        }
                        ObjectPatternProperty::RestElement { argument } => {
                            self.declare_pattern_inner(argument, scope_id, kind, is_exported, true);
                        }
                    }
                }
            }
            Pattern::AssignmentPattern { left, right } => {
                self.walk_expression(right, scope_id, None);
                self.declare_pattern_inner(left, scope_id, kind, is_exported, via_destructuring);
            }
            Pattern::RestElement { argument } => {
                self.declare_pattern_inner(argument, scope_id, kind, is_exported, true);
            }
        }
    }

    /// Declares every parameter name first (phase 1), then walks default
    /// value expressions in left-to-right order (phase 2) - so a later
    /// parameter referenced by an earlier one's default resolves instead of
    /// becoming a spurious implicit global, while `run_r3` still flags the
    /// genuinely early read.
    fn declare_params(&mut self, params: &'a [Pattern], scope_id: ScopeId) {
        let mut defaults = Vec::new();
        for param in params {
            self.declare_pattern_names_only(param, scope_id, false, &mut defaults);
        }
        for (ctx_name, expr) in defaults {
            self.walk_expression(expr, scope_id, ctx_name.as_deref());
        }
    }

    /// Declares every identifier in `pattern` (phase 1 of `declare_params`),
    /// collecting every default-value expression found - at the top level or
    /// nested inside array/object destructuring - into `defaults` instead of
    /// walking it immediately, so all parameter names exist before any
    /// default expression runs.
    fn declare_pattern_names_only(
        &mut self,
        pattern: &'a Pattern,
        scope_id: ScopeId,
        via_destructuring: bool,
        defaults: &mut Vec<(Option<String>, &'a Expression)>,
    ) {
        match pattern {
            Pattern::Identifier(id) => {
                self.declare(
                    scope_id,
                    &id.name,
                    BindingKind::Param,
                    id.span_start,
                    true,
                    via_destructuring,
                    false,
                );
            }
            Pattern::ArrayPattern { elements } => {
                for element in elements.iter().flatten() {
                    self.declare_pattern_names_only(element, scope_id, true, defaults);
                }
            }
            Pattern::ObjectPattern { properties } => {
                for property in properties {
                    match property {
                        ObjectPatternProperty::Property { value, .. } => {
                            self.declare_pattern_names_only(value, scope_id, true, defaults);
                        }
                        ObjectPatternProperty::RestElement { argument } => {
                            self.declare_pattern_names_only(argument, scope_id, true, defaults);
                        }
                    }
                }
            }
            Pattern::AssignmentPattern { left, right } => {
                let ctx_name = left.as_simple_identifier().map(|id| id.name.clone());
                defaults.push((ctx_name, right));
                self.declare_pattern_names_only(left, scope_id, via_destructuring, defaults);
            }
            Pattern::RestElement { argument } => {
                self.declare_pattern_names_only(argument, scope_id, true, defaults);
            }
        }
    }

    /// Attaches an lvalue reference to every identifier in an assignment-
    /// target pattern (used for `var`/catch/for-header assignment targets
    /// that are already hoisted or otherwise pre-declared). `is_hoisted`
    /// marks whether the binding this reference attaches to is a hoisted
    /// one (`var`/`function`, true) versus a lexical one already declared by
    /// `declare_lexical_prepass` (`let`/`const`, false) - purely descriptive,
    /// matching `Reference::is_hoisted_declaration`'s documented meaning.
    fn reference_assignment_pattern(
        &mut self,
        pattern: &'a Pattern,
        scope_id: ScopeId,
        has_init: bool,
        is_hoisted: bool,
    ) {
        match pattern {
            Pattern::Identifier(id) => {
                self.reference(
                    scope_id,
                    &id.name,
                    id.span_start,
                    true,
                    is_hoisted,
                    true,
                    false,
                    has_init,
                    None,
                );
            }
            Pattern::ArrayPattern { elements } => {
                for element in elements.iter().flatten() {
                    self.reference_assignment_pattern(element, scope_id, has_init, is_hoisted);
                }
            }
            Pattern::ObjectPattern { properties } => {
                for property in properties {
                    match property {
                        ObjectPatternProperty::Property { value, .. } => {
                            self.reference_assignment_pattern(value, scope_id, has_init, is_hoisted);
                        }
                        ObjectPatternProperty::RestElement { argument } => {
                            self.reference_assignment_pattern(argument, scope_id, has_init, is_hoisted);
                        }
                    }
                }
            }
            Pattern::AssignmentPattern { left, right } => {
                self.walk_expression(right, scope_id, None);
                self.reference_assignment_pattern(left, scope_id, true, is_hoisted);
            }
            Pattern::RestElement { argument } => {
                self.reference_assignment_pattern(argument, scope_id, has_init, is_hoisted);
            }
        }
    }

    // ---- scope entry helpers ----------------------------------------------

    fn enter_function_scope(
        &mut self,
        params: &'a [Pattern],
        body: &'a crate::parser::ast_types::BlockStatement,
        parent_scope: ScopeId,
    ) {
        let fn_scope = self.push_scope(ScopeKind::Function, parent_scope);
        self.declare_params(params, fn_scope);
        self.hoist_and_walk_body(&body.body, fn_scope, fn_scope);
        self.exit_scope(fn_scope);
    }

    fn walk_class_body(
        &mut self,
        class_body: &'a crate::parser::ast_types::ClassBody,
        parent_scope: ScopeId,
    ) {
        let body_scope = self.push_scope(ScopeKind::ClassBody, parent_scope);
        for element in &class_body.body {
            match element {
                ClassElement::PropertyDefinition { value, .. } => {
                    if let Some(value) = value {
                        self.walk_expression(value, body_scope, None);
                    }
                }
                ClassElement::MethodDefinition { value, .. } => {
                    self.enter_function_scope(&value.params, &value.body, body_scope);
                }
            }
        }
        self.exit_scope(body_scope);
    }

    /// Issue-166 family: a `var` declared anywhere inside a catch handler's
    /// body (without crossing into a nested function/class) whose name
    /// matches the catch parameter always collides with it -
    /// `@suppress {duplicate}` never covers this pair, and the two bindings
    /// never land in the same `scope_bindings` entry through `declare()` (the
    /// catch param lives in the catch block's own scope; the `var` hoists
    /// past it to the enclosing function/program scope), so the ordinary
    /// redeclaration path in `declare()` never sees this collision on its
    /// own. Retracts any `REDECLARED_VARIABLE` warning the ordinary var/var
    /// hoist collision already emitted for the same declaration, so exactly
    /// one diagnostic survives.
    fn flag_catch_param_var_collisions(&mut self, body: &'a [Statement], catch_param_name: &str) {
        let mut positions = Vec::new();
        for stmt in body {
            collect_catch_param_var_collisions(stmt, catch_param_name, &mut positions);
        }
        for position in positions {
            self.diagnostics.retain(|d| {
                !(d.position == position
                    && d.name == catch_param_name
                    && d.kind == DiagnosticKind::RedeclaredVariable)
            });
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::RedeclaredVariableError,
                position,
                catch_param_name.to_string(),
            ));
        }
    }

    /// Applies R1 to a non-block statement body (the body of `if`/`while`/
    /// `for`/`with`/a label), then walks it in the enclosing scope - a bare
    /// statement body never introduces its own lexical scope in JavaScript,
    /// only an actual `{}` block does, and `walk_statement`'s own
    /// `BlockStatement` arm already opens one when that's what `body` is.
    fn check_r1_and_walk(&mut self, body: &'a Statement, scope_id: ScopeId) {
        if let Some((position, name)) = super::rules::check_declaration_not_in_block(body) {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::DeclarationNotDirectlyInBlock,
                position,
                name,
            ));
        }
        self.walk_statement(body, scope_id);
    }

    // ---- sequential walk ----------------------------------------------------

    fn walk_statement(&mut self, stmt: &'a Statement, scope_id: ScopeId) {
        match stmt {
            Statement::VariableDeclaration { declarations, kind } => {
                for declarator in declarations {
                    match kind {
                        VariableDeclarationKind::Var => {
                            self.assign_hoisted_pattern(declarator, scope_id);
                        }
                        VariableDeclarationKind::Let | VariableDeclarationKind::Const => {
                            // Already declared by the block's lexical pre-pass
                            // (`declare_lexical_prepass`); this sequential pass
                            // only attaches the reference and walks the init.
                            self.finalize_lexical_declarator(declarator, scope_id);
                        }
                    }
                }
            }
            Statement::FunctionDeclaration {
                id: Some(id),
                params,
                body,
                ..
            } => {
                self.reference(scope_id, &id.name, id.span_start, true, true, true, false, true, None);
                self.enter_function_scope(params, body, scope_id);
            }
            Statement::FunctionDeclaration { id: None, params, body, .. } => {
                self.enter_function_scope(params, body, scope_id);
            }
            Statement::ClassDeclaration {
                id,
                super_class,
                body,
            } => {
                // Already declared by the block's lexical pre-pass; this
                // sequential pass attaches the declaration reference and
                // walks the heritage clause with self-reference tainted.
                if let Some(id) = id {
                    self.reference(
                        scope_id,
                        &id.name,
                        id.span_start,
                        true,
                        false,
                        true,
                        false,
                        true,
                        None,
                    );
                    if let Some(super_class) = super_class {
                        self.walk_own_initializer(vec![id.name.clone()], scope_id, super_class);
                    }
                } else if let Some(super_class) = super_class {
                    self.walk_expression(super_class, scope_id, None);
                }
                self.walk_class_body(body, scope_id);
            }
            Statement::ExpressionStatement { expression } => {
                if let Some(body) = extract_goog_scope_callback(expression) {
                    let scope_body_id = self.push_scope(ScopeKind::Function, scope_id);
                    if let Some(s) = self.scope_tree.get_scope_mut(scope_body_id) {
                        s.is_goog_scope_body = true;
                    }
                    self.hoist_and_walk_body(&body.body, scope_body_id, scope_body_id);
                    self.exit_scope(scope_body_id);
                } else if let Some((exports_param, body)) =
                    extract_goog_load_module_callback(expression)
                {
                    let module_scope = self.push_scope(ScopeKind::GoogModule, scope_id);
                    self.declare_pattern(exports_param, module_scope, BindingKind::Param, false);
                    self.hoist_and_walk_body(&body.body, module_scope, module_scope);
                    self.exit_scope(module_scope);
                } else {
                    self.walk_expression(expression, scope_id, None);
                }
            }
            Statement::BlockStatement(block) => {
                let block_scope = self.push_scope(ScopeKind::Block, scope_id);
                self.walk_body_only(&block.body, block_scope);
                self.exit_scope(block_scope);
            }
            Statement::ReturnStatement { argument } => {
                if let Some(argument) = argument {
                    self.walk_expression(argument, scope_id, None);
                }
            }
            Statement::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                self.walk_expression(test, scope_id, None);
                self.check_r1_and_walk(consequent, scope_id);
                if let Some(alternate) = alternate {
                    self.check_r1_and_walk(alternate, scope_id);
                }
            }
            Statement::WhileStatement { test, body } => {
                self.walk_expression(test, scope_id, None);
                self.check_r1_and_walk(body, scope_id);
            }
            Statement::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let header_scope = self.push_scope(ScopeKind::ForHeader, scope_id);
                if let Some(init) = init {
                    match init {
                        ForInit::VariableDeclaration { declarations, kind } => {
                            for declarator in declarations {
                                let binding_kind = match kind {
                                    VariableDeclarationKind::Var => BindingKind::Var,
                                    VariableDeclarationKind::Let => BindingKind::Let,
                                    VariableDeclarationKind::Const => BindingKind::Const,
                                };
                                if binding_kind == BindingKind::Var {
                                    // Already hoisted to the enclosing function/
                                    // program scope by the pre-pass; look it up
                                    // rather than re-declaring it here.
                                    if let Some(expr) = &declarator.init {
                                        self.walk_expression(expr, header_scope, None);
                                    }
                                    self.reference_assignment_pattern(
                                        &declarator.id,
                                        header_scope,
                                        declarator.init.is_some(),
                                        true,
                                    );
                                } else {
                                    self.declare_pattern_names_only_lexical(
                                        &declarator.id,
                                        header_scope,
                                        binding_kind,
                                        false,
                                    );
                                    self.finalize_lexical_declarator(declarator, header_scope);
                                }
                            }
                        }
                        ForInit::Expression(expr) => {
                            self.walk_expression(expr, header_scope, None);
                        }
                    }
                }
                if let Some(test) = test {
                    self.walk_expression(test, header_scope, None);
                }
                if let Some(update) = update {
                    self.walk_expression(update, header_scope, None);
                }
                self.check_r1_and_walk(body, header_scope);
                self.exit_scope(header_scope);
            }
            Statement::ForInStatement {
                left,
                right,
                body,
                ..
            } => {
                self.walk_expression(right, scope_id, None);
                let header_scope = self.push_scope(ScopeKind::ForHeader, scope_id);
                match left {
                    ForHeadLeft::VariableDeclaration { kind, pattern } => match kind {
                        VariableDeclarationKind::Var => {
                            // Already hoisted to the enclosing function/program
                            // scope by the pre-pass.
                            self.reference_assignment_pattern(pattern, header_scope, true, true);
                        }
                        VariableDeclarationKind::Let => {
                            self.declare_pattern(pattern, header_scope, BindingKind::Let, false);
                        }
                        VariableDeclarationKind::Const => {
                            self.declare_pattern(pattern, header_scope, BindingKind::Const, false);
                        }
                    },
                    ForHeadLeft::Pattern(pattern) => {
                        self.reference_assignment_pattern(pattern, header_scope, true, true);
                    }
                }
                self.check_r1_and_walk(body, header_scope);
                self.exit_scope(header_scope);
            }
            Statement::TryStatement {
                block,
                handler,
                finalizer,
            } => {
                let try_scope = self.push_scope(ScopeKind::Block, scope_id);
                self.walk_body_only(&block.body, try_scope);
                self.exit_scope(try_scope);

                if let Some(handler) = handler {
                    let catch_scope = self.push_scope(ScopeKind::CatchBlock, scope_id);
                    let catch_param_name = handler
                        .param
                        .as_ref()
                        .and_then(|p| p.as_simple_identifier())
                        .map(|id| id.name.clone());
                    if let Some(param) = &handler.param {
                        self.declare_pattern(param, catch_scope, BindingKind::CatchParam, false);
                    }
                    if let Some(name) = &catch_param_name {
                        self.flag_catch_param_var_collisions(&handler.body.body, name);
                    }
                    self.walk_body_only(&handler.body.body, catch_scope);
                    self.exit_scope(catch_scope);
                }

                if let Some(finalizer) = finalizer {
                    let finally_scope = self.push_scope(ScopeKind::Block, scope_id);
                    self.walk_body_only(&finalizer.body, finally_scope);
                    self.exit_scope(finally_scope);
                }
            }
            Statement::LabeledStatement { body, .. } => {
                self.check_r1_and_walk(body, scope_id);
            }
            Statement::WithStatement { object, body } => {
                self.walk_expression(object, scope_id, None);
                self.check_r1_and_walk(body, scope_id);
            }
            Statement::ImportDeclaration { specifiers, .. } => {
                for specifier in specifiers {
                    match specifier {
                        ImportSpecifier::ImportDefaultSpecifier { local }
                        | ImportSpecifier::ImportNamespaceSpecifier { local } => {
                            self.declare(
                                scope_id,
                                &local.name,
                                BindingKind::Import,
                                local.span_start,
                                true,
                                false,
                                false,
                            );
                            self.reference(
                                scope_id,
                                &local.name,
                                local.span_start,
                                true,
                                false,
                                true,
                                false,
                                true,
                                None,
                            );
                        }
                        ImportSpecifier::ImportSpecifier { local, .. } => {
                            self.declare(
                                scope_id,
                                &local.name,
                                BindingKind::Import,
                                local.span_start,
                                true,
                                false,
                                false,
                            );
                            self.reference(
                                scope_id,
                                &local.name,
                                local.span_start,
                                true,
                                false,
                                true,
                                false,
                                true,
                                None,
                            );
                        }
                    }
                }
            }
            Statement::ExportNamedDeclaration {
                declaration,
                specifiers,
                ..
            } => {
                if let Some(declaration) = declaration {
                    self.walk_export_declaration(declaration, scope_id);
                }
                for specifier in specifiers {
                    let crate::parser::ast_types::ExportSpecifier::ExportSpecifier { local, .. } =
                        specifier;
                    self.reference(
                        scope_id,
                        &local.name,
                        local.span_start,
                        false,
                        false,
                        false,
                        true,
                        false,
                        None,
                    );
                }
            }
        }
    }

    /// Walks a declaration wrapped by `export`, marking the declared name(s)
    /// `is_exported`. The underlying declaration shape is walked exactly as
    /// `walk_statement` would; only the export bookkeeping differs.
    fn walk_export_declaration(&mut self, declaration: &'a Statement, scope_id: ScopeId) {
        match declaration {
            Statement::VariableDeclaration { declarations, kind } => {
                for declarator in declarations {
                    match kind {
                        VariableDeclarationKind::Var => {
                            self.assign_hoisted_pattern(declarator, scope_id);
                            if let Some(id) = declarator.id.as_simple_identifier() {
                                self.mark_exported(scope_id, &id.name);
                            }
                        }
                        VariableDeclarationKind::Let | VariableDeclarationKind::Const => {
                            // Already declared (with `is_exported: true`) by
                            // the block's lexical pre-pass.
                            self.finalize_lexical_declarator(declarator, scope_id);
                        }
                    }
                }
            }
            Statement::FunctionDeclaration {
                id: Some(id),
                params,
                body,
                ..
            } => {
                self.reference(scope_id, &id.name, id.span_start, true, true, true, false, true, None);
                self.mark_exported(scope_id, &id.name);
                self.enter_function_scope(params, body, scope_id);
            }
            Statement::ClassDeclaration {
                id: Some(id),
                super_class,
                body,
            } => {
                // Already declared (with `is_exported: true`) by the block's
                // lexical pre-pass.
                self.reference(
                    scope_id,
                    &id.name,
                    id.span_start,
                    true,
                    false,
                    true,
                    false,
                    true,
                    None,
                );
                if let Some(super_class) = super_class {
                    self.walk_own_initializer(vec![id.name.clone()], scope_id, super_class);
                }
                self.walk_class_body(body, scope_id);
            }
            other => self.walk_statement(other, scope_id),
        }
    }

    fn mark_exported(&mut self, scope_id: ScopeId, name: &str) {
        if let Some(binding_id) = self
            .binding_table
            .scope_bindings
            .get(&scope_id)
            .and_then(|names| names.get(name))
            .copied()
        {
            if let Some(binding) = self.binding_table.bindings.get_mut(&binding_id) {
                binding.is_exported = true;
            }
        }
    }

    fn walk_expression(&mut self, expr: &'a Expression, scope_id: ScopeId, default_ctx: Option<&str>) {
        match expr {
            Expression::Identifier(id) => {
                self.reference(
                    scope_id,
                    &id.name,
                    id.span_start,
                    false,
                    false,
                    false,
                    true,
                    false,
                    default_ctx,
                );
            }
            Expression::Literal(_) => {}
            Expression::BinaryExpression { left, right, .. } => {
                self.walk_expression(left, scope_id, default_ctx);
                self.walk_expression(right, scope_id, default_ctx);
            }
            Expression::UnaryExpression { argument, .. } => {
                self.walk_expression(argument, scope_id, default_ctx);
            }
            Expression::AssignmentExpression {
                left,
                operator,
                right,
            } => {
                self.walk_expression(right, scope_id, default_ctx);
                self.walk_assignment_target(left, scope_id, operator.is_compound(), default_ctx);
            }
            Expression::UpdateExpression { argument, .. } => {
                self.walk_assignment_target(argument, scope_id, true, default_ctx);
            }
            Expression::CallExpression { callee, arguments } => {
                self.walk_expression(callee, scope_id, default_ctx);
                for argument in arguments {
                    self.walk_expression(argument, scope_id, default_ctx);
                }
            }
            Expression::MemberExpression {
                object,
                property,
                computed,
            } => {
                self.walk_expression(object, scope_id, default_ctx);
                if *computed {
                    self.walk_expression(property, scope_id, default_ctx);
                }
            }
            Expression::FunctionExpression(function) => {
                let fn_scope = self.push_scope(ScopeKind::Function, scope_id);
                if let Some(id) = &function.id {
                    // A named function expression's own name is visible only
                    // inside its own body, bound there like a const.
                    self.declare(
                        fn_scope,
                        &id.name,
                        BindingKind::Const,
                        id.span_start,
                        true,
                        false,
                        false,
                    );
                    self.reference(
                        fn_scope,
                        &id.name,
                        id.span_start,
                        true,
                        false,
                        true,
                        false,
                        true,
                        None,
                    );
                }
                self.declare_params(&function.params, fn_scope);
                self.hoist_and_walk_body(&function.body.body, fn_scope, fn_scope);
                self.exit_scope(fn_scope);
            }
            Expression::ArrowFunctionExpression { params, body, .. } => {
                let fn_scope = self.push_scope(ScopeKind::Function, scope_id);
                self.declare_params(params, fn_scope);
                match body {
                    ArrowFunctionBody::BlockStatement(block) => {
                        self.hoist_and_walk_body(&block.body, fn_scope, fn_scope);
                    }
                    ArrowFunctionBody::Expression(expr) => {
                        self.walk_expression(expr, fn_scope, None);
                    }
                }
                self.exit_scope(fn_scope);
            }
            Expression::ObjectExpression { properties } => {
                for property in properties {
                    match property {
                        crate::parser::ast_types::ObjectProperty::Property {
                            value, computed, key, ..
                        } => {
                            if *computed {
                                if let crate::parser::ast_types::PropertyKey::Identifier(id) = key
                                {
                                    self.reference(
                                        scope_id,
                                        &id.name,
                                        id.span_start,
                                        false,
                                        false,
                                        false,
                                        true,
                                        false,
                                        default_ctx,
                                    );
                                }
                            }
                            self.walk_expression(value, scope_id, default_ctx);
                        }
                        crate::parser::ast_types::ObjectProperty::SpreadElement { argument } => {
                            self.walk_expression(argument, scope_id, default_ctx);
                        }
                    }
                }
            }
            Expression::ArrayExpression { elements } => {
                for element in elements.iter().flatten() {
                    self.walk_expression(element, scope_id, default_ctx);
                }
            }
            Expression::TemplateLiteral { expressions, .. } => {
                for expr in expressions {
                    self.walk_expression(expr, scope_id, default_ctx);
                }
            }
            Expression::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                self.walk_expression(test, scope_id, default_ctx);
                self.walk_expression(consequent, scope_id, default_ctx);
                self.walk_expression(alternate, scope_id, default_ctx);
            }
        }
    }

    /// Walks the left-hand side of an assignment/update expression: an
    /// identifier becomes an lvalue reference (read too, for compound
    /// assignment/update), a member expression just walks its subexpressions
    /// as reads (assigning to a property never touches a binding).
    fn walk_assignment_target(
        &mut self,
        target: &'a Expression,
        scope_id: ScopeId,
        also_read: bool,
        default_ctx: Option<&str>,
    ) {
        match target {
            Expression::Identifier(id) => {
                self.reference(
                    scope_id,
                    &id.name,
                    id.span_start,
                    false,
                    false,
                    true,
                    also_read,
                    false,
                    default_ctx,
                );
            }
            Expression::MemberExpression { object, property, computed } => {
                self.walk_expression(object, scope_id, default_ctx);
                if *computed {
                    self.walk_expression(property, scope_id, default_ctx);
                }
            }
            _ => {
                self.walk_expression(target, scope_id, default_ctx);
            }
        }
    }
}

/// Recursively collects every `var` declarator and function declaration
/// reachable from `stmt` without crossing into a nested function/arrow/class
/// body (those get their own hoist pass when `walk_statement`/
/// `walk_expression` reaches them). `at_top` tracks whether this statement
/// sits directly in the body being scanned (vs. nested inside a block/if/
/// loop/etc of that same body) - it becomes `false` as soon as recursion
/// descends into a nested block-like construct.
fn collect_hoists_stmt<'a>(stmt: &'a Statement, at_top: bool, out: &mut Vec<Hoisted<'a>>) {
    match stmt {
        Statement::VariableDeclaration {
            kind: VariableDeclarationKind::Var,
            declarations,
        } => {
            for declarator in declarations {
                out.push(Hoisted::Var {
                    pattern: &declarator.id,
                    at_top,
                });
            }
        }
        Statement::FunctionDeclaration { id: Some(_), .. } => {
            out.push(Hoisted::Func { stmt, at_top });
        }
        Statement::BlockStatement(block) => {
            for inner in &block.body {
                collect_hoists_stmt(inner, false, out);
            }
        }
        Statement::IfStatement {
            consequent,
            alternate,
            ..
        } => {
            collect_hoists_stmt(consequent, false, out);
            if let Some(alternate) = alternate {
                collect_hoists_stmt(alternate, false, out);
            }
        }
        Statement::WhileStatement { body, .. } => {
            collect_hoists_stmt(body, false, out);
        }
        Statement::ForStatement { init, body, .. } => {
            if let Some(ForInit::VariableDeclaration {
                kind: VariableDeclarationKind::Var,
                declarations,
            }) = init
            {
                for declarator in declarations {
                    out.push(Hoisted::Var {
                        pattern: &declarator.id,
                        at_top: false,
                    });
                }
            }
            collect_hoists_stmt(body, false, out);
        }
        Statement::ForInStatement { left, body, .. } => {
            if let ForHeadLeft::VariableDeclaration {
                kind: VariableDeclarationKind::Var,
                pattern,
            } = left
            {
                out.push(Hoisted::Var {
                    pattern,
                    at_top: false,
                });
            }
            collect_hoists_stmt(body, false, out);
        }
        Statement::TryStatement {
            block,
            handler,
            finalizer,
        } => {
            for inner in &block.body {
                collect_hoists_stmt(inner, false, out);
            }
            if let Some(handler) = handler {
                for inner in &handler.body.body {
                    collect_hoists_stmt(inner, false, out);
                }
            }
            if let Some(finalizer) = finalizer {
                for inner in &finalizer.body {
                    collect_hoists_stmt(inner, false, out);
                }
            }
        }
        Statement::LabeledStatement { body, .. } => {
            collect_hoists_stmt(body, at_top, out);
        }
        Statement::WithStatement { body, .. } => {
            collect_hoists_stmt(body, false, out);
        }
        // Function/class/arrow bodies, imports, exports-of-declarations,
        // expressions, returns: either not statement-level `var`/function
        // hoist sources, or owned by their own independent hoist pass.
        _ => {}
    }
}

/// Shallow scan for `var <name>` declarators reachable from `stmt` without
/// crossing into a nested function/class body - the same boundary
/// `collect_hoists_stmt` uses, since these are exactly the `var`s that hoist
/// up to (and past) the catch handler they're lexically nested in.
fn collect_catch_param_var_collisions(stmt: &Statement, name: &str, out: &mut Vec<u32>) {
    match stmt {
        Statement::VariableDeclaration {
            kind: VariableDeclarationKind::Var,
            declarations,
        } => {
            for declarator in declarations {
                if let Some(id) = declarator.id.as_simple_identifier() {
                    if id.name == name {
                        out.push(id.span_start);
                    }
                }
            }
        }
        Statement::BlockStatement(block) => {
            for inner in &block.body {
                collect_catch_param_var_collisions(inner, name, out);
            }
        }
        Statement::IfStatement {
            consequent,
            alternate,
            ..
        } => {
            collect_catch_param_var_collisions(consequent, name, out);
            if let Some(alternate) = alternate {
                collect_catch_param_var_collisions(alternate, name, out);
            }
        }
        Statement::WhileStatement { body, .. } => {
            collect_catch_param_var_collisions(body, name, out);
        }
        Statement::ForStatement { init, body, .. } => {
            if let Some(ForInit::VariableDeclaration {
                kind: VariableDeclarationKind::Var,
                declarations,
            }) = init
            {
                for declarator in declarations {
                    if let Some(id) = declarator.id.as_simple_identifier() {
                        if id.name == name {
                            out.push(id.span_start);
                        }
                    }
                }
            }
            collect_catch_param_var_collisions(body, name, out);
        }
        Statement::ForInStatement { left, body, .. } => {
            if let ForHeadLeft::VariableDeclaration {
                kind: VariableDeclarationKind::Var,
                pattern,
            } = left
            {
                if let Some(id) = pattern.as_simple_identifier() {
                    if id.name == name {
                        out.push(id.span_start);
                    }
                }
            }
            collect_catch_param_var_collisions(body, name, out);
        }
        Statement::TryStatement {
            block,
            handler,
            finalizer,
        } => {
            for inner in &block.body {
                collect_catch_param_var_collisions(inner, name, out);
            }
            if let Some(handler) = handler {
                for inner in &handler.body.body {
                    collect_catch_param_var_collisions(inner, name, out);
                }
            }
            if let Some(finalizer) = finalizer {
                for inner in &finalizer.body {
                    collect_catch_param_var_collisions(inner, name, out);
                }
            }
        }
        Statement::LabeledStatement { body, .. } => {
            collect_catch_param_var_collisions(body, name, out);
        }
        Statement::WithStatement { body, .. } => {
            collect_catch_param_var_collisions(body, name, out);
        }
        _ => {}
    }
}

/// Every identifier name a pattern ultimately binds, including nested
/// destructuring targets - used to taint a `let`/`const` declarator's own
/// initializer with the full set of names it is currently declaring.
fn pattern_bound_names(pattern: &Pattern, out: &mut Vec<String>) {
    match pattern {
        Pattern::Identifier(id) => out.push(id.name.clone()),
        Pattern::ArrayPattern { elements } => {
            for element in elements.iter().flatten() {
                pattern_bound_names(element, out);
            }
        }
        Pattern::ObjectPattern { properties } => {
            for property in properties {
                match property {
                    ObjectPatternProperty::Property { value, .. } => {
                        pattern_bound_names(value, out);
                    }
                    ObjectPatternProperty::RestElement { argument } => {
                        pattern_bound_names(argument, out);
                    }
                }
            }
        }
        Pattern::AssignmentPattern { left, .. } => pattern_bound_names(left, out),
        Pattern::RestElement { argument } => pattern_bound_names(argument, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::jsdoc::JsDocIndex;
    use crate::analyzer::AnalyzerConfig;
    use crate::parser::{parse_js, ParserConfig};

    fn run(source: &str) -> (ScopeTree, BindingTable, Vec<Diagnostic>) {
        let parse_result = parse_js(source, "test.js", &ParserConfig::default());
        assert!(
            parse_result.errors.is_empty(),
            "unexpected parse errors: {:?}",
            parse_result.errors
        );
        let ast = parse_result.ast.expect("AST should be present");
        let jsdoc_index = JsDocIndex::build(parse_result.trivia.as_ref());
        build(&ast, &AnalyzerConfig::default(), &jsdoc_index).expect("build should not error")
    }

    fn only_binding_named<'a>(table: &'a BindingTable, name: &str) -> &'a Binding {
        let matches: Vec<&Binding> = table
            .bindings
            .values()
            .filter(|b| b.name == name)
            .collect();
        assert_eq!(
            matches.len(),
            1,
            "expected exactly one binding named {name:?}, found {}",
            matches.len()
        );
        matches[0]
    }

    #[test]
    fn let_self_initializer_is_exactly_one_early_reference_error() {
        let (_, _, diagnostics) = run("let x = x;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EarlyReferenceError);
    }

    #[test]
    fn const_self_initializer_is_exactly_one_early_reference_error() {
        let (_, _, diagnostics) = run("const x = x;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EarlyReferenceError);
    }

    #[test]
    fn class_extending_itself_is_an_early_reference_error() {
        let (_, _, diagnostics) = run("class A extends A {}");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EarlyReferenceError);
    }

    #[test]
    fn forward_reference_to_a_later_let_in_the_same_block_resolves_to_its_binding() {
        // Before the lexical pre-pass, `n` had no binding declared yet when
        // `console.log(n)` walked, so it resolved as an `ImplicitGlobal` with
        // its own position as `declaration_position` - never flagged. The
        // pre-pass declares `n` before the block's statements are walked, so
        // the read now resolves to the real `Let` binding and is caught by
        // R3 as an early reference.
        let source = "{ console.log(n); let n = 1; }";
        let (_, table, diagnostics) = run(source);
        let binding = only_binding_named(&table, "n");
        assert_eq!(binding.kind, BindingKind::Let);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EarlyReferenceError);
    }

    #[test]
    fn forward_reference_to_a_later_const_in_an_outer_function_is_not_an_implicit_global() {
        let source = "function f() { return c; } const c = 1; f();";
        let (_, table, _) = run(source);
        let binding = only_binding_named(&table, "c");
        assert_eq!(binding.kind, BindingKind::Const);
    }

    #[test]
    fn let_declaration_has_a_declaration_reference() {
        let (_, table, _) = run("let x = 1;");
        let binding = only_binding_named(&table, "x");
        assert!(
            binding.references.iter().any(|r| r.is_declaration),
            "expected a declaration reference, got {:?}",
            binding.references
        );
    }

    #[test]
    fn class_declaration_has_a_declaration_reference() {
        let (_, table, _) = run("class A {}");
        let binding = only_binding_named(&table, "A");
        assert!(
            binding.references.iter().any(|r| r.is_declaration),
            "expected a declaration reference, got {:?}",
            binding.references
        );
    }

    #[test]
    fn catch_param_has_a_declaration_reference() {
        let (_, table, _) = run("try {} catch (e) {}");
        let binding = only_binding_named(&table, "e");
        assert_eq!(binding.kind, BindingKind::CatchParam);
        assert!(
            binding.references.iter().any(|r| r.is_declaration),
            "expected a declaration reference, got {:?}",
            binding.references
        );
    }

    #[test]
    fn import_binding_has_a_declaration_reference() {
        let (_, table, _) = run("import {x} from 'm'; console.log(x);");
        let binding = only_binding_named(&table, "x");
        assert_eq!(binding.kind, BindingKind::Import);
        assert!(
            binding.references.iter().any(|r| r.is_declaration),
            "expected a declaration reference, got {:?}",
            binding.references
        );
    }

    #[test]
    fn default_param_referencing_a_later_param_is_still_always_an_error() {
        // Regression guard for the rejected design: tainting
        // `in_default_param_initializer_of` by name-equality (to reuse it for
        // the let/const self-init case) would have downgraded this
        // always-ERROR case to a mere warning. It must stay untouched.
        let (_, _, diagnostics) = run("function f(x = y, y) {}");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EarlyReferenceError);
    }
}
