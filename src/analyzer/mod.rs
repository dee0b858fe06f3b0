//! # Binding Analyzer Component
//!
//! The analyzer builds the scope tree and binding table for a parsed program
//! (the "scope tree and symbol table" a production front-end would normally
//! supply externally) and then runs the rule engine over it, emitting
//! diagnostics about redeclarations, early (pre-declaration) references,
//! reassignment of immutable bindings, misplaced block-scoped declarations,
//! and, optionally, unused local assignments.
//!
//! ## Key components
//!
//! - **Scope builder** (`scope_builder`): constructs the hierarchical scope
//!   tree, declares bindings, and attaches every textual reference to the
//!   binding it resolves to.
//! - **Rule engine** (`rules`): R1 through R5, applied to every binding once
//!   its owning scope has been fully built.
//! - **JSDoc index** (`jsdoc`): a pragmatic query surface over
//!   `@suppress {duplicate}` / `@typedef` / `@fileoverview`, built from the
//!   parser's comment trivia.
//!
//! ## Usage
//!
//! ```rust
//! use crate::analyzer::{analyze_ast, AnalyzerConfig};
//!
//! let ast = parse_javascript_code(source)?;
//! let config = AnalyzerConfig::default();
//! let analysis = analyze_ast(&ast, &config, trivia.as_ref())?;
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::ast_types::Program;
use crate::parser::Trivia;

pub mod jsdoc;
pub mod rules;
pub mod scope_builder;

#[cfg(test)]
mod tests;

/// Configuration for the analyzer component. Spec surface: one boolean plus
/// the ambient verbose flag shared with the rest of the CLI; no environment
/// variables, no persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Enables `UNUSED_LOCAL_ASSIGNMENT` (R5). Off by default: a local never
    /// read is a lint, not a correctness bug, and most callers only want the
    /// correctness rules (R1-R4) on every run.
    pub unused_local_variable_check_enabled: bool,
    /// Enable verbose analysis tracing.
    pub verbose: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            unused_local_variable_check_enabled: false,
            verbose: false,
        }
    }
}

/// Unique identifier for scopes within the analysis
pub type ScopeId = u32;

/// Unique identifier for bindings within the analysis
pub type BindingId = u32;

/// Errors that can occur during analysis. Reserved for genuine internal
/// invariant violations (an arena lookup that should never miss); a misuse of
/// JavaScript bindings is a `Diagnostic`, not an `AnalysisError` - the pass
/// never aborts traversal because a program redeclares a variable.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AnalysisError {
    #[error("scope analysis failed: {message}")]
    ScopeAnalysisFailed { message: String },

    #[error("symbol resolution failed for identifier '{identifier}' at {location}")]
    SymbolResolutionFailed { identifier: String, location: String },

    #[error("invalid scope nesting: {details}")]
    InvalidScopeNesting { details: String },

    #[error("internal analyzer error: {message}")]
    InternalError { message: String },
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Complete analysis result: the built scope/binding model plus every
/// diagnostic the rule engine emitted, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingAnalysis {
    pub binding_table: BindingTable,
    pub scope_tree: ScopeTree,
    pub diagnostics: Vec<Diagnostic>,
    pub metadata: AnalysisMetadata,
}

/// Binding table tracking every declared name and its references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingTable {
    /// All bindings indexed by their unique ID
    pub bindings: HashMap<BindingId, Binding>,
    /// Mapping from scope to the canonical binding id for each name declared
    /// directly in it. Redeclarations still resolve through here; the second
    /// and later declarations are recorded on the canonical binding's
    /// `other_declarations`, not as separate bindings.
    pub scope_bindings: HashMap<ScopeId, HashMap<String, BindingId>>,
    /// Next available binding ID
    pub next_binding_id: BindingId,
}

impl BindingTable {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            scope_bindings: HashMap::new(),
            next_binding_id: 0,
        }
    }

    pub fn next_id(&mut self) -> BindingId {
        let id = self.next_binding_id;
        self.next_binding_id += 1;
        id
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Hierarchical scope tree structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeTree {
    pub scopes: HashMap<ScopeId, Scope>,
    pub root_scope_id: ScopeId,
    pub next_scope_id: ScopeId,
}

impl ScopeTree {
    pub fn new(root_scope_kind: ScopeKind) -> Self {
        let mut scopes = HashMap::new();
        scopes.insert(
            0,
            Scope {
                id: 0,
                kind: root_scope_kind,
                parent_id: None,
                children: Vec::new(),
                bindings: Vec::new(),
                is_externs: false,
                is_goog_scope_body: false,
            },
        );

        Self {
            scopes,
            root_scope_id: 0,
            next_scope_id: 1,
        }
    }

    pub fn next_id(&mut self) -> ScopeId {
        let id = self.next_scope_id;
        self.next_scope_id += 1;
        id
    }

    pub fn get_scope(&self, scope_id: ScopeId) -> Option<&Scope> {
        self.scopes.get(&scope_id)
    }

    pub fn get_scope_mut(&mut self, scope_id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(&scope_id)
    }
}

/// Analysis metadata and statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub scope_count: u32,
    pub binding_count: u32,
    pub diagnostic_count: u32,
    pub analysis_time_ms: u64,
}

/// Individual scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent_id: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Bindings declared directly in this scope (not in descendants).
    pub bindings: Vec<BindingId>,
    /// True for scopes originating from externs files; every diagnostic is
    /// suppressed there. Nothing in this single-file CLI sets this today -
    /// externs/srcs partitioning is, per the external-interface boundary, a
    /// collaborator this pass consumes rather than builds - but the field is
    /// modeled so a caller that does partition files can plug it in without
    /// touching the rule engine.
    pub is_externs: bool,
    /// Set on a `goog.scope(function(){...})` body: suppresses R5 entirely
    /// (aliases may only be referenced from type annotations the analyzer
    /// cannot see).
    pub is_goog_scope_body: bool,
}

impl Scope {
    pub fn is_module_like(&self) -> bool {
        matches!(self.kind, ScopeKind::Module | ScopeKind::GoogModule)
    }
}

/// Scope kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeKind {
    Global,
    Module,
    GoogModule,
    Function,
    Block,
    CatchBlock,
    ForHeader,
    ClassBody,
}

/// Binding kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Class,
    FunctionDecl,
    Param,
    CatchParam,
    Import,
    ImplicitGlobal,
}

impl BindingKind {
    pub fn is_hoisted(self) -> bool {
        matches!(
            self,
            BindingKind::Var | BindingKind::FunctionDecl | BindingKind::ImplicitGlobal
        )
    }

    pub fn is_block_scoped(self) -> bool {
        matches!(
            self,
            BindingKind::Let
                | BindingKind::Const
                | BindingKind::Class
                | BindingKind::Import
                | BindingKind::CatchParam
        )
    }

    pub fn is_immutable(self) -> bool {
        matches!(self, BindingKind::Const | BindingKind::Import)
    }
}

/// One prior colliding declaration, recorded on the canonical binding so R2
/// can compare every pair without a separate binding per declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherDeclaration {
    pub kind: BindingKind,
    pub position: u32,
    pub suppress_duplicate: bool,
}

/// A declared name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub kind: BindingKind,
    pub scope: ScopeId,
    /// Textual (never hoisted) position of this binding's first declaration.
    pub declaration_position: u32,
    /// False only for `FunctionDecl` bindings hoisted out of a nested block
    /// rather than declared at the top of their function/module body; those
    /// still warn on pre-declaration calls (R3) instead of being fully silent.
    pub declared_at_top_of_function: bool,
    /// `@suppress {duplicate}` applies to this declaration, directly or via
    /// `@fileoverview`.
    pub suppress_duplicate: bool,
    /// Carries a `@typedef` JSDoc tag - makes an otherwise-unused binding
    /// count as used for R5.
    pub is_typedef: bool,
    pub is_exported: bool,
    /// True when this binding came from an array/object destructuring target
    /// rather than a bare identifier. Preserves a documented quirk: `var {x}
    /// = {}` is never flagged by R5 even when `x` is never read, matching
    /// this pass's current (possibly incomplete) unused-destructuring
    /// behavior rather than inventing stricter semantics.
    pub bound_via_destructuring: bool,
    /// Every textual reference to this binding, in source order. Complete
    /// before any rule fires on it (the scope-exit discipline in
    /// `scope_builder`).
    pub references: Vec<Reference>,
    /// Other declarations of the same name in the same scope, for R2.
    pub other_declarations: Vec<OtherDeclaration>,
    /// Set once R1 or R2 has emitted for this binding, so the deferred R3-R5
    /// pass in `rules.rs` can honor the "short-circuit on first emission"
    /// precedence - R1 and R2 fire immediately during traversal since neither
    /// needs the complete reference list.
    pub higher_precedence_diagnosed: bool,
}

impl Binding {
    pub fn is_hoisted(&self) -> bool {
        self.kind.is_hoisted()
    }

    pub fn is_block_scoped(&self) -> bool {
        self.kind.is_block_scoped()
    }

    pub fn is_immutable(&self) -> bool {
        self.kind.is_immutable()
    }
}

/// One textual occurrence of a name that resolves to a binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// The resolved binding. Always `Some` in practice - an identifier that
    /// resolves to nothing gets an `ImplicitGlobal` binding synthesized for it
    /// on first use. Kept as `Option` to match the documented data model; a
    /// `None` surviving to the rule engine is an internal-invariant
    /// violation, not a user diagnostic.
    pub binding: Option<BindingId>,
    pub enclosing_scope: ScopeId,
    pub source_position: u32,
    pub is_declaration: bool,
    pub is_hoisted_declaration: bool,
    pub is_lvalue: bool,
    pub is_read: bool,
    pub is_initializing: bool,
    pub in_default_param_initializer_of: Option<String>,
}

/// The seven stable diagnostic kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    DeclarationNotDirectlyInBlock,
    EarlyReference,
    EarlyReferenceError,
    RedeclaredVariable,
    RedeclaredVariableError,
    ReassignedConstant,
    UnusedLocalAssignment,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::DeclarationNotDirectlyInBlock => Severity::Error,
            DiagnosticKind::EarlyReference => Severity::Warning,
            DiagnosticKind::EarlyReferenceError => Severity::Error,
            DiagnosticKind::RedeclaredVariable => Severity::Warning,
            DiagnosticKind::RedeclaredVariableError => Severity::Error,
            DiagnosticKind::ReassignedConstant => Severity::Error,
            DiagnosticKind::UnusedLocalAssignment => Severity::Warning,
        }
    }

    pub fn stable_id(self) -> &'static str {
        match self {
            DiagnosticKind::DeclarationNotDirectlyInBlock => "DECLARATION_NOT_DIRECTLY_IN_BLOCK",
            DiagnosticKind::EarlyReference => "EARLY_REFERENCE",
            DiagnosticKind::EarlyReferenceError => "EARLY_REFERENCE_ERROR",
            DiagnosticKind::RedeclaredVariable => "REDECLARED_VARIABLE",
            DiagnosticKind::RedeclaredVariableError => "REDECLARED_VARIABLE_ERROR",
            DiagnosticKind::ReassignedConstant => "REASSIGNED_CONSTANT",
            DiagnosticKind::UnusedLocalAssignment => "UNUSED_LOCAL_ASSIGNMENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// One emitted diagnostic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Source byte offset: the reference site for R3/R4/R5, the declaration
    /// site for R1/R2.
    pub position: u32,
    pub name: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: u32, name: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            position,
            name: name.into(),
        }
    }
}

/// Runs the full binding-analysis pass over a parsed program.
///
/// `trivia` feeds the JSDoc index (`@suppress {duplicate}`, `@typedef`,
/// `@fileoverview`); pass `None` to analyze without any JSDoc awareness
/// (every binding behaves as if undocumented).
pub fn analyze_ast(
    ast: &Program,
    config: &AnalyzerConfig,
    trivia: Option<&Trivia>,
) -> AnalysisResult<BindingAnalysis> {
    let start_time = std::time::Instant::now();

    if config.verbose {
        tracing::debug!("starting binding analysis");
    }

    let jsdoc_index = jsdoc::JsDocIndex::build(trivia);
    let (scope_tree, binding_table, mut diagnostics) =
        scope_builder::build(ast, config, &jsdoc_index)?;

    diagnostics.sort_by_key(|d| d.position);

    let analysis_time = start_time.elapsed().as_millis() as u64;
    let metadata = AnalysisMetadata {
        scope_count: scope_tree.next_scope_id,
        binding_count: binding_table.next_binding_id,
        diagnostic_count: diagnostics.len() as u32,
        analysis_time_ms: analysis_time,
    };

    if config.verbose {
        tracing::debug!(
            scopes = metadata.scope_count,
            bindings = metadata.binding_count,
            diagnostics = metadata.diagnostic_count,
            ms = metadata.analysis_time_ms,
            "binding analysis complete"
        );
    }

    Ok(BindingAnalysis {
        binding_table,
        scope_tree,
        diagnostics,
        metadata,
    })
}
