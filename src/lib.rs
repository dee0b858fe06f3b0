//! # JS Binding Analyzer
//!
//! A variable-reference static-analysis pass for an ECMAScript (ES5 + ES6
//! modules) front-end. Given source text, this crate parses it (`parser`,
//! wrapping `oxc_parser`/`oxc_ast`) and runs the binding analyzer
//! (`analyzer`) over the resulting AST, emitting diagnostics about
//! redeclarations, early (pre-declaration) references, reassignment of
//! immutable bindings, block-scoped declarations outside block context, and
//! optionally unused local assignments.
//!
//! The two modules mirror a production compiler's pipeline boundary: `parser`
//! plays the role of the front-end's parser + scope/symbol builder, and
//! `analyzer` is the binding-analysis pass that would normally consume a
//! scope tree handed to it by another compiler stage.

pub mod analyzer;
pub mod parser;
