//! Semantic symbol collection and reference resolution for Apex.
//!
//! This crate is the analysis core of the Apex LS pipeline: it consumes a
//! parsed syntax tree and produces a hierarchical symbol table describing
//! every declaration in a compilation unit, plus typed position-indexed
//! references for every use of a name, each resolvable to a defining
//! symbol.
//!
//! # Pipeline
//!
//! Processing one compilation unit is single-threaded and two-pass:
//!
//! 1. **Collection** ([`collector`]) drives the tree depth-first,
//!    materializing block scopes ([`scope`]), extracting declared types
//!    ([`type_extract`]), folding dotted expressions into chained
//!    references ([`chain`]), and reporting semantic diagnostics
//!    ([`diagnostics`]).
//! 2. **Resolution** ([`resolver`]) binds references to same-file symbols
//!    using the scope hierarchy and kind-aware candidate filters.
//!
//! Separate units may be analyzed in parallel; each table is exclusively
//! owned by its pipeline until handed off.
//!
//! # Usage
//!
//! ```ignore
//! use apex_semantic_analyzer::analyze;
//!
//! let result = analyze(Some(&ast_root), "file:///Example.cls", Some(source));
//! for symbol in result.table.get_all_symbols() {
//!     println!("{} {}", symbol.kind.prefix(), symbol.name);
//! }
//! ```

pub mod chain;
pub mod collector;
pub mod diagnostics;
pub mod resolver;
pub mod scope;
pub mod type_extract;
pub mod validation;

use apex_ast::Node;
use apex_symbol_table::SymbolTable;
use apex_symbol_types::Diagnostic;

pub use collector::{collect, CollectorOutput};
pub use resolver::resolve;
pub use validation::{
    run_validator, TableInvariantValidator, ValidationError, ValidationOptions, ValidationResult,
    Validator,
};

/// The finished analysis of one compilation unit.
#[derive(Debug)]
pub struct CompilationResult {
    /// Symbol table with references resolved where same-file evidence
    /// allowed
    pub table: SymbolTable,
    /// Semantic errors and warnings, in report order
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs collection and same-file resolution over a compilation unit.
///
/// `root` is `None` when the parser produced no root node at all; that
/// fatal case yields an empty table and an empty reference list rather
/// than an error. `source` enables the line-level `void` scan.
pub fn analyze(root: Option<&Node>, file_uri: &str, source: Option<&str>) -> CompilationResult {
    let Some(root) = root else {
        return CompilationResult {
            table: SymbolTable::new(file_uri),
            diagnostics: Vec::new(),
        };
    };
    let CollectorOutput { mut table, diagnostics } = collect(root, file_uri, source);
    resolve(&mut table);
    CompilationResult { table, diagnostics }
}
