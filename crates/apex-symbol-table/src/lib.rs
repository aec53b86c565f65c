//! Symbol table and scope management for Apex LSP.
//!
//! This crate provides the core data structures for tracking Apex symbols,
//! references, and scopes for IDE features like go-to-definition,
//! find-all-references, and semantic highlighting.
//!
//! # Core Types
//!
//! - [`Symbol`] - A symbol definition with kind-specific payload
//! - [`SymbolReference`] - A typed, position-indexed use of a name
//! - [`SymbolTable`] - Owning store keyed by symbol id with a scope tree
//!
//! # Identifier format
//!
//! Symbol ids compose mechanically from the file URI, the chain of
//! enclosing block names, a kind prefix, and the symbol name:
//! `<fileUri>:<scopePath segments>:<kind-prefix>:<name>`. Block symbols
//! compose off their parent symbol: `<parentId>:block:<blockName>`. Ids
//! are stable across re-runs of the same input; see [`id`] for the
//! compose/split helpers.

mod id;
mod reference;
mod symbol;
mod table;

pub use id::{compose_block_id, compose_symbol_id, split_symbol_id};
pub use reference::SymbolReference;
pub use symbol::{Symbol, SymbolDetail};
pub use table::{DetailLevel, SymbolTable, SymbolTableError};

// Re-export the taxonomy and location types for convenience
pub use apex_position_tracking::{Location, Position, Range};
pub use apex_symbol_types::{
    Annotation, LiteralType, Modifiers, ReferenceAccess, ReferenceContext, ScopeType, SymbolKind,
    TypeInfo, Visibility,
};
