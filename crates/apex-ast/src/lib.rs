//! Abstract syntax tree contract consumed by the Apex semantic analyzer.
//!
//! An external parser produces this tree; the semantic analyzer only reads
//! it. Each node pairs a [`NodeKind`] with the [`Range`] of the source text
//! it covers, and name tokens carry their own ranges via [`Identifier`] so
//! symbol locations can distinguish the full declaration extent from the
//! name itself.
//!
//! Traversal uses the listener protocol in [`walk`]: depth-first, with an
//! enter/exit pair per node and listener-controlled descent.

mod ast;
mod walker;

pub use ast::{
    AccessorKind, Annotation, Identifier, LiteralKind, Modifier, Node, NodeKind,
};
pub use walker::{walk, AstListener};

pub use apex_position_tracking::{Location, Position, Range};
