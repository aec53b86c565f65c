//! Chained-expression analysis.
//!
//! A dotted expression `a.b.c()` is treated as one semantic unit: the
//! collector opens a chain scope at the outermost dot, accumulates one
//! node per segment while walking, and at chain end emits a single
//! chained reference whose node contexts have been narrowed right to
//! left. The base and intermediate segments stay deliberately ambiguous
//! (`ChainStep`) unless evidence narrows them to a class reference.

use apex_ast::{Node, NodeKind};
use apex_position_tracking::{Location, Range};
use apex_symbol_table::SymbolReference;
use apex_symbol_types::ReferenceContext;

/// The collector's single active chain scope.
#[derive(Debug)]
pub struct ChainScope {
    /// `ChainStep` node for the leftmost identifier, when one exists
    base: Option<SymbolReference>,
    /// Accumulated member segments, left to right
    nodes: Vec<SymbolReference>,
    /// Extent of the whole dotted expression
    range: Range,
}

impl ChainScope {
    /// Opens a chain scope for the outermost dotted expression,
    /// snapshotting the leftmost true identifier as the base expression.
    pub fn open(root: &Node) -> Self {
        let base = extract_base_identifier(root).map(|(name, range)| {
            SymbolReference::new(name, Location::single(range), ReferenceContext::ChainStep)
        });
        Self { base, nodes: Vec::new(), range: root.location }
    }

    /// Appends a member-access segment.
    pub fn push_field(&mut self, name: &str, range: Range) {
        self.nodes.push(SymbolReference::new(
            name,
            Location::single(range),
            ReferenceContext::FieldAccess,
        ));
    }

    /// Appends a dotted-method-call segment.
    pub fn push_method(&mut self, name: &str, range: Range) {
        self.nodes.push(SymbolReference::new(
            name,
            Location::single(range),
            ReferenceContext::MethodCall,
        ));
    }

    /// The base identifier's name and range, when the chain has one.
    pub fn base_identifier(&self) -> Option<(&str, Range)> {
        self.base.as_ref().map(|b| (b.name.as_str(), b.location.identifier_range))
    }

    /// Finalizes the chain: prepends the base node, narrows contexts
    /// right to left, and produces the outer chained reference.
    ///
    /// `narrowing_evidence` reports whether a name is known to denote a
    /// class at this point, from the standard-library oracle or the
    /// lexical scope.
    pub fn finalize(self, narrowing_evidence: impl Fn(&str) -> bool) -> Option<SymbolReference> {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        if let Some(base) = self.base {
            nodes.push(base);
        }
        nodes.extend(self.nodes);
        if nodes.len() < 2 {
            return None;
        }

        narrow_right_to_left(&mut nodes, narrowing_evidence);

        let dotted =
            nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>().join(".");
        let identifier_range = nodes[0].location.identifier_range;
        let symbol_range = self.range.union(identifier_range);
        let location = Location::new(symbol_range, identifier_range);
        Some(SymbolReference::chained(dotted, location, nodes))
    }
}

/// Right-to-left narrowing over the ordered node list.
///
/// The rightmost node keeps its context. Each leftward node next to a
/// `MethodCall` or `FieldAccess` neighbor stays `ChainStep` unless the
/// evidence oracle knows its name, in which case it upgrades to
/// `ClassReference`. Existing `MethodCall` nodes are preserved.
fn narrow_right_to_left(nodes: &mut [SymbolReference], evidence: impl Fn(&str) -> bool) {
    for i in (0..nodes.len().saturating_sub(1)).rev() {
        if nodes[i].context == ReferenceContext::MethodCall {
            continue;
        }
        let right = nodes[i + 1].context;
        if matches!(right, ReferenceContext::MethodCall | ReferenceContext::FieldAccess)
            && evidence(&nodes[i].name)
        {
            nodes[i].context = ReferenceContext::ClassReference;
        }
    }
}

/// Walks the left side of a dotted expression through primaries, dot
/// chains, and array subscripts, and returns the first true identifier.
/// Method-call text is never a base expression.
pub fn extract_base_identifier(node: &Node) -> Option<(String, Range)> {
    match &node.kind {
        NodeKind::Identifier { name } => Some((name.clone(), node.location)),
        NodeKind::DotExpression { object, .. }
        | NodeKind::DotMethodCall { object, .. } => extract_base_identifier(object),
        NodeKind::ArrayAccess { array, .. } => extract_base_identifier(array),
        NodeKind::CastExpression { expression, .. } => extract_base_identifier(expression),
        _ => None,
    }
}

/// True when the leftmost primary of a dotted expression is `this`, which
/// suppresses chain formation in favor of individual member references.
pub fn starts_with_this(node: &Node) -> bool {
    match &node.kind {
        NodeKind::This => true,
        NodeKind::DotExpression { object, .. }
        | NodeKind::DotMethodCall { object, .. } => starts_with_this(object),
        NodeKind::ArrayAccess { array, .. } => starts_with_this(array),
        _ => false,
    }
}
