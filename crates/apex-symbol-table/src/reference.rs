//! Typed, position-indexed references to names.

use apex_position_tracking::Location;
use apex_symbol_types::{LiteralType, ReferenceAccess, ReferenceContext};

/// A reference to a name at a specific source position.
///
/// The collector emits references with provisional contexts; the resolver
/// may later set `resolved_symbol_id`, upgrade the context, or narrow the
/// contexts of `chain_nodes`. A reference with a non-empty `chain_nodes`
/// list is the outer reference of a dotted expression: it covers the whole
/// chain while each node carries its own name, location, and narrowed
/// context.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolReference {
    /// Referenced name; for chained references, the dotted text
    pub name: String,
    /// Full extent and identifier ranges of the reference
    pub location: Location,
    /// Role of this usage
    pub context: ReferenceContext,
    /// Context of the syntactic parent, when meaningful
    pub parent_context: Option<ReferenceContext>,
    /// Id of the defining symbol, set by the resolver when it binds
    pub resolved_symbol_id: Option<String>,
    /// Literal text for `Literal` references
    pub literal_value: Option<String>,
    /// Literal classification for `Literal` references
    pub literal_type: Option<LiteralType>,
    /// Read/write flavor for value references
    pub access: Option<ReferenceAccess>,
    /// Ordered per-segment references; non-empty only on chained references
    pub chain_nodes: Vec<SymbolReference>,
    /// References collected as call arguments; non-empty only on calls
    pub parameters: Vec<SymbolReference>,
}

impl SymbolReference {
    /// Creates a reference with the given provisional context.
    pub fn new(name: impl Into<String>, location: Location, context: ReferenceContext) -> Self {
        Self {
            name: name.into(),
            location,
            context,
            parent_context: None,
            resolved_symbol_id: None,
            literal_value: None,
            literal_type: None,
            access: None,
            chain_nodes: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Creates a literal reference carrying its parsed value and type tag.
    pub fn literal(
        value: impl Into<String>,
        literal_type: LiteralType,
        location: Location,
    ) -> Self {
        let value = value.into();
        let mut reference = Self::new(value.clone(), location, ReferenceContext::Literal);
        reference.literal_value = Some(value);
        reference.literal_type = Some(literal_type);
        reference
    }

    /// Creates the outer reference of a dotted chain.
    pub fn chained(
        name: impl Into<String>,
        location: Location,
        chain_nodes: Vec<SymbolReference>,
    ) -> Self {
        let mut reference = Self::new(name, location, ReferenceContext::Chained);
        reference.chain_nodes = chain_nodes;
        reference
    }

    /// Sets the read/write flavor.
    pub fn with_access(mut self, access: ReferenceAccess) -> Self {
        self.access = Some(access);
        self
    }

    /// Sets the syntactic parent context.
    pub fn with_parent_context(mut self, parent: ReferenceContext) -> Self {
        self.parent_context = Some(parent);
        self
    }

    /// True for the outer reference of a dotted chain.
    pub fn is_chained(&self) -> bool {
        !self.chain_nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apex_position_tracking::{Location, Range};

    fn loc(start: u32, end: u32) -> Location {
        Location::single(Range::new(1, start, 1, end))
    }

    #[test]
    fn test_literal_reference() {
        let reference = SymbolReference::literal("42", LiteralType::Integer, loc(4, 6));
        assert_eq!(reference.context, ReferenceContext::Literal);
        assert_eq!(reference.literal_value.as_deref(), Some("42"));
        assert_eq!(reference.literal_type, Some(LiteralType::Integer));
        assert!(!reference.is_chained());
    }

    #[test]
    fn test_chained_reference() {
        let base = SymbolReference::new("System", loc(0, 6), ReferenceContext::ChainStep);
        let tail = SymbolReference::new("debug", loc(7, 12), ReferenceContext::MethodCall);
        let chain = SymbolReference::chained("System.debug", loc(0, 12), vec![base, tail]);
        assert!(chain.is_chained());
        assert_eq!(chain.context, ReferenceContext::Chained);
        assert_eq!(chain.chain_nodes.len(), 2);
    }

    #[test]
    fn test_access_builder() {
        let reference = SymbolReference::new("a", loc(0, 1), ReferenceContext::VariableUsage)
            .with_access(ReferenceAccess::Write);
        assert_eq!(reference.access, Some(ReferenceAccess::Write));
    }
}
