//! Symbol definitions with kind-specific payloads.

use apex_position_tracking::Location;
use apex_symbol_types::{Annotation, Modifiers, ScopeType, SymbolKind, TypeInfo};

/// A symbol definition in Apex code.
///
/// Common metadata lives on the struct; kind-specific data lives in
/// [`SymbolDetail`]. Symbols are immutable after collection except for the
/// resolver-owned fields inside `detail` (`TypeInfo::resolved_symbol_id`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    /// Stable id, globally unique within a compilation unit
    pub id: String,
    /// Declared name
    pub name: String,
    /// Classification of the symbol
    pub kind: SymbolKind,
    /// Full extent and name-token ranges
    pub location: Location,
    /// URI of the declaring file
    pub file_uri: String,
    /// Id of the parent symbol; `None` for root-level symbols
    pub parent_id: Option<String>,
    /// Modifier set attached to the declaration
    pub modifiers: Modifiers,
    /// Annotations attached to the declaration
    pub annotations: Vec<Annotation>,
    /// Namespace qualifier, when the unit declares one
    pub namespace: Option<String>,
    /// Ancestor block names used to compose the id
    pub scope_path: Vec<String>,
    /// Kind-specific payload
    pub detail: SymbolDetail,
}

/// Kind-specific symbol payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolDetail {
    /// Payload for Class / Interface / Enum / Trigger symbols
    Type {
        /// `extends` clause type
        super_class: Option<TypeInfo>,
        /// `implements` (or interface `extends`) clause types
        interfaces: Vec<TypeInfo>,
        /// Enum value names, in declaration order; empty for non-enums
        values: Vec<String>,
    },
    /// Payload for Method / Constructor symbols
    Callable {
        /// Ids of the Parameter symbols, in declaration order
        parameters: Vec<String>,
        /// Declared return type; void for constructors
        return_type: TypeInfo,
        /// True for constructors
        is_constructor: bool,
    },
    /// Payload for Field / Property / Parameter / Variable / EnumValue
    VariableLike {
        /// Declared type
        type_info: TypeInfo,
        /// Initializer source text, when one was present
        initial_value: Option<String>,
    },
    /// Payload for synthetic Block symbols
    Scope {
        /// The grammar context this block materializes
        scope_type: ScopeType,
    },
}

impl Symbol {
    /// Returns the scope type for block symbols.
    pub fn scope_type(&self) -> Option<ScopeType> {
        match &self.detail {
            SymbolDetail::Scope { scope_type } => Some(*scope_type),
            _ => None,
        }
    }

    /// Returns the declared type for variable-like symbols.
    pub fn type_info(&self) -> Option<&TypeInfo> {
        match &self.detail {
            SymbolDetail::VariableLike { type_info, .. } => Some(type_info),
            _ => None,
        }
    }

    /// Mutable access to the declared type for variable-like symbols.
    ///
    /// Reserved for the resolver, which records `resolved_symbol_id` on it.
    pub fn type_info_mut(&mut self) -> Option<&mut TypeInfo> {
        match &mut self.detail {
            SymbolDetail::VariableLike { type_info, .. } => Some(type_info),
            _ => None,
        }
    }

    /// Returns the return type for callable symbols.
    pub fn return_type(&self) -> Option<&TypeInfo> {
        match &self.detail {
            SymbolDetail::Callable { return_type, .. } => Some(return_type),
            _ => None,
        }
    }

    /// Returns the parameter symbol ids for callable symbols.
    pub fn parameter_ids(&self) -> &[String] {
        match &self.detail {
            SymbolDetail::Callable { parameters, .. } => parameters,
            _ => &[],
        }
    }

    /// True for constructors.
    pub fn is_constructor(&self) -> bool {
        matches!(&self.detail, SymbolDetail::Callable { is_constructor: true, .. })
    }

    /// Case-insensitive name comparison, matching Apex identifier rules.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}
