//! Unified Apex symbol taxonomy for LSP tooling.
//!
//! This crate provides a single, authoritative definition of Apex symbol
//! kinds, scope types, modifiers, reference contexts, and declared-type
//! descriptors used across the semantic analyzer, symbol table, and LSP
//! providers.
//!
//! # Design Goals
//!
//! - **Single source of truth**: All symbol classification flows through this crate
//! - **Apex semantics**: Distinguishes type, callable, and variable-like declarations
//! - **LSP compatibility**: Direct mapping to LSP protocol symbol kinds
//! - **Zero-cost abstractions**: Enum variants are `Copy` types with inline methods

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified Apex symbol classification for LSP tooling.
///
/// # LSP Protocol Mapping
///
/// Each variant maps to an LSP `SymbolKind` number via [`Self::to_lsp_kind()`]:
///
/// | Variant | LSP Kind | Number |
/// |---------|----------|--------|
/// | `Class` | Class | 5 |
/// | `Interface` | Interface | 11 |
/// | `Enum` | Enum | 10 |
/// | `Trigger` | Class | 5 |
/// | `Method` | Method | 6 |
/// | `Constructor` | Constructor | 9 |
/// | `Field` | Field | 8 |
/// | `Property` | Property | 7 |
/// | `Parameter` | Variable | 13 |
/// | `Variable` | Variable | 13 |
/// | `EnumValue` | EnumMember | 22 |
/// | `Block` | Namespace | 3 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Class declaration, including inner classes
    Class,
    /// Interface declaration
    Interface,
    /// Enum declaration
    Enum,
    /// Trigger compilation unit
    Trigger,
    /// Method declaration
    Method,
    /// Constructor declaration
    Constructor,
    /// Class-level field
    Field,
    /// Property with optional get/set accessors
    Property,
    /// Formal parameter of a method or constructor
    Parameter,
    /// Local variable
    Variable,
    /// A value declared inside an enum body
    EnumValue,
    /// Synthetic scope symbol that parents the children of a semantic symbol
    Block,
}

impl SymbolKind {
    /// Convert to LSP-compliant symbol kind number.
    #[inline]
    pub const fn to_lsp_kind(self) -> u32 {
        match self {
            SymbolKind::Class => 5,
            SymbolKind::Interface => 11,
            SymbolKind::Enum => 10,
            SymbolKind::Trigger => 5,
            SymbolKind::Method => 6,
            SymbolKind::Constructor => 9,
            SymbolKind::Field => 8,
            SymbolKind::Property => 7,
            SymbolKind::Parameter => 13,
            SymbolKind::Variable => 13,
            SymbolKind::EnumValue => 22,
            SymbolKind::Block => 3,
        }
    }

    /// Returns the kind prefix used when composing symbol ids.
    #[inline]
    pub const fn prefix(self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
            SymbolKind::Trigger => "trigger",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Field => "field",
            SymbolKind::Property => "property",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Variable => "variable",
            SymbolKind::EnumValue => "enumvalue",
            SymbolKind::Block => "block",
        }
    }

    /// Returns true if this is a type-introducing kind.
    #[inline]
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            SymbolKind::Class | SymbolKind::Interface | SymbolKind::Enum | SymbolKind::Trigger
        )
    }

    /// Returns true if this is a callable kind.
    #[inline]
    pub const fn is_callable(self) -> bool {
        matches!(self, SymbolKind::Method | SymbolKind::Constructor)
    }

    /// Returns true if this kind declares a typed value slot.
    #[inline]
    pub const fn is_variable_like(self) -> bool {
        matches!(
            self,
            SymbolKind::Field
                | SymbolKind::Property
                | SymbolKind::Parameter
                | SymbolKind::Variable
                | SymbolKind::EnumValue
        )
    }

    /// Returns true if this is a synthetic scope symbol.
    #[inline]
    pub const fn is_block(self) -> bool {
        matches!(self, SymbolKind::Block)
    }
}

/// Classification of synthetic block scopes.
///
/// Every scope kind maps 1:1 from a grammar context. Class- and method-kind
/// blocks are special: they are pushed together with the semantic symbol
/// they correspond to, so the block becomes the parent of direct children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeType {
    /// Body of a class, interface, enum, or trigger
    Class,
    /// Body of a method or constructor
    Method,
    /// Generic lexical block
    Block,
    /// `if` branch body
    If,
    /// `while` loop body
    While,
    /// `for` loop body
    For,
    /// `do { } while` body
    DoWhile,
    /// `try` body
    Try,
    /// `catch` clause body
    Catch,
    /// `finally` body
    Finally,
    /// `switch on` statement body
    Switch,
    /// `when` branch body
    When,
    /// `System.runAs` body
    RunAs,
    /// Property `get` accessor body
    Getter,
    /// Property `set` accessor body
    Setter,
}

impl ScopeType {
    /// Returns the lowercase label used in generated block names.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            ScopeType::Class => "class",
            ScopeType::Method => "method",
            ScopeType::Block => "block",
            ScopeType::If => "if",
            ScopeType::While => "while",
            ScopeType::For => "for",
            ScopeType::DoWhile => "doWhile",
            ScopeType::Try => "try",
            ScopeType::Catch => "catch",
            ScopeType::Finally => "finally",
            ScopeType::Switch => "switch",
            ScopeType::When => "when",
            ScopeType::RunAs => "runAs",
            ScopeType::Getter => "getter",
            ScopeType::Setter => "setter",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Declared visibility of a symbol. At most one visibility applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// No explicit visibility keyword
    #[default]
    Default,
    /// `private`
    Private,
    /// `protected`
    Protected,
    /// `public`
    Public,
    /// `global`
    Global,
}

/// Modifier set attached to a symbol.
///
/// The visibility enum makes "at most one visibility" structural; the
/// boolean flags are independent except for the conflicting pairs checked
/// by [`Self::conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Declared visibility
    pub visibility: Visibility,
    /// `static`
    pub is_static: bool,
    /// `final`
    pub is_final: bool,
    /// `abstract`
    pub is_abstract: bool,
    /// `virtual`
    pub is_virtual: bool,
    /// `override`
    pub is_override: bool,
    /// `transient`
    pub is_transient: bool,
    /// `testMethod` keyword or `@isTest` annotation
    pub is_test_method: bool,
    /// `webservice`
    pub is_web_service: bool,
    /// Set on symbols loaded from the standard library
    pub is_built_in: bool,
}

impl Modifiers {
    /// Creates a modifier set with only a visibility.
    #[inline]
    pub fn with_visibility(visibility: Visibility) -> Self {
        Self { visibility, ..Self::default() }
    }

    /// Returns the first conflicting modifier pair, if any.
    ///
    /// `final` + `abstract` is invalid everywhere; `abstract` + `static` is
    /// invalid on callables.
    pub fn conflict(&self, kind: SymbolKind) -> Option<(&'static str, &'static str)> {
        if self.is_final && self.is_abstract {
            return Some(("final", "abstract"));
        }
        if kind.is_callable() && self.is_abstract && self.is_static {
            return Some(("abstract", "static"));
        }
        None
    }
}

/// An annotation attached to a declaration, e.g. `@isTest` or
/// `@AuraEnabled(cacheable=true)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name without the leading `@`
    pub name: String,
    /// Raw `name=value` parameter strings, in source order
    pub parameters: Vec<String>,
}

impl Annotation {
    /// Creates a parameterless annotation.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), parameters: Vec::new() }
    }

    /// Case-insensitive name comparison, matching Apex identifier rules.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Structured description of a declared type.
///
/// Collection types carry explicit type parameters (one for `List`/`Set`,
/// two for `Map`); array syntax canonicalizes to `List`. The
/// `type_reference_id` threads back to the reference that introduced the
/// type name so consumers can jump from a symbol's type to the exact source
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Canonical type name (`List`, `Map`, `MyClass`, `ns.Type`)
    pub name: String,
    /// The type exactly as written in source
    pub original_type_string: String,
    /// True for standard-library types
    pub is_built_in: bool,
    /// Ordered generic arguments
    pub type_parameters: Vec<TypeInfo>,
    /// Id of the symbol this type resolved to, set by the resolver
    pub resolved_symbol_id: Option<String>,
    /// Index of the type-declaration reference that introduced this name
    pub type_reference_id: Option<usize>,
}

impl TypeInfo {
    /// Creates a simple named type.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            original_type_string: name.clone(),
            name,
            is_built_in: false,
            type_parameters: Vec::new(),
            resolved_symbol_id: None,
            type_reference_id: None,
        }
    }

    /// The `void` pseudo-type used for constructors and void methods.
    pub fn void() -> Self {
        let mut info = Self::named("void");
        info.is_built_in = true;
        info
    }

    /// Returns true if this is the `void` pseudo-type.
    pub fn is_void(&self) -> bool {
        self.name.eq_ignore_ascii_case("void")
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.type_parameters.is_empty() {
            f.write_str("<")?;
            for (i, param) in self.type_parameters.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", param)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// The role a name usage plays at its reference site.
///
/// The collector emits provisional contexts; the chain analyzer and
/// resolver may narrow `ChainStep` or upgrade `VariableUsage` to
/// `ClassReference` when evidence warrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceContext {
    /// Call of a method by name
    MethodCall,
    /// Access of a field or property member
    FieldAccess,
    /// Read or write of a variable-like symbol
    VariableUsage,
    /// `new TypeName(...)`
    ConstructorCall,
    /// The type name of a declaration site
    TypeDeclaration,
    /// A parameter's declared type
    ParameterType,
    /// A method's declared return type
    ReturnType,
    /// A generic argument inside `<...>`
    GenericParameterType,
    /// The target type of a cast expression
    CastTypeReference,
    /// The right operand of `instanceof`
    InstanceofTypeReference,
    /// A class name used as a value, including `TypeName.class`
    ClassReference,
    /// The name token of a variable declarator
    VariableDeclaration,
    /// The name token of a property declaration
    PropertyReference,
    /// A literal value
    Literal,
    /// Ambiguous intermediate segment of a dotted chain
    ChainStep,
    /// The outer reference covering a whole dotted expression
    Chained,
}

impl ReferenceContext {
    /// Returns true for contexts that name a type rather than a value.
    #[inline]
    pub const fn is_type_context(self) -> bool {
        matches!(
            self,
            ReferenceContext::TypeDeclaration
                | ReferenceContext::ParameterType
                | ReferenceContext::ReturnType
                | ReferenceContext::GenericParameterType
                | ReferenceContext::CastTypeReference
                | ReferenceContext::InstanceofTypeReference
                | ReferenceContext::ClassReference
        )
    }
}

/// Tag for literal references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralType {
    /// 32-bit integer literal
    Integer,
    /// `L`-suffixed long literal
    Long,
    /// Decimal literal
    Decimal,
    /// Single-quoted string literal
    String,
    /// `true` / `false`
    Boolean,
    /// `null`
    Null,
}

/// Whether a reference reads, writes, or both reads and writes its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceAccess {
    /// Value is read
    Read,
    /// Value is overwritten (`x = e`)
    Write,
    /// Value is read then written (`x += e`)
    ReadWrite,
}

/// Severity of a reported diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// A semantic rule violation
    Error,
    /// A recoverable anomaly
    Warning,
}

/// A semantic diagnostic anchored to a source position.
///
/// `line` is 1-based and `column` is 0-based, matching the location model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error or warning
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
    /// 1-based source line
    pub line: u32,
    /// 0-based source column
    pub column: u32,
    /// URI of the file the diagnostic belongs to
    pub file_uri: String,
    /// Stable machine-readable code, when one exists
    pub code: Option<String>,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>, line: u32, column: u32, file_uri: &str) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line,
            column,
            file_uri: file_uri.to_string(),
            code: None,
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>, line: u32, column: u32, file_uri: &str) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line,
            column,
            file_uri: file_uri.to_string(),
            code: None,
        }
    }

    /// Attaches a stable diagnostic code.
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }
}
