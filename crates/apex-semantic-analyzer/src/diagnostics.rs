//! Semantic diagnostic codes and source-level validation helpers.
//!
//! The collector reports everything through [`Diagnostic`] records; this
//! module holds the stable codes, the identifier validator, and the
//! line-level `void` scan that backstops the tree-based check when the
//! parser recovered a malformed declaration into something else.

use apex_symbol_types::Diagnostic;
use regex::Regex;
use std::sync::OnceLock;

/// Stable diagnostic codes attached to semantic errors.
pub mod codes {
    /// Two callables share a name and parameter-type signature
    pub const DUPLICATE_METHOD: &str = "DUPLICATE_METHOD";
    /// A variable name is declared twice in one statement
    pub const DUPLICATE_VARIABLE_IN_STATEMENT: &str = "DUPLICATE_VARIABLE_IN_STATEMENT";
    /// A variable name is already declared in the enclosing scope
    pub const DUPLICATE_VARIABLE: &str = "DUPLICATE_VARIABLE";
    /// An enum declares the same value twice
    pub const DUPLICATE_ENUM_VALUE: &str = "DUPLICATE_ENUM_VALUE";
    /// A `when` clause repeats a value already matched
    pub const DUPLICATE_WHEN_VALUE: &str = "DUPLICATE_WHEN_VALUE";
    /// A declaration carries conflicting modifiers
    pub const CONFLICTING_MODIFIERS: &str = "CONFLICTING_MODIFIERS";
    /// A name is not a legal Apex identifier
    pub const INVALID_IDENTIFIER: &str = "INVALID_IDENTIFIER";
    /// A constructor's name does not match its class
    pub const INVALID_CONSTRUCTOR_NAME: &str = "INVALID_CONSTRUCTOR_NAME";
    /// An interface member carries explicit modifiers
    pub const INTERFACE_MODIFIERS: &str = "INTERFACE_MODIFIERS";
    /// A property is declared inside an interface body
    pub const PROPERTY_IN_INTERFACE: &str = "PROPERTY_IN_INTERFACE";
    /// `void` used as a variable, parameter, or property type
    pub const VOID_TYPE: &str = "VOID_TYPE";
    /// `try` with neither `catch` nor `finally`
    pub const TRY_WITHOUT_HANDLER: &str = "TRY_WITHOUT_HANDLER";
    /// `switch` with no `when` clause
    pub const SWITCH_WITHOUT_WHEN: &str = "SWITCH_WITHOUT_WHEN";
    /// `when else` followed by further clauses
    pub const WHEN_ELSE_NOT_LAST: &str = "WHEN_ELSE_NOT_LAST";
    /// A `when` value's type does not match the switch expression
    pub const INCOMPATIBLE_WHEN_VALUE: &str = "INCOMPATIBLE_WHEN_VALUE";
    /// A qualified enum value in a `when` clause
    pub const INVALID_FULLY_QUALIFIED_ENUM: &str = "INVALID_FULLY_QUALIFIED_ENUM";
    /// An inner class shares its outer class's name
    pub const INNER_NAME_MATCHES_OUTER: &str = "INNER_NAME_MATCHES_OUTER";
    /// An inner class declared inside another inner class
    pub const NESTED_INNER_CLASS: &str = "NESTED_INNER_CLASS";
    /// Wrong number of generic arguments for a collection type
    pub const WRONG_TYPE_ARGUMENT_ARITY: &str = "WRONG_TYPE_ARGUMENT_ARITY";
    /// Parameterized type nested deeper than the supported limit
    pub const TYPE_NESTING_TOO_DEEP: &str = "TYPE_NESTING_TOO_DEEP";
}

static IDENTIFIER_RE: OnceLock<Regex> = OnceLock::new();
static VOID_DECL_RE: OnceLock<Regex> = OnceLock::new();

/// Returns true if `name` is a legal Apex identifier: a leading letter
/// followed by letters, digits, or underscores, not ending with an
/// underscore and without consecutive underscores.
pub fn is_valid_identifier(name: &str) -> bool {
    let re = IDENTIFIER_RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // the pattern is a compile-time constant
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap()
    });
    re.is_match(name) && !name.ends_with('_') && !name.contains("__")
}

/// Line-level scan for `void`-typed variable declarations.
///
/// The tree-based check catches declarations the parser understood; this
/// scan additionally catches `void x;` shapes the parser may have
/// recovered into another production. Method declarations (`void x(`)
/// are excluded by the trailing-character class.
pub fn scan_void_declarations(source: &str, file_uri: &str) -> Vec<Diagnostic> {
    let re = VOID_DECL_RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // the pattern is a compile-time constant
        Regex::new(r"(?i)\bvoid\s+[A-Za-z][A-Za-z0-9_]*\s*[;=,]").unwrap()
    });

    let mut diagnostics = Vec::new();
    for (line_index, line) in source.lines().enumerate() {
        if let Some(found) = re.find(line) {
            diagnostics.push(
                Diagnostic::error(
                    "Variables cannot be declared with type 'void'",
                    line_index as u32 + 1,
                    found.start() as u32,
                    file_uri,
                )
                .with_code(codes::VOID_TYPE),
            );
        }
    }
    diagnostics
}
