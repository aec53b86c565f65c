//! Declared-type extraction.
//!
//! Converts `TypeRef` nodes into structured [`TypeInfo`] values: qualified
//! names join with dots, the collection keywords canonicalize to
//! `List`/`Set`/`Map` with recursive generic arguments, and trailing
//! bracket pairs canonicalize to nested `List`s. The collector pairs this
//! with reference emission and the declaration→reference side table that
//! threads `type_reference_id` onto variable symbols.

use apex_ast::{Node, NodeKind};
use apex_position_tracking::Range;
use apex_symbol_types::TypeInfo;

use crate::diagnostics::codes;

/// Deepest supported nesting of parameterized types.
pub const MAX_TYPE_NESTING_DEPTH: usize = 5;

/// A problem found while checking a parameterized type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeIssue {
    /// Stable diagnostic code
    pub code: &'static str,
    /// Human-readable description
    pub message: String,
    /// Source range the issue anchors to
    pub range: Range,
}

/// Extracts a structured type from a `TypeRef` node.
///
/// Returns `None` for non-type nodes, which the collector logs as a
/// parse-tree anomaly.
pub fn extract_type_info(node: &Node) -> Option<TypeInfo> {
    let NodeKind::TypeRef { names, type_arguments, array_dimensions } = &node.kind else {
        return None;
    };
    if names.is_empty() {
        return None;
    }

    let joined = names.iter().map(|n| n.text.as_str()).collect::<Vec<_>>().join(".");
    let original = type_source_string(node);

    let mut info = if let Some(canonical) = apex_builtins::canonical_collection_name(&joined) {
        let mut info = TypeInfo::named(canonical);
        info.is_built_in = true;
        info.type_parameters = type_arguments.iter().filter_map(extract_type_info).collect();
        info
    } else {
        let mut info = TypeInfo::named(joined.clone());
        info.is_built_in = apex_builtins::is_builtin_type(&joined);
        info.type_parameters = type_arguments.iter().filter_map(extract_type_info).collect();
        info
    };
    info.original_type_string = original;

    // `String[]` is `List<String>`; each bracket pair adds one wrapper.
    for _ in 0..*array_dimensions {
        let element = info;
        let original = element.original_type_string.clone();
        let mut list = TypeInfo::named("List");
        list.is_built_in = true;
        list.type_parameters = vec![element];
        list.original_type_string = original;
        info = list;
    }
    Some(info)
}

/// Reconstructs the type as written in source, brackets included.
pub fn type_source_string(node: &Node) -> String {
    let NodeKind::TypeRef { names, type_arguments, array_dimensions } = &node.kind else {
        return String::new();
    };
    let mut out = names.iter().map(|n| n.text.as_str()).collect::<Vec<_>>().join(".");
    if !type_arguments.is_empty() {
        out.push('<');
        for (i, arg) in type_arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&type_source_string(arg));
        }
        out.push('>');
    }
    for _ in 0..*array_dimensions {
        out.push_str("[]");
    }
    out
}

/// Returns the range covering the dotted name segments of a `TypeRef`,
/// which is where type references anchor.
pub fn type_name_range(node: &Node) -> Range {
    if let NodeKind::TypeRef { names, .. } = &node.kind {
        if let (Some(first), Some(last)) = (names.first(), names.last()) {
            return first.range.union(last.range);
        }
    }
    node.location
}

/// Checks collection arity and parameterized-type nesting depth.
pub fn collect_type_issues(node: &Node) -> Vec<TypeIssue> {
    let mut issues = Vec::new();
    check_node(node, 1, &mut issues);
    issues
}

fn check_node(node: &Node, depth: usize, issues: &mut Vec<TypeIssue>) {
    let NodeKind::TypeRef { names, type_arguments, .. } = &node.kind else {
        return;
    };
    let joined = names.iter().map(|n| n.text.as_str()).collect::<Vec<_>>().join(".");

    if !type_arguments.is_empty() && depth > MAX_TYPE_NESTING_DEPTH {
        issues.push(TypeIssue {
            code: codes::TYPE_NESTING_TOO_DEEP,
            message: format!(
                "Parameterized type '{}' exceeds the maximum nesting depth of {}",
                joined, MAX_TYPE_NESTING_DEPTH
            ),
            range: type_name_range(node),
        });
        return;
    }

    if let Some(canonical) = apex_builtins::canonical_collection_name(&joined) {
        let expected = if canonical == "Map" { 2 } else { 1 };
        if !type_arguments.is_empty() && type_arguments.len() != expected {
            issues.push(TypeIssue {
                code: codes::WRONG_TYPE_ARGUMENT_ARITY,
                message: format!(
                    "'{}' takes {} type argument{}, found {}",
                    canonical,
                    expected,
                    if expected == 1 { "" } else { "s" },
                    type_arguments.len()
                ),
                range: type_name_range(node),
            });
        }
    }

    for arg in type_arguments {
        check_node(arg, depth + 1, issues);
    }
}
