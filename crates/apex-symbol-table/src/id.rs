//! Symbol id composition and splitting.
//!
//! The id format is mechanical so consumers can reconstruct a symbol's
//! fully qualified name from its id and vice versa without consulting the
//! table.

/// Composes a semantic symbol id from its parts.
///
/// Format: `<fileUri>:<scopePath segments>:<kind-prefix>:<name>`, with the
/// scope-path section omitted entirely for root-level symbols.
pub fn compose_symbol_id(
    file_uri: &str,
    scope_path: &[String],
    kind_prefix: &str,
    name: &str,
) -> String {
    let mut id = String::with_capacity(
        file_uri.len() + kind_prefix.len() + name.len() + scope_path.iter().map(|s| s.len() + 1).sum::<usize>() + 2,
    );
    id.push_str(file_uri);
    for segment in scope_path {
        id.push(':');
        id.push_str(segment);
    }
    id.push(':');
    id.push_str(kind_prefix);
    id.push(':');
    id.push_str(name);
    id
}

/// Composes a block symbol id off its parent symbol's id.
///
/// Format: `<parentId>:block:<blockName>`, so a method block reads
/// `<methodId>:block:<blockName>` and FQN reconstruction stays mechanical.
pub fn compose_block_id(parent_id: &str, block_name: &str) -> String {
    format!("{}:block:{}", parent_id, block_name)
}

/// Splits a symbol id into its `:`-separated segments.
///
/// The first segment is the file URI only when the URI itself contains no
/// colon; callers that need the URI should prefer
/// [`SymbolTable::get_file_uri`](crate::SymbolTable::get_file_uri) and
/// strip it as a prefix.
pub fn split_symbol_id(id: &str) -> Vec<&str> {
    id.split(':').collect()
}
