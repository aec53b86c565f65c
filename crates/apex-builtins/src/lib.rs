//! Builtin type-name metadata for Apex semantic tooling.
//!
//! This crate is the read-only oracle the semantic analyzer consults to
//! decide whether a bare name denotes a standard-library class: it drives
//! chain-node narrowing (`System.debug` → `System` is a class reference)
//! and the `is_built_in` flag on extracted types.
//!
//! The core table is static; hosts that load additional standard-library
//! namespaces may extend it once at startup via [`register_extra_types`].
//! After initialization the oracle never changes, so lookups need no
//! synchronization beyond the one-time cell.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Standard Apex system types and namespaces, keyed by lowercase name.
///
/// Covers the `System` namespace types an analyzer meets in almost every
/// compilation unit plus the primitive and collection type names.
static SYSTEM_TYPES: phf::Set<&'static str> = phf::phf_set! {
    // Primitives
    "blob", "boolean", "date", "datetime", "decimal", "double", "id",
    "integer", "long", "object", "string", "time",
    // Collections
    "list", "set", "map", "iterator", "iterable",
    // System namespace classes
    "system", "database", "test", "schema", "userinfo", "limits", "math",
    "json", "jsonparser", "jsongenerator", "crypto", "encodingutil",
    "exception", "dmlexception", "queryexception", "nullpointerexception",
    "listexception", "mathexception", "stringexception", "typeexception",
    "assertexception", "sobject", "sobjecttype", "sobjectfield",
    "apexpages", "pagereference", "messaging", "http", "httprequest",
    "httpresponse", "restcontext", "restrequest", "restresponse",
    "url", "blobvalue", "version", "type", "trigger", "queueable",
    "batchable", "schedulable", "comparable", "savepoint", "approval",
    "matcher", "pattern", "site", "network", "label", "page", "component",
};

static EXTRA_TYPES: OnceLock<HashSet<String>> = OnceLock::new();

/// Registers additional builtin type names, once.
///
/// Intended for hosts that load vendor or org-specific standard-library
/// symbol tables at startup. Returns `false` if the extension set was
/// already installed; the first registration wins and later calls leave
/// the oracle untouched.
pub fn register_extra_types<I, S>(names: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set: HashSet<String> =
        names.into_iter().map(|n| n.as_ref().to_ascii_lowercase()).collect();
    EXTRA_TYPES.set(set).is_ok()
}

/// Returns true if `name` denotes a standard-library type or namespace.
///
/// Comparison is case-insensitive, matching Apex identifier semantics.
pub fn is_builtin_type(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if SYSTEM_TYPES.contains(lower.as_str()) {
        return true;
    }
    EXTRA_TYPES.get().is_some_and(|extra| extra.contains(&lower))
}

/// Returns true if `name` is one of the collection type keywords
/// (`List`, `Set`, `Map`) that take generic arguments.
pub fn is_collection_type(name: &str) -> bool {
    name.eq_ignore_ascii_case("list")
        || name.eq_ignore_ascii_case("set")
        || name.eq_ignore_ascii_case("map")
}

/// Returns the canonical spelling for a collection keyword, or `None`
/// for non-collection names.
pub fn canonical_collection_name(name: &str) -> Option<&'static str> {
    if name.eq_ignore_ascii_case("list") {
        Some("List")
    } else if name.eq_ignore_ascii_case("set") {
        Some("Set")
    } else if name.eq_ignore_ascii_case("map") {
        Some("Map")
    } else {
        None
    }
}
