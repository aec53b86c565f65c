//! Same-file reference resolution: the second pass.
//!
//! Once traversal completes, the resolver walks the reference list in
//! table order and binds each reference to a symbol in the same
//! compilation unit. Scope hierarchy drives variable lookup, class-scope
//! search drives member lookup, and kind-aware filters drive type lookup.
//! Unresolved references are not an error; the pass never aborts, and
//! running it twice yields the same bindings.

use apex_position_tracking::Range;
use apex_symbol_table::{Symbol, SymbolReference, SymbolTable};
use apex_symbol_types::{ReferenceContext, SymbolKind};
use rustc_hash::FxHashMap;
use tracing::debug;

/// What one reference resolution decided.
#[derive(Debug, Default)]
struct Outcome {
    resolved: Option<String>,
    context: Option<ReferenceContext>,
    /// `(chain node index, resolved id, narrowed context)`
    chain_updates: Vec<(usize, Option<String>, Option<ReferenceContext>)>,
}

/// Resolves every reference in the table against same-file symbols, and
/// links declared types to the symbols they name.
pub fn resolve(table: &mut SymbolTable) {
    link_declared_types(table);

    let count = table.get_all_references().len();
    for index in 0..count {
        // Work on a snapshot so lookups can borrow the whole table; the
        // outcome is applied through the reserved mutable accessors.
        let Some(reference) = table.get_all_references().get(index).cloned() else {
            continue;
        };
        let outcome = resolve_reference(table, &reference);
        apply_outcome(table, index, outcome);
    }

    sync_parameter_snapshots(table);
}

/// Parameter lists hold snapshots of references taken during collection;
/// once the originals are bound, copy the bindings onto the snapshots by
/// matching name and identifier position.
fn sync_parameter_snapshots(table: &mut SymbolTable) {
    let resolved_at: FxHashMap<(String, Range), String> = table
        .get_all_references()
        .iter()
        .filter_map(|r| {
            r.resolved_symbol_id
                .clone()
                .map(|id| ((r.name.to_ascii_lowercase(), r.location.identifier_range), id))
        })
        .collect();
    if resolved_at.is_empty() {
        return;
    }
    let count = table.get_all_references().len();
    for index in 0..count {
        if let Some(reference) = table.get_reference_mut(index) {
            for parameter in &mut reference.parameters {
                fill_snapshot(parameter, &resolved_at);
            }
        }
    }
}

fn fill_snapshot(
    reference: &mut SymbolReference,
    resolved_at: &FxHashMap<(String, Range), String>,
) {
    let key = (reference.name.to_ascii_lowercase(), reference.location.identifier_range);
    if reference.resolved_symbol_id.is_none() {
        if let Some(id) = resolved_at.get(&key) {
            reference.resolved_symbol_id = Some(id.clone());
        }
    }
    for node in &mut reference.chain_nodes {
        let key = (node.name.to_ascii_lowercase(), node.location.identifier_range);
        if node.resolved_symbol_id.is_none() {
            if let Some(id) = resolved_at.get(&key) {
                node.resolved_symbol_id = Some(id.clone());
            }
        }
    }
    for parameter in &mut reference.parameters {
        fill_snapshot(parameter, resolved_at);
    }
}

/// Records `resolved_symbol_id` on the declared type of every
/// variable-like symbol whose type names a same-file class.
fn link_declared_types(table: &mut SymbolTable) {
    let links: Vec<(String, String)> = table
        .get_all_symbols()
        .iter()
        .filter_map(|symbol| {
            let type_info = symbol.type_info()?;
            let target = find_type(table, &type_info.name)?;
            Some((symbol.id.clone(), target.id.clone()))
        })
        .collect();
    for (symbol_id, target_id) in links {
        if let Some(symbol) = table.get_symbol_mut(&symbol_id) {
            if let Some(type_info) = symbol.type_info_mut() {
                type_info.resolved_symbol_id = Some(target_id);
            }
        }
    }
}

fn apply_outcome(table: &mut SymbolTable, index: usize, outcome: Outcome) {
    let Some(reference) = table.get_reference_mut(index) else {
        return;
    };
    if let Some(resolved) = outcome.resolved {
        reference.resolved_symbol_id = Some(resolved);
    }
    if let Some(context) = outcome.context {
        reference.context = context;
    }
    for (node_index, resolved, context) in outcome.chain_updates {
        let Some(node) = reference.chain_nodes.get_mut(node_index) else {
            debug!(node_index, "chain update out of bounds");
            continue;
        };
        if let Some(resolved) = resolved {
            node.resolved_symbol_id = Some(resolved);
        }
        if let Some(context) = context {
            node.context = context;
        }
    }
}

fn resolve_reference(table: &SymbolTable, reference: &SymbolReference) -> Outcome {
    let position = reference.location.identifier_range.start();
    let hierarchy = table.get_scope_hierarchy(position);

    match reference.context {
        ReferenceContext::VariableUsage => resolve_variable_usage(table, reference, &hierarchy),
        ReferenceContext::MethodCall => {
            let resolved = resolve_method_call(table, &reference.name, &hierarchy);
            Outcome { resolved, ..Outcome::default() }
        }
        ReferenceContext::FieldAccess => {
            let resolved = resolve_field_access(table, &reference.name, &hierarchy);
            Outcome { resolved, ..Outcome::default() }
        }
        ReferenceContext::ConstructorCall => {
            let resolved = resolve_constructor_call(table, &reference.name);
            Outcome { resolved, ..Outcome::default() }
        }
        ReferenceContext::TypeDeclaration
        | ReferenceContext::ClassReference
        | ReferenceContext::ParameterType
        | ReferenceContext::ReturnType
        | ReferenceContext::GenericParameterType
        | ReferenceContext::CastTypeReference
        | ReferenceContext::InstanceofTypeReference => {
            let resolved = find_type(table, &reference.name).map(|s| s.id.clone());
            Outcome { resolved, ..Outcome::default() }
        }
        ReferenceContext::VariableDeclaration | ReferenceContext::PropertyReference => {
            let resolved = resolve_declaration_site(table, &reference.name, &hierarchy);
            Outcome { resolved, ..Outcome::default() }
        }
        ReferenceContext::Chained => resolve_chained(table, reference, &hierarchy),
        ReferenceContext::Literal | ReferenceContext::ChainStep => Outcome::default(),
    }
}

/// Variable usage with context correction: a name that is a same-file
/// class or interface is upgraded to a class reference before resolution.
fn resolve_variable_usage(
    table: &SymbolTable,
    reference: &SymbolReference,
    hierarchy: &[String],
) -> Outcome {
    if let Some(class) = table.find_symbol_with(|s| {
        matches!(s.kind, SymbolKind::Class | SymbolKind::Interface) && s.name_matches(&reference.name)
    }) {
        return Outcome {
            resolved: Some(class.id.clone()),
            context: Some(ReferenceContext::ClassReference),
            chain_updates: Vec::new(),
        };
    }
    let resolved = lookup_variable(table, hierarchy, &reference.name)
        .map(|s| s.id.clone())
        .or_else(|| {
            table
                .find_symbol_with(|s| s.kind.is_variable_like() && s.name_matches(&reference.name))
                .map(|s| s.id.clone())
        });
    Outcome { resolved, ..Outcome::default() }
}

/// Innermost-outward search across `{Variable, Parameter, Field}`, with
/// variables and parameters winning over fields within a scope.
fn lookup_variable<'t>(
    table: &'t SymbolTable,
    hierarchy: &[String],
    name: &str,
) -> Option<&'t Symbol> {
    for scope in hierarchy.iter().rev() {
        let members = table.get_symbols_in_scope(scope);
        let candidates: Vec<&Symbol> = members
            .iter()
            .copied()
            .filter(|s| {
                matches!(
                    s.kind,
                    SymbolKind::Variable | SymbolKind::Parameter | SymbolKind::Field
                ) && s.name_matches(name)
            })
            .collect();
        if candidates.is_empty() {
            continue;
        }
        return candidates
            .iter()
            .find(|s| matches!(s.kind, SymbolKind::Variable | SymbolKind::Parameter))
            .or_else(|| candidates.first())
            .copied();
    }
    None
}

fn nearest_class_block<'h>(table: &SymbolTable, hierarchy: &'h [String]) -> Option<&'h str> {
    hierarchy
        .iter()
        .rev()
        .find(|scope| {
            table
                .get_symbol(scope)
                .and_then(Symbol::scope_type)
                .is_some_and(|t| t == apex_symbol_types::ScopeType::Class)
        })
        .map(String::as_str)
}

fn resolve_method_call(
    table: &SymbolTable,
    name: &str,
    hierarchy: &[String],
) -> Option<String> {
    if let Some(class_block) = nearest_class_block(table, hierarchy) {
        let members = table.get_symbols_in_scope(class_block);
        let candidates: Vec<&Symbol> = members
            .iter()
            .copied()
            .filter(|s| s.kind.is_callable() && s.name_matches(name))
            .collect();
        // Overload resolution by parameter types is out of scope: prefer
        // a non-constructor and take the first in declaration order.
        if let Some(found) = candidates
            .iter()
            .find(|s| s.kind == SymbolKind::Method)
            .or_else(|| candidates.first())
        {
            return Some(found.id.clone());
        }
    }
    table
        .find_symbol_with(|s| s.kind == SymbolKind::Method && s.name_matches(name))
        .map(|s| s.id.clone())
}

fn resolve_field_access(
    table: &SymbolTable,
    name: &str,
    hierarchy: &[String],
) -> Option<String> {
    let class_block = nearest_class_block(table, hierarchy)?;
    table
        .get_symbols_in_scope(class_block)
        .iter()
        .find(|s| {
            matches!(s.kind, SymbolKind::Field | SymbolKind::Property) && s.name_matches(name)
        })
        .map(|s| s.id.clone())
}

fn resolve_constructor_call(table: &SymbolTable, name: &str) -> Option<String> {
    let simple = name.rsplit('.').next().unwrap_or(name);
    let class = table.find_symbol_with(|s| s.kind.is_type() && s.name_matches(simple))?;
    find_constructor_of(table, class)
        .or_else(|| {
            table
                .find_symbol_with(|s| {
                    s.kind == SymbolKind::Constructor
                        && s.parent_id.as_deref() == Some(class.id.as_str())
                })
                .map(|s| s.id.clone())
        })
}

fn find_constructor_of(table: &SymbolTable, class: &Symbol) -> Option<String> {
    let block = class_block_of(table, class)?;
    table
        .get_symbols_in_scope(&block)
        .iter()
        .find(|s| s.kind == SymbolKind::Constructor)
        .map(|s| s.id.clone())
}

fn class_block_of(table: &SymbolTable, class: &Symbol) -> Option<String> {
    table
        .get_symbols_in_scope(&class.id)
        .iter()
        .find(|s| s.kind.is_block())
        .map(|s| s.id.clone())
}

fn find_type<'t>(table: &'t SymbolTable, name: &str) -> Option<&'t Symbol> {
    let simple = name.rsplit('.').next().unwrap_or(name);
    table.find_symbol_with(|s| s.kind.is_type() && s.name_matches(simple))
}

/// The symbol declared at the reference's own scope, innermost first.
fn resolve_declaration_site(
    table: &SymbolTable,
    name: &str,
    hierarchy: &[String],
) -> Option<String> {
    for scope in hierarchy.iter().rev() {
        if let Some(found) = table
            .get_symbols_in_scope(scope)
            .iter()
            .find(|s| s.kind.is_variable_like() && s.name_matches(name))
        {
            return Some(found.id.clone());
        }
    }
    None
}

/// Chained resolution: bind the base first, then the tail against the
/// base's class scope.
fn resolve_chained(
    table: &SymbolTable,
    reference: &SymbolReference,
    hierarchy: &[String],
) -> Outcome {
    let nodes = &reference.chain_nodes;
    let mut outcome = Outcome::default();
    let Some(base) = nodes.first() else {
        return outcome;
    };

    if nodes.len() < 2 {
        // Degenerate chain: variable-then-type resolution on the base.
        let resolved = lookup_variable(table, hierarchy, &base.name)
            .map(|s| s.id.clone())
            .or_else(|| find_type(table, &base.name).map(|s| s.id.clone()));
        outcome.chain_updates.push((0, resolved, None));
        return outcome;
    }
    let last = nodes.len() - 1;

    if let Some(variable) = lookup_variable(table, hierarchy, &base.name) {
        outcome.chain_updates.push((0, Some(variable.id.clone()), None));
        let declared = variable.type_info().map(|t| t.name.clone());
        if let Some(class) = declared.as_deref().and_then(|n| find_type(table, n)) {
            if let Some(member) = resolve_member_in_class(table, class, &nodes[last]) {
                outcome.resolved = Some(member.clone());
                outcome.chain_updates.push((last, Some(member), None));
            }
        }
        return outcome;
    }

    if let Some(class) = find_type(table, &base.name) {
        outcome
            .chain_updates
            .push((0, Some(class.id.clone()), Some(ReferenceContext::ClassReference)));
        if let Some(member) = resolve_member_in_class(table, class, &nodes[last]) {
            outcome.resolved = Some(member.clone());
            outcome.chain_updates.push((last, Some(member), None));
        }
    }
    outcome
}

fn resolve_member_in_class(
    table: &SymbolTable,
    class: &Symbol,
    tail: &SymbolReference,
) -> Option<String> {
    let block = class_block_of(table, class)?;
    let members = table.get_symbols_in_scope(&block);
    match tail.context {
        ReferenceContext::MethodCall => {
            let candidates: Vec<&Symbol> = members
                .iter()
                .copied()
                .filter(|s| s.kind.is_callable() && s.name_matches(&tail.name))
                .collect();
            candidates
                .iter()
                .find(|s| s.kind == SymbolKind::Method)
                .or_else(|| candidates.first())
                .map(|s| s.id.clone())
        }
        _ => members
            .iter()
            .find(|s| {
                matches!(s.kind, SymbolKind::Field | SymbolKind::Property)
                    && s.name_matches(&tail.name)
            })
            .map(|s| s.id.clone()),
    }
}
