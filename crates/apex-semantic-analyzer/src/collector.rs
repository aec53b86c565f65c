//! Symbol collection: the first pass over a compilation unit.
//!
//! The collector drives the AST depth-first, producing symbols for every
//! declaration and provisional references for every name usage. It owns
//! two disjoint stacks: the scope stack of synthetic block symbols (see
//! [`crate::scope`]) and the method-call parameter stack that
//! hierarchically tracks nested calls. Dotted expressions route through
//! the chain analyzer (see [`crate::chain`]).

use apex_ast::{walk, AstListener, Identifier, LiteralKind, Node, NodeKind};
use apex_position_tracking::{Location, Range};
use apex_symbol_table::{
    compose_symbol_id, Symbol, SymbolDetail, SymbolReference, SymbolTable,
};
use apex_symbol_types::{
    Annotation, Diagnostic, LiteralType, Modifiers, ReferenceAccess, ReferenceContext, ScopeType,
    SymbolKind, TypeInfo, Visibility,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::chain::{self, ChainScope};
use crate::diagnostics::{codes, is_valid_identifier, scan_void_declarations};
use crate::scope::ScopeStack;
use crate::type_extract::{
    collect_type_issues, extract_type_info, type_name_range, type_source_string,
};

/// Everything the collector produces for one compilation unit.
#[derive(Debug)]
pub struct CollectorOutput {
    /// The populated symbol table
    pub table: SymbolTable,
    /// Semantic errors and warnings, in report order
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs symbol collection over a parsed compilation unit.
///
/// `source` enables the line-level `void` scan; passing `None` skips it.
pub fn collect(root: &Node, file_uri: &str, source: Option<&str>) -> CollectorOutput {
    let mut collector = SymbolCollector::new(file_uri, source);
    walk(root, &mut collector);
    collector.finish()
}

/// One entry on the method-call parameter stack.
#[derive(Debug)]
struct CallFrame {
    /// Index of the call's reference in the table; `None` for calls that
    /// sit mid-chain and have no reference of their own
    ref_index: Option<usize>,
    /// References collected while processing this call's arguments
    parameters: Vec<SymbolReference>,
}

/// The enclosing type declaration being collected.
#[derive(Debug)]
struct TypeContext {
    name: String,
    symbol_id: String,
    is_interface: bool,
}

pub(crate) struct SymbolCollector<'a> {
    file_uri: String,
    source: Option<&'a str>,
    table: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    scopes: ScopeStack,
    calls: Vec<CallFrame>,
    args_depth: usize,
    type_stack: Vec<TypeContext>,
    /// Ranges already carrying an access-flavored reference for the
    /// current assignment target
    lhs_written: Vec<Range>,
    /// Local-variable declaration node -> emitted type-declaration
    /// reference, cleared at end of unit
    type_link: FxHashMap<Range, usize>,
    /// Dedup key for generic-argument references
    generic_seen: FxHashSet<(String, Range, ReferenceContext)>,
    /// Per-callable dedup for parameter/return type references
    signature_type_seen: FxHashSet<(String, ReferenceContext)>,
    /// Duplicate-callable detection: (scope, name, signature)
    callable_signatures: FxHashSet<(String, String, String)>,
}

impl<'a> SymbolCollector<'a> {
    fn new(file_uri: &str, source: Option<&'a str>) -> Self {
        Self {
            file_uri: file_uri.to_string(),
            source,
            table: SymbolTable::new(file_uri),
            diagnostics: Vec::new(),
            scopes: ScopeStack::new(),
            calls: Vec::new(),
            args_depth: 0,
            type_stack: Vec::new(),
            lhs_written: Vec::new(),
            type_link: FxHashMap::default(),
            generic_seen: FxHashSet::default(),
            signature_type_seen: FxHashSet::default(),
            callable_signatures: FxHashSet::default(),
        }
    }

    fn finish(mut self) -> CollectorOutput {
        if !self.calls.is_empty() {
            warn!(depth = self.calls.len(), "method-call stack not empty at end of unit");
            self.calls.clear();
        }
        self.type_link.clear();
        if let Some(source) = self.source {
            self.diagnostics.extend(scan_void_declarations(source, &self.file_uri));
        }
        CollectorOutput { table: self.table, diagnostics: self.diagnostics }
    }

    // ---------------------------------------------------------------------
    // Diagnostics and reference plumbing
    // ---------------------------------------------------------------------

    fn error(&mut self, message: impl Into<String>, range: Range, code: &'static str) {
        self.diagnostics.push(
            Diagnostic::error(message, range.start_line, range.start_column, &self.file_uri)
                .with_code(code),
        );
    }

    /// Appends a reference to the table.
    ///
    /// Read-flavored value references at positions that already carry an
    /// access-flavored reference for the current assignment target are
    /// suppressed, so every location keeps exactly one such reference.
    /// When `collect` is set and an argument list is open, a snapshot is
    /// appended to the innermost call's parameter list.
    fn emit_reference(&mut self, reference: SymbolReference, collect: bool) -> Option<usize> {
        if matches!(
            reference.context,
            ReferenceContext::VariableUsage | ReferenceContext::FieldAccess
        ) && !matches!(
            reference.access,
            Some(ReferenceAccess::Write) | Some(ReferenceAccess::ReadWrite)
        ) && self
            .lhs_written
            .iter()
            .any(|range| *range == reference.location.identifier_range)
        {
            return None;
        }

        let index = self.table.add_type_reference(reference);
        if collect && self.args_depth > 0 {
            if let Some(frame) = self.calls.last_mut() {
                frame.parameters.push(self.table.get_all_references()[index].clone());
            }
        }
        Some(index)
    }

    fn emit_variable_usage(&mut self, name: &str, range: Range, access: ReferenceAccess) {
        let reference =
            SymbolReference::new(name, Location::single(range), ReferenceContext::VariableUsage)
                .with_access(access);
        self.emit_reference(reference, true);
        if matches!(access, ReferenceAccess::Write | ReferenceAccess::ReadWrite) {
            self.lhs_written.push(range);
        }
    }

    fn emit_literal(&mut self, node: &Node, kind: LiteralKind, value: &str) {
        let literal_type = match kind {
            LiteralKind::Integer => LiteralType::Integer,
            LiteralKind::Long => LiteralType::Long,
            LiteralKind::Decimal => LiteralType::Decimal,
            LiteralKind::Str => LiteralType::String,
            LiteralKind::Boolean => LiteralType::Boolean,
            LiteralKind::Null => LiteralType::Null,
        };
        let reference =
            SymbolReference::literal(value, literal_type, Location::single(node.location));
        self.emit_reference(reference, true);
    }

    /// Extracts a declared type, reports its structural issues, and emits
    /// the corresponding reference plus generic-argument references.
    ///
    /// Returns the extracted type and the index of the emitted reference.
    /// `void` produces no reference; repeated parameter/return types at
    /// the same `(name, context)` within one signature are deduplicated.
    fn extract_and_reference_type(
        &mut self,
        node: &Node,
        context: ReferenceContext,
    ) -> Option<(TypeInfo, Option<usize>)> {
        for issue in collect_type_issues(node) {
            self.error(issue.message, issue.range, issue.code);
        }
        let Some(info) = extract_type_info(node) else {
            warn!(location = %node.location, "expected a type reference");
            return None;
        };
        if info.is_void() {
            return Some((info, None));
        }

        let mut skip = false;
        if matches!(context, ReferenceContext::ParameterType | ReferenceContext::ReturnType) {
            let key = (info.name.to_ascii_lowercase(), context);
            skip = !self.signature_type_seen.insert(key);
        }

        let mut index = None;
        if !skip {
            let name_range = type_name_range(node);
            let reference = SymbolReference::new(
                &info.name,
                Location::new(node.location.union(name_range), name_range),
                context,
            );
            index = self.emit_reference(reference, false);
        }
        self.emit_generic_argument_refs(node, context);
        Some((info, index))
    }

    /// Emits `GenericParameterType` references for every type argument,
    /// recursively, deduplicated by `(name, location, parent context)`.
    fn emit_generic_argument_refs(&mut self, node: &Node, parent_context: ReferenceContext) {
        let NodeKind::TypeRef { type_arguments, .. } = &node.kind else {
            return;
        };
        for argument in type_arguments {
            if let NodeKind::TypeRef { names, .. } = &argument.kind {
                if !names.is_empty() {
                    let joined =
                        names.iter().map(|n| n.text.as_str()).collect::<Vec<_>>().join(".");
                    let range = type_name_range(argument);
                    let key = (joined.to_ascii_lowercase(), range, parent_context);
                    if self.generic_seen.insert(key) {
                        let reference = SymbolReference::new(
                            joined,
                            Location::single(range),
                            ReferenceContext::GenericParameterType,
                        )
                        .with_parent_context(parent_context);
                        self.emit_reference(reference, false);
                    }
                }
            }
            self.emit_generic_argument_refs(argument, parent_context);
        }
    }

    // ---------------------------------------------------------------------
    // Symbol plumbing
    // ---------------------------------------------------------------------

    /// Composes an id, disambiguating duplicates with an ordinal suffix so
    /// collection can continue past duplicate declarations.
    fn unique_symbol_id(&self, scope_path: &[String], kind: SymbolKind, name: &str) -> String {
        let base = compose_symbol_id(&self.file_uri, scope_path, kind.prefix(), name);
        if self.table.get_symbol(&base).is_none() {
            return base;
        }
        let mut ordinal = 2;
        loop {
            let candidate = format!("{}~{}", base, ordinal);
            if self.table.get_symbol(&candidate).is_none() {
                return candidate;
            }
            ordinal += 1;
        }
    }

    fn add_symbol_checked(&mut self, symbol: Symbol) {
        if let Err(err) = self.table.add_symbol(symbol) {
            warn!(error = %err, "failed to add symbol");
        }
    }

    fn new_symbol(
        &self,
        kind: SymbolKind,
        name: &str,
        location: Location,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        detail: SymbolDetail,
    ) -> Symbol {
        let parent_id = self.scopes.current_block_id().map(str::to_string);
        let scope_path = self.table.get_current_scope_path(parent_id.as_deref());
        let id = self.unique_symbol_id(&scope_path, kind, name);
        Symbol {
            id,
            name: name.to_string(),
            kind,
            location,
            file_uri: self.file_uri.clone(),
            parent_id,
            modifiers,
            annotations,
            namespace: None,
            scope_path,
            detail,
        }
    }

    fn with_scope(
        &mut self,
        scope_type: ScopeType,
        range: Range,
        semantic_name: Option<&str>,
        f: impl FnOnce(&mut Self),
    ) {
        self.scopes.enter_scope(
            &mut self.table,
            scope_type,
            Location::single(range),
            semantic_name,
        );
        f(self);
        self.scopes.exit_scope(scope_type);
    }

    fn walk_statements(&mut self, statements: &[Node]) {
        for statement in statements {
            walk(statement, self);
        }
    }

    /// Walks a body node without opening an extra scope for its braces;
    /// the caller's scope is the body scope.
    fn walk_body(&mut self, node: &Node) {
        if let NodeKind::Block { statements } = &node.kind {
            self.walk_statements(statements);
        } else {
            walk(node, self);
        }
    }

    // ---------------------------------------------------------------------
    // Modifier and identifier validation
    // ---------------------------------------------------------------------

    fn validate_identifier(&mut self, identifier: &Identifier) {
        if !is_valid_identifier(&identifier.text) {
            self.error(
                format!("Invalid identifier: '{}'", identifier.text),
                identifier.range,
                codes::INVALID_IDENTIFIER,
            );
        }
    }

    fn convert_modifiers(
        &mut self,
        modifiers: &[apex_ast::Modifier],
        annotations: &[apex_ast::Annotation],
        kind: SymbolKind,
        name_range: Range,
    ) -> (Modifiers, Vec<Annotation>) {
        let mut mods = Modifiers::default();
        for modifier in modifiers {
            let lowered = modifier.text.to_ascii_lowercase();
            let visibility = match lowered.as_str() {
                "public" => Some(Visibility::Public),
                "private" => Some(Visibility::Private),
                "protected" => Some(Visibility::Protected),
                "global" => Some(Visibility::Global),
                _ => None,
            };
            if let Some(visibility) = visibility {
                if mods.visibility != Visibility::Default && mods.visibility != visibility {
                    self.error(
                        "Only one visibility modifier is allowed",
                        modifier.range,
                        codes::CONFLICTING_MODIFIERS,
                    );
                }
                mods.visibility = visibility;
                continue;
            }
            match lowered.as_str() {
                "static" => mods.is_static = true,
                "final" => mods.is_final = true,
                "abstract" => mods.is_abstract = true,
                "virtual" => mods.is_virtual = true,
                "override" => mods.is_override = true,
                "transient" => mods.is_transient = true,
                "testmethod" => mods.is_test_method = true,
                "webservice" => mods.is_web_service = true,
                other => debug!(modifier = other, "ignoring unknown modifier"),
            }
        }

        let annotations: Vec<Annotation> = annotations
            .iter()
            .map(|a| Annotation { name: a.name.clone(), parameters: a.parameters.clone() })
            .collect();
        if annotations.iter().any(|a| a.is("isTest")) {
            mods.is_test_method = true;
        }

        if let Some((first, second)) = mods.conflict(kind) {
            self.error(
                format!("Modifiers '{}' and '{}' cannot be combined", first, second),
                name_range,
                codes::CONFLICTING_MODIFIERS,
            );
        }
        (mods, annotations)
    }

    // ---------------------------------------------------------------------
    // Type declarations
    // ---------------------------------------------------------------------

    fn check_inner_class_rules(&mut self, name: &Identifier) {
        let Some(outer) = self.type_stack.last() else {
            return;
        };
        let outer_name_matches = outer.name.eq_ignore_ascii_case(&name.text);
        let outer_symbol_id = outer.symbol_id.clone();
        if outer_name_matches {
            self.error(
                format!("Inner class '{}' cannot share its outer class's name", name.text),
                name.range,
                codes::INNER_NAME_MATCHES_OUTER,
            );
        }
        if self.type_nesting_depth(&outer_symbol_id) >= 2 {
            self.error(
                format!("Inner class '{}' cannot be declared inside another inner class", name.text),
                name.range,
                codes::NESTED_INNER_CLASS,
            );
        }
    }

    /// Counts enclosing type symbols by walking the parent chain, with a
    /// visited set guarding against cycles introduced by upstream errors.
    fn type_nesting_depth(&self, from_id: &str) -> usize {
        let mut depth = 0;
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut current = Some(from_id);
        while let Some(id) = current {
            if !visited.insert(id) {
                warn!(symbol = id, "cycle in symbol parent chain");
                break;
            }
            let Some(symbol) = self.table.get_symbol(id) else { break };
            if symbol.kind.is_type() {
                depth += 1;
            }
            current = symbol.parent_id.as_deref();
        }
        depth
    }

    fn handle_class(&mut self, node: &Node) {
        let NodeKind::ClassDeclaration {
            name,
            modifiers,
            annotations,
            super_class,
            interfaces,
            body,
        } = &node.kind
        else {
            return;
        };
        self.validate_identifier(name);
        self.check_inner_class_rules(name);
        let (mods, annotations) =
            self.convert_modifiers(modifiers, annotations, SymbolKind::Class, name.range);

        let super_info = super_class.as_deref().and_then(|sc| {
            self.extract_and_reference_type(sc, ReferenceContext::TypeDeclaration)
                .map(|(info, _)| info)
        });
        let interface_infos: Vec<TypeInfo> = interfaces
            .iter()
            .filter_map(|i| {
                self.extract_and_reference_type(i, ReferenceContext::TypeDeclaration)
                    .map(|(info, _)| info)
            })
            .collect();

        let symbol = self.new_symbol(
            SymbolKind::Class,
            &name.text,
            Location::new(node.location, name.range),
            mods,
            annotations,
            SymbolDetail::Type {
                super_class: super_info,
                interfaces: interface_infos,
                values: Vec::new(),
            },
        );
        let symbol_id = symbol.id.clone();
        self.add_symbol_checked(symbol);

        self.type_stack.push(TypeContext {
            name: name.text.clone(),
            symbol_id,
            is_interface: false,
        });
        self.with_scope(ScopeType::Class, node.location, Some(&name.text), |c| {
            for member in body {
                walk(member, c);
            }
        });
        self.type_stack.pop();
    }

    fn handle_interface(&mut self, node: &Node) {
        let NodeKind::InterfaceDeclaration { name, modifiers, annotations, extends, body } =
            &node.kind
        else {
            return;
        };
        self.validate_identifier(name);
        self.check_inner_class_rules(name);
        let (mods, annotations) =
            self.convert_modifiers(modifiers, annotations, SymbolKind::Interface, name.range);

        let extend_infos: Vec<TypeInfo> = extends
            .iter()
            .filter_map(|e| {
                self.extract_and_reference_type(e, ReferenceContext::TypeDeclaration)
                    .map(|(info, _)| info)
            })
            .collect();

        let symbol = self.new_symbol(
            SymbolKind::Interface,
            &name.text,
            Location::new(node.location, name.range),
            mods,
            annotations,
            SymbolDetail::Type {
                super_class: None,
                interfaces: extend_infos,
                values: Vec::new(),
            },
        );
        let symbol_id = symbol.id.clone();
        self.add_symbol_checked(symbol);

        self.type_stack.push(TypeContext {
            name: name.text.clone(),
            symbol_id,
            is_interface: true,
        });
        self.with_scope(ScopeType::Class, node.location, Some(&name.text), |c| {
            for member in body {
                walk(member, c);
            }
        });
        self.type_stack.pop();
    }

    fn handle_enum(&mut self, node: &Node) {
        let NodeKind::EnumDeclaration { name, modifiers, annotations, values } = &node.kind else {
            return;
        };
        self.validate_identifier(name);
        self.check_inner_class_rules(name);
        let (mods, annotations) =
            self.convert_modifiers(modifiers, annotations, SymbolKind::Enum, name.range);

        let symbol = self.new_symbol(
            SymbolKind::Enum,
            &name.text,
            Location::new(node.location, name.range),
            mods,
            annotations,
            SymbolDetail::Type {
                super_class: None,
                interfaces: Vec::new(),
                values: values.iter().map(|v| v.text.clone()).collect(),
            },
        );
        let symbol_id = symbol.id.clone();
        self.add_symbol_checked(symbol);

        self.type_stack.push(TypeContext {
            name: name.text.clone(),
            symbol_id,
            is_interface: false,
        });
        let enum_name = name.text.clone();
        self.with_scope(ScopeType::Class, node.location, Some(&name.text), |c| {
            let mut seen: FxHashSet<String> = FxHashSet::default();
            for value in values {
                c.validate_identifier(value);
                if !seen.insert(value.text.to_ascii_lowercase()) {
                    c.error(
                        format!("Duplicate enum value: '{}'", value.text),
                        value.range,
                        codes::DUPLICATE_ENUM_VALUE,
                    );
                    continue;
                }
                let value_symbol = c.new_symbol(
                    SymbolKind::EnumValue,
                    &value.text,
                    Location::single(value.range),
                    Modifiers {
                        visibility: Visibility::Public,
                        is_static: true,
                        is_final: true,
                        ..Modifiers::default()
                    },
                    Vec::new(),
                    SymbolDetail::VariableLike {
                        type_info: TypeInfo::named(enum_name.clone()),
                        initial_value: None,
                    },
                );
                c.add_symbol_checked(value_symbol);
            }
        });
        self.type_stack.pop();
    }

    fn handle_trigger(&mut self, node: &Node) {
        let NodeKind::TriggerUnit { name, object, block } = &node.kind else {
            return;
        };
        self.validate_identifier(name);

        let mut type_info = TypeInfo::named(object.text.clone());
        type_info.is_built_in = apex_builtins::is_builtin_type(&object.text);
        let symbol = self.new_symbol(
            SymbolKind::Trigger,
            &name.text,
            Location::new(node.location, name.range),
            Modifiers::default(),
            Vec::new(),
            SymbolDetail::Type {
                super_class: Some(type_info),
                interfaces: Vec::new(),
                values: Vec::new(),
            },
        );
        let symbol_id = symbol.id.clone();
        self.add_symbol_checked(symbol);

        self.type_stack.push(TypeContext {
            name: name.text.clone(),
            symbol_id,
            is_interface: false,
        });
        // A trigger body executes like a method body: a class block for
        // uniform FQNs, then a method block for its locals.
        self.with_scope(ScopeType::Class, node.location, Some(&name.text), |c| {
            c.with_scope(ScopeType::Method, block.location, None, |c| {
                c.walk_body(block);
            });
        });
        self.type_stack.pop();
    }

    fn handle_anonymous(&mut self, node: &Node, statements: &[Node]) {
        // Anonymous-execute statements live in an implicit method scope.
        self.with_scope(ScopeType::Method, node.location, None, |c| {
            c.walk_statements(statements);
        });
    }

    // ---------------------------------------------------------------------
    // Callables
    // ---------------------------------------------------------------------

    fn callable_signature(&self, parameters: &[Node]) -> String {
        parameters
            .iter()
            .filter_map(|p| match &p.kind {
                NodeKind::FormalParameter { type_ref, .. } => {
                    Some(type_source_string(type_ref).to_ascii_lowercase())
                }
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    fn check_duplicate_callable(&mut self, name: &Identifier, signature: &str) {
        let scope = self.scopes.current_block_id().unwrap_or_default().to_string();
        let key = (scope, name.text.to_ascii_lowercase(), signature.to_string());
        if !self.callable_signatures.insert(key) {
            self.error(
                format!("Duplicate method declaration: '{}'", name.text),
                name.range,
                codes::DUPLICATE_METHOD,
            );
        }
    }

    fn declare_parameters(&mut self, parameters: &[Node]) -> Vec<String> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut ids = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let NodeKind::FormalParameter { name, type_ref, modifiers } = &parameter.kind else {
                warn!(location = %parameter.location, "expected a formal parameter");
                continue;
            };
            self.validate_identifier(name);
            if !seen.insert(name.text.to_ascii_lowercase()) {
                self.error(
                    format!("Duplicate parameter name: '{}'", name.text),
                    name.range,
                    codes::DUPLICATE_VARIABLE,
                );
                continue;
            }
            let Some((mut type_info, ref_index)) =
                self.extract_and_reference_type(type_ref, ReferenceContext::ParameterType)
            else {
                continue;
            };
            if type_info.is_void() {
                self.error(
                    format!("Parameter '{}' cannot be declared with type 'void'", name.text),
                    name.range,
                    codes::VOID_TYPE,
                );
                continue;
            }
            type_info.type_reference_id = ref_index;

            let is_final = modifiers.iter().any(|m| m.text.eq_ignore_ascii_case("final"));
            let symbol = self.new_symbol(
                SymbolKind::Parameter,
                &name.text,
                Location::new(parameter.location, name.range),
                Modifiers { is_final, ..Modifiers::default() },
                Vec::new(),
                SymbolDetail::VariableLike { type_info, initial_value: None },
            );
            ids.push(symbol.id.clone());
            self.add_symbol_checked(symbol);
        }
        ids
    }

    fn set_callable_parameters(&mut self, callable_id: &str, parameter_ids: Vec<String>) {
        if let Some(symbol) = self.table.get_symbol_mut(callable_id) {
            if let SymbolDetail::Callable { parameters, .. } = &mut symbol.detail {
                *parameters = parameter_ids;
            }
        }
    }

    fn handle_method(&mut self, node: &Node) {
        let NodeKind::MethodDeclaration {
            name,
            modifiers,
            annotations,
            return_type,
            parameters,
            body,
        } = &node.kind
        else {
            return;
        };
        self.signature_type_seen.clear();
        self.validate_identifier(name);
        let (mods, annotations) =
            self.convert_modifiers(modifiers, annotations, SymbolKind::Method, name.range);
        let signature = self.callable_signature(parameters);
        self.check_duplicate_callable(name, &signature);

        let return_info = self
            .extract_and_reference_type(return_type, ReferenceContext::ReturnType)
            .map(|(info, _)| info)
            .unwrap_or_else(TypeInfo::void);

        let symbol = self.new_symbol(
            SymbolKind::Method,
            &name.text,
            Location::new(node.location, name.range),
            mods,
            annotations,
            SymbolDetail::Callable {
                parameters: Vec::new(),
                return_type: return_info,
                is_constructor: false,
            },
        );
        let symbol_id = symbol.id.clone();
        self.add_symbol_checked(symbol);

        self.with_scope(ScopeType::Method, node.location, Some(&name.text), |c| {
            let parameter_ids = c.declare_parameters(parameters);
            c.set_callable_parameters(&symbol_id, parameter_ids);
            if let Some(body) = body {
                c.walk_body(body);
            }
        });
    }

    fn handle_constructor(&mut self, node: &Node) {
        let NodeKind::ConstructorDeclaration { name, modifiers, annotations, parameters, body } =
            &node.kind
        else {
            return;
        };
        self.signature_type_seen.clear();

        let enclosing = self.type_stack.last().map(|t| t.name.clone());
        let valid_name = if name.is_qualified() {
            self.error(
                format!("Constructor name '{}' must be a simple unqualified name", name.text),
                name.range,
                codes::INVALID_CONSTRUCTOR_NAME,
            );
            false
        } else if enclosing
            .as_deref()
            .is_some_and(|outer| !outer.eq_ignore_ascii_case(&name.text))
        {
            self.error(
                format!("Constructor name '{}' must match its class name", name.text),
                name.range,
                codes::INVALID_CONSTRUCTOR_NAME,
            );
            false
        } else {
            true
        };

        let (mods, annotations) =
            self.convert_modifiers(modifiers, annotations, SymbolKind::Constructor, name.range);
        let signature = self.callable_signature(parameters);
        self.check_duplicate_callable(name, &signature);

        if !valid_name {
            // The declaration is skipped but its body still collects.
            self.with_scope(ScopeType::Method, node.location, None, |c| {
                c.declare_parameters(parameters);
                c.walk_body(body);
            });
            return;
        }

        let symbol = self.new_symbol(
            SymbolKind::Constructor,
            &name.text,
            Location::new(node.location, name.range),
            mods,
            annotations,
            SymbolDetail::Callable {
                parameters: Vec::new(),
                return_type: TypeInfo::void(),
                is_constructor: true,
            },
        );
        let symbol_id = symbol.id.clone();
        self.add_symbol_checked(symbol);

        self.with_scope(ScopeType::Method, node.location, Some(&name.text), |c| {
            let parameter_ids = c.declare_parameters(parameters);
            c.set_callable_parameters(&symbol_id, parameter_ids);
            c.walk_body(body);
        });
    }

    fn handle_interface_method(&mut self, node: &Node) {
        let NodeKind::InterfaceMethodDeclaration { name, modifiers, return_type, parameters } =
            &node.kind
        else {
            return;
        };
        self.signature_type_seen.clear();
        self.validate_identifier(name);
        if !modifiers.is_empty() {
            self.error(
                "Interface methods are implicitly public and abstract; modifiers are not allowed",
                name.range,
                codes::INTERFACE_MODIFIERS,
            );
        }
        let signature = self.callable_signature(parameters);
        self.check_duplicate_callable(name, &signature);

        let return_info = self
            .extract_and_reference_type(return_type, ReferenceContext::ReturnType)
            .map(|(info, _)| info)
            .unwrap_or_else(TypeInfo::void);

        let symbol = self.new_symbol(
            SymbolKind::Method,
            &name.text,
            Location::new(node.location, name.range),
            Modifiers {
                visibility: Visibility::Public,
                is_abstract: true,
                ..Modifiers::default()
            },
            Vec::new(),
            SymbolDetail::Callable {
                parameters: Vec::new(),
                return_type: return_info,
                is_constructor: false,
            },
        );
        let symbol_id = symbol.id.clone();
        self.add_symbol_checked(symbol);

        self.with_scope(ScopeType::Method, node.location, Some(&name.text), |c| {
            let parameter_ids = c.declare_parameters(parameters);
            c.set_callable_parameters(&symbol_id, parameter_ids);
        });
    }

    // ---------------------------------------------------------------------
    // Variable-like declarations
    // ---------------------------------------------------------------------

    fn declare_variables(
        &mut self,
        kind: SymbolKind,
        declaration: &Node,
        type_ref: &Node,
        declarators: &[Node],
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
    ) {
        let Some((type_info, ref_index)) =
            self.extract_and_reference_type(type_ref, ReferenceContext::TypeDeclaration)
        else {
            return;
        };
        if type_info.is_void() {
            self.error(
                "Variables cannot be declared with type 'void'",
                type_name_range(type_ref),
                codes::VOID_TYPE,
            );
            return;
        }
        // Side table from the declaration node to the emitted type
        // reference; declarator processing reads it back for linking.
        if let Some(index) = ref_index {
            self.type_link.insert(declaration.location, index);
        }

        let mut seen_in_statement: FxHashSet<String> = FxHashSet::default();
        for declarator in declarators {
            let NodeKind::VariableDeclarator { name, initializer } = &declarator.kind else {
                warn!(location = %declarator.location, "expected a variable declarator");
                continue;
            };
            self.validate_identifier(name);
            if !seen_in_statement.insert(name.text.to_ascii_lowercase()) {
                self.error(
                    format!(
                        "Duplicate variable declaration: '{}' is already declared in this statement",
                        name.text
                    ),
                    name.range,
                    codes::DUPLICATE_VARIABLE_IN_STATEMENT,
                );
                continue;
            }
            let scope_duplicate = self
                .scopes
                .current_block_id()
                .map(|scope| {
                    self.table
                        .get_symbols_in_scope(scope)
                        .iter()
                        .any(|s| s.kind.is_variable_like() && s.name_matches(&name.text))
                })
                .unwrap_or(false);
            if scope_duplicate {
                self.error(
                    format!(
                        "Duplicate variable declaration: '{}' is already declared in this scope",
                        name.text
                    ),
                    name.range,
                    codes::DUPLICATE_VARIABLE,
                );
                continue;
            }

            let mut type_info = type_info.clone();
            type_info.type_reference_id = self.type_link.get(&declaration.location).copied();
            let initial_value = initializer.as_deref().and_then(|init| match &init.kind {
                NodeKind::Literal { value, .. } => Some(value.clone()),
                _ => None,
            });

            let symbol = self.new_symbol(
                kind,
                &name.text,
                Location::new(declarator.location, name.range),
                modifiers,
                annotations.clone(),
                SymbolDetail::VariableLike { type_info, initial_value },
            );
            self.add_symbol_checked(symbol);

            let reference = SymbolReference::new(
                &name.text,
                Location::single(name.range),
                ReferenceContext::VariableDeclaration,
            );
            self.emit_reference(reference, false);

            if let Some(initializer) = initializer {
                walk(initializer, self);
            }
        }
    }

    fn handle_field(&mut self, node: &Node) {
        let NodeKind::FieldDeclaration { modifiers, annotations, type_ref, declarators } =
            &node.kind
        else {
            return;
        };
        let name_range = type_name_range(type_ref);
        let (mods, annotations) =
            self.convert_modifiers(modifiers, annotations, SymbolKind::Field, name_range);
        self.declare_variables(SymbolKind::Field, node, type_ref, declarators, mods, annotations);
    }

    fn handle_local_variable(&mut self, node: &Node) {
        let NodeKind::LocalVariableDeclaration { modifiers, type_ref, declarators } = &node.kind
        else {
            return;
        };
        let is_final = modifiers.iter().any(|m| m.text.eq_ignore_ascii_case("final"));
        self.declare_variables(
            SymbolKind::Variable,
            node,
            type_ref,
            declarators,
            Modifiers { is_final, ..Modifiers::default() },
            Vec::new(),
        );
    }

    fn handle_property(&mut self, node: &Node) {
        let NodeKind::PropertyDeclaration {
            modifiers,
            annotations,
            type_ref,
            name,
            getter,
            setter,
        } = &node.kind
        else {
            return;
        };
        if self.type_stack.last().is_some_and(|t| t.is_interface) {
            self.error(
                format!("Property '{}' cannot be declared in an interface", name.text),
                name.range,
                codes::PROPERTY_IN_INTERFACE,
            );
        }
        self.validate_identifier(name);
        let (mods, annotations) =
            self.convert_modifiers(modifiers, annotations, SymbolKind::Property, name.range);

        let Some((mut type_info, ref_index)) =
            self.extract_and_reference_type(type_ref, ReferenceContext::TypeDeclaration)
        else {
            return;
        };
        if type_info.is_void() {
            self.error(
                format!("Property '{}' cannot be declared with type 'void'", name.text),
                name.range,
                codes::VOID_TYPE,
            );
            return;
        }
        type_info.type_reference_id = ref_index;

        let symbol = self.new_symbol(
            SymbolKind::Property,
            &name.text,
            Location::new(node.location, name.range),
            mods,
            annotations,
            SymbolDetail::VariableLike { type_info, initial_value: None },
        );
        self.add_symbol_checked(symbol);

        let reference = SymbolReference::new(
            &name.text,
            Location::single(name.range),
            ReferenceContext::PropertyReference,
        );
        self.emit_reference(reference, false);

        for (accessor, scope_type) in
            [(getter, ScopeType::Getter), (setter, ScopeType::Setter)]
        {
            if let Some(accessor) = accessor {
                if let NodeKind::AccessorBlock { body: Some(body), .. } = &accessor.kind {
                    self.with_scope(scope_type, accessor.location, None, |c| {
                        c.walk_body(body);
                    });
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Control flow
    // ---------------------------------------------------------------------

    fn handle_if(&mut self, node: &Node) {
        let NodeKind::IfStatement { condition, then_branch, else_branch } = &node.kind else {
            return;
        };
        walk(condition, self);
        self.with_scope(ScopeType::If, then_branch.location, None, |c| {
            c.walk_body(then_branch);
        });
        if let Some(else_branch) = else_branch {
            if matches!(else_branch.kind, NodeKind::IfStatement { .. }) {
                walk(else_branch, self);
            } else {
                self.with_scope(ScopeType::If, else_branch.location, None, |c| {
                    c.walk_body(else_branch);
                });
            }
        }
    }

    fn handle_try(&mut self, node: &Node) {
        let NodeKind::TryStatement { block, catches, finally_block } = &node.kind else {
            return;
        };
        if catches.is_empty() && finally_block.is_none() {
            self.error(
                "'try' must declare at least one 'catch' or a 'finally' block",
                node.location,
                codes::TRY_WITHOUT_HANDLER,
            );
        }
        self.with_scope(ScopeType::Try, block.location, None, |c| {
            c.walk_body(block);
        });
        for catch in catches {
            let NodeKind::CatchClause { parameter, block } = &catch.kind else {
                continue;
            };
            self.with_scope(ScopeType::Catch, catch.location, None, |c| {
                c.declare_parameters(std::slice::from_ref(parameter.as_ref()));
                c.walk_body(block);
            });
        }
        if let Some(finally_block) = finally_block {
            self.with_scope(ScopeType::Finally, finally_block.location, None, |c| {
                c.walk_body(finally_block);
            });
        }
    }

    fn handle_switch(&mut self, node: &Node) {
        let NodeKind::SwitchStatement { expression, whens } = &node.kind else {
            return;
        };
        self.validate_switch(node, expression, whens);
        self.with_scope(ScopeType::Switch, node.location, None, |c| {
            walk(expression, c);
            for when in whens {
                let NodeKind::WhenClause { values, block, .. } = &when.kind else {
                    continue;
                };
                c.with_scope(ScopeType::When, when.location, None, |c| {
                    for value in values {
                        walk(value, c);
                    }
                    c.walk_body(block);
                });
            }
        });
    }

    fn validate_switch(&mut self, node: &Node, expression: &Node, whens: &[Node]) {
        if whens.is_empty() {
            self.error(
                "'switch' must declare at least one 'when' clause",
                node.location,
                codes::SWITCH_WITHOUT_WHEN,
            );
            return;
        }
        let last = whens.len() - 1;
        let mut seen_values: FxHashSet<String> = FxHashSet::default();
        let switch_type = self.switch_expression_type(expression);
        let enum_switch = switch_type.as_deref().and_then(|type_name| {
            self.table
                .find_symbol_with(|s| s.kind == SymbolKind::Enum && s.name_matches(type_name))
                .map(|s| s.name.clone())
        });

        for (index, when) in whens.iter().enumerate() {
            let NodeKind::WhenClause { values, is_else, .. } = &when.kind else {
                continue;
            };
            if *is_else && index != last {
                self.error(
                    "'when else' must be the last clause",
                    when.location,
                    codes::WHEN_ELSE_NOT_LAST,
                );
            }
            for value in values {
                if let Some(rendered) = render_when_value(value) {
                    if !seen_values.insert(rendered.to_ascii_lowercase()) {
                        self.error(
                            format!("Duplicate 'when' value: '{}'", rendered),
                            value.location,
                            codes::DUPLICATE_WHEN_VALUE,
                        );
                    }
                }
                if enum_switch.is_some() && when_value_is_qualified(value) {
                    self.error(
                        "Enum 'when' values must be unqualified",
                        value.location,
                        codes::INVALID_FULLY_QUALIFIED_ENUM,
                    );
                }
                if enum_switch.is_none() {
                    self.check_when_literal_compatibility(value, switch_type.as_deref());
                }
            }
        }
    }

    fn check_when_literal_compatibility(&mut self, value: &Node, switch_type: Option<&str>) {
        let Some(switch_type) = switch_type else { return };
        let NodeKind::Literal { literal, value: text } = &value.kind else {
            return;
        };
        let compatible = match literal {
            LiteralKind::Integer => {
                switch_type.eq_ignore_ascii_case("Integer")
                    || switch_type.eq_ignore_ascii_case("Long")
            }
            LiteralKind::Long => switch_type.eq_ignore_ascii_case("Long"),
            LiteralKind::Str => switch_type.eq_ignore_ascii_case("String"),
            _ => true,
        };
        if !compatible {
            self.error(
                format!("'when' value '{}' is not compatible with the switch type '{}'", text, switch_type),
                value.location,
                codes::INCOMPATIBLE_WHEN_VALUE,
            );
        }
    }

    /// Declared type of the switched expression when it is a variable in
    /// lexical scope.
    fn switch_expression_type(&self, expression: &Node) -> Option<String> {
        let NodeKind::Identifier { name } = &expression.kind else {
            return None;
        };
        for entry in self.scopes.iter_innermost_first() {
            let found = self
                .table
                .get_symbols_in_scope(&entry.block_id)
                .iter()
                .find(|s| s.kind.is_variable_like() && s.name_matches(name))
                .and_then(|s| s.type_info())
                .map(|t| t.name.clone());
            if found.is_some() {
                return found;
            }
        }
        None
    }

    // ---------------------------------------------------------------------
    // Assignments
    // ---------------------------------------------------------------------

    fn handle_assignment(&mut self, node: &Node) {
        let NodeKind::Assignment { lhs, rhs, op } = &node.kind else {
            return;
        };
        let access =
            if op == "=" { ReferenceAccess::Write } else { ReferenceAccess::ReadWrite };
        let written_before = self.lhs_written.len();
        self.process_assignment_target(lhs, access);
        walk(rhs, self);
        self.lhs_written.truncate(written_before);
    }

    fn process_assignment_target(&mut self, lhs: &Node, access: ReferenceAccess) {
        match &lhs.kind {
            NodeKind::Identifier { name } => {
                self.emit_variable_usage(name, lhs.location, access);
            }
            NodeKind::DotExpression { object, property } => {
                // The qualifier is read, the member is written.
                walk(object, self);
                let reference = SymbolReference::new(
                    &property.text,
                    Location::single(property.range),
                    ReferenceContext::FieldAccess,
                )
                .with_access(access);
                self.emit_reference(reference, false);
                self.lhs_written.push(property.range);
            }
            NodeKind::ArrayAccess { array, index } => {
                // The array base and index are reads; the element slot
                // write has no name of its own.
                walk(array, self);
                walk(index, self);
            }
            _ => walk(lhs, self),
        }
    }

    // ---------------------------------------------------------------------
    // Calls and chains
    // ---------------------------------------------------------------------

    fn push_call(&mut self, ref_index: Option<usize>) {
        self.calls.push(CallFrame { ref_index, parameters: Vec::new() });
    }

    fn pop_call(&mut self) {
        let Some(frame) = self.calls.pop() else {
            warn!("method-call stack pop on empty stack");
            return;
        };
        let Some(index) = frame.ref_index else {
            if !frame.parameters.is_empty() {
                debug!(
                    count = frame.parameters.len(),
                    "dropping parameter references of an unanchored mid-chain call"
                );
            }
            return;
        };
        if let Some(reference) = self.table.get_reference_mut(index) {
            reference.parameters = frame.parameters;
        }
        if let Some(parent) = self.calls.last_mut() {
            parent.parameters.push(self.table.get_all_references()[index].clone());
        }
    }

    fn process_arguments(&mut self, arguments: &Node) {
        let NodeKind::ExpressionList { expressions } = &arguments.kind else {
            warn!(location = %arguments.location, "expected an argument expression list");
            return;
        };
        self.args_depth += 1;
        for expression in expressions {
            walk(expression, self);
        }
        self.args_depth -= 1;
    }

    fn handle_bare_call(&mut self, node: &Node) {
        let NodeKind::MethodCall { name, arguments } = &node.kind else {
            return;
        };
        let reference = SymbolReference::new(
            &name.text,
            Location::new(node.location, name.range),
            ReferenceContext::MethodCall,
        );
        let index = self.emit_reference(reference, false);
        self.push_call(index);
        self.process_arguments(arguments);
        self.pop_call();
    }

    fn handle_new(&mut self, node: &Node) {
        let NodeKind::NewExpression { type_ref, arguments } = &node.kind else {
            return;
        };
        for issue in collect_type_issues(type_ref) {
            self.error(issue.message, issue.range, issue.code);
        }
        let Some(info) = extract_type_info(type_ref) else {
            warn!(location = %node.location, "expected a constructed type");
            return;
        };
        let name_range = type_name_range(type_ref);
        let reference = SymbolReference::new(
            &info.name,
            Location::new(node.location, name_range),
            ReferenceContext::ConstructorCall,
        );
        let index = self.emit_reference(reference, false);
        self.emit_generic_argument_refs(type_ref, ReferenceContext::ConstructorCall);
        self.push_call(index);
        self.process_arguments(arguments);
        self.pop_call();
    }

    fn process_chain_root(&mut self, node: &Node) {
        if chain::starts_with_this(node) {
            self.process_this_members(node);
            return;
        }
        let mut scope = ChainScope::open(node);
        match &node.kind {
            NodeKind::DotExpression { object, property } => {
                self.process_chain_object(object, &mut scope);
                scope.push_field(&property.text, property.range);
                self.finalize_chain(scope, true);
            }
            NodeKind::DotMethodCall { object, name, arguments } => {
                self.process_chain_object(object, &mut scope);
                scope.push_method(&name.text, name.range);
                // The chain closes before the argument list begins; each
                // argument opens its own fresh chain scope.
                let index = self.finalize_chain(scope, false);
                self.push_call(index);
                self.process_arguments(arguments);
                self.pop_call();
            }
            _ => walk(node, self),
        }
    }

    fn process_chain_object(&mut self, node: &Node, scope: &mut ChainScope) {
        match &node.kind {
            // The leftmost identifier is the base, captured when the
            // chain scope opened.
            NodeKind::Identifier { .. } => {}
            NodeKind::DotExpression { object, property } => {
                self.process_chain_object(object, scope);
                scope.push_field(&property.text, property.range);
            }
            NodeKind::DotMethodCall { object, name, arguments } => {
                self.process_chain_object(object, scope);
                scope.push_method(&name.text, name.range);
                self.push_call(None);
                self.process_arguments(arguments);
                self.pop_call();
            }
            NodeKind::MethodCall { name, arguments } => {
                scope.push_method(&name.text, name.range);
                self.push_call(None);
                self.process_arguments(arguments);
                self.pop_call();
            }
            NodeKind::ArrayAccess { array, index } => {
                self.process_chain_object(array, scope);
                walk(index, self);
            }
            _ => walk(node, self),
        }
    }

    fn finalize_chain(&mut self, scope: ChainScope, collect: bool) -> Option<usize> {
        let base = scope.base_identifier().map(|(name, range)| (name.to_string(), range));
        let chained = {
            let table = &self.table;
            let scopes = &self.scopes;
            scope.finalize(|name| {
                apex_builtins::is_builtin_type(name)
                    || lexical_variable_exists(table, scopes, name)
            })
        }?;
        let index = self.emit_reference(chained, collect);
        // A same-position variable-usage reference on the base keeps
        // hover and same-file lookup working for `System.debug` prefixes.
        if let Some((name, range)) = base {
            let reference = SymbolReference::new(
                name,
                Location::single(range),
                ReferenceContext::VariableUsage,
            )
            .with_access(ReferenceAccess::Read);
            self.emit_reference(reference, false);
        }
        index
    }

    /// `this.member` emits individual references instead of a chain.
    fn process_this_members(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::This => {
                self.emit_variable_usage("this", node.location, ReferenceAccess::Read);
            }
            NodeKind::DotExpression { object, property } => {
                self.process_this_members(object);
                let reference = SymbolReference::new(
                    &property.text,
                    Location::single(property.range),
                    ReferenceContext::FieldAccess,
                )
                .with_access(ReferenceAccess::Read);
                self.emit_reference(reference, true);
            }
            NodeKind::DotMethodCall { object, name, arguments } => {
                self.process_this_members(object);
                let reference = SymbolReference::new(
                    &name.text,
                    Location::single(name.range),
                    ReferenceContext::MethodCall,
                );
                let index = self.emit_reference(reference, false);
                self.push_call(index);
                self.process_arguments(arguments);
                self.pop_call();
            }
            NodeKind::ArrayAccess { array, index } => {
                self.process_this_members(array);
                walk(index, self);
            }
            _ => walk(node, self),
        }
    }
}

/// True when a variable-like symbol with this name is visible from the
/// current scope stack.
fn lexical_variable_exists(table: &SymbolTable, scopes: &ScopeStack, name: &str) -> bool {
    scopes.iter_innermost_first().any(|entry| {
        table
            .get_symbols_in_scope(&entry.block_id)
            .iter()
            .any(|s| s.kind.is_variable_like() && s.name_matches(name))
    })
}

fn render_when_value(node: &Node) -> Option<String> {
    match &node.kind {
        NodeKind::Identifier { name } => Some(name.clone()),
        NodeKind::Literal { value, .. } => Some(value.clone()),
        NodeKind::DotExpression { object, property } => {
            render_when_value(object).map(|base| format!("{}.{}", base, property.text))
        }
        _ => None,
    }
}

fn when_value_is_qualified(node: &Node) -> bool {
    match &node.kind {
        NodeKind::DotExpression { .. } => true,
        NodeKind::Identifier { name } => name.contains('.'),
        _ => false,
    }
}

impl AstListener for SymbolCollector<'_> {
    fn enter_node(&mut self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::CompilationUnit { .. } => true,
            NodeKind::TriggerUnit { .. } => {
                self.handle_trigger(node);
                false
            }
            NodeKind::AnonymousBlock { statements } => {
                self.handle_anonymous(node, statements);
                false
            }
            NodeKind::ClassDeclaration { .. } => {
                self.handle_class(node);
                false
            }
            NodeKind::InterfaceDeclaration { .. } => {
                self.handle_interface(node);
                false
            }
            NodeKind::EnumDeclaration { .. } => {
                self.handle_enum(node);
                false
            }
            NodeKind::MethodDeclaration { .. } => {
                self.handle_method(node);
                false
            }
            NodeKind::ConstructorDeclaration { .. } => {
                self.handle_constructor(node);
                false
            }
            NodeKind::InterfaceMethodDeclaration { .. } => {
                self.handle_interface_method(node);
                false
            }
            NodeKind::FieldDeclaration { .. } => {
                self.handle_field(node);
                false
            }
            NodeKind::PropertyDeclaration { .. } => {
                self.handle_property(node);
                false
            }
            NodeKind::LocalVariableDeclaration { .. } => {
                self.handle_local_variable(node);
                false
            }
            NodeKind::Block { statements } => {
                // A freestanding brace block; bodies of declarations and
                // control flow are consumed by their handlers instead.
                self.with_scope(ScopeType::Block, node.location, None, |c| {
                    c.walk_statements(statements);
                });
                false
            }
            NodeKind::IfStatement { .. } => {
                self.handle_if(node);
                false
            }
            NodeKind::WhileStatement { condition, body } => {
                walk(condition, self);
                self.with_scope(ScopeType::While, body.location, None, |c| c.walk_body(body));
                false
            }
            NodeKind::DoWhileStatement { body, condition } => {
                self.with_scope(ScopeType::DoWhile, body.location, None, |c| c.walk_body(body));
                walk(condition, self);
                false
            }
            NodeKind::ForStatement { init, condition, update, body } => {
                self.with_scope(ScopeType::For, node.location, None, |c| {
                    if let Some(init) = init {
                        walk(init, c);
                    }
                    if let Some(condition) = condition {
                        walk(condition, c);
                    }
                    if let Some(update) = update {
                        // The update clause reuses the expression-list
                        // production but is not a call argument list.
                        walk(update, c);
                    }
                    c.walk_body(body);
                });
                false
            }
            NodeKind::ForEachStatement { variable, iterable, body } => {
                self.with_scope(ScopeType::For, node.location, None, |c| {
                    walk(variable, c);
                    walk(iterable, c);
                    c.walk_body(body);
                });
                false
            }
            NodeKind::TryStatement { .. } => {
                self.handle_try(node);
                false
            }
            NodeKind::SwitchStatement { .. } => {
                self.handle_switch(node);
                false
            }
            NodeKind::RunAsStatement { operands, block } => {
                // runAs operands reuse the expression-list production but
                // are not a call argument list.
                walk(operands, self);
                self.with_scope(ScopeType::RunAs, block.location, None, |c| c.walk_body(block));
                false
            }
            NodeKind::Assignment { .. } => {
                self.handle_assignment(node);
                false
            }
            NodeKind::DotExpression { .. } | NodeKind::DotMethodCall { .. } => {
                self.process_chain_root(node);
                false
            }
            NodeKind::MethodCall { .. } => {
                self.handle_bare_call(node);
                false
            }
            NodeKind::NewExpression { .. } => {
                self.handle_new(node);
                false
            }
            NodeKind::CastExpression { type_ref, expression } => {
                self.extract_and_reference_type(type_ref, ReferenceContext::CastTypeReference);
                walk(expression, self);
                false
            }
            NodeKind::InstanceOfExpression { expression, type_ref } => {
                walk(expression, self);
                self.extract_and_reference_type(
                    type_ref,
                    ReferenceContext::InstanceofTypeReference,
                );
                false
            }
            NodeKind::ClassLiteral { type_ref } => {
                self.extract_and_reference_type(type_ref, ReferenceContext::ClassReference);
                false
            }
            NodeKind::Literal { literal, value } => {
                self.emit_literal(node, *literal, value);
                true
            }
            NodeKind::Identifier { name } => {
                self.emit_variable_usage(name, node.location, ReferenceAccess::Read);
                true
            }
            NodeKind::This => {
                self.emit_variable_usage("this", node.location, ReferenceAccess::Read);
                true
            }
            NodeKind::Super => {
                self.emit_variable_usage("super", node.location, ReferenceAccess::Read);
                true
            }
            NodeKind::FormalParameter { .. }
            | NodeKind::VariableDeclarator { .. }
            | NodeKind::AccessorBlock { .. }
            | NodeKind::WhenClause { .. }
            | NodeKind::CatchClause { .. }
            | NodeKind::TypeRef { .. } => {
                // Always consumed by an enclosing handler; reaching one
                // directly is a parse-tree anomaly.
                warn!(location = %node.location, "unexpected context outside its declaration");
                false
            }
            // Return, throw, expression statements, binary/unary
            // operators, subscripts, and expression lists descend.
            _ => true,
        }
    }
}
