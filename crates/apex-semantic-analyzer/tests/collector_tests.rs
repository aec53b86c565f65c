//! Collector behavior: scopes, declarations, diagnostics, and access
//! tracking over hand-built trees.

mod common;

use apex_ast::{Node, NodeKind};
use apex_semantic_analyzer::analyze;
use apex_semantic_analyzer::diagnostics::codes;
use apex_symbol_types::{
    ReferenceAccess, ReferenceContext, ScopeType, SymbolKind, Visibility,
};
use common::*;
use pretty_assertions::assert_eq;

const URI: &str = "file:///Example.cls";

fn scope_block_id(
    table: &apex_symbol_table::SymbolTable,
    scope_type: ScopeType,
) -> Option<String> {
    table
        .find_symbol_with(|s| s.scope_type() == Some(scope_type))
        .map(|s| s.id.clone())
}

/// `if (flag) { Integer i; }`
#[test]
fn if_branch_gets_its_own_scope() {
    let then_branch = block(
        vec![local_var(
            ty("Integer", 1, 12),
            vec![declarator(ident("i", 1, 20), None)],
            range(1, 12, 22),
        )],
        range(1, 10, 24),
    );
    let root = anon(
        vec![if_stmt(ident_expr("flag", 1, 4), then_branch, None, range(1, 0, 24))],
        range(1, 0, 24),
    );

    let result = analyze(Some(&root), URI, None);

    let if_block = scope_block_id(&result.table, ScopeType::If).expect("if block");
    let variable = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Variable)
        .expect("loop variable");
    assert_eq!(variable.parent_id.as_deref(), Some(if_block.as_str()));
}

/// `for (Integer j; ; ) { }` - the init declaration lives in the loop scope.
#[test]
fn for_init_declarations_live_in_the_loop_scope() {
    let init = local_var(
        ty("Integer", 1, 5),
        vec![declarator(ident("j", 1, 13), None)],
        range(1, 5, 15),
    );
    let root = anon(
        vec![for_stmt(Some(init), None, None, block(vec![], range(1, 20, 23)), range(1, 0, 23))],
        range(1, 0, 23),
    );

    let result = analyze(Some(&root), URI, None);

    let for_block = scope_block_id(&result.table, ScopeType::For).expect("for block");
    let variable = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Variable)
        .expect("variable j");
    assert_eq!(variable.parent_id.as_deref(), Some(for_block.as_str()));
}

/// `for (; ; i++)` - the update list is not a call argument list.
#[test]
fn for_update_list_collects_no_call_parameters() {
    let update = arg_list(vec![unary("++", ident_expr("i", 1, 8))], range(1, 8, 11));
    let root = anon(
        vec![for_stmt(None, None, Some(update), block(vec![], range(1, 13, 16)), range(1, 0, 16))],
        range(1, 0, 16),
    );

    let result = analyze(Some(&root), URI, None);

    assert!(result
        .table
        .get_all_references()
        .iter()
        .any(|r| r.name == "i" && r.context == ReferenceContext::VariableUsage));
    assert!(result.table.get_all_references().iter().all(|r| r.parameters.is_empty()));
}

/// `try { } catch (Exception ex) { } finally { }`
#[test]
fn try_catch_finally_scopes_and_catch_parameter() {
    let catch = catch_clause(
        param(ident("ex", 2, 17), ty("Exception", 2, 7)),
        block(vec![], range(2, 21, 24)),
        range(2, 0, 24),
    );
    let root = anon(
        vec![try_stmt(
            block(vec![], range(1, 4, 7)),
            vec![catch],
            Some(block(vec![], range(3, 8, 11))),
            span(1, 0, 3, 11),
        )],
        span(1, 0, 3, 11),
    );

    let result = analyze(Some(&root), URI, None);

    for scope_type in [ScopeType::Try, ScopeType::Catch, ScopeType::Finally] {
        assert!(scope_block_id(&result.table, scope_type).is_some(), "{scope_type} scope");
    }
    let catch_block = scope_block_id(&result.table, ScopeType::Catch).expect("catch block");
    let parameter = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Parameter)
        .expect("catch parameter");
    assert_eq!(parameter.name, "ex");
    assert_eq!(parameter.parent_id.as_deref(), Some(catch_block.as_str()));
    assert_eq!(parameter.type_info().map(|t| t.name.as_str()), Some("Exception"));
}

/// `try { }` with neither catch nor finally is malformed.
#[test]
fn try_without_handler_is_reported() {
    let root = anon(
        vec![try_stmt(block(vec![], range(1, 4, 7)), vec![], None, range(1, 0, 7))],
        range(1, 0, 7),
    );
    let result = analyze(Some(&root), URI, None);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some(codes::TRY_WITHOUT_HANDLER)));
}

/// `a += 1` marks the target as read-then-written.
#[test]
fn compound_assignment_is_readwrite() {
    let root = anon(
        vec![
            local_var(
                ty("Integer", 1, 0),
                vec![declarator(ident("a", 1, 8), None)],
                range(1, 0, 10),
            ),
            expr_stmt(assign(ident_expr("a", 2, 0), "+=", int_lit("1", 2, 5))),
        ],
        span(1, 0, 2, 6),
    );

    let result = analyze(Some(&root), URI, None);

    let target = result
        .table
        .get_all_references()
        .iter()
        .find(|r| r.location.identifier_range.start_line == 2 && r.name == "a")
        .expect("assignment target");
    assert_eq!(target.access, Some(ReferenceAccess::ReadWrite));
}

/// `obj.f = 1` reads the qualifier and writes the member.
#[test]
fn member_assignment_reads_qualifier_and_writes_member() {
    let root = anon(
        vec![expr_stmt(assign(
            dot(ident_expr("obj", 1, 0), ident("f", 1, 4)),
            "=",
            int_lit("1", 1, 8),
        ))],
        range(1, 0, 9),
    );

    let result = analyze(Some(&root), URI, None);
    let references = result.table.get_all_references();

    let qualifier = references
        .iter()
        .find(|r| r.name == "obj")
        .expect("qualifier reference");
    assert_eq!(qualifier.context, ReferenceContext::VariableUsage);
    assert_eq!(qualifier.access, Some(ReferenceAccess::Read));

    let member = references.iter().find(|r| r.name == "f").expect("member reference");
    assert_eq!(member.context, ReferenceContext::FieldAccess);
    assert_eq!(member.access, Some(ReferenceAccess::Write));
}

/// `arr[i] = 2` reads the base and the index; the element slot itself
/// has no named reference.
#[test]
fn array_element_assignment_reads_base_and_index() {
    let root = anon(
        vec![expr_stmt(assign(
            array_access(ident_expr("arr", 1, 0), ident_expr("i", 1, 4), range(1, 0, 6)),
            "=",
            int_lit("2", 1, 9),
        ))],
        range(1, 0, 10),
    );

    let result = analyze(Some(&root), URI, None);
    let references = result.table.get_all_references();

    for name in ["arr", "i"] {
        let reference = references.iter().find(|r| r.name == name).expect(name);
        assert_eq!(reference.access, Some(ReferenceAccess::Read));
    }
    assert!(references
        .iter()
        .all(|r| !matches!(r.access, Some(ReferenceAccess::Write))));
}

/// `this.f = 1` inside a class emits individual member references and
/// binds the field.
#[test]
fn this_member_write_binds_the_field() {
    let field_decl = field(
        vec![],
        ty("Integer", 2, 2),
        vec![declarator(ident("f", 2, 10), None)],
        range(2, 2, 12),
    );
    let body = block(
        vec![expr_stmt(assign(
            dot(this_expr(3, 13), ident("f", 3, 18)),
            "=",
            int_lit("1", 3, 22),
        ))],
        range(3, 11, 26),
    );
    let m = method(ident("m", 3, 7), vec![], ty("void", 3, 2), vec![], Some(body), range(3, 2, 26));
    let root = comp_unit(class(ident("C", 1, 6), vec![], vec![field_decl, m], span(1, 0, 4, 1)));

    let result = analyze(Some(&root), URI, None);

    let field_symbol = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Field)
        .expect("field symbol");

    let references = result.table.get_all_references();
    assert!(references.iter().any(|r| r.name == "this"));
    assert!(!references.iter().any(|r| r.is_chained()));

    let write = references
        .iter()
        .find(|r| r.context == ReferenceContext::FieldAccess && r.name == "f")
        .expect("field write");
    assert_eq!(write.access, Some(ReferenceAccess::Write));
    assert_eq!(write.resolved_symbol_id.as_deref(), Some(field_symbol.id.as_str()));
}

/// `class C { C() { } void m() { new C(); } }`
#[test]
fn constructor_declaration_and_constructor_call() {
    let ctor = constructor(
        ident("C", 2, 2),
        vec![],
        vec![],
        block(vec![], range(2, 6, 9)),
        range(2, 2, 9),
    );
    let body = block(
        vec![expr_stmt(new_expr(ty("C", 3, 15), arg_list(vec![], range(3, 16, 18))))],
        range(3, 13, 21),
    );
    let m = method(ident("m", 3, 7), vec![], ty("void", 3, 2), vec![], Some(body), range(3, 2, 21));
    let root = comp_unit(class(ident("C", 1, 6), vec![], vec![ctor, m], span(1, 0, 4, 1)));

    let result = analyze(Some(&root), URI, None);

    let ctor_symbol = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Constructor)
        .expect("constructor symbol");
    assert!(ctor_symbol.is_constructor());
    assert!(ctor_symbol.return_type().is_some_and(|t| t.is_void()));

    let call = result
        .table
        .get_all_references()
        .iter()
        .find(|r| r.context == ReferenceContext::ConstructorCall)
        .expect("constructor call");
    assert_eq!(call.resolved_symbol_id.as_deref(), Some(ctor_symbol.id.as_str()));
}

/// A constructor whose name does not match its class is rejected.
#[test]
fn mismatched_constructor_name_is_reported() {
    let ctor = constructor(
        ident("Wrong", 2, 2),
        vec![],
        vec![],
        block(vec![], range(2, 10, 13)),
        range(2, 2, 13),
    );
    let root = comp_unit(class(ident("C", 1, 6), vec![], vec![ctor], span(1, 0, 3, 1)));

    let result = analyze(Some(&root), URI, None);

    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some(codes::INVALID_CONSTRUCTOR_NAME)));
    assert!(result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Constructor)
        .is_none());
}

/// Interface methods are implicitly public abstract; explicit modifiers
/// are rejected, as are properties in interface bodies.
#[test]
fn interface_body_rules() {
    let sized = Node::new(
        NodeKind::InterfaceMethodDeclaration {
            name: ident("size", 2, 10),
            modifiers: vec![],
            return_type: Box::new(ty("Integer", 2, 2)),
            parameters: vec![],
        },
        range(2, 2, 17),
    );
    let bad = Node::new(
        NodeKind::InterfaceMethodDeclaration {
            name: ident("grow", 3, 14),
            modifiers: vec![modifier("public", 3, 2)],
            return_type: Box::new(ty("void", 3, 9)),
            parameters: vec![],
        },
        range(3, 2, 21),
    );
    let prop = property(ident("Count", 4, 10), vec![], ty("Integer", 4, 2), range(4, 2, 28));
    let root = comp_unit(interface(
        ident("Sizable", 1, 10),
        vec![],
        vec![sized, bad, prop],
        span(1, 0, 5, 1),
    ));

    let result = analyze(Some(&root), URI, None);

    let size_method = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Method && s.name == "size")
        .expect("interface method symbol");
    assert_eq!(size_method.modifiers.visibility, Visibility::Public);
    assert!(size_method.modifiers.is_abstract);

    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some(codes::INTERFACE_MODIFIERS)));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some(codes::PROPERTY_IN_INTERFACE)));
}

/// `final abstract` conflicts everywhere; `abstract static` conflicts on
/// callables.
#[test]
fn conflicting_modifiers_are_reported() {
    let m = method(
        ident("run", 2, 24),
        vec![modifier("abstract", 2, 2), modifier("static", 2, 11)],
        ty("void", 2, 19),
        vec![],
        None,
        range(2, 2, 30),
    );
    let root = comp_unit(class(
        ident("C", 1, 21),
        vec![modifier("final", 1, 0), modifier("abstract", 1, 6)],
        vec![m],
        span(1, 0, 3, 1),
    ));

    let result = analyze(Some(&root), URI, None);

    let conflicts: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.code.as_deref() == Some(codes::CONFLICTING_MODIFIERS))
        .collect();
    assert_eq!(conflicts.len(), 2);
}

/// `public Integer Count { get; set; }`
#[test]
fn property_declaration_emits_symbol_and_reference() {
    let prop = property(
        ident("Count", 2, 17),
        vec![modifier("public", 2, 2)],
        ty("Integer", 2, 9),
        range(2, 2, 36),
    );
    let root = comp_unit(class(ident("C", 1, 6), vec![], vec![prop], span(1, 0, 3, 1)));

    let result = analyze(Some(&root), URI, None);

    let property_symbol = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Property)
        .expect("property symbol");
    assert_eq!(property_symbol.name, "Count");
    assert_eq!(property_symbol.type_info().map(|t| t.name.as_str()), Some("Integer"));

    let reference = result
        .table
        .get_all_references()
        .iter()
        .find(|r| r.context == ReferenceContext::PropertyReference)
        .expect("property reference");
    assert_eq!(reference.resolved_symbol_id.as_deref(), Some(property_symbol.id.as_str()));
}

/// `Map<Id, Account> m;` emits generic-argument references.
#[test]
fn generic_arguments_emit_their_own_references() {
    let map_type = ty_generic(
        "Map",
        1,
        0,
        vec![ty("Id", 1, 4), ty("Account", 1, 8)],
        16,
    );
    let root = anon(
        vec![local_var(map_type, vec![declarator(ident("m", 1, 17), None)], range(1, 0, 19))],
        range(1, 0, 19),
    );

    let result = analyze(Some(&root), URI, None);

    let generic_refs: Vec<_> = result
        .table
        .get_all_references()
        .iter()
        .filter(|r| r.context == ReferenceContext::GenericParameterType)
        .collect();
    assert_eq!(generic_refs.len(), 2);
    assert!(generic_refs.iter().all(|r| {
        r.parent_context == Some(ReferenceContext::TypeDeclaration)
    }));

    let variable = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Variable)
        .expect("map variable");
    let type_info = variable.type_info().expect("declared type");
    assert_eq!(type_info.name, "Map");
    assert_eq!(type_info.type_parameters.len(), 2);
    assert!(type_info.type_reference_id.is_some());
}

/// Cast, instanceof, and class-literal sites each emit their tagged
/// reference.
#[test]
fn type_usage_contexts() {
    let root = anon(
        vec![
            expr_stmt(cast(ty("Account", 1, 1), ident_expr("o", 1, 9))),
            expr_stmt(instance_of(ident_expr("o", 2, 0), ty("Contact", 2, 13))),
            expr_stmt(class_literal(ty("Case", 3, 0), range(3, 0, 10))),
        ],
        span(1, 0, 3, 10),
    );

    let result = analyze(Some(&root), URI, None);
    let references = result.table.get_all_references();

    for (name, context) in [
        ("Account", ReferenceContext::CastTypeReference),
        ("Contact", ReferenceContext::InstanceofTypeReference),
        ("Case", ReferenceContext::ClassReference),
    ] {
        assert!(
            references.iter().any(|r| r.name == name && r.context == context),
            "missing {context:?} reference on {name}"
        );
    }
}

/// Inner classes may not nest further or shadow their outer name.
#[test]
fn inner_class_rules() {
    let innermost = class(ident("Deep", 3, 10), vec![], vec![], range(3, 4, 18));
    let inner = class(ident("Inner", 2, 8), vec![], vec![innermost], span(2, 2, 4, 3));
    let shadow = class(ident("Outer", 5, 8), vec![], vec![], range(5, 2, 18));
    let root = comp_unit(class(
        ident("Outer", 1, 6),
        vec![],
        vec![inner, shadow],
        span(1, 0, 6, 1),
    ));

    let result = analyze(Some(&root), URI, None);

    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some(codes::NESTED_INNER_CLASS)));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some(codes::INNER_NAME_MATCHES_OUTER)));
}

/// `enum E { A, A }`
#[test]
fn duplicate_enum_values_are_reported() {
    let root = anon(
        vec![enum_decl(
            ident("E", 1, 5),
            vec![ident("A", 1, 9), ident("A", 1, 12)],
            range(1, 0, 15),
        )],
        range(1, 0, 15),
    );
    let result = analyze(Some(&root), URI, None);

    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some(codes::DUPLICATE_ENUM_VALUE)));
    let values: Vec<_> = result
        .table
        .get_all_symbols()
        .iter()
        .filter(|s| s.kind == SymbolKind::EnumValue)
        .collect();
    assert_eq!(values.len(), 1);
}

/// The line-level scan catches `void`-typed declarations the tree pass
/// may have missed.
#[test]
fn void_line_scan_runs_when_source_is_supplied() {
    let root = anon(vec![], range(1, 0, 1));
    let source = "void broken;\n";
    let result = analyze(Some(&root), URI, Some(source));
    assert!(result.diagnostics.iter().any(|d| d.code.as_deref() == Some(codes::VOID_TYPE)));
}

/// Switch statement well-formedness: missing whens, misplaced else,
/// duplicate values, and literal/type mismatches.
#[test]
fn switch_well_formedness() {
    // switch on v { } with Integer v
    let empty_switch = anon(
        vec![
            local_var(
                ty("Integer", 1, 0),
                vec![declarator(ident("v", 1, 8), None)],
                range(1, 0, 10),
            ),
            switch(ident_expr("v", 2, 10), vec![], range(2, 0, 14)),
        ],
        span(1, 0, 2, 14),
    );
    let result = analyze(Some(&empty_switch), URI, None);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some(codes::SWITCH_WITHOUT_WHEN)));

    // when else first, duplicate value, and a string literal against an
    // Integer switch expression
    let whens = vec![
        when_else(block(vec![], range(2, 14, 17)), range(2, 9, 17)),
        when(
            vec![int_lit("1", 3, 14)],
            block(vec![], range(3, 16, 19)),
            range(3, 9, 19),
        ),
        when(
            vec![int_lit("1", 4, 14)],
            block(vec![], range(4, 16, 19)),
            range(4, 9, 19),
        ),
        when(
            vec![str_lit("x", 5, 14)],
            block(vec![], range(5, 18, 21)),
            range(5, 9, 21),
        ),
    ];
    let root = anon(
        vec![
            local_var(
                ty("Integer", 1, 0),
                vec![declarator(ident("v", 1, 8), None)],
                range(1, 0, 10),
            ),
            switch(ident_expr("v", 2, 4), whens, span(2, 0, 5, 22)),
        ],
        span(1, 0, 5, 22),
    );
    let result = analyze(Some(&root), URI, None);

    for code in [
        codes::WHEN_ELSE_NOT_LAST,
        codes::DUPLICATE_WHEN_VALUE,
        codes::INCOMPATIBLE_WHEN_VALUE,
    ] {
        assert!(
            result.diagnostics.iter().any(|d| d.code.as_deref() == Some(code)),
            "missing {code}"
        );
    }
}

/// A trigger root produces a trigger symbol whose body scopes like a
/// method.
#[test]
fn trigger_unit_scopes_like_a_method_body() {
    let body = block(
        vec![local_var(
            ty("Integer", 2, 2),
            vec![declarator(ident("n", 2, 10), None)],
            range(2, 2, 12),
        )],
        span(1, 40, 3, 1),
    );
    let root = Node::new(
        NodeKind::TriggerUnit {
            name: ident("AccountTrigger", 1, 8),
            object: ident("Account", 1, 26),
            block: Box::new(body),
        },
        span(1, 0, 3, 1),
    );

    let result = analyze(Some(&root), URI, None);

    let trigger = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Trigger)
        .expect("trigger symbol");
    assert_eq!(trigger.name, "AccountTrigger");

    let variable = result
        .table
        .find_symbol_with(|s| s.kind == SymbolKind::Variable)
        .expect("trigger-local variable");
    let parent = variable.parent_id.as_deref().expect("variable parent");
    let parent_symbol = result.table.get_symbol(parent).expect("parent block");
    assert_eq!(parent_symbol.scope_type(), Some(ScopeType::Method));
}
