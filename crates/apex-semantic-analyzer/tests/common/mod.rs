//! AST builders shared by the integration tests.
//!
//! The analyzer consumes trees from an external parser; tests construct
//! equivalent trees directly, with coordinates chosen to match the
//! snippet quoted in each test.

#![allow(dead_code)]

use apex_ast::{
    AccessorKind, Annotation, Identifier, LiteralKind, Modifier, Node, NodeKind, Range,
};

pub fn range(line: u32, start: u32, end: u32) -> Range {
    Range::new(line, start, line, end)
}

pub fn span(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Range {
    Range::new(start_line, start_col, end_line, end_col)
}

pub fn ident(text: &str, line: u32, col: u32) -> Identifier {
    Identifier::new(text, range(line, col, col + text.len() as u32))
}

pub fn modifier(text: &str, line: u32, col: u32) -> Modifier {
    Modifier::new(text, range(line, col, col + text.len() as u32))
}

pub fn annotation(name: &str, line: u32, col: u32) -> Annotation {
    Annotation::new(name, range(line, col, col + name.len() as u32 + 1))
}

pub fn ident_expr(name: &str, line: u32, col: u32) -> Node {
    Node::new(
        NodeKind::Identifier { name: name.into() },
        range(line, col, col + name.len() as u32),
    )
}

pub fn this_expr(line: u32, col: u32) -> Node {
    Node::new(NodeKind::This, range(line, col, col + 4))
}

pub fn int_lit(value: &str, line: u32, col: u32) -> Node {
    Node::new(
        NodeKind::Literal { literal: LiteralKind::Integer, value: value.into() },
        range(line, col, col + value.len() as u32),
    )
}

pub fn str_lit(value: &str, line: u32, col: u32) -> Node {
    Node::new(
        NodeKind::Literal { literal: LiteralKind::Str, value: value.into() },
        range(line, col, col + value.len() as u32 + 2),
    )
}

/// Simple unparameterized type reference.
pub fn ty(name: &str, line: u32, col: u32) -> Node {
    let identifier = ident(name, line, col);
    let location = identifier.range;
    Node::new(
        NodeKind::TypeRef { names: vec![identifier], type_arguments: vec![], array_dimensions: 0 },
        location,
    )
}

pub fn ty_generic(name: &str, line: u32, col: u32, arguments: Vec<Node>, end: u32) -> Node {
    Node::new(
        NodeKind::TypeRef {
            names: vec![ident(name, line, col)],
            type_arguments: arguments,
            array_dimensions: 0,
        },
        range(line, col, end),
    )
}

pub fn block(statements: Vec<Node>, location: Range) -> Node {
    Node::new(NodeKind::Block { statements }, location)
}

pub fn expr_stmt(expression: Node) -> Node {
    let location = expression.location;
    Node::new(NodeKind::ExpressionStatement { expression: Box::new(expression) }, location)
}

pub fn return_stmt(expression: Option<Node>, location: Range) -> Node {
    Node::new(NodeKind::ReturnStatement { expression: expression.map(Box::new) }, location)
}

pub fn assign(lhs: Node, op: &str, rhs: Node) -> Node {
    let location = lhs.location.union(rhs.location);
    Node::new(
        NodeKind::Assignment { lhs: Box::new(lhs), rhs: Box::new(rhs), op: op.into() },
        location,
    )
}

pub fn declarator(name: Identifier, initializer: Option<Node>) -> Node {
    let location = initializer
        .as_ref()
        .map(|init| name.range.union(init.location))
        .unwrap_or(name.range);
    Node::new(
        NodeKind::VariableDeclarator { name, initializer: initializer.map(Box::new) },
        location,
    )
}

pub fn local_var(type_ref: Node, declarators: Vec<Node>, location: Range) -> Node {
    Node::new(
        NodeKind::LocalVariableDeclaration {
            modifiers: vec![],
            type_ref: Box::new(type_ref),
            declarators,
        },
        location,
    )
}

pub fn field(
    modifiers: Vec<Modifier>,
    type_ref: Node,
    declarators: Vec<Node>,
    location: Range,
) -> Node {
    Node::new(
        NodeKind::FieldDeclaration {
            modifiers,
            annotations: vec![],
            type_ref: Box::new(type_ref),
            declarators,
        },
        location,
    )
}

pub fn param(name: Identifier, type_ref: Node) -> Node {
    let location = type_ref.location.union(name.range);
    Node::new(
        NodeKind::FormalParameter { name, type_ref: Box::new(type_ref), modifiers: vec![] },
        location,
    )
}

pub fn method(
    name: Identifier,
    modifiers: Vec<Modifier>,
    return_type: Node,
    parameters: Vec<Node>,
    body: Option<Node>,
    location: Range,
) -> Node {
    Node::new(
        NodeKind::MethodDeclaration {
            name,
            modifiers,
            annotations: vec![],
            return_type: Box::new(return_type),
            parameters,
            body: body.map(Box::new),
        },
        location,
    )
}

pub fn constructor(
    name: Identifier,
    modifiers: Vec<Modifier>,
    parameters: Vec<Node>,
    body: Node,
    location: Range,
) -> Node {
    Node::new(
        NodeKind::ConstructorDeclaration {
            name,
            modifiers,
            annotations: vec![],
            parameters,
            body: Box::new(body),
        },
        location,
    )
}

pub fn class(
    name: Identifier,
    modifiers: Vec<Modifier>,
    body: Vec<Node>,
    location: Range,
) -> Node {
    Node::new(
        NodeKind::ClassDeclaration {
            name,
            modifiers,
            annotations: vec![],
            super_class: None,
            interfaces: vec![],
            body,
        },
        location,
    )
}

pub fn interface(
    name: Identifier,
    modifiers: Vec<Modifier>,
    body: Vec<Node>,
    location: Range,
) -> Node {
    Node::new(
        NodeKind::InterfaceDeclaration {
            name,
            modifiers,
            annotations: vec![],
            extends: vec![],
            body,
        },
        location,
    )
}

pub fn enum_decl(
    name: Identifier,
    values: Vec<Identifier>,
    location: Range,
) -> Node {
    Node::new(
        NodeKind::EnumDeclaration { name, modifiers: vec![], annotations: vec![], values },
        location,
    )
}

pub fn property(
    name: Identifier,
    modifiers: Vec<Modifier>,
    type_ref: Node,
    location: Range,
) -> Node {
    let accessor = |kind| {
        Box::new(Node::new(NodeKind::AccessorBlock { accessor: kind, body: None }, location))
    };
    Node::new(
        NodeKind::PropertyDeclaration {
            modifiers,
            annotations: vec![],
            type_ref: Box::new(type_ref),
            name,
            getter: Some(accessor(AccessorKind::Getter)),
            setter: Some(accessor(AccessorKind::Setter)),
        },
        location,
    )
}

pub fn comp_unit(declaration: Node) -> Node {
    let location = declaration.location;
    Node::new(NodeKind::CompilationUnit { declaration: Box::new(declaration) }, location)
}

pub fn anon(statements: Vec<Node>, location: Range) -> Node {
    Node::new(NodeKind::AnonymousBlock { statements }, location)
}

pub fn arg_list(expressions: Vec<Node>, location: Range) -> Node {
    Node::new(NodeKind::ExpressionList { expressions }, location)
}

pub fn dot(object: Node, property: Identifier) -> Node {
    let location = object.location.union(property.range);
    Node::new(NodeKind::DotExpression { object: Box::new(object), property }, location)
}

pub fn dot_call(object: Node, name: Identifier, arguments: Node) -> Node {
    let location = object.location.union(arguments.location);
    Node::new(
        NodeKind::DotMethodCall {
            object: Box::new(object),
            name,
            arguments: Box::new(arguments),
        },
        location,
    )
}

pub fn call(name: Identifier, arguments: Node) -> Node {
    let location = name.range.union(arguments.location);
    Node::new(NodeKind::MethodCall { name, arguments: Box::new(arguments) }, location)
}

pub fn switch(expression: Node, whens: Vec<Node>, location: Range) -> Node {
    Node::new(
        NodeKind::SwitchStatement { expression: Box::new(expression), whens },
        location,
    )
}

pub fn when(values: Vec<Node>, body: Node, location: Range) -> Node {
    Node::new(
        NodeKind::WhenClause { values, block: Box::new(body), is_else: false },
        location,
    )
}

pub fn when_else(body: Node, location: Range) -> Node {
    Node::new(
        NodeKind::WhenClause { values: vec![], block: Box::new(body), is_else: true },
        location,
    )
}

pub fn if_stmt(condition: Node, then_branch: Node, else_branch: Option<Node>, location: Range) -> Node {
    Node::new(
        NodeKind::IfStatement {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        },
        location,
    )
}

pub fn for_stmt(
    init: Option<Node>,
    condition: Option<Node>,
    update: Option<Node>,
    body: Node,
    location: Range,
) -> Node {
    Node::new(
        NodeKind::ForStatement {
            init: init.map(Box::new),
            condition: condition.map(Box::new),
            update: update.map(Box::new),
            body: Box::new(body),
        },
        location,
    )
}

pub fn try_stmt(
    body: Node,
    catches: Vec<Node>,
    finally_block: Option<Node>,
    location: Range,
) -> Node {
    Node::new(
        NodeKind::TryStatement {
            block: Box::new(body),
            catches,
            finally_block: finally_block.map(Box::new),
        },
        location,
    )
}

pub fn catch_clause(parameter: Node, body: Node, location: Range) -> Node {
    Node::new(
        NodeKind::CatchClause { parameter: Box::new(parameter), block: Box::new(body) },
        location,
    )
}

pub fn new_expr(type_ref: Node, arguments: Node) -> Node {
    let location = type_ref.location.union(arguments.location);
    Node::new(
        NodeKind::NewExpression { type_ref: Box::new(type_ref), arguments: Box::new(arguments) },
        location,
    )
}

pub fn cast(type_ref: Node, expression: Node) -> Node {
    let location = type_ref.location.union(expression.location);
    Node::new(
        NodeKind::CastExpression { type_ref: Box::new(type_ref), expression: Box::new(expression) },
        location,
    )
}

pub fn instance_of(expression: Node, type_ref: Node) -> Node {
    let location = expression.location.union(type_ref.location);
    Node::new(
        NodeKind::InstanceOfExpression {
            expression: Box::new(expression),
            type_ref: Box::new(type_ref),
        },
        location,
    )
}

pub fn class_literal(type_ref: Node, location: Range) -> Node {
    Node::new(NodeKind::ClassLiteral { type_ref: Box::new(type_ref) }, location)
}

pub fn unary(op: &str, operand: Node) -> Node {
    let location = operand.location;
    Node::new(NodeKind::Unary { op: op.into(), operand: Box::new(operand) }, location)
}

pub fn array_access(array: Node, index: Node, location: Range) -> Node {
    Node::new(
        NodeKind::ArrayAccess { array: Box::new(array), index: Box::new(index) },
        location,
    )
}
