//! AST node definitions for Apex compilation units.
//!
//! The node set mirrors the grammar productions the semantic analyzer
//! consumes: compilation-unit roots, type and member declarations,
//! control-flow statements, and expression variants including dotted
//! chains and calls. The design favors struct variants with named fields,
//! `Box<Node>` for recursive structure, and cheap clones for analysis
//! tasks.

use apex_position_tracking::Range;
use serde::{Deserialize, Serialize};

/// A name token with its own source range.
///
/// Kept separate from [`Node`] so declarations can expose the identifier
/// range next to the full symbol range without a nested node allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    /// The identifier text as written, possibly dotted (`Outer.Inner`)
    pub text: String,
    /// Range of the token in source
    pub range: Range,
}

impl Identifier {
    /// Creates an identifier token.
    pub fn new(text: impl Into<String>, range: Range) -> Self {
        Self { text: text.into(), range }
    }

    /// True when the text contains a dot, i.e. the name is qualified.
    pub fn is_qualified(&self) -> bool {
        self.text.contains('.')
    }
}

/// A modifier keyword token (`public`, `static`, `final`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// Keyword text as written
    pub text: String,
    /// Range of the keyword in source
    pub range: Range,
}

impl Modifier {
    /// Creates a modifier token.
    pub fn new(text: impl Into<String>, range: Range) -> Self {
        Self { text: text.into(), range }
    }
}

/// An annotation token (`@isTest`, `@AuraEnabled(cacheable=true)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name without the leading `@`
    pub name: String,
    /// Raw `name=value` parameter strings in source order
    pub parameters: Vec<String>,
    /// Range of the whole annotation in source
    pub range: Range,
}

impl Annotation {
    /// Creates a parameterless annotation token.
    pub fn new(name: impl Into<String>, range: Range) -> Self {
        Self { name: name.into(), parameters: Vec::new(), range }
    }
}

/// Literal classification as the parser reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    /// 32-bit integer literal
    Integer,
    /// `L`-suffixed long literal
    Long,
    /// Decimal literal
    Decimal,
    /// Single-quoted string literal
    Str,
    /// `true` / `false`
    Boolean,
    /// `null`
    Null,
}

/// Which property accessor a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorKind {
    /// `get` accessor
    Getter,
    /// `set` accessor
    Setter,
}

/// Core AST node representing one Apex construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// The specific construct and its children
    pub kind: NodeKind,
    /// Full source extent of this construct
    pub location: Range,
}

impl Node {
    /// Creates a new AST node.
    pub fn new(kind: NodeKind, location: Range) -> Self {
        Node { kind, location }
    }

    /// Invokes `f` on each direct child, in source order.
    pub fn for_each_child(&self, mut f: impl FnMut(&Node)) {
        self.visit_children(&mut f);
    }

    fn visit_children(&self, f: &mut impl FnMut(&Node)) {
        use NodeKind::*;
        match &self.kind {
            CompilationUnit { declaration } => f(declaration),
            TriggerUnit { block, .. } => f(block),
            AnonymousBlock { statements } => statements.iter().for_each(f),

            ClassDeclaration { super_class, interfaces, body, .. } => {
                if let Some(sc) = super_class {
                    f(sc);
                }
                interfaces.iter().for_each(&mut *f);
                body.iter().for_each(f);
            }
            InterfaceDeclaration { extends, body, .. } => {
                extends.iter().for_each(&mut *f);
                body.iter().for_each(f);
            }
            EnumDeclaration { .. } => {}

            MethodDeclaration { return_type, parameters, body, .. } => {
                f(return_type);
                parameters.iter().for_each(&mut *f);
                if let Some(b) = body {
                    f(b);
                }
            }
            ConstructorDeclaration { parameters, body, .. } => {
                parameters.iter().for_each(&mut *f);
                f(body);
            }
            InterfaceMethodDeclaration { return_type, parameters, .. } => {
                f(return_type);
                parameters.iter().for_each(f);
            }
            FormalParameter { type_ref, .. } => f(type_ref),
            FieldDeclaration { type_ref, declarators, .. } => {
                f(type_ref);
                declarators.iter().for_each(f);
            }
            PropertyDeclaration { type_ref, getter, setter, .. } => {
                f(type_ref);
                if let Some(g) = getter {
                    f(g);
                }
                if let Some(s) = setter {
                    f(s);
                }
            }
            AccessorBlock { body, .. } => {
                if let Some(b) = body {
                    f(b);
                }
            }
            LocalVariableDeclaration { type_ref, declarators, .. } => {
                f(type_ref);
                declarators.iter().for_each(f);
            }
            VariableDeclarator { initializer, .. } => {
                if let Some(init) = initializer {
                    f(init);
                }
            }

            Block { statements } => statements.iter().for_each(f),
            IfStatement { condition, then_branch, else_branch } => {
                f(condition);
                f(then_branch);
                if let Some(e) = else_branch {
                    f(e);
                }
            }
            WhileStatement { condition, body } => {
                f(condition);
                f(body);
            }
            DoWhileStatement { body, condition } => {
                f(body);
                f(condition);
            }
            ForStatement { init, condition, update, body } => {
                if let Some(i) = init {
                    f(i);
                }
                if let Some(c) = condition {
                    f(c);
                }
                if let Some(u) = update {
                    f(u);
                }
                f(body);
            }
            ForEachStatement { variable, iterable, body } => {
                f(variable);
                f(iterable);
                f(body);
            }
            TryStatement { block, catches, finally_block } => {
                f(block);
                catches.iter().for_each(&mut *f);
                if let Some(fin) = finally_block {
                    f(fin);
                }
            }
            CatchClause { parameter, block } => {
                f(parameter);
                f(block);
            }
            SwitchStatement { expression, whens } => {
                f(expression);
                whens.iter().for_each(f);
            }
            WhenClause { values, block, .. } => {
                values.iter().for_each(&mut *f);
                f(block);
            }
            RunAsStatement { operands, block } => {
                f(operands);
                f(block);
            }
            ReturnStatement { expression } => {
                if let Some(e) = expression {
                    f(e);
                }
            }
            ThrowStatement { expression } => f(expression),
            ExpressionStatement { expression } => f(expression),

            Assignment { lhs, rhs, .. } => {
                f(lhs);
                f(rhs);
            }
            Binary { left, right, .. } => {
                f(left);
                f(right);
            }
            Unary { operand, .. } => f(operand),
            MethodCall { arguments, .. } => f(arguments),
            DotExpression { object, .. } => f(object),
            DotMethodCall { object, arguments, .. } => {
                f(object);
                f(arguments);
            }
            NewExpression { type_ref, arguments } => {
                f(type_ref);
                f(arguments);
            }
            CastExpression { type_ref, expression } => {
                f(type_ref);
                f(expression);
            }
            InstanceOfExpression { expression, type_ref } => {
                f(expression);
                f(type_ref);
            }
            ArrayAccess { array, index } => {
                f(array);
                f(index);
            }
            ClassLiteral { type_ref } => f(type_ref),
            TypeRef { type_arguments, .. } => type_arguments.iter().for_each(f),
            ExpressionList { expressions } => expressions.iter().for_each(f),

            Literal { .. } | Identifier { .. } | This | Super => {}
        }
    }
}

/// The specific type and children of an AST node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    // -------------------------------------------------------------------------
    // Compilation-unit roots
    // -------------------------------------------------------------------------
    /// Class, interface, or enum file root
    CompilationUnit {
        /// The single top-level type declaration
        declaration: Box<Node>,
    },
    /// Trigger file root (`trigger T on Account (before insert) { ... }`)
    TriggerUnit {
        /// Trigger name
        name: Identifier,
        /// The object the trigger fires on
        object: Identifier,
        /// Trigger body block
        block: Box<Node>,
    },
    /// Anonymous-execute root: bare statements with no enclosing type
    AnonymousBlock {
        /// Top-level statements
        statements: Vec<Node>,
    },

    // -------------------------------------------------------------------------
    // Type declarations
    // -------------------------------------------------------------------------
    /// Class declaration, possibly nested inside another class body
    ClassDeclaration {
        /// Class name token
        name: Identifier,
        /// Modifier keywords in source order
        modifiers: Vec<Modifier>,
        /// Annotations in source order
        annotations: Vec<Annotation>,
        /// `extends` clause type reference
        super_class: Option<Box<Node>>,
        /// `implements` clause type references
        interfaces: Vec<Node>,
        /// Member declarations
        body: Vec<Node>,
    },
    /// Interface declaration
    InterfaceDeclaration {
        /// Interface name token
        name: Identifier,
        /// Modifier keywords in source order
        modifiers: Vec<Modifier>,
        /// Annotations in source order
        annotations: Vec<Annotation>,
        /// `extends` clause type references
        extends: Vec<Node>,
        /// Member declarations (interface methods)
        body: Vec<Node>,
    },
    /// Enum declaration
    EnumDeclaration {
        /// Enum name token
        name: Identifier,
        /// Modifier keywords in source order
        modifiers: Vec<Modifier>,
        /// Annotations in source order
        annotations: Vec<Annotation>,
        /// Enum value tokens in declaration order
        values: Vec<Identifier>,
    },

    // -------------------------------------------------------------------------
    // Member declarations
    // -------------------------------------------------------------------------
    /// Method declaration with a return type
    MethodDeclaration {
        /// Method name token
        name: Identifier,
        /// Modifier keywords in source order
        modifiers: Vec<Modifier>,
        /// Annotations in source order
        annotations: Vec<Annotation>,
        /// Declared return type reference (possibly `void`)
        return_type: Box<Node>,
        /// Formal parameters in declaration order
        parameters: Vec<Node>,
        /// Body block; absent on abstract methods
        body: Option<Box<Node>>,
    },
    /// Constructor declaration
    ConstructorDeclaration {
        /// Constructor name token; may be qualified in malformed input
        name: Identifier,
        /// Modifier keywords in source order
        modifiers: Vec<Modifier>,
        /// Annotations in source order
        annotations: Vec<Annotation>,
        /// Formal parameters in declaration order
        parameters: Vec<Node>,
        /// Constructor body block
        body: Box<Node>,
    },
    /// Method signature inside an interface body
    InterfaceMethodDeclaration {
        /// Method name token
        name: Identifier,
        /// Modifier keywords; must be empty in valid Apex
        modifiers: Vec<Modifier>,
        /// Declared return type reference
        return_type: Box<Node>,
        /// Formal parameters in declaration order
        parameters: Vec<Node>,
    },
    /// One formal parameter
    FormalParameter {
        /// Parameter name token
        name: Identifier,
        /// Declared type reference
        type_ref: Box<Node>,
        /// Modifier keywords (`final`)
        modifiers: Vec<Modifier>,
    },
    /// Class-level field declaration; one type, possibly many declarators
    FieldDeclaration {
        /// Modifier keywords in source order
        modifiers: Vec<Modifier>,
        /// Annotations in source order
        annotations: Vec<Annotation>,
        /// Declared type reference shared by all declarators
        type_ref: Box<Node>,
        /// Variable declarators sharing the type
        declarators: Vec<Node>,
    },
    /// Property declaration with optional accessors
    PropertyDeclaration {
        /// Modifier keywords in source order
        modifiers: Vec<Modifier>,
        /// Annotations in source order
        annotations: Vec<Annotation>,
        /// Declared type reference
        type_ref: Box<Node>,
        /// Property name token
        name: Identifier,
        /// `get` accessor block
        getter: Option<Box<Node>>,
        /// `set` accessor block
        setter: Option<Box<Node>>,
    },
    /// A property accessor (`get { ... }`, `set;`)
    AccessorBlock {
        /// Getter or setter
        accessor: AccessorKind,
        /// Accessor body; absent for auto-implemented accessors
        body: Option<Box<Node>>,
    },
    /// Local variable declaration statement
    LocalVariableDeclaration {
        /// Modifier keywords (`final`)
        modifiers: Vec<Modifier>,
        /// Declared type reference shared by all declarators
        type_ref: Box<Node>,
        /// Variable declarators sharing the type
        declarators: Vec<Node>,
    },
    /// One declarator inside a field or local variable declaration
    VariableDeclarator {
        /// Variable name token
        name: Identifier,
        /// Optional initializer expression
        initializer: Option<Box<Node>>,
    },

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------
    /// Brace-delimited statement block
    Block {
        /// Statements in source order
        statements: Vec<Node>,
    },
    /// `if` statement with optional `else`
    IfStatement {
        /// Condition expression
        condition: Box<Node>,
        /// Then branch (block or single statement)
        then_branch: Box<Node>,
        /// Else branch, possibly another `if`
        else_branch: Option<Box<Node>>,
    },
    /// `while` loop
    WhileStatement {
        /// Condition expression
        condition: Box<Node>,
        /// Loop body
        body: Box<Node>,
    },
    /// `do { } while (...)` loop
    DoWhileStatement {
        /// Loop body
        body: Box<Node>,
        /// Condition expression
        condition: Box<Node>,
    },
    /// C-style `for` loop
    ForStatement {
        /// Init clause: a local declaration or an expression list
        init: Option<Box<Node>>,
        /// Condition expression
        condition: Option<Box<Node>>,
        /// Update clause expression list
        update: Option<Box<Node>>,
        /// Loop body
        body: Box<Node>,
    },
    /// Enhanced `for (T x : expr)` loop
    ForEachStatement {
        /// Loop variable declaration
        variable: Box<Node>,
        /// Iterated expression
        iterable: Box<Node>,
        /// Loop body
        body: Box<Node>,
    },
    /// `try` statement
    TryStatement {
        /// Protected block
        block: Box<Node>,
        /// Catch clauses in source order
        catches: Vec<Node>,
        /// Optional `finally` block
        finally_block: Option<Box<Node>>,
    },
    /// One `catch (ExceptionType e)` clause
    CatchClause {
        /// The exception parameter
        parameter: Box<Node>,
        /// Handler block
        block: Box<Node>,
    },
    /// `switch on expr { when ... }` statement
    SwitchStatement {
        /// Switched expression
        expression: Box<Node>,
        /// When clauses in source order
        whens: Vec<Node>,
    },
    /// One `when` branch
    WhenClause {
        /// Matched values; empty for `when else`
        values: Vec<Node>,
        /// Branch body block
        block: Box<Node>,
        /// True for `when else`
        is_else: bool,
    },
    /// `System.runAs(user) { ... }` statement
    RunAsStatement {
        /// Operand expression list
        operands: Box<Node>,
        /// Impersonated block
        block: Box<Node>,
    },
    /// `return` statement
    ReturnStatement {
        /// Returned expression, if any
        expression: Option<Box<Node>>,
    },
    /// `throw` statement
    ThrowStatement {
        /// Thrown expression
        expression: Box<Node>,
    },
    /// Expression used at statement level
    ExpressionStatement {
        /// The wrapped expression
        expression: Box<Node>,
    },

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------
    /// Assignment, simple (`=`) or compound (`+=`, ...)
    Assignment {
        /// Assignment target
        lhs: Box<Node>,
        /// Assigned expression
        rhs: Box<Node>,
        /// Operator text: `=`, `+=`, `-=`, ...
        op: String,
    },
    /// Binary operation
    Binary {
        /// Operator text
        op: String,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// Unary operation
    Unary {
        /// Operator text
        op: String,
        /// Operand
        operand: Box<Node>,
    },
    /// Bare method call (`foo(a, b)`)
    MethodCall {
        /// Called name token
        name: Identifier,
        /// Argument expression list
        arguments: Box<Node>,
    },
    /// Member access (`expr.name`)
    DotExpression {
        /// Qualifier expression
        object: Box<Node>,
        /// Accessed member name token
        property: Identifier,
    },
    /// Dotted method call (`expr.name(a, b)`)
    DotMethodCall {
        /// Qualifier expression
        object: Box<Node>,
        /// Called member name token
        name: Identifier,
        /// Argument expression list
        arguments: Box<Node>,
    },
    /// `new TypeName(args)` expression
    NewExpression {
        /// Constructed type reference
        type_ref: Box<Node>,
        /// Constructor argument list
        arguments: Box<Node>,
    },
    /// `(TypeName) expr` cast
    CastExpression {
        /// Target type reference
        type_ref: Box<Node>,
        /// Cast operand
        expression: Box<Node>,
    },
    /// `expr instanceof TypeName`
    InstanceOfExpression {
        /// Tested expression
        expression: Box<Node>,
        /// Tested-against type reference
        type_ref: Box<Node>,
    },
    /// Array subscript (`expr[index]`)
    ArrayAccess {
        /// Array-valued expression
        array: Box<Node>,
        /// Index expression
        index: Box<Node>,
    },
    /// `TypeName.class` literal
    ClassLiteral {
        /// Referenced type
        type_ref: Box<Node>,
    },
    /// Literal value
    Literal {
        /// Literal classification
        literal: LiteralKind,
        /// Raw literal text (string literals without quotes)
        value: String,
    },
    /// Bare identifier primary
    Identifier {
        /// Identifier text
        name: String,
    },
    /// `this` primary
    This,
    /// `super` primary
    Super,
    /// Type reference: qualified name, generic arguments, array suffix
    TypeRef {
        /// Dotted name segments (`ns`, `Type`)
        names: Vec<Identifier>,
        /// Generic arguments, each a `TypeRef`
        type_arguments: Vec<Node>,
        /// Number of trailing `[]` pairs
        array_dimensions: u32,
    },
    /// Comma-separated expression list: call arguments, `for` init/update
    /// clauses, and `runAs` operands all share this production
    ExpressionList {
        /// Expressions in source order
        expressions: Vec<Node>,
    },
}
