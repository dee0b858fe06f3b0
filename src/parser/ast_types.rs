//! # AST Types Module
//!
//! This module defines the Abstract Syntax Tree (AST) node types used by the parser.
//! It provides a simplified, serializable representation of the OXC AST that can be
//! easily processed by the binding analyzer.

use oxc_ast::ast as oxc;
use serde::{Deserialize, Serialize};

/// Root program node containing all statements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Program body containing statements
    pub body: Vec<Statement>,
    /// Source type (script or module)
    pub source_type: ProgramSourceType,
}

/// Program source type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProgramSourceType {
    Script,
    Module,
}

/// JavaScript statements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    /// Variable declaration: let, const, var
    VariableDeclaration {
        declarations: Vec<VariableDeclarator>,
        kind: VariableDeclarationKind,
    },
    /// Function declaration
    FunctionDeclaration {
        id: Option<Identifier>,
        params: Vec<Pattern>,
        body: BlockStatement,
        is_async: bool,
        is_generator: bool,
    },
    /// Class declaration
    ClassDeclaration {
        id: Option<Identifier>,
        super_class: Option<Box<Expression>>,
        body: ClassBody,
    },
    /// Expression statement
    ExpressionStatement {
        expression: Expression,
    },
    /// Block statement
    BlockStatement {
        body: Vec<Statement>,
    },
    /// Return statement
    ReturnStatement {
        argument: Option<Expression>,
    },
    /// If statement
    IfStatement {
        test: Expression,
        consequent: Box<Statement>,
        alternate: Option<Box<Statement>>,
    },
    /// While loop
    WhileStatement {
        test: Expression,
        body: Box<Statement>,
    },
    /// For loop
    ForStatement {
        init: Option<ForInit>,
        test: Option<Expression>,
        update: Option<Expression>,
        body: Box<Statement>,
    },
    /// `for-in` / `for-of` loop
    ForInStatement {
        left: ForHeadLeft,
        right: Expression,
        body: Box<Statement>,
        is_of: bool,
    },
    /// `try { } catch (e) { } finally { }`
    TryStatement {
        block: BlockStatement,
        handler: Option<CatchClause>,
        finalizer: Option<BlockStatement>,
    },
    /// `label: statement`
    LabeledStatement {
        label: Identifier,
        body: Box<Statement>,
    },
    /// `with (obj) statement`
    WithStatement {
        object: Expression,
        body: Box<Statement>,
    },
    /// Import declaration (ES6 modules)
    ImportDeclaration {
        specifiers: Vec<ImportSpecifier>,
        source: StringLiteral,
    },
    /// Export declaration (ES6 modules)
    ExportNamedDeclaration {
        declaration: Option<Box<Statement>>,
        specifiers: Vec<ExportSpecifier>,
        source: Option<StringLiteral>,
    },
}

/// Variable declaration kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableDeclarationKind {
    Var,
    Let,
    Const,
}

/// Variable declarator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub id: Pattern,
    pub init: Option<Expression>,
}

/// Block statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
}

/// `catch (param) { body }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: BlockStatement,
}

/// The left-hand side of a `for-in`/`for-of` head
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ForHeadLeft {
    VariableDeclaration {
        kind: VariableDeclarationKind,
        pattern: Pattern,
    },
    Pattern(Pattern),
}

/// Class body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassBody {
    pub body: Vec<ClassElement>,
}

/// Class element (method, property, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClassElement {
    /// Property definition
    PropertyDefinition {
        key: PropertyKey,
        value: Option<Expression>,
        is_static: bool,
        is_private: bool,
    },
    /// Method definition
    MethodDefinition {
        key: PropertyKey,
        value: FunctionExpression,
        kind: MethodKind,
        is_static: bool,
        is_private: bool,
    },
}

/// Method kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

/// For loop initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ForInit {
    VariableDeclaration {
        declarations: Vec<VariableDeclarator>,
        kind: VariableDeclarationKind,
    },
    Expression(Expression),
}

/// Import specifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImportSpecifier {
    ImportDefaultSpecifier {
        local: Identifier,
    },
    ImportNamespaceSpecifier {
        local: Identifier,
    },
    ImportSpecifier {
        imported: Identifier,
        local: Identifier,
    },
}

/// Export specifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExportSpecifier {
    ExportSpecifier {
        local: Identifier,
        exported: Identifier,
    },
}

/// JavaScript expressions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    /// Identifier
    Identifier(Identifier),
    /// Literal values
    Literal(Literal),
    /// Binary expression (a + b, a === b, etc.)
    BinaryExpression {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    /// Unary expression (!a, -a, etc.)
    UnaryExpression {
        operator: UnaryOperator,
        argument: Box<Expression>,
        prefix: bool,
    },
    /// Assignment expression (a = b, a += b, etc.)
    AssignmentExpression {
        left: Box<Expression>,
        operator: AssignmentOperator,
        right: Box<Expression>,
    },
    /// Update expression (++a, a--, etc.)
    UpdateExpression {
        operator: UpdateOperator,
        argument: Box<Expression>,
        prefix: bool,
    },
    /// Function call
    CallExpression {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
    /// Member access (a.b, a[b])
    MemberExpression {
        object: Box<Expression>,
        property: Box<Expression>,
        computed: bool,
    },
    /// Function expression
    FunctionExpression(FunctionExpression),
    /// Arrow function expression
    ArrowFunctionExpression {
        params: Vec<Pattern>,
        body: ArrowFunctionBody,
        is_async: bool,
    },
    /// Object expression
    ObjectExpression {
        properties: Vec<ObjectProperty>,
    },
    /// Array expression
    ArrayExpression {
        elements: Vec<Option<Expression>>,
    },
    /// Template literal
    TemplateLiteral {
        quasis: Vec<TemplateElement>,
        expressions: Vec<Expression>,
    },
    /// Conditional expression (a ? b : c)
    ConditionalExpression {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
}

/// Function expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionExpression {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub is_async: bool,
    pub is_generator: bool,
}

/// Arrow function body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArrowFunctionBody {
    BlockStatement(BlockStatement),
    Expression(Box<Expression>),
}

/// Object property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectProperty {
    Property {
        key: PropertyKey,
        value: Expression,
        kind: PropertyKind,
        method: bool,
        shorthand: bool,
        computed: bool,
    },
    SpreadElement {
        argument: Expression,
    },
}

/// Property kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// Property key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropertyKey {
    Identifier(Identifier),
    Literal(Literal),
    PrivateName(PrivateName),
}

/// Private name (#x)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateName {
    pub name: String,
}

/// Template element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateElement {
    pub value: String,
    pub tail: bool,
}

/// Patterns (for destructuring, parameters, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    Identifier(Identifier),
    ArrayPattern {
        elements: Vec<Option<Pattern>>,
    },
    ObjectPattern {
        properties: Vec<ObjectPatternProperty>,
    },
    AssignmentPattern {
        left: Box<Pattern>,
        right: Expression,
    },
    RestElement {
        argument: Box<Pattern>,
    },
}

impl Pattern {
    /// The identifier this pattern ultimately binds when it is a bare identifier,
    /// possibly wrapped in a default value. Destructuring patterns return `None`
    /// here; callers that need every bound name should walk the pattern instead.
    pub fn as_simple_identifier(&self) -> Option<&Identifier> {
        match self {
            Pattern::Identifier(id) => Some(id),
            Pattern::AssignmentPattern { left, .. } => left.as_simple_identifier(),
            _ => None,
        }
    }
}

/// Object pattern property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectPatternProperty {
    Property {
        key: PropertyKey,
        value: Pattern,
        computed: bool,
        shorthand: bool,
    },
    RestElement {
        argument: Pattern,
    },
}

/// Identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    /// Byte offset of the identifier in the source file; every declaration and
    /// reference site gets its `source_position` from here.
    pub span_start: u32,
}

/// Literal values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Literal {
    /// String literal
    String(StringLiteral),
    /// Number literal
    Number(NumberLiteral),
    /// Boolean literal
    Boolean(BooleanLiteral),
    /// Null literal
    Null,
    /// Regular expression literal
    RegExp(RegExpLiteral),
}

/// String literal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
}

/// Number literal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub value: f64,
}

/// Boolean literal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooleanLiteral {
    pub value: bool,
}

/// Regular expression literal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegExpLiteral {
    pub pattern: String,
    pub flags: String,
}

/// Binary operators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Exponentiation,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    In,
    Instanceof,
}

/// Unary operators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
    LogicalNot,
    BitwiseNot,
    Typeof,
    Void,
    Delete,
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    RemainderAssign,
    ExponentiationAssign,
    LeftShiftAssign,
    RightShiftAssign,
    UnsignedRightShiftAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
    LogicalAndAssign,
    LogicalOrAssign,
    NullishCoalescingAssign,
}

impl AssignmentOperator {
    pub fn is_compound(self) -> bool {
        !matches!(self, AssignmentOperator::Assign)
    }
}

/// Update operators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

impl Program {
    /// Convert from OXC Program to our Program type
    pub fn from_oxc(oxc_program: &oxc::Program<'_>) -> Self {
        let body = oxc_program
            .body
            .iter()
            .filter_map(Statement::from_oxc)
            .collect();

        let source_type = if oxc_program.source_type.is_module() {
            ProgramSourceType::Module
        } else {
            ProgramSourceType::Script
        };

        Self { body, source_type }
    }
}

impl Statement {
    /// Convert from OXC Statement to our Statement type
    pub fn from_oxc(oxc_stmt: &oxc::Statement<'_>) -> Option<Self> {
        match oxc_stmt {
            oxc::Statement::VariableDeclaration(decl) => {
                let kind = VariableDeclarationKind::from_oxc(decl.kind)?;
                let declarations = decl
                    .declarations
                    .iter()
                    .filter_map(VariableDeclarator::from_oxc)
                    .collect();

                Some(Statement::VariableDeclaration { declarations, kind })
            }
            oxc::Statement::FunctionDeclaration(func) => {
                let id = func.id.as_ref().map(Identifier::from_oxc);

                let params = func
                    .params
                    .items
                    .iter()
                    .filter_map(|param| Pattern::from_oxc(&param.pattern))
                    .collect();

                let body = BlockStatement {
                    body: func
                        .body
                        .as_ref()?
                        .statements
                        .iter()
                        .filter_map(Statement::from_oxc)
                        .collect(),
                };

                Some(Statement::FunctionDeclaration {
                    id,
                    params,
                    body,
                    is_async: func.r#async,
                    is_generator: func.generator,
                })
            }
            oxc::Statement::ClassDeclaration(class) => {
                let id = class.id.as_ref().map(Identifier::from_oxc);

                let super_class = class
                    .super_class
                    .as_ref()
                    .and_then(Expression::from_oxc)
                    .map(Box::new);

                let body = ClassBody {
                    body: class
                        .body
                        .body
                        .iter()
                        .filter_map(ClassElement::from_oxc)
                        .collect(),
                };

                Some(Statement::ClassDeclaration {
                    id,
                    super_class,
                    body,
                })
            }
            oxc::Statement::ExpressionStatement(stmt) => {
                Expression::from_oxc(&stmt.expression)
                    .map(|expression| Statement::ExpressionStatement { expression })
            }
            oxc::Statement::BlockStatement(block) => {
                let body = block.body.iter().filter_map(Statement::from_oxc).collect();
                Some(Statement::BlockStatement { body })
            }
            oxc::Statement::ReturnStatement(stmt) => {
                let argument = stmt.argument.as_ref().and_then(Expression::from_oxc);
                Some(Statement::ReturnStatement { argument })
            }
            oxc::Statement::IfStatement(if_stmt) => {
                let test = Expression::from_oxc(&if_stmt.test)?;
                let consequent = Box::new(Statement::from_oxc(&if_stmt.consequent)?);
                let alternate = if_stmt
                    .alternate
                    .as_ref()
                    .and_then(Statement::from_oxc)
                    .map(Box::new);

                Some(Statement::IfStatement {
                    test,
                    consequent,
                    alternate,
                })
            }
            oxc::Statement::WhileStatement(while_stmt) => {
                let test = Expression::from_oxc(&while_stmt.test)?;
                let body = Box::new(Statement::from_oxc(&while_stmt.body)?);

                Some(Statement::WhileStatement { test, body })
            }
            oxc::Statement::ForStatement(for_stmt) => {
                let init = for_stmt.init.as_ref().and_then(|init| {
                    if let Some(expr) = init.as_expression() {
                        Expression::from_oxc(expr).map(ForInit::Expression)
                    } else if let oxc::ForStatementInit::VariableDeclaration(decl) = init {
                        let kind = VariableDeclarationKind::from_oxc(decl.kind)?;
                        let declarations = decl
                            .declarations
                            .iter()
                            .filter_map(VariableDeclarator::from_oxc)
                            .collect();
                        Some(ForInit::VariableDeclaration { declarations, kind })
                    } else {
                        None
                    }
                });

                let test = for_stmt.test.as_ref().and_then(Expression::from_oxc);
                let update = for_stmt.update.as_ref().and_then(Expression::from_oxc);
                let body = Box::new(Statement::from_oxc(&for_stmt.body)?);

                Some(Statement::ForStatement {
                    init,
                    test,
                    update,
                    body,
                })
            }
            oxc::Statement::ForInStatement(for_in) => {
                let left = ForHeadLeft::from_oxc_left(&for_in.left)?;
                let right = Expression::from_oxc(&for_in.right)?;
                let body = Box::new(Statement::from_oxc(&for_in.body)?);

                Some(Statement::ForInStatement {
                    left,
                    right,
                    body,
                    is_of: false,
                })
            }
            oxc::Statement::ForOfStatement(for_of) => {
                let left = ForHeadLeft::from_oxc_left(&for_of.left)?;
                let right = Expression::from_oxc(&for_of.right)?;
                let body = Box::new(Statement::from_oxc(&for_of.body)?);

                Some(Statement::ForInStatement {
                    left,
                    right,
                    body,
                    is_of: true,
                })
            }
            oxc::Statement::TryStatement(try_stmt) => {
                let block = BlockStatement {
                    body: try_stmt
                        .block
                        .body
                        .iter()
                        .filter_map(Statement::from_oxc)
                        .collect(),
                };

                let handler = try_stmt.handler.as_ref().map(|handler| CatchClause {
                    param: handler
                        .param
                        .as_ref()
                        .and_then(|param| Pattern::from_oxc(&param.pattern)),
                    body: BlockStatement {
                        body: handler
                            .body
                            .body
                            .iter()
                            .filter_map(Statement::from_oxc)
                            .collect(),
                    },
                });

                let finalizer = try_stmt.finalizer.as_ref().map(|block| BlockStatement {
                    body: block.body.iter().filter_map(Statement::from_oxc).collect(),
                });

                Some(Statement::TryStatement {
                    block,
                    handler,
                    finalizer,
                })
            }
            oxc::Statement::LabeledStatement(labeled) => {
                let label = Identifier {
                    name: labeled.label.name.to_string(),
                    span_start: labeled.label.span.start,
                };
                let body = Box::new(Statement::from_oxc(&labeled.body)?);
                Some(Statement::LabeledStatement { label, body })
            }
            oxc::Statement::WithStatement(with_stmt) => {
                let object = Expression::from_oxc(&with_stmt.object)?;
                let body = Box::new(Statement::from_oxc(&with_stmt.body)?);
                Some(Statement::WithStatement { object, body })
            }
            oxc::Statement::ImportDeclaration(import) => {
                let source = StringLiteral {
                    value: import.source.value.to_string(),
                };
                let specifiers = import
                    .specifiers
                    .as_ref()
                    .map(|specs| {
                        specs
                            .iter()
                            .filter_map(ImportSpecifier::from_oxc)
                            .collect()
                    })
                    .unwrap_or_default();
                Some(Statement::ImportDeclaration { specifiers, source })
            }
            oxc::Statement::ExportNamedDeclaration(export) => {
                let declaration = export
                    .declaration
                    .as_ref()
                    .and_then(|decl| Statement::from_oxc_declaration(decl))
                    .map(Box::new);
                let specifiers = export
                    .specifiers
                    .iter()
                    .map(|spec| ExportSpecifier::ExportSpecifier {
                        local: Identifier {
                            name: spec.local.name().to_string(),
                            span_start: spec.local.span().start,
                        },
                        exported: Identifier {
                            name: spec.exported.name().to_string(),
                            span_start: spec.exported.span().start,
                        },
                    })
                    .collect();
                Some(Statement::ExportNamedDeclaration {
                    declaration,
                    specifiers,
                    source: None,
                })
            }
            // TODO: switch/do-while/break/continue are not needed by any R1-R5 rule
            // or by the scope classifier; left unconverted.
            _ => None,
        }
    }

    /// `Declaration` is not a `Statement` in OXC; bridge the common cases an
    /// `export` can wrap.
    fn from_oxc_declaration(decl: &oxc::Declaration<'_>) -> Option<Self> {
        match decl {
            oxc::Declaration::VariableDeclaration(var_decl) => {
                let kind = VariableDeclarationKind::from_oxc(var_decl.kind)?;
                let declarations = var_decl
                    .declarations
                    .iter()
                    .filter_map(VariableDeclarator::from_oxc)
                    .collect();
                Some(Statement::VariableDeclaration { declarations, kind })
            }
            oxc::Declaration::FunctionDeclaration(func) => {
                let id = func.id.as_ref().map(Identifier::from_oxc);
                let params = func
                    .params
                    .items
                    .iter()
                    .filter_map(|param| Pattern::from_oxc(&param.pattern))
                    .collect();
                let body = BlockStatement {
                    body: func
                        .body
                        .as_ref()?
                        .statements
                        .iter()
                        .filter_map(Statement::from_oxc)
                        .collect(),
                };
                Some(Statement::FunctionDeclaration {
                    id,
                    params,
                    body,
                    is_async: func.r#async,
                    is_generator: func.generator,
                })
            }
            oxc::Declaration::ClassDeclaration(class) => {
                let id = class.id.as_ref().map(Identifier::from_oxc);
                let super_class = class
                    .super_class
                    .as_ref()
                    .and_then(Expression::from_oxc)
                    .map(Box::new);
                let body = ClassBody {
                    body: class
                        .body
                        .body
                        .iter()
                        .filter_map(ClassElement::from_oxc)
                        .collect(),
                };
                Some(Statement::ClassDeclaration {
                    id,
                    super_class,
                    body,
                })
            }
            _ => None,
        }
    }
}

impl ForHeadLeft {
    fn from_oxc_left(left: &oxc::ForStatementLeft<'_>) -> Option<Self> {
        match left {
            oxc::ForStatementLeft::VariableDeclaration(decl) => {
                let kind = VariableDeclarationKind::from_oxc(decl.kind)?;
                let declarator = decl.declarations.first()?;
                let pattern = Pattern::from_oxc(&declarator.id)?;
                Some(ForHeadLeft::VariableDeclaration { kind, pattern })
            }
            _ => left
                .as_assignment_target()
                .and_then(Pattern::from_assignment_target)
                .map(ForHeadLeft::Pattern),
        }
    }
}

impl VariableDeclarationKind {
    fn from_oxc(kind: oxc::VariableDeclarationKind) -> Option<Self> {
        match kind {
            oxc::VariableDeclarationKind::Var => Some(VariableDeclarationKind::Var),
            oxc::VariableDeclarationKind::Let => Some(VariableDeclarationKind::Let),
            oxc::VariableDeclarationKind::Const => Some(VariableDeclarationKind::Const),
            _ => None,
        }
    }
}

impl VariableDeclarator {
    /// Convert from OXC VariableDeclarator to our VariableDeclarator type
    pub fn from_oxc(oxc_decl: &oxc::VariableDeclarator<'_>) -> Option<Self> {
        let id = Pattern::from_oxc(&oxc_decl.id)?;
        let init = oxc_decl.init.as_ref().and_then(Expression::from_oxc);

        Some(Self { id, init })
    }
}

impl ClassElement {
    /// Convert from OXC ClassElement to our ClassElement type
    pub fn from_oxc(oxc_elem: &oxc::ClassElement<'_>) -> Option<Self> {
        match oxc_elem {
            oxc::ClassElement::PropertyDefinition(prop) => {
                let key = PropertyKey::from_oxc(&prop.key)?;
                let value = prop.value.as_ref().and_then(Expression::from_oxc);
                let is_static = prop.r#static;
                let is_private = matches!(&prop.key, oxc::PropertyKey::PrivateIdentifier(_));

                Some(ClassElement::PropertyDefinition {
                    key,
                    value,
                    is_static,
                    is_private,
                })
            }
            oxc::ClassElement::MethodDefinition(method) => {
                let key = PropertyKey::from_oxc(&method.key)?;
                let value = FunctionExpression::from_oxc(&method.value)?;
                let kind = match method.kind {
                    oxc::MethodDefinitionKind::Constructor => MethodKind::Constructor,
                    oxc::MethodDefinitionKind::Method => MethodKind::Method,
                    oxc::MethodDefinitionKind::Get => MethodKind::Get,
                    oxc::MethodDefinitionKind::Set => MethodKind::Set,
                };
                let is_static = method.r#static;
                let is_private = matches!(&method.key, oxc::PropertyKey::PrivateIdentifier(_));

                Some(ClassElement::MethodDefinition {
                    key,
                    value,
                    kind,
                    is_static,
                    is_private,
                })
            }
            _ => None,
        }
    }
}

impl Expression {
    /// Convert from OXC Expression to our Expression type
    pub fn from_oxc(oxc_expr: &oxc::Expression<'_>) -> Option<Self> {
        match oxc_expr {
            oxc::Expression::Identifier(id) => Some(Expression::Identifier(Identifier {
                name: id.name.to_string(),
                span_start: id.span.start,
            })),
            oxc::Expression::NumericLiteral(lit) => {
                Some(Expression::Literal(Literal::Number(NumberLiteral {
                    value: lit.value,
                })))
            }
            oxc::Expression::StringLiteral(lit) => {
                Some(Expression::Literal(Literal::String(StringLiteral {
                    value: lit.value.to_string(),
                })))
            }
            oxc::Expression::BooleanLiteral(lit) => {
                Some(Expression::Literal(Literal::Boolean(BooleanLiteral {
                    value: lit.value,
                })))
            }
            oxc::Expression::NullLiteral(_) => Some(Expression::Literal(Literal::Null)),
            oxc::Expression::BinaryExpression(expr) => {
                let left = Box::new(Expression::from_oxc(&expr.left)?);
                let right = Box::new(Expression::from_oxc(&expr.right)?);
                let operator = BinaryOperator::from_oxc(expr.operator)?;

                Some(Expression::BinaryExpression {
                    left,
                    operator,
                    right,
                })
            }
            oxc::Expression::UnaryExpression(expr) => {
                let argument = Box::new(Expression::from_oxc(&expr.argument)?);
                let operator = UnaryOperator::from_oxc(expr.operator)?;
                Some(Expression::UnaryExpression {
                    operator,
                    argument,
                    prefix: true,
                })
            }
            oxc::Expression::AssignmentExpression(expr) => {
                let left = Box::new(Expression::from_assignment_target(&expr.left)?);
                let right = Box::new(Expression::from_oxc(&expr.right)?);
                let operator = AssignmentOperator::from_oxc(expr.operator)?;
                Some(Expression::AssignmentExpression {
                    left,
                    operator,
                    right,
                })
            }
            oxc::Expression::UpdateExpression(expr) => {
                let argument = Box::new(Expression::from_simple_assignment_target(&expr.argument)?);
                let operator = match expr.operator {
                    oxc::UpdateOperator::Increment => UpdateOperator::Increment,
                    oxc::UpdateOperator::Decrement => UpdateOperator::Decrement,
                };
                Some(Expression::UpdateExpression {
                    operator,
                    argument,
                    prefix: expr.prefix,
                })
            }
            oxc::Expression::TemplateLiteral(tmpl) => {
                let quasis = tmpl
                    .quasis
                    .iter()
                    .map(|quasi| TemplateElement {
                        value: quasi.value.raw.to_string(),
                        tail: quasi.tail,
                    })
                    .collect();

                let expressions = tmpl
                    .expressions
                    .iter()
                    .filter_map(Expression::from_oxc)
                    .collect();

                Some(Expression::TemplateLiteral {
                    quasis,
                    expressions,
                })
            }
            oxc::Expression::FunctionExpression(func) => Some(Expression::FunctionExpression(
                FunctionExpression::from_oxc(func)?,
            )),
            oxc::Expression::ArrowFunctionExpression(arrow) => {
                let params = arrow
                    .params
                    .items
                    .iter()
                    .filter_map(|param| Pattern::from_oxc(&param.pattern))
                    .collect();

                let body = if arrow.expression {
                    let expr_stmt = arrow.body.statements.first()?;
                    if let oxc::Statement::ExpressionStatement(stmt) = expr_stmt {
                        ArrowFunctionBody::Expression(Box::new(Expression::from_oxc(
                            &stmt.expression,
                        )?))
                    } else {
                        return None;
                    }
                } else {
                    ArrowFunctionBody::BlockStatement(BlockStatement {
                        body: arrow
                            .body
                            .statements
                            .iter()
                            .filter_map(Statement::from_oxc)
                            .collect(),
                    })
                };

                Some(Expression::ArrowFunctionExpression {
                    params,
                    body,
                    is_async: arrow.r#async,
                })
            }
            oxc::Expression::CallExpression(call) => {
                let callee = Box::new(Expression::from_oxc(&call.callee)?);
                let arguments = call
                    .arguments
                    .iter()
                    .filter_map(|arg| {
                        if let Some(expr) = arg.as_expression() {
                            Expression::from_oxc(expr)
                        } else {
                            None // Skip spread arguments for now
                        }
                    })
                    .collect();

                Some(Expression::CallExpression { callee, arguments })
            }
            oxc::Expression::StaticMemberExpression(member) => {
                let object = Box::new(Expression::from_oxc(&member.object)?);
                let property = Box::new(Expression::Identifier(Identifier {
                    name: member.property.name.to_string(),
                    span_start: member.property.span.start,
                }));
                Some(Expression::MemberExpression {
                    object,
                    property,
                    computed: false,
                })
            }
            oxc::Expression::ComputedMemberExpression(member) => {
                let object = Box::new(Expression::from_oxc(&member.object)?);
                let property = Box::new(Expression::from_oxc(&member.expression)?);
                Some(Expression::MemberExpression {
                    object,
                    property,
                    computed: true,
                })
            }
            oxc::Expression::ObjectExpression(obj) => {
                let properties = obj
                    .properties
                    .iter()
                    .filter_map(ObjectProperty::from_oxc)
                    .collect();
                Some(Expression::ObjectExpression { properties })
            }
            oxc::Expression::ArrayExpression(arr) => {
                let elements = arr
                    .elements
                    .iter()
                    .map(|el| {
                        if let Some(expr) = el.as_expression() {
                            Expression::from_oxc(expr)
                        } else {
                            None
                        }
                    })
                    .collect();
                Some(Expression::ArrayExpression { elements })
            }
            oxc::Expression::ConditionalExpression(cond) => {
                let test = Box::new(Expression::from_oxc(&cond.test)?);
                let consequent = Box::new(Expression::from_oxc(&cond.consequent)?);
                let alternate = Box::new(Expression::from_oxc(&cond.alternate)?);
                Some(Expression::ConditionalExpression {
                    test,
                    consequent,
                    alternate,
                })
            }
            oxc::Expression::RegExpLiteral(regex) => {
                Some(Expression::Literal(Literal::RegExp(RegExpLiteral {
                    pattern: regex.regex.pattern.to_string(),
                    flags: regex.regex.flags.to_string(),
                })))
            }
            oxc::Expression::ParenthesizedExpression(paren) => Expression::from_oxc(&paren.expression),
            // TODO: sequence/new/spread-in-call/tagged-template are not needed by
            // any R1-R5 rule; left unconverted.
            _ => None,
        }
    }

    /// Bridges OXC's `AssignmentTarget` (the LHS of `=`) back into an expression
    /// shape, so the existing `AssignmentExpression::left` field (which predates
    /// this bridging and is typed as `Expression`) keeps working for both plain
    /// identifier and member-expression targets. Destructuring assignment targets
    /// degrade to `None` (not needed by any R1-R5 rule: destructuring *declarations*
    /// are handled via `Pattern`, destructuring *assignment* to existing bindings
    /// is out of scope here).
    fn from_assignment_target(target: &oxc::AssignmentTarget<'_>) -> Option<Self> {
        match target {
            oxc::AssignmentTarget::AssignmentTargetIdentifier(id) => {
                Some(Expression::Identifier(Identifier {
                    name: id.name.to_string(),
                    span_start: id.span.start,
                }))
            }
            oxc::AssignmentTarget::StaticMemberExpression(member) => {
                let object = Box::new(Expression::from_oxc(&member.object)?);
                let property = Box::new(Expression::Identifier(Identifier {
                    name: member.property.name.to_string(),
                    span_start: member.property.span.start,
                }));
                Some(Expression::MemberExpression {
                    object,
                    property,
                    computed: false,
                })
            }
            oxc::AssignmentTarget::ComputedMemberExpression(member) => {
                let object = Box::new(Expression::from_oxc(&member.object)?);
                let property = Box::new(Expression::from_oxc(&member.expression)?);
                Some(Expression::MemberExpression {
                    object,
                    property,
                    computed: true,
                })
            }
            _ => None,
        }
    }

    fn from_simple_assignment_target(target: &oxc::SimpleAssignmentTarget<'_>) -> Option<Self> {
        match target {
            oxc::SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
                Some(Expression::Identifier(Identifier {
                    name: id.name.to_string(),
                    span_start: id.span.start,
                }))
            }
            _ => None,
        }
    }
}

impl Pattern {
    /// Convert from OXC BindingPattern to our Pattern type
    pub fn from_oxc(oxc_pattern: &oxc::BindingPattern<'_>) -> Option<Self> {
        match &oxc_pattern.kind {
            oxc::BindingPatternKind::BindingIdentifier(id) => {
                Some(Pattern::Identifier(Identifier::from_oxc(id)))
            }
            oxc::BindingPatternKind::ArrayPattern(arr) => {
                let mut elements: Vec<Option<Pattern>> = arr
                    .elements
                    .iter()
                    .map(|el| el.as_ref().and_then(Pattern::from_oxc))
                    .collect();
                if let Some(rest) = &arr.rest
                    && let Some(inner) = Pattern::from_oxc(&rest.argument)
                {
                    elements.push(Some(Pattern::RestElement {
                        argument: Box::new(inner),
                    }));
                }
                Some(Pattern::ArrayPattern { elements })
            }
            oxc::BindingPatternKind::ObjectPattern(obj) => {
                let mut properties: Vec<ObjectPatternProperty> = obj
                    .properties
                    .iter()
                    .filter_map(|prop| {
                        let key = PropertyKey::from_oxc(&prop.key)?;
                        let value = Pattern::from_oxc(&prop.value)?;
                        Some(ObjectPatternProperty::Property {
                            key,
                            value,
                            computed: prop.computed,
                            shorthand: prop.shorthand,
                        })
                    })
                    .collect();
                if let Some(rest) = &obj.rest {
                    if let Some(argument) = Pattern::from_oxc(&rest.argument) {
                        properties.push(ObjectPatternProperty::RestElement { argument });
                    }
                }
                Some(Pattern::ObjectPattern { properties })
            }
            oxc::BindingPatternKind::AssignmentPattern(assign) => {
                let left = Box::new(Pattern::from_oxc(&assign.left)?);
                let right = Expression::from_oxc(&assign.right)?;
                Some(Pattern::AssignmentPattern { left, right })
            }
        }
    }

    /// Convert an OXC assignment-target pattern (`for (x in y)`, `for ({a} of b)`)
    /// into our `Pattern`. Only the identifier case is handled; destructuring
    /// assignment targets in loop headers are rare enough, and not exercised by
    /// any R1-R5 rule, to skip for now.
    fn from_assignment_target(target: &oxc::AssignmentTarget<'_>) -> Option<Self> {
        match target {
            oxc::AssignmentTarget::AssignmentTargetIdentifier(id) => {
                Some(Pattern::Identifier(Identifier {
                    name: id.name.to_string(),
                    span_start: id.span.start,
                }))
            }
            _ => None,
        }
    }
}

impl Identifier {
    /// Convert from OXC BindingIdentifier to our Identifier type
    pub fn from_oxc(oxc_id: &oxc::BindingIdentifier<'_>) -> Self {
        Self {
            name: oxc_id.name.to_string(),
            span_start: oxc_id.span.start,
        }
    }
}

impl BinaryOperator {
    /// Convert from OXC BinaryOperator to our BinaryOperator type
    pub fn from_oxc(oxc_op: oxc::BinaryOperator) -> Option<Self> {
        match oxc_op {
            oxc::BinaryOperator::Addition => Some(BinaryOperator::Add),
            oxc::BinaryOperator::Subtraction => Some(BinaryOperator::Subtract),
            oxc::BinaryOperator::Multiplication => Some(BinaryOperator::Multiply),
            oxc::BinaryOperator::Division => Some(BinaryOperator::Divide),
            oxc::BinaryOperator::Remainder => Some(BinaryOperator::Remainder),
            oxc::BinaryOperator::Exponential => Some(BinaryOperator::Exponentiation),
            oxc::BinaryOperator::Equality => Some(BinaryOperator::Equal),
            oxc::BinaryOperator::Inequality => Some(BinaryOperator::NotEqual),
            oxc::BinaryOperator::StrictEquality => Some(BinaryOperator::StrictEqual),
            oxc::BinaryOperator::StrictInequality => Some(BinaryOperator::StrictNotEqual),
            oxc::BinaryOperator::LessThan => Some(BinaryOperator::LessThan),
            oxc::BinaryOperator::LessEqualThan => Some(BinaryOperator::LessThanEqual),
            oxc::BinaryOperator::GreaterThan => Some(BinaryOperator::GreaterThan),
            oxc::BinaryOperator::GreaterEqualThan => Some(BinaryOperator::GreaterThanEqual),
            oxc::BinaryOperator::ShiftLeft => Some(BinaryOperator::LeftShift),
            oxc::BinaryOperator::ShiftRight => Some(BinaryOperator::RightShift),
            oxc::BinaryOperator::ShiftRightZeroFill => Some(BinaryOperator::UnsignedRightShift),
            oxc::BinaryOperator::BitwiseAnd => Some(BinaryOperator::BitwiseAnd),
            oxc::BinaryOperator::BitwiseOR => Some(BinaryOperator::BitwiseOr),
            oxc::BinaryOperator::BitwiseXOR => Some(BinaryOperator::BitwiseXor),
            oxc::BinaryOperator::In => Some(BinaryOperator::In),
            oxc::BinaryOperator::Instanceof => Some(BinaryOperator::Instanceof),
            _ => None,
        }
    }
}

impl UnaryOperator {
    fn from_oxc(op: oxc::UnaryOperator) -> Option<Self> {
        match op {
            oxc::UnaryOperator::UnaryPlus => Some(UnaryOperator::Plus),
            oxc::UnaryOperator::UnaryNegation => Some(UnaryOperator::Minus),
            oxc::UnaryOperator::LogicalNot => Some(UnaryOperator::LogicalNot),
            oxc::UnaryOperator::BitwiseNot => Some(UnaryOperator::BitwiseNot),
            oxc::UnaryOperator::Typeof => Some(UnaryOperator::Typeof),
            oxc::UnaryOperator::Void => Some(UnaryOperator::Void),
            oxc::UnaryOperator::Delete => Some(UnaryOperator::Delete),
        }
    }
}

impl AssignmentOperator {
    fn from_oxc(op: oxc::AssignmentOperator) -> Option<Self> {
        match op {
            oxc::AssignmentOperator::Assign => Some(AssignmentOperator::Assign),
            oxc::AssignmentOperator::Addition => Some(AssignmentOperator::AddAssign),
            oxc::AssignmentOperator::Subtraction => Some(AssignmentOperator::SubtractAssign),
            oxc::AssignmentOperator::Multiplication => Some(AssignmentOperator::MultiplyAssign),
            oxc::AssignmentOperator::Division => Some(AssignmentOperator::DivideAssign),
            oxc::AssignmentOperator::Remainder => Some(AssignmentOperator::RemainderAssign),
            oxc::AssignmentOperator::Exponential => Some(AssignmentOperator::ExponentiationAssign),
            oxc::AssignmentOperator::ShiftLeft => Some(AssignmentOperator::LeftShiftAssign),
            oxc::AssignmentOperator::ShiftRight => Some(AssignmentOperator::RightShiftAssign),
            oxc::AssignmentOperator::ShiftRightZeroFill => {
                Some(AssignmentOperator::UnsignedRightShiftAssign)
            }
            oxc::AssignmentOperator::BitwiseAnd => Some(AssignmentOperator::BitwiseAndAssign),
            oxc::AssignmentOperator::BitwiseOR => Some(AssignmentOperator::BitwiseOrAssign),
            oxc::AssignmentOperator::BitwiseXOR => Some(AssignmentOperator::BitwiseXorAssign),
            oxc::AssignmentOperator::LogicalAnd => Some(AssignmentOperator::LogicalAndAssign),
            oxc::AssignmentOperator::LogicalOr => Some(AssignmentOperator::LogicalOrAssign),
            oxc::AssignmentOperator::LogicalNullish => {
                Some(AssignmentOperator::NullishCoalescingAssign)
            }
        }
    }
}

impl ImportSpecifier {
    fn from_oxc(spec: &oxc::ImportDeclarationSpecifier<'_>) -> Option<Self> {
        match spec {
            oxc::ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                Some(ImportSpecifier::ImportDefaultSpecifier {
                    local: Identifier::from_oxc(&s.local),
                })
            }
            oxc::ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                Some(ImportSpecifier::ImportNamespaceSpecifier {
                    local: Identifier::from_oxc(&s.local),
                })
            }
            oxc::ImportDeclarationSpecifier::ImportSpecifier(s) => {
                Some(ImportSpecifier::ImportSpecifier {
                    imported: Identifier {
                        name: s.imported.name().to_string(),
                        span_start: s.imported.span().start,
                    },
                    local: Identifier::from_oxc(&s.local),
                })
            }
        }
    }
}

impl PropertyKey {
    /// Convert from OXC PropertyKey to our PropertyKey type
    pub fn from_oxc(oxc_key: &oxc::PropertyKey<'_>) -> Option<Self> {
        match oxc_key {
            oxc::PropertyKey::Identifier(id) => Some(PropertyKey::Identifier(Identifier {
                name: id.name.to_string(),
                span_start: id.span.start,
            })),
            oxc::PropertyKey::PrivateIdentifier(private) => {
                Some(PropertyKey::PrivateName(PrivateName {
                    name: private.name.to_string(),
                }))
            }
            oxc::PropertyKey::StringLiteral(lit) => {
                Some(PropertyKey::Literal(Literal::String(StringLiteral {
                    value: lit.value.to_string(),
                })))
            }
            oxc::PropertyKey::NumericLiteral(lit) => {
                Some(PropertyKey::Literal(Literal::Number(NumberLiteral {
                    value: lit.value,
                })))
            }
            _ => {
                // Computed property keys whose expression isn't a literal carry no
                // stable name; treated as an opaque, unnamed key.
                Some(PropertyKey::Literal(Literal::Null))
            }
        }
    }
}

impl ObjectProperty {
    fn from_oxc(prop: &oxc::ObjectPropertyKind<'_>) -> Option<Self> {
        match prop {
            oxc::ObjectPropertyKind::ObjectProperty(p) => {
                let key = PropertyKey::from_oxc(&p.key)?;
                let value = Expression::from_oxc(&p.value)?;
                let kind = match p.kind {
                    oxc::PropertyKind::Init => PropertyKind::Init,
                    oxc::PropertyKind::Get => PropertyKind::Get,
                    oxc::PropertyKind::Set => PropertyKind::Set,
                };
                Some(ObjectProperty::Property {
                    key,
                    value,
                    kind,
                    method: p.method,
                    shorthand: p.shorthand,
                    computed: p.computed,
                })
            }
            oxc::ObjectPropertyKind::SpreadProperty(spread) => {
                let argument = Expression::from_oxc(&spread.argument)?;
                Some(ObjectProperty::SpreadElement { argument })
            }
        }
    }
}

impl FunctionExpression {
    /// Convert from OXC Function to our FunctionExpression type
    pub fn from_oxc(oxc_func: &oxc::Function<'_>) -> Option<Self> {
        let id = oxc_func.id.as_ref().map(Identifier::from_oxc);

        let params = oxc_func
            .params
            .items
            .iter()
            .filter_map(|param| Pattern::from_oxc(&param.pattern))
            .collect();

        let body = BlockStatement {
            body: oxc_func
                .body
                .as_ref()?
                .statements
                .iter()
                .filter_map(Statement::from_oxc)
                .collect(),
        };

        Some(FunctionExpression {
            id,
            params,
            body,
            is_async: oxc_func.r#async,
            is_generator: oxc_func.generator,
        })
    }
}
