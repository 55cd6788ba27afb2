use std::collections::{HashMap, HashSet};

use crate::{
    ast::{
        ast::{Expr, IdentProd, Program, Stmt},
        expressions::{ArrayLiteral, FnCall, Identifier, InfixExpr, Literal, LiteralValue, PostfixExpr, PrefixExpr},
        statements::{Assignment, Block, Class, Declaration, ForInit, ForUpdate, Function, Return},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{DataType, Token, TokenKind},
    Span,
};

use super::signatures::{builtin_method, is_numeric_like, is_similar_type, Callable, Member, Signatures};

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub data_type: DataType,
    pub is_const: bool,
    pub declared_at: Span,
}

/// Variables visible in one block. Copied on entering a nested block.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variable_lookup: im::HashMap<String, Variable>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// Keeps the first declaration of a name; duplicates were already
    /// reported during name resolution.
    pub fn declare_variable(&mut self, name: &str, variable: Variable) {
        if !self.variable_lookup.contains_key(name) {
            self.variable_lookup.insert(name.to_string(), variable);
        }
    }

    pub fn get_variable(&self, name: &str) -> Option<&Variable> {
        self.variable_lookup.get(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeCheckResult {
    pub errors: Vec<Error>,
    /// Resolved type of every declaration value and assignment right-hand
    /// side, keyed by the value's span.
    pub annotations: HashMap<Span, DataType>,
}

#[derive(Debug)]
pub struct TypeChecker {
    pub signatures: Signatures,
    pub errors: Vec<Error>,
    pub annotations: HashMap<Span, DataType>,
    /// Declaration sites of variables currently holding a value
    initialized: HashSet<Span>,
    current_class: Option<String>,
    current_function: Option<(String, DataType)>,
}

impl TypeChecker {
    pub fn new(signatures: Signatures) -> Self {
        TypeChecker {
            signatures,
            errors: vec![],
            annotations: HashMap::new(),
            initialized: HashSet::new(),
            current_class: None,
            current_function: None,
        }
    }

    fn error(&mut self, error: ErrorImpl, span: Span) {
        log::trace!("type error at {}: {}", span.start, error);
        self.errors.push(Error::new(error, span));
    }

    fn annotate(&mut self, span: Span, data_type: &DataType) {
        self.annotations.insert(span, data_type.clone());
    }

    pub fn is_initialized(&self, variable: &Variable) -> bool {
        self.initialized.contains(&variable.declared_at)
    }

    fn set_initialized(&mut self, declared_at: Span, initialized: bool) {
        if initialized {
            self.initialized.insert(declared_at);
        } else {
            self.initialized.remove(&declared_at);
        }
    }

    fn role_mismatch(&mut self, name: &Identifier, expected: &str, actual: &str) -> DataType {
        self.error(
            ErrorImpl::MemberRoleMismatchError {
                name: name.name.clone(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            },
            name.span,
        );
        DataType::san()
    }

    fn class_member(&self, name: &str) -> Option<Member> {
        let class = self.current_class.as_ref()?;
        self.signatures.member(class, name).cloned()
    }
}

fn literal_type(literal: &Literal) -> DataType {
    match literal.value {
        LiteralValue::Int(_) => DataType::chan(),
        LiteralValue::Float(_) => DataType::kun(),
        LiteralValue::Str(_) => DataType::senpai(),
        LiteralValue::Bool(_) => DataType::sama(),
        LiteralValue::Nuww => DataType::san(),
    }
}

/// Checks that every operand is numeric. A `san` operand fails silently.
fn check_numeric_operands(
    type_checker: &mut TypeChecker,
    operator: &Token,
    operands: &[(&DataType, Span)],
) -> bool {
    let mut valid = true;

    for (operand, span) in operands.iter() {
        if operand.is_void() {
            valid = false;
        } else if !is_numeric_like(operand) {
            type_checker.error(
                ErrorImpl::InvalidOperandError {
                    operator: operator.lexeme.clone(),
                    operand: operand.to_string(),
                },
                *span,
            );
            valid = false;
        }
    }

    valid
}

/// `kun` if either side is `kun`, otherwise `chan`.
fn arithmetic_result(
    type_checker: &mut TypeChecker,
    operator: &Token,
    left: (&DataType, Span),
    right: (&DataType, Span),
) -> DataType {
    if !check_numeric_operands(type_checker, operator, &[left, right]) {
        return DataType::san();
    }

    if left.0.kind == TokenKind::Kun || right.0.kind == TokenKind::Kun {
        DataType::kun()
    } else {
        DataType::chan()
    }
}

fn type_check_prefix(type_checker: &mut TypeChecker, env: &Environment, prefix: &PrefixExpr) -> DataType {
    let right = type_check_expr(type_checker, env, &prefix.right);

    match prefix.operator.kind {
        TokenKind::Not => DataType::sama(),
        _ => {
            if !check_numeric_operands(type_checker, &prefix.operator, &[(&right, prefix.right.span())]) {
                DataType::san()
            } else if right.kind == TokenKind::Kun {
                right
            } else {
                DataType::chan()
            }
        }
    }
}

fn type_check_infix(type_checker: &mut TypeChecker, env: &Environment, infix: &InfixExpr) -> DataType {
    let left = type_check_expr(type_checker, env, &infix.left);
    let right = type_check_expr(type_checker, env, &infix.right);
    let operands = [(&left, infix.left.span()), (&right, infix.right.span())];

    match infix.operator.kind {
        TokenKind::Ampersand => DataType::senpai(),
        TokenKind::Equals | TokenKind::NotEquals | TokenKind::And | TokenKind::Or => DataType::sama(),
        TokenKind::Less | TokenKind::LessEquals | TokenKind::Greater | TokenKind::GreaterEquals => {
            if check_numeric_operands(type_checker, &infix.operator, &operands) {
                DataType::sama()
            } else {
                DataType::san()
            }
        }
        _ => arithmetic_result(type_checker, &infix.operator, operands[0], operands[1]),
    }
}

fn type_check_postfix(type_checker: &mut TypeChecker, env: &Environment, postfix: &PostfixExpr) -> DataType {
    if !postfix.target.is_assignable() {
        let operand = type_check_prod(type_checker, env, &postfix.target);
        type_checker.error(
            ErrorImpl::InvalidOperandError {
                operator: postfix.operator.lexeme.clone(),
                operand: operand.to_string(),
            },
            postfix.target.span(),
        );
        return DataType::san();
    }

    let target = type_check_target(type_checker, env, &postfix.target);
    if !check_numeric_operands(type_checker, &postfix.operator, &[(&target, postfix.target.span())]) {
        return DataType::san();
    }

    if target.kind == TokenKind::Kun {
        target
    } else {
        DataType::chan()
    }
}

/// Elements must agree after their own nested levels are resolved. Empty
/// nested literals fit any array element.
fn type_check_array(type_checker: &mut TypeChecker, env: &Environment, array: &ArrayLiteral) -> DataType {
    if array.elements.is_empty() {
        return DataType::empty_array(1);
    }

    let types = array
        .elements
        .iter()
        .map(|element| type_check_expr(type_checker, env, element))
        .collect::<Vec<DataType>>();

    if types.iter().any(|data_type| data_type.is_void()) {
        return DataType::san();
    }

    let concrete = types
        .iter()
        .filter(|data_type| !data_type.is_empty_array())
        .collect::<Vec<&DataType>>();

    let Some(first) = concrete.first() else {
        let deepest = types.iter().map(|data_type| data_type.dimension).max().unwrap_or(0);
        return DataType::empty_array(deepest + 1);
    };

    let uniform = concrete.iter().all(|data_type| data_type == first)
        && types
            .iter()
            .filter(|data_type| data_type.is_empty_array())
            .all(|empty| empty.dimension <= first.dimension);

    if uniform {
        return first.to_arr_type(1);
    }

    let mut names: Vec<String> = vec![];
    for data_type in types.iter() {
        let name = data_type.to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    type_checker.error(ErrorImpl::HeterogeneousArrayError { types: names }, array.span);
    DataType::san()
}

pub fn type_check_expr(type_checker: &mut TypeChecker, env: &Environment, expr: &Expr) -> DataType {
    match expr {
        Expr::Literal(literal) => literal_type(literal),
        Expr::StringFmt(fmt) => {
            for expr in fmt.expressions() {
                type_check_expr(type_checker, env, expr);
            }
            DataType::senpai()
        }
        Expr::Input(input) => {
            if let Some(prompt) = &input.prompt {
                type_check_expr(type_checker, env, prompt);
            }
            DataType::input()
        }
        Expr::Array(array) => type_check_array(type_checker, env, array),
        Expr::Prefix(prefix) => type_check_prefix(type_checker, env, prefix),
        Expr::Infix(infix) => type_check_infix(type_checker, env, infix),
        Expr::Postfix(postfix) => type_check_postfix(type_checker, env, postfix),
        Expr::Ident(prod) => type_check_prod(type_checker, env, prod),
    }
}

fn type_check_exprs(type_checker: &mut TypeChecker, env: &Environment, exprs: &[Expr]) -> Vec<(DataType, Span)> {
    exprs
        .iter()
        .map(|expr| (type_check_expr(type_checker, env, expr), expr.span()))
        .collect()
}

/// Compares arguments position-wise and reports every mismatch in one
/// error. Yields the callable's return type either way.
fn check_args(
    type_checker: &mut TypeChecker,
    callee: &str,
    callable: &Callable,
    args: &[(DataType, Span)],
    receiver: Option<&DataType>,
    span: Span,
) -> DataType {
    let mut mismatches = vec![];

    if args.len() == callable.params.len() {
        for (position, ((arg, _), param)) in args.iter().zip(callable.params.iter()).enumerate() {
            let accepted = param
                .resolve(receiver)
                .iter()
                .any(|expected| is_similar_type(arg, expected, true));

            if !accepted {
                mismatches.push(format!(
                    "argument {} expected `{}`, received `{}`",
                    position + 1,
                    param.describe(receiver),
                    arg
                ));
            }
        }
    }

    if args.len() != callable.params.len() || !mismatches.is_empty() {
        type_checker.error(
            ErrorImpl::ArgumentMismatchError {
                callee: callee.to_string(),
                expected: callable.params.len(),
                received: args.len(),
                mismatches,
            },
            span,
        );
    }

    callable.return_type.clone()
}

fn apply_indices(
    type_checker: &mut TypeChecker,
    env: &Environment,
    base: DataType,
    indices: &[Expr],
    span: Span,
) -> DataType {
    let mut current = base;

    for index in indices.iter() {
        let index_type = type_check_expr(type_checker, env, index);
        if !index_type.is_void() && !is_numeric_like(&index_type) {
            type_checker.error(
                ErrorImpl::TypeMismatchError {
                    expected: DataType::chan().to_string(),
                    received: index_type.to_string(),
                },
                index.span(),
            );
        }

        current = if current.is_void() {
            DataType::san()
        } else if current.is_string() {
            DataType::senpai()
        } else if current.is_array() {
            current.to_unit_type(1)
        } else {
            type_checker.error(
                ErrorImpl::NonIterableIndexError {
                    received: current.to_string(),
                },
                span,
            );
            DataType::san()
        };
    }

    current
}

/// Reading a bare name. Uninitialized variables read as `san`.
fn lookup_identifier(type_checker: &mut TypeChecker, env: &Environment, id: &Identifier) -> DataType {
    if let Some(variable) = env.get_variable(&id.name) {
        return if type_checker.is_initialized(variable) {
            variable.data_type.clone()
        } else {
            DataType::san()
        };
    }

    if let Some(Member::Method(_)) = type_checker.class_member(&id.name) {
        return type_checker.role_mismatch(id, "property", "method");
    }

    if type_checker.signatures.functions.contains_key(&id.name) {
        return type_checker.role_mismatch(id, "variable", "function");
    }

    DataType::san()
}

fn type_check_call(type_checker: &mut TypeChecker, env: &Environment, call: &FnCall) -> DataType {
    let args = type_check_exprs(type_checker, env, &call.args);
    let name = &call.callee.name;

    match type_checker.class_member(name) {
        Some(Member::Method(callable)) => {
            return check_args(type_checker, name, &callable, &args, None, call.span)
        }
        Some(Member::Property { .. }) => {
            return type_checker.role_mismatch(&call.callee, "method", "property")
        }
        None => {}
    }

    if env.get_variable(name).is_some() {
        return type_checker.role_mismatch(&call.callee, "function", "variable");
    }

    match type_checker.signatures.functions.get(name).cloned() {
        Some(callable) => check_args(type_checker, name, &callable, &args, None, call.span),
        None => DataType::san(),
    }
}

/// Evaluates the expressions inside a member link whose owner is unknown.
fn check_member_exprs(type_checker: &mut TypeChecker, env: &Environment, member: &IdentProd) {
    match member {
        IdentProd::Identifier(_) => {}
        IdentProd::Indexed(indexed) => {
            type_check_exprs(type_checker, env, &indexed.indices);
        }
        IdentProd::Call(call) => {
            type_check_exprs(type_checker, env, &call.args);
        }
        IdentProd::Constructor(constructor) => {
            type_check_exprs(type_checker, env, &constructor.args);
        }
        IdentProd::Accessor(accessor) => {
            check_member_exprs(type_checker, env, &accessor.object);
            check_member_exprs(type_checker, env, &accessor.member);
        }
    }
}

fn type_check_member(
    type_checker: &mut TypeChecker,
    env: &Environment,
    owner: &DataType,
    member: &IdentProd,
) -> DataType {
    if owner.is_void() {
        check_member_exprs(type_checker, env, member);
        return DataType::san();
    }

    let name = member.root();

    let found = if owner.is_class() {
        type_checker.signatures.member(&owner.name, &name.name).cloned()
    } else if owner.is_string() || owner.is_array() {
        builtin_method(owner, &name.name).cloned().map(Member::Method)
    } else {
        check_member_exprs(type_checker, env, member);
        type_checker.error(
            ErrorImpl::NonClassAccessError {
                received: owner.to_string(),
            },
            member.span(),
        );
        return DataType::san();
    };

    match (found, member) {
        (Some(Member::Property { data_type, .. }), IdentProd::Identifier(_)) => data_type,
        (Some(Member::Property { data_type, .. }), IdentProd::Indexed(indexed)) => {
            apply_indices(type_checker, env, data_type, &indexed.indices, indexed.span)
        }
        (Some(Member::Method(callable)), IdentProd::Call(call)) => {
            let args = type_check_exprs(type_checker, env, &call.args);
            let receiver = (!owner.is_class()).then_some(owner);
            check_args(type_checker, &name.name, &callable, &args, receiver, call.span)
        }
        (Some(Member::Property { .. }), IdentProd::Call(call)) => {
            type_check_exprs(type_checker, env, &call.args);
            type_checker.role_mismatch(name, "method", "property")
        }
        (Some(Member::Method(_)), IdentProd::Identifier(_) | IdentProd::Indexed(_)) => {
            check_member_exprs(type_checker, env, member);
            type_checker.role_mismatch(name, "property", "method")
        }
        _ => {
            check_member_exprs(type_checker, env, member);
            type_checker.error(
                ErrorImpl::UndefinedMemberError {
                    owner: owner.to_string(),
                    member: name.name.clone(),
                },
                member.span(),
            );
            DataType::san()
        }
    }
}

pub fn type_check_prod(type_checker: &mut TypeChecker, env: &Environment, prod: &IdentProd) -> DataType {
    match prod {
        IdentProd::Identifier(id) => lookup_identifier(type_checker, env, id),
        IdentProd::Indexed(indexed) => {
            let base = lookup_identifier(type_checker, env, &indexed.id);
            apply_indices(type_checker, env, base, &indexed.indices, indexed.span)
        }
        IdentProd::Call(call) => type_check_call(type_checker, env, call),
        IdentProd::Constructor(constructor) => {
            let args = type_check_exprs(type_checker, env, &constructor.args);
            let name = &constructor.class.name;
            match type_checker.signatures.classes.get(name).cloned() {
                Some(callable) => check_args(type_checker, name, &callable, &args, None, constructor.span),
                None => DataType::san(),
            }
        }
        IdentProd::Accessor(accessor) => {
            let owner = type_check_prod(type_checker, env, &accessor.object);
            type_check_member(type_checker, env, &owner, &accessor.member)
        }
    }
}

fn reassigned_constant(type_checker: &mut TypeChecker, name: &Identifier, declared_at: Span) {
    type_checker.error(
        ErrorImpl::ReassignedConstantError {
            variable: name.name.clone(),
            declaration: declared_at,
        },
        name.span,
    );
}

/// Type of a storage location being written. Reports writes to `dono`
/// bindings and ignores whether the location holds a value yet.
fn type_check_target(type_checker: &mut TypeChecker, env: &Environment, target: &IdentProd) -> DataType {
    match target {
        IdentProd::Identifier(id) => match env.get_variable(&id.name) {
            Some(variable) => {
                if variable.is_const {
                    reassigned_constant(type_checker, id, variable.declared_at);
                }
                variable.data_type.clone()
            }
            None => lookup_identifier(type_checker, env, id),
        },
        IdentProd::Indexed(indexed) => {
            let base = match env.get_variable(&indexed.id.name) {
                Some(variable) => {
                    if variable.is_const {
                        reassigned_constant(type_checker, &indexed.id, variable.declared_at);
                    }
                    variable.data_type.clone()
                }
                None => lookup_identifier(type_checker, env, &indexed.id),
            };
            apply_indices(type_checker, env, base, &indexed.indices, indexed.span)
        }
        IdentProd::Accessor(accessor) => {
            let owner = type_check_owner(type_checker, env, &accessor.object);
            if owner.is_class() {
                let name = accessor.member.root();
                if let Some(Member::Property {
                    is_const: true,
                    declared_at,
                    ..
                }) = type_checker.signatures.member(&owner.name, &name.name).cloned()
                {
                    reassigned_constant(type_checker, name, declared_at);
                }
            }
            type_check_member(type_checker, env, &owner, &accessor.member)
        }
        IdentProd::Call(_) | IdentProd::Constructor(_) => type_check_prod(type_checker, env, target),
    }
}

/// Type of the object a written member belongs to. Variables give their
/// declared type whether or not they hold a value yet.
fn type_check_owner(type_checker: &mut TypeChecker, env: &Environment, object: &IdentProd) -> DataType {
    match object {
        IdentProd::Identifier(id) => match env.get_variable(&id.name) {
            Some(variable) => variable.data_type.clone(),
            None => lookup_identifier(type_checker, env, id),
        },
        IdentProd::Indexed(indexed) => match env.get_variable(&indexed.id.name) {
            Some(variable) => {
                let base = variable.data_type.clone();
                apply_indices(type_checker, env, base, &indexed.indices, indexed.span)
            }
            None => type_check_prod(type_checker, env, object),
        },
        IdentProd::Accessor(accessor) => {
            let owner = type_check_owner(type_checker, env, &accessor.object);
            type_check_member(type_checker, env, &owner, &accessor.member)
        }
        IdentProd::Call(_) | IdentProd::Constructor(_) => type_check_prod(type_checker, env, object),
    }
}

/// The arithmetic operator a compound assignment applies.
fn compound_operator(operator: &Token) -> Option<Token> {
    let (kind, lexeme) = match operator.kind {
        TokenKind::PlusAssign => (TokenKind::Plus, "+"),
        TokenKind::DashAssign => (TokenKind::Dash, "-"),
        TokenKind::StarAssign => (TokenKind::Star, "*"),
        TokenKind::SlashAssign => (TokenKind::Slash, "/"),
        TokenKind::PercentAssign => (TokenKind::Percent, "%"),
        _ => return None,
    };

    Some(Token {
        kind,
        lexeme: lexeme.to_string(),
        span: operator.span,
    })
}

pub fn type_check_declaration(type_checker: &mut TypeChecker, env: &mut Environment, declaration: &Declaration) {
    let before = type_checker.errors.len();

    if let Some(value) = &declaration.value {
        let value_type = type_check_expr(type_checker, env, value);
        type_checker.annotate(value.span(), &value_type);

        if !is_similar_type(&value_type, &declaration.data_type, false) {
            type_checker.error(
                ErrorImpl::TypeMismatchError {
                    expected: declaration.data_type.to_string(),
                    received: value_type.to_string(),
                },
                value.span(),
            );
        }
    }

    env.declare_variable(
        &declaration.name.name,
        Variable {
            data_type: declaration.data_type.clone(),
            is_const: declaration.is_const,
            declared_at: declaration.name.span,
        },
    );

    let initialized = declaration.value.is_some() && type_checker.errors.len() == before;
    type_checker.set_initialized(declaration.name.span, initialized);
}

pub fn type_check_assignment(type_checker: &mut TypeChecker, env: &Environment, assignment: &Assignment) {
    let target_type = type_check_target(type_checker, env, &assignment.target);
    let before = type_checker.errors.len();

    let value_type = type_check_expr(type_checker, env, &assignment.value);
    type_checker.annotate(assignment.value.span(), &value_type);

    let result_type = match compound_operator(&assignment.operator) {
        Some(operator) => arithmetic_result(
            type_checker,
            &operator,
            (&target_type, assignment.target.span()),
            (&value_type, assignment.value.span()),
        ),
        None => value_type,
    };

    // A void target was already reported or has no known type
    if !target_type.is_void() && !is_similar_type(&result_type, &target_type, false) {
        type_checker.error(
            ErrorImpl::TypeMismatchError {
                expected: target_type.to_string(),
                received: result_type.to_string(),
            },
            assignment.value.span(),
        );
    }

    if let IdentProd::Identifier(id) = &assignment.target {
        if let Some(variable) = env.get_variable(&id.name) {
            let initialized = type_checker.errors.len() == before;
            type_checker.set_initialized(variable.declared_at, initialized);
        }
    }
}

fn type_check_return(type_checker: &mut TypeChecker, env: &Environment, return_stmt: &Return) {
    let Some((function, return_type)) = type_checker.current_function.clone() else {
        return;
    };

    let (received, span) = match &return_stmt.value {
        Some(value) => {
            let value_type = type_check_expr(type_checker, env, value);
            if is_similar_type(&value_type, &return_type, false) {
                return;
            }
            (value_type, value.span())
        }
        None if return_type.is_void() => return,
        None => (DataType::san(), return_stmt.span),
    };

    type_checker.error(
        ErrorImpl::ReturnTypeMismatchError {
            function,
            expected: return_type.to_string(),
            received: received.to_string(),
        },
        span,
    );
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, env: &mut Environment, stmt: &Stmt) {
    match stmt {
        Stmt::Declaration(declaration) => type_check_declaration(type_checker, env, declaration),
        Stmt::Assignment(assignment) => type_check_assignment(type_checker, env, assignment),
        Stmt::Expression(stmt) => {
            type_check_expr(type_checker, env, &stmt.expression);
        }
        Stmt::Print(print) => {
            type_check_exprs(type_checker, env, &print.args);
        }
        Stmt::If(if_stmt) => {
            // Conditions are truthy, any type goes
            type_check_expr(type_checker, env, &if_stmt.condition);
            type_check_nested(type_checker, env, &if_stmt.then_block);

            for else_if in if_stmt.else_ifs.iter() {
                type_check_expr(type_checker, env, &else_if.condition);
                type_check_nested(type_checker, env, &else_if.block);
            }

            if let Some(block) = &if_stmt.else_block {
                type_check_nested(type_checker, env, block);
            }
        }
        Stmt::While(while_stmt) => {
            type_check_expr(type_checker, env, &while_stmt.condition);
            type_check_nested(type_checker, env, &while_stmt.body);
        }
        Stmt::For(for_stmt) => {
            let mut loop_env = env.clone();

            match &for_stmt.init {
                ForInit::Declaration(declaration) => {
                    if declaration.is_const {
                        type_checker.error(
                            ErrorImpl::ConstantLoopVariableError {
                                variable: declaration.name.name.clone(),
                            },
                            declaration.name.span,
                        );
                    }
                    // Reported once here; the update and body treat it as mutable
                    let declaration = Declaration {
                        is_const: false,
                        ..declaration.clone()
                    };
                    type_check_declaration(type_checker, &mut loop_env, &declaration);
                }
                ForInit::Assignment(assignment) => {
                    type_check_assignment(type_checker, &loop_env, assignment)
                }
            }

            type_check_expr(type_checker, &loop_env, &for_stmt.condition);

            match &for_stmt.update {
                ForUpdate::Assignment(assignment) => {
                    type_check_assignment(type_checker, &loop_env, assignment)
                }
                ForUpdate::Postfix(postfix) => {
                    type_check_postfix(type_checker, &loop_env, postfix);
                }
            }

            type_check_nested(type_checker, &loop_env, &for_stmt.body);
        }
        Stmt::Return(return_stmt) => type_check_return(type_checker, env, return_stmt),
        Stmt::Break(_) => {}
    }
}

pub fn type_check_block(type_checker: &mut TypeChecker, env: &mut Environment, block: &Block) {
    for stmt in block.iter() {
        type_check_stmt(type_checker, env, stmt);
    }
}

fn type_check_nested(type_checker: &mut TypeChecker, env: &Environment, block: &Block) {
    let mut inner = env.clone();
    type_check_block(type_checker, &mut inner, block);
}

pub fn type_check_function(type_checker: &mut TypeChecker, env: &Environment, function: &Function) {
    let mut local = env.clone();

    for param in function.params.iter() {
        local.declare_variable(
            &param.name.name,
            Variable {
                data_type: param.data_type.clone(),
                is_const: false,
                declared_at: param.name.span,
            },
        );
        type_checker.set_initialized(param.name.span, true);
    }

    let previous = type_checker
        .current_function
        .replace((function.name.name.clone(), function.return_type.clone()));

    type_check_block(type_checker, &mut local, &function.body);

    type_checker.current_function = previous;

    if !function.return_type.is_void() && !function.body.contains_return() {
        type_checker.error(
            ErrorImpl::MissingReturnError {
                function: function.name.name.clone(),
                return_type: function.return_type.to_string(),
            },
            function.name.span,
        );
    }
}

/// Classes see their own parameters, properties and methods, plus global
/// functions and classes, but no global variables.
pub fn type_check_class(type_checker: &mut TypeChecker, class: &Class) {
    type_checker.current_class = Some(class.name.name.clone());
    let mut env = Environment::new();

    for param in class.params.iter() {
        env.declare_variable(
            &param.name.name,
            Variable {
                data_type: param.data_type.clone(),
                is_const: false,
                declared_at: param.name.span,
            },
        );
        type_checker.set_initialized(param.name.span, true);
    }

    for property in class.properties.iter() {
        type_check_declaration(type_checker, &mut env, property);
    }

    for method in class.methods.iter() {
        type_check_function(type_checker, &env, method);
    }

    type_checker.current_class = None;
}

pub fn type_check(program: &Program) -> TypeCheckResult {
    let mut type_checker = TypeChecker::new(Signatures::collect(program));
    let mut globals = Environment::new();

    for global in program.globals.iter() {
        type_check_declaration(&mut type_checker, &mut globals, global);
    }

    for function in program.all_functions() {
        type_check_function(&mut type_checker, &globals, function);
    }

    for class in program.classes.iter() {
        type_check_class(&mut type_checker, class);
    }

    log::debug!(
        "type checked {} functions and {} classes: {} errors, {} annotations",
        program.functions.len() + 1,
        program.classes.len(),
        type_checker.errors.len(),
        type_checker.annotations.len()
    );

    TypeCheckResult {
        errors: type_checker.errors,
        annotations: type_checker.annotations,
    }
}
