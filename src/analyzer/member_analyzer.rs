use crate::{
    ast::{
        ast::{Expr, IdentProd, Program, Stmt},
        expressions::Identifier,
        statements::{Block, Declaration, ForInit, ForUpdate, Function},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{DataType, TokenKind},
    Span,
};

use super::scope::{Binding, Classification, Scope};

/// Walks function bodies checking that names are declared once per scope
/// and that every reference resolves.
///
/// `outer` is consulted only for calls and constructors: class bodies see
/// global functions and classes but not global variables.
pub struct BodyAnalyzer<'a> {
    outer: Option<&'a Scope>,
    errors: Vec<Error>,
}

impl<'a> BodyAnalyzer<'a> {
    pub fn new(outer: Option<&'a Scope>) -> Self {
        BodyAnalyzer {
            outer,
            errors: vec![],
        }
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    pub fn define(
        &mut self,
        scope: &mut Scope,
        name: &Identifier,
        data_type: &DataType,
        classification: Classification,
    ) {
        let binding = Binding::new(name.span, data_type.clone(), classification);

        if let Err(original) = scope.define(&name.name, binding) {
            log::trace!("duplicate definition of `{}`", name.name);
            self.errors.push(Error::new(
                ErrorImpl::DuplicateDefinitionError {
                    name: name.name.clone(),
                    original: original.site,
                    original_classification: original.classification,
                    duplicate_classification: classification,
                },
                name.span,
            ));
        }
    }

    fn resolve(&mut self, scope: &Scope, name: &Identifier, expected: Classification) {
        if scope.contains(&name.name) {
            return;
        }

        let found_outside = match (self.outer, expected) {
            (Some(outer), Classification::Function | Classification::Class) => {
                outer.is(&name.name, expected)
            }
            _ => false,
        };

        if !found_outside {
            self.errors.push(Error::new(
                ErrorImpl::UndefinedError {
                    name: name.name.clone(),
                    expected,
                },
                name.span,
            ));
        }
    }

    fn check_type(&mut self, scope: &Scope, data_type: &DataType, site: Span) {
        if !matches!(data_type.kind, TokenKind::ClassId(_)) {
            return;
        }

        let name = Identifier {
            name: data_type.name.clone(),
            span: site,
        };
        self.resolve(scope, &name, Classification::Class);
    }

    /// Parameters and body share one scope, copied from `scope`.
    pub fn analyze_function(&mut self, function: &Function, scope: &Scope) {
        let mut local = scope.clone();
        self.check_type(&local, &function.return_type, function.name.span);

        for param in function.params.iter() {
            self.check_type(&local, &param.data_type, param.span);
            self.define(&mut local, &param.name, &param.data_type, Classification::Local);
        }

        self.analyze_block(&function.body, &mut local);
    }

    pub fn analyze_block(&mut self, block: &Block, scope: &mut Scope) {
        for stmt in block.iter() {
            self.analyze_stmt(stmt, scope);
        }
    }

    fn analyze_nested(&mut self, block: &Block, scope: &Scope) {
        let mut inner = scope.clone();
        self.analyze_block(block, &mut inner);
    }

    /// The value is checked before the name is defined, so `x-chan = x~`
    /// reports `x` as undefined.
    pub fn analyze_declaration(
        &mut self,
        declaration: &Declaration,
        scope: &mut Scope,
        classification: Classification,
    ) {
        if let Some(value) = &declaration.value {
            self.check_expr(value, scope);
        }
        self.check_type(scope, &declaration.data_type, declaration.name.span);
        self.define(
            scope,
            &declaration.name,
            &declaration.data_type,
            classification,
        );
    }

    fn analyze_stmt(&mut self, stmt: &Stmt, scope: &mut Scope) {
        match stmt {
            Stmt::Declaration(declaration) => {
                self.analyze_declaration(declaration, scope, Classification::Local)
            }
            Stmt::Assignment(assignment) => {
                self.check_prod(&assignment.target, scope);
                self.check_expr(&assignment.value, scope);
            }
            Stmt::Expression(stmt) => self.check_expr(&stmt.expression, scope),
            Stmt::Print(print) => {
                for arg in print.args.iter() {
                    self.check_expr(arg, scope);
                }
            }
            Stmt::If(if_stmt) => {
                self.check_expr(&if_stmt.condition, scope);
                self.analyze_nested(&if_stmt.then_block, scope);

                for else_if in if_stmt.else_ifs.iter() {
                    self.check_expr(&else_if.condition, scope);
                    self.analyze_nested(&else_if.block, scope);
                }

                if let Some(block) = &if_stmt.else_block {
                    self.analyze_nested(block, scope);
                }
            }
            Stmt::While(while_stmt) => {
                self.check_expr(&while_stmt.condition, scope);
                self.analyze_nested(&while_stmt.body, scope);
            }
            Stmt::For(for_stmt) => {
                // The loop variable lives in its own copy and dies with the loop
                let mut loop_scope = scope.clone();

                match &for_stmt.init {
                    ForInit::Declaration(declaration) => {
                        self.analyze_declaration(declaration, &mut loop_scope, Classification::Local)
                    }
                    ForInit::Assignment(assignment) => {
                        self.check_prod(&assignment.target, &loop_scope);
                        self.check_expr(&assignment.value, &loop_scope);
                    }
                }

                self.check_expr(&for_stmt.condition, &loop_scope);

                match &for_stmt.update {
                    ForUpdate::Assignment(assignment) => {
                        self.check_prod(&assignment.target, &loop_scope);
                        self.check_expr(&assignment.value, &loop_scope);
                    }
                    ForUpdate::Postfix(postfix) => self.check_prod(&postfix.target, &loop_scope),
                }

                self.analyze_nested(&for_stmt.body, &loop_scope);
            }
            Stmt::Return(return_stmt) => {
                if let Some(value) = &return_stmt.value {
                    self.check_expr(value, scope);
                }
            }
            Stmt::Break(_) => {}
        }
    }

    pub fn check_expr(&mut self, expr: &Expr, scope: &Scope) {
        match expr {
            Expr::Literal(_) => {}
            Expr::StringFmt(fmt) => {
                for expr in fmt.expressions() {
                    self.check_expr(expr, scope);
                }
            }
            Expr::Input(input) => {
                if let Some(prompt) = &input.prompt {
                    self.check_expr(prompt, scope);
                }
            }
            Expr::Array(array) => {
                for element in array.elements.iter() {
                    self.check_expr(element, scope);
                }
            }
            Expr::Prefix(prefix) => self.check_expr(&prefix.right, scope),
            Expr::Infix(infix) => {
                self.check_expr(&infix.left, scope);
                self.check_expr(&infix.right, scope);
            }
            Expr::Postfix(postfix) => self.check_prod(&postfix.target, scope),
            Expr::Ident(prod) => self.check_prod(prod, scope),
        }
    }

    fn check_all(&mut self, exprs: &[Expr], scope: &Scope) {
        for expr in exprs.iter() {
            self.check_expr(expr, scope);
        }
    }

    pub fn check_prod(&mut self, prod: &IdentProd, scope: &Scope) {
        match prod {
            IdentProd::Identifier(id) => self.resolve(scope, id, Classification::Identifier),
            IdentProd::Indexed(indexed) => {
                self.resolve(scope, &indexed.id, Classification::Identifier);
                self.check_all(&indexed.indices, scope);
            }
            IdentProd::Call(call) => {
                self.resolve(scope, &call.callee, Classification::Function);
                self.check_all(&call.args, scope);
            }
            IdentProd::Constructor(constructor) => {
                self.resolve(scope, &constructor.class, Classification::Class);
                self.check_all(&constructor.args, scope);
            }
            IdentProd::Accessor(accessor) => {
                self.check_prod(&accessor.object, scope);
                self.check_member(&accessor.member, scope);
            }
        }
    }

    /// Member names depend on the object's type, so only the expressions
    /// inside a member link are resolved here.
    fn check_member(&mut self, member: &IdentProd, scope: &Scope) {
        match member {
            IdentProd::Identifier(_) => {}
            IdentProd::Indexed(indexed) => self.check_all(&indexed.indices, scope),
            IdentProd::Call(call) => self.check_all(&call.args, scope),
            IdentProd::Constructor(constructor) => self.check_all(&constructor.args, scope),
            IdentProd::Accessor(accessor) => {
                self.check_member(&accessor.object, scope);
                self.check_member(&accessor.member, scope);
            }
        }
    }
}

/// Result of the program-level pass.
#[derive(Debug, Clone, Default)]
pub struct MemberAnalysis {
    /// Global variables, functions and classes
    pub globals: Scope,
    pub errors: Vec<Error>,
}

/// Builds the global name table and checks every function body against it.
pub struct MemberAnalyzer<'a> {
    program: &'a Program,
}

impl<'a> MemberAnalyzer<'a> {
    pub fn new(program: &'a Program) -> Self {
        MemberAnalyzer { program }
    }

    /// Global names ordered by where they appear, so the first occurrence
    /// in the source is the original in duplicate reports.
    fn global_entries(&self) -> Vec<(&'a Identifier, DataType, Classification)> {
        let program = self.program;
        let mut entries = vec![];

        for global in program.globals.iter() {
            entries.push((&global.name, global.data_type.clone(), Classification::Identifier));
        }
        for function in program.functions.iter() {
            entries.push((&function.name, function.return_type.clone(), Classification::Function));
        }
        for class in program.classes.iter() {
            entries.push((&class.name, class.data_type.clone(), Classification::Class));
        }

        entries.sort_by_key(|(name, _, _)| name.span.start);
        entries
    }

    pub fn analyze(&self) -> MemberAnalysis {
        let mut globals = Scope::new();
        let mut body = BodyAnalyzer::new(None);

        for (name, data_type, classification) in self.global_entries() {
            body.define(&mut globals, name, &data_type, classification);
        }

        log::debug!("global table has {} entries", globals.len());

        for global in self.program.globals.iter() {
            if let Some(value) = &global.value {
                body.check_expr(value, &globals);
            }
        }

        for function in self.program.all_functions() {
            body.analyze_function(function, &globals);
        }

        MemberAnalysis {
            globals,
            errors: body.into_errors(),
        }
    }
}
