use crate::{ast::statements::Class, errors::errors::Error};

use super::{
    member_analyzer::BodyAnalyzer,
    scope::{Classification, Scope},
};

/// Re-analyzes one class with a scope seeded from its own parameters,
/// properties and methods.
///
/// Bare calls and constructors that are not class members fall back to the
/// global functions and classes.
pub struct ClassAnalyzer<'a> {
    class: &'a Class,
    globals: &'a Scope,
}

impl<'a> ClassAnalyzer<'a> {
    pub fn new(class: &'a Class, globals: &'a Scope) -> Self {
        ClassAnalyzer { class, globals }
    }

    pub fn analyze(&self) -> Vec<Error> {
        let class = self.class;
        let mut body = BodyAnalyzer::new(Some(self.globals));
        let mut scope = Scope::new();

        for param in class.params.iter() {
            body.define(&mut scope, &param.name, &param.data_type, Classification::Local);
        }
        for property in class.properties.iter() {
            body.define(
                &mut scope,
                &property.name,
                &property.data_type,
                Classification::ClassProperty,
            );
        }
        for method in class.methods.iter() {
            body.define(
                &mut scope,
                &method.name,
                &method.return_type,
                Classification::ClassMethod,
            );
        }

        log::debug!(
            "class `{}` scope has {} members",
            class.name.name,
            scope.len()
        );

        for property in class.properties.iter() {
            if let Some(value) = &property.value {
                body.check_expr(value, &scope);
            }
        }

        for method in class.methods.iter() {
            body.analyze_function(method, &scope);
        }

        body.into_errors()
    }
}
