use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::ast::Program,
    lexer::tokens::{DataType, TokenKind},
    Span,
};

/// A parameter slot in a signature.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    Exact(DataType),
    /// Matches the receiver's element type or the receiver type itself.
    Element,
}

impl ParamType {
    pub fn resolve(&self, receiver: Option<&DataType>) -> Vec<DataType> {
        match (self, receiver) {
            (ParamType::Exact(data_type), _) => vec![data_type.clone()],
            (ParamType::Element, Some(receiver)) if receiver.is_array() => {
                vec![receiver.to_unit_type(1), receiver.clone()]
            }
            (ParamType::Element, Some(receiver)) => vec![receiver.clone()],
            (ParamType::Element, None) => vec![],
        }
    }

    pub fn describe(&self, receiver: Option<&DataType>) -> String {
        self.resolve(receiver)
            .iter()
            .map(|data_type| data_type.to_string())
            .collect::<Vec<String>>()
            .join(" or ")
    }
}

/// Anything that can be called: functions, methods, constructors and
/// builtins.
#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    pub params: Vec<ParamType>,
    pub return_type: DataType,
}

impl Callable {
    pub fn new(params: Vec<DataType>, return_type: DataType) -> Self {
        Callable {
            params: params.into_iter().map(ParamType::Exact).collect(),
            return_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property {
        data_type: DataType,
        is_const: bool,
        declared_at: Span,
    },
    Method(Callable),
}

impl Member {
    pub fn role(&self) -> &'static str {
        match self {
            Member::Property { .. } => "property",
            Member::Method(_) => "method",
        }
    }
}

fn builtin(params: Vec<ParamType>, return_type: DataType) -> Callable {
    Callable {
        params,
        return_type,
    }
}

lazy_static! {
    pub static ref STRING_BUILTINS: HashMap<&'static str, Callable> = {
        let mut map = HashMap::new();
        map.insert("len", builtin(vec![], DataType::chan()));
        map.insert("reversed", builtin(vec![], DataType::senpai()));
        map.insert("has", builtin(vec![ParamType::Exact(DataType::senpai())], DataType::sama()));
        map.insert("upper", builtin(vec![], DataType::senpai()));
        map.insert("lower", builtin(vec![], DataType::senpai()));
        map
    };

    pub static ref ARRAY_BUILTINS: HashMap<&'static str, Callable> = {
        let mut map = HashMap::new();
        map.insert("len", builtin(vec![], DataType::chan()));
        map.insert("reverse", builtin(vec![], DataType::san()));
        map.insert("has", builtin(vec![ParamType::Element], DataType::sama()));
        map.insert("append", builtin(vec![ParamType::Element], DataType::san()));
        map
    };
}

/// Builtin method `name` of `receiver`, for `senpai` and array receivers.
pub fn builtin_method(receiver: &DataType, name: &str) -> Option<&'static Callable> {
    if receiver.is_string() {
        STRING_BUILTINS.get(name)
    } else if receiver.is_array() {
        ARRAY_BUILTINS.get(name)
    } else {
        None
    }
}

/// Declared types of everything nameable at the top level, plus class
/// members keyed `Class.member`.
#[derive(Debug, Clone, Default)]
pub struct Signatures {
    pub functions: HashMap<String, Callable>,
    /// Constructor signatures, returning the class type
    pub classes: HashMap<String, Callable>,
    pub members: HashMap<String, Member>,
}

pub fn member_key(class: &str, member: &str) -> String {
    format!("{}.{}", class, member)
}

impl Signatures {
    pub fn collect(program: &Program) -> Self {
        let mut signatures = Signatures::default();

        for function in program.functions.iter() {
            signatures
                .functions
                .entry(function.name.name.clone())
                .or_insert_with(|| Callable::new(function.param_types(), function.return_type.clone()));
        }

        for class in program.classes.iter() {
            signatures
                .classes
                .entry(class.name.name.clone())
                .or_insert_with(|| Callable::new(class.param_types(), class.data_type.clone()));

            for property in class.properties.iter() {
                signatures
                    .members
                    .entry(member_key(&class.name.name, &property.name.name))
                    .or_insert_with(|| Member::Property {
                        data_type: property.data_type.clone(),
                        is_const: property.is_const,
                        declared_at: property.name.span,
                    });
            }

            for method in class.methods.iter() {
                signatures
                    .members
                    .entry(member_key(&class.name.name, &method.name.name))
                    .or_insert_with(|| {
                        Member::Method(Callable::new(method.param_types(), method.return_type.clone()))
                    });
            }
        }

        log::debug!(
            "collected {} function, {} class and {} member signatures",
            signatures.functions.len(),
            signatures.classes.len(),
            signatures.members.len()
        );

        signatures
    }

    pub fn member(&self, class: &str, member: &str) -> Option<&Member> {
        self.members.get(&member_key(class, member))
    }
}

/// Numeric operands: `chan`, `kun`, `sama` and the input marker.
pub fn is_numeric_like(data_type: &DataType) -> bool {
    data_type.is_numeric() || data_type.is_input()
}

/// Whether a value of type `actual` may be used where `expected` is
/// declared.
///
/// `san` (an uninitialized or erroneous value) is accepted everywhere except
/// as a call argument.
pub fn is_similar_type(actual: &DataType, expected: &DataType, in_call: bool) -> bool {
    if actual == expected {
        return true;
    }

    if actual.is_void() {
        return !in_call;
    }

    if expected.dimension == 0 {
        return match expected.kind {
            TokenKind::Chan | TokenKind::Kun => is_numeric_like(actual),
            TokenKind::Sama => true,
            TokenKind::Senpai => actual.is_string() || actual.is_input(),
            _ => false,
        };
    }

    actual.is_empty_array() && actual.dimension <= expected.dimension
}
