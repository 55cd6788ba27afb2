use std::fmt::Display;

use im::HashMap;

use crate::{lexer::tokens::DataType, Span};

/// What kind of thing a name was defined as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A global variable
    Identifier,
    Function,
    Class,
    ClassProperty,
    ClassMethod,
    /// A parameter or a variable declared inside a body
    Local,
}

impl Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Classification::Identifier => "identifier",
            Classification::Function => "function",
            Classification::Class => "class",
            Classification::ClassProperty => "class property",
            Classification::ClassMethod => "class method",
            Classification::Local => "local",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Where the name was defined
    pub site: Span,
    pub data_type: DataType,
    pub classification: Classification,
}

impl Binding {
    pub fn new(site: Span, data_type: DataType, classification: Classification) -> Self {
        Binding {
            site,
            data_type,
            classification,
        }
    }
}

/// Name table for one lexical block.
///
/// Cloning is cheap (the map is persistent), so entering a nested block is a
/// clone: names declared inside never leak to siblings or to the code after
/// the block.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, Binding>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Adds `name`. If it is already visible the first binding is kept and
    /// returned as the error.
    pub fn define(&mut self, name: &str, binding: Binding) -> Result<(), Binding> {
        if let Some(existing) = self.bindings.get(name) {
            return Err(existing.clone());
        }

        self.bindings.insert(name.to_string(), binding);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Whether `name` is bound with the given classification.
    pub fn is(&self, name: &str, classification: Classification) -> bool {
        self.get(name)
            .map(|binding| binding.classification == classification)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Binding)> {
        self.bindings.iter()
    }
}
