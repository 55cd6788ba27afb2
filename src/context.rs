//! Per-compilation state shared by the lexer and parser.
//!
//! Identifier and class names are interned into [`UniqueId`]s so repeated
//! occurrences of the same name carry the same token kind. The tables live
//! here rather than in statics: every document gets its own `Context`, or
//! calls [`Context::reset`] before lexing a new one.

use std::collections::HashMap;

use crate::lexer::tokens::UniqueId;

#[derive(Debug, Default, Clone)]
pub struct Interner {
    lookup: HashMap<String, UniqueId>,
    names: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Interner::default()
    }

    /// Returns the id for `name`, allocating one on first sight.
    pub fn intern(&mut self, name: &str) -> UniqueId {
        if let Some(id) = self.lookup.get(name) {
            return *id;
        }

        let id = UniqueId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<UniqueId> {
        self.lookup.get(name).copied()
    }

    pub fn resolve(&self, id: UniqueId) -> Option<&str> {
        self.names.get(id.0 as usize).map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.lookup.clear();
        self.names.clear();
    }
}

#[derive(Debug, Default, Clone)]
pub struct Context {
    identifiers: Interner,
    classes: Interner,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    /// Forgets every interned name. Ids handed out before the reset must not
    /// be mixed with ids handed out after it.
    pub fn reset(&mut self) {
        log::debug!(
            "resetting context ({} identifiers, {} classes)",
            self.identifiers.len(),
            self.classes.len()
        );
        self.identifiers.clear();
        self.classes.clear();
    }

    pub fn intern_identifier(&mut self, name: &str) -> UniqueId {
        self.identifiers.intern(name)
    }

    pub fn intern_class(&mut self, name: &str) -> UniqueId {
        self.classes.intern(name)
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.classes.get(name).is_some()
    }

    pub fn class_id(&self, name: &str) -> Option<UniqueId> {
        self.classes.get(name)
    }

    pub fn identifier_name(&self, id: UniqueId) -> Option<&str> {
        self.identifiers.resolve(id)
    }

    pub fn class_name(&self, id: UniqueId) -> Option<&str> {
        self.classes.resolve(id)
    }

    pub fn identifiers(&self) -> &Interner {
        &self.identifiers
    }

    pub fn classes(&self) -> &Interner {
        &self.classes
    }
}
