use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::core::install_globals},
        value::core::Value,
    },
};

/// A value bound to a name, with its mutability.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The bound value.
    pub value:   Value,
    /// Whether later plain assignments may replace the value.
    pub mutable: bool,
}

/// One level of a lexical environment.
///
/// Scopes form a parent-linked chain and are shared through `Rc`: closures
/// keep their defining scope alive, and every holder observes later
/// rebindings. The symbol table sits behind a `RefCell` because evaluation is
/// single threaded and never holds a borrow across a nested evaluation.
///
/// A function bound inside its own defining scope forms an `Rc` cycle; such
/// scopes live until the process ends.
#[derive(Default)]
pub struct Scope {
    parent:  Option<Rc<Scope>>,
    symbols: RefCell<HashMap<String, Binding>>,
}

impl Scope {
    /// Creates a scope with no parent and no bindings.
    #[must_use]
    pub fn root() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Creates the global scope: constants and every built-in function, all
    /// bound immutably.
    ///
    /// # Example
    /// ```
    /// use combicalc::interpreter::scope::Scope;
    ///
    /// let global = Scope::global();
    /// assert!(global.lookup("pi").is_ok());
    /// assert!(global.lookup("sin").is_ok());
    /// assert!(global.lookup("x").is_err());
    /// ```
    #[must_use]
    pub fn global() -> Rc<Self> {
        let scope = Self::root();
        install_globals(&scope);
        scope
    }

    /// Creates an empty child of `parent`.
    #[must_use]
    pub fn child(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self { parent:  Some(Rc::clone(parent)),
                       symbols: RefCell::default(), })
    }

    /// The enclosing scope, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// Resolves `name`, walking up the parent chain.
    ///
    /// # Errors
    /// Returns [`RuntimeError::UndefinedName`] if no scope in the chain binds
    /// `name`.
    pub fn lookup(&self, name: &str) -> EvalResult<Value> {
        let mut scope = self;
        loop {
            if let Some(binding) = scope.symbols.borrow().get(name) {
                return Ok(binding.value.clone());
            }
            match &scope.parent {
                Some(parent) => scope = &**parent,
                None => return Err(RuntimeError::UndefinedName { name: name.to_string() }),
            }
        }
    }

    /// Binds `name` in this scope.
    ///
    /// An existing immutable binding in this scope is left untouched. Returns
    /// `true` if the binding was written.
    pub fn set_value(&self, name: &str, value: Value, mutable: bool) -> bool {
        let mut symbols = self.symbols.borrow_mut();
        if symbols.get(name).is_some_and(|binding| !binding.mutable) {
            tracing::debug!(name, "ignored assignment to an immutable binding");
            return false;
        }
        symbols.insert(name.to_string(), Binding { value, mutable });
        true
    }

    /// Binds `name` in this scope, replacing any binding, immutable or not.
    pub fn force_value(&self, name: &str, value: Value, mutable: bool) {
        self.symbols
            .borrow_mut()
            .insert(name.to_string(), Binding { value, mutable });
    }

    /// Removes the nearest binding of `name` in the chain.
    ///
    /// # Errors
    /// - [`RuntimeError::ImmutableBinding`] if the nearest binding is
    ///   immutable.
    /// - [`RuntimeError::UndefinedName`] if nothing binds `name`.
    pub fn delete(&self, name: &str) -> EvalResult<Value> {
        let mut scope = self;
        loop {
            let mutable = scope.symbols.borrow().get(name).map(|binding| binding.mutable);
            match mutable {
                Some(true) => {
                    let removed = scope.symbols.borrow_mut().remove(name);
                    return removed.map(|binding| binding.value)
                                  .ok_or_else(|| RuntimeError::UndefinedName { name: name.to_string() });
                },
                Some(false) => return Err(RuntimeError::ImmutableBinding { name: name.to_string() }),
                None => {},
            }
            match &scope.parent {
                Some(parent) => scope = &**parent,
                None => return Err(RuntimeError::UndefinedName { name: name.to_string() }),
            }
        }
    }

    /// Returns `true` if this scope itself binds `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.borrow().contains_key(name)
    }

    /// The binding of `name` in this scope only.
    #[must_use]
    pub fn binding(&self, name: &str) -> Option<Binding> {
        self.symbols.borrow().get(name).cloned()
    }

    /// Copies out this scope's own bindings, sorted by name.
    #[must_use]
    pub fn bindings(&self) -> BTreeMap<String, Binding> {
        self.symbols
            .borrow()
            .iter()
            .map(|(name, binding)| (name.clone(), binding.clone()))
            .collect()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.symbols.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("Scope")
         .field("names", &names)
         .field("has_parent", &self.parent.is_some())
         .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(scope: &Scope, name: &str) -> f64 {
        match scope.lookup(name).unwrap() {
            Value::Number(n) => n,
            other => panic!("expected a number, found {other}"),
        }
    }

    #[test]
    fn lookup_walks_the_parent_chain() {
        let root = Scope::root();
        root.set_value("x", Value::Number(1.0), true);
        let child = Scope::child(&root);

        assert!((number(&child, "x") - 1.0).abs() < f64::EPSILON);
        assert_eq!(child.lookup("y").unwrap_err(),
                   RuntimeError::UndefinedName { name: "y".to_string() });
    }

    #[test]
    fn immutable_bindings_ignore_plain_assignment() {
        let scope = Scope::root();
        scope.set_value("a", Value::Number(1.0), false);

        assert!(!scope.set_value("a", Value::Number(2.0), true));
        assert!((number(&scope, "a") - 1.0).abs() < f64::EPSILON);

        scope.force_value("a", Value::Number(3.0), true);
        assert!((number(&scope, "a") - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn child_bindings_shadow_without_touching_the_parent() {
        let root = Scope::root();
        root.set_value("a", Value::Number(1.0), false);
        let child = Scope::child(&root);

        assert!(child.set_value("a", Value::Number(2.0), true));
        assert!((number(&child, "a") - 2.0).abs() < f64::EPSILON);
        assert!((number(&root, "a") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn delete_finds_the_nearest_binding() {
        let root = Scope::root();
        root.set_value("a", Value::Number(1.0), true);
        root.set_value("k", Value::Number(1.0), false);
        let child = Scope::child(&root);

        assert!(child.delete("a").is_ok());
        assert!(root.lookup("a").is_err());
        assert_eq!(child.delete("k").unwrap_err(),
                   RuntimeError::ImmutableBinding { name: "k".to_string() });
        assert_eq!(child.delete("a").unwrap_err(),
                   RuntimeError::UndefinedName { name: "a".to_string() });
    }
}
