use crate::core;
use crate::types::{Symbol, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownSymbol(pub Symbol);

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unbound symbol '{}'", self.0)
    }
}

/// A lexical scope: bindings plus an optional link to the enclosing scope.
///
/// Scopes form a chain through parent references. Lookup walks the chain from
/// the innermost scope outwards; the root scope holds the builtin library and
/// everything bound with `def`. Values are stored as owned copies, so
/// rebinding one name never aliases another binding's contents.
pub struct Environment {
    inner: RefCell<Inner>,
}

struct Inner {
    bindings: HashMap<Symbol, Value>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// An empty root scope with no parent and no bindings.
    pub fn root() -> Rc<Self> {
        Rc::new(Environment {
            inner: RefCell::new(Inner {
                bindings: HashMap::new(),
                parent: None,
            }),
        })
    }

    /// The top-level scope: a root with the builtin library registered.
    pub fn global() -> Rc<Self> {
        let env = Self::root();
        for (&name, &func) in core::CORE.iter() {
            env.set(Symbol::new(name), Value::Builtin(func));
        }
        env
    }

    /// A fresh child scope whose lookups fall through to `parent`.
    pub fn spawn_from(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Environment {
            inner: RefCell::new(Inner {
                bindings: HashMap::new(),
                parent: Some(parent.clone()),
            }),
        })
    }

    /// Bind `key` in this scope, shadowing any outer binding of the same name.
    pub fn set(&self, key: Symbol, value: Value) {
        self.inner.borrow_mut().bindings.insert(key, value);
    }

    /// Look `key` up through the scope chain, innermost first.
    pub fn fetch(&self, key: &Symbol) -> Result<Value, UnknownSymbol> {
        if let Some(value) = self.inner.borrow().bindings.get(key) {
            return Ok(value.clone());
        }
        let mut current = self.inner.borrow().parent.clone();
        while let Some(env) = current {
            if let Some(value) = env.inner.borrow().bindings.get(key) {
                return Ok(value.clone());
            }
            current = env.inner.borrow().parent.clone();
        }
        Err(UnknownSymbol(key.clone()))
    }

    /// Rebind `key` in the nearest enclosing scope that already has it, else
    /// create the binding in this scope. This is the semantics of `=`.
    pub fn assign(&self, key: Symbol, value: Value) {
        if self.inner.borrow().bindings.contains_key(&key) {
            self.set(key, value);
            return;
        }
        let mut current = self.inner.borrow().parent.clone();
        while let Some(env) = current {
            if env.inner.borrow().bindings.contains_key(&key) {
                env.set(key, value);
                return;
            }
            current = env.inner.borrow().parent.clone();
        }
        self.set(key, value);
    }

    /// Bind `key` in the root scope, regardless of where we are in the chain.
    /// This is the semantics of `def`.
    pub fn define_global(&self, key: Symbol, value: Value) {
        let mut current = match self.inner.borrow().parent.clone() {
            None => {
                log::debug!("define {} as {}", key, value);
                self.set(key, value);
                return;
            }
            Some(parent) => parent,
        };
        loop {
            let parent = current.inner.borrow().parent.clone();
            match parent {
                Some(next) => current = next,
                None => break,
            }
        }
        log::debug!("define {} as {}", key, value);
        current.set(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> Symbol {
        Symbol::new(name)
    }

    #[test]
    fn set_and_fetch() {
        let env = Environment::root();
        env.set(sym("x"), Value::Number(42));
        assert_eq!(env.fetch(&sym("x")), Ok(Value::Number(42)));
    }

    #[test]
    fn fetch_of_unbound_symbol_fails() {
        let env = Environment::root();
        assert_eq!(env.fetch(&sym("x")), Err(UnknownSymbol(sym("x"))));
    }

    #[test]
    fn child_inherits_parent_bindings() {
        let parent = Environment::root();
        parent.set(sym("x"), Value::Number(42));
        let child = Environment::spawn_from(&parent);
        assert_eq!(child.fetch(&sym("x")), Ok(Value::Number(42)));
    }

    #[test]
    fn child_shadows_parent() {
        let parent = Environment::root();
        parent.set(sym("x"), Value::Number(42));
        let child = Environment::spawn_from(&parent);
        child.set(sym("x"), Value::Number(100));
        assert_eq!(child.fetch(&sym("x")), Ok(Value::Number(100)));
        assert_eq!(parent.fetch(&sym("x")), Ok(Value::Number(42)));
    }

    #[test]
    fn assign_rebinds_in_nearest_scope_holding_the_name() {
        let parent = Environment::root();
        parent.set(sym("x"), Value::Number(42));
        let child = Environment::spawn_from(&parent);
        child.assign(sym("x"), Value::Number(100));
        assert_eq!(parent.fetch(&sym("x")), Ok(Value::Number(100)));
        assert_eq!(child.fetch(&sym("x")), Ok(Value::Number(100)));
    }

    #[test]
    fn assign_creates_locally_when_name_is_new() {
        let parent = Environment::root();
        let child = Environment::spawn_from(&parent);
        child.assign(sym("y"), Value::Number(7));
        assert_eq!(child.fetch(&sym("y")), Ok(Value::Number(7)));
        assert_eq!(parent.fetch(&sym("y")), Err(UnknownSymbol(sym("y"))));
    }

    #[test]
    fn define_global_walks_to_the_root() {
        let root = Environment::root();
        let middle = Environment::spawn_from(&root);
        let leaf = Environment::spawn_from(&middle);
        leaf.define_global(sym("z"), Value::Number(9));
        assert_eq!(root.fetch(&sym("z")), Ok(Value::Number(9)));
        assert!(middle.inner.borrow().bindings.get(&sym("z")).is_none());
    }

    #[test]
    fn global_environment_contains_builtins() {
        let env = Environment::global();
        for name in &["+", "-", "*", "/", "list", "head", "tail", "join", "eval", "\\", "def", "="] {
            assert!(
                env.fetch(&sym(name)).is_ok(),
                "builtin '{}' not registered",
                name
            );
        }
    }

    #[test]
    fn copy_on_bind_keeps_bindings_independent() {
        let env = Environment::root();
        let original = Value::wrap_qexpr(vec![Value::Number(1)]);
        env.set(sym("a"), original.clone());
        env.set(sym("b"), original);
        let mut a = env.fetch(&sym("a")).unwrap();
        if let Value::QExpr(children) = &mut a {
            children.push(Value::Number(2));
        }
        env.set(sym("a"), a);
        assert_eq!(
            env.fetch(&sym("b")),
            Ok(Value::wrap_qexpr(vec![Value::Number(1)]))
        );
    }
}
