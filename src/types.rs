extern crate derive_more;
use crate::environment::Environment;
use crate::evaluator;
use derive_more::{Deref, DerefMut};
use itertools::Itertools;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

pub type Int = i64;

#[derive(Deref, DerefMut, Debug, Clone, PartialEq, Default)]
pub struct ValueList(pub Vec<Value>);

#[derive(Deref, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(name.into())
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadArgCount {
    name: &'static str,
    expected: Arity,
    got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "when evaluating {} expected {} arguments, but received {}",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub(crate) const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub(crate) const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub(crate) fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub(crate) fn validate_for(&self, n: usize, name: &'static str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name,
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

pub struct BuiltinFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&Rc<Environment>, Vec<Value>) -> evaluator::Result,
}

impl fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "builtin function #<{}>", self.name)
    }
}

/// A lambda's formal parameter list, split at the variadic marker `&`.
#[derive(Clone, Debug, PartialEq)]
pub struct Formals {
    pub positional: Vec<Symbol>,
    pub rest: Option<Symbol>,
}

impl fmt::Display for Formals {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.positional.iter().join(" "))?;
        if let Some(rest) = &self.rest {
            match self.positional.is_empty() {
                true => write!(f, "& {}", rest)?,
                false => write!(f, " & {}", rest)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BadFormals {
    TooManyRestMarkers(usize),
    MissingRestName,
    RestMarkerNotPenultimate,
}

impl fmt::Display for BadFormals {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BadFormals::TooManyRestMarkers(n) => {
                write!(f, "formals contain {} '&' markers, expected at most one", n)
            }
            BadFormals::MissingRestName => write!(f, "expected a symbol to follow '&'"),
            BadFormals::RestMarkerNotPenultimate => {
                write!(f, "'&' must be followed by exactly one symbol")
            }
        }
    }
}

impl Formals {
    /// Validate a formals list: symbols only, at most one `&`, and `&` (if
    /// present) immediately followed by exactly one rest-parameter name.
    pub fn new(mut symbols: Vec<Symbol>) -> Result<Self, BadFormals> {
        let is_marker = |s: &&Symbol| ***s == "&";
        let marker_count = symbols.iter().filter(is_marker).count();

        match marker_count {
            0 => Ok(Formals {
                positional: symbols,
                rest: None,
            }),
            1 => {
                if symbols.len() < 2 {
                    return Err(BadFormals::MissingRestName);
                }
                let penultimate = &symbols[symbols.len() - 2];
                match is_marker(&penultimate) {
                    false => Err(BadFormals::RestMarkerNotPenultimate),
                    true => {
                        let rest_name = match symbols.pop() {
                            Some(name) => name,
                            None => unreachable!(),
                        };
                        let _marker = symbols.pop();
                        Ok(Formals {
                            positional: symbols,
                            rest: Some(rest_name),
                        })
                    }
                }
            }
            n => Err(BadFormals::TooManyRestMarkers(n)),
        }
    }
}

#[derive(Clone)]
pub struct Lambda {
    pub formals: Formals,
    pub body: ValueList,
    pub closure: Rc<Environment>,
}

impl fmt::Debug for Lambda {
    // Not derived because we want to skip the closure: the closure may well contain this Lambda!
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lambda{{formals: {:?}, body: {:?}}}",
            self.formals, self.body
        )
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Number(Int),
    Error(evaluator::Error),
    Symbol(Symbol),
    Builtin(&'static BuiltinFn),
    Lambda(Lambda),
    SExpr(ValueList),
    QExpr(ValueList),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeMismatch {
    pub expected: &'static str,
    pub got: &'static str,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, got {}", self.expected, self.got)
    }
}

impl Value {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Error(_) => "Error",
            Value::Symbol(_) => "Symbol",
            Value::Builtin(_) | Value::Lambda(_) => "Function",
            Value::SExpr(_) => "S-expression",
            Value::QExpr(_) => "Q-expression",
        }
    }

    fn mismatch(&self, expected: &'static str) -> TypeMismatch {
        TypeMismatch {
            expected,
            got: self.type_name(),
        }
    }

    pub(crate) fn as_number(&self) -> Result<Int, TypeMismatch> {
        match self {
            Value::Number(x) => Ok(*x),
            _ => Err(self.mismatch("Number")),
        }
    }

    pub(crate) fn as_qexpr(&self) -> Result<&ValueList, TypeMismatch> {
        match self {
            Value::QExpr(list) => Ok(list),
            _ => Err(self.mismatch("Q-expression")),
        }
    }

    pub(crate) fn into_qexpr(self) -> Result<ValueList, TypeMismatch> {
        match self {
            Value::QExpr(list) => Ok(list),
            _ => Err(self.mismatch("Q-expression")),
        }
    }

    pub(crate) fn into_symbol(self) -> Result<Symbol, TypeMismatch> {
        match self {
            Value::Symbol(s) => Ok(s),
            _ => Err(self.mismatch("Symbol")),
        }
    }
}

impl Value {
    pub(crate) fn empty_sexpr() -> Self {
        Self::SExpr(ValueList(Vec::new()))
    }
    pub(crate) fn wrap_sexpr(elements: Vec<Value>) -> Self {
        Self::SExpr(ValueList(elements))
    }
    pub(crate) fn wrap_qexpr(elements: Vec<Value>) -> Self {
        Self::QExpr(ValueList(elements))
    }
    pub(crate) fn new_symbol(name: &str) -> Self {
        Self::Symbol(Symbol(name.into()))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match [self, other] {
            [Number(x), Number(y)] => x == y,
            [Error(x), Error(y)] => x == y,
            [Symbol(x), Symbol(y)] => x == y,
            [SExpr(x), SExpr(y)] => equal_sequences(x, y),
            [QExpr(x), QExpr(y)] => equal_sequences(x, y),
            // Function values have no useful notion of equality.
            [_, _] => false,
        }
    }
}

fn equal_sequences(xs: &[Value], ys: &[Value]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| x == y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|name| Symbol::new(name)).collect()
    }

    #[test]
    fn formals_without_rest_marker() {
        let formals = Formals::new(symbols(&["a", "b"])).unwrap();
        assert_eq!(formals.positional, symbols(&["a", "b"]));
        assert_eq!(formals.rest, None);
    }

    #[test]
    fn formals_with_rest_marker() {
        let formals = Formals::new(symbols(&["a", "&", "rest"])).unwrap();
        assert_eq!(formals.positional, symbols(&["a"]));
        assert_eq!(formals.rest, Some(Symbol::new("rest")));
    }

    #[test]
    fn formals_rest_marker_alone_is_rejected() {
        assert_eq!(
            Formals::new(symbols(&["&"])),
            Err(BadFormals::MissingRestName)
        );
    }

    #[test]
    fn formals_rest_marker_must_be_penultimate() {
        assert_eq!(
            Formals::new(symbols(&["&", "x", "y"])),
            Err(BadFormals::RestMarkerNotPenultimate)
        );
    }

    #[test]
    fn formals_reject_multiple_rest_markers() {
        assert_eq!(
            Formals::new(symbols(&["a", "&", "&"])),
            Err(BadFormals::TooManyRestMarkers(2))
        );
    }

    #[test]
    fn formals_display_includes_rest() {
        let formals = Formals::new(symbols(&["a", "b", "&", "xs"])).unwrap();
        assert_eq!(formals.to_string(), "a b & xs");
        let only_rest = Formals::new(symbols(&["&", "xs"])).unwrap();
        assert_eq!(only_rest.to_string(), "& xs");
    }

    #[test]
    fn cloned_lists_are_independent() {
        let original = Value::wrap_qexpr(vec![Value::Number(1), Value::Number(2)]);
        let mut copied = original.clone();
        if let Value::QExpr(children) = &mut copied {
            children.push(Value::Number(3));
        }
        assert_eq!(
            original,
            Value::wrap_qexpr(vec![Value::Number(1), Value::Number(2)])
        );
        assert_ne!(original, copied);
    }

    #[test]
    fn functions_compare_unequal() {
        let lhs = crate::core::lookup("+").map(Value::Builtin).unwrap();
        let rhs = lhs.clone();
        assert_ne!(lhs, rhs);
    }
}
