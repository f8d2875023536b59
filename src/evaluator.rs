use crate::environment::{Environment, UnknownSymbol};
use crate::types::{BadArgCount, BadFormals, BuiltinFn, Formals, Lambda, TypeMismatch, Value};
use crate::{environment, types};
use itertools::Itertools;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Value> = std::result::Result<T, Error>;

/// Everything that can go wrong while reducing an expression. These are data,
/// not aborts: an `Error` travels back up as a `Value::Error` and the session
/// carries on with the next input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    UnknownSymbol(environment::UnknownSymbol),
    TypeMismatch(types::TypeMismatch),
    BadArgCount(types::BadArgCount),
    BadFormals(types::BadFormals),
    HeadNotAFunction {
        got: &'static str,
    },
    EmptyArgument {
        name: &'static str,
    },
    DefTargets {
        name: &'static str,
        targets: usize,
        values: usize,
    },
    DivideByZero,
    InvalidNumber(String),
    DepthExceeded(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownSymbol(e) => write!(f, "{}", e),
            Error::TypeMismatch(e) => write!(f, "{}", e),
            Error::BadArgCount(e) => write!(f, "{}", e),
            Error::BadFormals(e) => write!(f, "{}", e),
            Error::HeadNotAFunction { got } => {
                write!(f, "S-expression starts with {}, expected a Function", got)
            }
            Error::EmptyArgument { name } => {
                write!(f, "{} passed an empty Q-expression", name)
            }
            Error::DefTargets {
                name,
                targets,
                values,
            } => write!(
                f,
                "{} expected one value per target symbol ({} symbols, {} values)",
                name, targets, values
            ),
            Error::DivideByZero => write!(f, "Division by zero!"),
            Error::InvalidNumber(_) => write!(f, "invalid number"),
            Error::DepthExceeded(limit) => write!(
                f,
                "expression nesting exceeds the evaluation depth limit ({})",
                limit
            ),
        }
    }
}

impl From<TypeMismatch> for Error {
    fn from(e: TypeMismatch) -> Self {
        Self::TypeMismatch(e)
    }
}

impl From<BadArgCount> for Error {
    fn from(e: BadArgCount) -> Self {
        Self::BadArgCount(e)
    }
}

impl From<UnknownSymbol> for Error {
    fn from(e: UnknownSymbol) -> Self {
        Self::UnknownSymbol(e)
    }
}

impl From<BadFormals> for Error {
    fn from(e: BadFormals) -> Self {
        Self::BadFormals(e)
    }
}

impl From<Error> for Value {
    fn from(e: Error) -> Self {
        Value::Error(e)
    }
}

/// Deeply nested input must come back as an Error, not blow the call stack.
pub const MAX_DEPTH: usize = 1024;

thread_local! {
    static DEPTH: Cell<usize> = Cell::new(0);
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Result<DepthGuard> {
        DEPTH.with(|depth| {
            let current = depth.get();
            if current >= MAX_DEPTH {
                return Err(Error::DepthExceeded(MAX_DEPTH));
            }
            depth.set(current + 1);
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Reduce one value. Symbols resolve through the scope chain, S-expressions
/// go through `eval_sexpr`, everything else already is its own result.
pub fn eval(env: &Rc<Environment>, value: Value) -> Result {
    let _depth = DepthGuard::enter()?;
    log::trace!("eval {}", value);
    match value {
        Value::Symbol(s) => env.fetch(&s).map_err(Error::UnknownSymbol),
        Value::SExpr(list) => eval_sexpr(env, list.0),
        other => Ok(other),
    }
}

fn eval_sexpr(env: &Rc<Environment>, children: Vec<Value>) -> Result {
    // Every child is reduced, in source order, before any error is acted on:
    // an Error produced mid-list must not outrank an Error value sitting to
    // its left.
    let mut evaluated = Vec::with_capacity(children.len());
    for child in children {
        match eval(env, child) {
            Ok(value) => evaluated.push(value),
            Err(e) => evaluated.push(Value::Error(e)),
        }
    }
    if let Some(i) = evaluated.iter().position(|v| matches!(v, Value::Error(_))) {
        return Ok(evaluated.swap_remove(i));
    }
    if evaluated.is_empty() {
        return Ok(Value::empty_sexpr());
    }
    if evaluated.len() == 1 {
        return Ok(evaluated.swap_remove(0));
    }
    let func = evaluated.remove(0);
    apply(env, func, evaluated)
}

/// Apply a function value to an already-evaluated argument list.
pub(crate) fn apply(env: &Rc<Environment>, func: Value, args: Vec<Value>) -> Result {
    match func {
        Value::Builtin(f) => call_builtin(env, f, args),
        Value::Lambda(f) => call_lambda(f, args),
        other => Err(Error::HeadNotAFunction {
            got: other.type_name(),
        }),
    }
}

pub(crate) fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => args[0].to_string(),
        _ => format!("\n\t{}", args.iter().join("\n\t")),
    }
}

fn call_builtin(env: &Rc<Environment>, func: &'static BuiltinFn, args: Vec<Value>) -> Result {
    func.arity
        .validate_for(args.len(), func.name)
        .map_err(Error::BadArgCount)?;
    log::trace!("call {} with {}", func.name, pretty_print_args(&args));
    let result = (func.fn_ptr)(env, args);
    match &result {
        Ok(val) => log::trace!("call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("call to {} failed: {}", func.name, e),
    }
    result
}

/// Bind arguments to formals and run the body, or curry.
///
/// Binding is positional. Supplying fewer arguments than there are fixed
/// formals produces a new Lambda with those bindings layered over the
/// closure and the remaining formals still owed. Supplying at least the
/// fixed formals runs the body, with any surplus collected into the `&`
/// rest-parameter as a Q-expression (empty when there is no surplus), or
/// rejected when no rest-parameter was declared.
fn call_lambda(func: Lambda, args: Vec<Value>) -> Result {
    log::trace!(
        "call (\\ {{{}}}) with {}",
        func.formals,
        pretty_print_args(&args)
    );
    let Lambda {
        formals,
        body,
        closure,
    } = func;
    let Formals { positional, rest } = formals;

    if rest.is_none() && args.len() > positional.len() {
        match types::Arity::exactly(positional.len()).validate_for(args.len(), "lambda") {
            Err(e) => return Err(Error::BadArgCount(e)),
            Ok(()) => unreachable!(),
        }
    }

    let env = Environment::spawn_from(&closure);
    if args.len() < positional.len() {
        let bound = args.len();
        for (key, value) in positional.iter().zip(args) {
            env.set(key.clone(), value);
        }
        let remaining = positional[bound..].to_vec();
        return Ok(Value::Lambda(Lambda {
            formals: Formals {
                positional: remaining,
                rest,
            },
            body,
            closure: env,
        }));
    }

    let mut args = args;
    let surplus = args.split_off(positional.len());
    for (key, value) in positional.iter().zip(args) {
        env.set(key.clone(), value);
    }
    if let Some(rest_key) = rest {
        env.set(rest_key, Value::wrap_qexpr(surplus));
    }
    eval(&env, Value::SExpr(body))
}
