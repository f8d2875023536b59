use crate::environment::Environment;
use crate::evaluator;
use crate::types::{Arity, BuiltinFn, Formals, Int, Lambda, Symbol, Value};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::rc::Rc;

fn grab_numbers(args: &[Value]) -> evaluator::Result<Vec<Int>> {
    let type_check: Result<Vec<_>, _> = args.iter().map(|v| v.as_number()).collect();
    type_check.map_err(evaluator::Error::TypeMismatch)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

// All four operators fold left-to-right over the argument list; `-` with a
// single argument negates instead. Wrapping arithmetic, as the underlying
// integer width dictates.
fn arithmetic(op: ArithOp, args: Vec<Value>) -> evaluator::Result {
    let numbers = grab_numbers(&args)?;
    let mut numbers = numbers.into_iter();
    let first = match numbers.next() {
        Some(x) => x,
        None => unreachable!(), // arity floor of 1 checked by the caller
    };
    if op == ArithOp::Sub && numbers.len() == 0 {
        return Ok(Value::Number(first.wrapping_neg()));
    }
    let mut acc = first;
    for x in numbers {
        acc = match op {
            ArithOp::Add => acc.wrapping_add(x),
            ArithOp::Sub => acc.wrapping_sub(x),
            ArithOp::Mul => acc.wrapping_mul(x),
            ArithOp::Div => {
                if x == 0 {
                    return Err(evaluator::Error::DivideByZero);
                }
                acc.wrapping_div(x)
            }
        };
    }
    Ok(Value::Number(acc))
}

const SUM: BuiltinFn = BuiltinFn {
    name: "+",
    fn_ptr: |_env, args| arithmetic(ArithOp::Add, args),
    arity: Arity::at_least(1),
};

const SUB: BuiltinFn = BuiltinFn {
    name: "-",
    fn_ptr: |_env, args| arithmetic(ArithOp::Sub, args),
    arity: Arity::at_least(1),
};

const MUL: BuiltinFn = BuiltinFn {
    name: "*",
    fn_ptr: |_env, args| arithmetic(ArithOp::Mul, args),
    arity: Arity::at_least(1),
};

const DIV: BuiltinFn = BuiltinFn {
    name: "/",
    fn_ptr: |_env, args| arithmetic(ArithOp::Div, args),
    arity: Arity::at_least(1),
};

const LIST: BuiltinFn = BuiltinFn {
    name: "list",
    fn_ptr: list_,
    arity: Arity::at_least(0),
};

fn list_(_env: &Rc<Environment>, args: Vec<Value>) -> evaluator::Result {
    // The evaluated argument list simply changes tag.
    Ok(Value::wrap_qexpr(args))
}

const HEAD: BuiltinFn = BuiltinFn {
    name: "head",
    fn_ptr: head_,
    arity: Arity::exactly(1),
};

fn head_(_env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let mut list = args
        .swap_remove(0)
        .into_qexpr()
        .map_err(evaluator::Error::TypeMismatch)?;
    if list.is_empty() {
        return Err(evaluator::Error::EmptyArgument { name: "head" });
    }
    list.truncate(1);
    Ok(Value::QExpr(list))
}

const TAIL: BuiltinFn = BuiltinFn {
    name: "tail",
    fn_ptr: tail_,
    arity: Arity::exactly(1),
};

fn tail_(_env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let mut list = args
        .swap_remove(0)
        .into_qexpr()
        .map_err(evaluator::Error::TypeMismatch)?;
    if list.is_empty() {
        return Err(evaluator::Error::EmptyArgument { name: "tail" });
    }
    list.remove(0);
    Ok(Value::QExpr(list))
}

const JOIN: BuiltinFn = BuiltinFn {
    name: "join",
    fn_ptr: join_,
    arity: Arity::at_least(1),
};

fn join_(_env: &Rc<Environment>, args: Vec<Value>) -> evaluator::Result {
    for arg in &args {
        arg.as_qexpr().map_err(evaluator::Error::TypeMismatch)?;
    }
    let mut joined = Vec::new();
    for arg in args {
        match arg {
            Value::QExpr(list) => joined.extend(list.0),
            _ => unreachable!(), // checked just above
        }
    }
    Ok(Value::wrap_qexpr(joined))
}

const EVAL: BuiltinFn = BuiltinFn {
    name: "eval",
    fn_ptr: eval_,
    arity: Arity::exactly(1),
};

fn eval_(env: &Rc<Environment>, mut args: Vec<Value>) -> evaluator::Result {
    let list = args
        .swap_remove(0)
        .into_qexpr()
        .map_err(evaluator::Error::TypeMismatch)?;
    evaluator::eval(env, Value::SExpr(list))
}

const LAMBDA: BuiltinFn = BuiltinFn {
    name: "\\",
    fn_ptr: lambda_,
    arity: Arity::exactly(2),
};

fn lambda_(env: &Rc<Environment>, args: Vec<Value>) -> evaluator::Result {
    let (formals, body) = match <[Value; 2]>::try_from(args) {
        Ok([formals, body]) => (formals, body),
        Err(_) => unreachable!(), // arity checked by the caller
    };
    let formals = formals
        .into_qexpr()
        .map_err(evaluator::Error::TypeMismatch)?;
    let body = body.into_qexpr().map_err(evaluator::Error::TypeMismatch)?;
    let symbols: Result<Vec<Symbol>, _> = formals.0.into_iter().map(Value::into_symbol).collect();
    let formals = Formals::new(symbols.map_err(evaluator::Error::TypeMismatch)?)
        .map_err(evaluator::Error::BadFormals)?;
    Ok(Value::Lambda(Lambda {
        formals,
        body,
        closure: Rc::clone(env),
    }))
}

enum Scope {
    Global,
    Nearest,
}

fn var_(
    env: &Rc<Environment>,
    mut args: Vec<Value>,
    name: &'static str,
    scope: Scope,
) -> evaluator::Result {
    let values = args.split_off(1);
    let targets = match args.pop() {
        Some(targets) => targets,
        None => unreachable!(), // arity floor of 1 checked by the caller
    };
    let targets = targets
        .into_qexpr()
        .map_err(evaluator::Error::TypeMismatch)?;
    let symbols: Result<Vec<Symbol>, _> = targets.0.into_iter().map(Value::into_symbol).collect();
    let symbols = symbols.map_err(evaluator::Error::TypeMismatch)?;
    if symbols.len() != values.len() {
        return Err(evaluator::Error::DefTargets {
            name,
            targets: symbols.len(),
            values: values.len(),
        });
    }
    for (symbol, value) in symbols.into_iter().zip(values) {
        match scope {
            Scope::Global => env.define_global(symbol, value),
            Scope::Nearest => env.assign(symbol, value),
        }
    }
    Ok(Value::empty_sexpr())
}

const DEF: BuiltinFn = BuiltinFn {
    name: "def",
    fn_ptr: |env, args| var_(env, args, "def", Scope::Global),
    arity: Arity::at_least(1),
};

const PUT: BuiltinFn = BuiltinFn {
    name: "=",
    fn_ptr: |env, args| var_(env, args, "=", Scope::Nearest),
    arity: Arity::at_least(1),
};

type Namespace = HashMap<&'static str, &'static BuiltinFn>;
lazy_static! {
    pub static ref CORE: Namespace = {
        let mut map = Namespace::new();
        for func in [
            // Arithmetic
            SUM,
            SUB,
            MUL,
            DIV,
            // Working with lists
            LIST,
            HEAD,
            TAIL,
            JOIN,
            EVAL,
            // Functions and variables
            LAMBDA,
            DEF,
            PUT,
        ]
        .iter()
        {
            map.insert(func.name, func);
        }
        map
    };
}

pub fn lookup(name: &str) -> Option<&'static BuiltinFn> {
    CORE.get(name).copied()
}
