use crate::environment::Environment;
use crate::{builder, evaluator, printer, reader, Value};
use std::rc::Rc;

pub type Result = std::result::Result<Value, Error>;

#[derive(Debug)]
pub enum Error {
    Read(reader::Error),
    Eval(evaluator::Error),
}

/// Read one line of source into a Value ready for evaluation.
pub fn read(line: &str) -> Result {
    reader::read_str(line)
        .map(|tree| builder::build(&tree))
        .map_err(Error::Read)
}

pub fn eval(env: &Rc<Environment>, value: Value) -> Result {
    evaluator::eval(env, value).map_err(Error::Eval)
}

/// The read-eval-print pipeline for one line of input. Reader diagnostics and
/// evaluation errors both come back as the text to show the user; the REPL
/// and the test suites share this path.
pub fn rep(env: &Rc<Environment>, line: &str) -> String {
    let tree = match reader::read_str(line) {
        Ok(tree) => tree,
        Err(e) => return e.to_string(),
    };
    match evaluator::eval(env, builder::build(&tree)) {
        Ok(value) => printer::pr_str(&value),
        Err(e) => printer::pr_str(&Value::Error(e)),
    }
}
