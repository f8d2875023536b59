use crate::evaluator;
use crate::reader::Syntax;
use crate::types::{Int, Value};

/// Convert a parsed syntax tree into a Value ready for evaluation.
///
/// The grammar's anonymous root wrapper builds as an S-expression, so a bare
/// line like `+ 1 2` is an application and a lone `5` reduces by the
/// singleton rule. Number text that overflows the integer type becomes an
/// Error value rather than a failure of the build itself.
pub fn build(tree: &Syntax) -> Value {
    match tree {
        Syntax::Number(text) => build_number(text),
        Syntax::Symbol(name) => Value::new_symbol(name),
        Syntax::SExpr(children) | Syntax::Root(children) => {
            Value::wrap_sexpr(build_children(children))
        }
        Syntax::QExpr(children) => Value::wrap_qexpr(build_children(children)),
    }
}

fn build_children(children: &[Syntax]) -> Vec<Value> {
    children.iter().map(build).collect()
}

fn build_number(text: &str) -> Value {
    match text.parse::<Int>() {
        Ok(number) => Value::Number(number),
        Err(_) => Value::Error(evaluator::Error::InvalidNumber(String::from(text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;

    fn build_str(input: &str) -> Value {
        build(&read_str(input).unwrap())
    }

    #[test]
    fn build_number_and_symbol_leaves() {
        assert_eq!(
            build_str("-42 x"),
            Value::wrap_sexpr(vec![Value::Number(-42), Value::new_symbol("x")])
        );
    }

    #[test]
    fn build_preserves_source_order_and_nesting() {
        assert_eq!(
            build_str("(head {1 2})"),
            Value::wrap_sexpr(vec![Value::wrap_sexpr(vec![
                Value::new_symbol("head"),
                Value::wrap_qexpr(vec![Value::Number(1), Value::Number(2)]),
            ])])
        );
    }

    #[test]
    fn build_overflowing_number_becomes_an_error_value() {
        let built = build_str("99999999999999999999999999");
        match built {
            Value::SExpr(children) => match &children[0] {
                Value::Error(e) => assert_eq!(e.to_string(), "invalid number"),
                other => panic!("expected an Error value, got {:?}", other),
            },
            other => panic!("expected a root S-expression, got {:?}", other),
        }
    }

    #[test]
    fn build_extreme_but_valid_numbers() {
        assert_eq!(
            build_str("9223372036854775807"),
            Value::wrap_sexpr(vec![Value::Number(i64::max_value())])
        );
        assert_eq!(
            build_str("-9223372036854775808"),
            Value::wrap_sexpr(vec![Value::Number(i64::min_value())])
        );
    }
}
