use crate::types::Value;
use itertools::Itertools;
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{}", value),
            Value::Error(e) => write!(f, "Error:{}", e),
            Value::Symbol(name) => write!(f, "{}", name),
            Value::Builtin(_) => write!(f, "<builtin>"),
            Value::Lambda(lambda) => write!(
                f,
                "(\\ {{{}}} {{{}}})",
                lambda.formals,
                lambda.body.iter().join(" ")
            ),
            Value::SExpr(children) => write!(f, "({})", children.iter().join(" ")),
            Value::QExpr(children) => write!(f, "{{{}}}", children.iter().join(" ")),
        }
    }
}

pub fn pr_str(value: &Value) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::environment::Environment;
    use crate::evaluator::{eval, Error};
    use crate::reader::read_str;

    fn eval_str(input: &str) -> Value {
        let env = Environment::global();
        eval(&env, build(&read_str(input).unwrap())).unwrap()
    }

    #[test]
    fn print_numbers_as_decimal() {
        assert_eq!(pr_str(&Value::Number(-17)), "-17");
    }

    #[test]
    fn print_symbols_verbatim() {
        assert_eq!(pr_str(&Value::new_symbol("head")), "head");
    }

    #[test]
    fn print_errors_with_prefix() {
        assert_eq!(
            pr_str(&Value::Error(Error::DivideByZero)),
            "Error:Division by zero!"
        );
    }

    #[test]
    fn print_lists_without_trailing_space() {
        assert_eq!(pr_str(&eval_str("{1 2 3}")), "{1 2 3}");
        assert_eq!(pr_str(&Value::empty_sexpr()), "()");
        assert_eq!(pr_str(&Value::wrap_qexpr(vec![])), "{}");
    }

    #[test]
    fn print_nested_lists() {
        assert_eq!(pr_str(&eval_str("{1 {2 3} ()}")), "{1 {2 3} ()}");
    }

    #[test]
    fn print_builtins_opaquely() {
        assert_eq!(pr_str(&eval_str("head")), "<builtin>");
    }

    #[test]
    fn print_lambdas_with_formals_and_body() {
        assert_eq!(pr_str(&eval_str("\\ {a b} {+ a b}")), "(\\ {a b} {+ a b})");
    }

    #[test]
    fn print_variadic_lambda() {
        assert_eq!(
            pr_str(&eval_str("\\ {a & xs} {a}")),
            "(\\ {a & xs} {a})"
        );
    }
}
