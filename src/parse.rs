use pest::Parser;
use tracing::debug;

use crate::errors::CalcError;
use crate::stack::{Stack, UNARY_MINUS};
use crate::value::{self, CalcResult};

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

/// Evaluates a finalized display expression to its numeric value.
///
/// The text is tokenized as the keypad wrote it: comma decimals, the `×`/`÷`
/// glyphs (ASCII `*`/`/` work too), and function names including the
/// superscript inverse forms. Degree conversion and the base-10 meaning of
/// `log` are applied on the recognized function tokens while the RPN output
/// is folded, so no textual rewriting happens anywhere.
pub fn eval(expr: &str) -> CalcResult {
    let pairs = match CalcParser::parse(Rule::expr, expr) {
        Ok(p) => p,
        Err(..) => return Err(CalcError::ParseFailed("invalid expression".to_string())),
    };

    let mut stk = Stack::new();
    // a value has been seen and no operator after it yet: decides whether
    // "+"/"-" are binary or sign prefixes
    let mut is_last_value = false;
    let mut is_last_open = false;

    for pair in pairs {
        let rule = pair.as_rule();
        let val = pair.as_span().as_str();
        match rule {
            Rule::int | Rule::float => {
                let v = value::parse_decimal(val)?;
                stk.push("", Some(v))?;
                is_last_value = true;
            }
            Rule::open_b => {
                stk.push("(", None)?;
                is_last_value = false;
            }
            Rule::close_b => {
                if is_last_open {
                    // "()" - a function call left without its argument
                    return Err(CalcError::EmptyBrackets);
                }
                stk.push(")", None)?;
                is_last_value = true;
            }
            Rule::operator => {
                if val == "+" && !is_last_value {
                    // unary plus is dropped
                } else if val == "-" && !is_last_value {
                    stk.push(UNARY_MINUS, None)?;
                } else {
                    stk.push(val, None)?;
                    is_last_value = false;
                }
            }
            Rule::func => {
                stk.push(val, None)?;
                is_last_value = false;
            }
            Rule::EOI => {}
            _ => return Err(CalcError::Unreachable),
        }
        is_last_open = rule == Rule::open_b;
    }

    stk.calculate()
}

/// Evaluates an expression and formats the result for the display.
///
/// This is the whole evaluator contract the input state machine relies on:
/// any failure - bad syntax, bad arity, a domain error, a non-finite
/// result - comes back as an `Err` the caller turns into the `"Error"`
/// display state.
pub fn evaluate(expr: &str) -> Result<String, CalcError> {
    debug!(expression = expr, "evaluating");
    let v = eval(expr)?;
    if !v.is_finite() {
        return Err(CalcError::NotFinite);
    }
    Ok(value::format_decimal(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        assert_eq!(evaluate("7+8"), Ok("15".to_string()));
        assert_eq!(evaluate("2+3×4"), Ok("14".to_string()));
        assert_eq!(evaluate("10-2-3"), Ok("5".to_string()));
        assert_eq!(evaluate("20÷4÷5"), Ok("1".to_string()));
        assert_eq!(evaluate("2^3^2"), Ok("512".to_string()));
        assert_eq!(evaluate("2^10"), Ok("1024".to_string()));
        assert_eq!(evaluate("5,5+4,5"), Ok("10".to_string()));
        assert_eq!(evaluate("5,"), Ok("5".to_string()));
        assert_eq!(evaluate("-5+3"), Ok("-2".to_string()));
        assert_eq!(evaluate("0,1+0,2"), Ok("0,3".to_string()));
    }

    #[test]
    fn test_ascii_aliases() {
        assert_eq!(evaluate("2*3"), Ok("6".to_string()));
        assert_eq!(evaluate("6/4"), Ok("1,5".to_string()));
        assert_eq!(evaluate("2.5+2.5"), Ok("5".to_string()));
    }

    #[test]
    fn test_degree_functions() {
        assert_eq!(evaluate("sin(30)"), Ok("0,5".to_string()));
        assert_eq!(evaluate("cos(60)"), Ok("0,5".to_string()));
        assert_eq!(evaluate("tan(45)"), Ok("1".to_string()));
        assert_eq!(evaluate("sin⁻¹(0,5)"), Ok("30".to_string()));
        assert_eq!(evaluate("cos⁻¹(0,5)"), Ok("60".to_string()));
        assert_eq!(evaluate("tan⁻¹(1)"), Ok("45".to_string()));
        assert_eq!(evaluate("log(100)"), Ok("2".to_string()));
        assert_eq!(evaluate("ln(1)"), Ok("0".to_string()));
        assert_eq!(evaluate("sin(30)+cos(60)"), Ok("1".to_string()));
        assert_eq!(evaluate("2×sin(30)"), Ok("1".to_string()));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            eval("5÷0"),
            Err(CalcError::DividedByZero("5".to_string()))
        );
        assert!(evaluate("5÷0").is_err());
    }

    #[test]
    fn test_non_finite_results() {
        // asin outside [-1, 1] is NaN in real math
        assert_eq!(evaluate("sin⁻¹(30)"), Err(CalcError::NotFinite));
        // log of a non-positive number
        assert_eq!(evaluate("log(0-10)"), Err(CalcError::NotFinite));
    }

    #[test]
    fn test_malformed() {
        assert!(evaluate("").is_err());
        assert!(evaluate("abc").is_err());
        assert!(evaluate("7 % 2").is_err());
        assert_eq!(evaluate("sin()"), Err(CalcError::EmptyBrackets));
        // juxtaposed calls do not multiply implicitly
        assert!(evaluate("sin(30)cos(30)").is_err());
        // a dangling operator
        assert!(evaluate("5+").is_err());
    }

    #[test]
    fn test_auto_closed_parentheses() {
        // the state machine closes brackets before delegating, but the
        // stack tolerates an omitted trailing one
        assert_eq!(evaluate("sin(30"), Ok("0,5".to_string()));
    }

    #[test]
    fn test_format_round_trip() {
        for v in &["0,5", "15", "-2", "123456,789", "0,000000001"] {
            let first = eval(v).unwrap();
            let formatted = value::format_decimal(first);
            assert_eq!(formatted, *v);
            assert_eq!(eval(&formatted), Ok(first));
        }
    }
}
