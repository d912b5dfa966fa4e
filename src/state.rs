use tracing::debug;

use crate::parse;
use crate::stack::STD_FUNCS;
use crate::value;

/// The expression text shown when a calculation fails. It is a regular
/// display state, not a fault: the user clears it with `AC`/`⌫` or by
/// starting a new number.
pub const ERROR_DISPLAY: &str = "Error";

/// The whole edit state of the calculator between two button presses.
///
/// Owned by the host UI and replaced wholesale on every token: there is no
/// mutation path besides [`apply_token`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatorState {
    /// The visible, editable formula. Never empty: cleared back to `"0"`.
    pub expression: String,
    /// True right after an operator or `=`; the next digit or function
    /// starts a new number instead of appending.
    pub last_op_or_equals: bool,
    /// Scientific keypad visible. Changes which tokens are reachable, not
    /// how expressions evaluate.
    pub scientific_mode: bool,
    /// Trig buttons resolve to their `⁻¹` forms while set.
    pub inverse_mode: bool,
    /// Any edit happened since the last full clear; flips the clear button
    /// from `AC` to `⌫`.
    pub typing_active: bool,
}

impl Default for CalculatorState {
    fn default() -> CalculatorState {
        CalculatorState {
            expression: "0".to_string(),
            last_op_or_equals: false,
            scientific_mode: false,
            inverse_mode: false,
            typing_active: false,
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Default::default()
    }
}

const OPERATOR_CHARS: [char; 5] = ['+', '-', '×', '÷', '^'];

fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

fn ends_with_operator(expr: &str) -> bool {
    match expr.chars().last() {
        Some(c) => is_operator_char(c),
        None => false,
    }
}

// Digits and decimal separators land inside a trailing function call, not
// after it. Shared by the digit and separator paths so they cannot drift.
fn splice_before_trailing_close_paren(expr: &str, insert: &str) -> String {
    match expr.strip_suffix(')') {
        Some(head) => format!("{}{})", head, insert),
        None => format!("{}{}", expr, insert),
    }
}

fn is_function_token(token: &str) -> bool {
    STD_FUNCS.iter().any(|fname| *fname == token)
}

// The same physical button sends either label depending on what the keypad
// currently shows; the inverse flag decides what actually gets inserted.
// Only the trig names have inverse forms.
fn resolve_function_name(token: &str, inverse: bool) -> &str {
    match token {
        "sin" if inverse => "sin⁻¹",
        "cos" if inverse => "cos⁻¹",
        "tan" if inverse => "tan⁻¹",
        "sin⁻¹" if !inverse => "sin",
        "cos⁻¹" if !inverse => "cos",
        "tan⁻¹" if !inverse => "tan",
        other => other,
    }
}

/// Applies one keypad token to the state and returns the next state.
///
/// Total over the token vocabulary: a token that is a no-op under its guard
/// (and any token outside the vocabulary) returns the state unchanged.
pub fn apply_token(state: &CalculatorState, token: &str) -> CalculatorState {
    debug!(token, expression = %state.expression, "keypad token");

    match token {
        "SCI" | "BASIC" => {
            // switching keypads discards in-progress input
            return CalculatorState {
                expression: "0".to_string(),
                last_op_or_equals: false,
                scientific_mode: !state.scientific_mode,
                inverse_mode: false,
                typing_active: false,
            };
        }
        "Inv" => {
            return CalculatorState {
                inverse_mode: !state.inverse_mode,
                ..state.clone()
            };
        }
        _ => {}
    }

    if state.scientific_mode && matches!(token, "√" | "1/x" | "x!") {
        return apply_immediate_unary(state, token);
    }
    if state.scientific_mode && is_function_token(token) {
        return insert_function_call(state, token);
    }

    match token {
        "AC" | "⌫" => clear_or_backspace(state),
        "=" => apply_equals(state),
        "+" | "-" | "×" | "÷" | "^" | "xʸ" => apply_operator(state, token),
        "±" | "%" => apply_sign_or_percent(state, token),
        "," => apply_decimal_separator(state),
        d if d.len() == 1 && d.as_bytes()[0].is_ascii_digit() => apply_digit(state, d),
        _ => state.clone(),
    }
}

// `√`, `1/x`, `x!`: computed on the spot when the expression is one bare
// number, replacing it with the formatted result. Anything else - an error
// state, a compound expression, unparseable text - only sets the
// operator-or-equals flag.
fn apply_immediate_unary(state: &CalculatorState, token: &str) -> CalculatorState {
    let bare_number = state.expression != ERROR_DISPLAY
        && !state.expression.chars().any(is_operator_char);
    let parsed = if bare_number {
        value::parse_decimal(&state.expression).ok()
    } else {
        None
    };

    let v = match parsed {
        Some(v) => v,
        None => {
            return CalculatorState {
                last_op_or_equals: true,
                ..state.clone()
            };
        }
    };

    let result = match token {
        "√" => Ok(v.sqrt()),
        "1/x" => value::divide(1.0, v),
        "x!" => value::factorial(v),
        _ => Ok(v),
    };

    let expression = match result {
        Ok(r) if r.is_finite() => value::format_decimal(r),
        _ => ERROR_DISPLAY.to_string(),
    };
    CalculatorState {
        expression,
        last_op_or_equals: true,
        ..state.clone()
    }
}

// `sin` .. `ln`: inserts `name()` with the cursor conceptually between the
// parentheses. A fresh `0` or a just-finished calculation is replaced, an
// expression mid-entry is appended to.
fn insert_function_call(state: &CalculatorState, token: &str) -> CalculatorState {
    let name = resolve_function_name(token, state.inverse_mode);
    let base = if state.expression == "0" || state.last_op_or_equals {
        ""
    } else {
        state.expression.as_str()
    };
    CalculatorState {
        expression: format!("{}{}()", base, name),
        last_op_or_equals: true,
        typing_active: true,
        ..state.clone()
    }
}

fn clear_or_backspace(state: &CalculatorState) -> CalculatorState {
    if !state.typing_active {
        // AC semantics
        return CalculatorState {
            expression: "0".to_string(),
            last_op_or_equals: false,
            typing_active: false,
            ..state.clone()
        };
    }

    let (expression, typing_active) =
        if state.expression.chars().count() > 1 && state.expression != ERROR_DISPLAY {
            let shortened = backspace(&state.expression);
            if shortened.is_empty() {
                ("0".to_string(), false)
            } else {
                (shortened, true)
            }
        } else {
            ("0".to_string(), false)
        };
    CalculatorState {
        expression,
        typing_active,
        ..state.clone()
    }
}

// One press of `⌫`. A trailing function call is unwound from the inside
// out: first the characters typed into it, then the whole `name()` token at
// once. Everything else loses its last character.
fn backspace(expr: &str) -> String {
    if expr.ends_with("()") {
        // the call is empty: drop the whole function token
        // ok to unwrap - the suffix was just checked
        let head = expr.strip_suffix("()").unwrap();
        for fname in STD_FUNCS.iter() {
            if let Some(rest) = head.strip_suffix(fname) {
                return rest.to_string();
            }
        }
    } else if expr.ends_with(')') {
        // the call has content: remove the character before the bracket
        let mut shortened = expr.to_string();
        shortened.pop();
        shortened.pop();
        shortened.push(')');
        return shortened;
    }

    let mut shortened = expr.to_string();
    shortened.pop();
    shortened
}

fn apply_equals(state: &CalculatorState) -> CalculatorState {
    if state.expression.is_empty() || state.expression == "0" || state.last_op_or_equals {
        return state.clone();
    }

    let mut finalized = state.expression.clone();
    if ends_with_operator(&finalized) {
        finalized.pop();
    }
    let open = finalized.matches('(').count();
    let close = finalized.matches(')').count();
    for _ in close..open {
        finalized.push(')');
    }

    let expression = match parse::evaluate(&finalized) {
        Ok(result) => result,
        Err(e) => {
            debug!(expression = %finalized, error = %e, "evaluation failed");
            ERROR_DISPLAY.to_string()
        }
    };
    CalculatorState {
        expression,
        last_op_or_equals: true,
        typing_active: false,
        ..state.clone()
    }
}

// A second operator in a row corrects the first instead of stacking.
fn apply_operator(state: &CalculatorState, token: &str) -> CalculatorState {
    if state.expression == ERROR_DISPLAY {
        return state.clone();
    }
    let op = if token == "xʸ" { "^" } else { token };

    let mut expression = state.expression.clone();
    if ends_with_operator(&expression) {
        expression.pop();
    }
    expression.push_str(op);

    CalculatorState {
        expression,
        last_op_or_equals: true,
        typing_active: true,
        ..state.clone()
    }
}

// `±` and `%` act on a single freshly-typed operand only; on a compound
// expression or a function call they do nothing.
fn apply_sign_or_percent(state: &CalculatorState, token: &str) -> CalculatorState {
    if state.expression == ERROR_DISPLAY {
        return state.clone();
    }

    let single_operand = state.expression != "0"
        && !state
            .expression
            .chars()
            .any(|c| is_operator_char(c) || c == '(' || c == ')');

    let mut expression = state.expression.clone();
    if single_operand {
        if let Ok(v) = value::parse_decimal(&state.expression) {
            let v = if token == "±" { -v } else { v / 100.0 };
            expression = value::format_decimal(v);
        }
    }
    CalculatorState {
        expression,
        typing_active: true,
        ..state.clone()
    }
}

fn apply_decimal_separator(state: &CalculatorState) -> CalculatorState {
    if state.expression == ERROR_DISPLAY {
        return state.clone();
    }

    let mut expression = state.expression.clone();
    if ends_with_operator(&expression) {
        // start a new fractional number after the operator
        expression.push_str("0,");
    } else if expression.ends_with("()") {
        expression = splice_before_trailing_close_paren(&expression, "0,");
    } else if state.last_op_or_equals || expression == "0" {
        expression = "0,".to_string();
    } else {
        // at most one separator per number, also inside a trailing call
        let core = expression.strip_suffix(')').unwrap_or(&expression);
        let has_separator = core
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit() || *c == ',')
            .any(|c| c == ',');
        if !has_separator {
            expression = splice_before_trailing_close_paren(&expression, ",");
        }
    }

    CalculatorState {
        expression,
        last_op_or_equals: false,
        typing_active: true,
        ..state.clone()
    }
}

fn apply_digit(state: &CalculatorState, digit: &str) -> CalculatorState {
    let mut expression = state.expression.clone();
    if expression == ERROR_DISPLAY {
        expression = "0".to_string();
    }

    if expression == "0" || state.last_op_or_equals {
        if ends_with_operator(&expression) {
            expression.push_str(digit);
        } else if expression.ends_with("()") {
            expression = splice_before_trailing_close_paren(&expression, digit);
        } else {
            // a new number replaces the bare zero or the previous result
            expression = digit.to_string();
        }
    } else {
        expression = splice_before_trailing_close_paren(&expression, digit);
    }

    CalculatorState {
        expression,
        last_op_or_equals: false,
        typing_active: true,
        ..state.clone()
    }
}
