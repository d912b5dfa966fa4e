use crate::state::CalculatorState;

/// Label of the clear button: backspace once typing has started, full
/// clear otherwise.
pub fn clear_label(state: &CalculatorState) -> &'static str {
    if state.typing_active {
        "⌫"
    } else {
        "AC"
    }
}

/// The button grid the UI should render for the current state. Every label
/// is a token [`crate::state::apply_token`] accepts back.
///
/// The basic grid is five rows of four; scientific mode prepends two rows
/// of five, with the trig labels following the inverse flag.
pub fn keypad_layout(state: &CalculatorState) -> Vec<Vec<&'static str>> {
    let mode_toggle = if state.scientific_mode { "BASIC" } else { "SCI" };
    let (sin, cos, tan) = if state.inverse_mode {
        ("sin⁻¹", "cos⁻¹", "tan⁻¹")
    } else {
        ("sin", "cos", "tan")
    };

    let mut rows: Vec<Vec<&'static str>> = Vec::new();
    if state.scientific_mode {
        rows.push(vec!["Inv", "1/x", "xʸ", "x!", "√"]);
        rows.push(vec![sin, cos, tan, "log", "ln"]);
    }
    rows.push(vec![clear_label(state), "±", "%", "÷"]);
    rows.push(vec!["7", "8", "9", "×"]);
    rows.push(vec!["4", "5", "6", "-"]);
    rows.push(vec!["1", "2", "3", "+"]);
    rows.push(vec![mode_toggle, "0", ",", "="]);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::apply_token;

    #[test]
    fn test_clear_label_follows_typing() {
        let s = CalculatorState::new();
        assert_eq!(clear_label(&s), "AC");
        let s = apply_token(&s, "7");
        let s = apply_token(&s, "0");
        assert_eq!(clear_label(&s), "⌫");
        let s = apply_token(&s, "⌫");
        // one digit left: still editing
        assert_eq!(clear_label(&s), "⌫");
        let s = apply_token(&s, "⌫");
        // backspacing the last character ends the editing session
        assert_eq!(clear_label(&s), "AC");
    }

    #[test]
    fn test_basic_layout() {
        let s = CalculatorState::new();
        let rows = keypad_layout(&s);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], vec!["AC", "±", "%", "÷"]);
        assert_eq!(rows[4], vec!["SCI", "0", ",", "="]);
    }

    #[test]
    fn test_scientific_layout() {
        let s = apply_token(&CalculatorState::new(), "SCI");
        let rows = keypad_layout(&s);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], vec!["Inv", "1/x", "xʸ", "x!", "√"]);
        assert_eq!(rows[1], vec!["sin", "cos", "tan", "log", "ln"]);
        assert_eq!(rows[6], vec!["BASIC", "0", ",", "="]);
    }

    #[test]
    fn test_inverse_labels() {
        let s = apply_token(&CalculatorState::new(), "SCI");
        let s = apply_token(&s, "Inv");
        let rows = keypad_layout(&s);
        assert_eq!(rows[1], vec!["sin⁻¹", "cos⁻¹", "tan⁻¹", "log", "ln"]);
    }
}
