//! # Keypad calculator engine
//!
//! The logic behind a button-driven calculator, split in two parts that a
//! UI layer drives per button press:
//!
//! * an **input state machine** - a pure reducer
//!   `(CalculatorState, token) -> CalculatorState` that edits the visible
//!   expression the way the keypad promises: functions arrive with their
//!   parentheses pre-inserted, backspace unwinds whole function tokens, a
//!   second operator in a row replaces the first, and `,` is the decimal
//!   separator with at most one per number
//! * an **expression evaluator** - a stateless parse-and-compute pass over
//!   the finished display text
//!
//! The expression text is evaluated exactly as displayed: `×` and `÷`
//! glyphs, comma decimals, and the function names `sin`, `cos`, `tan`,
//! `log`, `ln` plus the inverse forms `sin⁻¹`, `cos⁻¹`, `tan⁻¹` are
//! tokenized directly by the grammar. Trigonometry works in degrees (`sin`
//! of `30` is `0,5`), `log` is base-10, `ln` is natural. Results show at
//! most nine fraction digits with insignificant zeros trimmed.
//!
//! A failed calculation becomes the ordinary display state `"Error"`; the
//! next digit or clear press leaves it. There is no global state anywhere:
//! the host owns the `CalculatorState` and folds tokens into it.
//!
//! ```
//! use tapcalc::{apply_token, CalculatorState};
//!
//! let mut state = CalculatorState::new();
//! for token in &["7", "+", "8", "="] {
//!     state = apply_token(&state, token);
//! }
//! assert_eq!(state.expression, "15");
//! ```

#[macro_use]
extern crate pest_derive;

pub mod errors;
pub mod keypad;
pub mod parse;
pub mod stack;
pub mod state;
pub mod value;

pub use crate::errors::CalcError;
pub use crate::keypad::{clear_label, keypad_layout};
pub use crate::parse::{eval, evaluate};
pub use crate::state::{apply_token, CalculatorState, ERROR_DISPLAY};
pub use crate::value::format_decimal;
