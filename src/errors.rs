use thiserror::Error;

/// Everything that can go wrong while tokenizing or evaluating an
/// expression. The UI boundary collapses all of these into the single
/// `"Error"` display state; the variants exist for logs and tests.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CalcError {
    #[error("failed to convert '{0}' to a number")]
    StrToFloat(String),
    #[error("'{0}' divided by zero")]
    DividedByZero(String),
    #[error("factorial argument {0} is not an integer in [0, 20]")]
    FactorialDomain(f64),
    #[error("result is not a finite number")]
    NotFinite,

    #[error("neither value nor operator found")]
    EmptyValue,
    #[error("invalid operator '{0}'")]
    InvalidOp(String),
    #[error("unknown function '{0}'")]
    InvalidFunc(String),
    #[error("too many operators")]
    TooManyOps,
    #[error("mismatched closing bracket")]
    ClosingBracketMismatch,
    #[error("empty brackets")]
    EmptyBrackets,
    #[error("function '{0}' requires an argument")]
    FunctionNoArgs(String),
    #[error("nothing to calculate")]
    EmptyExpression,
    #[error("too many numbers")]
    InsufficientOps,

    #[error("failed to parse expression: {0}")]
    ParseFailed(String),

    #[error("unreachable")]
    Unreachable,
}
