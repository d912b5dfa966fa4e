use crate::errors::CalcError;
use crate::value::{self, CalcErrorResult, CalcResult};

use lazy_static::lazy_static;

#[derive(Clone, Debug)]
pub(crate) enum Entry {
    Val(f64),
    Op(String, i32, bool),
    OpenB,
    Func(String),
}

/// Shunting-yard evaluator: tokens are pushed in infix order, operators
/// wait in `queue` until priority forces them into the RPN `output`, and
/// `calculate` folds the output through `values`.
pub(crate) struct Stack {
    queue: Vec<Entry>,
    output: Vec<Entry>,
    values: Vec<f64>,
}

pub(crate) const UNARY_MINUS: &str = "---";

lazy_static! {
    /// Function names exactly as they appear on the display
    pub(crate) static ref STD_FUNCS: Vec<&'static str> = [
        "sin",
        "cos",
        "tan",
        "log",
        "ln",
        "sin⁻¹",
        "cos⁻¹",
        "tan⁻¹",
    ]
    .to_vec();
}

macro_rules! one_arg_op {
    ($id:ident) => {
        fn $id(&mut self) -> CalcErrorResult {
            if self.values.is_empty() {
                return Err(CalcError::TooManyOps);
            }

            // values is not empty - unwrap is fine
            let v = self.values.pop().unwrap();
            let v = value::$id(v)?;
            self.values.push(v);
            Ok(())
        }
    };
}
macro_rules! two_arg_op {
    ($id:ident) => {
        fn $id(&mut self) -> CalcErrorResult {
            if self.values.len() < 2 {
                return Err(CalcError::TooManyOps);
            }

            let v2 = self.values.pop().unwrap();
            let v1 = self.values.pop().unwrap();
            let v = value::$id(v1, v2)?;
            self.values.push(v);
            Ok(())
        }
    };
}
macro_rules! function_op {
    ($id:ident) => {
        fn $id(&mut self) -> CalcErrorResult {
            if self.values.is_empty() {
                return Err(CalcError::FunctionNoArgs(stringify!($id).to_string()));
            }

            let v = self.values.pop().unwrap();
            let v = value::$id(v)?;
            self.values.push(v);
            Ok(())
        }
    };
}

impl Stack {
    fn priority(op: &str) -> (i32, bool) {
        match op {
            UNARY_MINUS => (20, true),            // negate
            "^" => (17, true),                    // power
            "×" | "*" | "÷" | "/" => (12, false), // mult, div
            "+" | "-" => (8, false),              // add, sub
            _ => (0, false),                      // invalid op
        }
    }

    pub(crate) fn is_func(&self, s: &str) -> bool {
        STD_FUNCS.iter().any(|fname| *fname == s)
    }

    // move operators from the queue to output while the top operator in the
    // queue has equal or greater priority
    fn pop_while_priority(&mut self, priority: i32) {
        loop {
            if self.queue.is_empty() {
                return;
            }
            // queue is not empty, so unwrap is OK
            let e = self.queue.pop().unwrap();
            match &e {
                Entry::OpenB => {
                    self.queue.push(e);
                    return;
                }
                Entry::Func(..) => {
                    self.output.push(e);
                }
                Entry::Op(_, p, right) => {
                    if *p > priority || (*p == priority && !*right) {
                        self.output.push(e);
                    } else {
                        self.queue.push(e);
                        return;
                    }
                }
                _ => return, // unreachable
            }
        }
    }

    // move operators from the queue to output until the opening bracket
    fn pop_until_bracket(&mut self) -> CalcErrorResult {
        loop {
            if self.queue.is_empty() {
                return Err(CalcError::ClosingBracketMismatch);
            }

            // unwrap is ok - vector is not empty
            let e = self.queue.pop().unwrap();
            match &e {
                Entry::OpenB => return Ok(()),
                _ => self.output.push(e),
            }
        }
    }

    // move all operators from queue to output.
    // Must be called only after the expression ends.
    fn pop_all(&mut self) -> CalcErrorResult {
        while let Some(v) = self.queue.pop() {
            match &v {
                Entry::OpenB => {} // do nothing - allows to omit last closing brackets
                Entry::Op(..) | Entry::Func(..) => self.output.push(v),
                _ => return Err(CalcError::Unreachable),
            }
        }
        Ok(())
    }

    // ------------ PUBLIC -----------------

    pub(crate) fn new() -> Self {
        Stack {
            queue: Vec::new(),
            output: Vec::new(),
            values: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, op: &str, val: Option<f64>) -> CalcErrorResult {
        if op.is_empty() {
            if let Some(v) = val {
                self.output.push(Entry::Val(v));
            } else {
                return Err(CalcError::EmptyValue);
            }
            return Ok(());
        }

        if self.is_func(op) {
            self.queue.push(Entry::Func(op.to_owned()));
            return Ok(());
        }

        if op == "(" {
            self.queue.push(Entry::OpenB);
            return Ok(());
        }

        if op == ")" {
            return self.pop_until_bracket();
        }

        let (pri, right_assoc) = Stack::priority(op);
        if pri == 0 {
            return Err(CalcError::InvalidOp(op.to_owned()));
        }

        self.pop_while_priority(pri);
        self.queue.push(Entry::Op(op.to_owned(), pri, right_assoc));

        Ok(())
    }

    pub(crate) fn calculate(&mut self) -> CalcResult {
        self.pop_all()?;
        if self.output.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        self.values = Vec::new();
        let output = std::mem::take(&mut self.output);
        for e in output {
            match e {
                Entry::Val(v) => self.values.push(v),
                Entry::Op(op, ..) => self.process_operator(&op)?,
                Entry::Func(fname) => self.process_function(&fname)?,
                _ => return Err(CalcError::Unreachable),
            }
        }

        if self.values.len() != 1 {
            return Err(CalcError::InsufficientOps);
        }

        // values holds exactly one element here - unwrap is fine
        Ok(self.values.pop().unwrap())
    }

    fn process_operator(&mut self, op: &str) -> CalcErrorResult {
        match op {
            "÷" | "/" => self.divide(),
            "×" | "*" => self.multiply(),
            "+" => self.addition(),
            "-" => self.subtract(),
            "^" => self.power(),
            UNARY_MINUS => self.negate(),
            _ => Err(CalcError::InvalidOp(op.to_string())),
        }
    }

    fn process_function(&mut self, fname: &str) -> CalcErrorResult {
        match fname {
            "sin" => self.sind(),
            "cos" => self.cosd(),
            "tan" => self.tand(),
            "sin⁻¹" => self.asind(),
            "cos⁻¹" => self.acosd(),
            "tan⁻¹" => self.atand(),
            "log" => self.log10(),
            "ln" => self.ln(),
            _ => Err(CalcError::InvalidFunc(fname.to_string())),
        }
    }

    one_arg_op!(negate);

    two_arg_op!(power);
    two_arg_op!(divide);
    two_arg_op!(addition);
    two_arg_op!(subtract);
    two_arg_op!(multiply);

    function_op!(sind);
    function_op!(cosd);
    function_op!(tand);
    function_op!(asind);
    function_op!(acosd);
    function_op!(atand);
    function_op!(log10);
    function_op!(ln);
}
