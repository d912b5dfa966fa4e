use crate::errors::CalcError;

/// Expression calculation result: either the numeric value or an error
pub type CalcResult = Result<f64, CalcError>;
pub(crate) type CalcErrorResult = Result<(), CalcError>;

/// Display precision: digits kept after the decimal separator
const MAX_FRACTION_DIGITS: usize = 9;

/// Parses a number in display form. The keypad writes `,` as the decimal
/// separator; a plain `.` is accepted as well so results can be fed back in.
pub(crate) fn parse_decimal(s: &str) -> CalcResult {
    let normalized = s.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) => Ok(v),
        Err(..) => Err(CalcError::StrToFloat(s.to_owned())),
    }
}

/// Formats a value for the display: at most nine fraction digits,
/// insignificant trailing zeros and a bare trailing separator removed,
/// `,` as the decimal separator.
pub fn format_decimal(v: f64) -> String {
    let mut s = format!("{:.*}", MAX_FRACTION_DIGITS, v);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    // a tiny negative rounded away to zero keeps its sign otherwise
    if s == "-0" {
        s = "0".to_owned();
    }
    s.replace('.', ",")
}

pub(crate) fn addition(v1: f64, v2: f64) -> CalcResult {
    Ok(v1 + v2)
}

pub(crate) fn subtract(v1: f64, v2: f64) -> CalcResult {
    Ok(v1 - v2)
}

pub(crate) fn multiply(v1: f64, v2: f64) -> CalcResult {
    Ok(v1 * v2)
}

pub(crate) fn divide(v1: f64, v2: f64) -> CalcResult {
    if v2 == 0.0 {
        return Err(CalcError::DividedByZero(format_decimal(v1)));
    }
    Ok(v1 / v2)
}

pub(crate) fn power(v1: f64, v2: f64) -> CalcResult {
    Ok(v1.powf(v2))
}

pub(crate) fn negate(v: f64) -> CalcResult {
    Ok(-v)
}

/// Factorial over the display domain: integers in `[0, 20]` only, computed
/// as the iterated product. `20!` is the largest factorial exact in f64.
pub(crate) fn factorial(v: f64) -> CalcResult {
    if v < 0.0 || v > 20.0 || v.fract() != 0.0 {
        return Err(CalcError::FactorialDomain(v));
    }
    let n = v as u64;
    let mut acc = 1.0f64;
    for i in 2..=n {
        acc *= i as f64;
    }
    Ok(acc)
}

// Trigonometry works in degrees on the keypad: arguments are converted to
// radians before the call, inverse results back to degrees after it.

pub(crate) fn sind(v: f64) -> CalcResult {
    Ok(v.to_radians().sin())
}

pub(crate) fn cosd(v: f64) -> CalcResult {
    Ok(v.to_radians().cos())
}

pub(crate) fn tand(v: f64) -> CalcResult {
    Ok(v.to_radians().tan())
}

pub(crate) fn asind(v: f64) -> CalcResult {
    Ok(v.asin().to_degrees())
}

pub(crate) fn acosd(v: f64) -> CalcResult {
    Ok(v.acos().to_degrees())
}

pub(crate) fn atand(v: f64) -> CalcResult {
    Ok(v.atan().to_degrees())
}

/// The keypad `log` button is the base-10 logarithm
pub(crate) fn log10(v: f64) -> CalcResult {
    Ok(v.log10())
}

/// The keypad `ln` button is the natural logarithm
pub(crate) fn ln(v: f64) -> CalcResult {
    Ok(v.ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(15.0), "15");
        assert_eq!(format_decimal(0.5), "0,5");
        assert_eq!(format_decimal(-12.5), "-12,5");
        assert_eq!(format_decimal(0.49999999999999994), "0,5");
        assert_eq!(format_decimal(0.1 + 0.2), "0,3");
        assert_eq!(format_decimal(362880.0), "362880");
        // the tenth fraction digit is rounded away
        assert_eq!(format_decimal(1.4142135623730951), "1,414213562");
        // a negligible negative does not display as "-0"
        assert_eq!(format_decimal(-1.0e-13), "0");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("3,14"), Ok(3.14));
        assert_eq!(parse_decimal("5,"), Ok(5.0));
        assert_eq!(parse_decimal("-5"), Ok(-5.0));
        assert_eq!(parse_decimal("2.5"), Ok(2.5));
        assert!(parse_decimal("sin(30)").is_err());
        assert!(parse_decimal("").is_err());
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0), Ok(1.0));
        assert_eq!(factorial(1.0), Ok(1.0));
        assert_eq!(factorial(9.0), Ok(362880.0));
        assert_eq!(factorial(20.0), Ok(2432902008176640000.0));
        assert!(factorial(21.0).is_err());
        assert!(factorial(-1.0).is_err());
        assert!(factorial(2.5).is_err());
        assert!(factorial(f64::NAN).is_err());
    }

    #[test]
    fn test_divide() {
        assert_eq!(divide(1.0, 4.0), Ok(0.25));
        assert_eq!(divide(5.0, 0.0), Err(CalcError::DividedByZero("5".to_owned())));
    }

    #[test]
    fn test_degree_trig() {
        let v = sind(30.0).unwrap();
        assert!((v - 0.5).abs() < 1.0e-12);
        let v = cosd(60.0).unwrap();
        assert!((v - 0.5).abs() < 1.0e-12);
        let v = tand(45.0).unwrap();
        assert!((v - 1.0).abs() < 1.0e-12);
        let v = asind(0.5).unwrap();
        assert!((v - 30.0).abs() < 1.0e-12);
        let v = atand(1.0).unwrap();
        assert!((v - 45.0).abs() < 1.0e-12);
        // out of the real domain: surfaces as NaN for the caller to reject
        assert!(asind(5.0).unwrap().is_nan());
    }
}
