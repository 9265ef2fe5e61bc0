//! Floating-point evaluation of expressions.
//!
//! [`Expr::try_eval`] reports why an expression could not be evaluated: it may be undefined at
//! the point (the logarithm of a non-positive number, division by zero, and so on), or one of its
//! values may be too large or too small to be represented as an `f64`. Calculus operations are
//! evaluated through their symbolic counterparts when possible; definite integrals without a known
//! antiderivative fall back to Simpson's rule.

mod ctxt;

pub use ctxt::Ctxt;

use crate::symbolic::{
    derivative::nth_derivative,
    expr::{Expr, Func, Primary},
    integral::{antiderivative, definite},
};
use rug::Rational;

/// Number of subintervals used by [`simpson`]. Must be even.
const SIMPSON_INTERVALS: usize = 256;

/// Offset from the limit point used when a limit cannot be evaluated by substitution.
const LIMIT_OFFSET: f64 = 1e-7;

/// An error that can occur while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The expression is undefined at the point.
    Undefined,

    /// A value overflowed, or underflowed to zero, in `f64` arithmetic. The expression itself may
    /// well be defined at the point.
    OutOfRange,

    /// The expression refers to a variable with no value.
    UnsetVariable(String),

    /// A derivative or indefinite integral could not be computed symbolically.
    Unsupported,
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => write!(f, "the expression is undefined at this point"),
            Self::OutOfRange => write!(f, "a value is out of the range of `f64`"),
            Self::UnsetVariable(name) => write!(f, "the variable `{}` has no value", name),
            Self::Unsupported => write!(f, "a calculus operation cannot be evaluated"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Returns the value if it is finite.
fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::OutOfRange)
    }
}

/// Returns the value of an operation whose exact result is never zero.
fn nonzero(value: f64) -> Result<f64, EvalError> {
    if value == 0.0 {
        Err(EvalError::OutOfRange)
    } else {
        finite(value)
    }
}

fn call(func: Func, arg: f64) -> Result<f64, EvalError> {
    match func {
        Func::Sin => Ok(arg.sin()),
        Func::Cos => Ok(arg.cos()),
        Func::Exp => nonzero(arg.exp()),
        Func::Log if arg > 0.0 => Ok(arg.ln()),
        Func::Sqrt if arg >= 0.0 => Ok(arg.sqrt()),
        Func::Log | Func::Sqrt => Err(EvalError::Undefined),
        Func::Abs => Ok(arg.abs()),
    }
}

/// Raises `base` to an exact rational power. Odd roots of negative numbers are real.
fn rational_power(base: f64, exp: &Rational) -> Result<f64, EvalError> {
    if base == 0.0 {
        return if exp.cmp0().is_gt() {
            Ok(0.0)
        } else if exp.cmp0().is_eq() {
            Ok(1.0)
        } else {
            Err(EvalError::Undefined)
        };
    }

    if exp.is_integer() {
        let exp = exp.numer().to_i32().ok_or(EvalError::OutOfRange)?;
        return nonzero(base.powi(exp));
    }

    let value = exp.to_f64();
    if base > 0.0 {
        return nonzero(base.powf(value));
    }
    if exp.denom().is_odd() {
        let magnitude = nonzero((-base).powf(value))?;
        return Ok(if exp.numer().is_odd() { -magnitude } else { magnitude });
    }
    Err(EvalError::Undefined)
}

/// Approximates the integral of `body` over `[lower, upper]` with composite Simpson's rule.
fn simpson(body: &Expr, var: &str, lower: f64, upper: f64, ctxt: &Ctxt) -> Result<f64, EvalError> {
    let h = (upper - lower) / SIMPSON_INTERVALS as f64;
    let mut inner = ctxt.clone();
    let mut sum = 0.0;
    for i in 0..=SIMPSON_INTERVALS {
        inner.add_var(var, lower + h * i as f64);
        let weight = if i == 0 || i == SIMPSON_INTERVALS {
            1.0
        } else if i % 2 == 1 {
            4.0
        } else {
            2.0
        };
        sum += weight * body.try_eval(&inner)?;
    }
    finite(sum * h / 3.0)
}

impl Expr {
    /// Evaluates the expression with the variables in the given context.
    pub fn try_eval(&self, ctxt: &Ctxt) -> Result<f64, EvalError> {
        let value = match self {
            Self::Primary(Primary::Number(n)) => n.to_f64(),
            Self::Primary(Primary::Symbol(sym)) => ctxt
                .get_var(sym)
                .ok_or_else(|| EvalError::UnsetVariable(sym.clone()))?,
            Self::Primary(Primary::Call(func, args)) => {
                let [arg] = args.as_slice() else {
                    return Err(EvalError::Unsupported);
                };
                call(*func, arg.try_eval(ctxt)?)?
            },
            Self::Add(terms) => terms.iter()
                .map(|term| term.try_eval(ctxt))
                .sum::<Result<f64, _>>()?,
            Self::Mul(factors) => {
                let values = factors.iter()
                    .map(|factor| factor.try_eval(ctxt))
                    .collect::<Result<Vec<_>, _>>()?;
                let product = values.iter().product::<f64>();
                if product == 0.0 && values.iter().all(|value| *value != 0.0) {
                    return Err(EvalError::OutOfRange);
                }
                product
            },
            Self::Exp(base, exp) => {
                let base = base.try_eval(ctxt)?;
                match exp.as_number() {
                    Some(exp) => rational_power(base, exp)?,
                    None => {
                        let exp = exp.try_eval(ctxt)?;
                        if base > 0.0 {
                            nonzero(base.powf(exp))?
                        } else if base == 0.0 && exp > 0.0 {
                            0.0
                        } else {
                            return Err(EvalError::Undefined);
                        }
                    },
                }
            },
            Self::Derivative(body, var, order) => nth_derivative(body, var, *order)
                .map_err(|_| EvalError::Unsupported)?
                .try_eval(ctxt)?,
            Self::Integral(body, var, None) => antiderivative(body, var)
                .map_err(|_| EvalError::Unsupported)?
                .try_eval(ctxt)?,
            Self::Integral(body, var, Some(bounds)) => {
                match definite(body, var, &bounds.0, &bounds.1) {
                    Ok(value) => value.try_eval(ctxt)?,
                    Err(_) => {
                        let lower = bounds.0.try_eval(ctxt)?;
                        let upper = bounds.1.try_eval(ctxt)?;
                        simpson(body, var, lower, upper, ctxt)?
                    },
                }
            },
            Self::Limit(body, var, point) => {
                let point = point.try_eval(ctxt)?;
                let mut inner = ctxt.clone();
                inner.add_var(var.as_str(), point);
                match body.try_eval(&inner) {
                    Ok(value) => value,
                    Err(EvalError::Undefined) => {
                        inner.add_var(var.as_str(), point - LIMIT_OFFSET);
                        let left = body.try_eval(&inner)?;
                        inner.add_var(var.as_str(), point + LIMIT_OFFSET);
                        let right = body.try_eval(&inner)?;
                        if (left - right).abs() > 1e-4 * (1.0 + left.abs()) {
                            return Err(EvalError::Undefined);
                        }
                        (left + right) / 2.0
                    },
                    Err(err) => return Err(err),
                }
            },
        };
        finite(value)
    }

    /// Evaluates the expression with a single variable set to the given value.
    pub fn try_eval_at(&self, var: &str, value: f64) -> Result<f64, EvalError> {
        self.try_eval(&Ctxt::with_var(var, value))
    }

    /// Evaluates the expression with the variables in the given context, returning [`None`] if
    /// it cannot be evaluated for any reason.
    pub fn eval(&self, ctxt: &Ctxt) -> Option<f64> {
        self.try_eval(ctxt).ok()
    }

    /// Evaluates the expression with a single variable set to the given value.
    pub fn eval_at(&self, var: &str, value: f64) -> Option<f64> {
        self.eval(&Ctxt::with_var(var, value))
    }
}
