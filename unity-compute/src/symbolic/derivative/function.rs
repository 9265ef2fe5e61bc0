//! Symbolic derivatives of the built-in functions, with the chain rule applied.

use crate::symbolic::expr::{Expr, Func};
use crate::symbolic::sign::is_positive;
use super::{derivative, MultBuilder, SymbolicDerivativeError};

/// Computes the derivative of a call to a supported function and performs the chain rule.
///
/// `call` is the whole call expression, reported back if it turns out to be undifferentiable.
pub(super) fn function_derivative(
    call: &Expr,
    func: Func,
    args: &[Expr],
    with: &str,
) -> Result<Expr, SymbolicDerivativeError> {
    let [arg] = args else {
        return Err(SymbolicDerivativeError::Unsupported);
    };
    let mut mult_group = MultBuilder::default();

    match func {
        Func::Sqrt => return derivative(&arg.clone().pow(Expr::number((1, 2))), with),
        Func::Sin => {
            mult_group.mult(derivative(arg, with)?);
            mult_group.mult(arg.clone().cos());
        },
        Func::Cos => {
            mult_group.mult(derivative(arg, with)?);
            mult_group.mult(Expr::number(-1));
            mult_group.mult(arg.clone().sin());
        },
        Func::Exp => {
            mult_group.mult(derivative(arg, with)?);
            mult_group.mult(arg.clone().exp());
        },
        Func::Log => {
            mult_group.mult(derivative(arg, with)?);
            mult_group.mult(arg.clone().recip());
        },
        // |u| = u wherever u is positive; anywhere else there may be a kink
        Func::Abs if is_positive(arg) => return derivative(arg, with),
        Func::Abs => return Err(SymbolicDerivativeError::Undifferentiable(call.clone())),
    }

    Ok(mult_group.into())
}
