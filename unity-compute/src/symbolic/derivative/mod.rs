//! Symbolic differentiation.

mod function;

use rug::Rational;
use super::expr::{Expr, Primary};
use super::sign::is_positive;

/// Returns `true` if the given [`Expr`] is "clearly" zero. This is intended to clean up the
/// resulting trees and is not mathematically rigorous.
fn is_trivially_zero(e: &Expr) -> bool {
    match e {
        Expr::Primary(Primary::Number(n)) => n.cmp0().is_eq(),
        Expr::Add(sum) => sum.iter().all(is_trivially_zero),
        Expr::Mul(mul) => mul.iter().any(is_trivially_zero),
        Expr::Exp(base, exponent) => {
            is_trivially_zero(base) && exponent.as_number().map_or(false, |n| n.cmp0().is_gt())
        },
        _ => false,
    }
}

/// Returns `true` if the given [`Expr`] is "clearly" one. This is intended to clean up the
/// resulting trees and is not mathematically rigorous.
fn is_trivially_unity(e: &Expr) -> bool {
    match e {
        Expr::Primary(Primary::Number(n)) => *n == 1,
        Expr::Mul(exprs) => exprs.iter().all(is_trivially_unity),
        Expr::Exp(base, exponent) => is_trivially_zero(exponent) || is_trivially_unity(base),
        Expr::Add(expr) => expr.len() == 1 && is_trivially_unity(&expr[0]),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder(Vec<Expr>);

impl From<MultBuilder> for Expr {
    fn from(value: MultBuilder) -> Self {
        Expr::Mul(value.0).downgrade()
    }
}

impl MultBuilder {
    fn mult(&mut self, e: Expr) {
        if is_trivially_zero(&e) || self.0.first().is_some_and(is_trivially_zero) {
            self.0 = vec![Expr::zero()];
            return;
        }

        if !is_trivially_unity(&e) {
            self.0.push(e)
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<Expr>);

impl From<SumBuilder> for Expr {
    fn from(value: SumBuilder) -> Self {
        Expr::Add(value.0).downgrade()
    }
}

impl SumBuilder {
    fn add(&mut self, e: Expr) {
        if !is_trivially_zero(&e) {
            self.0.push(e)
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(exprs: &[Expr], var: &str) -> Result<Expr, SymbolicDerivativeError> {
    let mut sum = SumBuilder::default();
    for elem in exprs {
        sum.add(derivative(elem, var)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(product: &[Expr], with: &str) -> Result<Expr, SymbolicDerivativeError> {
    let mut outer_sum = SumBuilder::default();

    for derivative_index in 0..product.len() {
        let mut inner_mult = MultBuilder::default();
        for (term_index, term) in product.iter().enumerate() {
            if derivative_index == term_index {
                inner_mult.mult(derivative(term, with)?);
            } else {
                inner_mult.mult(term.clone());
            }
        }

        outer_sum.add(inner_mult.into());
    }

    Ok(outer_sum.into())
}

/// Differentiates `base^exponent`.
///
/// - `(u^c)' = c * u^(c - 1) * u'` when the exponent is constant;
/// - `(a^v)' = a^v * ln(a) * v'` when the base is constant and positive;
/// - `(u^v)' = u^v * (v' * ln(u) + v * u' * u^(-1))` when the base is positive.
fn power_rule(base: &Expr, exponent: &Expr, with: &str) -> Result<Expr, SymbolicDerivativeError> {
    let mut mult_group = MultBuilder::default();

    if !exponent.depends_on(with) {
        let lowered = match exponent.as_number() {
            Some(n) => Expr::from(Rational::from(n - 1)),
            None => Expr::Add(vec![exponent.clone(), Expr::number(-1)]),
        };
        mult_group.mult(derivative(base, with)?);
        mult_group.mult(exponent.clone());
        mult_group.mult(base.clone().pow(lowered));
        return Ok(mult_group.into());
    }

    if !is_positive(base) {
        return Err(SymbolicDerivativeError::Unsupported);
    }

    if !base.depends_on(with) {
        mult_group.mult(derivative(exponent, with)?);
        mult_group.mult(base.clone().pow(exponent.clone()));
        mult_group.mult(base.clone().log());
        return Ok(mult_group.into());
    }

    let mut log_term = MultBuilder::default();
    log_term.mult(derivative(exponent, with)?);
    log_term.mult(base.clone().log());

    let mut ratio_term = MultBuilder::default();
    ratio_term.mult(exponent.clone());
    ratio_term.mult(derivative(base, with)?);
    ratio_term.mult(base.clone().recip());

    let mut sum = SumBuilder::default();
    sum.add(log_term.into());
    sum.add(ratio_term.into());

    mult_group.mult(base.clone().pow(exponent.clone()));
    mult_group.mult(sum.into());
    Ok(mult_group.into())
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicDerivativeError {
    /// The function may be differentiable, but we do not support symbolically computing it yet
    Unsupported,

    /// The provided sub-expression is not differentiable everywhere it is defined
    Undifferentiable(Expr),
}

impl std::fmt::Display for SymbolicDerivativeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "the derivative cannot be computed symbolically"),
            Self::Undifferentiable(expr) => write!(f, "`{}` is not differentiable", expr),
        }
    }
}

impl std::error::Error for SymbolicDerivativeError {}

/// Computes the derivative of the given expression. Returns [`Err`] if the derivative could not
/// be symbolically computed.
pub fn derivative(f: &Expr, with: &str) -> Result<Expr, SymbolicDerivativeError> {
    if is_trivially_zero(f) || !f.depends_on(with) {
        return Ok(Expr::zero());
    }

    let expr = match f {
        Expr::Primary(Primary::Number(_)) => Expr::zero(),
        Expr::Primary(Primary::Symbol(sym)) => {
            if sym == with {
                Expr::one()
            } else {
                Expr::zero()
            }
        },
        Expr::Primary(Primary::Call(func, args)) => {
            function::function_derivative(f, *func, args, with)?
        },
        Expr::Add(exprs) => sum_rule(exprs, with)?,
        Expr::Mul(exprs) => product_rule(exprs, with)?,
        Expr::Exp(base, exponent) => power_rule(base, exponent, with)?,
        Expr::Derivative(body, var, order) => {
            let inner = nth_derivative(body, var, *order)?;
            derivative(&inner, with)?
        },
        // fundamental theorem of calculus
        Expr::Integral(body, var, None) if var == with => body.as_ref().clone(),
        Expr::Integral(..) | Expr::Limit(..) => return Err(SymbolicDerivativeError::Unsupported),
    };

    if is_trivially_zero(&expr) {
        Ok(Expr::zero())
    } else {
        Ok(expr)
    }
}

/// Computes the `order`-th derivative of the given expression.
pub fn nth_derivative(f: &Expr, with: &str, order: u32) -> Result<Expr, SymbolicDerivativeError> {
    let mut result = f.clone();
    for _ in 0..order {
        result = derivative(&result, with)?;
    }
    Ok(result)
}

#[cfg(test)]
pub mod tests {
    use crate::numeric::Ctxt;
    use super::*;

    use pretty_assertions::assert_eq;

    /// Boilerplate helper function for evaluating an expression and substituting in "x"
    fn eval_x(e: &Expr, x: f64) -> f64 {
        let mut ctxt = Ctxt::new();
        ctxt.add_var("x", x);
        e.eval(&ctxt).expect("expression should be defined at the sample point")
    }

    /// Performs a central finite difference to approximate the derivative of the provided
    /// expression
    fn finite_difference(e: &Expr, x: f64) -> f64 {
        const DX: f64 = 0.00001;
        (eval_x(e, x + DX) - eval_x(e, x - DX)) / (2.0 * DX)
    }

    fn test_for_function(function: &Expr, points: impl IntoIterator<Item = f64>) {
        const TOL: f64 = 0.0001;

        let symbolic = derivative(function, "x")
            .unwrap_or_else(|err| panic!("derivative of `{function}` failed: {err}"));

        for point in points {
            let symbolically_computed = eval_x(&symbolic, point);
            let numerically_computed = finite_difference(function, point);

            assert!(
                (symbolically_computed - numerically_computed).abs() < TOL,
                "For `{function}` at x={point}, symbolically computed derivative was \
                {symbolically_computed} but numerically computed derivative was \
                {numerically_computed}, which was out of tolerance {TOL}",
            );
        }
    }

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn power_rule() {
        test_for_function(&(x().powi(2) + x() + Expr::number(1)), [0., 1., 2., 5., 8.]);
        test_for_function(&(x().powi(2) + Expr::number(1)).recip(), [-2., 0., 1.5]);
        test_for_function(&(x().powi(2) + Expr::number(3)).sqrt(), [-1., 0., 4.]);
    }

    #[test]
    fn trigonometric() {
        test_for_function(&(Expr::number(2) * x()).sin(), [-1., 0., 0.5, 3.]);
        test_for_function(&x().powi(2).cos(), [-1., 0., 0.5, 3.]);
    }

    #[test]
    fn exponential_and_logarithm() {
        test_for_function(&x().sin().exp(), [-1., 0., 2.]);
        test_for_function(&(x().powi(2) + Expr::number(1)).log(), [-1., 0., 2.]);
        test_for_function(&Expr::number(2).pow(x()), [-1., 0., 2.]);
        test_for_function(&(x().powi(2) + Expr::number(1)).pow(x()), [-1., 0.5, 2.]);
    }

    #[test]
    fn second_derivative() {
        // d^2/dx^2 x^3 = 6x
        let second = nth_derivative(&x().powi(3), "x", 2).unwrap();
        assert_eq!(eval_x(&second, 2.0), 12.0);
    }

    #[test]
    fn nested_calculus() {
        // d/dx (d/dx x^3) = 6x
        let expr = x().powi(3).derivative("x", 1);
        let result = derivative(&expr, "x").unwrap();
        assert_eq!(eval_x(&result, 1.5), 9.0);

        // d/dx integral(sin(x), x) = sin(x)
        let expr = x().sin().integral("x", None);
        assert_eq!(derivative(&expr, "x"), Ok(x().sin()));

        // a definite integral does not depend on its bound variable
        let expr = x().integral("x", Some((Expr::number(0), Expr::number(1))));
        assert_eq!(derivative(&expr, "x"), Ok(Expr::zero()));
    }

    #[test]
    fn absolute_value() {
        let positive = (x().powi(2) + Expr::number(1)).abs();
        assert!(derivative(&positive, "x").is_ok());

        let unknown = x().abs();
        assert_eq!(
            derivative(&unknown, "x"),
            Err(SymbolicDerivativeError::Undifferentiable(unknown.clone())),
        );
    }
}
