//! Symbolic integration of the integrands that generated expressions contain: polynomials in the
//! variable, and `sin`, `cos`, `exp` and constant-base powers of linear arguments, combined by
//! sums and constant factors.

use rug::Rational;
use super::expr::{Expr, Func, Primary};
use super::{derivative::derivative, sign::{is_continuous, is_positive}};

/// An error that can occur while integrating.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationError {
    /// No antiderivative is known for the given sub-expression.
    Unsupported(Expr),

    /// The integrand is not provably continuous over the whole integration range.
    Discontinuous(Expr),
}

impl std::fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(expr) => write!(f, "no known antiderivative for `{}`", expr),
            Self::Discontinuous(expr) => {
                write!(f, "`{}` may be discontinuous over the integration range", expr)
            },
        }
    }
}

impl std::error::Error for IntegrationError {}

/// If `u` is a linear function of `var` (`a * var + b`, `a != 0`), returns its slope `a`.
fn linear_slope(u: &Expr, var: &str) -> Option<Rational> {
    let slope = derivative(u, var).ok()?.canonical();
    slope.as_number().filter(|n| n.cmp0().is_ne()).cloned()
}

/// Returns `coefficient * expr`, dropping a coefficient of one.
fn scaled(coefficient: Rational, expr: Expr) -> Expr {
    if coefficient == 1 {
        expr
    } else {
        Expr::Mul(vec![Expr::from(coefficient), expr])
    }
}

/// Computes an antiderivative of `f` with respect to `var`. The constant of integration is
/// omitted.
pub fn antiderivative(f: &Expr, var: &str) -> Result<Expr, IntegrationError> {
    let unsupported = || IntegrationError::Unsupported(f.clone());

    if !f.depends_on(var) {
        return Ok(Expr::Mul(vec![f.clone(), Expr::symbol(var)]).downgrade());
    }

    match f {
        Expr::Primary(Primary::Symbol(_)) => {
            Ok(scaled(Rational::from((1, 2)), f.clone().powi(2)))
        },
        Expr::Primary(Primary::Call(func, args)) => {
            let [arg] = args.as_slice() else {
                return Err(unsupported());
            };
            if *func == Func::Sqrt {
                return antiderivative(&arg.clone().pow(Expr::number((1, 2))), var);
            }

            let slope = linear_slope(arg, var).ok_or_else(unsupported)?;
            match func {
                Func::Sin => Ok(scaled(Rational::from(-slope.recip()), arg.clone().cos())),
                Func::Cos => Ok(scaled(slope.recip(), arg.clone().sin())),
                Func::Exp => Ok(scaled(slope.recip(), arg.clone().exp())),
                _ => Err(unsupported()),
            }
        },
        Expr::Add(terms) => terms.iter()
            .map(|term| antiderivative(term, var))
            .collect::<Result<Vec<_>, _>>()
            .map(Expr::Add),
        Expr::Mul(factors) => {
            let (constant, dependent): (Vec<&Expr>, Vec<&Expr>) = factors.iter()
                .partition(|factor| !factor.depends_on(var));
            let [single] = dependent.as_slice() else {
                return Err(unsupported());
            };

            let mut product = constant.into_iter().cloned().collect::<Vec<_>>();
            product.push(antiderivative(single, var)?);
            Ok(Expr::Mul(product).downgrade())
        },
        // u^n, u linear, n != -1
        Expr::Exp(base, exp) if !exp.depends_on(var) => {
            let n = exp.as_number().ok_or_else(unsupported)?;
            if *n == -1 {
                return Err(unsupported());
            }

            let slope = linear_slope(base, var).ok_or_else(unsupported)?;
            let raised = Rational::from(n + 1);
            let coefficient = (raised.clone() * slope).recip();
            Ok(scaled(coefficient, base.as_ref().clone().pow(Expr::from(raised))))
        },
        // a^u = a^u / (ln(a) * u'), u linear, a positive and not one
        Expr::Exp(base, exp) if !base.depends_on(var) && is_positive(base) && !base.is_one() => {
            let slope = linear_slope(exp, var).ok_or_else(unsupported)?;
            Ok(Expr::Mul(vec![
                Expr::from(slope.recip()),
                f.clone(),
                base.as_ref().clone().log().recip(),
            ]))
        },
        Expr::Derivative(body, wrt, order) if wrt == var => {
            if *order == 1 {
                Ok(body.as_ref().clone())
            } else {
                Ok(Expr::Derivative(body.clone(), wrt.clone(), order - 1))
            }
        },
        _ => Err(unsupported()),
    }
}

/// Computes the definite integral of `f` with respect to `var` from `lower` to `upper`, as
/// `F(upper) - F(lower)` where `F` is an [`antiderivative`]. No simplification is done.
///
/// The integrand must be provably continuous over the real line, so that the fundamental theorem
/// of calculus applies regardless of the bounds.
pub fn definite(f: &Expr, var: &str, lower: &Expr, upper: &Expr) -> Result<Expr, IntegrationError> {
    if !is_continuous(f) {
        return Err(IntegrationError::Discontinuous(f.clone()));
    }

    let anti = antiderivative(f, var)?;
    Ok(Expr::Add(vec![
        anti.substitute(var, upper),
        Expr::Mul(vec![Expr::number(-1), anti.substitute(var, lower)]),
    ]))
}

#[cfg(test)]
mod tests {
    use crate::numeric::Ctxt;
    use super::*;

    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    /// Checks that differentiating the antiderivative gives back the integrand, at a few points.
    fn check_antiderivative(f: &Expr) {
        let anti = antiderivative(f, "x").unwrap();
        let back = derivative(&anti, "x").unwrap();
        for point in [-1.5, 0.0, 0.7, 2.0] {
            let mut ctxt = Ctxt::new();
            ctxt.add_var("x", point);
            assert_float_absolute_eq!(back.eval(&ctxt).unwrap(), f.eval(&ctxt).unwrap(), 1e-9);
        }
    }

    #[test]
    fn polynomials() {
        check_antiderivative(&(Expr::number(3) * x().powi(2) - Expr::number(2) * x() + Expr::number(5)));
        check_antiderivative(&(Expr::number(2) * x() + Expr::number(1)).powi(3));
    }

    #[test]
    fn linear_arguments() {
        check_antiderivative(&(Expr::number(2) * x() + Expr::number(1)).sin());
        check_antiderivative(&(Expr::number(-3) * x()).cos());
        check_antiderivative(&Expr::Mul(vec![Expr::number(4), (x() - Expr::number(1)).exp()]));
        check_antiderivative(&Expr::number(2).pow(x()));
    }

    #[test]
    fn nonlinear_arguments_are_unsupported() {
        let f = x().powi(2).sin();
        assert_eq!(antiderivative(&f, "x"), Err(IntegrationError::Unsupported(f.clone())));
    }

    #[test]
    fn fundamental_theorem() {
        let f = x().powi(3).derivative("x", 1);
        assert_eq!(antiderivative(&f, "x"), Ok(x().powi(3)));
    }

    #[test]
    fn definite_integral() {
        // integral of 2x from 0 to 3 = 9
        let result = definite(&(Expr::number(2) * x()), "x", &Expr::number(0), &Expr::number(3))
            .unwrap();
        assert_eq!(result.canonical(), Expr::number(9));
    }

    #[test]
    fn discontinuous_integrand() {
        let f = x().recip();
        assert!(matches!(
            definite(&f, "x", &Expr::number(-1), &Expr::number(1)),
            Err(IntegrationError::Discontinuous(_)),
        ));
    }
}
