use crate::symbolic::expr::{Expr, Func, Primary};
use rug::{Integer, Rational};
use std::fmt::{self, Display, Formatter};
use super::Precedence;

/// Renders an [`Expr`] as LaTeX suitable for MathJax / KaTeX when displayed.
///
/// Created by [`Expr::as_latex`].
#[derive(Debug, Clone, Copy)]
pub struct Latex<'a>(pub(super) &'a Expr);

impl Display for Latex<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self.0)
    }
}

fn write_grouped(f: &mut Formatter<'_>, expr: &Expr, paren: bool) -> fmt::Result {
    if paren {
        write!(f, "\\left(")?;
        write_expr(f, expr)?;
        write!(f, "\\right)")
    } else {
        write_expr(f, expr)
    }
}

fn write_number(f: &mut Formatter<'_>, n: &Rational) -> fmt::Result {
    if n.is_integer() {
        write!(f, "{}", n)
    } else if n.cmp0().is_lt() {
        write!(f, "-\\frac{{{}}}{{{}}}", Integer::from(-n.numer()), n.denom())
    } else {
        write!(f, "\\frac{{{}}}{{{}}}", n.numer(), n.denom())
    }
}

fn write_call(f: &mut Formatter<'_>, func: Func, arg: &Expr) -> fmt::Result {
    match func {
        Func::Sin | Func::Cos | Func::Log => {
            let name = match func {
                Func::Sin => "\\sin",
                Func::Cos => "\\cos",
                _ => "\\ln",
            };
            write!(f, "{}", name)?;
            write_grouped(f, arg, true)
        },
        Func::Exp => {
            write!(f, "e^{{")?;
            write_expr(f, arg)?;
            write!(f, "}}")
        },
        Func::Sqrt => {
            write!(f, "\\sqrt{{")?;
            write_expr(f, arg)?;
            write!(f, "}}")
        },
        Func::Abs => {
            write!(f, "\\left|")?;
            write_expr(f, arg)?;
            write!(f, "\\right|")
        },
    }
}

/// Writes the factors of a product next to each other. A numeric coefficient is juxtaposed with
/// the factor after it; other factors are separated by `\cdot`.
fn write_product(f: &mut Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    if factors.is_empty() {
        return write!(f, "1");
    }

    let single = factors.len() == 1;
    for (i, factor) in factors.iter().enumerate() {
        if i > 0 {
            if factors[i - 1].is_number() && !factor.is_number() {
                write!(f, " ")?;
            } else {
                write!(f, " \\cdot ")?;
            }
        }
        write_grouped(f, factor, !single && factor.precedence() < Precedence::Product)?;
    }
    Ok(())
}

/// Writes a product as a fraction if any of its factors belong in a denominator (negative
/// numeric powers, or the denominator of a rational coefficient).
fn write_mul(f: &mut Formatter<'_>, expr: &Expr) -> fmt::Result {
    let (negative, expr) = match expr.negated_form() {
        Some(negated) => (true, negated),
        None => (false, expr.clone()),
    };
    let factors = match expr {
        Expr::Mul(factors) => factors,
        other => vec![other],
    };

    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in factors {
        match factor {
            Expr::Primary(Primary::Number(n)) if !n.is_integer() => {
                let (numer, denom) = n.into_numer_denom();
                if numer != 1 {
                    numerator.push(Expr::from(Rational::from(numer)));
                }
                denominator.push(Expr::from(Rational::from(denom)));
            },
            Expr::Exp(base, exp) if exp.as_number().map_or(false, |e| e.cmp0().is_lt()) => {
                let exp = exp.as_number().map(|e| Rational::from(-e)).unwrap_or_default();
                if exp == 1 {
                    denominator.push(*base);
                } else {
                    denominator.push(base.pow(Expr::from(exp)));
                }
            },
            other => numerator.push(other),
        }
    }

    if negative {
        write!(f, "-")?;
    }
    if denominator.is_empty() {
        write_product(f, &numerator)
    } else {
        write!(f, "\\frac{{")?;
        write_product(f, &numerator)?;
        write!(f, "}}{{")?;
        write_product(f, &denominator)?;
        write!(f, "}}")
    }
}

fn write_power(f: &mut Formatter<'_>, base: &Expr, exp: &Expr) -> fmt::Result {
    if let Some(e) = exp.as_number() {
        if e.cmp0().is_lt() {
            return write_mul(f, &Expr::Mul(vec![base.clone().pow(exp.clone())]));
        }
        if *e.numer() == 1 && *e.denom() == 2 {
            return write_call(f, Func::Sqrt, base);
        }
        if *e.numer() == 1 && *e.denom() > 2 {
            write!(f, "\\sqrt[{}]{{", e.denom())?;
            write_expr(f, base)?;
            return write!(f, "}}");
        }

        // sin^{2}\left(x\right)
        if e.is_integer() {
            if let Expr::Primary(Primary::Call(func @ (Func::Sin | Func::Cos | Func::Log), args)) = base {
                if let [arg] = args.as_slice() {
                    write!(f, "{}^{{{}}}", match func {
                        Func::Sin => "\\sin",
                        Func::Cos => "\\cos",
                        _ => "\\ln",
                    }, e)?;
                    return write_grouped(f, arg, true);
                }
            }
        }
    }

    let paren = base.precedence() <= Precedence::Power
        || base.is_calculus()
        || base.as_call(Func::Exp).is_some();
    write_grouped(f, base, paren)?;
    write!(f, "^{{")?;
    write_expr(f, exp)?;
    write!(f, "}}")
}

fn write_expr(f: &mut Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Primary(Primary::Number(n)) => write_number(f, n),
        Expr::Primary(Primary::Symbol(sym)) => write!(f, "{}", sym),
        Expr::Primary(Primary::Call(func, args)) => match args.as_slice() {
            [arg] => write_call(f, *func, arg),
            _ => {
                write!(f, "\\operatorname{{{}}}\\left(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_expr(f, arg)?;
                }
                write!(f, "\\right)")
            },
        },
        Expr::Add(terms) => {
            let mut iter = terms.iter();
            if let Some(term) = iter.next() {
                write_expr(f, term)?;
            }
            for term in iter {
                match term.negated_form() {
                    Some(negated) => {
                        write!(f, " - ")?;
                        write_grouped(f, &negated, negated.precedence() <= Precedence::Sum)?;
                    },
                    None => {
                        write!(f, " + ")?;
                        write_grouped(f, term, term.precedence() <= Precedence::Sum)?;
                    },
                }
            }
            Ok(())
        },
        Expr::Mul(_) => write_mul(f, expr),
        Expr::Exp(base, exp) => write_power(f, base, exp),
        Expr::Derivative(body, var, order) => {
            if *order == 1 {
                write!(f, "\\frac{{d}}{{d{}}}", var)?;
            } else {
                write!(f, "\\frac{{d^{{{}}}}}{{d{}^{{{}}}}}", order, var, order)?;
            }
            write_grouped(f, body, true)
        },
        Expr::Integral(body, var, bounds) => {
            write!(f, "\\int")?;
            if let Some(bounds) = bounds {
                write!(f, "_{{")?;
                write_expr(f, &bounds.0)?;
                write!(f, "}}^{{")?;
                write_expr(f, &bounds.1)?;
                write!(f, "}}")?;
            }
            write!(f, " ")?;
            write_grouped(f, body, body.precedence() <= Precedence::Product)?;
            write!(f, " \\, d{}", var)
        },
        Expr::Limit(body, var, point) => {
            write!(f, "\\lim_{{{} \\to ", var)?;
            write_expr(f, point)?;
            write!(f, "}} ")?;
            write_grouped(f, body, body.precedence() <= Precedence::Product)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn inverse_renders_as_fraction() {
        let f = x().powi(2) + Expr::number(1);
        let expr = Expr::Mul(vec![f.clone(), f.recip()]);
        assert_eq!(expr.latex(), "\\frac{x^{2} + 1}{x^{2} + 1}");
    }

    #[test]
    fn subtracting_a_sum() {
        let f = x() + Expr::number(1);
        let expr = Expr::Add(vec![f.clone(), -f]);
        assert_eq!(expr.latex(), "x + 1 - \\left(x + 1\\right)");
    }

    #[test]
    fn numbers() {
        assert_eq!(Expr::number((3, 4)).latex(), "\\frac{3}{4}");
        assert_eq!(Expr::number((-3, 4)).latex(), "-\\frac{3}{4}");
        assert_eq!(Expr::Mul(vec![Expr::number(-2), x()]).latex(), "-2 x");
        assert_eq!(Expr::Mul(vec![Expr::number((1, 2)), x()]).latex(), "\\frac{x}{2}");
    }

    #[test]
    fn functions() {
        assert_eq!(x().sqrt().latex(), "\\sqrt{x}");
        assert_eq!(x().pow(Expr::number((1, 3))).latex(), "\\sqrt[3]{x}");
        assert_eq!(x().sin().powi(2).latex(), "\\sin^{2}\\left(x\\right)");
        assert_eq!(x().log().latex(), "\\ln\\left(x\\right)");
        assert_eq!((x() - Expr::number(1)).abs().latex(), "\\left|x - 1\\right|");
        assert_eq!(x().exp().latex(), "e^{x}");
        assert_eq!(x().exp().powi(2).latex(), "\\left(e^{x}\\right)^{2}");
    }

    #[test]
    fn calculus() {
        assert_eq!(
            x().powi(2).derivative("x", 1).latex(),
            "\\frac{d}{dx}\\left(x^{2}\\right)",
        );
        assert_eq!(
            x().powi(2).integral("x", Some((Expr::number(0), Expr::number(1)))).latex(),
            "\\int_{0}^{1} x^{2} \\, dx",
        );
        assert_eq!(
            x().cos().limit("x", Expr::number(0)).latex(),
            "\\lim_{x \\to 0} \\cos\\left(x\\right)",
        );
    }
}
