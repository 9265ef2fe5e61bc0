//! Fixed expressions served when the retry budget is exhausted.

use crate::{generator::VAR, identity::{self, Scheme}, level::Level};
use once_cell::sync::Lazy;
use unity_compute::symbolic::expr::Expr;

fn x() -> Expr {
    Expr::symbol(VAR)
}

/// `(x^2 + 1) * (x^2 + 1)^(-1)`
static ELEMENTARY: Lazy<Expr> = Lazy::new(|| {
    identity::multiplicative_inverse(Expr::Add(vec![x().powi(2), Expr::number(1)]))
});

/// `sqrt(|2x^2 + 3|^2) * sqrt(|2x^2 + 3|^2)^(-1)`
static MIDDLE: Lazy<Expr> = Lazy::new(|| {
    let f = Expr::Add(vec![
        Expr::Mul(vec![Expr::number(2), x().powi(2)]),
        Expr::number(3),
    ]);
    identity::root_power(f, 2)
});

/// `sin(d/dx x^2)^2 + cos(d/dx x^2)^2`
static HIGH: Lazy<Expr> = Lazy::new(|| identity::pythagorean(x().powi(2).derivative(VAR, 1)));

/// Returns the known-good composite for the level, along with the scheme it was built with.
pub fn known_good(level: Level) -> (Expr, Scheme) {
    match level {
        Level::Elementary => (ELEMENTARY.clone(), Scheme::MultiplicativeInverse),
        Level::Middle => (MIDDLE.clone(), Scheme::RootPower),
        Level::High => (HIGH.clone(), Scheme::Pythagorean),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use unity_compute::symbolic::simplify;

    #[test]
    fn known_good_equal_one() {
        for level in Level::ALL {
            let (expr, _) = known_good(level);
            assert_eq!(simplify(&expr), Expr::one(), "`{}`", expr);
        }
    }
}
