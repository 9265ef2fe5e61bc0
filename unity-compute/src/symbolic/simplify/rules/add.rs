//! Simplification rules for expressions involving addition, including combining like terms.

use crate::symbolic::{
    expr::Expr,
    simplify::{rules::do_add, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| !term.is_zero())
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(Expr::Add(new_terms).downgrade())
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::AddZero);
    Some(opt)
}

/// `a+(b+c) = a+b+c`
pub fn flatten_sum(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        if !terms.iter().any(|term| matches!(term, Expr::Add(_))) {
            return None;
        }

        let new_terms = terms.iter()
            .flat_map(|term| match term {
                Expr::Add(inner) => inner.clone(),
                term => vec![term.clone()],
            })
            .collect();
        Some(Expr::Add(new_terms))
    })?;

    step_collector.push(Step::FlattenSum);
    Some(opt)
}

/// `2+a+3 = 5+a`
pub fn fold_numbers(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let (numbers, mut new_terms): (Vec<&Expr>, Vec<&Expr>) = terms.iter()
            .partition(|term| term.is_number());
        if numbers.len() < 2 {
            return None;
        }

        let sum = numbers.into_iter()
            .filter_map(Expr::as_number)
            .fold(Rational::new(), |acc, n| acc + n);
        let folded = Expr::from(sum);
        if !folded.is_zero() {
            new_terms.insert(0, &folded);
        }
        Some(Expr::Add(new_terms.into_iter().cloned().collect()).downgrade())
    })?;

    step_collector.push(Step::FoldNumbers);
    Some(opt)
}

/// Splits a term into its numeric coefficient and the rest of the term. The rest is `1` for a
/// numeric term.
///
/// - `5` -> `(5, 1)`
/// - `3*a` -> `(3, a)`
/// - `1/4*a*b` -> `(1/4, a*b)`
/// - `sqrt(6)` -> `(1, sqrt(6))`
fn split_coefficient(term: &Expr) -> (Rational, Expr) {
    match term {
        Expr::Mul(factors) => {
            let mut coefficient = Rational::from(1);
            let mut rest = Vec::with_capacity(factors.len());
            for factor in factors {
                match factor.as_number() {
                    Some(n) => coefficient *= n,
                    None => rest.push(factor.clone()),
                }
            }
            (coefficient, Expr::Mul(rest).downgrade())
        },
        term => match term.as_number() {
            Some(n) => (n.clone(), Expr::one()),
            None => (Rational::from(1), term.clone()),
        },
    }
}

/// Rebuilds a term from a numeric coefficient and the rest of the term.
fn with_coefficient(coefficient: Rational, rest: Expr) -> Expr {
    if rest.is_one() {
        Expr::from(coefficient)
    } else if coefficient == 1 {
        rest
    } else {
        match rest {
            Expr::Mul(mut factors) => {
                factors.insert(0, Expr::from(coefficient));
                Expr::Mul(factors)
            },
            rest => Expr::Mul(vec![Expr::from(coefficient), rest]),
        }
    }
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `a+a+a = 3a`
/// `2a+3a = 5a`
/// `a-a = 0`
/// etc.
pub fn combine_like_terms(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        // (coefficient, rest of the term, canonical form of the rest)
        let mut groups: Vec<(Rational, Expr, Expr)> = Vec::with_capacity(terms.len());
        for term in terms {
            let (coefficient, rest) = split_coefficient(term);
            let key = rest.canonical();
            match groups.iter_mut().find(|(_, _, other)| *other == key) {
                Some((sum, _, _)) => *sum += coefficient,
                None => groups.push((coefficient, rest, key)),
            }
        }

        if groups.len() == terms.len() {
            return None;
        }

        let new_terms = groups.into_iter()
            .filter(|(coefficient, _, _)| coefficient.cmp0().is_ne())
            .map(|(coefficient, rest, _)| with_coefficient(coefficient, rest))
            .collect();
        Some(Expr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// Applies all addition rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    add_zero(expr, step_collector)
        .or_else(|| flatten_sum(expr, step_collector))
        .or_else(|| fold_numbers(expr, step_collector))
        .or_else(|| combine_like_terms(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn cancel_terms() {
        let f = x().sin() + Expr::number(2);
        let expr = Expr::Add(vec![x().sin(), Expr::Mul(vec![Expr::number(-1), x().sin()])]);
        assert_eq!(combine_like_terms(&expr, &mut ()), Some(Expr::zero()));

        let expr = Expr::Add(vec![f.clone(), Expr::Mul(vec![Expr::number(-1), f.clone()])]);
        assert_eq!(combine_like_terms(&expr, &mut ()), Some(Expr::zero()));
    }

    #[test]
    fn combine_with_coefficients() {
        let expr = Expr::Add(vec![
            Expr::Mul(vec![Expr::number(2), x()]),
            Expr::number(1),
            Expr::Mul(vec![x(), Expr::number(3)]),
        ]);
        let mut steps = Vec::new();
        assert_eq!(
            combine_like_terms(&expr, &mut steps),
            Some(Expr::Add(vec![Expr::Mul(vec![Expr::number(5), x()]), Expr::number(1)])),
        );
        assert_eq!(steps, vec![Step::CombineLikeTerms]);
    }

    #[test]
    fn folding() {
        let expr = Expr::Add(vec![Expr::number(2), x(), Expr::number(-2)]);
        assert_eq!(fold_numbers(&expr, &mut ()), Some(x()));

        let expr = Expr::Add(vec![x(), Expr::number(1)]);
        assert_eq!(fold_numbers(&expr, &mut ()), None);
    }

    #[test]
    fn flatten() {
        let expr = Expr::Add(vec![x(), Expr::Add(vec![Expr::number(1), x().cos()])]);
        assert_eq!(
            flatten_sum(&expr, &mut ()),
            Some(Expr::Add(vec![x(), Expr::number(1), x().cos()])),
        );
    }
}
