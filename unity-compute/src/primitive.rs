//! Functions to construct and manipulate exact [`Integer`]s and [`Rational`]s.

use rug::{integer::IsPrime, ops::Pow, Integer, Rational};

/// The largest exponent magnitude that [`rational_pow`] will evaluate exactly. Anything larger is
/// left unevaluated to keep the size of the resulting numbers in check.
pub const MAX_EXACT_EXPONENT: u32 = 64;

/// The largest root index that [`exact_root`] will try to extract.
pub const MAX_ROOT_INDEX: u32 = 16;

/// [`prime_factors`] divides by every candidate below this bound, then falls back to a
/// probabilistic primality test for what remains.
const TRIAL_DIVISION_LIMIT: u32 = 1 << 16;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
///
/// Fractions can be created by passing a `(numerator, denominator)` tuple.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Raises `base` to the integer power `exp`.
///
/// Returns [`None`] if the result is undefined (zero raised to a negative power), or if the
/// magnitude of the exponent is larger than [`MAX_EXACT_EXPONENT`].
pub fn rational_pow(base: &Rational, exp: &Integer) -> Option<Rational> {
    let exp = exp.to_i64()?;
    let magnitude = u32::try_from(exp.unsigned_abs()).ok()?;
    if magnitude > MAX_EXACT_EXPONENT || (exp < 0 && base.cmp0().is_eq()) {
        return None;
    }

    let (numer, denom) = base.clone().into_numer_denom();
    let result = Rational::from((numer.pow(magnitude), denom.pow(magnitude)));
    if exp < 0 {
        Some(result.recip())
    } else {
        Some(result)
    }
}

/// Returns the exact `index`-th root of an integer, if it has one.
fn integer_root(n: &Integer, index: u32) -> Option<Integer> {
    if n.cmp0().is_lt() {
        if index % 2 == 0 {
            return None;
        }
        return integer_root(&int(-n), index).map(|root| -root);
    }

    let root = n.clone().root(index);
    if int((&root).pow(index)) == *n {
        Some(root)
    } else {
        None
    }
}

/// Returns the exact real `index`-th root of `n`, if both its numerator and denominator are
/// perfect powers.
///
/// Odd roots of negative numbers are real and are returned; even roots of negative numbers are
/// not.
pub fn exact_root(n: &Rational, index: u32) -> Option<Rational> {
    if index == 0 || index > MAX_ROOT_INDEX {
        return None;
    }

    let numer = integer_root(n.numer(), index)?;
    let denom = integer_root(n.denom(), index)?;
    Some(Rational::from((numer, denom)))
}

/// Raises `base` to the rational power `exp`, if the result is an exact rational number.
pub fn exact_rational_pow(base: &Rational, exp: &Rational) -> Option<Rational> {
    if exp.is_integer() {
        return rational_pow(base, exp.numer());
    }

    let index = exp.denom().to_u32()?;
    let root = exact_root(base, index)?;
    rational_pow(&root, exp.numer())
}

/// Returns the prime factorization of a positive integer, as `(prime, multiplicity)` pairs in
/// increasing order of the primes. `1` has no factors.
///
/// Returns [`None`] for non-positive integers, and for integers with a composite factor too large
/// to be split by trial division.
pub fn prime_factors(n: &Integer) -> Option<Vec<(Integer, u32)>> {
    if n.cmp0().is_le() {
        return None;
    }

    let mut rest = n.clone();
    let mut factors = Vec::new();
    let mut d: u32 = 2;
    while d < TRIAL_DIVISION_LIMIT && rest >= u64::from(d) * u64::from(d) {
        let mut multiplicity = 0;
        while rest.is_divisible_u(d) {
            rest.div_exact_u_mut(d);
            multiplicity += 1;
        }
        if multiplicity > 0 {
            factors.push((int(d), multiplicity));
        }
        d += if d == 2 { 1 } else { 2 };
    }

    if rest != 1 {
        let limit = u64::from(TRIAL_DIVISION_LIMIT);
        if rest >= limit * limit && rest.is_probably_prime(30) == IsPrime::No {
            return None;
        }
        factors.push((rest, 1));
    }
    Some(factors)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn integer_powers() {
        assert_eq!(rational_pow(&rational(3), &int(4)), Some(rational(81)));
        assert_eq!(rational_pow(&rational((2, 3)), &int(-2)), Some(rational((9, 4))));
        assert_eq!(rational_pow(&rational(0), &int(-1)), None);
        assert_eq!(rational_pow(&rational(0), &int(0)), Some(rational(1)));
    }

    #[test]
    fn huge_exponent_is_not_evaluated() {
        assert_eq!(rational_pow(&rational(2), &int(1000)), None);
    }

    #[test]
    fn roots() {
        assert_eq!(exact_root(&rational((4, 9)), 2), Some(rational((2, 3))));
        assert_eq!(exact_root(&rational(-27), 3), Some(rational(-3)));
        assert_eq!(exact_root(&rational(-4), 2), None);
        assert_eq!(exact_root(&rational(2), 2), None);
    }

    #[test]
    fn rational_powers() {
        assert_eq!(exact_rational_pow(&rational(8), &rational((2, 3))), Some(rational(4)));
        assert_eq!(exact_rational_pow(&rational(4), &rational((-1, 2))), Some(rational((1, 2))));
        assert_eq!(exact_rational_pow(&rational(2), &rational((1, 2))), None);
    }

    #[test]
    fn factorization() {
        assert_eq!(prime_factors(&int(1)), Some(vec![]));
        assert_eq!(prime_factors(&int(7)), Some(vec![(int(7), 1)]));
        assert_eq!(prime_factors(&int(360)), Some(vec![(int(2), 3), (int(3), 2), (int(5), 1)]));
        assert_eq!(prime_factors(&int(4_294_967_311_u64)), Some(vec![(int(4_294_967_311_u64), 1)]));
        assert_eq!(prime_factors(&int(0)), None);
        assert_eq!(prime_factors(&int(-4)), None);
    }
}
