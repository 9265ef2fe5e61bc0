//! Evaluation of limits by direct substitution.
//!
//! A limit of a function that is continuous at the limit point equals the value of the function at
//! that point. This module only evaluates limits where that can be established.

use crate::numeric::Ctxt;
use super::{expr::Expr, sign::is_continuous};

/// An error that can occur while evaluating a limit.
#[derive(Debug, Clone, PartialEq)]
pub enum LimitError {
    /// The body contains operations (such as unevaluated derivatives) whose continuity is unknown.
    Unsupported,

    /// The body is not defined at the limit point, so substitution does not apply.
    Undefined(Expr),
}

impl std::fmt::Display for LimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => write!(f, "the limit cannot be evaluated by substitution"),
            Self::Undefined(expr) => write!(f, "`{}` is undefined at the limit point", expr),
        }
    }
}

impl std::error::Error for LimitError {}

/// Evaluates `lim_{var -> point} body`. No simplification is done on the result.
pub fn limit(body: &Expr, var: &str, point: &Expr) -> Result<Expr, LimitError> {
    if !body.depends_on(var) {
        return Ok(body.clone());
    }
    if !body.is_calculus_free() || !point.is_calculus_free() {
        return Err(LimitError::Unsupported);
    }

    let substituted = body.substitute(var, point);
    if is_continuous(body) {
        return Ok(substituted);
    }

    // elementary functions are continuous wherever they are defined
    match substituted.eval(&Ctxt::new()) {
        Some(_) => Ok(substituted),
        None => Err(LimitError::Undefined(substituted)),
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
    fn continuous_body() {
        let body = x().powi(2) + Expr::number(1);
        let result = limit(&body, "x", &Expr::number(2)).unwrap();
        assert_eq!(result.canonical(), Expr::number(5));
    }

    #[test]
    fn defined_at_point() {
        let body = x().recip();
        let result = limit(&body, "x", &Expr::number(2)).unwrap();
        assert_eq!(result.canonical(), Expr::number((1, 2)));
    }

    #[test]
    fn undefined_at_point() {
        let body = x().recip();
        assert!(matches!(
            limit(&body, "x", &Expr::number(0)),
            Err(LimitError::Undefined(_)),
        ));
    }

    #[test]
    fn constant_body() {
        let body = Expr::number(1).derivative("y", 1);
        assert_eq!(limit(&body, "x", &Expr::number(0)), Ok(body.clone()));
    }

    #[test]
    fn calculus_body() {
        let body = x().powi(2).derivative("x", 1);
        assert_eq!(limit(&body, "x", &Expr::number(0)), Err(LimitError::Unsupported));
    }
}
