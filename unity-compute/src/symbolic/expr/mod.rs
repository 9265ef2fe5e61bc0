//! A representation of mathematical expressions suited to generation and rewriting.
//!
//! [`Expr`] is a closed, recursive `enum`. Sums and products are n-ary ([`Expr::Add`] and
//! [`Expr::Mul`]), so `x + (y + z)` can be stored as a single [`Expr::Add`] node with _three_
//! children. Subtraction and division are not separate nodes: `a - b` is `a + (-1) * b`, and
//! `a / b` is `a * b^(-1)`.
//!
//! Besides the arithmetic nodes, the tree can hold unevaluated calculus operations
//! ([`Expr::Derivative`], [`Expr::Integral`] and [`Expr::Limit`]). Definite integrals and limits
//! **bind** their variable: `x` is not free in `lim_{x -> 0} x + 1`, and substituting a value for
//! `x` leaves the limit untouched.
//!
//! # Equality
//!
//! The derived [`PartialEq`] and [`Eq`] implementations are **syntactic**: `x + 1` and `1 + x` are
//! different trees. The derived [`Ord`] gives a total order over trees, which the
//! [canonical form](Expr::canonical) uses to sort operands. To compare two trees regardless of
//! operand order, compare their canonical forms with [`Expr::structurally_eq`].
//!
//! Neither notion of equality is mathematical equivalence; `x^2 + 2x + 1` and `(x + 1)^2` are
//! different trees under both.

mod iter;

use iter::ExprIter;
use rug::Rational;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

/// A built-in function that can be applied to a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Func {
    Sin,
    Cos,
    Exp,
    Log,
    Sqrt,
    Abs,
}

impl Func {
    /// Every function, in declaration order.
    pub const ALL: [Func; 6] = [Func::Sin, Func::Cos, Func::Exp, Func::Log, Func::Sqrt, Func::Abs];

    /// Returns the name of the function, as it is written in plain text.
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
        }
    }

    /// Returns true if the function is infinitely differentiable everywhere on its domain.
    pub fn is_smooth(self) -> bool {
        !matches!(self, Func::Abs)
    }
}

impl std::fmt::Display for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primary {
    /// An exact rational number, such as `2`, `-7` or `3/4`.
    Number(Rational),

    /// A variable, such as `x`.
    Symbol(String),

    /// A function call, such as `sin(x)`.
    Call(Func, Vec<Expr>),
}

/// A mathematical expression.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// An expression raised to a power.
    Exp(Box<Expr>, Box<Expr>),

    /// The `order`-th derivative of an expression with respect to a variable.
    Derivative(Box<Expr>, String, u32),

    /// The integral of an expression with respect to a variable, with optional
    /// `(lower, upper)` bounds.
    Integral(Box<Expr>, String, Option<Box<(Expr, Expr)>>),

    /// The limit of an expression as a variable approaches a point.
    Limit(Box<Expr>, String, Box<Expr>),
}

impl Expr {
    /// Creates a number.
    pub fn number<T>(n: T) -> Self
    where
        Rational: From<T>,
    {
        Self::Primary(Primary::Number(Rational::from(n)))
    }

    /// The number zero.
    pub fn zero() -> Self {
        Self::number(0)
    }

    /// The number one.
    pub fn one() -> Self {
        Self::number(1)
    }

    /// Creates a variable.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// Applies a function to an argument.
    pub fn call(func: Func, arg: Self) -> Self {
        Self::Primary(Primary::Call(func, vec![arg]))
    }

    /// Raises this expression to a power. No simplification is done.
    pub fn pow(self, exponent: Self) -> Self {
        Self::Exp(Box::new(self), Box::new(exponent))
    }

    /// Raises this expression to an integer power. No simplification is done.
    pub fn powi(self, exponent: i64) -> Self {
        self.pow(Self::number(exponent))
    }

    /// Returns `self^(-1)`. No simplification is done.
    pub fn recip(self) -> Self {
        self.powi(-1)
    }

    /// Returns `sqrt(self)`. No simplification is done.
    pub fn sqrt(self) -> Self {
        Self::call(Func::Sqrt, self)
    }

    /// Returns `|self|`. No simplification is done.
    pub fn abs(self) -> Self {
        Self::call(Func::Abs, self)
    }

    /// Returns `sin(self)`. No simplification is done.
    pub fn sin(self) -> Self {
        Self::call(Func::Sin, self)
    }

    /// Returns `cos(self)`. No simplification is done.
    pub fn cos(self) -> Self {
        Self::call(Func::Cos, self)
    }

    /// Returns `exp(self)`. No simplification is done.
    pub fn exp(self) -> Self {
        Self::call(Func::Exp, self)
    }

    /// Returns `log(self)`, the natural logarithm. No simplification is done.
    pub fn log(self) -> Self {
        Self::call(Func::Log, self)
    }

    /// Wraps this expression in an unevaluated derivative.
    pub fn derivative(self, var: impl Into<String>, order: u32) -> Self {
        Self::Derivative(Box::new(self), var.into(), order.max(1))
    }

    /// Wraps this expression in an unevaluated integral.
    pub fn integral(self, var: impl Into<String>, bounds: Option<(Self, Self)>) -> Self {
        Self::Integral(Box::new(self), var.into(), bounds.map(Box::new))
    }

    /// Wraps this expression in an unevaluated limit.
    pub fn limit(self, var: impl Into<String>, point: Self) -> Self {
        Self::Limit(Box::new(self), var.into(), Box::new(point))
    }

    /// If the expression is a [`Primary::Number`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Self::Primary(Primary::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Primary::Number`].
    pub fn is_number(&self) -> bool {
        self.as_number().is_some()
    }

    /// Returns true if the expression is the number zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().map_or(false, |n| n.cmp0().is_eq())
    }

    /// Returns true if the expression is the number one.
    pub fn is_one(&self) -> bool {
        self.as_number().map_or(false, |n| *n == 1)
    }

    /// If the expression is an integer [`Primary::Number`], returns it as an [`i64`].
    pub fn as_small_integer(&self) -> Option<i64> {
        self.as_number()
            .filter(|n| n.is_integer())
            .and_then(|n| n.numer().to_i64())
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// If the expression is a call to `func`, returns a reference to its argument.
    pub fn as_call(&self, func: Func) -> Option<&Self> {
        match self {
            Self::Primary(Primary::Call(f, args)) if *f == func => args.first(),
            _ => None,
        }
    }

    /// Returns true if the expression is a leaf (a number or a symbol).
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Primary(Primary::Number(_) | Primary::Symbol(_)))
    }

    /// Returns true if the expression is a calculus operation.
    pub fn is_calculus(&self) -> bool {
        matches!(self, Self::Derivative(..) | Self::Integral(..) | Self::Limit(..))
    }

    /// Returns true if no calculus operation appears anywhere in the tree.
    pub fn is_calculus_free(&self) -> bool {
        self.post_order_iter().all(|expr| !expr.is_calculus())
    }

    /// Returns the direct children of this expression, in order.
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Primary(Primary::Call(_, args)) => args.iter().collect(),
            Self::Primary(_) => Vec::new(),
            Self::Add(operands) | Self::Mul(operands) => operands.iter().collect(),
            Self::Exp(base, exp) => vec![&**base, &**exp],
            Self::Derivative(body, _, _) => vec![&**body],
            Self::Integral(body, _, bounds) => match bounds {
                Some(bounds) => vec![&**body, &bounds.0, &bounds.1],
                None => vec![&**body],
            },
            Self::Limit(body, _, point) => vec![&**body, &**point],
        }
    }

    /// Returns mutable references to the direct children of this expression, in order.
    pub fn children_mut(&mut self) -> Vec<&mut Self> {
        match self {
            Self::Primary(Primary::Call(_, args)) => args.iter_mut().collect(),
            Self::Primary(_) => Vec::new(),
            Self::Add(operands) | Self::Mul(operands) => operands.iter_mut().collect(),
            Self::Exp(base, exp) => vec![&mut **base, &mut **exp],
            Self::Derivative(body, _, _) => vec![&mut **body],
            Self::Integral(body, _, bounds) => match bounds {
                Some(bounds) => {
                    let (lower, upper) = &mut **bounds;
                    vec![&mut **body, lower, upper]
                },
                None => vec![&mut **body],
            },
            Self::Limit(body, _, point) => vec![&mut **body, &mut **point],
        }
    }

    /// Returns the number of nodes in the tree.
    pub fn size(&self) -> usize {
        self.post_order_iter().count()
    }

    /// Returns the depth of the tree. A leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(expr.children().into_iter().map(|child| (child, depth + 1)));
        }
        max
    }

    /// Returns true if the variable `var` occurs free in the expression.
    ///
    /// Definite integrals and limits bind their variable, so occurrences of `var` inside them do
    /// not count. An indefinite integral or a derivative with respect to `var` is still a function
    /// of `var`.
    pub fn depends_on(&self, var: &str) -> bool {
        match self {
            Self::Primary(Primary::Number(_)) => false,
            Self::Primary(Primary::Symbol(sym)) => sym == var,
            Self::Primary(Primary::Call(_, args)) => args.iter().any(|arg| arg.depends_on(var)),
            Self::Add(operands) | Self::Mul(operands) => {
                operands.iter().any(|operand| operand.depends_on(var))
            },
            Self::Exp(base, exp) => base.depends_on(var) || exp.depends_on(var),
            Self::Derivative(body, _, _) => body.depends_on(var),
            Self::Integral(body, bound, None) => body.depends_on(var) || bound == var,
            Self::Integral(body, bound, Some(bounds)) => {
                (bound != var && body.depends_on(var))
                    || bounds.0.depends_on(var)
                    || bounds.1.depends_on(var)
            },
            Self::Limit(body, bound, point) => {
                (bound != var && body.depends_on(var)) || point.depends_on(var)
            },
        }
    }

    /// Replaces every free occurrence of `var` with `value`. No simplification is done.
    pub fn substitute(&self, var: &str, value: &Self) -> Self {
        match self {
            Self::Primary(Primary::Symbol(sym)) if sym == var => value.clone(),
            Self::Primary(Primary::Call(func, args)) => Self::Primary(Primary::Call(
                *func,
                args.iter().map(|arg| arg.substitute(var, value)).collect(),
            )),
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => Self::Add(terms.iter().map(|t| t.substitute(var, value)).collect()),
            Self::Mul(factors) => {
                Self::Mul(factors.iter().map(|f| f.substitute(var, value)).collect())
            },
            Self::Exp(base, exp) => Self::Exp(
                Box::new(base.substitute(var, value)),
                Box::new(exp.substitute(var, value)),
            ),
            Self::Derivative(body, wrt, order) if wrt == var => {
                // the derivative must be taken before the point is plugged in
                Self::Derivative(body.clone(), wrt.clone(), *order)
                    .evaluated_at(var, value)
            },
            Self::Derivative(body, wrt, order) => {
                Self::Derivative(Box::new(body.substitute(var, value)), wrt.clone(), *order)
            },
            Self::Integral(body, wrt, None) if wrt == var => {
                Self::Integral(body.clone(), wrt.clone(), None).evaluated_at(var, value)
            },
            Self::Integral(body, wrt, bounds) => {
                let body = if wrt == var {
                    body.as_ref().clone()
                } else {
                    body.substitute(var, value)
                };
                Self::Integral(
                    Box::new(body),
                    wrt.clone(),
                    bounds.as_ref().map(|bounds| Box::new((
                        bounds.0.substitute(var, value),
                        bounds.1.substitute(var, value),
                    ))),
                )
            },
            Self::Limit(body, wrt, point) => {
                let body = if wrt == var {
                    body.as_ref().clone()
                } else {
                    body.substitute(var, value)
                };
                Self::Limit(Box::new(body), wrt.clone(), Box::new(point.substitute(var, value)))
            },
        }
    }

    /// Represents "`self`, evaluated at `var = value`" for operations that must be carried out
    /// before substitution, such as `d/dx f(x)` at `x = 2`.
    ///
    /// The result is `lim_{var -> value} self`, which binds `var` and therefore keeps the
    /// operation intact until it can be evaluated.
    fn evaluated_at(self, var: &str, value: &Self) -> Self {
        self.limit(var, value.clone())
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`Expr::Add`] with zero / one term, or an [`Expr::Mul`]
    /// with zero / one factor. This function checks for these cases and simplifies the expression
    /// into the single term / factor, or the number 0 or 1.
    pub fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::zero()
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::one()
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// If this expression is visibly negative (a negative number, or a product whose leading
    /// numeric coefficient is negative), returns its negation.
    ///
    /// This is used when printing sums, so that `x + (-1) * y` prints as `x - y`.
    pub fn negated_form(&self) -> Option<Self> {
        match self {
            Self::Primary(Primary::Number(n)) if n.cmp0().is_lt() => {
                Some(Self::number(Rational::from(-n)))
            },
            Self::Mul(factors) => {
                let coefficient = factors.first()?.as_number()?;
                if coefficient.cmp0().is_ge() {
                    return None;
                }

                let coefficient = Rational::from(-coefficient);
                let rest = factors[1..].iter().cloned();
                let factors = if coefficient == 1 {
                    rest.collect()
                } else {
                    std::iter::once(Self::number(coefficient)).chain(rest).collect()
                };
                Some(Self::Mul(factors).downgrade())
            },
            _ => None,
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }
}

impl From<Rational> for Expr {
    fn from(n: Rational) -> Self {
        Self::Primary(Primary::Number(n))
    }
}

/// Adds two [`Expr`]s together. No simplification is done, except for the case where both
/// operands are numbers (which are added), or where either operand is an [`Expr::Add`], in which
/// case both are combined in one list of terms (flattening).
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(Primary::Number(lhs)), Self::Primary(Primary::Number(rhs))) => {
                Self::from(lhs + rhs)
            },
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(mut terms)) => {
                terms.insert(0, other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::zero());
        *self = lhs + rhs;
    }
}

/// Subtracts two [`Expr`]s, producing `self + (-1) * rhs`.
impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done, except for the case where both
/// operands are numbers (which are multiplied), or where either operand is an [`Expr::Mul`], in
/// which case both are combined in one list of factors (flattening).
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(Primary::Number(lhs)), Self::Primary(Primary::Number(rhs))) => {
                Self::from(lhs * rhs)
            },
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

impl MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        let lhs = std::mem::replace(self, Self::one());
        *self = lhs * rhs;
    }
}

/// Multiplies this expression by -1. No simplification is done, except for the case where the
/// expression is a number, in which case the number is negated.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Number(n)) => Self::from(-n),
            expr => Self::number(-1) * expr,
        }
    }
}
