//! Random generation of base expressions.
//!
//! The generator is a recursive descent over a per-level weighted table of node kinds. Every
//! recursive call receives a depth budget, and a budget of one forces a terminal. Subexpressions
//! that need to be positive or non-negative (denominators, `log` arguments, radicands) are
//! rewritten as `u^2 + k` when their sign cannot be proven, and the depth this costs is taken out
//! of the budget beforehand, so a generated base never exceeds [`Level::max_depth`].

use crate::level::Level;
use log::trace;
use rand::{distributions::{Distribution, WeightedIndex}, Rng};
use unity_compute::symbolic::{
    expr::Expr,
    simplify,
    sign::{is_nonnegative, is_nonzero, is_positive},
};

/// The variable generated expressions are written in.
pub const VAR: &str = "x";

/// Points a [`Kind::Limit`] approaches.
pub const LIMIT_POINTS: [i64; 4] = [0, 1, -1, 2];

/// Number of draws before giving up on a better base expression.
const MAX_DRAWS: usize = 8;

/// Depth added by wrapping a subexpression `u` as `u^2 + k` or `|u| + k`.
const GUARD_DEPTH: usize = 2;

/// The kinds of nodes the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Number,
    Symbol,
    Add,
    Sub,
    Mul,
    DivConst,
    Power,
    Sqrt,
    RationalPower,
    RootOfSquare,
    Polynomial,
    Sin,
    Cos,
    Exp,
    Log,
    Abs,
    RootPower,
    Derivative,
    Integral,
    Limit,
}

impl Kind {
    /// The smallest depth budget a node of this kind fits in.
    fn min_budget(self) -> usize {
        match self {
            Kind::Number | Kind::Symbol => 1,
            Kind::Add | Kind::Mul | Kind::Power | Kind::Sqrt | Kind::RationalPower => 2,
            Kind::Sin | Kind::Cos | Kind::Exp | Kind::Log | Kind::Abs => 2,
            Kind::Derivative | Kind::Limit => 2,
            Kind::Sub | Kind::DivConst | Kind::RootOfSquare => 3,
            Kind::Polynomial | Kind::RootPower | Kind::Integral => 4,
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, Kind::Number | Kind::Symbol)
    }

    /// Whether the kind is differentiable everywhere its arguments are.
    fn is_smooth(self) -> bool {
        !matches!(self, Kind::Abs | Kind::RootOfSquare | Kind::RootPower)
    }

    fn is_calculus(self) -> bool {
        matches!(self, Kind::Derivative | Kind::Integral | Kind::Limit)
    }
}

/// The weighted table of node kinds for a level.
fn weights(level: Level) -> &'static [(Kind, u32)] {
    match level {
        Level::Elementary => &[
            (Kind::Number, 3),
            (Kind::Symbol, 4),
            (Kind::Add, 4),
            (Kind::Sub, 3),
            (Kind::Mul, 4),
            (Kind::DivConst, 2),
            (Kind::Power, 3),
        ],
        Level::Middle => &[
            (Kind::Number, 3),
            (Kind::Symbol, 4),
            (Kind::Add, 3),
            (Kind::Sub, 2),
            (Kind::Mul, 3),
            (Kind::DivConst, 1),
            (Kind::Power, 2),
            (Kind::Sqrt, 2),
            (Kind::RationalPower, 2),
            (Kind::RootOfSquare, 1),
            (Kind::Polynomial, 3),
        ],
        Level::High => &[
            (Kind::Number, 2),
            (Kind::Symbol, 4),
            (Kind::Add, 3),
            (Kind::Sub, 2),
            (Kind::Mul, 3),
            (Kind::DivConst, 1),
            (Kind::Power, 2),
            (Kind::Sqrt, 1),
            (Kind::RationalPower, 1),
            (Kind::RootOfSquare, 1),
            (Kind::Polynomial, 2),
            (Kind::Sin, 2),
            (Kind::Cos, 2),
            (Kind::Exp, 1),
            (Kind::Log, 1),
            (Kind::Abs, 1),
            (Kind::RootPower, 1),
            (Kind::Derivative, 2),
            (Kind::Integral, 2),
            (Kind::Limit, 1),
        ],
    }
}

/// Returns true if the expression still depends on [`VAR`] once simplified, so that constants
/// in disguise such as `(-9 + 4)^2 + 3` or `d/dx (3x)` are not served as functions of `x`.
fn varies(expr: &Expr) -> bool {
    expr.depends_on(VAR) && simplify(expr).depends_on(VAR)
}

/// Restrictions that apply to a subtree.
#[derive(Debug, Clone, Copy)]
struct Context {
    /// Only smooth constructions (inside derivative bodies).
    smooth: bool,

    /// Whether derivatives, integrals and limits may appear (not inside limit bodies).
    calculus: bool,
}

impl Context {
    const TOP: Context = Context { smooth: false, calculus: true };

    fn allows(self, kind: Kind) -> bool {
        (!self.smooth || kind.is_smooth()) && (self.calculus || !kind.is_calculus())
    }
}

/// Generates random base expressions for a [`Level`].
#[derive(Debug)]
pub struct Generator<R> {
    rng: R,
    level: Level,
}

impl<R: Rng> Generator<R> {
    /// Creates a generator for the given level, drawing randomness from `rng`.
    pub fn new(level: Level, rng: R) -> Self {
        Self { rng, level }
    }

    /// Returns the level this generator generates for.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Generates a base expression.
    ///
    /// The result is a function of [`VAR`] that is well defined for every real `x`, never vanishes,
    /// and its depth does not exceed [`Level::max_depth`]. Draws that do not depend on `x` once
    /// simplified are discarded, and draws smaller than [`Level::min_size`] are re-drawn, both a
    /// bounded number of times. If every draw is constant, a guarded multiple of `x` is returned.
    pub fn generate(&mut self) -> Expr {
        let min_size = self.level.min_size();
        let mut largest: Option<Expr> = None;
        for _ in 0..MAX_DRAWS * 2 {
            let next = self.draw();
            if !varies(&next) {
                trace!("discarded constant base `{}`", next);
                continue;
            }

            let done = next.size() >= min_size;
            if largest.as_ref().map_or(true, |largest| next.size() > largest.size()) {
                largest = Some(next);
            }
            if done {
                break;
            }
        }

        let base = match largest {
            Some(base) => base,
            None => self.linear_base(),
        };
        trace!("generated base `{}` (size {}, depth {})", base, base.size(), base.depth());
        base
    }

    /// The base of last resort, `(c*x)^2 + k`, which fits the depth of every level.
    fn linear_base(&mut self) -> Expr {
        let term = Expr::Mul(vec![Expr::number(self.coefficient()), Expr::symbol(VAR)]);
        let k = Expr::number(self.rng.gen_range(1..=3));
        Expr::Add(vec![term.powi(2), k])
    }

    /// Draws one guarded base expression.
    fn draw(&mut self) -> Expr {
        let max_depth = self.level.max_depth();
        for _ in 0..MAX_DRAWS {
            let body = self.compound(max_depth, Context::TOP);
            if is_nonzero(&body) {
                return body;
            }
            if body.depth() + GUARD_DEPTH <= max_depth {
                return self.guard_base(body);
            }
        }

        let body = self.compound(max_depth - GUARD_DEPTH, Context::TOP);
        if is_nonzero(&body) {
            body
        } else {
            self.guard_base(body)
        }
    }

    /// Makes a base expression provably non-vanishing: `f^2 + k`, or also `|f| + k` at
    /// [`Level::High`].
    fn guard_base(&mut self, body: Expr) -> Expr {
        let k = Expr::number(self.rng.gen_range(1..=3));
        if self.level == Level::High && self.rng.gen_bool(0.5) {
            Expr::Add(vec![body.abs(), k])
        } else {
            Expr::Add(vec![body.powi(2), k])
        }
    }

    /// A non-zero integer coefficient in `[-9, 9]`.
    fn coefficient(&mut self) -> i64 {
        let n = self.rng.gen_range(1..=9);
        if self.rng.gen_bool(0.5) {
            -n
        } else {
            n
        }
    }

    fn terminal(&mut self) -> Expr {
        if self.rng.gen_bool(0.6) {
            Expr::symbol(VAR)
        } else {
            Expr::number(self.coefficient())
        }
    }

    /// Picks a kind from the level's table among those that fit the budget and context.
    fn pick(&mut self, budget: usize, ctx: Context, allow_terminal: bool) -> Option<Kind> {
        if budget <= 1 {
            return None;
        }

        let candidates = weights(self.level)
            .iter()
            .copied()
            .filter(|(kind, _)| {
                kind.min_budget() <= budget
                    && ctx.allows(*kind)
                    && (allow_terminal || !kind.is_terminal())
            })
            .collect::<Vec<_>>();
        let dist = WeightedIndex::new(candidates.iter().map(|(_, weight)| *weight)).ok()?;
        Some(candidates[dist.sample(&mut self.rng)].0)
    }

    /// Generates any node, terminal or not, of depth at most `budget`.
    fn node(&mut self, budget: usize, ctx: Context) -> Expr {
        match self.pick(budget, ctx, true) {
            Some(kind) => self.build(kind, budget, ctx),
            None => self.terminal(),
        }
    }

    /// Generates a non-terminal node of depth at most `budget`, if the budget allows one.
    fn compound(&mut self, budget: usize, ctx: Context) -> Expr {
        match self.pick(budget, ctx, false) {
            Some(kind) => self.build(kind, budget, ctx),
            None => self.terminal(),
        }
    }

    /// Generates a node that is provably non-negative.
    fn nonnegative(&mut self, budget: usize, ctx: Context) -> Expr {
        self.guarded(budget, ctx, is_nonnegative)
    }

    /// Generates a radicand: strictly positive inside derivative bodies, where a root must be
    /// differentiable, and non-negative elsewhere.
    fn radicand(&mut self, budget: usize, ctx: Context) -> Expr {
        if ctx.smooth {
            self.positive(budget, ctx)
        } else {
            self.nonnegative(budget, ctx)
        }
    }

    /// Generates a node that is provably strictly positive.
    fn positive(&mut self, budget: usize, ctx: Context) -> Expr {
        self.guarded(budget, ctx, is_positive)
    }

    /// Generates a node accepted by `accept`, rewriting it as `u^2 + k` if it is not.
    fn guarded(&mut self, budget: usize, ctx: Context, accept: fn(&Expr) -> bool) -> Expr {
        let u = self.node(budget, ctx);
        if accept(&u) {
            return u;
        }

        if budget <= GUARD_DEPTH {
            return Expr::number(self.rng.gen_range(1..=9));
        }

        let u = self.node(budget - GUARD_DEPTH, ctx);
        let k = Expr::number(self.rng.gen_range(1..=3));
        Expr::Add(vec![u.powi(2), k])
    }

    /// Negates an expression without folding it into its surroundings.
    fn negate(expr: Expr) -> Expr {
        match expr.as_number() {
            Some(n) => Expr::from(-n.clone()),
            None => Expr::Mul(vec![Expr::number(-1), expr]),
        }
    }

    /// A body with a known antiderivative: a sum of terms `c*u^n`, `c*sin(u)`, `c*cos(u)` and
    /// `c*exp(u)`, where `u` is `x` or linear in `x`.
    fn integrable(&mut self, budget: usize) -> Expr {
        if budget >= 4 && self.rng.gen_bool(0.3) {
            Expr::Add(vec![self.integrable_term(budget - 1), self.integrable_term(budget - 1)])
        } else {
            self.integrable_term(budget)
        }
    }

    fn integrable_term(&mut self, budget: usize) -> Expr {
        let coefficient = Expr::number(self.coefficient());
        let arg = if budget >= 5 && self.rng.gen_bool(0.5) {
            Expr::Add(vec![
                Expr::Mul(vec![Expr::number(self.coefficient()), Expr::symbol(VAR)]),
                Expr::number(self.coefficient()),
            ])
        } else {
            Expr::symbol(VAR)
        };

        let body = match self.rng.gen_range(0..4) {
            0 => arg.powi(self.rng.gen_range(1..=3)),
            1 => arg.sin(),
            2 => arg.cos(),
            _ => arg.exp(),
        };
        Expr::Mul(vec![coefficient, body])
    }

    /// Builds a node of the given kind with depth at most `budget`.
    fn build(&mut self, kind: Kind, budget: usize, ctx: Context) -> Expr {
        match kind {
            Kind::Number => Expr::number(self.coefficient()),
            Kind::Symbol => Expr::symbol(VAR),
            Kind::Add => Expr::Add(vec![self.node(budget - 1, ctx), self.node(budget - 1, ctx)]),
            Kind::Sub => {
                let lhs = self.node(budget - 1, ctx);
                let rhs = self.node(budget - 2, ctx);
                Expr::Add(vec![lhs, Self::negate(rhs)])
            },
            Kind::Mul => Expr::Mul(vec![self.node(budget - 1, ctx), self.node(budget - 1, ctx)]),
            Kind::DivConst => {
                let divisor = Expr::number(self.coefficient()).powi(-1);
                Expr::Mul(vec![self.node(budget - 1, ctx), divisor])
            },
            Kind::Power => {
                let exponent = self.rng.gen_range(2..=3);
                self.node(budget - 1, ctx).powi(exponent)
            },
            Kind::Sqrt => self.radicand(budget - 1, ctx).sqrt(),
            Kind::RationalPower => {
                let q = self.rng.gen_range(2..=3);
                let mut p = self.rng.gen_range(1..=2 * q);
                if p % q == 0 {
                    p = 1;
                }
                self.radicand(budget - 1, ctx).pow(Expr::number((p, q)))
            },
            Kind::RootOfSquare => self.node(budget - 2, ctx).powi(2).sqrt(),
            Kind::Polynomial => {
                let u = self.node(budget - 3, ctx);
                let degree = self.rng.gen_range(1..=3);
                let mut terms = vec![Expr::number(self.coefficient())];
                for i in 1..=degree {
                    let power = if i == 1 { u.clone() } else { u.clone().powi(i) };
                    terms.push(Expr::Mul(vec![Expr::number(self.coefficient()), power]));
                }
                Expr::Add(terms)
            },
            Kind::Sin => self.node(budget - 1, ctx).sin(),
            Kind::Cos => self.node(budget - 1, ctx).cos(),
            Kind::Exp => self.node(budget - 1, ctx).exp(),
            Kind::Log => self.positive(budget - 1, ctx).log(),
            Kind::Abs => self.node(budget - 1, ctx).abs(),
            Kind::RootPower => {
                let n = self.rng.gen_range(2..=6);
                self.node(budget - 3, ctx)
                    .abs()
                    .powi(n)
                    .pow(Expr::number((1, n)))
            },
            Kind::Derivative => {
                let order = if budget >= 4 && self.rng.gen_bool(0.3) { 2 } else { 1 };
                let body = self.node(budget - 1, Context { smooth: true, ..ctx });
                body.derivative(VAR, order)
            },
            Kind::Integral => {
                let body = self.integrable(budget - 1);
                let bounds = self.rng.gen_bool(0.5).then(|| {
                    let lower = self.rng.gen_range(-2..=1);
                    let upper = lower + self.rng.gen_range(1..=3);
                    (Expr::number(lower), Expr::number(upper))
                });
                body.integral(VAR, bounds)
            },
            Kind::Limit => {
                let point = LIMIT_POINTS[self.rng.gen_range(0..LIMIT_POINTS.len())];
                let body = self.node(budget - 1, Context { calculus: false, ..ctx });
                body.limit(VAR, Expr::number(point))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use unity_compute::{numeric::EvalError, symbolic::sign::is_continuous};

    /// Sample points, including the points where roots of squares are not differentiable.
    const GRID: [f64; 7] = [-2.0, -1.0, -0.5, 0.0, 0.5, 1.0, 2.0];

    fn all_bases(level: Level, seeds: std::ops::Range<u64>) -> Vec<Expr> {
        seeds
            .map(|seed| Generator::new(level, StdRng::seed_from_u64(seed)).generate())
            .collect()
    }

    #[test]
    fn depth_bound() {
        for level in Level::ALL {
            for base in all_bases(level, 0..200) {
                assert!(
                    base.depth() <= level.max_depth(),
                    "`{}` has depth {} at level {}",
                    base,
                    base.depth(),
                    level,
                );
            }
        }
    }

    #[test]
    fn bases_never_vanish() {
        for level in Level::ALL {
            for base in all_bases(level, 0..200) {
                assert!(is_nonzero(&base), "`{}` may vanish", base);
            }
        }
    }

    #[test]
    fn root_is_compound() {
        for level in Level::ALL {
            for base in all_bases(level, 0..100) {
                assert!(!base.is_leaf(), "`{}` is a leaf", base);
            }
        }
    }

    #[test]
    fn elementary_and_middle_have_no_calculus() {
        for level in [Level::Elementary, Level::Middle] {
            for base in all_bases(level, 0..200) {
                assert!(base.is_calculus_free());
                assert!(is_continuous(&base), "`{}` is not continuous", base);
            }
        }
    }

    #[test]
    fn same_seed_same_base() {
        for level in Level::ALL {
            assert_eq!(all_bases(level, 7..17), all_bases(level, 7..17));
        }
    }

    #[test]
    fn bases_depend_on_x() {
        for level in Level::ALL {
            for base in all_bases(level, 0..200) {
                assert!(simplify(&base).depends_on(VAR), "`{}` is constant", base);
            }
        }
    }

    #[test]
    fn constant_draws_are_rejected() {
        assert!(!varies(&Expr::Add(vec![Expr::number(-9), Expr::number(4)]).powi(2)));
        assert!(!varies(&Expr::number(7).limit(VAR, Expr::number(2))));
        assert!(!varies(&Expr::Mul(vec![Expr::number(3), Expr::symbol(VAR)]).derivative(VAR, 1)));
        assert!(varies(&Expr::symbol(VAR).powi(2)));
    }

    #[test]
    fn linear_base_fits_every_level() {
        for level in Level::ALL {
            let base = Generator::new(level, StdRng::seed_from_u64(0)).linear_base();
            assert!(base.depth() <= level.max_depth());
            assert!(is_nonzero(&base));
            assert!(varies(&base));
        }
    }

    #[test]
    fn derivatives_are_defined_everywhere() {
        for seed in 0..300 {
            let mut generator = Generator::new(Level::High, StdRng::seed_from_u64(seed));
            let derivative = generator.build(Kind::Derivative, 6, Context::TOP);
            for x in GRID {
                match derivative.try_eval_at(VAR, x) {
                    Ok(_) | Err(EvalError::OutOfRange) => (),
                    Err(err) => panic!("`{}` at x = {}: {}", derivative, x, err),
                }
            }
        }
    }

    #[test]
    fn high_bases_are_defined_everywhere() {
        for base in all_bases(Level::High, 0..300) {
            for x in GRID {
                match base.try_eval_at(VAR, x) {
                    Ok(_) | Err(EvalError::OutOfRange) => (),
                    Err(err) => panic!("`{}` at x = {}: {}", base, x, err),
                }
            }
        }
    }
}
