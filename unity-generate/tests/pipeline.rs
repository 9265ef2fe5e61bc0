use assert_float_eq::assert_float_absolute_eq;
use pretty_assertions::assert_eq;
use std::{collections::HashSet, sync::Arc, thread};
use unity_compute::{numeric::EvalError, symbolic::{simplify, Expr}};
use unity_generate::{
    fallback::known_good,
    generator::{Generator, VAR},
    FallbackPolicy,
    Level,
    Origin,
    Pipeline,
    PipelineConfigBuilder,
    PipelineExhausted,
    RejectReason,
    Rejection,
    SymbolicValidator,
    UniquenessGuard,
    Validator,
    Verdict,
};
use rand::{rngs::StdRng, SeedableRng};

/// A validator that rejects everything.
struct AlwaysReject;

impl Validator for AlwaysReject {
    fn validate(&self, _: &Expr) -> Verdict {
        Verdict::Reject(RejectReason::IterationCap)
    }
}

/// Sample points, including `0` where roots of squares are not differentiable.
const GRID: [f64; 7] = [-2.0, -1.3, -0.5, 0.0, 0.4, 1.0, 1.7];

fn x() -> Expr {
    Expr::symbol(VAR)
}

fn contains_derivative(expr: &Expr) -> bool {
    expr.post_order_iter().any(|node| matches!(node, Expr::Derivative(..)))
}

/// Asserts that `expr` is `1` at every point of the grid, skipping only points where an
/// intermediate value does not fit in an `f64`.
fn assert_one_on_grid(expr: &Expr) {
    for point in GRID {
        match expr.try_eval_at(VAR, point) {
            Ok(value) => assert_float_absolute_eq!(value, 1.0, 1e-9),
            Err(EvalError::OutOfRange) => (),
            Err(err) => panic!("`{}` at x = {}: {}", expr, point, err),
        }
    }
}

fn seeded(seed: u64) -> Pipeline {
    let config = PipelineConfigBuilder::new().seed(Some(seed)).build();
    Pipeline::new(config, Arc::new(UniquenessGuard::new()))
}

#[test]
fn accepted_composites_reduce_to_one() {
    for level in Level::ALL {
        let mut pipeline = seeded(level.number() as u64);
        for _ in 0..10 {
            let generated = pipeline.generate(level).unwrap();
            assert_eq!(generated.level, level);
            assert_eq!(generated.origin, Origin::Fresh, "fell back after {} attempts", generated.attempts);
            assert_eq!(simplify(&generated.expr), Expr::one(), "`{}`", generated.text);
        }
    }
}

#[test]
fn accepted_composites_evaluate_to_one() {
    for level in Level::ALL {
        let mut pipeline = seeded(100 + level.number() as u64);
        for _ in 0..10 {
            let generated = pipeline.generate(level).unwrap();
            assert_eq!(generated.origin, Origin::Fresh);
            assert_one_on_grid(&generated.expr);
        }
    }
}

#[test]
fn composites_with_derivatives_are_defined_at_zero() {
    let mut checked = 0;
    for seed in 0..5 {
        let mut pipeline = seeded(500 + seed);
        for _ in 0..10 {
            let generated = pipeline.generate(Level::High).unwrap();
            if generated.origin == Origin::Fresh && contains_derivative(&generated.expr) {
                assert_one_on_grid(&generated.expr);
                checked += 1;
            }
        }
    }
    assert!(checked > 0, "no composite with a derivative was generated");
}

#[test]
fn bases_are_functions_of_x() {
    for level in Level::ALL {
        for seed in 0..200 {
            let base = Generator::new(level, StdRng::seed_from_u64(seed)).generate();
            assert!(base.depends_on(VAR), "`{}` does not mention x", base);
            assert!(simplify(&base).depends_on(VAR), "`{}` is constant", base);
        }
    }
}

#[test]
fn same_seed_same_sequence() {
    for level in Level::ALL {
        let mut a = seeded(42);
        let mut b = seeded(42);
        for _ in 0..5 {
            let lhs = a.generate(level).unwrap();
            let rhs = b.generate(level).unwrap();
            assert_eq!(lhs.fingerprint, rhs.fingerprint);
            assert_eq!(lhs.text, rhs.text);
        }
    }
}

#[test]
fn no_fingerprint_served_twice() {
    let mut pipeline = seeded(7);
    let mut seen = HashSet::new();
    for level in Level::ALL {
        for _ in 0..15 {
            let generated = pipeline.generate(level).unwrap();
            if generated.origin == Origin::Fresh {
                assert!(seen.insert(generated.fingerprint), "served `{}` twice", generated.text);
            }
        }
    }
    assert_eq!(pipeline.guard().len(), seen.len());
}

#[test]
fn shared_guard_across_threads() {
    let guard = Arc::new(UniquenessGuard::new());
    let handles = (0..4)
        .map(|seed| {
            let guard = Arc::clone(&guard);
            thread::spawn(move || {
                let config = PipelineConfigBuilder::new().seed(Some(seed)).build();
                let mut pipeline = Pipeline::new(config, guard);
                (0..5)
                    .map(|_| pipeline.generate(Level::Middle).unwrap())
                    .filter(|generated| generated.origin == Origin::Fresh)
                    .map(|generated| generated.fingerprint)
                    .collect::<Vec<_>>()
            })
        })
        .collect::<Vec<_>>();

    let mut seen = HashSet::new();
    for handle in handles {
        for fingerprint in handle.join().unwrap() {
            assert!(seen.insert(fingerprint));
        }
    }
}

#[test]
fn base_depth_bound() {
    for level in Level::ALL {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..300 {
            let base = Generator::new(level, &mut rng).generate();
            assert!(base.depth() <= level.max_depth(), "`{}` is too deep", base);
        }
    }
}

#[test]
fn missing_level_is_elementary() {
    assert_eq!(Level::from_request(None), Level::Elementary);
    assert_eq!(Level::from_request(Some("impossible")), Level::Elementary);
}

/// `(x^2+1) * (x^2+1)^(-1)`
#[test]
fn scenario_inverse() {
    let f = x().powi(2) + Expr::number(1);
    let expr = Expr::Mul(vec![f.clone(), f.recip()]);
    assert!(SymbolicValidator::default().validate(&expr).is_accept());
}

/// `sin(d/dx x^2)^2 + cos(d/dx x^2)^2`
#[test]
fn scenario_pythagorean_of_derivative() {
    let derivative = x().powi(2).derivative(VAR, 1);
    assert_eq!(simplify(&derivative), Expr::Mul(vec![Expr::number(2), x()]));

    let expr = Expr::Add(vec![
        derivative.clone().sin().powi(2),
        derivative.cos().powi(2),
    ]);
    assert!(SymbolicValidator::default().validate(&expr).is_accept());

    let linear = Expr::Mul(vec![Expr::number(2), x()]);
    let expr = Expr::Add(vec![linear.clone().sin().powi(2), linear.cos().powi(2)]);
    assert!(SymbolicValidator::default().validate(&expr).is_accept());
}

/// Two pipelines that make the same draws share a guard: the second one cannot serve the first
/// one's expression, and serves a different one.
#[test]
fn scenario_collision() {
    let guard = Arc::new(UniquenessGuard::new());
    let config = PipelineConfigBuilder::new().seed(Some(3)).build();
    let mut first = Pipeline::new(config, Arc::clone(&guard));
    let mut second = Pipeline::new(config, Arc::clone(&guard));

    let a = first.generate(Level::Elementary).unwrap();
    let b = second.generate(Level::Elementary).unwrap();
    assert_eq!(a.origin, Origin::Fresh);
    assert_eq!(b.origin, Origin::Fresh);
    assert_ne!(a.fingerprint, b.fingerprint);
    assert!(b.attempts > a.attempts);
    assert_eq!(guard.len(), 2);

    // the second pipeline replays the first one's draws, up to the collision
    assert_eq!(a.rejections.len(), a.attempts - 1);
    assert_eq!(b.rejections.len(), b.attempts - 1);
    assert_eq!(b.rejections[..a.attempts - 1], a.rejections[..]);
    assert_eq!(b.rejections[a.attempts - 1], Rejection::Collision(a.fingerprint));
}

#[test]
fn scenario_exhausted_known_good() {
    let config = PipelineConfigBuilder::new().retry_budget(1).seed(Some(0)).build();
    let guard = Arc::new(UniquenessGuard::new());
    let mut pipeline = Pipeline::with_validator(config, Arc::clone(&guard), AlwaysReject);

    let generated = pipeline.generate(Level::High).unwrap();
    assert_eq!(generated.origin, Origin::Fallback);
    assert_eq!(generated.attempts, 1);
    assert_eq!(generated.expr, known_good(Level::High).0);
    assert_eq!(generated.rejections, vec![Rejection::Validation(RejectReason::IterationCap)]);
    assert!(guard.is_empty());
}

#[test]
fn scenario_exhausted_fail_loudly() {
    let config = PipelineConfigBuilder::new()
        .retry_budget(1)
        .fallback(FallbackPolicy::FailLoudly)
        .seed(Some(0))
        .build();
    let mut pipeline = Pipeline::with_validator(config, Arc::new(UniquenessGuard::new()), AlwaysReject);

    assert_eq!(
        pipeline.generate(Level::Middle),
        Err(PipelineExhausted { level: Level::Middle, attempts: 1 }),
    );
}

#[test]
fn zero_budget_goes_straight_to_fallback() {
    let config = PipelineConfigBuilder::new().retry_budget(0).seed(Some(0)).build();
    let mut pipeline = Pipeline::new(config, Arc::new(UniquenessGuard::new()));

    let generated = pipeline.generate(Level::Elementary).unwrap();
    assert_eq!(generated.origin, Origin::Fallback);
    assert_eq!(generated.attempts, 0);
}
