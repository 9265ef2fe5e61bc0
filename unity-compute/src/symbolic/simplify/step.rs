/// Possible simplification steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// `0+a = a`
    /// `a+0 = a`
    AddZero,

    /// `a+(b+c) = a+b+c`
    FlattenSum,

    /// `2+3 = 5`
    /// `2*3 = 6`
    FoldNumbers,

    /// `0*a = 0`
    /// `a*0 = 0`
    MultiplyZero,

    /// `1*a = a`
    /// `a*1 = a`
    MultiplyOne,

    /// `a*(b*c) = a*b*c`
    FlattenProduct,

    /// `a+a = 2a`
    /// `2a+3a = 5a`
    /// `a-a = 0`
    /// etc.
    CombineLikeTerms,

    /// `a*a = a^2`
    /// `a^2*a^3 = a^5`
    /// `a*a^(-1) = 1`
    /// etc.
    CombineLikeFactors,

    /// `a^0 = 1`
    PowerZero,

    /// `0^a = 0`
    PowerZeroLeft,

    /// `1^a = 1`
    PowerOneLeft,

    /// `a^1 = a`
    PowerOne,

    /// `(a^b)^c = a^(b*c)`
    PowerPower,

    /// `(a^(2n))^c = |a|^(2n*c)`
    PowerOfEvenPower,

    /// `4^(1/2) = 2`
    /// `2^(-2) = 1/4`
    EvaluatePower,

    /// `12^(1/2) = 2^1*3^(1/2)`
    FactorNumericBase,

    /// `c*(a+b) = c*a + c*b`
    DistributeCoefficient,

    /// `(a*b)^c = a^c*b^c`
    DistributePower,

    /// `sqrt(a) = a^(1/2)`
    SqrtToPower,

    /// `|-3| = 3`
    AbsNumber,

    /// `|a| = a` for non-negative `a`
    AbsNonNegative,

    /// `exp(0) = 1`
    ExpZero,

    /// `log(1) = 0`
    LogOne,

    /// `exp(log(a)) = a`
    ExpLog,

    /// `log(exp(a)) = a`
    LogExp,

    /// `sin(0) = 0`
    SinZero,

    /// `cos(0) = 1`
    CosZero,

    /// `c*sin(a)^2 + c*cos(a)^2 = c`
    Pythagorean,

    /// `d/dx f = f'`
    EvaluateDerivative,

    /// `integral(f, x) = F`
    /// `integral(f, x, a, b) = F(b) - F(a)`
    EvaluateIntegral,

    /// `lim_{x -> p} f = f(p)` for continuous `f`
    EvaluateLimit,
}
