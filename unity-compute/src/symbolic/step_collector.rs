//! Collection of the steps taken while rewriting an expression.

/// Receives the steps of an algorithm as they are taken.
///
/// [`StepCollector`] is implemented for the unit type `()`, which discards every step; use it when
/// the steps are not needed. `Vec<S>` records every step in order, and [`Tally`] only counts them.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}

/// Counts how many times each kind of step was taken, in order of first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<S> {
    counts: Vec<(S, usize)>,
}

impl<S> Default for Tally<S> {
    fn default() -> Self {
        Self { counts: Vec::new() }
    }
}

impl<S: PartialEq> Tally<S> {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns each step along with the number of times it was taken.
    pub fn counts(&self) -> &[(S, usize)] {
        &self.counts
    }

    /// Total number of steps taken.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl<S: PartialEq> StepCollector<S> for Tally<S> {
    fn push(&mut self, step: S) {
        match self.counts.iter_mut().find(|(other, _)| *other == step) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((step, 1)),
        }
    }
}

impl<S: PartialEq> FromIterator<S> for Tally<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tally = Self::new();
        iter.into_iter().for_each(|step| tally.push(step));
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tally_counts_in_order_of_first_occurrence() {
        let tally = ["b", "a", "b", "b", "c"].into_iter().collect::<Tally<_>>();
        assert_eq!(tally.counts(), &[("b", 3), ("a", 1), ("c", 1)]);
        assert_eq!(tally.total(), 5);
    }
}
