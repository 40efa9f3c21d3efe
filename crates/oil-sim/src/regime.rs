//! Piecewise-linear growth regimes.

/// Origin of the linear term of a [`Phase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pivot {
    /// `t = index - k`, with `index` the zero-based position in the run.
    Index(i32),
    /// `t = year - y`.
    Year(i32),
}

/// One linear segment: `intercept + slope * t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Phase {
    pub intercept: f64,
    pub slope: f64,
    pub pivot: Pivot,
}

impl Phase {
    pub const fn linear(intercept: f64, slope: f64, pivot: Pivot) -> Self {
        Self {
            intercept,
            slope,
            pivot,
        }
    }

    /// A constant level.
    pub const fn flat(level: f64) -> Self {
        Self::linear(level, 0.0, Pivot::Index(0))
    }

    pub fn eval(&self, index: usize, year: i32) -> f64 {
        let t = match self.pivot {
            Pivot::Index(k) => index as f64 - f64::from(k),
            Pivot::Year(y) => f64::from(year - y),
        };
        self.intercept + self.slope * t
    }
}

/// Growth curve made of an initial phase and phases starting at given years.
///
/// The active phase for a year is the last one whose start year is not after
/// it; years before the first breakpoint use the initial phase.
#[derive(Clone, Debug, PartialEq)]
pub struct RegimeCurve {
    initial: Phase,
    breaks: Vec<(i32, Phase)>,
}

impl RegimeCurve {
    pub fn new(initial: Phase) -> Self {
        Self {
            initial,
            breaks: Vec::new(),
        }
    }

    /// Adds a phase that takes over from `from_year` onwards.
    pub fn then(mut self, from_year: i32, phase: Phase) -> Self {
        self.breaks.push((from_year, phase));
        self.breaks.sort_by_key(|(year, _)| *year);
        self
    }

    pub fn phase_at(&self, year: i32) -> &Phase {
        self.breaks
            .iter()
            .rev()
            .find(|(from, _)| *from <= year)
            .map(|(_, phase)| phase)
            .unwrap_or(&self.initial)
    }

    pub fn multiplier(&self, index: usize, year: i32) -> f64 {
        self.phase_at(year).eval(index, year)
    }

    /// Years at which a new phase starts, ascending.
    pub fn breakpoints(&self) -> Vec<i32> {
        self.breaks.iter().map(|(year, _)| *year).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn production_curve() -> RegimeCurve {
        RegimeCurve::new(Phase::linear(1.0, 0.08, Pivot::Index(0)))
            .then(2006, Phase::linear(1.0, 0.12, Pivot::Index(5)))
            .then(2016, Phase::linear(1.0, 0.15, Pivot::Index(15)))
            .then(2021, Phase::linear(1.0, 0.10, Pivot::Index(20)))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn phases_switch_at_breakpoints() {
        let c = production_curve();
        assert!(close(c.multiplier(0, 2000), 1.0));
        assert!(close(c.multiplier(5, 2005), 1.4));
        assert!(close(c.multiplier(6, 2006), 1.12));
        assert!(close(c.multiplier(15, 2015), 2.2));
        assert!(close(c.multiplier(16, 2016), 1.15));
        assert!(close(c.multiplier(21, 2021), 1.10));
        assert_eq!(c.breakpoints(), vec![2006, 2016, 2021]);
    }

    #[test]
    fn year_pivot_is_flat_before_breakpoint() {
        let c = RegimeCurve::new(Phase::flat(1.0))
            .then(2010, Phase::linear(1.0, -0.01, Pivot::Year(2010)));
        assert!(close(c.multiplier(3, 2003), 1.0));
        assert!(close(c.multiplier(10, 2010), 1.0));
        assert!(close(c.multiplier(25, 2025), 0.85));
    }

    #[test]
    fn breakpoints_sorted_regardless_of_insertion_order() {
        let c = RegimeCurve::new(Phase::flat(8.0))
            .then(2016, Phase::flat(15.0))
            .then(2006, Phase::flat(12.0));
        assert_eq!(c.breakpoints(), vec![2006, 2016]);
        assert!(close(c.multiplier(0, 2007), 12.0));
        assert!(close(c.multiplier(0, 2020), 15.0));
    }

    proptest! {
        #[test]
        fn flat_curve_is_constant(level in -100.0f64..100.0, index in 0usize..200, year in 1970i32..2100) {
            let c = RegimeCurve::new(Phase::flat(level));
            prop_assert_eq!(c.multiplier(index, year), level);
        }

        #[test]
        fn linear_phase_grows_with_index(slope in 0.001f64..1.0, index in 0usize..100) {
            let p = Phase::linear(1.0, slope, Pivot::Index(0));
            prop_assert!(p.eval(index + 1, 2000) > p.eval(index, 2000));
        }
    }
}
