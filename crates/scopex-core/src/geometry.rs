use serde::{Deserialize, Serialize};

/// Closed interval on one page axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Self {
        Interval { lo, hi }
    }

    pub fn span(&self) -> f64 {
        self.hi - self.lo
    }

    /// True if `[lo, hi]` is fully nested inside this interval.
    pub fn contains(&self, lo: f64, hi: f64) -> bool {
        contains(self, lo, hi)
    }
}

/// Grow `[lo, hi]` on both sides by `(hi - lo) * ratio`.
///
/// A zero-width interval stays a point. Negative ratios are treated as 0.
pub fn expand_interval(lo: f64, hi: f64, ratio: f64) -> Interval {
    let delta = Interval::new(lo, hi).span() * ratio.max(0.0);
    Interval::new(lo - delta, hi + delta)
}

/// Grow only the upper bound of `[lo, hi]`.
///
/// Table cells start at or after their column heading, so the lower bound
/// stays at the heading's own left edge.
pub fn expand_table_x(lo: f64, hi: f64, ratio: f64) -> Interval {
    let delta = Interval::new(lo, hi).span() * ratio.max(0.0);
    Interval::new(lo, hi + delta)
}

/// Nested containment: the candidate must lie entirely inside the window.
pub fn contains(window: &Interval, lo: f64, hi: f64) -> bool {
    lo >= window.lo && hi <= window.hi
}

/// A set of windows on one axis; a candidate matches if ANY window holds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSet {
    windows: Vec<Interval>,
}

impl WindowSet {
    pub fn new() -> Self {
        WindowSet::default()
    }

    pub fn single(window: Interval) -> Self {
        WindowSet {
            windows: vec![window],
        }
    }

    pub fn push(&mut self, window: Interval) {
        self.windows.push(window);
    }

    pub fn contains(&self, lo: f64, hi: f64) -> bool {
        self.windows.iter().any(|w| w.contains(lo, hi))
    }
}
