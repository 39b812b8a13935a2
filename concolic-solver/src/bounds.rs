//! Per-variable bound tracking, the accumulator step 2 of the
//! bounded linear solver's algorithm folds each atom into.

use hashbrown::HashSet;

/// Whether folding an atom into a variable's bounds revealed an
/// immediate contradiction (two different `EQ` constraints on the
/// same variable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict;

/// The running `min`/`max`/`forbidden`/`required` state for one
/// variable, tightened atom by atom (§4.6 step 2).
///
/// `min` starts at `i64::MIN` and only moves once a `GT`/`GE` atom is
/// seen (tracked by `min_explicit`) -- the raw bound and the search
/// window's starting point are kept separate so a variable with only
/// an upper bound (`x < 0`, no lower bound at all) doesn't get pinned
/// to an arbitrary lower anchor it was never actually given.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBounds {
    pub min: i64,
    pub max: i64,
    min_explicit: bool,
    pub forbidden: HashSet<i64>,
    pub required: Option<i64>,
}

impl Default for VarBounds {
    fn default() -> Self {
        Self { min: i64::MIN, max: i64::MAX, min_explicit: false, forbidden: HashSet::new(), required: None }
    }
}

impl VarBounds {
    pub fn eq(&mut self, k: i64) -> Result<(), Conflict> {
        match self.required {
            Some(existing) if existing != k => Err(Conflict),
            _ => {
                self.required = Some(k);
                Ok(())
            }
        }
    }

    pub fn ne(&mut self, k: i64) {
        self.forbidden.insert(k);
    }

    pub fn lt(&mut self, k: i64) {
        self.max = self.max.min(k.saturating_sub(1));
    }

    pub fn le(&mut self, k: i64) {
        self.max = self.max.min(k);
    }

    pub fn gt(&mut self, k: i64) {
        self.min = self.min.max(k.saturating_add(1));
        self.min_explicit = true;
    }

    pub fn ge(&mut self, k: i64) {
        self.min = self.min.max(k);
        self.min_explicit = true;
    }

    /// Resolves these bounds to a single value (§4.6 steps 3-4).
    ///
    /// With an explicit lower bound, scans `[min, min+search_width)`
    /// as written in the spec. With no lower bound at all, the engine
    /// targets "enumerable user choices, small integer ranges"
    /// (§4.6): it scans from `0` upward when the feasible region
    /// reaches non-negative values, and from `max` downward when the
    /// region is entirely negative, rather than from `i64::MIN`.
    pub fn resolve(&self, search_width: u32) -> Option<i64> {
        if let Some(required) = self.required {
            let above_min = !self.min_explicit || required >= self.min;
            return (above_min && required <= self.max && !self.forbidden.contains(&required))
                .then_some(required);
        }

        if self.min_explicit {
            if self.min > self.max {
                return None;
            }
            let window_end = self.max.min(self.min.saturating_add(search_width as i64 - 1));
            return (self.min..=window_end).find(|v| !self.forbidden.contains(v));
        }

        if self.max >= 0 {
            let window_end = self.max.min(search_width as i64 - 1);
            (0..=window_end).find(|v| !self.forbidden.contains(v))
        } else {
            let window_start = self.max.saturating_sub(search_width as i64 - 1);
            (window_start..=self.max).rev().find(|v| !self.forbidden.contains(v))
        }
    }
}
