//! Incremental false-position search for the time at which an error signal
//! crosses zero.
//!
//! The caller feeds one `(error, time)` sample per evaluation. Positive and
//! negative samples are kept as the upper and lower ends of a bracket; once
//! both exist the estimate is the false-position root of the bracket. Before
//! that, the last two samples are extrapolated if they are heading toward
//! zero. A sample that leaves the tolerance band on the far side of the
//! reported crossing also converges. The search state persists across calls
//! until [`RegulaFalsi::reset`].

/// Which zero crossings the search reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Slope {
    #[default]
    Any,
    /// Error going from negative to positive.
    Increasing,
    /// Error going from positive to negative.
    Decreasing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    error: f64,
    time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Upper,
    Lower,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegulaFalsi {
    tolerance: f64,
    slope: Slope,
    upper: Option<Sample>,
    lower: Option<Sample>,
    previous: Option<Sample>,
    last_replaced: Option<Side>,
    iterations: u32,
}

impl RegulaFalsi {
    pub fn new(tolerance: f64, slope: Slope) -> Self {
        RegulaFalsi {
            tolerance: tolerance.abs(),
            slope,
            upper: None,
            lower: None,
            previous: None,
            last_replaced: None,
            iterations: 0,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn slope(&self) -> Slope {
        self.slope
    }

    /// Number of bracketed estimates since the last reset.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn is_bracketed(&self) -> bool {
        self.upper.is_some() && self.lower.is_some()
    }

    /// Feeds one sample and returns the estimated time from `time` until the
    /// crossing: `Some(0.0)` once converged, `None` when nothing can be
    /// estimated yet. Bracketed estimates may be negative when the crossing
    /// already lies behind `time`.
    pub fn feed(&mut self, error: f64, time: f64) -> Option<f64> {
        let sample = Sample { error, time };
        let previous = self.previous.replace(sample);

        if error.abs() <= self.tolerance {
            return if self.approached() { Some(0.0) } else { None };
        }

        // Leaving the band on the far side of a reported crossing: the
        // in-band sample was the crossing.
        if let Some(previous) = previous {
            if previous.error.abs() <= self.tolerance && self.beyond_crossing(error) {
                return Some(0.0);
            }
        }

        if error > 0.0 {
            if self.slope != Slope::Increasing || self.lower.is_some() {
                self.record(Side::Upper, sample);
            }
        } else if self.slope != Slope::Decreasing || self.upper.is_some() {
            self.record(Side::Lower, sample);
        }

        match (self.upper, self.lower) {
            (Some(upper), Some(lower)) => {
                self.iterations += 1;
                let root = upper.time
                    - upper.error * (lower.time - upper.time) / (lower.error - upper.error);
                Some(root - time)
            }
            _ => previous.and_then(|previous| self.extrapolate(previous, sample)),
        }
    }

    /// Forgets every sample so the next search starts clean.
    pub fn reset(&mut self) {
        self.upper = None;
        self.lower = None;
        self.previous = None;
        self.last_replaced = None;
        self.iterations = 0;
    }

    // Whether a sample outside the tolerance band was seen on a side the slope allows.
    fn approached(&self) -> bool {
        match self.slope {
            Slope::Any => self.upper.is_some() || self.lower.is_some(),
            Slope::Increasing => self.lower.is_some(),
            Slope::Decreasing => self.upper.is_some(),
        }
    }

    fn beyond_crossing(&self, error: f64) -> bool {
        match self.slope {
            Slope::Any => false,
            Slope::Increasing => error > 0.0,
            Slope::Decreasing => error < 0.0,
        }
    }

    fn record(&mut self, side: Side, sample: Sample) {
        // Illinois: when one end is replaced twice running, halve the stale end
        if self.last_replaced == Some(side) {
            let stale = match side {
                Side::Upper => &mut self.lower,
                Side::Lower => &mut self.upper,
            };
            if let Some(stale) = stale {
                stale.error *= 0.5;
            }
        }

        match side {
            Side::Upper => self.upper = Some(sample),
            Side::Lower => self.lower = Some(sample),
        }
        self.last_replaced = Some(side);
    }

    fn extrapolate(&self, previous: Sample, current: Sample) -> Option<f64> {
        let heading_in = match self.slope {
            Slope::Any => true,
            Slope::Increasing => current.error < 0.0,
            Slope::Decreasing => current.error > 0.0,
        };
        let delta_error = current.error - previous.error;
        let delta_time = current.time - previous.time;

        if !heading_in || delta_time <= 0.0 || delta_error * current.error >= 0.0 {
            return None;
        }
        Some(-current.error * delta_time / delta_error)
    }
}
