//! Termination criteria shared by all engines.
//!
//! A [`Termination`] combines an iteration limit, an evaluation limit,
//! a wall-clock limit and an optional cancellation flag. Limits compare
//! against *completed* counts with `>=`; any limit that is zero or
//! non-positive is disabled. Engines check it once per iteration, so
//! cancellation is cooperative.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    MaxIterations,
    MaxEvaluations,
    MaxTime,
    /// SA temperature fell to the minimum.
    MinTemperature,
    /// Local search found no improving move.
    LocalOptimum,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Run budget with a start timestamp.
#[derive(Debug, Clone)]
pub struct Termination {
    started: Instant,
    max_iterations: usize,
    max_evaluations: usize,
    max_time: Option<Duration>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Termination {
    /// Starts the clock. `max_time` is in seconds; non-positive, NaN or
    /// infinite values disable the time limit.
    pub fn new(max_iterations: usize, max_evaluations: usize, max_time: f64) -> Self {
        let max_time = if max_time > 0.0 {
            Duration::try_from_secs_f64(max_time).ok()
        } else {
            None
        };
        Self {
            started: Instant::now(),
            max_iterations,
            max_evaluations,
            max_time,
            cancel: None,
        }
    }

    /// Attaches an external cancellation flag.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Whether at least one limit or a cancellation flag can stop the run.
    pub fn is_bounded(&self) -> bool {
        self.max_iterations > 0
            || self.max_evaluations > 0
            || self.max_time.is_some()
            || self.cancel.is_some()
    }

    /// First limit that is reached, if any.
    pub fn check(&self, iterations: usize, evaluations: usize) -> Option<StopReason> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Some(StopReason::Cancelled);
            }
        }
        if self.max_iterations > 0 && iterations >= self.max_iterations {
            return Some(StopReason::MaxIterations);
        }
        if self.max_evaluations > 0 && evaluations >= self.max_evaluations {
            return Some(StopReason::MaxEvaluations);
        }
        match self.max_time {
            Some(limit) if self.started.elapsed() >= limit => Some(StopReason::MaxTime),
            _ => None,
        }
    }

    /// Shorthand for `check(..).is_some()`.
    pub fn is_reached(&self, iterations: usize, evaluations: usize) -> bool {
        self.check(iterations, evaluations).is_some()
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Fraction of the tightest enabled budget consumed, in `[0, 1]`.
    /// Unbounded runs report `0`.
    pub fn progress(&self, iterations: usize, evaluations: usize) -> f64 {
        let mut progress: f64 = 0.0;
        if self.max_iterations > 0 {
            progress = progress.max(iterations as f64 / self.max_iterations as f64);
        }
        if self.max_evaluations > 0 {
            progress = progress.max(evaluations as f64 / self.max_evaluations as f64);
        }
        if let Some(limit) = self.max_time {
            progress = progress.max(self.started.elapsed().as_secs_f64() / limit.as_secs_f64());
        }
        progress.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_limit() {
        let t = Termination::new(5, 0, 0.0);
        assert!(!t.is_reached(4, 1_000_000));
        assert_eq!(t.check(5, 0), Some(StopReason::MaxIterations));
    }

    #[test]
    fn test_evaluation_limit() {
        let t = Termination::new(0, 100, -1.0);
        assert!(!t.is_reached(1_000_000, 99));
        assert_eq!(t.check(0, 100), Some(StopReason::MaxEvaluations));
    }

    #[test]
    fn test_disabled_limits() {
        let t = Termination::new(0, 0, 0.0);
        assert!(!t.is_bounded());
        assert!(!t.is_reached(usize::MAX, usize::MAX));
        assert_eq!(t.progress(10, 10), 0.0);

        let nan = Termination::new(0, 0, f64::NAN);
        assert!(!nan.is_bounded());
    }

    #[test]
    fn test_time_limit() {
        let t = Termination::new(0, 0, 1e-9);
        assert!(t.is_bounded());
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(t.check(0, 0), Some(StopReason::MaxTime));
    }

    #[test]
    fn test_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let t = Termination::new(10, 0, 0.0).with_cancel(Arc::clone(&flag));
        assert!(!t.is_reached(0, 0));
        flag.store(true, Ordering::Relaxed);
        assert_eq!(t.check(0, 0), Some(StopReason::Cancelled));
    }

    #[test]
    fn test_progress() {
        let t = Termination::new(10, 200, 0.0);
        assert!((t.progress(5, 20) - 0.5).abs() < 1e-12);
        assert!((t.progress(1, 150) - 0.75).abs() < 1e-12);
        assert_eq!(t.progress(50, 0), 1.0);
    }
}
