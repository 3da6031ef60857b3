//! Period management for the simulation
//!
//! The economy advances in discrete periods. The container is built at the
//! start period; every call to `advance_period` moves to the next period to
//! be simulated.

use serde::{Deserialize, Serialize};

/// Tracks the current simulation period
///
/// # Example
/// ```
/// use econ_sim_core::PeriodClock;
///
/// let mut clock = PeriodClock::new(0);
/// assert_eq!(clock.current_period(), 0);
///
/// clock.advance_period();
/// assert_eq!(clock.current_period(), 1);
/// assert_eq!(clock.periods_elapsed(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodClock {
    /// Period the economy was constructed in
    start_period: usize,
    /// Most recent period (construction period until the first advance)
    current_period: usize,
}

impl PeriodClock {
    /// Create a clock positioned at `start_period`
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::PeriodClock;
    ///
    /// let clock = PeriodClock::new(10);
    /// assert_eq!(clock.current_period(), 10);
    /// assert_eq!(clock.periods_elapsed(), 0);
    /// ```
    pub fn new(start_period: usize) -> Self {
        Self {
            start_period,
            current_period: start_period,
        }
    }

    /// Advance to the next period and return it
    pub fn advance_period(&mut self) -> usize {
        self.current_period += 1;
        self.current_period
    }

    /// Get the current period
    pub fn current_period(&self) -> usize {
        self.current_period
    }

    /// Get the construction period
    pub fn start_period(&self) -> usize {
        self.start_period
    }

    /// Number of periods simulated since construction
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::PeriodClock;
    ///
    /// let mut clock = PeriodClock::new(5);
    /// for _ in 0..3 {
    ///     clock.advance_period();
    /// }
    /// assert_eq!(clock.periods_elapsed(), 3);
    /// ```
    pub fn periods_elapsed(&self) -> usize {
        self.current_period - self.start_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_returns_new_period() {
        let mut clock = PeriodClock::new(0);
        assert_eq!(clock.advance_period(), 1);
        assert_eq!(clock.advance_period(), 2);
        assert_eq!(clock.start_period(), 0);
    }
}
