//! Gravity timer - the one scheduled task a session owns
//!
//! The timer runs in virtual time: callers feed elapsed milliseconds through
//! [`GravityTimer::advance`] and collect due firings with
//! [`GravityTimer::take_due`]. There is a single schedule slot, so arming always
//! replaces whatever was scheduled before; two live schedules cannot exist.
//!
//! Every change of schedule bumps [`GravityTimer::generation`], which lets a
//! driver tell a stale deadline from the current one.

/// Scheduling state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Nothing scheduled
    #[default]
    Idle,
    /// Counting towards `interval_ms`
    Armed {
        interval_ms: u32,
        elapsed_ms: u32,
        /// Fire once, then go idle
        one_shot: bool,
    },
    /// Frozen; the phase is kept but nothing fires
    Suspended { interval_ms: u32, elapsed_ms: u32 },
}

/// A due firing returned by [`GravityTimer::take_due`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fire {
    /// The schedule that fired was a one-shot and is now gone
    pub one_shot: bool,
    /// Time already elapsed past the deadline
    pub overshoot_ms: u32,
}

/// Cancellable, re-armable gravity schedule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GravityTimer {
    state: TimerState,
    generation: u64,
}

impl GravityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a repeating tick every `interval_ms`, replacing any schedule.
    pub fn arm(&mut self, interval_ms: u32) -> u64 {
        self.schedule(interval_ms, false)
    }

    /// Schedule a single tick after `interval_ms`, replacing any schedule.
    pub fn arm_once(&mut self, interval_ms: u32) -> u64 {
        self.schedule(interval_ms, true)
    }

    fn schedule(&mut self, interval_ms: u32, one_shot: bool) -> u64 {
        self.state = TimerState::Armed {
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
            one_shot,
        };
        self.bump()
    }

    /// Drop the schedule entirely.
    pub fn cancel(&mut self) -> u64 {
        self.state = TimerState::Idle;
        self.bump()
    }

    /// Freeze an armed schedule. No-op unless armed.
    pub fn suspend(&mut self) -> u64 {
        if let TimerState::Armed {
            interval_ms,
            elapsed_ms,
            ..
        } = self.state
        {
            self.state = TimerState::Suspended {
                interval_ms,
                elapsed_ms,
            };
        }
        self.bump()
    }

    fn bump(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Add elapsed time. Only an armed schedule accumulates.
    pub fn advance(&mut self, elapsed_ms: u32) {
        if let TimerState::Armed { elapsed_ms: e, .. } = &mut self.state {
            *e = e.saturating_add(elapsed_ms);
        }
    }

    /// Consume one due firing, if any.
    ///
    /// A repeating schedule keeps its phase (the interval is subtracted); a
    /// one-shot schedule goes idle and reports its overshoot.
    pub fn take_due(&mut self) -> Option<Fire> {
        let TimerState::Armed {
            interval_ms,
            elapsed_ms,
            one_shot,
        } = self.state
        else {
            return None;
        };

        if elapsed_ms < interval_ms {
            return None;
        }

        let overshoot_ms = elapsed_ms - interval_ms;
        if one_shot {
            self.state = TimerState::Idle;
        } else {
            self.state = TimerState::Armed {
                interval_ms,
                elapsed_ms: overshoot_ms,
                one_shot,
            };
        }
        Some(Fire {
            one_shot,
            overshoot_ms,
        })
    }

    /// Milliseconds until the next firing; `None` unless armed
    pub fn remaining_ms(&self) -> Option<u32> {
        match self.state {
            TimerState::Armed {
                interval_ms,
                elapsed_ms,
                ..
            } => Some(interval_ms.saturating_sub(elapsed_ms)),
            _ => None,
        }
    }

    /// Interval of the current or suspended schedule
    pub fn interval_ms(&self) -> Option<u32> {
        match self.state {
            TimerState::Armed { interval_ms, .. } | TimerState::Suspended { interval_ms, .. } => {
                Some(interval_ms)
            }
            TimerState::Idle => None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    pub fn is_one_shot(&self) -> bool {
        matches!(self.state, TimerState::Armed { one_shot: true, .. })
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self.state, TimerState::Suspended { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_never_fires() {
        let mut timer = GravityTimer::new();
        timer.advance(10_000);
        assert_eq!(timer.take_due(), None);
        assert_eq!(timer.remaining_ms(), None);
    }

    #[test]
    fn test_repeating_keeps_phase() {
        let mut timer = GravityTimer::new();
        timer.arm(100);
        timer.advance(250);

        assert_eq!(
            timer.take_due(),
            Some(Fire {
                one_shot: false,
                overshoot_ms: 150
            })
        );
        assert!(timer.take_due().is_some());
        assert_eq!(timer.take_due(), None);
        assert_eq!(timer.remaining_ms(), Some(50));
    }

    #[test]
    fn test_one_shot_goes_idle() {
        let mut timer = GravityTimer::new();
        timer.arm_once(40);
        timer.advance(45);
        assert_eq!(
            timer.take_due(),
            Some(Fire {
                one_shot: true,
                overshoot_ms: 5
            })
        );
        assert!(!timer.is_armed());
        timer.advance(1000);
        assert_eq!(timer.take_due(), None);
    }

    #[test]
    fn test_arm_replaces_previous_schedule() {
        let mut timer = GravityTimer::new();
        let first = timer.arm(1000);
        timer.advance(900);
        let second = timer.arm(500);

        assert_ne!(first, second);
        assert_eq!(timer.remaining_ms(), Some(500));
        assert_eq!(timer.interval_ms(), Some(500));
    }

    #[test]
    fn test_suspend_freezes_phase() {
        let mut timer = GravityTimer::new();
        timer.arm(1000);
        timer.advance(300);
        timer.suspend();

        assert!(timer.is_suspended());
        timer.advance(5000);
        assert_eq!(timer.take_due(), None);
        assert_eq!(
            timer.state(),
            TimerState::Suspended {
                interval_ms: 1000,
                elapsed_ms: 300
            }
        );
    }

    #[test]
    fn test_cancel_bumps_generation() {
        let mut timer = GravityTimer::new();
        let armed = timer.arm(100);
        let cancelled = timer.cancel();
        assert!(cancelled > armed);
        assert_eq!(timer.state(), TimerState::Idle);
    }
}
