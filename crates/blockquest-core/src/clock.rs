//! Day/night clock.
//!
//! The clock tracks the day number and the tick within the current cycle.
//! The phase is never stored: it is derived from the cycle tick and the
//! configured phase lengths every time it is asked for, so a restored clock
//! can never disagree with its own counter.

use blockquest_types::Phase;

use crate::config::CycleConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Day counter would overflow.
    #[error("day counter overflow: cannot advance beyond u32::MAX")]
    DayOverflow,

    /// Invalid cycle configuration (e.g. a zero-length phase).
    #[error("invalid cycle configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// Restored state does not fit the cycle.
    #[error("cycle tick {tick} is outside a cycle of {cycle_length} ticks")]
    TickOutOfRange {
        /// The offending tick.
        tick: u32,
        /// Configured cycle length.
        cycle_length: u32,
    },

    /// Day numbers start at 1.
    #[error("day number must be at least 1")]
    DayZero,
}

/// What a single [`DayCycleClock::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockAdvance {
    /// The cycle wrapped and a new day began.
    pub sunrise: bool,
    /// Phase before the tick.
    pub previous: Phase,
    /// Phase after the tick.
    pub current: Phase,
}

impl ClockAdvance {
    /// Whether the tick crossed a phase boundary.
    pub fn phase_changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Day number plus position within the day/night cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCycleClock {
    day: u32,
    cycle_tick: u32,
    /// Cumulative phase ends: DAY ends at `bounds[0]`, DUSK at `bounds[1]`,
    /// NIGHT at `bounds[2]`, DAWN at `bounds[3]` (the cycle length).
    bounds: [u32; 4],
}

impl DayCycleClock {
    /// A clock at tick 0 of day 1.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for a zero-length phase or an
    /// overflowing cycle.
    pub fn new(config: &CycleConfig) -> Result<Self, ClockError> {
        Self::from_parts(1, 0, config)
    }

    /// Rebuild a clock from persisted counters.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for a bad configuration,
    /// [`ClockError::DayZero`] for day 0, or [`ClockError::TickOutOfRange`]
    /// if `cycle_tick` does not fit the cycle.
    pub fn from_parts(day: u32, cycle_tick: u32, config: &CycleConfig) -> Result<Self, ClockError> {
        let bounds = phase_bounds(config)?;
        if day == 0 {
            return Err(ClockError::DayZero);
        }
        let cycle_length = bounds[3];
        if cycle_tick >= cycle_length {
            return Err(ClockError::TickOutOfRange {
                tick: cycle_tick,
                cycle_length,
            });
        }
        Ok(Self {
            day,
            cycle_tick,
            bounds,
        })
    }

    /// Advance one tick, wrapping into a new day at the end of the cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::DayOverflow`] if the day counter is exhausted.
    /// The clock is unchanged on error.
    pub fn advance(&mut self) -> Result<ClockAdvance, ClockError> {
        let previous = self.phase();
        let next_tick = self.cycle_tick.saturating_add(1);
        let sunrise = next_tick >= self.cycle_length();
        if sunrise {
            self.day = self.day.checked_add(1).ok_or(ClockError::DayOverflow)?;
            self.cycle_tick = 0;
        } else {
            self.cycle_tick = next_tick;
        }
        Ok(ClockAdvance {
            sunrise,
            previous,
            current: self.phase(),
        })
    }

    /// Current day, starting at 1.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Tick within the current cycle, `[0, cycle_length)`.
    pub const fn cycle_tick(&self) -> u32 {
        self.cycle_tick
    }

    /// Ticks in one full cycle.
    pub const fn cycle_length(&self) -> u32 {
        self.bounds[3]
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase_at(self.cycle_tick)
    }

    /// Phase for an arbitrary cycle tick. Ticks past the end read as DAWN.
    pub fn phase_at(&self, cycle_tick: u32) -> Phase {
        let [day_end, dusk_end, night_end, _] = self.bounds;
        if cycle_tick < day_end {
            Phase::Day
        } else if cycle_tick < dusk_end {
            Phase::Dusk
        } else if cycle_tick < night_end {
            Phase::Night
        } else {
            Phase::Dawn
        }
    }
}

fn phase_bounds(config: &CycleConfig) -> Result<[u32; 4], ClockError> {
    let lengths = [
        config.day_ticks,
        config.dusk_ticks,
        config.night_ticks,
        config.dawn_ticks,
    ];
    if lengths.contains(&0) {
        return Err(ClockError::InvalidConfig {
            reason: "every phase must last at least one tick".to_owned(),
        });
    }
    let mut bounds = [0_u32; 4];
    let mut total = 0_u32;
    for (bound, length) in bounds.iter_mut().zip(lengths) {
        total = total
            .checked_add(length)
            .ok_or_else(|| ClockError::InvalidConfig {
                reason: "cycle length overflows u32".to_owned(),
            })?;
        *bound = total;
    }
    Ok(bounds)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn make_clock() -> DayCycleClock {
        DayCycleClock::new(&CycleConfig::default()).unwrap()
    }

    fn advance_by(clock: &mut DayCycleClock, ticks: u32) {
        for _ in 0..ticks {
            clock.advance().unwrap();
        }
    }

    #[test]
    fn starts_on_day_one_at_dawn_of_day() {
        let clock = make_clock();
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.cycle_tick(), 0);
        assert_eq!(clock.cycle_length(), 180);
        assert_eq!(clock.phase(), Phase::Day);
    }

    #[test]
    fn phase_boundaries() {
        let clock = make_clock();
        assert_eq!(clock.phase_at(79), Phase::Day);
        assert_eq!(clock.phase_at(80), Phase::Dusk);
        assert_eq!(clock.phase_at(99), Phase::Dusk);
        assert_eq!(clock.phase_at(100), Phase::Night);
        assert_eq!(clock.phase_at(159), Phase::Night);
        assert_eq!(clock.phase_at(160), Phase::Dawn);
        assert_eq!(clock.phase_at(179), Phase::Dawn);
    }

    #[test]
    fn advance_reports_phase_change() {
        let mut clock = make_clock();
        advance_by(&mut clock, 79);
        let step = clock.advance().unwrap();
        assert!(step.phase_changed());
        assert_eq!(step.previous, Phase::Day);
        assert_eq!(step.current, Phase::Dusk);
        assert!(!step.sunrise);

        let step = clock.advance().unwrap();
        assert!(!step.phase_changed());
    }

    #[test]
    fn full_cycle_wraps_into_next_day() {
        let mut clock = make_clock();
        advance_by(&mut clock, 179);
        assert_eq!(clock.phase(), Phase::Dawn);
        let step = clock.advance().unwrap();
        assert!(step.sunrise);
        assert_eq!(step.current, Phase::Day);
        assert_eq!(clock.day(), 2);
        assert_eq!(clock.cycle_tick(), 0);
    }

    #[test]
    fn from_parts_validates() {
        let cfg = CycleConfig::default();
        assert_eq!(DayCycleClock::from_parts(0, 5, &cfg), Err(ClockError::DayZero));
        assert_eq!(
            DayCycleClock::from_parts(3, 180, &cfg),
            Err(ClockError::TickOutOfRange {
                tick: 180,
                cycle_length: 180
            })
        );
        let clock = DayCycleClock::from_parts(3, 120, &cfg).unwrap();
        assert_eq!(clock.phase(), Phase::Night);
    }

    #[test]
    fn zero_length_phase_rejected() {
        let cfg = CycleConfig {
            night_ticks: 0,
            ..CycleConfig::default()
        };
        assert!(matches!(DayCycleClock::new(&cfg), Err(ClockError::InvalidConfig { .. })));
    }

    #[test]
    fn day_overflow_leaves_clock_alone() {
        let cfg = CycleConfig::default();
        let mut clock = DayCycleClock::from_parts(u32::MAX, 179, &cfg).unwrap();
        assert_eq!(clock.advance(), Err(ClockError::DayOverflow));
        assert_eq!(clock.day(), u32::MAX);
        assert_eq!(clock.cycle_tick(), 179);
    }
}
