//! Farm clock: the in-game day counter and its derived season.
//!
//! The day number is the single source of truth. The season is computed
//! as `(day / days_per_season) % 4` over the cycle Spring, Summer, Fall,
//! Winter and is never stored independently.
//!
//! All day arithmetic is checked; advancing past `u32::MAX` is an error,
//! not a wrap.

use harvest_types::Season;

/// The first day of a new farm.
pub const FIRST_DAY: u32 = 1;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Day counter would overflow.
    #[error("day counter overflow: cannot advance beyond u32::MAX")]
    DayOverflow,

    /// Invalid clock configuration.
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Day counter with a fixed-length four-season year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarmClock {
    /// Current in-game day.
    day: u32,

    /// Number of days per season (at least 1).
    days_per_season: u32,
}

impl FarmClock {
    /// Create a clock at [`FIRST_DAY`].
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `days_per_season` is 0.
    pub fn new(days_per_season: u32) -> Result<Self, ClockError> {
        Self::from_parts(FIRST_DAY, days_per_season)
    }

    /// Create a clock at an explicit day (for restoring state and tests).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `days_per_season` is 0.
    pub fn from_parts(day: u32, days_per_season: u32) -> Result<Self, ClockError> {
        if days_per_season == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "days_per_season must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            day,
            days_per_season,
        })
    }

    /// Advance by one day. Returns the new day number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::DayOverflow`] at `u32::MAX`.
    pub fn advance(&mut self) -> Result<u32, ClockError> {
        self.day = self.day.checked_add(1).ok_or(ClockError::DayOverflow)?;
        Ok(self.day)
    }

    /// Current day.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Configured days per season.
    pub const fn days_per_season(&self) -> u32 {
        self.days_per_season
    }

    /// Season for the current day.
    pub fn season(&self) -> Season {
        Self::season_for(self.day, self.days_per_season)
    }

    /// Season for an arbitrary day. A zero season length is treated as 1.
    pub fn season_for(day: u32, days_per_season: u32) -> Season {
        let index = day.checked_div(days_per_season.max(1)).unwrap_or(0);
        Season::from_cycle_index(u64::from(index))
    }

    /// Days remaining until the season changes.
    pub fn days_until_season_change(&self) -> u32 {
        let within = self.day.checked_rem(self.days_per_season).unwrap_or(0);
        self.days_per_season.saturating_sub(within)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_on_day_one_in_spring() {
        let clock = FarmClock::new(90).unwrap();
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.season(), Season::Spring);
    }

    #[test]
    fn zero_season_length_is_rejected() {
        assert!(matches!(
            FarmClock::new(0),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn season_rotates_every_ninety_days() {
        let mut clock = FarmClock::new(90).unwrap();
        for _ in 1..90 {
            clock.advance().unwrap();
        }
        assert_eq!(clock.day(), 90);
        assert_eq!(clock.season(), Season::Summer);

        assert_eq!(FarmClock::season_for(180, 90), Season::Fall);
        assert_eq!(FarmClock::season_for(270, 90), Season::Winter);
        assert_eq!(FarmClock::season_for(360, 90), Season::Spring);
    }

    #[test]
    fn days_until_season_change_counts_down() {
        let clock = FarmClock::from_parts(45, 90).unwrap();
        assert_eq!(clock.days_until_season_change(), 45);
        let clock = FarmClock::from_parts(89, 90).unwrap();
        assert_eq!(clock.days_until_season_change(), 1);
    }

    #[test]
    fn advance_overflow_is_an_error() {
        let mut clock = FarmClock::from_parts(u32::MAX, 90).unwrap();
        assert!(matches!(clock.advance(), Err(ClockError::DayOverflow)));
        assert_eq!(clock.day(), u32::MAX);
    }
}
