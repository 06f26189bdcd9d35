//! Capability interface consumed by the motor model.
//!
//! Pin numbering, timer allocation and board identity live outside this
//! crate. A board support layer implements these traits for its own pin and
//! timer types and hands the resulting handles to [`Motor::new`](crate::Motor::new).

use core::fmt;
use core::ops::Not;

use crate::error::{ChannelBindError, HardwareConfigError};

/// Logic level of a digital output.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Driven low.
    Low,
    /// Driven high.
    High,
}

impl Level {
    /// Returns `true` for [`Level::High`].
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => f.write_str("low"),
            Level::High => f.write_str("high"),
        }
    }
}

/// Identifier of a channel on a PWM timer, as returned by
/// [`PwmTimer::bind_channel`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(pub u8);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

/// Timer configuration handed to [`PwmTimer::configure`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PwmConfig {
    /// PWM period in nanoseconds. `0` lets the timer pick its default period.
    pub period_ns: u64,
}

impl PwmConfig {
    /// Builds a configuration for the given frequency in Hz.
    ///
    /// A frequency of zero maps to the timer default.
    pub const fn from_frequency(hz: u32) -> Self {
        if hz == 0 {
            Self { period_ns: 0 }
        } else {
            Self {
                period_ns: 1_000_000_000 / hz as u64,
            }
        }
    }
}

/// Capability to drive a digital output (high/low) and read it back.
///
/// Writes are register updates and cannot fail at this interface.
pub trait DigitalOutput {
    /// Puts the resource in output mode. Calling it again is harmless.
    fn configure_as_output(&mut self);

    /// Drives the output high.
    fn set_high(&mut self);

    /// Drives the output low.
    fn set_low(&mut self);

    /// Reads the level currently on the output.
    fn is_set_high(&self) -> bool;

    /// Drives the output to `level`.
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Reads the level currently on the output.
    fn level(&self) -> Level {
        Level::from(self.is_set_high())
    }
}

/// Capability of a PWM timer that backs a motor's speed output.
pub trait PwmTimer {
    /// Output resource type that can be routed to one of the timer's channels.
    type Pin: DigitalOutput;

    /// Initialises the timer.
    fn configure(&mut self, config: &PwmConfig) -> Result<(), HardwareConfigError>;

    /// Routes `pin` to a channel on this timer and returns the channel.
    fn bind_channel(&mut self, pin: &mut Self::Pin) -> Result<ChannelId, ChannelBindError>;

    /// Writes a duty value to `channel`. Out-of-range values are handled by
    /// the peripheral.
    fn set_duty(&mut self, channel: ChannelId, duty: u32);
}
