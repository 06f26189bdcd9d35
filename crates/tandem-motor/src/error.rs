//! Error types for motor and vehicle configuration.
//!
//! Only configuration can fail. Pin writes, pin reads and duty writes have no
//! error path at the capability interface.

use core::fmt;

use crate::types::Side;

/// Errors raised when a PWM timer cannot be initialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareConfigError {
    /// The timer is already claimed by another user.
    TimerClaimed,
    /// The timer rejected the requested configuration.
    InvalidConfig(&'static str),
}

impl fmt::Display for HardwareConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareConfigError::TimerClaimed => write!(f, "PWM timer already claimed"),
            HardwareConfigError::InvalidConfig(msg) => {
                write!(f, "Invalid PWM timer configuration: {}", msg)
            }
        }
    }
}

impl core::error::Error for HardwareConfigError {}

/// Errors raised when the speed output cannot be bound to a PWM channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelBindError {
    /// Every channel on the timer is already in use.
    NoFreeChannel,
    /// The pin with this id cannot be routed to the timer.
    IncompatiblePin(u8),
    /// The timer has not been configured yet.
    TimerNotConfigured,
}

impl fmt::Display for ChannelBindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelBindError::NoFreeChannel => write!(f, "No free PWM channel on timer"),
            ChannelBindError::IncompatiblePin(pin) => {
                write!(f, "Pin {} cannot be bound to this PWM timer", pin)
            }
            ChannelBindError::TimerNotConfigured => {
                write!(f, "PWM timer must be configured before binding a channel")
            }
        }
    }
}

impl core::error::Error for ChannelBindError {}

/// Any failure while configuring a single motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// The PWM timer could not be initialised.
    HardwareConfig(HardwareConfigError),
    /// The speed output could not be bound to a channel.
    ChannelBind(ChannelBindError),
}

impl From<HardwareConfigError> for MotorError {
    fn from(err: HardwareConfigError) -> Self {
        MotorError::HardwareConfig(err)
    }
}

impl From<ChannelBindError> for MotorError {
    fn from(err: ChannelBindError) -> Self {
        MotorError::ChannelBind(err)
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::HardwareConfig(err) => write!(f, "{}", err),
            MotorError::ChannelBind(err) => write!(f, "{}", err),
        }
    }
}

impl core::error::Error for MotorError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            MotorError::HardwareConfig(err) => Some(err),
            MotorError::ChannelBind(err) => Some(err),
        }
    }
}

/// A motor of a vehicle failed to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleError {
    /// Which motor failed.
    pub side: Side,
    /// Why it failed.
    pub source: MotorError,
}

impl fmt::Display for VehicleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} motor: {}", self.side, self.source)
    }
}

impl core::error::Error for VehicleError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.source)
    }
}
