//! Single DC motor on one controller port.
//!
//! A motor owns four resources: brake, direction and speed outputs, and the
//! PWM timer that drives the speed output. It moves through three stages:
//!
//! ```text
//! bound (Motor::new) -> configured (configure_pins) -> driving / stopped
//! ```
//!
//! Driving and stopped are not tracked in memory. The brake output
//! overrides whatever speed and direction were last commanded, and the
//! direction is always read back from the pin.

use tracing::{debug, error, warn};

use crate::error::MotorError;
use crate::hal::{ChannelId, DigitalOutput, Level, PwmConfig, PwmTimer};
use crate::types::{Direction, MAX_DUTY, Polarity};

/// Snapshot of a motor's observable hardware state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorStatus {
    /// Whether the brake output is asserted.
    pub braking: bool,
    /// Level on the direction output.
    pub direction: Level,
    /// Logical direction that level produces under the motor's polarity.
    pub heading: Direction,
    /// Bound PWM channel, if any.
    pub channel: Option<ChannelId>,
}

/// One DC motor.
///
/// `P` is the digital output type used for the brake, direction and speed
/// resources. `T` is the PWM timer that can bind a `P` to a channel.
pub struct Motor<P, T>
where
    P: DigitalOutput,
    T: PwmTimer<Pin = P>,
{
    brake: P,
    direction: P,
    speed: P,
    timer: T,
    channel: Option<ChannelId>,
    polarity: Polarity,
    pwm_config: PwmConfig,
    max_duty: u32,
}

impl<P, T> Motor<P, T>
where
    P: DigitalOutput,
    T: PwmTimer<Pin = P>,
{
    /// Binds a motor to its resources. Nothing is written to the hardware.
    ///
    /// The motor starts with [`Polarity::ForwardHigh`], the default
    /// [`PwmConfig`] and a full-scale duty of [`MAX_DUTY`].
    pub fn new(brake: P, direction: P, speed: P, timer: T) -> Self {
        Self {
            brake,
            direction,
            speed,
            timer,
            channel: None,
            polarity: Polarity::default(),
            pwm_config: PwmConfig::default(),
            max_duty: MAX_DUTY,
        }
    }

    /// Sets which direction level means forward for this motor.
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Sets the configuration applied by [`Motor::configure_pwm`].
    pub fn with_pwm_config(mut self, config: PwmConfig) -> Self {
        self.pwm_config = config;
        self
    }

    /// Sets the duty value treated as full speed.
    pub fn with_max_duty(mut self, max_duty: u32) -> Self {
        self.max_duty = max_duty;
        self
    }

    /// Forward-direction polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Duty value treated as full speed.
    pub fn max_duty(&self) -> u32 {
        self.max_duty
    }

    /// PWM channel the speed output is bound to, once configured.
    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    /// Whether the speed output has been bound to a channel.
    pub fn is_configured(&self) -> bool {
        self.channel.is_some()
    }

    /// Puts the direction, speed and brake resources in output mode.
    ///
    /// Safe to call more than once.
    pub fn configure_analog(&mut self) {
        self.direction.configure_as_output();
        self.speed.configure_as_output();
        self.brake.configure_as_output();
    }

    /// Initialises the PWM timer backing the speed output.
    pub fn configure_pwm(&mut self) -> Result<(), MotorError> {
        self.timer.configure(&self.pwm_config).map_err(|err| {
            error!("Failed to configure PWM timer: {}", err);
            MotorError::from(err)
        })
    }

    /// Binds the speed output to a channel on the timer and stores it.
    ///
    /// Must follow a successful [`Motor::configure_pwm`]. On failure any
    /// previous binding is kept.
    pub fn configure_pwm_channel(&mut self) -> Result<ChannelId, MotorError> {
        match self.timer.bind_channel(&mut self.speed) {
            Ok(channel) => {
                debug!(%channel, "Speed output bound");
                self.channel = Some(channel);
                Ok(channel)
            }
            Err(err) => {
                error!("Failed to bind PWM channel: {}", err);
                Err(err.into())
            }
        }
    }

    /// Runs [`configure_analog`](Self::configure_analog),
    /// [`configure_pwm`](Self::configure_pwm) and
    /// [`configure_pwm_channel`](Self::configure_pwm_channel) in order and
    /// stops at the first error.
    ///
    /// Leaves the motor ready to drive without driving it.
    pub fn configure_pins(&mut self) -> Result<(), MotorError> {
        self.configure_analog();
        self.configure_pwm()?;
        self.configure_pwm_channel()?;
        Ok(())
    }

    /// Alias of [`Motor::configure_pins`].
    pub fn configure_all(&mut self) -> Result<(), MotorError> {
        self.configure_pins()
    }

    /// Configures the motor, then drives it forward at full speed.
    ///
    /// If configuration fails no motion command is issued.
    pub fn configure_everything(&mut self) -> Result<(), MotorError> {
        self.configure_pins()?;
        self.set_direction(self.polarity.forward_level());
        self.set_full_speed();
        Ok(())
    }

    /// Writes `level` to the direction output, without polarity correction.
    pub fn set_direction(&mut self, level: Level) {
        self.direction.set_level(level);
    }

    /// Level currently on the direction output.
    pub fn direction(&self) -> Level {
        self.direction.level()
    }

    /// Drives the direction output to the level that gives `direction`
    /// under this motor's polarity.
    pub fn drive(&mut self, direction: Direction) {
        self.set_direction(self.polarity.level_for(direction));
    }

    /// Logical direction the direction output currently selects.
    pub fn heading(&self) -> Direction {
        self.polarity.direction_for(self.direction())
    }

    /// Writes `duty` to the bound channel.
    ///
    /// The value is not range checked. Without a bound channel the write is
    /// dropped.
    pub fn set_speed(&mut self, duty: u32) {
        match self.channel {
            Some(channel) => self.timer.set_duty(channel, duty),
            None => warn!(duty, "Speed write dropped: no PWM channel bound"),
        }
    }

    /// Sets the duty to [`Motor::max_duty`].
    pub fn set_full_speed(&mut self) {
        self.set_speed(self.max_duty);
    }

    /// Sets the speed as a percentage (0-100) of [`Motor::max_duty`].
    /// Values above 100 are clamped.
    pub fn set_speed_percent(&mut self, percent: u8) {
        let percent = percent.min(100) as u64;
        let duty = (percent * self.max_duty as u64) / 100;
        self.set_speed(duty as u32);
    }

    /// Whether the brake output is asserted.
    pub fn is_braking(&self) -> bool {
        self.brake.is_set_high()
    }

    /// Asserts the brake and sets the duty to zero.
    pub fn stop(&mut self) {
        self.brake.set_high();
        self.set_speed(0);
    }

    /// Releases the brake and sets full speed.
    ///
    /// The speed commanded before [`Motor::stop`] is not restored.
    pub fn start(&mut self) {
        self.brake.set_low();
        self.set_full_speed();
    }

    /// Reads the motor's state back from the hardware.
    pub fn status(&self) -> MotorStatus {
        MotorStatus {
            braking: self.is_braking(),
            direction: self.direction(),
            heading: self.heading(),
            channel: self.channel,
        }
    }

    /// Hands the resources back as `(brake, direction, speed, timer)`.
    pub fn release(self) -> (P, P, P, T) {
        (self.brake, self.direction, self.speed, self.timer)
    }
}
