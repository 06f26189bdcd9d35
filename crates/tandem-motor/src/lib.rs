#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` control model for DC motors and two-motor vehicles."]
#![doc = ""]
#![doc = "A [`Motor`] drives brake, direction and PWM speed resources supplied by the"]
#![doc = "board through the [`hal`] capability traits. A [`Vehicle`] pairs two motors"]
#![doc = "and steers them with per-motor [`Polarity`] correction, so that forward is"]
#![doc = "forward regardless of how each motor is wired."]
#![doc = ""]
#![doc = "```ignore"]
#![doc = "let left = Motor::new(brake0, dir0, speed0, tim0);"]
#![doc = "let right = Motor::new(brake1, dir1, speed1, tim1).with_polarity(Polarity::ForwardLow);"]
#![doc = "let mut vehicle = Vehicle::new(left, right);"]
#![doc = "vehicle.configure_everything()?;"]
#![doc = "vehicle.turn_left();"]
#![doc = "vehicle.stop();"]
#![doc = "```"]

pub mod error;
pub mod hal;
pub mod motor;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod types;
pub mod vehicle;

pub use error::{ChannelBindError, HardwareConfigError, MotorError, VehicleError};
pub use hal::{ChannelId, DigitalOutput, Level, PwmConfig, PwmTimer};
pub use motor::{Motor, MotorStatus};
pub use types::{Direction, MAX_DUTY, Polarity, Side};
pub use vehicle::{Vehicle, VehicleStatus};
