//! Two-motor vehicle with differential steering.
//!
//! A vehicle is both ports of a motor controller: M0 on the left and M1 on
//! the right. It holds no state of its own and only ever talks to the
//! hardware through its two [`Motor`]s.

use tracing::{debug, info};

use crate::error::VehicleError;
use crate::hal::{DigitalOutput, Level, PwmTimer};
use crate::motor::{Motor, MotorStatus};
use crate::types::{Direction, Side};

/// Both motors' state, read back from the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleStatus {
    /// M0.
    pub left: MotorStatus,
    /// M1.
    pub right: MotorStatus,
}

/// A pair of motors, left (M0) and right (M1).
pub struct Vehicle<P, T>
where
    P: DigitalOutput,
    T: PwmTimer<Pin = P>,
{
    left: Motor<P, T>,
    right: Motor<P, T>,
}

impl<P, T> Vehicle<P, T>
where
    P: DigitalOutput,
    T: PwmTimer<Pin = P>,
{
    /// Pairs two bound motors. `left` becomes M0 and `right` becomes M1.
    pub fn new(left: Motor<P, T>, right: Motor<P, T>) -> Self {
        Self { left, right }
    }

    /// M0.
    pub fn left(&self) -> &Motor<P, T> {
        &self.left
    }

    /// M1.
    pub fn right(&self) -> &Motor<P, T> {
        &self.right
    }

    /// Motor mounted on `side`.
    pub fn motor(&self, side: Side) -> &Motor<P, T> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Mutable access to the motor mounted on `side`, for per-side commands
    /// the vehicle does not expose.
    pub fn motor_mut(&mut self, side: Side) -> &mut Motor<P, T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Splits the vehicle back into `(left, right)`.
    pub fn into_motors(self) -> (Motor<P, T>, Motor<P, T>) {
        (self.left, self.right)
    }

    /// Runs [`Motor::configure_pins`] on M0 then M1.
    ///
    /// Stops at the first failure; see [`Vehicle::configure_everything`].
    pub fn configure_pins(&mut self) -> Result<(), VehicleError> {
        self.left
            .configure_pins()
            .map_err(|source| VehicleError { side: Side::Left, source })?;
        self.right
            .configure_pins()
            .map_err(|source| VehicleError { side: Side::Right, source })?;
        Ok(())
    }

    /// Runs [`Motor::configure_everything`] on M0 then M1.
    ///
    /// If M0 fails, M1 is never touched. If M1 fails, M0 stays configured and
    /// driving: there is no rollback.
    pub fn configure_everything(&mut self) -> Result<(), VehicleError> {
        self.left
            .configure_everything()
            .map_err(|source| VehicleError { side: Side::Left, source })?;
        self.right
            .configure_everything()
            .map_err(|source| VehicleError { side: Side::Right, source })?;
        info!("Vehicle configured");
        Ok(())
    }

    /// Spins clockwise: M0 forward, M1 backward.
    pub fn turn_right(&mut self) {
        debug!("Turn right");
        self.left.drive(Direction::Forward);
        self.right.drive(Direction::Backward);
    }

    /// Spins counter-clockwise: M0 backward, M1 forward.
    pub fn turn_left(&mut self) {
        debug!("Turn left");
        self.left.drive(Direction::Backward);
        self.right.drive(Direction::Forward);
    }

    /// Turns towards `side`.
    pub fn turn(&mut self, side: Side) {
        match side {
            Side::Left => self.turn_left(),
            Side::Right => self.turn_right(),
        }
    }

    /// Writes the same raw direction level to both motors.
    ///
    /// No polarity correction is applied. Prefer [`Vehicle::go_forwards`] and
    /// [`Vehicle::go_backwards`] for movement.
    pub fn set_direction_all(&mut self, level: Level) {
        self.left.set_direction(level);
        self.right.set_direction(level);
    }

    /// Writes raw direction levels to M0 and M1.
    pub fn set_direction(&mut self, left: Level, right: Level) {
        self.left.set_direction(left);
        self.right.set_direction(right);
    }

    /// Full speed on both motors, each in its own forward direction.
    pub fn go_forwards(&mut self) {
        self.go(Direction::Forward);
    }

    /// Full speed on both motors, each in its own backward direction.
    pub fn go_backwards(&mut self) {
        self.go(Direction::Backward);
    }

    /// Full speed on both motors, both heading in `direction`.
    pub fn go(&mut self, direction: Direction) {
        debug!(%direction, "Go");
        self.left.set_full_speed();
        self.right.set_full_speed();
        self.left.drive(direction);
        self.right.drive(direction);
    }

    /// Brakes both motors.
    pub fn stop(&mut self) {
        debug!("Stop");
        self.left.stop();
        self.right.stop();
    }

    /// Releases both brakes at full speed.
    pub fn start(&mut self) {
        debug!("Start");
        self.left.start();
        self.right.start();
    }

    /// Writes the same duty to both motors.
    pub fn set_speed(&mut self, duty: u32) {
        self.left.set_speed(duty);
        self.right.set_speed(duty);
    }

    /// Sets the same speed percentage (0-100) on both motors, each scaled to
    /// its own full-scale duty.
    pub fn set_speed_percent(&mut self, percent: u8) {
        self.left.set_speed_percent(percent);
        self.right.set_speed_percent(percent);
    }

    /// Reads both motors back from the hardware.
    pub fn status(&self) -> VehicleStatus {
        VehicleStatus {
            left: self.left.status(),
            right: self.right.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChannelBindError, HardwareConfigError, MotorError};
    use crate::sim::{self, Probe, SimPin, SimTimer};
    use crate::types::Polarity;

    const LEFT_PINS: [u8; 3] = [2, 3, 4];
    const RIGHT_PINS: [u8; 3] = [5, 6, 7];

    /// Left motor wired normally, right motor mirrored.
    fn mirrored_vehicle() -> (Vehicle<SimPin, SimTimer>, Probe, Probe) {
        let (left, left_probe) = sim::motor(LEFT_PINS);
        let (right, right_probe) = sim::motor(RIGHT_PINS);
        let vehicle = Vehicle::new(
            left.with_polarity(Polarity::ForwardHigh),
            right.with_polarity(Polarity::ForwardLow),
        );
        (vehicle, left_probe, right_probe)
    }

    fn configured_vehicle() -> (Vehicle<SimPin, SimTimer>, Probe, Probe) {
        let (mut vehicle, left, right) = mirrored_vehicle();
        vehicle.configure_pins().unwrap();
        (vehicle, left, right)
    }

    #[test]
    fn test_configure_everything_configures_both() {
        let (mut vehicle, left, right) = mirrored_vehicle();
        vehicle.configure_everything().unwrap();
        assert!(vehicle.left().is_configured());
        assert!(vehicle.right().is_configured());
        assert_eq!(left.duty(), Some(255));
        assert_eq!(right.duty(), Some(255));
        assert_eq!(vehicle.left().heading(), Direction::Forward);
        assert_eq!(vehicle.right().heading(), Direction::Forward);
        assert_eq!(vehicle.right().direction(), Level::Low);
    }

    #[test]
    fn test_configure_everything_fails_fast_on_left() {
        let timer = SimTimer::new(1).failing(HardwareConfigError::InvalidConfig("period"));
        let (left, _left_probe) = sim::motor_with_timer(LEFT_PINS, timer);
        let (right, right_probe) = sim::motor(RIGHT_PINS);
        let mut vehicle = Vehicle::new(left, right);

        let err = vehicle.configure_everything().unwrap_err();
        assert_eq!(err.side, Side::Left);
        assert_eq!(
            err.source,
            MotorError::HardwareConfig(HardwareConfigError::InvalidConfig("period"))
        );
        assert!(!vehicle.right().is_configured());
        assert!(!right_probe.brake.is_output());
        assert_eq!(right_probe.timer.configure_calls(), 0);
    }

    #[test]
    fn test_configure_everything_keeps_left_when_right_fails() {
        let (left, left_probe) = sim::motor(LEFT_PINS);
        let (right, _right_probe) = sim::motor_with_timer(RIGHT_PINS, SimTimer::new(0));
        let mut vehicle = Vehicle::new(left, right);

        let err = vehicle.configure_everything().unwrap_err();
        assert_eq!(err.side, Side::Right);
        assert_eq!(err.source, MotorError::ChannelBind(ChannelBindError::NoFreeChannel));
        assert!(vehicle.left().is_configured());
        assert_eq!(left_probe.duty(), Some(255));
    }

    #[test]
    fn test_turns_use_each_motor_polarity() {
        let (mut vehicle, _, _) = configured_vehicle();

        vehicle.turn_right();
        assert_eq!(vehicle.left().direction(), Level::High);
        assert_eq!(vehicle.right().direction(), Level::High);
        assert_eq!(vehicle.left().heading(), Direction::Forward);
        assert_eq!(vehicle.right().heading(), Direction::Backward);

        vehicle.turn_left();
        assert_eq!(vehicle.left().direction(), Level::Low);
        assert_eq!(vehicle.right().direction(), Level::Low);
        assert_eq!(vehicle.left().heading(), Direction::Backward);
        assert_eq!(vehicle.right().heading(), Direction::Forward);
    }

    #[test]
    fn test_turn_by_side() {
        let (mut vehicle, _, _) = configured_vehicle();
        vehicle.turn(Side::Right);
        assert_eq!(vehicle.right().heading(), Direction::Backward);
        vehicle.turn(Side::Left);
        assert_eq!(vehicle.left().heading(), Direction::Backward);
    }

    #[test]
    fn test_go_forwards_and_backwards() {
        let (mut vehicle, left, right) = configured_vehicle();
        vehicle.set_speed(10);

        vehicle.go_forwards();
        assert_eq!(vehicle.left().direction(), Level::High);
        assert_eq!(vehicle.right().direction(), Level::Low);
        assert_eq!(left.duty(), Some(255));
        assert_eq!(right.duty(), Some(255));

        vehicle.go_backwards();
        assert_eq!(vehicle.left().direction(), Level::Low);
        assert_eq!(vehicle.right().direction(), Level::High);

        // Independent of prior state.
        vehicle.go_backwards();
        assert_eq!(vehicle.left().heading(), Direction::Backward);
        assert_eq!(vehicle.right().heading(), Direction::Backward);
    }

    #[test]
    fn test_raw_direction_skips_polarity() {
        let (mut vehicle, _, _) = configured_vehicle();
        vehicle.set_direction_all(Level::High);
        assert_eq!(vehicle.left().direction(), Level::High);
        assert_eq!(vehicle.right().direction(), Level::High);
        assert_eq!(vehicle.right().heading(), Direction::Backward);

        vehicle.set_direction(Level::Low, Level::High);
        assert_eq!(vehicle.left().direction(), Level::Low);
        assert_eq!(vehicle.right().direction(), Level::High);
    }

    #[test]
    fn test_set_speed_applies_to_both() {
        let (mut vehicle, left, right) = configured_vehicle();
        vehicle.set_speed(42);
        assert_eq!(left.duty(), Some(42));
        assert_eq!(right.duty(), Some(42));
    }

    #[test]
    fn test_set_speed_percent_scales_per_motor() {
        let (left, left_probe) = sim::motor(LEFT_PINS);
        let (right, right_probe) = sim::motor(RIGHT_PINS);
        let mut vehicle = Vehicle::new(left, right.with_max_duty(1000));
        vehicle.configure_pins().unwrap();
        vehicle.set_speed_percent(40);
        assert_eq!(left_probe.duty(), Some(102));
        assert_eq!(right_probe.duty(), Some(400));
    }

    #[test]
    fn test_stop_and_start() {
        let (mut vehicle, left, right) = configured_vehicle();
        vehicle.set_speed(100);
        vehicle.stop();
        assert!(left.brake.is_set_high());
        assert!(right.brake.is_set_high());
        assert_eq!(left.duty(), Some(0));
        assert_eq!(right.duty(), Some(0));

        vehicle.start();
        assert!(!left.brake.is_set_high());
        assert!(!right.brake.is_set_high());
        assert_eq!(left.duty(), Some(255));
        assert_eq!(right.duty(), Some(255));
    }

    #[test]
    fn test_per_side_access() {
        let (mut vehicle, left, right) = configured_vehicle();
        vehicle.motor_mut(Side::Left).set_speed(30);
        vehicle.motor_mut(Side::Right).set_speed(60);
        assert_eq!(left.duty(), Some(30));
        assert_eq!(right.duty(), Some(60));
        assert_eq!(vehicle.motor(Side::Right).polarity(), Polarity::ForwardLow);
    }

    #[test]
    fn test_status_reports_both_sides() {
        let (mut vehicle, _, _) = configured_vehicle();
        vehicle.go_forwards();
        vehicle.stop();
        let status = vehicle.status();
        assert!(status.left.braking);
        assert!(status.right.braking);
        assert_eq!(status.left.heading, Direction::Forward);
        assert_eq!(status.right.heading, Direction::Forward);
    }

    #[test]
    fn test_into_motors_keeps_sides() {
        let (vehicle, _, _) = configured_vehicle();
        let (left, right) = vehicle.into_motors();
        assert_eq!(left.polarity(), Polarity::ForwardHigh);
        assert_eq!(right.polarity(), Polarity::ForwardLow);
    }
}
