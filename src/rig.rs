//! A vehicle wired to simulated hardware.

use tandem_motor::sim::{self, Probe, SimPin, SimTimer};
use tandem_motor::{Motor, MotorStatus, Side, Vehicle};
use tracing::info;

use crate::settings::{MotorSettings, PwmSettings, Settings};

pub struct Rig {
    pub vehicle: Vehicle<SimPin, SimTimer>,
    pub left: Probe,
    pub right: Probe,
}

impl Rig {
    pub fn build(settings: &Settings) -> Self {
        let (left, left_probe) = build_motor(&settings.left, &settings.pwm);
        let (right, right_probe) = build_motor(&settings.right, &settings.pwm);
        info!(
            left = ?settings.left.pins(),
            right = ?settings.right.pins(),
            "Rig wired"
        );
        Self {
            vehicle: Vehicle::new(left, right),
            left: left_probe,
            right: right_probe,
        }
    }

    pub fn probe(&self, side: Side) -> &Probe {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Logs what each motor's hardware currently shows.
    pub fn log_status(&self) {
        let status = self.vehicle.status();
        for (side, motor) in [(Side::Left, status.left), (Side::Right, status.right)] {
            log_motor(side, &motor, self.probe(side).duty());
        }
    }
}

fn build_motor(wiring: &MotorSettings, pwm: &PwmSettings) -> (Motor<SimPin, SimTimer>, Probe) {
    let (motor, probe) = sim::motor_with_timer(wiring.pins(), SimTimer::new(wiring.channels));
    let motor = motor
        .with_polarity(wiring.polarity)
        .with_pwm_config(pwm.config())
        .with_max_duty(pwm.max_duty);
    (motor, probe)
}

fn log_motor(side: Side, status: &MotorStatus, duty: Option<u32>) {
    info!(
        %side,
        braking = status.braking,
        direction = %status.direction,
        heading = %status.heading,
        channel = ?status.channel,
        duty = ?duty,
        "Motor status"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_motor::Polarity;

    #[test]
    fn test_build_applies_settings() {
        let settings = Settings::from_toml_str(
            r#"
            [pwm]
            max_duty = 100

            [left]
            brake = 10
            direction = 11
            speed = 12

            [right]
            brake = 13
            direction = 14
            speed = 15
            polarity = "forward_low"
            "#,
        )
        .unwrap();
        let mut rig = Rig::build(&settings);
        assert_eq!(rig.vehicle.right().polarity(), Polarity::ForwardLow);
        assert_eq!(rig.vehicle.left().max_duty(), 100);

        rig.vehicle.configure_everything().unwrap();
        assert_eq!(rig.probe(Side::Left).duty(), Some(100));
        assert_eq!(rig.right.speed.id(), 15);
    }
}
