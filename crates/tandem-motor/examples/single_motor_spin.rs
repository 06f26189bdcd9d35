//! Spins one simulated motor up and down in both directions.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p tandem-motor --example single_motor_spin --features sim
//! ```

use std::thread;
use std::time::Duration;

use tandem_motor::sim;
use tandem_motor::{Direction, PwmConfig};
use tracing::info;

const PWM_FREQ: u32 = 4000; // PWM frequency in Hz
const STEP_TIME_MS: u64 = 100; // Time between speed changes
const MAX_SPEED: u8 = 100; // Maximum speed (100%)
const MIN_SPEED: u8 = 0; // Minimum speed (0%)

fn main() {
    tracing_subscriber::fmt().init();
    info!("Starting simulated single motor spin...");

    let (motor, probe) = sim::motor([2, 3, 4]);
    let mut motor = motor.with_pwm_config(PwmConfig::from_frequency(PWM_FREQ));

    if let Err(e) = motor.configure_pins() {
        info!("Motor configuration failed: {}", e);
        return;
    }
    info!("Motor configured on {:?}", motor.channel());

    for direction in [Direction::Forward, Direction::Backward] {
        info!("Setting direction: {}", direction);
        motor.drive(direction);
        motor.start();

        for speed in (MIN_SPEED..=MAX_SPEED).step_by(20) {
            motor.set_speed_percent(speed);
            let status = motor.status();
            info!(
                "Motor state: braking={}, direction={}, heading={}, duty={:?}",
                status.braking,
                status.direction,
                status.heading,
                probe.duty()
            );
            thread::sleep(Duration::from_millis(STEP_TIME_MS));
        }

        info!("Stopping motor");
        motor.stop();
        thread::sleep(Duration::from_millis(STEP_TIME_MS));
    }
}
