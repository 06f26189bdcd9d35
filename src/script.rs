//! Runs a drive script against a rig, one step at a time.

use std::time::Duration;

use spin_sleep::SpinSleeper;
use tandem_motor::VehicleError;
use thiserror::Error;
use tracing::info;

use crate::rig::Rig;
use crate::settings::{Action, Step};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("step {index}: `{action:?}` needs a `value`")]
    MissingValue { index: usize, action: Action },
    #[error("step {index}: `direction_all` needs a `level`")]
    MissingLevel { index: usize },
    #[error("step {index}: percentage {value} does not fit in 0-255")]
    PercentOutOfRange { index: usize, value: u32 },
    #[error("step {index}: configuration failed")]
    Configure {
        index: usize,
        #[source]
        source: VehicleError,
    },
}

/// Executes `steps` in order, holding each for its `hold_ms`.
///
/// A configuration failure aborts the script; motors that were already
/// configured keep running as commanded.
pub fn run(rig: &mut Rig, steps: &[Step], sleeper: &SpinSleeper) -> Result<(), ScriptError> {
    for (index, step) in steps.iter().enumerate() {
        info!(index, action = ?step.action, "Step");
        apply(rig, index, step)?;
        if step.hold_ms > 0 {
            sleeper.sleep(Duration::from_millis(step.hold_ms));
        }
    }
    info!(steps = steps.len(), "Script finished");
    Ok(())
}

fn apply(rig: &mut Rig, index: usize, step: &Step) -> Result<(), ScriptError> {
    let vehicle = &mut rig.vehicle;
    match step.action {
        Action::Configure => vehicle
            .configure_everything()
            .map_err(|source| ScriptError::Configure { index, source })?,
        Action::Forwards => vehicle.go_forwards(),
        Action::Backwards => vehicle.go_backwards(),
        Action::TurnLeft => vehicle.turn_left(),
        Action::TurnRight => vehicle.turn_right(),
        Action::Stop => vehicle.stop(),
        Action::Start => vehicle.start(),
        Action::Speed => {
            let duty = step.value.ok_or(ScriptError::MissingValue {
                index,
                action: step.action,
            })?;
            vehicle.set_speed(duty);
        }
        Action::SpeedPercent => {
            let value = step.value.ok_or(ScriptError::MissingValue {
                index,
                action: step.action,
            })?;
            let percent = u8::try_from(value)
                .map_err(|_| ScriptError::PercentOutOfRange { index, value })?;
            vehicle.set_speed_percent(percent);
        }
        Action::DirectionAll => {
            let level = step.level.ok_or(ScriptError::MissingLevel { index })?;
            vehicle.set_direction_all(level);
        }
        Action::Status => rig.log_status(),
    }
    Ok(())
}
