use std::collections::HashSet;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tandem_motor::{Level, MAX_DUTY, Polarity, PwmConfig};
use thiserror::Error;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("pin {0} is assigned to more than one motor resource")]
    PinReused(u8),
}

/// Timer settings shared by both motors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PwmSettings {
    /// 0 keeps the timer default.
    pub frequency_hz: u32,
    pub max_duty: u32,
}

impl Default for PwmSettings {
    fn default() -> Self {
        Self {
            frequency_hz: 0,
            max_duty: MAX_DUTY,
        }
    }
}

impl PwmSettings {
    pub fn config(&self) -> PwmConfig {
        PwmConfig::from_frequency(self.frequency_hz)
    }
}

/// Wiring of one motor.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorSettings {
    pub brake: u8,
    pub direction: u8,
    pub speed: u8,
    #[serde(default)]
    pub polarity: Polarity,
    /// Free channels on the motor's simulated timer.
    #[serde(default = "default_channels")]
    pub channels: usize,
}

fn default_channels() -> usize {
    1
}

impl MotorSettings {
    pub fn pins(&self) -> [u8; 3] {
        [self.brake, self.direction, self.speed]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Configure,
    Forwards,
    Backwards,
    TurnLeft,
    TurnRight,
    Stop,
    Start,
    Speed,
    SpeedPercent,
    DirectionAll,
    Status,
}

/// One line of the drive script.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub action: Action,
    /// Duty for `speed`, percentage for `speed_percent`.
    #[serde(default)]
    pub value: Option<u32>,
    /// Raw level for `direction_all`.
    #[serde(default)]
    pub level: Option<Level>,
    /// How long to hold the step before the next one.
    #[serde(default)]
    pub hold_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub pwm: PwmSettings,
    pub left: MotorSettings,
    pub right: MotorSettings,
    #[serde(default)]
    pub script: Vec<Step>,
}

impl Settings {
    /// Parses settings from TOML text, without environment overrides.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects wiring that would alias one pin into two resources.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut seen = HashSet::new();
        for pin in self.left.pins().into_iter().chain(self.right.pins()) {
            if !seen.insert(pin) {
                return Err(SettingsError::PinReused(pin));
            }
        }
        Ok(())
    }
}

/// Loads settings from `path`, then applies `TANDEM__`-prefixed environment
/// overrides (e.g. `TANDEM__PWM__MAX_DUTY=1023`).
pub fn load_settings(path: &str) -> Result<Settings, SettingsError> {
    info!("Attempting to load configuration from {}", path);

    let config = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(true))
        .add_source(Environment::with_prefix("TANDEM").prefix_separator("__").separator("__"))
        .build();

    match config.map_err(SettingsError::from).and_then(Settings::from_config) {
        Ok(settings) => {
            info!(steps = settings.script.len(), "Successfully loaded configuration");
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRING: &str = r#"
        [left]
        brake = 2
        direction = 3
        speed = 4

        [right]
        brake = 5
        direction = 6
        speed = 7
        polarity = "forward_low"
    "#;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml_str(WIRING).unwrap();
        assert_eq!(settings.pwm.max_duty, MAX_DUTY);
        assert_eq!(settings.pwm.config(), PwmConfig::default());
        assert_eq!(settings.left.polarity, Polarity::ForwardHigh);
        assert_eq!(settings.right.polarity, Polarity::ForwardLow);
        assert_eq!(settings.left.channels, 1);
        assert!(settings.script.is_empty());
    }

    #[test]
    fn test_script_parsing() {
        let text = format!(
            "{}\n{}",
            WIRING,
            r#"
            [pwm]
            frequency_hz = 20000
            max_duty = 1023

            [[script]]
            action = "configure"

            [[script]]
            action = "speed"
            value = 512
            hold_ms = 250

            [[script]]
            action = "direction_all"
            level = "high"
            "#
        );
        let settings = Settings::from_toml_str(&text).unwrap();
        assert_eq!(settings.pwm.max_duty, 1023);
        assert_eq!(settings.pwm.config().period_ns, 50_000);
        assert_eq!(settings.script.len(), 3);
        assert_eq!(settings.script[0].action, Action::Configure);
        assert_eq!(settings.script[1].value, Some(512));
        assert_eq!(settings.script[1].hold_ms, 250);
        assert_eq!(settings.script[2].level, Some(Level::High));
    }

    #[test]
    fn test_rejects_reused_pin() {
        let text = WIRING.replace("speed = 7", "speed = 2");
        let result = Settings::from_toml_str(&text);
        assert!(matches!(result, Err(SettingsError::PinReused(2))));
    }

    #[test]
    fn test_missing_motor_is_an_error() {
        let result = Settings::from_toml_str("[left]\nbrake = 1\ndirection = 2\nspeed = 3\n");
        assert!(matches!(result, Err(SettingsError::Config(_))));
    }

    // Both loads share one test so the environment change cannot race
    // another test reading the same file.
    #[test]
    fn test_load_default_file_with_env_override() {
        let settings = load_settings(DEFAULT_CONFIG_PATH).unwrap();
        assert_eq!(settings.script.len(), 9);
        assert_eq!(settings.pwm.max_duty, MAX_DUTY);
        assert_eq!(settings.right.polarity, Polarity::ForwardLow);

        unsafe { std::env::set_var("TANDEM__PWM__MAX_DUTY", "1023") };
        let overridden = load_settings(DEFAULT_CONFIG_PATH);
        unsafe { std::env::remove_var("TANDEM__PWM__MAX_DUTY") };

        let overridden = overridden.unwrap();
        assert_eq!(overridden.pwm.max_duty, 1023);
        assert_eq!(overridden.pwm.frequency_hz, 1000);
        assert_eq!(overridden.script.len(), 9);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = load_settings("config/does-not-exist.toml");
        assert!(matches!(result, Err(SettingsError::Config(_))));
    }
}
