//! Simulated pins and PWM timers.
//!
//! Every handle is a cheap clone over shared state, so a caller can move one
//! clone into a [`Motor`] and keep another to observe what the motor did to
//! the hardware. Used by host-side rigs and by this crate's tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::{ChannelBindError, HardwareConfigError};
use crate::hal::{ChannelId, DigitalOutput, PwmConfig, PwmTimer};
use crate::motor::Motor;

#[derive(Debug, Default)]
struct PinState {
    output: bool,
    high: bool,
    writes: usize,
}

/// A simulated digital output identified by a pin number.
#[derive(Debug, Clone)]
pub struct SimPin {
    id: u8,
    state: Arc<Mutex<PinState>>,
}

impl SimPin {
    /// Creates a pin in input mode, driven low.
    pub fn new(id: u8) -> Self {
        Self {
            id,
            state: Arc::default(),
        }
    }

    /// Pin number.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Whether the pin has been put in output mode.
    pub fn is_output(&self) -> bool {
        self.state.lock().output
    }

    /// Number of level writes seen so far.
    pub fn writes(&self) -> usize {
        self.state.lock().writes
    }
}

impl DigitalOutput for SimPin {
    fn configure_as_output(&mut self) {
        trace!(pin = self.id, "configure as output");
        self.state.lock().output = true;
    }

    fn set_high(&mut self) {
        trace!(pin = self.id, "set high");
        let mut state = self.state.lock();
        state.high = true;
        state.writes += 1;
    }

    fn set_low(&mut self) {
        trace!(pin = self.id, "set low");
        let mut state = self.state.lock();
        state.high = false;
        state.writes += 1;
    }

    fn is_set_high(&self) -> bool {
        self.state.lock().high
    }
}

#[derive(Debug)]
struct TimerState {
    config: Option<PwmConfig>,
    fail_with: Option<HardwareConfigError>,
    max_channels: usize,
    compatible: Option<Vec<u8>>,
    // Index is the channel number, value the bound pin.
    channels: Vec<u8>,
    duties: BTreeMap<ChannelId, u32>,
    configure_calls: usize,
    bind_calls: usize,
    duty_writes: usize,
}

/// A simulated PWM timer with a fixed number of channels.
#[derive(Debug, Clone)]
pub struct SimTimer {
    state: Arc<Mutex<TimerState>>,
}

impl SimTimer {
    /// Creates an unconfigured timer with `channels` free channels that
    /// accepts any pin.
    pub fn new(channels: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState {
                config: None,
                fail_with: None,
                max_channels: channels,
                compatible: None,
                channels: Vec::new(),
                duties: BTreeMap::new(),
                configure_calls: 0,
                bind_calls: 0,
                duty_writes: 0,
            })),
        }
    }

    /// Makes every [`PwmTimer::configure`] call fail with `err`.
    pub fn failing(self, err: HardwareConfigError) -> Self {
        self.state.lock().fail_with = Some(err);
        self
    }

    /// Restricts channel binding to the listed pins.
    pub fn with_compatible_pins(self, pins: &[u8]) -> Self {
        self.state.lock().compatible = Some(pins.to_vec());
        self
    }

    /// Whether the timer has been configured successfully.
    pub fn is_configured(&self) -> bool {
        self.state.lock().config.is_some()
    }

    /// Configuration applied by the last successful [`PwmTimer::configure`].
    pub fn config(&self) -> Option<PwmConfig> {
        self.state.lock().config
    }

    /// Channel the pin with this id is bound to.
    pub fn channel_of(&self, pin: u8) -> Option<ChannelId> {
        let state = self.state.lock();
        state
            .channels
            .iter()
            .position(|&bound| bound == pin)
            .map(|index| ChannelId(index as u8))
    }

    /// Last duty written to `channel`.
    pub fn duty(&self, channel: ChannelId) -> Option<u32> {
        self.state.lock().duties.get(&channel).copied()
    }

    /// Number of [`PwmTimer::configure`] calls, failed ones included.
    pub fn configure_calls(&self) -> usize {
        self.state.lock().configure_calls
    }

    /// Number of [`PwmTimer::bind_channel`] calls, failed ones included.
    pub fn bind_calls(&self) -> usize {
        self.state.lock().bind_calls
    }

    /// Number of duty writes seen so far.
    pub fn duty_writes(&self) -> usize {
        self.state.lock().duty_writes
    }
}

impl PwmTimer for SimTimer {
    type Pin = SimPin;

    fn configure(&mut self, config: &PwmConfig) -> Result<(), HardwareConfigError> {
        let mut state = self.state.lock();
        state.configure_calls += 1;
        if let Some(err) = state.fail_with {
            return Err(err);
        }
        trace!(period_ns = config.period_ns, "configure timer");
        state.config = Some(*config);
        Ok(())
    }

    fn bind_channel(&mut self, pin: &mut SimPin) -> Result<ChannelId, ChannelBindError> {
        let mut state = self.state.lock();
        state.bind_calls += 1;
        if state.config.is_none() {
            return Err(ChannelBindError::TimerNotConfigured);
        }
        if let Some(ref compatible) = state.compatible {
            if !compatible.contains(&pin.id) {
                return Err(ChannelBindError::IncompatiblePin(pin.id));
            }
        }
        if let Some(index) = state.channels.iter().position(|&bound| bound == pin.id) {
            return Ok(ChannelId(index as u8));
        }
        if state.channels.len() >= state.max_channels {
            return Err(ChannelBindError::NoFreeChannel);
        }
        state.channels.push(pin.id);
        let channel = ChannelId((state.channels.len() - 1) as u8);
        trace!(pin = pin.id, %channel, "bind channel");
        Ok(channel)
    }

    fn set_duty(&mut self, channel: ChannelId, duty: u32) {
        trace!(%channel, duty, "set duty");
        let mut state = self.state.lock();
        state.duties.insert(channel, duty);
        state.duty_writes += 1;
    }
}

/// Observation handles for a motor built by [`motor`].
#[derive(Debug, Clone)]
pub struct Probe {
    /// Brake output.
    pub brake: SimPin,
    /// Direction output.
    pub direction: SimPin,
    /// Speed output.
    pub speed: SimPin,
    /// PWM timer backing the speed output.
    pub timer: SimTimer,
}

impl Probe {
    /// Duty currently written to the speed output's channel, if it is bound
    /// and has been written.
    pub fn duty(&self) -> Option<u32> {
        self.timer
            .channel_of(self.speed.id())
            .and_then(|channel| self.timer.duty(channel))
    }
}

/// Builds a motor over fresh simulated pins `[brake, direction, speed]` and a
/// single-channel timer, returning it with its observation handles.
pub fn motor(pins: [u8; 3]) -> (Motor<SimPin, SimTimer>, Probe) {
    motor_with_timer(pins, SimTimer::new(1))
}

/// Like [`motor`], with a caller-supplied timer.
pub fn motor_with_timer(pins: [u8; 3], timer: SimTimer) -> (Motor<SimPin, SimTimer>, Probe) {
    let [brake, direction, speed] = pins.map(SimPin::new);
    let probe = Probe {
        brake: brake.clone(),
        direction: direction.clone(),
        speed: speed.clone(),
        timer: timer.clone(),
    };
    (Motor::new(brake, direction, speed, timer), probe)
}
