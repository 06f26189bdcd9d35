mod rig; // brings `rig.rs` in as `crate::rig`
mod script; // brings `script.rs` in as `crate::script`
mod settings; // brings `settings.rs` in as `crate::settings`

use anyhow::Context;
use rig::Rig;
use settings::{DEFAULT_CONFIG_PATH, load_settings};
use spin_sleep::SpinSleeper;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    info!("Tandem rig runner started with {}", path);

    let settings = load_settings(&path).with_context(|| format!("loading {}", path))?;
    let mut rig = Rig::build(&settings);

    // 1ms native accuracy is plenty for step holds.
    let sleeper = SpinSleeper::new(1_000_000);
    let outcome = script::run(&mut rig, &settings.script, &sleeper);

    // Leave the hardware braked whatever happened.
    rig.vehicle.stop();
    rig.log_status();

    if let Err(e) = &outcome {
        error!("Script aborted: {}", e);
    }
    outcome.context("running drive script")
}
