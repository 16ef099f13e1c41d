use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, warn};

use plum8::Builder;
use plum8_runner::{logger, render, rom, HostContext, Scheduler, Settings};

fn main() -> Result<()> {
    let settings = Settings::parse();
    logger::init(settings.log_level).context("failed to install logger")?;
    info!("init process started");

    let program = rom::read_rom(&settings.rom)?;
    let mut plum = Builder::new()
        .with_context(HostContext::new(settings.seed))
        .with_program(&program)
        .with_quirks(settings.quirks())
        .build()
        .with_context(|| format!("failed to load ROM {}", settings.rom.display()))?;

    let scheduler = Scheduler::new(settings.ips, settings.timer_hz)
        .ok_or_else(|| anyhow!("instruction and timer rates must be non-zero"))?;
    let outcome = scheduler.run_for(&mut plum, settings.duration());

    print!("{}", render::render_ascii(plum.frame()));
    if plum.ctx().beeps() > 0 {
        info!("sound was turned on {} times", plum.ctx().beeps());
    }
    if let Some(register) = plum.awaiting_key() {
        warn!("stopped while waiting for a key into V{:X}", register);
    }

    outcome
        .map(|_| ())
        .with_context(|| format!("running {} failed", settings.rom.display()))
}
