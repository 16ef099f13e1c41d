//! Fixed rate driver for `Plum8::cycle` and `Plum8::tick`.
//!
//! Both callbacks run on the calling thread. Every callback owns a deadline
//! advanced by its period, the earliest deadline fires next, so instruction
//! and timer rates stay independent of each other.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use thiserror::Error;

use plum8::{Context, Error, Plum8};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RunReport {
    /// Instructions executed
    pub cycles: u64,
    /// Cycles spent waiting for a keypress
    pub idle_cycles: u64,
    pub ticks: u64,
    /// Changed frames picked up during the run
    pub frames: u64,
}

/// Interpretation stopped on a fatal error
#[derive(Debug, Error)]
#[error("interpreter halted at {:#05X} after {} cycles", .pc, .report.cycles)]
pub struct Halted {
    pub pc: u16,
    pub report: RunReport,
    #[source]
    pub error: Error,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Scheduler {
    cycle_period: Duration,
    tick_period: Duration,
}

fn period(freq: u32) -> Duration {
    Duration::from_nanos(1_000_000_000u64 / freq as u64)
}

impl Scheduler {
    /// Scheduler running `ips` instructions and `timer_hz` timer ticks per second
    ///
    /// Returns `None` when any of the rates is zero.
    pub fn new(ips: u32, timer_hz: u32) -> Option<Self> {
        if ips == 0 || timer_hz == 0 {
            return None;
        }
        Some(Self {
            cycle_period: period(ips),
            tick_period: period(timer_hz),
        })
    }

    /// Drive `chip` in real time for `duration`
    pub fn run_for<C: Context>(
        &self,
        chip: &mut Plum8<C>,
        duration: Duration,
    ) -> Result<RunReport, Halted> {
        let started = Instant::now();
        self.drive(chip, duration, |at| {
            let deadline = started + at;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
        })
    }

    /// Drive `chip` through `duration` worth of callbacks without sleeping
    pub fn run_unpaced<C: Context>(
        &self,
        chip: &mut Plum8<C>,
        duration: Duration,
    ) -> Result<RunReport, Halted> {
        self.drive(chip, duration, |_| {})
    }

    fn drive<C, W>(
        &self,
        chip: &mut Plum8<C>,
        duration: Duration,
        mut wait_until: W,
    ) -> Result<RunReport, Halted>
    where
        C: Context,
        W: FnMut(Duration),
    {
        let mut report = RunReport::default();
        let mut next_cycle = Duration::from_secs(0);
        let mut next_tick = self.tick_period;

        loop {
            let at = next_cycle.min(next_tick);
            if at >= duration {
                break;
            }
            wait_until(at);

            if next_tick <= next_cycle {
                chip.tick();
                report.ticks += 1;
                next_tick += self.tick_period;
            } else {
                match chip.cycle() {
                    Ok(()) => report.cycles += 1,
                    Err(nb::Error::WouldBlock) => report.idle_cycles += 1,
                    Err(nb::Error::Other(error)) => {
                        return Err(Halted {
                            pc: chip.pc(),
                            report,
                            error,
                        })
                    }
                }
                next_cycle += self.cycle_period;
            }

            if chip.take_frame().is_some() {
                report.frames += 1;
            }
        }

        debug!("{:?}", report);
        info!(
            "ran {} cycles ({} idle) and {} timer ticks",
            report.cycles, report.idle_cycles, report.ticks
        );
        Ok(report)
    }
}
