//! Headless host for the `plum8` interpreter: reads a ROM from disk, paces
//! instructions and timers at fixed rates and prints the final frame.

pub mod context;
pub mod logger;
pub mod render;
pub mod rom;
pub mod scheduler;
pub mod settings;

pub use context::HostContext;
pub use logger::Severity;
pub use scheduler::{Halted, RunReport, Scheduler};
pub use settings::Settings;
