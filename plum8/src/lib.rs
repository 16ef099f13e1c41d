//! Platform independent CHIP-8 interpreter core.
//!
//! The crate holds no clock of its own. A host drives [`Plum8::cycle`] at the
//! instruction rate it likes and [`Plum8::tick`] at the timer rate (60Hz), feeds
//! key transitions through [`Plum8::set_key`] and picks up changed frames with
//! [`Plum8::take_frame`].
#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod builder;
pub mod context;
pub mod error;
pub mod frame;
pub mod keypad;
pub mod memory;
pub mod opcode;
pub mod plum;
pub mod quirks;
pub mod timer;

pub use builder::{BuildError, Builder};
pub use context::Context;
pub use error::{DecodeError, Error, InputError, LoadError, MemoryError, StackError};
pub use frame::{Frame, FrameView, Grid, HEIGHT, WIDTH};
pub use opcode::OpCode;
pub use plum::Plum8;
pub use quirks::{Quirks, RegisterTransfer};
pub use timer::TimerState;

#[cfg(feature = "embedded-graphics")]
pub use embedded_graphics;
