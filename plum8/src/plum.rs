use core::convert::TryFrom;

use heapless::{consts::U16, Vec};
use log::{debug, error, trace, warn};

use crate::context::Context;
use crate::error::{Error, InputError, LoadError, MemoryError, StackError};
use crate::frame::{Frame, FrameView, Grid, HEIGHT, WIDTH};
use crate::keypad::{Keypad, Wait};
use crate::memory::{Memory, FONT_START, GLYPH_LENGTH, PROGRAM_START};
use crate::opcode::OpCode;
use crate::quirks::Quirks;
use crate::timer::{Timer, TimerState};

const VF: usize = 0xF;

/// The CHIP-8 machine: registers, memory, stack, timers, keypad and display
///
/// Driven from the outside by calling `cycle` once per instruction and `tick`
/// at a fixed rate (60Hz conventionally) to let the timers run.
pub struct Plum8<C: Context + Sized> {
    ctx: C,
    quirks: Quirks,
    v: [u8; 16],
    i: u16,
    pc: u16,
    memory: Memory,
    stack: Vec<u16, U16>,
    frame: Frame,
    dirty: bool,
    keypad: Keypad,
    delay_timer: Timer,
    sound_timer: Timer,
}

impl<C: Context + Sized> Plum8<C> {
    pub fn new(ctx: C) -> Self {
        Self::with_quirks(ctx, Quirks::default())
    }

    pub fn with_quirks(ctx: C, quirks: Quirks) -> Self {
        Self {
            ctx,
            quirks,
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            memory: Memory::new(),
            stack: Vec::new(),
            frame: Frame::new(),
            dirty: false,
            keypad: Keypad::new(),
            delay_timer: Timer::new(),
            sound_timer: Timer::new(),
        }
    }

    /// Load program from slice of bytes to memory from 0x200 (_start address)
    ///
    /// A program that does not fit into program space is rejected as a whole.
    pub fn load(&mut self, prog: &[u8]) -> Result<(), LoadError> {
        self.memory.load_program(prog).map_err(|err| {
            warn!("rejected program: {}", err);
            err
        })?;
        debug!("loaded {} bytes of program at {:#05X}", prog.len(), PROGRAM_START);
        Ok(())
    }

    /// Read a whole program from `reader` and load it
    #[cfg(feature = "std")]
    pub fn load_from<R: std::io::Read>(&mut self, mut reader: R) -> Result<(), LoadError> {
        let mut prog = std::vec::Vec::new();
        reader
            .read_to_end(&mut prog)
            .map_err(LoadError::IoFailure)?;
        self.load(&prog)
    }

    /// Bring the machine back to its power-on state, program space included
    pub fn reset(&mut self) {
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.memory = Memory::new();
        self.stack = Vec::new();
        self.frame.clear();
        self.dirty = true;
        self.keypad.reset();
        self.delay_timer.store(0);
        if self.sound_timer.is_active() {
            self.ctx.sound_off();
        }
        self.sound_timer.store(0);
        debug!("machine reset");
    }

    /// Fetch, decode and execute a single instruction
    ///
    /// Returns `WouldBlock` without doing anything while waiting for a keypress.
    /// On a fatal error pc is left at the faulting instruction.
    pub fn cycle(&mut self) -> nb::Result<(), Error> {
        if self.keypad.waiting().is_some() {
            return Err(nb::Error::WouldBlock);
        }
        let pc = self.pc;
        let result = self
            .memory
            .read_word(pc)
            .map_err(Error::from)
            .and_then(|raw| OpCode::try_from(raw).map_err(Error::from))
            .and_then(|opcode| {
                trace!("{:#05X}: {}", pc, opcode);
                self.execute(opcode)
            });
        result.map_err(|err| {
            error!("halted at {:#05X}: {}", pc, err);
            self.pc = pc;
            nb::Error::Other(err)
        })
    }

    /// Run up to `n` cycles, stopping early when a keypress is awaited
    ///
    /// Returns the number of executed instructions.
    pub fn step_n(&mut self, n: usize) -> Result<usize, Error> {
        for executed in 0..n {
            match self.cycle() {
                Ok(()) => {}
                Err(nb::Error::WouldBlock) => return Ok(executed),
                Err(nb::Error::Other(err)) => return Err(err),
            }
        }
        Ok(n)
    }

    /// Decrement both timers, called by the timing driver at its own rate
    ///
    /// Returns the state of the sound timer.
    pub fn tick(&mut self) -> TimerState {
        self.delay_timer.decrement();
        let sound = self.sound_timer.decrement();
        if sound == TimerState::Finished {
            self.ctx.sound_off();
        }
        sound
    }

    /// Report a key transition
    ///
    /// Pressing the awaited key ends a blocking-wait and latches the key into the
    /// awaited register.
    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), InputError> {
        let resolved = self.keypad.set(key, pressed).map_err(|err| {
            warn!("ignoring key event: {}", err);
            err
        })?;
        if let Some(Wait { register, .. }) = resolved {
            debug!("key {:X} resumes execution, latched into V{:X}", key, register);
            self.v[register as usize] = key;
        }
        Ok(())
    }

    pub fn frame(&self) -> FrameView<'_> {
        self.frame.view()
    }

    /// Copy of the display expanded to caller's pixel type
    pub fn snapshot_framebuffer<P: Copy>(&self, on: P, off: P) -> Grid<P> {
        self.frame.view().to_grid(on, off)
    }

    /// Display as 3 bytes per pixel, all 255 for lit pixels and 0 otherwise
    pub fn export_rgb(&self) -> Grid<[u8; 3]> {
        self.snapshot_framebuffer([255; 3], [0; 3])
    }

    /// Whether the display changed since the last consumed frame
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Copy of the display if it changed since the last call, clears the dirty flag
    pub fn take_frame(&mut self) -> Option<Frame> {
        if self.dirty {
            self.dirty = false;
            Some(self.frame.view().copy_frame())
        } else {
            None
        }
    }

    pub fn ctx(&self) -> &C {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn quirks(&self) -> &Quirks {
        &self.quirks
    }

    pub fn set_quirks(&mut self, quirks: Quirks) {
        self.quirks = quirks;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn v(&self, x: u8) -> u8 {
        self.v[(x & 0x0F) as usize]
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.load()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.load()
    }

    /// Whether a tone should currently be audible
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Register that receives the key of a pending blocking-wait
    pub fn awaiting_key(&self) -> Option<u8> {
        self.keypad.waiting().map(|wait| wait.register)
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.keypad.is_pressed(key)
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_raw()
    }

    fn pc_increment(&mut self) -> Result<(), Error> {
        if self.pc < 0x0FFEu16 {
            self.pc += 2;
            Ok(())
        } else {
            Err(MemoryError::OutOfBounds {
                address: self.pc as usize + 2,
            }
            .into())
        }
    }
}

// OpCodes impls
impl<C: Context + Sized> Plum8<C> {
    #[rustfmt::skip]
    fn execute(&mut self, opcode: OpCode) -> Result<(), Error> {
        match opcode {
            OpCode::_00EE | OpCode::_1NNN { .. } | OpCode::_2NNN { .. } | OpCode::_BNNN { .. } => {}
            // nothing may change unless pc can move on afterwards
            _ if self.pc >= 0x0FFEu16 => {
                return Err(MemoryError::OutOfBounds {
                    address: self.pc as usize + 2,
                }
                .into())
            }
            _ => {}
        }
        let result = match opcode {
            OpCode::_00E0             => self.clear_screen(),
            OpCode::_00EE             => return self.subroutine_return(),
            OpCode::_1NNN { nnn }     => return self.jump_to(nnn),
            OpCode::_2NNN { nnn }     => return self.exec_subroutine_at(nnn),
            OpCode::_3XNN { x, nn }   => self.skip_if_vx_eq_nn(x, nn),
            OpCode::_4XNN { x, nn }   => self.skip_if_vx_ne_nn(x, nn),
            OpCode::_5XY0 { x, y }    => self.skip_if_vx_eq_vy(x, y),
            OpCode::_6XNN { x, nn }   => self.assign_vx_nn(x, nn),
            OpCode::_7XNN { x, nn }   => self.assign_add_vx_nn(x, nn),
            OpCode::_8XY0 { x, y }    => self.assign_vx_vy(x, y),
            OpCode::_8XY1 { x, y }    => self.assign_or_vx_vy(x, y),
            OpCode::_8XY2 { x, y }    => self.assign_and_vx_vy(x, y),
            OpCode::_8XY3 { x, y }    => self.assign_xor_vx_vy(x, y),
            OpCode::_8XY4 { x, y }    => self.assign_add_vx_vy(x, y),
            OpCode::_8XY5 { x, y }    => self.assign_sub_vx_vy(x, y),
            OpCode::_8XY6 { x, y }    => self.assign_vx_shifted_r(x, y),
            OpCode::_8XY7 { x, y }    => self.assign_vx_vy_sub_vx(x, y),
            OpCode::_8XYE { x, y }    => self.assign_vx_shifted_l(x, y),
            OpCode::_9XY0 { x, y }    => self.skip_if_vx_ne_vy(x, y),
            OpCode::_ANNN { nnn }     => self.assign_i_nnn(nnn),
            OpCode::_BNNN { nnn }     => return self.jump_to_nnn_add_v0(nnn),
            OpCode::_CXNN { x, nn }   => self.assign_vx_random_and_nn(x, nn),
            OpCode::_DXYN { x, y, n } => self.draw_n_at_vx_vy(x, y, n),
            OpCode::_EX9E { x }       => self.skip_if_vx_in_keys(x),
            OpCode::_EXA1 { x }       => self.skip_if_vx_not_in_keys(x),
            OpCode::_FX07 { x }       => self.assign_vx_delay_t(x),
            OpCode::_FX0A { x }       => self.assign_vx_wait_for_key(x),
            OpCode::_FX15 { x }       => self.assign_delay_t_vx(x),
            OpCode::_FX18 { x }       => self.assign_sound_t_vx(x),
            OpCode::_FX1E { x }       => self.assign_add_i_vx(x),
            OpCode::_FX29 { x }       => self.assign_i_addr_of_sprite_vx(x),
            OpCode::_FX33 { x }       => self.assign_mem_at_i_bcd_of_vx(x),
            OpCode::_FX55 { x }       => self.assign_mem_at_i_registers(x),
            OpCode::_FX65 { x }       => self.assign_registers_mem_at_i(x),
        };
        result?;
        self.pc_increment()
    }

    /// 00E0: clear the display
    fn clear_screen(&mut self) -> Result<(), Error> {
        self.frame.clear();
        self.dirty = true;
        Ok(())
    }

    /// 00EE: return from a subroutine
    fn subroutine_return(&mut self) -> Result<(), Error> {
        let addr = self.stack.pop().ok_or(StackError::Underflow)?;
        debug!("return to {:#05X}, depth {}", addr, self.stack.len());
        self.pc = addr;
        Ok(())
    }

    /// 1NNN: jump
    fn jump_to(&mut self, nnn: u16) -> Result<(), Error> {
        self.pc = nnn;
        Ok(())
    }

    /// 2NNN: call a subroutine
    fn exec_subroutine_at(&mut self, nnn: u16) -> Result<(), Error> {
        self.stack
            .push(self.pc + 2)
            .map_err(|_| StackError::Overflow)?;
        debug!("call {:#05X}, depth {}", nnn, self.stack.len());
        self.pc = nnn;
        Ok(())
    }

    /// 3XNN: skip if VX == NN
    fn skip_if_vx_eq_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        if self.v[x as usize] == nn {
            self.pc_increment()
        } else {
            Ok(())
        }
    }

    /// 4XNN: skip if VX != NN
    fn skip_if_vx_ne_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        if self.v[x as usize] != nn {
            self.pc_increment()
        } else {
            Ok(())
        }
    }

    /// 5XY0: skip if VX == VY
    fn skip_if_vx_eq_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        if self.v[x as usize] == self.v[y as usize] {
            self.pc_increment()
        } else {
            Ok(())
        }
    }

    /// 6XNN: load an immediate
    fn assign_vx_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        self.v[x as usize] = nn;
        Ok(())
    }

    /// 7XNN: add an immediate, VF untouched
    fn assign_add_vx_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        self.v[x as usize] = self.v[x as usize].wrapping_add(nn);
        Ok(())
    }

    /// 8XY0: copy VY into VX
    fn assign_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] = self.v[y as usize];
        Ok(())
    }

    /// 8XY1: bitwise or
    fn assign_or_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] |= self.v[y as usize];
        Ok(())
    }

    /// 8XY2: bitwise and
    fn assign_and_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] &= self.v[y as usize];
        Ok(())
    }

    /// 8XY3: bitwise xor
    fn assign_xor_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] ^= self.v[y as usize];
        Ok(())
    }

    // Flag setting ALU ops below read both operands, write VF, then write VX.
    // With X == F the result overwrites the flag.

    /// 8XY4: add with carry into VF
    fn assign_add_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let (value, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
        self.v[VF] = carry as u8;
        self.v[x as usize] = value;
        Ok(())
    }

    /// 8XY5: VX - VY, VF = 1 unless it borrows
    fn assign_sub_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let (value, borrow) = self.v[x as usize].overflowing_sub(self.v[y as usize]);
        self.v[VF] = !borrow as u8;
        self.v[x as usize] = value;
        Ok(())
    }

    /// 8XY6: shift right, VF = bit shifted out
    fn assign_vx_shifted_r(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let source = self.shift_source(x, y);
        self.v[VF] = source & 0x01u8;
        self.v[x as usize] = source >> 1;
        Ok(())
    }

    /// 8XY7: VY - VX, VF = 1 unless it borrows
    fn assign_vx_vy_sub_vx(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let (value, borrow) = self.v[y as usize].overflowing_sub(self.v[x as usize]);
        self.v[VF] = !borrow as u8;
        self.v[x as usize] = value;
        Ok(())
    }

    /// 8XYE: shift left, VF = bit shifted out
    fn assign_vx_shifted_l(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let source = self.shift_source(x, y);
        self.v[VF] = source >> 7;
        self.v[x as usize] = source << 1;
        Ok(())
    }

    fn shift_source(&self, x: u8, y: u8) -> u8 {
        if self.quirks.shift_uses_vy {
            self.v[y as usize]
        } else {
            self.v[x as usize]
        }
    }

    /// 9XY0: skip if VX != VY
    fn skip_if_vx_ne_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        if self.v[x as usize] != self.v[y as usize] {
            self.pc_increment()
        } else {
            Ok(())
        }
    }

    /// ANNN: load I
    fn assign_i_nnn(&mut self, nnn: u16) -> Result<(), Error> {
        self.i = nnn;
        Ok(())
    }

    /// BNNN: jump relative to V0
    fn jump_to_nnn_add_v0(&mut self, nnn: u16) -> Result<(), Error> {
        let addr = nnn + self.v[0] as u16;
        if addr <= 0x0FFFu16 {
            self.pc = addr;
            Ok(())
        } else {
            Err(MemoryError::OutOfBounds {
                address: addr as usize,
            }
            .into())
        }
    }

    /// CXNN: masked random byte
    fn assign_vx_random_and_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        self.v[x as usize] = self.ctx.gen_random() & nn;
        Ok(())
    }

    /// DXYN: XOR a sprite onto the display, VF = 1 if a lit pixel got erased
    fn draw_n_at_vx_vy(&mut self, x: u8, y: u8, n: u8) -> Result<(), Error> {
        let origin_x = self.v[x as usize] as usize % WIDTH;
        let origin_y = self.v[y as usize] as usize % HEIGHT;
        let sprite = self.memory.slice(self.i, n as usize)?;

        let mut erased = false;
        for (row, &byte) in sprite.iter().enumerate() {
            erased |= self.frame.xor_sprite_row(origin_x, origin_y + row, byte);
        }
        self.v[VF] = erased as u8;
        self.dirty = true;
        Ok(())
    }

    /// EX9E: skip if key VX is held
    fn skip_if_vx_in_keys(&mut self, x: u8) -> Result<(), Error> {
        if self.keypad.is_pressed(self.v[x as usize]) {
            self.pc_increment()
        } else {
            Ok(())
        }
    }

    /// EXA1: skip if key VX is not held
    fn skip_if_vx_not_in_keys(&mut self, x: u8) -> Result<(), Error> {
        if !self.keypad.is_pressed(self.v[x as usize]) {
            self.pc_increment()
        } else {
            Ok(())
        }
    }

    /// FX07: read the delay timer
    fn assign_vx_delay_t(&mut self, x: u8) -> Result<(), Error> {
        self.v[x as usize] = self.delay_timer.load();
        Ok(())
    }

    /// FX0A: block until the awaited key is pressed
    fn assign_vx_wait_for_key(&mut self, x: u8) -> Result<(), Error> {
        let key = if self.quirks.await_any_key {
            None
        } else {
            Some(self.v[x as usize])
        };
        self.keypad.wait_for(x, key);
        debug!("waiting for key {:?} into V{:X}", key, x);
        Ok(())
    }

    /// FX15: set the delay timer
    fn assign_delay_t_vx(&mut self, x: u8) -> Result<(), Error> {
        self.delay_timer.store(self.v[x as usize]);
        Ok(())
    }

    /// FX18: set the sound timer
    fn assign_sound_t_vx(&mut self, x: u8) -> Result<(), Error> {
        let was_active = self.sound_timer.is_active();
        self.sound_timer.store(self.v[x as usize]);
        match (was_active, self.sound_timer.is_active()) {
            (false, true) => self.ctx.sound_on(),
            (true, false) => self.ctx.sound_off(),
            _ => {}
        }
        Ok(())
    }

    /// FX1E: add VX to I
    fn assign_add_i_vx(&mut self, x: u8) -> Result<(), Error> {
        self.i = self.i.wrapping_add(self.v[x as usize] as u16);
        if self.quirks.index_overflow_flag {
            self.v[VF] = (self.i > 0x0FFFu16) as u8;
        }
        Ok(())
    }

    /// FX29: point I at the font glyph of VX
    fn assign_i_addr_of_sprite_vx(&mut self, x: u8) -> Result<(), Error> {
        self.i = FONT_START + GLYPH_LENGTH * (self.v[x as usize] & 0x0F) as u16;
        Ok(())
    }

    /// FX33: BCD of VX at I..I+3
    fn assign_mem_at_i_bcd_of_vx(&mut self, x: u8) -> Result<(), Error> {
        let value = self.v[x as usize];
        let digits = self.memory.slice_mut(self.i, 3)?;
        digits[0] = value / 100u8;
        digits[1] = (value % 100) / 10u8;
        digits[2] = value % 10u8;
        Ok(())
    }

    /// FX55: store registers at I
    fn assign_mem_at_i_registers(&mut self, x: u8) -> Result<(), Error> {
        let count = self.quirks.transfer_count(x);
        self.memory
            .slice_mut(self.i, count)?
            .copy_from_slice(&self.v[..count]);
        if self.quirks.transfer_increments_i {
            self.i += count as u16;
        }
        Ok(())
    }

    /// FX65: load registers from I
    fn assign_registers_mem_at_i(&mut self, x: u8) -> Result<(), Error> {
        let count = self.quirks.transfer_count(x);
        self.v[..count].copy_from_slice(self.memory.slice(self.i, count)?);
        if self.quirks.transfer_increments_i {
            self.i += count as u16;
        }
        Ok(())
    }
}
