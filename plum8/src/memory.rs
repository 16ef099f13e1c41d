use crate::error::{LoadError, MemoryError};

/// Size of the whole address space
pub const MEM_LENGTH: usize = 4096;
/// First address of program space, where ROMs are loaded and execution starts
pub const PROGRAM_START: u16 = 0x200;
/// End (exclusive) of program space
pub const PROGRAM_END: u16 = 0xEA0;
/// Maximal size of a loadable ROM image
pub const PROGRAM_CAPACITY: usize = (PROGRAM_END - PROGRAM_START) as usize;
/// Address of the built-in font, glyph `n` lives at `FONT_START + 5 * n`
pub const FONT_START: u16 = 0x000;
pub const GLYPH_LENGTH: u16 = 5;

#[rustfmt::skip]
const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// 4K of interpreter memory with the font preloaded
///
/// Every accessor is bounds-checked, an address outside of the 4K space is reported
/// as `MemoryError::OutOfBounds` instead of being wrapped.
pub struct Memory([u8; MEM_LENGTH]);

impl Memory {
    pub fn new() -> Self {
        let mut memory = Self([0; MEM_LENGTH]);
        let font = FONT_START as usize;
        memory.0[font..font + FONT.len()].copy_from_slice(&FONT);
        memory
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.0
    }

    /// Copy a program into program space, zeroing whatever is left after it
    ///
    /// Nothing is written when the program does not fit.
    pub fn load_program(&mut self, prog: &[u8]) -> Result<(), LoadError> {
        if prog.len() > PROGRAM_CAPACITY {
            return Err(LoadError::TooLarge {
                size: prog.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }
        let space = &mut self.0[PROGRAM_START as usize..PROGRAM_END as usize];
        let (head, tail) = space.split_at_mut(prog.len());
        head.copy_from_slice(prog);
        tail.iter_mut().for_each(|mem| *mem = 0);
        Ok(())
    }

    pub fn read(&self, addr: u16) -> Result<u8, MemoryError> {
        self.0
            .get(addr as usize)
            .copied()
            .ok_or(MemoryError::OutOfBounds {
                address: addr as usize,
            })
    }

    /// Read a big-endian instruction word
    pub fn read_word(&self, addr: u16) -> Result<u16, MemoryError> {
        let word = self.slice(addr, 2)?;
        Ok((word[0] as u16) << 8 | word[1] as u16)
    }

    pub fn slice(&self, addr: u16, len: usize) -> Result<&[u8], MemoryError> {
        let start = addr as usize;
        self.0
            .get(start..start + len)
            .ok_or(MemoryError::OutOfBounds {
                address: start + len - 1,
            })
    }

    pub fn slice_mut(&mut self, addr: u16, len: usize) -> Result<&mut [u8], MemoryError> {
        let start = addr as usize;
        self.0
            .get_mut(start..start + len)
            .ok_or(MemoryError::OutOfBounds {
                address: start + len - 1,
            })
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
