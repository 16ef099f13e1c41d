//! Behaviour switches for instructions whose semantics differ between
//! CHIP-8 interpreters.
//!
//! `Quirks::default()` selects the behaviour documented on each field.

/// Which registers `FX55`/`FX65` move between memory and the register file
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RegisterTransfer {
    /// All of V0..=VF, regardless of X
    Full,
    /// V0..=VX
    UpToX,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Quirks {
    /// `8XY6`/`8XYE` shift VY into VX instead of shifting VX in place. Default: off
    pub shift_uses_vy: bool,
    /// `FX1E` sets VF when I leaves the 12-bit address space. Default: on
    pub index_overflow_flag: bool,
    /// Default: `RegisterTransfer::Full`
    pub transfer: RegisterTransfer,
    /// `FX55`/`FX65` leave I pointing past the last transferred byte. Default: off
    pub transfer_increments_i: bool,
    /// `FX0A` resumes on any key instead of the key named by VX. Default: off
    pub await_any_key: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            shift_uses_vy: false,
            index_overflow_flag: true,
            transfer: RegisterTransfer::Full,
            transfer_increments_i: false,
            await_any_key: false,
        }
    }
}

impl Quirks {
    /// Behaviour of the original COSMAC VIP interpreter
    pub fn cosmac() -> Self {
        Self {
            shift_uses_vy: true,
            index_overflow_flag: false,
            transfer: RegisterTransfer::UpToX,
            transfer_increments_i: true,
            await_any_key: true,
        }
    }

    /// Number of registers moved by `FX55`/`FX65` for a given X
    pub(crate) fn transfer_count(&self, x: u8) -> usize {
        match self.transfer {
            RegisterTransfer::Full => 16,
            RegisterTransfer::UpToX => x as usize + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_count() {
        assert_eq!(Quirks::default().transfer_count(0x3), 16);
        assert_eq!(Quirks::cosmac().transfer_count(0x3), 4);
        assert_eq!(Quirks::cosmac().transfer_count(0xF), 16);
    }
}
