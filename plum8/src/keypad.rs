use crate::error::InputError;

pub const KEYS: usize = 16;

/// State of the 4x4 hexadecimal keypad
///
/// Besides tracking which keys are held, the keypad owns the blocking-wait state
/// entered by `FX0A`: the register to latch into and the awaited key.
#[derive(Debug, Default)]
pub struct Keypad {
    keys: [bool; KEYS],
    wait: Option<Wait>,
}

/// Pending blocking-wait, resolved by a press of `key` (of any key when `None`)
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Wait {
    pub register: u8,
    pub key: Option<u8>,
}

impl Wait {
    fn resolved_by(&self, key: u8) -> bool {
        self.key.map_or(true, |awaited| awaited == key)
    }
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0F) as usize]
    }

    pub fn waiting(&self) -> Option<Wait> {
        self.wait
    }

    pub(crate) fn wait_for(&mut self, register: u8, key: Option<u8>) {
        self.wait = Some(Wait {
            register,
            key: key.map(|key| key & 0x0F),
        });
    }

    /// Update a key, returns the wait that got resolved by this transition
    pub(crate) fn set(&mut self, key: u8, pressed: bool) -> Result<Option<Wait>, InputError> {
        if key as usize >= KEYS {
            return Err(InputError::OutOfRange { key });
        }
        self.keys[key as usize] = pressed;
        match self.wait {
            Some(wait) if pressed && wait.resolved_by(key) => Ok(self.wait.take()),
            _ => Ok(None),
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
