use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use plum8::Context;

/// Context of a headless run: seeded randomness and sound reported to the log
pub struct HostContext {
    rng: StdRng,
    beeps: usize,
}

impl HostContext {
    /// A fixed `seed` makes `CXNN` reproducible between runs
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, beeps: 0 }
    }

    /// How many times sound was turned on
    pub fn beeps(&self) -> usize {
        self.beeps
    }
}

impl Context for HostContext {
    fn sound_on(&mut self) {
        self.beeps += 1;
        info!("sound on");
    }

    fn sound_off(&mut self) {
        info!("sound off");
    }

    fn gen_random(&mut self) -> u8 {
        self.rng.gen::<u8>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_context_is_reproducible() {
        let mut lhs = HostContext::new(Some(8));
        let mut rhs = HostContext::new(Some(8));
        let lhs: Vec<u8> = (0..16).map(|_| lhs.gen_random()).collect();
        let rhs: Vec<u8> = (0..16).map(|_| rhs.gen_random()).collect();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn counts_beeps() {
        let mut ctx = HostContext::new(None);
        ctx.sound_on();
        ctx.sound_off();
        ctx.sound_on();
        assert_eq!(ctx.beeps(), 2);
    }
}
