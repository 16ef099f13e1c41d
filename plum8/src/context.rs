//! Context for accessing functionalities of platform that `Plum8` is
//! emulated on.
//!
//! Keypad state and frames are exchanged through `Plum8` itself
//! (`set_key`, `take_frame`), the context only covers what the interpreter
//! has to ask for or announce on its own.

/// Trait aggregating platform functionalities
pub trait Context {
    /// Turn sound on
    ///
    /// Called by `execute` when the sound timer is set to a non-zero value
    fn sound_on(&mut self) {}
    /// Turn sound off
    ///
    /// Called by `tick` when the sound timer runs out
    fn sound_off(&mut self) {}
    /// Generate random 8-bit number
    ///
    /// Called by `cycle` whenever requested by executing program
    fn gen_random(&mut self) -> u8;
}

#[cfg(test)]
pub mod testing {
    use super::*;

    use nanorand::{rand::pcg64::Pcg64 as Rng, RNG};

    pub struct TestingContext {
        sound: bool,
        sound_toggles: usize,
        rng: Rng,
    }

    impl TestingContext {
        pub fn new(seed: u128) -> Self {
            Self {
                sound: false,
                sound_toggles: 0,
                rng: Rng::new_seed(seed),
            }
        }

        pub fn is_sound_on(&self) -> bool {
            self.sound
        }

        pub fn sound_toggles(&self) -> usize {
            self.sound_toggles
        }
    }

    impl Context for TestingContext {
        fn sound_on(&mut self) {
            self.sound = true;
            self.sound_toggles += 1;
        }

        fn sound_off(&mut self) {
            self.sound = false;
            self.sound_toggles += 1;
        }

        fn gen_random(&mut self) -> u8 {
            self.rng.generate::<u8>()
        }
    }

    #[test]
    fn testing_context() {
        let mut ctx = TestingContext::new(0);

        ctx.sound_on();
        assert!(ctx.is_sound_on());

        ctx.sound_off();
        assert!(!ctx.is_sound_on());
        assert_eq!(ctx.sound_toggles(), 2);

        let mut other = TestingContext::new(0);
        assert_eq!(ctx.gen_random(), other.gen_random());
    }
}
