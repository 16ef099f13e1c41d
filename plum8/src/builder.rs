use thiserror::Error;

use crate::context::Context;
use crate::error::LoadError;
use crate::plum::Plum8;
use crate::quirks::Quirks;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("context not provided")]
    MissingContext,
    #[error("program could not be loaded")]
    Load(#[from] LoadError),
}

pub struct Builder<'a, C: Context> {
    context: Option<C>,
    program: Option<&'a [u8]>,
    quirks: Quirks,
}

impl<'a, C: Context> Builder<'a, C> {
    pub fn new() -> Self {
        Self {
            context: None,
            program: None,
            quirks: Quirks::default(),
        }
    }

    pub fn with_context(mut self, ctx: C) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn with_program(mut self, prog: &'a [u8]) -> Self {
        self.program = Some(prog);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Assemble the machine, loading the program if one was given
    pub fn build(self) -> Result<Plum8<C>, BuildError> {
        let context = self.context.ok_or(BuildError::MissingContext)?;
        let mut plum = Plum8::with_quirks(context, self.quirks);
        if let Some(program) = self.program {
            plum.load(program)?;
        }
        Ok(plum)
    }
}

impl<'a, C: Context> Default for Builder<'a, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::TestingContext;
    use crate::memory::PROGRAM_CAPACITY;

    #[test]
    fn with_context_and_prog() {
        let result = Builder::new()
            .with_context(TestingContext::new(0))
            .with_program(&[0x00, 0xE0])
            .build();
        assert!(result.is_ok());
        assert_eq!(&result.unwrap().memory()[0x200..0x202], &[0x00, 0xE0]);
    }

    #[test]
    fn with_context_only() {
        let result = Builder::new().with_context(TestingContext::new(0)).build();
        assert!(result.is_ok());
    }

    #[test]
    fn with_program_only() {
        let result = Builder::<'_, TestingContext>::new()
            .with_program(&[])
            .build();
        assert!(matches!(result, Err(BuildError::MissingContext)));
    }

    #[test]
    fn with_oversized_program() {
        let prog = [0u8; PROGRAM_CAPACITY + 2];
        let result = Builder::new()
            .with_context(TestingContext::new(0))
            .with_program(&prog)
            .build();
        assert!(matches!(result, Err(BuildError::Load(LoadError::TooLarge { .. }))));
    }

    #[test]
    fn with_quirks() {
        let plum = Builder::new()
            .with_context(TestingContext::new(0))
            .with_quirks(Quirks::cosmac())
            .build()
            .unwrap();
        assert_eq!(plum.quirks(), &Quirks::cosmac());
    }
}
