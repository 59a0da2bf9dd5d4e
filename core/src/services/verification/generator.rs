//! Random code generation

use rand::{rngs::OsRng, Rng};

use vc_shared::config::CodeCharset;

/// Generates codes from the OS CSPRNG
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: usize,
    charset: CodeCharset,
}

impl CodeGenerator {
    pub fn new(length: usize, charset: CodeCharset) -> Self {
        Self { length, charset }
    }

    /// Generate a new code
    ///
    /// Each character is drawn uniformly from the charset.
    pub fn generate(&self) -> String {
        let characters = self.charset.characters();
        let mut rng = OsRng;
        (0..self.length)
            .map(|_| characters[rng.gen_range(0..characters.len())] as char)
            .collect()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn charset(&self) -> CodeCharset {
        self.charset
    }
}
