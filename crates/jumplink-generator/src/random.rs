use crate::Generator;
use jumplink_core::ShortCode;
use rand::Rng;
use typed_builder::TypedBuilder;

const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random short codes drawn uniformly from `[a-z0-9]`.
///
/// ```ignore
/// let generator = RandomGenerator::builder().build();
/// assert_eq!(generator.generate().as_str().len(), 10);
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGenerator {
    /// Number of characters per code. Values below 1 are treated as 1.
    #[builder(default = RandomGenerator::DEFAULT_LENGTH)]
    length: usize,
}

impl RandomGenerator {
    pub const DEFAULT_LENGTH: usize = 10;

    pub fn length(&self) -> usize {
        self.length.max(1)
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length())
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
