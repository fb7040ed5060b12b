pub mod pair;
pub mod random;

pub use pair::PairGenerator;
pub use random::RandomGenerator;

use jumplink_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
/// Output is not required to be unique: the store checks every candidate
/// and asks for another one on collision.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Produces the next candidate short code.
    fn generate(&self) -> Self::Output;

    /// Produces the candidate for the `attempt`-th try (1-based) of a single
    /// insert. Generators with a small code space override this to widen it
    /// after repeated collisions.
    fn generate_attempt(&self, attempt: usize) -> Self::Output {
        let _ = attempt;
        self.generate()
    }
}

impl<G: Generator> Generator for std::sync::Arc<G> {
    type Output = G::Output;

    fn generate(&self) -> Self::Output {
        (**self).generate()
    }

    fn generate_attempt(&self, attempt: usize) -> Self::Output {
        (**self).generate_attempt(attempt)
    }
}
