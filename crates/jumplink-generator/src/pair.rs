use crate::random::RandomGenerator;
use crate::Generator;
use jumplink_core::ShortCode;
use rand::seq::IndexedRandom;
use typed_builder::TypedBuilder;

#[rustfmt::skip]
const ADJECTIVES: &[&str] = &[
    "admiring", "adoring", "affectionate", "agitated", "amazing", "angry", "awesome", "beautiful",
    "blissful", "bold", "boring", "brave", "busy", "charming", "clever", "compassionate",
    "competent", "condescending", "confident", "cool", "cranky", "crazy", "dazzling", "determined",
    "distracted", "dreamy", "eager", "ecstatic", "elastic", "elated", "elegant", "eloquent", "epic",
    "exciting", "fervent", "festive", "flamboyant", "focused", "friendly", "frosty", "funny",
    "gallant", "gifted", "goofy", "gracious", "great", "happy", "hardcore", "heuristic", "hopeful",
    "hungry", "infallible", "inspiring", "intelligent", "interesting", "jolly", "jovial", "keen",
    "kind", "laughing", "loving", "lucid", "magical", "modest", "musing", "mystifying", "naughty",
    "nervous", "nice", "nifty", "nostalgic", "objective", "optimistic", "peaceful", "pedantic",
    "pensive", "practical", "priceless", "quirky", "quizzical", "recursing", "relaxed", "reverent",
    "romantic", "sad", "serene", "sharp", "silly", "sleepy", "stoic", "strange", "stupefied",
    "suspicious", "sweet", "tender", "thirsty", "trusting", "unruffled", "upbeat", "vibrant",
    "vigilant", "vigorous", "wizardly", "wonderful", "xenodochial", "youthful", "zealous", "zen",
];

#[rustfmt::skip]
const NAMES: &[&str] = &[
    "agnesi", "albattani", "allen", "almeida", "antonelli", "archimedes", "ardinghelli",
    "aryabhata", "austin", "babbage", "banach", "banzai", "bardeen", "bartik", "bassi", "beaver",
    "bell", "benz", "bhabha", "bhaskara", "black", "blackburn", "blackwell", "bohr", "booth",
    "borg", "bose", "bouman", "boyd", "brahmagupta", "brattain", "brown", "buck", "burnell",
    "cannon", "carson", "cartwright", "carver", "cauchy", "cerf", "chandrasekhar", "chaplygin",
    "chatelet", "chatterjee", "chaum", "chebyshev", "clarke", "cohen", "colden", "cori", "cray",
    "curie", "curran", "darwin", "davinci", "dewdney", "dhawan", "diffie", "dijkstra", "dirac",
    "driscoll", "dubinsky", "easley", "edison", "einstein", "elbakyan", "elgamal", "elion", "ellis",
    "engelbart", "euclid", "euler", "faraday", "feistel", "fermat", "fermi", "feynman", "franklin",
    "gagarin", "galileo", "galois", "ganguly", "gates", "gauss", "germain", "goldberg", "goldstine",
    "goldwasser", "golick", "goodall", "gould", "greider", "grothendieck", "haibt", "hamilton",
    "hardy", "haslett", "hawking", "heisenberg", "hellman", "hermann", "herschel", "hertz",
    "heyrovsky", "hodgkin", "hofstadter", "hoover", "hopper", "hugle", "hypatia", "ishizaka",
    "jackson", "jang", "jemison", "jennings", "jepsen", "johnson", "joliot", "jones", "kalam",
    "kapitsa", "kare", "keldysh", "keller", "kepler", "khayyam", "khorana", "kilby", "kirch",
    "knuth", "kowalevski", "lalande", "lamarr", "lamport", "leakey", "leavitt", "lederberg",
    "lehmann", "lewin", "lichterman", "liskov", "lovelace", "lumiere", "mahavira", "margulis",
    "matsumoto", "maxwell", "mayer", "mccarthy", "mcclintock", "mclaren", "mclean", "mcnulty",
    "meitner", "mendel", "mendeleev", "meninsky", "merkle", "mestorf", "mirzakhani", "montalcini",
    "moore", "morse", "moser", "murdock", "napier", "nash", "neumann", "newton", "nightingale",
    "nobel", "noether", "northcutt", "noyce", "panini", "pare", "pascal", "pasteur", "payne",
    "perlman", "pike", "poincare", "poitras", "proskuriakova", "ptolemy", "raman", "ramanujan",
    "rhodes", "ride", "riemann", "ritchie", "robinson", "roentgen", "rosalind", "rubin", "saha",
    "sammet", "sanderson", "satoshi", "shamir", "shannon", "shaw", "shirley", "shockley", "shtern",
    "sinoussi", "snyder", "solomon", "spence", "stonebraker", "sutherland", "swanson", "swartz",
    "swirles", "taussig", "tesla", "tharp", "thompson", "torvalds", "tu", "turing", "varahamihira",
    "vaughan", "vaughn", "villani", "visvesvaraya", "volhard", "wescoff", "weierstrass", "wilbur",
    "wiles", "williams", "williamson", "wilson", "wing", "wozniak", "wright", "wu", "yalow",
    "yonath", "zhukovsky",
];

/// Memorable `adjective-name` short codes such as `brave-turing`.
///
/// The pair space holds a few tens of thousands of codes, so a busy store can
/// fill it. After `pair_attempts` collisions within one insert the generator
/// switches to `fallback`, a random `[a-z0-9]` code, which keeps the store's
/// retry loop finite.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PairGenerator {
    #[builder(default = ADJECTIVES)]
    adjectives: &'static [&'static str],
    #[builder(default = NAMES)]
    names: &'static [&'static str],
    /// Pair candidates tried per insert before falling back.
    #[builder(default = PairGenerator::DEFAULT_PAIR_ATTEMPTS)]
    pair_attempts: usize,
    #[builder(default)]
    fallback: RandomGenerator,
}

impl PairGenerator {
    pub const DEFAULT_PAIR_ATTEMPTS: usize = 64;

    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Number of distinct pair codes this generator can produce.
    pub fn capacity(&self) -> usize {
        self.adjectives.len() * self.names.len()
    }

    fn pair(&self) -> Option<ShortCode> {
        let mut rng = rand::rng();
        let adjective = self.adjectives.choose(&mut rng)?;
        let name = self.names.choose(&mut rng)?;
        Some(ShortCode::new_unchecked(format!("{adjective}-{name}")))
    }
}

impl Default for PairGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for PairGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        self.pair().unwrap_or_else(|| self.fallback.generate())
    }

    fn generate_attempt(&self, attempt: usize) -> ShortCode {
        if attempt > self.pair_attempts {
            return self.fallback.generate();
        }
        self.generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_lists_are_valid_code_fragments() {
        for word in ADJECTIVES.iter().chain(NAMES.iter()) {
            assert!(ShortCode::validate(word), "invalid word: {word}");
        }
    }

    #[test]
    fn output_is_adjective_dash_name() {
        let generator = PairGenerator::new();
        for _ in 0..50 {
            let code = generator.generate();
            let (adjective, name) = code.as_str().split_once('-').unwrap();
            assert!(ADJECTIVES.contains(&adjective));
            assert!(NAMES.contains(&name));
            assert!(ShortCode::validate(code.as_str()));
        }
    }

    #[test]
    fn capacity_counts_all_pairs() {
        assert_eq!(PairGenerator::new().capacity(), 108 * 241);
    }

    #[test]
    fn early_attempts_stay_pairs() {
        let generator = PairGenerator::new();
        for attempt in 1..=PairGenerator::DEFAULT_PAIR_ATTEMPTS {
            assert!(generator.generate_attempt(attempt).as_str().contains('-'));
        }
    }

    #[test]
    fn falls_back_to_random_codes_after_pair_attempts() {
        let generator = PairGenerator::builder()
            .pair_attempts(3)
            .fallback(RandomGenerator::builder().length(12).build())
            .build();

        let code = generator.generate_attempt(4);

        assert_eq!(code.as_str().len(), 12);
        assert!(!code.as_str().contains('-'));
        assert!(ShortCode::validate(code.as_str()));
    }

    #[test]
    fn empty_word_list_uses_fallback() {
        let generator = PairGenerator::builder().names(&[]).build();
        let code = generator.generate();
        assert_eq!(code.as_str().len(), RandomGenerator::DEFAULT_LENGTH);
    }
}
