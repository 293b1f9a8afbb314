use crate::error::GeneratorError;
use crate::Generator;
use keyhole_core::ShortCode;
use rand::RngExt;
use typed_builder::TypedBuilder;

/// The 62-character alphanumeric alphabet candidates are drawn from.
pub const ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Settings for [`RandomGenerator`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct RandomGeneratorSettings {
    /// Length of every generated candidate.
    #[builder(default = DEFAULT_CODE_LENGTH)]
    pub length: usize,
}

impl Default for RandomGeneratorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Generates fixed-length random codes over the alphanumeric alphabet.
///
/// Each call draws independently from the thread-local RNG; there is no
/// shared state between calls and no guarantee of uniqueness. At the
/// default length of 6 there are 62^6 (~57 billion) possible codes, so
/// collisions against the store are astronomically rare but still handled
/// by the allocator's redraw loop.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator from settings, rejecting lengths outside the
    /// 1-10 short code shape.
    pub fn new(settings: RandomGeneratorSettings) -> Result<Self, GeneratorError> {
        if settings.length < ShortCode::MIN_LENGTH || settings.length > ShortCode::MAX_LENGTH {
            return Err(GeneratorError::InvalidLength {
                min: ShortCode::MIN_LENGTH,
                max: ShortCode::MAX_LENGTH,
                got: settings.length,
            });
        }
        Ok(Self {
            length: settings.length,
        })
    }

    /// Length of the codes this generator produces.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        // The default length is within the code shape, so this cannot fail.
        Self {
            length: DEFAULT_CODE_LENGTH,
        }
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
